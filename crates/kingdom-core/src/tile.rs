//! Terrain squares, two-square tiles and the fixed tile catalog.
//!
//! This module contains:
//! - Terrain types (including the castle square)
//! - Squares (terrain plus crowns) and tiles (ordered pairs of squares)
//! - The 48-tile catalog and its shuffled draw order

use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Number of tiles in the catalog
pub const TILE_COUNT: usize = 48;

/// Highest crown count a single square can carry
pub const MAX_CROWNS: u8 = 3;

/// Terrain of a single square
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Terrain {
    /// The castle at the center of every kingdom. Matches any terrain for
    /// adjacency but never belongs to a scoring region.
    Castle,
    Plain,
    Forest,
    Water,
    Grass,
    Swamp,
    Mine,
}

impl Terrain {
    /// All terrains that appear on tiles
    pub const LANDSCAPES: [Terrain; 6] = [
        Terrain::Plain,
        Terrain::Forest,
        Terrain::Water,
        Terrain::Grass,
        Terrain::Swamp,
        Terrain::Mine,
    ];

    /// Whether this is the castle square
    pub fn is_castle(&self) -> bool {
        matches!(self, Terrain::Castle)
    }

    /// Display name
    pub fn name(&self) -> &'static str {
        match self {
            Terrain::Castle => "Castle",
            Terrain::Plain => "Plain",
            Terrain::Forest => "Forest",
            Terrain::Water => "Water",
            Terrain::Grass => "Grass",
            Terrain::Swamp => "Swamp",
            Terrain::Mine => "Mine",
        }
    }
}

impl fmt::Display for Terrain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One cell's worth of land
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Square {
    pub terrain: Terrain,
    /// 0 to 3
    pub crowns: u8,
}

impl Square {
    /// The castle square
    pub const CASTLE: Square = Square::new(Terrain::Castle, 0);

    /// Create a new square
    pub const fn new(terrain: Terrain, crowns: u8) -> Self {
        Self { terrain, crowns }
    }

    /// A square without crowns
    pub const fn plain(terrain: Terrain) -> Self {
        Self::new(terrain, 0)
    }
}

/// A domino-shaped piece made of two squares.
///
/// Tiles carry no identity: two tiles with the same squares are
/// interchangeable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Tile {
    pub first: Square,
    pub second: Square,
}

impl Tile {
    /// Create a new tile
    pub const fn new(first: Square, second: Square) -> Self {
        Self { first, second }
    }

    /// Both squares, first then second
    pub fn squares(&self) -> [Square; 2] {
        [self.first, self.second]
    }

    /// Total crowns on the tile
    pub fn crowns(&self) -> u32 {
        self.first.crowns as u32 + self.second.crowns as u32
    }

    /// Whether both squares share a terrain
    pub fn is_uniform(&self) -> bool {
        self.first.terrain == self.second.terrain
    }
}

impl fmt::Display for Tile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}{} | {}{}]",
            self.first.terrain,
            "*".repeat(self.first.crowns as usize),
            self.second.terrain,
            "*".repeat(self.second.crowns as usize),
        )
    }
}

const fn tile(a: Terrain, a_crowns: u8, b: Terrain, b_crowns: u8) -> Tile {
    Tile::new(Square::new(a, a_crowns), Square::new(b, b_crowns))
}

use Terrain::{Forest, Grass, Mine, Plain, Swamp, Water};

/// The catalog, roughly ordered from least to most valuable
const CATALOG: [Tile; TILE_COUNT] = [
    // Crownless, single terrain
    tile(Plain, 0, Plain, 0),
    tile(Plain, 0, Plain, 0),
    tile(Forest, 0, Forest, 0),
    tile(Forest, 0, Forest, 0),
    tile(Forest, 0, Forest, 0),
    tile(Forest, 0, Forest, 0),
    tile(Water, 0, Water, 0),
    tile(Water, 0, Water, 0),
    tile(Water, 0, Water, 0),
    tile(Grass, 0, Grass, 0),
    tile(Grass, 0, Grass, 0),
    tile(Swamp, 0, Swamp, 0),
    // Crownless, mixed
    tile(Plain, 0, Forest, 0),
    tile(Plain, 0, Water, 0),
    tile(Plain, 0, Grass, 0),
    tile(Plain, 0, Swamp, 0),
    tile(Forest, 0, Water, 0),
    tile(Forest, 0, Grass, 0),
    // One crown on plain
    tile(Plain, 1, Forest, 0),
    tile(Plain, 1, Water, 0),
    tile(Plain, 1, Grass, 0),
    tile(Plain, 1, Swamp, 0),
    tile(Plain, 1, Mine, 0),
    // One crown on forest
    tile(Forest, 1, Plain, 0),
    tile(Forest, 1, Plain, 0),
    tile(Forest, 1, Plain, 0),
    tile(Forest, 1, Plain, 0),
    tile(Forest, 1, Water, 0),
    tile(Forest, 1, Grass, 0),
    // One crown on water
    tile(Water, 1, Plain, 0),
    tile(Water, 1, Plain, 0),
    tile(Water, 1, Forest, 0),
    tile(Water, 1, Forest, 0),
    tile(Water, 1, Forest, 0),
    tile(Water, 1, Forest, 0),
    // One crown on grass, swamp, mine
    tile(Grass, 1, Plain, 0),
    tile(Grass, 1, Water, 0),
    tile(Swamp, 1, Plain, 0),
    tile(Swamp, 1, Grass, 0),
    tile(Mine, 1, Plain, 0),
    // Two crowns
    tile(Grass, 2, Plain, 0),
    tile(Grass, 2, Water, 0),
    tile(Swamp, 2, Plain, 0),
    tile(Swamp, 2, Grass, 0),
    // Mines
    tile(Mine, 2, Plain, 0),
    tile(Mine, 2, Swamp, 0),
    tile(Mine, 2, Swamp, 0),
    tile(Mine, 3, Plain, 0),
];

/// The full catalog in its fixed order
pub fn all_tiles() -> Vec<Tile> {
    CATALOG.to_vec()
}

/// A uniformly random permutation of the catalog
pub fn shuffled_draw_order<R: Rng + ?Sized>(rng: &mut R) -> Vec<Tile> {
    let mut tiles = all_tiles();
    tiles.shuffle(rng);
    tiles
}
