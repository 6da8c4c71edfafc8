//! A player's kingdom: the grid of placed squares around their castle.
//!
//! This module contains:
//! - Placement validation (bounds, overlap, terrain adjacency)
//! - Tile placement
//! - Region detection by flood fill, used for scoring
//! - A JSON-friendly snapshot for renderers

use crate::player::PlayerColor;
use crate::point::{Direction, Placement, Point};
use crate::tile::{Square, Terrain, Tile};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use thiserror::Error;

/// Why a tile cannot go where it was asked to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error, Serialize, Deserialize)]
pub enum PlacementError {
    #[error("Cell {0} is outside the kingdom")]
    OutOfBounds(Point),

    #[error("Cell {0} is already occupied")]
    Occupied(Point),

    #[error("Tile touches neither matching terrain nor the castle")]
    NotConnected,
}

/// A maximal group of orthogonally connected squares of one terrain
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Region {
    pub terrain: Terrain,
    /// Member cells in ascending order
    pub points: Vec<Point>,
    /// Crowns on all member squares
    pub crowns: u32,
}

impl Region {
    /// Number of squares in the region
    pub fn size(&self) -> u32 {
        self.points.len() as u32
    }

    /// Region value: squares times crowns
    pub fn score(&self) -> u32 {
        self.size() * self.crowns
    }
}

/// One player's grid.
///
/// Always contains the castle at the origin, and every other square is
/// reachable from it through orthogonal steps.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Kingdom {
    owner: PlayerColor,
    /// Side length the finished kingdom is built for (5 or 7)
    size: u8,
    #[serde(with = "square_list")]
    squares: HashMap<Point, Square>,
}

/// Point keys are not strings, so the grid is written as a list of
/// `(point, square)` pairs in ascending point order
mod square_list {
    use super::{Point, Square};
    use serde::{Deserialize, Deserializer, Serializer};
    use std::collections::HashMap;

    pub fn serialize<S: Serializer>(
        squares: &HashMap<Point, Square>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        let mut list: Vec<(&Point, &Square)> = squares.iter().collect();
        list.sort_by_key(|(point, _)| **point);
        serializer.collect_seq(list)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<HashMap<Point, Square>, D::Error> {
        let list: Vec<(Point, Square)> = Vec::deserialize(deserializer)?;
        Ok(list.into_iter().collect())
    }
}

impl Kingdom {
    /// Create a kingdom holding only the castle
    pub fn new(owner: PlayerColor, size: u8) -> Self {
        let mut squares = HashMap::new();
        squares.insert(Point::ORIGIN, Square::CASTLE);
        Self {
            owner,
            size,
            squares,
        }
    }

    pub fn owner(&self) -> PlayerColor {
        self.owner
    }

    pub fn size(&self) -> u8 {
        self.size
    }

    /// Largest absolute coordinate a square may have
    pub fn limit(&self) -> i32 {
        self.size as i32 - 1
    }

    /// Number of occupied cells, castle included
    pub fn len(&self) -> usize {
        self.squares.len()
    }

    /// Whether only the castle stands
    pub fn is_empty(&self) -> bool {
        self.squares.len() == 1
    }

    /// Number of tiles placed so far
    pub fn tiles_placed(&self) -> usize {
        (self.squares.len() - 1) / 2
    }

    /// Get the square at a point
    pub fn get(&self, point: Point) -> Option<Square> {
        self.squares.get(&point).copied()
    }

    /// All occupied cells in ascending point order
    pub fn squares(&self) -> Vec<(Point, Square)> {
        let mut squares: Vec<(Point, Square)> =
            self.squares.iter().map(|(p, s)| (*p, *s)).collect();
        squares.sort_by_key(|(p, _)| *p);
        squares
    }

    /// Check if a point lies inside the grid bounds
    pub fn in_bounds(&self, point: Point) -> bool {
        point.within(self.limit())
    }

    /// Smallest rectangle holding every occupied cell, as `(min, max)` corners
    pub fn bounding_box(&self) -> (Point, Point) {
        let mut min = Point::ORIGIN;
        let mut max = Point::ORIGIN;
        for point in self.squares.keys() {
            min.x = min.x.min(point.x);
            min.y = min.y.min(point.y);
            max.x = max.x.max(point.x);
            max.y = max.y.max(point.y);
        }
        (min, max)
    }

    // ==================== Validation Methods ====================

    /// Check whether `tile` may be put down at `placement`.
    ///
    /// Both cells must be in bounds and empty, and at least one of the two
    /// squares must touch a square of its own terrain or the castle. The tile
    /// is judged as a unit: one satisfied side is enough.
    pub fn check_placement(&self, tile: &Tile, placement: Placement) -> Result<(), PlacementError> {
        let cells = placement.cells();

        for cell in cells {
            if !self.in_bounds(cell) {
                return Err(PlacementError::OutOfBounds(cell));
            }
        }
        for cell in cells {
            if self.squares.contains_key(&cell) {
                return Err(PlacementError::Occupied(cell));
            }
        }

        let connected = cells
            .iter()
            .zip(tile.squares())
            .any(|(cell, square)| self.touches_matching(*cell, square.terrain));
        if !connected {
            return Err(PlacementError::NotConnected);
        }

        Ok(())
    }

    /// Whether `tile` may be put down at `placement`
    pub fn can_place(&self, tile: &Tile, placement: Placement) -> bool {
        self.check_placement(tile, placement).is_ok()
    }

    /// Check if a cell borders the castle or a square of `terrain`
    fn touches_matching(&self, cell: Point, terrain: Terrain) -> bool {
        cell.neighbors().iter().any(|n| {
            self.squares
                .get(n)
                .is_some_and(|s| s.terrain == terrain || s.terrain.is_castle())
        })
    }

    /// Every legal placement for `tile`, in row-major anchor order
    pub fn legal_placements(&self, tile: &Tile) -> Vec<Placement> {
        let limit = self.limit();
        let mut placements = Vec::new();
        for y in -limit..=limit {
            for x in -limit..=limit {
                for direction in Direction::ALL {
                    let placement = Placement::new(Point::new(x, y), direction);
                    if self.can_place(tile, placement) {
                        placements.push(placement);
                    }
                }
            }
        }
        placements
    }

    /// Whether `tile` fits anywhere
    pub fn has_legal_placement(&self, tile: &Tile) -> bool {
        !self.legal_placements(tile).is_empty()
    }

    // ==================== Mutation Methods ====================

    /// Put a tile down. Nothing changes if the placement is illegal.
    pub fn place(&mut self, tile: &Tile, placement: Placement) -> Result<(), PlacementError> {
        self.check_placement(tile, placement)?;
        let [first, second] = placement.cells();
        self.squares.insert(first, tile.first);
        self.squares.insert(second, tile.second);
        Ok(())
    }

    // ==================== Region Detection ====================

    /// All scoring regions, found by flood fill.
    ///
    /// The castle belongs to no region. Regions come out ordered by their
    /// smallest point, and each region's points are sorted.
    pub fn connected_regions(&self) -> Vec<Region> {
        let mut starts: Vec<Point> = self
            .squares
            .iter()
            .filter(|(_, s)| !s.terrain.is_castle())
            .map(|(p, _)| *p)
            .collect();
        starts.sort();

        let mut visited: HashSet<Point> = HashSet::new();
        let mut regions = Vec::new();

        for start in starts {
            if visited.contains(&start) {
                continue;
            }
            let terrain = self.squares[&start].terrain;
            let mut points = Vec::new();
            let mut crowns = 0;
            let mut stack = vec![start];
            visited.insert(start);

            while let Some(point) = stack.pop() {
                points.push(point);
                crowns += self.squares[&point].crowns as u32;
                for n in point.neighbors() {
                    if visited.contains(&n) {
                        continue;
                    }
                    if self.squares.get(&n).is_some_and(|s| s.terrain == terrain) {
                        visited.insert(n);
                        stack.push(n);
                    }
                }
            }

            points.sort();
            regions.push(Region {
                terrain,
                points,
                crowns,
            });
        }

        regions
    }

    /// Whether every square can reach the castle. Always true for a kingdom
    /// built through `place`.
    pub fn is_connected(&self) -> bool {
        let mut visited: HashSet<Point> = HashSet::new();
        let mut stack = vec![Point::ORIGIN];
        visited.insert(Point::ORIGIN);
        while let Some(point) = stack.pop() {
            for n in point.neighbors() {
                if self.squares.contains_key(&n) && visited.insert(n) {
                    stack.push(n);
                }
            }
        }
        visited.len() == self.squares.len()
    }

    /// Convert to a JSON-friendly representation with an array instead of a
    /// point-keyed map
    pub fn to_json_friendly(&self) -> KingdomJson {
        KingdomJson {
            owner: self.owner,
            size: self.size,
            squares: self
                .squares()
                .into_iter()
                .map(|(point, square)| SquareJson {
                    x: point.x,
                    y: point.y,
                    terrain: square.terrain,
                    crowns: square.crowns,
                })
                .collect(),
        }
    }
}

/// JSON-friendly kingdom representation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KingdomJson {
    pub owner: PlayerColor,
    pub size: u8,
    pub squares: Vec<SquareJson>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SquareJson {
    pub x: i32,
    pub y: i32,
    pub terrain: Terrain,
    pub crowns: u8,
}
