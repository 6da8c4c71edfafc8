//! Player identity and per-player bookkeeping.
//!
//! This module contains:
//! - `PlayerColor`, the identity every move and kingdom is keyed by
//! - `Player`, which owns a kingdom and counts delivered tiles

use crate::kingdom::Kingdom;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Player color, which doubles as the player's identity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum PlayerColor {
    Yellow,
    Red,
    Green,
    Blue,
}

impl PlayerColor {
    /// All colors in seating order
    pub const ALL: [PlayerColor; 4] = [
        PlayerColor::Yellow,
        PlayerColor::Red,
        PlayerColor::Green,
        PlayerColor::Blue,
    ];

    /// The first `count` colors, for quickly seating a game
    pub fn first(count: usize) -> Vec<PlayerColor> {
        Self::ALL.iter().copied().take(count).collect()
    }

    pub fn name(&self) -> &'static str {
        match self {
            PlayerColor::Yellow => "Yellow",
            PlayerColor::Red => "Red",
            PlayerColor::Green => "Green",
            PlayerColor::Blue => "Blue",
        }
    }
}

impl fmt::Display for PlayerColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A seated player
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    pub color: PlayerColor,
    /// The player's grid
    pub kingdom: Kingdom,
    /// Tiles put into the kingdom
    pub tiles_placed: u32,
    /// Tiles given up because they fit nowhere
    pub tiles_discarded: u32,
}

impl Player {
    /// Create a new player with an empty kingdom of the given size
    pub fn new(color: PlayerColor, kingdom_size: u8) -> Self {
        Self {
            color,
            kingdom: Kingdom::new(color, kingdom_size),
            tiles_placed: 0,
            tiles_discarded: 0,
        }
    }

    /// Tiles placed or discarded so far
    pub fn tiles_delivered(&self) -> u32 {
        self.tiles_placed + self.tiles_discarded
    }
}
