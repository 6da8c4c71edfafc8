//! Moves players submit and the events they produce.

use crate::player::PlayerColor;
use crate::point::Placement;
use crate::tile::Tile;
use serde::{Deserialize, Serialize};

/// Everything a driver can submit to the game
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameMove {
    /// Advance out of `Start`; a no-op in `End`
    None,
    /// Claim the tile at this index of the next offer
    MapNextPatch(usize),
    /// Put the held tile into the kingdom
    PlaceCurrentPatch(Placement),
    /// Give up the held tile because it fits nowhere
    DiscardCurrentPatch,
}

/// Events that occur as a result of moves
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEvent {
    /// The first offer is open for drafting
    GameStarted { turn_order: Vec<PlayerColor> },

    /// A tile was claimed from the next offer
    PatchDrafted {
        player: PlayerColor,
        index: usize,
        tile: Tile,
    },

    /// A held tile went into a kingdom
    PatchPlaced {
        player: PlayerColor,
        tile: Tile,
        placement: Placement,
    },

    /// A held tile fit nowhere and was thrown away
    PatchDiscarded { player: PlayerColor, tile: Tile },

    /// Offers rolled over and a new draft order applies
    RoundStarted {
        round: u32,
        turn_order: Vec<PlayerColor>,
    },

    /// No tiles remain; final scores in seating order
    GameEnded { scores: Vec<(PlayerColor, u32)> },
}
