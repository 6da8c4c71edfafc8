//! Patchwork Kingdom - a tile-drafting kingdom building game engine
//!
//! This crate provides the rules engine for a 2-4 player game in which
//! players draft two-square terrain tiles and grow a kingdom around their
//! castle:
//! - Square grid coordinates for kingdoms
//! - The fixed 48-tile catalog and its shuffled draw order
//! - Kingdom grids with placement legality and region detection
//! - The draft engine (offers and turn order)
//! - The turn state machine with full rule enforcement
//! - Region scoring with optional bonuses
//!
//! # Architecture
//!
//! The engine is a plain value with no I/O. A driver polls [`Game::state`],
//! asks whichever player it names for a [`GameMove`], and submits it with
//! [`Game::next_turn`] or [`Game::apply_move`]. Rendering, player strategy
//! and the driving loop live outside this crate.
//!
//! # Modules
//!
//! - [`point`]: Coordinates, directions and tile placements
//! - [`tile`]: Terrain, squares, tiles and the catalog
//! - [`kingdom`]: A player's grid
//! - [`draft`]: Offers and draft order
//! - [`game`]: Game state machine
//! - [`scoring`]: Score computation

pub mod actions;
pub mod draft;
pub mod game;
pub mod kingdom;
pub mod player;
pub mod point;
pub mod scoring;
pub mod tile;

// Re-export commonly used types
pub use actions::{GameEvent, GameMove};
pub use draft::{DraftEngine, OfferSlot};
pub use game::{
    kingdom_size_for, ConfigError, Game, GameConfig, GameError, GameJson, GameState,
    STANDARD_TURNS,
};
pub use kingdom::{Kingdom, KingdomJson, PlacementError, Region};
pub use player::{Player, PlayerColor};
pub use point::{Direction, Placement, Point};
pub use scoring::{score_kingdom, ScoreBreakdown, ScoringRules};
pub use tile::{all_tiles, shuffled_draw_order, Square, Terrain, Tile, TILE_COUNT};
