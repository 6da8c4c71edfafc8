//! Core game state machine.
//!
//! This module contains the `Game` struct, its configuration, and the turn
//! sequencing that ties the draft engine to the players' kingdoms.

use crate::actions::{GameEvent, GameMove};
use crate::draft::{DraftEngine, OfferSlot};
use crate::kingdom::{Kingdom, KingdomJson, PlacementError};
use crate::player::{Player, PlayerColor};
use crate::point::Placement;
use crate::scoring::{score_kingdom, ScoreBreakdown, ScoringRules};
use crate::tile::{self, Tile, TILE_COUNT};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use thiserror::Error;
use tracing::{debug, info, trace};

/// Tiles each player places in a standard game
pub const STANDARD_TURNS: u32 = 12;

/// Kingdom side length for two players
pub const DUEL_KINGDOM_SIZE: u8 = 7;

/// Kingdom side length for three or four players
pub const STANDARD_KINGDOM_SIZE: u8 = 5;

/// Kingdom size for a player count
pub fn kingdom_size_for(player_count: usize) -> u8 {
    if player_count == 2 {
        DUEL_KINGDOM_SIZE
    } else {
        STANDARD_KINGDOM_SIZE
    }
}

/// Which step the game is waiting for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameState {
    /// Created, first offer not yet open
    Start,
    /// The given player must draft from the next offer
    MapNextPatch(PlayerColor),
    /// The given player must place (or discard) their held tile
    PlaceCurrentPatch(PlayerColor),
    /// Game is over
    End,
}

impl GameState {
    /// The player the game is waiting on, if any
    pub fn current_player(&self) -> Option<PlayerColor> {
        match self {
            GameState::MapNextPatch(color) | GameState::PlaceCurrentPatch(color) => Some(*color),
            GameState::Start | GameState::End => None,
        }
    }
}

/// Errors that can occur when applying moves.
///
/// None of them are fatal: the game is left untouched and the same player
/// may try again.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
pub enum GameError {
    #[error("Not your turn")]
    NotYourTurn,

    #[error("Invalid move for current phase")]
    InvalidPhase,

    #[error("No offer slot at index {0}")]
    InvalidIndex(usize),

    #[error("Offer slot {0} is already claimed")]
    AlreadyClaimed(usize),

    #[error("No tile waiting to be placed")]
    NoHeldPatch,

    #[error("Illegal placement: {0}")]
    IllegalPlacement(#[from] PlacementError),

    #[error("Tile can still be placed, so it cannot be discarded")]
    PlacementAvailable,

    #[error("Unknown player {0}")]
    UnknownPlayer(PlayerColor),

    #[error("Game is over")]
    GameOver,
}

/// Errors in a game's setup
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
pub enum ConfigError {
    #[error("Must have 2-4 players, got {0}")]
    PlayerCount(usize),

    #[error("Player {0} is seated twice")]
    DuplicatePlayer(PlayerColor),

    #[error("Kingdom size must be 5 or 7, got {0}")]
    InvalidSize(u8),

    #[error("Kingdom size {actual} does not suit this player count (expected {expected})")]
    SizeMismatch { expected: u8, actual: u8 },

    #[error("Must play at least one turn")]
    InvalidTurns,

    #[error("Game needs {needed} tiles but only {available} are available")]
    NotEnoughTiles { needed: usize, available: usize },
}

/// How a game is set up
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameConfig {
    /// Kingdom side length (5 or 7)
    pub size: u8,
    /// Seated players; also the first round's draft order
    pub players: Vec<PlayerColor>,
    /// Tiles each player drafts (and places)
    pub turns: u32,
    /// Optional bonus scoring
    #[serde(default)]
    pub scoring: ScoringRules,
}

impl GameConfig {
    /// Create a config with base scoring
    pub fn new(size: u8, players: Vec<PlayerColor>, turns: u32) -> Self {
        Self {
            size,
            players,
            turns,
            scoring: ScoringRules::BASE,
        }
    }

    /// Standard setup: size from player count, 12 turns
    pub fn standard(players: Vec<PlayerColor>) -> Self {
        let size = kingdom_size_for(players.len());
        Self::new(size, players, STANDARD_TURNS)
    }

    pub fn with_scoring(mut self, scoring: ScoringRules) -> Self {
        self.scoring = scoring;
        self
    }

    /// Tiles drawn over the whole game
    pub fn tiles_needed(&self) -> usize {
        self.turns as usize * self.players.len()
    }

    /// Check the setup against the rules
    pub fn validate(&self) -> Result<(), ConfigError> {
        let count = self.players.len();
        if !(2..=4).contains(&count) {
            return Err(ConfigError::PlayerCount(count));
        }

        let mut seen = HashSet::new();
        for &color in &self.players {
            if !seen.insert(color) {
                return Err(ConfigError::DuplicatePlayer(color));
            }
        }

        if self.size != STANDARD_KINGDOM_SIZE && self.size != DUEL_KINGDOM_SIZE {
            return Err(ConfigError::InvalidSize(self.size));
        }
        let expected = kingdom_size_for(count);
        if self.size != expected {
            return Err(ConfigError::SizeMismatch {
                expected,
                actual: self.size,
            });
        }

        if self.turns == 0 {
            return Err(ConfigError::InvalidTurns);
        }
        if self.tiles_needed() > TILE_COUNT {
            return Err(ConfigError::NotEnoughTiles {
                needed: self.tiles_needed(),
                available: TILE_COUNT,
            });
        }

        Ok(())
    }
}

/// The complete game
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Game {
    config: GameConfig,
    /// Players in seating order
    players: Vec<Player>,
    draft: DraftEngine,
    state: GameState,
}

impl Game {
    /// Create a game with a freshly shuffled catalog
    pub fn new(size: u8, players: Vec<PlayerColor>, turns: u32) -> Result<Self, ConfigError> {
        Self::from_config(GameConfig::new(size, players, turns))
    }

    /// Create a game from a config with a freshly shuffled catalog
    pub fn from_config(config: GameConfig) -> Result<Self, ConfigError> {
        let mut rng = rand::thread_rng();
        Self::with_rng(config, &mut rng)
    }

    /// Create a game shuffling with a provided RNG.
    /// This allows for deterministic games when needed
    pub fn with_rng<R: Rng + ?Sized>(config: GameConfig, rng: &mut R) -> Result<Self, ConfigError> {
        Self::with_draw_order(config, tile::shuffled_draw_order(rng))
    }

    /// Create a game that reveals tiles in exactly this order
    pub fn with_draw_order(config: GameConfig, draw_order: Vec<Tile>) -> Result<Self, ConfigError> {
        config.validate()?;
        if draw_order.len() < config.tiles_needed() {
            return Err(ConfigError::NotEnoughTiles {
                needed: config.tiles_needed(),
                available: draw_order.len(),
            });
        }

        let players = config
            .players
            .iter()
            .map(|&color| Player::new(color, config.size))
            .collect();
        let draft = DraftEngine::new(config.players.clone(), draw_order, config.turns as usize);

        debug!(
            players = config.players.len(),
            size = config.size,
            turns = config.turns,
            "game created"
        );

        Ok(Self {
            config,
            players,
            draft,
            state: GameState::Start,
        })
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn state(&self) -> GameState {
        self.state
    }

    /// Check if the game is finished
    pub fn is_finished(&self) -> bool {
        self.state == GameState::End
    }

    /// Get the number of players
    pub fn player_count(&self) -> usize {
        self.players.len()
    }

    /// All players in seating order
    pub fn players(&self) -> &[Player] {
        &self.players
    }

    /// Get a player by color
    pub fn player(&self, color: PlayerColor) -> Option<&Player> {
        self.players.iter().find(|p| p.color == color)
    }

    fn player_mut(&mut self, color: PlayerColor) -> Result<&mut Player, GameError> {
        self.players
            .iter_mut()
            .find(|p| p.color == color)
            .ok_or(GameError::UnknownPlayer(color))
    }

    /// Read-only view of a player's kingdom
    pub fn kingdom(&self, color: PlayerColor) -> Option<&Kingdom> {
        self.player(color).map(|p| &p.kingdom)
    }

    /// Round number (starts at 1)
    pub fn round(&self) -> u32 {
        self.draft.round()
    }

    /// Draft order for the current round
    pub fn turn_order(&self) -> &[PlayerColor] {
        self.draft.turn_order()
    }

    /// Number of slots in each offer
    pub fn choice_depth(&self) -> usize {
        self.draft.choice_depth()
    }

    /// Tiles open for drafting this round
    pub fn next_patches(&self) -> Vec<Tile> {
        self.draft.next_offer().iter().map(|s| s.tile).collect()
    }

    /// Tiles drafted last round, being placed this round
    pub fn current_patches(&self) -> Vec<Tile> {
        self.draft.current_offer().iter().map(|s| s.tile).collect()
    }

    pub fn next_offer(&self) -> &[OfferSlot] {
        self.draft.next_offer()
    }

    pub fn current_offer(&self) -> &[OfferSlot] {
        self.draft.current_offer()
    }

    /// Tile a player has to place this round
    pub fn held_patch(&self, color: PlayerColor) -> Option<Tile> {
        self.draft.held_tile(color)
    }

    // ==================== Scoring ====================

    /// Score breakdown for one player
    pub fn score_breakdown(&self, color: PlayerColor) -> Option<ScoreBreakdown> {
        self.kingdom(color)
            .map(|kingdom| score_kingdom(kingdom, &self.config.scoring))
    }

    /// Every player's score. Meaningful once the game is over, but can be
    /// asked at any time.
    pub fn scores(&self) -> HashMap<PlayerColor, u32> {
        self.players
            .iter()
            .map(|p| (p.color, score_kingdom(&p.kingdom, &self.config.scoring).total()))
            .collect()
    }

    /// Scores in seating order
    fn ordered_scores(&self) -> Vec<(PlayerColor, u32)> {
        self.players
            .iter()
            .map(|p| (p.color, score_kingdom(&p.kingdom, &self.config.scoring).total()))
            .collect()
    }

    /// Players sharing the highest score
    pub fn leaders(&self) -> Vec<PlayerColor> {
        let scores = self.ordered_scores();
        let best = scores.iter().map(|(_, s)| *s).max().unwrap_or(0);
        scores
            .into_iter()
            .filter(|(_, s)| *s == best)
            .map(|(color, _)| color)
            .collect()
    }

    // ==================== Moves ====================

    /// Get all moves the current state accepts
    pub fn valid_moves(&self) -> Vec<GameMove> {
        match self.state {
            GameState::Start | GameState::End => vec![GameMove::None],

            GameState::MapNextPatch(_) => self
                .draft
                .next_offer()
                .iter()
                .enumerate()
                .filter(|(_, slot)| !slot.is_claimed())
                .map(|(index, _)| GameMove::MapNextPatch(index))
                .collect(),

            GameState::PlaceCurrentPatch(color) => {
                let (Some(tile), Some(kingdom)) = (self.draft.held_tile(color), self.kingdom(color))
                else {
                    return Vec::new();
                };
                let moves: Vec<GameMove> = kingdom
                    .legal_placements(&tile)
                    .into_iter()
                    .map(GameMove::PlaceCurrentPatch)
                    .collect();
                if moves.is_empty() {
                    vec![GameMove::DiscardCurrentPatch]
                } else {
                    moves
                }
            }
        }
    }

    /// Open the first offer. Same as submitting `GameMove::None` in `Start`.
    pub fn start(&mut self) -> Result<Vec<GameEvent>, GameError> {
        if self.state != GameState::Start {
            return Err(GameError::InvalidPhase);
        }
        self.apply_move(GameMove::None)
    }

    /// Submit a move for whoever the game is waiting on.
    ///
    /// Returns `true` if the move was accepted. A rejected move changes
    /// nothing.
    pub fn next_turn(&mut self, game_move: GameMove) -> bool {
        self.apply_move(game_move).is_ok()
    }

    /// Submit a move for whoever the game is waiting on
    pub fn apply_move(&mut self, game_move: GameMove) -> Result<Vec<GameEvent>, GameError> {
        let player = self.state.current_player();
        let result = self.dispatch(player, game_move);
        self.log_result(player, game_move, &result);
        result
    }

    /// Submit a move on behalf of a specific player
    pub fn apply_action(
        &mut self,
        player: PlayerColor,
        game_move: GameMove,
    ) -> Result<Vec<GameEvent>, GameError> {
        let result = if self.player(player).is_none() {
            Err(GameError::UnknownPlayer(player))
        } else {
            self.dispatch(Some(player), game_move)
        };
        self.log_result(Some(player), game_move, &result);
        result
    }

    fn log_result(
        &self,
        player: Option<PlayerColor>,
        game_move: GameMove,
        result: &Result<Vec<GameEvent>, GameError>,
    ) {
        match result {
            Ok(events) => debug!(?player, ?game_move, events = events.len(), "move accepted"),
            Err(err) => trace!(?player, ?game_move, %err, "move rejected"),
        }
    }

    fn dispatch(
        &mut self,
        player: Option<PlayerColor>,
        game_move: GameMove,
    ) -> Result<Vec<GameEvent>, GameError> {
        match (self.state, game_move) {
            (GameState::End, GameMove::None) => Ok(Vec::new()),
            (GameState::End, _) => Err(GameError::GameOver),

            (GameState::Start, GameMove::None) => {
                let mut events = vec![GameEvent::GameStarted {
                    turn_order: self.draft.turn_order().to_vec(),
                }];
                events.extend(self.advance());
                Ok(events)
            }
            (GameState::Start, _) => Err(GameError::InvalidPhase),

            (GameState::MapNextPatch(color), GameMove::MapNextPatch(index)) => {
                Self::check_turn(player, color)?;
                self.draft_patch(color, index)
            }

            (GameState::PlaceCurrentPatch(color), GameMove::PlaceCurrentPatch(placement)) => {
                Self::check_turn(player, color)?;
                self.place_patch(color, placement)
            }

            (GameState::PlaceCurrentPatch(color), GameMove::DiscardCurrentPatch) => {
                Self::check_turn(player, color)?;
                self.discard_patch(color)
            }

            (GameState::MapNextPatch(color), _) | (GameState::PlaceCurrentPatch(color), _) => {
                Self::check_turn(player, color)?;
                Err(GameError::InvalidPhase)
            }
        }
    }

    fn check_turn(player: Option<PlayerColor>, expected: PlayerColor) -> Result<(), GameError> {
        match player {
            Some(p) if p != expected => Err(GameError::NotYourTurn),
            _ => Ok(()),
        }
    }

    fn draft_patch(&mut self, color: PlayerColor, index: usize) -> Result<Vec<GameEvent>, GameError> {
        let tile = self.draft.draft(color, index)?;

        let mut events = vec![GameEvent::PatchDrafted {
            player: color,
            index,
            tile,
        }];
        events.extend(self.advance());
        Ok(events)
    }

    fn place_patch(
        &mut self,
        color: PlayerColor,
        placement: Placement,
    ) -> Result<Vec<GameEvent>, GameError> {
        let tile = self.draft.held_tile(color).ok_or(GameError::NoHeldPatch)?;

        // Validate everything before touching any state
        self.player(color)
            .ok_or(GameError::UnknownPlayer(color))?
            .kingdom
            .check_placement(&tile, placement)?;

        self.draft.deliver(color)?;
        let player = self.player_mut(color)?;
        player.kingdom.place(&tile, placement)?;
        player.tiles_placed += 1;

        let mut events = vec![GameEvent::PatchPlaced {
            player: color,
            tile,
            placement,
        }];
        events.extend(self.advance());
        Ok(events)
    }

    fn discard_patch(&mut self, color: PlayerColor) -> Result<Vec<GameEvent>, GameError> {
        let tile = self.draft.held_tile(color).ok_or(GameError::NoHeldPatch)?;
        let kingdom = self.kingdom(color).ok_or(GameError::UnknownPlayer(color))?;
        if kingdom.has_legal_placement(&tile) {
            return Err(GameError::PlacementAvailable);
        }

        self.draft.deliver(color)?;
        self.player_mut(color)?.tiles_discarded += 1;

        let mut events = vec![GameEvent::PatchDiscarded {
            player: color,
            tile,
        }];
        events.extend(self.advance());
        Ok(events)
    }

    /// Move to whatever the game needs next: another draft, another
    /// placement, a new round, or the end.
    fn advance(&mut self) -> Vec<GameEvent> {
        let mut events = Vec::new();

        loop {
            if let Some(next) = self.draft.next_drafter() {
                self.state = GameState::MapNextPatch(next);
                break;
            }
            if let Some(next) = self.draft.next_placer() {
                self.state = GameState::PlaceCurrentPatch(next);
                break;
            }
            if self.draft.rollover() {
                debug!(round = self.draft.round(), turn_order = ?self.draft.turn_order(), "round started");
                events.push(GameEvent::RoundStarted {
                    round: self.draft.round(),
                    turn_order: self.draft.turn_order().to_vec(),
                });
                continue;
            }

            self.state = GameState::End;
            let scores = self.ordered_scores();
            info!(rounds = self.draft.round(), ?scores, "game over");
            events.push(GameEvent::GameEnded { scores });
            break;
        }

        events
    }

    /// Convert to a JSON-friendly representation for renderers
    pub fn to_json_friendly(&self) -> GameJson {
        GameJson {
            state: self.state,
            round: self.round(),
            turn_order: self.turn_order().to_vec(),
            current_offer: self.current_offer().to_vec(),
            next_offer: self.next_offer().to_vec(),
            kingdoms: self
                .players
                .iter()
                .map(|p| p.kingdom.to_json_friendly())
                .collect(),
            scores: self.ordered_scores(),
        }
    }
}

/// JSON-friendly game snapshot
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameJson {
    pub state: GameState,
    pub round: u32,
    pub turn_order: Vec<PlayerColor>,
    pub current_offer: Vec<OfferSlot>,
    pub next_offer: Vec<OfferSlot>,
    pub kingdoms: Vec<KingdomJson>,
    pub scores: Vec<(PlayerColor, u32)>,
}
