//! Tile offers and draft order.
//!
//! Each round reveals a batch of tiles (the next offer) that players claim in
//! turn order. Once every claim is made and every tile from the previous
//! batch (the current offer) has been delivered, the round rolls over: the
//! claimed batch becomes the current offer and the order in which players
//! claimed slots decides who drafts first next round.

use crate::game::GameError;
use crate::player::PlayerColor;
use crate::tile::Tile;
use serde::{Deserialize, Serialize};

/// A tile on offer, optionally claimed by a player
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OfferSlot {
    pub tile: Tile,
    /// Player who drafted this slot
    pub claimed_by: Option<PlayerColor>,
    /// Set once the claimant has placed or discarded the tile
    pub delivered: bool,
}

impl OfferSlot {
    /// An unclaimed slot
    pub fn new(tile: Tile) -> Self {
        Self {
            tile,
            claimed_by: None,
            delivered: false,
        }
    }

    pub fn is_claimed(&self) -> bool {
        self.claimed_by.is_some()
    }
}

/// Offer and turn order bookkeeping for one game
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DraftEngine {
    /// Tiles that will be revealed over the whole game, in draw order
    draw_pile: Vec<Tile>,
    /// Index of the next tile to reveal
    cursor: usize,
    /// Tiles revealed per round (one per player)
    batch_size: usize,
    /// Tiles drafted last round, being placed this round
    current_offer: Vec<OfferSlot>,
    /// Tiles being drafted this round
    next_offer: Vec<OfferSlot>,
    /// Draft order for this round
    turn_order: Vec<PlayerColor>,
    /// Round number (starts at 1)
    round: u32,
}

impl DraftEngine {
    /// Create the engine and reveal the first batch.
    ///
    /// Only the first `rounds * turn_order.len()` tiles of `draw_order` are
    /// used; the rest stay face down for the whole game.
    pub fn new(turn_order: Vec<PlayerColor>, mut draw_order: Vec<Tile>, rounds: usize) -> Self {
        let batch_size = turn_order.len();
        draw_order.truncate(rounds * batch_size);

        let mut engine = Self {
            draw_pile: draw_order,
            cursor: 0,
            batch_size,
            current_offer: Vec::new(),
            next_offer: Vec::new(),
            turn_order,
            round: 1,
        };
        engine.next_offer = engine.reveal_batch();
        engine
    }

    /// Reveal the next batch, or nothing once the pile runs short
    fn reveal_batch(&mut self) -> Vec<OfferSlot> {
        let end = self.cursor + self.batch_size;
        if self.batch_size == 0 || end > self.draw_pile.len() {
            return Vec::new();
        }
        let batch = self.draw_pile[self.cursor..end]
            .iter()
            .map(|&tile| OfferSlot::new(tile))
            .collect();
        self.cursor = end;
        batch
    }

    pub fn round(&self) -> u32 {
        self.round
    }

    /// Draft order for the current round
    pub fn turn_order(&self) -> &[PlayerColor] {
        &self.turn_order
    }

    /// Number of slots in each offer
    pub fn choice_depth(&self) -> usize {
        self.batch_size
    }

    pub fn current_offer(&self) -> &[OfferSlot] {
        &self.current_offer
    }

    pub fn next_offer(&self) -> &[OfferSlot] {
        &self.next_offer
    }

    /// Tiles still face down
    pub fn tiles_remaining(&self) -> usize {
        self.draw_pile.len() - self.cursor
    }

    /// Player who drafts next, if the draft is still running
    pub fn next_drafter(&self) -> Option<PlayerColor> {
        if self.next_offer.is_empty() {
            return None;
        }
        let claims = self.next_offer.iter().filter(|s| s.is_claimed()).count();
        self.turn_order.get(claims).copied()
    }

    /// Player who places next, in current offer slot order
    pub fn next_placer(&self) -> Option<PlayerColor> {
        self.current_offer
            .iter()
            .find(|s| !s.delivered)
            .and_then(|s| s.claimed_by)
    }

    /// Whether every slot of the next offer is claimed
    pub fn draft_complete(&self) -> bool {
        self.next_offer.iter().all(OfferSlot::is_claimed)
    }

    /// Whether the round has nothing left to do
    pub fn round_complete(&self) -> bool {
        self.draft_complete() && self.current_offer.iter().all(|s| s.delivered)
    }

    /// Whether every revealed tile has been drafted and delivered
    pub fn is_exhausted(&self) -> bool {
        self.round_complete() && self.next_offer.is_empty()
    }

    /// Tile a player drafted last round and still has to deliver
    pub fn held_tile(&self, player: PlayerColor) -> Option<Tile> {
        self.current_offer
            .iter()
            .find(|s| s.claimed_by == Some(player) && !s.delivered)
            .map(|s| s.tile)
    }

    /// Tile a player claimed this round
    pub fn reserved_tile(&self, player: PlayerColor) -> Option<Tile> {
        self.next_offer
            .iter()
            .find(|s| s.claimed_by == Some(player))
            .map(|s| s.tile)
    }

    /// Claim slot `index` of the next offer for `player`.
    ///
    /// Fails without changing anything unless it is `player`'s turn to draft
    /// and the slot exists and is free.
    pub fn draft(&mut self, player: PlayerColor, index: usize) -> Result<Tile, GameError> {
        match self.next_drafter() {
            None => return Err(GameError::InvalidPhase),
            Some(drafter) if drafter != player => return Err(GameError::NotYourTurn),
            Some(_) => {}
        }

        let slot = self
            .next_offer
            .get_mut(index)
            .ok_or(GameError::InvalidIndex(index))?;
        if slot.is_claimed() {
            return Err(GameError::AlreadyClaimed(index));
        }

        slot.claimed_by = Some(player);
        Ok(slot.tile)
    }

    /// Mark `player`'s held tile as delivered and return it
    pub fn deliver(&mut self, player: PlayerColor) -> Result<Tile, GameError> {
        let slot = self
            .current_offer
            .iter_mut()
            .find(|s| s.claimed_by == Some(player) && !s.delivered)
            .ok_or(GameError::NoHeldPatch)?;
        slot.delivered = true;
        Ok(slot.tile)
    }

    /// Start the next round if this one is complete and tiles remain.
    ///
    /// The new draft order lists last round's claimants by ascending slot
    /// index. Returns whether a new round started.
    pub fn rollover(&mut self) -> bool {
        if !self.round_complete() || self.next_offer.is_empty() {
            return false;
        }

        self.turn_order = self
            .next_offer
            .iter()
            .filter_map(|s| s.claimed_by)
            .collect();
        self.current_offer = std::mem::take(&mut self.next_offer);
        self.next_offer = self.reveal_batch();
        self.round += 1;
        true
    }
}
