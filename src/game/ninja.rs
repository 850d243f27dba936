//! Per-participant state.
//!
//! A `Ninja` is one seated player: token position, energy, cards and the
//! per-turn flags. The session owns them in a seat-indexed array; nothing
//! else holds a reference to one.

use serde::{Deserialize, Serialize};

use super::board::Tile;
use crate::cards::{CardId, Hand};
use crate::core::Seat;

/// Number of spinner channels the active player picks between.
pub const SPINNER_CHANNELS: u8 = 2;

/// External identity of a player, as known to the host.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(pub u64);

/// A player taking a seat at session start.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeatedUser {
    pub user_id: UserId,
    pub username: String,
    pub color: u32,
    /// Deck list to draw from. Empty means the whole catalog.
    #[serde(default)]
    pub deck: Vec<CardId>,
}

impl SeatedUser {
    pub fn new(user_id: u64, username: impl Into<String>) -> Self {
        Self {
            user_id: UserId(user_id),
            username: username.into(),
            color: 1,
            deck: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_color(mut self, color: u32) -> Self {
        self.color = color;
        self
    }

    #[must_use]
    pub fn with_deck(mut self, deck: Vec<CardId>) -> Self {
        self.deck = deck;
        self
    }
}

/// One participant's in-game state.
#[derive(Clone, Debug)]
pub struct Ninja {
    pub seat: Seat,
    pub user: SeatedUser,
    pub tile: Tile,
    pub energy: u8,
    pub hand: Hand,
    /// Spinner channel picked this turn.
    pub spinner: Option<u8>,
    pub ready: bool,
    /// Finishing position; 0 while still playing.
    pub rank: u8,
    /// Takes turns and joins battles.
    pub in_rotation: bool,
    pub connected: bool,
}

impl Ninja {
    pub fn new(seat: Seat, user: SeatedUser, tile: Tile, energy: u8, hand: Hand) -> Self {
        Self {
            seat,
            user,
            tile,
            energy,
            hand,
            spinner: None,
            ready: false,
            rank: 0,
            in_rotation: true,
            connected: true,
        }
    }

    #[must_use]
    pub fn is_ranked(&self) -> bool {
        self.rank != 0
    }

    #[must_use]
    pub fn has_selected_spinner(&self) -> bool {
        self.spinner.is_some()
    }

    /// Lose one energy point, never going below zero.
    pub fn lose_energy(&mut self) {
        self.energy = self.energy.saturating_sub(1);
    }

    /// Gain one energy point, capped at `max`.
    pub fn gain_energy(&mut self, max: u8) {
        self.energy = self.energy.saturating_add(1).min(max);
    }

    /// Clear the per-turn flags.
    pub fn reset_turn(&mut self) {
        self.spinner = None;
    }
}
