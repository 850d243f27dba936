//! Session configuration.
//!
//! Hosts configure a session at startup through `SessionConfig`, either by
//! deserializing it (every field has a default) or with the builder
//! methods. The defaults reproduce the stock game: six energy, five cards,
//! a 22 second idle timeout and the standard board.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::error::SessionError;
use crate::game::board::Board;

/// Fewest seats a session can run with.
pub const MIN_SEATS: usize = 2;

/// Most seats a session can run with.
pub const MAX_SEATS: usize = 4;

/// Configuration for one game session.
///
/// ## Example
///
/// ```
/// use waddle_fire::core::SessionConfig;
///
/// let config = SessionConfig::new()
///     .starting_energy(3)
///     .idle_timeout_secs(10)
///     .seed(42);
///
/// assert_eq!(config.starting_energy, 3);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Energy every participant starts with.
    pub starting_energy: u8,

    /// Ceiling for energy gained by winning duels.
    pub max_energy: u8,

    /// Target number of dealt cards per participant.
    pub hand_size: usize,

    /// Idle time before autoplay acts for a participant.
    pub idle_timeout_secs: u64,

    /// Minimum seated participants.
    pub min_players: usize,

    /// Maximum seated participants.
    pub max_players: usize,

    /// Tile layout.
    pub board: Board,

    /// RNG seed. `None` seeds from entropy.
    pub seed: Option<u64>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            starting_energy: 6,
            max_energy: 6,
            hand_size: 5,
            idle_timeout_secs: 22,
            min_players: MIN_SEATS,
            max_players: MAX_SEATS,
            board: Board::standard(),
            seed: None,
        }
    }
}

impl SessionConfig {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn starting_energy(mut self, energy: u8) -> Self {
        self.starting_energy = energy;
        self
    }

    #[must_use]
    pub fn max_energy(mut self, energy: u8) -> Self {
        self.max_energy = energy;
        self
    }

    #[must_use]
    pub fn hand_size(mut self, size: usize) -> Self {
        self.hand_size = size;
        self
    }

    #[must_use]
    pub fn idle_timeout_secs(mut self, secs: u64) -> Self {
        self.idle_timeout_secs = secs;
        self
    }

    #[must_use]
    pub fn board(mut self, board: Board) -> Self {
        self.board = board;
        self
    }

    #[must_use]
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Idle timeout as a `Duration`.
    #[must_use]
    pub fn idle_timeout(&self) -> Duration {
        Duration::from_secs(self.idle_timeout_secs)
    }

    /// Check the configuration is playable.
    pub fn validate(&self) -> Result<(), SessionError> {
        if self.starting_energy == 0 || self.starting_energy > self.max_energy {
            return Err(SessionError::InvalidConfig(format!(
                "starting energy {} must be in 1..={}",
                self.starting_energy, self.max_energy
            )));
        }
        if self.hand_size == 0 {
            return Err(SessionError::InvalidConfig(
                "hand size must be at least 1".to_string(),
            ));
        }
        if self.min_players < MIN_SEATS
            || self.max_players > MAX_SEATS
            || self.min_players > self.max_players
        {
            return Err(SessionError::InvalidConfig(format!(
                "player range {}..={} is not within {}..={}",
                self.min_players, self.max_players, MIN_SEATS, MAX_SEATS
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::board::TileKind;

    #[test]
    fn test_defaults() {
        let config = SessionConfig::default();

        assert_eq!(config.starting_energy, 6);
        assert_eq!(config.hand_size, 5);
        assert_eq!(config.idle_timeout(), Duration::from_secs(22));
        assert_eq!(config.board, Board::standard());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: SessionConfig =
            serde_json::from_str(r#"{"idle_timeout_secs": 5, "seed": 9}"#).unwrap();

        assert_eq!(config.idle_timeout_secs, 5);
        assert_eq!(config.seed, Some(9));
        assert_eq!(config.max_energy, 6);
    }

    #[test]
    fn test_builder() {
        let config = SessionConfig::new()
            .hand_size(3)
            .max_energy(8)
            .board(Board::uniform(TileKind::Blank));

        assert_eq!(config.hand_size, 3);
        assert_eq!(config.max_energy, 8);
        assert_eq!(config.board.kind(crate::game::board::Tile(3)), TileKind::Blank);
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        assert!(SessionConfig::new().starting_energy(0).validate().is_err());
        assert!(SessionConfig::new().starting_energy(7).validate().is_err());
        assert!(SessionConfig::new().hand_size(0).validate().is_err());

        let mut config = SessionConfig::new();
        config.min_players = 1;
        assert!(config.validate().is_err());

        let mut config = SessionConfig::new();
        config.max_players = 5;
        assert!(matches!(config.validate(), Err(SessionError::InvalidConfig(_))));

        let mut config = SessionConfig::new();
        config.max_players = 256;
        assert!(config.validate().is_err());

        let mut config = SessionConfig::new();
        config.min_players = 4;
        config.max_players = 3;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_accepts_full_seat_range() {
        let mut config = SessionConfig::new();
        config.min_players = MIN_SEATS;
        config.max_players = MAX_SEATS;
        assert!(config.validate().is_ok());

        let config = SessionConfig::new().max_energy(u8::MAX).starting_energy(u8::MAX);
        assert!(config.validate().is_ok());
    }
}
