//! # waddle-fire
//!
//! Session engine for a turn-based elemental board-battle minigame for two
//! to four players.
//!
//! Participants take turns spinning and moving around a 16-tile ring.
//! Where they land decides what happens: an elemental battle for everyone,
//! a duel against a chosen opponent, or nothing. Every battle is fought
//! with one card from a dealt hand. Losing costs energy; running out of
//! energy ends a participant's game, and the last one standing wins.
//!
//! ## Design Principles
//!
//! 1. **One event stream per session**: player actions, timer firings and
//!    departures are all `SessionEvent`s applied one at a time, so session
//!    state never needs a lock.
//!
//! 2. **Host owns the outside world**: sockets, users and clocks live
//!    behind `SessionHost`. The session only asks it to deliver events and
//!    schedule timeouts.
//!
//! 3. **Deterministic by seed**: every random decision goes through
//!    `GameRng`, so a seeded session replays exactly.
//!
//! ## Modules
//!
//! - `core`: Seats, RNG, configuration, errors
//! - `cards`: Card definitions, the shared catalog, hands
//! - `game`: Board, battles, turn order, podium, autoplay, the session

pub mod cards;
pub mod core;
pub mod game;

// Re-export commonly used types
pub use crate::core::{GameRng, Seat, SeatMap, SessionConfig, SessionError};

pub use crate::cards::{Card, CardCatalog, CardId, CardRegistry, CardStats, CatalogError, Element, Hand};

pub use crate::game::{
    ActionTable, Battle, BattleEngine, BattleKind, BattlePhase, Board, CombatResult, GameEvent,
    GameSession, Ninja, Outcome, PlayerAction, Podium, Recipient, RecordingHost, SeatedUser,
    SessionEvent, SessionHost, SessionStatus, SpinRoll, Tile, TileKind, TimeoutKind, TimerToken,
    UserId,
};
