//! The waddle game: board, participants, battles and the session that
//! drives them.
//!
//! ## Key Types
//!
//! - `GameSession`: Owns one game and applies its serialized event stream
//! - `SessionHost`: Seat lookup, event delivery and timer scheduling
//! - `BattleEngine`: Battle phase state machine and combat resolution
//! - `TurnScheduler`: Rotation and the spinner
//! - `Podium`: Elimination and final ranks
//! - `AutoplayTimer`: Generation-tagged idle timeouts
//! - `ActionTable`: Decodes raw frames into `PlayerAction`s

pub mod action;
pub mod autoplay;
pub mod battle;
pub mod board;
pub mod event;
pub mod host;
pub mod ninja;
pub mod podium;
pub mod session;
pub mod turn;

pub use action::{ActionTable, DispatchMiss};
pub use autoplay::{AutoplayTimer, ScheduledTimeout, TimeoutKind, TimerToken};
pub use battle::{
    resolve_duel, resolve_multi_party, Battle, BattleEngine, BattleKind, BattlePhase, CombatResult,
    Combatants, Judgment, Outcome,
};
pub use board::{Board, Tile, TileKind, BOARD_SIZE};
pub use event::{GameEvent, ParticipantInfo, PlayerAction, SessionEvent};
pub use host::{Recipient, RecordingHost, SessionHost};
pub use ninja::{Ninja, SeatedUser, UserId, SPINNER_CHANNELS};
pub use podium::{Finish, Podium};
pub use session::{GameSession, SessionStatus};
pub use turn::{SpinRoll, TurnScheduler};
