//! Core engine types: seats, RNG, configuration, errors.

pub mod config;
pub mod error;
pub mod rng;
pub mod seat;

pub use config::{SessionConfig, MAX_SEATS, MIN_SEATS};
pub use error::SessionError;
pub use rng::GameRng;
pub use seat::{Seat, SeatMap};
