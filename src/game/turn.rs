//! Turn order and the spinner.
//!
//! Rotation walks the fixed seat table and skips seats that have left
//! rotation, so a departure never shifts who plays next.

use serde::{Deserialize, Serialize};

use super::board::Tile;
use super::ninja::Ninja;
use crate::core::{GameRng, Seat, SeatMap};

/// One turn's spin and the two tiles it can reach.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpinRoll {
    pub amount: u8,
    #[serde(rename = "clockwiseTile")]
    pub clockwise: Tile,
    #[serde(rename = "counterClockwiseTile")]
    pub counter_clockwise: Tile,
}

impl SpinRoll {
    /// Candidate tiles for a spin of `amount` starting from `from`.
    #[must_use]
    pub fn from_tile(from: Tile, amount: u8) -> Self {
        Self {
            amount,
            clockwise: from.offset(i32::from(amount)),
            counter_clockwise: from.offset(-i32::from(amount)),
        }
    }

    #[must_use]
    pub fn candidates(&self) -> [Tile; 2] {
        [self.clockwise, self.counter_clockwise]
    }

    #[must_use]
    pub fn contains(&self, tile: Tile) -> bool {
        self.clockwise == tile || self.counter_clockwise == tile
    }
}

/// Tracks whose turn it is and the spin for that turn.
#[derive(Clone, Debug, Default)]
pub struct TurnScheduler {
    current: Option<Seat>,
    spin: Option<SpinRoll>,
    round: u32,
}

impl TurnScheduler {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Seat holding the turn.
    #[must_use]
    pub fn current(&self) -> Option<Seat> {
        self.current
    }

    /// Spin for the current turn.
    #[must_use]
    pub fn spin(&self) -> Option<SpinRoll> {
        self.spin
    }

    /// Number of rounds started so far.
    #[must_use]
    pub fn round(&self) -> u32 {
        self.round
    }

    /// First in-rotation seat after `after`, wrapping. With `None`, the
    /// lowest in-rotation seat.
    #[must_use]
    pub fn next_seat(ninjas: &SeatMap<Ninja>, after: Option<Seat>) -> Option<Seat> {
        let count = ninjas.seat_count();
        let start = after.map_or(0, |seat| seat.index() + 1);

        (0..count)
            .map(|offset| Seat::new(((start + offset) % count) as u8))
            .find(|&seat| ninjas[seat].in_rotation)
    }

    /// Pass the turn to the next in-rotation seat and spin for it.
    ///
    /// Returns the new active seat, or `None` when nobody is left.
    pub fn advance_turn(&mut self, ninjas: &mut SeatMap<Ninja>, rng: &mut GameRng) -> Option<Seat> {
        if let Some(outgoing) = self.current {
            ninjas[outgoing].reset_turn();
        }

        let Some(next) = Self::next_seat(ninjas, self.current) else {
            self.spin = None;
            return None;
        };

        let amount = rng.spin();
        self.current = Some(next);
        self.spin = Some(SpinRoll::from_tile(ninjas[next].tile, amount));
        self.round += 1;

        Some(next)
    }

    /// Drop the pending spin. The last active seat is kept so rotation
    /// resumes after it.
    pub fn clear(&mut self) {
        self.spin = None;
    }
}
