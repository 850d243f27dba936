//! Elimination and final ranking.
//!
//! `finish_position` starts at the participant count and counts down: the
//! first participant out takes the last place, and the one left standing
//! takes rank 1.

use serde::{Deserialize, Serialize};

use super::ninja::Ninja;
use crate::core::{Seat, SeatMap};

/// A rank handed out to a seat.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Finish {
    pub seat: Seat,
    pub rank: u8,
}

/// Finishing positions for a session. Rank 0 means still playing.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Podium {
    ranks: SeatMap<u8>,
    finish_position: u8,
}

impl Podium {
    #[must_use]
    pub fn new(seat_count: usize) -> Self {
        Self {
            ranks: SeatMap::with_value(seat_count, 0),
            finish_position: seat_count as u8,
        }
    }

    /// Rank the next participant to finish will receive.
    #[must_use]
    pub fn finish_position(&self) -> u8 {
        self.finish_position
    }

    #[must_use]
    pub fn rank(&self, seat: Seat) -> u8 {
        self.ranks.get(seat).copied().unwrap_or(0)
    }

    #[must_use]
    pub fn ranks(&self) -> &SeatMap<u8> {
        &self.ranks
    }

    /// Every seat has a rank.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.finish_position == 0
    }

    /// Give `seat` the current finish position and count down.
    ///
    /// Returns `None` if the seat already has a rank.
    pub fn assign(&mut self, seat: Seat) -> Option<u8> {
        if self.finish_position == 0 || self.rank(seat) != 0 {
            return None;
        }

        let rank = self.finish_position;
        self.ranks[seat] = rank;
        self.finish_position -= 1;
        Some(rank)
    }

    /// Rank every in-rotation participant out of energy, lowest seat first,
    /// then crown the survivor once only one is left. Ranked participants
    /// leave rotation.
    pub fn eliminate(&mut self, ninjas: &mut SeatMap<Ninja>) -> Vec<Finish> {
        let mut finished = Vec::new();

        for (seat, ninja) in ninjas.iter_mut() {
            if ninja.in_rotation && ninja.energy == 0 {
                if let Some(rank) = self.assign(seat) {
                    ninja.rank = rank;
                    ninja.in_rotation = false;
                    finished.push(Finish { seat, rank });
                }
            }
        }

        finished.extend(self.crown_survivor(ninjas));
        finished
    }

    /// Once `finish_position` is down to 1, rank the last unranked
    /// participant first regardless of energy.
    pub fn crown_survivor(&mut self, ninjas: &mut SeatMap<Ninja>) -> Option<Finish> {
        if self.finish_position != 1 {
            return None;
        }

        let seat = ninjas
            .iter()
            .find(|(seat, _)| self.rank(*seat) == 0)
            .map(|(seat, _)| seat)?;

        let rank = self.assign(seat)?;
        let ninja = &mut ninjas[seat];
        ninja.rank = rank;
        ninja.in_rotation = false;
        Some(Finish { seat, rank })
    }
}
