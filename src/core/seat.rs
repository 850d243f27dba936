//! Seat identification and per-seat data storage.
//!
//! ## Seat
//!
//! Turn-order slot of a participant, stable for the whole session.
//!
//! ## SeatMap
//!
//! Per-seat storage backed by `Vec` for O(1) access. Departed or
//! eliminated seats keep their slot; rotation is tracked separately.

use serde::{Deserialize, Serialize};
use std::ops::{Index, IndexMut};

/// Seat index. The first seat is `Seat(0)`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Seat(pub u8);

impl Seat {
    /// Create a new seat.
    #[must_use]
    pub const fn new(index: u8) -> Self {
        Self(index)
    }

    /// Get the raw seat index (0-based).
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    /// Iterate over all seats of a session with `seat_count` seats.
    ///
    /// ```
    /// use waddle_fire::core::Seat;
    ///
    /// let seats: Vec<_> = Seat::all(3).collect();
    /// assert_eq!(seats, vec![Seat::new(0), Seat::new(1), Seat::new(2)]);
    /// ```
    pub fn all(seat_count: usize) -> impl Iterator<Item = Seat> {
        (0..seat_count as u8).map(Seat)
    }
}

impl std::fmt::Display for Seat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Seat {}", self.0)
    }
}

/// Per-seat data storage with O(1) access.
///
/// ## Example
///
/// ```
/// use waddle_fire::core::{Seat, SeatMap};
///
/// let mut energy: SeatMap<u8> = SeatMap::with_value(4, 6);
/// energy[Seat::new(1)] -= 1;
///
/// assert_eq!(energy[Seat::new(0)], 6);
/// assert_eq!(energy[Seat::new(1)], 5);
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SeatMap<T> {
    data: Vec<T>,
}

impl<T> SeatMap<T> {
    /// Create a new SeatMap with values from a factory function.
    pub fn new(seat_count: usize, factory: impl FnMut(Seat) -> T) -> Self {
        assert!(seat_count <= u8::MAX as usize, "At most 255 seats supported");

        let data = Seat::all(seat_count).map(factory).collect();
        Self { data }
    }

    /// Create a new SeatMap with all entries set to the same value.
    pub fn with_value(seat_count: usize, value: T) -> Self
    where
        T: Clone,
    {
        Self::new(seat_count, |_| value.clone())
    }

    /// Build from an existing vector, one entry per seat in order.
    pub fn from_vec(data: Vec<T>) -> Self {
        assert!(data.len() <= u8::MAX as usize, "At most 255 seats supported");
        Self { data }
    }

    /// Get the number of seats.
    #[must_use]
    pub fn seat_count(&self) -> usize {
        self.data.len()
    }

    /// Get a seat's entry, or `None` when the seat is out of range.
    #[must_use]
    pub fn get(&self, seat: Seat) -> Option<&T> {
        self.data.get(seat.index())
    }

    /// Get a mutable reference to a seat's entry.
    pub fn get_mut(&mut self, seat: Seat) -> Option<&mut T> {
        self.data.get_mut(seat.index())
    }

    /// Iterate over (Seat, &T) pairs.
    pub fn iter(&self) -> impl Iterator<Item = (Seat, &T)> {
        self.data
            .iter()
            .enumerate()
            .map(|(i, v)| (Seat(i as u8), v))
    }

    /// Iterate over (Seat, &mut T) pairs.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = (Seat, &mut T)> {
        self.data
            .iter_mut()
            .enumerate()
            .map(|(i, v)| (Seat(i as u8), v))
    }

    /// Iterate over the values in seat order.
    pub fn values(&self) -> impl Iterator<Item = &T> {
        self.data.iter()
    }

    /// Iterate over all seats.
    pub fn seats(&self) -> impl Iterator<Item = Seat> {
        Seat::all(self.data.len())
    }
}

impl<T> Index<Seat> for SeatMap<T> {
    type Output = T;

    fn index(&self, seat: Seat) -> &Self::Output {
        &self.data[seat.index()]
    }
}

impl<T> IndexMut<Seat> for SeatMap<T> {
    fn index_mut(&mut self, seat: Seat) -> &mut Self::Output {
        &mut self.data[seat.index()]
    }
}
