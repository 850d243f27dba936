//! The host a session runs inside.
//!
//! A session does not own sockets, users or timers. The surrounding
//! lobby/room layer implements `SessionHost` and the session calls back
//! into it to look up seats, deliver events and schedule idle timeouts.

use rustc_hash::FxHashMap;

use super::autoplay::{ScheduledTimeout, TimerToken};
use super::event::GameEvent;
use super::ninja::UserId;
use crate::core::Seat;

/// Capabilities a session needs from its host.
pub trait SessionHost {
    /// Seat held by `user`, if seated in this session.
    fn seat_of(&self, user: UserId) -> Option<Seat>;

    /// Deliver an event to one seat.
    fn send(&mut self, seat: Seat, event: &GameEvent);

    /// Deliver an event to every seat.
    fn broadcast(&mut self, event: &GameEvent);

    /// Feed `timeout.token` back as a `SessionEvent::Timeout` after
    /// `timeout.after`.
    fn schedule_timeout(&mut self, timeout: ScheduledTimeout);

    /// A scheduled timeout is no longer wanted. Delivering it anyway is
    /// harmless; the session drops stale tokens.
    fn cancel_timeout(&mut self, _token: TimerToken) {}
}

/// Who an outbound event was addressed to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Recipient {
    All,
    Seat(Seat),
}

/// In-memory host that records everything the session emits.
///
/// Useful for tests and for hosts that drain events in batches.
#[derive(Clone, Debug, Default)]
pub struct RecordingHost {
    seats: FxHashMap<UserId, Seat>,
    pub outbox: Vec<(Recipient, GameEvent)>,
    pub scheduled: Vec<ScheduledTimeout>,
    pub cancelled: Vec<TimerToken>,
}

impl RecordingHost {
    /// Seat users in order: the first user takes seat 0.
    pub fn new(users: impl IntoIterator<Item = UserId>) -> Self {
        let seats = users
            .into_iter()
            .enumerate()
            .map(|(i, user)| (user, Seat::new(i as u8)))
            .collect();

        Self {
            seats,
            ..Self::default()
        }
    }

    /// Take every recorded event.
    pub fn drain(&mut self) -> Vec<(Recipient, GameEvent)> {
        std::mem::take(&mut self.outbox)
    }

    /// Events delivered to `seat`, directly or by broadcast.
    pub fn events_for(&self, seat: Seat) -> impl Iterator<Item = &GameEvent> {
        self.outbox
            .iter()
            .filter(move |(to, _)| *to == Recipient::All || *to == Recipient::Seat(seat))
            .map(|(_, event)| event)
    }

    /// Most recently scheduled timeout.
    pub fn last_scheduled(&self) -> Option<ScheduledTimeout> {
        self.scheduled.last().copied()
    }
}

impl SessionHost for RecordingHost {
    fn seat_of(&self, user: UserId) -> Option<Seat> {
        self.seats.get(&user).copied()
    }

    fn send(&mut self, seat: Seat, event: &GameEvent) {
        self.outbox.push((Recipient::Seat(seat), event.clone()));
    }

    fn broadcast(&mut self, event: &GameEvent) {
        self.outbox.push((Recipient::All, event.clone()));
    }

    fn schedule_timeout(&mut self, timeout: ScheduledTimeout) {
        self.scheduled.push(timeout);
    }

    fn cancel_timeout(&mut self, token: TimerToken) {
        self.cancelled.push(token);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recording_host_seats() {
        let host = RecordingHost::new([UserId(10), UserId(20)]);
        assert_eq!(host.seat_of(UserId(20)), Some(Seat::new(1)));
        assert_eq!(host.seat_of(UserId(30)), None);
    }

    #[test]
    fn test_events_for_seat() {
        let mut host = RecordingHost::new([UserId(1), UserId(2)]);
        host.broadcast(&GameEvent::SpinnerSelected { channel: 0 });
        host.send(Seat::new(1), &GameEvent::OpponentCardSubmitted { seat: Seat::new(0) });

        assert_eq!(host.events_for(Seat::new(0)).count(), 1);
        assert_eq!(host.events_for(Seat::new(1)).count(), 2);
        assert_eq!(host.drain().len(), 2);
        assert!(host.outbox.is_empty());
    }
}
