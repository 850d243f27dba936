//! Idle timeouts.
//!
//! The session never runs timers itself. Arming a timeout hands the host a
//! `ScheduledTimeout`; when it expires the host feeds the token back in as
//! an ordinary session event. Tokens carry a generation, so a firing for a
//! timeout that has since been cancelled or replaced is recognised as stale
//! and dropped.

use std::time::Duration;

use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimeoutKind {
    /// Spinner and tile choice, plus a pending element/opponent choice.
    Movement,
    /// Card submission.
    Combat,
}

/// Identifies one arming of a timeout.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TimerToken {
    pub kind: TimeoutKind,
    pub generation: u64,
}

/// Request for the host to deliver `token` after `after`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ScheduledTimeout {
    pub token: TimerToken,
    pub after: Duration,
}

/// At most one armed idle timeout.
#[derive(Clone, Debug)]
pub struct AutoplayTimer {
    armed: Option<TimerToken>,
    generation: u64,
    duration: Duration,
}

impl AutoplayTimer {
    #[must_use]
    pub fn new(duration: Duration) -> Self {
        Self {
            armed: None,
            generation: 0,
            duration,
        }
    }

    #[must_use]
    pub fn armed(&self) -> Option<TimerToken> {
        self.armed
    }

    #[must_use]
    pub fn is_armed(&self, kind: TimeoutKind) -> bool {
        self.armed.is_some_and(|token| token.kind == kind)
    }

    /// Arm a timeout of `kind`, replacing whatever was armed.
    ///
    /// Returns the replaced token alongside the new request.
    pub fn arm(&mut self, kind: TimeoutKind) -> (Option<TimerToken>, ScheduledTimeout) {
        self.generation += 1;
        let token = TimerToken {
            kind,
            generation: self.generation,
        };
        let replaced = self.armed.replace(token);

        (
            replaced,
            ScheduledTimeout {
                token,
                after: self.duration,
            },
        )
    }

    /// Cancel the armed timeout if it is of `kind`.
    pub fn cancel(&mut self, kind: TimeoutKind) -> Option<TimerToken> {
        if self.is_armed(kind) {
            self.armed.take()
        } else {
            None
        }
    }

    /// Cancel whatever is armed.
    pub fn clear(&mut self) -> Option<TimerToken> {
        self.armed.take()
    }

    /// Consume a firing. Returns its kind if `token` is the armed timeout.
    pub fn fire(&mut self, token: TimerToken) -> Option<TimeoutKind> {
        if self.armed == Some(token) {
            self.armed = None;
            Some(token.kind)
        } else {
            None
        }
    }
}
