//! Per-room countdown.
//!
//! ```text
//! Idle ──start()──▶ Running ──tick() reaches zero──▶ Expired
//! ```
//!
//! `Expired` is terminal. A new room episode gets a new timer.

use std::fmt;
use std::time::Duration;

/// Lifecycle of a [`RoomTimer`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerState {
    Idle,
    Running,
    Expired,
}

/// What a single [`RoomTimer::tick`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerEvent {
    /// Not started yet; nothing happened.
    Idle,
    /// Still counting; carries the time left.
    Running(Duration),
    /// This tick reached zero. Reported exactly once.
    Expired,
    /// Already expired on an earlier tick; nothing happened.
    Finished,
}

/// A countdown from a fixed duration, ticked once per frame.
pub struct RoomTimer {
    duration: Duration,
    remaining: Duration,
    state: TimerState,
    on_expire: Option<Box<dyn FnOnce()>>,
}

impl RoomTimer {
    pub fn new(duration: Duration) -> Self {
        Self {
            duration,
            remaining: duration,
            state: TimerState::Idle,
            on_expire: None,
        }
    }

    pub fn from_secs(secs: u64) -> Self {
        Self::new(Duration::from_secs(secs))
    }

    /// Starts counting down. `on_expire` runs once, on the tick that
    /// reaches zero.
    ///
    /// Starting a timer that is already running or expired does nothing.
    pub fn start(&mut self, on_expire: impl FnOnce() + 'static) {
        if self.state != TimerState::Idle {
            tracing::debug!(state = ?self.state, "room timer already started");
            return;
        }
        self.state = TimerState::Running;
        self.on_expire = Some(Box::new(on_expire));
    }

    /// Advances the countdown by one frame of `dt`.
    pub fn tick(&mut self, dt: Duration) -> TimerEvent {
        match self.state {
            TimerState::Idle => TimerEvent::Idle,
            TimerState::Expired => TimerEvent::Finished,
            TimerState::Running => {
                self.remaining = self.remaining.saturating_sub(dt);
                if !self.remaining.is_zero() {
                    return TimerEvent::Running(self.remaining);
                }
                self.state = TimerState::Expired;
                if let Some(on_expire) = self.on_expire.take() {
                    on_expire();
                }
                TimerEvent::Expired
            }
        }
    }

    pub fn remaining(&self) -> Duration {
        self.remaining
    }

    pub fn duration(&self) -> Duration {
        self.duration
    }

    pub fn state(&self) -> TimerState {
        self.state
    }

    pub fn is_expired(&self) -> bool {
        self.state == TimerState::Expired
    }
}

impl fmt::Debug for RoomTimer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RoomTimer")
            .field("duration", &self.duration)
            .field("remaining", &self.remaining)
            .field("state", &self.state)
            .finish()
    }
}

/// Formats a remaining time as `m:ss`, the way the room label shows it.
pub fn format_clock(remaining: Duration) -> String {
    let secs = remaining.as_secs();
    format!("{}:{:02}", secs / 60, secs % 60)
}
