//! Session-wide countdown shared by every room.

use std::cell::Cell;
use std::fmt;
use std::rc::Rc;
use std::time::Duration;

/// Penalty used by the level content for "sit out for 5 minutes".
pub const STANDARD_PENALTY: Duration = Duration::from_secs(5 * 60);

struct Inner {
    remaining_ms: Cell<i64>,
    penalties: Cell<u32>,
    expiry_logged: Cell<bool>,
}

/// The single game-session countdown.
///
/// Cloning gives another handle to the same countdown; the session keeps
/// one and every room gets one. Remaining time is signed: penalties are
/// never clamped, so it may go below zero. Anything at or below zero
/// means the session clock has run out.
#[derive(Clone)]
pub struct GlobalTimer {
    inner: Rc<Inner>,
}

impl GlobalTimer {
    pub fn new(duration: Duration) -> Self {
        Self {
            inner: Rc::new(Inner {
                remaining_ms: Cell::new(to_ms(duration)),
                penalties: Cell::new(0),
                expiry_logged: Cell::new(false),
            }),
        }
    }

    pub fn from_secs(secs: u64) -> Self {
        Self::new(Duration::from_secs(secs))
    }

    /// Subtracts one frame of elapsed time.
    pub fn tick(&self, dt: Duration) {
        self.subtract(to_ms(dt));
    }

    /// Subtracts `penalty` on top of the normal countdown.
    pub fn penalize(&self, penalty: Duration) {
        let count = self.inner.penalties.get() + 1;
        self.inner.penalties.set(count);
        self.subtract(to_ms(penalty));
        tracing::warn!(
            penalty_secs = penalty.as_secs(),
            remaining_secs = self.remaining_secs(),
            penalties = count,
            "session timer penalized"
        );
    }

    pub fn penalize_secs(&self, secs: u64) {
        self.penalize(Duration::from_secs(secs));
    }

    /// Remaining time in milliseconds; negative once overdrawn.
    pub fn remaining_ms(&self) -> i64 {
        self.inner.remaining_ms.get()
    }

    /// Remaining whole seconds, rounded toward negative infinity.
    pub fn remaining_secs(&self) -> i64 {
        self.remaining_ms().div_euclid(1000)
    }

    /// Remaining time, or zero once expired.
    pub fn remaining(&self) -> Duration {
        Duration::from_millis(self.remaining_ms().max(0) as u64)
    }

    pub fn is_expired(&self) -> bool {
        self.remaining_ms() <= 0
    }

    pub fn penalties(&self) -> u32 {
        self.inner.penalties.get()
    }

    fn subtract(&self, ms: i64) {
        let remaining = self.inner.remaining_ms.get().saturating_sub(ms);
        self.inner.remaining_ms.set(remaining);
        if remaining <= 0 && !self.inner.expiry_logged.replace(true) {
            tracing::info!(remaining_ms = remaining, "session timer expired");
        }
    }
}

impl fmt::Debug for GlobalTimer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GlobalTimer")
            .field("remaining_ms", &self.remaining_ms())
            .field("penalties", &self.penalties())
            .finish()
    }
}

fn to_ms(d: Duration) -> i64 {
    i64::try_from(d.as_millis()).unwrap_or(i64::MAX)
}
