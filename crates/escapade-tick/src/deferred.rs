//! Delayed one-shot actions driven by the frame clock.
//!
//! Rooms never block the frame loop. "Show the popup, wait three seconds,
//! then move on" becomes an action scheduled here and handed back by
//! [`DeferredQueue::advance`] on the frame it falls due.
//!
//! The queue stores plain values rather than callbacks. Its owner runs the
//! actions with full access to its own state, and dropping the owner drops
//! every pending action with it, so nothing can fire into a torn-down room.

use std::collections::BTreeMap;
use std::fmt;
use std::time::Duration;

/// Handle to a scheduled action, used to cancel it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TimerKey {
    due: Duration,
    seq: u64,
}

/// Pending actions ordered by due time, then by scheduling order.
pub struct DeferredQueue<A> {
    now: Duration,
    next_seq: u64,
    pending: BTreeMap<TimerKey, A>,
}

impl<A> Default for DeferredQueue<A> {
    fn default() -> Self {
        Self {
            now: Duration::ZERO,
            next_seq: 0,
            pending: BTreeMap::new(),
        }
    }
}

impl<A> DeferredQueue<A> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedules `action` to fall due `delay` from now.
    ///
    /// A zero delay makes it due on the next [`advance`](Self::advance),
    /// never during the current frame.
    pub fn schedule(&mut self, delay: Duration, action: A) -> TimerKey {
        let key = TimerKey {
            due: self.now + delay,
            seq: self.next_seq,
        };
        self.next_seq += 1;
        self.pending.insert(key, action);
        key
    }

    /// Cancels a pending action. Returns `false` if it already fired or was
    /// cancelled before.
    pub fn cancel(&mut self, key: TimerKey) -> bool {
        self.pending.remove(&key).is_some()
    }

    /// Moves time forward by `dt` and returns every action now due.
    pub fn advance(&mut self, dt: Duration) -> Vec<A> {
        self.now += dt;
        let later = self.pending.split_off(&TimerKey {
            due: self.now,
            seq: u64::MAX,
        });
        let due = std::mem::replace(&mut self.pending, later);
        due.into_values().collect()
    }

    /// Pending actions in the order they will fire.
    pub fn iter(&self) -> impl Iterator<Item = &A> {
        self.pending.values()
    }

    /// Drops every pending action.
    pub fn clear(&mut self) -> usize {
        let dropped = self.pending.len();
        self.pending.clear();
        dropped
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Time elapsed on this queue's clock.
    pub fn now(&self) -> Duration {
        self.now
    }
}

impl<A> fmt::Debug for DeferredQueue<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DeferredQueue")
            .field("now", &self.now)
            .field("pending", &self.pending.len())
            .finish()
    }
}
