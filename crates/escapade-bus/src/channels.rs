//! The two session channels: the coordination bus and the completion feed.
//!
//! Both are thin wrappers over [`Bus`]. They exist as separate types so a
//! room cannot publish a completion on the coordination bus by mistake, and
//! so the payload for each topic is fixed by the type system.

use std::fmt;

use crate::bus::{Bus, Subscription, WeakBus};
use crate::{BusError, Message, RoomId, Topic};

// ---------------------------------------------------------------------------
// CoordinationBus
// ---------------------------------------------------------------------------

/// Request/response and broadcast channel between rooms and session-level
/// listeners (`check-key`, `confirmation-check`, `update-bank`).
#[derive(Clone, Default)]
pub struct CoordinationBus {
    bus: Bus<Topic, Message>,
}

impl CoordinationBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `handler` for every message published on `topic`.
    pub fn subscribe<F>(&self, topic: Topic, handler: F) -> Subscription
    where
        F: FnMut(&Message) + 'static,
    {
        self.bus.subscribe(topic, handler)
    }

    /// Publishes `message` on its topic and runs every handler before
    /// returning. Returns how many handlers ran.
    pub fn publish(&self, message: Message) -> Result<usize, BusError> {
        self.bus.publish(&message.topic(), &message)
    }

    pub fn subscriber_count(&self, topic: Topic) -> usize {
        self.bus.subscriber_count(&topic)
    }

    pub fn downgrade(&self) -> WeakCoordinationBus {
        WeakCoordinationBus {
            bus: self.bus.downgrade(),
        }
    }
}

impl fmt::Debug for CoordinationBus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let counts: Vec<_> = Topic::ALL
            .iter()
            .map(|t| (t.as_str(), self.subscriber_count(*t)))
            .collect();
        f.debug_struct("CoordinationBus")
            .field("subscribers", &counts)
            .finish()
    }
}

/// Non-owning handle to a [`CoordinationBus`], for handlers that reply on
/// the bus they are subscribed to.
#[derive(Clone)]
pub struct WeakCoordinationBus {
    bus: WeakBus<Topic, Message>,
}

impl WeakCoordinationBus {
    pub fn upgrade(&self) -> Option<CoordinationBus> {
        self.bus.upgrade().map(|bus| CoordinationBus { bus })
    }
}

// ---------------------------------------------------------------------------
// CompletionFeed
// ---------------------------------------------------------------------------

/// The single topic carried by the completion feed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Completed;

impl fmt::Display for Completed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("completed")
    }
}

/// Narrow channel carrying only "room N fully solved" notifications.
#[derive(Clone, Default)]
pub struct CompletionFeed {
    bus: Bus<Completed, RoomId>,
}

impl CompletionFeed {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe<F>(&self, handler: F) -> Subscription
    where
        F: FnMut(&RoomId) + 'static,
    {
        self.bus.subscribe(Completed, handler)
    }

    /// Announces that `room` has been solved.
    pub fn publish(&self, room: RoomId) -> Result<usize, BusError> {
        tracing::info!(room_id = %room, "room completion published");
        self.bus.publish(&Completed, &room)
    }

    pub fn subscriber_count(&self) -> usize {
        self.bus.subscriber_count(&Completed)
    }
}

impl fmt::Debug for CompletionFeed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompletionFeed")
            .field("subscribers", &self.subscriber_count())
            .finish()
    }
}
