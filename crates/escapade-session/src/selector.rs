//! The room selector ("dice").
//!
//! Every room has a weight. Rolling draws a room with probability
//! proportional to its weight. Completing a room lowers its weight, so
//! solved rooms come up less often and, at weight zero, not at all.
//!
//! Weights only ever go down during a session. A room at zero stays in the
//! table so it can still be reported on; it is simply never drawn.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::Rc;

use escapade_bus::{CompletionFeed, RoomId, Subscription};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::{SelectorConfig, SessionError};

/// Result of a roll.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Draw {
    /// Offer this room next.
    Room(RoomId),
    /// No room has weight left: every room is solved.
    Exhausted,
}

/// Weighted chooser of the next room.
#[derive(Debug)]
pub struct RoomSelector {
    /// Keyed by `RoomId` so iteration order, and therefore a seeded draw,
    /// is reproducible.
    weights: BTreeMap<RoomId, u32>,
    completions: BTreeMap<RoomId, u32>,
    completion_step: Option<u32>,
    rng: StdRng,
}

impl RoomSelector {
    /// Registers `rooms`, each at the configured initial weight.
    pub fn new(config: &SelectorConfig, rooms: impl IntoIterator<Item = RoomId>) -> Self {
        let weight = config.initial_weight;
        Self::with_weights(config, rooms.into_iter().map(|room| (room, weight)))
    }

    /// Registers rooms with individual starting weights.
    pub fn with_weights(
        config: &SelectorConfig,
        weights: impl IntoIterator<Item = (RoomId, u32)>,
    ) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        let weights: BTreeMap<RoomId, u32> = weights.into_iter().collect();
        tracing::debug!(
            rooms = weights.len(),
            seeded = config.seed.is_some(),
            "room selector created"
        );
        Self {
            weights,
            completions: BTreeMap::new(),
            completion_step: config.completion_step,
            rng,
        }
    }

    /// Lowers `room`'s weight after it was solved. Returns the new weight.
    ///
    /// # Errors
    /// [`SessionError::UnknownRoom`] if the room was never registered.
    pub fn on_completion(&mut self, room: RoomId) -> Result<u32, SessionError> {
        let weight = self
            .weights
            .get_mut(&room)
            .ok_or(SessionError::UnknownRoom(room))?;
        let step = self.completion_step.unwrap_or(*weight);
        *weight = weight.saturating_sub(step);
        let weight = *weight;
        *self.completions.entry(room).or_default() += 1;

        tracing::info!(room_id = %room, weight, "room weight lowered");
        Ok(weight)
    }

    /// Draws the next room among those with positive weight.
    pub fn choose(&mut self) -> Draw {
        let total: u64 = self.weights.values().map(|w| u64::from(*w)).sum();
        if total == 0 {
            tracing::info!("every room solved, dice exhausted");
            return Draw::Exhausted;
        }

        let mut ticket = self.rng.random_range(0..total);
        for (room, weight) in &self.weights {
            let weight = u64::from(*weight);
            if ticket < weight {
                tracing::debug!(room_id = %room, "dice rolled");
                return Draw::Room(*room);
            }
            ticket -= weight;
        }
        unreachable!("ticket is below the total weight")
    }

    pub fn weight(&self, room: RoomId) -> Option<u32> {
        self.weights.get(&room).copied()
    }

    /// How many completions have been recorded for `room`.
    pub fn completions(&self, room: RoomId) -> u32 {
        self.completions.get(&room).copied().unwrap_or(0)
    }

    /// Rooms still in the draw.
    pub fn open_rooms(&self) -> Vec<RoomId> {
        self.weights
            .iter()
            .filter(|(_, w)| **w > 0)
            .map(|(room, _)| *room)
            .collect()
    }

    pub fn is_exhausted(&self) -> bool {
        self.weights.values().all(|w| *w == 0)
    }

    /// Subscribes a shared selector to the completion feed.
    pub fn attach(selector: &Rc<RefCell<Self>>, feed: &CompletionFeed) -> Subscription {
        let selector = Rc::clone(selector);
        feed.subscribe(move |room| {
            if let Err(e) = selector.borrow_mut().on_completion(*room) {
                tracing::warn!(error = %e, "completion for unregistered room ignored");
            }
        })
    }
}
