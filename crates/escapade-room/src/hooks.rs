//! Per-room behaviour on top of the generic [`Room`](crate::Room).
//!
//! Most rooms are pure data: their fixtures run scripts and [`Scripted`]
//! is all they need. A room that wants custom logic implements
//! [`RoomHooks`] and drives the room through the primitives on
//! [`RoomCtx`].

use std::time::Duration;

use escapade_bus::{ClueId, Destination, FixtureId, Message, RoomId};
use escapade_tick::TimerKey;

use crate::room::{Deferred, RoomCore};
use crate::{AddOutcome, ClueLedger, Placement, RoomConfig, RoomError, RoomPhase, Stage, Step};

/// Callbacks a room runs at the points of its episode.
pub trait RoomHooks {
    /// The player overlapped `fixture`. Default: run the fixture's script.
    fn on_trigger(&mut self, fixture: &FixtureId, ctx: &mut RoomCtx<'_>) -> Result<(), RoomError> {
        let script = ctx.fixture_script(fixture)?;
        ctx.run(&script)
    }

    /// The ledger just became complete. Runs after the completion was
    /// published. Default: nothing.
    fn on_complete(&mut self, _ctx: &mut RoomCtx<'_>) -> Result<(), RoomError> {
        Ok(())
    }

    /// The room countdown reached zero. Default: run the `on_expire` script.
    fn on_expire(&mut self, ctx: &mut RoomCtx<'_>) -> Result<(), RoomError> {
        let script = ctx.config().on_expire.clone();
        ctx.run(&script)
    }
}

/// Hooks that only run the configured scripts.
#[derive(Debug, Clone, Copy, Default)]
pub struct Scripted;

impl RoomHooks for Scripted {}

/// What hooks see of the room: its configuration, its ledger and the
/// primitives every script step is built from.
pub struct RoomCtx<'a> {
    pub(crate) core: &'a mut RoomCore,
    pub(crate) stage: &'a mut dyn Stage,
}

impl<'a> RoomCtx<'a> {
    pub(crate) fn new(core: &'a mut RoomCore, stage: &'a mut dyn Stage) -> Self {
        Self { core, stage }
    }

    pub fn room_id(&self) -> RoomId {
        self.core.config.id
    }

    pub fn config(&self) -> &RoomConfig {
        &self.core.config
    }

    pub fn ledger(&self) -> &ClueLedger {
        &self.core.ledger
    }

    pub fn phase(&self) -> RoomPhase {
        self.core.phase
    }

    /// A copy of `fixture`'s script.
    pub fn fixture_script(&self, fixture: &FixtureId) -> Result<Vec<Step>, RoomError> {
        self.core
            .config
            .fixture(fixture)
            .map(|f| f.script.clone())
            .ok_or_else(|| RoomError::UnknownFixture(self.room_id(), fixture.clone()))
    }

    /// Runs `steps` in order.
    ///
    /// `Wait` defers everything after it. `AdvanceTo` ends the script and the
    /// room. A `CheckKey` continues with the chosen branch followed by the
    /// steps after it.
    pub fn run(&mut self, steps: &[Step]) -> Result<(), RoomError> {
        for (i, step) in steps.iter().enumerate() {
            if !self.core.phase.is_live() {
                return Ok(());
            }
            match step {
                Step::Message { text, placement } => self.show(text, *placement),
                Step::Sound { cue } => self.stage.play_sound(cue),
                Step::Popup {
                    image,
                    dismiss_after_ms,
                } => self.popup(image, Duration::from_millis(*dismiss_after_ms)),
                Step::Collect { clue } => {
                    self.collect(clue)?;
                }
                Step::Penalize { secs } => self.penalize(Duration::from_secs(*secs)),
                Step::Wait { ms } => {
                    let rest = &steps[i + 1..];
                    if !rest.is_empty() {
                        self.schedule(Duration::from_millis(*ms), rest.to_vec());
                    }
                    return Ok(());
                }
                Step::CheckKey {
                    item,
                    unlocked,
                    locked,
                } => {
                    let branch = if self.check_key(item)? { unlocked } else { locked };
                    let mut rest = branch.clone();
                    rest.extend_from_slice(&steps[i + 1..]);
                    return self.run(&rest);
                }
                Step::AdvanceTo { destination } => {
                    self.advance_to(*destination);
                    return Ok(());
                }
            }
        }
        Ok(())
    }

    /// Hands the player `clue`.
    ///
    /// Records the clue, then broadcasts `update-bank` if the clue is
    /// declared as broadcast (every time, the inventory ignores repeats),
    /// plays its sound and shows its popup. A clue the ledger refuses has no
    /// effect at all. The insertion that completes the ledger publishes the
    /// room id on the completion feed.
    pub fn collect(&mut self, clue: &ClueId) -> Result<AddOutcome, RoomError> {
        let room = self.room_id();
        let declared = self
            .core
            .config
            .clue(clue)
            .cloned()
            .ok_or_else(|| RoomError::UnknownClue(room, clue.clone()))?;

        let outcome = self.core.ledger.add(clue.clone())?;

        if declared.broadcast {
            self.core.links.bus.publish(Message::UpdateBank(clue.clone()))?;
        }
        if let Some(cue) = &declared.sound {
            self.stage.play_sound(cue);
        }
        if let Some(image) = &declared.popup {
            self.popup(image, Duration::from_millis(crate::DEFAULT_POPUP_MS));
        }

        match outcome {
            AddOutcome::Duplicate => {
                tracing::debug!(room_id = %room, %clue, "clue already collected");
            }
            AddOutcome::Added => {
                tracing::info!(
                    room_id = %room,
                    %clue,
                    collected = self.core.ledger.len(),
                    required = self.core.ledger.required(),
                    "clue collected"
                );
            }
            AddOutcome::Completed => {
                tracing::info!(room_id = %room, %clue, "room completed");
                self.core.links.feed.publish(room)?;
                self.core.completion_pending = true;
            }
        }
        Ok(outcome)
    }

    /// Asks whether the player holds `item`.
    ///
    /// With a direct authority the answer comes back from the call. Without
    /// one the room publishes `check-key` and reads the `confirmation-check`
    /// reply stored during that publish; no reply means `false`.
    pub fn check_key(&mut self, item: &ClueId) -> Result<bool, RoomError> {
        let held = match &self.core.links.authority {
            Some(authority) => authority.holds(item),
            None => {
                self.core.confirmation.set(false);
                self.core.links.bus.publish(Message::CheckKey(item.clone()))?;
                self.core.confirmation.get()
            }
        };
        tracing::debug!(room_id = %self.room_id(), %item, held, "key checked");
        Ok(held)
    }

    pub fn penalize(&mut self, penalty: Duration) {
        tracing::warn!(room_id = %self.room_id(), secs = penalty.as_secs(), "penalty applied");
        self.core.links.global.penalize(penalty);
    }

    pub fn show(&mut self, text: &str, placement: Placement) {
        self.stage.show_message(text, placement);
    }

    /// Shows `image` and schedules its dismissal.
    pub fn popup(&mut self, image: &str, dismiss_after: Duration) {
        self.stage.show_popup(image);
        self.core
            .deferred
            .schedule(dismiss_after, Deferred::Dismiss(image.to_string()));
    }

    /// Runs `steps` after `delay`, unless the room exits first.
    pub fn schedule(&mut self, delay: Duration, steps: Vec<Step>) -> TimerKey {
        tracing::debug!(
            room_id = %self.room_id(),
            delay_ms = delay.as_millis() as u64,
            steps = steps.len(),
            "script deferred"
        );
        self.core.deferred.schedule(delay, Deferred::Resume(steps))
    }

    pub fn cancel(&mut self, key: TimerKey) -> bool {
        self.core.deferred.cancel(key)
    }

    /// Leaves the room. Pending deferred actions are dropped.
    pub fn advance_to(&mut self, destination: Destination) {
        self.stage.advance_to(destination);
        self.core.exit(destination);
    }
}
