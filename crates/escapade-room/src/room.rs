//! The generic room: one level episode.
//!
//! A [`Room`] is built from a [`RoomConfig`] and the session's
//! [`SessionLinks`]. It owns its countdown, its clue ledger and its pending
//! deferred actions, so dropping the room cancels everything it scheduled.
//! Behaviour specific to a room lives in its [`RoomHooks`].

use std::cell::Cell;
use std::rc::Rc;
use std::time::Duration;

use escapade_bus::{Destination, FixtureId, Message, RoomId, Subscription, Topic};
use escapade_session::SessionLinks;
use escapade_tick::{DeferredQueue, RoomTimer, TimerEvent};

use crate::{
    ClueLedger, RoomConfig, RoomCtx, RoomError, RoomHooks, RoomPhase, Scripted, Stage, Step,
};

/// What [`Room::trigger`] did with an overlap.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TriggerOutcome {
    /// The fixture's hook ran.
    Handled,
    /// Input is frozen or the countdown ran out; nothing happened.
    Ignored,
}

/// An action waiting in the room's queue.
#[derive(Debug, Clone)]
pub(crate) enum Deferred {
    /// Continue a script that paused on `Wait`.
    Resume(Vec<Step>),
    /// Take down a popup.
    Dismiss(String),
}

/// Room state reachable from hooks through [`RoomCtx`].
pub(crate) struct RoomCore {
    pub(crate) config: RoomConfig,
    pub(crate) ledger: ClueLedger,
    pub(crate) timer: RoomTimer,
    pub(crate) deferred: DeferredQueue<Deferred>,
    pub(crate) links: SessionLinks,
    /// Last `confirmation-check` answer seen on the bus.
    pub(crate) confirmation: Rc<Cell<bool>>,
    _confirmation_sub: Subscription,
    /// Set on the first trigger; the player body is disabled from then on.
    pub(crate) frozen: bool,
    pub(crate) phase: RoomPhase,
    pub(crate) exit: Option<Destination>,
    /// The ledger completed and `on_complete` has yet to run.
    pub(crate) completion_pending: bool,
}

impl RoomCore {
    pub(crate) fn exit(&mut self, destination: Destination) {
        debug_assert!(self.phase.can_transition_to(RoomPhase::Exited));
        let dropped = self.deferred.clear();
        tracing::info!(
            room_id = %self.config.id,
            %destination,
            from = %self.phase,
            dropped,
            "room exited"
        );
        self.phase = RoomPhase::Exited;
        self.exit = Some(destination);
    }
}

/// A live room episode.
pub struct Room {
    hooks: Box<dyn RoomHooks>,
    core: RoomCore,
}

impl Room {
    /// Enters a room with an empty ledger and the scripted hooks.
    pub fn new(config: RoomConfig, links: SessionLinks) -> Result<Self, RoomError> {
        let ledger = ClueLedger::new(config.required_clues);
        Self::resume(config, links, ledger)
    }

    /// Enters a room, carrying over the clues collected on earlier visits.
    ///
    /// # Errors
    /// [`RoomError::Config`] if the configuration is invalid, and
    /// [`RoomError::InvalidState`] if `ledger` was made for a different
    /// required count.
    pub fn resume(
        config: RoomConfig,
        links: SessionLinks,
        ledger: ClueLedger,
    ) -> Result<Self, RoomError> {
        config.validate()?;
        if ledger.required() != config.required_clues {
            return Err(RoomError::InvalidState(format!(
                "ledger requires {} clues, room {} requires {}",
                ledger.required(),
                config.id,
                config.required_clues
            )));
        }

        let confirmation = Rc::new(Cell::new(false));
        let confirmation_sub = {
            let confirmation = Rc::clone(&confirmation);
            links.bus.subscribe(Topic::ConfirmationCheck, move |msg| {
                if let Message::ConfirmationCheck(held) = msg {
                    confirmation.set(*held);
                }
            })
        };

        let room_id = config.id;
        let mut timer = RoomTimer::new(config.countdown());
        timer.start(move || tracing::info!(room_id = %room_id, "room countdown expired"));

        tracing::info!(
            room_id = %room_id,
            name = %config.name,
            collected = ledger.len(),
            required = config.required_clues,
            countdown_secs = config.countdown_secs,
            "room entered"
        );

        Ok(Self {
            hooks: Box::new(Scripted),
            core: RoomCore {
                config,
                ledger,
                timer,
                deferred: DeferredQueue::new(),
                links,
                confirmation,
                _confirmation_sub: confirmation_sub,
                frozen: false,
                phase: RoomPhase::Running,
                exit: None,
                completion_pending: false,
            },
        })
    }

    /// Replaces the scripted hooks.
    pub fn with_hooks(mut self, hooks: impl RoomHooks + 'static) -> Self {
        self.hooks = Box::new(hooks);
        self
    }

    /// The player overlapped `fixture`.
    ///
    /// Only the first overlap of an episode is handled: it freezes input, so
    /// the repeated overlap callbacks of the following frames are ignored.
    pub fn trigger(
        &mut self,
        fixture: &FixtureId,
        stage: &mut dyn Stage,
    ) -> Result<TriggerOutcome, RoomError> {
        let room_id = self.core.config.id;
        if !self.core.phase.is_live() {
            return Err(RoomError::InvalidState(format!(
                "cannot trigger {fixture} in room {room_id}: phase {}",
                self.core.phase
            )));
        }
        if self.core.config.fixture(fixture).is_none() {
            return Err(RoomError::UnknownFixture(room_id, fixture.clone()));
        }
        if !self.core.phase.accepts_triggers() || self.core.frozen {
            tracing::debug!(room_id = %room_id, %fixture, "trigger ignored");
            return Ok(TriggerOutcome::Ignored);
        }

        self.core.frozen = true;
        tracing::info!(room_id = %room_id, %fixture, "fixture triggered");

        let mut ctx = RoomCtx::new(&mut self.core, stage);
        if let Err(err) = self.hooks.on_trigger(fixture, &mut ctx) {
            tracing::error!(room_id = %room_id, %fixture, error = %err, "fixture script failed");
            if ctx.phase().is_live() {
                ctx.advance_to(Destination::Hub);
            }
            return Err(err);
        }
        self.finish_completion(stage)?;
        Ok(TriggerOutcome::Handled)
    }

    /// Advances the room by one frame: countdown first, then any deferred
    /// actions that fell due.
    pub fn tick(&mut self, dt: Duration, stage: &mut dyn Stage) -> Result<(), RoomError> {
        if !self.core.phase.is_live() {
            return Ok(());
        }

        match self.core.timer.tick(dt) {
            TimerEvent::Running(remaining) => stage.update_countdown(remaining),
            TimerEvent::Expired => {
                stage.update_countdown(Duration::ZERO);
                if self.core.phase == RoomPhase::Running {
                    debug_assert!(self.core.phase.can_transition_to(RoomPhase::Expired));
                    self.core.phase = RoomPhase::Expired;
                }
                let mut ctx = RoomCtx::new(&mut self.core, stage);
                self.hooks.on_expire(&mut ctx)?;
            }
            TimerEvent::Idle | TimerEvent::Finished => {}
        }

        for action in self.core.deferred.advance(dt) {
            if !self.core.phase.is_live() {
                break;
            }
            match action {
                Deferred::Resume(steps) => {
                    RoomCtx::new(&mut self.core, stage).run(&steps)?;
                }
                Deferred::Dismiss(image) => stage.dismiss_popup(&image),
            }
        }

        // An expired room only moves on through a deferred script; without
        // one it goes back to the hub.
        if self.core.phase == RoomPhase::Expired
            && !self
                .core
                .deferred
                .iter()
                .any(|action| matches!(action, Deferred::Resume(_)))
        {
            tracing::warn!(
                room_id = %self.core.config.id,
                "expired room did not exit, back to hub"
            );
            RoomCtx::new(&mut self.core, stage).advance_to(Destination::Hub);
        }

        self.finish_completion(stage)
    }

    /// Runs `on_complete` once after the ledger completed.
    fn finish_completion(&mut self, stage: &mut dyn Stage) -> Result<(), RoomError> {
        if !std::mem::take(&mut self.core.completion_pending) {
            return Ok(());
        }
        let mut ctx = RoomCtx::new(&mut self.core, stage);
        self.hooks.on_complete(&mut ctx)
    }

    /// Hands the ledger back when the room is torn down, so the next visit
    /// can resume it.
    pub fn into_ledger(self) -> ClueLedger {
        tracing::debug!(
            room_id = %self.core.config.id,
            dropped = self.core.deferred.len(),
            "room torn down"
        );
        self.core.ledger
    }

    pub fn id(&self) -> RoomId {
        self.core.config.id
    }

    pub fn name(&self) -> &str {
        &self.core.config.name
    }

    pub fn config(&self) -> &RoomConfig {
        &self.core.config
    }

    pub fn phase(&self) -> RoomPhase {
        self.core.phase
    }

    pub fn ledger(&self) -> &ClueLedger {
        &self.core.ledger
    }

    pub fn is_complete(&self) -> bool {
        self.core.ledger.is_complete()
    }

    pub fn is_frozen(&self) -> bool {
        self.core.frozen
    }

    /// Where the room asked to go, once it has exited.
    pub fn exit(&self) -> Option<Destination> {
        self.core.exit
    }

    pub fn remaining(&self) -> Duration {
        self.core.timer.remaining()
    }

    /// Number of deferred actions still waiting.
    pub fn pending(&self) -> usize {
        self.core.deferred.len()
    }
}

impl std::fmt::Debug for Room {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Room")
            .field("id", &self.core.config.id)
            .field("phase", &self.core.phase)
            .field("ledger", &self.core.ledger.clues())
            .field("remaining", &self.core.timer.remaining())
            .field("pending", &self.core.deferred.len())
            .finish()
    }
}
