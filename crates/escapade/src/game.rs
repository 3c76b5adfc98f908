//! The game controller: one session, at most one live room.
//!
//! [`Game`] is what the level layer talks to. It rolls the dice, builds the
//! drawn room, forwards overlaps and frames to it, and follows the room's
//! exit back to the hub or into the next room. Clues collected on a visit
//! are kept when the room is torn down and handed back on the next visit.

use std::collections::BTreeMap;
use std::time::Duration;

use escapade_bus::{ClueId, Destination, FixtureId, RoomId};
use escapade_room::{ClueLedger, Room, Stage, TriggerOutcome};
use escapade_session::{Draw, Session, SessionConfig};
use escapade_tick::FrameClock;
use serde::Serialize;

use crate::{EscapadeError, RoomCatalog};

/// How a game ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    /// The session countdown reached zero, penalties included.
    OutOfTime,
    /// Every room was completed; the dice have nothing left to offer.
    AllSolved,
}

/// A snapshot of the game for status displays and logs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Status {
    pub location: Destination,
    pub remaining_secs: i64,
    pub penalties: u32,
    pub room_remaining_secs: Option<u64>,
    pub inventory: Vec<ClueId>,
    pub solved: Vec<RoomId>,
}

/// A running game.
pub struct Game<S: Stage> {
    session: Session,
    catalog: RoomCatalog,
    /// Ledgers of rooms visited before and not live right now.
    ledgers: BTreeMap<RoomId, ClueLedger>,
    room: Option<Room>,
    stage: S,
}

impl<S: Stage> Game<S> {
    /// Starts a session over every catalog room. The player begins in the hub.
    pub fn new(config: SessionConfig, catalog: RoomCatalog, stage: S) -> Self {
        let session = Session::new(config, catalog.ids());
        tracing::info!(rooms = catalog.len(), "game started in the hub");
        Self {
            session,
            catalog,
            ledgers: BTreeMap::new(),
            room: None,
            stage,
        }
    }

    /// Enters `id`, tearing down whatever room was live.
    pub fn enter(&mut self, id: RoomId) -> Result<(), EscapadeError> {
        let config = self
            .catalog
            .get(id)
            .ok_or(EscapadeError::NotInCatalog(id))?
            .clone();
        self.leave();

        let ledger = self
            .ledgers
            .remove(&id)
            .unwrap_or_else(|| ClueLedger::new(config.required_clues));
        let kept = ledger.clone();
        match Room::resume(config, self.session.links(), ledger) {
            Ok(room) => {
                self.room = Some(room);
                Ok(())
            }
            Err(err) => {
                if !kept.is_empty() {
                    self.ledgers.insert(id, kept);
                }
                Err(err.into())
            }
        }
    }

    /// Drops the live room, if any, and returns to the hub.
    pub fn leave(&mut self) {
        if let Some(room) = self.room.take() {
            let id = room.id();
            self.ledgers.insert(id, room.into_ledger());
            tracing::debug!(room_id = %id, "back in the hub");
        }
    }

    /// Rolls the dice and enters the drawn room.
    pub fn roll(&mut self) -> Result<Draw, EscapadeError> {
        let draw = self.session.roll();
        if let Draw::Room(id) = draw {
            self.enter(id)?;
        }
        Ok(draw)
    }

    /// Forwards an overlap with `fixture` to the live room.
    ///
    /// A room whose script failed has already left; the transition is
    /// followed before the error is returned.
    pub fn trigger(&mut self, fixture: &FixtureId) -> Result<TriggerOutcome, EscapadeError> {
        let room = self.room.as_mut().ok_or(EscapadeError::InHub)?;
        let outcome = room.trigger(fixture, &mut self.stage);
        self.follow_exit()?;
        outcome.map_err(Into::into)
    }

    /// Advances the session countdown and the live room by one frame.
    pub fn tick(&mut self, dt: Duration) -> Result<(), EscapadeError> {
        self.session.tick(dt);
        if let Some(room) = self.room.as_mut() {
            room.tick(dt, &mut self.stage)?;
        }
        self.follow_exit()
    }

    /// Applies the transition the live room asked for, if it exited.
    fn follow_exit(&mut self) -> Result<(), EscapadeError> {
        let Some(destination) = self.room.as_ref().and_then(Room::exit) else {
            return Ok(());
        };
        match destination {
            Destination::Hub => {
                self.leave();
                Ok(())
            }
            Destination::Room(next) => self.enter(next),
        }
    }

    /// How the game ended, if it has.
    pub fn outcome(&self) -> Option<Outcome> {
        if self.session.global().is_expired() {
            Some(Outcome::OutOfTime)
        } else if self.session.all_solved() {
            Some(Outcome::AllSolved)
        } else {
            None
        }
    }

    /// Drives the game from `clock` for at most `frames` frames, stopping
    /// early once there is an outcome.
    pub async fn run(
        &mut self,
        clock: &mut FrameClock,
        frames: u64,
    ) -> Result<Option<Outcome>, EscapadeError> {
        for _ in 0..frames {
            let frame = clock.next_frame().await;
            self.tick(frame.dt)?;
            if let Some(outcome) = self.outcome() {
                tracing::info!(?outcome, frame = frame.frame, "game over");
                return Ok(Some(outcome));
            }
        }
        Ok(self.outcome())
    }

    /// Where the player is.
    pub fn location(&self) -> Destination {
        match &self.room {
            Some(room) => Destination::Room(room.id()),
            None => Destination::Hub,
        }
    }

    pub fn room(&self) -> Option<&Room> {
        self.room.as_ref()
    }

    /// Clues collected in `id` so far, live or not.
    pub fn ledger(&self, id: RoomId) -> Option<&ClueLedger> {
        match &self.room {
            Some(room) if room.id() == id => Some(room.ledger()),
            _ => self.ledgers.get(&id),
        }
    }

    pub fn status(&self) -> Status {
        Status {
            location: self.location(),
            remaining_secs: self.session.global().remaining_secs(),
            penalties: self.session.global().penalties(),
            room_remaining_secs: self.room.as_ref().map(|r| r.remaining().as_secs()),
            inventory: self.session.inventory(),
            solved: self
                .catalog
                .ids()
                .filter(|id| self.session.is_solved(*id))
                .collect(),
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn catalog(&self) -> &RoomCatalog {
        &self.catalog
    }

    pub fn stage(&self) -> &S {
        &self.stage
    }

    pub fn stage_mut(&mut self) -> &mut S {
        &mut self.stage
    }
}

impl<S: Stage> std::fmt::Debug for Game<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Game")
            .field("session", &self.session)
            .field("room", &self.room)
            .field("visited", &self.ledgers.keys().collect::<Vec<_>>())
            .finish()
    }
}
