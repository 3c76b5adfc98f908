//! Rooms for Escapade.
//!
//! A room is one level episode: a countdown, a clue ledger and a set of
//! fixtures the player can overlap. Every room is the same [`Room`] type,
//! configured by a [`RoomConfig`] and optionally customised with
//! [`RoomHooks`].
//!
//! # Key types
//!
//! - [`Room`]: a live episode, driven by `trigger` and `tick`
//! - [`RoomConfig`]: clues, fixtures and scripts, loadable with serde
//! - [`Step`]: one instruction in a fixture script
//! - [`Stage`]: the scene runtime the room draws and plays on
//! - [`ClueLedger`]: collected clues with a fire-once completion
//! - [`RoomPhase`]: `Running → Expired → Exited`

mod config;
mod error;
mod hooks;
mod ledger;
mod room;
mod script;

pub use config::{ClueSpec, DEFAULT_COUNTDOWN_SECS, FixtureSpec, RoomConfig, RoomPhase};
pub use error::{ConfigError, LedgerError, RoomError};
pub use hooks::{RoomCtx, RoomHooks, Scripted};
pub use ledger::{AddOutcome, ClueLedger};
pub use room::{Room, TriggerOutcome};
pub use script::{DEFAULT_POPUP_MS, Placement, Stage, Step};
