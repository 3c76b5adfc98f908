//! Shared vocabulary and publish/subscribe channels for Escapade.
//!
//! This crate defines what rooms and the session say to each other and the
//! channels they say it on:
//!
//! - **Types** ([`RoomId`], [`ClueId`], [`FixtureId`], [`Destination`],
//!   [`Topic`], [`Message`]): identities and bus messages.
//! - **Channels** ([`CoordinationBus`], [`CompletionFeed`]): synchronous
//!   publish/subscribe, built on the generic [`Bus`].
//! - **Errors** ([`BusError`], [`ProtocolError`]).
//!
//! # Architecture
//!
//! ```text
//! Room ──check-key / update-bank──▶ CoordinationBus ──▶ Inventory
//!   ▲                                                     │
//!   └──────────── confirmation-check ◀────────────────────┘
//! Room ──completed(RoomId)──▶ CompletionFeed ──▶ RoomSelector
//! ```
//!
//! Every publish is delivered before it returns. Nothing here is `Send`:
//! the whole game runs on one logical thread.

mod bus;
mod channels;
mod error;
mod types;

pub use bus::{Bus, Subscription, WeakBus};
pub use channels::{CompletionFeed, Completed, CoordinationBus, WeakCoordinationBus};
pub use error::{BusError, ProtocolError};
pub use types::{ClueId, Destination, FixtureId, Message, RoomId, Topic};
