//! Session-level state for Escapade.
//!
//! This crate holds everything that lives for the whole game rather than
//! for one room:
//!
//! 1. **Global countdown**: one [`GlobalTimer`](escapade_tick::GlobalTimer)
//!    every room can penalize.
//! 2. **Inventory**: clues banked across rooms; answers key checks
//!    ([`Inventory`], [`KeyAuthority`]).
//! 3. **Room selection**: the weighted "dice" ([`RoomSelector`]), fed by
//!    room completions.
//!
//! # How it fits in the stack
//!
//! ```text
//! Room Layer (above)  ← built with SessionLinks, publishes to both channels
//!     ↕
//! Session Layer (this crate)  ← listens on both channels
//!     ↕
//! Bus + Tick Layers (below)  ← channels, ids, timers
//! ```

mod config;
mod error;
mod inventory;
mod selector;
mod session;

pub use config::{HandshakeMode, SelectorConfig, SessionConfig};
pub use error::SessionError;
pub use inventory::{Inventory, KeyAuthority};
pub use selector::{Draw, RoomSelector};
pub use session::{Session, SessionLinks};
