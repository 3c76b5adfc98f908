//! # Escapade
//!
//! Coordination core for multi-room escape games.
//!
//! Escapade glues independently scripted rooms into one game: a synchronous
//! publish/subscribe bus between rooms and the session, a per-room countdown
//! and a session countdown with penalties, a clue ledger per room with
//! completion detection, and weighted dice that pick the next room.
//! Rendering, audio and collision stay in the scene runtime, which plugs in
//! through the [`Stage`](escapade_room::Stage) trait.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use escapade::prelude::*;
//!
//! # fn demo(stage: impl Stage) -> Result<(), EscapadeError> {
//! let catalog = RoomCatalog::from_path("rooms.json")?;
//! let mut game = Game::new(SessionConfig::default(), catalog, stage);
//! if let Draw::Room(room) = game.roll()? {
//!     println!("entered {room}");
//! }
//! game.trigger(&FixtureId::from("notebook"))?;
//! # Ok(())
//! # }
//! ```

mod catalog;
mod error;
mod game;
pub mod telemetry;

pub use catalog::RoomCatalog;
pub use error::EscapadeError;
pub use game::{Game, Outcome, Status};

pub use escapade_bus as bus;
pub use escapade_room as room;
pub use escapade_session as session;
pub use escapade_tick as tick;

pub mod prelude {
    //! The types most games need.

    pub use crate::{EscapadeError, Game, Outcome, RoomCatalog, Status};
    pub use escapade_bus::{ClueId, Destination, FixtureId, RoomId};
    pub use escapade_room::{
        ClueSpec, FixtureSpec, Placement, Room, RoomConfig, RoomCtx, RoomHooks, Stage, Step,
        TriggerOutcome,
    };
    pub use escapade_session::{Draw, HandshakeMode, SelectorConfig, SessionConfig};
    pub use escapade_tick::{FrameClock, FrameConfig, FramePolicy, format_clock};
}
