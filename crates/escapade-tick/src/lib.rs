//! Time for Escapade: the frame clock and everything it drives.
//!
//! - [`FrameClock`]: fixed-rate frames on Tokio's timer, for running the
//!   core without an external scene loop.
//! - [`RoomTimer`]: per-room countdown with a once-only expiry callback.
//! - [`GlobalTimer`]: the session countdown, shared by every room and
//!   subject to penalties.
//! - [`DeferredQueue`]: delayed one-shot actions owned by a room.
//!
//! Every timer advances by the fixed `dt` of a frame, never by wall-clock
//! time. One frame is one decrement; frames are never coalesced.
//!
//! ```ignore
//! let mut clock = FrameClock::with_rate(60);
//! loop {
//!     let frame = clock.next_frame().await;
//!     global.tick(frame.dt);
//!     room.tick(frame.dt, &mut stage)?;
//! }
//! ```

mod clock;
mod countdown;
mod deferred;
mod global;

pub use clock::{FrameClock, FrameConfig, FrameInfo, FramePolicy};
pub use countdown::{format_clock, RoomTimer, TimerEvent, TimerState};
pub use deferred::{DeferredQueue, TimerKey};
pub use global::{GlobalTimer, STANDARD_PENALTY};
