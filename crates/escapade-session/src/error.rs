//! Error types for the session layer.

use escapade_bus::{BusError, RoomId};

/// Errors that can occur in session-level bookkeeping.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// The room is not known to the room selector.
    /// Every room must be registered when the session starts.
    #[error("room {0} is not registered with the selector")]
    UnknownRoom(RoomId),

    /// Publishing on the coordination bus failed.
    #[error(transparent)]
    Bus(#[from] BusError),
}
