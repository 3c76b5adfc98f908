//! Unified error type for Escapade.

use escapade_bus::{BusError, ProtocolError, RoomId};
use escapade_room::{ConfigError, RoomError};
use escapade_session::SessionError;

/// Top-level error that wraps all crate-specific errors.
///
/// When using the `escapade` meta-crate, you deal with this single
/// error type instead of importing errors from each sub-crate.
/// The `#[from]` attribute on each variant auto-generates `From` impls,
/// so the `?` operator converts sub-crate errors automatically.
#[derive(Debug, thiserror::Error)]
pub enum EscapadeError {
    /// A bus error (re-entrant handler).
    #[error(transparent)]
    Bus(#[from] BusError),

    /// A topic name that doesn't exist.
    #[error(transparent)]
    Protocol(#[from] ProtocolError),

    /// A room-level error (unknown fixture, ledger overflow, invalid phase).
    #[error(transparent)]
    Room(#[from] RoomError),

    /// An unplayable room configuration.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// A session-level error (unknown room).
    #[error(transparent)]
    Session(#[from] SessionError),

    /// The room catalog JSON could not be parsed.
    #[error("invalid room catalog: {0}")]
    Catalog(#[from] serde_json::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Two catalog entries share a room id.
    #[error("room {0} appears twice in the catalog")]
    DuplicateRoom(RoomId),

    /// The game was asked to enter a room the catalog doesn't have.
    #[error("room {0} is not in the catalog")]
    NotInCatalog(RoomId),

    /// A room operation was attempted while the player is in the hub.
    #[error("no room is live")]
    InHub,
}
