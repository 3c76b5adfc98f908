//! Error types for the room layer.

use escapade_bus::{BusError, ClueId, FixtureId, RoomId};

/// Errors raised by a running room.
#[derive(Debug, thiserror::Error)]
pub enum RoomError {
    /// The scene reported an overlap with a fixture the room doesn't know.
    #[error("room {0} has no fixture {1}")]
    UnknownFixture(RoomId, FixtureId),

    /// A script collected a clue the room never declared.
    #[error("room {0} has no clue {1}")]
    UnknownClue(RoomId, ClueId),

    /// The room is in a phase that doesn't allow this operation.
    /// For example, triggering a fixture after the room was exited.
    #[error("invalid room state for this operation: {0}")]
    InvalidState(String),

    #[error(transparent)]
    Ledger(#[from] LedgerError),

    #[error(transparent)]
    Bus(#[from] BusError),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Errors from the clue ledger.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum LedgerError {
    /// A new clue arrived after the ledger already held every required clue.
    #[error("ledger already holds all {required} clues, cannot add {clue}")]
    Overflow { clue: ClueId, required: usize },
}

/// A room configuration that can't be played.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("room {0} needs a positive countdown")]
    ZeroCountdown(RoomId),

    #[error("room {0} requires no clues")]
    NothingRequired(RoomId),

    #[error("room {room} requires {required} clues but declares {declared}")]
    RequiredExceedsDeclared {
        room: RoomId,
        required: usize,
        declared: usize,
    },

    #[error("room {0} declares clue {1} twice")]
    DuplicateClue(RoomId, ClueId),

    #[error("room {0} declares fixture {1} twice")]
    DuplicateFixture(RoomId, FixtureId),

    /// A `collect` step names a clue missing from the room's clue list.
    #[error("room {0} collects undeclared clue {1}")]
    UndeclaredClue(RoomId, ClueId),
}
