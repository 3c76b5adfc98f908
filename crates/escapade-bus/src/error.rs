//! Error types for the bus layer.
//!
//! Each crate in Escapade defines its own error enum, so a `BusError`
//! always means the problem happened while delivering a message.

/// Errors raised when turning level-content names into bus vocabulary.
#[derive(Debug, thiserror::Error)]
pub enum ProtocolError {
    /// The name does not match any coordination topic.
    #[error("unknown topic: {0}")]
    UnknownTopic(String),
}

/// Errors that can occur while publishing.
#[derive(Debug, thiserror::Error)]
pub enum BusError {
    /// A handler was about to be invoked while it was already running
    /// further up the call stack (a publish loop through the same handler).
    ///
    /// Delivery is synchronous, so this would otherwise recurse forever or
    /// double-fire game events. It fails loudly instead.
    #[error("handler re-entered while publishing on `{0}`")]
    Reentrant(String),
}
