//! Session configuration.

use escapade_bus::ClueId;
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// HandshakeMode
// ---------------------------------------------------------------------------

/// How a room asks whether the player holds an item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HandshakeMode {
    /// The room calls the inventory directly and gets the answer back.
    #[default]
    Direct,
    /// The room publishes `check-key` and reads the `confirmation-check`
    /// reply that the inventory publishes before the first publish returns.
    Bus,
}

// ---------------------------------------------------------------------------
// SelectorConfig
// ---------------------------------------------------------------------------

/// Tuning for the room selector ("dice").
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SelectorConfig {
    /// Weight every room starts with.
    pub initial_weight: u32,

    /// How much weight a room loses each time it is completed.
    /// `None` drops it straight to zero, taking it out of the draw.
    pub completion_step: Option<u32>,

    /// Seed for reproducible draws. `None` seeds from the OS.
    pub seed: Option<u64>,
}

impl Default for SelectorConfig {
    fn default() -> Self {
        Self {
            initial_weight: 1,
            completion_step: None,
            seed: None,
        }
    }
}

// ---------------------------------------------------------------------------
// SessionConfig
// ---------------------------------------------------------------------------

/// Configuration for one game session.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Length of the session countdown in seconds.
    pub session_secs: u64,

    /// Key-check protocol handed to rooms.
    pub handshake: HandshakeMode,

    /// Items the player holds before entering any room.
    pub starting_items: Vec<ClueId>,

    pub selector: SelectorConfig,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            session_secs: 60 * 60,
            handshake: HandshakeMode::default(),
            starting_items: Vec::new(),
            selector: SelectorConfig::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_config_default() {
        let config = SessionConfig::default();
        assert_eq!(config.session_secs, 3600);
        assert_eq!(config.handshake, HandshakeMode::Direct);
        assert!(config.starting_items.is_empty());
        assert_eq!(config.selector.initial_weight, 1);
        assert_eq!(config.selector.completion_step, None);
    }

    #[test]
    fn test_partial_json_fills_defaults() {
        let config: SessionConfig = serde_json::from_str(
            r#"{ "handshake": "bus", "starting_items": ["key"], "selector": { "seed": 9 } }"#,
        )
        .unwrap();
        assert_eq!(config.handshake, HandshakeMode::Bus);
        assert_eq!(config.starting_items, vec![ClueId::new("key")]);
        assert_eq!(config.selector.seed, Some(9));
        assert_eq!(config.selector.initial_weight, 1);
        assert_eq!(config.session_secs, 3600);
    }
}
