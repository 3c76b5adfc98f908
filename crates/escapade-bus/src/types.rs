//! Core identity and message types shared by every Escapade layer.
//!
//! Rooms, the session, and the level-content layer all talk in terms of
//! these types. None of them carry behavior; they name things.

use serde::{Deserialize, Serialize};

use std::fmt;
use std::str::FromStr;

use crate::ProtocolError;

// ---------------------------------------------------------------------------
// Identity types
// ---------------------------------------------------------------------------

/// Stable identity of a room (a level).
///
/// This is the "die face" the room selector draws, so it is a small
/// number rather than a name. A Morgue configured as room 7 publishes `7`
/// on the completion feed when it is solved.
///
/// `#[serde(transparent)]` keeps the JSON form a plain number.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct RoomId(pub u32);

impl fmt::Display for RoomId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "R-{}", self.0)
    }
}

/// Identifier of a collectible clue, unique within a room's vocabulary.
///
/// Clue ids double as inventory item ids: a key collected in one room is
/// banked under its clue id and later checked for by another room.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ClueId(pub String);

impl ClueId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ClueId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ClueId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// Identifier of a fixed-position trigger (a fixture) inside a room.
///
/// The scene runtime owns the geometry; the core only sees the id of the
/// fixture the player overlapped.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FixtureId(pub String);

impl FixtureId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }
}

impl fmt::Display for FixtureId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for FixtureId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

// ---------------------------------------------------------------------------
// Destination: where the level layer should go next
// ---------------------------------------------------------------------------

/// Target of a room transition handed back to the level-content layer.
///
/// JSON: `"hub"` or `{ "room": 7 }`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Destination {
    /// The main scene between rooms, where the die is rolled.
    Hub,
    /// A specific room.
    Room(RoomId),
}

impl fmt::Display for Destination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Hub => f.write_str("MainScene"),
            Self::Room(id) => write!(f, "{id}"),
        }
    }
}

// ---------------------------------------------------------------------------
// Topic + Message: coordination bus vocabulary
// ---------------------------------------------------------------------------

/// Named topics on the coordination bus.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Topic {
    /// Room → session: "does the player hold this item?"
    CheckKey,
    /// Session → room: the answer to the last `CheckKey`.
    ConfirmationCheck,
    /// Room → inventory display: a clue was banked.
    UpdateBank,
}

impl Topic {
    pub const ALL: [Topic; 3] = [Self::CheckKey, Self::ConfirmationCheck, Self::UpdateBank];

    /// The topic's wire name, as used by the level content.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::CheckKey => "check-key",
            Self::ConfirmationCheck => "confirmation-check",
            Self::UpdateBank => "update-bank",
        }
    }
}

impl fmt::Display for Topic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Topic {
    type Err = ProtocolError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Topic::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| ProtocolError::UnknownTopic(s.to_string()))
    }
}

/// A message on the coordination bus: a topic together with its payload.
///
/// Each variant belongs to exactly one [`Topic`], so a message can never
/// be published with a payload that does not match its topic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Message {
    /// Request: does the player hold `item`?
    CheckKey(ClueId),
    /// Reply to `CheckKey`.
    ConfirmationCheck(bool),
    /// Broadcast: `clue` was added to the bank.
    UpdateBank(ClueId),
}

impl Message {
    pub fn topic(&self) -> Topic {
        match self {
            Self::CheckKey(_) => Topic::CheckKey,
            Self::ConfirmationCheck(_) => Topic::ConfirmationCheck,
            Self::UpdateBank(_) => Topic::UpdateBank,
        }
    }
}

// =========================================================================
// Tests
// =========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_room_id_serializes_as_plain_number() {
        let json = serde_json::to_string(&RoomId(7)).unwrap();
        assert_eq!(json, "7");
        let back: RoomId = serde_json::from_str("7").unwrap();
        assert_eq!(back, RoomId(7));
    }

    #[test]
    fn test_room_id_display() {
        assert_eq!(RoomId(1).to_string(), "R-1");
    }

    #[test]
    fn test_clue_id_serializes_as_plain_string() {
        let json = serde_json::to_string(&ClueId::new("bone saw")).unwrap();
        assert_eq!(json, "\"bone saw\"");
    }

    #[test]
    fn test_destination_json_shapes() {
        assert_eq!(serde_json::to_string(&Destination::Hub).unwrap(), "\"hub\"");
        assert_eq!(
            serde_json::to_string(&Destination::Room(RoomId(3))).unwrap(),
            r#"{"room":3}"#
        );
        let d: Destination = serde_json::from_str(r#"{"room":1}"#).unwrap();
        assert_eq!(d, Destination::Room(RoomId(1)));
    }

    #[test]
    fn test_destination_display_uses_main_scene_for_hub() {
        assert_eq!(Destination::Hub.to_string(), "MainScene");
        assert_eq!(Destination::Room(RoomId(7)).to_string(), "R-7");
    }

    #[test]
    fn test_topic_names_round_trip() {
        for topic in Topic::ALL {
            assert_eq!(topic.as_str().parse::<Topic>().unwrap(), topic);
        }
    }

    #[test]
    fn test_unknown_topic_is_rejected() {
        let err = "completed".parse::<Topic>().unwrap_err();
        assert!(matches!(err, ProtocolError::UnknownTopic(ref t) if t == "completed"));
    }

    #[test]
    fn test_message_topic_matches_variant() {
        assert_eq!(Message::CheckKey("key".into()).topic(), Topic::CheckKey);
        assert_eq!(Message::ConfirmationCheck(true).topic(), Topic::ConfirmationCheck);
        assert_eq!(Message::UpdateBank("soap".into()).topic(), Topic::UpdateBank);
    }
}
