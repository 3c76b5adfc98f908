//! The room catalog: every room a game can offer, loaded from JSON.
//!
//! ```json
//! { "rooms": [ { "id": 7, "name": "Morgue", "required_clues": 4, ... } ] }
//! ```

use std::collections::HashSet;
use std::path::Path;

use escapade_bus::RoomId;
use escapade_room::RoomConfig;
use serde::{Deserialize, Serialize};

use crate::EscapadeError;

/// Validated room configurations with unique ids.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoomCatalog {
    rooms: Vec<RoomConfig>,
}

impl RoomCatalog {
    /// Builds a catalog, validating every room.
    pub fn new(rooms: impl IntoIterator<Item = RoomConfig>) -> Result<Self, EscapadeError> {
        let catalog = Self {
            rooms: rooms.into_iter().collect(),
        };
        catalog.validate()?;
        Ok(catalog)
    }

    pub fn from_json(json: &str) -> Result<Self, EscapadeError> {
        let catalog: Self = serde_json::from_str(json)?;
        catalog.validate()?;
        tracing::debug!(rooms = catalog.len(), "room catalog loaded");
        Ok(catalog)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, EscapadeError> {
        let json = std::fs::read_to_string(path.as_ref())?;
        Self::from_json(&json)
    }

    fn validate(&self) -> Result<(), EscapadeError> {
        let mut seen = HashSet::new();
        for room in &self.rooms {
            if !seen.insert(room.id) {
                return Err(EscapadeError::DuplicateRoom(room.id));
            }
        }
        for room in &self.rooms {
            room.validate()?;
        }
        Ok(())
    }

    pub fn get(&self, id: RoomId) -> Option<&RoomConfig> {
        self.rooms.iter().find(|r| r.id == id)
    }

    pub fn ids(&self) -> impl Iterator<Item = RoomId> + '_ {
        self.rooms.iter().map(|r| r.id)
    }

    pub fn rooms(&self) -> &[RoomConfig] {
        &self.rooms
    }

    pub fn len(&self) -> usize {
        self.rooms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rooms.is_empty()
    }
}
