//! Room configuration and phase machine.

use std::collections::HashSet;
use std::time::Duration;

use escapade_bus::{ClueId, FixtureId, RoomId};
use serde::{Deserialize, Serialize};

use crate::{ConfigError, Step};

/// Room countdown used when a configuration doesn't set one.
pub const DEFAULT_COUNTDOWN_SECS: u64 = 120;

fn default_countdown_secs() -> u64 {
    DEFAULT_COUNTDOWN_SECS
}

fn default_true() -> bool {
    true
}

// ---------------------------------------------------------------------------
// ClueSpec / FixtureSpec
// ---------------------------------------------------------------------------

/// A clue the room can hand out, with its acquisition effect.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClueSpec {
    pub id: ClueId,

    /// Whether collecting it broadcasts `update-bank` to the inventory.
    #[serde(default = "default_true")]
    pub broadcast: bool,

    /// Image shown for the default popup duration when collected.
    #[serde(default)]
    pub popup: Option<String>,

    /// Sound cue played when collected.
    #[serde(default)]
    pub sound: Option<String>,
}

impl ClueSpec {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: ClueId::new(id),
            broadcast: true,
            popup: None,
            sound: None,
        }
    }

    pub fn silent(mut self) -> Self {
        self.broadcast = false;
        self
    }

    pub fn with_popup(mut self, image: impl Into<String>) -> Self {
        self.popup = Some(image.into());
        self
    }

    pub fn with_sound(mut self, cue: impl Into<String>) -> Self {
        self.sound = Some(cue.into());
        self
    }
}

/// A fixed-position trigger and the script it runs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FixtureSpec {
    pub id: FixtureId,
    #[serde(default)]
    pub script: Vec<Step>,
}

impl FixtureSpec {
    pub fn new(id: impl Into<String>, script: Vec<Step>) -> Self {
        Self {
            id: FixtureId::new(id),
            script,
        }
    }
}

// ---------------------------------------------------------------------------
// RoomConfig
// ---------------------------------------------------------------------------

/// Everything that makes one room different from another.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoomConfig {
    /// Number the room reports on the completion feed.
    pub id: RoomId,

    pub name: String,

    /// Clues needed to complete the room.
    pub required_clues: usize,

    #[serde(default = "default_countdown_secs")]
    pub countdown_secs: u64,

    #[serde(default)]
    pub clues: Vec<ClueSpec>,

    #[serde(default)]
    pub fixtures: Vec<FixtureSpec>,

    /// Script run when the room countdown reaches zero.
    #[serde(default)]
    pub on_expire: Vec<Step>,
}

impl RoomConfig {
    pub fn new(id: RoomId, name: impl Into<String>, required_clues: usize) -> Self {
        Self {
            id,
            name: name.into(),
            required_clues,
            countdown_secs: DEFAULT_COUNTDOWN_SECS,
            clues: Vec::new(),
            fixtures: Vec::new(),
            on_expire: Vec::new(),
        }
    }

    pub fn countdown(&self) -> Duration {
        Duration::from_secs(self.countdown_secs)
    }

    pub fn clue(&self, id: &ClueId) -> Option<&ClueSpec> {
        self.clues.iter().find(|c| &c.id == id)
    }

    pub fn fixture(&self, id: &FixtureId) -> Option<&FixtureSpec> {
        self.fixtures.iter().find(|f| &f.id == id)
    }

    /// Checks the configuration is playable.
    ///
    /// A valid room has a positive countdown, `0 < required_clues <=
    /// clues.len()`, unique clue and fixture ids, and only collects clues it
    /// declares.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.countdown_secs == 0 {
            return Err(ConfigError::ZeroCountdown(self.id));
        }
        if self.required_clues == 0 {
            return Err(ConfigError::NothingRequired(self.id));
        }
        if self.required_clues > self.clues.len() {
            return Err(ConfigError::RequiredExceedsDeclared {
                room: self.id,
                required: self.required_clues,
                declared: self.clues.len(),
            });
        }

        let mut clue_ids = HashSet::new();
        for clue in &self.clues {
            if !clue_ids.insert(&clue.id) {
                return Err(ConfigError::DuplicateClue(self.id, clue.id.clone()));
            }
        }

        let mut fixture_ids = HashSet::new();
        for fixture in &self.fixtures {
            if !fixture_ids.insert(&fixture.id) {
                return Err(ConfigError::DuplicateFixture(self.id, fixture.id.clone()));
            }
        }

        let scripts = self
            .fixtures
            .iter()
            .flat_map(|f| f.script.iter())
            .chain(self.on_expire.iter());
        for step in scripts {
            if let Some(clue) = step
                .collected_clues()
                .into_iter()
                .find(|c| !clue_ids.contains(c))
            {
                return Err(ConfigError::UndeclaredClue(self.id, clue.clone()));
            }
        }

        Ok(())
    }
}

// ---------------------------------------------------------------------------
// RoomPhase
// ---------------------------------------------------------------------------

/// The lifecycle phase of a room episode.
///
/// ```text
/// Running → Expired → Exited
/// Running ──────────→ Exited
/// ```
///
/// - **Running**: countdown ticking, fixtures accept the first trigger.
/// - **Expired**: countdown hit zero. Pending actions still run, triggers
///   are ignored.
/// - **Exited**: the room asked the stage to move on. Nothing runs anymore.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RoomPhase {
    Running,
    Expired,
    Exited,
}

impl RoomPhase {
    /// Returns `true` while fixtures may still be triggered.
    pub fn accepts_triggers(&self) -> bool {
        matches!(self, Self::Running)
    }

    /// Returns `true` until the room has exited.
    pub fn is_live(&self) -> bool {
        !matches!(self, Self::Exited)
    }

    pub fn can_transition_to(self, target: Self) -> bool {
        matches!(
            (self, target),
            (Self::Running, Self::Expired)
                | (Self::Running, Self::Exited)
                | (Self::Expired, Self::Exited)
        )
    }
}

impl std::fmt::Display for RoomPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Running => write!(f, "Running"),
            Self::Expired => write!(f, "Expired"),
            Self::Exited => write!(f, "Exited"),
        }
    }
}
