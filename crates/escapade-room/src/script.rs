//! Declarative trigger scripts and the [`Stage`] they play on.
//!
//! A fixture's behaviour ("play a sound, show a note, wait three seconds,
//! hand over the clue, go back to the hub") is a list of [`Step`]s loaded
//! with the room configuration. Everything a step does outside the core
//! goes through [`Stage`], which the scene runtime implements.

use std::time::Duration;

use escapade_bus::{ClueId, Destination};
use serde::{Deserialize, Serialize};

/// How long a popup stays up unless a step says otherwise.
pub const DEFAULT_POPUP_MS: u64 = 4750;

/// Where a message is drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Placement {
    Top,
    #[default]
    Center,
}

fn default_popup_ms() -> u64 {
    DEFAULT_POPUP_MS
}

/// One instruction in a fixture script.
///
/// JSON form is internally tagged: `{ "step": "sound", "cue": "zipper" }`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "step", rename_all = "snake_case")]
pub enum Step {
    Message {
        text: String,
        #[serde(default)]
        placement: Placement,
    },
    Sound {
        cue: String,
    },
    /// Shows an image, dismissed automatically after `dismiss_after_ms`.
    Popup {
        image: String,
        #[serde(default = "default_popup_ms")]
        dismiss_after_ms: u64,
    },
    /// Hands the player a clue: broadcast, popup and sound per the clue's
    /// declaration, then record it in the ledger.
    Collect {
        clue: ClueId,
    },
    /// Takes time off the session countdown.
    Penalize {
        secs: u64,
    },
    /// Runs the rest of the script `ms` later.
    Wait {
        ms: u64,
    },
    /// Asks whether the player holds `item` and continues with one branch.
    CheckKey {
        item: ClueId,
        #[serde(default)]
        unlocked: Vec<Step>,
        #[serde(default)]
        locked: Vec<Step>,
    },
    /// Leaves the room. Nothing after this step runs.
    AdvanceTo {
        destination: Destination,
    },
}

impl Step {
    /// Every clue this step, or any nested branch, collects.
    pub fn collected_clues(&self) -> Vec<&ClueId> {
        match self {
            Self::Collect { clue } => vec![clue],
            Self::CheckKey {
                unlocked, locked, ..
            } => unlocked
                .iter()
                .chain(locked)
                .flat_map(Step::collected_clues)
                .collect(),
            _ => Vec::new(),
        }
    }
}

/// The scene runtime as the core sees it: text, images, audio and scene
/// changes.
///
/// Calls are fire-and-forget. The runtime decides how to draw or play
/// them.
pub trait Stage {
    fn show_message(&mut self, text: &str, placement: Placement);

    fn show_popup(&mut self, image: &str);

    fn dismiss_popup(&mut self, image: &str);

    fn play_sound(&mut self, cue: &str);

    /// Switches scenes. The room that asked is torn down afterwards.
    fn advance_to(&mut self, destination: Destination);

    /// Redraws the room countdown label. Called on every running tick.
    fn update_countdown(&mut self, _remaining: Duration) {}
}
