//! Button bindings: one cell of the launcher grid.
//!
//! A [`ButtonBinding`] ties a physical key label to an action.  Its `id` is
//! assigned once and survives every edit and save/reload cycle, so UI
//! selection state can be keyed on it.

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// What a button does when activated.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ActionKind {
    /// Unassigned.
    #[default]
    None,
    /// Launch the application bundle at `path`.
    LaunchApp,
    /// Open the folder at `path`.
    OpenFolder,
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ActionKind::None => write!(f, "none"),
            ActionKind::LaunchApp => write!(f, "launch app"),
            ActionKind::OpenFolder => write!(f, "open folder"),
        }
    }
}

/// The resolved action handed to the external action executor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum LauncherAction {
    None,
    LaunchApp { path: String },
    OpenFolder { path: String },
}

/// One key → action cell.
///
/// Serialized with the field names the preferences store has always used:
///
/// ```json
/// {"id":"…","key":"T","label":"Terminal","actionType":"launchApp",
///  "path":"/System/Applications/Utilities/Terminal.app"}
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ButtonBinding {
    pub id: Uuid,
    /// Single-character label of the physical key.
    pub key: String,
    pub label: String,
    #[serde(default)]
    pub action_type: ActionKind,
    /// Filesystem path; meaningful only when `action_type` is not `None`.
    #[serde(default)]
    pub path: String,
}

impl ButtonBinding {
    /// Create a binding with a freshly generated identifier.
    pub fn new(
        key: impl Into<String>,
        label: impl Into<String>,
        action_type: ActionKind,
        path: impl Into<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            key: key.into(),
            label: label.into(),
            action_type,
            path: path.into(),
        }
    }

    /// The key label normalised for lookups.
    pub fn normalized_key(&self) -> String {
        self.key.to_uppercase()
    }

    /// Whether this binding answers to `key`, ignoring case.
    pub fn answers_to(&self, key: &str) -> bool {
        self.key.to_uppercase() == key.to_uppercase()
    }

    /// Resolve the action this binding triggers.
    pub fn action(&self) -> LauncherAction {
        match self.action_type {
            ActionKind::None => LauncherAction::None,
            ActionKind::LaunchApp => LauncherAction::LaunchApp {
                path: self.path.clone(),
            },
            ActionKind::OpenFolder => LauncherAction::OpenFolder {
                path: self.path.clone(),
            },
        }
    }
}
