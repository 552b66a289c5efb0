//! Commands and responses exchanged with the host OS shim.
//!
//! The shim owns windows, input monitors and process launching.  It
//! forwards what it observes as [`Command`]s and acts on the
//! [`Response`] it gets back for each one.
//!
//! # Wire format
//!
//! One JSON value per line in each direction:
//!
//! ```json
//! {"KeyDown":{"key_code":16,"modifiers":{"command":true,"shift":true}}}
//! {"KeyDown":{"key_code":17,"characters":"t"}}
//! "Toggle"
//! {"RecordHotkey":{"key_code":50,"modifiers":{"command":true}}}
//! {"UpdateButton":{"row":0,"index":1,"label":"Web","action":"launchApp","path":"/Applications/Safari.app"}}
//! {"UpdateBinding":{"binding":{"id":"67e55044-10b1-426f-9247-bb680e5fe0c8","key":"Q","label":"Notes","actionType":"openFolder","path":"/Users/me/notes"}}}
//! ```
//!
//! Raw AppKit modifier flags are accepted too, as a number:
//! `{"KeyDown":{"key_code":16,"modifiers":1179648}}`.

use crate::binding::{ActionKind, ButtonBinding, LauncherAction};
use crate::grid::Grid;
use crate::hotkey::{HotkeyChord, Modifiers};
use serde::de::Error as DeError;
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// Which configured chord a recorded hotkey replaces.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HotkeySlot {
    #[default]
    Primary,
    Secondary,
}

impl fmt::Display for HotkeySlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HotkeySlot::Primary => write!(f, "primary"),
            HotkeySlot::Secondary => write!(f, "secondary"),
        }
    }
}

/// Wire format for modifiers: a `{command, shift, option, control}` object
/// or the raw `NSEvent.modifierFlags` integer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct WireModifiers(pub Modifiers);

impl<'de> Deserialize<'de> for WireModifiers {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        use serde::de::Visitor;
        struct V;
        impl<'de> Visitor<'de> for V {
            type Value = WireModifiers;
            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "modifier object or raw modifier flags")
            }
            fn visit_u64<E>(self, flags: u64) -> Result<WireModifiers, E> {
                Ok(WireModifiers(Modifiers::from_event_flags(flags)))
            }
            fn visit_i64<E>(self, flags: i64) -> Result<WireModifiers, E>
            where
                E: DeError,
            {
                u64::try_from(flags)
                    .map(|f| WireModifiers(Modifiers::from_event_flags(f)))
                    .map_err(|_| DeError::custom("modifier flags must be non-negative"))
            }
            fn visit_map<A>(self, map: A) -> Result<WireModifiers, A::Error>
            where
                A: serde::de::MapAccess<'de>,
            {
                Modifiers::deserialize(serde::de::value::MapAccessDeserializer::new(map))
                    .map(WireModifiers)
            }
        }
        deserializer.deserialize_any(V)
    }
}

/// Every request the launcher understands.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Command {
    /// A key went down.  `characters` is the key's text ignoring
    /// modifiers, used to find the button to activate.
    KeyDown {
        key_code: u16,
        #[serde(default)]
        modifiers: WireModifiers,
        #[serde(default)]
        characters: Option<String>,
    },

    /// Flip overlay visibility.
    Toggle,
    /// Show the overlay.
    Show,
    /// Hide the overlay.
    Hide,

    /// A key press captured by the hotkey recorder, to become the chord in
    /// `slot`.
    RecordHotkey {
        key_code: u16,
        #[serde(default)]
        modifiers: WireModifiers,
        #[serde(default)]
        slot: HotkeySlot,
    },

    /// Remove the secondary chord.
    ClearSecondaryHotkey,

    /// Edit the button at `(row, index)`.
    UpdateButton {
        row: usize,
        index: usize,
        label: String,
        #[serde(default)]
        action: ActionKind,
        #[serde(default)]
        path: String,
    },

    /// Replace the button with the same `id` as `binding`, wherever it
    /// sits in the grid.
    UpdateBinding { binding: ButtonBinding },

    /// Ask for the current grid.
    GetLayout,
    /// Ask for the configured chords.
    GetHotkeys,
    /// Ask for overlay visibility.
    Status,
}

/// How the OS layer should present and register a chord.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChordInfo {
    pub chord: HotkeyChord,
    /// e.g. `⌘+⇧+Y`.
    pub display: String,
    /// Carbon `RegisterEventHotKey` modifier mask.
    pub carbon_modifiers: u32,
}

impl From<HotkeyChord> for ChordInfo {
    fn from(chord: HotkeyChord) -> Self {
        Self {
            chord,
            display: chord.display(),
            carbon_modifiers: chord.carbon_modifiers(),
        }
    }
}

/// The launcher's answer to one [`Command`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Response {
    /// Current overlay visibility (after the command took effect).
    Visibility { visible: bool },
    /// Run this action.  `visible` says whether the overlay stays up.
    Activate { action: LauncherAction, visible: bool },
    /// Nothing to do.
    Ignored,
    /// The button grid.
    Layout(Grid),
    /// The configured chords.
    Hotkeys {
        primary: ChordInfo,
        secondary: Option<ChordInfo>,
    },
    /// The command failed.
    Error(String),
}
