//! Hotkey chords and exact-match predicate.
//!
//! A [`HotkeyChord`] is a macOS virtual key code plus four independent
//! modifier flags.  An observed key event matches a chord only when the key
//! code is the same **and** every modifier flag is equal: holding an extra
//! modifier does not match.
//!
//! # Wire format
//!
//! ```json
//! {"keyCode":16,"command":true,"shift":true,"option":false,"control":false}
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;

/// Key codes of the modifier keys themselves (command, shift, caps lock,
/// option).  Pressing one of these alone is never a chord.
const MODIFIER_KEY_CODES: std::ops::RangeInclusive<u16> = 54..=57;

/// Virtual key code of the `Y` key, the default chord's key.
pub const DEFAULT_KEY_CODE: u16 = 16;

/// Virtual key code of the escape key.
pub const ESCAPE_KEY_CODE: u16 = 53;

// AppKit `NSEvent.modifierFlags` bits.
const NS_SHIFT: u64 = 1 << 17;
const NS_CONTROL: u64 = 1 << 18;
const NS_OPTION: u64 = 1 << 19;
const NS_COMMAND: u64 = 1 << 20;

// Carbon `RegisterEventHotKey` modifier bits.
const CARBON_CMD: u32 = 0x0100;
const CARBON_SHIFT: u32 = 0x0200;
const CARBON_OPTION: u32 = 0x0800;
const CARBON_CONTROL: u32 = 0x1000;

/// The set of modifier keys held during an observed key event.
///
/// Missing fields deserialize as `false`, so `{}` is "no modifiers".
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct Modifiers {
    pub command: bool,
    pub shift: bool,
    pub option: bool,
    pub control: bool,
}

impl Modifiers {
    /// No modifiers held.
    pub const NONE: Modifiers = Modifiers {
        command: false,
        shift: false,
        option: false,
        control: false,
    };

    /// Decode raw AppKit modifier flags.
    ///
    /// Only the four chord modifiers are kept; caps lock, function, numeric
    /// pad and device-dependent bits are dropped.
    pub fn from_event_flags(flags: u64) -> Self {
        Self {
            command: flags & NS_COMMAND != 0,
            shift: flags & NS_SHIFT != 0,
            option: flags & NS_OPTION != 0,
            control: flags & NS_CONTROL != 0,
        }
    }

    /// Whether at least one modifier is held.
    pub fn any(&self) -> bool {
        self.command || self.shift || self.option || self.control
    }
}

/// A global keyboard shortcut: one key plus an exact modifier set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HotkeyChord {
    pub key_code: u16,
    pub command: bool,
    pub shift: bool,
    pub option: bool,
    pub control: bool,
}

impl Default for HotkeyChord {
    /// `⌘+⇧+Y`.
    fn default() -> Self {
        Self::new(
            DEFAULT_KEY_CODE,
            Modifiers {
                command: true,
                shift: true,
                ..Modifiers::NONE
            },
        )
    }
}

/// Why a captured key press was not accepted as a chord.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CaptureError {
    /// A modifier key was pressed on its own.
    #[error("key code {0} is a modifier key")]
    ModifierKey(u16),
    /// No modifier was held; a bare key is unsuitable as a global shortcut.
    #[error("{0} has no modifier; hold at least one of ⌘ ⇧ ⌥ ⌃")]
    NoModifier(String),
}

impl HotkeyChord {
    pub fn new(key_code: u16, modifiers: Modifiers) -> Self {
        Self {
            key_code,
            command: modifiers.command,
            shift: modifiers.shift,
            option: modifiers.option,
            control: modifiers.control,
        }
    }

    /// Build a chord from a recorded key press.
    ///
    /// Unlike [`new`](Self::new), this enforces the recorder's rules: the
    /// key must not be a modifier key, and at least one modifier must be
    /// held.
    pub fn capture(key_code: u16, modifiers: Modifiers) -> Result<Self, CaptureError> {
        if MODIFIER_KEY_CODES.contains(&key_code) {
            return Err(CaptureError::ModifierKey(key_code));
        }
        let chord = Self::new(key_code, modifiers);
        if !modifiers.any() {
            return Err(CaptureError::NoModifier(chord.display()));
        }
        Ok(chord)
    }

    /// The chord's modifier set.
    pub fn modifiers(&self) -> Modifiers {
        Modifiers {
            command: self.command,
            shift: self.shift,
            option: self.option,
            control: self.control,
        }
    }

    /// Whether an observed key event triggers this chord.
    pub fn matches(&self, key_code: u16, modifiers: Modifiers) -> bool {
        matches(self, key_code, modifiers)
    }

    /// Modifier mask for Carbon's `RegisterEventHotKey`.
    pub fn carbon_modifiers(&self) -> u32 {
        let mut mask = 0;
        if self.command {
            mask |= CARBON_CMD;
        }
        if self.shift {
            mask |= CARBON_SHIFT;
        }
        if self.option {
            mask |= CARBON_OPTION;
        }
        if self.control {
            mask |= CARBON_CONTROL;
        }
        mask
    }

    /// Human-readable form, e.g. `⌘+⇧+Y`.
    pub fn display(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for HotkeyChord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let symbols = [
            (self.command, "⌘"),
            (self.shift, "⇧"),
            (self.option, "⌥"),
            (self.control, "⌃"),
        ];
        for (_, symbol) in symbols.iter().filter(|(held, _)| *held) {
            write!(f, "{}+", symbol)?;
        }
        match key_name(self.key_code) {
            Some(name) => write!(f, "{}", name),
            None => write!(f, "Key({})", self.key_code),
        }
    }
}

/// Exact-match predicate between a chord and an observed key event.
///
/// True iff the key codes are equal and all four modifier flags are
/// pairwise equal.
pub fn matches(chord: &HotkeyChord, key_code: u16, modifiers: Modifiers) -> bool {
    key_code == chord.key_code
        && modifiers.command == chord.command
        && modifiers.shift == chord.shift
        && modifiers.option == chord.option
        && modifiers.control == chord.control
}

/// Name of a virtual key code on an ANSI keyboard, if known.
pub fn key_name(key_code: u16) -> Option<&'static str> {
    let name = match key_code {
        0 => "A",
        1 => "S",
        2 => "D",
        3 => "F",
        4 => "H",
        5 => "G",
        6 => "Z",
        7 => "X",
        8 => "C",
        9 => "V",
        11 => "B",
        12 => "Q",
        13 => "W",
        14 => "E",
        15 => "R",
        16 => "Y",
        17 => "T",
        24 => "=",
        27 => "-",
        30 => "]",
        31 => "O",
        32 => "U",
        33 => "[",
        34 => "I",
        35 => "P",
        36 => "Return",
        37 => "L",
        38 => "J",
        40 => "K",
        41 => ";",
        43 => ",",
        44 => "/",
        45 => "N",
        46 => "M",
        47 => ".",
        48 => "Tab",
        49 => "Space",
        50 => "`",
        51 => "Delete",
        53 => "Esc",
        123 => "←",
        124 => "→",
        125 => "↓",
        126 => "↑",
        _ => return None,
    };
    Some(name)
}

/// The configured chords: a primary one and an optional secondary one.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HotkeySet {
    pub primary: HotkeyChord,
    pub secondary: Option<HotkeyChord>,
}

impl HotkeySet {
    /// Whether either chord matches the observed event.
    pub fn matches(&self, key_code: u16, modifiers: Modifiers) -> bool {
        self.primary.matches(key_code, modifiers)
            || self
                .secondary
                .is_some_and(|chord| chord.matches(key_code, modifiers))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cmd() -> Modifiers {
        Modifiers {
            command: true,
            ..Modifiers::NONE
        }
    }

    fn cmd_backtick() -> HotkeyChord {
        HotkeyChord {
            key_code: 50,
            command: true,
            shift: false,
            option: false,
            control: false,
        }
    }

    #[test]
    fn exact_modifiers_match() {
        assert!(matches(&cmd_backtick(), 50, cmd()));
    }

    #[test]
    fn extra_modifier_does_not_match() {
        let observed = Modifiers {
            shift: true,
            ..cmd()
        };
        assert!(!matches(&cmd_backtick(), 50, observed));
    }

    #[test]
    fn missing_modifier_does_not_match() {
        assert!(!matches(&cmd_backtick(), 50, Modifiers::NONE));
    }

    #[test]
    fn different_key_code_does_not_match() {
        assert!(!matches(&cmd_backtick(), 49, cmd()));
    }

    #[test]
    fn negating_a_flag_on_both_sides_still_matches() {
        let base = HotkeyChord::default();
        let observed = base.modifiers();
        let flips: [fn(&mut Modifiers); 4] = [
            |m| m.command = !m.command,
            |m| m.shift = !m.shift,
            |m| m.option = !m.option,
            |m| m.control = !m.control,
        ];
        for flip in flips {
            let mut chord_mods = base.modifiers();
            flip(&mut chord_mods);
            let chord = HotkeyChord::new(base.key_code, chord_mods);

            let mut both = observed;
            flip(&mut both);
            assert!(chord.matches(base.key_code, both));

            // Only the chord side flipped.
            assert!(!chord.matches(base.key_code, observed));
        }
    }

    #[test]
    fn bare_chord_matches_only_unmodified_event() {
        let chord = HotkeyChord::new(12, Modifiers::NONE);
        assert!(chord.matches(12, Modifiers::NONE));
        assert!(!chord.matches(12, cmd()));
    }

    #[test]
    fn decode_event_flags_ignores_other_bits() {
        let caps_lock = 1 << 16;
        let function = 1 << 23;
        let flags = NS_COMMAND | NS_OPTION | caps_lock | function;
        let mods = Modifiers::from_event_flags(flags);
        assert_eq!(
            mods,
            Modifiers {
                command: true,
                option: true,
                ..Modifiers::NONE
            }
        );
    }

    #[test]
    fn capture_rejects_modifier_keys() {
        for code in 54..=57 {
            assert_eq!(
                HotkeyChord::capture(code, cmd()),
                Err(CaptureError::ModifierKey(code))
            );
        }
    }

    #[test]
    fn capture_rejects_bare_key() {
        let err = HotkeyChord::capture(12, Modifiers::NONE).unwrap_err();
        assert!(matches!(err, CaptureError::NoModifier(ref s) if s == "Q"));
    }

    #[test]
    fn capture_accepts_modified_key() {
        let chord = HotkeyChord::capture(50, cmd()).unwrap();
        assert_eq!(chord, cmd_backtick());
    }

    #[test]
    fn display_orders_modifiers() {
        let chord = HotkeyChord::new(
            16,
            Modifiers {
                command: true,
                shift: true,
                option: true,
                control: true,
            },
        );
        assert_eq!(chord.display(), "⌘+⇧+⌥+⌃+Y");
        assert_eq!(HotkeyChord::default().display(), "⌘+⇧+Y");
    }

    #[test]
    fn display_unknown_key_code() {
        let chord = HotkeyChord::new(99, cmd());
        assert_eq!(chord.display(), "⌘+Key(99)");
    }

    #[test]
    fn carbon_mask() {
        assert_eq!(HotkeyChord::default().carbon_modifiers(), 0x0300);
        assert_eq!(cmd_backtick().carbon_modifiers(), 0x0100);
    }

    #[test]
    fn chord_wire_format_uses_camel_case() {
        let json = serde_json::to_value(HotkeyChord::default()).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "keyCode": 16,
                "command": true,
                "shift": true,
                "option": false,
                "control": false
            })
        );
    }

    #[test]
    fn partial_modifiers_deserialize() {
        let mods: Modifiers = serde_json::from_str(r#"{"command":true}"#).unwrap();
        assert_eq!(mods, cmd());
    }

    #[test]
    fn hotkey_set_checks_secondary() {
        let set = HotkeySet {
            primary: HotkeyChord::default(),
            secondary: Some(cmd_backtick()),
        };
        assert!(set.matches(50, cmd()));
        assert!(set.matches(16, HotkeyChord::default().modifiers()));
        assert!(!set.matches(50, Modifiers::NONE));

        let primary_only = HotkeySet::default();
        assert!(!primary_only.matches(50, cmd()));
    }
}
