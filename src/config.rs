//! Application configuration.
//!
//! The configuration is loaded from a JSON file (by default
//! `$XDG_CONFIG_HOME/smarttab/config.json`, or the path given with
//! `--config`).  This is daemon behaviour only; the button layout and
//! hotkeys live in the preference store, not here.
//!
//! # Example
//!
//! ```json
//! {
//!   "launcher": {
//!     "hide_on_activate": true,
//!     "hide_on_escape": true
//!   },
//!   "store": { "path": "/Users/me/.config/smarttab/preferences.json" },
//!   "socket_path": "/tmp/smarttab.sock"
//! }
//! ```

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Top-level configuration.
///
/// Every field is optional.  A minimal `{}` file is valid and all sections
/// fall back to their compiled-in defaults.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Overlay behaviour.
    #[serde(default)]
    pub launcher: LauncherConfig,

    /// Where preferences are persisted.
    #[serde(default)]
    pub store: StoreConfig,

    /// Command socket path.  `None` uses `$XDG_RUNTIME_DIR/smarttab.sock`.
    #[serde(default)]
    pub socket_path: Option<PathBuf>,
}

/// Overlay behaviour.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LauncherConfig {
    /// Hide the overlay after a button with an action is activated.
    pub hide_on_activate: bool,
    /// Hide the overlay when Esc is pressed while it is visible.
    pub hide_on_escape: bool,
}

impl Default for LauncherConfig {
    fn default() -> Self {
        Self {
            hide_on_activate: true,
            hide_on_escape: true,
        }
    }
}

/// Preference store location.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Preferences file.  `None` uses the platform config directory.
    pub path: Option<PathBuf>,
}

impl Config {
    /// Load configuration from a JSON file at `path`.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| ConfigError(format!("failed to read {}: {}", path.display(), e)))?;
        let config: Self = serde_json::from_str(&contents)
            .map_err(|e| ConfigError(format!("failed to parse {}: {}", path.display(), e)))?;
        Ok(config)
    }

    /// `<config dir>/smarttab/config.json`.
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(std::env::temp_dir)
            .join("smarttab")
            .join("config.json")
    }
}

/// Error from loading or parsing a configuration file.
#[derive(Debug, thiserror::Error)]
#[error("config error: {0}")]
pub struct ConfigError(String);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserialize_full_config() {
        let json = r#"{
            "launcher": { "hide_on_activate": false, "hide_on_escape": false },
            "store": { "path": "/tmp/prefs.json" },
            "socket_path": "/tmp/st.sock"
        }"#;
        let cfg: Config = serde_json::from_str(json).unwrap();
        assert!(!cfg.launcher.hide_on_activate);
        assert!(!cfg.launcher.hide_on_escape);
        assert_eq!(cfg.store.path, Some(PathBuf::from("/tmp/prefs.json")));
        assert_eq!(cfg.socket_path, Some(PathBuf::from("/tmp/st.sock")));
    }

    #[test]
    fn deserialize_empty_uses_defaults() {
        let cfg: Config = serde_json::from_str("{}").unwrap();
        assert_eq!(cfg.launcher, LauncherConfig::default());
        assert!(cfg.launcher.hide_on_activate);
        assert!(cfg.launcher.hide_on_escape);
        assert!(cfg.store.path.is_none());
        assert!(cfg.socket_path.is_none());
    }

    #[test]
    fn deserialize_partial_launcher() {
        let json = r#"{ "launcher": { "hide_on_escape": false } }"#;
        let cfg: Config = serde_json::from_str(json).unwrap();
        assert!(cfg.launcher.hide_on_activate);
        assert!(!cfg.launcher.hide_on_escape);
    }

    #[test]
    fn unknown_top_level_keys_ignored() {
        let json = r#"{ "launcher": {}, "future_section": { "key": 42 } }"#;
        // Unknown keys are silently ignored.
        let _cfg: Config = serde_json::from_str(json).unwrap();
    }

    #[test]
    fn load_missing_file_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = Config::load(&dir.path().join("nope.json")).unwrap_err();
        assert!(err.to_string().contains("failed to read"));
    }

    #[test]
    fn load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{ "launcher": { "hide_on_activate": false } }"#).unwrap();
        let cfg = Config::load(&path).unwrap();
        assert!(!cfg.launcher.hide_on_activate);
    }
}
