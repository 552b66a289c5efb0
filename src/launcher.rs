//! The orchestrator that ties hotkeys, the button grid and overlay
//! visibility together.
//!
//! [`Launcher`] owns the [`ConfigManager`] and reacts to [`Command`]s by
//! updating visibility or configuration and describing, in its
//! [`Response`], what the OS layer should do next.

use crate::binding::LauncherAction;
use crate::command::{ChordInfo, Command, HotkeySlot, Response};
use crate::config::LauncherConfig;
use crate::hotkey::{CaptureError, HotkeyChord, Modifiers, ESCAPE_KEY_CODE};
use crate::manager::{ConfigManager, ManagerError};
use crate::traits::PreferenceStore;
use log::{debug, info};

/// Possible errors from the launcher.
#[derive(Debug, thiserror::Error)]
pub enum LauncherError {
    /// Loading or saving configuration failed.
    #[error(transparent)]
    Config(#[from] ManagerError),
    /// A recorded key press is not a usable chord.
    #[error("rejected hotkey: {0}")]
    Capture(#[from] CaptureError),
}

/// Overlay state machine.
///
/// # Typical usage
///
/// ```ignore
/// let manager = ConfigManager::load(store, &Template::builtin_for_current_user())?;
/// let mut launcher = Launcher::new(manager, LauncherConfig::default());
/// let response = launcher.handle(Command::Toggle)?;
/// ```
pub struct Launcher<S: PreferenceStore> {
    manager: ConfigManager<S>,
    config: LauncherConfig,
    visible: bool,
}

impl<S: PreferenceStore> Launcher<S> {
    /// Create a launcher with the overlay hidden.
    pub fn new(manager: ConfigManager<S>, config: LauncherConfig) -> Self {
        Self {
            manager,
            config,
            visible: false,
        }
    }

    /// Whether the overlay is currently shown.
    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// Shared reference to the configuration manager.
    pub fn manager(&self) -> &ConfigManager<S> {
        &self.manager
    }

    /// Process a single [`Command`].
    pub fn handle(&mut self, cmd: Command) -> Result<Response, LauncherError> {
        let response = match cmd {
            Command::KeyDown {
                key_code,
                modifiers,
                characters,
            } => self.key_down(key_code, modifiers.0, characters.as_deref()),

            Command::Toggle => {
                let visible = !self.visible;
                self.set_visible(visible)
            }
            Command::Show => self.set_visible(true),
            Command::Hide => self.set_visible(false),

            Command::RecordHotkey {
                key_code,
                modifiers,
                slot,
            } => {
                let chord = HotkeyChord::capture(key_code, modifiers.0)?;
                info!("recorded {} hotkey {}", slot, chord);
                match slot {
                    HotkeySlot::Primary => self.manager.set_primary(chord)?,
                    HotkeySlot::Secondary => self.manager.set_secondary(Some(chord))?,
                }
                self.hotkeys()
            }

            Command::ClearSecondaryHotkey => {
                self.manager.set_secondary(None)?;
                self.hotkeys()
            }

            Command::UpdateButton {
                row,
                index,
                label,
                action,
                path,
            } => {
                let updated = self.manager.update_button(row, index, label, action, path)?;
                info!(
                    "button {} now {:?} ({}) {}",
                    updated.key, updated.label, updated.action_type, updated.path
                );
                Response::Layout(self.manager.grid().clone())
            }

            Command::UpdateBinding { binding } => {
                info!("button {} ({}) replaced", binding.key, binding.id);
                self.manager.update_binding(binding)?;
                Response::Layout(self.manager.grid().clone())
            }

            Command::GetLayout => Response::Layout(self.manager.grid().clone()),
            Command::GetHotkeys => self.hotkeys(),
            Command::Status => Response::Visibility {
                visible: self.visible,
            },
        };
        Ok(response)
    }

    /// Route one key press.
    ///
    /// The configured chords toggle the overlay whether or not it is shown.
    /// Every other key only matters while the overlay is visible: a key
    /// with a button activates it, Esc hides the overlay.
    fn key_down(&mut self, key_code: u16, modifiers: Modifiers, characters: Option<&str>) -> Response {
        if self.manager.hotkeys().matches(key_code, modifiers) {
            debug!("hotkey pressed");
            let visible = !self.visible;
            return self.set_visible(visible);
        }

        if !self.visible {
            return Response::Ignored;
        }

        if let Some(binding) = characters
            .filter(|c| !c.is_empty())
            .and_then(|c| self.manager.grid().find_by_key(c))
        {
            let action = binding.action();
            info!("activating {} ({})", binding.key, binding.label);
            if action != LauncherAction::None && self.config.hide_on_activate {
                self.visible = false;
            }
            return Response::Activate {
                action,
                visible: self.visible,
            };
        }

        if key_code == ESCAPE_KEY_CODE && self.config.hide_on_escape {
            return self.set_visible(false);
        }

        debug!("no button for key code {} ({:?})", key_code, characters);
        Response::Ignored
    }

    fn set_visible(&mut self, visible: bool) -> Response {
        if self.visible != visible {
            info!("overlay {}", if visible { "shown" } else { "hidden" });
        }
        self.visible = visible;
        Response::Visibility { visible }
    }

    fn hotkeys(&self) -> Response {
        Response::Hotkeys {
            primary: ChordInfo::from(self.manager.primary()),
            secondary: self.manager.secondary().map(ChordInfo::from),
        }
    }
}

//  Tests
