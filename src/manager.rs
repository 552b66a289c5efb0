//! The single owner of persisted launcher configuration.
//!
//! [`ConfigManager`] loads the button grid and hotkey chords from a
//! [`PreferenceStore`], reconciles the grid against the default
//! [`Template`], and writes every later change back.  All mutations go
//! through `&mut self`, so reconcile-then-persist and user edits are
//! serialized by ownership.

use crate::binding::{ActionKind, ButtonBinding};
use crate::grid::Grid;
use crate::hotkey::{HotkeyChord, HotkeySet};
use crate::reconcile::reconcile;
use crate::store::{StoreError, BUTTONS_KEY, HOTKEY_KEY, SECONDARY_HOTKEY_KEY};
use crate::template::Template;
use crate::traits::PreferenceStore;
use log::{info, warn};
use serde::de::DeserializeOwned;

/// Errors from the configuration manager.
#[derive(Debug, thiserror::Error)]
pub enum ManagerError {
    #[error("preference store: {0}")]
    Store(#[from] StoreError),
    #[error("encode error: {0}")]
    Encode(#[from] serde_json::Error),
    #[error("no button at row {row}, index {index}")]
    NoSuchButton { row: usize, index: usize },
    #[error("no button with id {0}")]
    UnknownBinding(uuid::Uuid),
}

/// Loads, reconciles and persists the grid and hotkeys.
pub struct ConfigManager<S: PreferenceStore> {
    store: S,
    grid: Grid,
    hotkeys: HotkeySet,
}

impl<S: PreferenceStore> ConfigManager<S> {
    /// Load configuration from `store`.
    ///
    /// Missing or undecodable values fall back to defaults: the default
    /// chord for the primary hotkey, no secondary hotkey, and a freshly
    /// materialized `template` for the grid.  A stored grid is reconciled
    /// against `template` and written back only if that changed it.
    pub fn load(store: S, template: &Template) -> Result<Self, ManagerError> {
        let primary = decode::<HotkeyChord>(&store, HOTKEY_KEY)?.unwrap_or_default();
        // A cleared secondary is stored as `null`, which decodes to `None`.
        let secondary = decode::<Option<HotkeyChord>>(&store, SECONDARY_HOTKEY_KEY)?.flatten();

        let mut manager = Self {
            store,
            grid: Grid::default(),
            hotkeys: HotkeySet { primary, secondary },
        };

        match decode::<Grid>(&manager.store, BUTTONS_KEY)? {
            Some(stored) if !stored.is_empty() => {
                let result = reconcile(stored, template);
                if result.changed {
                    info!("layout updated to the current default template");
                    manager.save_grid(result.grid)?;
                } else {
                    manager.grid = result.grid;
                }
            }
            _ => {
                info!("no stored layout, using defaults");
                manager.save_grid(template.materialize())?;
            }
        }

        info!("hotkey: {}", manager.hotkeys.primary);
        if let Some(chord) = manager.hotkeys.secondary {
            info!("secondary hotkey: {}", chord);
        }
        Ok(manager)
    }

    //  Accessors

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn hotkeys(&self) -> &HotkeySet {
        &self.hotkeys
    }

    pub fn primary(&self) -> HotkeyChord {
        self.hotkeys.primary
    }

    pub fn secondary(&self) -> Option<HotkeyChord> {
        self.hotkeys.secondary
    }

    /// The underlying store.
    pub fn store(&self) -> &S {
        &self.store
    }

    //  Mutations
    //
    // Every change is written to the store first and only takes effect in
    // memory once the write succeeded.

    /// Replace the primary chord and persist it.
    pub fn set_primary(&mut self, chord: HotkeyChord) -> Result<(), ManagerError> {
        self.store.set(HOTKEY_KEY, serde_json::to_value(chord)?)?;
        self.hotkeys.primary = chord;
        info!("saved hotkey: {}", chord);
        Ok(())
    }

    /// Replace (or clear, with `None`) the secondary chord and persist it.
    pub fn set_secondary(&mut self, chord: Option<HotkeyChord>) -> Result<(), ManagerError> {
        self.store
            .set(SECONDARY_HOTKEY_KEY, serde_json::to_value(chord)?)?;
        self.hotkeys.secondary = chord;
        match chord {
            Some(c) => info!("saved secondary hotkey: {}", c),
            None => info!("cleared secondary hotkey"),
        }
        Ok(())
    }

    /// Edit the button at `(row, index)`, keeping its identifier and key.
    pub fn update_button(
        &mut self,
        row: usize,
        index: usize,
        label: impl Into<String>,
        action_type: ActionKind,
        path: impl Into<String>,
    ) -> Result<&ButtonBinding, ManagerError> {
        let mut grid = self.grid.clone();
        if grid.update_at(row, index, label, action_type, path).is_none() {
            return Err(ManagerError::NoSuchButton { row, index });
        }
        self.save_grid(grid)?;
        self.grid
            .get(row, index)
            .ok_or(ManagerError::NoSuchButton { row, index })
    }

    /// Replace the button that has `binding.id`.
    pub fn update_binding(&mut self, binding: ButtonBinding) -> Result<(), ManagerError> {
        let id = binding.id;
        let mut grid = self.grid.clone();
        if !grid.update_by_id(binding) {
            return Err(ManagerError::UnknownBinding(id));
        }
        self.save_grid(grid)
    }

    /// Persist `grid`, then make it current.
    fn save_grid(&mut self, grid: Grid) -> Result<(), ManagerError> {
        self.store.set(BUTTONS_KEY, serde_json::to_value(&grid)?)?;
        self.grid = grid;
        info!("saved button configuration");
        Ok(())
    }
}

/// Decode the value under `key`.
///
/// Store failures propagate; a value that does not decode is logged and
/// treated as absent.
fn decode<T: DeserializeOwned>(
    store: &impl PreferenceStore,
    key: &str,
) -> Result<Option<T>, StoreError> {
    let Some(value) = store.get(key)? else {
        return Ok(None);
    };
    match serde_json::from_value::<T>(value) {
        Ok(decoded) => Ok(Some(decoded)),
        Err(e) => {
            warn!("ignoring malformed {}: {}", key, e);
            Ok(None)
        }
    }
}
