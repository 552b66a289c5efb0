//! The built-in default layout.
//!
//! A [`Template`] holds [`DefaultBinding`]s, which carry no identifier:
//! every time a default is materialized into the grid it gets a fresh one.

use crate::binding::{ActionKind, ButtonBinding};
use crate::grid::Grid;
use std::path::Path;

/// One default cell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DefaultBinding {
    pub key: String,
    pub label: String,
    pub action_type: ActionKind,
    pub path: String,
}

impl DefaultBinding {
    pub fn new(
        key: impl Into<String>,
        label: impl Into<String>,
        action_type: ActionKind,
        path: impl Into<String>,
    ) -> Self {
        Self {
            key: key.into(),
            label: label.into(),
            action_type,
            path: path.into(),
        }
    }

    /// An unassigned cell labelled with its own key.
    fn blank(key: &str) -> Self {
        Self::new(key, key, ActionKind::None, "")
    }

    fn labelled(mut self, label: &str) -> Self {
        self.label = label.into();
        self
    }

    /// Produce a grid binding with a new identifier.
    pub fn materialize(&self) -> ButtonBinding {
        ButtonBinding::new(
            self.key.clone(),
            self.label.clone(),
            self.action_type,
            self.path.clone(),
        )
    }
}

/// Rows of default bindings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Template {
    rows: Vec<Vec<DefaultBinding>>,
}

impl Template {
    pub fn new(rows: Vec<Vec<DefaultBinding>>) -> Self {
        Self { rows }
    }

    pub fn rows(&self) -> &[Vec<DefaultBinding>] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Materialize row `index` as fresh bindings.
    pub fn materialize_row(&self, index: usize) -> Vec<ButtonBinding> {
        self.rows
            .get(index)
            .map(|row| row.iter().map(DefaultBinding::materialize).collect())
            .unwrap_or_default()
    }

    /// Materialize every row into a fresh grid.
    pub fn materialize(&self) -> Grid {
        Grid::new((0..self.rows.len()).map(|i| self.materialize_row(i)).collect())
    }

    /// The shipped 10-10-10 keyboard layout.
    ///
    /// Folder defaults under the home directory resolve against `home`.
    pub fn builtin(home: &Path) -> Self {
        use ActionKind::{LaunchApp, OpenFolder};

        let home_str = home.display().to_string();
        let downloads = home.join("Downloads").display().to_string();

        Self::new(vec![
            vec![
                DefaultBinding::new("Q", "Quick", OpenFolder, home_str.clone()),
                DefaultBinding::blank("W").labelled("Web"),
                DefaultBinding::blank("E").labelled("Edit"),
                DefaultBinding::blank("R").labelled("Run"),
                DefaultBinding::new(
                    "T",
                    "Terminal",
                    LaunchApp,
                    "/System/Applications/Utilities/Terminal.app",
                ),
                DefaultBinding::blank("Y"),
                DefaultBinding::new(
                    "U",
                    "Utilities",
                    OpenFolder,
                    "/System/Applications/Utilities",
                ),
                DefaultBinding::blank("I").labelled("Info"),
                DefaultBinding::blank("O").labelled("Open"),
                DefaultBinding::new(
                    "P",
                    "Preferences",
                    LaunchApp,
                    "/System/Applications/System Settings.app",
                ),
            ],
            vec![
                DefaultBinding::new("A", "Apps", OpenFolder, "/Applications"),
                DefaultBinding::new("S", "Safari", LaunchApp, "/Applications/Safari.app"),
                DefaultBinding::new("D", "Downloads", OpenFolder, downloads),
                DefaultBinding::new("F", "Chrome", LaunchApp, "/Applications/Google Chrome.app"),
                DefaultBinding::blank("G"),
                DefaultBinding::new("H", "Home", OpenFolder, home_str),
                DefaultBinding::blank("J"),
                DefaultBinding::blank("K"),
                DefaultBinding::blank("L").labelled("Launch"),
                DefaultBinding::blank(";"),
            ],
            vec![
                DefaultBinding::blank("Z"),
                DefaultBinding::blank("X"),
                DefaultBinding::new(
                    "C",
                    "Calculator",
                    LaunchApp,
                    "/System/Applications/Calculator.app",
                ),
                DefaultBinding::blank("V"),
                DefaultBinding::blank("B"),
                DefaultBinding::new("N", "Notes", LaunchApp, "/System/Applications/Notes.app"),
                DefaultBinding::new("M", "Mail", LaunchApp, "/System/Applications/Mail.app"),
                DefaultBinding::blank(","),
                DefaultBinding::blank("."),
                DefaultBinding::blank("-"),
            ],
        ])
    }

    /// [`builtin`](Self::builtin) resolved against the current user's home
    /// directory (or `/` if it cannot be determined).
    pub fn builtin_for_current_user() -> Self {
        let home = dirs::home_dir().unwrap_or_else(|| {
            log::warn!("home directory unknown, folder defaults will point at /");
            "/".into()
        });
        Self::builtin(&home)
    }
}
