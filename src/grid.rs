//! Button grid layout.
//!
//! The [`Grid`] is an ordered list of rows, each an ordered list of
//! [`ButtonBinding`]s.  Both orders are significant: they follow the
//! physical keyboard, so row 0 is `QWERTYUIOP`, row 1 is `ASDFGHJKL;` and
//! row 2 is `ZXCVBNM,.-`.
//!
//! On the wire a grid is a bare array of arrays of bindings.

use crate::binding::{ActionKind, ButtonBinding};
use serde::{Deserialize, Serialize};

/// Rows of key bindings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Grid {
    rows: Vec<Vec<ButtonBinding>>,
}

impl Grid {
    /// Create a grid from rows of bindings.
    pub fn new(rows: Vec<Vec<ButtonBinding>>) -> Self {
        Self { rows }
    }

    //  Accessors

    /// The rows, in display order.
    pub fn rows(&self) -> &[Vec<ButtonBinding>] {
        &self.rows
    }

    /// Consume the grid, returning its rows.
    pub fn into_rows(self) -> Vec<Vec<ButtonBinding>> {
        self.rows
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the grid has no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Binding at `(row, index)`, if present.
    pub fn get(&self, row: usize, index: usize) -> Option<&ButtonBinding> {
        self.rows.get(row).and_then(|r| r.get(index))
    }

    /// Iterate over every binding, row by row.
    pub fn iter(&self) -> impl Iterator<Item = &ButtonBinding> {
        self.rows.iter().flatten()
    }

    //  Lookup

    /// First binding, scanning rows in order, whose key equals `key`
    /// ignoring case.
    pub fn find_by_key(&self, key: &str) -> Option<&ButtonBinding> {
        self.iter().find(|b| b.answers_to(key))
    }

    /// Position `(row, index)` of the binding with identifier `id`.
    pub fn position_of(&self, id: uuid::Uuid) -> Option<(usize, usize)> {
        self.rows.iter().enumerate().find_map(|(r, row)| {
            row.iter()
                .position(|b| b.id == id)
                .map(|i| (r, i))
        })
    }

    //  Edits

    /// Replace the binding at `(row, index)` with new label/action/path,
    /// keeping its identifier and key.
    ///
    /// Returns the updated binding, or `None` when the position is out of
    /// range (the grid is left untouched).
    pub fn update_at(
        &mut self,
        row: usize,
        index: usize,
        label: impl Into<String>,
        action_type: ActionKind,
        path: impl Into<String>,
    ) -> Option<&ButtonBinding> {
        let slot = self.rows.get_mut(row)?.get_mut(index)?;
        *slot = ButtonBinding {
            id: slot.id,
            key: std::mem::take(&mut slot.key),
            label: label.into(),
            action_type,
            path: path.into(),
        };
        Some(slot)
    }

    /// Replace the first binding with the same identifier as `binding`.
    ///
    /// Returns `false` when no binding has that identifier.
    pub fn update_by_id(&mut self, binding: ButtonBinding) -> bool {
        match self.position_of(binding.id) {
            Some((r, i)) => {
                self.rows[r][i] = binding;
                true
            }
            None => false,
        }
    }
}

//  Tests
