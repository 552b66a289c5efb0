//! Merging a stored grid with the default template.
//!
//! The shipped template grows over releases (new rows, new keys).  At load
//! time the user's stored grid is brought up to date without losing any of
//! their edits:
//!
//! * template rows missing from the stored grid are appended as fresh
//!   defaults;
//! * within each template row, keys the user already has keep the user's
//!   binding (identifier included), missing keys get a fresh default, and
//!   the row is reordered to follow the template;
//! * stored keys the template does not know about are kept after the
//!   template keys, in their previous relative order;
//! * stored rows beyond the template are left alone.
//!
//! Keys are compared case-insensitively (uppercased).

use crate::binding::ButtonBinding;
use crate::grid::Grid;
use crate::template::Template;
use std::collections::{HashMap, HashSet};
use uuid::Uuid;

/// Result of [`reconcile`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reconciliation {
    /// The updated grid.
    pub grid: Grid,
    /// Whether `grid` differs from the input and should be persisted.
    pub changed: bool,
}

/// Bring `stored` up to date with `template`.
///
/// Total over any pair of inputs; an empty `stored` grid comes back as a
/// fully materialized template with `changed == true` (unless the template
/// is empty too).
pub fn reconcile(stored: Grid, template: &Template) -> Reconciliation {
    let mut rows = stored.into_rows();
    let mut changed = false;

    if rows.len() < template.len() {
        for index in rows.len()..template.len() {
            rows.push(template.materialize_row(index));
        }
        changed = true;
    }

    for (index, defaults) in template.rows().iter().enumerate() {
        let row = std::mem::take(&mut rows[index]);
        let original_ids: Vec<Uuid> = row.iter().map(|b| b.id).collect();

        let default_keys: HashSet<String> =
            defaults.iter().map(|d| d.key.to_uppercase()).collect();

        let mut extras = Vec::new();
        let mut by_key: HashMap<String, ButtonBinding> = HashMap::new();
        for binding in row {
            let key = binding.normalized_key();
            if default_keys.contains(&key) {
                // A later duplicate replaces an earlier one.
                by_key.insert(key, binding);
            } else {
                extras.push(binding);
            }
        }

        let mut new_row = Vec::with_capacity(defaults.len() + extras.len());
        for default in defaults {
            match by_key.remove(&default.key.to_uppercase()) {
                Some(binding) => new_row.push(binding),
                None => {
                    log::debug!("row {}: adding default key {:?}", index, default.key);
                    new_row.push(default.materialize());
                    changed = true;
                }
            }
        }
        new_row.extend(extras);

        if !new_row.iter().map(|b| b.id).eq(original_ids.iter().copied()) {
            changed = true;
        }

        rows[index] = new_row;
    }

    Reconciliation {
        grid: Grid::new(rows),
        changed,
    }
}

//  Tests

#[cfg(test)]
mod tests {
    use super::*;
    use crate::binding::ActionKind;
    use crate::template::DefaultBinding;
    use std::path::Path;

    fn d(key: &str, label: &str) -> DefaultBinding {
        DefaultBinding::new(key, label, ActionKind::None, "")
    }

    fn b(key: &str, label: &str) -> ButtonBinding {
        ButtonBinding::new(key, label, ActionKind::None, "")
    }

    fn keys(row: &[ButtonBinding]) -> String {
        row.iter().map(|b| b.key.as_str()).collect()
    }

    fn ids(grid: &Grid) -> Vec<Vec<Uuid>> {
        grid.rows()
            .iter()
            .map(|r| r.iter().map(|b| b.id).collect())
            .collect()
    }

    fn three_rows() -> Template {
        Template::new(vec![
            vec![d("Q", "Quick"), d("W", "Web")],
            vec![d("A", "Apps")],
            vec![d("Z", "Z")],
        ])
    }

    #[test]
    fn fills_missing_key_in_template_order() {
        let stored_q = ButtonBinding::new("Q", "Quick", ActionKind::OpenFolder, "/Users/x");
        let stored = Grid::new(vec![vec![stored_q.clone()]]);
        let template = Template::new(vec![vec![d("Q", "Quick"), d("W", "Web")]]);

        let out = reconcile(stored, &template);

        assert!(out.changed);
        let row = &out.grid.rows()[0];
        assert_eq!(row.len(), 2);
        assert_eq!(row[0], stored_q);
        assert_eq!(row[1].key, "W");
        assert_eq!(row[1].label, "Web");
        assert_eq!(row[1].action_type, ActionKind::None);
    }

    #[test]
    fn up_to_date_grid_is_unchanged() {
        let template = three_rows();
        let stored = template.materialize();
        let out = reconcile(stored.clone(), &template);
        assert!(!out.changed);
        assert_eq!(out.grid, stored);
    }

    #[test]
    fn reconcile_is_idempotent() {
        let template = Template::builtin(Path::new("/Users/x"));
        let stored = Grid::new(vec![
            vec![b("w", "mine"), b("!", "extra"), b("Q", "Quick")],
        ]);
        let first = reconcile(stored, &template);
        assert!(first.changed);
        let second = reconcile(first.grid.clone(), &template);
        assert!(!second.changed);
        assert_eq!(second.grid, first.grid);
    }

    #[test]
    fn shared_keys_keep_stored_binding() {
        let template = Template::new(vec![vec![d("Q", "Quick"), d("W", "Web")]]);
        let mine = ButtonBinding::new("W", "Work", ActionKind::LaunchApp, "/Apps/Work.app");
        let stored = Grid::new(vec![vec![b("Q", "Quick"), mine.clone()]]);

        let out = reconcile(stored, &template);

        assert_eq!(out.grid.rows()[0][1], mine);
        assert!(!out.changed);
    }

    #[test]
    fn lowercase_stored_key_counts_as_present() {
        let template = Template::new(vec![vec![d("Q", "Quick")]]);
        let mine = b("q", "lower");
        let stored = Grid::new(vec![vec![mine.clone()]]);
        let out = reconcile(stored, &template);
        assert!(!out.changed);
        assert_eq!(out.grid.rows()[0], vec![mine]);
    }

    #[test]
    fn reorders_to_template_order() {
        let template = Template::new(vec![vec![d("Q", "Quick"), d("W", "Web"), d("E", "Edit")]]);
        let stored = Grid::new(vec![vec![b("E", "e"), b("Q", "q"), b("W", "w")]]);
        let before = ids(&stored);

        let out = reconcile(stored, &template);

        assert!(out.changed);
        assert_eq!(keys(&out.grid.rows()[0]), "QWE");
        let after = ids(&out.grid);
        assert_eq!(after[0], vec![before[0][1], before[0][2], before[0][0]]);
    }

    #[test]
    fn extras_follow_template_keys_in_original_order() {
        let template = Template::new(vec![vec![d("Q", "Quick"), d("W", "Web")]]);
        let stored = Grid::new(vec![vec![
            b("1", "one"),
            b("W", "w"),
            b("2", "two"),
            b("Q", "q"),
            b("3", "three"),
        ]]);

        let out = reconcile(stored, &template);

        assert_eq!(keys(&out.grid.rows()[0]), "QW123");
        assert!(out.changed);
    }

    #[test]
    fn extras_already_at_tail_are_unchanged() {
        let template = Template::new(vec![vec![d("Q", "Quick")]]);
        let stored = Grid::new(vec![vec![b("Q", "q"), b("/", "slash")]]);
        let out = reconcile(stored, &template);
        assert!(!out.changed);
        assert_eq!(keys(&out.grid.rows()[0]), "Q/");
    }

    #[test]
    fn missing_rows_are_appended_as_defaults() {
        let template = three_rows();
        let stored = Grid::new(vec![vec![b("Q", "q"), b("W", "w")], vec![b("A", "a")]]);

        let out = reconcile(stored, &template);

        assert!(out.changed);
        assert_eq!(out.grid.len(), 3);
        let last = &out.grid.rows()[2];
        assert_eq!(keys(last), "Z");
        assert_eq!(last[0].label, "Z");
    }

    #[test]
    fn empty_stored_grid_becomes_template() {
        let template = three_rows();
        let out = reconcile(Grid::default(), &template);
        assert!(out.changed);
        assert_eq!(out.grid.len(), 3);
        assert_eq!(keys(&out.grid.rows()[0]), "QW");
        assert_eq!(out.grid.rows()[0][1].label, "Web");
    }

    #[test]
    fn empty_inputs_are_unchanged() {
        let out = reconcile(Grid::default(), &Template::default());
        assert!(!out.changed);
        assert!(out.grid.is_empty());
    }

    #[test]
    fn rows_beyond_template_pass_through() {
        let template = Template::new(vec![vec![d("Q", "Quick")]]);
        let extra_row = vec![b("F1", "fn"), b("F2", "fn")];
        let stored = Grid::new(vec![vec![b("Q", "q")], extra_row.clone()]);

        let out = reconcile(stored, &template);

        assert!(!out.changed);
        assert_eq!(out.grid.rows()[1], extra_row);
    }

    #[test]
    fn removed_template_key_is_kept_as_extra() {
        let template = Template::new(vec![vec![d("Q", "Quick")]]);
        let stored = Grid::new(vec![vec![b("Q", "q"), b("W", "old web")]]);
        let out = reconcile(stored, &template);
        assert_eq!(keys(&out.grid.rows()[0]), "QW");
        assert_eq!(out.grid.rows()[0][1].label, "old web");
    }

    #[test]
    fn duplicate_stored_key_keeps_last() {
        let template = Template::new(vec![vec![d("Q", "Quick")]]);
        let later = b("Q", "second");
        let stored = Grid::new(vec![vec![b("Q", "first"), later.clone()]]);

        let out = reconcile(stored, &template);

        assert!(out.changed);
        assert_eq!(out.grid.rows()[0], vec![later]);
    }
}
