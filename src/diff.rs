//! Snapshot diff engine.
//!
//! Compares two snapshots of the page database and produces a structural
//! delta: pages that appeared, pages that disappeared, and per-page property
//! value transitions. Pure functions of their inputs; no clocks, no I/O.

use indexmap::IndexMap;

use crate::model::{Page, PropertyChange, Snapshot};

/// Structural delta between two snapshots.
#[derive(Debug, Clone, Default)]
pub struct DiffResult {
    /// Pages present in the new snapshot but not the old, in new-snapshot order.
    pub added: Vec<Page>,
    /// Pages present in the old snapshot but not the new, in old-snapshot order.
    pub removed: Vec<Page>,
    /// Per-page property transitions, keyed by page id.
    pub changed: IndexMap<String, ChangedPage>,
}

/// A page present in both snapshots whose properties differ, paired with the
/// newer side of the page for downstream rendering.
#[derive(Debug, Clone)]
pub struct ChangedPage {
    pub page: Page,
    pub changes: Vec<PropertyChange>,
}

impl DiffResult {
    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.removed.is_empty() && self.changed.is_empty()
    }
}

/// Compute the structural difference between two snapshots.
///
/// For pages present in both, every property key present on either side is
/// compared by rendered value, with the absent side defaulting to the empty
/// string. Page metadata (`created_at`, `last_edited_at`, `url`) never
/// produces a change entry: an edit timestamp moving is not content.
pub fn diff_snapshots(old: &Snapshot, new: &Snapshot) -> DiffResult {
    let mut result = DiffResult::default();

    for (id, page) in new {
        if !old.contains_key(id) {
            result.added.push(page.clone());
        }
    }

    for (id, page) in old {
        if !new.contains_key(id) {
            result.removed.push(page.clone());
        }
    }

    for (id, new_page) in new {
        let Some(old_page) = old.get(id) else {
            continue;
        };

        let changes = diff_properties(old_page, new_page);
        if !changes.is_empty() {
            result.changed.insert(
                id.clone(),
                ChangedPage {
                    page: new_page.clone(),
                    changes,
                },
            );
        }
    }

    result
}

/// Compare the property maps of two versions of the same page.
///
/// Each differing property appears exactly once: keys on the old side are
/// walked first (covering keys present on both sides and keys that vanished),
/// then keys that only exist on the new side.
fn diff_properties(old_page: &Page, new_page: &Page) -> Vec<PropertyChange> {
    let mut changes = Vec::new();

    for (key, old_prop) in &old_page.properties {
        let new_prop = new_page.properties.get(key);
        let new_value = new_prop.map(|p| p.value.as_str()).unwrap_or("");

        if old_prop.value != new_value {
            // Prefer the newer display name; a vanished key keeps its old one.
            let name = new_prop.map(|p| p.name.as_str()).unwrap_or(&old_prop.name);
            changes.push(PropertyChange {
                property: name.to_string(),
                old_value: old_prop.value.clone(),
                new_value: new_value.to_string(),
            });
        }
    }

    for (key, new_prop) in &new_page.properties {
        if old_page.properties.contains_key(key) {
            continue;
        }
        if !new_prop.value.is_empty() {
            changes.push(PropertyChange {
                property: new_prop.name.clone(),
                old_value: String::new(),
                new_value: new_prop.value.clone(),
            });
        }
    }

    changes
}
