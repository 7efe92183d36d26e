//! Pending change accumulation and debounced flushing.
//!
//! A [`PendingChangeSet`] collects diff results across polling ticks and
//! decides, per tick, which of them have been quiet long enough to report.
//! Structural additions and removals flush immediately; property changes are
//! debounced by a quiet period so a page edited five times in two minutes
//! produces one consolidated notification instead of five.

use chrono::{DateTime, Duration, Utc};
use indexmap::map::Entry;
use indexmap::IndexMap;

use crate::diff::DiffResult;
use crate::model::{Page, PropertyChange};

/// Accumulated, not-yet-reported property changes for one page.
#[derive(Debug, Clone)]
pub struct ChangedEntry {
    /// The most recently observed version of the page.
    pub page: Page,
    /// Every property transition observed since the last flush, in
    /// chronological order. Never deduplicated: two distinct edits to the
    /// same property are two transitions and both are shown.
    pub changes: Vec<PropertyChange>,
    /// When the most recent contributing diff was observed. Monotonically
    /// non-decreasing across merges.
    pub last_change_at: DateTime<Utc>,
}

/// Changes drained out of the accumulator by one flush, ready for rendering.
#[derive(Debug, Clone, Default)]
pub struct FlushBatch {
    pub added: Vec<Page>,
    pub removed: Vec<Page>,
    pub changed: Vec<(Page, Vec<PropertyChange>)>,
}

impl FlushBatch {
    /// An empty batch means "nothing to notify"; callers must not deliver.
    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.removed.is_empty() && self.changed.is_empty()
    }
}

/// Mutable aggregate of everything observed but not yet reported.
///
/// Owned exclusively by the polling loop; created empty at process start,
/// merged into every tick, drained only by [`flush`](Self::flush). A page id
/// lives in at most one of the three collections at a time.
#[derive(Debug, Clone, Default)]
pub struct PendingChangeSet {
    pub added: Vec<Page>,
    pub removed: Vec<Page>,
    pub changed: IndexMap<String, ChangedEntry>,
}

impl PendingChangeSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.removed.is_empty() && self.changed.is_empty()
    }

    /// Fold one tick's diff into the pending state.
    ///
    /// `observed_at` is the local time the diff was taken, not the store's
    /// edit time; it becomes the debounce clock for changed entries.
    ///
    /// Additions and removals are deduplicated by id so a stale baseline
    /// re-reporting the same appearance across ticks cannot grow the
    /// accumulator without bound. A removal arriving while the same page's
    /// addition is still pending cancels both: the page never existed in any
    /// reported state, so there is nothing to tell anyone. The reverse order
    /// (removal pending, page re-added) keeps both entries, since both
    /// transitions happened against reported state.
    pub fn merge(&mut self, diff: DiffResult, observed_at: DateTime<Utc>) {
        for page in diff.added {
            if !self.added.iter().any(|p| p.id == page.id) {
                self.added.push(page);
            }
        }

        for page in diff.removed {
            if let Some(pos) = self.added.iter().position(|p| p.id == page.id) {
                self.added.remove(pos);
                self.changed.shift_remove(&page.id);
                continue;
            }

            // A page that no longer exists has no field-level story to tell;
            // the removal notice supersedes any pending property changes.
            self.changed.shift_remove(&page.id);

            if !self.removed.iter().any(|p| p.id == page.id) {
                self.removed.push(page);
            }
        }

        for (id, incoming) in diff.changed {
            match self.changed.entry(id) {
                Entry::Occupied(mut occupied) => {
                    let entry = occupied.get_mut();
                    entry.changes.extend(incoming.changes);
                    entry.page = incoming.page;
                    entry.last_change_at = entry.last_change_at.max(observed_at);
                }
                Entry::Vacant(vacant) => {
                    vacant.insert(ChangedEntry {
                        page: incoming.page,
                        changes: incoming.changes,
                        last_change_at: observed_at,
                    });
                }
            }
        }
    }

    /// Drain everything old enough to report.
    ///
    /// Additions and removals drain unconditionally: an appearance or
    /// disappearance is unambiguous and gains nothing from coalescing.
    /// Changed entries drain only once `now - last_change_at >= quiet_period`
    /// (boundary inclusive); younger entries stay behind with their
    /// accumulated transitions and timestamp intact.
    pub fn flush(&mut self, quiet_period: Duration, now: DateTime<Utc>) -> FlushBatch {
        let added = std::mem::take(&mut self.added);
        let removed = std::mem::take(&mut self.removed);

        let mut flushed = Vec::new();
        let mut retained = IndexMap::new();

        for (id, entry) in std::mem::take(&mut self.changed) {
            if now - entry.last_change_at >= quiet_period {
                flushed.push((entry.page, entry.changes));
            } else {
                retained.insert(id, entry);
            }
        }
        self.changed = retained;

        FlushBatch {
            added,
            removed,
            changed: flushed,
        }
    }
}
