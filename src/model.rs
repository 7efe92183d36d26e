//! Core data types for page snapshots and property changes.
//!
//! A `Snapshot` is the full observed state of the remote page database at one
//! polling instant: every page keyed by its stable id, in the order the store
//! returned them. Pages are immutable values; a page only ever changes by a
//! newer snapshot carrying a replacement with the same id.

use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Full point-in-time view of the page database, keyed by page id.
///
/// `IndexMap` keeps store insertion order so diff output is deterministic.
pub type Snapshot = IndexMap<String, Page>;

/// One rendered page property: human-facing name plus its display value.
///
/// The map key a `Property` lives under is the store's stable property id,
/// not this name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Property {
    pub name: String,
    pub value: String,
}

impl Property {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// A page in the remote database.
///
/// Identity is `id` alone. The two timestamps and `url` are metadata: they
/// never participate in change detection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page {
    pub id: String,
    pub created_at: DateTime<Utc>,
    pub last_edited_at: DateTime<Utc>,
    pub properties: IndexMap<String, Property>,
    pub url: String,
}

impl Page {
    /// The page's title property, or a placeholder when the page has none.
    ///
    /// The store keys the title property under the literal id `title`.
    pub fn title(&self) -> &str {
        self.properties
            .get("title")
            .map(|p| p.value.as_str())
            .unwrap_or(UNTITLED)
    }
}

/// Placeholder title for pages whose title property is missing or empty.
pub const UNTITLED: &str = "(Untitled)";

/// One observed transition of a single property's rendered value.
///
/// `property` carries the display name; an absent side is the empty string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PropertyChange {
    pub property: String,
    pub old_value: String,
    pub new_value: String,
}
