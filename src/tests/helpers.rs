//! Shared builders for snapshot-based tests.

use chrono::{DateTime, TimeZone, Utc};
use indexmap::IndexMap;

use crate::model::{Page, Property, Snapshot};

/// A timestamp `secs` seconds past the epoch.
pub fn ts(secs: i64) -> DateTime<Utc> {
    Utc.timestamp_opt(secs, 0).unwrap()
}

/// Build a page with properties given as `(key, name, value)` triples.
pub fn page(id: &str, props: &[(&str, &str, &str)]) -> Page {
    let mut properties = IndexMap::new();
    for (key, name, value) in props {
        properties.insert(key.to_string(), Property::new(*name, *value));
    }

    Page {
        id: id.to_string(),
        created_at: ts(0),
        last_edited_at: ts(0),
        properties,
        url: format!("https://pages.example/{}", id),
    }
}

/// Build a snapshot from pages, keyed by id in the given order.
pub fn snapshot(pages: &[Page]) -> Snapshot {
    pages.iter().map(|p| (p.id.clone(), p.clone())).collect()
}
