//! Query-response parsing.
//!
//! Turns one page of a database query response into typed [`Page`] values.
//! Property values are rendered to display strings here, per declared
//! property type; the rest of the system only ever compares and shows those
//! rendered strings. A malformed page object is skipped with a loud warning
//! rather than failing the whole snapshot.

use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde_json::Value;
use tracing::warn;

use super::error::{Result, StoreError};
use crate::model::{Page, Property};

/// Placeholder for a select property with nothing selected.
const NONE_SELECTED: &str = "(None)";

/// Placeholder for a title property with no content.
const EMPTY_TITLE: &str = "(Untitled)";

/// One decoded page of a paginated query response.
#[derive(Debug, Clone, Default)]
pub struct QueryPage {
    pub pages: Vec<Page>,
    pub next_cursor: Option<String>,
}

/// Decode one query response body.
///
/// Pages that fail to parse are dropped from the result, not fatal: losing
/// one malformed record beats losing the whole snapshot. Each skip is logged
/// at warn so the data loss is visible.
pub fn parse_query_response(body: &Value) -> Result<QueryPage> {
    let results = body
        .get("results")
        .and_then(Value::as_array)
        .ok_or_else(|| StoreError::UnexpectedPayload("missing `results` array".into()))?;

    let mut pages = Vec::with_capacity(results.len());
    for result in results {
        match parse_page(result) {
            Ok(page) => pages.push(page),
            Err(e) => {
                let id = result.get("id").and_then(Value::as_str).unwrap_or("<no id>");
                warn!("skipping malformed page object {}: {}", id, e);
            }
        }
    }

    let has_more = body.get("has_more").and_then(Value::as_bool).unwrap_or(false);
    let next_cursor = if has_more {
        body.get("next_cursor")
            .and_then(Value::as_str)
            .map(str::to_string)
    } else {
        None
    };

    Ok(QueryPage { pages, next_cursor })
}

/// Decode a single page object.
pub fn parse_page(value: &Value) -> Result<Page> {
    let id = str_field(value, "id")?;
    let created_at = time_field(value, "created_time")?;
    let last_edited_at = time_field(value, "last_edited_time")?;
    let url = str_field(value, "url")?;

    let properties = match value.get("properties").and_then(Value::as_object) {
        Some(raw) => parse_properties(raw),
        None => return Err(StoreError::MissingField("properties")),
    };

    Ok(Page {
        id,
        created_at,
        last_edited_at,
        properties,
        url,
    })
}

/// Render every supported property to its display string, keyed by the
/// store's stable property id. Unsupported property types are skipped.
fn parse_properties(raw: &serde_json::Map<String, Value>) -> IndexMap<String, Property> {
    let mut properties = IndexMap::new();

    for (name, prop) in raw {
        let Some(id) = prop.get("id").and_then(Value::as_str) else {
            continue;
        };
        let Some(value) = render_property_value(prop) else {
            continue;
        };
        properties.insert(id.to_string(), Property::new(name.clone(), value));
    }

    properties
}

/// Render one property's payload by its declared type.
///
/// Returns `None` for property types this system does not track.
fn render_property_value(prop: &Value) -> Option<String> {
    let kind = prop.get("type")?.as_str()?;
    let payload = prop.get(kind)?;

    match kind {
        "title" => {
            let text = concat_plain_text(payload);
            Some(if text.is_empty() {
                EMPTY_TITLE.to_string()
            } else {
                text
            })
        }
        "rich_text" => Some(concat_plain_text(payload)),
        "select" => Some(match payload.get("name").and_then(Value::as_str) {
            Some(name) => name.to_string(),
            None => NONE_SELECTED.to_string(),
        }),
        "status" => payload
            .get("name")
            .and_then(Value::as_str)
            .map(str::to_string),
        "people" => {
            let names: Vec<&str> = payload
                .as_array()?
                .iter()
                .filter_map(|person| person.get("name").and_then(Value::as_str))
                .collect();
            Some(names.join(", "))
        }
        "created_by" => payload
            .get("name")
            .and_then(Value::as_str)
            .map(str::to_string),
        _ => None,
    }
}

/// Concatenate the `plain_text` runs of a title or rich_text payload.
fn concat_plain_text(payload: &Value) -> String {
    payload
        .as_array()
        .map(|items| {
            items
                .iter()
                .filter_map(|item| item.get("plain_text").and_then(Value::as_str))
                .collect()
        })
        .unwrap_or_default()
}

fn str_field(value: &Value, field: &'static str) -> Result<String> {
    value
        .get(field)
        .and_then(Value::as_str)
        .map(str::to_string)
        .ok_or(StoreError::MissingField(field))
}

fn time_field(value: &Value, field: &'static str) -> Result<DateTime<Utc>> {
    let raw = value
        .get(field)
        .and_then(Value::as_str)
        .ok_or(StoreError::MissingField(field))?;

    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|_| StoreError::InvalidTimestamp {
            field,
            value: raw.to_string(),
        })
}
