//! Flush-batch rendering.
//!
//! Pure, stateless conversion of a [`FlushBatch`] into webhook embeds, one
//! embed per reported page. Additions show the page's full property list,
//! removals carry no body, and changed pages show every accumulated
//! `property: old → new` transition.

use crate::changeset::FlushBatch;
use crate::model::{Page, PropertyChange};
use crate::webhook::WebhookEmbed;

const COLOR_ADDED: u32 = 0x44CC00;
const COLOR_REMOVED: u32 = 0xFF2A00;
const COLOR_CHANGED: u32 = 0xFFD000;

/// Placeholder shown in place of an empty property value.
const EMPTY_VALUE: &str = "(None)";

/// Render every entry of a flush batch, additions first, then removals,
/// then changes.
pub fn render_batch(batch: &FlushBatch) -> Vec<WebhookEmbed> {
    let mut embeds = Vec::new();

    for page in &batch.added {
        embeds.push(WebhookEmbed {
            title: format!("Page added: {}", page.title()),
            url: page.url.clone(),
            description: properties_text(page),
            color: COLOR_ADDED,
        });
    }

    for page in &batch.removed {
        embeds.push(WebhookEmbed {
            title: format!("Page removed: {}", page.title()),
            url: page.url.clone(),
            description: String::new(),
            color: COLOR_REMOVED,
        });
    }

    for (page, changes) in &batch.changed {
        embeds.push(WebhookEmbed {
            title: format!("Page changed: {}", page.title()),
            url: page.url.clone(),
            description: changes_text(changes),
            color: COLOR_CHANGED,
        });
    }

    embeds
}

/// One line per property: ``name: `value` ``.
fn properties_text(page: &Page) -> String {
    let lines: Vec<String> = page
        .properties
        .values()
        .map(|p| format!("{}: {}", p.name, value_text(&p.value)))
        .collect();

    lines.join("\n")
}

/// One line per transition: ``name: `old` → `new` ``.
fn changes_text(changes: &[PropertyChange]) -> String {
    let lines: Vec<String> = changes
        .iter()
        .map(|c| {
            format!(
                "{}: {} → {}",
                c.property,
                value_text(&c.old_value),
                value_text(&c.new_value)
            )
        })
        .collect();

    lines.join("\n")
}

/// Backtick a value for display; empty values become a placeholder token.
fn value_text(value: &str) -> String {
    if value.is_empty() {
        EMPTY_VALUE.to_string()
    } else {
        format!("`{}`", value)
    }
}
