// pagewatch - debounced change notifications for a remote page database
//!
//! Polls a page database at a fixed interval, diffs successive snapshots,
//! accumulates per-page property changes, and posts human-readable change
//! digests to a webhook once changes have been quiet for a configurable
//! period.
//!
//! # Architecture
//!
//! Data flows one direction per tick:
//!
//! ```text
//! PageStore → Snapshot → diff → PendingChangeSet (merge) → flush → render → MessageSink
//! ```
//!
//! The core (diff, merge, flush) is pure state manipulation; all I/O lives
//! behind the [`store::PageStore`] and [`webhook::MessageSink`] seams.

pub mod changeset;
pub mod config;
pub mod diff;
pub mod model;
pub mod poller;
pub mod render;
pub mod store;
pub mod webhook;

#[cfg(test)]
pub mod tests;

pub use changeset::{ChangedEntry, FlushBatch, PendingChangeSet};
pub use config::WatchConfig;
pub use diff::{diff_snapshots, DiffResult};
pub use model::{Page, Property, PropertyChange, Snapshot};
pub use poller::Poller;
