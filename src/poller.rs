//! The polling loop.
//!
//! Drives the whole system: fetch a snapshot, diff it against the previous
//! one, merge the delta into the pending change set, flush whatever has aged
//! past the quiet period, and hand the result to the delivery sink. One tick
//! is a single synchronous unit of work; nothing in here runs concurrently
//! with anything else.

use chrono::{DateTime, Duration, Utc};
use tracing::{debug, error, info, warn};

use crate::changeset::PendingChangeSet;
use crate::config::PollConfig;
use crate::diff::diff_snapshots;
use crate::model::Snapshot;
use crate::render;
use crate::store::PageStore;
use crate::webhook::MessageSink;

/// Owns the baseline snapshot, the accumulator, and the two injected
/// collaborators. Starts in an initializing state with no baseline; the
/// first successful fetch becomes the baseline and every later tick diffs
/// against the previous one.
pub struct Poller<S, D> {
    store: S,
    sink: D,
    interval: std::time::Duration,
    quiet_period: Duration,
    baseline: Option<Snapshot>,
    pub(crate) pending: PendingChangeSet,
}

impl<S: PageStore, D: MessageSink> Poller<S, D> {
    pub fn new(store: S, sink: D, config: &PollConfig) -> Self {
        Self {
            store,
            sink,
            interval: std::time::Duration::from_secs(config.interval_secs),
            quiet_period: Duration::seconds(config.quiet_period_secs as i64),
            baseline: None,
            pending: PendingChangeSet::new(),
        }
    }

    /// Run forever, one tick per polling interval.
    pub async fn run(mut self) -> anyhow::Result<()> {
        info!(
            "starting polling loop: interval {:?}, quiet period {}s",
            self.interval,
            self.quiet_period.num_seconds()
        );

        loop {
            self.tick(Utc::now()).await;
            tokio::time::sleep(self.interval).await;
        }
    }

    /// One unit of work: fetch, diff, merge, flush, deliver.
    ///
    /// `now` is sampled once per tick and serves as both the observation
    /// timestamp for merged changes and the flush clock. A failed fetch
    /// abandons the tick: the baseline is kept and nothing else runs.
    pub async fn tick(&mut self, now: DateTime<Utc>) {
        let snapshot = match self.store.fetch_snapshot().await {
            Ok(snapshot) => snapshot,
            Err(e) => {
                warn!("snapshot fetch failed, keeping previous baseline: {}", e);
                return;
            }
        };

        let Some(baseline) = self.baseline.take() else {
            info!("initial snapshot captured: {} pages", snapshot.len());
            self.baseline = Some(snapshot);
            return;
        };

        let diff = diff_snapshots(&baseline, &snapshot);
        if diff.is_empty() {
            debug!("no changes detected");
        } else {
            info!(
                "changes detected: {} added, {} removed, {} changed",
                diff.added.len(),
                diff.removed.len(),
                diff.changed.len()
            );
            self.pending.merge(diff, now);
        }

        // Flush runs even on quiet ticks so pending changes age out.
        let batch = self.pending.flush(self.quiet_period, now);
        if !batch.is_empty() {
            let embeds = render::render_batch(&batch);
            let count = embeds.len();
            match self.sink.deliver(embeds).await {
                Ok(()) => info!("notification sent: {} embeds", count),
                // Flushed entries are already gone; at most one attempt.
                Err(e) => error!("notification delivery failed, batch dropped: {}", e),
            }
        }

        self.baseline = Some(snapshot);
    }

    /// Whether the first snapshot has been captured.
    pub fn is_initialized(&self) -> bool {
        self.baseline.is_some()
    }
}
