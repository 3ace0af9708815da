//! Replay engine: rebuilding projections from the journal.
//!
//! Reads a campaign's events in ascending `seq` order, one bounded page at a
//! time, and applies each through an [`EventApplier`]. The next page is only
//! requested once the current one has been applied, so replay throughput is
//! gated by projection writes rather than by buffering.
//!
//! Replay is all-or-nothing per invocation: the first apply failure stops it
//! and is returned as is. Projections written before the failure are not
//! authoritative; the caller discards them or retries from a known-good
//! watermark.
//!
//! Replays of different campaigns may run concurrently. Replays of the same
//! campaign must be serialized by the caller.

use std::sync::Arc;
use std::time::{Duration, Instant};

use campaign_journal_core::error::JournalError;
use campaign_journal_core::event::Event;
use campaign_journal_core::event_store::EventStore;
use campaign_journal_core::projection::{EventApplier, ReplayCheckpoint, Watermark};
use chrono::Utc;
use tokio_util::sync::CancellationToken;

use crate::metrics::ReplayMetrics;

/// Default number of events requested per page.
pub const DEFAULT_PAGE_SIZE: usize = 200;

/// Tuning for the replay loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReplayConfig {
    /// Events requested per page. Zero is treated as one.
    pub page_size: usize,
}

impl Default for ReplayConfig {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl ReplayConfig {
    /// Creates the default configuration.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
        }
    }

    /// Sets the page size.
    #[must_use]
    pub const fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size;
        self
    }
}

/// Predicate deciding whether replay applies an event.
///
/// Events it rejects are skipped without halting replay.
pub type EventFilter = Arc<dyn Fn(&Event) -> bool + Send + Sync>;

/// Options for [`replay_campaign_with`].
#[derive(Clone, Default)]
pub struct ReplayOptions {
    /// Exclusive lower bound: replay starts at `after_seq + 1`.
    pub after_seq: u64,
    /// Optional selective re-projection filter.
    pub filter: Option<EventFilter>,
    /// Checked between pages and between events.
    pub cancel: Option<CancellationToken>,
    /// Loop tuning.
    pub config: ReplayConfig,
}

impl ReplayOptions {
    /// Full replay with default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts after the given sequence.
    #[must_use]
    pub const fn with_after_seq(mut self, after_seq: u64) -> Self {
        self.after_seq = after_seq;
        self
    }

    /// Applies only events the predicate accepts.
    #[must_use]
    pub fn with_filter<F>(mut self, filter: F) -> Self
    where
        F: Fn(&Event) -> bool + Send + Sync + 'static,
    {
        self.filter = Some(Arc::new(filter));
        self
    }

    /// Stops with [`JournalError::Canceled`] once the token is cancelled.
    #[must_use]
    pub fn with_cancel(mut self, cancel: CancellationToken) -> Self {
        self.cancel = Some(cancel);
        self
    }

    /// Sets the loop configuration.
    #[must_use]
    pub const fn with_config(mut self, config: ReplayConfig) -> Self {
        self.config = config;
        self
    }
}

impl std::fmt::Debug for ReplayOptions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReplayOptions")
            .field("after_seq", &self.after_seq)
            .field("filter", &self.filter.is_some())
            .field("cancel", &self.cancel)
            .field("config", &self.config)
            .finish()
    }
}

/// Replays a campaign's whole journal.
///
/// Returns the last sequence visited (0 for an empty journal).
///
/// # Errors
///
/// See [`replay_campaign_with`].
pub async fn replay_campaign(
    store: &dyn EventStore,
    applier: &dyn EventApplier,
    campaign_id: &str,
) -> Result<u64, JournalError> {
    replay_campaign_with(store, applier, campaign_id, ReplayOptions::default()).await
}

/// Replays a campaign's journal after `options.after_seq`.
///
/// Returns the last sequence visited, whether applied or filtered out, so a
/// caller can record it as the new watermark. With no events past
/// `after_seq`, returns `after_seq`.
///
/// # Errors
///
/// - [`JournalError::InvalidInput`] if `campaign_id` is empty
/// - [`JournalError::Canceled`] carrying the last visited sequence
/// - [`JournalError::Unknown`] if the store returns events out of order
/// - the first error of the store or the applier
pub async fn replay_campaign_with(
    store: &dyn EventStore,
    applier: &dyn EventApplier,
    campaign_id: &str,
    options: ReplayOptions,
) -> Result<u64, JournalError> {
    let campaign_id = campaign_id.trim();
    if campaign_id.is_empty() {
        return Err(JournalError::invalid_input("campaign id is required"));
    }

    tracing::info!(
        campaign_id,
        after_seq = options.after_seq,
        filtered = options.filter.is_some(),
        "Replaying campaign"
    );

    let started = Instant::now();
    let mut progress = Progress::new(options.after_seq);
    let result = replay_pages(store, applier, campaign_id, &options, &mut progress).await;
    let elapsed = started.elapsed();

    match result {
        Ok(()) => {
            ReplayMetrics::record_replay(progress.visited(), elapsed);
            tracing::info!(
                campaign_id,
                after_seq = options.after_seq,
                last_seq = progress.last_seq,
                applied = progress.applied,
                skipped = progress.skipped,
                elapsed_ms = duration_ms(elapsed),
                "Replay complete"
            );
            Ok(progress.last_seq)
        }
        Err(error) => {
            ReplayMetrics::record_failure(elapsed);
            tracing::warn!(
                campaign_id,
                last_seq = progress.last_seq,
                applied = progress.applied,
                error = %error,
                "Replay stopped"
            );
            Err(error)
        }
    }
}

/// Replays system-owned events after a known-good sequence.
///
/// Used to rebuild high-churn game-system state (resource pools and the like)
/// from a snapshot watermark instead of from sequence 1. Core events are
/// skipped so campaign counters are not counted twice. Adapters still
/// validate every value against its bounds, so a corrupted event fails the
/// replay rather than being clamped.
///
/// # Errors
///
/// See [`replay_campaign_with`].
pub async fn replay_snapshot(
    store: &dyn EventStore,
    applier: &dyn EventApplier,
    campaign_id: &str,
    from_seq: u64,
) -> Result<u64, JournalError> {
    let options = ReplayOptions::new()
        .with_after_seq(from_seq)
        .with_filter(Event::is_system_owned);
    replay_campaign_with(store, applier, campaign_id, options).await
}

/// Replays a campaign from its saved watermark and saves the new one.
///
/// See [`resume_campaign_with`].
///
/// # Errors
///
/// See [`resume_campaign_with`].
pub async fn resume_campaign(
    store: &dyn EventStore,
    applier: &dyn EventApplier,
    checkpoints: &dyn ReplayCheckpoint,
    campaign_id: &str,
) -> Result<u64, JournalError> {
    resume_campaign_with(store, applier, checkpoints, campaign_id, ReplayOptions::default()).await
}

/// Replays a campaign from its saved watermark and saves the new one.
///
/// `options.after_seq` is replaced by the saved watermark (0 when none). On
/// success, and on cancellation after progress was made, the last visited
/// sequence is saved so the next call resumes from `last_seq + 1`.
///
/// # Errors
///
/// Returns checkpoint storage errors and everything [`replay_campaign_with`]
/// returns. A failed apply leaves the watermark where it was.
pub async fn resume_campaign_with(
    store: &dyn EventStore,
    applier: &dyn EventApplier,
    checkpoints: &dyn ReplayCheckpoint,
    campaign_id: &str,
    options: ReplayOptions,
) -> Result<u64, JournalError> {
    let campaign_id = campaign_id.trim();
    if campaign_id.is_empty() {
        return Err(JournalError::invalid_input("campaign id is required"));
    }

    let after_seq = checkpoints
        .load(campaign_id)
        .await?
        .map_or(0, |watermark| watermark.seq);

    match replay_campaign_with(store, applier, campaign_id, options.with_after_seq(after_seq)).await {
        Ok(last_seq) => {
            if last_seq > after_seq {
                checkpoints
                    .save(campaign_id, Watermark::new(last_seq, Utc::now()))
                    .await?;
            }
            Ok(last_seq)
        }
        Err(JournalError::Canceled { last_seq }) => {
            if last_seq > after_seq {
                checkpoints
                    .save(campaign_id, Watermark::new(last_seq, Utc::now()))
                    .await?;
            }
            Err(JournalError::Canceled { last_seq })
        }
        Err(error) => Err(error),
    }
}

struct Progress {
    last_seq: u64,
    applied: u64,
    skipped: u64,
}

impl Progress {
    const fn new(after_seq: u64) -> Self {
        Self {
            last_seq: after_seq,
            applied: 0,
            skipped: 0,
        }
    }

    const fn visited(&self) -> u64 {
        self.applied + self.skipped
    }
}

async fn replay_pages(
    store: &dyn EventStore,
    applier: &dyn EventApplier,
    campaign_id: &str,
    options: &ReplayOptions,
    progress: &mut Progress,
) -> Result<(), JournalError> {
    let page_size = options.config.page_size.max(1);

    loop {
        check_cancel(options.cancel.as_ref(), progress.last_seq)?;

        let page = store
            .list_events(campaign_id, progress.last_seq, page_size)
            .await?;
        tracing::debug!(
            campaign_id,
            after_seq = progress.last_seq,
            count = page.len(),
            "Fetched replay page"
        );

        let exhausted = page.len() < page_size;
        check_page(&page, progress.last_seq, campaign_id)?;
        for event in &page {
            check_cancel(options.cancel.as_ref(), progress.last_seq)?;

            if options.filter.as_ref().is_none_or(|accept| accept(event)) {
                applier.apply(event).await.inspect_err(|error| {
                    tracing::warn!(
                        campaign_id,
                        seq = event.seq,
                        event_type = %event.event_type,
                        error = %error,
                        "Apply failed during replay"
                    );
                })?;
                progress.applied += 1;
            } else {
                progress.skipped += 1;
            }
            progress.last_seq = event.seq;
        }

        if exhausted {
            return Ok(());
        }
    }
}

/// A page must continue the chain exactly: `after_seq + 1`, `after_seq + 2`, ...
fn check_page(page: &[Event], after_seq: u64, campaign_id: &str) -> Result<(), JournalError> {
    let mut expected = after_seq;
    for event in page {
        expected += 1;
        if event.seq != expected {
            return Err(JournalError::unknown(format!(
                "event store returned seq {} where seq {expected} was expected for campaign {campaign_id}",
                event.seq
            )));
        }
    }
    Ok(())
}

fn check_cancel(cancel: Option<&CancellationToken>, last_seq: u64) -> Result<(), JournalError> {
    match cancel {
        Some(token) if token.is_cancelled() => Err(JournalError::Canceled { last_seq }),
        _ => Ok(()),
    }
}

fn duration_ms(elapsed: Duration) -> u64 {
    u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX)
}
