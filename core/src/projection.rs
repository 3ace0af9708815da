//! Applying events to read models, and tracking how far that got.
//!
//! # Overview
//!
//! Projections are the query side of the journal: events are the source of
//! truth, projections are denormalized views rebuilt by applying events in
//! order.
//!
//! ## Key Concepts
//!
//! - **Applier**: turns one stored event into projection-store mutations
//! - **Watermark**: the last sequence a campaign's projections reflect
//! - **Replay**: re-applying some or all of the journal to rebuild projections
//!
//! ```text
//! ┌──────────────┐  ordered pages  ┌────────────────┐   put/delete   ┌──────────────┐
//! │ Event Store  │ ──────────────▶ │ EventApplier   │ ─────────────▶ │ Projection   │
//! │ (journal)    │                 │ (per event)    │                │ stores       │
//! └──────────────┘                 └───────┬────────┘                └──────────────┘
//!                                          │ unknown type + system id
//!                                          ▼
//!                                  ┌────────────────┐
//!                                  │ SystemAdapter  │
//!                                  └────────────────┘
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::event::Event;
use crate::store::StoreFuture;

/// Applies one stored event to projections.
///
/// Implementations are idempotent only as far as their stores are: put-by-id
/// is, counters are not. Replays must therefore start from empty projections
/// (or from a watermark those projections already reflect).
///
/// # Dyn Compatibility
///
/// Returns a boxed future so the replay engine can drive any applier through
/// `&dyn EventApplier`.
pub trait EventApplier: Send + Sync {
    /// Applies `event`.
    ///
    /// # Errors
    ///
    /// Returns the first [`JournalError`](crate::error::JournalError) encountered.
    fn apply<'a>(&'a self, event: &'a Event) -> StoreFuture<'a, ()>;
}

/// Position a campaign's projections have been rebuilt up to.
///
/// # Example
///
/// ```
/// use campaign_journal_core::projection::Watermark;
/// use chrono::Utc;
///
/// let mark = Watermark::new(42, Utc::now());
/// assert_eq!(mark.seq, 42);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Watermark {
    /// Last sequence reflected by the projections.
    pub seq: u64,
    /// When the watermark was recorded.
    pub recorded_at: DateTime<Utc>,
}

impl Watermark {
    /// Creates a watermark.
    #[must_use]
    pub const fn new(seq: u64, recorded_at: DateTime<Utc>) -> Self {
        Self { seq, recorded_at }
    }
}

/// Persistence for per-campaign replay watermarks.
///
/// Lets a replay resume from `seq + 1` after a restart or cancellation.
pub trait ReplayCheckpoint: Send + Sync {
    /// Records the watermark of a campaign.
    ///
    /// # Errors
    ///
    /// Returns a storage error if the watermark cannot be saved.
    fn save<'a>(&'a self, campaign_id: &'a str, watermark: Watermark) -> StoreFuture<'a, ()>;

    /// Loads the last recorded watermark, or `None` for a campaign never replayed.
    ///
    /// # Errors
    ///
    /// Returns a storage error if the watermark cannot be read.
    fn load<'a>(&'a self, campaign_id: &'a str) -> StoreFuture<'a, Option<Watermark>>;
}
