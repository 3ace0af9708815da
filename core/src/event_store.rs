//! Event store trait and related types.
//!
//! The event store is the only component allowed to assign an event's
//! identity and integrity fields. It durably appends normalized events and
//! serves ordered, paged reads per campaign.
//!
//! # Contract
//!
//! - `append_event` re-normalizes its input, assigns `seq` (strictly
//!   increasing per campaign, starting at 1), `hash`, `prev_hash`,
//!   `chain_hash`, `signature_key_id` and `signature`, persists the event and
//!   returns the finalized copy. Appends to one campaign are serialized.
//! - `list_events` returns events in ascending `seq` order with an exclusive
//!   lower bound.
//! - Events are never mutated or deleted after append.
//!
//! # Implementations
//!
//! - `InMemoryEventStore` (in `campaign-journal-testing`): fast, deterministic tests
//!
//! # Example
//!
//! ```no_run
//! use campaign_journal_core::event::Event;
//! use campaign_journal_core::event_store::{EventStore, EventStoreError};
//!
//! async fn example<S: EventStore>(store: &S) -> Result<(), EventStoreError> {
//!     let stored = store
//!         .append_event(Event::new("camp-1", "campaign.created"))
//!         .await?;
//!     assert_eq!(stored.seq, 1);
//!
//!     let page = store.list_events("camp-1", 0, 100).await?;
//!     assert_eq!(page.len(), 1);
//!     Ok(())
//! }
//! ```

use std::future::Future;
use std::pin::Pin;
use thiserror::Error;

use crate::error::JournalError;
use crate::event::Event;

/// Boxed future returned by [`EventStore`] methods.
pub type EventStoreFuture<'a, T> =
    Pin<Box<dyn Future<Output = Result<T, EventStoreError>> + Send + 'a>>;

/// Errors that can occur during event store operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EventStoreError {
    /// The event was rejected before append.
    #[error("Invalid event: {0}")]
    InvalidEvent(String),

    /// No event matches the lookup.
    #[error("Event not found: {0}")]
    NotFound(String),

    /// An event's `prev_hash` does not link to its predecessor.
    #[error("Hash chain broken at seq {seq}: expected prev '{expected}', found '{actual}'")]
    ChainBroken {
        /// Sequence of the offending event.
        seq: u64,
        /// Chain hash of the predecessor.
        expected: String,
        /// `prev_hash` recorded on the event.
        actual: String,
    },

    /// A recomputed digest differs from the stored one.
    #[error("Digest mismatch at seq {seq}: {field} does not match content")]
    HashMismatch {
        /// Sequence of the offending event.
        seq: u64,
        /// Which digest failed.
        field: &'static str,
    },

    /// Sequence numbers are not contiguous.
    #[error("Sequence gap: expected {expected}, found {actual}")]
    SequenceGap {
        /// Expected sequence.
        expected: u64,
        /// Sequence found.
        actual: u64,
    },

    /// The signature over `chain_hash` does not verify.
    #[error("Signature invalid at seq {seq}")]
    SignatureInvalid {
        /// Sequence of the offending event.
        seq: u64,
    },

    /// The signature names a key the verifier does not hold.
    #[error("Unknown signing key: {0}")]
    UnknownSigningKey(String),

    /// Stored data could not be decoded.
    #[error("Corrupted event data: {0}")]
    Corrupted(String),

    /// Storage backend failure.
    #[error("Storage error: {0}")]
    Storage(String),

    /// The read was canceled.
    #[error("Operation canceled")]
    Canceled,
}

impl From<JournalError> for EventStoreError {
    fn from(err: JournalError) -> Self {
        match err {
            JournalError::InvalidInput(msg) => Self::InvalidEvent(msg),
            JournalError::NotFound { entity, id } => Self::NotFound(format!("{entity} {id}")),
            JournalError::Canceled { .. } => Self::Canceled,
            other => Self::Storage(other.to_string()),
        }
    }
}

impl From<EventStoreError> for JournalError {
    fn from(err: EventStoreError) -> Self {
        match err {
            EventStoreError::InvalidEvent(msg) => Self::InvalidInput(msg),
            EventStoreError::NotFound(id) => Self::NotFound { entity: "event", id },
            EventStoreError::Canceled => Self::Canceled { last_seq: 0 },
            other => Self::Unknown(other.to_string()),
        }
    }
}

/// Durable, ordered, tamper-evident journal of campaign events.
///
/// # Dyn Compatibility
///
/// Methods return boxed futures so the store can be shared as
/// `Arc<dyn EventStore>` between request handlers and the replay engine.
pub trait EventStore: Send + Sync {
    /// Appends an event and returns it with identity and integrity fields set.
    ///
    /// # Errors
    ///
    /// - `InvalidEvent`: the event fails normalization (including caller-supplied
    ///   storage fields)
    /// - `Storage`: the backend failed
    fn append_event(&self, event: Event) -> EventStoreFuture<'_, Event>;

    /// Lists up to `limit` events of a campaign with `seq > after_seq`, ascending.
    ///
    /// An unknown campaign yields an empty page.
    ///
    /// # Errors
    ///
    /// - `Storage`: the backend failed
    fn list_events<'a>(
        &'a self,
        campaign_id: &'a str,
        after_seq: u64,
        limit: usize,
    ) -> EventStoreFuture<'a, Vec<Event>>;

    /// Fetches one event by campaign and sequence.
    ///
    /// # Errors
    ///
    /// - `NotFound`: no such event
    fn get_event_by_seq<'a>(&'a self, campaign_id: &'a str, seq: u64) -> EventStoreFuture<'a, Event>;

    /// Fetches one event by content hash.
    ///
    /// # Errors
    ///
    /// - `NotFound`: no such event
    fn get_event_by_hash<'a>(&'a self, hash: &'a str) -> EventStoreFuture<'a, Event>;

    /// Returns the highest assigned sequence of a campaign, or 0 if it has none.
    ///
    /// # Errors
    ///
    /// - `Storage`: the backend failed
    fn latest_event_seq<'a>(&'a self, campaign_id: &'a str) -> EventStoreFuture<'a, u64>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn chain_broken_error_display() {
        let error = EventStoreError::ChainBroken {
            seq: 3,
            expected: "aa".to_string(),
            actual: "bb".to_string(),
        };

        let display = format!("{error}");
        assert!(display.contains("seq 3"));
        assert!(display.contains("expected prev 'aa'"));
    }

    #[test]
    fn invalid_event_maps_to_invalid_input() {
        let error: JournalError = EventStoreError::InvalidEvent("seq supplied".into()).into();
        assert_eq!(error.kind(), ErrorKind::InvalidInput);
    }

    #[test]
    fn integrity_failures_map_to_unknown() {
        let error: JournalError = EventStoreError::SignatureInvalid { seq: 9 }.into();
        assert_eq!(error.kind(), ErrorKind::Unknown);
    }

    #[test]
    fn missing_event_maps_to_not_found() {
        let error: JournalError = EventStoreError::NotFound("camp-1#4".into()).into();
        assert!(error.is_not_found());
    }
}
