//! # Campaign Journal Core
//!
//! Core types and contracts for a per-campaign event journal.
//!
//! Every state change of a tabletop campaign is recorded as an immutable,
//! ordered [`Event`](event::Event). Campaign state is rebuilt by replaying the
//! journal through projections.
//!
//! ## Core Concepts
//!
//! - **Event**: the atomic, immutable fact (`campaign.created`, `participant.joined`, ...)
//! - **Normalizer**: validates and defaults an event before append
//! - **Event Store**: assigns `seq`, hashes and signature, and serves ordered reads
//! - **Projection stores**: derived read models (campaigns, participants, ...)
//! - **System adapters**: game-system-owned events and state
//!
//! ## Flow
//!
//! ```text
//! caller ─▶ normalize_for_append ─▶ EventStore::append_event ─▶ EventApplier::apply
//!                                                                  │
//!                                             projection stores ◀──┴──▶ SystemAdapter
//! ```
//!
//! ## Example
//!
//! ```
//! use campaign_journal_core::event::{Event, event_types};
//! use campaign_journal_core::normalize::normalize_for_append;
//!
//! let event = Event::new("camp-1", event_types::CAMPAIGN_CREATED)
//!     .with_payload(&serde_json::json!({
//!         "name": "Test Campaign",
//!         "game_system": "DAGGERHEART",
//!         "gm_mode": "GM_MODE_HUMAN",
//!     }))
//!     .unwrap();
//!
//! let normalized = normalize_for_append(event).unwrap();
//! assert_eq!(normalized.actor_type, "system");
//! assert_eq!(normalized.seq, 0); // assigned by the event store
//! ```

// Re-export commonly used types
pub use chrono::{DateTime, Utc};

pub mod error;
pub mod event;
pub mod event_store;
pub mod integrity;
pub mod labels;
pub mod normalize;
pub mod projection;
pub mod records;
pub mod store;
pub mod system;

pub use error::{ErrorKind, JournalError, Result};
pub use event::{ActorType, Event};
pub use event_store::{EventStore, EventStoreError};

/// Environment module - Dependency injection traits
///
/// All sources of nondeterminism the core needs are abstracted behind traits
/// so tests can pin them.
pub mod environment {
    use chrono::{DateTime, Utc};

    /// Clock trait - abstracts time operations for testability
    ///
    /// # Examples
    ///
    /// ```
    /// use campaign_journal_core::environment::{Clock, SystemClock};
    ///
    /// let clock = SystemClock;
    /// let _now = clock.now();
    /// ```
    pub trait Clock: Send + Sync {
        /// Get the current time
        fn now(&self) -> DateTime<Utc>;
    }

    /// Wall-clock time in UTC.
    #[derive(Debug, Clone, Copy, Default)]
    pub struct SystemClock;

    impl Clock for SystemClock {
        fn now(&self) -> DateTime<Utc> {
            Utc::now()
        }
    }
}
