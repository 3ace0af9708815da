//! Given-When-Then harness for journal tests.
//!
//! Appends events to an [`InMemoryEventStore`] and applies each stored event
//! through the applier under test, the way the online path does.

#![allow(clippy::module_name_repetitions)] // JournalHarness is the natural name

use campaign_journal_core::error::JournalError;
use campaign_journal_core::event::Event;
use campaign_journal_core::event_store::EventStore;
use campaign_journal_core::projection::EventApplier;
use std::sync::Arc;

use crate::event_store::InMemoryEventStore;

/// Fluent harness over an event store and an applier.
///
/// # Example
///
/// ```ignore
/// use campaign_journal_testing::{InMemoryProjections, JournalHarness};
///
/// let projections = InMemoryProjections::new();
/// let harness = JournalHarness::new(Arc::new(Applier::new(projections.stores())));
///
/// harness.given([campaign_created("camp-1")]).await?;
/// harness.when(participant_joined("camp-1", "part-1")).await?;
///
/// assert_eq!(projections.campaign("camp-1").unwrap().participant_count, 1);
/// ```
#[derive(Clone)]
pub struct JournalHarness {
    store: InMemoryEventStore,
    applier: Arc<dyn EventApplier>,
}

impl JournalHarness {
    /// Create a harness with a fresh event store
    #[must_use]
    pub fn new(applier: Arc<dyn EventApplier>) -> Self {
        Self {
            store: InMemoryEventStore::new(),
            applier,
        }
    }

    /// Use an existing event store
    #[must_use]
    pub fn with_store(mut self, store: InMemoryEventStore) -> Self {
        self.store = store;
        self
    }

    /// The event store behind the harness
    #[must_use]
    pub const fn store(&self) -> &InMemoryEventStore {
        &self.store
    }

    /// Append and apply events in order (Given)
    ///
    /// # Errors
    ///
    /// Returns the first append or apply failure.
    pub async fn given<I>(&self, events: I) -> Result<Vec<Event>, JournalError>
    where
        I: IntoIterator<Item = Event>,
    {
        let mut stored = Vec::new();
        for event in events {
            stored.push(self.when(event).await?);
        }
        Ok(stored)
    }

    /// Append and apply one event (When)
    ///
    /// # Errors
    ///
    /// Returns the append or apply failure. A failed apply leaves the event
    /// in the journal.
    pub async fn when(&self, event: Event) -> Result<Event, JournalError> {
        let stored = self.store.append_event(event).await?;
        self.applier.apply(&stored).await?;
        Ok(stored)
    }

    /// Append events without applying them
    ///
    /// Useful for building a journal that a test then replays.
    ///
    /// # Errors
    ///
    /// Returns the first append failure.
    pub async fn record<I>(&self, events: I) -> Result<Vec<Event>, JournalError>
    where
        I: IntoIterator<Item = Event>,
    {
        let mut stored = Vec::new();
        for event in events {
            stored.push(self.store.append_event(event).await?);
        }
        Ok(stored)
    }
}

impl std::fmt::Debug for JournalHarness {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JournalHarness")
            .field("store", &self.store)
            .finish_non_exhaustive()
    }
}
