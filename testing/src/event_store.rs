//! In-memory event store for fast, deterministic tests.

#![allow(clippy::unwrap_used)] // Test infrastructure uses unwrap for simplicity

use campaign_journal_core::event::Event;
use campaign_journal_core::event_store::{EventStore, EventStoreError, EventStoreFuture};
use campaign_journal_core::integrity::{self, Keyring, SigningKey};
use campaign_journal_core::normalize::normalize_for_append;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

/// Key id of the default test signing key.
pub const TEST_KEY_ID: &str = "test-key";

/// `HashMap`-backed [`EventStore`].
///
/// Appends are serialized by a single write lock, so sequence assignment is
/// strictly monotonic per campaign. Every appended event is normalized again,
/// sealed with the store's signing key and indexed by content hash.
///
/// # Example
///
/// ```
/// use campaign_journal_core::event::Event;
/// use campaign_journal_core::event_store::EventStore;
/// use campaign_journal_testing::InMemoryEventStore;
///
/// # tokio_test::block_on(async {
/// let store = InMemoryEventStore::new();
/// let stored = store
///     .append_event(Event::new("camp-1", "campaign.created"))
///     .await
///     .unwrap();
///
/// assert_eq!(stored.seq, 1);
/// assert!(store.verify("camp-1").is_ok());
/// # });
/// ```
#[derive(Clone, Debug)]
pub struct InMemoryEventStore {
    journal: Arc<RwLock<Journal>>,
    signing_key: SigningKey,
}

#[derive(Debug, Default)]
struct Journal {
    campaigns: HashMap<String, Vec<Event>>,
    by_hash: HashMap<String, (String, usize)>,
}

impl InMemoryEventStore {
    /// Creates an empty store signing with a key derived from [`TEST_KEY_ID`].
    #[must_use]
    pub fn new() -> Self {
        Self::with_signing_key(SigningKey::derive(TEST_KEY_ID, "campaign-journal-testing"))
    }

    /// Creates an empty store signing with `signing_key`.
    #[must_use]
    pub fn with_signing_key(signing_key: SigningKey) -> Self {
        Self {
            journal: Arc::new(RwLock::new(Journal::default())),
            signing_key,
        }
    }

    /// A keyring holding this store's signing key.
    #[must_use]
    pub fn keyring(&self) -> Keyring {
        Keyring::new().with_key(self.signing_key.clone())
    }

    /// All events of a campaign, in order.
    #[must_use]
    pub fn all_events(&self, campaign_id: &str) -> Vec<Event> {
        self.journal
            .read()
            .unwrap()
            .campaigns
            .get(campaign_id)
            .cloned()
            .unwrap_or_default()
    }

    /// Verifies the hash chain and signatures of a campaign.
    ///
    /// # Errors
    ///
    /// Returns the first integrity failure.
    pub fn verify(&self, campaign_id: &str) -> Result<(), EventStoreError> {
        integrity::verify_chain(&self.all_events(campaign_id), &self.keyring())
    }

    /// Overwrites a stored event in place, bypassing every check.
    ///
    /// Simulates corrupted or tampered storage; the hash index is not updated.
    pub fn tamper<F>(&self, campaign_id: &str, seq: u64, mutate: F)
    where
        F: FnOnce(&mut Event),
    {
        let mut journal = self.journal.write().unwrap();
        if let Some(event) = journal
            .campaigns
            .get_mut(campaign_id)
            .and_then(|events| events.iter_mut().find(|e| e.seq == seq))
        {
            mutate(event);
        }
    }

    /// Number of events across all campaigns.
    #[must_use]
    pub fn len(&self) -> usize {
        self.journal.read().unwrap().by_hash.len()
    }

    /// Whether no event has been appended.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn append(&self, event: Event) -> Result<Event, EventStoreError> {
        let mut event = normalize_for_append(event)?;

        let mut journal = self.journal.write().unwrap();
        let events = journal
            .campaigns
            .entry(event.campaign_id.clone())
            .or_default();
        let prev_chain_hash = events
            .last()
            .map(|last| last.chain_hash.clone())
            .unwrap_or_default();

        event.seq = u64::try_from(events.len()).unwrap() + 1;
        integrity::seal(&mut event, &prev_chain_hash, &self.signing_key)?;

        let index = events.len();
        events.push(event.clone());
        journal
            .by_hash
            .insert(event.hash.clone(), (event.campaign_id.clone(), index));
        Ok(event)
    }
}

impl Default for InMemoryEventStore {
    fn default() -> Self {
        Self::new()
    }
}

impl EventStore for InMemoryEventStore {
    fn append_event(&self, event: Event) -> EventStoreFuture<'_, Event> {
        Box::pin(async move { self.append(event) })
    }

    fn list_events<'a>(
        &'a self,
        campaign_id: &'a str,
        after_seq: u64,
        limit: usize,
    ) -> EventStoreFuture<'a, Vec<Event>> {
        Box::pin(async move {
            let journal = self.journal.read().unwrap();
            Ok(journal
                .campaigns
                .get(campaign_id)
                .map(|events| {
                    events
                        .iter()
                        .filter(|e| e.seq > after_seq)
                        .take(limit)
                        .cloned()
                        .collect()
                })
                .unwrap_or_default())
        })
    }

    fn get_event_by_seq<'a>(&'a self, campaign_id: &'a str, seq: u64) -> EventStoreFuture<'a, Event> {
        Box::pin(async move {
            let journal = self.journal.read().unwrap();
            journal
                .campaigns
                .get(campaign_id)
                .and_then(|events| events.iter().find(|e| e.seq == seq))
                .cloned()
                .ok_or_else(|| EventStoreError::NotFound(format!("{campaign_id} seq {seq}")))
        })
    }

    fn get_event_by_hash<'a>(&'a self, hash: &'a str) -> EventStoreFuture<'a, Event> {
        Box::pin(async move {
            let journal = self.journal.read().unwrap();
            journal
                .by_hash
                .get(hash)
                .and_then(|(campaign_id, index)| journal.campaigns.get(campaign_id)?.get(*index))
                .cloned()
                .ok_or_else(|| EventStoreError::NotFound(format!("hash {hash}")))
        })
    }

    fn latest_event_seq<'a>(&'a self, campaign_id: &'a str) -> EventStoreFuture<'a, u64> {
        Box::pin(async move {
            let journal = self.journal.read().unwrap();
            Ok(journal
                .campaigns
                .get(campaign_id)
                .and_then(|events| events.last())
                .map_or(0, |last| last.seq))
        })
    }
}
