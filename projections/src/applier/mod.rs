//! The projection applier.
//!
//! Turns one stored event into projection-store mutations. Core event types
//! dispatch to one handler each; an unrecognized type that names a
//! `system_id` is forwarded to the owning [`SystemAdapter`]; anything else is
//! ignored so older binaries tolerate newer event types.
//!
//! Every handler follows the same steps:
//!
//! 1. require the projection store(s) it writes (else `Unavailable`)
//! 2. require the identifying fields (campaign id, payload id or `entity_id`)
//! 3. decode the payload
//! 4. parse enumerated labels into typed values
//! 5. mutate and write back the target record
//! 6. adjust secondary aggregates (counters, claim index)
//! 7. stamp `updated_at` from the event timestamp
//!
//! [`SystemAdapter`]: campaign_journal_core::system::SystemAdapter

mod campaign;
mod character;
mod invite;
mod participant;
mod seat;
mod session;

use std::str::FromStr;
use std::sync::Arc;

use campaign_journal_core::environment::{Clock, SystemClock};
use campaign_journal_core::error::JournalError;
use campaign_journal_core::event::{Event, event_types};
use campaign_journal_core::projection::EventApplier;
use campaign_journal_core::store::{
    CampaignStore, CharacterStore, ClaimIndexStore, InviteStore, ParticipantStore,
    ProjectionStores, SessionStore, StoreFuture,
};
use chrono::{DateTime, Utc};

use crate::metrics::ApplierMetrics;
use crate::registry::AdapterRegistry;

/// Applies journal events to the configured projection stores.
///
/// # Example
///
/// ```ignore
/// let applier = Applier::new(stores)
///     .with_adapters(Arc::new(registry))
///     .with_clock(Arc::new(SystemClock));
///
/// applier.apply(&stored_event).await?;
/// ```
#[derive(Clone)]
pub struct Applier {
    stores: ProjectionStores,
    adapters: Arc<AdapterRegistry>,
    clock: Arc<dyn Clock>,
}

impl Applier {
    /// Creates an applier with no system adapters and the system clock.
    #[must_use]
    pub fn new(stores: ProjectionStores) -> Self {
        Self {
            stores,
            adapters: Arc::new(AdapterRegistry::new()),
            clock: Arc::new(SystemClock),
        }
    }

    /// Sets the adapter registry used for system-owned events.
    #[must_use]
    pub fn with_adapters(mut self, adapters: Arc<AdapterRegistry>) -> Self {
        self.adapters = adapters;
        self
    }

    /// Sets the clock used when an event carries no timestamp.
    #[must_use]
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// The configured projection stores.
    #[must_use]
    pub const fn stores(&self) -> &ProjectionStores {
        &self.stores
    }

    /// The adapter registry.
    #[must_use]
    pub fn adapters(&self) -> &AdapterRegistry {
        &self.adapters
    }

    /// Applies one event.
    ///
    /// # Errors
    ///
    /// Returns the first error of the handler: `Unavailable` for a missing
    /// store, `InvalidInput` for missing ids or bad payloads, `NotFound` for
    /// missing records or adapters, `InvalidStateTransition` for rejected
    /// status or seat changes, or whatever the store reports.
    pub async fn apply(&self, event: &Event) -> Result<(), JournalError> {
        match event.event_type.as_str() {
            event_types::CAMPAIGN_CREATED => self.campaign_created(event).await?,
            event_types::CAMPAIGN_UPDATED => self.campaign_updated(event).await?,
            event_types::CAMPAIGN_FORKED => self.campaign_forked(event).await?,
            event_types::PARTICIPANT_JOINED => self.participant_joined(event).await?,
            event_types::PARTICIPANT_UPDATED => self.participant_updated(event).await?,
            event_types::PARTICIPANT_LEFT => self.participant_left(event).await?,
            event_types::PARTICIPANT_BOUND => self.participant_bound(event).await?,
            event_types::PARTICIPANT_UNBOUND => self.participant_unbound(event).await?,
            event_types::SEAT_REASSIGNED => self.seat_reassigned(event).await?,
            event_types::INVITE_CREATED => self.invite_created(event).await?,
            event_types::INVITE_CLAIMED => self.invite_claimed(event).await?,
            event_types::INVITE_REVOKED => self.invite_revoked(event).await?,
            event_types::INVITE_UPDATED => self.invite_updated(event).await?,
            event_types::CHARACTER_CREATED => self.character_created(event).await?,
            event_types::CHARACTER_UPDATED => self.character_updated(event).await?,
            event_types::CHARACTER_DELETED => self.character_deleted(event).await?,
            event_types::SESSION_STARTED => self.session_started(event).await?,
            event_types::SESSION_ENDED => self.session_ended(event).await?,
            _ if event.is_system_owned() => {
                let adapter = self
                    .adapters
                    .resolve(&event.system_id, &event.system_version)?;
                adapter.apply_event(event).await?;
            }
            other => {
                tracing::debug!(
                    campaign_id = %event.campaign_id,
                    seq = event.seq,
                    event_type = other,
                    "Ignoring unknown event type"
                );
                return Ok(());
            }
        }

        ApplierMetrics::record_applied(event.domain());
        Ok(())
    }

    // Dependency lookups.

    fn campaign_store(&self) -> Result<&dyn CampaignStore, JournalError> {
        self.stores
            .campaigns
            .as_deref()
            .ok_or_else(|| JournalError::unavailable("campaign store"))
    }

    fn participant_store(&self) -> Result<&dyn ParticipantStore, JournalError> {
        self.stores
            .participants
            .as_deref()
            .ok_or_else(|| JournalError::unavailable("participant store"))
    }

    fn character_store(&self) -> Result<&dyn CharacterStore, JournalError> {
        self.stores
            .characters
            .as_deref()
            .ok_or_else(|| JournalError::unavailable("character store"))
    }

    fn invite_store(&self) -> Result<&dyn InviteStore, JournalError> {
        self.stores
            .invites
            .as_deref()
            .ok_or_else(|| JournalError::unavailable("invite store"))
    }

    fn session_store(&self) -> Result<&dyn SessionStore, JournalError> {
        self.stores
            .sessions
            .as_deref()
            .ok_or_else(|| JournalError::unavailable("session store"))
    }

    fn claim_store(&self) -> Result<&dyn ClaimIndexStore, JournalError> {
        self.stores
            .claims
            .as_deref()
            .ok_or_else(|| JournalError::unavailable("claim index store"))
    }

    /// Time to stamp records with: the event's timestamp, else now.
    fn stamp(&self, event: &Event) -> DateTime<Utc> {
        event.timestamp.unwrap_or_else(|| self.clock.now())
    }
}

impl EventApplier for Applier {
    fn apply<'a>(&'a self, event: &'a Event) -> StoreFuture<'a, ()> {
        Box::pin(Self::apply(self, event))
    }
}

impl std::fmt::Debug for Applier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Applier")
            .field("stores", &self.stores)
            .field("adapters", &self.adapters)
            .finish_non_exhaustive()
    }
}

/// Parses an enumerated label, using `default` when the label is empty.
fn label_or<T>(raw: &str, default: T) -> Result<T, JournalError>
where
    T: FromStr<Err = JournalError>,
{
    if raw.trim().is_empty() {
        Ok(default)
    } else {
        raw.parse()
    }
}

/// A required, trimmed, non-empty payload string.
fn required(value: &str, what: &str) -> Result<String, JournalError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(JournalError::invalid_input(format!("{what} is required")));
    }
    Ok(value.to_string())
}

/// Decrements a counter, flooring at zero with a warning.
fn floored_decrement(count: u32, counter: &'static str, campaign_id: &str, seq: u64) -> u32 {
    if count == 0 {
        tracing::warn!(
            campaign_id,
            seq,
            counter,
            "Counter already at zero, decrement floored"
        );
        return 0;
    }
    count - 1
}
