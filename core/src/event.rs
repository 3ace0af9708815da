//! The canonical journal event.
//!
//! An [`Event`] is an immutable fact about a campaign. Callers build one in
//! memory, [`normalize_for_append`](crate::normalize::normalize_for_append)
//! validates and defaults it, and the [`EventStore`](crate::event_store::EventStore)
//! assigns its identity and integrity fields (`seq`, `hash`, `prev_hash`,
//! `chain_hash`, `signature_key_id`, `signature`). After that it is only ever
//! read.
//!
//! # Example
//!
//! ```
//! use campaign_journal_core::event::{Event, event_types};
//!
//! let event = Event::new("camp-1", event_types::CAMPAIGN_CREATED)
//!     .with_entity("campaign", "camp-1")
//!     .with_payload(&serde_json::json!({ "name": "Test Campaign" }))
//!     .unwrap();
//!
//! assert_eq!(event.domain(), "campaign");
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::JournalError;

/// Event type names owned by the core projections.
///
/// Types are namespaced `domain.action`; everything before the first `.` is
/// the domain.
pub mod event_types {
    /// A campaign was created.
    pub const CAMPAIGN_CREATED: &str = "campaign.created";
    /// Sparse update of campaign fields (including status).
    pub const CAMPAIGN_UPDATED: &str = "campaign.updated";
    /// A campaign was forked from another campaign.
    pub const CAMPAIGN_FORKED: &str = "campaign.forked";

    /// A participant seat was added.
    pub const PARTICIPANT_JOINED: &str = "participant.joined";
    /// Sparse update of participant fields.
    pub const PARTICIPANT_UPDATED: &str = "participant.updated";
    /// A participant seat was removed.
    pub const PARTICIPANT_LEFT: &str = "participant.left";
    /// A user claimed a participant seat.
    pub const PARTICIPANT_BOUND: &str = "participant.bound";
    /// A user released a participant seat.
    pub const PARTICIPANT_UNBOUND: &str = "participant.unbound";
    /// A seat moved from one user to another.
    pub const SEAT_REASSIGNED: &str = "seat.reassigned";

    /// An invite was issued for a seat.
    pub const INVITE_CREATED: &str = "invite.created";
    /// An invite was claimed by a user.
    pub const INVITE_CLAIMED: &str = "invite.claimed";
    /// An invite was revoked.
    pub const INVITE_REVOKED: &str = "invite.revoked";
    /// Sparse update of invite fields.
    pub const INVITE_UPDATED: &str = "invite.updated";

    /// A character was created.
    pub const CHARACTER_CREATED: &str = "character.created";
    /// Sparse update of character fields.
    pub const CHARACTER_UPDATED: &str = "character.updated";
    /// A character was deleted.
    pub const CHARACTER_DELETED: &str = "character.deleted";

    /// A play session started.
    pub const SESSION_STARTED: &str = "session.started";
    /// A play session ended.
    pub const SESSION_ENDED: &str = "session.ended";
}

/// Who caused an event.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActorType {
    /// The platform itself (default).
    System,
    /// A campaign participant.
    Participant,
    /// The game master.
    Gm,
}

impl ActorType {
    /// Wire label of this actor type.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::System => "system",
            Self::Participant => "participant",
            Self::Gm => "gm",
        }
    }

    /// Whether events from this actor must name an actor id.
    #[must_use]
    pub const fn requires_actor_id(self) -> bool {
        matches!(self, Self::Participant | Self::Gm)
    }
}

impl fmt::Display for ActorType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ActorType {
    type Err = JournalError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "system" => Ok(Self::System),
            "participant" => Ok(Self::Participant),
            "gm" => Ok(Self::Gm),
            other => Err(JournalError::invalid_input(format!(
                "actor type must be system, participant or gm, got '{other}'"
            ))),
        }
    }
}

/// An immutable, ordered fact in a campaign's journal.
///
/// Field layout mirrors the wire shape: the actor type and payload stay in
/// their raw form so the normalizer can reject bad labels and malformed
/// payloads that come from outside the process.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    /// Campaign this event belongs to.
    pub campaign_id: String,
    /// Per-campaign sequence number, assigned by the event store (starts at 1).
    #[serde(default)]
    pub seq: u64,
    /// Content hash, assigned by the event store.
    #[serde(default)]
    pub hash: String,
    /// Chain hash of the previous event; empty for the first event.
    #[serde(default)]
    pub prev_hash: String,
    /// Hash linking this event to its predecessor.
    #[serde(default)]
    pub chain_hash: String,
    /// Identifier of the key that signed `chain_hash`.
    #[serde(default)]
    pub signature_key_id: String,
    /// Keyed signature over `chain_hash`.
    #[serde(default)]
    pub signature: String,
    /// When the event happened. Defaults to now during normalization.
    #[serde(default)]
    pub timestamp: Option<DateTime<Utc>>,
    /// Namespaced event type (`domain.action`).
    #[serde(rename = "type")]
    pub event_type: String,
    /// Optional play-session correlation id.
    #[serde(default)]
    pub session_id: String,
    /// Optional request correlation id.
    #[serde(default)]
    pub request_id: String,
    /// Optional invocation correlation id.
    #[serde(default)]
    pub invocation_id: String,
    /// Raw actor type label (`system`, `participant`, `gm`).
    #[serde(default)]
    pub actor_type: String,
    /// Actor identifier, required for participant and gm actors.
    #[serde(default)]
    pub actor_id: String,
    /// Type of the affected entity (e.g. `character`).
    #[serde(default)]
    pub entity_type: String,
    /// Identifier of the affected entity.
    #[serde(default)]
    pub entity_id: String,
    /// Owning game system, for adapter-owned events.
    #[serde(default)]
    pub system_id: String,
    /// Version of the owning game system.
    #[serde(default)]
    pub system_version: String,
    /// Serialized JSON payload.
    #[serde(default)]
    pub payload_json: Vec<u8>,
}

impl Event {
    /// Creates an event for `campaign_id` with the given type.
    #[must_use]
    pub fn new(campaign_id: impl Into<String>, event_type: impl Into<String>) -> Self {
        Self {
            campaign_id: campaign_id.into(),
            event_type: event_type.into(),
            ..Self::default()
        }
    }

    /// Sets the affected entity.
    #[must_use]
    pub fn with_entity(mut self, entity_type: impl Into<String>, entity_id: impl Into<String>) -> Self {
        self.entity_type = entity_type.into();
        self.entity_id = entity_id.into();
        self
    }

    /// Sets the actor.
    #[must_use]
    pub fn with_actor(mut self, actor_type: ActorType, actor_id: impl Into<String>) -> Self {
        self.actor_type = actor_type.as_str().to_string();
        self.actor_id = actor_id.into();
        self
    }

    /// Marks the event as owned by a game-system adapter.
    #[must_use]
    pub fn with_system(mut self, system_id: impl Into<String>, system_version: impl Into<String>) -> Self {
        self.system_id = system_id.into();
        self.system_version = system_version.into();
        self
    }

    /// Sets the occurrence time.
    #[must_use]
    pub const fn with_timestamp(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = Some(timestamp);
        self
    }

    /// Sets the play-session correlation id.
    #[must_use]
    pub fn with_session(mut self, session_id: impl Into<String>) -> Self {
        self.session_id = session_id.into();
        self
    }

    /// Serializes `payload` into `payload_json`.
    ///
    /// # Errors
    ///
    /// Returns [`JournalError::InvalidInput`] if the payload cannot be serialized.
    pub fn with_payload<T: Serialize>(mut self, payload: &T) -> Result<Self, JournalError> {
        self.payload_json = serde_json::to_vec(payload)
            .map_err(|e| JournalError::invalid_input(format!("encode payload: {e}")))?;
        Ok(self)
    }

    /// The domain prefix of the event type (text before the first `.`).
    #[must_use]
    pub fn domain(&self) -> &str {
        self.event_type
            .split_once('.')
            .map_or(self.event_type.as_str(), |(domain, _)| domain)
    }

    /// Parsed actor type; an empty label reads as [`ActorType::System`].
    ///
    /// # Errors
    ///
    /// Returns [`JournalError::InvalidInput`] for unknown labels.
    pub fn actor(&self) -> Result<ActorType, JournalError> {
        if self.actor_type.trim().is_empty() {
            return Ok(ActorType::System);
        }
        self.actor_type.parse()
    }

    /// Whether this event is owned by a game-system adapter.
    #[must_use]
    pub fn is_system_owned(&self) -> bool {
        !self.system_id.trim().is_empty()
    }

    /// Whether any storage-assigned field carries a value.
    #[must_use]
    pub fn has_storage_fields(&self) -> bool {
        self.seq != 0
            || !self.hash.is_empty()
            || !self.prev_hash.is_empty()
            || !self.chain_hash.is_empty()
            || !self.signature_key_id.is_empty()
            || !self.signature.is_empty()
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Event {{ campaign: {}, seq: {}, type: {} }}",
            self.campaign_id, self.seq, self.event_type
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn domain_is_prefix_before_first_dot() {
        let event = Event::new("c", "participant.joined");
        assert_eq!(event.domain(), "participant");

        let event = Event::new("c", "daggerheart.gm_fear.changed");
        assert_eq!(event.domain(), "daggerheart");

        let event = Event::new("c", "nodot");
        assert_eq!(event.domain(), "nodot");
    }

    #[test]
    fn empty_actor_reads_as_system() {
        let event = Event::new("c", "campaign.created");
        assert_eq!(event.actor(), Ok(ActorType::System));
    }

    #[test]
    fn unknown_actor_label_is_rejected() {
        let mut event = Event::new("c", "campaign.created");
        event.actor_type = "robot".to_string();
        assert!(event.actor().is_err());
    }

    #[test]
    fn storage_fields_detected() {
        let mut event = Event::new("c", "campaign.created");
        assert!(!event.has_storage_fields());
        event.signature = "abc".to_string();
        assert!(event.has_storage_fields());
    }

    #[test]
    fn display_names_campaign_and_type() {
        let event = Event::new("camp-1", "session.started");
        let display = format!("{event}");
        assert!(display.contains("camp-1"));
        assert!(display.contains("session.started"));
    }
}
