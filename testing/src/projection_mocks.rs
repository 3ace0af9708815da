//! In-memory projection testing utilities
//!
//! Provides fast, deterministic implementations of every projection store:
//! - [`InMemoryCampaignStore`], [`InMemoryParticipantStore`],
//!   [`InMemoryCharacterStore`], [`InMemoryInviteStore`],
//!   [`InMemorySessionStore`], [`InMemoryClaimIndex`]
//! - [`InMemoryReplayCheckpoint`]: watermark tracking for resumable replay
//! - [`InMemoryProjections`]: all of the above, wired into `ProjectionStores`

#![allow(clippy::unwrap_used)] // Test infrastructure uses unwrap for simplicity
#![allow(clippy::missing_panics_doc)] // Test utilities document panics where critical

use campaign_journal_core::error::JournalError;
use campaign_journal_core::labels::{InviteStatus, SessionStatus};
use campaign_journal_core::projection::{ReplayCheckpoint, Watermark};
use campaign_journal_core::records::{
    Campaign, Character, Invite, Participant, ParticipantClaim, Session,
};
use campaign_journal_core::store::{
    CampaignStore, CharacterStore, ClaimIndexStore, InviteStore, ParticipantStore,
    ProjectionStores, SessionStore, StoreFuture,
};
use chrono::{DateTime, Utc};
use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, RwLock};

type Key = (String, String);

fn key(campaign_id: &str, id: &str) -> Key {
    (campaign_id.to_string(), id.to_string())
}

/// In-memory campaign store.
#[derive(Clone, Debug, Default)]
pub struct InMemoryCampaignStore {
    data: Arc<RwLock<HashMap<String, Campaign>>>,
}

impl InMemoryCampaignStore {
    /// Create a new empty store
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of a campaign, if present
    #[must_use]
    pub fn snapshot(&self, campaign_id: &str) -> Option<Campaign> {
        self.data.read().unwrap().get(campaign_id).cloned()
    }
}

impl CampaignStore for InMemoryCampaignStore {
    fn get<'a>(&'a self, campaign_id: &'a str) -> StoreFuture<'a, Campaign> {
        Box::pin(async move {
            self.data
                .read()
                .unwrap()
                .get(campaign_id)
                .cloned()
                .ok_or_else(|| JournalError::not_found("campaign", campaign_id))
        })
    }

    fn put(&self, campaign: Campaign) -> StoreFuture<'_, ()> {
        Box::pin(async move {
            self.data
                .write()
                .unwrap()
                .insert(campaign.id.clone(), campaign);
            Ok(())
        })
    }
}

/// In-memory participant store, ordered by `(campaign, participant)`.
#[derive(Clone, Debug, Default)]
pub struct InMemoryParticipantStore {
    data: Arc<RwLock<BTreeMap<Key, Participant>>>,
}

impl InMemoryParticipantStore {
    /// Create a new empty store
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of a participant, if present
    #[must_use]
    pub fn snapshot(&self, campaign_id: &str, participant_id: &str) -> Option<Participant> {
        self.data
            .read()
            .unwrap()
            .get(&key(campaign_id, participant_id))
            .cloned()
    }
}

impl ParticipantStore for InMemoryParticipantStore {
    fn get<'a>(&'a self, campaign_id: &'a str, participant_id: &'a str) -> StoreFuture<'a, Participant> {
        Box::pin(async move {
            self.snapshot(campaign_id, participant_id)
                .ok_or_else(|| JournalError::not_found("participant", participant_id))
        })
    }

    fn put(&self, participant: Participant) -> StoreFuture<'_, ()> {
        Box::pin(async move {
            self.data.write().unwrap().insert(
                key(&participant.campaign_id, &participant.id),
                participant,
            );
            Ok(())
        })
    }

    fn delete<'a>(&'a self, campaign_id: &'a str, participant_id: &'a str) -> StoreFuture<'a, ()> {
        Box::pin(async move {
            self.data
                .write()
                .unwrap()
                .remove(&key(campaign_id, participant_id));
            Ok(())
        })
    }

    fn list<'a>(&'a self, campaign_id: &'a str) -> StoreFuture<'a, Vec<Participant>> {
        Box::pin(async move {
            Ok(self
                .data
                .read()
                .unwrap()
                .values()
                .filter(|p| p.campaign_id == campaign_id)
                .cloned()
                .collect())
        })
    }
}

/// In-memory character store.
#[derive(Clone, Debug, Default)]
pub struct InMemoryCharacterStore {
    data: Arc<RwLock<HashMap<Key, Character>>>,
}

impl InMemoryCharacterStore {
    /// Create a new empty store
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of a character, if present
    #[must_use]
    pub fn snapshot(&self, campaign_id: &str, character_id: &str) -> Option<Character> {
        self.data
            .read()
            .unwrap()
            .get(&key(campaign_id, character_id))
            .cloned()
    }

    /// Number of stored characters
    #[must_use]
    pub fn len(&self) -> usize {
        self.data.read().unwrap().len()
    }

    /// Check if the store is empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.read().unwrap().is_empty()
    }
}

impl CharacterStore for InMemoryCharacterStore {
    fn get<'a>(&'a self, campaign_id: &'a str, character_id: &'a str) -> StoreFuture<'a, Character> {
        Box::pin(async move {
            self.snapshot(campaign_id, character_id)
                .ok_or_else(|| JournalError::not_found("character", character_id))
        })
    }

    fn put(&self, character: Character) -> StoreFuture<'_, ()> {
        Box::pin(async move {
            self.data
                .write()
                .unwrap()
                .insert(key(&character.campaign_id, &character.id), character);
            Ok(())
        })
    }

    fn delete<'a>(&'a self, campaign_id: &'a str, character_id: &'a str) -> StoreFuture<'a, ()> {
        Box::pin(async move {
            self.data
                .write()
                .unwrap()
                .remove(&key(campaign_id, character_id));
            Ok(())
        })
    }
}

/// In-memory invite store, keyed by invite id.
#[derive(Clone, Debug, Default)]
pub struct InMemoryInviteStore {
    data: Arc<RwLock<BTreeMap<String, Invite>>>,
}

impl InMemoryInviteStore {
    /// Create a new empty store
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of an invite, if present
    #[must_use]
    pub fn snapshot(&self, invite_id: &str) -> Option<Invite> {
        self.data.read().unwrap().get(invite_id).cloned()
    }
}

impl InviteStore for InMemoryInviteStore {
    fn put(&self, invite: Invite) -> StoreFuture<'_, ()> {
        Box::pin(async move {
            self.data.write().unwrap().insert(invite.id.clone(), invite);
            Ok(())
        })
    }

    fn get<'a>(&'a self, invite_id: &'a str) -> StoreFuture<'a, Invite> {
        Box::pin(async move {
            self.snapshot(invite_id)
                .ok_or_else(|| JournalError::not_found("invite", invite_id))
        })
    }

    fn update_status<'a>(
        &'a self,
        invite_id: &'a str,
        status: InviteStatus,
        updated_at: DateTime<Utc>,
    ) -> StoreFuture<'a, ()> {
        Box::pin(async move {
            let mut data = self.data.write().unwrap();
            let invite = data
                .get_mut(invite_id)
                .ok_or_else(|| JournalError::not_found("invite", invite_id))?;
            invite.status = status;
            invite.updated_at = updated_at;
            Ok(())
        })
    }

    fn list<'a>(&'a self, campaign_id: &'a str) -> StoreFuture<'a, Vec<Invite>> {
        Box::pin(async move {
            Ok(self
                .data
                .read()
                .unwrap()
                .values()
                .filter(|i| i.campaign_id == campaign_id)
                .cloned()
                .collect())
        })
    }
}

/// In-memory session store enforcing one active session per campaign.
#[derive(Clone, Debug, Default)]
pub struct InMemorySessionStore {
    data: Arc<RwLock<HashMap<Key, Session>>>,
}

impl InMemorySessionStore {
    /// Create a new empty store
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of a session, if present
    #[must_use]
    pub fn snapshot(&self, campaign_id: &str, session_id: &str) -> Option<Session> {
        self.data
            .read()
            .unwrap()
            .get(&key(campaign_id, session_id))
            .cloned()
    }
}

impl SessionStore for InMemorySessionStore {
    fn put(&self, session: Session) -> StoreFuture<'_, ()> {
        Box::pin(async move {
            let mut data = self.data.write().unwrap();
            if session.status == SessionStatus::Active {
                if let Some(active) = data.values().find(|s| {
                    s.campaign_id == session.campaign_id
                        && s.status == SessionStatus::Active
                        && s.id != session.id
                }) {
                    return Err(JournalError::InvalidStateTransition(format!(
                        "campaign {} already has active session {}",
                        session.campaign_id, active.id
                    )));
                }
            }
            data.insert(key(&session.campaign_id, &session.id), session);
            Ok(())
        })
    }

    fn get<'a>(&'a self, campaign_id: &'a str, session_id: &'a str) -> StoreFuture<'a, Session> {
        Box::pin(async move {
            self.snapshot(campaign_id, session_id)
                .ok_or_else(|| JournalError::not_found("session", session_id))
        })
    }

    fn end_session<'a>(
        &'a self,
        campaign_id: &'a str,
        session_id: &'a str,
        ended_at: DateTime<Utc>,
    ) -> StoreFuture<'a, (Session, bool)> {
        Box::pin(async move {
            let mut data = self.data.write().unwrap();
            let session = data
                .get_mut(&key(campaign_id, session_id))
                .ok_or_else(|| JournalError::not_found("session", session_id))?;
            if session.status == SessionStatus::Ended {
                return Ok((session.clone(), false));
            }
            session.status = SessionStatus::Ended;
            session.ended_at = Some(ended_at);
            session.updated_at = ended_at;
            Ok((session.clone(), true))
        })
    }

    fn get_active<'a>(&'a self, campaign_id: &'a str) -> StoreFuture<'a, Session> {
        Box::pin(async move {
            self.data
                .read()
                .unwrap()
                .values()
                .find(|s| s.campaign_id == campaign_id && s.status == SessionStatus::Active)
                .cloned()
                .ok_or_else(|| JournalError::not_found("active session", campaign_id))
        })
    }
}

/// In-memory claim index: `(campaign, user) -> participant`.
#[derive(Clone, Debug, Default)]
pub struct InMemoryClaimIndex {
    data: Arc<RwLock<HashMap<Key, ParticipantClaim>>>,
}

impl InMemoryClaimIndex {
    /// Create a new empty index
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Seat claimed by a user, if any
    #[must_use]
    pub fn claimed_seat(&self, campaign_id: &str, user_id: &str) -> Option<String> {
        self.data
            .read()
            .unwrap()
            .get(&key(campaign_id, user_id))
            .map(|claim| claim.participant_id.clone())
    }

    /// Number of claims
    #[must_use]
    pub fn len(&self) -> usize {
        self.data.read().unwrap().len()
    }

    /// Check if the index is empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.read().unwrap().is_empty()
    }
}

impl ClaimIndexStore for InMemoryClaimIndex {
    fn put(&self, claim: ParticipantClaim) -> StoreFuture<'_, ()> {
        Box::pin(async move {
            let mut data = self.data.write().unwrap();
            let key = key(&claim.campaign_id, &claim.user_id);
            match data.get(&key) {
                Some(existing) if existing.participant_id == claim.participant_id => Ok(()),
                Some(existing) => Err(JournalError::ClaimConflict {
                    user_id: claim.user_id,
                    participant_id: existing.participant_id.clone(),
                }),
                None => {
                    data.insert(key, claim);
                    Ok(())
                }
            }
        })
    }

    fn get<'a>(&'a self, campaign_id: &'a str, user_id: &'a str) -> StoreFuture<'a, ParticipantClaim> {
        Box::pin(async move {
            self.data
                .read()
                .unwrap()
                .get(&key(campaign_id, user_id))
                .cloned()
                .ok_or_else(|| JournalError::not_found("participant claim", user_id))
        })
    }

    fn delete<'a>(&'a self, campaign_id: &'a str, user_id: &'a str) -> StoreFuture<'a, ()> {
        Box::pin(async move {
            self.data.write().unwrap().remove(&key(campaign_id, user_id));
            Ok(())
        })
    }
}

/// In-memory replay watermarks for testing resumable replay.
///
/// # Example
///
/// ```
/// use campaign_journal_testing::InMemoryReplayCheckpoint;
/// use campaign_journal_core::projection::{ReplayCheckpoint, Watermark};
/// use chrono::Utc;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let checkpoint = InMemoryReplayCheckpoint::new();
///
/// let mark = Watermark::new(42, Utc::now());
/// checkpoint.save("camp-1", mark).await?;
///
/// assert_eq!(checkpoint.load("camp-1").await?, Some(mark));
/// # Ok(())
/// # }
/// ```
#[derive(Clone, Debug, Default)]
pub struct InMemoryReplayCheckpoint {
    watermarks: Arc<RwLock<HashMap<String, Watermark>>>,
}

impl InMemoryReplayCheckpoint {
    /// Create a new empty checkpoint tracker
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the number of tracked campaigns
    #[must_use]
    pub fn len(&self) -> usize {
        self.watermarks.read().unwrap().len()
    }

    /// Check if no campaigns are tracked
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.watermarks.read().unwrap().is_empty()
    }
}

impl ReplayCheckpoint for InMemoryReplayCheckpoint {
    fn save<'a>(&'a self, campaign_id: &'a str, watermark: Watermark) -> StoreFuture<'a, ()> {
        Box::pin(async move {
            self.watermarks
                .write()
                .unwrap()
                .insert(campaign_id.to_string(), watermark);
            Ok(())
        })
    }

    fn load<'a>(&'a self, campaign_id: &'a str) -> StoreFuture<'a, Option<Watermark>> {
        Box::pin(async move { Ok(self.watermarks.read().unwrap().get(campaign_id).copied()) })
    }
}

/// Every in-memory projection store, shared with a [`ProjectionStores`] set.
///
/// Keeps concrete handles so tests can inspect state after applying events.
///
/// # Example
///
/// ```ignore
/// let projections = InMemoryProjections::new();
/// let applier = Applier::new(projections.stores());
///
/// applier.apply(&event).await?;
/// assert_eq!(projections.campaign("camp-1").unwrap().participant_count, 1);
/// ```
#[derive(Clone, Debug, Default)]
pub struct InMemoryProjections {
    /// Campaign records.
    pub campaigns: Arc<InMemoryCampaignStore>,
    /// Participant records.
    pub participants: Arc<InMemoryParticipantStore>,
    /// Character records.
    pub characters: Arc<InMemoryCharacterStore>,
    /// Invite records.
    pub invites: Arc<InMemoryInviteStore>,
    /// Session records.
    pub sessions: Arc<InMemorySessionStore>,
    /// Claim index.
    pub claims: Arc<InMemoryClaimIndex>,
}

impl InMemoryProjections {
    /// Create a fresh, empty set of stores
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// All stores as a [`ProjectionStores`] set
    #[must_use]
    pub fn stores(&self) -> ProjectionStores {
        ProjectionStores::new()
            .with_campaigns(self.campaigns.clone())
            .with_participants(self.participants.clone())
            .with_characters(self.characters.clone())
            .with_invites(self.invites.clone())
            .with_sessions(self.sessions.clone())
            .with_claims(self.claims.clone())
    }

    /// Snapshot of a campaign
    #[must_use]
    pub fn campaign(&self, campaign_id: &str) -> Option<Campaign> {
        self.campaigns.snapshot(campaign_id)
    }

    /// Snapshot of a participant
    #[must_use]
    pub fn participant(&self, campaign_id: &str, participant_id: &str) -> Option<Participant> {
        self.participants.snapshot(campaign_id, participant_id)
    }

    /// Snapshot of a character
    #[must_use]
    pub fn character(&self, campaign_id: &str, character_id: &str) -> Option<Character> {
        self.characters.snapshot(campaign_id, character_id)
    }

    /// Snapshot of an invite
    #[must_use]
    pub fn invite(&self, invite_id: &str) -> Option<Invite> {
        self.invites.snapshot(invite_id)
    }

    /// Snapshot of a session
    #[must_use]
    pub fn session(&self, campaign_id: &str, session_id: &str) -> Option<Session> {
        self.sessions.snapshot(campaign_id, session_id)
    }
}
