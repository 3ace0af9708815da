//! Projection store contracts.
//!
//! Each store owns one record type, keyed by campaign id plus entity id where
//! applicable. A missing record is always reported as
//! [`JournalError::NotFound`] so handlers can branch on
//! [`JournalError::is_not_found`].
//!
//! # Dyn Compatibility
//!
//! All methods return [`StoreFuture`] so stores can be injected into the
//! applier as `Arc<dyn ...>`.

use chrono::{DateTime, Utc};
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use crate::error::JournalError;
use crate::labels::InviteStatus;
use crate::records::{Campaign, Character, Invite, Participant, ParticipantClaim, Session};

/// Boxed future returned by projection store methods.
pub type StoreFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T, JournalError>> + Send + 'a>>;

/// Campaign projection storage.
pub trait CampaignStore: Send + Sync {
    /// Loads a campaign.
    fn get<'a>(&'a self, campaign_id: &'a str) -> StoreFuture<'a, Campaign>;

    /// Inserts or replaces a campaign.
    fn put(&self, campaign: Campaign) -> StoreFuture<'_, ()>;
}

/// Participant projection storage.
pub trait ParticipantStore: Send + Sync {
    /// Loads a participant.
    fn get<'a>(&'a self, campaign_id: &'a str, participant_id: &'a str) -> StoreFuture<'a, Participant>;

    /// Inserts or replaces a participant.
    fn put(&self, participant: Participant) -> StoreFuture<'_, ()>;

    /// Removes a participant. Removing a missing participant is not an error.
    fn delete<'a>(&'a self, campaign_id: &'a str, participant_id: &'a str) -> StoreFuture<'a, ()>;

    /// Lists a campaign's participants ordered by id.
    fn list<'a>(&'a self, campaign_id: &'a str) -> StoreFuture<'a, Vec<Participant>>;
}

/// Character projection storage.
pub trait CharacterStore: Send + Sync {
    /// Loads a character.
    fn get<'a>(&'a self, campaign_id: &'a str, character_id: &'a str) -> StoreFuture<'a, Character>;

    /// Inserts or replaces a character.
    fn put(&self, character: Character) -> StoreFuture<'_, ()>;

    /// Removes a character. Removing a missing character is not an error.
    fn delete<'a>(&'a self, campaign_id: &'a str, character_id: &'a str) -> StoreFuture<'a, ()>;
}

/// Invite projection storage.
pub trait InviteStore: Send + Sync {
    /// Inserts or replaces an invite.
    fn put(&self, invite: Invite) -> StoreFuture<'_, ()>;

    /// Loads an invite by id.
    fn get<'a>(&'a self, invite_id: &'a str) -> StoreFuture<'a, Invite>;

    /// Sets an invite's status and `updated_at`.
    fn update_status<'a>(
        &'a self,
        invite_id: &'a str,
        status: InviteStatus,
        updated_at: DateTime<Utc>,
    ) -> StoreFuture<'a, ()>;

    /// Lists a campaign's invites ordered by id.
    fn list<'a>(&'a self, campaign_id: &'a str) -> StoreFuture<'a, Vec<Invite>>;
}

/// Session projection storage.
pub trait SessionStore: Send + Sync {
    /// Inserts or replaces a session.
    ///
    /// Fails with an invalid-state-transition error when the session is
    /// active and another session of the campaign is already active.
    fn put(&self, session: Session) -> StoreFuture<'_, ()>;

    /// Loads a session.
    fn get<'a>(&'a self, campaign_id: &'a str, session_id: &'a str) -> StoreFuture<'a, Session>;

    /// Ends a session. Returns the session and whether this call ended it
    /// (`false` when it had already ended).
    fn end_session<'a>(
        &'a self,
        campaign_id: &'a str,
        session_id: &'a str,
        ended_at: DateTime<Utc>,
    ) -> StoreFuture<'a, (Session, bool)>;

    /// Loads the campaign's active session.
    fn get_active<'a>(&'a self, campaign_id: &'a str) -> StoreFuture<'a, Session>;
}

/// Claim index: which seat each user occupies per campaign.
pub trait ClaimIndexStore: Send + Sync {
    /// Writes a claim.
    ///
    /// Rewriting the same claim is a no-op; a user already claiming a
    /// different seat fails with [`JournalError::ClaimConflict`].
    fn put(&self, claim: ParticipantClaim) -> StoreFuture<'_, ()>;

    /// Loads a user's claim.
    fn get<'a>(&'a self, campaign_id: &'a str, user_id: &'a str) -> StoreFuture<'a, ParticipantClaim>;

    /// Removes a user's claim. Removing a missing claim is not an error.
    fn delete<'a>(&'a self, campaign_id: &'a str, user_id: &'a str) -> StoreFuture<'a, ()>;
}

/// The set of projection stores an applier writes to.
///
/// Every store is optional; a handler that needs a missing store fails with
/// [`JournalError::Unavailable`].
#[derive(Clone, Default)]
pub struct ProjectionStores {
    /// Campaign records.
    pub campaigns: Option<Arc<dyn CampaignStore>>,
    /// Participant records.
    pub participants: Option<Arc<dyn ParticipantStore>>,
    /// Character records.
    pub characters: Option<Arc<dyn CharacterStore>>,
    /// Invite records.
    pub invites: Option<Arc<dyn InviteStore>>,
    /// Session records.
    pub sessions: Option<Arc<dyn SessionStore>>,
    /// Claim index.
    pub claims: Option<Arc<dyn ClaimIndexStore>>,
}

impl ProjectionStores {
    /// Creates an empty set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the campaign store.
    #[must_use]
    pub fn with_campaigns(mut self, store: Arc<dyn CampaignStore>) -> Self {
        self.campaigns = Some(store);
        self
    }

    /// Sets the participant store.
    #[must_use]
    pub fn with_participants(mut self, store: Arc<dyn ParticipantStore>) -> Self {
        self.participants = Some(store);
        self
    }

    /// Sets the character store.
    #[must_use]
    pub fn with_characters(mut self, store: Arc<dyn CharacterStore>) -> Self {
        self.characters = Some(store);
        self
    }

    /// Sets the invite store.
    #[must_use]
    pub fn with_invites(mut self, store: Arc<dyn InviteStore>) -> Self {
        self.invites = Some(store);
        self
    }

    /// Sets the session store.
    #[must_use]
    pub fn with_sessions(mut self, store: Arc<dyn SessionStore>) -> Self {
        self.sessions = Some(store);
        self
    }

    /// Sets the claim index.
    #[must_use]
    pub fn with_claims(mut self, store: Arc<dyn ClaimIndexStore>) -> Self {
        self.claims = Some(store);
        self
    }
}

impl std::fmt::Debug for ProjectionStores {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProjectionStores")
            .field("campaigns", &self.campaigns.is_some())
            .field("participants", &self.participants.is_some())
            .field("characters", &self.characters.is_some())
            .field("invites", &self.invites.is_some())
            .field("sessions", &self.sessions.is_some())
            .field("claims", &self.claims.is_some())
            .finish()
    }
}
