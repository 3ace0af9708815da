//! Projection records: the derived, rebuildable read models.
//!
//! Each record is owned by exactly one projection store and can be discarded
//! and rebuilt by replaying the campaign journal. `updated_at` is stamped from
//! the timestamp of the event that last touched the record.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::labels::{
    AccessPolicy, CampaignAccess, CampaignIntent, CampaignStatus, CharacterKind, Controller,
    GameSystemId, GmMode, InviteStatus, ParticipantRole, SessionStatus,
};

/// A campaign as seen by readers.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Campaign {
    /// Campaign identifier.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Locale tag (e.g. `en-US`); empty when unset.
    pub locale: String,
    /// Game system the campaign plays.
    pub game_system: GameSystemId,
    /// Lifecycle status.
    pub status: CampaignStatus,
    /// Who runs the table.
    pub gm_mode: GmMode,
    /// Why the campaign exists.
    pub intent: CampaignIntent,
    /// Who may discover it.
    pub access_policy: AccessPolicy,
    /// Number of participant seats.
    pub participant_count: u32,
    /// Number of characters.
    pub character_count: u32,
    /// Free-form theme prompt.
    pub theme_prompt: String,
    /// Campaign this one was forked from, if any.
    pub parent_campaign_id: Option<String>,
    /// Sequence of the parent's journal at the fork point.
    pub fork_event_seq: Option<u64>,
    /// Root of the fork lineage.
    pub origin_campaign_id: Option<String>,
    /// Creation time.
    pub created_at: DateTime<Utc>,
    /// Last projection update.
    pub updated_at: DateTime<Utc>,
    /// When the campaign last entered `COMPLETED`.
    pub completed_at: Option<DateTime<Utc>>,
    /// When the campaign last entered `ARCHIVED`.
    pub archived_at: Option<DateTime<Utc>>,
}

/// A seat at a campaign's table.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Participant {
    /// Participant (seat) identifier.
    pub id: String,
    /// Owning campaign.
    pub campaign_id: String,
    /// User currently bound to the seat; empty when unbound.
    pub user_id: String,
    /// Name shown at the table.
    pub display_name: String,
    /// GM or player.
    pub role: ParticipantRole,
    /// Human or AI.
    pub controller: Controller,
    /// Administrative access.
    pub campaign_access: CampaignAccess,
    /// Creation time.
    pub created_at: DateTime<Utc>,
    /// Last projection update.
    pub updated_at: DateTime<Utc>,
}

/// A character in a campaign.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Character {
    /// Character identifier.
    pub id: String,
    /// Owning campaign.
    pub campaign_id: String,
    /// Character name.
    pub name: String,
    /// PC or NPC.
    pub kind: CharacterKind,
    /// Free-form notes.
    pub notes: String,
    /// Participant controlling the character; empty when unassigned.
    pub participant_id: String,
    /// Creation time.
    pub created_at: DateTime<Utc>,
    /// Last projection update.
    pub updated_at: DateTime<Utc>,
}

/// An invitation to take a seat.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Invite {
    /// Invite identifier.
    pub id: String,
    /// Owning campaign.
    pub campaign_id: String,
    /// Seat the invite grants.
    pub participant_id: String,
    /// Intended recipient; empty for open invites.
    pub recipient_user_id: String,
    /// Current status.
    pub status: InviteStatus,
    /// Participant who issued the invite.
    pub created_by_participant_id: String,
    /// Creation time.
    pub created_at: DateTime<Utc>,
    /// Last projection update.
    pub updated_at: DateTime<Utc>,
}

/// A play session.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    /// Session identifier.
    pub id: String,
    /// Owning campaign.
    pub campaign_id: String,
    /// Session name.
    pub name: String,
    /// Active or ended.
    pub status: SessionStatus,
    /// Start time.
    pub started_at: DateTime<Utc>,
    /// End time, once ended.
    pub ended_at: Option<DateTime<Utc>>,
    /// Last projection update.
    pub updated_at: DateTime<Utc>,
}

/// Entry of the claim index: the seat a user occupies in a campaign.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParticipantClaim {
    /// Campaign of the claim.
    pub campaign_id: String,
    /// Claiming user.
    pub user_id: String,
    /// Claimed seat.
    pub participant_id: String,
    /// When the claim was written.
    pub claimed_at: DateTime<Utc>,
}
