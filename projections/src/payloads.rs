//! Payload schemas of the core event types.
//!
//! Each event type has exactly one payload shape, serialized as a JSON
//! object. Identifier fields default to empty so the applier can fall back
//! to the event's `entity_id`. Patch payloads carry a sparse `fields` map
//! decoded by [`crate::patch`].

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// `campaign.created`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CampaignCreated {
    /// Campaign name.
    #[serde(default)]
    pub name: String,
    /// Locale tag.
    #[serde(default)]
    pub locale: String,
    /// Game system label.
    #[serde(default)]
    pub game_system: String,
    /// GM mode label.
    #[serde(default)]
    pub gm_mode: String,
    /// Intent label; `STANDARD` when empty.
    #[serde(default)]
    pub intent: String,
    /// Access policy label; `PRIVATE` when empty.
    #[serde(default)]
    pub access_policy: String,
    /// Theme prompt.
    #[serde(default)]
    pub theme_prompt: String,
}

/// `campaign.updated`, `participant.updated`, `character.updated`, `invite.updated`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FieldsUpdated {
    /// Participant being patched (`participant.updated`).
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub participant_id: String,
    /// Character being patched (`character.updated`).
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub character_id: String,
    /// Invite being patched (`invite.updated`).
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub invite_id: String,
    /// Sparse field map; absent keys are left unchanged.
    #[serde(default)]
    pub fields: Map<String, Value>,
}

/// `campaign.forked`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CampaignForked {
    /// Campaign forked from.
    #[serde(default)]
    pub parent_campaign_id: String,
    /// Parent journal sequence at the fork point.
    #[serde(default)]
    pub fork_event_seq: u64,
    /// Root of the lineage; the parent when empty.
    #[serde(default)]
    pub origin_campaign_id: String,
}

/// `participant.joined`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParticipantJoined {
    /// Seat id.
    #[serde(default)]
    pub participant_id: String,
    /// User taking the seat, if any.
    #[serde(default)]
    pub user_id: String,
    /// Name shown at the table.
    #[serde(default)]
    pub display_name: String,
    /// Role label.
    #[serde(default)]
    pub role: String,
    /// Controller label; `HUMAN` when empty.
    #[serde(default)]
    pub controller: String,
    /// Access label; `MEMBER` when empty.
    #[serde(default)]
    pub campaign_access: String,
}

/// `participant.left`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParticipantLeft {
    /// Seat id.
    #[serde(default)]
    pub participant_id: String,
    /// Free-form reason.
    #[serde(default)]
    pub reason: String,
}

/// `participant.bound`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParticipantBound {
    /// Seat id.
    #[serde(default)]
    pub participant_id: String,
    /// User claiming the seat.
    #[serde(default)]
    pub user_id: String,
}

/// `participant.unbound`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParticipantUnbound {
    /// Seat id.
    #[serde(default)]
    pub participant_id: String,
    /// User expected to hold the seat; unchecked when empty.
    #[serde(default)]
    pub user_id: String,
    /// Free-form reason.
    #[serde(default)]
    pub reason: String,
}

/// `seat.reassigned`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeatReassigned {
    /// Seat id.
    #[serde(default)]
    pub participant_id: String,
    /// User expected to hold the seat now (empty: seat expected unbound).
    #[serde(default)]
    pub prior_user_id: String,
    /// User taking the seat.
    #[serde(default)]
    pub user_id: String,
    /// Free-form reason.
    #[serde(default)]
    pub reason: String,
}

/// `invite.created`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InviteCreated {
    /// Invite id.
    #[serde(default)]
    pub invite_id: String,
    /// Seat granted by the invite.
    #[serde(default)]
    pub participant_id: String,
    /// Intended recipient.
    #[serde(default)]
    pub recipient_user_id: String,
    /// Issuing participant.
    #[serde(default)]
    pub created_by_participant_id: String,
    /// Status label; `PENDING` when empty.
    #[serde(default)]
    pub status: String,
}

/// `invite.claimed`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InviteClaimed {
    /// Invite id.
    #[serde(default)]
    pub invite_id: String,
    /// Seat granted.
    #[serde(default)]
    pub participant_id: String,
    /// Claiming user.
    #[serde(default)]
    pub user_id: String,
}

/// `invite.revoked`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InviteRevoked {
    /// Invite id.
    #[serde(default)]
    pub invite_id: String,
}

/// `character.created`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CharacterCreated {
    /// Character id.
    #[serde(default)]
    pub character_id: String,
    /// Character name.
    #[serde(default)]
    pub name: String,
    /// Kind label.
    #[serde(default)]
    pub kind: String,
    /// Notes.
    #[serde(default)]
    pub notes: String,
    /// Controlling participant.
    #[serde(default)]
    pub participant_id: String,
}

/// `character.deleted`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CharacterDeleted {
    /// Character id.
    #[serde(default)]
    pub character_id: String,
    /// Free-form reason.
    #[serde(default)]
    pub reason: String,
}

/// `session.started`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionStarted {
    /// Session id.
    #[serde(default)]
    pub session_id: String,
    /// Session name.
    #[serde(default)]
    pub session_name: String,
}

/// `session.ended`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionEnded {
    /// Session id.
    #[serde(default)]
    pub session_id: String,
}
