//! Sparse field patches for `*.updated` events.
//!
//! A patch payload carries a `fields` object. Only keys present are changed.
//! Each entity has a closed set of keys; each key decodes into one variant of
//! a field enum with its own expected JSON type and validator. Unknown keys
//! and wrongly typed values are rejected, never ignored.

use campaign_journal_core::error::JournalError;
use campaign_journal_core::labels::{
    AccessPolicy, CampaignAccess, CampaignIntent, CampaignStatus, CharacterKind, Controller,
    GmMode, InviteStatus, ParticipantRole,
};
use serde_json::{Map, Value};

/// A field that can be decoded from one `(key, value)` pair of a patch.
pub trait PatchField: Sized {
    /// Entity name used in error messages.
    const ENTITY: &'static str;

    /// Decodes and validates one key.
    ///
    /// # Errors
    ///
    /// Returns [`JournalError::InvalidInput`] for unknown keys, wrong value
    /// types and values that fail validation.
    fn decode(key: &str, value: &Value) -> Result<Self, JournalError>;
}

/// Decodes every key of a patch map.
///
/// # Errors
///
/// Returns [`JournalError::InvalidInput`] when the map is empty or any key
/// fails to decode.
pub fn decode_fields<F: PatchField>(fields: &Map<String, Value>) -> Result<Vec<F>, JournalError> {
    if fields.is_empty() {
        return Err(JournalError::invalid_input(format!(
            "{} update requires at least one field",
            F::ENTITY
        )));
    }
    fields.iter().map(|(key, value)| F::decode(key, value)).collect()
}

fn string_value(entity: &str, key: &str, value: &Value) -> Result<String, JournalError> {
    value.as_str().map(|s| s.trim().to_string()).ok_or_else(|| {
        JournalError::invalid_input(format!("{entity} field '{key}' must be a string"))
    })
}

fn required_string(entity: &str, key: &str, value: &Value) -> Result<String, JournalError> {
    let s = string_value(entity, key, value)?;
    if s.is_empty() {
        return Err(JournalError::invalid_input(format!(
            "{entity} field '{key}' must not be empty"
        )));
    }
    Ok(s)
}

fn unknown_key(entity: &str, key: &str) -> JournalError {
    JournalError::invalid_input(format!("unknown {entity} field '{key}'"))
}

/// Patchable campaign fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CampaignField {
    /// `name`: non-empty string.
    Name(String),
    /// `status`: status label, subject to the transition rules.
    Status(CampaignStatus),
    /// `theme_prompt`: string.
    ThemePrompt(String),
    /// `locale`: string.
    Locale(String),
    /// `gm_mode`: GM mode label.
    GmMode(GmMode),
    /// `intent`: intent label.
    Intent(CampaignIntent),
    /// `access_policy`: access policy label.
    AccessPolicy(AccessPolicy),
}

impl PatchField for CampaignField {
    const ENTITY: &'static str = "campaign";

    fn decode(key: &str, value: &Value) -> Result<Self, JournalError> {
        let entity = Self::ENTITY;
        match key {
            "name" => Ok(Self::Name(required_string(entity, key, value)?)),
            "status" => Ok(Self::Status(CampaignStatus::parse(&string_value(entity, key, value)?)?)),
            "theme_prompt" => Ok(Self::ThemePrompt(string_value(entity, key, value)?)),
            "locale" => Ok(Self::Locale(string_value(entity, key, value)?)),
            "gm_mode" => Ok(Self::GmMode(GmMode::parse(&string_value(entity, key, value)?)?)),
            "intent" => Ok(Self::Intent(CampaignIntent::parse(&string_value(entity, key, value)?)?)),
            "access_policy" => Ok(Self::AccessPolicy(AccessPolicy::parse(&string_value(
                entity, key, value,
            )?)?)),
            other => Err(unknown_key(entity, other)),
        }
    }
}

/// Patchable participant fields.
///
/// The bound user is deliberately absent: seats change hands only through
/// `participant.bound`, `participant.unbound` and `seat.reassigned`, which
/// keep the claim index in step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParticipantField {
    /// `display_name`: non-empty string.
    DisplayName(String),
    /// `role`: role label.
    Role(ParticipantRole),
    /// `controller`: controller label.
    Controller(Controller),
    /// `campaign_access`: access label.
    CampaignAccess(CampaignAccess),
}

impl PatchField for ParticipantField {
    const ENTITY: &'static str = "participant";

    fn decode(key: &str, value: &Value) -> Result<Self, JournalError> {
        let entity = Self::ENTITY;
        match key {
            "display_name" => Ok(Self::DisplayName(required_string(entity, key, value)?)),
            "role" => Ok(Self::Role(ParticipantRole::parse(&string_value(entity, key, value)?)?)),
            "controller" => Ok(Self::Controller(Controller::parse(&string_value(entity, key, value)?)?)),
            "campaign_access" => Ok(Self::CampaignAccess(CampaignAccess::parse(&string_value(
                entity, key, value,
            )?)?)),
            other => Err(unknown_key(entity, other)),
        }
    }
}

/// Patchable character fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CharacterField {
    /// `name`: non-empty string.
    Name(String),
    /// `kind`: kind label.
    Kind(CharacterKind),
    /// `notes`: string.
    Notes(String),
    /// `participant_id`: controlling seat; empty string clears it.
    ParticipantId(String),
}

impl PatchField for CharacterField {
    const ENTITY: &'static str = "character";

    fn decode(key: &str, value: &Value) -> Result<Self, JournalError> {
        let entity = Self::ENTITY;
        match key {
            "name" => Ok(Self::Name(required_string(entity, key, value)?)),
            "kind" => Ok(Self::Kind(CharacterKind::parse(&string_value(entity, key, value)?)?)),
            "notes" => Ok(Self::Notes(string_value(entity, key, value)?)),
            "participant_id" => Ok(Self::ParticipantId(string_value(entity, key, value)?)),
            other => Err(unknown_key(entity, other)),
        }
    }
}

/// Patchable invite fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InviteField {
    /// `status`: invite status label.
    Status(InviteStatus),
}

impl PatchField for InviteField {
    const ENTITY: &'static str = "invite";

    fn decode(key: &str, value: &Value) -> Result<Self, JournalError> {
        match key {
            "status" => Ok(Self::Status(InviteStatus::parse(&string_value(
                Self::ENTITY,
                key,
                value,
            )?)?)),
            other => Err(unknown_key(Self::ENTITY, other)),
        }
    }
}
