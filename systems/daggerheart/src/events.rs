//! Daggerheart event types and payloads.

use serde::{Deserialize, Serialize};

/// `daggerheart.character_profile_set`
pub const CHARACTER_PROFILE_SET: &str = "daggerheart.character_profile_set";
/// `daggerheart.character_state_patched`
pub const CHARACTER_STATE_PATCHED: &str = "daggerheart.character_state_patched";
/// `daggerheart.gm_fear_changed`
pub const GM_FEAR_CHANGED: &str = "daggerheart.gm_fear_changed";

/// Sets a character's resource maxima. Absent maxima take their defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CharacterProfileSet {
    /// Character id; falls back to the event's `entity_id`.
    #[serde(default)]
    pub character_id: String,
    /// Hit-point maximum, `1..=12`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hp_max: Option<i64>,
    /// Stress maximum, `0..=12`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stress_max: Option<i64>,
    /// Armor maximum, `0..=12`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub armor_max: Option<i64>,
}

/// Sets current resource values. Absent values are unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CharacterStatePatched {
    /// Character id; falls back to the event's `entity_id`.
    #[serde(default)]
    pub character_id: String,
    /// Hit points after the change.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hp_after: Option<i64>,
    /// Hope after the change.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hope_after: Option<i64>,
    /// Stress after the change.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stress_after: Option<i64>,
    /// Armor after the change.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub armor_after: Option<i64>,
}

/// Sets the GM's Fear.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GmFearChanged {
    /// Fear after the change, `0..=12`.
    pub after: i64,
}
