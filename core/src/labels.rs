//! Enumerated labels carried in event payloads.
//!
//! Payloads spell enum values as strings. A label parses case-insensitively,
//! with or without its type prefix: `GM_MODE_HUMAN`, `HUMAN` and `human` all
//! name [`GmMode::Human`]. `UNSPECIFIED`, empty and unknown labels are
//! rejected with [`JournalError::InvalidInput`].

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::JournalError;

/// Uppercases `raw`, trims it and strips `prefix` if present.
fn canonical_label(raw: &str, prefix: &str) -> String {
    let upper = raw.trim().to_ascii_uppercase();
    match upper.strip_prefix(prefix) {
        Some(rest) if !rest.is_empty() => rest.to_string(),
        _ => upper,
    }
}

/// Declares a payload label enum with parsing, display and serde support.
///
/// ```rust,ignore
/// labeled_enum! {
///     /// Who runs the table.
///     GmMode, prefix = "GM_MODE_" {
///         /// A human GM.
///         Human => "HUMAN",
///     }
/// }
/// ```
macro_rules! labeled_enum {
    (
        $(#[$meta:meta])*
        $name:ident, prefix = $prefix:literal {
            $( $(#[$vmeta:meta])* $variant:ident => $label:literal ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(try_from = "String", into = "&'static str")]
        pub enum $name {
            $( $(#[$vmeta])* $variant ),+
        }

        impl $name {
            /// Prefix accepted (and stripped) when parsing.
            pub const PREFIX: &'static str = $prefix;

            /// Canonical label of this value.
            #[must_use]
            pub const fn as_label(self) -> &'static str {
                match self {
                    $( Self::$variant => $label ),+
                }
            }

            /// Parses a label, accepting the prefixed and unprefixed spellings.
            ///
            /// # Errors
            ///
            /// Returns [`JournalError::InvalidInput`] for empty, unspecified or unknown labels.
            pub fn parse(raw: &str) -> Result<Self, JournalError> {
                if raw.trim().is_empty() {
                    return Err(JournalError::invalid_input(format!(
                        "{} is required",
                        stringify!($name)
                    )));
                }
                match canonical_label(raw, $prefix).as_str() {
                    $( $label => Ok(Self::$variant), )+
                    _ => Err(JournalError::invalid_input(format!(
                        "unknown {} label '{}'",
                        stringify!($name),
                        raw.trim()
                    ))),
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_label())
            }
        }

        impl FromStr for $name {
            type Err = JournalError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::parse(s)
            }
        }

        impl TryFrom<String> for $name {
            type Error = JournalError;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                Self::parse(&value)
            }
        }

        impl From<$name> for &'static str {
            fn from(value: $name) -> Self {
                value.as_label()
            }
        }
    };
}

labeled_enum! {
    /// Lifecycle status of a campaign.
    CampaignStatus, prefix = "CAMPAIGN_STATUS_" {
        /// Being prepared; not yet running.
        Draft => "DRAFT",
        /// Running.
        Active => "ACTIVE",
        /// Finished.
        Completed => "COMPLETED",
        /// Shelved.
        Archived => "ARCHIVED",
    }
}

impl Default for CampaignStatus {
    fn default() -> Self {
        Self::Draft
    }
}

labeled_enum! {
    /// Who runs the table.
    GmMode, prefix = "GM_MODE_" {
        /// A human game master.
        Human => "HUMAN",
        /// An AI game master.
        Ai => "AI",
        /// Human and AI share the role.
        Hybrid => "HYBRID",
    }
}

labeled_enum! {
    /// Why the campaign exists.
    CampaignIntent, prefix = "CAMPAIGN_INTENT_" {
        /// A regular campaign.
        Standard => "STANDARD",
        /// A starter/onboarding campaign.
        Starter => "STARTER",
        /// A sandbox for experimentation.
        Sandbox => "SANDBOX",
    }
}

labeled_enum! {
    /// Who may discover the campaign.
    AccessPolicy, prefix = "CAMPAIGN_ACCESS_POLICY_" {
        /// Invite only.
        Private => "PRIVATE",
        /// Visible to some audiences.
        Restricted => "RESTRICTED",
        /// Listed publicly.
        Public => "PUBLIC",
    }
}

labeled_enum! {
    /// Role of a participant at the table.
    ParticipantRole, prefix = "PARTICIPANT_ROLE_" {
        /// Game master seat.
        Gm => "GM",
        /// Player seat.
        Player => "PLAYER",
    }
}

labeled_enum! {
    /// Who drives a seat or character.
    Controller, prefix = "CONTROLLER_" {
        /// A person.
        Human => "HUMAN",
        /// An AI agent.
        Ai => "AI",
    }
}

labeled_enum! {
    /// Administrative access a participant has to the campaign.
    CampaignAccess, prefix = "CAMPAIGN_ACCESS_" {
        /// Plays; no administration.
        Member => "MEMBER",
        /// Manages participants and invites.
        Manager => "MANAGER",
        /// Full control.
        Owner => "OWNER",
    }
}

labeled_enum! {
    /// Kind of character.
    CharacterKind, prefix = "CHARACTER_KIND_" {
        /// Player character.
        Pc => "PC",
        /// Non-player character.
        Npc => "NPC",
    }
}

labeled_enum! {
    /// State of a seat invite.
    InviteStatus, prefix = "INVITE_STATUS_" {
        /// Issued and unclaimed.
        Pending => "PENDING",
        /// Claimed by a user.
        Claimed => "CLAIMED",
        /// Withdrawn.
        Revoked => "REVOKED",
    }
}

labeled_enum! {
    /// State of a play session.
    SessionStatus, prefix = "SESSION_STATUS_" {
        /// In progress.
        Active => "ACTIVE",
        /// Finished.
        Ended => "ENDED",
    }
}

/// Canonical identifier of a game system (e.g. `daggerheart`).
///
/// Canonicalization trims, strips a `GAME_SYSTEM_` prefix and lowercases, so
/// `DAGGERHEART`, `GAME_SYSTEM_DAGGERHEART` and `daggerheart` are equal. The
/// core never interprets the value; it only keys adapter lookups.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct GameSystemId(String);

impl GameSystemId {
    const PREFIX: &'static str = "GAME_SYSTEM_";

    /// Parses and canonicalizes a game system identifier.
    ///
    /// # Errors
    ///
    /// Returns [`JournalError::InvalidInput`] for empty or unspecified ids.
    pub fn parse(raw: &str) -> Result<Self, JournalError> {
        let canonical = canonical_label(raw, Self::PREFIX).to_ascii_lowercase();
        if canonical.is_empty() || canonical == "unspecified" {
            return Err(JournalError::invalid_input(format!(
                "game system is required, got '{}'",
                raw.trim()
            )));
        }
        Ok(Self(canonical))
    }

    /// Canonical form.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for GameSystemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for GameSystemId {
    type Err = JournalError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for GameSystemId {
    type Error = JournalError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<GameSystemId> for String {
    fn from(value: GameSystemId) -> Self {
        value.0
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn prefixed_and_bare_labels_parse() {
        assert_eq!(GmMode::parse("GM_MODE_HUMAN").unwrap(), GmMode::Human);
        assert_eq!(GmMode::parse("human").unwrap(), GmMode::Human);
        assert_eq!(Controller::parse(" CONTROLLER_AI ").unwrap(), Controller::Ai);
        assert_eq!(CampaignAccess::parse("MEMBER").unwrap(), CampaignAccess::Member);
        assert_eq!(ParticipantRole::parse("PLAYER").unwrap(), ParticipantRole::Player);
    }

    #[test]
    fn unspecified_and_unknown_labels_fail() {
        assert!(GmMode::parse("GM_MODE_UNSPECIFIED").is_err());
        assert!(CampaignStatus::parse("paused").is_err());
        assert!(CharacterKind::parse("").is_err());
    }

    #[test]
    fn bare_prefix_is_not_stripped_to_empty() {
        assert!(SessionStatus::parse("SESSION_STATUS_").is_err());
    }

    #[test]
    fn labels_serialize_as_strings() {
        let json = serde_json::to_string(&InviteStatus::Claimed).unwrap();
        assert_eq!(json, "\"CLAIMED\"");
        let back: InviteStatus = serde_json::from_str("\"invite_status_revoked\"").unwrap();
        assert_eq!(back, InviteStatus::Revoked);
    }

    #[test]
    fn game_system_ids_canonicalize() {
        let a = GameSystemId::parse("DAGGERHEART").unwrap();
        let b = GameSystemId::parse("GAME_SYSTEM_DAGGERHEART").unwrap();
        let c = GameSystemId::parse(" daggerheart ").unwrap();
        assert_eq!(a, b);
        assert_eq!(b, c);
        assert_eq!(a.as_str(), "daggerheart");
        assert!(GameSystemId::parse("GAME_SYSTEM_UNSPECIFIED").is_err());
        assert!(GameSystemId::parse("  ").is_err());
    }
}
