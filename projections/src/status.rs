//! Campaign status state machine.
//!
//! ```text
//!   DRAFT ──▶ ACTIVE ──▶ COMPLETED
//!     ▲         │            │
//!     │         ▼            ▼
//!     └────── ARCHIVED ◀─────┘
//! ```
//!
//! Every pair not drawn above, including staying in the same status, is
//! rejected with [`JournalError::InvalidCampaignStatusTransition`].

use campaign_journal_core::error::JournalError;
use campaign_journal_core::labels::CampaignStatus;

/// Whether `from -> to` is an allowed transition.
#[must_use]
pub const fn is_allowed(from: CampaignStatus, to: CampaignStatus) -> bool {
    use CampaignStatus::{Active, Archived, Completed, Draft};
    matches!(
        (from, to),
        (Draft, Active) | (Active, Completed | Archived) | (Completed, Archived) | (Archived, Draft)
    )
}

/// Validates a transition and returns the new status.
///
/// # Errors
///
/// Returns [`JournalError::InvalidCampaignStatusTransition`] carrying both
/// labels when the transition is not allowed.
pub fn transition(from: CampaignStatus, to: CampaignStatus) -> Result<CampaignStatus, JournalError> {
    if is_allowed(from, to) {
        Ok(to)
    } else {
        Err(JournalError::InvalidCampaignStatusTransition {
            from: from.as_label().to_string(),
            to: to.as_label().to_string(),
        })
    }
}
