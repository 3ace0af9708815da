//! Seat ownership: binding users to participant seats.
//!
//! These handlers keep the participant's `user_id` and the claim index in
//! step. Unbind and reassign check the command's expected prior user against
//! current state before writing anything, so a stale command fails with
//! [`JournalError::ClaimMismatch`] and leaves both untouched.

use campaign_journal_core::error::JournalError;
use campaign_journal_core::event::Event;
use campaign_journal_core::normalize::{decode_payload, payload_or_entity_id, required_campaign_id};
use campaign_journal_core::records::ParticipantClaim;

use super::{Applier, required};
use crate::payloads::{ParticipantBound, ParticipantUnbound, SeatReassigned};

impl Applier {
    pub(super) async fn participant_bound(&self, event: &Event) -> Result<(), JournalError> {
        let participants = self.participant_store()?;
        let claims = self.claim_store()?;
        let campaign_id = required_campaign_id(event)?;
        let payload: ParticipantBound = decode_payload(event)?;
        let participant_id = payload_or_entity_id(&payload.participant_id, event, "participant")?;
        let user_id = required(&payload.user_id, "user id")?;

        let mut participant = participants.get(campaign_id, &participant_id).await?;
        if !participant.user_id.is_empty() && participant.user_id != user_id {
            return Err(JournalError::InvalidStateTransition(format!(
                "participant {participant_id} is already bound to another user"
            )));
        }

        let now = self.stamp(event);
        claims
            .put(ParticipantClaim {
                campaign_id: campaign_id.to_string(),
                user_id: user_id.clone(),
                participant_id,
                claimed_at: now,
            })
            .await?;

        participant.user_id = user_id;
        participant.updated_at = now;
        participants.put(participant).await
    }

    pub(super) async fn participant_unbound(&self, event: &Event) -> Result<(), JournalError> {
        let participants = self.participant_store()?;
        let claims = self.claim_store()?;
        let campaign_id = required_campaign_id(event)?;
        let payload: ParticipantUnbound = decode_payload(event)?;
        let participant_id = payload_or_entity_id(&payload.participant_id, event, "participant")?;
        let expected = payload.user_id.trim();

        let mut participant = participants.get(campaign_id, &participant_id).await?;
        if !expected.is_empty() && participant.user_id != expected {
            return Err(JournalError::ClaimMismatch {
                participant_id,
                expected: expected.to_string(),
                actual: participant.user_id,
            });
        }

        if !participant.user_id.is_empty() {
            claims.delete(campaign_id, &participant.user_id).await?;
        }

        participant.user_id.clear();
        participant.updated_at = self.stamp(event);
        participants.put(participant).await
    }

    pub(super) async fn seat_reassigned(&self, event: &Event) -> Result<(), JournalError> {
        let participants = self.participant_store()?;
        let claims = self.claim_store()?;
        let campaign_id = required_campaign_id(event)?;
        let payload: SeatReassigned = decode_payload(event)?;
        let participant_id = payload_or_entity_id(&payload.participant_id, event, "participant")?;
        let user_id = required(&payload.user_id, "user id")?;
        let prior = payload.prior_user_id.trim();

        let mut participant = participants.get(campaign_id, &participant_id).await?;
        if participant.user_id != prior {
            return Err(JournalError::ClaimMismatch {
                participant_id,
                expected: prior.to_string(),
                actual: participant.user_id,
            });
        }

        let now = self.stamp(event);
        // New claim first: a conflicting claim aborts before the old one is dropped.
        claims
            .put(ParticipantClaim {
                campaign_id: campaign_id.to_string(),
                user_id: user_id.clone(),
                participant_id,
                claimed_at: now,
            })
            .await?;
        if !prior.is_empty() && prior != user_id {
            claims.delete(campaign_id, prior).await?;
        }

        participant.user_id = user_id;
        participant.updated_at = now;
        participants.put(participant).await
    }
}
