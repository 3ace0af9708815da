use campaign_journal_core::error::JournalError;
use campaign_journal_core::event::Event;
use campaign_journal_core::labels::InviteStatus;
use campaign_journal_core::normalize::{decode_payload, payload_or_entity_id, required_campaign_id};
use campaign_journal_core::records::Invite;

use super::{Applier, label_or, required};
use crate::patch::{InviteField, decode_fields};
use crate::payloads::{FieldsUpdated, InviteClaimed, InviteCreated, InviteRevoked};

impl Applier {
    pub(super) async fn invite_created(&self, event: &Event) -> Result<(), JournalError> {
        let invites = self.invite_store()?;
        let campaign_id = required_campaign_id(event)?;
        let payload: InviteCreated = decode_payload(event)?;
        let invite_id = payload_or_entity_id(&payload.invite_id, event, "invite")?;
        let participant_id = required(&payload.participant_id, "participant id")?;
        let status = label_or(&payload.status, InviteStatus::Pending)?;
        let now = self.stamp(event);

        invites
            .put(Invite {
                id: invite_id,
                campaign_id: campaign_id.to_string(),
                participant_id,
                recipient_user_id: payload.recipient_user_id.trim().to_string(),
                status,
                created_by_participant_id: payload.created_by_participant_id.trim().to_string(),
                created_at: now,
                updated_at: now,
            })
            .await
    }

    pub(super) async fn invite_claimed(&self, event: &Event) -> Result<(), JournalError> {
        let payload: InviteClaimed = decode_payload(event)?;
        let invite_id = payload_or_entity_id(&payload.invite_id, event, "invite")?;
        self.set_invite_status(event, &invite_id, InviteStatus::Claimed)
            .await
    }

    pub(super) async fn invite_revoked(&self, event: &Event) -> Result<(), JournalError> {
        let payload: InviteRevoked = decode_payload(event)?;
        let invite_id = payload_or_entity_id(&payload.invite_id, event, "invite")?;
        self.set_invite_status(event, &invite_id, InviteStatus::Revoked)
            .await
    }

    pub(super) async fn invite_updated(&self, event: &Event) -> Result<(), JournalError> {
        let payload: FieldsUpdated = decode_payload(event)?;
        let invite_id = payload_or_entity_id(&payload.invite_id, event, "invite")?;
        let mut fields = decode_fields::<InviteField>(&payload.fields)?;

        let Some(InviteField::Status(status)) = fields.pop() else {
            return Ok(());
        };
        self.set_invite_status(event, &invite_id, status).await
    }

    async fn set_invite_status(
        &self,
        event: &Event,
        invite_id: &str,
        status: InviteStatus,
    ) -> Result<(), JournalError> {
        let invites = self.invite_store()?;
        let campaign_id = required_campaign_id(event)?;

        let invite = invites.get(invite_id).await?;
        if invite.campaign_id != campaign_id {
            return Err(JournalError::not_found("invite", invite_id));
        }

        invites
            .update_status(invite_id, status, self.stamp(event))
            .await
    }
}
