use campaign_journal_core::error::JournalError;
use campaign_journal_core::event::Event;
use campaign_journal_core::labels::{CampaignAccess, Controller, ParticipantRole};
use campaign_journal_core::normalize::{decode_payload, payload_or_entity_id, required_campaign_id};
use campaign_journal_core::records::{Participant, ParticipantClaim};

use super::{Applier, floored_decrement, label_or, required};
use crate::patch::{ParticipantField, decode_fields};
use crate::payloads::{FieldsUpdated, ParticipantJoined, ParticipantLeft};

impl Applier {
    pub(super) async fn participant_joined(&self, event: &Event) -> Result<(), JournalError> {
        let campaigns = self.campaign_store()?;
        let participants = self.participant_store()?;
        let campaign_id = required_campaign_id(event)?;
        let payload: ParticipantJoined = decode_payload(event)?;

        let participant_id = payload_or_entity_id(&payload.participant_id, event, "participant")?;
        let display_name = required(&payload.display_name, "display name")?;
        let role = ParticipantRole::parse(&payload.role)?;
        let controller = label_or(&payload.controller, Controller::Human)?;
        let campaign_access = label_or(&payload.campaign_access, CampaignAccess::Member)?;
        let user_id = payload.user_id.trim().to_string();
        let claims = if user_id.is_empty() {
            None
        } else {
            Some(self.claim_store()?)
        };

        let mut campaign = campaigns.get(campaign_id).await?;
        let now = self.stamp(event);

        if let Some(claims) = claims {
            claims
                .put(ParticipantClaim {
                    campaign_id: campaign_id.to_string(),
                    user_id: user_id.clone(),
                    participant_id: participant_id.clone(),
                    claimed_at: now,
                })
                .await?;
        }

        participants
            .put(Participant {
                id: participant_id,
                campaign_id: campaign_id.to_string(),
                user_id,
                display_name,
                role,
                controller,
                campaign_access,
                created_at: now,
                updated_at: now,
            })
            .await?;

        campaign.participant_count = campaign.participant_count.saturating_add(1);
        campaign.updated_at = now;
        campaigns.put(campaign).await
    }

    pub(super) async fn participant_updated(&self, event: &Event) -> Result<(), JournalError> {
        let participants = self.participant_store()?;
        let campaign_id = required_campaign_id(event)?;
        let payload: FieldsUpdated = decode_payload(event)?;
        let participant_id = payload_or_entity_id(&payload.participant_id, event, "participant")?;
        let fields = decode_fields::<ParticipantField>(&payload.fields)?;

        let mut participant = participants.get(campaign_id, &participant_id).await?;
        for field in fields {
            match field {
                ParticipantField::DisplayName(name) => participant.display_name = name,
                ParticipantField::Role(role) => participant.role = role,
                ParticipantField::Controller(controller) => participant.controller = controller,
                ParticipantField::CampaignAccess(access) => participant.campaign_access = access,
            }
        }

        participant.updated_at = self.stamp(event);
        participants.put(participant).await
    }

    pub(super) async fn participant_left(&self, event: &Event) -> Result<(), JournalError> {
        let campaigns = self.campaign_store()?;
        let participants = self.participant_store()?;
        let campaign_id = required_campaign_id(event)?;
        let payload: ParticipantLeft = decode_payload(event)?;
        let participant_id = payload_or_entity_id(&payload.participant_id, event, "participant")?;

        let mut campaign = campaigns.get(campaign_id).await?;
        let departing = match participants.get(campaign_id, &participant_id).await {
            Ok(participant) => Some(participant),
            Err(e) if e.is_not_found() => None,
            Err(e) => return Err(e),
        };

        if let Some(participant) = departing.filter(|p| !p.user_id.is_empty()) {
            self.claim_store()?
                .delete(campaign_id, &participant.user_id)
                .await?;
        }
        participants.delete(campaign_id, &participant_id).await?;

        campaign.participant_count = floored_decrement(
            campaign.participant_count,
            "participant_count",
            campaign_id,
            event.seq,
        );
        campaign.updated_at = self.stamp(event);
        campaigns.put(campaign).await
    }
}
