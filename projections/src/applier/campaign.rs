use campaign_journal_core::error::JournalError;
use campaign_journal_core::event::Event;
use campaign_journal_core::labels::{
    AccessPolicy, CampaignIntent, CampaignStatus, GameSystemId, GmMode,
};
use campaign_journal_core::normalize::{decode_payload, required_campaign_id};
use campaign_journal_core::records::Campaign;

use super::{Applier, label_or, required};
use crate::patch::{CampaignField, decode_fields};
use crate::payloads::{CampaignCreated, CampaignForked, FieldsUpdated};
use crate::status;

impl Applier {
    pub(super) async fn campaign_created(&self, event: &Event) -> Result<(), JournalError> {
        let campaigns = self.campaign_store()?;
        let campaign_id = required_campaign_id(event)?;
        let payload: CampaignCreated = decode_payload(event)?;

        let name = required(&payload.name, "campaign name")?;
        let game_system = GameSystemId::parse(&payload.game_system)?;
        let gm_mode = GmMode::parse(&payload.gm_mode)?;
        let intent = label_or(&payload.intent, CampaignIntent::Standard)?;
        let access_policy = label_or(&payload.access_policy, AccessPolicy::Private)?;
        let now = self.stamp(event);

        campaigns
            .put(Campaign {
                id: campaign_id.to_string(),
                name,
                locale: payload.locale.trim().to_string(),
                game_system,
                status: CampaignStatus::Draft,
                gm_mode,
                intent,
                access_policy,
                participant_count: 0,
                character_count: 0,
                theme_prompt: payload.theme_prompt.trim().to_string(),
                parent_campaign_id: None,
                fork_event_seq: None,
                origin_campaign_id: None,
                created_at: now,
                updated_at: now,
                completed_at: None,
                archived_at: None,
            })
            .await
    }

    pub(super) async fn campaign_updated(&self, event: &Event) -> Result<(), JournalError> {
        let campaigns = self.campaign_store()?;
        let campaign_id = required_campaign_id(event)?;
        let payload: FieldsUpdated = decode_payload(event)?;
        let fields = decode_fields::<CampaignField>(&payload.fields)?;

        let mut campaign = campaigns.get(campaign_id).await?;
        let now = self.stamp(event);

        for field in fields {
            match field {
                CampaignField::Name(name) => campaign.name = name,
                CampaignField::Status(to) => {
                    campaign.status = status::transition(campaign.status, to)?;
                    match to {
                        CampaignStatus::Completed => campaign.completed_at = Some(now),
                        CampaignStatus::Archived => campaign.archived_at = Some(now),
                        CampaignStatus::Draft => campaign.archived_at = None,
                        CampaignStatus::Active => {}
                    }
                }
                CampaignField::ThemePrompt(prompt) => campaign.theme_prompt = prompt,
                CampaignField::Locale(locale) => campaign.locale = locale,
                CampaignField::GmMode(mode) => campaign.gm_mode = mode,
                CampaignField::Intent(intent) => campaign.intent = intent,
                CampaignField::AccessPolicy(policy) => campaign.access_policy = policy,
            }
        }

        campaign.updated_at = now;
        campaigns.put(campaign).await
    }

    pub(super) async fn campaign_forked(&self, event: &Event) -> Result<(), JournalError> {
        let campaigns = self.campaign_store()?;
        let campaign_id = required_campaign_id(event)?;
        let payload: CampaignForked = decode_payload(event)?;

        let parent = required(&payload.parent_campaign_id, "parent campaign id")?;
        let origin = match payload.origin_campaign_id.trim() {
            "" => parent.clone(),
            origin => origin.to_string(),
        };

        let mut campaign = campaigns.get(campaign_id).await?;
        campaign.parent_campaign_id = Some(parent);
        campaign.fork_event_seq = Some(payload.fork_event_seq);
        campaign.origin_campaign_id = Some(origin);
        campaign.updated_at = self.stamp(event);
        campaigns.put(campaign).await
    }
}
