use campaign_journal_core::error::JournalError;
use campaign_journal_core::event::Event;
use campaign_journal_core::labels::CharacterKind;
use campaign_journal_core::normalize::{decode_payload, payload_or_entity_id, required_campaign_id};
use campaign_journal_core::records::Character;

use super::{Applier, floored_decrement, required};
use crate::patch::{CharacterField, decode_fields};
use crate::payloads::{CharacterCreated, CharacterDeleted, FieldsUpdated};

impl Applier {
    pub(super) async fn character_created(&self, event: &Event) -> Result<(), JournalError> {
        let campaigns = self.campaign_store()?;
        let characters = self.character_store()?;
        let campaign_id = required_campaign_id(event)?;
        let payload: CharacterCreated = decode_payload(event)?;

        let character_id = payload_or_entity_id(&payload.character_id, event, "character")?;
        let name = required(&payload.name, "character name")?;
        let kind = CharacterKind::parse(&payload.kind)?;

        let mut campaign = campaigns.get(campaign_id).await?;
        let now = self.stamp(event);

        characters
            .put(Character {
                id: character_id,
                campaign_id: campaign_id.to_string(),
                name,
                kind,
                notes: payload.notes.trim().to_string(),
                participant_id: payload.participant_id.trim().to_string(),
                created_at: now,
                updated_at: now,
            })
            .await?;

        campaign.character_count = campaign.character_count.saturating_add(1);
        campaign.updated_at = now;
        campaigns.put(campaign).await
    }

    pub(super) async fn character_updated(&self, event: &Event) -> Result<(), JournalError> {
        let characters = self.character_store()?;
        let campaign_id = required_campaign_id(event)?;
        let payload: FieldsUpdated = decode_payload(event)?;
        let character_id = payload_or_entity_id(&payload.character_id, event, "character")?;
        let fields = decode_fields::<CharacterField>(&payload.fields)?;

        let mut character = characters.get(campaign_id, &character_id).await?;
        for field in fields {
            match field {
                CharacterField::Name(name) => character.name = name,
                CharacterField::Kind(kind) => character.kind = kind,
                CharacterField::Notes(notes) => character.notes = notes,
                CharacterField::ParticipantId(participant_id) => {
                    character.participant_id = participant_id;
                }
            }
        }

        character.updated_at = self.stamp(event);
        characters.put(character).await
    }

    pub(super) async fn character_deleted(&self, event: &Event) -> Result<(), JournalError> {
        let campaigns = self.campaign_store()?;
        let characters = self.character_store()?;
        let campaign_id = required_campaign_id(event)?;
        let payload: CharacterDeleted = decode_payload(event)?;
        let character_id = payload_or_entity_id(&payload.character_id, event, "character")?;

        let mut campaign = campaigns.get(campaign_id).await?;
        characters.delete(campaign_id, &character_id).await?;

        campaign.character_count = floored_decrement(
            campaign.character_count,
            "character_count",
            campaign_id,
            event.seq,
        );
        campaign.updated_at = self.stamp(event);
        campaigns.put(campaign).await
    }
}
