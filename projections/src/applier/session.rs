use campaign_journal_core::error::JournalError;
use campaign_journal_core::event::Event;
use campaign_journal_core::labels::SessionStatus;
use campaign_journal_core::normalize::{decode_payload, payload_or_entity_id, required_campaign_id};
use campaign_journal_core::records::Session;

use super::Applier;
use crate::payloads::{SessionEnded, SessionStarted};

impl Applier {
    pub(super) async fn session_started(&self, event: &Event) -> Result<(), JournalError> {
        let sessions = self.session_store()?;
        let campaign_id = required_campaign_id(event)?;
        let payload: SessionStarted = decode_payload(event)?;
        let session_id = payload_or_entity_id(&payload.session_id, event, "session")?;
        let now = self.stamp(event);

        sessions
            .put(Session {
                id: session_id,
                campaign_id: campaign_id.to_string(),
                name: payload.session_name.trim().to_string(),
                status: SessionStatus::Active,
                started_at: now,
                ended_at: None,
                updated_at: now,
            })
            .await
    }

    pub(super) async fn session_ended(&self, event: &Event) -> Result<(), JournalError> {
        let sessions = self.session_store()?;
        let campaign_id = required_campaign_id(event)?;
        let payload: SessionEnded = decode_payload(event)?;
        let session_id = payload_or_entity_id(&payload.session_id, event, "session")?;

        let (_, ended) = sessions
            .end_session(campaign_id, &session_id, self.stamp(event))
            .await?;
        if !ended {
            tracing::debug!(campaign_id, session_id = %session_id, "Session already ended");
        }
        Ok(())
    }
}
