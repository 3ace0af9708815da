//! Projection of Daggerheart events into character state and the GM Fear pool.

use std::sync::Arc;

use campaign_journal_core::environment::{Clock, SystemClock};
use campaign_journal_core::error::JournalError;
use campaign_journal_core::event::Event;
use campaign_journal_core::labels::GameSystemId;
use campaign_journal_core::normalize::{decode_payload, payload_or_entity_id, required_campaign_id};
use campaign_journal_core::store::StoreFuture;
use campaign_journal_core::system::SystemAdapter;
use chrono::{DateTime, Utc};

use crate::bounds::{
    self, DEFAULT_ARMOR_MAX, DEFAULT_HP_MAX, DEFAULT_STRESS_MAX, FEAR_MAX, HOPE_MAX,
    STARTING_HOPE,
};
use crate::events::{
    CHARACTER_PROFILE_SET, CHARACTER_STATE_PATCHED, CharacterProfileSet, CharacterStatePatched,
    GM_FEAR_CHANGED, GmFearChanged,
};
use crate::state::{CharacterState, DaggerheartStore, GmFear};
use crate::{SYSTEM_ID, SYSTEM_VERSION};

/// Applies Daggerheart events to a [`DaggerheartStore`].
///
/// Every value is checked against its declared bound before anything is
/// written; the adapter never clamps.
#[derive(Clone)]
pub struct DaggerheartAdapter {
    system: GameSystemId,
    store: Arc<dyn DaggerheartStore>,
    clock: Arc<dyn Clock>,
    version: String,
}

impl DaggerheartAdapter {
    /// Creates an adapter for [`SYSTEM_VERSION`].
    ///
    /// # Errors
    ///
    /// Returns [`JournalError::InvalidInput`] if [`SYSTEM_ID`] does not
    /// canonicalize.
    pub fn new(store: Arc<dyn DaggerheartStore>) -> Result<Self, JournalError> {
        Ok(Self {
            system: GameSystemId::parse(SYSTEM_ID)?,
            store,
            clock: Arc::new(SystemClock),
            version: SYSTEM_VERSION.to_string(),
        })
    }

    /// Serves a different rules version.
    #[must_use]
    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = version.into();
        self
    }

    /// Sets the clock used when an event carries no timestamp.
    #[must_use]
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    async fn apply(&self, event: &Event) -> Result<(), JournalError> {
        match event.event_type.as_str() {
            CHARACTER_PROFILE_SET => self.profile_set(event).await,
            CHARACTER_STATE_PATCHED => self.state_patched(event).await,
            GM_FEAR_CHANGED => self.fear_changed(event).await,
            other => {
                tracing::debug!(
                    campaign_id = %event.campaign_id,
                    seq = event.seq,
                    event_type = other,
                    "Ignoring unknown daggerheart event type"
                );
                Ok(())
            }
        }
    }

    async fn profile_set(&self, event: &Event) -> Result<(), JournalError> {
        let campaign_id = required_campaign_id(event)?;
        let payload: CharacterProfileSet = decode_payload(event)?;
        let character_id = payload_or_entity_id(&payload.character_id, event, "character")?;

        let hp_max = bounds::maximum("hp_max", payload.hp_max, DEFAULT_HP_MAX, 1)?;
        let stress_max = bounds::maximum("stress_max", payload.stress_max, DEFAULT_STRESS_MAX, 0)?;
        let armor_max = bounds::maximum("armor_max", payload.armor_max, DEFAULT_ARMOR_MAX, 0)?;
        let now = self.stamp(event);

        let state = match self.store.get_character_state(campaign_id, &character_id).await {
            Ok(mut state) => {
                // Existing values must still fit under the new maxima.
                bounds::check("hp", state.hp, 0, hp_max)?;
                bounds::check("stress", state.stress, 0, stress_max)?;
                bounds::check("armor", state.armor, 0, armor_max)?;
                state.hp_max = hp_max;
                state.stress_max = stress_max;
                state.armor_max = armor_max;
                state.updated_at = now;
                state
            }
            Err(e) if e.is_not_found() => CharacterState {
                campaign_id: campaign_id.to_string(),
                character_id,
                hp: hp_max,
                hp_max,
                hope: STARTING_HOPE,
                stress: 0,
                stress_max,
                armor: armor_max,
                armor_max,
                updated_at: now,
            },
            Err(e) => return Err(e),
        };

        self.store.put_character_state(state).await
    }

    async fn state_patched(&self, event: &Event) -> Result<(), JournalError> {
        let campaign_id = required_campaign_id(event)?;
        let payload: CharacterStatePatched = decode_payload(event)?;
        let character_id = payload_or_entity_id(&payload.character_id, event, "character")?;

        let mut state = self
            .store
            .get_character_state(campaign_id, &character_id)
            .await?;

        if let Some(hp) = payload.hp_after {
            state.hp = bounds::check("hp", hp, 0, state.hp_max)?;
        }
        if let Some(hope) = payload.hope_after {
            state.hope = bounds::check("hope", hope, 0, HOPE_MAX)?;
        }
        if let Some(stress) = payload.stress_after {
            state.stress = bounds::check("stress", stress, 0, state.stress_max)?;
        }
        if let Some(armor) = payload.armor_after {
            state.armor = bounds::check("armor", armor, 0, state.armor_max)?;
        }

        state.updated_at = self.stamp(event);
        self.store.put_character_state(state).await
    }

    async fn fear_changed(&self, event: &Event) -> Result<(), JournalError> {
        let campaign_id = required_campaign_id(event)?;
        let payload: GmFearChanged = decode_payload(event)?;
        let value = bounds::check("gm_fear", payload.after, 0, FEAR_MAX)?;

        self.store
            .put_gm_fear(GmFear {
                campaign_id: campaign_id.to_string(),
                value,
                updated_at: self.stamp(event),
            })
            .await
    }

    fn stamp(&self, event: &Event) -> DateTime<Utc> {
        event.timestamp.unwrap_or_else(|| self.clock.now())
    }
}

impl SystemAdapter for DaggerheartAdapter {
    fn id(&self) -> GameSystemId {
        self.system.clone()
    }

    fn version(&self) -> &str {
        &self.version
    }

    fn apply_event<'a>(&'a self, event: &'a Event) -> StoreFuture<'a, ()> {
        Box::pin(self.apply(event))
    }
}

impl std::fmt::Debug for DaggerheartAdapter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DaggerheartAdapter")
            .field("system", &self.system)
            .field("version", &self.version)
            .finish_non_exhaustive()
    }
}
