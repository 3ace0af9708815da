//! Daggerheart projection records and their storage contract.

use campaign_journal_core::error::JournalError;
use campaign_journal_core::store::StoreFuture;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

/// Resource state of one character.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CharacterState {
    /// Owning campaign.
    pub campaign_id: String,
    /// Character the state belongs to.
    pub character_id: String,
    /// Current hit points, `0..=hp_max`.
    pub hp: i64,
    /// Hit-point maximum.
    pub hp_max: i64,
    /// Current Hope, `0..=6`.
    pub hope: i64,
    /// Current stress, `0..=stress_max`.
    pub stress: i64,
    /// Stress maximum.
    pub stress_max: i64,
    /// Current armor slots, `0..=armor_max`.
    pub armor: i64,
    /// Armor maximum.
    pub armor_max: i64,
    /// Last projection update.
    pub updated_at: DateTime<Utc>,
}

/// The GM's Fear pool for a campaign.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GmFear {
    /// Owning campaign.
    pub campaign_id: String,
    /// Current Fear, `0..=12`.
    pub value: i64,
    /// Last projection update.
    pub updated_at: DateTime<Utc>,
}

/// Storage for Daggerheart projections.
///
/// Missing records are reported as [`JournalError::NotFound`].
pub trait DaggerheartStore: Send + Sync {
    /// Loads a character's state.
    fn get_character_state<'a>(
        &'a self,
        campaign_id: &'a str,
        character_id: &'a str,
    ) -> StoreFuture<'a, CharacterState>;

    /// Inserts or replaces a character's state.
    fn put_character_state(&self, state: CharacterState) -> StoreFuture<'_, ()>;

    /// Loads the campaign's Fear pool.
    fn get_gm_fear<'a>(&'a self, campaign_id: &'a str) -> StoreFuture<'a, GmFear>;

    /// Inserts or replaces the campaign's Fear pool.
    fn put_gm_fear(&self, fear: GmFear) -> StoreFuture<'_, ()>;
}

/// `HashMap`-backed [`DaggerheartStore`].
#[derive(Clone, Debug, Default)]
pub struct InMemoryDaggerheartStore {
    characters: Arc<RwLock<HashMap<(String, String), CharacterState>>>,
    fear: Arc<RwLock<HashMap<String, GmFear>>>,
}

impl InMemoryDaggerheartStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of a character's state.
    #[must_use]
    pub fn character_state(&self, campaign_id: &str, character_id: &str) -> Option<CharacterState> {
        self.characters
            .read()
            .ok()?
            .get(&(campaign_id.to_string(), character_id.to_string()))
            .cloned()
    }

    /// Snapshot of a campaign's Fear pool.
    #[must_use]
    pub fn gm_fear(&self, campaign_id: &str) -> Option<GmFear> {
        self.fear.read().ok()?.get(campaign_id).cloned()
    }
}

fn poisoned<T>(_: T) -> JournalError {
    JournalError::unknown("daggerheart store lock poisoned")
}

impl DaggerheartStore for InMemoryDaggerheartStore {
    fn get_character_state<'a>(
        &'a self,
        campaign_id: &'a str,
        character_id: &'a str,
    ) -> StoreFuture<'a, CharacterState> {
        Box::pin(async move {
            self.characters
                .read()
                .map_err(poisoned)?
                .get(&(campaign_id.to_string(), character_id.to_string()))
                .cloned()
                .ok_or_else(|| JournalError::not_found("daggerheart character state", character_id))
        })
    }

    fn put_character_state(&self, state: CharacterState) -> StoreFuture<'_, ()> {
        Box::pin(async move {
            self.characters.write().map_err(poisoned)?.insert(
                (state.campaign_id.clone(), state.character_id.clone()),
                state,
            );
            Ok(())
        })
    }

    fn get_gm_fear<'a>(&'a self, campaign_id: &'a str) -> StoreFuture<'a, GmFear> {
        Box::pin(async move {
            self.fear
                .read()
                .map_err(poisoned)?
                .get(campaign_id)
                .cloned()
                .ok_or_else(|| JournalError::not_found("daggerheart gm fear", campaign_id))
        })
    }

    fn put_gm_fear(&self, fear: GmFear) -> StoreFuture<'_, ()> {
        Box::pin(async move {
            self.fear
                .write()
                .map_err(poisoned)?
                .insert(fear.campaign_id.clone(), fear);
            Ok(())
        })
    }
}
