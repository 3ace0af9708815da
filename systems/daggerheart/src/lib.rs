//! # Campaign Journal: Daggerheart
//!
//! Game-system adapter for Daggerheart campaigns.
//!
//! The adapter projects system-owned events (`daggerheart.*`) into
//! per-character resource state and the GM's Fear pool. It plugs into the
//! core applier through [`SystemAdapter`](campaign_journal_core::system::SystemAdapter)
//! and is looked up by `(system_id, system_version)`.
//!
//! ## Example
//!
//! ```
//! use std::sync::Arc;
//! use campaign_journal_core::system::SystemAdapter;
//! use campaign_journal_daggerheart::{DaggerheartAdapter, InMemoryDaggerheartStore};
//!
//! let store = Arc::new(InMemoryDaggerheartStore::new());
//! let adapter = DaggerheartAdapter::new(store)?;
//! assert_eq!(adapter.id().as_str(), "daggerheart");
//! assert_eq!(adapter.version(), "1.0.0");
//! # Ok::<(), campaign_journal_core::error::JournalError>(())
//! ```

pub mod adapter;
pub mod bounds;
pub mod events;
pub mod state;

/// Canonical system id carried on Daggerheart events.
pub const SYSTEM_ID: &str = "daggerheart";

/// Rules version served by [`DaggerheartAdapter::new`].
pub const SYSTEM_VERSION: &str = "1.0.0";

pub use adapter::DaggerheartAdapter;
pub use events::{CharacterProfileSet, CharacterStatePatched, GmFearChanged};
pub use state::{CharacterState, DaggerheartStore, GmFear, InMemoryDaggerheartStore};

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use campaign_journal_core::environment::Clock;
    use campaign_journal_core::error::{ErrorKind, JournalError};
    use campaign_journal_core::event::Event;
    use campaign_journal_core::system::SystemAdapter;
    use campaign_journal_testing::{helpers, test_clock};
    use serde_json::{Value, json};
    use std::sync::Arc;

    fn setup() -> (Arc<InMemoryDaggerheartStore>, DaggerheartAdapter) {
        let store = Arc::new(InMemoryDaggerheartStore::new());
        let adapter = DaggerheartAdapter::new(store.clone())
            .unwrap()
            .with_clock(Arc::new(test_clock()));
        (store, adapter)
    }

    fn dh(event_type: &str, character_id: &str, payload: &Value) -> Event {
        helpers::system_event("camp-1", SYSTEM_ID, SYSTEM_VERSION, event_type, payload)
            .with_entity("character", character_id)
    }

    async fn profiled(adapter: &DaggerheartAdapter) {
        adapter
            .apply_event(&dh(
                events::CHARACTER_PROFILE_SET,
                "char-1",
                &json!({ "hp_max": 8, "stress_max": 5, "armor_max": 3 }),
            ))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn profile_starts_at_full_resources() {
        let (store, adapter) = setup();
        profiled(&adapter).await;

        let state = store.character_state("camp-1", "char-1").unwrap();
        assert_eq!(state.hp, 8);
        assert_eq!(state.hp_max, 8);
        assert_eq!(state.hope, bounds::STARTING_HOPE);
        assert_eq!(state.stress, 0);
        assert_eq!(state.armor, 3);
        assert_eq!(state.updated_at, test_clock().now());
    }

    #[tokio::test]
    async fn profile_defaults_apply() {
        let (store, adapter) = setup();
        adapter
            .apply_event(&dh(events::CHARACTER_PROFILE_SET, "char-1", &json!({})))
            .await
            .unwrap();

        let state = store.character_state("camp-1", "char-1").unwrap();
        assert_eq!(state.hp_max, bounds::DEFAULT_HP_MAX);
        assert_eq!(state.stress_max, bounds::DEFAULT_STRESS_MAX);
        assert_eq!(state.armor_max, bounds::DEFAULT_ARMOR_MAX);
    }

    #[tokio::test]
    async fn patch_updates_only_provided_values() {
        let (store, adapter) = setup();
        profiled(&adapter).await;

        adapter
            .apply_event(&dh(
                events::CHARACTER_STATE_PATCHED,
                "char-1",
                &json!({ "hp_after": 5, "hope_after": 6 }),
            ))
            .await
            .unwrap();

        let state = store.character_state("camp-1", "char-1").unwrap();
        assert_eq!(state.hp, 5);
        assert_eq!(state.hope, 6);
        assert_eq!(state.stress, 0);
        assert_eq!(state.armor, 3);
    }

    #[tokio::test]
    async fn out_of_range_hope_is_rejected_without_writing() {
        let (store, adapter) = setup();
        profiled(&adapter).await;

        let err = adapter
            .apply_event(&dh(
                events::CHARACTER_STATE_PATCHED,
                "char-1",
                &json!({ "hp_after": 1, "hope_after": 7 }),
            ))
            .await
            .unwrap_err();

        assert_eq!(
            err,
            JournalError::OutOfRange {
                field: "hope".into(),
                value: 7,
                min: 0,
                max: bounds::HOPE_MAX
            }
        );
        // hp was valid but the event is all-or-nothing.
        assert_eq!(store.character_state("camp-1", "char-1").unwrap().hp, 8);
    }

    #[tokio::test]
    async fn hp_is_bounded_by_the_profile_maximum() {
        let (_, adapter) = setup();
        profiled(&adapter).await;

        let err = adapter
            .apply_event(&dh(
                events::CHARACTER_STATE_PATCHED,
                "char-1",
                &json!({ "hp_after": 9 }),
            ))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidInput);
    }

    #[tokio::test]
    async fn lowering_a_maximum_below_current_value_fails() {
        let (_, adapter) = setup();
        profiled(&adapter).await;

        let err = adapter
            .apply_event(&dh(
                events::CHARACTER_PROFILE_SET,
                "char-1",
                &json!({ "hp_max": 4, "stress_max": 5, "armor_max": 3 }),
            ))
            .await
            .unwrap_err();
        assert!(matches!(err, JournalError::OutOfRange { ref field, .. } if field == "hp"));
    }

    #[tokio::test]
    async fn patch_without_profile_is_not_found() {
        let (_, adapter) = setup();
        let err = adapter
            .apply_event(&dh(
                events::CHARACTER_STATE_PATCHED,
                "ghost",
                &json!({ "hp_after": 1 }),
            ))
            .await
            .unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn gm_fear_is_bounded() {
        let (store, adapter) = setup();
        let fear = |after: i64| {
            helpers::system_event(
                "camp-1",
                SYSTEM_ID,
                SYSTEM_VERSION,
                events::GM_FEAR_CHANGED,
                &json!({ "after": after }),
            )
        };

        adapter.apply_event(&fear(12)).await.unwrap();
        assert_eq!(store.gm_fear("camp-1").unwrap().value, 12);

        let err = adapter.apply_event(&fear(13)).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidInput);
        let err = adapter.apply_event(&fear(-1)).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidInput);
        assert_eq!(store.gm_fear("camp-1").unwrap().value, 12);
    }

    #[tokio::test]
    async fn array_payloads_are_rejected() {
        let (store, adapter) = setup();
        let err = adapter
            .apply_event(&dh(events::CHARACTER_PROFILE_SET, "char-1", &json!([8, 5, 3])))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidInput);
        assert!(store.character_state("camp-1", "char-1").is_none());
    }

    #[tokio::test]
    async fn unknown_daggerheart_types_are_ignored() {
        let (_, adapter) = setup();
        adapter
            .apply_event(&dh("daggerheart.countdown_created", "char-1", &json!({})))
            .await
            .unwrap();
    }

    #[test]
    fn version_can_be_overridden() {
        let (_, adapter) = setup();
        let adapter = adapter.with_version("2.0.0");
        assert_eq!(adapter.version(), "2.0.0");
        assert_eq!(adapter.key().version, "2.0.0");
    }
}
