//! # Campaign Journal Testing
//!
//! Testing utilities and helpers for the campaign journal.
//!
//! This crate provides:
//! - Mock implementations of Environment traits
//! - An in-memory, hash-chained [`InMemoryEventStore`]
//! - In-memory projection stores and replay checkpoints
//! - A Given-When-Then [`JournalHarness`]
//! - Event builders and proptest strategies
//!
//! ## Example
//!
//! ```ignore
//! use campaign_journal_testing::{InMemoryProjections, JournalHarness, helpers};
//!
//! #[tokio::test]
//! async fn test_join_flow() {
//!     let projections = InMemoryProjections::new();
//!     let harness = JournalHarness::new(Arc::new(Applier::new(projections.stores())));
//!
//!     harness
//!         .given([helpers::campaign_created("camp-1", "Test Campaign")])
//!         .await
//!         .unwrap();
//!
//!     let campaign = projections.campaign("camp-1").unwrap();
//!     assert_eq!(campaign.participant_count, 0);
//! }
//! ```

use chrono::{DateTime, Utc};
use campaign_journal_core::environment::Clock;

pub mod event_store;
pub mod harness;
pub mod projection_mocks;

/// Mock implementations of Environment traits
pub mod mocks {
    use super::{Clock, DateTime, Utc};

    /// Fixed clock for deterministic tests
    ///
    /// Always returns the same time, making tests reproducible.
    ///
    /// # Example
    ///
    /// ```
    /// use campaign_journal_testing::mocks::FixedClock;
    /// use campaign_journal_core::environment::Clock;
    /// use chrono::Utc;
    ///
    /// let clock = FixedClock::new(Utc::now());
    /// let time1 = clock.now();
    /// let time2 = clock.now();
    /// assert_eq!(time1, time2); // Always the same!
    /// ```
    #[derive(Debug, Clone)]
    pub struct FixedClock {
        time: DateTime<Utc>,
    }

    impl FixedClock {
        /// Create a new fixed clock with the given time
        #[must_use]
        pub const fn new(time: DateTime<Utc>) -> Self {
            Self { time }
        }
    }

    impl Clock for FixedClock {
        fn now(&self) -> DateTime<Utc> {
            self.time
        }
    }

    /// Create a default fixed clock for tests (2025-01-01 00:00:00 UTC)
    ///
    /// # Panics
    ///
    /// This function will panic if the hardcoded timestamp fails to parse,
    /// which should never happen in practice.
    #[must_use]
    #[allow(clippy::expect_used)]
    pub fn test_clock() -> FixedClock {
        FixedClock::new(
            DateTime::parse_from_rfc3339("2025-01-01T00:00:00Z")
                .expect("hardcoded timestamp should always parse")
                .with_timezone(&Utc),
        )
    }
}

/// Event builders for the core event types.
///
/// Every builder stamps the event with [`test_clock`] time so projections
/// built from them are reproducible.
pub mod helpers {
    use super::{Clock, test_clock};
    use campaign_journal_core::event::{Event, event_types};
    use serde_json::{Value, json};

    /// Event of any type with a JSON payload
    ///
    /// # Panics
    ///
    /// Never in practice: a `serde_json::Value` always serializes.
    #[must_use]
    #[allow(clippy::expect_used)]
    pub fn event(campaign_id: &str, event_type: &str, payload: &Value) -> Event {
        Event::new(campaign_id, event_type)
            .with_timestamp(test_clock().now())
            .with_payload(payload)
            .expect("json values always serialize")
    }

    /// System-owned event routed to an adapter
    #[must_use]
    pub fn system_event(
        campaign_id: &str,
        system_id: &str,
        system_version: &str,
        event_type: &str,
        payload: &Value,
    ) -> Event {
        event(campaign_id, event_type, payload).with_system(system_id, system_version)
    }

    /// `campaign.created` for a Daggerheart campaign run by a human GM
    #[must_use]
    pub fn campaign_created(campaign_id: &str, name: &str) -> Event {
        event(
            campaign_id,
            event_types::CAMPAIGN_CREATED,
            &json!({
                "name": name,
                "game_system": "DAGGERHEART",
                "gm_mode": "GM_MODE_HUMAN",
            }),
        )
    }

    /// `campaign.updated` with a sparse field map
    #[must_use]
    pub fn campaign_updated(campaign_id: &str, fields: &Value) -> Event {
        event(
            campaign_id,
            event_types::CAMPAIGN_UPDATED,
            &json!({ "fields": fields }),
        )
    }

    /// `participant.joined` for a human player seat
    #[must_use]
    pub fn participant_joined(
        campaign_id: &str,
        participant_id: &str,
        user_id: &str,
        display_name: &str,
    ) -> Event {
        event(
            campaign_id,
            event_types::PARTICIPANT_JOINED,
            &json!({
                "participant_id": participant_id,
                "user_id": user_id,
                "display_name": display_name,
                "role": "PLAYER",
                "controller": "CONTROLLER_HUMAN",
                "campaign_access": "MEMBER",
            }),
        )
        .with_entity("participant", participant_id)
    }

    /// `participant.left`
    #[must_use]
    pub fn participant_left(campaign_id: &str, participant_id: &str) -> Event {
        event(
            campaign_id,
            event_types::PARTICIPANT_LEFT,
            &json!({ "participant_id": participant_id }),
        )
        .with_entity("participant", participant_id)
    }

    /// `participant.updated` with a sparse field map
    #[must_use]
    pub fn participant_updated(campaign_id: &str, participant_id: &str, fields: &Value) -> Event {
        event(
            campaign_id,
            event_types::PARTICIPANT_UPDATED,
            &json!({ "participant_id": participant_id, "fields": fields }),
        )
        .with_entity("participant", participant_id)
    }

    /// `seat.reassigned`
    #[must_use]
    pub fn seat_reassigned(
        campaign_id: &str,
        participant_id: &str,
        prior_user_id: &str,
        user_id: &str,
    ) -> Event {
        event(
            campaign_id,
            event_types::SEAT_REASSIGNED,
            &json!({
                "participant_id": participant_id,
                "prior_user_id": prior_user_id,
                "user_id": user_id,
            }),
        )
        .with_entity("participant", participant_id)
    }

    /// `character.created` for a player character
    #[must_use]
    pub fn character_created(campaign_id: &str, character_id: &str, name: &str) -> Event {
        event(
            campaign_id,
            event_types::CHARACTER_CREATED,
            &json!({ "character_id": character_id, "name": name, "kind": "PC" }),
        )
        .with_entity("character", character_id)
    }

    /// `character.deleted`
    #[must_use]
    pub fn character_deleted(campaign_id: &str, character_id: &str) -> Event {
        event(
            campaign_id,
            event_types::CHARACTER_DELETED,
            &json!({ "character_id": character_id }),
        )
        .with_entity("character", character_id)
    }
}

/// Property-based testing utilities using proptest.
pub mod properties {
    use super::helpers;
    use campaign_journal_core::event::Event;
    use proptest::prelude::*;
    use std::collections::BTreeSet;

    #[derive(Debug, Clone, Copy)]
    enum RosterOp {
        Join,
        Leave,
        Rename,
    }

    fn arb_roster_op() -> impl Strategy<Value = RosterOp> {
        prop_oneof![
            3 => Just(RosterOp::Join),
            1 => Just(RosterOp::Leave),
            2 => Just(RosterOp::Rename),
        ]
    }

    /// A valid roster history for `campaign_id`.
    ///
    /// Starts with `campaign.created`, then mixes joins, leaves and renames
    /// over a handful of seats. Only ops valid at their point in the history
    /// are kept, so every event applies cleanly.
    pub fn arb_roster_history(campaign_id: &'static str) -> impl Strategy<Value = Vec<Event>> {
        prop::collection::vec((arb_roster_op(), 0u8..4, "[A-Z][a-z]{2,8}"), 0..24).prop_map(
            move |ops| {
                let mut seated = BTreeSet::new();
                let mut events = vec![helpers::campaign_created(campaign_id, "Roster")];
                for (op, seat, name) in ops {
                    let participant_id = format!("part-{seat}");
                    match op {
                        RosterOp::Join if seated.insert(seat) => {
                            events.push(helpers::participant_joined(
                                campaign_id,
                                &participant_id,
                                "",
                                &name,
                            ));
                        }
                        RosterOp::Leave if seated.remove(&seat) => {
                            events.push(helpers::participant_left(campaign_id, &participant_id));
                        }
                        RosterOp::Rename if seated.contains(&seat) => {
                            events.push(helpers::participant_updated(
                                campaign_id,
                                &participant_id,
                                &serde_json::json!({ "display_name": name }),
                            ));
                        }
                        _ => {}
                    }
                }
                events
            },
        )
    }
}

/// Install a `tracing` subscriber that writes through the test harness.
///
/// Honors `RUST_LOG`; defaults to `warn`. Safe to call from every test.
pub fn init_test_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_test_writer()
        .try_init();
}

// Re-export commonly used items
pub use event_store::{InMemoryEventStore, TEST_KEY_ID};
pub use harness::JournalHarness;
pub use mocks::{FixedClock, test_clock};
pub use projection_mocks::{
    InMemoryCampaignStore, InMemoryCharacterStore, InMemoryClaimIndex, InMemoryInviteStore,
    InMemoryParticipantStore, InMemoryProjections, InMemoryReplayCheckpoint, InMemorySessionStore,
};
