//! Applier behavior against in-memory projection stores.

#![allow(clippy::unwrap_used)]

use std::sync::Arc;

use campaign_journal_core::environment::Clock;
use campaign_journal_core::error::{ErrorKind, JournalError};
use campaign_journal_core::event::event_types;
use campaign_journal_core::labels::{CampaignStatus, CharacterKind, InviteStatus, SessionStatus};
use campaign_journal_core::store::ProjectionStores;
use campaign_journal_daggerheart::{DaggerheartAdapter, InMemoryDaggerheartStore, SYSTEM_ID};
use campaign_journal_projections::{AdapterRegistry, Applier};
use campaign_journal_testing::{
    InMemoryProjections, JournalHarness, helpers, init_test_tracing, test_clock,
};
use serde_json::json;

fn setup() -> (InMemoryProjections, JournalHarness) {
    init_test_tracing();
    let projections = InMemoryProjections::new();
    let applier = Applier::new(projections.stores()).with_clock(Arc::new(test_clock()));
    (projections, JournalHarness::new(Arc::new(applier)))
}

fn setup_with_daggerheart() -> (InMemoryProjections, Arc<InMemoryDaggerheartStore>, JournalHarness) {
    init_test_tracing();
    let projections = InMemoryProjections::new();
    let dh_store = Arc::new(InMemoryDaggerheartStore::new());
    let adapters = AdapterRegistry::new()
        .with_adapter(Arc::new(DaggerheartAdapter::new(dh_store.clone()).unwrap()))
        .unwrap();
    let applier = Applier::new(projections.stores())
        .with_adapters(Arc::new(adapters))
        .with_clock(Arc::new(test_clock()));
    (projections, dh_store, JournalHarness::new(Arc::new(applier)))
}

#[tokio::test]
async fn joining_updates_roster_and_count() {
    let (projections, harness) = setup();

    harness
        .given([
            helpers::campaign_created("camp-1", "The Withering"),
            helpers::participant_joined("camp-1", "part-1", "user-1", "Player One"),
        ])
        .await
        .unwrap();

    let campaign = projections.campaign("camp-1").unwrap();
    assert_eq!(campaign.status, CampaignStatus::Draft);
    assert_eq!(campaign.participant_count, 1);

    let participant = projections.participant("camp-1", "part-1").unwrap();
    assert_eq!(participant.display_name, "Player One");
    assert_eq!(participant.user_id, "user-1");
    assert_eq!(
        projections.claims.claimed_seat("camp-1", "user-1").as_deref(),
        Some("part-1")
    );
}

#[tokio::test]
async fn joining_with_a_claimed_user_conflicts_before_writing() {
    let (projections, harness) = setup();
    harness
        .given([
            helpers::campaign_created("camp-1", "Claims"),
            helpers::participant_joined("camp-1", "part-1", "user-1", "One"),
        ])
        .await
        .unwrap();

    let err = harness
        .when(helpers::participant_joined("camp-1", "part-2", "user-1", "Two"))
        .await
        .unwrap_err();

    assert!(matches!(err, JournalError::ClaimConflict { .. }));
    assert!(projections.participant("camp-1", "part-2").is_none());
    assert_eq!(projections.campaign("camp-1").unwrap().participant_count, 1);
}

#[tokio::test]
async fn leaving_twice_floors_the_count_at_zero() {
    let (projections, harness) = setup();
    harness
        .given([
            helpers::campaign_created("camp-1", "Leavers"),
            helpers::participant_joined("camp-1", "part-1", "user-1", "One"),
            helpers::participant_left("camp-1", "part-1"),
            helpers::participant_left("camp-1", "part-1"),
        ])
        .await
        .unwrap();

    assert_eq!(projections.campaign("camp-1").unwrap().participant_count, 0);
    assert!(projections.participant("camp-1", "part-1").is_none());
    assert!(projections.claims.claimed_seat("camp-1", "user-1").is_none());
}

#[tokio::test]
async fn seat_reassignment_moves_the_claim() {
    let (projections, harness) = setup();
    harness
        .given([
            helpers::campaign_created("camp-1", "Seats"),
            helpers::participant_joined("camp-1", "part-1", "user-1", "One"),
            helpers::seat_reassigned("camp-1", "part-1", "user-1", "user-2"),
        ])
        .await
        .unwrap();

    assert_eq!(projections.participant("camp-1", "part-1").unwrap().user_id, "user-2");
    assert!(projections.claims.claimed_seat("camp-1", "user-1").is_none());
    assert_eq!(
        projections.claims.claimed_seat("camp-1", "user-2").as_deref(),
        Some("part-1")
    );
}

#[tokio::test]
async fn stale_seat_reassignment_leaves_state_unchanged() {
    let (projections, harness) = setup();
    harness
        .given([
            helpers::campaign_created("camp-1", "Seats"),
            helpers::participant_joined("camp-1", "part-1", "user-1", "One"),
        ])
        .await
        .unwrap();

    let err = harness
        .when(helpers::seat_reassigned("camp-1", "part-1", "user-9", "user-2"))
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::InvalidStateTransition);
    assert!(matches!(err, JournalError::ClaimMismatch { ref actual, .. } if actual == "user-1"));
    assert_eq!(projections.participant("camp-1", "part-1").unwrap().user_id, "user-1");
    assert_eq!(
        projections.claims.claimed_seat("camp-1", "user-1").as_deref(),
        Some("part-1")
    );
    assert!(projections.claims.claimed_seat("camp-1", "user-2").is_none());
}

#[tokio::test]
async fn bind_and_unbind_keep_claims_in_step() {
    let (projections, harness) = setup();
    harness
        .given([
            helpers::campaign_created("camp-1", "Binding"),
            helpers::participant_joined("camp-1", "part-1", "", "Open Seat"),
            helpers::event(
                "camp-1",
                event_types::PARTICIPANT_BOUND,
                &json!({ "participant_id": "part-1", "user_id": "user-7" }),
            ),
        ])
        .await
        .unwrap();
    assert_eq!(projections.participant("camp-1", "part-1").unwrap().user_id, "user-7");

    let err = harness
        .when(helpers::event(
            "camp-1",
            event_types::PARTICIPANT_UNBOUND,
            &json!({ "participant_id": "part-1", "user_id": "user-8" }),
        ))
        .await
        .unwrap_err();
    assert!(matches!(err, JournalError::ClaimMismatch { .. }));

    harness
        .when(helpers::event(
            "camp-1",
            event_types::PARTICIPANT_UNBOUND,
            &json!({ "participant_id": "part-1", "user_id": "user-7" }),
        ))
        .await
        .unwrap();
    assert!(projections.participant("camp-1", "part-1").unwrap().user_id.is_empty());
    assert!(projections.claims.claimed_seat("camp-1", "user-7").is_none());
}

#[tokio::test]
async fn campaign_status_follows_the_state_machine() {
    let (projections, harness) = setup();
    harness
        .given([
            helpers::campaign_created("camp-1", "Arc"),
            helpers::campaign_updated("camp-1", &json!({ "status": "ACTIVE" })),
            helpers::campaign_updated("camp-1", &json!({ "status": "CAMPAIGN_STATUS_COMPLETED" })),
        ])
        .await
        .unwrap();

    let campaign = projections.campaign("camp-1").unwrap();
    assert_eq!(campaign.status, CampaignStatus::Completed);
    assert_eq!(campaign.completed_at, Some(test_clock().now()));

    let err = harness
        .when(helpers::campaign_updated("camp-1", &json!({ "status": "DRAFT" })))
        .await
        .unwrap_err();
    assert_eq!(
        err,
        JournalError::InvalidCampaignStatusTransition {
            from: "COMPLETED".into(),
            to: "DRAFT".into(),
        }
    );
    assert_eq!(projections.campaign("camp-1").unwrap().status, CampaignStatus::Completed);
}

#[tokio::test]
async fn campaign_patch_rejects_empty_and_unknown_fields() {
    let (projections, harness) = setup();
    harness
        .given([helpers::campaign_created("camp-1", "Patchy")])
        .await
        .unwrap();

    for fields in [json!({}), json!({ "colour": "red" }), json!({ "name": "  " })] {
        let err = harness
            .when(helpers::campaign_updated("camp-1", &fields))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidInput, "fields: {fields}");
    }
    assert_eq!(projections.campaign("camp-1").unwrap().name, "Patchy");

    harness
        .when(helpers::campaign_updated(
            "camp-1",
            &json!({ "name": "Renamed", "theme_prompt": "salt and ash" }),
        ))
        .await
        .unwrap();
    let campaign = projections.campaign("camp-1").unwrap();
    assert_eq!(campaign.name, "Renamed");
    assert_eq!(campaign.theme_prompt, "salt and ash");
}

#[tokio::test]
async fn forked_campaign_records_lineage() {
    let (projections, harness) = setup();
    harness
        .given([
            helpers::campaign_created("camp-2", "Fork"),
            helpers::event(
                "camp-2",
                event_types::CAMPAIGN_FORKED,
                &json!({ "parent_campaign_id": "camp-1", "fork_event_seq": 12 }),
            ),
        ])
        .await
        .unwrap();

    let campaign = projections.campaign("camp-2").unwrap();
    assert_eq!(campaign.parent_campaign_id.as_deref(), Some("camp-1"));
    assert_eq!(campaign.fork_event_seq, Some(12));
    assert_eq!(campaign.origin_campaign_id.as_deref(), Some("camp-1"));
}

#[tokio::test]
async fn character_lifecycle_tracks_count() {
    let (projections, harness) = setup();
    harness
        .given([
            helpers::campaign_created("camp-1", "Party"),
            helpers::character_created("camp-1", "char-1", "Marlowe"),
            helpers::character_created("camp-1", "char-2", "Ysolde"),
            helpers::event(
                "camp-1",
                event_types::CHARACTER_UPDATED,
                &json!({ "character_id": "char-1", "fields": { "notes": "owes a debt" } }),
            ),
            helpers::character_deleted("camp-1", "char-2"),
        ])
        .await
        .unwrap();

    let character = projections.character("camp-1", "char-1").unwrap();
    assert_eq!(character.kind, CharacterKind::Pc);
    assert_eq!(character.notes, "owes a debt");
    assert!(projections.character("camp-1", "char-2").is_none());
    assert_eq!(projections.campaign("camp-1").unwrap().character_count, 1);

    // Counters trust the journal to carry each delete once; a repeat still counts.
    harness
        .when(helpers::character_deleted("camp-1", "char-2"))
        .await
        .unwrap();
    assert_eq!(projections.campaign("camp-1").unwrap().character_count, 0);

    harness
        .when(helpers::character_deleted("camp-1", "char-2"))
        .await
        .unwrap();
    assert_eq!(projections.campaign("camp-1").unwrap().character_count, 0);
}

#[tokio::test]
async fn reapplying_an_update_leaves_records_unchanged() {
    init_test_tracing();
    let projections = InMemoryProjections::new();
    let applier = Arc::new(Applier::new(projections.stores()).with_clock(Arc::new(test_clock())));
    let harness = JournalHarness::new(applier.clone());
    harness
        .given([
            helpers::campaign_created("camp-1", "Party"),
            helpers::participant_joined("camp-1", "part-1", "user-1", "Ana"),
            helpers::character_created("camp-1", "char-1", "Marlowe"),
            helpers::event(
                "camp-1",
                event_types::INVITE_CREATED,
                &json!({ "invite_id": "inv-1", "participant_id": "part-1" }),
            ),
        ])
        .await
        .unwrap();

    let updates = harness
        .given([
            helpers::participant_updated("camp-1", "part-1", &json!({ "display_name": "Ana B." })),
            helpers::event(
                "camp-1",
                event_types::CHARACTER_UPDATED,
                &json!({ "character_id": "char-1", "fields": { "notes": "owes a debt" } }),
            ),
            helpers::event(
                "camp-1",
                event_types::INVITE_REVOKED,
                &json!({ "invite_id": "inv-1" }),
            ),
        ])
        .await
        .unwrap();

    let campaign = projections.campaign("camp-1").unwrap();
    let participant = projections.participant("camp-1", "part-1").unwrap();
    let character = projections.character("camp-1", "char-1").unwrap();
    let invite = projections.invite("inv-1").unwrap();

    for stored in &updates {
        applier.apply(stored).await.unwrap();
    }

    assert_eq!(projections.campaign("camp-1").unwrap(), campaign);
    assert_eq!(projections.participant("camp-1", "part-1").unwrap(), participant);
    assert_eq!(projections.character("camp-1", "char-1").unwrap(), character);
    assert_eq!(projections.invite("inv-1").unwrap(), invite);
    assert_eq!(invite.status, InviteStatus::Revoked);
}

#[tokio::test]
async fn array_payloads_are_rejected() {
    let (projections, harness) = setup();
    let err = harness
        .when(helpers::event(
            "camp-1",
            event_types::CAMPAIGN_CREATED,
            &json!(["Arr", "", "DAGGERHEART", "HUMAN"]),
        ))
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::InvalidInput);
    assert!(projections.campaign("camp-1").is_none());
}

#[tokio::test]
async fn invite_status_changes() {
    let (projections, harness) = setup();
    harness
        .given([
            helpers::campaign_created("camp-1", "Invites"),
            helpers::event(
                "camp-1",
                event_types::INVITE_CREATED,
                &json!({ "invite_id": "inv-1", "participant_id": "part-1" }),
            ),
        ])
        .await
        .unwrap();
    assert_eq!(projections.invite("inv-1").unwrap().status, InviteStatus::Pending);

    harness
        .when(helpers::event(
            "camp-1",
            event_types::INVITE_CLAIMED,
            &json!({ "invite_id": "inv-1", "participant_id": "part-1", "user_id": "user-3" }),
        ))
        .await
        .unwrap();
    assert_eq!(projections.invite("inv-1").unwrap().status, InviteStatus::Claimed);

    harness
        .when(helpers::event(
            "camp-1",
            event_types::INVITE_REVOKED,
            &json!({ "invite_id": "inv-1" }),
        ))
        .await
        .unwrap();
    assert_eq!(projections.invite("inv-1").unwrap().status, InviteStatus::Revoked);

    let err = harness
        .when(helpers::event(
            "camp-other",
            event_types::INVITE_REVOKED,
            &json!({ "invite_id": "inv-1" }),
        ))
        .await
        .unwrap_err();
    assert!(err.is_not_found());
}

#[tokio::test]
async fn sessions_start_and_end_once() {
    let (projections, harness) = setup();
    let ended = |session_id: &str| {
        helpers::event(
            "camp-1",
            event_types::SESSION_ENDED,
            &json!({ "session_id": session_id }),
        )
    };
    harness
        .given([
            helpers::campaign_created("camp-1", "Sessions"),
            helpers::event(
                "camp-1",
                event_types::SESSION_STARTED,
                &json!({ "session_id": "sess-1", "session_name": "Session Zero" }),
            ),
            ended("sess-1"),
            ended("sess-1"),
        ])
        .await
        .unwrap();

    let session = projections.session("camp-1", "sess-1").unwrap();
    assert_eq!(session.status, SessionStatus::Ended);
    assert_eq!(session.name, "Session Zero");
    assert_eq!(session.ended_at, Some(test_clock().now()));
}

#[tokio::test]
async fn second_active_session_is_rejected() {
    let (_, harness) = setup();
    let started = |session_id: &str| {
        helpers::event(
            "camp-1",
            event_types::SESSION_STARTED,
            &json!({ "session_id": session_id }),
        )
    };
    harness
        .given([helpers::campaign_created("camp-1", "Sessions"), started("sess-1")])
        .await
        .unwrap();

    let err = harness.when(started("sess-2")).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidStateTransition);
}

#[tokio::test]
async fn missing_stores_are_unavailable() {
    init_test_tracing();
    let harness = JournalHarness::new(Arc::new(Applier::new(ProjectionStores::new())));

    let err = harness
        .when(helpers::campaign_created("camp-1", "Nowhere"))
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Unavailable);
}

#[tokio::test]
async fn unknown_core_event_types_are_ignored() {
    let (projections, harness) = setup();
    harness
        .given([
            helpers::campaign_created("camp-1", "Quiet"),
            helpers::event("camp-1", "story.note_added", &json!({ "text": "rain" })),
        ])
        .await
        .unwrap();
    assert!(projections.campaign("camp-1").is_some());
}

#[tokio::test]
async fn system_events_route_to_the_registered_adapter() {
    let (_, dh_store, harness) = setup_with_daggerheart();
    harness
        .given([
            helpers::campaign_created("camp-1", "Daggers"),
            helpers::character_created("camp-1", "char-1", "Marlowe"),
            helpers::system_event(
                "camp-1",
                "GAME_SYSTEM_DAGGERHEART",
                "1.0.0",
                "daggerheart.character_profile_set",
                &json!({ "character_id": "char-1", "hp_max": 7 }),
            ),
            helpers::system_event(
                "camp-1",
                SYSTEM_ID,
                "",
                "daggerheart.character_state_patched",
                &json!({ "character_id": "char-1", "hp_after": 4 }),
            ),
        ])
        .await
        .unwrap();

    let state = dh_store.character_state("camp-1", "char-1").unwrap();
    assert_eq!(state.hp_max, 7);
    assert_eq!(state.hp, 4);
}

#[tokio::test]
async fn unregistered_system_version_is_not_found() {
    let (_, _, harness) = setup_with_daggerheart();
    let err = harness
        .when(helpers::system_event(
            "camp-1",
            SYSTEM_ID,
            "9.9.9",
            "daggerheart.gm_fear_changed",
            &json!({ "after": 1 }),
        ))
        .await
        .unwrap_err();
    assert!(err.is_not_found());
}
