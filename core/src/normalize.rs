//! Pre-append validation and defaulting.
//!
//! [`normalize_for_append`] is the gate every event passes before it reaches
//! the event store. It is a pure function of its input: it trims identifiers,
//! fills defaults and rejects anything the store alone is allowed to set.

use chrono::Utc;
use serde::de::{DeserializeOwned, IgnoredAny};

use crate::error::JournalError;
use crate::event::Event;

/// Payload used when the caller supplied none.
pub const EMPTY_PAYLOAD: &[u8] = b"{}";

/// Validates and defaults an event for append.
///
/// - trims `campaign_id` and `event_type` and rejects them when empty
/// - rejects any caller-supplied `seq`, `hash`, `prev_hash`, `chain_hash`,
///   `signature_key_id` or `signature`
/// - defaults the actor type to `system` and requires an actor id for
///   `participant` and `gm`
/// - trims the correlation ids and the entity reference
/// - defaults the timestamp to now (UTC) and the payload to `{}`, and
///   rejects payloads that are not valid JSON
///
/// # Errors
///
/// Returns [`JournalError::InvalidInput`] describing the first violation.
pub fn normalize_for_append(mut event: Event) -> Result<Event, JournalError> {
    event.campaign_id = event.campaign_id.trim().to_string();
    if event.campaign_id.is_empty() {
        return Err(JournalError::invalid_input("campaign id is required"));
    }

    reject_storage_fields(&event)?;

    event.event_type = event.event_type.trim().to_string();
    if event.event_type.is_empty() {
        return Err(JournalError::invalid_input("event type is required"));
    }

    let actor = event.actor()?;
    event.actor_type = actor.as_str().to_string();
    event.actor_id = event.actor_id.trim().to_string();
    if actor.requires_actor_id() && event.actor_id.is_empty() {
        return Err(JournalError::invalid_input(format!(
            "actor id is required for {actor} actors"
        )));
    }

    event.session_id = event.session_id.trim().to_string();
    event.request_id = event.request_id.trim().to_string();
    event.invocation_id = event.invocation_id.trim().to_string();
    event.entity_type = event.entity_type.trim().to_string();
    event.entity_id = event.entity_id.trim().to_string();
    event.system_id = event.system_id.trim().to_string();
    event.system_version = event.system_version.trim().to_string();

    if event.timestamp.is_none() {
        event.timestamp = Some(Utc::now());
    }

    if event.payload_json.iter().all(u8::is_ascii_whitespace) {
        event.payload_json = EMPTY_PAYLOAD.to_vec();
    } else if let Err(e) = serde_json::from_slice::<IgnoredAny>(&event.payload_json) {
        return Err(JournalError::invalid_input(format!(
            "payload must be valid JSON: {e}"
        )));
    }

    Ok(event)
}

fn reject_storage_fields(event: &Event) -> Result<(), JournalError> {
    let supplied = [
        ("seq", event.seq != 0),
        ("hash", !event.hash.is_empty()),
        ("prev_hash", !event.prev_hash.is_empty()),
        ("chain_hash", !event.chain_hash.is_empty()),
        ("signature_key_id", !event.signature_key_id.is_empty()),
        ("signature", !event.signature.is_empty()),
    ];
    match supplied.iter().find(|(_, set)| *set) {
        Some((field, _)) => Err(JournalError::invalid_input(format!(
            "{field} is assigned by the event store and must not be supplied"
        ))),
        None => Ok(()),
    }
}

/// Trimmed, non-empty campaign id of a stored event.
///
/// # Errors
///
/// Returns [`JournalError::InvalidInput`] if the id is blank.
pub fn required_campaign_id(event: &Event) -> Result<&str, JournalError> {
    let id = event.campaign_id.trim();
    if id.is_empty() {
        return Err(JournalError::invalid_input("campaign id is required"));
    }
    Ok(id)
}

/// Id carried in the payload, falling back to the event's `entity_id`.
///
/// # Errors
///
/// Returns [`JournalError::InvalidInput`] naming `what` if both are blank.
pub fn payload_or_entity_id(
    from_payload: &str,
    event: &Event,
    what: &str,
) -> Result<String, JournalError> {
    let id = match from_payload.trim() {
        "" => event.entity_id.trim(),
        id => id,
    };
    if id.is_empty() {
        return Err(JournalError::invalid_input(format!("{what} id is required")));
    }
    Ok(id.to_string())
}

/// Decodes an event payload into `T`.
///
/// A blank payload reads as `{}`. Anything other than a JSON object is
/// rejected, so a struct is never filled by field position from an array.
///
/// # Errors
///
/// Returns [`JournalError::InvalidInput`] for non-object or malformed
/// payloads and for payloads that do not match `T`.
pub fn decode_payload<T: DeserializeOwned>(event: &Event) -> Result<T, JournalError> {
    let payload = match event.payload_json.iter().position(|b| !b.is_ascii_whitespace()) {
        None => EMPTY_PAYLOAD,
        Some(start) if event.payload_json[start] == b'{' => event.payload_json.as_slice(),
        Some(_) => {
            return Err(JournalError::invalid_input(format!(
                "{} payload must be a JSON object",
                event.event_type
            )));
        }
    };
    serde_json::from_slice(payload).map_err(JournalError::from)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::event::ActorType;
    use proptest::prelude::*;

    fn base() -> Event {
        Event::new("  camp-1  ", " campaign.created ")
    }

    #[test]
    fn trims_and_defaults() {
        let event = normalize_for_append(base()).unwrap();
        assert_eq!(event.campaign_id, "camp-1");
        assert_eq!(event.event_type, "campaign.created");
        assert_eq!(event.actor_type, "system");
        assert_eq!(event.payload_json, b"{}");
        assert!(event.timestamp.is_some());
    }

    #[test]
    fn empty_campaign_is_rejected() {
        let err = normalize_for_append(Event::new("   ", "campaign.created")).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidInput);
    }

    #[test]
    fn empty_type_is_rejected() {
        let err = normalize_for_append(Event::new("camp-1", "  ")).unwrap_err();
        assert!(format!("{err}").contains("event type"));
    }

    #[test]
    fn each_storage_field_is_rejected() {
        let forged: [fn(&mut Event); 6] = [
            |e| e.seq = 7,
            |e| e.hash = "h".into(),
            |e| e.prev_hash = "p".into(),
            |e| e.chain_hash = "c".into(),
            |e| e.signature_key_id = "k".into(),
            |e| e.signature = "s".into(),
        ];
        for forge in forged {
            let mut event = base();
            forge(&mut event);
            let err = normalize_for_append(event).unwrap_err();
            assert!(format!("{err}").contains("assigned by the event store"));
        }
    }

    #[test]
    fn participant_actor_requires_id() {
        let event = base().with_actor(ActorType::Participant, "  ");
        assert!(normalize_for_append(event).is_err());

        let event = base().with_actor(ActorType::Gm, "gm-1");
        let event = normalize_for_append(event).unwrap();
        assert_eq!(event.actor_type, "gm");
        assert_eq!(event.actor_id, "gm-1");
    }

    #[test]
    fn unknown_actor_is_rejected() {
        let mut event = base();
        event.actor_type = "admin".into();
        assert_eq!(
            normalize_for_append(event).unwrap_err().kind(),
            ErrorKind::InvalidInput
        );
    }

    #[test]
    fn malformed_payload_is_rejected() {
        let mut event = base();
        event.payload_json = b"{\"name\":".to_vec();
        let err = normalize_for_append(event).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidInput);
    }

    #[test]
    fn supplied_timestamp_is_kept() {
        let ts = chrono::DateTime::parse_from_rfc3339("2025-01-01T00:00:00Z")
            .unwrap()
            .with_timezone(&Utc);
        let event = normalize_for_append(base().with_timestamp(ts)).unwrap();
        assert_eq!(event.timestamp, Some(ts));
    }

    #[derive(Debug, serde::Deserialize)]
    struct Named {
        name: String,
    }

    fn stored(payload: &str) -> Event {
        let mut event = Event::new("camp-1", "campaign.created").with_entity("campaign", "camp-1");
        event.payload_json = payload.as_bytes().to_vec();
        event
    }

    #[test]
    fn decode_reads_objects_and_blank_payloads() {
        let named: Named = decode_payload(&stored(r#" {"name":"Arr"}"#)).unwrap();
        assert_eq!(named.name, "Arr");

        let empty: std::collections::HashMap<String, String> = decode_payload(&stored("  ")).unwrap();
        assert!(empty.is_empty());
    }

    #[test]
    fn decode_rejects_non_object_payloads() {
        for payload in [r#"["Arr"]"#, "\"Arr\"", "7", "null"] {
            let err = decode_payload::<Named>(&stored(payload)).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::InvalidInput, "payload: {payload}");
        }
    }

    #[test]
    fn decode_reports_truncated_payloads_as_invalid_input() {
        let err = decode_payload::<Named>(&stored(r#"{"name":"#)).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidInput);
    }

    #[test]
    fn ids_fall_back_to_the_entity() {
        let event = stored("{}");
        assert_eq!(required_campaign_id(&event).unwrap(), "camp-1");
        assert_eq!(payload_or_entity_id("  ", &event, "campaign").unwrap(), "camp-1");
        assert_eq!(payload_or_entity_id(" own ", &event, "campaign").unwrap(), "own");

        let bare = Event::new("camp-1", "character.deleted");
        let err = payload_or_entity_id("", &bare, "character").unwrap_err();
        assert!(format!("{err}").contains("character id is required"));
    }

    fn actor_strategy() -> impl Strategy<Value = ActorType> {
        prop_oneof![
            Just(ActorType::System),
            Just(ActorType::Participant),
            Just(ActorType::Gm),
        ]
    }

    proptest! {
        #[test]
        fn normalized_events_never_carry_storage_fields(
            campaign in "[a-z0-9-]{1,12}",
            kind in "[a-z]{1,8}\\.[a-z_]{1,10}",
            payload in prop::option::of("[a-z]{0,6}"),
        ) {
            let mut event = Event::new(campaign, kind);
            if let Some(name) = payload {
                event = event.with_payload(&serde_json::json!({ "name": name })).unwrap();
            }
            let normalized = normalize_for_append(event).unwrap();
            prop_assert!(!normalized.has_storage_fields());
            prop_assert!(serde_json::from_slice::<serde_json::Value>(&normalized.payload_json).is_ok());
        }

        #[test]
        fn attributed_actor_fails_iff_id_empty(
            actor in actor_strategy(),
            id in prop_oneof![Just(String::new()), Just("  ".to_string()), "[a-z]{1,6}"],
        ) {
            let event = Event::new("camp-1", "campaign.updated").with_actor(actor, id.clone());
            let result = normalize_for_append(event);
            let expect_failure = actor.requires_actor_id() && id.trim().is_empty();
            prop_assert_eq!(result.is_err(), expect_failure);
        }

        #[test]
        fn any_nonzero_seq_is_rejected(seq in 1u64..) {
            let mut event = Event::new("camp-1", "campaign.created");
            event.seq = seq;
            prop_assert!(normalize_for_append(event).is_err());
        }
    }
}
