//! Content hashes, chain hashes and signatures for journal events.
//!
//! The event store computes these when it appends an event:
//!
//! - `hash` = BLAKE3 over a length-prefixed encoding of the event content and its `seq`
//! - `chain_hash` = BLAKE3 over `prev_hash || hash` (raw digest bytes)
//! - `signature` = BLAKE3 keyed hash of `chain_hash` under the key named by
//!   `signature_key_id`
//!
//! All digests travel as lowercase hex. Verification recomputes all three and
//! compares digests in constant time.

use std::collections::HashMap;
use std::fmt;

use crate::event::Event;
use crate::event_store::EventStoreError;

/// Length of a digest in bytes.
pub const DIGEST_LEN: usize = blake3::OUT_LEN;

/// A named signing key.
#[derive(Clone)]
pub struct SigningKey {
    key_id: String,
    key: [u8; 32],
}

impl SigningKey {
    /// Creates a signing key.
    #[must_use]
    pub fn new(key_id: impl Into<String>, key: [u8; 32]) -> Self {
        Self {
            key_id: key_id.into(),
            key,
        }
    }

    /// Derives a key from a passphrase. Intended for local development.
    #[must_use]
    pub fn derive(key_id: impl Into<String>, passphrase: &str) -> Self {
        Self::new(
            key_id,
            blake3::derive_key("campaign-journal event signing v1", passphrase.as_bytes()),
        )
    }

    /// Identifier recorded as `signature_key_id`.
    #[must_use]
    pub fn key_id(&self) -> &str {
        &self.key_id
    }

    /// Signs a chain hash (hex) and returns the signature (hex).
    ///
    /// # Errors
    ///
    /// Returns [`EventStoreError::Corrupted`] if `chain_hash` is not a hex digest.
    pub fn sign(&self, chain_hash: &str) -> Result<String, EventStoreError> {
        let digest = parse_digest("chain_hash", chain_hash)?;
        Ok(blake3::keyed_hash(&self.key, digest.as_bytes()).to_hex().to_string())
    }

    fn verify(&self, chain_hash: &blake3::Hash, signature: &blake3::Hash) -> bool {
        blake3::keyed_hash(&self.key, chain_hash.as_bytes()) == *signature
    }
}

impl fmt::Debug for SigningKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SigningKey")
            .field("key_id", &self.key_id)
            .field("key", &"<redacted>")
            .finish()
    }
}

/// Keys accepted when verifying signatures, by key id.
#[derive(Clone, Debug, Default)]
pub struct Keyring {
    keys: HashMap<String, SigningKey>,
}

impl Keyring {
    /// Creates an empty keyring.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a key, replacing any key with the same id.
    #[must_use]
    pub fn with_key(mut self, key: SigningKey) -> Self {
        self.keys.insert(key.key_id.clone(), key);
        self
    }

    /// Looks up a key by id.
    #[must_use]
    pub fn get(&self, key_id: &str) -> Option<&SigningKey> {
        self.keys.get(key_id)
    }
}

/// Computes the content hash of an event.
///
/// Covers every field except the integrity fields being computed. Each field
/// is framed by its byte length so adjacent fields cannot bleed into each other.
#[must_use]
pub fn content_hash(event: &Event) -> String {
    let mut hasher = blake3::Hasher::new();
    // Seconds then subsecond nanos, so no representable instant collapses to zero.
    let timestamp: Vec<u8> = event.timestamp.map_or_else(Vec::new, |ts| {
        let mut bytes = ts.timestamp().to_le_bytes().to_vec();
        bytes.extend_from_slice(&ts.timestamp_subsec_nanos().to_le_bytes());
        bytes
    });

    let fields: [&[u8]; 14] = [
        event.campaign_id.as_bytes(),
        &timestamp,
        event.event_type.as_bytes(),
        event.session_id.as_bytes(),
        event.request_id.as_bytes(),
        event.invocation_id.as_bytes(),
        event.actor_type.as_bytes(),
        event.actor_id.as_bytes(),
        event.entity_type.as_bytes(),
        event.entity_id.as_bytes(),
        event.system_id.as_bytes(),
        event.system_version.as_bytes(),
        &event.payload_json,
        &event.seq.to_le_bytes(),
    ];
    for field in fields {
        hasher.update(&(field.len() as u64).to_le_bytes());
        hasher.update(field);
    }
    hasher.finalize().to_hex().to_string()
}

/// Computes the chain hash linking `hash` to `prev_hash`.
///
/// An empty `prev_hash` marks the first event of a campaign.
///
/// # Errors
///
/// Returns [`EventStoreError::Corrupted`] if either input is not a hex digest.
pub fn chain_hash(prev_hash: &str, hash: &str) -> Result<String, EventStoreError> {
    let mut hasher = blake3::Hasher::new();
    if !prev_hash.is_empty() {
        hasher.update(parse_digest("prev_hash", prev_hash)?.as_bytes());
    }
    hasher.update(parse_digest("hash", hash)?.as_bytes());
    Ok(hasher.finalize().to_hex().to_string())
}

/// Fills `hash`, `prev_hash`, `chain_hash`, `signature_key_id` and
/// `signature` on an event whose `seq` was just assigned.
///
/// # Errors
///
/// Returns [`EventStoreError::Corrupted`] if `prev_chain_hash` is not a hex digest.
pub fn seal(event: &mut Event, prev_chain_hash: &str, key: &SigningKey) -> Result<(), EventStoreError> {
    event.hash = content_hash(event);
    event.prev_hash = prev_chain_hash.to_string();
    event.chain_hash = chain_hash(&event.prev_hash, &event.hash)?;
    event.signature_key_id = key.key_id().to_string();
    event.signature = key.sign(&event.chain_hash)?;
    Ok(())
}

/// Verifies one event against the chain hash of its predecessor.
///
/// # Errors
///
/// - [`EventStoreError::ChainBroken`] if `prev_hash` does not link to `expected_prev`
/// - [`EventStoreError::HashMismatch`] if the content or chain hash was altered
/// - [`EventStoreError::UnknownSigningKey`] if the key id is not in `keyring`
/// - [`EventStoreError::SignatureInvalid`] if the signature does not verify
pub fn verify_event(event: &Event, expected_prev: &str, keyring: &Keyring) -> Result<(), EventStoreError> {
    if event.prev_hash != expected_prev {
        return Err(EventStoreError::ChainBroken {
            seq: event.seq,
            expected: expected_prev.to_string(),
            actual: event.prev_hash.clone(),
        });
    }

    let hash = content_hash(event);
    if !digests_equal(&hash, &event.hash) {
        return Err(EventStoreError::HashMismatch {
            seq: event.seq,
            field: "hash",
        });
    }

    let chain = chain_hash(&event.prev_hash, &event.hash)?;
    if !digests_equal(&chain, &event.chain_hash) {
        return Err(EventStoreError::HashMismatch {
            seq: event.seq,
            field: "chain_hash",
        });
    }

    let key = keyring
        .get(&event.signature_key_id)
        .ok_or_else(|| EventStoreError::UnknownSigningKey(event.signature_key_id.clone()))?;
    let chain = parse_digest("chain_hash", &event.chain_hash)?;
    let signature = parse_digest("signature", &event.signature)?;
    if !key.verify(&chain, &signature) {
        return Err(EventStoreError::SignatureInvalid { seq: event.seq });
    }
    Ok(())
}

/// Verifies a campaign's events in order, starting from the first event.
///
/// Sequence numbers must start at 1 and increase by one.
///
/// # Errors
///
/// Returns the first [`EventStoreError`] found; see [`verify_event`].
pub fn verify_chain<'a>(
    events: impl IntoIterator<Item = &'a Event>,
    keyring: &Keyring,
) -> Result<(), EventStoreError> {
    let mut prev = String::new();
    let mut expected_seq = 1;
    for event in events {
        if event.seq != expected_seq {
            return Err(EventStoreError::SequenceGap {
                expected: expected_seq,
                actual: event.seq,
            });
        }
        verify_event(event, &prev, keyring)?;
        prev.clone_from(&event.chain_hash);
        expected_seq += 1;
    }
    Ok(())
}

fn parse_digest(field: &'static str, hex: &str) -> Result<blake3::Hash, EventStoreError> {
    blake3::Hash::from_hex(hex)
        .map_err(|e| EventStoreError::Corrupted(format!("{field} is not a digest: {e}")))
}

// `blake3::Hash` equality is constant time.
fn digests_equal(a: &str, b: &str) -> bool {
    match (blake3::Hash::from_hex(a), blake3::Hash::from_hex(b)) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}
