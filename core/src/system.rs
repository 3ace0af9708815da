//! Extension seam for game-system-specific state.
//!
//! A game system (a rules engine for one TTRPG) owns its own event types and
//! projections. The core routes an event to an adapter only when it does not
//! recognize the event type and the event names a `system_id`; it never
//! interprets system-specific types itself.

use std::fmt;

use crate::event::Event;
use crate::labels::GameSystemId;
use crate::store::StoreFuture;

/// Registry key of an adapter: canonical system id plus version.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AdapterKey {
    /// Canonical game system.
    pub system: GameSystemId,
    /// System version (e.g. `1.0.0`).
    pub version: String,
}

impl AdapterKey {
    /// Creates a key.
    #[must_use]
    pub fn new(system: GameSystemId, version: impl Into<String>) -> Self {
        Self {
            system,
            version: version.into().trim().to_string(),
        }
    }
}

impl fmt::Display for AdapterKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.system, self.version)
    }
}

/// A pluggable handler owning events and projections for one system version.
pub trait SystemAdapter: Send + Sync {
    /// Game system this adapter serves.
    fn id(&self) -> GameSystemId;

    /// System version this adapter serves.
    fn version(&self) -> &str;

    /// Applies a system-owned event to the adapter's projections.
    ///
    /// Adapters must validate values against their declared bounds and fail
    /// rather than clamp, so corrupted history surfaces during replay.
    ///
    /// # Errors
    ///
    /// Returns a [`JournalError`](crate::error::JournalError) on invalid
    /// payloads, out-of-range values or storage failures.
    fn apply_event<'a>(&'a self, event: &'a Event) -> StoreFuture<'a, ()>;

    /// Registry key of this adapter.
    fn key(&self) -> AdapterKey {
        AdapterKey::new(self.id(), self.version())
    }
}
