//! System adapter registry.
//!
//! Populated once at process start and then shared read-only with the
//! applier (`Arc<AdapterRegistry>`); there is no global registry.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use campaign_journal_core::error::JournalError;
use campaign_journal_core::labels::GameSystemId;
use campaign_journal_core::system::{AdapterKey, SystemAdapter};

/// Maps `(game system, version)` to the adapter owning that system's events.
///
/// The first version registered for a system becomes its default, which an
/// empty version resolves to.
#[derive(Default)]
pub struct AdapterRegistry {
    adapters: BTreeMap<AdapterKey, Arc<dyn SystemAdapter>>,
    defaults: HashMap<GameSystemId, String>,
}

impl AdapterRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers an adapter under its own key.
    ///
    /// # Errors
    ///
    /// Returns [`JournalError::InvalidInput`] if the adapter reports an empty
    /// version or the key is already registered.
    pub fn register(&mut self, adapter: Arc<dyn SystemAdapter>) -> Result<(), JournalError> {
        let key = adapter.key();
        if key.version.is_empty() {
            return Err(JournalError::invalid_input(format!(
                "adapter for {} has an empty version",
                key.system
            )));
        }
        if self.adapters.contains_key(&key) {
            return Err(JournalError::invalid_input(format!(
                "adapter {key} is already registered"
            )));
        }
        self.defaults
            .entry(key.system.clone())
            .or_insert_with(|| key.version.clone());
        tracing::debug!(adapter = %key, "Registered system adapter");
        self.adapters.insert(key, adapter);
        Ok(())
    }

    /// Builder form of [`register`](Self::register).
    ///
    /// # Errors
    ///
    /// Same as [`register`](Self::register).
    pub fn with_adapter(mut self, adapter: Arc<dyn SystemAdapter>) -> Result<Self, JournalError> {
        self.register(adapter)?;
        Ok(self)
    }

    /// Looks up an adapter. An empty `version` selects the system's default.
    #[must_use]
    pub fn get(&self, system: &GameSystemId, version: &str) -> Option<Arc<dyn SystemAdapter>> {
        let version = version.trim();
        let version = if version.is_empty() {
            self.defaults.get(system)?.as_str()
        } else {
            version
        };
        self.adapters
            .get(&AdapterKey::new(system.clone(), version))
            .cloned()
    }

    /// Canonicalizes a raw system id and looks up its adapter.
    ///
    /// # Errors
    ///
    /// Returns [`JournalError::InvalidInput`] for an unparseable system id and
    /// [`JournalError::NotFound`] when no adapter is registered.
    pub fn resolve(&self, system_id: &str, version: &str) -> Result<Arc<dyn SystemAdapter>, JournalError> {
        let system = GameSystemId::parse(system_id)?;
        self.get(&system, version).ok_or_else(|| {
            let version = version.trim();
            let id = if version.is_empty() {
                system.to_string()
            } else {
                format!("{system}@{version}")
            };
            JournalError::not_found("system adapter", id)
        })
    }

    /// Registered keys in order.
    #[must_use]
    pub fn ids(&self) -> Vec<AdapterKey> {
        self.adapters.keys().cloned().collect()
    }

    /// Number of registered adapters.
    #[must_use]
    pub fn len(&self) -> usize {
        self.adapters.len()
    }

    /// Whether no adapter is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.adapters.is_empty()
    }
}

impl std::fmt::Debug for AdapterRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdapterRegistry")
            .field("adapters", &self.ids())
            .finish()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use campaign_journal_core::error::ErrorKind;
    use campaign_journal_core::event::Event;
    use campaign_journal_core::store::StoreFuture;

    struct NoopAdapter {
        system: &'static str,
        version: &'static str,
    }

    impl SystemAdapter for NoopAdapter {
        fn id(&self) -> GameSystemId {
            GameSystemId::parse(self.system).unwrap()
        }

        fn version(&self) -> &str {
            self.version
        }

        fn apply_event<'a>(&'a self, _event: &'a Event) -> StoreFuture<'a, ()> {
            Box::pin(async { Ok(()) })
        }
    }

    fn adapter(system: &'static str, version: &'static str) -> Arc<dyn SystemAdapter> {
        Arc::new(NoopAdapter { system, version })
    }

    #[test]
    fn resolves_canonicalized_system_ids() {
        let registry = AdapterRegistry::new()
            .with_adapter(adapter("daggerheart", "1.0.0"))
            .unwrap();

        for raw in ["DAGGERHEART", "GAME_SYSTEM_DAGGERHEART", " daggerheart "] {
            let found = registry.resolve(raw, "1.0.0").unwrap();
            assert_eq!(found.version(), "1.0.0");
        }
    }

    #[test]
    fn empty_version_uses_first_registered() {
        let registry = AdapterRegistry::new()
            .with_adapter(adapter("daggerheart", "1.0.0"))
            .unwrap()
            .with_adapter(adapter("daggerheart", "2.0.0"))
            .unwrap();

        assert_eq!(registry.resolve("daggerheart", "").unwrap().version(), "1.0.0");
        assert_eq!(registry.resolve("daggerheart", "2.0.0").unwrap().version(), "2.0.0");
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn duplicate_registration_is_rejected() {
        let mut registry = AdapterRegistry::new();
        registry.register(adapter("daggerheart", "1.0.0")).unwrap();
        let err = registry.register(adapter("DAGGERHEART", "1.0.0")).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidInput);
    }

    #[test]
    fn missing_adapter_is_not_found() {
        let registry = AdapterRegistry::new()
            .with_adapter(adapter("daggerheart", "1.0.0"))
            .unwrap();

        let err = registry.resolve("daggerheart", "9.9.9").err().unwrap();
        assert!(err.is_not_found());
        assert!(format!("{err}").contains("daggerheart@9.9.9"));

        let err = registry.resolve("other", "").err().unwrap();
        assert!(err.is_not_found());
    }

    #[test]
    fn unparseable_system_is_invalid_input() {
        let registry = AdapterRegistry::new();
        let err = registry.resolve("GAME_SYSTEM_UNSPECIFIED", "").err().unwrap();
        assert_eq!(err.kind(), ErrorKind::InvalidInput);
    }
}
