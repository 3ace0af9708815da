//! Projection applier, system adapter registry and replay engine for the
//! campaign journal.
//!
//! # Overview
//!
//! This crate turns journal events into projection state:
//! - **[`Applier`]**: one handler per core event type, plus routing of
//!   game-system events to their adapter
//! - **[`AdapterRegistry`]**: `(game system, version)` → [`SystemAdapter`]
//! - **Replay**: [`replay_campaign`], [`replay_campaign_with`],
//!   [`replay_snapshot`] and [`resume_campaign`]
//!
//! # Online vs. Replay
//!
//! The same applier serves both paths:
//!
//! ```text
//! append ─▶ EventStore ─▶ Applier::apply          (online, one event)
//!           EventStore ─▶ replay_campaign ─▶ Applier::apply   (rebuild, paged)
//! ```
//!
//! Counters are not idempotent, so a full replay must start from empty
//! projection stores.
//!
//! # Example
//!
//! ```ignore
//! use campaign_journal_projections::{AdapterRegistry, Applier, replay_campaign};
//!
//! let mut registry = AdapterRegistry::new();
//! registry.register(Arc::new(DaggerheartAdapter::new(dh_store)?))?;
//!
//! let applier = Applier::new(stores).with_adapters(Arc::new(registry));
//! let last_seq = replay_campaign(&event_store, &applier, "camp-1").await?;
//! ```
//!
//! [`SystemAdapter`]: campaign_journal_core::system::SystemAdapter

pub mod applier;
pub mod metrics;
pub mod patch;
pub mod payloads;
pub mod registry;
pub mod replay;
pub mod status;

// Re-export main types for convenience
pub use applier::Applier;
pub use registry::AdapterRegistry;
pub use replay::{
    EventFilter, ReplayConfig, ReplayOptions, replay_campaign, replay_campaign_with,
    replay_snapshot, resume_campaign, resume_campaign_with,
};
