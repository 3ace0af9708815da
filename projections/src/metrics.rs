//! Metrics emitted by the applier and the replay engine.
//!
//! Uses the `metrics` facade; installing an exporter (Prometheus or
//! otherwise) is left to the host process. Without a recorder every call is
//! a no-op.

use metrics::{counter, describe_counter, describe_histogram, histogram};
use std::time::Duration;

/// Events applied by the projection applier, labelled by domain.
pub const EVENTS_APPLIED: &str = "journal_events_applied_total";
/// Events visited by replay (applied or filtered).
pub const REPLAY_EVENTS: &str = "journal_replay_events_total";
/// Wall time of one replay invocation.
pub const REPLAY_DURATION: &str = "journal_replay_duration_seconds";
/// Replays that stopped on an error.
pub const REPLAY_FAILURES: &str = "journal_replay_failures_total";

/// Register all metric descriptions.
///
/// Call once after installing a recorder.
pub fn describe_metrics() {
    describe_counter!(
        EVENTS_APPLIED,
        "Total number of journal events applied to projections"
    );
    describe_counter!(
        REPLAY_EVENTS,
        "Total number of journal events visited during replay"
    );
    describe_histogram!(REPLAY_DURATION, "Time taken to replay a campaign");
    describe_counter!(
        REPLAY_FAILURES,
        "Total number of replays that stopped on an error"
    );
}

/// Applier metrics recorder.
pub struct ApplierMetrics;

impl ApplierMetrics {
    /// Record an applied event.
    pub fn record_applied(domain: &str) {
        counter!(EVENTS_APPLIED, "domain" => domain.to_string()).increment(1);
    }
}

/// Replay metrics recorder.
pub struct ReplayMetrics;

impl ReplayMetrics {
    /// Record a finished replay.
    pub fn record_replay(visited: u64, duration: Duration) {
        counter!(REPLAY_EVENTS).increment(visited);
        histogram!(REPLAY_DURATION).record(duration.as_secs_f64());
    }

    /// Record a replay that stopped on an error.
    pub fn record_failure(duration: Duration) {
        counter!(REPLAY_FAILURES).increment(1);
        histogram!(REPLAY_DURATION).record(duration.as_secs_f64());
    }
}
