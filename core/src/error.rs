//! Error taxonomy shared by the normalizer, applier, adapters and replay engine.
//!
//! Every error carries an [`ErrorKind`] so the API boundary can map it to a
//! status code without string matching, and the structured variants keep the
//! rejected values (status labels, claimed users) as fields for diagnostics.

use thiserror::Error;

/// Coarse classification of a [`JournalError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Malformed or missing required fields, bad enum labels, wrong payload types.
    InvalidInput,
    /// Missing projection record or adapter.
    NotFound,
    /// Disallowed status change or seat-claim mismatch.
    InvalidStateTransition,
    /// A required dependency or store is not configured.
    Unavailable,
    /// The caller canceled the operation.
    Canceled,
    /// Unexpected decode or storage failure.
    Unknown,
}

/// Errors produced by the campaign journal core.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum JournalError {
    /// Malformed or missing input.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// A numeric value fell outside its declared bound.
    #[error("{field} = {value} is outside the allowed range {min}..={max}")]
    OutOfRange {
        /// Name of the bounded field.
        field: String,
        /// Rejected value.
        value: i64,
        /// Inclusive lower bound.
        min: i64,
        /// Inclusive upper bound.
        max: i64,
    },

    /// A record or adapter does not exist.
    #[error("{entity} not found: {id}")]
    NotFound {
        /// Kind of record that was looked up.
        entity: &'static str,
        /// Identifier that was looked up.
        id: String,
    },

    /// The campaign status state machine rejected a transition.
    #[error("invalid campaign status transition: {from} -> {to}")]
    InvalidCampaignStatusTransition {
        /// Current status label.
        from: String,
        /// Requested status label.
        to: String,
    },

    /// A seat command named a prior user that does not hold the seat.
    #[error("participant {participant_id} is bound to '{actual}', expected '{expected}'")]
    ClaimMismatch {
        /// Seat being changed.
        participant_id: String,
        /// User the command expected to hold the seat.
        expected: String,
        /// User that currently holds the seat.
        actual: String,
    },

    /// A user already claims another seat in the campaign.
    #[error("user {user_id} already claims participant {participant_id}")]
    ClaimConflict {
        /// User holding the claim.
        user_id: String,
        /// Seat already claimed by that user.
        participant_id: String,
    },

    /// Generic disallowed state change.
    #[error("invalid state transition: {0}")]
    InvalidStateTransition(String),

    /// A required dependency is not configured.
    #[error("{0} is not configured")]
    Unavailable(String),

    /// The operation was canceled after applying events up to `last_seq`.
    #[error("canceled after seq {last_seq}")]
    Canceled {
        /// Last sequence applied before cancellation.
        last_seq: u64,
    },

    /// Unexpected failure.
    #[error("unknown error: {0}")]
    Unknown(String),
}

impl JournalError {
    /// Creates an [`JournalError::InvalidInput`] error.
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    /// Creates a [`JournalError::NotFound`] error.
    pub fn not_found(entity: &'static str, id: impl Into<String>) -> Self {
        Self::NotFound {
            entity,
            id: id.into(),
        }
    }

    /// Creates a [`JournalError::Unavailable`] error naming the missing dependency.
    pub fn unavailable(dependency: impl Into<String>) -> Self {
        Self::Unavailable(dependency.into())
    }

    /// Creates a [`JournalError::Unknown`] error.
    pub fn unknown(msg: impl Into<String>) -> Self {
        Self::Unknown(msg.into())
    }

    /// Classifies this error.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidInput(_) | Self::OutOfRange { .. } => ErrorKind::InvalidInput,
            Self::NotFound { .. } => ErrorKind::NotFound,
            Self::InvalidCampaignStatusTransition { .. }
            | Self::ClaimMismatch { .. }
            | Self::ClaimConflict { .. }
            | Self::InvalidStateTransition(_) => ErrorKind::InvalidStateTransition,
            Self::Unavailable(_) => ErrorKind::Unavailable,
            Self::Canceled { .. } => ErrorKind::Canceled,
            Self::Unknown(_) => ErrorKind::Unknown,
        }
    }

    /// Returns `true` when this is a "record missing" error.
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

impl From<serde_json::Error> for JournalError {
    fn from(err: serde_json::Error) -> Self {
        // Malformed or truncated payloads are caller mistakes; only I/O is not.
        match err.classify() {
            serde_json::error::Category::Io => Self::Unknown(format!("decode payload: {err}")),
            serde_json::error::Category::Data
            | serde_json::error::Category::Syntax
            | serde_json::error::Category::Eof => {
                Self::InvalidInput(format!("decode payload: {err}"))
            }
        }
    }
}

/// Result alias used across the journal crates.
pub type Result<T> = std::result::Result<T, JournalError>;
