//! Declared bounds of Daggerheart resources.
//!
//! Values outside their bound are rejected with
//! [`JournalError::OutOfRange`], never clamped, so a corrupted event fails
//! replay instead of being silently repaired.

use campaign_journal_core::error::JournalError;

/// Highest Hope a character can hold.
pub const HOPE_MAX: i64 = 6;
/// Highest Fear the GM can hold.
pub const FEAR_MAX: i64 = 12;
/// Cap on any configurable maximum (hp, stress, armor).
pub const RESOURCE_CAP: i64 = 12;

/// Default hit-point maximum.
pub const DEFAULT_HP_MAX: i64 = 6;
/// Default stress maximum.
pub const DEFAULT_STRESS_MAX: i64 = 6;
/// Default armor maximum.
pub const DEFAULT_ARMOR_MAX: i64 = 0;
/// Hope a character starts with.
pub const STARTING_HOPE: i64 = 2;

/// Checks `min <= value <= max`.
///
/// # Errors
///
/// Returns [`JournalError::OutOfRange`] naming the field and bounds.
pub fn check(field: &str, value: i64, min: i64, max: i64) -> Result<i64, JournalError> {
    if (min..=max).contains(&value) {
        Ok(value)
    } else {
        Err(JournalError::OutOfRange {
            field: field.to_string(),
            value,
            min,
            max,
        })
    }
}

/// Checks a configurable maximum, applying `default` when absent.
///
/// # Errors
///
/// Returns [`JournalError::OutOfRange`] if the maximum is below `min` or
/// above [`RESOURCE_CAP`].
pub fn maximum(field: &str, value: Option<i64>, default: i64, min: i64) -> Result<i64, JournalError> {
    check(field, value.unwrap_or(default), min, RESOURCE_CAP)
}
