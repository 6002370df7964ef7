use chrono_tz::Tz;

use crate::error::{SupError, SupResult};
use crate::model::ChannelConfig;

/// Validates that a string is not blank (empty or whitespace-only).
/// Returns the trimmed string on success.
pub fn non_blank(value: &str, field: &str) -> SupResult<String> {
    let trimmed = value.trim().to_string();
    if trimmed.is_empty() {
        Err(SupError::BlankField {
            field: field.to_string(),
        })
    } else {
        Ok(trimmed)
    }
}

/// Validates that an integer is at least `min`.
pub fn at_least(value: i64, min: i64, field: &str) -> SupResult<i64> {
    if value < min {
        Err(SupError::TooSmall {
            field: field.to_string(),
            min,
            value,
        })
    } else {
        Ok(value)
    }
}

/// Resolves an IANA time zone name.
pub fn time_zone(name: &str) -> SupResult<Tz> {
    name.trim()
        .parse::<Tz>()
        .map_err(|_| SupError::UnknownTimeZone(name.to_string()))
}

/// Checks the invariants a channel config must hold before a round runs.
pub fn validate_config(config: &ChannelConfig) -> SupResult<()> {
    at_least(config.group_size as i64, 2, "group_size")?;
    at_least(config.recency_weeks as i64, 1, "recency_weeks")?;
    at_least(config.every_n_weeks as i64, 1, "every_n_weeks")?;
    Ok(())
}
