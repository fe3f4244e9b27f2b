//! Onboarding and settings validation.

use chrono::{Months, NaiveDate};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProfileValidationError {
    #[error("Please tell us your name.")]
    MissingName,

    #[error("Please choose a date in the past.")]
    BirthDateInFuture,
}

pub const PAST_FIRST_YEAR_NOTICE: &str = "This guidance is designed for the first twelve months. \
    You're past that window now, but you're welcome to use the app for grounding.";

pub fn validate_name(name: &str) -> Result<String, ProfileValidationError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(ProfileValidationError::MissingName);
    }
    Ok(name.to_string())
}

/// Rejects future dates. A date more than a year back is accepted with a notice.
pub fn validate_birth_date(
    birth_date: NaiveDate,
    today: NaiveDate,
) -> Result<Option<&'static str>, ProfileValidationError> {
    if birth_date > today {
        return Err(ProfileValidationError::BirthDateInFuture);
    }
    let one_year_ago = today.checked_sub_months(Months::new(12));
    match one_year_ago {
        Some(cutoff) if birth_date < cutoff => Ok(Some(PAST_FIRST_YEAR_NOTICE)),
        _ => Ok(None),
    }
}

/// Trims tags, drops blanks and case-insensitive duplicates, keeps order.
pub fn normalize_preferences(tags: Vec<String>) -> Vec<String> {
    let mut kept: Vec<String> = Vec::new();
    for tag in tags {
        let tag = tag.trim();
        if tag.is_empty() || kept.iter().any(|k| k.eq_ignore_ascii_case(tag)) {
            continue;
        }
        kept.push(tag.to_string());
    }
    kept
}
