//! User field validation and normalization

use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;
use thiserror::Error;

use crate::domain::dates::{self, DateError};

/// Errors that can occur during user validation
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum UserValidationError {
    #[error("{0} cannot be empty")]
    EmptyField(&'static str),

    #[error("{0} must contain only alphabetic characters")]
    NonAlphabetic(&'static str),

    #[error("phone_number must contain exactly {0} digits")]
    PhoneDigitCount(usize),

    #[error("phone_number can only contain digits, '+', and '-'")]
    PhoneInvalidCharacters,

    #[error(transparent)]
    Date(#[from] DateError),

    #[error("user must be at least {0} years old")]
    Underage(u32),

    #[error("user id cannot be empty")]
    EmptyId,

    #[error("'{0}' is not a valid user id")]
    MalformedId(String),
}

pub const PHONE_DIGIT_COUNT: usize = 11;
pub const MINIMUM_AGE_YEARS: u32 = 14;

static NAME_CHARS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z\p{Cyrillic}\s]*$").expect("valid regex"));
static PHONE_CHARS: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[0-9+\-]*$").expect("valid regex"));

/// Validate a name component (first name, last name or patronymic) and
/// normalize it to title case. Latin and Cyrillic letters only.
pub fn validate_name(field: &'static str, value: &str) -> Result<String, UserValidationError> {
    let value = value.trim();

    if value.is_empty() {
        return Err(UserValidationError::EmptyField(field));
    }

    if !NAME_CHARS.is_match(value) {
        return Err(UserValidationError::NonAlphabetic(field));
    }

    Ok(title_case(value))
}

/// Validate a phone number. The stored form keeps the caller's separators;
/// use [`phone_digits`] for the normalized comparison key.
pub fn validate_phone_number(value: &str) -> Result<String, UserValidationError> {
    if value.trim().is_empty() {
        return Err(UserValidationError::EmptyField("phone_number"));
    }

    let digits = phone_digits(value);
    if digits.len() != PHONE_DIGIT_COUNT {
        return Err(UserValidationError::PhoneDigitCount(PHONE_DIGIT_COUNT));
    }

    if !PHONE_CHARS.is_match(value) {
        return Err(UserValidationError::PhoneInvalidCharacters);
    }

    Ok(value.to_string())
}

/// Strip everything but digits from a phone number
pub fn phone_digits(value: &str) -> String {
    value.chars().filter(char::is_ascii_digit).collect()
}

/// Parse and range-check a birth date (must not be after `today`)
pub fn validate_birth_date(value: &str, today: NaiveDate) -> Result<NaiveDate, UserValidationError> {
    Ok(dates::parse_date_not_in_future("birth_date", value, today)?)
}

/// Enforce the minimum age at creation time, month/day aware
pub fn check_minimum_age(
    birth_date: NaiveDate,
    today: NaiveDate,
) -> Result<(), UserValidationError> {
    use chrono::Datelike;

    let mut age = today.year() - birth_date.year();
    if (today.month(), today.day()) < (birth_date.month(), birth_date.day()) {
        age -= 1;
    }

    if age < MINIMUM_AGE_YEARS as i32 {
        return Err(UserValidationError::Underage(MINIMUM_AGE_YEARS));
    }

    Ok(())
}

fn title_case(value: &str) -> String {
    value
        .split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first
                    .to_uppercase()
                    .chain(chars.flat_map(char::to_lowercase))
                    .collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}
