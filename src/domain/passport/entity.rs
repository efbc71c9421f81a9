//! Passport entity and related types

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::validation::PassportValidationError;
use crate::domain::user::UserId;

/// Passport identifier, a generated UUID
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PassportId(Uuid);

impl PassportId {
    /// Generate a fresh identifier
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }

    /// Parse an identifier from its string form
    pub fn parse(value: &str) -> Result<Self, PassportValidationError> {
        let value = value.trim();

        if value.is_empty() {
            return Err(PassportValidationError::EmptyId);
        }

        Uuid::parse_str(value)
            .map(Self)
            .map_err(|_| PassportValidationError::MalformedId(value.to_string()))
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl From<Uuid> for PassportId {
    fn from(value: Uuid) -> Self {
        Self(value)
    }
}

impl std::fmt::Display for PassportId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Payload for creating a passport; the repository assigns the id.
/// All fields are expected to be validated/normalized already.
#[derive(Debug, Clone)]
pub struct NewPassport {
    pub passport_series: String,
    pub passport_number: String,
    pub birth_date: NaiveDate,
    pub receipt_date: NaiveDate,
    pub user_id: UserId,
}

/// Identity document record
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Passport {
    /// Unique identifier, assigned once at creation
    id: PassportId,
    /// 4 digits, first digit non-zero
    passport_series: String,
    /// 6 digits
    passport_number: String,
    birth_date: NaiveDate,
    /// Issue date; never precedes `birth_date`
    receipt_date: NaiveDate,
    /// Owning user, resolved via repository lookup
    user_id: UserId,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl Passport {
    /// Create a passport record from a validated payload
    pub fn new(id: PassportId, new_passport: NewPassport) -> Self {
        let now = Utc::now();

        Self {
            id,
            passport_series: new_passport.passport_series,
            passport_number: new_passport.passport_number,
            birth_date: new_passport.birth_date,
            receipt_date: new_passport.receipt_date,
            user_id: new_passport.user_id,
            created_at: now,
            updated_at: now,
        }
    }

    // Getters

    pub fn id(&self) -> &PassportId {
        &self.id
    }

    pub fn passport_series(&self) -> &str {
        &self.passport_series
    }

    pub fn passport_number(&self) -> &str {
        &self.passport_number
    }

    pub fn birth_date(&self) -> NaiveDate {
        self.birth_date
    }

    pub fn receipt_date(&self) -> NaiveDate {
        self.receipt_date
    }

    pub fn user_id(&self) -> &UserId {
        &self.user_id
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    // Mutators

    pub fn set_passport_series(&mut self, series: impl Into<String>) {
        self.passport_series = series.into();
        self.touch();
    }

    pub fn set_passport_number(&mut self, number: impl Into<String>) {
        self.passport_number = number.into();
        self.touch();
    }

    pub fn set_birth_date(&mut self, birth_date: NaiveDate) {
        self.birth_date = birth_date;
        self.touch();
    }

    pub fn set_receipt_date(&mut self, receipt_date: NaiveDate) {
        self.receipt_date = receipt_date;
        self.touch();
    }

    pub fn set_user_id(&mut self, user_id: UserId) {
        self.user_id = user_id;
        self.touch();
    }

    fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_passport() -> Passport {
        Passport::new(
            PassportId::generate(),
            NewPassport {
                passport_series: "4509".to_string(),
                passport_number: "123456".to_string(),
                birth_date: NaiveDate::from_ymd_opt(1990, 5, 20).unwrap(),
                receipt_date: NaiveDate::from_ymd_opt(2010, 6, 1).unwrap(),
                user_id: UserId::generate(),
            },
        )
    }

    #[test]
    fn test_passport_id_parse_round_trip() {
        let id = PassportId::generate();
        assert_eq!(PassportId::parse(&id.to_string()).unwrap(), id);
    }

    #[test]
    fn test_passport_id_parse_invalid() {
        assert!(matches!(
            PassportId::parse("nope"),
            Err(PassportValidationError::MalformedId(_))
        ));
    }

    #[test]
    fn test_passport_creation() {
        let passport = create_test_passport();

        assert_eq!(passport.passport_series(), "4509");
        assert_eq!(passport.passport_number(), "123456");
        assert_eq!(passport.created_at(), passport.updated_at());
    }

    #[test]
    fn test_mutators_touch_updated_at() {
        let mut passport = create_test_passport();
        let before = passport.updated_at();

        std::thread::sleep(std::time::Duration::from_millis(5));
        passport.set_passport_number("654321");

        assert_eq!(passport.passport_number(), "654321");
        assert!(passport.updated_at() > before);
    }
}
