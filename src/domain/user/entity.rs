//! User entity and related types

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::validation::UserValidationError;

/// User identifier, a generated UUID
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(Uuid);

impl UserId {
    /// Generate a fresh identifier
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }

    /// Parse an identifier from its string form
    pub fn parse(value: &str) -> Result<Self, UserValidationError> {
        let value = value.trim();

        if value.is_empty() {
            return Err(UserValidationError::EmptyId);
        }

        Uuid::parse_str(value)
            .map(Self)
            .map_err(|_| UserValidationError::MalformedId(value.to_string()))
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl From<Uuid> for UserId {
    fn from(value: Uuid) -> Self {
        Self(value)
    }
}

impl std::fmt::Display for UserId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Payload for creating a user; the repository assigns the id.
/// All fields are expected to be validated/normalized already.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub first_name: String,
    pub last_name: String,
    pub patronymic: Option<String>,
    pub phone_number: String,
    pub birth_date: NaiveDate,
}

/// Person record
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    /// Unique identifier, assigned once at creation
    id: UserId,
    first_name: String,
    last_name: String,
    /// Absent patronymic is a distinct state, not an empty string
    #[serde(skip_serializing_if = "Option::is_none")]
    patronymic: Option<String>,
    /// Stored form keeps the caller's `+`/`-` separators
    phone_number: String,
    birth_date: NaiveDate,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl User {
    /// Create a user record from a validated payload
    pub fn new(id: UserId, new_user: NewUser) -> Self {
        let now = Utc::now();

        Self {
            id,
            first_name: new_user.first_name,
            last_name: new_user.last_name,
            patronymic: new_user.patronymic,
            phone_number: new_user.phone_number,
            birth_date: new_user.birth_date,
            created_at: now,
            updated_at: now,
        }
    }

    // Getters

    pub fn id(&self) -> &UserId {
        &self.id
    }

    pub fn first_name(&self) -> &str {
        &self.first_name
    }

    pub fn last_name(&self) -> &str {
        &self.last_name
    }

    pub fn patronymic(&self) -> Option<&str> {
        self.patronymic.as_deref()
    }

    pub fn phone_number(&self) -> &str {
        &self.phone_number
    }

    pub fn birth_date(&self) -> NaiveDate {
        self.birth_date
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// The uniqueness key: "Last First Patronymic" with the patronymic
    /// omitted when absent
    pub fn full_name(&self) -> String {
        match &self.patronymic {
            Some(patronymic) => {
                format!("{} {} {}", self.last_name, self.first_name, patronymic)
            }
            None => format!("{} {}", self.last_name, self.first_name),
        }
    }

    // Mutators

    pub fn set_first_name(&mut self, first_name: impl Into<String>) {
        self.first_name = first_name.into();
        self.touch();
    }

    pub fn set_last_name(&mut self, last_name: impl Into<String>) {
        self.last_name = last_name.into();
        self.touch();
    }

    pub fn set_patronymic(&mut self, patronymic: impl Into<String>) {
        self.patronymic = Some(patronymic.into());
        self.touch();
    }

    pub fn set_phone_number(&mut self, phone_number: impl Into<String>) {
        self.phone_number = phone_number.into();
        self.touch();
    }

    pub fn set_birth_date(&mut self, birth_date: NaiveDate) {
        self.birth_date = birth_date;
        self.touch();
    }

    fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_user() -> User {
        User::new(
            UserId::generate(),
            NewUser {
                first_name: "Ivan".to_string(),
                last_name: "Petrov".to_string(),
                patronymic: Some("Sergeevich".to_string()),
                phone_number: "+7-900-123-45-67".to_string(),
                birth_date: NaiveDate::from_ymd_opt(1990, 5, 20).unwrap(),
            },
        )
    }

    #[test]
    fn test_user_id_parse_valid() {
        let id = UserId::generate();
        let parsed = UserId::parse(&id.to_string()).unwrap();
        assert_eq!(parsed, id);
    }

    #[test]
    fn test_user_id_parse_invalid() {
        assert!(matches!(
            UserId::parse("not-a-uuid"),
            Err(UserValidationError::MalformedId(_))
        ));
        assert!(matches!(
            UserId::parse("  "),
            Err(UserValidationError::EmptyId)
        ));
    }

    #[test]
    fn test_user_creation() {
        let user = create_test_user();

        assert_eq!(user.first_name(), "Ivan");
        assert_eq!(user.last_name(), "Petrov");
        assert_eq!(user.patronymic(), Some("Sergeevich"));
        assert_eq!(user.phone_number(), "+7-900-123-45-67");
        assert_eq!(user.created_at(), user.updated_at());
    }

    #[test]
    fn test_full_name() {
        let user = create_test_user();
        assert_eq!(user.full_name(), "Petrov Ivan Sergeevich");
    }

    #[test]
    fn test_full_name_without_patronymic() {
        let mut user = create_test_user();
        user.patronymic = None;
        assert_eq!(user.full_name(), "Petrov Ivan");
    }

    #[test]
    fn test_mutators_touch_updated_at() {
        let mut user = create_test_user();
        let before = user.updated_at();

        std::thread::sleep(std::time::Duration::from_millis(5));
        user.set_phone_number("89001234567");

        assert_eq!(user.phone_number(), "89001234567");
        assert!(user.updated_at() > before);
    }

    #[test]
    fn test_serialization_skips_absent_patronymic() {
        let mut user = create_test_user();
        user.patronymic = None;

        let json = serde_json::to_string(&user).unwrap();
        assert!(!json.contains("patronymic"));
    }
}
