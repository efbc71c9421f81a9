//! User service: validation, uniqueness checks and persistence orchestration

use chrono::Utc;
use std::sync::Arc;

use crate::domain::passport::PassportRepository;
use crate::domain::user::validation::{
    check_minimum_age, phone_digits, validate_birth_date, validate_name, validate_phone_number,
};
use crate::domain::user::{NameFilter, NewUser, User, UserId, UserRepository};
use crate::domain::DomainError;

/// Request for creating a user; all fields arrive as raw caller input
#[derive(Debug, Clone)]
pub struct CreateUserRequest {
    pub first_name: String,
    pub last_name: String,
    pub patronymic: Option<String>,
    pub phone_number: String,
    pub birth_date: String,
}

/// Request for a partial user update; unset fields keep their stored values
#[derive(Debug, Clone, Default)]
pub struct UpdateUserRequest {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub patronymic: Option<String>,
    pub phone_number: Option<String>,
    pub birth_date: Option<String>,
}

/// User service
///
/// Owns the write path for users: every field is validated and normalized
/// before any repository call, and uniqueness lookups run before inserts.
/// It also holds the passport repository so deleting a user can cascade.
#[derive(Debug)]
pub struct UserService<R: UserRepository, P: PassportRepository> {
    users: Arc<R>,
    passports: Arc<P>,
}

impl<R: UserRepository, P: PassportRepository> UserService<R, P> {
    /// Create a new user service
    pub fn new(users: Arc<R>, passports: Arc<P>) -> Self {
        Self { users, passports }
    }

    /// Create a new user
    ///
    /// Full-name uniqueness is checked before phone uniqueness, so a payload
    /// that collides on both reports the name conflict.
    pub async fn create(&self, request: CreateUserRequest) -> Result<User, DomainError> {
        let today = Utc::now().date_naive();

        // Validate and normalize every field
        let first_name = validate_name("first_name", &request.first_name)
            .map_err(|e| DomainError::validation(e.to_string()))?;
        let last_name = validate_name("last_name", &request.last_name)
            .map_err(|e| DomainError::validation(e.to_string()))?;
        let patronymic = request
            .patronymic
            .as_deref()
            .map(|p| validate_name("patronymic", p))
            .transpose()
            .map_err(|e| DomainError::validation(e.to_string()))?;
        let phone_number = validate_phone_number(&request.phone_number)
            .map_err(|e| DomainError::validation(e.to_string()))?;
        let birth_date = validate_birth_date(&request.birth_date, today)
            .map_err(|e| DomainError::validation(e.to_string()))?;
        check_minimum_age(birth_date, today)
            .map_err(|e| DomainError::validation(e.to_string()))?;

        // Check full-name uniqueness
        if let Some(existing) = self
            .users
            .get_by_full_name(&first_name, &last_name, patronymic.as_deref())
            .await?
        {
            return Err(DomainError::duplicate("full_name", existing.full_name()));
        }

        // Check phone uniqueness
        if self.users.get_by_phone(&phone_number).await?.is_some() {
            return Err(DomainError::duplicate("phone_number", &phone_number));
        }

        self.users
            .create(NewUser {
                first_name,
                last_name,
                patronymic,
                phone_number,
                birth_date,
            })
            .await
    }

    /// Get a user by id
    pub async fn get(&self, id: &str) -> Result<User, DomainError> {
        let user_id = UserId::parse(id).map_err(|e| DomainError::invalid_id(e.to_string()))?;

        self.users
            .get(&user_id)
            .await?
            .ok_or_else(|| DomainError::not_found("User", id))
    }

    /// Find users by any subset of name components
    ///
    /// Each provided component is normalized the same way stored names are,
    /// so `ivan` finds users stored as `Ivan`.
    pub async fn find_by_name(&self, filter: NameFilter) -> Result<Vec<User>, DomainError> {
        if filter.is_empty() {
            return Err(DomainError::validation(
                "at least one name component is required",
            ));
        }

        let normalized = NameFilter {
            first_name: filter
                .first_name
                .as_deref()
                .map(|v| validate_name("first_name", v))
                .transpose()
                .map_err(|e| DomainError::validation(e.to_string()))?,
            last_name: filter
                .last_name
                .as_deref()
                .map(|v| validate_name("last_name", v))
                .transpose()
                .map_err(|e| DomainError::validation(e.to_string()))?,
            patronymic: filter
                .patronymic
                .as_deref()
                .map(|v| validate_name("patronymic", v))
                .transpose()
                .map_err(|e| DomainError::validation(e.to_string()))?,
        };

        let users = self.users.search_by_name(&normalized).await?;
        if users.is_empty() {
            return Err(DomainError::not_found("User", describe_filter(&normalized)));
        }

        Ok(users)
    }

    /// List all users
    pub async fn list(&self) -> Result<Vec<User>, DomainError> {
        self.users.list().await
    }

    /// Apply a partial update to a user
    ///
    /// Existence is checked before anything else, so an unknown id reports
    /// not-found even if the payload would also collide with another record.
    pub async fn update(&self, id: &str, request: UpdateUserRequest) -> Result<User, DomainError> {
        let today = Utc::now().date_naive();

        let user_id = UserId::parse(id).map_err(|e| DomainError::invalid_id(e.to_string()))?;

        let mut user = self
            .users
            .get(&user_id)
            .await?
            .ok_or_else(|| DomainError::not_found("User", id))?;

        // Validate provided fields
        let first_name = request
            .first_name
            .as_deref()
            .map(|v| validate_name("first_name", v))
            .transpose()
            .map_err(|e| DomainError::validation(e.to_string()))?;
        let last_name = request
            .last_name
            .as_deref()
            .map(|v| validate_name("last_name", v))
            .transpose()
            .map_err(|e| DomainError::validation(e.to_string()))?;
        let patronymic = request
            .patronymic
            .as_deref()
            .map(|v| validate_name("patronymic", v))
            .transpose()
            .map_err(|e| DomainError::validation(e.to_string()))?;
        let phone_number = request
            .phone_number
            .as_deref()
            .map(validate_phone_number)
            .transpose()
            .map_err(|e| DomainError::validation(e.to_string()))?;
        let birth_date = request
            .birth_date
            .as_deref()
            .map(|v| validate_birth_date(v, today))
            .transpose()
            .map_err(|e| DomainError::validation(e.to_string()))?;

        // Re-check full-name uniqueness when the effective triple changes
        let effective_first = first_name.as_deref().unwrap_or(user.first_name());
        let effective_last = last_name.as_deref().unwrap_or(user.last_name());
        let effective_patronymic = patronymic.as_deref().or(user.patronymic());

        let triple_changed = effective_first != user.first_name()
            || effective_last != user.last_name()
            || effective_patronymic != user.patronymic();

        if triple_changed {
            if let Some(existing) = self
                .users
                .get_by_full_name(effective_first, effective_last, effective_patronymic)
                .await?
            {
                if existing.id() != user.id() {
                    return Err(DomainError::duplicate("full_name", existing.full_name()));
                }
            }
        }

        // Re-check phone uniqueness when the normalized digits change
        if let Some(phone) = &phone_number {
            if phone_digits(phone) != phone_digits(user.phone_number()) {
                if let Some(existing) = self.users.get_by_phone(phone).await? {
                    if existing.id() != user.id() {
                        return Err(DomainError::duplicate("phone_number", phone));
                    }
                }
            }
        }

        if let Some(first_name) = first_name {
            user.set_first_name(first_name);
        }
        if let Some(last_name) = last_name {
            user.set_last_name(last_name);
        }
        if let Some(patronymic) = patronymic {
            user.set_patronymic(patronymic);
        }
        if let Some(phone_number) = phone_number {
            user.set_phone_number(phone_number);
        }
        if let Some(birth_date) = birth_date {
            user.set_birth_date(birth_date);
        }

        self.users
            .update(&user)
            .await?
            .ok_or_else(|| DomainError::not_found("User", id))
    }

    /// Delete a user and every passport they own
    pub async fn delete(&self, id: &str) -> Result<(), DomainError> {
        let user_id = UserId::parse(id).map_err(|e| DomainError::invalid_id(e.to_string()))?;

        if !self.users.exists(&user_id).await? {
            return Err(DomainError::not_found("User", id));
        }

        // Passports go first so a crash between the two deletes cannot
        // leave documents pointing at a missing owner
        self.passports.delete_by_user(&user_id).await?;

        if !self.users.delete(&user_id).await? {
            return Err(DomainError::not_found("User", id));
        }

        Ok(())
    }
}

fn describe_filter(filter: &NameFilter) -> String {
    [
        filter.last_name.as_deref(),
        filter.first_name.as_deref(),
        filter.patronymic.as_deref(),
    ]
    .iter()
    .flatten()
    .copied()
    .collect::<Vec<_>>()
    .join(" ")
}
