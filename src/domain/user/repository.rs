//! User repository trait

use async_trait::async_trait;
use std::fmt::Debug;

use super::entity::{NewUser, User, UserId};
use crate::domain::DomainError;

/// Filter for name lookups; any subset of the three components may be set
#[derive(Debug, Clone, Default)]
pub struct NameFilter {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub patronymic: Option<String>,
}

impl NameFilter {
    pub fn is_empty(&self) -> bool {
        self.first_name.is_none() && self.last_name.is_none() && self.patronymic.is_none()
    }

    /// Check a user against every component that is set
    pub fn matches(&self, user: &User) -> bool {
        if let Some(first) = &self.first_name {
            if user.first_name() != first {
                return false;
            }
        }
        if let Some(last) = &self.last_name {
            if user.last_name() != last {
                return false;
            }
        }
        if let Some(patronymic) = &self.patronymic {
            if user.patronymic() != Some(patronymic.as_str()) {
                return false;
            }
        }
        true
    }
}

/// Repository trait for user storage
#[async_trait]
pub trait UserRepository: Send + Sync + Debug {
    /// Persist a new user, assigning its id
    async fn create(&self, user: NewUser) -> Result<User, DomainError>;

    /// Get a user by id
    async fn get(&self, id: &UserId) -> Result<Option<User>, DomainError>;

    /// Look up a user by the exact full-name triple; an absent patronymic
    /// only matches users without one
    async fn get_by_full_name(
        &self,
        first_name: &str,
        last_name: &str,
        patronymic: Option<&str>,
    ) -> Result<Option<User>, DomainError>;

    /// Find users matching any subset of the name components
    async fn search_by_name(&self, filter: &NameFilter) -> Result<Vec<User>, DomainError>;

    /// Look up a user by phone number, compared on the stripped digit form
    async fn get_by_phone(&self, phone_number: &str) -> Result<Option<User>, DomainError>;

    /// Replace an existing user; `None` signals the id does not exist
    async fn update(&self, user: &User) -> Result<Option<User>, DomainError>;

    /// Delete a user; `false` signals the id does not exist
    async fn delete(&self, id: &UserId) -> Result<bool, DomainError>;

    /// List all users
    async fn list(&self) -> Result<Vec<User>, DomainError>;

    /// Check whether a user id exists
    async fn exists(&self, id: &UserId) -> Result<bool, DomainError> {
        Ok(self.get(id).await?.is_some())
    }
}
