//! In-memory user repository implementation

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::user::validation::phone_digits;
use crate::domain::user::{NameFilter, NewUser, User, UserId, UserRepository};
use crate::domain::DomainError;

type FullNameKey = (String, String, Option<String>);

fn full_name_key(user: &User) -> FullNameKey {
    (
        user.first_name().to_string(),
        user.last_name().to_string(),
        user.patronymic().map(String::from),
    )
}

/// In-memory implementation of UserRepository
///
/// Uniqueness is re-checked under the write lock before every insert, which
/// is the storage-level backstop for the service's check-then-act lookups.
#[derive(Debug)]
pub struct InMemoryUserRepository {
    users: Arc<RwLock<HashMap<UserId, User>>>,
    /// Normalized phone digits -> user id
    phone_index: Arc<RwLock<HashMap<String, UserId>>>,
    /// Full-name triple -> user id
    name_index: Arc<RwLock<HashMap<FullNameKey, UserId>>>,
}

impl InMemoryUserRepository {
    /// Create a new empty repository
    pub fn new() -> Self {
        Self {
            users: Arc::new(RwLock::new(HashMap::new())),
            phone_index: Arc::new(RwLock::new(HashMap::new())),
            name_index: Arc::new(RwLock::new(HashMap::new())),
        }
    }
}

impl Default for InMemoryUserRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn create(&self, new_user: NewUser) -> Result<User, DomainError> {
        let mut users = self.users.write().await;
        let mut phone_index = self.phone_index.write().await;
        let mut name_index = self.name_index.write().await;

        let digits = phone_digits(&new_user.phone_number);
        if phone_index.contains_key(&digits) {
            return Err(DomainError::duplicate(
                "phone_number",
                &new_user.phone_number,
            ));
        }

        let name_key = (
            new_user.first_name.clone(),
            new_user.last_name.clone(),
            new_user.patronymic.clone(),
        );
        if name_index.contains_key(&name_key) {
            return Err(DomainError::duplicate(
                "full_name",
                format!("{} {}", new_user.last_name, new_user.first_name),
            ));
        }

        let user = User::new(UserId::generate(), new_user);

        phone_index.insert(digits, *user.id());
        name_index.insert(name_key, *user.id());
        users.insert(*user.id(), user.clone());

        Ok(user)
    }

    async fn get(&self, id: &UserId) -> Result<Option<User>, DomainError> {
        let users = self.users.read().await;
        Ok(users.get(id).cloned())
    }

    async fn get_by_full_name(
        &self,
        first_name: &str,
        last_name: &str,
        patronymic: Option<&str>,
    ) -> Result<Option<User>, DomainError> {
        let key = (
            first_name.to_string(),
            last_name.to_string(),
            patronymic.map(String::from),
        );

        // Writers take `users` before the indexes; the index guard must be
        // dropped before locking `users` or the two orders deadlock.
        let user_id = {
            let name_index = self.name_index.read().await;
            name_index.get(&key).copied()
        };

        let Some(user_id) = user_id else {
            return Ok(None);
        };

        let users = self.users.read().await;
        Ok(users.get(&user_id).cloned())
    }

    async fn search_by_name(&self, filter: &NameFilter) -> Result<Vec<User>, DomainError> {
        let users = self.users.read().await;
        Ok(users
            .values()
            .filter(|u| filter.matches(u))
            .cloned()
            .collect())
    }

    async fn get_by_phone(&self, phone_number: &str) -> Result<Option<User>, DomainError> {
        // Same lock order as get_by_full_name: index guard released first
        let user_id = {
            let phone_index = self.phone_index.read().await;
            phone_index.get(&phone_digits(phone_number)).copied()
        };

        let Some(user_id) = user_id else {
            return Ok(None);
        };

        let users = self.users.read().await;
        Ok(users.get(&user_id).cloned())
    }

    async fn update(&self, user: &User) -> Result<Option<User>, DomainError> {
        let mut users = self.users.write().await;
        let mut phone_index = self.phone_index.write().await;
        let mut name_index = self.name_index.write().await;

        let Some(old_user) = users.get(user.id()) else {
            return Ok(None);
        };

        let old_digits = phone_digits(old_user.phone_number());
        let new_digits = phone_digits(user.phone_number());

        if old_digits != new_digits {
            if phone_index.contains_key(&new_digits) {
                return Err(DomainError::duplicate("phone_number", user.phone_number()));
            }
            phone_index.remove(&old_digits);
            phone_index.insert(new_digits, *user.id());
        }

        let old_key = full_name_key(old_user);
        let new_key = full_name_key(user);

        if old_key != new_key {
            if name_index.contains_key(&new_key) {
                return Err(DomainError::duplicate("full_name", user.full_name()));
            }
            name_index.remove(&old_key);
            name_index.insert(new_key, *user.id());
        }

        users.insert(*user.id(), user.clone());
        Ok(Some(user.clone()))
    }

    async fn delete(&self, id: &UserId) -> Result<bool, DomainError> {
        let mut users = self.users.write().await;
        let mut phone_index = self.phone_index.write().await;
        let mut name_index = self.name_index.write().await;

        if let Some(user) = users.remove(id) {
            phone_index.remove(&phone_digits(user.phone_number()));
            name_index.remove(&full_name_key(&user));
            Ok(true)
        } else {
            Ok(false)
        }
    }

    async fn list(&self) -> Result<Vec<User>, DomainError> {
        let users = self.users.read().await;
        Ok(users.values().cloned().collect())
    }
}
