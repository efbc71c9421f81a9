//! In-memory passport repository implementation

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::passport::{NewPassport, Passport, PassportId, PassportRepository};
use crate::domain::user::UserId;
use crate::domain::DomainError;

/// In-memory implementation of PassportRepository
///
/// Number uniqueness is re-checked under the write lock before every insert,
/// backstopping the service's check-then-act lookups.
#[derive(Debug)]
pub struct InMemoryPassportRepository {
    passports: Arc<RwLock<HashMap<PassportId, Passport>>>,
    /// Passport number -> passport id
    number_index: Arc<RwLock<HashMap<String, PassportId>>>,
}

impl InMemoryPassportRepository {
    /// Create a new empty repository
    pub fn new() -> Self {
        Self {
            passports: Arc::new(RwLock::new(HashMap::new())),
            number_index: Arc::new(RwLock::new(HashMap::new())),
        }
    }
}

impl Default for InMemoryPassportRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PassportRepository for InMemoryPassportRepository {
    async fn create(&self, new_passport: NewPassport) -> Result<Passport, DomainError> {
        let mut passports = self.passports.write().await;
        let mut number_index = self.number_index.write().await;

        if number_index.contains_key(&new_passport.passport_number) {
            return Err(DomainError::duplicate(
                "passport_number",
                &new_passport.passport_number,
            ));
        }

        let passport = Passport::new(PassportId::generate(), new_passport);

        number_index.insert(passport.passport_number().to_string(), *passport.id());
        passports.insert(*passport.id(), passport.clone());

        Ok(passport)
    }

    async fn get(&self, id: &PassportId) -> Result<Option<Passport>, DomainError> {
        let passports = self.passports.read().await;
        Ok(passports.get(id).cloned())
    }

    async fn get_by_number(&self, number: &str) -> Result<Option<Passport>, DomainError> {
        // Writers take `passports` before `number_index`; the index guard must
        // be dropped before locking `passports` or the two orders deadlock.
        let passport_id = {
            let number_index = self.number_index.read().await;
            number_index.get(number).copied()
        };

        let Some(passport_id) = passport_id else {
            return Ok(None);
        };

        let passports = self.passports.read().await;
        Ok(passports.get(&passport_id).cloned())
    }

    async fn get_by_series_and_number(
        &self,
        series: &str,
        number: &str,
    ) -> Result<Option<Passport>, DomainError> {
        // Number alone is unique, so the index resolves the pair as well
        let found = self.get_by_number(number).await?;
        Ok(found.filter(|p| p.passport_series() == series))
    }

    async fn list_by_user(&self, user_id: &UserId) -> Result<Vec<Passport>, DomainError> {
        let passports = self.passports.read().await;
        Ok(passports
            .values()
            .filter(|p| p.user_id() == user_id)
            .cloned()
            .collect())
    }

    async fn update(&self, passport: &Passport) -> Result<Option<Passport>, DomainError> {
        let mut passports = self.passports.write().await;
        let mut number_index = self.number_index.write().await;

        let Some(old_passport) = passports.get(passport.id()) else {
            return Ok(None);
        };

        if old_passport.passport_number() != passport.passport_number() {
            if number_index.contains_key(passport.passport_number()) {
                return Err(DomainError::duplicate(
                    "passport_number",
                    passport.passport_number(),
                ));
            }
            number_index.remove(old_passport.passport_number());
            number_index.insert(passport.passport_number().to_string(), *passport.id());
        }

        passports.insert(*passport.id(), passport.clone());
        Ok(Some(passport.clone()))
    }

    async fn delete(&self, id: &PassportId) -> Result<bool, DomainError> {
        let mut passports = self.passports.write().await;
        let mut number_index = self.number_index.write().await;

        if let Some(passport) = passports.remove(id) {
            number_index.remove(passport.passport_number());
            Ok(true)
        } else {
            Ok(false)
        }
    }

    async fn delete_by_user(&self, user_id: &UserId) -> Result<u64, DomainError> {
        let mut passports = self.passports.write().await;
        let mut number_index = self.number_index.write().await;

        let mut removed = 0u64;
        passports.retain(|_, p| {
            if p.user_id() == user_id {
                number_index.remove(p.passport_number());
                removed += 1;
                false
            } else {
                true
            }
        });

        Ok(removed)
    }
}
