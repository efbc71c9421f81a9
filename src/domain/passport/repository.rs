//! Passport repository trait

use async_trait::async_trait;
use std::fmt::Debug;

use super::entity::{NewPassport, Passport, PassportId};
use crate::domain::user::UserId;
use crate::domain::DomainError;

/// Repository trait for passport storage
#[async_trait]
pub trait PassportRepository: Send + Sync + Debug {
    /// Persist a new passport, assigning its id
    async fn create(&self, passport: NewPassport) -> Result<Passport, DomainError>;

    /// Get a passport by id
    async fn get(&self, id: &PassportId) -> Result<Option<Passport>, DomainError>;

    /// Look up a passport by its number alone
    async fn get_by_number(&self, number: &str) -> Result<Option<Passport>, DomainError>;

    /// Look up a passport by the (series, number) pair
    async fn get_by_series_and_number(
        &self,
        series: &str,
        number: &str,
    ) -> Result<Option<Passport>, DomainError>;

    /// List all passports owned by a user
    async fn list_by_user(&self, user_id: &UserId) -> Result<Vec<Passport>, DomainError>;

    /// Replace an existing passport; `None` signals the id does not exist
    async fn update(&self, passport: &Passport) -> Result<Option<Passport>, DomainError>;

    /// Delete a passport; `false` signals the id does not exist
    async fn delete(&self, id: &PassportId) -> Result<bool, DomainError>;

    /// Delete every passport owned by a user, returning how many were removed
    async fn delete_by_user(&self, user_id: &UserId) -> Result<u64, DomainError>;
}

#[cfg(test)]
pub mod mock {
    use super::*;
    use std::collections::HashMap;
    use std::sync::Arc;
    use tokio::sync::RwLock;

    /// Mock passport repository for testing
    #[derive(Debug, Default)]
    pub struct MockPassportRepository {
        passports: Arc<RwLock<HashMap<PassportId, Passport>>>,
        should_fail: Arc<RwLock<bool>>,
    }

    impl MockPassportRepository {
        pub fn new() -> Self {
            Self::default()
        }

        /// Set whether operations should fail with a storage error
        pub async fn set_should_fail(&self, fail: bool) {
            *self.should_fail.write().await = fail;
        }

        async fn check_should_fail(&self) -> Result<(), DomainError> {
            if *self.should_fail.read().await {
                return Err(DomainError::storage("Mock repository configured to fail"));
            }
            Ok(())
        }
    }

    #[async_trait]
    impl PassportRepository for MockPassportRepository {
        async fn create(&self, new_passport: NewPassport) -> Result<Passport, DomainError> {
            self.check_should_fail().await?;
            let mut passports = self.passports.write().await;

            // Storage-level uniqueness backstop
            if passports
                .values()
                .any(|p| p.passport_number() == new_passport.passport_number)
            {
                return Err(DomainError::duplicate(
                    "passport_number",
                    &new_passport.passport_number,
                ));
            }

            let passport = Passport::new(PassportId::generate(), new_passport);
            passports.insert(*passport.id(), passport.clone());
            Ok(passport)
        }

        async fn get(&self, id: &PassportId) -> Result<Option<Passport>, DomainError> {
            self.check_should_fail().await?;
            let passports = self.passports.read().await;
            Ok(passports.get(id).cloned())
        }

        async fn get_by_number(&self, number: &str) -> Result<Option<Passport>, DomainError> {
            self.check_should_fail().await?;
            let passports = self.passports.read().await;
            Ok(passports
                .values()
                .find(|p| p.passport_number() == number)
                .cloned())
        }

        async fn get_by_series_and_number(
            &self,
            series: &str,
            number: &str,
        ) -> Result<Option<Passport>, DomainError> {
            self.check_should_fail().await?;
            let passports = self.passports.read().await;
            Ok(passports
                .values()
                .find(|p| p.passport_series() == series && p.passport_number() == number)
                .cloned())
        }

        async fn list_by_user(&self, user_id: &UserId) -> Result<Vec<Passport>, DomainError> {
            self.check_should_fail().await?;
            let passports = self.passports.read().await;
            Ok(passports
                .values()
                .filter(|p| p.user_id() == user_id)
                .cloned()
                .collect())
        }

        async fn update(&self, passport: &Passport) -> Result<Option<Passport>, DomainError> {
            self.check_should_fail().await?;
            let mut passports = self.passports.write().await;

            if !passports.contains_key(passport.id()) {
                return Ok(None);
            }

            passports.insert(*passport.id(), passport.clone());
            Ok(Some(passport.clone()))
        }

        async fn delete(&self, id: &PassportId) -> Result<bool, DomainError> {
            self.check_should_fail().await?;
            let mut passports = self.passports.write().await;
            Ok(passports.remove(id).is_some())
        }

        async fn delete_by_user(&self, user_id: &UserId) -> Result<u64, DomainError> {
            self.check_should_fail().await?;
            let mut passports = self.passports.write().await;
            let before = passports.len();
            passports.retain(|_, p| p.user_id() != user_id);
            Ok((before - passports.len()) as u64)
        }
    }

    #[cfg(test)]
    mod tests {
        use super::*;
        use chrono::NaiveDate;

        fn new_passport(series: &str, number: &str, user_id: UserId) -> NewPassport {
            NewPassport {
                passport_series: series.to_string(),
                passport_number: number.to_string(),
                birth_date: NaiveDate::from_ymd_opt(1990, 1, 1).unwrap(),
                receipt_date: NaiveDate::from_ymd_opt(2010, 1, 1).unwrap(),
                user_id,
            }
        }

        #[tokio::test]
        async fn test_create_and_lookups() {
            let repo = MockPassportRepository::new();
            let owner = UserId::generate();

            let created = repo
                .create(new_passport("4509", "123456", owner))
                .await
                .unwrap();

            assert!(repo.get(created.id()).await.unwrap().is_some());
            assert!(repo.get_by_number("123456").await.unwrap().is_some());
            assert!(repo
                .get_by_series_and_number("4509", "123456")
                .await
                .unwrap()
                .is_some());
            assert!(repo
                .get_by_series_and_number("4510", "123456")
                .await
                .unwrap()
                .is_none());
        }

        #[tokio::test]
        async fn test_number_backstop() {
            let repo = MockPassportRepository::new();
            let owner = UserId::generate();

            repo.create(new_passport("4509", "123456", owner))
                .await
                .unwrap();

            let result = repo.create(new_passport("9999", "123456", owner)).await;
            assert!(matches!(result, Err(DomainError::Duplicate { .. })));
        }

        #[tokio::test]
        async fn test_delete_by_user() {
            let repo = MockPassportRepository::new();
            let owner = UserId::generate();
            let other = UserId::generate();

            repo.create(new_passport("4509", "111111", owner))
                .await
                .unwrap();
            repo.create(new_passport("4509", "222222", owner))
                .await
                .unwrap();
            repo.create(new_passport("4509", "333333", other))
                .await
                .unwrap();

            let removed = repo.delete_by_user(&owner).await.unwrap();
            assert_eq!(removed, 2);
            assert!(repo.list_by_user(&owner).await.unwrap().is_empty());
            assert_eq!(repo.list_by_user(&other).await.unwrap().len(), 1);
        }
    }
}
