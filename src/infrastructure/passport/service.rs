//! Passport service: validation, owner checks and uniqueness orchestration

use chrono::Utc;
use std::sync::Arc;

use crate::domain::passport::validation::{
    check_date_order, validate_birth_date, validate_passport_number, validate_passport_series,
    validate_receipt_date,
};
use crate::domain::passport::{NewPassport, Passport, PassportId, PassportRepository};
use crate::domain::user::{UserId, UserRepository};
use crate::domain::DomainError;

/// Request for registering a passport; all fields arrive as raw caller input
#[derive(Debug, Clone)]
pub struct CreatePassportRequest {
    pub passport_series: String,
    pub passport_number: String,
    pub birth_date: String,
    pub receipt_date: String,
    pub user_id: String,
}

/// Request for a partial passport update; unset fields keep their stored values
#[derive(Debug, Clone, Default)]
pub struct UpdatePassportRequest {
    pub passport_series: Option<String>,
    pub passport_number: Option<String>,
    pub birth_date: Option<String>,
    pub receipt_date: Option<String>,
    pub user_id: Option<String>,
}

/// Passport service
///
/// Holds the user repository as well: a passport may only reference an
/// existing owner, and that check runs before any uniqueness lookup.
#[derive(Debug)]
pub struct PassportService<P: PassportRepository, U: UserRepository> {
    passports: Arc<P>,
    users: Arc<U>,
}

impl<P: PassportRepository, U: UserRepository> PassportService<P, U> {
    /// Create a new passport service
    pub fn new(passports: Arc<P>, users: Arc<U>) -> Self {
        Self { passports, users }
    }

    /// Register a new passport
    ///
    /// Order of checks: field validation, date consistency, owner existence,
    /// number uniqueness, then the (series, number) pair.
    pub async fn create(&self, request: CreatePassportRequest) -> Result<Passport, DomainError> {
        let today = Utc::now().date_naive();

        let passport_series = validate_passport_series(&request.passport_series)
            .map_err(|e| DomainError::validation(e.to_string()))?;
        let passport_number = validate_passport_number(&request.passport_number)
            .map_err(|e| DomainError::validation(e.to_string()))?;
        let birth_date = validate_birth_date(&request.birth_date, today)
            .map_err(|e| DomainError::validation(e.to_string()))?;
        let receipt_date = validate_receipt_date(&request.receipt_date)
            .map_err(|e| DomainError::validation(e.to_string()))?;
        check_date_order(birth_date, receipt_date)
            .map_err(|e| DomainError::validation(e.to_string()))?;

        let user_id = UserId::parse(&request.user_id)
            .map_err(|e| DomainError::invalid_id(e.to_string()))?;

        if !self.users.exists(&user_id).await? {
            return Err(DomainError::not_found("User", &request.user_id));
        }

        if self
            .passports
            .get_by_number(&passport_number)
            .await?
            .is_some()
        {
            return Err(DomainError::duplicate("passport_number", &passport_number));
        }

        if self
            .passports
            .get_by_series_and_number(&passport_series, &passport_number)
            .await?
            .is_some()
        {
            return Err(DomainError::duplicate(
                "passport",
                format!("{passport_series} {passport_number}"),
            ));
        }

        self.passports
            .create(NewPassport {
                passport_series,
                passport_number,
                birth_date,
                receipt_date,
                user_id,
            })
            .await
    }

    /// Get a passport by id
    pub async fn get(&self, id: &str) -> Result<Passport, DomainError> {
        let passport_id =
            PassportId::parse(id).map_err(|e| DomainError::invalid_id(e.to_string()))?;

        self.passports
            .get(&passport_id)
            .await?
            .ok_or_else(|| DomainError::not_found("Passport", id))
    }

    /// Look up a passport by its series and number
    pub async fn get_by_series_and_number(
        &self,
        series: &str,
        number: &str,
    ) -> Result<Passport, DomainError> {
        let series = validate_passport_series(series)
            .map_err(|e| DomainError::validation(e.to_string()))?;
        let number = validate_passport_number(number)
            .map_err(|e| DomainError::validation(e.to_string()))?;

        self.passports
            .get_by_series_and_number(&series, &number)
            .await?
            .ok_or_else(|| DomainError::not_found("Passport", format!("{series} {number}")))
    }

    /// List all passports owned by a user
    pub async fn list_by_user(&self, user_id: &str) -> Result<Vec<Passport>, DomainError> {
        let user_id =
            UserId::parse(user_id).map_err(|e| DomainError::invalid_id(e.to_string()))?;

        if !self.users.exists(&user_id).await? {
            return Err(DomainError::not_found("User", user_id.to_string()));
        }

        self.passports.list_by_user(&user_id).await
    }

    /// Apply a partial update to a passport
    ///
    /// Existence is checked first; date consistency is re-checked on the
    /// effective values, and uniqueness on a changed series or number.
    pub async fn update(
        &self,
        id: &str,
        request: UpdatePassportRequest,
    ) -> Result<Passport, DomainError> {
        let today = Utc::now().date_naive();

        let passport_id =
            PassportId::parse(id).map_err(|e| DomainError::invalid_id(e.to_string()))?;

        let mut passport = self
            .passports
            .get(&passport_id)
            .await?
            .ok_or_else(|| DomainError::not_found("Passport", id))?;

        let passport_series = request
            .passport_series
            .as_deref()
            .map(validate_passport_series)
            .transpose()
            .map_err(|e| DomainError::validation(e.to_string()))?;
        let passport_number = request
            .passport_number
            .as_deref()
            .map(validate_passport_number)
            .transpose()
            .map_err(|e| DomainError::validation(e.to_string()))?;
        let birth_date = request
            .birth_date
            .as_deref()
            .map(|v| validate_birth_date(v, today))
            .transpose()
            .map_err(|e| DomainError::validation(e.to_string()))?;
        let receipt_date = request
            .receipt_date
            .as_deref()
            .map(validate_receipt_date)
            .transpose()
            .map_err(|e| DomainError::validation(e.to_string()))?;

        let effective_birth = birth_date.unwrap_or(passport.birth_date());
        let effective_receipt = receipt_date.unwrap_or(passport.receipt_date());
        check_date_order(effective_birth, effective_receipt)
            .map_err(|e| DomainError::validation(e.to_string()))?;

        // Re-homing a passport requires the new owner to exist
        let user_id = match request.user_id.as_deref() {
            Some(raw) => {
                let user_id =
                    UserId::parse(raw).map_err(|e| DomainError::invalid_id(e.to_string()))?;
                if &user_id != passport.user_id() && !self.users.exists(&user_id).await? {
                    return Err(DomainError::not_found("User", raw));
                }
                Some(user_id)
            }
            None => None,
        };

        let effective_series = passport_series
            .as_deref()
            .unwrap_or(passport.passport_series());
        let effective_number = passport_number
            .as_deref()
            .unwrap_or(passport.passport_number());

        let number_changed = effective_number != passport.passport_number();
        let series_changed = effective_series != passport.passport_series();

        if number_changed {
            if let Some(existing) = self.passports.get_by_number(effective_number).await? {
                if existing.id() != passport.id() {
                    return Err(DomainError::duplicate("passport_number", effective_number));
                }
            }
        }

        if number_changed || series_changed {
            if let Some(existing) = self
                .passports
                .get_by_series_and_number(effective_series, effective_number)
                .await?
            {
                if existing.id() != passport.id() {
                    return Err(DomainError::duplicate(
                        "passport",
                        format!("{effective_series} {effective_number}"),
                    ));
                }
            }
        }

        if let Some(passport_series) = passport_series {
            passport.set_passport_series(passport_series);
        }
        if let Some(passport_number) = passport_number {
            passport.set_passport_number(passport_number);
        }
        if let Some(birth_date) = birth_date {
            passport.set_birth_date(birth_date);
        }
        if let Some(receipt_date) = receipt_date {
            passport.set_receipt_date(receipt_date);
        }
        if let Some(user_id) = user_id {
            passport.set_user_id(user_id);
        }

        self.passports
            .update(&passport)
            .await?
            .ok_or_else(|| DomainError::not_found("Passport", id))
    }

    /// Delete a passport
    pub async fn delete(&self, id: &str) -> Result<(), DomainError> {
        let passport_id =
            PassportId::parse(id).map_err(|e| DomainError::invalid_id(e.to_string()))?;

        if !self.passports.delete(&passport_id).await? {
            return Err(DomainError::not_found("Passport", id));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::passport::MockPassportRepository;
    use crate::domain::user::{MockUserRepository, NewUser, User};
    use chrono::NaiveDate;

    struct Fixture {
        service: PassportService<MockPassportRepository, MockUserRepository>,
        users: Arc<MockUserRepository>,
    }

    fn fixture() -> Fixture {
        let users = Arc::new(MockUserRepository::new());
        let passports = Arc::new(MockPassportRepository::new());
        Fixture {
            service: PassportService::new(passports, Arc::clone(&users)),
            users,
        }
    }

    async fn seed_user(users: &MockUserRepository) -> User {
        users
            .create(NewUser {
                first_name: "Ivan".to_string(),
                last_name: "Petrov".to_string(),
                patronymic: None,
                phone_number: "89001234567".to_string(),
                birth_date: NaiveDate::from_ymd_opt(1990, 5, 20).unwrap(),
            })
            .await
            .unwrap()
    }

    fn make_request(series: &str, number: &str, user_id: &UserId) -> CreatePassportRequest {
        CreatePassportRequest {
            passport_series: series.to_string(),
            passport_number: number.to_string(),
            birth_date: "20.05.1990".to_string(),
            receipt_date: "2010-06-01".to_string(),
            user_id: user_id.to_string(),
        }
    }

    #[tokio::test]
    async fn test_create_passport() {
        let f = fixture();
        let owner = seed_user(&f.users).await;

        let passport = f
            .service
            .create(make_request("4509", "123456", owner.id()))
            .await
            .unwrap();

        assert_eq!(passport.passport_series(), "4509");
        assert_eq!(passport.passport_number(), "123456");
        assert_eq!(passport.user_id(), owner.id());
        assert_eq!(
            passport.receipt_date(),
            NaiveDate::from_ymd_opt(2010, 6, 1).unwrap()
        );
    }

    #[tokio::test]
    async fn test_create_rejects_bad_series() {
        let f = fixture();
        let owner = seed_user(&f.users).await;

        let result = f
            .service
            .create(make_request("0459", "123456", owner.id()))
            .await;
        assert!(matches!(result, Err(DomainError::Validation { .. })));
    }

    #[tokio::test]
    async fn test_create_rejects_receipt_before_birth() {
        let f = fixture();
        let owner = seed_user(&f.users).await;

        let mut request = make_request("4509", "123456", owner.id());
        request.receipt_date = "1980-01-01".to_string();

        let result = f.service.create(request).await;
        assert!(matches!(result, Err(DomainError::Validation { .. })));
    }

    #[tokio::test]
    async fn test_create_unknown_owner() {
        let f = fixture();

        let result = f
            .service
            .create(make_request("4509", "123456", &UserId::generate()))
            .await;
        assert!(matches!(result, Err(DomainError::NotFound { .. })));
    }

    #[tokio::test]
    async fn test_create_owner_checked_before_uniqueness() {
        let f = fixture();
        let owner = seed_user(&f.users).await;

        f.service
            .create(make_request("4509", "123456", owner.id()))
            .await
            .unwrap();

        // Duplicate number but unknown owner: not-found wins
        let result = f
            .service
            .create(make_request("4509", "123456", &UserId::generate()))
            .await;
        assert!(matches!(result, Err(DomainError::NotFound { .. })));
    }

    #[tokio::test]
    async fn test_create_duplicate_number() {
        let f = fixture();
        let owner = seed_user(&f.users).await;

        f.service
            .create(make_request("4509", "123456", owner.id()))
            .await
            .unwrap();

        // Different series, same number
        let result = f
            .service
            .create(make_request("9999", "123456", owner.id()))
            .await;
        match result {
            Err(DomainError::Duplicate { field, .. }) => assert_eq!(field, "passport_number"),
            other => panic!("expected duplicate passport_number, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_get_by_series_and_number() {
        let f = fixture();
        let owner = seed_user(&f.users).await;

        f.service
            .create(make_request("4509", "123456", owner.id()))
            .await
            .unwrap();

        let found = f
            .service
            .get_by_series_and_number(" 4509 ", "123456")
            .await
            .unwrap();
        assert_eq!(found.passport_number(), "123456");

        let result = f.service.get_by_series_and_number("4510", "123456").await;
        assert!(matches!(result, Err(DomainError::NotFound { .. })));
    }

    #[tokio::test]
    async fn test_get_invalid_id() {
        let f = fixture();

        let result = f.service.get("not-a-uuid").await;
        assert!(matches!(result, Err(DomainError::InvalidId { .. })));
    }

    #[tokio::test]
    async fn test_list_by_user() {
        let f = fixture();
        let owner = seed_user(&f.users).await;

        f.service
            .create(make_request("4509", "111111", owner.id()))
            .await
            .unwrap();
        f.service
            .create(make_request("4509", "222222", owner.id()))
            .await
            .unwrap();

        let passports = f
            .service
            .list_by_user(&owner.id().to_string())
            .await
            .unwrap();
        assert_eq!(passports.len(), 2);

        let result = f
            .service
            .list_by_user(&UserId::generate().to_string())
            .await;
        assert!(matches!(result, Err(DomainError::NotFound { .. })));
    }

    #[tokio::test]
    async fn test_update_partial_preserves_unset_fields() {
        let f = fixture();
        let owner = seed_user(&f.users).await;

        let passport = f
            .service
            .create(make_request("4509", "123456", owner.id()))
            .await
            .unwrap();

        let updated = f
            .service
            .update(
                &passport.id().to_string(),
                UpdatePassportRequest {
                    passport_number: Some("654321".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.passport_number(), "654321");
        assert_eq!(updated.passport_series(), "4509");
        assert_eq!(updated.birth_date(), passport.birth_date());
        assert_eq!(updated.user_id(), owner.id());
    }

    #[tokio::test]
    async fn test_update_missing_takes_precedence_over_duplicate() {
        let f = fixture();
        let owner = seed_user(&f.users).await;

        f.service
            .create(make_request("4509", "123456", owner.id()))
            .await
            .unwrap();

        let result = f
            .service
            .update(
                &PassportId::generate().to_string(),
                UpdatePassportRequest {
                    passport_number: Some("123456".to_string()),
                    ..Default::default()
                },
            )
            .await;
        assert!(matches!(result, Err(DomainError::NotFound { .. })));
    }

    #[tokio::test]
    async fn test_update_to_taken_number() {
        let f = fixture();
        let owner = seed_user(&f.users).await;

        f.service
            .create(make_request("4509", "123456", owner.id()))
            .await
            .unwrap();
        let other = f
            .service
            .create(make_request("4509", "654321", owner.id()))
            .await
            .unwrap();

        let result = f
            .service
            .update(
                &other.id().to_string(),
                UpdatePassportRequest {
                    passport_number: Some("123456".to_string()),
                    ..Default::default()
                },
            )
            .await;
        assert!(matches!(result, Err(DomainError::Duplicate { .. })));
    }

    #[tokio::test]
    async fn test_update_keeping_own_number_ok() {
        let f = fixture();
        let owner = seed_user(&f.users).await;

        let passport = f
            .service
            .create(make_request("4509", "123456", owner.id()))
            .await
            .unwrap();

        // Re-sending the current number is not a conflict
        let updated = f
            .service
            .update(
                &passport.id().to_string(),
                UpdatePassportRequest {
                    passport_number: Some("123456".to_string()),
                    receipt_date: Some("2015-01-01".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(
            updated.receipt_date(),
            NaiveDate::from_ymd_opt(2015, 1, 1).unwrap()
        );
    }

    #[tokio::test]
    async fn test_update_date_order_on_effective_values() {
        let f = fixture();
        let owner = seed_user(&f.users).await;

        let passport = f
            .service
            .create(make_request("4509", "123456", owner.id()))
            .await
            .unwrap();

        // Stored birth date is 1990-05-20; moving receipt before it fails
        let result = f
            .service
            .update(
                &passport.id().to_string(),
                UpdatePassportRequest {
                    receipt_date: Some("1985-01-01".to_string()),
                    ..Default::default()
                },
            )
            .await;
        assert!(matches!(result, Err(DomainError::Validation { .. })));
    }

    #[tokio::test]
    async fn test_update_rehome_to_unknown_owner() {
        let f = fixture();
        let owner = seed_user(&f.users).await;

        let passport = f
            .service
            .create(make_request("4509", "123456", owner.id()))
            .await
            .unwrap();

        let result = f
            .service
            .update(
                &passport.id().to_string(),
                UpdatePassportRequest {
                    user_id: Some(UserId::generate().to_string()),
                    ..Default::default()
                },
            )
            .await;
        assert!(matches!(result, Err(DomainError::NotFound { .. })));
    }

    #[tokio::test]
    async fn test_delete() {
        let f = fixture();
        let owner = seed_user(&f.users).await;

        let passport = f
            .service
            .create(make_request("4509", "123456", owner.id()))
            .await
            .unwrap();

        f.service.delete(&passport.id().to_string()).await.unwrap();

        let result = f.service.get(&passport.id().to_string()).await;
        assert!(matches!(result, Err(DomainError::NotFound { .. })));
    }

    #[tokio::test]
    async fn test_delete_missing() {
        let f = fixture();

        let result = f.service.delete(&PassportId::generate().to_string()).await;
        assert!(matches!(result, Err(DomainError::NotFound { .. })));
    }
}
