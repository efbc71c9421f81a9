//! Application state for shared services

use std::sync::Arc;

use crate::domain::passport::PassportRepository;
use crate::domain::user::UserRepository;
use crate::domain::{DomainError, NameFilter, Passport, User};
use crate::infrastructure::passport::{
    CreatePassportRequest, PassportService, UpdatePassportRequest,
};
use crate::infrastructure::user::{CreateUserRequest, UpdateUserRequest, UserService};

/// Application state containing shared services using dynamic dispatch
#[derive(Clone)]
pub struct AppState {
    pub user_service: Arc<dyn UserServiceTrait>,
    pub passport_service: Arc<dyn PassportServiceTrait>,
}

/// Trait for user service operations
#[async_trait::async_trait]
pub trait UserServiceTrait: Send + Sync {
    async fn create(&self, request: CreateUserRequest) -> Result<User, DomainError>;
    async fn get(&self, id: &str) -> Result<User, DomainError>;
    async fn find_by_name(&self, filter: NameFilter) -> Result<Vec<User>, DomainError>;
    async fn list(&self) -> Result<Vec<User>, DomainError>;
    async fn update(&self, id: &str, request: UpdateUserRequest) -> Result<User, DomainError>;
    async fn delete(&self, id: &str) -> Result<(), DomainError>;
}

/// Trait for passport service operations
#[async_trait::async_trait]
pub trait PassportServiceTrait: Send + Sync {
    async fn create(&self, request: CreatePassportRequest) -> Result<Passport, DomainError>;
    async fn get(&self, id: &str) -> Result<Passport, DomainError>;
    async fn get_by_series_and_number(
        &self,
        series: &str,
        number: &str,
    ) -> Result<Passport, DomainError>;
    async fn list_by_user(&self, user_id: &str) -> Result<Vec<Passport>, DomainError>;
    async fn update(&self, id: &str, request: UpdatePassportRequest)
        -> Result<Passport, DomainError>;
    async fn delete(&self, id: &str) -> Result<(), DomainError>;
}

// Implement traits for the actual services

#[async_trait::async_trait]
impl<R, P> UserServiceTrait for UserService<R, P>
where
    R: UserRepository + 'static,
    P: PassportRepository + 'static,
{
    async fn create(&self, request: CreateUserRequest) -> Result<User, DomainError> {
        UserService::create(self, request).await
    }

    async fn get(&self, id: &str) -> Result<User, DomainError> {
        UserService::get(self, id).await
    }

    async fn find_by_name(&self, filter: NameFilter) -> Result<Vec<User>, DomainError> {
        UserService::find_by_name(self, filter).await
    }

    async fn list(&self) -> Result<Vec<User>, DomainError> {
        UserService::list(self).await
    }

    async fn update(&self, id: &str, request: UpdateUserRequest) -> Result<User, DomainError> {
        UserService::update(self, id, request).await
    }

    async fn delete(&self, id: &str) -> Result<(), DomainError> {
        UserService::delete(self, id).await
    }
}

#[async_trait::async_trait]
impl<P, U> PassportServiceTrait for PassportService<P, U>
where
    P: PassportRepository + 'static,
    U: UserRepository + 'static,
{
    async fn create(&self, request: CreatePassportRequest) -> Result<Passport, DomainError> {
        PassportService::create(self, request).await
    }

    async fn get(&self, id: &str) -> Result<Passport, DomainError> {
        PassportService::get(self, id).await
    }

    async fn get_by_series_and_number(
        &self,
        series: &str,
        number: &str,
    ) -> Result<Passport, DomainError> {
        PassportService::get_by_series_and_number(self, series, number).await
    }

    async fn list_by_user(&self, user_id: &str) -> Result<Vec<Passport>, DomainError> {
        PassportService::list_by_user(self, user_id).await
    }

    async fn update(
        &self,
        id: &str,
        request: UpdatePassportRequest,
    ) -> Result<Passport, DomainError> {
        PassportService::update(self, id, request).await
    }

    async fn delete(&self, id: &str) -> Result<(), DomainError> {
        PassportService::delete(self, id).await
    }
}

impl AppState {
    /// Create new application state with provided services
    pub fn new(
        user_service: Arc<dyn UserServiceTrait>,
        passport_service: Arc<dyn PassportServiceTrait>,
    ) -> Self {
        Self {
            user_service,
            passport_service,
        }
    }
}
