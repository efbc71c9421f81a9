//! Person Registry API
//!
//! An HTTP service for person records and their identity documents:
//! - Validated, normalized person data (names, phone, birth date)
//! - Passports tied to an owning person, unique by number
//! - Uniqueness enforced on full name, phone and passport identity

pub mod api;
pub mod cli;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use config::AppConfig;

use std::sync::Arc;

use api::state::AppState;
use infrastructure::passport::{InMemoryPassportRepository, PassportService};
use infrastructure::user::{InMemoryUserRepository, UserService};

/// Create the application state with all services wired to in-memory storage
pub fn create_app_state() -> AppState {
    let user_repository = Arc::new(InMemoryUserRepository::new());
    let passport_repository = Arc::new(InMemoryPassportRepository::new());

    let user_service = Arc::new(UserService::new(
        Arc::clone(&user_repository),
        Arc::clone(&passport_repository),
    ));
    let passport_service = Arc::new(PassportService::new(passport_repository, user_repository));

    AppState::new(user_service, passport_service)
}
