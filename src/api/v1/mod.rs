//! Versioned API endpoints

pub mod passports;
pub mod users;

use axum::{
    routing::{delete, get, post, put},
    Router,
};

use super::state::AppState;

/// Create the v1 API router
pub fn create_v1_router() -> Router<AppState> {
    Router::new()
        // User management
        .route("/users", post(users::create_user))
        .route("/users", get(users::list_users))
        .route("/users/search", get(users::search_users))
        .route("/users/{user_id}", get(users::get_user))
        .route("/users/{user_id}", put(users::update_user))
        .route("/users/{user_id}", delete(users::delete_user))
        .route(
            "/users/{user_id}/passports",
            get(passports::list_user_passports),
        )
        // Passport management
        .route("/passports", post(passports::create_passport))
        .route("/passports/lookup", get(passports::lookup_passport))
        .route("/passports/{passport_id}", get(passports::get_passport))
        .route("/passports/{passport_id}", put(passports::update_passport))
        .route(
            "/passports/{passport_id}",
            delete(passports::delete_passport),
        )
}
