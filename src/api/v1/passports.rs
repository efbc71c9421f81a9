//! Passport endpoints

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::api::state::AppState;
use crate::api::types::{ApiError, Json};
use crate::domain::Passport;
use crate::infrastructure::passport::{CreatePassportRequest, UpdatePassportRequest};

/// Request to register a new passport
#[derive(Debug, Clone, Deserialize)]
pub struct CreatePassportApiRequest {
    pub passport_series: String,
    pub passport_number: String,
    pub birth_date: String,
    pub receipt_date: String,
    pub user_id: String,
}

/// Request to update a passport; every field optional
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdatePassportApiRequest {
    pub passport_series: Option<String>,
    pub passport_number: Option<String>,
    pub birth_date: Option<String>,
    pub receipt_date: Option<String>,
    pub user_id: Option<String>,
}

/// Series/number lookup query parameters
#[derive(Debug, Clone, Deserialize)]
pub struct PassportLookupQuery {
    pub series: String,
    pub number: String,
}

/// Passport response
#[derive(Debug, Clone, Serialize)]
pub struct PassportResponse {
    pub id: String,
    pub passport_series: String,
    pub passport_number: String,
    pub birth_date: String,
    pub receipt_date: String,
    pub user_id: String,
    pub created_at: String,
    pub updated_at: String,
}

impl From<&Passport> for PassportResponse {
    fn from(passport: &Passport) -> Self {
        Self {
            id: passport.id().to_string(),
            passport_series: passport.passport_series().to_string(),
            passport_number: passport.passport_number().to_string(),
            birth_date: passport.birth_date().format("%Y-%m-%d").to_string(),
            receipt_date: passport.receipt_date().format("%Y-%m-%d").to_string(),
            user_id: passport.user_id().to_string(),
            created_at: passport.created_at().to_rfc3339(),
            updated_at: passport.updated_at().to_rfc3339(),
        }
    }
}

/// List passports response
#[derive(Debug, Clone, Serialize)]
pub struct ListPassportsResponse {
    pub passports: Vec<PassportResponse>,
    pub total: usize,
}

/// POST /v1/passports
pub async fn create_passport(
    State(state): State<AppState>,
    Json(request): Json<CreatePassportApiRequest>,
) -> Result<(StatusCode, Json<PassportResponse>), ApiError> {
    debug!(user_id = %request.user_id, "Registering passport");

    let service_request = CreatePassportRequest {
        passport_series: request.passport_series,
        passport_number: request.passport_number,
        birth_date: request.birth_date,
        receipt_date: request.receipt_date,
        user_id: request.user_id,
    };

    let passport = state
        .passport_service
        .create(service_request)
        .await
        .map_err(ApiError::from)?;

    Ok((StatusCode::CREATED, Json(PassportResponse::from(&passport))))
}

/// GET /v1/passports/lookup
pub async fn lookup_passport(
    State(state): State<AppState>,
    Query(query): Query<PassportLookupQuery>,
) -> Result<Json<PassportResponse>, ApiError> {
    debug!(series = %query.series, number = %query.number, "Looking up passport");

    let passport = state
        .passport_service
        .get_by_series_and_number(&query.series, &query.number)
        .await
        .map_err(ApiError::from)?;

    Ok(Json(PassportResponse::from(&passport)))
}

/// GET /v1/passports/{passport_id}
pub async fn get_passport(
    State(state): State<AppState>,
    Path(passport_id): Path<String>,
) -> Result<Json<PassportResponse>, ApiError> {
    debug!(passport_id = %passport_id, "Getting passport");

    let passport = state
        .passport_service
        .get(&passport_id)
        .await
        .map_err(ApiError::from)?;

    Ok(Json(PassportResponse::from(&passport)))
}

/// GET /v1/users/{user_id}/passports
pub async fn list_user_passports(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<Json<ListPassportsResponse>, ApiError> {
    debug!(user_id = %user_id, "Listing passports for user");

    let passports = state
        .passport_service
        .list_by_user(&user_id)
        .await
        .map_err(ApiError::from)?;

    let passport_responses: Vec<PassportResponse> =
        passports.iter().map(PassportResponse::from).collect();
    let total = passport_responses.len();

    Ok(Json(ListPassportsResponse {
        passports: passport_responses,
        total,
    }))
}

/// PUT /v1/passports/{passport_id}
pub async fn update_passport(
    State(state): State<AppState>,
    Path(passport_id): Path<String>,
    Json(request): Json<UpdatePassportApiRequest>,
) -> Result<Json<PassportResponse>, ApiError> {
    debug!(passport_id = %passport_id, "Updating passport");

    let service_request = UpdatePassportRequest {
        passport_series: request.passport_series,
        passport_number: request.passport_number,
        birth_date: request.birth_date,
        receipt_date: request.receipt_date,
        user_id: request.user_id,
    };

    let passport = state
        .passport_service
        .update(&passport_id, service_request)
        .await
        .map_err(ApiError::from)?;

    Ok(Json(PassportResponse::from(&passport)))
}

/// DELETE /v1/passports/{passport_id}
pub async fn delete_passport(
    State(state): State<AppState>,
    Path(passport_id): Path<String>,
) -> Result<Json<serde_json::Value>, ApiError> {
    debug!(passport_id = %passport_id, "Deleting passport");

    state
        .passport_service
        .delete(&passport_id)
        .await
        .map_err(ApiError::from)?;

    Ok(Json(serde_json::json!({
        "deleted": true,
        "id": passport_id
    })))
}
