// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Estate Ledger contributors

//! Registration and login.

use axum::{extract::State, http::StatusCode, Json};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::{
    auth::{self, CredentialError},
    error::ApiError,
    models::UserProfile,
    state::AppState,
};

#[derive(Debug, Deserialize, ToSchema)]
pub struct RegisterRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct LoginRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct RegisterResponse {
    pub success: bool,
    pub message: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct LoginResponse {
    pub success: bool,
    pub user: UserProfile,
}

fn credential_error(err: CredentialError, development: bool) -> ApiError {
    match err {
        CredentialError::Validation(message) => ApiError::bad_request(message),
        CredentialError::DuplicateEmail => ApiError::bad_request("Email is already in use"),
        // Login failures share one message so the response does not
        // reveal which emails have accounts.
        CredentialError::UnknownEmail | CredentialError::BadPassword => {
            ApiError::unauthorized("Invalid email or password")
        }
        CredentialError::CorruptHash => ApiError::internal("stored credential is invalid", false),
        CredentialError::Hashing(detail) => ApiError::internal(detail, development),
        CredentialError::Storage(e) => ApiError::internal(e, development),
    }
}

/// Create an account.
#[utoipa::path(
    post,
    path = "/api/register",
    tag = "Users",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "Account created", body = RegisterResponse),
        (status = 400, description = "Missing fields or duplicate email"),
        (status = 500, description = "Store unavailable")
    )
)]
pub async fn register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<RegisterResponse>), ApiError> {
    let user_id = auth::register(&state.pool, &req.name, &req.email, &req.password)
        .await
        .map_err(|e| credential_error(e, state.config.development))?;

    tracing::info!(user_id, "registered account");

    Ok((
        StatusCode::CREATED,
        Json(RegisterResponse {
            success: true,
            message: "Registration successful".to_string(),
        }),
    ))
}

/// Confirm a credential and return the profile, hash stripped.
#[utoipa::path(
    post,
    path = "/api/login",
    tag = "Users",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Credential confirmed", body = LoginResponse),
        (status = 400, description = "Missing fields"),
        (status = 401, description = "Unknown email or wrong password"),
        (status = 500, description = "Store unavailable")
    )
)]
pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, ApiError> {
    let user = auth::login(&state.pool, &req.email, &req.password)
        .await
        .map_err(|e| credential_error(e, state.config.development))?;

    Ok(Json(LoginResponse {
        success: true,
        user,
    }))
}
