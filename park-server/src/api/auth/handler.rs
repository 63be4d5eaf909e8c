//! Auth API Handlers
//!
//! Single-admin login issuing the JWT that gates the management routes
//! and upgrades push channel connections to the admin audience.

use axum::{Json, extract::State};
use serde::{Deserialize, Serialize};

use crate::core::ServerState;
use crate::utils::{AppError, AppResult};

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub token: String,
    pub expires_in: i64,
}

/// POST /auth/login - 管理员登录，签发 JWT
pub async fn login(
    State(state): State<ServerState>,
    Json(payload): Json<LoginRequest>,
) -> AppResult<Json<LoginResponse>> {
    let config = &state.config;
    if payload.username != config.admin_username || payload.password != config.admin_password {
        tracing::warn!(username = %payload.username, "Failed admin login attempt");
        return Err(AppError::invalid_credentials());
    }

    let token = state
        .jwt_service
        .generate_token(&payload.username, &payload.username, "admin")
        .map_err(|e| AppError::internal(e.to_string()))?;

    Ok(Json(LoginResponse {
        token,
        expires_in: state.jwt_service.config.expiration_minutes * 60,
    }))
}
