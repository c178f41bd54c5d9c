//! Authentication API handlers

use crate::domain::{LoginRequest, LoginResponse};
use crate::error::Result;
use crate::server::AppState;
use axum::{extract::State, Json};

/// Authenticate a staff account
///
/// Field validation, credential checks and token issuance all live in the
/// auth service; this handler is glue.
pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<LoginResponse>> {
    let response = state.auth_service.login(request).await?;
    Ok(Json(response))
}
