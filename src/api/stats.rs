//! Statistics API handlers

use crate::error::Result;
use crate::server::AppState;
use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatsResponse {
    pub total_membres: i64,
}

/// Registry-wide counters
pub async fn statistiques(State(state): State<AppState>) -> Result<Json<StatsResponse>> {
    let total_membres = state.member_service.count().await?;
    Ok(Json(StatsResponse { total_membres }))
}
