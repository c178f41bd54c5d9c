//! Member API handlers

use crate::api::MessageResponse;
use crate::domain::{Member, MemberInput, SearchQuery};
use crate::error::Result;
use crate::server::AppState;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Creation response carrying the stored record
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateMemberResponse {
    pub message: String,
    pub membre: Member,
}

/// Create a member
pub async fn create(
    State(state): State<AppState>,
    Json(input): Json<MemberInput>,
) -> Result<impl IntoResponse> {
    let membre = state.member_service.create(input).await?;

    Ok((
        StatusCode::CREATED,
        Json(CreateMemberResponse {
            message: "Membre ajouté avec succès".to_string(),
            membre,
        }),
    ))
}

/// List all members, newest first
pub async fn list(State(state): State<AppState>) -> Result<Json<Vec<Member>>> {
    let members = state.member_service.list().await?;
    Ok(Json(members))
}

/// Get a member by ID
pub async fn get(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Member>> {
    let member = state.member_service.get(id).await?;
    Ok(Json(member))
}

/// Update a member
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(input): Json<MemberInput>,
) -> Result<Json<MessageResponse>> {
    state.member_service.update(id, input).await?;
    Ok(Json(MessageResponse::new("Membre modifié avec succès")))
}

/// Delete a member (permanent, no tombstone)
pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<MessageResponse>> {
    state.member_service.delete(id).await?;
    Ok(Json(MessageResponse::new("Membre supprimé avec succès")))
}

/// Search members by substring over nom, prenom, email and phone
pub async fn search(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> Result<Json<Vec<Member>>> {
    let members = state.member_service.search(query.q).await?;
    Ok(Json(members))
}
