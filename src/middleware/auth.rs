//! Authentication enforcement middleware
//!
//! Protects every `/api/*` route except login. A request without a
//! well-formed `Bearer` token is rejected 401; a Bearer token that fails
//! verification is rejected 403. On success the verified identity is
//! attached to request extensions for downstream handlers.

use axum::{
    body::Body,
    extract::State,
    http::{header::AUTHORIZATION, Request},
    middleware::Next,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::AppError;
use crate::jwt::JwtManager;

/// Shared state for the authentication middleware
#[derive(Clone)]
pub struct AuthState {
    jwt_manager: JwtManager,
}

impl AuthState {
    pub fn new(jwt_manager: JwtManager) -> Self {
        Self { jwt_manager }
    }
}

/// Verified identity attached to request extensions
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthUser {
    pub id: Uuid,
    pub email: String,
}

/// Authentication enforcement middleware
///
/// The middleware never touches the store; its only side effect is the
/// `AuthUser` extension, so it is idempotent.
pub async fn require_auth(
    State(auth): State<AuthState>,
    mut request: Request<Body>,
    next: Next,
) -> Response {
    // An absent header and a malformed one (wrong scheme, bad encoding)
    // are the same outcome: there is no token to verify.
    let token = match request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|header| header.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
    {
        Some(token) => token.to_string(),
        None => {
            return AppError::Unauthorized("Token manquant".to_string()).into_response();
        }
    };

    let claims = match auth.jwt_manager.verify_token(&token) {
        Ok(claims) => claims,
        Err(err) => {
            tracing::warn!("Rejected token: {}", err);
            return AppError::Forbidden("Token invalide".to_string()).into_response();
        }
    };

    let id = match claims.user_id() {
        Ok(id) => id,
        Err(_) => {
            return AppError::Forbidden("Token invalide".to_string()).into_response();
        }
    };

    request.extensions_mut().insert(AuthUser {
        id,
        email: claims.email,
    });

    next.run(request).await
}
