//! Staff account domain model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Staff account entity (`utilisateurs` table)
///
/// Deliberately not `Serialize`: the password hash must never be written
/// into a response. API responses carry a [`UserSummary`] instead.
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    /// bcrypt hash of the account password
    pub mot_de_passe: String,
    pub nom: String,
    pub created_at: DateTime<Utc>,
}

/// Non-sensitive account projection for API responses
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserSummary {
    pub id: Uuid,
    pub email: String,
    pub nom: String,
}

impl From<&User> for UserSummary {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            email: user.email.clone(),
            nom: user.nom.clone(),
        }
    }
}

/// Login request body
///
/// Both fields are optional at the serde level so that an absent field
/// reaches the service and is answered with the contract's 400 rather
/// than a deserialization rejection.
#[derive(Debug, Clone, Deserialize)]
pub struct LoginRequest {
    pub email: Option<String>,
    pub mot_de_passe: Option<String>,
}

/// Successful login response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginResponse {
    pub message: String,
    pub token: String,
    pub user: UserSummary,
}
