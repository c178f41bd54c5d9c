//! Member record domain model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

/// Member entity (`membres` table)
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Member {
    pub id: Uuid,
    pub nom: String,
    pub prenom: String,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub adresse: Option<String>,
    pub statut_matrimonial: Option<String>,
    pub nombre_enfants: Option<i32>,
    pub nationalite: Option<String>,
    pub langue_parlee: Option<String>,
    pub niveau_etude: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Input for creating or updating a member
///
/// `nom` and `prenom` are required and non-empty; the presence check lives
/// in the service so an absent field gets the contract's 400. Optional
/// fields are stored exactly as given, no normalization.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct MemberInput {
    pub nom: Option<String>,
    pub prenom: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub adresse: Option<String>,
    pub statut_matrimonial: Option<String>,
    #[validate(range(min = 0, message = "Le nombre d'enfants doit être positif ou nul"))]
    pub nombre_enfants: Option<i32>,
    pub nationalite: Option<String>,
    pub langue_parlee: Option<String>,
    pub niveau_etude: Option<String>,
}

/// Query string for the member search endpoint
#[derive(Debug, Clone, Deserialize)]
pub struct SearchQuery {
    pub q: Option<String>,
}

impl Member {
    /// Build a new member from validated input, assigning a fresh ID and
    /// equal creation/update timestamps.
    pub fn new(nom: String, prenom: String, input: MemberInput) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            nom,
            prenom,
            phone: input.phone,
            email: input.email,
            adresse: input.adresse,
            statut_matrimonial: input.statut_matrimonial,
            nombre_enfants: input.nombre_enfants,
            nationalite: input.nationalite,
            langue_parlee: input.langue_parlee,
            niveau_etude: input.niveau_etude,
            created_at: now,
            updated_at: now,
        }
    }

    /// Apply an update on top of an existing record. The identifier and
    /// creation timestamp are immutable; the update timestamp refreshes.
    pub fn apply_update(&self, nom: String, prenom: String, input: MemberInput) -> Self {
        Self {
            id: self.id,
            nom,
            prenom,
            phone: input.phone,
            email: input.email,
            adresse: input.adresse,
            statut_matrimonial: input.statut_matrimonial,
            nombre_enfants: input.nombre_enfants,
            nationalite: input.nationalite,
            langue_parlee: input.langue_parlee,
            niveau_etude: input.niveau_etude,
            created_at: self.created_at,
            updated_at: Utc::now(),
        }
    }
}
