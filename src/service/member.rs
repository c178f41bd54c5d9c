//! Member record business logic

use crate::domain::{Member, MemberInput};
use crate::error::{AppError, Result};
use crate::repository::MemberRepository;
use std::sync::Arc;
use tracing::info;
use validator::Validate;

const REQUIRED_FIELDS: &str = "Nom et prénom sont requis";
const INVALID_QUERY: &str = "Paramètre de recherche invalide";
const NOT_FOUND: &str = "Membre non trouvé";

/// Maximum accepted length for a search query
const MAX_QUERY_LEN: usize = 100;

pub struct MemberService {
    member_repo: Arc<dyn MemberRepository>,
}

impl MemberService {
    pub fn new(member_repo: Arc<dyn MemberRepository>) -> Self {
        Self { member_repo }
    }

    /// Create a member record. `nom` and `prenom` are required and
    /// non-empty; everything else is stored as given.
    pub async fn create(&self, input: MemberInput) -> Result<Member> {
        let (nom, prenom) = required_fields(&input)?;

        let member = Member::new(nom, prenom, input);
        self.member_repo.insert(&member).await?;

        info!("Member {} created", member.id);
        Ok(member)
    }

    pub async fn list(&self) -> Result<Vec<Member>> {
        self.member_repo.list().await
    }

    pub async fn get(&self, id: uuid::Uuid) -> Result<Member> {
        self.member_repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(NOT_FOUND.to_string()))
    }

    /// Update a member record. Validation matches `create`; the identifier
    /// and creation timestamp never change, the update timestamp always does.
    pub async fn update(&self, id: uuid::Uuid, input: MemberInput) -> Result<Member> {
        let (nom, prenom) = required_fields(&input)?;

        let existing = self.get(id).await?;
        let member = existing.apply_update(nom, prenom, input);
        self.member_repo.update(&member).await?;

        info!("Member {} updated", member.id);
        Ok(member)
    }

    pub async fn delete(&self, id: uuid::Uuid) -> Result<()> {
        self.member_repo.delete(id).await?;
        info!("Member {} deleted", id);
        Ok(())
    }

    /// Case-insensitive substring search over nom, prenom, email and phone
    pub async fn search(&self, query: Option<String>) -> Result<Vec<Member>> {
        let query = match query {
            Some(q) if !q.is_empty() && q.chars().count() <= MAX_QUERY_LEN => q,
            _ => return Err(AppError::BadRequest(INVALID_QUERY.to_string())),
        };

        self.member_repo.search(&query).await
    }

    pub async fn count(&self) -> Result<i64> {
        self.member_repo.count().await
    }
}

/// Enforce the required-field contract shared by create and update
fn required_fields(input: &MemberInput) -> Result<(String, String)> {
    let nom = input.nom.as_deref().unwrap_or("");
    let prenom = input.prenom.as_deref().unwrap_or("");
    if nom.is_empty() || prenom.is_empty() {
        return Err(AppError::BadRequest(REQUIRED_FIELDS.to_string()));
    }

    input
        .validate()
        .map_err(|e| AppError::BadRequest(first_validation_message(&e)))?;

    Ok((nom.to_string(), prenom.to_string()))
}

fn first_validation_message(errors: &validator::ValidationErrors) -> String {
    errors
        .field_errors()
        .values()
        .flat_map(|errs| errs.iter())
        .find_map(|err| err.message.as_ref().map(|m| m.to_string()))
        .unwrap_or_else(|| "Requête invalide".to_string())
}
