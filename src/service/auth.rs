//! Authentication business logic

use crate::crypto;
use crate::domain::{LoginRequest, LoginResponse, UserSummary};
use crate::error::{AppError, Result};
use crate::jwt::JwtManager;
use crate::repository::UserRepository;
use std::sync::Arc;
use tracing::{info, warn};

const INVALID_CREDENTIALS: &str = "Identifiants incorrects";
const MISSING_FIELDS: &str = "Email et mot de passe requis";

pub struct AuthService {
    user_repo: Arc<dyn UserRepository>,
    jwt_manager: JwtManager,
}

impl AuthService {
    pub fn new(user_repo: Arc<dyn UserRepository>, jwt_manager: JwtManager) -> Self {
        Self {
            user_repo,
            jwt_manager,
        }
    }

    /// Authenticate a staff account and issue a session token
    ///
    /// "No such account" and "wrong password" collapse into one 401 body,
    /// and the unknown-email path still pays a bcrypt comparison so the
    /// two are indistinguishable by timing as well. Store failures are a
    /// 500 with the generic body, never a 401.
    pub async fn login(&self, request: LoginRequest) -> Result<LoginResponse> {
        let email = match request.email.as_deref() {
            Some(e) if !e.is_empty() => e,
            _ => return Err(AppError::BadRequest(MISSING_FIELDS.to_string())),
        };
        let mot_de_passe = match request.mot_de_passe.as_deref() {
            Some(p) if !p.is_empty() => p,
            _ => return Err(AppError::BadRequest(MISSING_FIELDS.to_string())),
        };

        let user = match self.user_repo.find_by_email(email).await? {
            Some(user) => user,
            None => {
                let _ = crypto::verify_password(mot_de_passe, crypto::dummy_hash());
                warn!("Login attempt for unknown account");
                return Err(AppError::Unauthorized(INVALID_CREDENTIALS.to_string()));
            }
        };

        // A stored hash that fails to parse counts as a mismatch
        let valid = crypto::verify_password(mot_de_passe, &user.mot_de_passe).unwrap_or(false);
        if !valid {
            warn!("Invalid password for account {}", user.id);
            return Err(AppError::Unauthorized(INVALID_CREDENTIALS.to_string()));
        }

        let token = self.jwt_manager.create_token(user.id, &user.email)?;
        info!("Account {} logged in", user.id);

        Ok(LoginResponse {
            message: "Connexion réussie".to_string(),
            token,
            user: UserSummary::from(&user),
        })
    }
}
