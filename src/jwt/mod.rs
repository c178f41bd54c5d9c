//! JWT token handling

use crate::config::JwtConfig;
use crate::error::{AppError, Result};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Session token claims
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (account ID)
    pub sub: String,
    /// Email
    pub email: String,
    /// Issued at (Unix timestamp)
    pub iat: i64,
    /// Expiration (Unix timestamp)
    pub exp: i64,
}

impl Claims {
    /// Parse the subject claim back into an account ID
    pub fn user_id(&self) -> Result<Uuid> {
        Uuid::parse_str(&self.sub).map_err(|_| AppError::Forbidden("Token invalide".to_string()))
    }
}

/// JWT token manager
///
/// Signs and verifies HS256 session tokens with a process-wide secret.
/// The server is stateless with respect to sessions: there is no
/// revocation list, and rotating the secret invalidates every
/// outstanding token.
#[derive(Clone)]
pub struct JwtManager {
    config: JwtConfig,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
}

impl JwtManager {
    pub fn new(config: JwtConfig) -> Self {
        let encoding_key = EncodingKey::from_secret(config.secret.as_bytes());
        let decoding_key = DecodingKey::from_secret(config.secret.as_bytes());
        Self {
            config,
            encoding_key,
            decoding_key,
        }
    }

    /// Create a Validation with a strict leeway (5 seconds) instead of the
    /// default 60 seconds, so tokens expire promptly while still tolerating
    /// minor clock skew.
    fn strict_validation(&self) -> Validation {
        let mut v = Validation::new(Algorithm::HS256);
        v.leeway = 5;
        v
    }

    /// Create a session token for an authenticated account
    pub fn create_token(&self, user_id: Uuid, email: &str) -> Result<String> {
        let now = Utc::now();
        let exp = now + Duration::seconds(self.config.token_ttl_secs);

        let claims = Claims {
            sub: user_id.to_string(),
            email: email.to_string(),
            iat: now.timestamp(),
            exp: exp.timestamp(),
        };
        let header = Header::new(Algorithm::HS256);
        Ok(encode(&header, &claims, &self.encoding_key)?)
    }

    /// Verify and decode a session token
    ///
    /// Every failure mode (malformed, expired, bad signature) yields the
    /// same uniform error so the caller cannot tell them apart.
    pub fn verify_token(&self, token: &str) -> Result<Claims> {
        let validation = self.strict_validation();
        decode::<Claims>(token, &self.decoding_key, &validation)
            .map(|data| data.claims)
            .map_err(|_| AppError::Forbidden("Token invalide".to_string()))
    }

    /// Get token lifetime in seconds
    pub fn token_ttl(&self) -> i64 {
        self.config.token_ttl_secs
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> JwtConfig {
        JwtConfig {
            secret: "test-secret-key-for-testing-purposes-only".to_string(),
            token_ttl_secs: 86400,
        }
    }

    #[test]
    fn test_create_and_verify_token() {
        let manager = JwtManager::new(test_config());
        let user_id = Uuid::new_v4();

        let token = manager.create_token(user_id, "admin@eglise.com").unwrap();
        let claims = manager.verify_token(&token).unwrap();

        assert_eq!(claims.sub, user_id.to_string());
        assert_eq!(claims.email, "admin@eglise.com");
        assert_eq!(claims.user_id().unwrap(), user_id);
    }

    #[test]
    fn test_token_expiry_is_24_hours_out() {
        let manager = JwtManager::new(test_config());
        let token = manager
            .create_token(Uuid::new_v4(), "admin@eglise.com")
            .unwrap();

        let claims = manager.verify_token(&token).unwrap();
        assert_eq!(claims.exp - claims.iat, 86400);
    }

    #[test]
    fn test_invalid_token() {
        let manager = JwtManager::new(test_config());

        let result = manager.verify_token("invalid-token");
        assert!(matches!(result, Err(AppError::Forbidden(_))));
    }

    #[test]
    fn test_expired_token_rejected() {
        let manager = JwtManager::new(test_config());

        let now = Utc::now().timestamp();
        let claims = Claims {
            sub: Uuid::new_v4().to_string(),
            email: "admin@eglise.com".to_string(),
            iat: now - 90_000,
            exp: now - 3_600,
        };
        let token = encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(test_config().secret.as_bytes()),
        )
        .unwrap();

        assert!(manager.verify_token(&token).is_err());
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let manager = JwtManager::new(test_config());
        let other = JwtManager::new(JwtConfig {
            secret: "a-completely-different-secret".to_string(),
            token_ttl_secs: 86400,
        });

        let token = other
            .create_token(Uuid::new_v4(), "admin@eglise.com")
            .unwrap();
        assert!(manager.verify_token(&token).is_err());
    }

    #[test]
    fn test_failure_reasons_are_uniform() {
        let manager = JwtManager::new(test_config());

        let malformed = manager.verify_token("not.a.jwt").unwrap_err();
        let garbage = manager.verify_token("garbage").unwrap_err();

        assert_eq!(malformed.to_string(), garbage.to_string());
    }

    #[test]
    fn test_claims_with_non_uuid_subject() {
        let claims = Claims {
            sub: "not-a-uuid".to_string(),
            email: "admin@eglise.com".to_string(),
            iat: 0,
            exp: 0,
        };
        assert!(claims.user_id().is_err());
    }

    #[test]
    fn test_token_has_valid_structure() {
        let manager = JwtManager::new(test_config());
        let token = manager
            .create_token(Uuid::new_v4(), "admin@eglise.com")
            .unwrap();

        let parts: Vec<&str> = token.split('.').collect();
        assert_eq!(parts.len(), 3);
        for part in parts {
            assert!(!part.is_empty());
        }
    }

    #[test]
    fn test_jwt_manager_clone() {
        let manager1 = JwtManager::new(test_config());
        let manager2 = manager1.clone();

        let user_id = Uuid::new_v4();
        let token = manager1.create_token(user_id, "admin@eglise.com").unwrap();

        let claims = manager2.verify_token(&token).unwrap();
        assert_eq!(claims.sub, user_id.to_string());
    }
}
