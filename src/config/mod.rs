//! Configuration management for Registre Core

use anyhow::{Context, Result};
use std::env;

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// HTTP server host
    pub http_host: String,
    /// HTTP server port
    pub http_port: u16,
    /// Database configuration
    pub database: DatabaseConfig,
    /// JWT configuration
    pub jwt: JwtConfig,
    /// Rate limiting configuration
    pub rate_limit: RateLimitConfig,
    /// Bootstrap accounts seeded at startup
    pub bootstrap: Vec<BootstrapAccount>,
}

#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    /// Connection URL; the scheme (`sqlite:` or `postgres:`) selects the backend
    pub url: String,
    pub max_connections: u32,
    pub min_connections: u32,
}

#[derive(Debug, Clone)]
pub struct JwtConfig {
    /// HS256 signing secret. Injected, never defaulted; rotating it
    /// invalidates every outstanding token.
    pub secret: String,
    /// Token lifetime in seconds
    pub token_ttl_secs: i64,
}

/// Rate limiting configuration
///
/// One fixed window shared by both limiter instances; the API-wide and
/// login-only instances differ only in their request cap.
#[derive(Debug, Clone)]
pub struct RateLimitConfig {
    /// Whether rate limiting is enabled
    pub enabled: bool,
    /// Requests per window across the whole API surface
    pub api_requests: u64,
    /// Requests per window on the login route
    pub login_requests: u64,
    /// Window size in seconds
    pub window_secs: u64,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            api_requests: 100,
            login_requests: 5,
            window_secs: 15 * 60,
        }
    }
}

/// A staff account created at startup if absent
#[derive(Debug, Clone)]
pub struct BootstrapAccount {
    pub email: String,
    pub password: String,
    pub nom: String,
}

impl Config {
    /// Load configuration from environment variables
    ///
    /// The signing secret and both bootstrap credential pairs are required:
    /// startup fails rather than falling back to a baked-in value.
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            http_host: env::var("HTTP_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            http_port: env::var("HTTP_PORT")
                .unwrap_or_else(|_| "3000".to_string())
                .parse()
                .context("Invalid HTTP_PORT")?,
            database: DatabaseConfig {
                url: env::var("DATABASE_URL").context("DATABASE_URL is required")?,
                max_connections: env::var("DATABASE_MAX_CONNECTIONS")
                    .unwrap_or_else(|_| "10".to_string())
                    .parse()
                    .unwrap_or(10),
                min_connections: env::var("DATABASE_MIN_CONNECTIONS")
                    .unwrap_or_else(|_| "2".to_string())
                    .parse()
                    .unwrap_or(2),
            },
            jwt: JwtConfig {
                secret: env::var("JWT_SECRET").context("JWT_SECRET is required")?,
                token_ttl_secs: env::var("JWT_TOKEN_TTL_SECS")
                    .unwrap_or_else(|_| "86400".to_string())
                    .parse()
                    .unwrap_or(86400),
            },
            rate_limit: RateLimitConfig {
                enabled: env::var("RATE_LIMIT_ENABLED")
                    .map(|s| s.to_lowercase() != "false")
                    .unwrap_or(true),
                api_requests: env::var("RATE_LIMIT_API_REQUESTS")
                    .unwrap_or_else(|_| "100".to_string())
                    .parse()
                    .unwrap_or(100),
                login_requests: env::var("RATE_LIMIT_LOGIN_REQUESTS")
                    .unwrap_or_else(|_| "5".to_string())
                    .parse()
                    .unwrap_or(5),
                window_secs: env::var("RATE_LIMIT_WINDOW_SECS")
                    .unwrap_or_else(|_| "900".to_string())
                    .parse()
                    .unwrap_or(900),
            },
            bootstrap: vec![
                BootstrapAccount {
                    email: env::var("BOOTSTRAP_ADMIN_EMAIL")
                        .context("BOOTSTRAP_ADMIN_EMAIL is required")?,
                    password: env::var("BOOTSTRAP_ADMIN_PASSWORD")
                        .context("BOOTSTRAP_ADMIN_PASSWORD is required")?,
                    nom: env::var("BOOTSTRAP_ADMIN_NOM")
                        .unwrap_or_else(|_| "Administrateur".to_string()),
                },
                BootstrapAccount {
                    email: env::var("BOOTSTRAP_PASTOR_EMAIL")
                        .context("BOOTSTRAP_PASTOR_EMAIL is required")?,
                    password: env::var("BOOTSTRAP_PASTOR_PASSWORD")
                        .context("BOOTSTRAP_PASTOR_PASSWORD is required")?,
                    nom: env::var("BOOTSTRAP_PASTOR_NOM")
                        .unwrap_or_else(|_| "Pasteur".to_string()),
                },
            ],
        })
    }

    /// Get HTTP server address
    pub fn http_addr(&self) -> String {
        format!("{}:{}", self.http_host, self.http_port)
    }
}
