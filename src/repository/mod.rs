//! Data access layer (Repository pattern)
//!
//! Each store is a capability trait with one implementation per supported
//! backend. Route and service logic only ever see the traits, so either
//! backend substitutes without touching them.

pub mod member;
pub mod user;

pub use member::MemberRepository;
pub use user::UserRepository;

use anyhow::{bail, Context, Result};
use sqlx::postgres::PgPoolOptions;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::{PgPool, SqlitePool};
use std::str::FromStr;
use std::sync::Arc;

use crate::config::DatabaseConfig;
use member::{PgMemberRepository, SqliteMemberRepository};
use user::{PgUserRepository, SqliteUserRepository};

/// Database handle for the active backend
///
/// The connection URL scheme selects the backend at startup; everything
/// downstream works through the repository traits.
#[derive(Clone)]
pub enum Db {
    Sqlite(SqlitePool),
    Postgres(PgPool),
}

impl Db {
    /// Connect to the datastore named by the configuration
    pub async fn connect(config: &DatabaseConfig) -> Result<Self> {
        if config.url.starts_with("sqlite:") {
            let options = SqliteConnectOptions::from_str(&config.url)
                .context("Invalid DATABASE_URL")?
                .create_if_missing(true);
            let pool = SqlitePoolOptions::new()
                .max_connections(config.max_connections)
                .min_connections(config.min_connections)
                .connect_with(options)
                .await
                .context("Failed to connect to SQLite database")?;
            Ok(Db::Sqlite(pool))
        } else if config.url.starts_with("postgres:") || config.url.starts_with("postgresql:") {
            let pool = PgPoolOptions::new()
                .max_connections(config.max_connections)
                .min_connections(config.min_connections)
                .connect(&config.url)
                .await
                .context("Failed to connect to PostgreSQL database")?;
            Ok(Db::Postgres(pool))
        } else {
            bail!("Unsupported DATABASE_URL scheme: {}", config.url);
        }
    }

    /// Build the user repository for this backend
    pub fn user_repository(&self) -> Arc<dyn UserRepository> {
        match self {
            Db::Sqlite(pool) => Arc::new(SqliteUserRepository::new(pool.clone())),
            Db::Postgres(pool) => Arc::new(PgUserRepository::new(pool.clone())),
        }
    }

    /// Build the member repository for this backend
    pub fn member_repository(&self) -> Arc<dyn MemberRepository> {
        match self {
            Db::Sqlite(pool) => Arc::new(SqliteMemberRepository::new(pool.clone())),
            Db::Postgres(pool) => Arc::new(PgMemberRepository::new(pool.clone())),
        }
    }
}
