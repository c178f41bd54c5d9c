//! Database schema migration and bootstrap account seeding

use crate::config::BootstrapAccount;
use crate::crypto;
use crate::domain::User;
use crate::error::Result;
use crate::repository::{Db, UserRepository};
use chrono::Utc;
use tracing::{debug, info};
use uuid::Uuid;

const SQLITE_SCHEMA: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS utilisateurs (
        id BLOB PRIMARY KEY,
        email TEXT NOT NULL UNIQUE,
        mot_de_passe TEXT NOT NULL,
        nom TEXT NOT NULL,
        created_at TEXT NOT NULL
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS membres (
        id BLOB PRIMARY KEY,
        nom TEXT NOT NULL,
        prenom TEXT NOT NULL,
        phone TEXT,
        email TEXT,
        adresse TEXT,
        statut_matrimonial TEXT,
        nombre_enfants INTEGER,
        nationalite TEXT,
        langue_parlee TEXT,
        niveau_etude TEXT,
        created_at TEXT NOT NULL,
        updated_at TEXT NOT NULL
    )
    "#,
];

const POSTGRES_SCHEMA: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS utilisateurs (
        id UUID PRIMARY KEY,
        email TEXT NOT NULL UNIQUE,
        mot_de_passe TEXT NOT NULL,
        nom TEXT NOT NULL,
        created_at TIMESTAMPTZ NOT NULL
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS membres (
        id UUID PRIMARY KEY,
        nom TEXT NOT NULL,
        prenom TEXT NOT NULL,
        phone TEXT,
        email TEXT,
        adresse TEXT,
        statut_matrimonial TEXT,
        nombre_enfants INTEGER,
        nationalite TEXT,
        langue_parlee TEXT,
        niveau_etude TEXT,
        created_at TIMESTAMPTZ NOT NULL,
        updated_at TIMESTAMPTZ NOT NULL
    )
    "#,
];

/// Create missing tables for the active backend
pub async fn run_migrations(db: &Db) -> Result<()> {
    match db {
        Db::Sqlite(pool) => {
            for statement in SQLITE_SCHEMA {
                sqlx::query(statement).execute(pool).await?;
            }
        }
        Db::Postgres(pool) => {
            for statement in POSTGRES_SCHEMA {
                sqlx::query(statement).execute(pool).await?;
            }
        }
    }
    info!("Database schema is up to date");
    Ok(())
}

/// Seed bootstrap accounts, insert-if-absent
///
/// Idempotent across restarts: an account whose email already exists is
/// left untouched, and each default password is hashed exactly once,
/// right before its insert.
pub async fn seed_accounts(
    repo: &dyn UserRepository,
    accounts: &[BootstrapAccount],
) -> Result<()> {
    for account in accounts {
        if repo.find_by_email(&account.email).await?.is_some() {
            debug!("Bootstrap account {} already exists", account.email);
            continue;
        }

        let user = User {
            id: Uuid::new_v4(),
            email: account.email.clone(),
            mot_de_passe: crypto::hash_password(&account.password)?,
            nom: account.nom.clone(),
            created_at: Utc::now(),
        };
        repo.insert(&user).await?;
        info!("Bootstrap account created: {}", account.email);
    }
    Ok(())
}
