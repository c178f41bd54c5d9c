//! Member record repository
//!
//! Two implementations of the same capability: an embedded SQLite store
//! and a hosted PostgreSQL one. They differ in placeholder syntax and in
//! how case-insensitive matching is spelled, nothing else.

use crate::domain::Member;
use crate::error::{AppError, Result};
use async_trait::async_trait;
use sqlx::{PgPool, SqlitePool};
use uuid::Uuid;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MemberRepository: Send + Sync {
    async fn insert(&self, member: &Member) -> Result<()>;
    /// All records, newest first
    async fn list(&self) -> Result<Vec<Member>>;
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Member>>;
    /// Overwrite the row identified by `member.id`
    async fn update(&self, member: &Member) -> Result<()>;
    /// Permanent removal, no tombstone
    async fn delete(&self, id: Uuid) -> Result<()>;
    /// Case-insensitive substring match over nom, prenom, email and phone,
    /// newest first. Callers validate the query before reaching here.
    async fn search(&self, query: &str) -> Result<Vec<Member>>;
    async fn count(&self) -> Result<i64>;
}

const COLUMNS: &str = "id, nom, prenom, phone, email, adresse, statut_matrimonial, \
                       nombre_enfants, nationalite, langue_parlee, niveau_etude, \
                       created_at, updated_at";

fn not_found() -> AppError {
    AppError::NotFound("Membre non trouvé".to_string())
}

// Both backends bind in the same order: record fields first, id last on
// updates, so the query builders below stay in lockstep with the SQL.
macro_rules! bind_member_fields {
    ($query:expr, $member:expr) => {
        $query
            .bind(&$member.nom)
            .bind(&$member.prenom)
            .bind(&$member.phone)
            .bind(&$member.email)
            .bind(&$member.adresse)
            .bind(&$member.statut_matrimonial)
            .bind($member.nombre_enfants)
            .bind(&$member.nationalite)
            .bind(&$member.langue_parlee)
            .bind(&$member.niveau_etude)
    };
}

pub struct SqliteMemberRepository {
    pool: SqlitePool,
}

impl SqliteMemberRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl MemberRepository for SqliteMemberRepository {
    async fn insert(&self, member: &Member) -> Result<()> {
        let sql = "INSERT INTO membres (id, nom, prenom, phone, email, adresse, \
                   statut_matrimonial, nombre_enfants, nationalite, langue_parlee, \
                   niveau_etude, created_at, updated_at) \
                   VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)";
        bind_member_fields!(sqlx::query(sql).bind(member.id), member)
            .bind(member.created_at)
            .bind(member.updated_at)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn list(&self) -> Result<Vec<Member>> {
        let sql = format!("SELECT {COLUMNS} FROM membres ORDER BY created_at DESC");
        let members = sqlx::query_as::<_, Member>(&sql)
            .fetch_all(&self.pool)
            .await?;
        Ok(members)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Member>> {
        let sql = format!("SELECT {COLUMNS} FROM membres WHERE id = ?");
        let member = sqlx::query_as::<_, Member>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(member)
    }

    async fn update(&self, member: &Member) -> Result<()> {
        let sql = "UPDATE membres SET \
                   nom = ?, prenom = ?, phone = ?, email = ?, adresse = ?, \
                   statut_matrimonial = ?, nombre_enfants = ?, nationalite = ?, \
                   langue_parlee = ?, niveau_etude = ?, updated_at = ? \
                   WHERE id = ?";
        let result = bind_member_fields!(sqlx::query(sql), member)
            .bind(member.updated_at)
            .bind(member.id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(not_found());
        }
        Ok(())
    }

    async fn delete(&self, id: Uuid) -> Result<()> {
        let result = sqlx::query("DELETE FROM membres WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(not_found());
        }
        Ok(())
    }

    async fn search(&self, query: &str) -> Result<Vec<Member>> {
        // SQLite's LIKE is only case-insensitive for ASCII; lowering both
        // sides keeps the two backends in agreement.
        let pattern = format!("%{}%", query.to_lowercase());
        let sql = format!(
            "SELECT {COLUMNS} FROM membres \
             WHERE LOWER(nom) LIKE ?1 OR LOWER(prenom) LIKE ?1 \
                OR LOWER(email) LIKE ?1 OR LOWER(phone) LIKE ?1 \
             ORDER BY created_at DESC"
        );
        let members = sqlx::query_as::<_, Member>(&sql)
            .bind(pattern)
            .fetch_all(&self.pool)
            .await?;
        Ok(members)
    }

    async fn count(&self) -> Result<i64> {
        let row: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM membres")
            .fetch_one(&self.pool)
            .await?;
        Ok(row.0)
    }
}

pub struct PgMemberRepository {
    pool: PgPool,
}

impl PgMemberRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl MemberRepository for PgMemberRepository {
    async fn insert(&self, member: &Member) -> Result<()> {
        let sql = "INSERT INTO membres (id, nom, prenom, phone, email, adresse, \
                   statut_matrimonial, nombre_enfants, nationalite, langue_parlee, \
                   niveau_etude, created_at, updated_at) \
                   VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)";
        bind_member_fields!(sqlx::query(sql).bind(member.id), member)
            .bind(member.created_at)
            .bind(member.updated_at)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn list(&self) -> Result<Vec<Member>> {
        let sql = format!("SELECT {COLUMNS} FROM membres ORDER BY created_at DESC");
        let members = sqlx::query_as::<_, Member>(&sql)
            .fetch_all(&self.pool)
            .await?;
        Ok(members)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Member>> {
        let sql = format!("SELECT {COLUMNS} FROM membres WHERE id = $1");
        let member = sqlx::query_as::<_, Member>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(member)
    }

    async fn update(&self, member: &Member) -> Result<()> {
        let sql = "UPDATE membres SET \
                   nom = $1, prenom = $2, phone = $3, email = $4, adresse = $5, \
                   statut_matrimonial = $6, nombre_enfants = $7, nationalite = $8, \
                   langue_parlee = $9, niveau_etude = $10, updated_at = $11 \
                   WHERE id = $12";
        let result = bind_member_fields!(sqlx::query(sql), member)
            .bind(member.updated_at)
            .bind(member.id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(not_found());
        }
        Ok(())
    }

    async fn delete(&self, id: Uuid) -> Result<()> {
        let result = sqlx::query("DELETE FROM membres WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(not_found());
        }
        Ok(())
    }

    async fn search(&self, query: &str) -> Result<Vec<Member>> {
        let pattern = format!("%{}%", query);
        let sql = format!(
            "SELECT {COLUMNS} FROM membres \
             WHERE nom ILIKE $1 OR prenom ILIKE $1 \
                OR email ILIKE $1 OR phone ILIKE $1 \
             ORDER BY created_at DESC"
        );
        let members = sqlx::query_as::<_, Member>(&sql)
            .bind(pattern)
            .fetch_all(&self.pool)
            .await?;
        Ok(members)
    }

    async fn count(&self) -> Result<i64> {
        let row: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM membres")
            .fetch_one(&self.pool)
            .await?;
        Ok(row.0)
    }
}
