//! Users repository for authentication
//!
//! Handles login users and their refresh tokens.

use anyhow::Result;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[cfg(feature = "sqlite")]
use sqlx::SqlitePool as Pool;

use super::sqlite_helpers::{int_to_bool, now_iso8601};

// ============================================================================
// User Records
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserRecord {
    pub id: String,
    pub username: String,
    pub password_hash: String,
    pub is_active: bool,
    pub last_login_at: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

#[cfg(feature = "sqlite")]
impl sqlx::FromRow<'_, sqlx::sqlite::SqliteRow> for UserRecord {
    fn from_row(row: &sqlx::sqlite::SqliteRow) -> sqlx::Result<Self> {
        use sqlx::Row;

        let is_active: i32 = row.try_get("is_active")?;

        Ok(Self {
            id: row.try_get("id")?,
            username: row.try_get("username")?,
            password_hash: row.try_get("password_hash")?,
            is_active: int_to_bool(is_active),
            last_login_at: row.try_get("last_login_at")?,
            created_at: row.try_get("created_at")?,
            updated_at: row.try_get("updated_at")?,
        })
    }
}

#[derive(Debug, Clone)]
pub struct CreateUser {
    pub username: String,
    pub password_hash: String,
}

// ============================================================================
// Refresh Token Records
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct RefreshTokenRecord {
    pub id: String,
    pub user_id: String,
    pub token_hash: String,
    pub expires_at: String,
    pub created_at: String,
}

const USER_COLUMNS: &str =
    "id, username, password_hash, is_active, last_login_at, created_at, updated_at";

// ============================================================================
// Repository
// ============================================================================

pub struct UsersRepository {
    pool: Pool,
}

impl UsersRepository {
    pub fn new(pool: Pool) -> Self {
        Self { pool }
    }

    // ========================================================================
    // User CRUD
    // ========================================================================

    /// Create a new user
    pub async fn create(&self, user: CreateUser) -> Result<UserRecord> {
        let id = Uuid::new_v4().to_string();
        let now = now_iso8601();

        sqlx::query(
            r#"
            INSERT INTO users (id, username, password_hash, is_active, created_at, updated_at)
            VALUES (?, ?, ?, 1, ?, ?)
            "#,
        )
        .bind(&id)
        .bind(&user.username)
        .bind(&user.password_hash)
        .bind(&now)
        .bind(&now)
        .execute(&self.pool)
        .await?;

        self.get_by_id(&id).await?.ok_or_else(|| anyhow::anyhow!("Failed to create user"))
    }

    /// Get user by ID
    pub async fn get_by_id(&self, id: &str) -> Result<Option<UserRecord>> {
        let sql = format!("SELECT {} FROM users WHERE id = ?", USER_COLUMNS);
        let row = sqlx::query_as::<_, UserRecord>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row)
    }

    /// Get user by username (case-insensitive)
    pub async fn get_by_username(&self, username: &str) -> Result<Option<UserRecord>> {
        let sql = format!(
            "SELECT {} FROM users WHERE username = ? COLLATE NOCASE",
            USER_COLUMNS
        );
        let row = sqlx::query_as::<_, UserRecord>(&sql)
            .bind(username)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row)
    }

    /// Update last login timestamp
    pub async fn update_last_login(&self, id: &str) -> Result<()> {
        let now = now_iso8601();
        sqlx::query("UPDATE users SET last_login_at = ?, updated_at = ? WHERE id = ?")
            .bind(&now)
            .bind(&now)
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    // ========================================================================
    // Refresh Tokens
    // ========================================================================

    /// Store the hash of an issued refresh token
    pub async fn create_refresh_token(
        &self,
        user_id: &str,
        token_hash: &str,
        expires_at: &str,
    ) -> Result<RefreshTokenRecord> {
        let id = Uuid::new_v4().to_string();
        let now = now_iso8601();

        let record = sqlx::query_as::<_, RefreshTokenRecord>(
            r#"
            INSERT INTO refresh_tokens (id, user_id, token_hash, expires_at, created_at)
            VALUES (?, ?, ?, ?, ?)
            RETURNING id, user_id, token_hash, expires_at, created_at
            "#,
        )
        .bind(&id)
        .bind(user_id)
        .bind(token_hash)
        .bind(expires_at)
        .bind(&now)
        .fetch_one(&self.pool)
        .await?;

        Ok(record)
    }

    /// Delete a refresh token by its hash and return the removed row.
    /// Of any concurrent callers for the same hash, at most one gets `Some`.
    pub async fn consume_refresh_token(
        &self,
        token_hash: &str,
    ) -> Result<Option<RefreshTokenRecord>> {
        let record = sqlx::query_as::<_, RefreshTokenRecord>(
            r#"
            DELETE FROM refresh_tokens WHERE token_hash = ?
            RETURNING id, user_id, token_hash, expires_at, created_at
            "#,
        )
        .bind(token_hash)
        .fetch_optional(&self.pool)
        .await?;

        Ok(record)
    }

    /// Remove refresh tokens whose expiry has passed
    pub async fn cleanup_expired_refresh_tokens(&self) -> Result<u64> {
        let result = sqlx::query("DELETE FROM refresh_tokens WHERE expires_at < ?")
            .bind(now_iso8601())
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected())
    }
}
