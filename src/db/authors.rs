//! Authors database repository

use anyhow::Result;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[cfg(feature = "sqlite")]
use sqlx::SqlitePool;

use crate::db::sqlite_helpers::{date_to_str, in_placeholders, str_to_date};

#[cfg(feature = "sqlite")]
type DbPool = SqlitePool;

/// Author record from database
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthorRecord {
    pub id: i64,
    pub name: String,
    pub birth_date: NaiveDate,
}

#[cfg(feature = "sqlite")]
impl sqlx::FromRow<'_, sqlx::sqlite::SqliteRow> for AuthorRecord {
    fn from_row(row: &sqlx::sqlite::SqliteRow) -> sqlx::Result<Self> {
        use sqlx::Row;

        let birth_date: String = row.try_get("birth_date")?;

        Ok(Self {
            id: row.try_get("id")?,
            name: row.try_get("name")?,
            birth_date: str_to_date(&birth_date).map_err(|e| sqlx::Error::Decode(e.into()))?,
        })
    }
}

/// Input for creating an author
#[derive(Debug, Clone)]
pub struct CreateAuthor {
    pub name: String,
    pub birth_date: NaiveDate,
}

/// Input for updating an author. `None` leaves the column unchanged.
#[derive(Debug, Clone, Default)]
pub struct UpdateAuthor {
    pub name: Option<String>,
    pub birth_date: Option<NaiveDate>,
}

impl UpdateAuthor {
    /// Apply the supplied fields on top of an existing record
    pub fn apply_to(self, mut record: AuthorRecord) -> AuthorRecord {
        if let Some(name) = self.name {
            record.name = name;
        }
        if let Some(birth_date) = self.birth_date {
            record.birth_date = birth_date;
        }
        record
    }
}

/// Author repository
pub struct AuthorRepository {
    pool: DbPool,
}

impl AuthorRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// List all authors in storage order
    pub async fn list_all(&self) -> Result<Vec<AuthorRecord>> {
        let records = sqlx::query_as::<_, AuthorRecord>(
            "SELECT id, name, birth_date FROM authors ORDER BY id ASC",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(records)
    }

    /// Get an author by ID
    pub async fn get_by_id(&self, id: i64) -> Result<Option<AuthorRecord>> {
        let record = sqlx::query_as::<_, AuthorRecord>(
            "SELECT id, name, birth_date FROM authors WHERE id = ?1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(record)
    }

    /// Get several authors at once (used by the GraphQL loaders)
    pub async fn get_many(&self, ids: &[i64]) -> Result<Vec<AuthorRecord>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let sql = format!(
            "SELECT id, name, birth_date FROM authors WHERE id IN ({}) ORDER BY id ASC",
            in_placeholders(ids.len())
        );

        let mut query = sqlx::query_as::<_, AuthorRecord>(&sql);
        for id in ids {
            query = query.bind(id);
        }

        Ok(query.fetch_all(&self.pool).await?)
    }

    /// Insert a new author
    pub async fn create(&self, input: CreateAuthor) -> Result<AuthorRecord> {
        let record = sqlx::query_as::<_, AuthorRecord>(
            r#"
            INSERT INTO authors (name, birth_date)
            VALUES (?1, ?2)
            RETURNING id, name, birth_date
            "#,
        )
        .bind(&input.name)
        .bind(date_to_str(input.birth_date))
        .fetch_one(&self.pool)
        .await?;

        Ok(record)
    }

    /// Overwrite every mutable column of an existing author
    pub async fn save(&self, record: &AuthorRecord) -> Result<Option<AuthorRecord>> {
        let updated = sqlx::query_as::<_, AuthorRecord>(
            r#"
            UPDATE authors SET name = ?2, birth_date = ?3
            WHERE id = ?1
            RETURNING id, name, birth_date
            "#,
        )
        .bind(record.id)
        .bind(&record.name)
        .bind(date_to_str(record.birth_date))
        .fetch_optional(&self.pool)
        .await?;

        Ok(updated)
    }

    /// Delete an author. Owned books go with it (ON DELETE CASCADE).
    pub async fn delete(&self, id: i64) -> Result<bool> {
        let result = sqlx::query("DELETE FROM authors WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
