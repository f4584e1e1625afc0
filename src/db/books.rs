//! Books database repository

use std::collections::HashMap;

use anyhow::Result;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[cfg(feature = "sqlite")]
use sqlx::SqlitePool;

use crate::db::sqlite_helpers::{date_to_str, in_placeholders, str_to_date};

#[cfg(feature = "sqlite")]
type DbPool = SqlitePool;

const BOOK_COLUMNS: &str = "id, title, author_id, published_date";

/// Book record from database
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookRecord {
    pub id: i64,
    pub title: String,
    pub author_id: i64,
    pub published_date: NaiveDate,
}

#[cfg(feature = "sqlite")]
impl sqlx::FromRow<'_, sqlx::sqlite::SqliteRow> for BookRecord {
    fn from_row(row: &sqlx::sqlite::SqliteRow) -> sqlx::Result<Self> {
        use sqlx::Row;

        let published: String = row.try_get("published_date")?;

        Ok(Self {
            id: row.try_get("id")?,
            title: row.try_get("title")?,
            author_id: row.try_get("author_id")?,
            published_date: str_to_date(&published).map_err(|e| sqlx::Error::Decode(e.into()))?,
        })
    }
}

/// Input for creating a book
#[derive(Debug, Clone)]
pub struct CreateBook {
    pub title: String,
    pub author_id: i64,
    pub published_date: NaiveDate,
}

/// Input for updating a book. `None` leaves the column unchanged.
#[derive(Debug, Clone, Default)]
pub struct UpdateBook {
    pub title: Option<String>,
    pub author_id: Option<i64>,
    pub published_date: Option<NaiveDate>,
}

impl UpdateBook {
    /// Apply the supplied fields on top of an existing record
    pub fn apply_to(self, mut record: BookRecord) -> BookRecord {
        if let Some(title) = self.title {
            record.title = title;
        }
        if let Some(author_id) = self.author_id {
            record.author_id = author_id;
        }
        if let Some(published_date) = self.published_date {
            record.published_date = published_date;
        }
        record
    }
}

/// Book repository
pub struct BookRepository {
    pool: DbPool,
}

impl BookRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// List every book in storage order
    pub async fn list_all(&self) -> Result<Vec<BookRecord>> {
        let sql = format!("SELECT {} FROM books ORDER BY id ASC", BOOK_COLUMNS);
        let records = sqlx::query_as::<_, BookRecord>(&sql)
            .fetch_all(&self.pool)
            .await?;

        Ok(records)
    }

    /// List a slice of books in storage order
    pub async fn list_page(&self, offset: i64, limit: i64) -> Result<Vec<BookRecord>> {
        let sql = format!(
            "SELECT {} FROM books ORDER BY id ASC LIMIT ?1 OFFSET ?2",
            BOOK_COLUMNS
        );
        let records = sqlx::query_as::<_, BookRecord>(&sql)
            .bind(limit)
            .bind(offset)
            .fetch_all(&self.pool)
            .await?;

        Ok(records)
    }

    /// Get a book by ID
    pub async fn get_by_id(&self, id: i64) -> Result<Option<BookRecord>> {
        let sql = format!("SELECT {} FROM books WHERE id = ?1", BOOK_COLUMNS);
        let record = sqlx::query_as::<_, BookRecord>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(record)
    }

    /// Load the books of several authors, grouped by author ID
    pub async fn list_by_authors(&self, author_ids: &[i64]) -> Result<HashMap<i64, Vec<BookRecord>>> {
        let mut grouped: HashMap<i64, Vec<BookRecord>> = HashMap::new();
        if author_ids.is_empty() {
            return Ok(grouped);
        }

        let sql = format!(
            "SELECT {} FROM books WHERE author_id IN ({}) ORDER BY id ASC",
            BOOK_COLUMNS,
            in_placeholders(author_ids.len())
        );

        let mut query = sqlx::query_as::<_, BookRecord>(&sql);
        for id in author_ids {
            query = query.bind(id);
        }

        for record in query.fetch_all(&self.pool).await? {
            grouped.entry(record.author_id).or_default().push(record);
        }

        Ok(grouped)
    }

    /// Insert a new book
    pub async fn create(&self, input: CreateBook) -> Result<BookRecord> {
        let sql = format!(
            r#"
            INSERT INTO books (title, author_id, published_date)
            VALUES (?1, ?2, ?3)
            RETURNING {}
            "#,
            BOOK_COLUMNS
        );
        let record = sqlx::query_as::<_, BookRecord>(&sql)
            .bind(&input.title)
            .bind(input.author_id)
            .bind(date_to_str(input.published_date))
            .fetch_one(&self.pool)
            .await?;

        Ok(record)
    }

    /// Overwrite every mutable column of an existing book
    pub async fn save(&self, record: &BookRecord) -> Result<Option<BookRecord>> {
        let sql = format!(
            r#"
            UPDATE books SET title = ?2, author_id = ?3, published_date = ?4
            WHERE id = ?1
            RETURNING {}
            "#,
            BOOK_COLUMNS
        );
        let updated = sqlx::query_as::<_, BookRecord>(&sql)
            .bind(record.id)
            .bind(&record.title)
            .bind(record.author_id)
            .bind(date_to_str(record.published_date))
            .fetch_optional(&self.pool)
            .await?;

        Ok(updated)
    }

    /// Hard-delete a book
    pub async fn delete(&self, id: i64) -> Result<bool> {
        let result = sqlx::query("DELETE FROM books WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
