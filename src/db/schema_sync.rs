//! Schema bootstrap for the catalog tables
//!
//! Creates missing tables and indexes on startup. Existing tables are left
//! untouched; column renames or type changes are not handled.

use sqlx::SqlitePool;
use tracing::debug;

/// A table and the statements that create it
struct TableDef {
    name: &'static str,
    create_sql: &'static str,
    indexes: &'static [&'static str],
}

const TABLES: &[TableDef] = &[
    TableDef {
        name: "authors",
        create_sql: r#"
            CREATE TABLE IF NOT EXISTS authors (
              id INTEGER PRIMARY KEY AUTOINCREMENT,
              name TEXT NOT NULL,
              birth_date TEXT NOT NULL
            )
        "#,
        indexes: &[],
    },
    TableDef {
        name: "books",
        create_sql: r#"
            CREATE TABLE IF NOT EXISTS books (
              id INTEGER PRIMARY KEY AUTOINCREMENT,
              title TEXT NOT NULL CHECK (length(trim(title)) > 0),
              author_id INTEGER NOT NULL REFERENCES authors(id) ON DELETE CASCADE,
              published_date TEXT NOT NULL
            )
        "#,
        indexes: &["CREATE INDEX IF NOT EXISTS idx_books_author_id ON books(author_id)"],
    },
    TableDef {
        name: "users",
        create_sql: r#"
            CREATE TABLE IF NOT EXISTS users (
              id TEXT PRIMARY KEY,
              username TEXT NOT NULL UNIQUE COLLATE NOCASE,
              password_hash TEXT NOT NULL,
              is_active INTEGER NOT NULL DEFAULT 1,
              last_login_at TEXT,
              created_at TEXT NOT NULL,
              updated_at TEXT NOT NULL
            )
        "#,
        indexes: &[],
    },
    TableDef {
        name: "refresh_tokens",
        create_sql: r#"
            CREATE TABLE IF NOT EXISTS refresh_tokens (
              id TEXT PRIMARY KEY,
              user_id TEXT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
              token_hash TEXT NOT NULL UNIQUE,
              expires_at TEXT NOT NULL,
              created_at TEXT NOT NULL
            )
        "#,
        indexes: &[
            "CREATE INDEX IF NOT EXISTS idx_refresh_tokens_user_id ON refresh_tokens(user_id)",
        ],
    },
    TableDef {
        name: "auth_secrets",
        create_sql: r#"
            CREATE TABLE IF NOT EXISTS auth_secrets (
              key TEXT PRIMARY KEY,
              value TEXT NOT NULL
            )
        "#,
        indexes: &[],
    },
];

/// Result of a schema sync operation
#[derive(Debug, Default)]
pub struct SchemaSyncResult {
    pub tables_created: Vec<String>,
}

/// Check if a table exists in the database
async fn table_exists(pool: &SqlitePool, table_name: &str) -> Result<bool, sqlx::Error> {
    let result: Option<(String,)> =
        sqlx::query_as("SELECT name FROM sqlite_master WHERE type='table' AND name = ?")
            .bind(table_name)
            .fetch_optional(pool)
            .await?;

    Ok(result.is_some())
}

/// Create every missing table and index
pub async fn sync_schema(pool: &SqlitePool) -> Result<SchemaSyncResult, sqlx::Error> {
    let mut result = SchemaSyncResult::default();

    for table in TABLES {
        if !table_exists(pool, table.name).await? {
            debug!("Creating table {}", table.name);
            sqlx::query(table.create_sql).execute(pool).await?;
            result.tables_created.push(table.name.to_string());
        }

        for index in table.indexes {
            sqlx::query(index).execute(pool).await?;
        }
    }

    Ok(result)
}
