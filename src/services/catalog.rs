//! Catalog service: authors and books
//!
//! Every write follows the same contract: validate the record, resolve the
//! author reference if one is involved, then perform a single statement
//! against the repository. Nothing is written when validation or reference
//! resolution fails.

use std::collections::HashMap;

use thiserror::Error;
use tracing::{debug, info};

use crate::db::{
    AuthorRecord, BookRecord, CreateAuthor, CreateBook, Database, UpdateAuthor, UpdateBook,
};
use crate::services::validation::{Validate, ValidationError};

/// Entity kinds referenced in errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Entity {
    Author,
    Book,
}

impl std::fmt::Display for Entity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Entity::Author => write!(f, "Author"),
            Entity::Book => write!(f, "Book"),
        }
    }
}

/// Errors produced by catalog operations
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("{entity} {id} not found")]
    NotFound { entity: Entity, id: i64 },

    #[error("{entity} not found")]
    ReferenceNotFound { entity: Entity, id: i64 },

    #[error("Validation failed: {0}")]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Storage(#[from] anyhow::Error),
}

impl CatalogError {
    /// Stable machine-readable code
    pub fn code(&self) -> &'static str {
        match self {
            CatalogError::NotFound { .. } => "NOT_FOUND",
            CatalogError::ReferenceNotFound { .. } => "REFERENCE_NOT_FOUND",
            CatalogError::Validation(_) => "VALIDATION_FAILED",
            CatalogError::Storage(_) => "INTERNAL",
        }
    }
}

pub type CatalogResult<T> = Result<T, CatalogError>;

/// Catalog operations over the database
#[derive(Clone)]
pub struct CatalogService {
    db: Database,
}

impl CatalogService {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    // ========================================================================
    // Authors
    // ========================================================================

    pub async fn get_author(&self, id: i64) -> CatalogResult<Option<AuthorRecord>> {
        Ok(self.db.authors().get_by_id(id).await?)
    }

    pub async fn list_authors(&self) -> CatalogResult<Vec<AuthorRecord>> {
        Ok(self.db.authors().list_all().await?)
    }

    /// Authors keyed by ID
    pub async fn authors_by_ids(&self, ids: &[i64]) -> CatalogResult<HashMap<i64, AuthorRecord>> {
        let records = self.db.authors().get_many(ids).await?;
        Ok(records.into_iter().map(|r| (r.id, r)).collect())
    }

    pub async fn create_author(&self, input: CreateAuthor) -> CatalogResult<AuthorRecord> {
        input.validate()?;

        let author = self.db.authors().create(input).await?;
        info!(author_id = author.id, name = %author.name, "Author created");
        Ok(author)
    }

    pub async fn update_author(&self, id: i64, input: UpdateAuthor) -> CatalogResult<AuthorRecord> {
        let authors = self.db.authors();
        let existing = authors
            .get_by_id(id)
            .await?
            .ok_or(CatalogError::NotFound { entity: Entity::Author, id })?;

        let merged = input.apply_to(existing);
        merged.validate()?;

        let author = authors
            .save(&merged)
            .await?
            .ok_or(CatalogError::NotFound { entity: Entity::Author, id })?;
        info!(author_id = id, "Author updated");
        Ok(author)
    }

    /// Delete an author and, by cascade, all of their books.
    /// Returns `false` if the author did not exist.
    pub async fn delete_author(&self, id: i64) -> CatalogResult<bool> {
        let deleted = self.db.authors().delete(id).await?;
        if deleted {
            info!(author_id = id, "Author deleted");
        } else {
            debug!(author_id = id, "Author to delete not found");
        }
        Ok(deleted)
    }

    // ========================================================================
    // Books
    // ========================================================================

    pub async fn get_book(&self, id: i64) -> CatalogResult<Option<BookRecord>> {
        Ok(self.db.books().get_by_id(id).await?)
    }

    pub async fn list_books(&self) -> CatalogResult<Vec<BookRecord>> {
        Ok(self.db.books().list_all().await?)
    }

    /// A slice of all books in storage order
    pub async fn list_books_page(&self, offset: i64, limit: i64) -> CatalogResult<Vec<BookRecord>> {
        Ok(self.db.books().list_page(offset, limit).await?)
    }

    /// Books grouped by author ID
    pub async fn books_by_authors(
        &self,
        author_ids: &[i64],
    ) -> CatalogResult<HashMap<i64, Vec<BookRecord>>> {
        Ok(self.db.books().list_by_authors(author_ids).await?)
    }

    pub async fn create_book(&self, input: CreateBook) -> CatalogResult<BookRecord> {
        input.validate()?;
        self.require_author(input.author_id).await?;

        let book = self.db.books().create(input).await?;
        info!(
            book_id = book.id,
            author_id = book.author_id,
            title = %book.title,
            "Book created"
        );
        Ok(book)
    }

    pub async fn update_book(&self, id: i64, input: UpdateBook) -> CatalogResult<BookRecord> {
        let books = self.db.books();
        let existing = books
            .get_by_id(id)
            .await?
            .ok_or(CatalogError::NotFound { entity: Entity::Book, id })?;

        let author_changed = input
            .author_id
            .is_some_and(|author_id| author_id != existing.author_id);

        let merged = input.apply_to(existing);
        merged.validate()?;

        if author_changed {
            self.require_author(merged.author_id).await?;
        }

        let book = books
            .save(&merged)
            .await?
            .ok_or(CatalogError::NotFound { entity: Entity::Book, id })?;
        info!(book_id = id, "Book updated");
        Ok(book)
    }

    /// Hard-delete a book. Returns `false` if it did not exist.
    pub async fn delete_book(&self, id: i64) -> CatalogResult<bool> {
        let deleted = self.db.books().delete(id).await?;
        if deleted {
            info!(book_id = id, "Book deleted");
        } else {
            debug!(book_id = id, "Book to delete not found");
        }
        Ok(deleted)
    }

    async fn require_author(&self, author_id: i64) -> CatalogResult<AuthorRecord> {
        self.db
            .authors()
            .get_by_id(author_id)
            .await?
            .ok_or(CatalogError::ReferenceNotFound {
                entity: Entity::Author,
                id: author_id,
            })
    }
}
