//! GraphQL DataLoaders for batching database queries
//!
//! `Book.author` and `Author.books` resolve through these loaders, so a list
//! of N books costs one extra query instead of N.

use std::collections::HashMap;
use std::sync::Arc;

use async_graphql::dataloader::Loader;

use crate::db::{AuthorRecord, BookRecord};
use crate::services::{CatalogError, CatalogService};

/// Loads authors by ID
pub struct AuthorLoader {
    catalog: CatalogService,
}

impl AuthorLoader {
    pub fn new(catalog: CatalogService) -> Self {
        Self { catalog }
    }
}

impl Loader<i64> for AuthorLoader {
    type Value = AuthorRecord;
    type Error = Arc<CatalogError>;

    async fn load(&self, keys: &[i64]) -> Result<HashMap<i64, Self::Value>, Self::Error> {
        tracing::debug!(count = keys.len(), "Batch loading authors");
        self.catalog.authors_by_ids(keys).await.map_err(Arc::new)
    }
}

/// Loads the books of each author, keyed by author ID
pub struct BooksByAuthorLoader {
    catalog: CatalogService,
}

impl BooksByAuthorLoader {
    pub fn new(catalog: CatalogService) -> Self {
        Self { catalog }
    }
}

impl Loader<i64> for BooksByAuthorLoader {
    type Value = Vec<BookRecord>;
    type Error = Arc<CatalogError>;

    async fn load(&self, keys: &[i64]) -> Result<HashMap<i64, Self::Value>, Self::Error> {
        tracing::debug!(count = keys.len(), "Batch loading books for authors");
        self.catalog.books_by_authors(keys).await.map_err(Arc::new)
    }
}
