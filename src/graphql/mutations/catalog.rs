//! Catalog mutations
//!
//! All of them sit behind [`WriteGuard`]. Absent IDs are reported as `null`
//! (updates) or `success: false` (deletes), never as errors.

use super::prelude::*;

#[derive(Default)]
pub struct CatalogMutations;

#[Object]
impl CatalogMutations {
    // ------------------------------------------------------------------------
    // Authors
    // ------------------------------------------------------------------------

    /// Create an author
    #[graphql(guard = "WriteGuard")]
    async fn create_author(
        &self,
        ctx: &Context<'_>,
        name: String,
        birth_date: Date,
    ) -> Result<Author> {
        let catalog = ctx.data_unchecked::<CatalogService>();
        let input = CreateAuthor {
            name,
            birth_date: birth_date.into(),
        };

        let record = catalog.create_author(input).await.map_err(|e| {
            tracing::warn!(error = %e, "Failed to create author");
            e.extend()
        })?;

        Ok(record.into())
    }

    /// Update the supplied fields of an author. Returns null if the author does not exist.
    #[graphql(guard = "WriteGuard")]
    async fn update_author(
        &self,
        ctx: &Context<'_>,
        id: i64,
        name: Option<String>,
        birth_date: Option<Date>,
    ) -> Result<Option<Author>> {
        let catalog = ctx.data_unchecked::<CatalogService>();
        let input = UpdateAuthor {
            name,
            birth_date: birth_date.map(Into::into),
        };

        match catalog.update_author(id, input).await {
            Ok(record) => Ok(Some(record.into())),
            Err(CatalogError::NotFound { .. }) => Ok(None),
            Err(e) => {
                tracing::warn!(author_id = id, error = %e, "Failed to update author");
                Err(e.extend())
            }
        }
    }

    /// Delete an author together with their books
    #[graphql(guard = "WriteGuard")]
    async fn delete_author(&self, ctx: &Context<'_>, id: i64) -> Result<DeleteResult> {
        let catalog = ctx.data_unchecked::<CatalogService>();

        if catalog.delete_author(id).await.map_err(|e| e.extend())? {
            Ok(DeleteResult::ok())
        } else {
            Ok(DeleteResult::failure(vec![format!("Author {} not found", id)]))
        }
    }

    // ------------------------------------------------------------------------
    // Books
    // ------------------------------------------------------------------------

    /// Create a book for an existing author.
    ///
    /// Validation and unknown-author failures are reported in `errors`
    /// with `success: false`; nothing is stored in that case.
    #[graphql(guard = "WriteGuard")]
    async fn create_book(
        &self,
        ctx: &Context<'_>,
        title: String,
        author_id: i64,
        published_date: Date,
    ) -> Result<CreateBookResult> {
        let catalog = ctx.data_unchecked::<CatalogService>();
        let input = CreateBook {
            title,
            author_id,
            published_date: published_date.into(),
        };

        match catalog.create_book(input).await {
            Ok(record) => Ok(CreateBookResult::ok(record.into())),
            Err(e @ (CatalogError::Validation(_) | CatalogError::ReferenceNotFound { .. })) => {
                tracing::warn!(author_id, error = %e, "Book rejected");
                Ok(CreateBookResult::failure(error_messages(&e)))
            }
            Err(e) => Err(e.extend()),
        }
    }

    /// Update the supplied fields of a book. Returns null if the book does not exist.
    #[graphql(guard = "WriteGuard")]
    async fn update_book(
        &self,
        ctx: &Context<'_>,
        id: i64,
        title: Option<String>,
        #[graphql(desc = "ID of the new author")] author: Option<i64>,
        published_date: Option<Date>,
    ) -> Result<Option<Book>> {
        let catalog = ctx.data_unchecked::<CatalogService>();
        let input = UpdateBook {
            title,
            author_id: author,
            published_date: published_date.map(Into::into),
        };

        match catalog.update_book(id, input).await {
            Ok(record) => Ok(Some(record.into())),
            Err(CatalogError::NotFound { .. }) => Ok(None),
            Err(e) => {
                tracing::warn!(book_id = id, error = %e, "Failed to update book");
                Err(e.extend())
            }
        }
    }

    /// Delete a book
    #[graphql(guard = "WriteGuard")]
    async fn delete_book(&self, ctx: &Context<'_>, id: i64) -> Result<DeleteResult> {
        let catalog = ctx.data_unchecked::<CatalogService>();

        if catalog.delete_book(id).await.map_err(|e| e.extend())? {
            Ok(DeleteResult::ok())
        } else {
            Ok(DeleteResult::failure(vec![format!("Book {} not found", id)]))
        }
    }
}
