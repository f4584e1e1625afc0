use super::prelude::*;

#[derive(Default)]
pub struct CatalogQueries;

#[Object]
impl CatalogQueries {
    /// Get a book by ID
    async fn book(&self, ctx: &Context<'_>, id: i64) -> Result<Option<Book>> {
        let catalog = ctx.data_unchecked::<CatalogService>();
        let record = catalog.get_book(id).await.map_err(|e| e.extend())?;
        Ok(record.map(Book::from))
    }

    /// Books in storage order, one page at a time
    async fn all_books(
        &self,
        ctx: &Context<'_>,
        #[graphql(default_with = "Some(DEFAULT_PAGE)")] page: Option<i32>,
        #[graphql(default_with = "Some(DEFAULT_PER_PAGE)")] per_page: Option<i32>,
    ) -> Result<Vec<Book>> {
        let catalog = ctx.data_unchecked::<CatalogService>();
        let (offset, limit) = page_to_offset(
            page.unwrap_or(DEFAULT_PAGE),
            per_page.unwrap_or(DEFAULT_PER_PAGE),
        );

        let records = catalog
            .list_books_page(offset, limit)
            .await
            .map_err(|e| e.extend())?;

        Ok(records.into_iter().map(Book::from).collect())
    }

    /// Get an author by ID
    async fn author(&self, ctx: &Context<'_>, id: i64) -> Result<Option<Author>> {
        let catalog = ctx.data_unchecked::<CatalogService>();
        let record = catalog.get_author(id).await.map_err(|e| e.extend())?;
        Ok(record.map(Author::from))
    }

    /// All authors in storage order
    async fn all_authors(&self, ctx: &Context<'_>) -> Result<Vec<Author>> {
        let catalog = ctx.data_unchecked::<CatalogService>();
        let records = catalog.list_authors().await.map_err(|e| e.extend())?;
        Ok(records.into_iter().map(Author::from).collect())
    }
}
