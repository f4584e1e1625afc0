//! GraphQL schema definition
//!
//! The schema is built once at startup and shared by every request.

use async_graphql::dataloader::DataLoader;
use async_graphql::{EmptySubscription, MergedObject, Schema};

use crate::services::{AuthService, CatalogService};

use super::auth::AuthPolicy;
use super::loaders::{AuthorLoader, BooksByAuthorLoader};
use super::mutations::{AuthMutations, CatalogMutations};
use super::queries::CatalogQueries;

/// The GraphQL schema type
pub type CatalogSchema = Schema<QueryRoot, MutationRoot, EmptySubscription>;

#[derive(MergedObject, Default)]
pub struct QueryRoot(CatalogQueries);

#[derive(MergedObject, Default)]
pub struct MutationRoot(CatalogMutations, AuthMutations);

/// Build the GraphQL schema with all resolvers
pub fn build_schema(
    catalog: CatalogService,
    auth: AuthService,
    policy: AuthPolicy,
) -> CatalogSchema {
    let author_loader = DataLoader::new(AuthorLoader::new(catalog.clone()), tokio::spawn);
    let books_loader = DataLoader::new(BooksByAuthorLoader::new(catalog.clone()), tokio::spawn);

    Schema::build(
        QueryRoot::default(),
        MutationRoot::default(),
        EmptySubscription,
    )
    .data(catalog)
    .data(auth)
    .data(policy)
    .data(author_loader)
    .data(books_loader)
    .extension(async_graphql::extensions::Tracing)
    .finish()
}

/// SDL of the schema; resolvers are not needed to print it
pub fn schema_sdl() -> String {
    Schema::build(
        QueryRoot::default(),
        MutationRoot::default(),
        EmptySubscription,
    )
    .finish()
    .sdl()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sdl_exposes_catalog_operations() {
        let sdl = schema_sdl();
        for field in [
            "book(id: Int!): Book",
            "allBooks(",
            "page: Int = 1",
            "perPage: Int = 10",
            "createBook(",
            "authorId: Int!",
            "publishedDate: Date!",
            "updateAuthor(",
            "deleteAuthor(",
            "tokenAuth(",
            "verifyToken(",
            "refreshToken(",
            "scalar Date",
        ] {
            assert!(sdl.contains(field), "missing `{}` in:\n{}", field, sdl);
        }
    }
}
