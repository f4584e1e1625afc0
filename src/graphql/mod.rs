//! GraphQL API
//!
//! Queries and mutations are split by domain under `queries/` and
//! `mutations/`, each a `#[derive(Default)]` struct with an `#[Object]` impl,
//! merged into `QueryRoot`/`MutationRoot` in `schema.rs`.

pub mod auth;
pub mod handler;
pub mod helpers;
pub mod loaders;
pub mod mutations;
pub mod pagination;
pub mod queries;
mod schema;
pub mod types;

pub use auth::{AuthExt, AuthPolicy, AuthUser, WriteGuard};
pub use schema::{CatalogSchema, MutationRoot, QueryRoot, build_schema, schema_sdl};
