pub mod auth;
pub mod catalog;

pub use auth::AuthMutations;
pub use catalog::CatalogMutations;

pub(crate) mod prelude {
    pub(crate) use async_graphql::{Context, ErrorExtensions, Object, Result};

    pub(crate) use crate::db::*;
    pub(crate) use crate::graphql::auth::WriteGuard;
    pub(crate) use crate::graphql::helpers::*;
    pub(crate) use crate::graphql::types::*;
    pub(crate) use crate::services::{AuthService, CatalogError, CatalogService};
}
