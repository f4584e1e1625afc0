pub mod catalog;

pub use catalog::CatalogQueries;

pub(crate) mod prelude {
    pub(crate) use async_graphql::{Context, ErrorExtensions, Object, Result};

    pub(crate) use crate::graphql::pagination::{DEFAULT_PAGE, DEFAULT_PER_PAGE, page_to_offset};
    pub(crate) use crate::graphql::types::*;
    pub(crate) use crate::services::CatalogService;
}
