//! Application services

pub mod auth;
pub mod catalog;
pub mod logging;
pub mod validation;

pub use auth::{AuthConfig, AuthError, AuthService, AuthTokens, TokenPayload, resolve_jwt_secret};
pub use catalog::{CatalogError, CatalogResult, CatalogService, Entity};
pub use logging::init_tracing;
pub use validation::{Validate, ValidationError};
