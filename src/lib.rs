//! Book catalog service
//!
//! Authors and books stored in SQLite, served over GraphQL at /graphql and as
//! flat JSON records under /api.

pub mod api;
pub mod app;
pub mod cli;
pub mod config;
pub mod db;
pub mod graphql;
pub mod services;

pub use app::{AppState, build_app};
