//! Application state and HTTP router construction.
//!
//! Used by `main` and by the integration tests to build the Axum app.

use std::sync::Arc;

use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::api;
use crate::config::Config;
use crate::db::Database;
use crate::graphql::{self, AuthPolicy, CatalogSchema};
use crate::services::{AuthConfig, AuthService, CatalogService};

/// Shared state for HTTP handlers (GraphQL, API routes).
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub db: Database,
    pub schema: CatalogSchema,
    pub catalog: CatalogService,
    pub auth: AuthService,
}

impl AppState {
    /// Wire the services and build the schema over a database whose tables already exist
    pub fn new(config: Config, db: Database, jwt_secret: String) -> Self {
        let catalog = CatalogService::new(db.clone());
        let auth = AuthService::new(db.clone(), AuthConfig::from_config(&config, jwt_secret));
        let policy = AuthPolicy {
            require_auth: config.require_auth,
        };
        let schema = graphql::build_schema(catalog.clone(), auth.clone(), policy);

        Self {
            config: Arc::new(config),
            db,
            schema,
            catalog,
            auth,
        }
    }
}

/// Build the full Axum router: health, /api, /graphql and layers.
/// Returns Router<()> (state fully applied) for use with axum::serve.
pub fn build_app(state: AppState) -> Router<()> {
    Router::new()
        .merge(api::health::router())
        .nest("/api", api::router(state.clone()))
        .merge(graphql::handler::router())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
