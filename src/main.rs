//! Catalog - book catalog service
//!
//! Entry point: loads configuration, prepares the database and either serves
//! HTTP or runs a one-off command.

use std::time::Duration;

use anyhow::Context;
use clap::Parser;

use catalog::cli::{Cli, Command};
use catalog::config::Config;
use catalog::db::Database;
use catalog::graphql::schema_sdl;
use catalog::services::{init_tracing, resolve_jwt_secret};
use catalog::{AppState, build_app};

const DB_RETRY_INTERVAL: Duration = Duration::from_secs(2);
const DB_CONNECT_TIMEOUT: Duration = Duration::from_secs(30);

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let command = cli.command();
    if command == Command::PrintSchema {
        println!("{}", schema_sdl());
        return Ok(());
    }

    let config = Config::from_env()?;
    init_tracing(config.log_format);

    let state = bootstrap(config).await?;

    match command {
        Command::CreateUser { username, password } => {
            let user = state.auth.create_user(&username, &password).await?;
            println!("Created user {} ({})", user.username, user.id);
            state.db.close().await;
            Ok(())
        }
        _ => serve(state).await,
    }
}

/// Connect to the database, create missing tables and wire the services
async fn bootstrap(config: Config) -> anyhow::Result<AppState> {
    let db = Database::connect_with_retry(
        &config.database_url,
        config.database_max_connections,
        DB_RETRY_INTERVAL,
        DB_CONNECT_TIMEOUT,
    )
    .await?;
    tracing::info!("Database connected");

    let sync = db.sync_schema().await?;
    if !sync.tables_created.is_empty() {
        tracing::info!(tables = ?sync.tables_created, "Created database tables");
    }

    let jwt_secret = resolve_jwt_secret(&db, config.jwt_secret.as_deref())
        .await
        .context("Failed to resolve JWT secret")?;

    Ok(AppState::new(config, db, jwt_secret))
}

async fn serve(state: AppState) -> anyhow::Result<()> {
    let config = state.config.clone();

    if let (Some(username), Some(password)) = (&config.admin_username, &config.admin_password)
        && state.auth.ensure_user(username, password).await?
    {
        tracing::info!(username = %username, "Admin user created");
    }

    let removed = state.auth.cleanup_expired_tokens().await?;
    if removed > 0 {
        tracing::info!(removed, "Removed expired refresh tokens");
    }

    if !config.require_auth {
        tracing::warn!("REQUIRE_AUTH is disabled, catalog writes are open to anonymous clients");
    }

    let db = state.db.clone();
    let app = build_app(state);

    let addr = config.bind_addr();
    tracing::info!("Listening on {}", addr);
    tracing::info!("GraphQL playground: http://localhost:{}/graphql", config.port);

    let listener = tokio::net::TcpListener::bind(addr.as_str())
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    db.close().await;
    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
