use std::future::Future;

use axum::Router;
use common::utils::logging::init_logging_from_env;
use configs::AppConfig;
use dotenvy::dotenv;
use migration::MigratorTrait;
use sea_orm::DatabaseConnection;
use service::users::service::AuthConfig;
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tracing::{info, warn};

use crate::routes;
use crate::state::ServerState;

fn build_cors() -> CorsLayer {
    CorsLayer::very_permissive()
}

fn auth_config(cfg: &AppConfig) -> AuthConfig {
    AuthConfig { jwt_secret: cfg.auth.jwt_secret.clone(), ..AuthConfig::default() }
}

/// Connect the store, apply migrations and build the router.
///
/// The returned connection is the handle to close on shutdown.
pub async fn build_app(cfg: &AppConfig) -> anyhow::Result<(Router, DatabaseConnection)> {
    let db = models::db::connect_with_config(&cfg.database).await?;
    if cfg.database.run_migrations {
        migration::Migrator::up(&db, None).await?;
        info!("migrations applied");
    }
    if cfg.auth.jwt_secret.is_none() {
        warn!("JWT_SECRET not set; login will not issue tokens");
    }
    let state = ServerState::from_db(db.clone(), auth_config(cfg));
    Ok((routes::build_router(state, build_cors()), db))
}

/// Serve until `shutdown` resolves, then close the connection pool.
pub async fn serve<F>(cfg: AppConfig, shutdown: F) -> anyhow::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let (app, db) = build_app(&cfg).await?;
    let listener = TcpListener::bind(cfg.server.bind_addr()).await?;
    let addr = listener.local_addr()?;
    info!(%addr, "bookshop server listening");

    axum::serve(listener, app).with_graceful_shutdown(shutdown).await?;

    info!("server stopped; closing database pool");
    db.close().await?;
    Ok(())
}

/// Resolves on Ctrl+C, or SIGTERM on unix.
pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "cannot listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                warn!(error = %e, "cannot listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("received Ctrl+C"),
        _ = terminate => info!("received SIGTERM"),
    }
}

/// Public entry: load config, build the app and run the HTTP server
pub async fn run() -> anyhow::Result<()> {
    dotenv().ok();
    init_logging_from_env();
    let cfg = AppConfig::load_or_env()?;
    serve(cfg, shutdown_signal()).await
}
