//! Server setup and initialization
//!
//! Builds the application, connects to PostgreSQL, runs migrations and
//! serves until a shutdown signal, then settles live voting sessions. Idle
//! sessions are swept in the background while serving.

use std::net::SocketAddr;
use std::time::Duration;

use axum::Router;
use tokio::net::TcpListener;
use tracing::{info, warn};
use viewpoints_common::{AppConfig, AppError};
use viewpoints_db::{create_pool, run_migrations, PoolConfig};
use viewpoints_service::ServiceContext;

use crate::middleware::apply_middleware;
use crate::routes::{create_router, health_routes};
use crate::state::AppState;

/// Build the complete Axum application with all routes and middleware
pub fn create_app(state: AppState) -> Router {
    let api = apply_middleware(create_router(), state.config());
    api.merge(health_routes()).with_state(state)
}

/// Connect to the database and build the AppState
pub async fn create_app_state(config: AppConfig) -> Result<AppState, AppError> {
    info!("Connecting to PostgreSQL...");
    let pool = create_pool(&PoolConfig::from(&config.database))
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;
    info!("PostgreSQL connection established");

    if config.database.run_migrations {
        run_migrations(&pool, None)
            .await
            .map_err(|e| AppError::Database(format!("Migrations failed: {e}")))?;
        info!("Database migrations applied");
    }

    let service_context = ServiceContext::postgres(&pool);
    Ok(AppState::new(service_context, config).with_pool(pool))
}

/// Serve `app` on `addr` until ctrl-c / SIGTERM
pub async fn run_server(app: Router, addr: SocketAddr) -> Result<(), AppError> {
    let listener = TcpListener::bind(addr)
        .await
        .map_err(|e| AppError::Config(format!("Failed to bind to {addr}: {e}")))?;

    info!("Server listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| AppError::Config(format!("Server error: {e}")))?;

    Ok(())
}

/// Run the complete server with configuration
pub async fn run(config: AppConfig) -> Result<(), AppError> {
    let addr: SocketAddr = config
        .api
        .address()
        .parse()
        .map_err(|e| AppError::Config(format!("Invalid listen address: {e}")))?;

    let max_idle = Duration::from_secs(config.session.idle_timeout_minutes.saturating_mul(60));
    let state = create_app_state(config).await?;
    let sweeper = state.service_context().spawn_session_sweeper(max_idle);
    let app = create_app(state.clone());

    let served = run_server(app, addr).await;
    sweeper.abort();

    // Let reactions already taken reach the database
    state.service_context().sessions().drain().await;
    served?;
    info!("Server stopped");

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "Failed to listen for ctrl-c");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                warn!(error = %e, "Failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    info!("Shutdown signal received");
}
