//! Application state
//!
//! Holds the shared state for the Axum application: the service context,
//! configuration and the identity-token verifier.

use std::sync::Arc;

use viewpoints_common::{AppConfig, IdentityTokenService};
use viewpoints_db::PgPool;
use viewpoints_service::ServiceContext;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    service_context: Arc<ServiceContext>,
    config: Arc<AppConfig>,
    tokens: Arc<IdentityTokenService>,
    /// Present when backed by PostgreSQL; used by the readiness probe
    pool: Option<PgPool>,
}

impl AppState {
    pub fn new(service_context: ServiceContext, config: AppConfig) -> Self {
        let tokens = IdentityTokenService::new(&config.auth.jwt_secret, config.auth.jwt_issuer.clone());
        Self {
            service_context: Arc::new(service_context),
            config: Arc::new(config),
            tokens: Arc::new(tokens),
            pool: None,
        }
    }

    /// Attach the database pool checked by `/health/ready`
    #[must_use]
    pub fn with_pool(mut self, pool: PgPool) -> Self {
        self.pool = Some(pool);
        self
    }

    pub fn service_context(&self) -> &ServiceContext {
        &self.service_context
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Verifier for identity-provider bearer tokens
    pub fn tokens(&self) -> &IdentityTokenService {
        &self.tokens
    }

    pub fn pool(&self) -> Option<&PgPool> {
        self.pool.as_ref()
    }
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("service_context", &self.service_context)
            .field("env", &self.config.app.env)
            .field("pool", &self.pool.is_some())
            .finish()
    }
}
