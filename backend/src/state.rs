//! Application state management
//!
//! Shared state handed to every handler via Axum's state extraction.
//! All fields are cheap to clone: the pool and the metrics handle are
//! internally reference counted, the config sits behind an `Arc`.

use crate::config::AppConfig;
use metrics_exporter_prometheus::PrometheusHandle;
use sqlx::PgPool;
use std::sync::Arc;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool
    pub db: PgPool,
    /// Application configuration
    pub config: Arc<AppConfig>,
    /// Renders the Prometheus scrape output
    pub metrics: PrometheusHandle,
}

impl AppState {
    /// Create a new application state
    pub fn new(db: PgPool, config: AppConfig, metrics: PrometheusHandle) -> Self {
        Self {
            db,
            config: Arc::new(config),
            metrics,
        }
    }

    /// Get a reference to the database pool
    #[inline]
    pub fn db(&self) -> &PgPool {
        &self.db
    }

    /// Get a reference to the configuration
    #[inline]
    pub fn config(&self) -> &AppConfig {
        &self.config
    }
}
