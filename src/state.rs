//! Shared application state
//!
//! Este módulo define el estado compartido de la aplicación que se pasa
//! a través del router de Axum.

use sqlx::PgPool;

use crate::config::environment::EnvironmentConfig;
use crate::services::upload_service::UploadStore;

#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub config: EnvironmentConfig,
    pub uploads: UploadStore,
}

impl AppState {
    pub fn new(pool: PgPool, config: EnvironmentConfig, uploads: UploadStore) -> Self {
        Self {
            pool,
            config,
            uploads,
        }
    }
}
