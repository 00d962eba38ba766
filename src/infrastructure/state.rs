use crate::infrastructure::auth::JwtTokenService;
use crate::infrastructure::config::AppConfig;
use crate::infrastructure::db::DbPool;
use std::sync::Arc;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub pool: DbPool,
    pub token_service: Arc<JwtTokenService>,
    pub config: AppConfig,
}

impl AppState {
    pub fn new(pool: DbPool, token_service: Arc<JwtTokenService>, config: AppConfig) -> Self {
        Self {
            pool,
            token_service,
            config,
        }
    }
}
