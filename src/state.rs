use crate::{config::Config, database::DbPool, services::cookies::CookieConfig};
use std::sync::Arc;

/// Application state shared across all HTTP handlers
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool for accessing the database
    pub pool: DbPool,
    /// Loaded configuration
    pub config: Arc<Config>,
    /// Session cookie settings derived from `config.auth`
    pub cookies: Arc<CookieConfig>,
}

impl AppState {
    /// Create a new AppState instance
    ///
    /// # Arguments
    /// * `pool` - Database connection pool
    /// * `config` - Loaded configuration
    pub fn new(pool: DbPool, config: Config) -> Self {
        let cookies = CookieConfig::from_auth(&config.auth);
        Self {
            pool,
            config: Arc::new(config),
            cookies: Arc::new(cookies),
        }
    }
}
