//! Shared application state handed to every handler.

use std::{path::PathBuf, sync::Arc};

use axum::extract::FromRef;

use crate::{
    config::{Config, ConfigError},
    db::DbPool,
    services::auth_service::TokenKeys,
};

#[derive(Debug, Clone)]
pub struct AppState {
    pub pool: DbPool,
    pub tokens: Arc<TokenKeys>,
    pub upload_dir: PathBuf,
    pub bcrypt_cost: u32,
}

impl AppState {
    pub fn new(pool: DbPool, config: &Config) -> Result<Self, ConfigError> {
        Ok(Self {
            pool,
            tokens: Arc::new(TokenKeys::new(&config.jwt_secret, config.token_lifetime()?)),
            upload_dir: PathBuf::from(&config.upload_dir),
            bcrypt_cost: config.bcrypt_cost,
        })
    }
}

/// Lets handlers that only need the pool extract `State<DbPool>`.
impl FromRef<AppState> for DbPool {
    fn from_ref(state: &AppState) -> Self {
        state.pool.clone()
    }
}
