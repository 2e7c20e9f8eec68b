//! Shared application state for all routes.

use crate::auth::TokenVerifier;
use crate::config::Settings;
use sqlx::PgPool;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub settings: Arc<Settings>,
    pub tokens: Arc<TokenVerifier>,
}

impl AppState {
    pub fn new(pool: PgPool, settings: Settings) -> Self {
        let tokens = TokenVerifier::from_secret(settings.jwt_secret.as_bytes());
        AppState {
            pool,
            settings: Arc::new(settings),
            tokens: Arc::new(tokens),
        }
    }
}
