//! Shared application state

use sqlx::PgPool;

use crate::auth::token::TokenService;

#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    pub nats: Option<async_nats::Client>,
    pub jwt: TokenService,
}
