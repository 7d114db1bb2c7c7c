//! Token-based authentication

pub mod token;

use axum::extract::FromRequestParts;
use axum::http::{header, request::Parts};
use uuid::Uuid;

use crate::state::AppState;
use crate::Error;
use self::token::{TokenType, ACCESS_TOKEN_HEADER};

const BEARER_PREFIX: &str = "Bearer ";

/// Authenticated caller, extracted from the bearer token.
///
/// Accepts the token from the `access-token` header (what the login endpoint
/// sets) or a standard `Authorization` header.
#[derive(Debug, Clone, Copy)]
pub struct AuthUser(pub Uuid);

#[axum::async_trait]
impl FromRequestParts<AppState> for AuthUser {
    type Rejection = Error;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> std::result::Result<Self, Self::Rejection> {
        let raw = parts
            .headers
            .get(ACCESS_TOKEN_HEADER)
            .or_else(|| parts.headers.get(header::AUTHORIZATION))
            .and_then(|h| h.to_str().ok())
            .ok_or_else(|| Error::Unauthorized("missing access token".into()))?;
        let token = raw.strip_prefix(BEARER_PREFIX).unwrap_or(raw);
        let claims = state.jwt.verify(token, TokenType::Access)?;
        Ok(AuthUser(claims.sub))
    }
}
