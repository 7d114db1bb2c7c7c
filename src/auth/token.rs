//! Access / refresh token issuance and validation

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{Error, Result};

pub const ACCESS_TOKEN_HEADER: &str = "access-token";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid,
    pub token_type: TokenType,
    pub iat: i64,
    pub exp: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TokenType {
    Access,
    Refresh,
}

#[derive(Debug, Clone, Serialize)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
}

#[derive(Clone)]
pub struct TokenService {
    secret: String,
    access_ttl: Duration,
    refresh_ttl: Duration,
}

impl TokenService {
    pub fn new(secret: impl Into<String>, access_ttl_minutes: i64) -> Self {
        Self {
            secret: secret.into(),
            access_ttl: Duration::minutes(access_ttl_minutes),
            refresh_ttl: Duration::days(14),
        }
    }

    pub fn from_env() -> Self {
        let secret = std::env::var("JWT_SECRET").unwrap_or_else(|_| {
            tracing::warn!("JWT_SECRET not set, using development secret");
            "dev-secret-change-me".to_string()
        });
        let ttl = std::env::var("JWT_TTL_MINUTES")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(60);
        Self::new(secret, ttl)
    }

    pub fn issue_pair(&self, user_id: Uuid) -> Result<TokenPair> {
        Ok(TokenPair {
            access_token: self.issue(user_id, TokenType::Access, self.access_ttl)?,
            refresh_token: self.issue(user_id, TokenType::Refresh, self.refresh_ttl)?,
        })
    }

    fn issue(&self, user_id: Uuid, token_type: TokenType, ttl: Duration) -> Result<String> {
        let now = Utc::now();
        let claims = Claims {
            sub: user_id,
            token_type,
            iat: now.timestamp(),
            exp: (now + ttl).timestamp(),
        };
        Ok(encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.secret.as_bytes()),
        )?)
    }

    pub fn verify(&self, token: &str, expected: TokenType) -> Result<Claims> {
        let data = decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.secret.as_bytes()),
            &Validation::default(),
        )?;
        if data.claims.token_type != expected {
            return Err(Error::Unauthorized("wrong token type".into()));
        }
        Ok(data.claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_round_trip() {
        let svc = TokenService::new("test-secret", 60);
        let user = Uuid::new_v4();
        let pair = svc.issue_pair(user).unwrap();
        let claims = svc.verify(&pair.access_token, TokenType::Access).unwrap();
        assert_eq!(claims.sub, user);
    }

    #[test]
    fn test_token_type_enforced() {
        let svc = TokenService::new("test-secret", 60);
        let pair = svc.issue_pair(Uuid::new_v4()).unwrap();
        assert!(svc.verify(&pair.access_token, TokenType::Refresh).is_err());
        assert!(svc.verify(&pair.refresh_token, TokenType::Access).is_err());
    }

    #[test]
    fn test_foreign_secret_rejected() {
        let svc = TokenService::new("test-secret", 60);
        let other = TokenService::new("other-secret", 60);
        let pair = svc.issue_pair(Uuid::new_v4()).unwrap();
        assert!(other.verify(&pair.access_token, TokenType::Access).is_err());
    }
}
