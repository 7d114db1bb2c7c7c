//! Signup, login, and refresh-token bookkeeping

use serde::Deserialize;
use sqlx::PgPool;
use uuid::Uuid;
use validator::Validate;

use crate::auth::token::{TokenPair, TokenService, TokenType};
use crate::domain::user::{Login, User};
use crate::{Error, Result};

#[derive(Debug, Deserialize, Validate)]
pub struct SignupRequest {
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 8, max = 72))]
    pub password: String,
    #[validate(length(min = 1, max = 50))]
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct RefreshRequest {
    pub refresh_token: String,
}

pub async fn signup(db: &PgPool, req: SignupRequest) -> Result<Uuid> {
    req.validate().map_err(|e| Error::InvalidInput(e.to_string()))?;
    if email_taken(db, &req.email).await? {
        return Err(Error::DuplicateEmail);
    }
    let password_hash = User::hash_password(&req.password)?;
    let user_id = Uuid::now_v7();

    let mut tx = db.begin().await?;
    let inserted = sqlx::query("INSERT INTO users (id, email, password_hash, name) VALUES ($1, $2, $3, $4)")
        .bind(user_id)
        .bind(&req.email)
        .bind(&password_hash)
        .bind(&req.name)
        .execute(&mut *tx)
        .await;
    if let Err(e) = inserted {
        // unique-violation race between the availability check and the insert
        if let sqlx::Error::Database(db_err) = &e {
            if db_err.code().as_deref() == Some("23505") {
                return Err(Error::DuplicateEmail);
            }
        }
        return Err(e.into());
    }
    sqlx::query("INSERT INTO balances (user_id, amount) VALUES ($1, 0)")
        .bind(user_id)
        .execute(&mut *tx)
        .await?;
    sqlx::query("INSERT INTO logins (user_id, refresh_token) VALUES ($1, NULL)")
        .bind(user_id)
        .execute(&mut *tx)
        .await?;
    tx.commit().await?;

    Ok(user_id)
}

pub async fn email_taken(db: &PgPool, email: &str) -> Result<bool> {
    let existing: Option<(Uuid,)> = sqlx::query_as("SELECT id FROM users WHERE email = $1")
        .bind(email)
        .fetch_optional(db)
        .await?;
    Ok(existing.is_some())
}

pub async fn login(db: &PgPool, tokens: &TokenService, req: LoginRequest) -> Result<TokenPair> {
    let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE email = $1")
        .bind(&req.email)
        .fetch_optional(db)
        .await?
        .ok_or_else(|| Error::Unauthorized("invalid email or password".into()))?;
    if user.is_withdrawn() || !user.verify_password(&req.password) {
        return Err(Error::Unauthorized("invalid email or password".into()));
    }

    let pair = tokens.issue_pair(user.id)?;
    store_refresh_token(db, user.id, &pair.refresh_token).await?;
    Ok(pair)
}

/// Rotate the token pair. The presented refresh token must match the one
/// stored at the last login; a revoked or superseded token is rejected.
pub async fn refresh(db: &PgPool, tokens: &TokenService, req: RefreshRequest) -> Result<TokenPair> {
    let claims = tokens.verify(&req.refresh_token, TokenType::Refresh)?;
    let login = sqlx::query_as::<_, Login>("SELECT * FROM logins WHERE user_id = $1")
        .bind(claims.sub)
        .fetch_optional(db)
        .await?
        .ok_or_else(|| Error::Unauthorized("unknown session".into()))?;
    if login.refresh_token.as_deref() != Some(req.refresh_token.as_str()) {
        return Err(Error::Unauthorized("refresh token revoked".into()));
    }

    let pair = tokens.issue_pair(claims.sub)?;
    store_refresh_token(db, claims.sub, &pair.refresh_token).await?;
    Ok(pair)
}

pub async fn logout(db: &PgPool, user_id: Uuid) -> Result<()> {
    sqlx::query("UPDATE logins SET refresh_token = NULL, updated_at = NOW() WHERE user_id = $1")
        .bind(user_id)
        .execute(db)
        .await?;
    Ok(())
}

async fn store_refresh_token(db: &PgPool, user_id: Uuid, refresh_token: &str) -> Result<()> {
    sqlx::query(
        "INSERT INTO logins (user_id, refresh_token) VALUES ($1, $2) \
         ON CONFLICT (user_id) DO UPDATE SET refresh_token = $2, updated_at = NOW()",
    )
    .bind(user_id)
    .bind(refresh_token)
    .execute(db)
    .await?;
    Ok(())
}
