//! User accounts, login sessions, and prepaid balances

use argon2::password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;
use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::{Error, Result};

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub name: String,
    pub deleted_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    pub fn hash_password(password: &str) -> Result<String> {
        let salt = SaltString::generate(&mut OsRng);
        Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map(|h| h.to_string())
            .map_err(|_| Error::PasswordHash)
    }

    pub fn verify_password(&self, password: &str) -> bool {
        PasswordHash::new(&self.password_hash)
            .map(|parsed| Argon2::default().verify_password(password.as_bytes(), &parsed).is_ok())
            .unwrap_or(false)
    }

    pub fn is_withdrawn(&self) -> bool {
        self.deleted_at.is_some()
    }
}

/// Refresh-token bookkeeping, one row per user.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Login {
    pub user_id: Uuid,
    pub refresh_token: Option<String>,
    pub updated_at: DateTime<Utc>,
}

/// Spendable funds, one live value per user. Never negative: an order whose
/// total exceeds the balance is rejected before any mutation.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Balance {
    pub user_id: Uuid,
    pub amount: i64,
    pub updated_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_password_round_trip() {
        let hash = User::hash_password("hunter2-hunter2").unwrap();
        let user = User {
            id: Uuid::new_v4(),
            email: "kim@example.com".into(),
            password_hash: hash,
            name: "Kim".into(),
            deleted_at: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        assert!(user.verify_password("hunter2-hunter2"));
        assert!(!user.verify_password("wrong-password"));
    }
}
