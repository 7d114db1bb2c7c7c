//! Shopping Mall Backend
//!
//! Self-hosted shopping mall service: accounts, carts, deliveries, orders.
//!
//! ## Features
//! - Signup/login with access + refresh tokens
//! - Shopping cart with stock-checked add/update
//! - Address book with a single default delivery target
//! - Atomic order placement debiting a prepaid balance

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;

pub mod auth;
pub mod domain;
pub mod response;
pub mod routes;
pub mod service;
pub mod state;

// =============================================================================
// Error Types
// =============================================================================

#[derive(Error, Debug)]
pub enum Error {
    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    InvalidInput(String),

    #[error("insufficient funds")]
    InsufficientFunds,

    #[error("insufficient stock")]
    InsufficientStock,

    #[error("email already registered")]
    DuplicateEmail,

    #[error("{0}")]
    Unauthorized(String),

    #[error("token error: {0}")]
    Token(#[from] jsonwebtoken::errors::Error),

    #[error("password hashing failed")]
    PasswordHash,

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl Error {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::InvalidInput(_) | Self::InsufficientFunds | Self::InsufficientStock => {
                StatusCode::BAD_REQUEST
            }
            Self::DuplicateEmail => StatusCode::CONFLICT,
            Self::Unauthorized(_) | Self::Token(_) => StatusCode::UNAUTHORIZED,
            Self::PasswordHash | Self::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = if status == StatusCode::INTERNAL_SERVER_ERROR {
            tracing::error!(error = %self, "request failed");
            "internal server error".to_string()
        } else {
            self.to_string()
        };
        (status, axum::Json(response::ApiResponse::fail(message))).into_response()
    }
}

pub type Result<T> = std::result::Result<T, Error>;
