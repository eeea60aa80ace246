//! Error kinds surfaced by the auth service
//!
//! The HTTP status mapping lives in `response.rs`.

use thiserror::Error;

/// Message shared by every refresh/logout session mismatch
pub const INVALID_REFRESH_TOKEN: &str = "invalid refresh token";

/// Custom error type for authentication errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    /// Unknown email or wrong password, deliberately indistinguishable
    #[error("invalid email or password")]
    InvalidCredentials,

    #[error("{0}")]
    NotFound(String),

    /// Malformed input
    #[error("{0}")]
    BadRequest(String),

    /// Missing or unverifiable token at the gate
    #[error("{0}")]
    Unauthorized(String),

    /// Verified token that fails the stored-session cross-check
    #[error("{0}")]
    Forbidden(String),

    /// Hashing, signing or storage failure
    #[error("internal error: {0}")]
    Internal(String),
}

impl AuthError {
    pub fn invalid_refresh_token() -> Self {
        AuthError::Forbidden(INVALID_REFRESH_TOKEN.to_string())
    }
}

/// Type alias for auth results
pub type AuthResult<T> = Result<T, AuthError>;
