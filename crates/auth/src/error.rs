//! Boundary error taxonomy.
//!
//! Token failures of every kind collapse to [`AuthError::InvalidOrExpiredToken`]
//! and credential failures to [`AuthError::AuthenticationFailed`]; the specific
//! check that failed is only ever written to logs.

use thiserror::Error;

use warden_core::UserId;

use crate::{ConfigError, TokenError};

pub type AuthResult<T> = Result<T, AuthError>;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AuthError {
    /// Unknown username or wrong secret (deliberately indistinguishable).
    #[error("authentication failed")]
    AuthenticationFailed,

    /// Malformed, forged, not-yet-valid or expired token.
    #[error("invalid or expired token")]
    InvalidOrExpiredToken,

    /// The authorization policy rejected the request.
    #[error("access denied")]
    AccessDenied,

    /// Missing or weak configuration at startup (fatal).
    #[error("configuration error: {0}")]
    Configuration(#[from] ConfigError),

    /// Target record does not exist. Only reported to authorized callers.
    #[error("user {0} not found")]
    UserNotFound(UserId),

    #[error("token signing failed: {0}")]
    Signing(String),
}

impl From<TokenError> for AuthError {
    fn from(value: TokenError) -> Self {
        match value {
            TokenError::InvalidToken | TokenError::InvalidOrExpiredToken => {
                AuthError::InvalidOrExpiredToken
            }
            TokenError::Signing(msg) => AuthError::Signing(msg),
        }
    }
}
