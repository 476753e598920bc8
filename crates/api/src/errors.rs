//! Uniform external rejections.
//!
//! Messages are fixed per error kind so callers cannot tell which internal
//! check failed.

use serde::Serialize;
use serde_json::json;

use warden_auth::AuthError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Rejection {
    pub status: u16,
    pub code: &'static str,
    pub message: &'static str,
}

impl Rejection {
    pub fn to_json(&self) -> serde_json::Value {
        json!({
            "error": self.code,
            "message": self.message,
        })
    }
}

impl From<&AuthError> for Rejection {
    fn from(err: &AuthError) -> Self {
        match err {
            AuthError::AuthenticationFailed => Rejection {
                status: 401,
                code: "authentication_failed",
                message: "Authentication failed",
            },
            AuthError::InvalidOrExpiredToken => Rejection {
                status: 401,
                code: "invalid_or_expired_token",
                message: "Invalid or expired token",
            },
            AuthError::AccessDenied => Rejection {
                status: 403,
                code: "access_denied",
                message: "Access denied",
            },
            AuthError::UserNotFound(_) => Rejection {
                status: 404,
                code: "not_found",
                message: "User not found",
            },
            AuthError::Configuration(_) | AuthError::Signing(_) => Rejection {
                status: 500,
                code: "internal_error",
                message: "Internal error",
            },
        }
    }
}

impl From<AuthError> for Rejection {
    fn from(err: AuthError) -> Self {
        Rejection::from(&err)
    }
}
