//! Bearer credential extraction from an `Authorization` header value.

use warden_auth::{AuthError, AuthResult};

/// Extract the token from `Bearer <token>`.
///
/// A missing scheme or empty token is reported like any other bad token.
pub fn bearer_token(header: &str) -> AuthResult<&str> {
    let token = header
        .strip_prefix("Bearer ")
        .ok_or(AuthError::InvalidOrExpiredToken)?
        .trim();

    if token.is_empty() {
        return Err(AuthError::InvalidOrExpiredToken);
    }

    Ok(token)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_token() {
        assert_eq!(bearer_token("Bearer abc.def.ghi"), Ok("abc.def.ghi"));
        assert_eq!(bearer_token("Bearer   abc  "), Ok("abc"));
    }

    #[test]
    fn rejects_other_schemes_and_empty_tokens() {
        for header in ["", "Bearer", "Bearer ", "Bearer    ", "Basic dXNlcjpwYXNz", "bearer abc", "abc"] {
            assert_eq!(bearer_token(header), Err(AuthError::InvalidOrExpiredToken), "{header:?}");
        }
    }
}
