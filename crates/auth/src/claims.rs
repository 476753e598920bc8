use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Token claims model (transport-agnostic).
///
/// This is the complete set of claims a warden token carries. Timestamps are
/// whole seconds on the wire (`iat`/`exp` as NumericDate).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Subject: the principal's username.
    pub sub: String,

    /// Role names, ordered, without duplicates.
    pub roles: Vec<String>,

    /// Issued-at timestamp.
    #[serde(rename = "iat", with = "chrono::serde::ts_seconds")]
    pub issued_at: DateTime<Utc>,

    /// Expiration timestamp.
    #[serde(rename = "exp", with = "chrono::serde::ts_seconds")]
    pub expires_at: DateTime<Utc>,
}

impl Claims {
    /// Build claims valid for `ttl` starting at `now` (truncated to the second).
    ///
    /// Returns `None` when the expiry falls outside the representable range.
    pub fn new<I, S>(
        subject: impl Into<String>,
        roles: I,
        now: DateTime<Utc>,
        ttl: Duration,
    ) -> Option<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let issued_at = truncate_to_second(now);
        let expires_at = issued_at.checked_add_signed(ttl)?;
        let mut ordered: Vec<String> = Vec::new();
        for role in roles {
            let role = role.into();
            if !ordered.contains(&role) {
                ordered.push(role);
            }
        }

        Some(Self {
            sub: subject.into(),
            roles: ordered,
            issued_at,
            expires_at,
        })
    }
}

fn truncate_to_second(ts: DateTime<Utc>) -> DateTime<Utc> {
    DateTime::from_timestamp(ts.timestamp(), 0).unwrap_or(ts)
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TokenValidationError {
    #[error("token has expired")]
    Expired,

    #[error("token not yet valid (issued_at is in the future)")]
    NotYetValid,

    #[error("invalid token time window (expires_at <= issued_at)")]
    InvalidTimeWindow,
}

/// Deterministically validate the claim time window.
///
/// Note: this validates the *claims* only. Signature verification happens in
/// the codec.
pub fn validate_claims(claims: &Claims, now: DateTime<Utc>) -> Result<(), TokenValidationError> {
    if claims.expires_at <= claims.issued_at {
        return Err(TokenValidationError::InvalidTimeWindow);
    }
    if now < claims.issued_at {
        return Err(TokenValidationError::NotYetValid);
    }
    if now >= claims.expires_at {
        return Err(TokenValidationError::Expired);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(secs: i64) -> DateTime<Utc> {
        DateTime::from_timestamp(secs, 0).unwrap()
    }

    #[test]
    fn new_truncates_and_deduplicates() {
        let now = DateTime::from_timestamp(1_700_000_000, 750_000_000).unwrap();
        let claims = Claims::new("alice", ["CUSTOMER", "ADMIN", "CUSTOMER"], now, Duration::seconds(60))
            .unwrap();

        assert_eq!(claims.issued_at, at(1_700_000_000));
        assert_eq!(claims.expires_at, at(1_700_000_060));
        assert_eq!(claims.roles, vec!["CUSTOMER".to_string(), "ADMIN".to_string()]);
    }

    #[test]
    fn expiry_past_the_calendar_range_is_refused() {
        let now = at(1_700_000_000);
        assert!(Claims::new("alice", ["CUSTOMER"], now, Duration::seconds(10_000_000_000_000)).is_none());
        assert!(Claims::new("alice", ["CUSTOMER"], now, Duration::days(200_000_000)).is_none());
    }

    #[test]
    fn window_is_half_open() {
        let claims = Claims::new("alice", ["CUSTOMER"], at(100), Duration::seconds(10)).unwrap();

        assert_eq!(validate_claims(&claims, at(99)), Err(TokenValidationError::NotYetValid));
        assert_eq!(validate_claims(&claims, at(100)), Ok(()));
        assert_eq!(validate_claims(&claims, at(109)), Ok(()));
        assert_eq!(validate_claims(&claims, at(110)), Err(TokenValidationError::Expired));
    }

    #[test]
    fn rejects_inverted_window() {
        let mut claims = Claims::new("alice", ["CUSTOMER"], at(100), Duration::seconds(10)).unwrap();
        claims.expires_at = claims.issued_at;
        assert_eq!(
            validate_claims(&claims, at(100)),
            Err(TokenValidationError::InvalidTimeWindow)
        );
    }

    #[test]
    fn wire_format_uses_numeric_dates() {
        let claims = Claims::new("alice", ["CUSTOMER"], at(1_000), Duration::seconds(3600)).unwrap();
        let json = serde_json::to_value(&claims).unwrap();
        assert_eq!(json["sub"], "alice");
        assert_eq!(json["iat"], 1_000);
        assert_eq!(json["exp"], 4_600);
        assert_eq!(json["roles"][0], "CUSTOMER");
    }
}
