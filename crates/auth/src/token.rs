//! Token issuance, validation and refresh.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use thiserror::Error;

use crate::claims::{TokenValidationError, validate_claims};
use crate::{AuthConfig, Claims, ClaimsCodec, Clock, CodecError, Hs256Codec, Identity, SystemClock, Token};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TokenError {
    #[error("invalid token")]
    InvalidToken,

    #[error("invalid or expired token")]
    InvalidOrExpiredToken,

    #[error("failed to sign token: {0}")]
    Signing(String),
}

/// Internal reason a token was rejected. Logged, never returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Rejection {
    Malformed,
    SignatureMismatch,
    Expired,
    NotYetValid,
    InvalidTimeWindow,
}

impl From<CodecError> for Rejection {
    fn from(value: CodecError) -> Self {
        match value {
            CodecError::SignatureMismatch => Rejection::SignatureMismatch,
            CodecError::MalformedToken | CodecError::Encoding(_) => Rejection::Malformed,
        }
    }
}

impl From<TokenValidationError> for Rejection {
    fn from(value: TokenValidationError) -> Self {
        match value {
            TokenValidationError::Expired => Rejection::Expired,
            TokenValidationError::NotYetValid => Rejection::NotYetValid,
            TokenValidationError::InvalidTimeWindow => Rejection::InvalidTimeWindow,
        }
    }
}

/// Issues and checks bearer tokens.
///
/// Stateless apart from the immutable codec key and a clock read, so a single
/// instance can be shared across request handlers.
#[derive(Clone)]
pub struct TokenService {
    codec: Arc<dyn ClaimsCodec>,
    clock: Arc<dyn Clock>,
    access_ttl: Duration,
    refresh_ttl: Duration,
}

impl core::fmt::Debug for TokenService {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("TokenService")
            .field("clock", &self.clock)
            .field("access_ttl", &self.access_ttl)
            .field("refresh_ttl", &self.refresh_ttl)
            .finish_non_exhaustive()
    }
}

impl TokenService {
    pub fn new(
        codec: Arc<dyn ClaimsCodec>,
        clock: Arc<dyn Clock>,
        access_ttl: Duration,
        refresh_ttl: Duration,
    ) -> Self {
        Self {
            codec,
            clock,
            access_ttl,
            refresh_ttl,
        }
    }

    /// HS256 service on the system clock.
    pub fn from_config(config: &AuthConfig) -> Self {
        Self::from_config_with_clock(config, Arc::new(SystemClock))
    }

    pub fn from_config_with_clock(config: &AuthConfig, clock: Arc<dyn Clock>) -> Self {
        Self::new(
            Arc::new(Hs256Codec::new(&config.signing_key)),
            clock,
            config.access_ttl,
            config.refresh_ttl,
        )
    }

    pub fn access_ttl(&self) -> Duration {
        self.access_ttl
    }

    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    /// Mint a token for `username` carrying `roles`, valid for the access TTL.
    pub fn issue<I, S>(&self, username: &str, roles: I) -> Result<Token, TokenError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.issue_for(username, roles, self.access_ttl)
    }

    fn issue_for<I, S>(&self, username: &str, roles: I, ttl: Duration) -> Result<Token, TokenError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let claims = Claims::new(username, roles, self.clock.now(), ttl)
            .ok_or_else(|| TokenError::Signing("token expiry is out of range".to_string()))?;
        self.codec
            .encode(&claims)
            .map_err(|e| TokenError::Signing(e.to_string()))
    }

    /// Whether `token` is authentic and inside its validity window right now.
    ///
    /// Accepts any string; never fails.
    pub fn validate(&self, token: &str) -> bool {
        self.verify(token).is_ok()
    }

    /// Identity carried by a currently valid token.
    pub fn extract_identity(&self, token: &str) -> Result<Identity, TokenError> {
        let claims = self.verify(token).map_err(|_| TokenError::InvalidToken)?;
        Ok(Identity::new(claims.sub, claims.roles))
    }

    /// Mint a fresh token with the same subject and roles as a valid `old` one.
    ///
    /// The old token is not revoked; it stays valid until its own expiry.
    pub fn refresh(&self, old: &str) -> Result<Token, TokenError> {
        let claims = self
            .verify(old)
            .map_err(|_| TokenError::InvalidOrExpiredToken)?;
        let token = self.issue_for(&claims.sub, claims.roles, self.refresh_ttl)?;
        tracing::debug!(subject = %claims.sub, "token refreshed");
        Ok(token)
    }

    fn verify(&self, token: &str) -> Result<Claims, Rejection> {
        let result = self.codec.decode(token).map_err(Rejection::from).and_then(|claims| {
            validate_claims(&claims, self.clock.now())
                .map(|()| claims)
                .map_err(Rejection::from)
        });

        if let Err(reason) = &result {
            tracing::debug!(?reason, "token rejected");
        }
        result
    }
}
