//! Engine configuration.
//!
//! Configuration is resolved once at process start. Any [`ConfigError`] is
//! fatal: the process must not serve traffic with a missing or weak key.

use std::sync::Arc;

use chrono::Duration;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Minimum signing key length in bytes.
pub const MIN_SIGNING_KEY_LEN: usize = 32;

/// Default access token lifetime (10 hours).
pub const DEFAULT_ACCESS_TTL_SECS: i64 = 36_000;

/// Longest accepted token lifetime (365 days).
pub const MAX_TTL_SECS: i64 = 31_536_000;

pub const ENV_SECRET: &str = "JWT_SECRET";
pub const ENV_ACCESS_TTL: &str = "JWT_EXPIRATION_SECS";
pub const ENV_REFRESH_TTL: &str = "JWT_REFRESH_EXPIRATION_SECS";
pub const ENV_SEED_DEMO_USERS: &str = "WARDEN_SEED_DEMO_USERS";

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("signing key is not configured")]
    MissingSigningKey,

    #[error("signing key is too weak (need at least 32 bytes of key material)")]
    WeakSigningKey,

    #[error("invalid {name}: must be between one second and 365 days")]
    InvalidTtl { name: &'static str },

    #[error("invalid value for {name}: {reason}")]
    InvalidValue { name: &'static str, reason: String },
}

/// Raw, deserializable settings.
#[derive(Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthSettings {
    /// Secret key material for signing tokens.
    #[serde(skip_serializing)]
    pub secret: Option<String>,
    /// Access token lifetime in seconds.
    pub access_ttl_secs: i64,
    /// Lifetime of tokens minted by refresh; falls back to the access TTL.
    pub refresh_ttl_secs: Option<i64>,
    /// Seed the demo principals into an empty store at startup.
    pub seed_demo_users: bool,
}

impl Default for AuthSettings {
    fn default() -> Self {
        Self {
            secret: None,
            access_ttl_secs: DEFAULT_ACCESS_TTL_SECS,
            refresh_ttl_secs: None,
            seed_demo_users: false,
        }
    }
}

impl core::fmt::Debug for AuthSettings {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("AuthSettings")
            .field("secret", &self.secret.as_ref().map(|_| "<redacted>"))
            .field("access_ttl_secs", &self.access_ttl_secs)
            .field("refresh_ttl_secs", &self.refresh_ttl_secs)
            .field("seed_demo_users", &self.seed_demo_users)
            .finish()
    }
}

impl AuthSettings {
    /// Read settings from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read settings through an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut settings = Self {
            secret: lookup(ENV_SECRET).filter(|s| !s.is_empty()),
            ..Self::default()
        };

        if let Some(raw) = lookup(ENV_ACCESS_TTL) {
            settings.access_ttl_secs = parse_secs(ENV_ACCESS_TTL, &raw)?;
        }
        if let Some(raw) = lookup(ENV_REFRESH_TTL) {
            settings.refresh_ttl_secs = Some(parse_secs(ENV_REFRESH_TTL, &raw)?);
        }
        if let Some(raw) = lookup(ENV_SEED_DEMO_USERS) {
            settings.seed_demo_users =
                raw.trim()
                    .parse::<bool>()
                    .map_err(|e| ConfigError::InvalidValue {
                        name: ENV_SEED_DEMO_USERS,
                        reason: e.to_string(),
                    })?;
        }

        Ok(settings)
    }
}

fn parse_secs(name: &'static str, raw: &str) -> Result<i64, ConfigError> {
    raw.trim().parse::<i64>().map_err(|e| ConfigError::InvalidValue {
        name,
        reason: e.to_string(),
    })
}

/// Process-wide signing key. Immutable once loaded; never printed.
#[derive(Clone, PartialEq, Eq)]
pub struct SigningKey(Arc<[u8]>);

impl SigningKey {
    pub fn new(material: impl AsRef<[u8]>) -> Result<Self, ConfigError> {
        let bytes = material.as_ref();
        if bytes.is_empty() {
            return Err(ConfigError::MissingSigningKey);
        }
        if bytes.len() < MIN_SIGNING_KEY_LEN || bytes.iter().all(|b| *b == bytes[0]) {
            return Err(ConfigError::WeakSigningKey);
        }
        Ok(Self(Arc::from(bytes)))
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

impl core::fmt::Debug for SigningKey {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str("SigningKey(<redacted>)")
    }
}

const ACCESS_TTL: &str = "access token TTL";
const REFRESH_TTL: &str = "refresh token TTL";

fn check_ttl(name: &'static str, ttl: Duration) -> Result<(), ConfigError> {
    if ttl < Duration::seconds(1) || ttl > Duration::seconds(MAX_TTL_SECS) {
        return Err(ConfigError::InvalidTtl { name });
    }
    Ok(())
}

fn ttl_from_secs(name: &'static str, secs: i64) -> Result<Duration, ConfigError> {
    Duration::try_seconds(secs).ok_or(ConfigError::InvalidTtl { name })
}

/// Validated configuration.
#[derive(Debug, Clone)]
pub struct AuthConfig {
    pub signing_key: SigningKey,
    pub access_ttl: Duration,
    pub refresh_ttl: Duration,
    pub seed_demo_users: bool,
}

impl AuthConfig {
    pub fn new(signing_key: SigningKey, access_ttl: Duration) -> Result<Self, ConfigError> {
        check_ttl(ACCESS_TTL, access_ttl)?;
        Ok(Self {
            signing_key,
            access_ttl,
            refresh_ttl: access_ttl,
            seed_demo_users: false,
        })
    }

    pub fn with_refresh_ttl(mut self, refresh_ttl: Duration) -> Result<Self, ConfigError> {
        check_ttl(REFRESH_TTL, refresh_ttl)?;
        self.refresh_ttl = refresh_ttl;
        Ok(self)
    }

    pub fn from_env() -> Result<Self, ConfigError> {
        AuthSettings::from_env()?.try_into()
    }
}

impl TryFrom<AuthSettings> for AuthConfig {
    type Error = ConfigError;

    fn try_from(settings: AuthSettings) -> Result<Self, Self::Error> {
        let secret = settings.secret.ok_or(ConfigError::MissingSigningKey)?;
        let key = SigningKey::new(secret.as_bytes())?;

        let access_ttl = ttl_from_secs(ACCESS_TTL, settings.access_ttl_secs)?;
        let mut config = AuthConfig::new(key, access_ttl)?;
        if let Some(secs) = settings.refresh_ttl_secs {
            config = config.with_refresh_ttl(ttl_from_secs(REFRESH_TTL, secs)?)?;
        }
        config.seed_demo_users = settings.seed_demo_users;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    const GOOD_SECRET: &str = "0123456789abcdef0123456789abcdef-warden";

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn missing_secret_is_fatal() {
        let settings = AuthSettings::from_lookup(lookup(&[])).unwrap();
        let err = AuthConfig::try_from(settings).unwrap_err();
        assert_eq!(err, ConfigError::MissingSigningKey);

        let settings = AuthSettings::from_lookup(lookup(&[(ENV_SECRET, "")])).unwrap();
        assert_eq!(AuthConfig::try_from(settings).unwrap_err(), ConfigError::MissingSigningKey);
    }

    #[test]
    fn short_or_degenerate_secrets_are_rejected() {
        assert_eq!(SigningKey::new("your_secret_key").unwrap_err(), ConfigError::WeakSigningKey);
        assert_eq!(SigningKey::new([b'a'; 64]).unwrap_err(), ConfigError::WeakSigningKey);
        assert!(SigningKey::new(GOOD_SECRET).is_ok());
    }

    #[test]
    fn defaults_follow_access_ttl() {
        let settings = AuthSettings::from_lookup(lookup(&[(ENV_SECRET, GOOD_SECRET)])).unwrap();
        let config = AuthConfig::try_from(settings).unwrap();
        assert_eq!(config.access_ttl, Duration::seconds(DEFAULT_ACCESS_TTL_SECS));
        assert_eq!(config.refresh_ttl, config.access_ttl);
        assert!(!config.seed_demo_users);
    }

    #[test]
    fn reads_ttls_and_seed_flag() {
        let settings = AuthSettings::from_lookup(lookup(&[
            (ENV_SECRET, GOOD_SECRET),
            (ENV_ACCESS_TTL, "3600"),
            (ENV_REFRESH_TTL, "86400"),
            (ENV_SEED_DEMO_USERS, "true"),
        ]))
        .unwrap();
        let config = AuthConfig::try_from(settings).unwrap();
        assert_eq!(config.access_ttl, Duration::seconds(3600));
        assert_eq!(config.refresh_ttl, Duration::seconds(86400));
        assert!(config.seed_demo_users);
    }

    #[test]
    fn rejects_non_positive_ttls() {
        let settings = AuthSettings::from_lookup(lookup(&[
            (ENV_SECRET, GOOD_SECRET),
            (ENV_ACCESS_TTL, "0"),
        ]))
        .unwrap();
        assert!(matches!(
            AuthConfig::try_from(settings),
            Err(ConfigError::InvalidTtl { .. })
        ));

        let err = AuthSettings::from_lookup(lookup(&[(ENV_ACCESS_TTL, "ten hours")])).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { name: ENV_ACCESS_TTL, .. }));
    }

    #[test]
    fn rejects_ttls_beyond_a_year_without_panicking() {
        for raw in ["9223372036854775807", "10000000000000", "31536001"] {
            let settings = AuthSettings::from_lookup(lookup(&[
                (ENV_SECRET, GOOD_SECRET),
                (ENV_ACCESS_TTL, raw),
            ]))
            .unwrap();
            assert_eq!(
                AuthConfig::try_from(settings).unwrap_err(),
                ConfigError::InvalidTtl { name: ACCESS_TTL },
                "access ttl {raw}"
            );

            let settings = AuthSettings::from_lookup(lookup(&[
                (ENV_SECRET, GOOD_SECRET),
                (ENV_REFRESH_TTL, raw),
            ]))
            .unwrap();
            assert_eq!(
                AuthConfig::try_from(settings).unwrap_err(),
                ConfigError::InvalidTtl { name: REFRESH_TTL },
                "refresh ttl {raw}"
            );
        }

        let settings = AuthSettings::from_lookup(lookup(&[
            (ENV_SECRET, GOOD_SECRET),
            (ENV_ACCESS_TTL, "31536000"),
        ]))
        .unwrap();
        assert_eq!(AuthConfig::try_from(settings).unwrap().access_ttl, Duration::seconds(MAX_TTL_SECS));
    }

    #[test]
    fn secret_is_never_serialized_or_printed() {
        let settings = AuthSettings {
            secret: Some(GOOD_SECRET.to_string()),
            ..AuthSettings::default()
        };
        let json = serde_json::to_string(&settings).unwrap();
        assert!(!json.contains(GOOD_SECRET));
        assert!(!format!("{settings:?}").contains(GOOD_SECRET));

        let config = AuthConfig::try_from(settings).unwrap();
        assert!(!format!("{config:?}").contains(GOOD_SECRET));
    }

    #[test]
    fn settings_deserialize_with_defaults() {
        let settings: AuthSettings =
            serde_json::from_str(&format!(r#"{{"secret":"{GOOD_SECRET}","access_ttl_secs":60}}"#)).unwrap();
        let config = AuthConfig::try_from(settings).unwrap();
        assert_eq!(config.access_ttl, Duration::seconds(60));
        assert_eq!(config.refresh_ttl, Duration::seconds(60));
    }
}
