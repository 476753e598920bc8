//! Secret hashing and verification (Argon2, PHC string format).

use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::{Algorithm, Argon2, Params, Version};
use thiserror::Error;

/// Checks a plaintext secret against a stored hash.
///
/// Implementations must compare in constant time.
pub trait SecretVerifier: Send + Sync {
    fn matches(&self, plaintext: &str, hash: &str) -> bool;

    /// A well-formed hash that no secret matches, costing the same to check as
    /// a stored one. Verified against when the principal does not exist.
    fn decoy_hash(&self) -> &str {
        ""
    }
}

const DECOY_SALT: &str = "d2FyZGVuLWRlY295LXNsdA";
const DECOY_OUTPUT: &str = "xxrEaqsAU2DXo86/n1o7dn8+CyCz9P7T2/C4kjnkTMo";

fn decoy_for(params: &Params) -> String {
    format!(
        "$argon2id$v=19$m={},t={},p={}${DECOY_SALT}${DECOY_OUTPUT}",
        params.m_cost(),
        params.t_cost(),
        params.p_cost()
    )
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SecretHashError {
    #[error("hashing failed: {0}")]
    Hashing(String),

    #[error("invalid argon2 parameters: {0}")]
    Params(String),
}

/// Argon2id hasher/verifier.
#[derive(Clone)]
pub struct Argon2Secrets {
    argon2: Argon2<'static>,
    decoy: String,
}

impl Default for Argon2Secrets {
    fn default() -> Self {
        Self::from_argon2(Argon2::default())
    }
}

impl core::fmt::Debug for Argon2Secrets {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str("Argon2Secrets")
    }
}

impl Argon2Secrets {
    pub fn new() -> Self {
        Self::default()
    }

    /// Custom cost parameters (memory in KiB, iterations, lanes).
    pub fn with_params(m_cost: u32, t_cost: u32, p_cost: u32) -> Result<Self, SecretHashError> {
        let params = Params::new(m_cost, t_cost, p_cost, None)
            .map_err(|e| SecretHashError::Params(e.to_string()))?;
        Ok(Self::from_argon2(Argon2::new(
            Algorithm::Argon2id,
            Version::V0x13,
            params,
        )))
    }

    fn from_argon2(argon2: Argon2<'static>) -> Self {
        let decoy = decoy_for(argon2.params());
        Self { argon2, decoy }
    }

    pub fn hash(&self, plaintext: &str) -> Result<String, SecretHashError> {
        let salt = SaltString::generate(&mut rand::rngs::OsRng);
        self.argon2
            .hash_password(plaintext.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|e| SecretHashError::Hashing(e.to_string()))
    }
}

impl SecretVerifier for Argon2Secrets {
    fn matches(&self, plaintext: &str, hash: &str) -> bool {
        let Ok(parsed) = PasswordHash::new(hash) else {
            tracing::warn!("stored secret hash is not a valid PHC string");
            return false;
        };
        self.argon2
            .verify_password(plaintext.as_bytes(), &parsed)
            .is_ok()
    }

    fn decoy_hash(&self) -> &str {
        &self.decoy
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fast() -> Argon2Secrets {
        Argon2Secrets::with_params(1024, 1, 1).unwrap()
    }

    #[test]
    fn hash_then_verify() {
        let secrets = fast();
        let hash = secrets.hash("customer123").unwrap();
        assert!(hash.starts_with("$argon2id$"));
        assert!(secrets.matches("customer123", &hash));
        assert!(!secrets.matches("customer124", &hash));
    }

    #[test]
    fn salts_differ_between_hashes() {
        let secrets = fast();
        assert_ne!(secrets.hash("same").unwrap(), secrets.hash("same").unwrap());
    }

    #[test]
    fn unparseable_hash_never_matches() {
        assert!(!fast().matches("anything", "plaintext-not-a-hash"));
        assert!(!fast().matches("", ""));
    }

    #[test]
    fn decoy_hash_is_well_formed_and_uses_configured_cost() {
        let secrets = fast();
        let decoy = secrets.decoy_hash();
        assert!(PasswordHash::new(decoy).is_ok());
        assert!(decoy.contains("m=1024,t=1,p=1"));
        assert!(!secrets.matches("", decoy));
        assert!(!secrets.matches("admin123", decoy));

        let defaults = Argon2Secrets::default();
        let real = defaults.hash("admin123").unwrap();
        let cost = |phc: &str| phc.split('$').nth(3).map(str::to_owned);
        assert_eq!(cost(defaults.decoy_hash()), cost(&real));
    }

    #[test]
    fn rejects_invalid_params() {
        assert!(matches!(
            Argon2Secrets::with_params(1, 0, 0),
            Err(SecretHashError::Params(_))
        ));
    }
}
