use serde::{Deserialize, Serialize};

use warden_core::UserId;

use crate::Role;

/// A user record as owned by the external record store.
///
/// Read-only from the point of view of this crate.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrincipalRecord {
    pub id: UserId,
    pub username: String,
    pub password_hash: String,
    pub role: Role,
}

impl core::fmt::Debug for PrincipalRecord {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("PrincipalRecord")
            .field("id", &self.id)
            .field("username", &self.username)
            .field("password_hash", &"<redacted>")
            .field("role", &self.role)
            .finish()
    }
}

/// Username/secret pair presented for a single authentication attempt.
///
/// Never persisted; the secret is redacted from `Debug` output.
#[derive(Clone, Deserialize)]
pub struct Credentials {
    pub username: String,
    pub secret: String,
}

impl Credentials {
    pub fn new(username: impl Into<String>, secret: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            secret: secret.into(),
        }
    }
}

impl core::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("secret", &"<redacted>")
            .finish()
    }
}

/// Verified caller identity, produced once per request by decoding its token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Identity {
    pub username: String,
    /// Role names exactly as embedded in the token (may include unknown names).
    pub roles: Vec<String>,
}

impl Identity {
    pub fn new(username: impl Into<String>, roles: Vec<String>) -> Self {
        Self {
            username: username.into(),
            roles,
        }
    }

    pub fn has_role(&self, role: Role) -> bool {
        self.roles.iter().any(|name| role.matches(name))
    }

    pub fn is_admin(&self) -> bool {
        self.has_role(Role::Admin)
    }
}
