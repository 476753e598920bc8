use warden_auth::{Identity, Role};
use warden_core::UserId;

/// Caller context for a request: verified identity plus the caller's record id.
///
/// Produced once per request from its bearer token and passed explicitly to
/// every authorization-aware operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallerContext {
    identity: Identity,
    user_id: Option<UserId>,
}

impl CallerContext {
    pub fn new(identity: Identity, user_id: Option<UserId>) -> Self {
        Self { identity, user_id }
    }

    pub fn identity(&self) -> &Identity {
        &self.identity
    }

    pub fn username(&self) -> &str {
        &self.identity.username
    }

    pub fn roles(&self) -> &[String] {
        &self.identity.roles
    }

    /// `None` when the caller's record no longer exists.
    pub fn user_id(&self) -> Option<UserId> {
        self.user_id
    }

    pub fn has_role(&self, role: Role) -> bool {
        self.identity.has_role(role)
    }
}
