//! Authorization decisions.
//!
//! - No IO
//! - No panics
//! - No implicit "current user": the caller's identity is always an argument

use serde::Serialize;

use warden_core::UserId;

use crate::{AuthError, Identity, Role};

/// Outcome of a policy check.
///
/// `reason` is meant for internal logs and audit; it must not be echoed to
/// external callers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AuthorizationDecision {
    pub allow: bool,
    pub reason: String,
    pub denial: Option<DenialKind>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DenialKind {
    /// Caller is not the owner of the target record.
    NotOwner,
    /// Caller holds none of the required roles.
    MissingRole,
}

impl AuthorizationDecision {
    pub fn allow(reason: impl Into<String>) -> Self {
        Self {
            allow: true,
            reason: reason.into(),
            denial: None,
        }
    }

    pub fn deny(kind: DenialKind, reason: impl Into<String>) -> Self {
        Self {
            allow: false,
            reason: reason.into(),
            denial: Some(kind),
        }
    }

    /// Turn a denial into [`AuthError::AccessDenied`].
    pub fn into_result(self) -> Result<(), AuthError> {
        if self.allow {
            Ok(())
        } else {
            Err(AuthError::AccessDenied)
        }
    }
}

/// A policy composed by the call site for one operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Policy {
    /// Any caller holding a valid token.
    Open,
    /// Callers holding ADMIN.
    AdminOnly,
    /// The owner of `target`, or an ADMIN.
    SelfOrAdmin { target: UserId },
    /// The owner of `target` only.
    SelfOnly { target: UserId },
    /// Callers holding at least one of the listed roles.
    AnyRole(Vec<Role>),
}

impl Policy {
    pub fn any_role(roles: impl IntoIterator<Item = Role>) -> Self {
        Policy::AnyRole(roles.into_iter().collect())
    }

    /// Whether evaluating this policy needs the caller's record id.
    pub fn needs_caller_id(&self) -> bool {
        matches!(self, Policy::SelfOrAdmin { .. } | Policy::SelfOnly { .. })
    }

    /// Evaluate against a caller. `caller_id` is `None` when the caller's
    /// record could not be resolved, in which case ownership never holds.
    pub fn evaluate(&self, caller: &Identity, caller_id: Option<UserId>) -> AuthorizationDecision {
        match self {
            Policy::Open => AuthorizationDecision::allow("open to any authenticated caller"),
            Policy::AdminOnly => decide_admin_only(caller),
            Policy::SelfOrAdmin { target } => match caller_id {
                Some(id) => decide_self_or_admin(caller, *target, id),
                None => {
                    let decision = decide_admin_only(caller);
                    if decision.allow {
                        decision
                    } else {
                        AuthorizationDecision::deny(
                            DenialKind::NotOwner,
                            format!("caller record unresolved and not {}", Role::Admin),
                        )
                    }
                }
            },
            Policy::SelfOnly { target } => match caller_id {
                Some(id) => decide_self_only(id, *target),
                None => AuthorizationDecision::deny(DenialKind::NotOwner, "caller record unresolved"),
            },
            Policy::AnyRole(allowed) => decide_role_allowed(caller, allowed),
        }
    }
}

/// ALLOW if the caller owns `target` or holds ADMIN.
pub fn decide_self_or_admin(caller: &Identity, target: UserId, caller_id: UserId) -> AuthorizationDecision {
    if caller_id == target {
        return AuthorizationDecision::allow(format!("caller owns user {target}"));
    }
    if caller.is_admin() {
        return AuthorizationDecision::allow(format!("caller holds {}", Role::Admin));
    }
    AuthorizationDecision::deny(
        DenialKind::NotOwner,
        format!("caller (user {caller_id}) neither owns user {target} nor holds {}", Role::Admin),
    )
}

/// ALLOW only if the caller owns `target`.
pub fn decide_self_only(caller_id: UserId, target: UserId) -> AuthorizationDecision {
    if caller_id == target {
        AuthorizationDecision::allow(format!("caller owns user {target}"))
    } else {
        AuthorizationDecision::deny(
            DenialKind::NotOwner,
            format!("caller (user {caller_id}) does not own user {target}"),
        )
    }
}

/// ALLOW iff the caller holds ADMIN (exact, case-sensitive).
pub fn decide_admin_only(caller: &Identity) -> AuthorizationDecision {
    if caller.is_admin() {
        AuthorizationDecision::allow(format!("caller holds {}", Role::Admin))
    } else {
        AuthorizationDecision::deny(
            DenialKind::MissingRole,
            format!("caller roles {:?} do not include {}", caller.roles, Role::Admin),
        )
    }
}

/// ALLOW iff the caller holds at least one of `allowed`.
pub fn decide_role_allowed(caller: &Identity, allowed: &[Role]) -> AuthorizationDecision {
    match allowed.iter().find(|role| caller.has_role(**role)) {
        Some(role) => AuthorizationDecision::allow(format!("caller holds {role}")),
        None => AuthorizationDecision::deny(
            DenialKind::MissingRole,
            format!(
                "caller roles {:?} share nothing with {:?}",
                caller.roles,
                allowed.iter().map(Role::as_str).collect::<Vec<_>>()
            ),
        ),
    }
}
