//! Policies for user-record operations and resource areas.
//!
//! Call sites compose these explicitly instead of matching URL patterns.

use warden_auth::{Policy, Role};
use warden_core::UserId;

/// An operation on user records that requires an authenticated caller.
///
/// Registration is open and does not consult the gateway.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UserOperation {
    GetCurrent,
    Get(UserId),
    List,
    Update(UserId),
    Delete(UserId),
}

impl UserOperation {
    pub fn policy(&self) -> Policy {
        match *self {
            UserOperation::GetCurrent => Policy::Open,
            UserOperation::Get(target) => Policy::SelfOrAdmin { target },
            UserOperation::List => Policy::AdminOnly,
            UserOperation::Update(target) => Policy::SelfOnly { target },
            UserOperation::Delete(_) => Policy::AdminOnly,
        }
    }

    /// Record that must exist once the caller is authorized.
    pub fn target(&self) -> Option<UserId> {
        match *self {
            UserOperation::Get(id) | UserOperation::Update(id) | UserOperation::Delete(id) => Some(id),
            UserOperation::GetCurrent | UserOperation::List => None,
        }
    }
}

/// Coarse resource areas outside user management.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceArea {
    /// Orders and products back office.
    Catalog,
    /// Carts, categories, own orders and payments.
    Storefront,
    Administration,
}

impl ResourceArea {
    pub fn policy(&self) -> Policy {
        match self {
            ResourceArea::Catalog => Policy::any_role([Role::SalesClerk, Role::WarehouseSupervisor]),
            ResourceArea::Storefront => Policy::any_role([Role::Customer]),
            ResourceArea::Administration => Policy::AdminOnly,
        }
    }
}
