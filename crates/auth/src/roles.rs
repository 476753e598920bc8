use core::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Role held by a principal.
///
/// This is a closed enumeration. Role names travel inside tokens as plain
/// strings; a string only ever denotes a role if it matches one of these names
/// exactly (case-sensitive).
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    Admin,
    Customer,
    SalesClerk,
    WarehouseSupervisor,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("unknown role '{0}'")]
pub struct UnknownRole(pub String);

impl Role {
    pub const ALL: [Role; 4] = [
        Role::Admin,
        Role::Customer,
        Role::SalesClerk,
        Role::WarehouseSupervisor,
    ];

    pub const fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "ADMIN",
            Role::Customer => "CUSTOMER",
            Role::SalesClerk => "SALES_CLERK",
            Role::WarehouseSupervisor => "WAREHOUSE_SUPERVISOR",
        }
    }

    /// Exact, case-sensitive match of a role name carried in a token.
    pub fn matches(&self, name: &str) -> bool {
        self.as_str() == name
    }

    /// Message shown to a freshly signed-in principal holding this role.
    pub const fn landing_message(&self) -> &'static str {
        match self {
            Role::Admin => "Welcome to admin home page",
            Role::WarehouseSupervisor => "Welcome to warehouse home page",
            Role::SalesClerk => "Welcome to sales clerk home page",
            Role::Customer => "Welcome to customer home page",
        }
    }
}

impl FromStr for Role {
    type Err = UnknownRole;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Role::ALL
            .into_iter()
            .find(|role| role.matches(s))
            .ok_or_else(|| UnknownRole(s.to_string()))
    }
}

impl core::fmt::Display for Role {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}
