//! Demo principals for local development.

use thiserror::Error;

use warden_auth::{Argon2Secrets, Role, SecretHashError};
use warden_core::DomainError;

use crate::principal_store::{InMemoryPrincipalStore, NewPrincipal};

/// (username, secret, role)
pub const DEMO_PRINCIPALS: [(&str, &str, Role); 5] = [
    ("admin", "admin123", Role::Admin),
    ("customer01", "customer123", Role::Customer),
    ("customer02", "customer123", Role::Customer),
    ("sales_clerk", "sales123", Role::SalesClerk),
    ("warehouse_supervisor", "warehouse123", Role::WarehouseSupervisor),
];

#[derive(Debug, Error)]
pub enum SeedError {
    #[error(transparent)]
    Hash(#[from] SecretHashError),

    #[error(transparent)]
    Store(#[from] DomainError),
}

/// Insert the demo principals if the store is empty.
///
/// Returns the number of principals inserted (0 when skipped).
pub fn seed_demo_principals(
    store: &InMemoryPrincipalStore,
    secrets: &Argon2Secrets,
) -> Result<usize, SeedError> {
    if !store.is_empty() {
        tracing::info!("principals already exist, skipping demo seed");
        return Ok(0);
    }

    tracing::info!("seeding demo principals");
    for (username, secret, role) in DEMO_PRINCIPALS {
        store.insert(NewPrincipal {
            username: username.to_string(),
            password_hash: secrets.hash(secret)?,
            role,
        })?;
    }
    tracing::info!(count = DEMO_PRINCIPALS.len(), "demo principals seeded");

    Ok(DEMO_PRINCIPALS.len())
}
