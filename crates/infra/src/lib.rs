//! Infrastructure layer: adapters for the record store and dev seeding.

pub mod principal_store;
pub mod seed;

pub use principal_store::{InMemoryPrincipalStore, NewPrincipal};
pub use seed::{DEMO_PRINCIPALS, SeedError, seed_demo_principals};
