//! Record-store adapters for principals.

pub mod in_memory;

pub use in_memory::{InMemoryPrincipalStore, NewPrincipal};
