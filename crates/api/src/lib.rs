//! Authentication boundary: the surface an inbound request dispatcher calls.

pub mod access;
pub mod bearer;
pub mod bootstrap;
pub mod context;
pub mod errors;
pub mod gateway;

pub use access::{ResourceArea, UserOperation};
pub use bearer::bearer_token;
pub use bootstrap::{AppContext, BootstrapError, bootstrap, bootstrap_with_clock};
pub use context::CallerContext;
pub use errors::Rejection;
pub use gateway::AuthGateway;
