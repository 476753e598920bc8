//! Process wiring: configuration, record store and gateway.

use std::sync::Arc;

use thiserror::Error;

use warden_auth::{Argon2Secrets, AuthConfig, Clock, ConfigError, SystemClock, TokenService};
use warden_infra::{InMemoryPrincipalStore, SeedError, seed_demo_principals};

use crate::gateway::AuthGateway;

pub type DefaultGateway = AuthGateway<Arc<InMemoryPrincipalStore>, Argon2Secrets>;

#[derive(Debug, Error)]
pub enum BootstrapError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("failed to seed demo principals: {0}")]
    Seed(#[from] SeedError),
}

pub struct AppContext {
    pub config: AuthConfig,
    pub store: Arc<InMemoryPrincipalStore>,
    pub secrets: Argon2Secrets,
    pub gateway: DefaultGateway,
}

pub fn bootstrap(config: AuthConfig) -> Result<AppContext, BootstrapError> {
    bootstrap_with_clock(config, Argon2Secrets::new(), Arc::new(SystemClock))
}

pub fn bootstrap_with_clock(
    config: AuthConfig,
    secrets: Argon2Secrets,
    clock: Arc<dyn Clock>,
) -> Result<AppContext, BootstrapError> {
    let store = Arc::new(InMemoryPrincipalStore::new());
    if config.seed_demo_users {
        seed_demo_principals(&store, &secrets)?;
    }

    let tokens = TokenService::from_config_with_clock(&config, clock);
    let gateway = AuthGateway::new(store.clone(), secrets.clone(), tokens);

    Ok(AppContext {
        config,
        store,
        secrets,
        gateway,
    })
}
