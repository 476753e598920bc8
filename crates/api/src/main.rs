use warden_auth::AuthConfig;

fn main() -> anyhow::Result<()> {
    warden_observability::init();

    let config = match AuthConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!(error = %e, "refusing to start: invalid auth configuration");
            return Err(e.into());
        }
    };

    let app = warden_api::bootstrap(config)?;

    tracing::info!(
        access_ttl_secs = app.config.access_ttl.num_seconds(),
        refresh_ttl_secs = app.config.refresh_ttl.num_seconds(),
        principals = app.store.len(),
        "auth engine ready"
    );

    Ok(())
}
