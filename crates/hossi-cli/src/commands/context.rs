use anyhow::{Context, Result};
use hossi_application::ClientContext;
use hossi_infrastructure::{ConfigService, FileSessionStore};
use hossi_interaction::ReqwestTransport;
use std::sync::Arc;

/// Builds a client context from the on-disk config and session.
///
/// `api_url` wins over both `config.toml` and `HOSSI_API_BASE_URL`.
pub fn build(api_url: Option<String>) -> Result<ClientContext> {
    let mut config = ConfigService::new()
        .and_then(|service| service.get_config())
        .context("Failed to load configuration")?;
    if let Some(url) = api_url {
        config.api_base_url = url;
    }

    let store = Arc::new(FileSessionStore::open_default().context("Failed to open session store")?);
    tracing::debug!("[Cli] Session file: {}", store.path().display());

    Ok(ClientContext::bootstrap(
        &config,
        store,
        Arc::new(ReqwestTransport::new()),
    ))
}
