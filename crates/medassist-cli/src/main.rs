mod commands;
mod config;
mod render;
mod shell;

use tracing::info;

use medassist_api::ApiClient;
use medassist_portal::{AuthGateway, Portal, Route, SessionStore};
use medassist_store::LocalStorage;

use crate::config::{Config, DEFAULT_LOG_FILTER};
use crate::shell::Shell;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present
    let _ = dotenvy::dotenv();

    // Logs go to stderr so they stay out of the rendered screens
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| DEFAULT_LOG_FILTER.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = Config::from_env()?;

    let storage = LocalStorage::open(&config.storage_path)?;
    let api = ApiClient::with_timeout(&config.api_url, config.http_timeout)?;
    info!("MedAssist client for {} (token store {})", api.base_url(), config.storage_path.display());

    let mut portal = Portal::new(SessionStore::new(AuthGateway::new(api), storage));
    if let Route::Authenticated(kind) = portal.start().await {
        info!("Resumed session on the {}", kind.title());
    }

    Shell::new(portal).run().await
}
