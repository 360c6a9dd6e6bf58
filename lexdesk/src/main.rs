use anyhow::{Context, Result};
use clap::Parser;
use crm_client::{CrmApi, CrmClient, Credentials, CsrfToken};
use lexdesk::{
    cli::{Cli, Commands},
    config::{self, Settings},
    page::Page,
    runtime::{run_page, ConsoleSurface},
    surface::Surface,
};
use std::sync::Arc;
use tracing_subscriber::{fmt, EnvFilter};

const DEFAULT_LOG_FILTER: &str = "lexdesk=info,crm_client=info";

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER)),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command() {
        Commands::ConfigPath => {
            let path = config::config_path()?;
            if config::write_default_if_missing(&path)? {
                println!("Created default config:");
            }
            println!("{}", path.display());
        }
        Commands::Run => {
            let settings = config::read_config()?;
            tracing::debug!("Loaded settings: {:?}", settings);

            let client = connect(&settings).await?;
            let console = Arc::new(ConsoleSurface::new());
            let api: Arc<dyn CrmApi> = Arc::new(client);
            let surface: Arc<dyn Surface> = console.clone();

            let page = Page::new(api, surface, &settings);
            run_page(page, console).await?;
        }
    }

    Ok(())
}

/// Build the CRM client. A missing CSRF token is scraped from the configured
/// page; if that fails the page still runs read-only.
async fn connect(settings: &Settings) -> Result<CrmClient> {
    let credentials = Credentials::new(
        settings.api.session_id.clone(),
        settings.api.csrf_token.clone().map(CsrfToken::new),
    );
    let mut client = CrmClient::new(&settings.api.base_url, credentials)
        .with_context(|| format!("Invalid CRM URL '{}'", settings.api.base_url))?;

    if !client.has_csrf_token() {
        if let Err(e) = client.fetch_csrf_token(&settings.api.csrf_page).await {
            tracing::warn!(
                "Could not get a CSRF token from {}{}: {}. Saving and status changes will fail",
                settings.api.base_url,
                settings.api.csrf_page,
                e
            );
        }
    }

    tracing::info!("Connected to {}", settings.api.base_url);
    Ok(client)
}
