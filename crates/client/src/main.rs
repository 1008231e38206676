//! Arcane chess client binary.
//!
//! Composition root: reads configuration, installs file logging, connects
//! to the rules engine over HTTP and hands control to the frontend.
//!
//! # Features
//!
//! - `frontend-cli`: Terminal UI (default)
//!
//! # Examples
//!
//! ```bash
//! ARCANE_API_URL=http://127.0.0.1:8000 cargo run -p arcane-client
//! ```

use anyhow::Result;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    #[cfg(feature = "frontend-cli")]
    {
        run_cli().await?;
    }

    #[cfg(not(feature = "frontend-cli"))]
    {
        compile_error!("At least one frontend feature must be enabled (frontend-cli, ...)");
    }

    Ok(())
}

/// Run the CLI frontend.
#[cfg(feature = "frontend-cli")]
async fn run_cli() -> Result<()> {
    use std::sync::Arc;

    use arcane_client::Client;
    use client_api::HttpGameApi;
    use client_frontend_cli::{CliConfig, CliFrontend, FrontendConfig, logging};

    // 1. Load configuration from environment
    let frontend_config = FrontendConfig::from_env();
    let cli_config = CliConfig::from_env();

    // 2. Setup logging; the guard flushes buffered lines on exit
    let _log_guard = logging::setup_logging(cli_config.log_dir.as_deref())?;

    tracing::info!(api_url = %cli_config.api_url, "Starting arcane client");
    tracing::debug!(?frontend_config, "frontend configuration");

    // 3. Engine API
    let api = Arc::new(HttpGameApi::new(cli_config.api_url.clone()));

    // 4. Frontend
    let frontend = CliFrontend::new(frontend_config, cli_config);

    // 5. Build and run
    let client = Client::builder().api(api).frontend(frontend).build()?;
    client.run().await
}
