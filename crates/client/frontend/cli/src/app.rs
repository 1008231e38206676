//! Glue code tying the engine API, the event loop, and the terminal together.
use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use client_api::GameApi;
use client_frontend_core::{Frontend, FrontendConfig};

use crate::config::CliConfig;
use crate::event::EventLoop;
use crate::presentation::terminal;

/// Terminal frontend. Owns no engine state until [`Frontend::run`] builds the
/// event loop around the API it is given.
pub struct CliFrontend {
    frontend_config: FrontendConfig,
    cli_config: CliConfig,
}

impl CliFrontend {
    pub fn new(frontend_config: FrontendConfig, cli_config: CliConfig) -> Self {
        Self {
            frontend_config,
            cli_config,
        }
    }
}

#[async_trait]
impl Frontend for CliFrontend {
    async fn run(&mut self, api: Arc<dyn GameApi>) -> Result<()> {
        tracing::info!(api_url = %self.cli_config.api_url, "CLI client starting");

        let event_loop = EventLoop::new(api, &self.frontend_config, self.cli_config.clone());

        let mut terminal = terminal::init()?;
        let _guard = terminal::TerminalGuard;

        let result = event_loop.run(&mut terminal).await;

        terminal::restore()?;
        tracing::info!("CLI client exiting");
        result
    }
}
