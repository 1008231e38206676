//! Client builder with dependency injection pattern.

use std::sync::Arc;

use anyhow::{Context, Result};
use client_api::GameApi;

use crate::{Client, Frontend};

/// Builder for constructing a Client.
///
/// Both the engine API and the frontend are required; `build` fails fast
/// when either is missing.
#[derive(Default)]
pub struct ClientBuilder {
    api: Option<Arc<dyn GameApi>>,
    frontend: Option<Box<dyn Frontend>>,
}

impl ClientBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the engine API (required).
    pub fn api(mut self, api: Arc<dyn GameApi>) -> Self {
        self.api = Some(api);
        self
    }

    /// Set the frontend (required).
    pub fn frontend(mut self, frontend: impl Frontend + 'static) -> Self {
        self.frontend = Some(Box::new(frontend));
        self
    }

    /// Build the Client.
    ///
    /// # Errors
    ///
    /// Returns an error if the API or the frontend was not set.
    pub fn build(self) -> Result<Client> {
        let api = self.api.context("Engine API is required")?;
        let frontend = self.frontend.context("Frontend is required")?;
        Ok(Client { api, frontend })
    }
}
