//! Top-level client wiring the rules engine API to a frontend.
//!
//! # Architecture
//!
//! ```text
//! Client (composition root)
//!   ├─→ GameApi  (external rules engine, shared behind an Arc)
//!   └─→ Frontend (UI layer - CLI, GUI, etc.)
//! ```
//!
//! The client holds no game state of its own. The frontend owns the snapshot
//! store, renderer and orchestrator, and reaches the engine only through the
//! API handle it is given.

mod builder;

pub use builder::ClientBuilder;

// Re-export Frontend trait from client-frontend-core
pub use client_frontend_core::Frontend;

use std::sync::Arc;

use anyhow::Result;
use client_api::GameApi;

/// Top-level client container.
pub struct Client {
    api: Arc<dyn GameApi>,
    frontend: Box<dyn Frontend>,
}

impl Client {
    /// Create a new ClientBuilder.
    pub fn builder() -> ClientBuilder {
        ClientBuilder::new()
    }

    /// Hands control to the frontend until the user quits.
    ///
    /// # Errors
    ///
    /// Returns whatever fatal error ended the frontend loop. Engine failures
    /// during play are shown in the UI and never reach this point.
    pub async fn run(self) -> Result<()> {
        let Client { api, mut frontend } = self;
        tracing::info!("client starting");
        let result = frontend.run(api).await;
        match &result {
            Ok(()) => tracing::info!("client shutdown complete"),
            Err(err) => tracing::error!(%err, "frontend exited with an error"),
        }
        result
    }
}
