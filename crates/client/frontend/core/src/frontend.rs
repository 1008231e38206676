//! Trait describing a runnable client front-end.
use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use client_api::GameApi;

/// Frontend abstraction for UI layers.
///
/// A frontend owns its presentation loop and talks to the rules engine only
/// through the shared [`GameApi`]. It never awaits the engine inline: requests
/// come from the [`DecisionOrchestrator`](crate::DecisionOrchestrator) one at a
/// time and their replies are applied on the frontend's own loop turn.
///
/// # Implementations
///
/// - `CliFrontend`: Terminal-based UI (ratatui + crossterm)
#[async_trait]
pub trait Frontend: Send {
    /// Run the frontend event loop until the user quits.
    ///
    /// # Errors
    ///
    /// Returns an error if the frontend encounters a fatal error.
    async fn run(&mut self, api: Arc<dyn GameApi>) -> Result<()>;
}
