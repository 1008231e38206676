//! Terminal UI frontend for the arcane chess client.
//!
//! The board is rasterized by the core renderer onto a half-block pixel
//! surface; panels and popups are ordinary ratatui widgets. All engine
//! traffic goes through the [`DecisionOrchestrator`] queue, one request at a
//! time, and replies are applied on the event loop's own turn.
//!
//! [`DecisionOrchestrator`]: client_frontend_core::DecisionOrchestrator

mod app;
mod config;
mod event;
mod input;
pub mod logging;
pub mod presentation;
mod state;

pub use app::CliFrontend;
pub use config::{CliConfig, UiConfig};

// Re-export for convenience (used in main.rs)
pub use client_frontend_core::FrontendConfig;
