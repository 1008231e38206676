//! CLI-specific configuration for terminal UI.
use std::env;
use std::path::PathBuf;
use std::time::Duration;

/// CLI terminal UI configuration.
///
/// This contains settings specific to the terminal interface,
/// separate from cross-frontend client configuration.
#[derive(Clone, Debug)]
pub struct CliConfig {
    /// Base URL of the rules engine.
    pub api_url: String,
    pub ui: UiConfig,
    /// Overrides the platform data directory for log files.
    pub log_dir: Option<PathBuf>,
    /// Seed sent with new games, for reproducible engine randomness.
    pub seed: Option<u64>,
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            api_url: "http://127.0.0.1:8000".to_string(),
            ui: UiConfig::default(),
            log_dir: None,
            seed: None,
        }
    }
}

impl CliConfig {
    /// Construct CLI configuration from environment variables.
    ///
    /// Environment variables:
    /// - `ARCANE_API_URL` - Rules engine base URL (default: http://127.0.0.1:8000)
    /// - `ARCANE_FRAME_MS` - Frame interval in milliseconds (default: 16)
    /// - `ARCANE_SIDE_PANEL_WIDTH` - Side panel width in columns (default: 34)
    /// - `ARCANE_LOG_DIR` - Log directory (default: platform data dir)
    /// - `ARCANE_SEED` - Seed for new games (default: engine chooses)
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(url) = env::var("ARCANE_API_URL") {
            let url = url.trim();
            if !url.is_empty() {
                config.api_url = url.to_string();
            }
        }
        if let Some(ms) = read_env::<u64>("ARCANE_FRAME_MS") {
            config.ui.frame_interval = Duration::from_millis(ms.max(1));
        }
        if let Some(width) = read_env::<u16>("ARCANE_SIDE_PANEL_WIDTH") {
            config.ui.side_panel_width = width.max(20);
        }
        if let Some(dir) = env::var_os("ARCANE_LOG_DIR") {
            config.log_dir = Some(PathBuf::from(dir));
        }
        config.seed = read_env::<u64>("ARCANE_SEED");

        config
    }
}

/// UI layout and timing configuration.
#[derive(Clone, Debug)]
pub struct UiConfig {
    pub frame_interval: Duration,
    /// Width of the side panel in columns (including borders).
    pub side_panel_width: u16,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            frame_interval: Duration::from_millis(16),
            side_panel_width: 34,
        }
    }
}

fn read_env<T>(key: &str) -> Option<T>
where
    T: std::str::FromStr,
{
    env::var(key).ok()?.parse().ok()
}
