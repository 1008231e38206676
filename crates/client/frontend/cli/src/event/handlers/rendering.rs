//! Rendering handlers.

use anyhow::Result;

use super::super::EventLoop;
use crate::presentation::{terminal::Tui, ui};

impl EventLoop {
    pub(in crate::event) fn render(&mut self, terminal: &mut Tui) -> Result<()> {
        let ctx = ui::RenderContext {
            store: &self.store,
            orchestrator: &self.orchestrator,
            renderer: &mut self.renderer,
            surface: &mut self.surface,
            app_state: &mut self.app_state,
            side_panel_width: self.cli_config.ui.side_panel_width,
            message_limit: self.message_limit,
        };

        ui::render(terminal, ctx)
    }
}
