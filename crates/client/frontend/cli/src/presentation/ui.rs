//! Frame composition.
//!
//! Routes by mode: the loadout editor replaces the game screen; everything
//! else draws the board, side panel and footer, with popups on top.
use anyhow::Result;
use client_frontend_core::{DecisionOrchestrator, HudFrame, Renderer, SnapshotStore, SpriteQuality};
use ratatui::layout::{Constraint, Direction, Layout, Rect};

use crate::presentation::{pixels::PixelSurface, terminal::Tui, widgets};
use crate::state::{AppMode, AppState};

/// Everything one frame needs. The renderer and surface are mutable because
/// drawing refits them to the board area.
pub struct RenderContext<'a> {
    pub store: &'a SnapshotStore,
    pub orchestrator: &'a DecisionOrchestrator,
    pub renderer: &'a mut Renderer,
    pub surface: &'a mut PixelSurface,
    pub app_state: &'a mut AppState,
    pub side_panel_width: u16,
    pub message_limit: usize,
}

pub fn render(terminal: &mut Tui, ctx: RenderContext) -> Result<()> {
    let hud = HudFrame::build(ctx.store, ctx.orchestrator, ctx.message_limit);
    let RenderContext {
        store,
        orchestrator,
        renderer,
        surface,
        app_state,
        side_panel_width,
        ..
    } = ctx;

    terminal.draw(|frame| {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // Header
                Constraint::Min(0),    // Board and side panel
                Constraint::Length(1), // Footer
            ])
            .split(frame.area());

        widgets::header::render(frame, chunks[0], &hud, app_state, renderer.perspective());
        widgets::footer::render(
            frame,
            chunks[2],
            &app_state.mode,
            hud.decision.is_some(),
            hud.notice.as_ref(),
        );

        if let AppMode::Loadout(editor) = &app_state.mode {
            widgets::loadout_editor::render(frame, chunks[1], editor, &app_state.drafts, &app_state.rules);
            return;
        }

        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Min(0), Constraint::Length(side_panel_width)])
            .split(chunks[1]);

        let quality = match renderer.quality() {
            SpriteQuality::High => "hi",
            SpriteQuality::Low => "lo",
        };
        let board = widgets::board::frame_block(frame, columns[0], format!(" Board [{quality}] "));
        let (width, height) = (board.width as u32, board.height as u32 * 2);
        surface.resize(width, height);
        renderer.resize(width, height);
        let snapshot = store.current();
        let overlays = orchestrator.overlays(snapshot);
        renderer.draw(snapshot, &overlays, &mut *surface);
        if matches!(app_state.mode, AppMode::Board) {
            widgets::board::draw_cursor(surface, renderer, app_state.cursor);
        }
        widgets::board::render(frame, board, surface);
        app_state.board_area = board;

        widgets::side_panel::render(frame, columns[1], &hud);

        let popup = centered_rect(50, 50, columns[0]);
        match &app_state.mode {
            AppMode::Help => widgets::help::render(frame, centered_rect(60, 70, frame.area())),
            AppMode::Topup(menu) => {
                if let Some(offer) = orchestrator.topup_offer(store) {
                    widgets::topup_menu::render(frame, popup, &offer, menu.cursor);
                }
            }
            AppMode::Board => {
                if let Some(picker) = orchestrator.picker() {
                    widgets::variant_picker::render(frame, popup, picker);
                } else if let Some(panel) = &hud.decision {
                    widgets::decision::render(frame, popup, panel, orchestrator.chain_depth());
                }
            }
            AppMode::Loadout(_) => {}
        }
    })?;

    Ok(())
}

/// Create a centered rectangle for modal overlays.
fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}
