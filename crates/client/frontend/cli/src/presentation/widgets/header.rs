//! Header widget: side to move, move number, status and orchestrator phase.
use client_frontend_core::HudFrame;
use game_core::Side;
use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};

use crate::presentation::theme::Theme;
use crate::state::{AppMode, AppState};

pub fn render(frame: &mut Frame, area: Rect, hud: &HudFrame, app_state: &AppState, perspective: Side) {
    let mode_text = match &app_state.mode {
        AppMode::Board => "",
        AppMode::Topup(_) => " [TOP-UP]",
        AppMode::Loadout(_) => " [LOADOUT]",
        AppMode::Help => " [HELP]",
    };

    let text = vec![Line::from(vec![
        Span::raw("Move "),
        Span::styled(hud.fullmove.to_string(), Style::default().fg(Color::Yellow)),
        Span::raw(" | To move: "),
        Span::styled(hud.side_to_move.to_string(), Theme::side(hud.side_to_move)),
        Span::raw(" | "),
        Span::styled(format!("{:?}", hud.status), Theme::status(hud.status)),
        Span::raw(" | "),
        Span::styled(hud.phase, Theme::label()),
        Span::raw(" | View: "),
        Span::styled(perspective.to_string(), Theme::side(perspective)),
        Span::styled(
            mode_text,
            Style::default()
                .fg(Color::Magenta)
                .add_modifier(Modifier::BOLD),
        ),
    ])];

    let paragraph =
        Paragraph::new(text).block(Block::default().borders(Borders::ALL).title(" Arcane Chess "));

    frame.render_widget(paragraph, area);
}
