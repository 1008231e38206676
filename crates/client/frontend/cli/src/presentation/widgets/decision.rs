//! Popup listing the options of a pending decision.
use client_frontend_core::view_model::DecisionPanel;
use ratatui::{
    Frame,
    layout::{Alignment, Rect},
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
};

use crate::presentation::theme::Theme;

pub fn render(frame: &mut Frame, area: Rect, panel: &DecisionPanel, chain_depth: usize) {
    let mut lines = vec![
        Line::from(Span::styled(panel.prompt.clone(), Theme::title())),
        Line::from(""),
    ];
    for (i, (_, label)) in panel.options.iter().enumerate() {
        lines.push(Line::from(vec![
            Span::styled(format!("  {}. ", i + 1), Theme::key()),
            Span::raw(label.clone()),
        ]));
    }
    lines.push(Line::from(""));
    let footer = if chain_depth > 1 {
        format!("Step {chain_depth} | 1-9 or click a square | ESC to cancel")
    } else {
        "1-9 or click a square | ESC to cancel".to_string()
    };
    lines.push(Line::from(Span::styled(footer, Theme::hint())));

    let paragraph = Paragraph::new(lines)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Cyan))
                .title(format!(" {} ", panel.title))
                .title_alignment(Alignment::Center),
        )
        .wrap(Wrap { trim: false });

    frame.render_widget(Clear, area);
    frame.render_widget(paragraph, area);
}
