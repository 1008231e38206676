//! Popup for choosing between moves that share origin and destination.
use client_frontend_core::VariantPicker;
use client_frontend_core::orchestrator::variant_label;
use ratatui::{
    Frame,
    layout::{Alignment, Rect},
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
};

use crate::presentation::theme::Theme;

pub fn render(frame: &mut Frame, area: Rect, picker: &VariantPicker) {
    let mut lines = vec![
        Line::from(Span::styled(format!("{} to {}", picker.from, picker.to), Theme::title())),
        Line::from(""),
    ];
    for (i, mv) in picker.options().iter().enumerate() {
        let style = if i == picker.cursor() {
            Theme::highlight()
        } else {
            Style::default()
        };
        lines.push(Line::from(vec![
            Span::styled(format!("  {}. ", i + 1), Theme::key()),
            Span::styled(variant_label(mv), style),
        ]));
    }
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled("↑↓ enter or 1-9 | ESC to cancel", Theme::hint())));

    let paragraph = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan))
            .title(" Choose move ")
            .title_alignment(Alignment::Center),
    );

    frame.render_widget(Clear, area);
    frame.render_widget(paragraph, area);
}
