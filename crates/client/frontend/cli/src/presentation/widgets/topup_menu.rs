//! Solar Necklace top-up popup. Row 0 refills the necromancer pool; the
//! remaining rows recharge individual redo pools.
use client_frontend_core::TopupOffer;
use ratatui::{
    Frame,
    layout::{Alignment, Rect},
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
};

use crate::presentation::theme::Theme;

fn row_style(selected: bool, enabled: bool) -> Style {
    match (selected, enabled) {
        (true, _) => Theme::highlight(),
        (false, true) => Style::default().fg(Color::White),
        (false, false) => Style::default().fg(Color::DarkGray),
    }
}

pub fn render(frame: &mut Frame, area: Rect, offer: &TopupOffer, cursor: usize) {
    let mut lines = vec![
        Line::from(Span::styled(
            format!("Solar Necklace: {}/{} uses left", offer.solar_uses, offer.solar_max),
            Theme::title(),
        )),
        Line::from(""),
        Line::from(vec![
            Span::styled("  1. ", Theme::key()),
            Span::styled(
                format!("Necromancer pool {}/{}", offer.necro_pool, offer.necro_max),
                row_style(cursor == 0, offer.necro_enabled),
            ),
        ]),
    ];
    for (i, target) in offer.redo_targets.iter().enumerate() {
        lines.push(Line::from(vec![
            Span::styled(format!("  {}. ", i + 2), Theme::key()),
            Span::styled(
                format!("Redo {} on {} {}/{}", target.kind, target.square, target.charges, target.capacity),
                row_style(cursor == i + 1, target.enabled),
            ),
        ]));
    }
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled("Full pools cannot be topped up | ESC to close", Theme::hint())));

    let paragraph = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Yellow))
            .title(format!(" Top-up ({}) ", offer.side))
            .title_alignment(Alignment::Center),
    );

    frame.render_widget(Clear, area);
    frame.render_widget(paragraph, area);
}
