//! Side panel: move list, per-side resources and loadouts, messages.
use client_frontend_core::HudFrame;
use client_frontend_core::view_model::{HistoryLine, SidePanel};
use game_core::Side;
use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
};

use crate::presentation::theme::Theme;

pub fn render(frame: &mut Frame, area: Rect, hud: &HudFrame) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage(30), // Move list
            Constraint::Length(12),     // Sides
            Constraint::Min(4),         // Messages
        ])
        .split(area);

    render_history(frame, chunks[0], &hud.history);
    render_sides(frame, chunks[1], hud);
    render_messages(frame, chunks[2], hud);
}

fn render_history(frame: &mut Frame, area: Rect, history: &[HistoryLine]) {
    // Keep the latest moves visible.
    let visible = area.height.saturating_sub(2) as usize;
    let lines: Vec<Line> = history
        .iter()
        .skip(history.len().saturating_sub(visible))
        .map(|line| {
            Line::from(vec![
                Span::styled(format!("{:>3}. ", line.number), Theme::label()),
                Span::styled(
                    format!("{:<8}", line.white.as_deref().unwrap_or("...")),
                    Theme::side(Side::White),
                ),
                Span::styled(line.black.clone().unwrap_or_default(), Theme::side(Side::Black)),
            ])
        })
        .collect();

    let paragraph = Paragraph::new(lines).block(Block::default().borders(Borders::ALL).title(" Moves "));
    frame.render_widget(paragraph, area);
}

fn side_lines(side: Side, panel: &SidePanel) -> Vec<Line<'static>> {
    let mut lines = vec![Line::from(Span::styled(side.to_string(), Theme::side(side)))];
    let (Some(loadout), Some(res)) = (&panel.loadout, &panel.resources) else {
        lines.push(Line::from(Span::styled(" classic rules", Theme::hint())));
        return lines;
    };

    lines.push(Line::from(vec![
        Span::styled(" Necro ", Theme::label()),
        Span::styled(format!("{}/{}", res.necro_pool, res.necro_max), Theme::gauge(res.necro_pool, res.necro_max)),
        Span::styled("  Solar ", Theme::label()),
        Span::styled(format!("{}/{}", res.solar_uses, res.solar_max), Theme::gauge(res.solar_uses, res.solar_max)),
        Span::styled(format!("  Grave {}", res.graveyard), Theme::label()),
    ]));
    lines.push(Line::from(vec![
        Span::styled(" Element ", Theme::label()),
        Span::raw(loadout.element),
    ]));
    if !loadout.items.is_empty() {
        lines.push(Line::from(Span::raw(format!(" {}", loadout.items.join(", ")))));
    }
    if !loadout.abilities.is_empty() {
        lines.push(Line::from(Span::raw(format!(" {}", loadout.abilities.join(", ")))));
    }
    lines
}

fn render_sides(frame: &mut Frame, area: Rect, hud: &HudFrame) {
    let mut lines = side_lines(Side::White, &hud.sides.white);
    lines.extend(side_lines(Side::Black, &hud.sides.black));
    let paragraph = Paragraph::new(lines)
        .block(Block::default().borders(Borders::ALL).title(" Loadouts "))
        .wrap(Wrap { trim: false });
    frame.render_widget(paragraph, area);
}

fn render_messages(frame: &mut Frame, area: Rect, hud: &HudFrame) {
    let visible = area.height.saturating_sub(2) as usize;
    let mut lines: Vec<Line> = hud
        .effects
        .iter()
        .take(visible / 2)
        .map(|effect| Line::from(Span::styled(format!("* {effect}"), Theme::hint())))
        .collect();
    let room = visible.saturating_sub(lines.len());
    let start = hud.messages.len().saturating_sub(room);
    lines.extend(hud.messages[start..].iter().map(|entry| {
        let prefix = entry.ply.map(|ply| format!("[{ply}] ")).unwrap_or_default();
        Line::from(Span::styled(format!("{prefix}{}", entry.text), Theme::message(entry.level)))
    }));

    let paragraph = Paragraph::new(lines)
        .block(Block::default().borders(Borders::ALL).title(" Log "))
        .wrap(Wrap { trim: true });
    frame.render_widget(paragraph, area);
}
