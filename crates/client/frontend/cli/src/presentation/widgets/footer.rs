//! Footer widget: key hints for the current mode, or the active notice.
use client_frontend_core::Notice;
use ratatui::{
    Frame,
    layout::Rect,
    text::{Line, Span},
    widgets::Paragraph,
};

use crate::presentation::theme::Theme;
use crate::state::AppMode;

fn hints(mode: &AppMode, decision_pending: bool) -> &'static [(&'static str, &'static str)] {
    match mode {
        AppMode::Loadout(_) => &[
            ("↑↓", "row"),
            ("enter", "toggle"),
            ("s", "scope"),
            ("tab", "side"),
            ("n", "start"),
            ("esc", "back"),
        ],
        AppMode::Topup(_) => &[("↑↓", "row"), ("enter", "top up"), ("esc", "close")],
        AppMode::Help => &[("esc", "close")],
        AppMode::Board if decision_pending => &[
            ("1-9", "choose"),
            ("enter", "pick square"),
            ("esc", "cancel"),
        ],
        AppMode::Board => &[
            ("hjkl", "cursor"),
            ("enter", "select"),
            ("u", "undo"),
            ("t", "top-up"),
            ("n", "new game"),
            ("f", "flip"),
            ("?", "help"),
            ("q", "quit"),
        ],
    }
}

pub fn render(frame: &mut Frame, area: Rect, mode: &AppMode, decision_pending: bool, notice: Option<&Notice>) {
    let line = match notice {
        Some(notice) => Line::from(Span::styled(notice.text.clone(), Theme::message(notice.level))),
        None => Line::from(
            hints(mode, decision_pending)
                .iter()
                .flat_map(|(key, what)| {
                    [
                        Span::styled(format!(" {key}"), Theme::key()),
                        Span::styled(format!(" {what} "), Theme::hint()),
                    ]
                })
                .collect::<Vec<_>>(),
        ),
    };
    frame.render_widget(Paragraph::new(line), area);
}
