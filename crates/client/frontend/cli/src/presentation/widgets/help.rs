use ratatui::{
    Frame,
    layout::{Alignment, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
};

use crate::presentation::theme::Theme;

const BINDINGS: &[(&str, &str)] = &[
    ("arrows / hjkl", "move the board cursor"),
    ("enter / space", "select a piece or destination"),
    ("mouse click", "same as enter on that square"),
    ("1-9", "choose a decision option or move variant"),
    ("esc", "cancel a decision or close a popup"),
    ("u", "undo"),
    ("r", "reset to the starting position"),
    ("n", "edit loadouts and start a new game"),
    ("t", "Solar Necklace top-up"),
    ("f", "flip the board"),
    ("v", "toggle sprite quality"),
    ("o", "reload state from the engine"),
    ("q", "quit"),
];

pub fn render(frame: &mut Frame, area: Rect) {
    let lines: Vec<Line> = BINDINGS
        .iter()
        .map(|(key, what)| {
            Line::from(vec![
                Span::styled(format!("  {key:<15}"), Theme::key()),
                Span::raw(*what),
            ])
        })
        .collect();

    let paragraph = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .title(" Keys ")
            .title_alignment(Alignment::Center),
    );

    frame.render_widget(Clear, area);
    frame.render_widget(paragraph, area);
}
