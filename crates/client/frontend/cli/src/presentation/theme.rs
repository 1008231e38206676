//! Terminal colours for panels, messages and the loadout editor.
use client_frontend_core::{Control, MessageLevel, view_model::GameStatus};
use game_core::Side;
use ratatui::style::{Color, Modifier, Style};

pub struct Theme;

impl Theme {
    pub fn title() -> Style {
        Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD)
    }

    pub fn label() -> Style {
        Style::default().fg(Color::Gray)
    }

    pub fn hint() -> Style {
        Style::default()
            .fg(Color::DarkGray)
            .add_modifier(Modifier::ITALIC)
    }

    pub fn key() -> Style {
        Style::default().fg(Color::Yellow)
    }

    pub fn highlight() -> Style {
        Style::default()
            .fg(Color::Black)
            .bg(Color::Cyan)
            .add_modifier(Modifier::BOLD)
    }

    pub fn side(side: Side) -> Style {
        match side {
            Side::White => Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
            Side::Black => Style::default()
                .fg(Color::LightMagenta)
                .add_modifier(Modifier::BOLD),
        }
    }

    pub fn status(status: GameStatus) -> Style {
        match status {
            GameStatus::Playing => Style::default().fg(Color::Green),
            GameStatus::Check => Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
            GameStatus::Checkmate => Style::default()
                .fg(Color::Red)
                .add_modifier(Modifier::BOLD),
        }
    }

    pub fn message(level: MessageLevel) -> Style {
        match level {
            MessageLevel::Info => Style::default().fg(Color::White),
            MessageLevel::Warning => Style::default().fg(Color::Yellow),
            MessageLevel::Error => Style::default().fg(Color::LightRed),
        }
    }

    /// Disabled controls are dimmed; checked ones are green.
    pub fn control(control: Control) -> Style {
        match (control.enabled, control.checked) {
            (false, _) => Style::default()
                .fg(Color::DarkGray)
                .add_modifier(Modifier::DIM),
            (true, true) => Style::default().fg(Color::LightGreen),
            (true, false) => Style::default().fg(Color::White),
        }
    }

    /// Resource gauge colour by fill ratio.
    pub fn gauge(current: u32, maximum: u32) -> Style {
        if maximum == 0 {
            return Style::default().fg(Color::DarkGray);
        }
        let color = match current * 100 / maximum {
            75.. => Color::Cyan,
            50..=74 => Color::Blue,
            25..=49 => Color::LightBlue,
            _ => Color::DarkGray,
        };
        Style::default().fg(color)
    }

    pub fn checkbox(checked: bool) -> &'static str {
        if checked { "[x]" } else { "[ ]" }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn disabled_controls_are_dimmed_even_when_checked() {
        let style = Theme::control(Control {
            checked: true,
            enabled: false,
        });
        assert_eq!(style.fg, Some(Color::DarkGray));
    }

    #[test]
    fn empty_gauge_is_grey() {
        assert_eq!(Theme::gauge(0, 0).fg, Some(Color::DarkGray));
        assert_eq!(Theme::gauge(2, 2).fg, Some(Color::Cyan));
    }
}
