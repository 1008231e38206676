//! Input processing for the CLI client.
//!
//! This module owns the keyboard-to-command mapping so the rest of the
//! application can remain agnostic about concrete key bindings or the
//! specifics of `crossterm` events.

use crossterm::event::{KeyCode, KeyEvent};
use ratatui::layout::Rect;

use crate::state::AppMode;

/// High-level outcome of processing a keyboard event.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum KeyAction {
    /// Exit the application.
    Quit,
    /// Move the cursor by (file, rank) from the viewer's point of view:
    /// positive rank is away from the viewer.
    MoveCursor(i8, i8),
    /// Enter/space: tap the cursor square or confirm the highlighted row.
    Activate,
    /// Close the current popup or abandon the pending decision.
    Cancel,
    /// Pick a numbered option (zero-based).
    Choose(usize),
    Undo,
    Reset,
    OpenLoadout,
    OpenTopup,
    FlipBoard,
    ToggleQuality,
    Refresh,
    Help,
    /// Loadout editor: switch the side being edited.
    SwitchSide,
    /// Loadout editor: cycle the scope of the highlighted ability.
    CycleScope,
    /// Loadout editor: submit both drafts as a new game.
    StartGame,
    /// No meaningful command was produced.
    None,
}

/// Translates `KeyEvent`s into commands for the current mode.
#[derive(Debug, Default)]
pub struct InputHandler;

impl InputHandler {
    pub fn new() -> Self {
        Self
    }

    /// Converts a raw key event into a higher-level command.
    pub fn handle_key(&self, key: KeyEvent, mode: &AppMode) -> KeyAction {
        let raw = match key.code {
            KeyCode::Esc => return KeyAction::Cancel,
            KeyCode::Enter => return KeyAction::Activate,
            KeyCode::Left => return KeyAction::MoveCursor(-1, 0),
            KeyCode::Right => return KeyAction::MoveCursor(1, 0),
            KeyCode::Up => return KeyAction::MoveCursor(0, 1),
            KeyCode::Down => return KeyAction::MoveCursor(0, -1),
            KeyCode::Tab if matches!(mode, AppMode::Loadout(_)) => return KeyAction::SwitchSide,
            KeyCode::Char(raw) => raw,
            _ => return KeyAction::None,
        };
        if let Some(digit) = raw.to_digit(10).filter(|d| *d >= 1) {
            return KeyAction::Choose(digit as usize - 1);
        }

        let ch = raw.to_ascii_lowercase();
        match (mode, ch) {
            (_, 'q') => KeyAction::Quit,
            (_, ' ') => KeyAction::Activate,
            (_, 'h') => KeyAction::MoveCursor(-1, 0),
            (_, 'l') => KeyAction::MoveCursor(1, 0),
            (_, 'k') => KeyAction::MoveCursor(0, 1),
            (_, 'j') => KeyAction::MoveCursor(0, -1),
            (_, '?') => KeyAction::Help,
            (AppMode::Loadout(_), 's') => KeyAction::CycleScope,
            (AppMode::Loadout(_), 'n') => KeyAction::StartGame,
            (AppMode::Loadout(_), _) => KeyAction::None,
            (_, 'u') => KeyAction::Undo,
            (_, 'r') => KeyAction::Reset,
            (_, 'n') => KeyAction::OpenLoadout,
            (_, 't') => KeyAction::OpenTopup,
            (_, 'f') => KeyAction::FlipBoard,
            (_, 'v') => KeyAction::ToggleQuality,
            (_, 'o') => KeyAction::Refresh,
            _ => KeyAction::None,
        }
    }
}

/// Maps a terminal cell inside the board area to a point on the pixel surface.
/// Each cell is one pixel wide and two pixels tall; the point is the cell centre.
pub fn cell_to_surface(area: Rect, column: u16, row: u16) -> Option<(f32, f32)> {
    let inside = column >= area.x
        && column < area.x + area.width
        && row >= area.y
        && row < area.y + area.height;
    inside.then(|| {
        (
            (column - area.x) as f32 + 0.5,
            (row - area.y) as f32 * 2.0 + 1.0,
        )
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::LoadoutEditor;
    use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyEventState, KeyModifiers};

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent {
            code,
            modifiers: KeyModifiers::empty(),
            kind: KeyEventKind::Press,
            state: KeyEventState::NONE,
        }
    }

    #[test]
    fn maps_cursor_keys() {
        let handler = InputHandler::new();
        assert_eq!(
            handler.handle_key(key(KeyCode::Char('h')), &AppMode::Board),
            KeyAction::MoveCursor(-1, 0)
        );
        assert_eq!(
            handler.handle_key(key(KeyCode::Up), &AppMode::Board),
            KeyAction::MoveCursor(0, 1)
        );
    }

    #[test]
    fn digits_choose_options() {
        let handler = InputHandler::new();
        assert_eq!(
            handler.handle_key(key(KeyCode::Char('3')), &AppMode::Board),
            KeyAction::Choose(2)
        );
        assert_eq!(
            handler.handle_key(key(KeyCode::Char('0')), &AppMode::Board),
            KeyAction::None
        );
    }

    #[test]
    fn editor_keys_shadow_board_keys() {
        let handler = InputHandler::new();
        let editor = AppMode::Loadout(LoadoutEditor::default());
        assert_eq!(handler.handle_key(key(KeyCode::Char('n')), &editor), KeyAction::StartGame);
        assert_eq!(handler.handle_key(key(KeyCode::Char('u')), &editor), KeyAction::None);
        assert_eq!(handler.handle_key(key(KeyCode::Tab), &editor), KeyAction::SwitchSide);
        assert_eq!(
            handler.handle_key(key(KeyCode::Char('n')), &AppMode::Board),
            KeyAction::OpenLoadout
        );
    }

    #[test]
    fn maps_quit_and_ignores_unknown_keys() {
        let handler = InputHandler::new();
        assert_eq!(handler.handle_key(key(KeyCode::Char('Q')), &AppMode::Board), KeyAction::Quit);
        assert_eq!(handler.handle_key(key(KeyCode::Char('x')), &AppMode::Board), KeyAction::None);
    }

    #[test]
    fn cells_map_to_pixel_centres() {
        let area = Rect::new(2, 1, 10, 5);
        assert_eq!(cell_to_surface(area, 2, 1), Some((0.5, 1.0)));
        assert_eq!(cell_to_surface(area, 5, 3), Some((3.5, 5.0)));
        assert_eq!(cell_to_surface(area, 12, 3), None);
        assert_eq!(cell_to_surface(area, 1, 3), None);
    }
}
