//! Application state for mode management and UI context.
use client_frontend_core::{LoadoutDraft, LoadoutRules};
use game_core::{AbilityId, ElementId, ItemId, PieceKind, Side, SideMap, Square};
use ratatui::layout::Rect;
use strum::IntoEnumIterator;

/// Top-level application mode determining input handling and UI layout.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AppMode {
    /// Playing on the board; popups for decisions, variants and top-ups
    /// follow the orchestrator.
    Board,
    /// Solar Necklace top-up menu.
    Topup(TopupMenu),
    /// Pre-game loadout editor (full screen).
    Loadout(LoadoutEditor),
    /// Key reference overlay.
    Help,
}

impl AppMode {
    pub fn is_fullscreen(&self) -> bool {
        matches!(self, AppMode::Loadout(_))
    }
}

/// Cursor over the top-up menu rows: row 0 is the necromancer pool, the rest
/// are redo targets in offer order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TopupMenu {
    pub cursor: usize,
}

/// One row of the loadout editor.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EditorRow {
    Element,
    Item(ItemId),
    Ability(AbilityId),
}

impl EditorRow {
    pub fn all() -> Vec<EditorRow> {
        let mut rows = vec![EditorRow::Element];
        rows.extend(ItemId::iter().map(EditorRow::Item));
        rows.extend(AbilityId::iter().map(EditorRow::Ability));
        rows
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LoadoutEditor {
    pub side: Side,
    pub cursor: usize,
    pub rows: Vec<EditorRow>,
}

impl Default for LoadoutEditor {
    fn default() -> Self {
        Self {
            side: Side::White,
            cursor: 0,
            rows: EditorRow::all(),
        }
    }
}

impl LoadoutEditor {
    pub fn current(&self) -> EditorRow {
        self.rows.get(self.cursor).copied().unwrap_or(EditorRow::Element)
    }

    pub fn move_cursor(&mut self, delta: i32) {
        let len = self.rows.len() as i32;
        self.cursor = (self.cursor as i32 + delta).rem_euclid(len) as usize;
    }
}

/// Mutable application state tracking mode, drafts and the board cursor.
#[derive(Clone, Debug)]
pub struct AppState {
    pub mode: AppMode,
    pub drafts: SideMap<LoadoutDraft>,
    pub rules: LoadoutRules,
    /// Keyboard cursor on the board.
    pub cursor: Square,
    /// Where the board was last drawn, for mouse hit testing.
    pub board_area: Rect,
    pub seed: Option<u64>,
}

impl AppState {
    pub fn new(rules: LoadoutRules) -> Self {
        Self {
            mode: AppMode::Board,
            drafts: SideMap::default(),
            rules,
            cursor: Square::from_coords(4, 1).unwrap_or_default(),
            board_area: Rect::default(),
            seed: None,
        }
    }

    pub fn exit_to_board(&mut self) {
        self.mode = AppMode::Board;
    }

    /// Moves the board cursor in board coordinates, clamped to the board.
    pub fn move_cursor(&mut self, file_delta: i8, rank_delta: i8) {
        let file = (self.cursor.file() as i8 + file_delta).clamp(0, 7) as u8;
        let rank = (self.cursor.rank() as i8 + rank_delta).clamp(0, 7) as u8;
        if let Some(square) = Square::from_coords(file, rank) {
            self.cursor = square;
        }
    }

    /// Applies the editor's current row for `side` (toggle or cycle).
    pub fn edit_loadout(&mut self, side: Side, row: EditorRow) -> Result<(), client_frontend_core::LoadoutError> {
        let draft = &mut self.drafts[side];
        match row {
            EditorRow::Element => {
                let elements: Vec<ElementId> = ElementId::iter().collect();
                let at = elements.iter().position(|e| *e == draft.element()).unwrap_or(0);
                draft.set_element(elements[(at + 1) % elements.len()]);
                Ok(())
            }
            EditorRow::Item(item) => {
                draft.toggle_item(item);
                Ok(())
            }
            EditorRow::Ability(ability) => draft.toggle_ability(ability),
        }
    }

    /// Cycles the scope of an equipped ability: none, then each piece kind.
    pub fn cycle_scope(&mut self, side: Side, ability: AbilityId) -> Result<(), client_frontend_core::LoadoutError> {
        let draft = &mut self.drafts[side];
        let next = match draft.scope(ability) {
            None => PieceKind::iter().next(),
            Some(kind) => PieceKind::iter().skip_while(|k| *k != kind).nth(1),
        };
        draft.set_scope(ability, next)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn element_row_cycles_through_all_elements() {
        let mut state = AppState::new(LoadoutRules::default());
        let start = state.drafts.white.element();
        for _ in 0..ElementId::iter().count() {
            state.edit_loadout(Side::White, EditorRow::Element).unwrap();
        }
        assert_eq!(state.drafts.white.element(), start);
    }

    #[test]
    fn scope_cycle_requires_scoping() {
        let mut state = AppState::new(LoadoutRules::default());
        state
            .edit_loadout(Side::Black, EditorRow::Ability(AbilityId::Redo))
            .unwrap();
        assert!(state.cycle_scope(Side::Black, AbilityId::Redo).is_err());

        state.drafts.black.set_element(ElementId::Lightning);
        state.cycle_scope(Side::Black, AbilityId::Redo).unwrap();
        assert_eq!(state.drafts.black.scope(AbilityId::Redo), Some(PieceKind::Pawn));
    }

    #[test]
    fn board_cursor_is_clamped() {
        let mut state = AppState::new(LoadoutRules::default());
        state.move_cursor(-10, 10);
        assert_eq!(state.cursor, "a8".parse().unwrap());
    }
}
