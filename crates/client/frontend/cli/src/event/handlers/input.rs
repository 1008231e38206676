//! Keyboard and mouse handling, routed by application mode.

use anyhow::Result;
use client_frontend_core::{LoadoutDraft, MessageLevel, SubmitError};
use crossterm::event::{
    self as term_event, Event as TermEvent, KeyEvent, KeyEventKind, MouseButton, MouseEventKind,
};
use game_core::{Side, TopupKind};
use tokio::time::Duration;

use super::super::EventLoop;
use crate::{
    input::{KeyAction, cell_to_surface},
    state::{AppMode, EditorRow, LoadoutEditor, TopupMenu},
};

/// What a top-up menu key resolves to once the menu borrow is released.
enum TopupStep {
    Stay,
    Close,
    Submit(usize),
}

impl EventLoop {
    /// Drains pending terminal events without blocking. Returns `true` to quit.
    pub(in crate::event) fn handle_terminal_events(&mut self) -> Result<bool> {
        while term_event::poll(Duration::ZERO)? {
            match term_event::read()? {
                TermEvent::Key(key) if key.kind == KeyEventKind::Press => {
                    if self.handle_key_press(key) {
                        return Ok(true);
                    }
                }
                TermEvent::Mouse(mouse) if mouse.kind == MouseEventKind::Down(MouseButton::Left) => {
                    self.handle_click(mouse.column, mouse.row);
                }
                // Resizes are picked up by the next draw.
                _ => {}
            }
        }
        Ok(false)
    }

    fn handle_key_press(&mut self, key: KeyEvent) -> bool {
        let action = self.input.handle_key(key, &self.app_state.mode);
        if action == KeyAction::Quit {
            tracing::info!("quit requested");
            return true;
        }

        match self.app_state.mode {
            AppMode::Board => self.handle_board_key(action),
            AppMode::Topup(_) => self.handle_topup_key(action),
            AppMode::Loadout(_) => self.handle_editor_key(action),
            AppMode::Help => {
                if matches!(action, KeyAction::Cancel | KeyAction::Help | KeyAction::Activate) {
                    self.app_state.exit_to_board();
                }
            }
        }
        false
    }

    /// A left click taps the square under the pointer, like Enter on the cursor.
    fn handle_click(&mut self, column: u16, row: u16) {
        if self.app_state.mode != AppMode::Board {
            return;
        }
        let Some((x, y)) = cell_to_surface(self.app_state.board_area, column, row) else {
            return;
        };
        let Some(square) = self.renderer.square_at_screen(x, y) else {
            return;
        };
        self.app_state.cursor = square;
        if self.orchestrator.picker().is_some() {
            return;
        }
        if let Err(err) = self
            .orchestrator
            .tap(square, &mut self.store, &mut self.renderer)
        {
            self.orchestrator.report(&err);
        }
    }

    fn handle_board_key(&mut self, action: KeyAction) {
        let result = match action {
            KeyAction::MoveCursor(file_delta, rank_delta) => {
                if let Some(picker) = self.orchestrator.picker_mut() {
                    picker.move_cursor(-(rank_delta as i32));
                    return;
                }
                // Deltas arrive in screen terms; Black views the board rotated.
                let (file_delta, rank_delta) = match self.renderer.perspective() {
                    Side::White => (file_delta, rank_delta),
                    Side::Black => (-file_delta, -rank_delta),
                };
                self.app_state.move_cursor(file_delta, rank_delta);
                Ok(())
            }
            KeyAction::Activate => {
                if self.orchestrator.picker().is_some() {
                    self.orchestrator
                        .confirm_variant(&mut self.store, &mut self.renderer)
                } else {
                    self.orchestrator
                        .tap(self.app_state.cursor, &mut self.store, &mut self.renderer)
                }
            }
            KeyAction::Choose(index) => self.choose(index),
            KeyAction::Cancel => {
                if self.orchestrator.picker().is_some() {
                    self.orchestrator.cancel_variant();
                    Ok(())
                } else if self.orchestrator.pending().is_some() {
                    self.orchestrator.cancel_decision()
                } else {
                    self.renderer.set_selection_square(None);
                    self.orchestrator.notices_mut().dismiss();
                    Ok(())
                }
            }
            KeyAction::Undo => self.orchestrator.undo(&mut self.renderer),
            KeyAction::Reset => self.orchestrator.reset(&mut self.renderer),
            KeyAction::Refresh => self.orchestrator.refresh(),
            KeyAction::OpenLoadout => {
                self.open_loadout_editor();
                Ok(())
            }
            KeyAction::OpenTopup => match self.orchestrator.topup_offer(&self.store) {
                Some(_) => {
                    self.app_state.mode = AppMode::Topup(TopupMenu::default());
                    Ok(())
                }
                None => Err(SubmitError::TopupUnavailable),
            },
            KeyAction::FlipBoard => {
                let side = self.renderer.perspective().opponent();
                self.renderer.set_perspective(side);
                tracing::debug!(%side, "board flipped");
                Ok(())
            }
            KeyAction::ToggleQuality => {
                let quality = self.renderer.quality().toggled();
                self.renderer.set_quality(quality);
                Ok(())
            }
            KeyAction::Help => {
                self.app_state.mode = AppMode::Help;
                Ok(())
            }
            _ => Ok(()),
        };

        if let Err(err) = result {
            self.orchestrator.report(&err);
        }
    }

    /// Digit keys pick a move variant when the picker is open, otherwise an
    /// option of the pending decision.
    fn choose(&mut self, index: usize) -> Result<(), SubmitError> {
        if self.orchestrator.picker().is_some() {
            return self
                .orchestrator
                .choose_variant(index, &mut self.store, &mut self.renderer);
        }
        let Some(pending) = self.orchestrator.pending() else {
            return Ok(());
        };
        let Some(choice) = pending.options.get(index).map(|option| option.id.clone()) else {
            return Err(SubmitError::UnknownOption((index + 1).to_string()));
        };
        self.orchestrator.decide(&choice)
    }

    /// Seeds the drafts from the loadouts in play, when there are any.
    fn open_loadout_editor(&mut self) {
        let snapshot = self.store.current();
        for side in [Side::White, Side::Black] {
            if let Some(config) = snapshot.loadout(side) {
                self.app_state.drafts[side] = LoadoutDraft::from_config(config);
            }
        }
        self.app_state.mode = AppMode::Loadout(LoadoutEditor::default());
    }

    fn handle_topup_key(&mut self, action: KeyAction) {
        let Some(offer) = self.orchestrator.topup_offer(&self.store) else {
            self.app_state.exit_to_board();
            return;
        };
        let AppMode::Topup(menu) = &mut self.app_state.mode else {
            return;
        };

        let rows = 1 + offer.redo_targets.len() as i32;
        let step = match action {
            KeyAction::MoveCursor(_, rank_delta) => {
                menu.cursor = (menu.cursor as i32 - rank_delta as i32).rem_euclid(rows) as usize;
                TopupStep::Stay
            }
            KeyAction::Activate => TopupStep::Submit(menu.cursor),
            KeyAction::Choose(index) => TopupStep::Submit(index),
            KeyAction::Cancel | KeyAction::OpenTopup => TopupStep::Close,
            _ => TopupStep::Stay,
        };

        let row = match step {
            TopupStep::Stay => return,
            TopupStep::Close => {
                self.app_state.exit_to_board();
                return;
            }
            TopupStep::Submit(row) => row,
        };
        let (kind, target) = match row {
            0 => (TopupKind::Necro, None),
            n => match offer.redo_targets.get(n - 1) {
                Some(target) => (TopupKind::Redo, Some(target.uid)),
                None => return,
            },
        };
        match self.orchestrator.submit_topup(kind, target, &self.store) {
            Ok(()) => self.app_state.exit_to_board(),
            Err(err) => self.orchestrator.report(&err),
        }
    }

    fn handle_editor_key(&mut self, action: KeyAction) {
        let (side, row) = match &mut self.app_state.mode {
            AppMode::Loadout(editor) => match action {
                KeyAction::MoveCursor(_, rank_delta) => {
                    editor.move_cursor(-(rank_delta as i32));
                    return;
                }
                KeyAction::SwitchSide => {
                    editor.side = editor.side.opponent();
                    return;
                }
                _ => (editor.side, editor.current()),
            },
            _ => return,
        };

        let result = match (action, row) {
            (KeyAction::Activate, row) => self.app_state.edit_loadout(side, row),
            (KeyAction::CycleScope, EditorRow::Ability(ability)) => {
                self.app_state.cycle_scope(side, ability)
            }
            (KeyAction::StartGame, _) => {
                self.start_game();
                return;
            }
            (KeyAction::Cancel, _) => {
                self.app_state.exit_to_board();
                return;
            }
            _ => Ok(()),
        };

        if let Err(err) = result {
            tracing::debug!(%err, "loadout edit refused");
            self.orchestrator
                .notices_mut()
                .post(err.to_string(), MessageLevel::Warning);
        }
    }

    /// Submits both drafts. The item cost cap is advisory, so an over-budget
    /// draft only earns a notice.
    fn start_game(&mut self) {
        let cap = self.app_state.rules.item_cost_cap;
        let over_budget: Vec<String> = [Side::White, Side::Black]
            .into_iter()
            .filter(|side| self.app_state.drafts[*side].exceeds_cost_cap(cap))
            .map(|side| side.to_string())
            .collect();

        let white = self.app_state.drafts.white.to_config();
        let black = self.app_state.drafts.black.to_config();
        match self
            .orchestrator
            .new_game(white, black, self.app_state.seed, &mut self.renderer)
        {
            Ok(()) => {
                self.app_state.exit_to_board();
                if !over_budget.is_empty() {
                    self.orchestrator.notices_mut().post(
                        format!("{} over the item budget of {cap}", over_budget.join(" and ")),
                        MessageLevel::Info,
                    );
                }
            }
            Err(err) => self.orchestrator.report(&err),
        }
    }

    /// Leaves popups whose subject has gone away, e.g. a top-up menu after
    /// the turn passed.
    pub(in crate::event) fn close_stale_popups(&mut self) {
        if matches!(self.app_state.mode, AppMode::Topup(_))
            && self.orchestrator.topup_offer(&self.store).is_none()
            && self.orchestrator.is_idle()
        {
            self.app_state.exit_to_board();
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use client_api::{ApiRequest, ScriptedGameApi};
    use client_frontend_core::FrontendConfig;
    use game_core::{AbilityId, ElementId};
    use strum::IntoEnumIterator;

    use super::*;
    use crate::config::CliConfig;

    fn event_loop() -> EventLoop {
        EventLoop::new(
            Arc::new(ScriptedGameApi::new()),
            &FrontendConfig::default(),
            CliConfig::default(),
        )
    }

    fn editor_at(row: EditorRow) -> AppMode {
        let mut editor = LoadoutEditor::default();
        editor.cursor = editor.rows.iter().position(|r| *r == row).unwrap();
        AppMode::Loadout(editor)
    }

    #[test]
    fn cursor_follows_the_viewer_when_flipped() {
        let mut ev = event_loop();
        let start = ev.app_state.cursor;
        ev.handle_board_key(KeyAction::FlipBoard);
        ev.handle_board_key(KeyAction::MoveCursor(0, 1));
        assert_eq!(ev.app_state.cursor.rank(), start.rank() - 1);
        assert_eq!(ev.renderer.perspective(), Side::Black);
    }

    #[test]
    fn topup_without_necklace_is_refused_with_a_notice() {
        let mut ev = event_loop();
        ev.handle_board_key(KeyAction::OpenTopup);
        assert_eq!(ev.app_state.mode, AppMode::Board);
        assert!(ev.orchestrator.notices().current().is_some());
    }

    #[test]
    fn starting_a_game_sends_both_drafts() {
        let mut ev = event_loop();
        ev.app_state.mode = editor_at(EditorRow::Element);
        ev.handle_editor_key(KeyAction::Activate);
        ev.handle_editor_key(KeyAction::StartGame);

        assert_eq!(ev.app_state.mode, AppMode::Board);
        match ev.orchestrator.next_request() {
            Some(ApiRequest::NewGame { white, black, .. }) => {
                assert_ne!(white.element, ElementId::default());
                assert_eq!(black.element, ElementId::default());
            }
            other => panic!("expected a new game request, got {other:?}"),
        }
    }

    #[test]
    fn full_slots_refuse_another_ability() {
        let mut ev = event_loop();
        let mut abilities = AbilityId::iter();
        let first = abilities.next().unwrap();
        let second = abilities.next().unwrap();

        ev.app_state.mode = editor_at(EditorRow::Ability(first));
        ev.handle_editor_key(KeyAction::Activate);
        assert!(ev.app_state.drafts.white.has_ability(first));
        assert!(ev.orchestrator.notices().current().is_none());

        ev.app_state.mode = editor_at(EditorRow::Ability(second));
        ev.handle_editor_key(KeyAction::Activate);
        assert!(!ev.app_state.drafts.white.has_ability(second));
        assert!(ev.orchestrator.notices().current().is_some());
    }

    #[test]
    fn escape_leaves_the_editor_without_sending() {
        let mut ev = event_loop();
        ev.app_state.mode = editor_at(EditorRow::Element);
        ev.handle_editor_key(KeyAction::Cancel);
        assert_eq!(ev.app_state.mode, AppMode::Board);
        assert!(ev.orchestrator.next_request().is_none());
    }
}
