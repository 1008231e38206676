//! Side-panel view model derived from the store and orchestrator.
use game_core::{LoadoutConfig, ResourceState, Side, SideMap, Snapshot};

use crate::message::{MessageEntry, Notice};
use crate::orchestrator::DecisionOrchestrator;
use crate::store::{HistoryEntry, SnapshotStore};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GameStatus {
    Playing,
    Check,
    Checkmate,
}

impl GameStatus {
    fn of(snapshot: &Snapshot) -> Self {
        if snapshot.checkmate {
            GameStatus::Checkmate
        } else if snapshot.check {
            GameStatus::Check
        } else {
            GameStatus::Playing
        }
    }
}

/// One numbered row of the move list.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HistoryLine {
    pub number: u32,
    pub white: Option<String>,
    pub black: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LoadoutSummary {
    pub element: &'static str,
    pub items: Vec<&'static str>,
    /// Ability names, with the scoped piece kind in parentheses.
    pub abilities: Vec<String>,
}

impl LoadoutSummary {
    fn from_config(config: &LoadoutConfig) -> Self {
        Self {
            element: config.element.into(),
            items: config.items.iter().map(|&item| <&'static str>::from(item)).collect(),
            abilities: config
                .abilities
                .iter()
                .map(|slot| match slot.scoped_kind {
                    Some(kind) => format!("{} ({kind})", slot.ability),
                    None => slot.ability.to_string(),
                })
                .collect(),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ResourceSummary {
    pub necro_pool: u32,
    pub necro_max: u32,
    pub solar_uses: u32,
    pub solar_max: u32,
    pub graveyard: usize,
}

impl ResourceSummary {
    fn for_side(state: &ResourceState, side: Side) -> Self {
        Self {
            necro_pool: state.necro_pool[side],
            necro_max: state.necro_max[side],
            solar_uses: state.solar_uses[side],
            solar_max: state.solar_max,
            graveyard: state.graveyard[side].len(),
        }
    }
}

/// Missing arcane data leaves both fields `None`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SidePanel {
    pub loadout: Option<LoadoutSummary>,
    pub resources: Option<ResourceSummary>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DecisionPanel {
    pub title: &'static str,
    pub prompt: String,
    pub options: Vec<(String, String)>,
}

#[derive(Clone, Debug)]
pub struct HudFrame {
    pub side_to_move: Side,
    pub ply: u32,
    pub fullmove: u32,
    pub status: GameStatus,
    pub phase: &'static str,
    pub history: Vec<HistoryLine>,
    pub effects: Vec<String>,
    pub sides: SideMap<SidePanel>,
    pub decision: Option<DecisionPanel>,
    pub topup_available: bool,
    pub messages: Vec<MessageEntry>,
    pub notice: Option<Notice>,
}

impl HudFrame {
    pub fn build(
        store: &SnapshotStore,
        orchestrator: &DecisionOrchestrator,
        message_limit: usize,
    ) -> Self {
        let snapshot = store.current();
        let side_panel = |side: Side| SidePanel {
            loadout: snapshot.loadout(side).map(LoadoutSummary::from_config),
            resources: snapshot
                .arcane_state
                .as_ref()
                .map(|state| ResourceSummary::for_side(state, side)),
        };

        Self {
            side_to_move: snapshot.side_to_move,
            ply: snapshot.ply,
            fullmove: snapshot.fullmove_number,
            status: GameStatus::of(snapshot),
            phase: orchestrator.state().label(),
            history: history_lines(store.history()),
            effects: store
                .effects()
                .iter()
                .rev()
                .take(message_limit)
                .map(|e| e.text.clone())
                .collect(),
            sides: SideMap {
                white: side_panel(Side::White),
                black: side_panel(Side::Black),
            },
            decision: orchestrator.pending().map(|pending| DecisionPanel {
                title: pending.kind.title(),
                prompt: pending.prompt.clone(),
                options: pending
                    .options
                    .iter()
                    .map(|o| (o.id.clone(), o.label.clone()))
                    .collect(),
            }),
            topup_available: orchestrator
                .topup_offer(store)
                .is_some_and(|offer| offer.any_enabled()),
            messages: orchestrator.messages().recent(message_limit).cloned().collect(),
            notice: orchestrator.notices().current().cloned(),
        }
    }
}

/// Pairs history entries into numbered rows. Rows start on a Black move when
/// the game began with Black to move.
pub fn history_lines(entries: &[HistoryEntry]) -> Vec<HistoryLine> {
    let mut lines: Vec<HistoryLine> = Vec::new();
    for entry in entries {
        let number = entry.ply.div_ceil(2).max(1);
        match entry.side {
            Side::White => lines.push(HistoryLine {
                number,
                white: Some(entry.notation.clone()),
                black: None,
            }),
            Side::Black => match lines.last_mut() {
                Some(line) if line.number == number && line.black.is_none() => {
                    line.black = Some(entry.notation.clone());
                }
                _ => lines.push(HistoryLine {
                    number,
                    white: None,
                    black: Some(entry.notation.clone()),
                }),
            },
        }
    }
    lines
}
