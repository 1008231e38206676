//! Engine-issued choices that must be resolved before play continues.
use serde::{Deserialize, Serialize};

use crate::board::{PieceId, Square};
use crate::moves::Move;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DecisionKind {
    BlockPathDir,
    DoubleKillTarget,
    NecromancerResurrect,
    RedoReplay,
    #[serde(other)]
    Unknown,
}

impl DecisionKind {
    pub const fn title(self) -> &'static str {
        match self {
            DecisionKind::BlockPathDir => "Block Path",
            DecisionKind::DoubleKillTarget => "Double Kill",
            DecisionKind::NecromancerResurrect => "Necromancer",
            DecisionKind::RedoReplay => "Redo",
            DecisionKind::Unknown => "Decision",
        }
    }
}

/// Option id the engine uses for "decline this optional effect".
pub const SKIP_OPTION: &str = "skip";

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecisionOption {
    pub id: String,
    #[serde(default)]
    pub label: String,
    #[serde(default, rename = "type", alias = "kind")]
    pub kind: Option<String>,
    #[serde(default, rename = "uid", alias = "targetId")]
    pub target_id: Option<PieceId>,
    #[serde(default, rename = "to_sq", alias = "toSq")]
    pub to_square: Option<Square>,
    #[serde(default)]
    pub sq: Option<Square>,
    #[serde(default, rename = "move")]
    pub mv: Option<Move>,
}

impl DecisionOption {
    pub fn is_skip(&self) -> bool {
        self.id == SKIP_OPTION
    }

    /// Board square this option points at, if any.
    pub fn square(&self) -> Option<Square> {
        self.to_square
            .or(self.sq)
            .or_else(|| self.mv.as_ref().map(|mv| mv.to))
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PendingDecision {
    pub id: String,
    pub kind: DecisionKind,
    #[serde(default)]
    pub prompt: String,
    #[serde(default)]
    pub context: serde_json::Map<String, serde_json::Value>,
    #[serde(default)]
    pub options: Vec<DecisionOption>,
}

impl PendingDecision {
    /// Squares to pulse while this decision is open: every option target plus
    /// the acting piece's square when the context names one.
    pub fn highlight_squares(&self) -> Vec<Square> {
        let mut out: Vec<Square> = self.options.iter().filter_map(DecisionOption::square).collect();
        let context_square = self
            .context
            .get("mover_sq")
            .and_then(serde_json::Value::as_u64)
            .and_then(|n| u8::try_from(n).ok())
            .and_then(Square::new);
        out.extend(context_square);
        out.sort();
        out.dedup();
        out
    }

    pub fn option(&self, id: &str) -> Option<&DecisionOption> {
        self.options.iter().find(|o| o.id == id)
    }

    /// Options whose target square matches a board tap.
    pub fn options_at(&self, square: Square) -> impl Iterator<Item = &DecisionOption> {
        self.options.iter().filter(move |o| o.square() == Some(square))
    }

    /// The option a board tap selects. `None` when no option or several
    /// options (e.g. promotion replays) share the square.
    pub fn option_at(&self, square: Square) -> Option<&DecisionOption> {
        let mut matches = self.options_at(square);
        let first = matches.next()?;
        matches.next().is_none().then_some(first)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn double_kill() -> PendingDecision {
        serde_json::from_str(
            r#"{
                "id": "p1",
                "kind": "double_kill_target",
                "prompt": "Choose Double Kill target",
                "options": [
                    {"id": "17", "label": "Pawn @ a7", "sq": 48, "uid": 17, "type": "Pawn"},
                    {"id": "20", "label": "Pawn @ d7", "sq": 51, "uid": 20, "type": "Pawn"},
                    {"id": "skip", "label": "Skip"}
                ],
                "context": {"capturer_uid": 4}
            }"#,
        )
        .unwrap()
    }

    #[test]
    fn decodes_options_with_engine_field_names() {
        let pending = double_kill();
        assert_eq!(pending.kind, DecisionKind::DoubleKillTarget);
        assert_eq!(pending.options[0].target_id, Some(PieceId(17)));
        assert_eq!(pending.options[0].kind.as_deref(), Some("Pawn"));
        assert!(pending.options[2].is_skip());
    }

    #[test]
    fn highlight_squares_collects_option_targets() {
        let pending = double_kill();
        let squares: Vec<u8> = pending.highlight_squares().iter().map(|s| s.index()).collect();
        assert_eq!(squares, vec![48, 51]);
        assert_eq!(pending.option_at(Square::new(51).unwrap()).map(|o| o.id.as_str()), Some("20"));
    }

    #[test]
    fn shared_square_makes_a_tap_ambiguous() {
        let pending: PendingDecision = serde_json::from_str(
            r#"{
                "id": "r1",
                "kind": "redo_replay",
                "options": [
                    {"id": "q", "label": "a8=Q", "to_sq": 56},
                    {"id": "n", "label": "a8=N", "to_sq": 56},
                    {"id": "b", "label": "b8", "to_sq": 57}
                ]
            }"#,
        )
        .unwrap();
        let a8 = Square::new(56).unwrap();
        assert_eq!(pending.options_at(a8).count(), 2);
        assert!(pending.option_at(a8).is_none());
        assert_eq!(pending.option_at(Square::new(57).unwrap()).map(|o| o.id.as_str()), Some("b"));
    }

    #[test]
    fn unknown_kind_falls_back() {
        let pending: PendingDecision =
            serde_json::from_str(r#"{"id":"x","kind":"time_warp","context":{"mover_sq":12}}"#).unwrap();
        assert_eq!(pending.kind, DecisionKind::Unknown);
        assert_eq!(pending.highlight_squares(), vec![Square::new(12).unwrap()]);
    }
}
