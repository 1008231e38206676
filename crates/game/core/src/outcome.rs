//! Settled action replies: the before/after snapshots, their diff and the
//! engine's annotations of what happened.
use serde::{Deserialize, Serialize};

use crate::diff::SnapshotDiff;
use crate::moves::Move;
use crate::snapshot::Snapshot;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notation {
    pub uci: String,
    #[serde(default)]
    pub san: Option<String>,
}

impl Notation {
    /// SAN when the engine produced it, UCI otherwise.
    pub fn display(&self) -> &str {
        self.san.as_deref().unwrap_or(&self.uci)
    }
}

/// A side effect reported by the engine, tagged by `type`. The payload is kept
/// as-is since only the tag and a few well-known keys are ever displayed.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Effect {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(flatten)]
    pub details: serde_json::Map<String, serde_json::Value>,
}

impl Effect {
    pub fn describe(&self) -> String {
        let label = match self.kind.as_str() {
            "capture" => "Capture",
            "block_path" => "Block Path",
            "redo" => "Redo",
            "redo_pending" => "Redo pending",
            "poisoned_dagger" => "Poisoned Dagger",
            "lightning_misfire" => "Lightning misfire",
            "double_kill" => "Double Kill",
            "quantum_kill" => "Quantum Kill",
            "chain_kill" => "Chain Kill",
            "necromancer" => "Necromancer",
            "solar_topup" => "Solar top-up",
            other => other,
        };
        match self.details.get("kind").and_then(|v| v.as_str()) {
            Some(sub) => format!("{label} ({sub})"),
            None => label.to_string(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct UndoneMove {
    #[serde(rename = "move")]
    pub mv: Move,
    pub uci: String,
    #[serde(default)]
    pub san: Option<String>,
    #[serde(default)]
    pub effects: Vec<Effect>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ResultMeta {
    #[serde(default)]
    pub applied: Option<Move>,
    #[serde(default)]
    pub applied_notation: Option<Notation>,
    #[serde(default)]
    pub result_last_notation: Option<Notation>,
    #[serde(default)]
    pub effects: Vec<Effect>,
    #[serde(default)]
    pub check: Option<bool>,
    #[serde(default)]
    pub checkmate: Option<bool>,
    #[serde(default)]
    pub undone: Option<UndoneMove>,
}

impl ResultMeta {
    /// Notation of the move that actually landed, which can differ from the
    /// submitted one after a redo.
    pub fn notation(&self) -> Option<&Notation> {
        self.result_last_notation
            .as_ref()
            .or(self.applied_notation.as_ref())
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ActionResult {
    #[serde(default)]
    pub before: Option<Snapshot>,
    pub after: Snapshot,
    #[serde(default)]
    pub diff: SnapshotDiff,
    #[serde(default)]
    pub meta: ResultMeta,
}

impl ActionResult {
    /// A result whose diff is computed locally from the two snapshots.
    pub fn from_snapshots(before: Snapshot, after: Snapshot) -> Self {
        let diff = SnapshotDiff::between(&before, &after);
        Self {
            before: Some(before),
            after,
            diff,
            meta: ResultMeta::default(),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TopupKind {
    Necro,
    Redo,
}
