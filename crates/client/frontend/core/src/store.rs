//! Canonical snapshot holder plus the move history and effect log derived
//! from settled replies.
use std::sync::Arc;

use game_core::{ActionResult, Side, Snapshot};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HistoryEntry {
    pub ply: u32,
    pub side: Side,
    pub notation: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EffectEntry {
    pub ply: u32,
    pub text: String,
}

/// Holds exactly one authoritative snapshot. Replies replace it wholesale;
/// nothing here ever patches a snapshot in place.
#[derive(Debug)]
pub struct SnapshotStore {
    current: Arc<Snapshot>,
    history: Vec<HistoryEntry>,
    effects: Vec<EffectEntry>,
    checkpoint: Option<Arc<Snapshot>>,
    revision: u64,
}

impl SnapshotStore {
    pub fn new(snapshot: Snapshot) -> Self {
        Self {
            current: Arc::new(snapshot),
            history: Vec::new(),
            effects: Vec::new(),
            checkpoint: None,
            revision: 0,
        }
    }

    pub fn current(&self) -> &Arc<Snapshot> {
        &self.current
    }

    /// Bumped on every replacement; lets views skip redundant work.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Swaps in a new snapshot and returns the previous one.
    pub fn replace(&mut self, snapshot: Snapshot) -> Arc<Snapshot> {
        self.revision += 1;
        std::mem::replace(&mut self.current, Arc::new(snapshot))
    }

    /// Replaces the snapshot with a fresh game, dropping derived logs.
    pub fn reset(&mut self, snapshot: Snapshot) {
        self.replace(snapshot);
        self.history.clear();
        self.effects.clear();
        self.checkpoint = None;
    }

    /// Adopts the `after` snapshot of a settled action and extends (or, for
    /// an undo, rewinds) the history.
    pub fn record_result(&mut self, result: &ActionResult) {
        let mover = self.current.side_to_move;
        self.replace(result.after.clone());
        let ply = self.current.ply;

        if let Some(undone) = &result.meta.undone {
            self.history.pop();
            let label = undone.san.as_deref().unwrap_or(&undone.uci);
            self.effects.push(EffectEntry {
                ply,
                text: format!("Undo {label}"),
            });
            return;
        }

        if let Some(notation) = result.meta.notation() {
            self.history.push(HistoryEntry {
                ply,
                side: mover,
                notation: notation.display().to_string(),
            });
        }
        self.effects.extend(result.meta.effects.iter().map(|effect| EffectEntry {
            ply,
            text: effect.describe(),
        }));
    }

    pub fn history(&self) -> &[HistoryEntry] {
        &self.history
    }

    pub fn effects(&self) -> &[EffectEntry] {
        &self.effects
    }

    /// Remembers the current snapshot as the rollback point of an action.
    pub fn checkpoint(&mut self) {
        self.checkpoint = Some(Arc::clone(&self.current));
    }

    pub fn has_checkpoint(&self) -> bool {
        self.checkpoint.is_some()
    }

    pub fn discard_checkpoint(&mut self) {
        self.checkpoint = None;
    }

    /// Reinstates the checkpoint, returning it, or `None` if none was taken.
    pub fn restore_checkpoint(&mut self) -> Option<Arc<Snapshot>> {
        let checkpoint = self.checkpoint.take()?;
        self.revision += 1;
        self.current = Arc::clone(&checkpoint);
        Some(checkpoint)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use game_core::{Notation, ResultMeta, UndoneMove, Move};

    fn moved(before: &Snapshot, san: &str) -> ActionResult {
        let mut after = before.clone();
        after.ply += 1;
        after.side_to_move = before.side_to_move.opponent();
        after.pieces[0].square = game_core::Square::new(40).unwrap();
        let mut result = ActionResult::from_snapshots(before.clone(), after);
        result.meta = ResultMeta {
            applied_notation: Some(Notation {
                uci: "a1a6".into(),
                san: Some(san.into()),
            }),
            ..ResultMeta::default()
        };
        result
    }

    #[test]
    fn record_result_replaces_snapshot_and_logs_history() {
        let mut store = SnapshotStore::new(Snapshot::standard());
        let result = moved(store.current(), "Ra6");
        store.record_result(&result);
        assert_eq!(store.current().ply, 1);
        assert_eq!(store.history().len(), 1);
        assert_eq!(store.history()[0].side, Side::White);
        assert_eq!(store.history()[0].notation, "Ra6");
        assert_eq!(store.revision(), 1);
    }

    #[test]
    fn undo_pops_history() {
        let mut store = SnapshotStore::new(Snapshot::standard());
        let result = moved(store.current(), "Ra6");
        store.record_result(&result);

        let mut undo = ActionResult::from_snapshots((**store.current()).clone(), Snapshot::standard());
        undo.meta.undone = Some(UndoneMove {
            mv: Move::new(game_core::Square::new(0).unwrap(), game_core::Square::new(40).unwrap()),
            uci: "a1a6".into(),
            san: Some("Ra6".into()),
            effects: Vec::new(),
        });
        store.record_result(&undo);
        assert!(store.history().is_empty());
        assert_eq!(store.effects().last().map(|e| e.text.as_str()), Some("Undo Ra6"));
    }

    #[test]
    fn checkpoint_restores_exact_snapshot() {
        let mut store = SnapshotStore::new(Snapshot::standard());
        store.checkpoint();
        let saved = Arc::clone(store.current());
        let mut other = Snapshot::standard();
        other.ply = 9;
        store.replace(other);

        let restored = store.restore_checkpoint().unwrap();
        assert!(Arc::ptr_eq(&restored, &saved));
        assert_eq!(**store.current(), *saved);
        assert!(store.restore_checkpoint().is_none());
    }
}
