//! Animation-oriented delta between two snapshots.
use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::board::{Piece, PieceId, PieceMeta, Square};
use crate::snapshot::Snapshot;

/// A piece that left the board. Only the id is needed to animate it away;
/// the remaining fields are informational.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PieceRef {
    #[serde(alias = "id")]
    pub uid: PieceId,
    #[serde(default)]
    pub pos: Option<Square>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MovedPiece {
    #[serde(alias = "id")]
    pub uid: PieceId,
    pub from: Square,
    pub to: Square,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MetaChange {
    #[serde(alias = "id")]
    pub uid: PieceId,
    #[serde(default)]
    pub before: PieceMeta,
    #[serde(default)]
    pub after: PieceMeta,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SnapshotDiff {
    #[serde(default)]
    pub added: Vec<Piece>,
    #[serde(default)]
    pub removed: Vec<PieceRef>,
    #[serde(default)]
    pub moved: Vec<MovedPiece>,
    #[serde(default, alias = "metaChanged")]
    pub meta_changed: Vec<MetaChange>,
}

impl SnapshotDiff {
    /// Computes the delta locally, matching pieces by uid.
    pub fn between(before: &Snapshot, after: &Snapshot) -> Self {
        let old: BTreeMap<PieceId, &Piece> = before.pieces.iter().map(|p| (p.uid, p)).collect();
        let new: BTreeMap<PieceId, &Piece> = after.pieces.iter().map(|p| (p.uid, p)).collect();

        let mut diff = Self::default();
        for (uid, piece) in &new {
            match old.get(uid) {
                None => diff.added.push((*piece).clone()),
                Some(prev) => {
                    if prev.square != piece.square {
                        diff.moved.push(MovedPiece {
                            uid: *uid,
                            from: prev.square,
                            to: piece.square,
                        });
                    }
                    if prev.meta != piece.meta {
                        diff.meta_changed.push(MetaChange {
                            uid: *uid,
                            before: prev.meta.clone(),
                            after: piece.meta.clone(),
                        });
                    }
                }
            }
        }
        for (uid, piece) in &old {
            if !new.contains_key(uid) {
                diff.removed.push(PieceRef {
                    uid: *uid,
                    pos: Some(piece.square),
                });
            }
        }
        diff
    }

    pub fn is_empty(&self) -> bool {
        self.added.is_empty()
            && self.removed.is_empty()
            && self.moved.is_empty()
            && self.meta_changed.is_empty()
    }
}
