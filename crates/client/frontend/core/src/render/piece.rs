use std::collections::BTreeMap;

use game_core::{Piece, PieceId, PieceKind, PieceMeta, Side, Square};

use crate::geometry::Point;

/// Continuous board position of a square's centre (`x` = file, `y` = rank).
pub fn board_point(square: Square) -> Point {
    Point::new(square.file() as f32, square.rank() as f32)
}

/// On-screen counterpart of one live piece.
#[derive(Clone, Debug, PartialEq)]
pub struct VisualPiece {
    pub id: PieceId,
    pub kind: PieceKind,
    pub side: Side,
    pub square: Square,
    /// Board-space position; projected to the screen at draw time so resizes
    /// and perspective flips never invalidate it.
    pub position: Point,
    pub opacity: f32,
    pub scale: f32,
    pub meta: PieceMeta,
    /// Stamp identifying this incarnation of `id`.
    pub generation: u64,
    /// Set once a removal fade has started.
    pub leaving: bool,
}

/// The live visual set. Holds at most one entry per piece id.
#[derive(Debug, Default)]
pub struct PieceLayer {
    pieces: BTreeMap<PieceId, VisualPiece>,
    next_generation: u64,
}

impl PieceLayer {
    /// Inserts (or recreates) the visual for `piece`, returning its generation.
    pub fn spawn(&mut self, piece: &Piece, opacity: f32, scale: f32) -> u64 {
        self.next_generation += 1;
        let generation = self.next_generation;
        self.pieces.insert(
            piece.uid,
            VisualPiece {
                id: piece.uid,
                kind: piece.kind,
                side: piece.side,
                square: piece.square,
                position: board_point(piece.square),
                opacity,
                scale,
                meta: piece.meta.clone(),
                generation,
                leaving: false,
            },
        );
        generation
    }

    pub fn get(&self, id: PieceId) -> Option<&VisualPiece> {
        self.pieces.get(&id)
    }

    pub fn get_mut(&mut self, id: PieceId) -> Option<&mut VisualPiece> {
        self.pieces.get_mut(&id)
    }

    /// The entry for `id` only if it is still the incarnation stamped `generation`.
    pub fn live_mut(&mut self, id: PieceId, generation: u64) -> Option<&mut VisualPiece> {
        self.pieces
            .get_mut(&id)
            .filter(|piece| piece.generation == generation)
    }

    /// Removes `id` if it is still the incarnation stamped `generation`.
    pub fn despawn(&mut self, id: PieceId, generation: u64) -> bool {
        if self.pieces.get(&id).is_some_and(|p| p.generation == generation) {
            self.pieces.remove(&id);
            true
        } else {
            false
        }
    }

    pub fn clear(&mut self) {
        self.pieces.clear();
    }

    pub fn len(&self) -> usize {
        self.pieces.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pieces.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &VisualPiece> {
        self.pieces.values()
    }

    pub fn ids(&self) -> impl Iterator<Item = PieceId> + '_ {
        self.pieces.keys().copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn respawn_invalidates_old_generation() {
        let mut layer = PieceLayer::default();
        let piece = Piece::new(5, Side::White, PieceKind::Knight, Square::new(6).unwrap());
        let first = layer.spawn(&piece, 1.0, 1.0);
        let second = layer.spawn(&piece, 1.0, 1.0);
        assert_ne!(first, second);
        assert_eq!(layer.len(), 1);
        assert!(layer.live_mut(piece.uid, first).is_none());
        assert!(!layer.despawn(piece.uid, first));
        assert!(layer.despawn(piece.uid, second));
        assert!(layer.is_empty());
    }
}
