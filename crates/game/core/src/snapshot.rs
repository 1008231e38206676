//! Authoritative game state as reported by the rules engine.
//!
//! A [`Snapshot`] is never patched in place. Every engine reply carries a full
//! replacement and the client swaps it wholesale.
use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::board::{Piece, PieceId, PieceKind, Side, SideMap, Square};
use crate::loadout::LoadoutConfig;
use crate::moves::Move;

/// A captured piece eligible for resurrection.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraveEntry {
    pub uid: Option<PieceId>,
    #[serde(rename = "type")]
    pub kind: PieceKind,
    pub capture_sq: Square,
}

/// Per-side consumable pools and per-piece charges.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceState {
    #[serde(default)]
    pub redo_charges: BTreeMap<PieceId, u32>,
    #[serde(default)]
    pub redo_max: BTreeMap<PieceId, u32>,
    #[serde(default)]
    pub necro_pool: SideMap<u32>,
    #[serde(default)]
    pub necro_max: SideMap<u32>,
    #[serde(default)]
    pub solar_uses: SideMap<u32>,
    #[serde(default)]
    pub solar_max: u32,
    #[serde(default)]
    pub graveyard: SideMap<Vec<GraveEntry>>,
}

impl ResourceState {
    pub fn redo_charge(&self, uid: PieceId) -> u32 {
        self.redo_charges.get(&uid).copied().unwrap_or(0)
    }

    pub fn redo_capacity(&self, uid: PieceId) -> u32 {
        self.redo_max.get(&uid).copied().unwrap_or(0)
    }

    /// True when the piece has a redo pool that is not yet full.
    pub fn redo_has_headroom(&self, uid: PieceId) -> bool {
        let max = self.redo_capacity(uid);
        max > 0 && self.redo_charge(uid) < max
    }

    pub fn necro_has_headroom(&self, side: Side) -> bool {
        let max = self.necro_max[side];
        max > 0 && self.necro_pool[side] < max
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub side_to_move: Side,
    #[serde(default)]
    pub ply: u32,
    #[serde(default)]
    pub pieces: Vec<Piece>,
    #[serde(default)]
    pub check: bool,
    #[serde(default)]
    pub checkmate: bool,
    #[serde(default)]
    pub last_move: Option<Move>,
    #[serde(default)]
    pub halfmove_clock: u32,
    #[serde(default = "first_move")]
    pub fullmove_number: u32,
    #[serde(default)]
    pub fen: Option<String>,
    #[serde(default)]
    pub arcane: Option<SideMap<LoadoutConfig>>,
    #[serde(default)]
    pub arcane_state: Option<ResourceState>,
}

fn first_move() -> u32 {
    1
}

impl Snapshot {
    /// An empty board with White to move.
    pub fn empty() -> Self {
        Self {
            side_to_move: Side::White,
            ply: 0,
            pieces: Vec::new(),
            check: false,
            checkmate: false,
            last_move: None,
            halfmove_clock: 0,
            fullmove_number: 1,
            fen: None,
            arcane: None,
            arcane_state: None,
        }
    }

    /// Standard opening position, uids 1..=16 for White and 17..=32 for Black.
    pub fn standard() -> Self {
        const BACK_RANK: [PieceKind; 8] = [
            PieceKind::Rook,
            PieceKind::Knight,
            PieceKind::Bishop,
            PieceKind::Queen,
            PieceKind::King,
            PieceKind::Bishop,
            PieceKind::Knight,
            PieceKind::Rook,
        ];

        let mut pieces = Vec::with_capacity(32);
        let mut uid = 1;
        for (side, back, pawns) in [(Side::White, 0, 1), (Side::Black, 7, 6)] {
            for (file, kind) in BACK_RANK.iter().enumerate() {
                for (rank, kind) in [(back, *kind), (pawns, PieceKind::Pawn)] {
                    if let Some(square) = Square::from_coords(file as u8, rank) {
                        pieces.push(Piece::new(uid, side, kind, square));
                        uid += 1;
                    }
                }
            }
        }

        Self {
            pieces,
            ..Self::empty()
        }
    }

    pub fn piece(&self, uid: PieceId) -> Option<&Piece> {
        self.pieces.iter().find(|p| p.uid == uid)
    }

    pub fn piece_at(&self, square: Square) -> Option<&Piece> {
        self.pieces.iter().find(|p| p.square == square)
    }

    pub fn king_square(&self, side: Side) -> Option<Square> {
        self.pieces
            .iter()
            .find(|p| p.side == side && p.kind == PieceKind::King)
            .map(|p| p.square)
    }

    /// Square of the side-to-move king when it is in check.
    pub fn check_square(&self) -> Option<Square> {
        if self.check {
            self.king_square(self.side_to_move)
        } else {
            None
        }
    }

    pub fn loadout(&self, side: Side) -> Option<&LoadoutConfig> {
        self.arcane.as_ref().map(|cfg| &cfg[side])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn standard_position_has_unique_uids_and_kings() {
        let snapshot = Snapshot::standard();
        assert_eq!(snapshot.pieces.len(), 32);
        let mut uids: Vec<_> = snapshot.pieces.iter().map(|p| p.uid).collect();
        uids.sort();
        uids.dedup();
        assert_eq!(uids.len(), 32);
        assert_eq!(snapshot.king_square(Side::White), "e1".parse().ok());
        assert_eq!(snapshot.king_square(Side::Black), "e8".parse().ok());
        assert_eq!(snapshot.piece_at("d2".parse().unwrap()).map(|p| p.kind), Some(PieceKind::Pawn));
    }

    #[test]
    fn check_square_follows_side_to_move() {
        let mut snapshot = Snapshot::standard();
        assert_eq!(snapshot.check_square(), None);
        snapshot.check = true;
        snapshot.side_to_move = Side::Black;
        assert_eq!(snapshot.check_square(), "e8".parse().ok());
    }

    #[test]
    fn decodes_resource_state_with_string_uid_keys() {
        let json = r#"{
            "side_to_move": "WHITE",
            "ply": 3,
            "pieces": [],
            "arcane_state": {
                "redo_charges": {"12": 1},
                "redo_max": {"12": 2},
                "necro_pool": {"WHITE": 0, "BLACK": 1},
                "necro_max": {"WHITE": 2, "BLACK": 1},
                "solar_uses": {"WHITE": 3, "BLACK": 3},
                "solar_max": 3,
                "graveyard": {"WHITE": [{"uid": 4, "type": "Pawn", "capture_sq": 20, "capture_alg": "e3"}], "BLACK": []}
            }
        }"#;
        let snapshot: Snapshot = serde_json::from_str(json).unwrap();
        let state = snapshot.arcane_state.unwrap();
        assert!(state.redo_has_headroom(PieceId(12)));
        assert!(!state.redo_has_headroom(PieceId(13)));
        assert!(state.necro_has_headroom(Side::White));
        assert!(!state.necro_has_headroom(Side::Black));
        assert_eq!(state.graveyard.white[0].kind, PieceKind::Pawn);
        assert_eq!(snapshot.fullmove_number, 1);
    }
}
