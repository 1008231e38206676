//! Disambiguation between legal moves that share origin and destination.
use game_core::{Move, MoveKind, PieceKind, Square};

/// Promotions first, strongest piece first; everything else after.
fn rank(mv: &Move) -> u8 {
    match mv.promote_to {
        Some(PieceKind::Queen) => 0,
        Some(PieceKind::Rook) => 1,
        Some(PieceKind::Bishop) => 2,
        Some(PieceKind::Knight) => 3,
        _ => 4,
    }
}

/// Legal moves from `from` to `to`, in picker order. The sort is stable, so
/// equally ranked moves keep their engine order.
pub fn variants_between(moves: &[Move], from: Square, to: Square) -> Vec<Move> {
    let mut out: Vec<Move> = moves
        .iter()
        .filter(|mv| mv.from == from && mv.to == to)
        .cloned()
        .collect();
    out.sort_by_key(rank);
    out
}

/// Whether `candidates` offer more than one distinct outcome. Moves that
/// differ only in engine flags or annotations play out identically.
pub fn is_ambiguous(candidates: &[Move]) -> bool {
    let mut outcomes: Vec<(&MoveKind, Option<PieceKind>, Option<Square>)> = Vec::new();
    for mv in candidates {
        let outcome = (&mv.kind, mv.promote_to, mv.origin_sq);
        if !outcomes.contains(&outcome) {
            outcomes.push(outcome);
        }
    }
    outcomes.len() > 1
}

pub fn variant_label(mv: &Move) -> String {
    if let Some(kind) = mv.promote_to {
        return format!("Promote to {kind}");
    }
    match mv.kind {
        MoveKind::EnPassant => "En passant".to_string(),
        MoveKind::Castle => "Castle".to_string(),
        MoveKind::RemoteCapture => match mv.origin_sq {
            Some(origin) => format!("Remote capture from {origin}"),
            None => "Remote capture".to_string(),
        },
        MoveKind::Promotion => "Promotion".to_string(),
        MoveKind::Normal if mv.is_capture() => "Capture".to_string(),
        MoveKind::Normal | MoveKind::Other(_) => "Move".to_string(),
    }
}

/// Open picker for one ambiguous from/to pair.
#[derive(Clone, Debug, PartialEq)]
pub struct VariantPicker {
    pub from: Square,
    pub to: Square,
    options: Vec<Move>,
    cursor: usize,
}

impl VariantPicker {
    /// `None` unless there is an actual choice to make.
    pub fn open(moves: &[Move], from: Square, to: Square) -> Option<Self> {
        let options = variants_between(moves, from, to);
        is_ambiguous(&options).then_some(Self {
            from,
            to,
            options,
            cursor: 0,
        })
    }

    pub fn options(&self) -> &[Move] {
        &self.options
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn move_cursor(&mut self, delta: i32) {
        let len = self.options.len() as i32;
        self.cursor = (self.cursor as i32 + delta).rem_euclid(len) as usize;
    }

    pub fn selected(&self) -> &Move {
        &self.options[self.cursor]
    }

    pub fn get(&self, index: usize) -> Option<&Move> {
        self.options.get(index)
    }
}
