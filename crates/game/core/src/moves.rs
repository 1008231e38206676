//! Legal-move records as produced by the rules engine.
use serde::{Deserialize, Serialize};

use crate::board::{PieceKind, Square};

/// Engine move kind. Kinds this client does not know are kept as the raw
/// string so the move still round-trips unchanged.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, strum::EnumString, strum::AsRefStr, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
#[strum(serialize_all = "snake_case")]
pub enum MoveKind {
    #[default]
    Normal,
    EnPassant,
    Castle,
    Promotion,
    RemoteCapture,
    #[strum(default)]
    Other(String),
}

impl MoveKind {
    pub fn as_str(&self) -> &str {
        match self {
            MoveKind::Other(raw) => raw,
            known => known.as_ref(),
        }
    }
}

impl From<String> for MoveKind {
    fn from(raw: String) -> Self {
        match raw.parse() {
            Ok(kind) => kind,
            Err(_) => MoveKind::Other(raw),
        }
    }
}

impl From<MoveKind> for String {
    fn from(kind: MoveKind) -> Self {
        match kind {
            MoveKind::Other(raw) => raw,
            known => known.as_str().to_string(),
        }
    }
}

fn is_false(value: &bool) -> bool {
    !*value
}

/// A move the engine reported as legal. The client never fabricates these; it
/// only picks one and sends it back verbatim.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Move {
    pub from: Square,
    pub to: Square,
    #[serde(default)]
    pub kind: MoveKind,
    #[serde(default, alias = "promoteTo", skip_serializing_if = "Option::is_none")]
    pub promote_to: Option<PieceKind>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub flags: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub captured_sq: Option<Square>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rook_from: Option<Square>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rook_to: Option<Square>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub origin_sq: Option<Square>,
    #[serde(default, rename = "isCapture", skip_serializing_if = "is_false")]
    pub is_capture: bool,
    #[serde(default, rename = "isCheck", skip_serializing_if = "is_false")]
    pub is_check: bool,
    #[serde(default, rename = "isMate", skip_serializing_if = "is_false")]
    pub is_mate: bool,
    #[serde(default, rename = "isEnPassant", skip_serializing_if = "is_false")]
    pub is_en_passant: bool,
    #[serde(default, rename = "isCastleKingside", skip_serializing_if = "is_false")]
    pub is_castle_kingside: bool,
    #[serde(default, rename = "isCastleQueenside", skip_serializing_if = "is_false")]
    pub is_castle_queenside: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
}

impl Move {
    pub fn new(from: Square, to: Square) -> Self {
        Self {
            from,
            to,
            ..Self::default()
        }
    }

    pub fn promotion(from: Square, to: Square, kind: PieceKind) -> Self {
        Self {
            kind: MoveKind::Promotion,
            promote_to: Some(kind),
            ..Self::new(from, to)
        }
    }

    pub fn is_promotion(&self) -> bool {
        self.promote_to.is_some()
    }

    pub fn is_capture(&self) -> bool {
        self.is_capture
            || matches!(self.kind, MoveKind::EnPassant | MoveKind::RemoteCapture)
            || self.flags.iter().any(|f| f == "capture")
    }

    /// UCI notation, with `@origin` appended for remote captures.
    pub fn uci(&self) -> String {
        let mut out = format!("{}{}", self.from, self.to);
        if let Some(kind) = self.promote_to {
            out.push(kind.letter());
        }
        if self.kind == MoveKind::RemoteCapture {
            if let Some(origin) = self.origin_sq {
                out.push('@');
                out.push_str(&origin.to_string());
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sq(name: &str) -> Square {
        name.parse().unwrap()
    }

    #[test]
    fn uci_appends_promotion_letter() {
        let mv = Move::promotion(sq("e7"), sq("e8"), PieceKind::Knight);
        assert_eq!(mv.uci(), "e7e8n");
    }

    #[test]
    fn uci_marks_remote_capture_origin() {
        let mv = Move {
            kind: MoveKind::RemoteCapture,
            origin_sq: Some(sq("d4")),
            ..Move::new(sq("d4"), sq("d8"))
        };
        assert_eq!(mv.uci(), "d4d8@d4");
        assert!(mv.is_capture());
    }

    #[test]
    fn decodes_engine_move_and_keeps_unknown_kinds() {
        let json = r#"{"from":12,"to":28,"kind":"teleport","flags":["double_push"],"promote_to":null}"#;
        let mv: Move = serde_json::from_str(json).unwrap();
        assert_eq!(mv.kind, MoveKind::Other("teleport".to_string()));
        assert_eq!(mv.uci(), "e2e4");
        assert!(!mv.is_promotion());
    }

    #[test]
    fn unknown_kinds_are_sent_back_unchanged() {
        let json = r#"{"from":12,"to":28,"kind":"teleport"}"#;
        let mv: Move = serde_json::from_str(json).unwrap();
        let value = serde_json::to_value(&mv).unwrap();
        assert_eq!(value["kind"], "teleport");

        let known: Move = serde_json::from_str(r#"{"from":12,"to":28,"kind":"en_passant"}"#).unwrap();
        assert_eq!(known.kind, MoveKind::EnPassant);
        assert_eq!(serde_json::to_value(&known).unwrap()["kind"], "en_passant");
    }

    #[test]
    fn serializes_without_empty_optionals() {
        let value = serde_json::to_value(Move::new(sq("g1"), sq("f3"))).unwrap();
        assert_eq!(value, serde_json::json!({"from": 6, "to": 21, "kind": "normal"}));
    }
}
