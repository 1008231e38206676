//! Board vocabulary: squares, sides, piece kinds and piece records.
use std::fmt;
use std::ops::{Index, IndexMut};
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use strum::EnumIter;

use crate::error::IdError;

const FILES: &[u8; 8] = b"abcdefgh";

/// A board square indexed `rank * 8 + file`, so `a1 = 0` and `h8 = 63`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Square(u8);

impl Square {
    pub const COUNT: usize = 64;

    pub const fn new(index: u8) -> Option<Self> {
        if index < Self::COUNT as u8 {
            Some(Self(index))
        } else {
            None
        }
    }

    pub const fn from_coords(file: u8, rank: u8) -> Option<Self> {
        if file < 8 && rank < 8 {
            Some(Self(rank * 8 + file))
        } else {
            None
        }
    }

    pub const fn index(self) -> u8 {
        self.0
    }

    pub const fn file(self) -> u8 {
        self.0 % 8
    }

    pub const fn rank(self) -> u8 {
        self.0 / 8
    }

    /// All 64 squares in index order.
    pub fn all() -> impl Iterator<Item = Square> {
        (0..Self::COUNT as u8).map(Square)
    }
}

impl TryFrom<u8> for Square {
    type Error = IdError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value).ok_or(IdError::Square(value))
    }
}

impl From<Square> for u8 {
    fn from(square: Square) -> Self {
        square.0
    }
}

impl fmt::Display for Square {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", FILES[self.file() as usize] as char, self.rank() + 1)
    }
}

impl FromStr for Square {
    type Err = IdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lowered = s.trim().to_ascii_lowercase();
        let bytes = lowered.as_bytes();
        if bytes.len() != 2 {
            return Err(IdError::Algebraic(s.to_string()));
        }
        let file = FILES
            .iter()
            .position(|&f| f == bytes[0])
            .ok_or_else(|| IdError::Algebraic(s.to_string()))?;
        let rank = bytes[1]
            .checked_sub(b'1')
            .filter(|r| *r < 8)
            .ok_or_else(|| IdError::Algebraic(s.to_string()))?;
        Square::from_coords(file as u8, rank).ok_or_else(|| IdError::Algebraic(s.to_string()))
    }
}

#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    EnumIter,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
    Serialize,
    Deserialize,
)]
#[strum(ascii_case_insensitive)]
pub enum Side {
    #[serde(rename = "WHITE")]
    #[strum(serialize = "White")]
    White,
    #[serde(rename = "BLACK")]
    #[strum(serialize = "Black")]
    Black,
}

impl Side {
    pub const fn opponent(self) -> Self {
        match self {
            Side::White => Side::Black,
            Side::Black => Side::White,
        }
    }
}

/// One value per side, serialized as `{"WHITE": .., "BLACK": ..}`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SideMap<T> {
    #[serde(rename = "WHITE")]
    pub white: T,
    #[serde(rename = "BLACK")]
    pub black: T,
}

impl<T> SideMap<T> {
    pub const fn new(white: T, black: T) -> Self {
        Self { white, black }
    }

    pub fn iter(&self) -> impl Iterator<Item = (Side, &T)> {
        [(Side::White, &self.white), (Side::Black, &self.black)].into_iter()
    }
}

impl<T> Index<Side> for SideMap<T> {
    type Output = T;

    fn index(&self, side: Side) -> &T {
        match side {
            Side::White => &self.white,
            Side::Black => &self.black,
        }
    }
}

impl<T> IndexMut<Side> for SideMap<T> {
    fn index_mut(&mut self, side: Side) -> &mut T {
        match side {
            Side::White => &mut self.white,
            Side::Black => &mut self.black,
        }
    }
}

/// Display and parsing use the engine's capitalized names (`"Knight"`).
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    EnumIter,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
    Serialize,
    Deserialize,
)]
#[strum(ascii_case_insensitive)]
pub enum PieceKind {
    Pawn,
    Knight,
    Bishop,
    Rook,
    Queen,
    King,
}

impl PieceKind {
    /// Lowercase letter used in UCI promotion suffixes and FEN.
    pub const fn letter(self) -> char {
        match self {
            PieceKind::Pawn => 'p',
            PieceKind::Knight => 'n',
            PieceKind::Bishop => 'b',
            PieceKind::Rook => 'r',
            PieceKind::Queen => 'q',
            PieceKind::King => 'k',
        }
    }

    pub fn symbol(self, side: Side) -> char {
        match side {
            Side::White => self.letter().to_ascii_uppercase(),
            Side::Black => self.letter(),
        }
    }
}

/// Stable unique piece identifier assigned by the rules engine.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PieceId(pub u32);

impl fmt::Display for PieceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Free-form per-piece metadata (ability charges, markers) owned by the engine.
pub type PieceMeta = serde_json::Map<String, serde_json::Value>;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Piece {
    pub uid: PieceId,
    #[serde(rename = "color")]
    pub side: Side,
    #[serde(rename = "type")]
    pub kind: PieceKind,
    #[serde(rename = "pos")]
    pub square: Square,
    #[serde(default)]
    pub has_moved: bool,
    #[serde(default)]
    pub meta: PieceMeta,
}

impl Piece {
    pub fn new(uid: u32, side: Side, kind: PieceKind, square: Square) -> Self {
        Self {
            uid: PieceId(uid),
            side,
            kind,
            square,
            has_moved: false,
            meta: PieceMeta::new(),
        }
    }
}
