//! Conversion errors for the closed identifier sets used on the wire.
//!
//! The rules engine speaks in raw integers and strings; every conversion into
//! a `game-core` type goes through `TryFrom`/`FromStr` and reports one of
//! these variants instead of silently accepting an out-of-range value.
use thiserror::Error;

#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum IdError {
    #[error("square index {0} is outside the 8x8 board")]
    Square(u8),

    #[error("invalid algebraic square {0:?}")]
    Algebraic(String),

    #[error("unknown element id {0}")]
    Element(u8),

    #[error("unknown item id {0}")]
    Item(u8),

    #[error("unknown ability id {0}")]
    Ability(u8),
}
