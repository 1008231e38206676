//! Wire and domain types shared by every layer of the arcane board client.
//!
//! `game-core` mirrors the data the external rules engine speaks: snapshots,
//! legal moves, diffs, pending decisions and loadouts. It performs no I/O and
//! never decides legality; those answers only ever come from the engine.
pub mod board;
pub mod decision;
pub mod diff;
pub mod error;
pub mod loadout;
pub mod moves;
pub mod outcome;
pub mod snapshot;

pub use board::{Piece, PieceId, PieceKind, PieceMeta, Side, SideMap, Square};
pub use decision::{DecisionKind, DecisionOption, PendingDecision, SKIP_OPTION};
pub use diff::{MetaChange, MovedPiece, PieceRef, SnapshotDiff};
pub use error::IdError;
pub use loadout::{
    AbilityCategory, AbilityDef, AbilityId, AbilitySlot, Definitions, ElementDef, ElementId,
    ItemDef, ItemId, LoadoutConfig,
};
pub use moves::{Move, MoveKind};
pub use outcome::{ActionResult, Effect, Notation, ResultMeta, TopupKind, UndoneMove};
pub use snapshot::{GraveEntry, ResourceState, Snapshot};
