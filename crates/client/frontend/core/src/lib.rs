//! Framework-agnostic core of the arcane board client.
//!
//! Everything a frontend needs short of pixels and input devices: the
//! isometric projection, procedural sprites, the tween scheduler, the
//! snapshot store, the diff-driven renderer, the loadout solver and the
//! decision orchestrator that serializes actions against the engine.
pub mod animation;
pub mod config;
pub mod frontend;
pub mod geometry;
pub mod loadout;
pub mod message;
pub mod orchestrator;
pub mod render;
pub mod sprite;
pub mod store;
pub mod view_model;

pub use animation::{AnimationEngine, Easing, Tween};
pub use config::{AnimationConfig, DecisionConfig, FrontendConfig, LoadoutRules, MessageConfig};
pub use frontend::Frontend;
pub use geometry::{IsoProjection, Point};
pub use loadout::{Control, LoadoutDraft, LoadoutError};
pub use message::{MessageEntry, MessageLevel, MessageLog, Notice, NoticeBoard};
pub use orchestrator::{
    Action, DecisionOrchestrator, OrchestratorState, RedoTarget, SubmitError, TopupOffer,
    VariantPicker,
};
pub use render::{DrawOverlays, FrameReport, Rect, Renderer, Surface, TileHighlight};
pub use sprite::{Rgba, Sprite, SpriteCache, SpriteKey, SpriteQuality};
pub use store::{EffectEntry, HistoryEntry, SnapshotStore};
pub use view_model::HudFrame;
