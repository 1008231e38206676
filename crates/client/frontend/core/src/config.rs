//! Frontend configuration structures and loaders.
//!
//! Settings here are shared by every frontend implementation; terminal-only
//! knobs live in the CLI crate.

use std::env;
use std::time::Duration;

use crate::sprite::SpriteQuality;

/// Frontend-specific configuration.
#[derive(Clone, Debug, Default)]
pub struct FrontendConfig {
    pub animation: AnimationConfig,
    pub sprites: SpriteQuality,
    pub messages: MessageConfig,
    pub decisions: DecisionConfig,
    pub loadout: LoadoutRules,
}

impl FrontendConfig {
    /// Construct configuration from process environment variables.
    ///
    /// Environment variables:
    /// - `ARCANE_MOVE_MS` - Move tween duration (default: 220)
    /// - `ARCANE_REMOVE_MS` - Removal fade duration (default: 180)
    /// - `ARCANE_ADD_MS` - Appearance fade duration (default: 220)
    /// - `ARCANE_MAX_TWEENS` - Concurrent tween cap (default: 64)
    /// - `ARCANE_SPRITE_QUALITY` - `low` or `high` (default: high)
    /// - `ARCANE_NOTICE_MS` - Transient notice lifetime (default: 4000)
    /// - `ARCANE_MESSAGE_CAPACITY` - Message log capacity (default: 64)
    /// - `ARCANE_MAX_DECISION_CHAIN` - Chained decisions before auto-cancel (default: 16)
    /// - `ARCANE_ITEM_COST_CAP` - Advisory item cost cap (default: 4)
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Some(ms) = read_env::<u64>("ARCANE_MOVE_MS") {
            config.animation.move_duration = Duration::from_millis(ms);
        }
        if let Some(ms) = read_env::<u64>("ARCANE_REMOVE_MS") {
            config.animation.remove_duration = Duration::from_millis(ms);
        }
        if let Some(ms) = read_env::<u64>("ARCANE_ADD_MS") {
            config.animation.add_duration = Duration::from_millis(ms);
        }
        if let Some(cap) = read_env::<usize>("ARCANE_MAX_TWEENS") {
            config.animation.max_tweens = cap.max(1);
        }
        if let Some(quality) = read_env::<SpriteQuality>("ARCANE_SPRITE_QUALITY") {
            config.sprites = quality;
        }
        if let Some(ms) = read_env::<u64>("ARCANE_NOTICE_MS") {
            config.messages.notice_ttl = Duration::from_millis(ms);
        }
        if let Some(capacity) = read_env::<usize>("ARCANE_MESSAGE_CAPACITY") {
            config.messages.capacity = capacity.max(1);
        }
        if let Some(depth) = read_env::<usize>("ARCANE_MAX_DECISION_CHAIN") {
            config.decisions.max_chain = depth.max(1);
        }
        if let Some(cap) = read_env::<u8>("ARCANE_ITEM_COST_CAP") {
            config.loadout.item_cost_cap = cap;
        }

        config
    }
}

#[derive(Clone, Debug)]
pub struct AnimationConfig {
    pub move_duration: Duration,
    pub remove_duration: Duration,
    pub add_duration: Duration,
    /// Once this many tweens are live, the oldest is finished before another starts.
    pub max_tweens: usize,
}

impl Default for AnimationConfig {
    fn default() -> Self {
        Self {
            move_duration: Duration::from_millis(220),
            remove_duration: Duration::from_millis(180),
            add_duration: Duration::from_millis(220),
            max_tweens: 64,
        }
    }
}

#[derive(Clone, Debug)]
pub struct MessageConfig {
    pub capacity: usize,
    pub notice_ttl: Duration,
}

impl Default for MessageConfig {
    fn default() -> Self {
        Self {
            capacity: 64,
            notice_ttl: Duration::from_millis(4000),
        }
    }
}

#[derive(Clone, Debug)]
pub struct DecisionConfig {
    pub max_chain: usize,
}

impl Default for DecisionConfig {
    fn default() -> Self {
        Self { max_chain: 16 }
    }
}

#[derive(Clone, Debug)]
pub struct LoadoutRules {
    /// Advisory only: exceeding it produces a warning, never a block.
    pub item_cost_cap: u8,
}

impl Default for LoadoutRules {
    fn default() -> Self {
        Self { item_cost_cap: 4 }
    }
}

fn read_env<T>(key: &str) -> Option<T>
where
    T: std::str::FromStr,
{
    env::var(key).ok()?.trim().parse().ok()
}
