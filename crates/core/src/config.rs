//! Engine configuration.
//!
//! Every value has a default matching the shipped game; `from_env` lets a
//! runner override them without a config file.

use crate::types::{
    DEFAULT_BOARD_WIDTH, DEFAULT_CELL_SIZE, DEFAULT_MAX_BOARD_HEIGHT, MAX_BOARD_HEIGHT,
    MAX_BOARD_WIDTH, MAX_SPAWN_ATTEMPTS, RANDOM_LEVEL_ATTEMPTS, RANDOM_LEVEL_GROUPS,
    TUTORIAL_BOARD_WIDTH,
};

/// How the board width of a regular level is chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WidthPolicy {
    /// Always this many columns.
    Fixed(u8),
    /// As many columns as the level's largest group has items.
    LargestGroup,
}

impl WidthPolicy {
    /// Parse `"largest"` or a positive column count.
    pub fn from_str(s: &str) -> Option<Self> {
        let s = s.trim();
        if s.eq_ignore_ascii_case("largest") {
            return Some(WidthPolicy::LargestGroup);
        }
        match s.parse::<u8>() {
            Ok(n) if n > 0 => Some(WidthPolicy::Fixed(n.min(MAX_BOARD_WIDTH))),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct EngineConfig {
    pub width_policy: WidthPolicy,
    pub tutorial_width: u8,
    /// Row cap; board height = min(required groups, max_height)
    pub max_height: u8,
    pub max_spawn_attempts: u32,
    pub random_level_groups: usize,
    pub random_level_attempts: u32,
    pub cell_size: f32,
    pub seed: u32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            width_policy: WidthPolicy::Fixed(DEFAULT_BOARD_WIDTH),
            tutorial_width: TUTORIAL_BOARD_WIDTH,
            max_height: DEFAULT_MAX_BOARD_HEIGHT,
            max_spawn_attempts: MAX_SPAWN_ATTEMPTS,
            random_level_groups: RANDOM_LEVEL_GROUPS,
            random_level_attempts: RANDOM_LEVEL_ATTEMPTS,
            cell_size: DEFAULT_CELL_SIZE,
            seed: 1,
        }
    }
}

impl EngineConfig {
    /// Create from environment variables; unset or unparsable values keep defaults.
    ///
    /// - `ROWMATCH_WIDTH`: column count or `largest`
    /// - `ROWMATCH_MAX_HEIGHT`: row cap, clamped to `1..=MAX_BOARD_HEIGHT`
    /// - `ROWMATCH_SPAWN_ATTEMPTS`: spawn-queue regeneration bound (at least 1)
    /// - `ROWMATCH_SEED`: RNG seed
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`from_env`](Self::from_env) with an injectable variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();

        let width_policy = lookup("ROWMATCH_WIDTH")
            .and_then(|s| WidthPolicy::from_str(&s))
            .unwrap_or(defaults.width_policy);

        let max_height = lookup("ROWMATCH_MAX_HEIGHT")
            .and_then(|s| s.trim().parse::<u8>().ok())
            .map(|h| h.clamp(1, MAX_BOARD_HEIGHT as u8))
            .unwrap_or(defaults.max_height);

        let max_spawn_attempts = lookup("ROWMATCH_SPAWN_ATTEMPTS")
            .and_then(|s| s.trim().parse::<u32>().ok())
            .map(|n| n.max(1))
            .unwrap_or(defaults.max_spawn_attempts);

        let seed = lookup("ROWMATCH_SEED")
            .and_then(|s| s.trim().parse::<u32>().ok())
            .unwrap_or(defaults.seed);

        Self {
            width_policy,
            max_height,
            max_spawn_attempts,
            seed,
            ..defaults
        }
    }
}
