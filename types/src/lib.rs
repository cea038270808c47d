//! Shared configuration types for Quarry
//!
//! This crate contains serializable types that are shared between the
//! game engine (quarry-core) and the UI shell that embeds it.

use serde::{Deserialize, Serialize};

// ─────────────────────────────────────────────────────────────────────────────
// Game Size
// ─────────────────────────────────────────────────────────────────────────────

/// Size of the play area. Scales hiding periods, card values, curse
/// durations, and question response times.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum GameSize {
    /// A neighborhood or campus
    Small,
    /// A town or a city district
    #[default]
    Medium,
    /// A whole city or transit region
    Large,
}

impl GameSize {
    pub fn as_str(&self) -> &'static str {
        match self {
            GameSize::Small => "Small",
            GameSize::Medium => "Medium",
            GameSize::Large => "Large",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "small" | "s" => Some(GameSize::Small),
            "medium" | "med" | "m" => Some(GameSize::Medium),
            "large" | "l" => Some(GameSize::Large),
            _ => None,
        }
    }
}

/// A per-game-size value (minutes, counts, etc.).
///
/// Catalog definitions carry one value per [`GameSize`]; lookups are total,
/// so adding a size is a compile-time-checked change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SizeMap<T> {
    pub small: T,
    pub medium: T,
    pub large: T,
}

impl<T> SizeMap<T> {
    pub const fn new(small: T, medium: T, large: T) -> Self {
        Self {
            small,
            medium,
            large,
        }
    }

    pub fn get(&self, size: GameSize) -> &T {
        match size {
            GameSize::Small => &self.small,
            GameSize::Medium => &self.medium,
            GameSize::Large => &self.large,
        }
    }
}

impl<T: Copy> SizeMap<T> {
    pub fn value(&self, size: GameSize) -> T {
        *self.get(size)
    }

    /// Apply `f` to every size's value.
    pub fn map(&self, f: impl Fn(T) -> T) -> Self {
        Self {
            small: f(self.small),
            medium: f(self.medium),
            large: f(self.large),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Notifications
// ─────────────────────────────────────────────────────────────────────────────

/// Severity for toast notifications surfaced by the UI shell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Severity {
    #[default]
    Info,
    Success,
    Warning,
    Error,
}

// ─────────────────────────────────────────────────────────────────────────────
// Tracker Configuration
// ─────────────────────────────────────────────────────────────────────────────

/// Engine configuration, persisted as the host's config file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrackerConfig {
    /// Play-area size for this game
    pub game_size: GameSize,

    /// Seconds of remaining countdown at which a one-shot warning fires
    pub timer_warning_secs: u32,

    /// How often the host is expected to poll `tick()` (milliseconds).
    /// Informational for the UI; the engine itself is wall-clock anchored.
    pub tick_interval_ms: u64,

    /// Starting hand limit for the hider
    pub starting_hand_limit: usize,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            game_size: GameSize::default(),
            timer_warning_secs: 60,
            tick_interval_ms: 1000,
            starting_hand_limit: 6,
        }
    }
}
