//! Static reference data
//!
//! Read-only tables describing the card deck and the seeker question
//! categories. The engines treat these as immutable lookups keyed by
//! id/tier/type; nothing here changes at runtime.

pub mod cards;
pub mod questions;

use quarry_types::SizeMap;

pub use cards::{
    CurseDefinition, PowerupDefinition, PowerupType, TimeBonusDefinition, TimeBonusTier,
};
pub use questions::QuestionCategory;

/// Length of the initial hiding period, by game size (minutes).
pub const HIDING_PERIOD_MINUTES: SizeMap<u32> = SizeMap::new(15, 30, 60);

/// Length of the fresh hiding period granted by the Move powerup, by game
/// size (minutes).
pub const MOVE_RELOCATION_MINUTES: SizeMap<u32> = SizeMap::new(10, 20, 60);
