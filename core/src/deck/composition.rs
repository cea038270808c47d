//! Remaining deck composition
//!
//! Tracks how many copies of each time-bonus tier, powerup type, and
//! curse remain. Counts only ever decrease, and only through `take_nth`,
//! so they can never underflow; an exhausted category simply stops
//! contributing to the weighted total.

use hashbrown::HashMap;
use serde::{Deserialize, Serialize};

use crate::catalog::cards::{CURSES, POWERUPS, TIME_BONUSES};
use crate::catalog::{PowerupType, TimeBonusTier};

/// One drawable slot in the composition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeckEntry {
    TimeBonus(TimeBonusTier),
    Powerup(PowerupType),
    Curse(&'static str),
}

/// Remaining counts per category.
///
/// Iteration for weighted sampling follows catalog order, so sampling is
/// deterministic for a given RNG state regardless of map internals.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeckComposition {
    time_bonuses: HashMap<TimeBonusTier, u32>,
    powerups: HashMap<PowerupType, u32>,
    curses: HashMap<String, u32>,
}

impl DeckComposition {
    /// A full deck per the catalog counts.
    pub fn full() -> Self {
        Self {
            time_bonuses: TIME_BONUSES
                .iter()
                .map(|def| (def.tier, def.deck_count))
                .collect(),
            powerups: POWERUPS
                .iter()
                .map(|def| (def.powerup, def.deck_count))
                .collect(),
            curses: CURSES
                .iter()
                .map(|def| (def.id.to_string(), def.deck_count))
                .collect(),
        }
    }

    /// An empty deck (useful for exhaustion tests).
    pub fn empty() -> Self {
        Self {
            time_bonuses: HashMap::new(),
            powerups: HashMap::new(),
            curses: HashMap::new(),
        }
    }

    pub fn time_bonus_count(&self, tier: TimeBonusTier) -> u32 {
        self.time_bonuses.get(&tier).copied().unwrap_or(0)
    }

    pub fn powerup_count(&self, kind: PowerupType) -> u32 {
        self.powerups.get(&kind).copied().unwrap_or(0)
    }

    pub fn curse_count(&self, id: &str) -> u32 {
        self.curses.get(id).copied().unwrap_or(0)
    }

    /// Total cards remaining across every category.
    pub fn remaining_total(&self) -> u32 {
        let bonuses: u32 = TIME_BONUSES
            .iter()
            .map(|def| self.time_bonus_count(def.tier))
            .sum();
        let powerups: u32 = POWERUPS
            .iter()
            .map(|def| self.powerup_count(def.powerup))
            .sum();
        let curses: u32 = CURSES.iter().map(|def| self.curse_count(def.id)).sum();
        bonuses + powerups + curses
    }

    /// Remove and return the `idx`-th remaining card, counting through the
    /// catalog in order. `idx` must be below `remaining_total()`.
    pub fn take_nth(&mut self, idx: u32) -> Option<DeckEntry> {
        let mut cursor = idx;

        for def in TIME_BONUSES {
            let count = self.time_bonus_count(def.tier);
            if cursor < count {
                self.time_bonuses.insert(def.tier, count - 1);
                return Some(DeckEntry::TimeBonus(def.tier));
            }
            cursor -= count;
        }

        for def in POWERUPS {
            let count = self.powerup_count(def.powerup);
            if cursor < count {
                self.powerups.insert(def.powerup, count - 1);
                return Some(DeckEntry::Powerup(def.powerup));
            }
            cursor -= count;
        }

        for def in CURSES {
            let count = self.curse_count(def.id);
            if cursor < count {
                self.curses.insert(def.id.to_string(), count - 1);
                return Some(DeckEntry::Curse(def.id));
            }
            cursor -= count;
        }

        None
    }
}

impl Default for DeckComposition {
    fn default() -> Self {
        Self::full()
    }
}
