//! Card instances (runtime state)
//!
//! A `CardInstance` is one physical card in play. Multiple instances of
//! the same definition can coexist (e.g. after Duplicate), so every
//! instance carries a globally unique id distinct from its definition.
//! Instances denormalize their definition's data at creation time; the
//! only in-place mutations anywhere are the doubled-value copy Duplicate
//! creates and the triggered flag on an armed trap.

use std::fmt;

use quarry_types::SizeMap;
use serde::{Deserialize, Serialize};

use crate::catalog::cards::{self, CurseDefinition, PowerupDefinition, TimeBonusDefinition};
use crate::catalog::{PowerupType, TimeBonusTier};

/// Globally unique card instance id, allocated by the engine.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct CardInstanceId(pub u64);

impl fmt::Display for CardInstanceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// The four card families, as tagged variants so every operation that
/// branches on type matches exhaustively.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum CardKind {
    TimeBonus {
        tier: TimeBonusTier,
        bonus_minutes: SizeMap<u32>,
        #[serde(default)]
        is_duplicate: bool,
    },
    Powerup {
        powerup: PowerupType,
        effect: String,
    },
    Curse {
        curse_id: String,
        effect: String,
        casting_cost: String,
        blocks_questions: bool,
        blocks_transit: bool,
        duration_minutes: Option<SizeMap<u32>>,
        penalty_minutes: Option<SizeMap<u32>>,
        until_found: bool,
    },
    TimeTrap {
        bonus_minutes: u32,
    },
}

impl CardKind {
    pub fn time_bonus(def: &TimeBonusDefinition) -> Self {
        CardKind::TimeBonus {
            tier: def.tier,
            bonus_minutes: def.bonus_minutes,
            is_duplicate: false,
        }
    }

    pub fn powerup(def: &PowerupDefinition) -> Self {
        CardKind::Powerup {
            powerup: def.powerup,
            effect: def.effect.to_string(),
        }
    }

    pub fn curse(def: &CurseDefinition) -> Self {
        CardKind::Curse {
            curse_id: def.id.to_string(),
            effect: def.effect.to_string(),
            casting_cost: def.casting_cost.to_string(),
            blocks_questions: def.blocks_questions,
            blocks_transit: def.blocks_transit,
            duration_minutes: def.duration_minutes,
            penalty_minutes: def.penalty_minutes,
            until_found: def.until_found,
        }
    }

    pub fn time_trap(bonus_minutes: u32) -> Self {
        CardKind::TimeTrap { bonus_minutes }
    }
}

/// One card in play.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CardInstance {
    pub id: CardInstanceId,
    pub kind: CardKind,
}

impl CardInstance {
    /// Display name for the UI.
    pub fn name(&self) -> String {
        match &self.kind {
            CardKind::TimeBonus {
                tier, is_duplicate, ..
            } => {
                let base = cards::time_bonus(*tier).name;
                if *is_duplicate {
                    format!("{base} (copy)")
                } else {
                    base.to_string()
                }
            }
            CardKind::Powerup { powerup, .. } => powerup.as_str().to_string(),
            CardKind::Curse { curse_id, .. } => cards::curse(curse_id)
                .map(|def| def.name.to_string())
                .unwrap_or_else(|| format!("Curse ({curse_id})")),
            CardKind::TimeTrap { .. } => "Time Trap".to_string(),
        }
    }

    pub fn is_powerup(&self, kind: PowerupType) -> bool {
        matches!(&self.kind, CardKind::Powerup { powerup, .. } if *powerup == kind)
    }
}
