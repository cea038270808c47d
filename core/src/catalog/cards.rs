//! Card definitions
//!
//! The deck is built from these tables: time-bonus tiers, one-shot
//! powerups, and sticky curses. Each definition carries its starting deck
//! count; the engine's `DeckComposition` tracks what remains.

use phf::phf_map;
use quarry_types::SizeMap;
use serde::{Deserialize, Serialize};

// ─────────────────────────────────────────────────────────────────────────────
// Time Bonuses
// ─────────────────────────────────────────────────────────────────────────────

/// Value tier of a time-bonus card.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TimeBonusTier {
    Minor,
    Standard,
    Major,
    Jackpot,
}

impl TimeBonusTier {
    pub fn as_str(&self) -> &'static str {
        match self {
            TimeBonusTier::Minor => "Minor",
            TimeBonusTier::Standard => "Standard",
            TimeBonusTier::Major => "Major",
            TimeBonusTier::Jackpot => "Jackpot",
        }
    }
}

/// Static definition of a time-bonus tier.
#[derive(Debug, Clone, Copy)]
pub struct TimeBonusDefinition {
    pub tier: TimeBonusTier,
    pub name: &'static str,
    /// Minutes added to the hider's time if the card is still held at
    /// round end
    pub bonus_minutes: SizeMap<u32>,
    /// Copies in a fresh deck
    pub deck_count: u32,
}

pub static TIME_BONUSES: &[TimeBonusDefinition] = &[
    TimeBonusDefinition {
        tier: TimeBonusTier::Minor,
        name: "Small Time Bonus",
        bonus_minutes: SizeMap::new(2, 3, 5),
        deck_count: 10,
    },
    TimeBonusDefinition {
        tier: TimeBonusTier::Standard,
        name: "Time Bonus",
        bonus_minutes: SizeMap::new(4, 6, 10),
        deck_count: 8,
    },
    TimeBonusDefinition {
        tier: TimeBonusTier::Major,
        name: "Big Time Bonus",
        bonus_minutes: SizeMap::new(6, 10, 15),
        deck_count: 4,
    },
    TimeBonusDefinition {
        tier: TimeBonusTier::Jackpot,
        name: "Huge Time Bonus",
        bonus_minutes: SizeMap::new(10, 15, 30),
        deck_count: 2,
    },
];

/// Look up a tier's definition.
pub fn time_bonus(tier: TimeBonusTier) -> &'static TimeBonusDefinition {
    match tier {
        TimeBonusTier::Minor => &TIME_BONUSES[0],
        TimeBonusTier::Standard => &TIME_BONUSES[1],
        TimeBonusTier::Major => &TIME_BONUSES[2],
        TimeBonusTier::Jackpot => &TIME_BONUSES[3],
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Powerups
// ─────────────────────────────────────────────────────────────────────────────

/// One-shot powerup cards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PowerupType {
    /// Cancel the question just asked
    Veto,
    /// Clone another card in hand
    Duplicate,
    /// Abandon the spot and re-hide with a fresh hiding period
    Move,
    /// Discard 1 other card, draw 2
    Discard1Draw2,
    /// Discard 2 other cards, draw 3
    Discard2Draw3,
    /// Draw 1 card and raise the hand limit by 1
    DrawExpand,
}

impl PowerupType {
    pub fn as_str(&self) -> &'static str {
        match self {
            PowerupType::Veto => "Veto",
            PowerupType::Duplicate => "Duplicate",
            PowerupType::Move => "Move",
            PowerupType::Discard1Draw2 => "Discard 1, Draw 2",
            PowerupType::Discard2Draw3 => "Discard 2, Draw 3",
            PowerupType::DrawExpand => "Draw 1, Expand",
        }
    }

    /// How many other hand cards a discard-draw variant requires.
    /// None for powerups without a discard step.
    pub fn discard_count(&self) -> Option<usize> {
        match self {
            PowerupType::Discard1Draw2 => Some(1),
            PowerupType::Discard2Draw3 => Some(2),
            _ => None,
        }
    }
}

/// Static definition of a powerup.
#[derive(Debug, Clone, Copy)]
pub struct PowerupDefinition {
    pub powerup: PowerupType,
    pub effect: &'static str,
    pub deck_count: u32,
}

pub static POWERUPS: &[PowerupDefinition] = &[
    PowerupDefinition {
        powerup: PowerupType::Veto,
        effect: "Cancel the question the seekers just asked. They may not re-ask it.",
        deck_count: 3,
    },
    PowerupDefinition {
        powerup: PowerupType::Duplicate,
        effect: "Copy another card in your hand. Time bonuses are copied at double value.",
        deck_count: 2,
    },
    PowerupDefinition {
        powerup: PowerupType::Move,
        effect: "Discard your hand and move to a new hiding spot with a fresh hiding period.",
        deck_count: 2,
    },
    PowerupDefinition {
        powerup: PowerupType::Discard1Draw2,
        effect: "Discard 1 other card from your hand, then draw 2.",
        deck_count: 3,
    },
    PowerupDefinition {
        powerup: PowerupType::Discard2Draw3,
        effect: "Discard 2 other cards from your hand, then draw 3.",
        deck_count: 2,
    },
    PowerupDefinition {
        powerup: PowerupType::DrawExpand,
        effect: "Draw 1 card and raise your hand limit by 1 for the rest of the game.",
        deck_count: 2,
    },
];

/// Look up a powerup's definition.
pub fn powerup(kind: PowerupType) -> &'static PowerupDefinition {
    match kind {
        PowerupType::Veto => &POWERUPS[0],
        PowerupType::Duplicate => &POWERUPS[1],
        PowerupType::Move => &POWERUPS[2],
        PowerupType::Discard1Draw2 => &POWERUPS[3],
        PowerupType::Discard2Draw3 => &POWERUPS[4],
        PowerupType::DrawExpand => &POWERUPS[5],
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Curses
// ─────────────────────────────────────────────────────────────────────────────

/// Static definition of a curse card.
///
/// A curse either runs on a timer (`duration_minutes`), sticks until the
/// hider is found (`until_found`), or stays until the seekers clear it by
/// performing its task (neither set).
#[derive(Debug, Clone, Copy)]
pub struct CurseDefinition {
    pub id: &'static str,
    pub name: &'static str,
    pub effect: &'static str,
    /// What the hider pays to cast it (flavor text enforced socially, not
    /// by the engine)
    pub casting_cost: &'static str,
    pub blocks_questions: bool,
    pub blocks_transit: bool,
    pub duration_minutes: Option<SizeMap<u32>>,
    /// Extra minutes awarded to the hider if the seekers fail the task
    pub penalty_minutes: Option<SizeMap<u32>>,
    pub until_found: bool,
    pub deck_count: u32,
}

pub static CURSES: &[CurseDefinition] = &[
    CurseDefinition {
        id: "frozen-foot",
        name: "Curse of the Frozen Foot",
        effect: "Seekers may not board any transit until the curse expires.",
        casting_cost: "Discard another card from your hand.",
        blocks_questions: false,
        blocks_transit: true,
        duration_minutes: Some(SizeMap::new(10, 20, 30)),
        penalty_minutes: None,
        until_found: false,
        deck_count: 2,
    },
    CurseDefinition {
        id: "silent-map",
        name: "Curse of the Silent Map",
        effect: "Seekers may not ask questions until the curse expires.",
        casting_cost: "Discard another card from your hand.",
        blocks_questions: true,
        blocks_transit: false,
        duration_minutes: Some(SizeMap::new(20, 30, 45)),
        penalty_minutes: None,
        until_found: false,
        deck_count: 2,
    },
    CurseDefinition {
        id: "leaden-pack",
        name: "Curse of the Leaden Pack",
        effect: "One seeker must carry the heaviest object the group can find until you are found.",
        casting_cost: "Reveal a time-bonus card from your hand.",
        blocks_questions: false,
        blocks_transit: false,
        duration_minutes: None,
        penalty_minutes: None,
        until_found: true,
        deck_count: 1,
    },
    CurseDefinition {
        id: "crooked-compass",
        name: "Curse of the Crooked Compass",
        effect: "Seekers must walk their next leg in the cardinal direction you name. Cleared once they arrive.",
        casting_cost: "Name the direction before playing.",
        blocks_questions: false,
        blocks_transit: false,
        duration_minutes: None,
        penalty_minutes: Some(SizeMap::new(5, 10, 20)),
        until_found: false,
        deck_count: 2,
    },
    CurseDefinition {
        id: "mirrored-lens",
        name: "Curse of the Mirrored Lens",
        effect: "Seekers must photograph three reflections before asking anything else.",
        casting_cost: "Discard another card from your hand.",
        blocks_questions: true,
        blocks_transit: false,
        duration_minutes: None,
        penalty_minutes: Some(SizeMap::new(5, 10, 15)),
        until_found: false,
        deck_count: 1,
    },
    CurseDefinition {
        id: "endless-stair",
        name: "Curse of the Endless Stair",
        effect: "Seekers must climb every staircase they pass while the curse holds.",
        casting_cost: "Do ten squats at your hiding spot.",
        blocks_questions: false,
        blocks_transit: false,
        duration_minutes: Some(SizeMap::new(15, 20, 40)),
        penalty_minutes: None,
        until_found: false,
        deck_count: 2,
    },
    CurseDefinition {
        id: "borrowed-boots",
        name: "Curse of the Borrowed Boots",
        effect: "Two seekers must swap one shoe each until you are found.",
        casting_cost: "Stand on one leg while the seekers answer your next question.",
        blocks_questions: false,
        blocks_transit: false,
        duration_minutes: None,
        penalty_minutes: None,
        until_found: true,
        deck_count: 1,
    },
    CurseDefinition {
        id: "murmuring-crowd",
        name: "Curse of the Murmuring Crowd",
        effect: "Seekers must get a stranger to wave at them. Cleared on the wave.",
        casting_cost: "Discard another card from your hand.",
        blocks_questions: false,
        blocks_transit: true,
        duration_minutes: None,
        penalty_minutes: Some(SizeMap::new(5, 10, 15)),
        until_found: false,
        deck_count: 1,
    },
];

/// Curse id → index into [`CURSES`].
static CURSE_INDEX: phf::Map<&'static str, usize> = phf_map! {
    "frozen-foot" => 0,
    "silent-map" => 1,
    "leaden-pack" => 2,
    "crooked-compass" => 3,
    "mirrored-lens" => 4,
    "endless-stair" => 5,
    "borrowed-boots" => 6,
    "murmuring-crowd" => 7,
};

/// Look up a curse definition by id.
pub fn curse(id: &str) -> Option<&'static CurseDefinition> {
    CURSE_INDEX.get(id).map(|&idx| &CURSES[idx])
}
