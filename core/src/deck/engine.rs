//! Deck engine
//!
//! Owns the deck composition, the pending draw, the hider's hand, the
//! discard pile, and the active curse/trap lists. All card state is
//! mutated exclusively through the operations here.
//!
//! Failed operations return a [`DeckError`] describing the validation
//! problem; the engine's state is untouched on any error path.

use chrono::{DateTime, Utc};
use quarry_types::GameSize;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use crate::catalog::cards;
use crate::catalog::{MOVE_RELOCATION_MINUTES, PowerupType};

use super::card::{CardInstance, CardInstanceId, CardKind};
use super::composition::{DeckComposition, DeckEntry};
use super::curse::ActiveCurse;
use super::error::DeckError;
use super::trap::ActiveTimeTrap;

/// Full serializable deck state, written after every successful mutation
/// and restored on rehydration. Carries the RNG so a restored process
/// does not replay past draws.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeckSnapshot {
    pub game_size: GameSize,
    pub composition: DeckComposition,
    pub hand: Vec<CardInstance>,
    pub pending_draw: Vec<CardInstance>,
    pub discard: Vec<CardInstance>,
    pub active_curses: Vec<ActiveCurse>,
    pub active_traps: Vec<ActiveTimeTrap>,
    pub hand_limit: usize,
    pub next_instance: u64,
    pub rng: Pcg32,
}

/// The card deck engine.
#[derive(Debug, Clone)]
pub struct DeckEngine {
    game_size: GameSize,
    composition: DeckComposition,
    hand: Vec<CardInstance>,
    pending_draw: Vec<CardInstance>,
    discard: Vec<CardInstance>,
    active_curses: Vec<ActiveCurse>,
    active_traps: Vec<ActiveTimeTrap>,
    hand_limit: usize,
    next_instance: u64,
    rng: Pcg32,
}

impl DeckEngine {
    /// Fresh engine with a full deck.
    pub fn new(game_size: GameSize, hand_limit: usize, seed: u64) -> Self {
        Self {
            game_size,
            composition: DeckComposition::full(),
            hand: Vec::new(),
            pending_draw: Vec::new(),
            discard: Vec::new(),
            active_curses: Vec::new(),
            active_traps: Vec::new(),
            hand_limit,
            next_instance: 0,
            rng: Pcg32::seed_from_u64(seed),
        }
    }

    pub fn snapshot(&self) -> DeckSnapshot {
        DeckSnapshot {
            game_size: self.game_size,
            composition: self.composition.clone(),
            hand: self.hand.clone(),
            pending_draw: self.pending_draw.clone(),
            discard: self.discard.clone(),
            active_curses: self.active_curses.clone(),
            active_traps: self.active_traps.clone(),
            hand_limit: self.hand_limit,
            next_instance: self.next_instance,
            rng: self.rng.clone(),
        }
    }

    pub fn from_snapshot(snapshot: DeckSnapshot) -> Self {
        Self {
            game_size: snapshot.game_size,
            composition: snapshot.composition,
            hand: snapshot.hand,
            pending_draw: snapshot.pending_draw,
            discard: snapshot.discard,
            active_curses: snapshot.active_curses,
            active_traps: snapshot.active_traps,
            hand_limit: snapshot.hand_limit,
            next_instance: snapshot.next_instance,
            rng: snapshot.rng,
        }
    }

    // ─── Queries ────────────────────────────────────────────────────────────

    pub fn game_size(&self) -> GameSize {
        self.game_size
    }

    pub fn hand(&self) -> &[CardInstance] {
        &self.hand
    }

    pub fn pending_draw(&self) -> &[CardInstance] {
        &self.pending_draw
    }

    pub fn discard_pile(&self) -> &[CardInstance] {
        &self.discard
    }

    pub fn active_curses(&self) -> &[ActiveCurse] {
        &self.active_curses
    }

    pub fn active_traps(&self) -> &[ActiveTimeTrap] {
        &self.active_traps
    }

    pub fn hand_limit(&self) -> usize {
        self.hand_limit
    }

    pub fn composition(&self) -> &DeckComposition {
        &self.composition
    }

    /// Any active curse currently forbidding questions?
    pub fn questions_blocked(&self) -> bool {
        self.active_curses.iter().any(|c| c.blocks_questions)
    }

    /// Any active curse currently forbidding transit?
    pub fn transit_blocked(&self) -> bool {
        self.active_curses.iter().any(|c| c.blocks_transit)
    }

    /// Size-specific minutes from time-bonus cards still in hand. Cards
    /// only count if held when the round ends.
    pub fn total_time_bonus(&self) -> u32 {
        self.hand
            .iter()
            .map(|card| match &card.kind {
                CardKind::TimeBonus { bonus_minutes, .. } => bonus_minutes.value(self.game_size),
                _ => 0,
            })
            .sum()
    }

    /// Bonus minutes banked from traps the seekers have sprung.
    pub fn triggered_trap_bonus(&self) -> u32 {
        self.active_traps
            .iter()
            .filter(|trap| trap.is_triggered)
            .map(|trap| trap.bonus_minutes)
            .sum()
    }

    // ─── Draw / keep / discard ──────────────────────────────────────────────

    /// Sample `n` cards without replacement from the remaining
    /// composition into the pending draw. Returns the cards drawn; an
    /// exhausted deck yields fewer (possibly zero) cards, never an error.
    pub fn draw_cards(&mut self, n: usize) -> Vec<CardInstance> {
        let drawn = self.sample(n);
        self.pending_draw.extend(drawn.iter().cloned());
        drawn
    }

    /// Resolve the pending draw: `keep` enters the hand, everything else
    /// goes to the discard pile. Unselected drawn cards never touch the
    /// hand.
    pub fn keep_drawn(&mut self, keep: &[CardInstanceId]) -> Result<(), DeckError> {
        for id in keep {
            if !self.pending_draw.iter().any(|card| card.id == *id) {
                return Err(DeckError::NotInPendingDraw);
            }
        }
        if self.hand.len() + keep.len() > self.hand_limit {
            return Err(DeckError::HandLimitReached {
                limit: self.hand_limit,
            });
        }

        for card in self.pending_draw.drain(..) {
            if keep.contains(&card.id) {
                self.hand.push(card);
            } else {
                self.discard.push(card);
            }
        }
        Ok(())
    }

    /// Direct insertion used by setup and testing tooling.
    pub fn add_card_to_hand(&mut self, kind: CardKind) -> Result<CardInstanceId, DeckError> {
        if self.hand.len() >= self.hand_limit {
            return Err(DeckError::HandLimitReached {
                limit: self.hand_limit,
            });
        }
        let id = self.next_id();
        self.hand.push(CardInstance { id, kind });
        Ok(id)
    }

    pub fn discard_card(&mut self, id: CardInstanceId) -> Result<(), DeckError> {
        let card = self.take_from_hand(id)?;
        self.discard.push(card);
        Ok(())
    }

    /// Monotonic hand-limit increase. Never decreases.
    pub fn expand_hand_limit(&mut self, by: usize) {
        self.hand_limit += by;
    }

    // ─── Powerups ───────────────────────────────────────────────────────────

    /// Draw 1 (0 if the deck is exhausted, not an error), raise the hand
    /// limit by 1, discard the powerup. Succeeds even with an empty deck.
    pub fn play_draw_expand(
        &mut self,
        id: CardInstanceId,
    ) -> Result<Vec<CardInstance>, DeckError> {
        self.expect_powerup(id, PowerupType::DrawExpand)?;

        let card = self.take_from_hand(id)?;
        self.discard.push(card);
        self.hand_limit += 1;

        let drawn = self.sample(1);
        self.hand.extend(drawn.iter().cloned());
        Ok(drawn)
    }

    /// Clone `target` with a fresh instance id; time bonuses double every
    /// per-size value and the clone is flagged as a duplicate. The
    /// Duplicate card itself is spent to the discard pile, so net hand
    /// size is unchanged.
    pub fn play_duplicate(
        &mut self,
        source: CardInstanceId,
        target: CardInstanceId,
    ) -> Result<CardInstance, DeckError> {
        if source == target {
            return Err(DeckError::DuplicateSelf);
        }
        self.expect_powerup(source, PowerupType::Duplicate)?;
        let target_kind = self
            .hand_card(target)
            .ok_or(DeckError::NotInHand)?
            .kind
            .clone();

        let cloned_kind = match target_kind {
            CardKind::TimeBonus {
                tier,
                bonus_minutes,
                ..
            } => CardKind::TimeBonus {
                tier,
                bonus_minutes: bonus_minutes.map(|m| m * 2),
                is_duplicate: true,
            },
            other => other,
        };

        let spent = self.take_from_hand(source)?;
        self.discard.push(spent);

        let clone = CardInstance {
            id: self.next_id(),
            kind: cloned_kind,
        };
        self.hand.push(clone.clone());
        Ok(clone)
    }

    /// Discard-draw powerups: spend the powerup plus exactly its required
    /// number of *other* hand cards, then draw `discards + 1` new cards,
    /// auto-kept up to the hand limit (overflow goes to discard).
    pub fn play_discard_draw(
        &mut self,
        id: CardInstanceId,
        discards: &[CardInstanceId],
    ) -> Result<Vec<CardInstance>, DeckError> {
        let card = self.hand_card(id).ok_or(DeckError::NotInHand)?;
        let needed = match &card.kind {
            CardKind::Powerup { powerup, .. } => powerup
                .discard_count()
                .ok_or(DeckError::WrongCardKind {
                    expected: "discard-draw",
                })?,
            _ => {
                return Err(DeckError::WrongCardKind {
                    expected: "discard-draw",
                });
            }
        };

        let available = self.hand.len() - 1;
        if available < needed {
            return Err(DeckError::InsufficientCards { needed, available });
        }
        if discards.len() != needed || discards.contains(&id) {
            return Err(DeckError::SelectionCount { needed });
        }
        for discard_id in discards {
            if self.hand_card(*discard_id).is_none() {
                return Err(DeckError::NotInHand);
            }
        }

        for discard_id in discards {
            let card = self.take_from_hand(*discard_id)?;
            self.discard.push(card);
        }
        let spent = self.take_from_hand(id)?;
        self.discard.push(spent);

        let drawn = self.sample(needed + 1);
        for card in &drawn {
            if self.hand.len() < self.hand_limit {
                self.hand.push(card.clone());
            } else {
                self.discard.push(card.clone());
            }
        }
        Ok(drawn)
    }

    /// Move: the hider abandons the spot. The entire hand (Move card
    /// included) is discarded; returns the size-specific minutes of the
    /// fresh hiding period the session should grant.
    pub fn play_move(&mut self, id: CardInstanceId) -> Result<u32, DeckError> {
        self.expect_powerup(id, PowerupType::Move)?;
        self.discard.extend(self.hand.drain(..));
        Ok(MOVE_RELOCATION_MINUTES.value(self.game_size))
    }

    /// Veto: spend the card to cancel the question just asked.
    pub fn play_veto(&mut self, id: CardInstanceId) -> Result<(), DeckError> {
        self.expect_powerup(id, PowerupType::Veto)?;
        let card = self.take_from_hand(id)?;
        self.discard.push(card);
        Ok(())
    }

    // ─── Curses ─────────────────────────────────────────────────────────────

    /// Play a curse from the hand. The card moves to the active list (not
    /// to discard), stamped with `activated_at = now`.
    pub fn play_curse(
        &mut self,
        id: CardInstanceId,
        now: DateTime<Utc>,
    ) -> Result<&ActiveCurse, DeckError> {
        match &self.hand_card(id).ok_or(DeckError::NotInHand)?.kind {
            CardKind::Curse { .. } => {}
            _ => return Err(DeckError::WrongCardKind { expected: "curse" }),
        }

        let card = self.take_from_hand(id)?;
        let CardKind::Curse {
            curse_id,
            blocks_questions,
            blocks_transit,
            duration_minutes,
            penalty_minutes,
            until_found,
            ..
        } = card.kind
        else {
            // Kind was checked above
            return Err(DeckError::WrongCardKind { expected: "curse" });
        };

        let name = cards::curse(&curse_id)
            .map(|def| def.name.to_string())
            .unwrap_or_else(|| curse_id.clone());

        self.active_curses.push(ActiveCurse {
            instance_id: card.id,
            curse_id,
            name,
            activated_at: now,
            blocks_questions,
            blocks_transit,
            duration_minutes,
            penalty_minutes,
            until_found,
        });
        // Just pushed, so last() is the new curse
        Ok(self.active_curses.last().expect("curse just pushed"))
    }

    /// Manually clear a curse after the seekers complete its task. Only
    /// valid for curses that are neither time-based nor until-found.
    pub fn clear_curse(&mut self, id: CardInstanceId) -> Result<ActiveCurse, DeckError> {
        let idx = self
            .active_curses
            .iter()
            .position(|c| c.instance_id == id)
            .ok_or(DeckError::CurseNotActive)?;
        if !self.active_curses[idx].is_manually_clearable() {
            return Err(DeckError::CurseNotClearable);
        }
        Ok(self.active_curses.remove(idx))
    }

    /// Polled auto-expiry sweep: remove and return every time-based curse
    /// whose duration has run out.
    pub fn expire_curses(&mut self, now: DateTime<Utc>) -> Vec<ActiveCurse> {
        let size = self.game_size;
        let mut expired = Vec::new();
        self.active_curses.retain(|curse| {
            if curse.has_expired(size, now) {
                expired.push(curse.clone());
                false
            } else {
                true
            }
        });
        expired
    }

    // ─── Time traps ─────────────────────────────────────────────────────────

    /// Arm a time trap at a station the hider names.
    pub fn play_time_trap(
        &mut self,
        id: CardInstanceId,
        station_name: &str,
    ) -> Result<&ActiveTimeTrap, DeckError> {
        match &self.hand_card(id).ok_or(DeckError::NotInHand)?.kind {
            CardKind::TimeTrap { .. } => {}
            _ => {
                return Err(DeckError::WrongCardKind {
                    expected: "time trap",
                });
            }
        }

        let card = self.take_from_hand(id)?;
        let CardKind::TimeTrap { bonus_minutes } = card.kind else {
            return Err(DeckError::WrongCardKind {
                expected: "time trap",
            });
        };

        self.active_traps.push(ActiveTimeTrap::new(
            card.id,
            station_name.to_string(),
            bonus_minutes,
        ));
        Ok(self.active_traps.last().expect("trap just pushed"))
    }

    /// A seeker stepped on the station. Flips `is_triggered` exactly
    /// once; a second trigger is rejected, never reapplied.
    pub fn trigger_time_trap(&mut self, id: CardInstanceId) -> Result<&ActiveTimeTrap, DeckError> {
        let trap = self
            .active_traps
            .iter_mut()
            .find(|t| t.instance_id == id)
            .ok_or(DeckError::TrapNotActive)?;
        if trap.is_triggered {
            return Err(DeckError::TrapAlreadyTriggered);
        }
        trap.is_triggered = true;
        Ok(trap)
    }

    // ─── Round lifecycle ────────────────────────────────────────────────────

    /// Round settlement: the hand and any unresolved draw go to discard,
    /// traps disarm, and every remaining curse clears. Returns the
    /// cleared curses so the caller can report them.
    pub fn end_round_cleanup(&mut self) -> Vec<ActiveCurse> {
        self.discard.extend(self.hand.drain(..));
        self.discard.extend(self.pending_draw.drain(..));
        self.active_traps.clear();
        std::mem::take(&mut self.active_curses)
    }

    // ─── Internals ──────────────────────────────────────────────────────────

    fn next_id(&mut self) -> CardInstanceId {
        self.next_instance += 1;
        CardInstanceId(self.next_instance)
    }

    /// Weighted sampling without replacement. Yields fewer than `n` cards
    /// when the composition runs dry.
    fn sample(&mut self, n: usize) -> Vec<CardInstance> {
        let mut drawn = Vec::with_capacity(n);
        for _ in 0..n {
            let total = self.composition.remaining_total();
            if total == 0 {
                break;
            }
            let idx = self.rng.random_range(0..total);
            let Some(entry) = self.composition.take_nth(idx) else {
                break;
            };
            let card = self.instantiate(entry);
            drawn.push(card);
        }
        drawn
    }

    fn instantiate(&mut self, entry: DeckEntry) -> CardInstance {
        let kind = match entry {
            DeckEntry::TimeBonus(tier) => CardKind::time_bonus(cards::time_bonus(tier)),
            DeckEntry::Powerup(kind) => CardKind::powerup(cards::powerup(kind)),
            DeckEntry::Curse(id) => {
                // Composition entries only ever come from the catalog
                let def = cards::curse(id).expect("composition curse exists in catalog");
                CardKind::curse(def)
            }
        };
        CardInstance {
            id: self.next_id(),
            kind,
        }
    }

    fn hand_card(&self, id: CardInstanceId) -> Option<&CardInstance> {
        self.hand.iter().find(|card| card.id == id)
    }

    fn take_from_hand(&mut self, id: CardInstanceId) -> Result<CardInstance, DeckError> {
        let idx = self
            .hand
            .iter()
            .position(|card| card.id == id)
            .ok_or(DeckError::NotInHand)?;
        Ok(self.hand.remove(idx))
    }

    fn expect_powerup(
        &self,
        id: CardInstanceId,
        kind: PowerupType,
    ) -> Result<(), DeckError> {
        let card = self.hand_card(id).ok_or(DeckError::NotInHand)?;
        if !card.is_powerup(kind) {
            return Err(DeckError::WrongCardKind {
                expected: kind.as_str(),
            });
        }
        Ok(())
    }
}
