//! Game tracker service
//!
//! Owns the two engines, the timer bindings, the persistence gateway,
//! and the registered signal handlers. The UI issues commands here;
//! every successful mutation is followed by a persistence write, and
//! anything cross-cutting goes out as a [`GameSignal`].
//!
//! # Phase → timer wiring
//!
//! Phase transitions start and stop the relevant timers through one
//! explicit handler (`on_phase_changed`) instead of scattered watchers.
//! A `rehydrating` guard suppresses that handler while persisted state is
//! being restored so the generic "phase just became active → start a
//! fresh timer" logic cannot stomp a restored elapsed value.

mod error;

#[cfg(test)]
mod tracker_tests;

pub use error::TrackerError;

use chrono::{DateTime, Duration, Utc};
use quarry_types::TrackerConfig;
use serde::{Deserialize, Serialize};

use crate::catalog::questions;
use crate::catalog::{HIDING_PERIOD_MINUTES, MOVE_RELOCATION_MINUTES, QuestionCategory};
use crate::deck::{
    CardInstance, CardInstanceId, CardKind, ClearReason, DeckEngine, DeckError, DeckSnapshot,
};
use crate::session::{PlayerId, SessionPhase, SessionSnapshot, SessionStateMachine};
use crate::signals::{GameSignal, SignalHandler, TimerRole};
use crate::storage::{PersistenceGateway, keys, load_json, save_json};
use crate::timers::{PersistentTimer, Rehydration, TimerBinding, TimerEvent};

const HIDING_PHASES: &[SessionPhase] = &[SessionPhase::HidingPeriod];
const STOPWATCH_PHASES: &[SessionPhase] = &[
    SessionPhase::Seeking,
    SessionPhase::EndGame,
    SessionPhase::RoundComplete,
];
const QUESTION_PHASES: &[SessionPhase] = &[SessionPhase::Seeking, SessionPhase::EndGame];

/// The question currently awaiting an answer, persisted so the response
/// countdown can resume after a restart.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct ActiveQuestion {
    category_id: String,
}

/// The companion tracker. One instance per game session, constructed
/// once and handed to the UI by reference; there is no global state.
pub struct GameTracker {
    config: TrackerConfig,
    seed: u64,
    session: SessionStateMachine,
    deck: DeckEngine,
    hiding_timer: TimerBinding,
    hide_stopwatch: TimerBinding,
    question_timer: TimerBinding,
    active_question: Option<ActiveQuestion>,
    gateway: Box<dyn PersistenceGateway>,
    handlers: Vec<Box<dyn SignalHandler>>,
    rehydrating: bool,
}

impl GameTracker {
    /// Build the tracker, restoring any persisted session, deck, and
    /// timer state. Restoration is all-or-nothing per record; anything
    /// missing, stale, or corrupt falls back to a fresh start.
    pub fn new(
        config: TrackerConfig,
        seed: u64,
        gateway: Box<dyn PersistenceGateway>,
        now: DateTime<Utc>,
    ) -> Self {
        let session = load_json::<SessionSnapshot>(gateway.as_ref(), keys::SESSION)
            .map(SessionStateMachine::from_snapshot)
            .unwrap_or_default();
        let deck = load_json::<DeckSnapshot>(gateway.as_ref(), keys::DECK)
            .map(DeckEngine::from_snapshot)
            .unwrap_or_else(|| {
                DeckEngine::new(config.game_size, config.starting_hand_limit, seed)
            });
        let active_question = load_json::<ActiveQuestion>(gateway.as_ref(), keys::QUESTION);

        let warning = Duration::seconds(i64::from(config.timer_warning_secs));
        let hiding_duration =
            Duration::minutes(i64::from(HIDING_PERIOD_MINUTES.value(config.game_size)));

        let mut tracker = Self {
            config,
            seed,
            session,
            deck,
            hiding_timer: TimerBinding::new(
                keys::TIMER_HIDING_PERIOD,
                HIDING_PHASES,
                PersistentTimer::countdown(hiding_duration).with_warning(warning),
            ),
            hide_stopwatch: TimerBinding::new(
                keys::TIMER_HIDE_STOPWATCH,
                STOPWATCH_PHASES,
                PersistentTimer::count_up(),
            ),
            question_timer: TimerBinding::new(
                keys::TIMER_QUESTION,
                QUESTION_PHASES,
                PersistentTimer::countdown(Duration::minutes(5)).with_warning(warning),
            ),
            active_question,
            gateway,
            handlers: Vec::new(),
            rehydrating: false,
        };
        tracker.rehydrate(now);
        tracker
    }

    /// Register a signal consumer (notification relay, UI, ...).
    pub fn register_handler(&mut self, handler: Box<dyn SignalHandler>) {
        self.handlers.push(handler);
    }

    // ─── Queries ────────────────────────────────────────────────────────────

    pub fn config(&self) -> &TrackerConfig {
        &self.config
    }

    pub fn session(&self) -> &SessionStateMachine {
        &self.session
    }

    pub fn deck(&self) -> &DeckEngine {
        &self.deck
    }

    pub fn phase(&self) -> SessionPhase {
        self.session.phase()
    }

    pub fn hiding_timer(&self) -> &TimerBinding {
        &self.hiding_timer
    }

    pub fn hide_stopwatch(&self) -> &TimerBinding {
        &self.hide_stopwatch
    }

    pub fn question_timer(&self) -> &TimerBinding {
        &self.question_timer
    }

    pub fn active_question(&self) -> Option<&str> {
        self.active_question.as_ref().map(|q| q.category_id.as_str())
    }

    pub fn gateway(&self) -> &dyn PersistenceGateway {
        self.gateway.as_ref()
    }

    /// Hand the gateway back (a restart in tests).
    pub fn into_gateway(self) -> Box<dyn PersistenceGateway> {
        self.gateway
    }

    // ─── Session commands ───────────────────────────────────────────────────

    pub fn add_player(&mut self, name: &str) -> Option<PlayerId> {
        let id = self.session.add_player(name)?;
        self.persist_session();
        Some(id)
    }

    pub fn start_round(&mut self, hider: PlayerId, now: DateTime<Utc>) -> bool {
        self.transition(now, |m| m.start_round(hider))
    }

    pub fn start_seeking(&mut self, now: DateTime<Utc>) -> bool {
        self.transition(now, |m| m.start_seeking())
    }

    pub fn enter_hiding_zone(&mut self, now: DateTime<Utc>) -> bool {
        self.transition(now, |m| m.enter_hiding_zone())
    }

    pub fn hider_found(&mut self, now: DateTime<Utc>) -> bool {
        self.transition(now, |m| m.hider_found())
    }

    /// Settle the round: the hider banks stopwatch time plus held
    /// time-bonus minutes plus sprung trap minutes; the hand, curses, and
    /// traps clear. Returns the credited milliseconds.
    pub fn end_round(&mut self, now: DateTime<Utc>) -> Option<u64> {
        if self.session.phase() != SessionPhase::RoundComplete {
            return None;
        }
        let stopwatch_ms = self.hide_stopwatch.timer.elapsed_ms(now);
        let bonus_minutes =
            u64::from(self.deck.total_time_bonus() + self.deck.triggered_trap_bonus());
        let hiding_ms = stopwatch_ms + bonus_minutes * 60_000;

        let cleared = self.deck.end_round_cleanup();
        self.persist_deck();
        self.transition(now, |m| m.end_round(hiding_ms));
        for curse in cleared {
            self.emit(GameSignal::CurseCleared {
                curse_id: curse.curse_id,
                name: curse.name,
                reason: ClearReason::RoundEnd,
                timestamp: now,
            });
        }
        Some(hiding_ms)
    }

    pub fn pause_game(&mut self, now: DateTime<Utc>) -> bool {
        if !self.session.pause_game() {
            return false;
        }
        self.hiding_timer.timer.pause(now);
        self.hide_stopwatch.timer.pause(now);
        self.question_timer.timer.pause(now);
        self.save_timers(now);
        self.persist_session();
        self.emit(GameSignal::GamePaused { timestamp: now });
        true
    }

    pub fn resume_game(&mut self, now: DateTime<Utc>) -> bool {
        if !self.session.resume_game() {
            return false;
        }
        self.hiding_timer.timer.resume(now);
        self.hide_stopwatch.timer.resume(now);
        self.question_timer.timer.resume(now);
        self.save_timers(now);
        self.persist_session();
        self.emit(GameSignal::GameResumed { timestamp: now });
        true
    }

    /// Explicit "return to setup": wipe the session, rebuild the deck,
    /// and drop every persisted record.
    pub fn return_to_setup(&mut self, now: DateTime<Utc>) {
        let old = self.session.phase();
        self.session.reset();
        self.seed = self.seed.wrapping_add(1);
        self.deck = DeckEngine::new(
            self.config.game_size,
            self.config.starting_hand_limit,
            self.seed,
        );
        self.hiding_timer.timer.reset();
        self.hide_stopwatch.timer.reset();
        self.question_timer.timer.reset();
        self.active_question = None;
        for key in keys::ALL {
            self.gateway.remove(key);
        }
        if old != SessionPhase::Setup {
            self.emit(GameSignal::PhaseChanged {
                old_phase: old,
                new_phase: SessionPhase::Setup,
                round: 0,
                timestamp: now,
            });
        }
    }

    // ─── Deck commands ──────────────────────────────────────────────────────

    pub fn draw_cards(&mut self, n: usize) -> Vec<CardInstance> {
        let drawn = self.deck.draw_cards(n);
        if !drawn.is_empty() {
            self.persist_deck();
        }
        drawn
    }

    pub fn keep_drawn(&mut self, keep: &[CardInstanceId]) -> Result<(), DeckError> {
        self.deck.keep_drawn(keep)?;
        self.persist_deck();
        Ok(())
    }

    pub fn add_card_to_hand(&mut self, kind: CardKind) -> Result<CardInstanceId, DeckError> {
        let id = self.deck.add_card_to_hand(kind)?;
        self.persist_deck();
        Ok(id)
    }

    pub fn discard_card(&mut self, id: CardInstanceId) -> Result<(), DeckError> {
        self.deck.discard_card(id)?;
        self.persist_deck();
        Ok(())
    }

    pub fn expand_hand_limit(&mut self, by: usize) {
        self.deck.expand_hand_limit(by);
        self.persist_deck();
    }

    pub fn play_draw_expand(
        &mut self,
        id: CardInstanceId,
    ) -> Result<Vec<CardInstance>, DeckError> {
        let drawn = self.deck.play_draw_expand(id)?;
        self.persist_deck();
        Ok(drawn)
    }

    pub fn play_duplicate(
        &mut self,
        source: CardInstanceId,
        target: CardInstanceId,
    ) -> Result<CardInstance, DeckError> {
        let clone = self.deck.play_duplicate(source, target)?;
        self.persist_deck();
        Ok(clone)
    }

    pub fn play_discard_draw(
        &mut self,
        id: CardInstanceId,
        discards: &[CardInstanceId],
    ) -> Result<Vec<CardInstance>, DeckError> {
        let drawn = self.deck.play_discard_draw(id, discards)?;
        self.persist_deck();
        Ok(drawn)
    }

    /// Move: discard the hand, then ask the session for a fresh hiding
    /// period (the one direct cross-engine call). Returns the size of the
    /// new window in minutes.
    pub fn play_move(&mut self, id: CardInstanceId, now: DateTime<Utc>) -> Result<u32, DeckError> {
        let minutes = self.deck.play_move(id)?;
        self.persist_deck();
        self.transition(now, |m| m.grant_hiding_period());
        Ok(minutes)
    }

    pub fn play_veto(&mut self, id: CardInstanceId, now: DateTime<Utc>) -> Result<(), DeckError> {
        self.deck.play_veto(id)?;
        self.persist_deck();
        if self.active_question.is_some() {
            self.clear_question();
        }
        self.emit(GameSignal::QuestionVetoed { timestamp: now });
        Ok(())
    }

    pub fn play_curse(&mut self, id: CardInstanceId, now: DateTime<Utc>) -> Result<(), DeckError> {
        self.deck.play_curse(id, now)?;
        self.persist_deck();
        Ok(())
    }

    pub fn clear_curse(&mut self, id: CardInstanceId, now: DateTime<Utc>) -> Result<(), DeckError> {
        let curse = self.deck.clear_curse(id)?;
        self.persist_deck();
        self.emit(GameSignal::CurseCleared {
            curse_id: curse.curse_id,
            name: curse.name,
            reason: ClearReason::Manual,
            timestamp: now,
        });
        Ok(())
    }

    pub fn play_time_trap(
        &mut self,
        id: CardInstanceId,
        station_name: &str,
    ) -> Result<(), DeckError> {
        self.deck.play_time_trap(id, station_name)?;
        self.persist_deck();
        Ok(())
    }

    pub fn trigger_time_trap(
        &mut self,
        id: CardInstanceId,
        now: DateTime<Utc>,
    ) -> Result<u32, DeckError> {
        let (station_name, bonus_minutes) = {
            let trap = self.deck.trigger_time_trap(id)?;
            (trap.station_name.clone(), trap.bonus_minutes)
        };
        self.persist_deck();
        self.emit(GameSignal::TrapTriggered {
            station_name,
            bonus_minutes,
            timestamp: now,
        });
        Ok(bonus_minutes)
    }

    // ─── Question flow ──────────────────────────────────────────────────────

    /// Seekers ask a question: starts the response countdown sized to the
    /// category and game size.
    pub fn ask_question(
        &mut self,
        category_id: &str,
        now: DateTime<Utc>,
    ) -> Result<&'static QuestionCategory, TrackerError> {
        if !matches!(
            self.session.phase(),
            SessionPhase::Seeking | SessionPhase::EndGame
        ) {
            return Err(TrackerError::NotSeeking);
        }
        if self.active_question.is_some() {
            return Err(TrackerError::QuestionPending);
        }
        if self.deck.questions_blocked() {
            return Err(TrackerError::QuestionsBlocked);
        }
        let category = questions::question(category_id)
            .ok_or_else(|| TrackerError::UnknownQuestion(category_id.to_string()))?;

        let response = Duration::minutes(i64::from(
            category.response_time_minutes.value(self.config.game_size),
        ));
        self.question_timer.timer.set_duration(response);
        self.question_timer.timer.start(now);
        self.active_question = Some(ActiveQuestion {
            category_id: category.id.to_string(),
        });
        self.persist_question();
        self.question_timer.save(self.gateway.as_mut(), now);
        Ok(category)
    }

    /// The hider answered in time: stop the countdown and open the
    /// category's draw as a pending draw (keep/discard follows).
    pub fn answer_question(
        &mut self,
        now: DateTime<Utc>,
    ) -> Result<Vec<CardInstance>, TrackerError> {
        let category_id = self
            .active_question
            .as_ref()
            .map(|q| q.category_id.clone())
            .ok_or(TrackerError::NoQuestionPending)?;
        let category = questions::question(&category_id)
            .ok_or_else(|| TrackerError::UnknownQuestion(category_id.clone()))?;

        self.question_timer.timer.stop(now);
        self.clear_question();
        let drawn = self.deck.draw_cards(category.draw_count);
        self.persist_deck();
        Ok(drawn)
    }

    // ─── Driving ────────────────────────────────────────────────────────────

    /// Advance the clocks. The host calls this on its own schedule (once
    /// a second is plenty); elapsed time never depends on how often it
    /// actually fires.
    pub fn tick(&mut self, now: DateTime<Utc>) {
        if !self.session.is_paused() {
            if let Some(event) = self.hiding_timer.timer.tick(now) {
                match event {
                    TimerEvent::Warning { remaining } => self.emit(GameSignal::TimerWarning {
                        role: TimerRole::HidingPeriod,
                        remaining_secs: remaining.num_seconds().max(0) as u64,
                        timestamp: now,
                    }),
                    TimerEvent::Completed => {
                        self.emit(GameSignal::HidingPeriodEnded { timestamp: now });
                    }
                }
            }
            if let Some(event) = self.question_timer.timer.tick(now) {
                match event {
                    TimerEvent::Warning { remaining } => self.emit(GameSignal::TimerWarning {
                        role: TimerRole::Question,
                        remaining_secs: remaining.num_seconds().max(0) as u64,
                        timestamp: now,
                    }),
                    TimerEvent::Completed => {
                        self.clear_question();
                        self.emit(GameSignal::QuestionTimeExpired { timestamp: now });
                    }
                }
            }
            self.save_timers(now);
        }

        // Curse expiry is anchored to activation wall-clock stamps, so it
        // runs even while the session is paused
        let expired = self.deck.expire_curses(now);
        if !expired.is_empty() {
            self.persist_deck();
            for curse in expired {
                self.emit(GameSignal::CurseCleared {
                    curse_id: curse.curse_id,
                    name: curse.name,
                    reason: ClearReason::Expired,
                    timestamp: now,
                });
            }
        }
    }

    /// The host is backgrounding or foregrounding. Re-base every timer on
    /// the wall clock (tick counts are worthless across backgrounding)
    /// and force an immediate persist so a killed process loses at most
    /// the last sub-tick of precision.
    pub fn handle_visibility_change(
        &mut self,
        is_returning_to_foreground: bool,
        now: DateTime<Utc>,
    ) {
        tracing::debug!(
            foreground = is_returning_to_foreground,
            "visibility change, re-anchoring timers"
        );
        self.hiding_timer.timer.reanchor(now);
        self.hide_stopwatch.timer.reanchor(now);
        self.question_timer.timer.reanchor(now);
        self.save_timers(now);
    }

    // ─── Internals ──────────────────────────────────────────────────────────

    fn emit(&mut self, signal: GameSignal) {
        for handler in &mut self.handlers {
            handler.handle_signal(&signal);
        }
    }

    /// Run a guarded session command; on success persist, re-wire timers,
    /// and announce the phase change.
    fn transition(
        &mut self,
        now: DateTime<Utc>,
        command: impl FnOnce(&mut SessionStateMachine) -> bool,
    ) -> bool {
        let old = self.session.phase();
        if !command(&mut self.session) {
            return false;
        }
        self.persist_session();
        let new = self.session.phase();
        if old != new {
            self.on_phase_changed(old, new, now);
        }
        self.emit(GameSignal::PhaseChanged {
            old_phase: old,
            new_phase: new,
            round: self.session.round_number(),
            timestamp: now,
        });
        true
    }

    /// The one place phases drive timers.
    fn on_phase_changed(&mut self, old: SessionPhase, new: SessionPhase, now: DateTime<Utc>) {
        if self.rehydrating {
            return;
        }
        tracing::debug!(from = old.as_str(), to = new.as_str(), "phase changed");

        match new {
            SessionPhase::HidingPeriod => {
                // A fresh round gets the full period; a Move relocation
                // mid-round gets the shorter window
                let minutes = if matches!(old, SessionPhase::Seeking | SessionPhase::EndGame) {
                    MOVE_RELOCATION_MINUTES.value(self.config.game_size)
                } else {
                    HIDING_PERIOD_MINUTES.value(self.config.game_size)
                };
                self.hiding_timer
                    .timer
                    .set_duration(Duration::minutes(i64::from(minutes)));
                self.hiding_timer.timer.start(now);
                if old == SessionPhase::Setup {
                    self.hide_stopwatch.timer.reset();
                    self.hide_stopwatch.clear(self.gateway.as_mut());
                    self.clear_question();
                }
            }
            SessionPhase::Seeking => {
                if old == SessionPhase::HidingPeriod {
                    self.hiding_timer.timer.stop(now);
                    self.hiding_timer.clear(self.gateway.as_mut());
                }
                if !self.hide_stopwatch.timer.is_running() {
                    self.hide_stopwatch.timer.start(now);
                }
            }
            SessionPhase::EndGame => {}
            SessionPhase::RoundComplete => {
                // Final value stays readable until the round is settled
                self.hide_stopwatch.timer.stop(now);
                self.hiding_timer.timer.reset();
                self.hiding_timer.clear(self.gateway.as_mut());
                self.clear_question();
            }
            SessionPhase::Setup | SessionPhase::GameOver => {
                self.hiding_timer.timer.reset();
                self.hide_stopwatch.timer.reset();
                self.hiding_timer.clear(self.gateway.as_mut());
                self.hide_stopwatch.clear(self.gateway.as_mut());
                self.clear_question();
            }
        }
        self.save_timers(now);
    }

    /// Restore timers from storage, guarded against the phase wiring.
    fn rehydrate(&mut self, now: DateTime<Utc>) {
        self.rehydrating = true;
        let phase = self.session.phase();

        let hiding = self
            .hiding_timer
            .rehydrate(self.gateway.as_mut(), phase, now);
        let stopwatch = self
            .hide_stopwatch
            .rehydrate(self.gateway.as_mut(), phase, now);

        if self.active_question.is_some() {
            let question = self
                .question_timer
                .rehydrate(self.gateway.as_mut(), phase, now);
            if question == Rehydration::Fresh {
                // The question died while we were away; no retroactive
                // expiry is fired
                self.active_question = None;
                self.gateway.remove(keys::QUESTION);
            }
        } else {
            self.question_timer.clear(self.gateway.as_mut());
        }

        // Phase-driven timers with no usable record start over
        match phase {
            SessionPhase::HidingPeriod if hiding == Rehydration::Fresh => {
                let minutes = HIDING_PERIOD_MINUTES.value(self.config.game_size);
                self.hiding_timer
                    .timer
                    .set_duration(Duration::minutes(i64::from(minutes)));
                self.hiding_timer.timer.start(now);
            }
            SessionPhase::Seeking | SessionPhase::EndGame if stopwatch == Rehydration::Fresh => {
                self.hide_stopwatch.timer.start(now);
            }
            _ => {}
        }

        if self.session.is_paused() {
            self.hiding_timer.timer.pause(now);
            self.hide_stopwatch.timer.pause(now);
            self.question_timer.timer.pause(now);
        }

        self.save_timers(now);
        self.rehydrating = false;
    }

    fn clear_question(&mut self) {
        self.question_timer.timer.reset();
        self.question_timer.clear(self.gateway.as_mut());
        self.active_question = None;
        self.gateway.remove(keys::QUESTION);
    }

    fn persist_session(&mut self) {
        save_json(self.gateway.as_mut(), keys::SESSION, &self.session.snapshot());
    }

    fn persist_deck(&mut self) {
        save_json(self.gateway.as_mut(), keys::DECK, &self.deck.snapshot());
    }

    fn persist_question(&mut self) {
        match &self.active_question {
            Some(question) => save_json(self.gateway.as_mut(), keys::QUESTION, question),
            None => self.gateway.remove(keys::QUESTION),
        }
    }

    fn save_timers(&mut self, now: DateTime<Utc>) {
        self.hiding_timer.save(self.gateway.as_mut(), now);
        self.hide_stopwatch.save(self.gateway.as_mut(), now);
        if self.active_question.is_some() {
            self.question_timer.save(self.gateway.as_mut(), now);
        }
    }
}
