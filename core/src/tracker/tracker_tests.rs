//! Tests for the game tracker service
//!
//! End-to-end command flows: round lifecycle, persistence after every
//! mutation, restart rehydration, and signal dispatch.

use std::cell::RefCell;
use std::rc::Rc;

use chrono::{DateTime, Duration, TimeZone, Utc};
use quarry_types::{GameSize, TrackerConfig};

use crate::catalog::cards;
use crate::catalog::PowerupType;
use crate::deck::{CardKind, ClearReason};
use crate::session::SessionPhase;
use crate::signals::{GameSignal, SignalHandler, TimerRole};
use crate::storage::{MemoryGateway, keys};

use super::{GameTracker, TrackerError};

fn t0() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap()
}

fn secs(s: i64) -> Duration {
    Duration::seconds(s)
}

fn config() -> TrackerConfig {
    TrackerConfig {
        game_size: GameSize::Small,
        ..TrackerConfig::default()
    }
}

fn tracker() -> GameTracker {
    GameTracker::new(config(), 7, Box::new(MemoryGateway::new()), t0())
}

/// Signal sink shared with the tracker.
#[derive(Clone, Default)]
struct Recorder {
    signals: Rc<RefCell<Vec<GameSignal>>>,
}

impl SignalHandler for Recorder {
    fn handle_signal(&mut self, signal: &GameSignal) {
        self.signals.borrow_mut().push(signal.clone());
    }
}

fn tracker_with_recorder() -> (GameTracker, Rc<RefCell<Vec<GameSignal>>>) {
    let mut tracker = tracker();
    let recorder = Recorder::default();
    let signals = recorder.signals.clone();
    tracker.register_handler(Box::new(recorder));
    (tracker, signals)
}

// ─── Round lifecycle ─────────────────────────────────────────────────────────

#[test]
fn alice_hides_for_an_hour() {
    let mut tracker = tracker();
    let alice = tracker.add_player("Alice").unwrap();
    tracker.add_player("Bob").unwrap();

    assert!(tracker.start_round(alice, t0()));
    assert!(tracker.start_seeking(t0()));
    assert!(tracker.enter_hiding_zone(t0() + secs(1800)));
    assert!(tracker.hider_found(t0() + secs(3600)));

    let credited = tracker.end_round(t0() + secs(3605));

    assert_eq!(credited, Some(3_600_000));
    let session = tracker.session();
    assert_eq!(
        session.player(alice).unwrap().total_hiding_time_ms,
        3_600_000
    );
    assert!(!session.all_players_have_been_hider(), "Bob has not hidden");
    assert_eq!(session.phase(), SessionPhase::Setup);
}

#[test]
fn settlement_adds_held_bonuses_and_sprung_traps() {
    let mut tracker = tracker();
    let alice = tracker.add_player("Alice").unwrap();
    tracker.add_player("Bob").unwrap();
    tracker.start_round(alice, t0());
    tracker.start_seeking(t0());

    // Held time bonus: 2 minutes small
    tracker
        .add_card_to_hand(CardKind::time_bonus(cards::time_bonus(
            crate::catalog::TimeBonusTier::Minor,
        )))
        .unwrap();
    // Armed and sprung trap: 5 minutes
    let trap = tracker.add_card_to_hand(CardKind::time_trap(5)).unwrap();
    tracker.play_time_trap(trap, "Harbor Station").unwrap();
    tracker.trigger_time_trap(trap, t0() + secs(600)).unwrap();

    tracker.hider_found(t0() + secs(3600));
    let credited = tracker.end_round(t0() + secs(3601));

    assert_eq!(credited, Some(3_600_000 + 7 * 60_000));
    assert!(tracker.deck().hand().is_empty(), "hand resets for next round");
    assert!(tracker.deck().active_traps().is_empty());
}

#[test]
fn phase_changes_are_announced() {
    let (mut tracker, signals) = tracker_with_recorder();
    let alice = tracker.add_player("Alice").unwrap();

    tracker.start_round(alice, t0());
    tracker.start_seeking(t0() + secs(10));

    let signals = signals.borrow();
    assert!(signals.iter().any(|s| matches!(
        s,
        GameSignal::PhaseChanged {
            old_phase: SessionPhase::Setup,
            new_phase: SessionPhase::HidingPeriod,
            round: 1,
            ..
        }
    )));
    assert!(signals.iter().any(|s| matches!(
        s,
        GameSignal::PhaseChanged {
            old_phase: SessionPhase::HidingPeriod,
            new_phase: SessionPhase::Seeking,
            ..
        }
    )));
}

// ─── Timers through the tracker ──────────────────────────────────────────────

#[test]
fn hiding_countdown_warns_then_ends() {
    let (mut tracker, signals) = tracker_with_recorder();
    let alice = tracker.add_player("Alice").unwrap();
    tracker.start_round(alice, t0());

    // Small game: 15-minute hiding period, warning at 60s remaining
    tracker.tick(t0() + secs(14 * 60 + 10));
    assert!(signals.borrow().iter().any(|s| matches!(
        s,
        GameSignal::TimerWarning {
            role: TimerRole::HidingPeriod,
            remaining_secs: 50,
            ..
        }
    )));

    tracker.tick(t0() + secs(15 * 60 + 1));
    assert!(
        signals
            .borrow()
            .iter()
            .any(|s| matches!(s, GameSignal::HidingPeriodEnded { .. }))
    );

    // No duplicate on the next poll
    let count_before = signals.borrow().len();
    tracker.tick(t0() + secs(15 * 60 + 2));
    assert_eq!(signals.borrow().len(), count_before);
}

#[test]
fn pause_freezes_the_countdown() {
    let (mut tracker, signals) = tracker_with_recorder();
    let alice = tracker.add_player("Alice").unwrap();
    tracker.start_round(alice, t0());

    assert!(tracker.pause_game(t0() + secs(10)));
    tracker.tick(t0() + secs(100));
    assert_eq!(
        tracker.hiding_timer().timer.elapsed(t0() + secs(100)),
        secs(10),
        "paused clocks do not accrue"
    );

    assert!(tracker.resume_game(t0() + secs(100)));
    assert_eq!(
        tracker.hiding_timer().timer.elapsed(t0() + secs(160)),
        secs(70)
    );

    let signals = signals.borrow();
    assert!(signals.iter().any(|s| matches!(s, GameSignal::GamePaused { .. })));
    assert!(signals.iter().any(|s| matches!(s, GameSignal::GameResumed { .. })));
}

#[test]
fn move_powerup_grants_a_relocation_window() {
    let (mut tracker, signals) = tracker_with_recorder();
    let alice = tracker.add_player("Alice").unwrap();
    tracker.start_round(alice, t0());
    tracker.start_seeking(t0());

    let id = tracker
        .add_card_to_hand(CardKind::powerup(cards::powerup(PowerupType::Move)))
        .unwrap();
    let minutes = tracker.play_move(id, t0() + secs(300)).unwrap();

    assert_eq!(minutes, 10, "small game relocation");
    assert_eq!(tracker.phase(), SessionPhase::HidingPeriod);
    assert!(tracker.deck().hand().is_empty());
    assert_eq!(
        tracker.hiding_timer().timer.remaining(t0() + secs(300)),
        Some(Duration::minutes(10))
    );
    assert!(signals.borrow().iter().any(|s| matches!(
        s,
        GameSignal::PhaseChanged {
            old_phase: SessionPhase::Seeking,
            new_phase: SessionPhase::HidingPeriod,
            ..
        }
    )));
}

// ─── Questions ───────────────────────────────────────────────────────────────

#[test]
fn question_flow_draws_by_category() {
    let mut tracker = tracker();
    let alice = tracker.add_player("Alice").unwrap();
    tracker.start_round(alice, t0());
    tracker.start_seeking(t0());

    let category = tracker.ask_question("radar", t0()).unwrap();
    assert_eq!((category.draw_count, category.keep_count), (2, 1));
    assert_eq!(tracker.active_question(), Some("radar"));
    assert_eq!(
        tracker.question_timer().timer.remaining(t0()),
        Some(Duration::minutes(5))
    );

    let drawn = tracker.answer_question(t0() + secs(120)).unwrap();
    assert_eq!(drawn.len(), 2);
    assert_eq!(tracker.active_question(), None);

    tracker.keep_drawn(&[drawn[0].id]).unwrap();
    assert_eq!(tracker.deck().hand().len(), 1);
    assert_eq!(tracker.deck().discard_pile().len(), 1);
}

#[test]
fn question_guards() {
    let mut tracker = tracker();
    let alice = tracker.add_player("Alice").unwrap();

    assert_eq!(
        tracker.ask_question("radar", t0()),
        Err(TrackerError::NotSeeking)
    );

    tracker.start_round(alice, t0());
    tracker.start_seeking(t0());

    assert_eq!(
        tracker.ask_question("seance", t0()),
        Err(TrackerError::UnknownQuestion("seance".to_string()))
    );

    tracker.ask_question("photo", t0()).unwrap();
    assert_eq!(
        tracker.ask_question("radar", t0()),
        Err(TrackerError::QuestionPending)
    );
    assert_eq!(
        tracker.answer_question(t0()).map(|d| d.len()),
        Ok(1),
        "photo draws one"
    );
    assert_eq!(
        tracker.answer_question(t0()),
        Err(TrackerError::NoQuestionPending)
    );
}

#[test]
fn curse_blocks_questions_until_it_expires() {
    let mut tracker = tracker();
    let alice = tracker.add_player("Alice").unwrap();
    tracker.start_round(alice, t0());
    tracker.start_seeking(t0());

    let curse = tracker
        .add_card_to_hand(CardKind::curse(cards::curse("silent-map").unwrap()))
        .unwrap();
    tracker.play_curse(curse, t0()).unwrap();

    assert_eq!(
        tracker.ask_question("radar", t0() + secs(60)),
        Err(TrackerError::QuestionsBlocked)
    );

    // silent-map runs 20 minutes in a small game
    tracker.tick(t0() + Duration::minutes(20));
    assert!(tracker.ask_question("radar", t0() + Duration::minutes(21)).is_ok());
}

#[test]
fn unanswered_question_expires_with_a_signal() {
    let (mut tracker, signals) = tracker_with_recorder();
    let alice = tracker.add_player("Alice").unwrap();
    tracker.start_round(alice, t0());
    tracker.start_seeking(t0());
    tracker.ask_question("radar", t0()).unwrap();

    tracker.tick(t0() + Duration::minutes(6));

    assert!(
        signals
            .borrow()
            .iter()
            .any(|s| matches!(s, GameSignal::QuestionTimeExpired { .. }))
    );
    assert_eq!(tracker.active_question(), None);
}

#[test]
fn veto_cancels_the_pending_question() {
    let (mut tracker, signals) = tracker_with_recorder();
    let alice = tracker.add_player("Alice").unwrap();
    tracker.start_round(alice, t0());
    tracker.start_seeking(t0());
    tracker.ask_question("matching", t0()).unwrap();

    let veto = tracker
        .add_card_to_hand(CardKind::powerup(cards::powerup(PowerupType::Veto)))
        .unwrap();
    tracker.play_veto(veto, t0() + secs(30)).unwrap();

    assert_eq!(tracker.active_question(), None);
    assert!(
        signals
            .borrow()
            .iter()
            .any(|s| matches!(s, GameSignal::QuestionVetoed { .. }))
    );
}

// ─── Curses and traps ────────────────────────────────────────────────────────

#[test]
fn timed_curse_clears_within_a_poll_with_expired_reason() {
    let (mut tracker, signals) = tracker_with_recorder();
    let curse = tracker
        .add_card_to_hand(CardKind::curse(cards::curse("silent-map").unwrap()))
        .unwrap();

    // Activated 19:59 ago (20-minute duration, small game)
    let activated = t0() - (Duration::minutes(20) - secs(1));
    tracker.play_curse(curse, activated).unwrap();

    tracker.tick(t0());
    assert!(
        !signals
            .borrow()
            .iter()
            .any(|s| matches!(s, GameSignal::CurseCleared { .. }))
    );

    tracker.tick(t0() + secs(1));
    assert!(signals.borrow().iter().any(|s| matches!(
        s,
        GameSignal::CurseCleared {
            reason: ClearReason::Expired,
            ..
        }
    )));
    assert!(tracker.deck().active_curses().is_empty());
}

#[test]
fn manual_clear_emits_manual_reason() {
    let (mut tracker, signals) = tracker_with_recorder();
    let curse = tracker
        .add_card_to_hand(CardKind::curse(cards::curse("crooked-compass").unwrap()))
        .unwrap();
    tracker.play_curse(curse, t0()).unwrap();

    tracker.clear_curse(curse, t0() + secs(90)).unwrap();

    assert!(signals.borrow().iter().any(|s| matches!(
        s,
        GameSignal::CurseCleared {
            reason: ClearReason::Manual,
            ..
        }
    )));
}

#[test]
fn sprung_trap_announces_the_station() {
    let (mut tracker, signals) = tracker_with_recorder();
    let trap = tracker.add_card_to_hand(CardKind::time_trap(5)).unwrap();
    tracker.play_time_trap(trap, "Old Mill Station").unwrap();

    let bonus = tracker.trigger_time_trap(trap, t0()).unwrap();

    assert_eq!(bonus, 5);
    assert!(signals.borrow().iter().any(|s| matches!(
        s,
        GameSignal::TrapTriggered { station_name, bonus_minutes: 5, .. }
            if station_name == "Old Mill Station"
    )));
}

// ─── Persistence & rehydration ───────────────────────────────────────────────

#[test]
fn restart_restores_session_deck_and_countdown() {
    let mut tracker = tracker();
    let alice = tracker.add_player("Alice").unwrap();
    tracker.add_player("Bob").unwrap();
    tracker.start_round(alice, t0());
    tracker
        .add_card_to_hand(CardKind::time_trap(5))
        .unwrap();
    tracker.tick(t0() + secs(60));

    // Process dies; five minutes pass before relaunch
    let gateway = tracker.into_gateway();
    let restored = GameTracker::new(config(), 99, gateway, t0() + Duration::minutes(5));

    assert_eq!(restored.phase(), SessionPhase::HidingPeriod);
    assert_eq!(restored.session().players().len(), 2);
    assert_eq!(restored.session().round_number(), 1);
    assert_eq!(restored.session().current_hider_id(), Some(alice));
    assert_eq!(restored.deck().hand().len(), 1, "hand survives restarts");
    assert!(restored.hiding_timer().timer.is_running());
    assert_eq!(
        restored.hiding_timer().timer.remaining(t0() + Duration::minutes(5)),
        Some(Duration::minutes(10)),
        "15-minute countdown minus 5 minutes of real time"
    );
}

#[test]
fn restart_while_paused_restores_exact_elapsed() {
    let mut tracker = tracker();
    let alice = tracker.add_player("Alice").unwrap();
    tracker.start_round(alice, t0());
    tracker.pause_game(t0() + secs(10));

    let gateway = tracker.into_gateway();
    let restored = GameTracker::new(config(), 1, gateway, t0() + Duration::hours(2));

    assert!(restored.session().is_paused());
    assert!(restored.hiding_timer().timer.is_paused());
    assert_eq!(
        restored.hiding_timer().timer.elapsed(t0() + Duration::hours(2)),
        secs(10)
    );
}

#[test]
fn backgrounding_persists_without_a_tick() {
    let mut tracker = tracker();
    let alice = tracker.add_player("Alice").unwrap();
    tracker.start_round(alice, t0());

    // No tick ever fires; backgrounding forces the write
    tracker.handle_visibility_change(false, t0() + secs(30));

    let gateway = tracker.into_gateway();
    let restored = GameTracker::new(config(), 1, gateway, t0() + Duration::minutes(10));

    assert_eq!(
        restored.hiding_timer().timer.remaining(t0() + Duration::minutes(10)),
        Some(Duration::minutes(5))
    );
}

#[test]
fn finished_countdown_is_not_replayed_after_restart() {
    let mut tracker = tracker();
    let alice = tracker.add_player("Alice").unwrap();
    tracker.start_round(alice, t0());
    tracker.tick(t0() + secs(60));

    // Relaunch long after the 15-minute period would have ended
    let gateway = tracker.into_gateway();
    let mut restored = GameTracker::new(config(), 1, gateway, t0() + Duration::hours(2));
    let recorder = Recorder::default();
    let signals = recorder.signals.clone();
    restored.register_handler(Box::new(recorder));

    // The stale record was discarded and a fresh period started instead
    assert!(restored.hiding_timer().timer.is_running());
    assert_eq!(
        restored
            .hiding_timer()
            .timer
            .remaining(t0() + Duration::hours(2)),
        Some(Duration::minutes(15))
    );

    restored.tick(t0() + Duration::hours(2) + secs(5));
    assert!(
        !signals
            .borrow()
            .iter()
            .any(|s| matches!(s, GameSignal::HidingPeriodEnded { .. })),
        "no retroactive completion"
    );
}

#[test]
fn pending_question_survives_a_restart() {
    let mut tracker = tracker();
    let alice = tracker.add_player("Alice").unwrap();
    tracker.start_round(alice, t0());
    tracker.start_seeking(t0());
    tracker.ask_question("radar", t0()).unwrap();

    let gateway = tracker.into_gateway();
    let restored = GameTracker::new(config(), 1, gateway, t0() + Duration::minutes(2));

    assert_eq!(restored.active_question(), Some("radar"));
    assert_eq!(
        restored.question_timer().timer.remaining(t0() + Duration::minutes(2)),
        Some(Duration::minutes(3))
    );
}

#[test]
fn return_to_setup_wipes_everything() {
    let mut tracker = tracker();
    let alice = tracker.add_player("Alice").unwrap();
    tracker.start_round(alice, t0());
    tracker.draw_cards(3);

    tracker.return_to_setup(t0() + secs(500));

    assert_eq!(tracker.phase(), SessionPhase::Setup);
    assert!(tracker.session().players().is_empty());
    assert!(tracker.deck().pending_draw().is_empty());
    for key in keys::ALL {
        assert!(
            tracker.gateway().load(key).is_none(),
            "{key} should be gone"
        );
    }
}
