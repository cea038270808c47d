//! Tests for the wall-clock-anchored timer
//!
//! Elapsed time must always come out of timestamp arithmetic, never out
//! of how many times `tick` happened to run.

use chrono::{DateTime, Duration, TimeZone, Utc};

use super::{PersistentTimer, TimerEvent};

fn t0() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap()
}

fn secs(s: i64) -> Duration {
    Duration::seconds(s)
}

#[test]
fn countdown_tracks_elapsed_and_remaining() {
    let mut timer = PersistentTimer::countdown(Duration::minutes(30));
    timer.start(t0());

    assert_eq!(timer.elapsed(t0() + secs(10)), secs(10));
    assert_eq!(
        timer.remaining(t0() + secs(10)),
        Some(Duration::minutes(30) - secs(10))
    );
    assert!(timer.is_running());
}

#[test]
fn count_up_has_no_remaining() {
    let mut timer = PersistentTimer::count_up();
    timer.start(t0());

    assert_eq!(timer.elapsed(t0() + secs(90)), secs(90));
    assert_eq!(timer.remaining(t0() + secs(90)), None);
    assert_eq!(timer.tick(t0() + Duration::hours(5)), None, "never completes");
}

#[test]
fn pause_freezes_and_resume_loses_nothing() {
    let mut timer = PersistentTimer::count_up();
    timer.start(t0());
    timer.pause(t0() + secs(5));

    // A minute passes while paused; elapsed stays put
    assert_eq!(timer.elapsed(t0() + secs(65)), secs(5));
    assert!(timer.is_paused());

    timer.resume(t0() + secs(65));
    assert_eq!(timer.elapsed(t0() + secs(75)), secs(15));
}

#[test]
fn stop_keeps_the_final_value() {
    let mut timer = PersistentTimer::count_up();
    timer.start(t0());
    timer.stop(t0() + secs(42));

    // The final time stays readable after the round ends
    assert!(!timer.is_running());
    assert_eq!(timer.elapsed(t0() + Duration::hours(1)), secs(42));
}

#[test]
fn reset_zeroes_everything() {
    let mut timer = PersistentTimer::countdown(secs(60));
    timer.start(t0());
    timer.tick(t0() + secs(90));
    timer.reset();

    assert_eq!(timer.elapsed(t0() + secs(90)), Duration::zero());
    assert!(!timer.is_running());
    assert!(!timer.is_completed());
}

#[test]
fn completion_fires_exactly_once_and_clamps() {
    let mut timer = PersistentTimer::countdown(secs(10));
    timer.start(t0());

    assert_eq!(timer.tick(t0() + secs(3)), None);
    assert_eq!(timer.tick(t0() + secs(11)), Some(TimerEvent::Completed));
    assert!(timer.is_completed());
    assert!(!timer.is_running());

    // No re-fire, and elapsed never overshoots the bound
    assert_eq!(timer.tick(t0() + secs(20)), None);
    assert_eq!(timer.elapsed(t0() + secs(20)), secs(10));
    assert_eq!(timer.remaining(t0() + secs(20)), Some(Duration::zero()));
}

#[test]
fn warning_fires_once_at_the_threshold() {
    let mut timer = PersistentTimer::countdown(Duration::minutes(10)).with_warning(secs(60));
    timer.start(t0());

    assert_eq!(timer.tick(t0() + Duration::minutes(8)), None);

    let event = timer.tick(t0() + secs(9 * 60 + 10));
    assert_eq!(
        event,
        Some(TimerEvent::Warning {
            remaining: secs(50)
        })
    );

    // Latched; later ticks go quiet until completion
    assert_eq!(timer.tick(t0() + secs(9 * 60 + 20)), None);
    assert_eq!(
        timer.tick(t0() + Duration::minutes(11)),
        Some(TimerEvent::Completed)
    );
}

#[test]
fn elapsed_is_wall_clock_not_tick_count() {
    let mut timer = PersistentTimer::countdown(Duration::minutes(30));
    timer.start(t0());

    // No ticks fired for five minutes (backgrounded); the reading is
    // still correct
    assert_eq!(timer.elapsed(t0() + Duration::minutes(5)), Duration::minutes(5));

    timer.reanchor(t0() + Duration::minutes(5));
    assert_eq!(timer.elapsed(t0() + Duration::minutes(6)), Duration::minutes(6));
}

#[test]
fn a_backwards_clock_never_goes_negative() {
    let mut timer = PersistentTimer::count_up();
    timer.start(t0());

    assert_eq!(timer.elapsed(t0() - secs(30)), Duration::zero());
}

#[test]
fn start_at_presets_elapsed_for_rehydration() {
    let mut timer = PersistentTimer::countdown(Duration::minutes(30));
    timer.start_at(Duration::minutes(10), t0());

    assert_eq!(timer.elapsed(t0() + secs(30)), Duration::minutes(10) + secs(30));
    assert_eq!(
        timer.remaining(t0() + secs(30)),
        Some(Duration::minutes(20) - secs(30))
    );
}
