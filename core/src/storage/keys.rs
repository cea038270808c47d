//! Storage keys
//!
//! One key per timer binding, one for deck state, one for session state,
//! one for the question in flight. All writes go through these constants
//! so a full reset can enumerate them.

pub const SESSION: &str = "quarry.session";
pub const DECK: &str = "quarry.deck";
pub const QUESTION: &str = "quarry.question";

pub const TIMER_HIDING_PERIOD: &str = "quarry.timer.hiding_period";
pub const TIMER_HIDE_STOPWATCH: &str = "quarry.timer.hide_stopwatch";
pub const TIMER_QUESTION: &str = "quarry.timer.question";

/// Every key the engine writes, for `return_to_setup` cleanup.
pub const ALL: &[&str] = &[
    SESSION,
    DECK,
    QUESTION,
    TIMER_HIDING_PERIOD,
    TIMER_HIDE_STOPWATCH,
    TIMER_QUESTION,
];
