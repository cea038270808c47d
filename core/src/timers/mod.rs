//! Persistent timers
//!
//! Every on-screen clock shares one abstraction: a wall-clock-anchored
//! elapsed tracker that survives backgrounding and process death.
//!
//! # Drift correction
//!
//! Tick callbacks are unreliable while the host is backgrounded, so
//! elapsed time is never accumulated from tick counts. The timer stores
//! `elapsed_at_anchor` plus an anchor timestamp and recomputes
//! `elapsed = elapsed_at_anchor + (now - anchor)` on every read.
//!
//! # Persistence
//!
//! A [`TimerBinding`] pairs a timer with its storage key and the session
//! phases it is valid in; it saves on every tick and rehydrates on mount,
//! discarding stale or already-completed records instead of replaying
//! them.

mod persistent;
mod rehydrate;

#[cfg(test)]
mod persistent_tests;

pub use persistent::{PersistentTimer, TimerEvent, TimerMode};
pub use rehydrate::{PersistedTimerState, Rehydration, TimerBinding};
