//! Timer persistence and rehydration
//!
//! Each timer consumer owns a binding: the timer, its storage key, and
//! the session phases it is valid in. The binding saves on every tick and
//! restores on mount. Restoration is all-or-nothing: a record either
//! fully applies or is discarded in favor of a fresh start.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::session::SessionPhase;
use crate::storage::{PersistenceGateway, load_json, save_json};

use super::persistent::{PersistentTimer, TimerMode};

/// What a timer writes on every tick, pause, resume, and stop.
///
/// `start_time` is the wall clock at the moment of the save; it exists
/// only to compute drift on reload and is not a source of truth once the
/// timer is live in memory.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PersistedTimerState {
    pub elapsed_ms: u64,
    pub is_running: bool,
    pub is_paused: bool,
    pub start_time: DateTime<Utc>,
    /// Countdown bound live at save time (None for count-up timers).
    /// Hiding periods granted by Move are shorter than the default, so
    /// the bound has to travel with the record.
    #[serde(default)]
    pub duration_ms: Option<u64>,
}

/// Outcome of a rehydration attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rehydration {
    /// A persisted record fully applied
    Restored,
    /// No record, a stale record, or an already-finished countdown;
    /// starting over
    Fresh,
}

/// A timer plus its persistence key and phase validity.
#[derive(Debug, Clone)]
pub struct TimerBinding {
    key: &'static str,
    valid_phases: &'static [SessionPhase],
    pub timer: PersistentTimer,
}

impl TimerBinding {
    pub fn new(
        key: &'static str,
        valid_phases: &'static [SessionPhase],
        timer: PersistentTimer,
    ) -> Self {
        Self {
            key,
            valid_phases,
            timer,
        }
    }

    pub fn key(&self) -> &'static str {
        self.key
    }

    pub fn is_valid_in(&self, phase: SessionPhase) -> bool {
        self.valid_phases.contains(&phase)
    }

    /// Persist the timer's current state.
    pub fn save(&self, gateway: &mut dyn PersistenceGateway, now: DateTime<Utc>) {
        let duration_ms = match self.timer.mode() {
            TimerMode::Countdown { duration } => Some(duration.num_milliseconds().max(0) as u64),
            TimerMode::CountUp => None,
        };
        let state = PersistedTimerState {
            elapsed_ms: self.timer.elapsed_ms(now),
            is_running: self.timer.is_running(),
            is_paused: self.timer.is_paused(),
            start_time: now,
            duration_ms,
        };
        save_json(gateway, self.key, &state);
    }

    /// Drop the persisted record.
    pub fn clear(&self, gateway: &mut dyn PersistenceGateway) {
        gateway.remove(self.key);
    }

    /// Restore from storage, correcting for the wall-clock time that
    /// passed while the process was dead or backgrounded.
    ///
    /// Discards the record (returning `Fresh`) when it is missing or
    /// unparseable, when the current phase is not one the timer is valid
    /// in, or when a running countdown would already have completed;
    /// completion is never fired retroactively.
    pub fn rehydrate(
        &mut self,
        gateway: &mut dyn PersistenceGateway,
        phase: SessionPhase,
        now: DateTime<Utc>,
    ) -> Rehydration {
        let Some(state) = load_json::<PersistedTimerState>(gateway, self.key) else {
            return Rehydration::Fresh;
        };

        if !self.is_valid_in(phase) {
            tracing::debug!(
                key = self.key,
                phase = phase.as_str(),
                "discarding timer record from another phase"
            );
            gateway.remove(self.key);
            return Rehydration::Fresh;
        }

        let stored = Duration::milliseconds(state.elapsed_ms as i64);

        // Restore the countdown bound that was live at save time
        if let Some(duration_ms) = state.duration_ms {
            self.timer
                .set_duration(Duration::milliseconds(duration_ms as i64));
        }

        if state.is_running && !state.is_paused {
            let drift = (now - state.start_time).max(Duration::zero());
            let total = stored + drift;

            if let TimerMode::Countdown { duration } = self.timer.mode()
                && total >= duration
            {
                tracing::debug!(
                    key = self.key,
                    "discarding countdown that finished while the app was gone"
                );
                gateway.remove(self.key);
                return Rehydration::Fresh;
            }

            self.timer.start_at(total, now);
        } else if state.is_running && state.is_paused {
            self.timer.restore_paused(stored);
        } else {
            self.timer.restore_stopped(stored);
        }

        tracing::debug!(key = self.key, elapsed_ms = state.elapsed_ms, "timer restored");
        Rehydration::Restored
    }
}
