//! Wall-clock-anchored timer

use chrono::{DateTime, Duration, Utc};

/// Counting direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerMode {
    /// Count down from a fixed duration; completes at zero remaining
    Countdown { duration: Duration },
    /// Count up from zero; never completes on its own
    CountUp,
}

/// Events surfaced by `tick`. Polled, not callback-driven: the host calls
/// `tick(now)` on its own schedule and reacts to what comes back.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerEvent {
    /// The countdown crossed its warning threshold (fires once)
    Warning { remaining: Duration },
    /// The countdown ran out (fires once, then the timer stops)
    Completed,
}

/// A single clock. Consumers own one instance each; there is no global
/// scheduler.
#[derive(Debug, Clone)]
pub struct PersistentTimer {
    mode: TimerMode,
    /// Elapsed time accrued up to the anchor
    elapsed_at_anchor: Duration,
    /// Wall-clock reference; `Some` only while running unpaused
    anchor: Option<DateTime<Utc>>,
    is_running: bool,
    is_paused: bool,
    completed: bool,
    warning_at: Option<Duration>,
    warning_fired: bool,
}

impl PersistentTimer {
    pub fn countdown(duration: Duration) -> Self {
        Self::new(TimerMode::Countdown { duration })
    }

    pub fn count_up() -> Self {
        Self::new(TimerMode::CountUp)
    }

    pub fn new(mode: TimerMode) -> Self {
        Self {
            mode,
            elapsed_at_anchor: Duration::zero(),
            anchor: None,
            is_running: false,
            is_paused: false,
            completed: false,
            warning_at: None,
            warning_fired: false,
        }
    }

    /// One-shot warning when remaining time drops to `threshold`.
    /// Countdown only; ignored for count-up timers.
    pub fn with_warning(mut self, threshold: Duration) -> Self {
        self.warning_at = Some(threshold);
        self
    }

    // ─── State ──────────────────────────────────────────────────────────────

    pub fn mode(&self) -> TimerMode {
        self.mode
    }

    pub fn is_running(&self) -> bool {
        self.is_running
    }

    pub fn is_paused(&self) -> bool {
        self.is_paused
    }

    pub fn is_completed(&self) -> bool {
        self.completed
    }

    /// Elapsed time, recomputed from the wall clock on every read.
    /// Countdowns clamp at their duration.
    pub fn elapsed(&self, now: DateTime<Utc>) -> Duration {
        let raw = self.elapsed_raw(now);
        match self.mode {
            TimerMode::Countdown { duration } => raw.min(duration),
            TimerMode::CountUp => raw,
        }
    }

    pub fn elapsed_ms(&self, now: DateTime<Utc>) -> u64 {
        self.elapsed(now).num_milliseconds().max(0) as u64
    }

    /// Remaining time; countdown only. Never negative.
    pub fn remaining(&self, now: DateTime<Utc>) -> Option<Duration> {
        match self.mode {
            TimerMode::Countdown { duration } => {
                Some((duration - self.elapsed_raw(now)).max(Duration::zero()))
            }
            TimerMode::CountUp => None,
        }
    }

    /// Reconfigure a countdown's total duration. No-op for count-up
    /// timers. Used when a hiding period is granted with a non-default
    /// length (Move) and when rehydration restores the bound that was
    /// live at save time.
    pub fn set_duration(&mut self, duration: Duration) {
        if matches!(self.mode, TimerMode::Countdown { .. }) {
            self.mode = TimerMode::Countdown { duration };
        }
    }

    // ─── Control ────────────────────────────────────────────────────────────

    /// Begin from zero.
    pub fn start(&mut self, now: DateTime<Utc>) {
        self.start_at(Duration::zero(), now);
    }

    /// Begin from a preset elapsed value (used during rehydration).
    pub fn start_at(&mut self, elapsed: Duration, now: DateTime<Utc>) {
        self.elapsed_at_anchor = elapsed;
        self.anchor = Some(now);
        self.is_running = true;
        self.is_paused = false;
        self.completed = false;
        self.warning_fired = false;
    }

    /// Restore a timer that was persisted while paused: elapsed exactly
    /// as stored, still paused.
    pub fn restore_paused(&mut self, elapsed: Duration) {
        self.elapsed_at_anchor = elapsed;
        self.anchor = None;
        self.is_running = true;
        self.is_paused = true;
        self.completed = false;
        self.warning_fired = false;
    }

    /// Restore a stopped timer's final elapsed value (a finished round's
    /// hiding time, read later).
    pub fn restore_stopped(&mut self, elapsed: Duration) {
        self.elapsed_at_anchor = elapsed;
        self.anchor = None;
        self.is_running = false;
        self.is_paused = false;
        self.completed = false;
        self.warning_fired = false;
    }

    /// Freeze elapsed at its current value and stop accruing.
    pub fn pause(&mut self, now: DateTime<Utc>) {
        if !self.is_running || self.is_paused {
            return;
        }
        self.fold(now);
        self.anchor = None;
        self.is_paused = true;
    }

    /// Re-anchor to the wall clock and resume accruing. No time is lost
    /// or gained across a pause.
    pub fn resume(&mut self, now: DateTime<Utc>) {
        if !self.is_running || !self.is_paused {
            return;
        }
        self.anchor = Some(now);
        self.is_paused = false;
    }

    /// Cancel scheduling but keep the final elapsed value.
    pub fn stop(&mut self, now: DateTime<Utc>) {
        if self.is_running && !self.is_paused {
            self.fold(now);
        }
        self.anchor = None;
        self.is_running = false;
        self.is_paused = false;
    }

    /// Zero everything.
    pub fn reset(&mut self) {
        self.elapsed_at_anchor = Duration::zero();
        self.anchor = None;
        self.is_running = false;
        self.is_paused = false;
        self.completed = false;
        self.warning_fired = false;
    }

    /// Visibility change: recompute elapsed from the wall clock and move
    /// the anchor to `now`. Ticks missed while backgrounded are already
    /// covered by the anchor arithmetic; this just re-bases so subsequent
    /// reads stay cheap and monotonic.
    pub fn reanchor(&mut self, now: DateTime<Utc>) {
        if self.is_running && !self.is_paused {
            self.fold(now);
            self.anchor = Some(now);
        }
    }

    /// Advance the timer. Returns at most one event: a one-shot warning
    /// or completion. Completion latches; it cannot re-fire.
    pub fn tick(&mut self, now: DateTime<Utc>) -> Option<TimerEvent> {
        if !self.is_running || self.is_paused || self.completed {
            return None;
        }
        let TimerMode::Countdown { duration } = self.mode else {
            return None;
        };

        if self.elapsed_raw(now) >= duration {
            self.elapsed_at_anchor = duration;
            self.anchor = None;
            self.is_running = false;
            self.completed = true;
            return Some(TimerEvent::Completed);
        }

        if let Some(threshold) = self.warning_at
            && !self.warning_fired
        {
            let remaining = (duration - self.elapsed_raw(now)).max(Duration::zero());
            if remaining <= threshold {
                self.warning_fired = true;
                return Some(TimerEvent::Warning { remaining });
            }
        }

        None
    }

    // ─── Internals ──────────────────────────────────────────────────────────

    fn elapsed_raw(&self, now: DateTime<Utc>) -> Duration {
        let accruing = match self.anchor {
            Some(anchor) if self.is_running && !self.is_paused => {
                (now - anchor).max(Duration::zero())
            }
            _ => Duration::zero(),
        };
        self.elapsed_at_anchor + accruing
    }

    fn fold(&mut self, now: DateTime<Utc>) {
        self.elapsed_at_anchor = self.elapsed_raw(now);
    }
}
