use chrono::{DateTime, Utc};

use crate::deck::ClearReason;
use crate::session::SessionPhase;

/// Which countdown a timer-related signal refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerRole {
    /// Countdown while the hider finds a spot
    HidingPeriod,
    /// Countdown for answering a seeker question
    Question,
}

/// Signals emitted by the tracker for cross-cutting concerns.
/// These represent "interesting things that happened" at a higher level
/// than individual engine mutations.
#[derive(Debug, Clone)]
pub enum GameSignal {
    // Session lifecycle
    PhaseChanged {
        old_phase: SessionPhase,
        new_phase: SessionPhase,
        round: u32,
        timestamp: DateTime<Utc>,
    },
    GamePaused {
        timestamp: DateTime<Utc>,
    },
    GameResumed {
        timestamp: DateTime<Utc>,
    },

    // Timers
    /// One-shot warning when a countdown crosses its warning threshold
    TimerWarning {
        role: TimerRole,
        remaining_secs: u64,
        timestamp: DateTime<Utc>,
    },
    /// The hiding-period countdown ran out
    HidingPeriodEnded {
        timestamp: DateTime<Utc>,
    },
    /// The question response countdown ran out unanswered
    QuestionTimeExpired {
        timestamp: DateTime<Utc>,
    },

    // Cards
    CurseCleared {
        curse_id: String,
        name: String,
        reason: ClearReason,
        timestamp: DateTime<Utc>,
    },
    TrapTriggered {
        station_name: String,
        bonus_minutes: u32,
        timestamp: DateTime<Utc>,
    },
    QuestionVetoed {
        timestamp: DateTime<Utc>,
    },
}
