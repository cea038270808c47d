//! Active curse instances (runtime state)
//!
//! A curse card that has been played moves from the hand to the active
//! list (never to the discard pile) and stays until it is cleared.
//!
//! # Clearing
//!
//! - Time-based curses (a `duration_minutes` map) clear only by expiry,
//!   checked by the polled sweep
//! - Until-found curses clear only at round end
//! - Everything else clears manually, when the seekers complete the task

use chrono::{DateTime, Duration, Utc};
use quarry_types::{GameSize, SizeMap};
use serde::{Deserialize, Serialize};

use super::card::CardInstanceId;

/// Why a curse left the active list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ClearReason {
    Expired,
    Manual,
    RoundEnd,
}

impl ClearReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            ClearReason::Expired => "expired",
            ClearReason::Manual => "manual",
            ClearReason::RoundEnd => "round end",
        }
    }
}

/// A curse currently weighing on the seekers.
///
/// Snapshots the definition's blocking flags and minute maps at play time
/// so later catalog edits cannot change a curse mid-flight.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActiveCurse {
    pub instance_id: CardInstanceId,
    pub curse_id: String,
    pub name: String,
    pub activated_at: DateTime<Utc>,
    pub blocks_questions: bool,
    pub blocks_transit: bool,
    pub duration_minutes: Option<SizeMap<u32>>,
    pub penalty_minutes: Option<SizeMap<u32>>,
    pub until_found: bool,
}

impl ActiveCurse {
    pub fn is_time_based(&self) -> bool {
        self.duration_minutes.is_some()
    }

    /// Manual clearing is only for curses that are neither until-found nor
    /// time-based.
    pub fn is_manually_clearable(&self) -> bool {
        !self.until_found && !self.is_time_based()
    }

    /// When the curse expires, for time-based curses.
    pub fn expires_at(&self, size: GameSize) -> Option<DateTime<Utc>> {
        self.duration_minutes
            .map(|minutes| self.activated_at + Duration::minutes(i64::from(minutes.value(size))))
    }

    pub fn has_expired(&self, size: GameSize, now: DateTime<Utc>) -> bool {
        self.expires_at(size).is_some_and(|expires| now >= expires)
    }

    /// Remaining time for countdown display (zero once expired, None for
    /// curses without a duration).
    pub fn remaining(&self, size: GameSize, now: DateTime<Utc>) -> Option<Duration> {
        self.expires_at(size)
            .map(|expires| (expires - now).max(Duration::zero()))
    }
}
