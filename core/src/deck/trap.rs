//! Armed time traps (runtime state)
//!
//! A time-trap card is played with a station name the hider announces to
//! the group. If a seeker later sets foot there, the trap springs and the
//! hider banks bonus minutes. A trap springs at most once; the flag never
//! reverts.

use serde::{Deserialize, Serialize};

use super::card::CardInstanceId;

/// A trap the hider has armed at a named station.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActiveTimeTrap {
    pub instance_id: CardInstanceId,
    /// Free text supplied by the hider
    pub station_name: String,
    pub bonus_minutes: u32,
    pub is_triggered: bool,
}

impl ActiveTimeTrap {
    pub fn new(instance_id: CardInstanceId, station_name: String, bonus_minutes: u32) -> Self {
        Self {
            instance_id,
            station_name,
            bonus_minutes,
            is_triggered: false,
        }
    }
}
