use serde::{Deserialize, Serialize};

/// Stable player id, allocated in join order.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct PlayerId(pub u32);

/// One participant. Created at setup, never deleted mid-game.
///
/// `total_hiding_time_ms` accumulates across rounds and decides the
/// final ranking; `has_been_hider` gates when the game can end.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    pub id: PlayerId,
    pub name: String,
    pub total_hiding_time_ms: u64,
    pub has_been_hider: bool,
}

impl Player {
    pub fn new(id: PlayerId, name: String) -> Self {
        Self {
            id,
            name,
            total_hiding_time_ms: 0,
            has_been_hider: false,
        }
    }
}
