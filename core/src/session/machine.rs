//! Phase state machine
//!
//! ```text
//! Setup → HidingPeriod → Seeking → EndGame → RoundComplete ─┬→ Setup
//!                           │                    ▲          └→ GameOver
//!                           └────────────────────┘
//! ```
//!
//! Every transition is guarded. An invalid command from a stale UI is
//! ignored (the method returns `false`); misuse is never an exception.

use serde::{Deserialize, Serialize};

use super::player::{Player, PlayerId};

/// Where the session currently stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SessionPhase {
    /// Picking players / picking the next hider
    #[default]
    Setup,
    /// The hider is finding a spot; seekers wait
    HidingPeriod,
    /// Seekers are hunting
    Seeking,
    /// Seekers have entered the hiding zone
    EndGame,
    /// Hider found; round is being settled
    RoundComplete,
    /// Everyone has hidden once
    GameOver,
}

impl SessionPhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            SessionPhase::Setup => "Setup",
            SessionPhase::HidingPeriod => "Hiding Period",
            SessionPhase::Seeking => "Seeking",
            SessionPhase::EndGame => "End Game",
            SessionPhase::RoundComplete => "Round Complete",
            SessionPhase::GameOver => "Game Over",
        }
    }

    /// A round is underway (pause is meaningful).
    pub fn is_round_active(&self) -> bool {
        !matches!(self, SessionPhase::Setup | SessionPhase::GameOver)
    }
}

/// Serializable session state, written after every mutation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionSnapshot {
    pub phase: SessionPhase,
    pub players: Vec<Player>,
    pub current_hider: Option<PlayerId>,
    pub round_number: u32,
    pub is_paused: bool,
    pub next_player_id: u32,
}

/// The session phase state machine.
#[derive(Debug, Clone, Default)]
pub struct SessionStateMachine {
    phase: SessionPhase,
    players: Vec<Player>,
    current_hider: Option<PlayerId>,
    round_number: u32,
    is_paused: bool,
    next_player_id: u32,
}

impl SessionStateMachine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            phase: self.phase,
            players: self.players.clone(),
            current_hider: self.current_hider,
            round_number: self.round_number,
            is_paused: self.is_paused,
            next_player_id: self.next_player_id,
        }
    }

    pub fn from_snapshot(snapshot: SessionSnapshot) -> Self {
        Self {
            phase: snapshot.phase,
            players: snapshot.players,
            current_hider: snapshot.current_hider,
            round_number: snapshot.round_number,
            is_paused: snapshot.is_paused,
            next_player_id: snapshot.next_player_id,
        }
    }

    // ─── Queries ────────────────────────────────────────────────────────────

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    pub fn players(&self) -> &[Player] {
        &self.players
    }

    pub fn player(&self, id: PlayerId) -> Option<&Player> {
        self.players.iter().find(|p| p.id == id)
    }

    pub fn current_hider_id(&self) -> Option<PlayerId> {
        self.current_hider
    }

    pub fn current_hider(&self) -> Option<&Player> {
        self.current_hider.and_then(|id| self.player(id))
    }

    /// Rounds played so far; 0 until the first `start_round`.
    pub fn round_number(&self) -> u32 {
        self.round_number
    }

    pub fn is_paused(&self) -> bool {
        self.is_paused
    }

    /// Players by accumulated hiding time, longest first. Ties keep
    /// insertion order (stable sort).
    pub fn players_ranked_by_time(&self) -> Vec<&Player> {
        let mut ranked: Vec<&Player> = self.players.iter().collect();
        ranked.sort_by(|a, b| b.total_hiding_time_ms.cmp(&a.total_hiding_time_ms));
        ranked
    }

    pub fn all_players_have_been_hider(&self) -> bool {
        self.players.iter().all(|p| p.has_been_hider)
    }

    // ─── Transitions ────────────────────────────────────────────────────────

    /// Append a player. Only valid during Setup.
    pub fn add_player(&mut self, name: &str) -> Option<PlayerId> {
        if self.phase != SessionPhase::Setup {
            tracing::debug!(name, "ignoring add_player outside Setup");
            return None;
        }
        self.next_player_id += 1;
        let id = PlayerId(self.next_player_id);
        self.players.push(Player::new(id, name.to_string()));
        Some(id)
    }

    /// Setup → HidingPeriod. Marks `hider` as having hidden and bumps the
    /// round counter.
    pub fn start_round(&mut self, hider: PlayerId) -> bool {
        if self.phase != SessionPhase::Setup {
            return false;
        }
        let Some(player) = self.players.iter_mut().find(|p| p.id == hider) else {
            tracing::debug!(?hider, "ignoring start_round for unknown player");
            return false;
        };
        player.has_been_hider = true;
        self.current_hider = Some(hider);
        self.round_number += 1;
        self.phase = SessionPhase::HidingPeriod;
        true
    }

    /// HidingPeriod → Seeking.
    pub fn start_seeking(&mut self) -> bool {
        if self.phase != SessionPhase::HidingPeriod {
            return false;
        }
        self.phase = SessionPhase::Seeking;
        true
    }

    /// Seeking → EndGame.
    pub fn enter_hiding_zone(&mut self) -> bool {
        if self.phase != SessionPhase::Seeking {
            return false;
        }
        self.phase = SessionPhase::EndGame;
        true
    }

    /// Seeking or EndGame → RoundComplete (the end-game zone step is
    /// optional).
    pub fn hider_found(&mut self) -> bool {
        if !matches!(self.phase, SessionPhase::Seeking | SessionPhase::EndGame) {
            return false;
        }
        self.phase = SessionPhase::RoundComplete;
        true
    }

    /// RoundComplete → Setup, or GameOver once everyone has hidden.
    /// Credits the outgoing hider with this round's hiding time.
    pub fn end_round(&mut self, hiding_time_ms: u64) -> bool {
        if self.phase != SessionPhase::RoundComplete {
            return false;
        }
        if let Some(hider_id) = self.current_hider
            && let Some(player) = self.players.iter_mut().find(|p| p.id == hider_id)
        {
            player.total_hiding_time_ms += hiding_time_ms;
        }
        self.current_hider = None;
        self.phase = if self.all_players_have_been_hider() {
            SessionPhase::GameOver
        } else {
            SessionPhase::Setup
        };
        true
    }

    /// Move powerup: a fresh hiding period mid-round.
    pub fn grant_hiding_period(&mut self) -> bool {
        if !matches!(self.phase, SessionPhase::Seeking | SessionPhase::EndGame) {
            return false;
        }
        self.phase = SessionPhase::HidingPeriod;
        true
    }

    /// Freeze phase-driven timers. Orthogonal to phase; valid whenever a
    /// round is active.
    pub fn pause_game(&mut self) -> bool {
        if !self.phase.is_round_active() || self.is_paused {
            return false;
        }
        self.is_paused = true;
        true
    }

    pub fn resume_game(&mut self) -> bool {
        if !self.phase.is_round_active() || !self.is_paused {
            return false;
        }
        self.is_paused = false;
        true
    }

    /// Explicit "return to setup": wipes the whole session.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
