//! Quarry core engine
//!
//! Companion tracker for a live-action outdoor hide-and-seek variant:
//! who is hiding, how long they have hidden, and the shared deck of
//! effect cards. The UI shell renders; everything authoritative lives
//! here and survives the app being backgrounded or killed.
//!
//! Three engines cooperate:
//! - [`session::SessionStateMachine`]: players, phase, rounds, pause
//! - [`deck::DeckEngine`]: draws, the hand, curses, and traps
//! - [`timers::PersistentTimer`]: wall-clock-anchored clocks with
//!   persistence and drift correction
//!
//! [`tracker::GameTracker`] wires them together, persists after every
//! mutation, and broadcasts [`signals::GameSignal`]s to registered
//! handlers.

pub mod catalog;
pub mod config;
pub mod deck;
pub mod notify;
pub mod session;
pub mod signals;
pub mod storage;
pub mod timers;
pub mod tracker;

// Re-exports for convenience
pub use catalog::{PowerupType, QuestionCategory, TimeBonusTier};
pub use config::TrackerConfigExt;
pub use deck::{
    ActiveCurse, ActiveTimeTrap, CardInstance, CardInstanceId, CardKind, ClearReason,
    DeckComposition, DeckEngine, DeckError, DeckSnapshot,
};
pub use notify::{NotificationGateway, NotificationRelay};
pub use quarry_types::{GameSize, Severity, SizeMap, TrackerConfig};
pub use session::{Player, PlayerId, SessionPhase, SessionSnapshot, SessionStateMachine};
pub use signals::{GameSignal, SignalHandler, TimerRole};
pub use storage::{MemoryGateway, PersistenceGateway};
pub use timers::{
    PersistedTimerState, PersistentTimer, Rehydration, TimerBinding, TimerEvent, TimerMode,
};
pub use tracker::{GameTracker, TrackerError};
