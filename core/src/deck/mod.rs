//! Card deck engine
//!
//! This module provides:
//! - **Card instances**: runtime cards built from the static catalog
//! - **Composition**: what remains in the shared deck
//! - **Engine**: draw/keep/discard and every powerup, curse, and trap
//!   operation
//!
//! # Lifecycle
//!
//! 1. `draw_cards` samples the weighted composition into a pending draw
//! 2. `keep_drawn` moves the selection into the hand, the rest to discard
//! 3. Play operations consume hand cards: powerups resolve and discard,
//!    curses move to the active list, traps arm at a named station
//! 4. Round end discards the hand and clears active curses and traps

mod card;
mod composition;
mod curse;
mod engine;
mod error;
mod trap;


pub use card::{CardInstance, CardInstanceId, CardKind};
pub use composition::{DeckComposition, DeckEntry};
pub use curse::{ActiveCurse, ClearReason};
pub use engine::{DeckEngine, DeckSnapshot};
pub use error::DeckError;
pub use trap::ActiveTimeTrap;
