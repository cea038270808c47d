//! Error types for deck operations
//!
//! Every variant is an expected validation failure: the caller surfaces
//! the message to the player and takes no further action. Nothing here is
//! fatal and nothing panics.

use thiserror::Error;

/// Validation failures for deck engine operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DeckError {
    #[error("that card is not in your hand")]
    NotInHand,

    #[error("that card is not part of the current draw")]
    NotInPendingDraw,

    #[error("that card is not a {expected} card")]
    WrongCardKind { expected: &'static str },

    #[error("a card cannot duplicate itself")]
    DuplicateSelf,

    #[error("select exactly {needed} other cards to discard")]
    SelectionCount { needed: usize },

    #[error("needs {needed} other cards to discard, hand only has {available}")]
    InsufficientCards { needed: usize, available: usize },

    #[error("hand limit of {limit} reached")]
    HandLimitReached { limit: usize },

    #[error("this curse clears on its own, not by hand")]
    CurseNotClearable,

    #[error("that curse is not active")]
    CurseNotActive,

    #[error("that time trap has already been triggered")]
    TrapAlreadyTriggered,

    #[error("that time trap is not armed")]
    TrapNotActive,
}
