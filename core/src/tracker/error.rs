//! Error types for tracker-level commands

use thiserror::Error;

use crate::deck::DeckError;

/// Validation failures for commands that span the engines (the question
/// flow). Deck-only failures pass through unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TrackerError {
    #[error("questions can only be asked while seeking")]
    NotSeeking,

    #[error("a curse is blocking questions right now")]
    QuestionsBlocked,

    #[error("unknown question category '{0}'")]
    UnknownQuestion(String),

    #[error("a question is already waiting for an answer")]
    QuestionPending,

    #[error("no question is waiting for an answer")]
    NoQuestionPending,

    #[error(transparent)]
    Deck(#[from] DeckError),
}
