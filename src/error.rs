//! Error types for quiz transitions and question bank loading.
//!
//! Transition errors never leave a session half-updated: every operation that
//! returns one has checked its preconditions before touching state.

use thiserror::Error;

use crate::question::QuestionId;
use crate::session::Phase;

/// Errors surfaced by session transitions and scoring.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum QuizError {
    /// Start was requested with an empty or whitespace-only name.
    #[error("please enter a username to continue")]
    InvalidUsername,

    /// The requested transition is not valid for the current session state.
    #[error("invalid transition: {0}")]
    InvalidTransition(#[from] Rejected),

    /// A time value outside `0..=time_limit` reached the score calculator.
    #[error("time remaining {time_remaining}s is outside 0..={time_limit}s")]
    OutOfRangeTime { time_remaining: i64, time_limit: u32 },
}

/// Why a transition was turned down.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum Rejected {
    #[error("session is {0}")]
    WrongPhase(Phase),

    #[error("question {got} is not the current question {expected}")]
    NotCurrent { expected: QuestionId, got: QuestionId },

    #[error("question {0} was already answered")]
    AlreadyAnswered(QuestionId),

    #[error("no bonus is pending")]
    NoPendingBonus,
}

/// Errors raised while loading a question bank or leaderboard seed.
#[derive(Debug, Error)]
pub enum BankError {
    #[error("failed to read question bank: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse question bank: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("embedded data file {0} is missing")]
    MissingData(&'static str),

    #[error("question bank has no questions")]
    Empty,

    #[error("question {id}: {reason}")]
    InvalidQuestion { id: QuestionId, reason: String },
}

pub type Result<T, E = QuizError> = std::result::Result<T, E>;

impl QuizError {
    /// Returns `true` for errors caused by user input rather than a program bug.
    pub fn is_validation(&self) -> bool {
        matches!(self, QuizError::InvalidUsername)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejected_converts_into_invalid_transition() {
        let err: QuizError = Rejected::AlreadyAnswered(3).into();
        assert_eq!(err, QuizError::InvalidTransition(Rejected::AlreadyAnswered(3)));
        assert_eq!(
            err.to_string(),
            "invalid transition: question 3 was already answered"
        );
    }

    #[test]
    fn wrong_phase_message_uses_snake_case_phase() {
        let err = QuizError::from(Rejected::WrongPhase(Phase::InProgress));
        assert_eq!(err.to_string(), "invalid transition: session is in_progress");
    }

    #[test]
    fn only_username_errors_are_validation() {
        assert!(QuizError::InvalidUsername.is_validation());
        assert!(!QuizError::OutOfRangeTime {
            time_remaining: -1,
            time_limit: 10
        }
        .is_validation());
    }
}
