use std::result;
use std::sync::PoisonError;

use thiserror::Error as ThisError;

pub type Result<T> = result::Result<T, Error>;

#[derive(Debug, Clone, Eq, PartialEq, ThisError)]
pub enum Error {
    // Unknown giveaway or reward.
    #[error("{0}")]
    NotFound(String),
    // The giveaway lifecycle doesn't allow the requested transition.
    #[error("{0}")]
    InvalidTransition(String),
    // The reward is in a state that doesn't allow the operation.
    #[error("{0}")]
    InvalidState(String),
    #[error("{0}")]
    DuplicateParticipant(String),
    #[error("{0}")]
    NotJoined(String),
    // No unused rewards left in the giveaway.
    #[error("{0}")]
    Exhausted(String),
    // The participant holds a pending reward that must be confirmed or denied first.
    #[error("{0}")]
    PendingResolutionRequired(String),
    #[error("{0}")]
    Storage(String),
    #[error("{0}")]
    Lock(String),
    #[error("{0}")]
    Config(String),
    // Malformed command line at the command boundary.
    #[error("{0}")]
    Command(String),
}

impl<T> From<PoisonError<T>> for Error {
    fn from(err: PoisonError<T>) -> Error {
        Error::Lock(format!("The giveaway lock was poisoned: {}.", err))
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Error {
        Error::Storage(format!("Can't encode or decode a stored column: {}.", err))
    }
}
