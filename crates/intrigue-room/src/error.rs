//! Error types for the room layer.

use intrigue_game::GameError;
use intrigue_protocol::{ErrorKind, RoomId};

/// Errors that can occur during room operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RoomError {
    /// The room does not exist.
    #[error("room {0} not found")]
    NotFound(RoomId),

    /// The room's mailbox is closed or the actor dropped the reply.
    #[error("room {0} is unavailable")]
    Unavailable(RoomId),

    /// The transition was refused. Nothing was committed.
    #[error(transparent)]
    Game(#[from] GameError),
}

impl RoomError {
    /// Classifies the error for reporting.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::NotFound(_) => ErrorKind::NotFound,
            Self::Unavailable(_) => ErrorKind::Unavailable,
            Self::Game(err) => err.kind(),
        }
    }

    /// Returns `true` if the same call might succeed later.
    pub fn is_retryable(&self) -> bool {
        self.kind().is_retryable()
    }
}
