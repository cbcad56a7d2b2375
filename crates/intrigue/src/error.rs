//! Unified error type for Intrigue.

use intrigue_game::GameError;
use intrigue_protocol::{ErrorKind, ProtocolError};
use intrigue_room::RoomError;

/// Top-level error that wraps all crate-specific errors.
///
/// When using the `intrigue` crate you deal with this single error
/// type instead of importing errors from each sub-crate. The `#[from]`
/// attribute on each variant lets `?` convert sub-crate errors.
#[derive(Debug, thiserror::Error)]
pub enum IntrigueError {
    /// A protocol-level error (encode, decode, invalid message).
    #[error(transparent)]
    Protocol(#[from] ProtocolError),

    /// A room-level error (not found, unavailable, refused move).
    #[error(transparent)]
    Room(#[from] RoomError),
}

impl From<GameError> for IntrigueError {
    fn from(err: GameError) -> Self {
        Self::Room(RoomError::Game(err))
    }
}

impl IntrigueError {
    /// Classifies the error for reporting.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Protocol(_) => ErrorKind::Validation,
            Self::Room(err) => err.kind(),
        }
    }

    /// HTTP-style status code for [`Self::kind`].
    pub fn code(&self) -> u16 {
        self.kind().code()
    }

    /// Returns `true` only when the room could not be reached.
    pub fn is_retryable(&self) -> bool {
        self.kind().is_retryable()
    }
}
