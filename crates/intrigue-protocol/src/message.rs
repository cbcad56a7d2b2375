//! Request and reply envelopes for transport adapters.
//!
//! An HTTP or WebSocket front end decodes bytes into a [`Request`],
//! hands it to the service, and encodes the [`Reply`] it gets back.
//! Unknown actions, influences, or responses never make it past
//! decoding, because the enums are closed.

use serde::{Deserialize, Serialize};

use crate::{Action, Influence, PlayerId, Response, RoomId};

// ---------------------------------------------------------------------------
// ErrorKind
// ---------------------------------------------------------------------------

/// The class of a rejected request.
///
/// Every class except `Unavailable` is a caller logic or input error and
/// will fail the same way if resent unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorKind {
    /// Malformed or missing fields, unknown player or target.
    Validation,
    /// The room does not exist.
    NotFound,
    /// The operation is not legal in the room's current phase.
    IllegalStateTransition,
    /// A game rule refused it (coins, forced coup, names, elimination).
    PreconditionFailed,
    /// No matching influence-loss obligation.
    InvalidObligation,
    /// The room could not be reached. Safe to retry.
    Unavailable,
}

impl ErrorKind {
    /// HTTP-style status code, following the protocol convention of
    /// `Error { code, message }` replies.
    pub fn code(self) -> u16 {
        match self {
            Self::Validation => 400,
            Self::NotFound => 404,
            Self::IllegalStateTransition => 409,
            Self::PreconditionFailed => 412,
            Self::InvalidObligation => 422,
            Self::Unavailable => 503,
        }
    }

    /// Returns `true` if the failure is transient.
    pub fn is_retryable(self) -> bool {
        matches!(self, Self::Unavailable)
    }
}

// ---------------------------------------------------------------------------
// Request
// ---------------------------------------------------------------------------

/// A player intent or room-management call.
///
/// Internally tagged: `{ "type": "ProposeAction", "room_id": 1, ... }`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Request {
    CreateRoom,

    AddPlayer {
        room_id: RoomId,
        player_id: PlayerId,
        player_name: String,
    },

    StartGame {
        room_id: RoomId,
        player_id: PlayerId,
    },

    ProposeAction {
        room_id: RoomId,
        player_id: PlayerId,
        action: Action,
        #[serde(default)]
        target_player: Option<String>,
    },

    RespondToAction {
        room_id: RoomId,
        player_id: PlayerId,
        response: Response,
        #[serde(default)]
        claimed_influence: Option<Influence>,
    },

    ResolveActionChallenge {
        room_id: RoomId,
        player_id: PlayerId,
        influence: Influence,
    },

    RespondToBlock {
        room_id: RoomId,
        player_id: PlayerId,
        response: Response,
    },

    ResolveBlockChallenge {
        room_id: RoomId,
        player_id: PlayerId,
        influence: Influence,
    },

    ResolveInfluenceLoss {
        room_id: RoomId,
        player_id: PlayerId,
        influence: Influence,
    },

    ResetGame {
        room_id: RoomId,
        player_id: PlayerId,
    },

    DestroyRoom {
        room_id: RoomId,
    },

    GetView {
        room_id: RoomId,
        player_id: PlayerId,
    },
}

impl Request {
    /// The room the request targets, if any.
    pub fn room_id(&self) -> Option<RoomId> {
        match self {
            Self::CreateRoom => None,
            Self::AddPlayer { room_id, .. }
            | Self::StartGame { room_id, .. }
            | Self::ProposeAction { room_id, .. }
            | Self::RespondToAction { room_id, .. }
            | Self::ResolveActionChallenge { room_id, .. }
            | Self::RespondToBlock { room_id, .. }
            | Self::ResolveBlockChallenge { room_id, .. }
            | Self::ResolveInfluenceLoss { room_id, .. }
            | Self::ResetGame { room_id, .. }
            | Self::DestroyRoom { room_id }
            | Self::GetView { room_id, .. } => Some(*room_id),
        }
    }
}

// ---------------------------------------------------------------------------
// Reply
// ---------------------------------------------------------------------------

/// The service's answer to a [`Request`].
///
/// Generic over the view type so this crate stays independent of the
/// game engine that produces views.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Reply<V> {
    RoomCreated { room_id: RoomId },
    View { view: V },
    Destroyed { room_id: RoomId },
    Error {
        kind: ErrorKind,
        code: u16,
        message: String,
        retryable: bool,
    },
}

impl<V> Reply<V> {
    /// Builds an error reply with the code and retry flag derived from `kind`.
    pub fn error(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self::Error {
            kind,
            code: kind.code(),
            message: message.into(),
            retryable: kind.is_retryable(),
        }
    }
}
