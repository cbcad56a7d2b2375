//! Error types for the game engine.

use intrigue_protocol::{Action, ErrorKind, Influence, PlayerId, Response};

/// Every way a game operation can be refused.
///
/// Each variant is a caller error; none are transient. Use
/// [`GameError::kind`] to map a variant onto the reporting taxonomy.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GameError {
    // -- Validation --
    /// The player id is not seated in this room.
    #[error("player {0} is not in this room")]
    PlayerNotInRoom(PlayerId),

    /// The named target is not seated in this room.
    #[error("unknown target player {0:?}")]
    UnknownTarget(String),

    /// The action needs a target and none was given.
    #[error("{0} requires a target player")]
    TargetRequired(Action),

    /// The action takes no target but one was given.
    #[error("{0} does not take a target player")]
    TargetNotAllowed(Action),

    /// A player tried to target themselves.
    #[error("you cannot target yourself")]
    SelfTarget,

    /// A block was attempted without naming the influence claimed.
    #[error("a block must claim an influence")]
    ClaimRequired,

    /// The player name is empty or too long.
    #[error("invalid player name: {0}")]
    InvalidName(String),

    // -- Precondition --
    /// All seats are taken.
    #[error("room is full")]
    RoomFull,

    /// Players can no longer join.
    #[error("game has already started")]
    AlreadyStarted,

    /// Another player already uses this name (case-insensitive).
    #[error("room already has a player named {0}")]
    DuplicateName(String),

    /// The name collides with an influence.
    #[error("{0} is a reserved name")]
    ReservedName(String),

    /// The player id is seated under a different name.
    #[error("previously joined as {0}")]
    NameMismatch(String),

    /// Too few players to start.
    #[error("need at least {required} players to start, have {current}")]
    NotEnoughPlayers { required: usize, current: usize },

    /// The actor cannot pay for the action.
    #[error("{action} costs {required} coins, you have {available}")]
    InsufficientCoins {
        action: Action,
        required: u32,
        available: u32,
    },

    /// The actor is rich enough that only a Coup is allowed.
    #[error("with {0} coins you must Coup")]
    MustCoup(u32),

    /// The player has no influences left.
    #[error("{0} has been eliminated")]
    Eliminated(String),

    /// The target has no influences left.
    #[error("{0} is already out of the game")]
    TargetEliminated(String),

    /// The claimed influence does not block the pending action.
    #[error("{influence} cannot block {action}")]
    ClaimCannotBlock { influence: Influence, action: Action },

    /// A revealed influence is not in the player's hand.
    #[error("you don't have {0}")]
    InfluenceNotHeld(Influence),

    /// The deck ran out of cards.
    #[error("the deck is empty")]
    DeckExhausted,

    // -- Illegal state transition --
    /// The game has not started yet.
    #[error("game has not started")]
    NotStarted,

    /// Only one player is left standing.
    #[error("game is over")]
    GameOver,

    /// Someone else holds the turn.
    #[error("it is {0}'s turn")]
    NotYourTurn(String),

    /// A resolution is already underway.
    #[error("you can't choose an action right now")]
    ActionInProgress,

    /// Influence-loss choices must be made before the next action.
    #[error("waiting for players to lose influence")]
    InfluenceLossPending,

    /// No action is awaiting responses.
    #[error("there is no action to respond to")]
    NoPendingAction,

    /// No challenge against the action is awaiting a reveal.
    #[error("there is no challenge to answer")]
    NoPendingActionChallenge,

    /// No block is awaiting responses.
    #[error("there is no block to respond to")]
    NoPendingBlock,

    /// No challenge against the block is awaiting a reveal.
    #[error("there is no block challenge to answer")]
    NoPendingBlockChallenge,

    /// The player is not among those who still owe a response.
    #[error("{0} is not waiting to respond")]
    NotAwaitingResponse(String),

    /// Only a specific player may make this move.
    #[error("only {0} can do that")]
    WrongPlayer(String),

    /// The response is not permitted against this action.
    #[error("{action} cannot be answered with {response}")]
    ResponseNotAllowed { action: Action, response: Response },

    /// Blocks themselves cannot be blocked.
    #[error("you can't block a block")]
    CannotBlockBlock,

    /// The game is still running, so it cannot be reset.
    #[error("current game is not over")]
    GameInProgress,

    // -- Invalid obligation --
    /// The player owes no influence.
    #[error("{0} can't lose influence right now")]
    NoObligation(String),

    /// The player owes an influence but does not hold the one chosen.
    #[error("{player} doesn't have {influence} to lose")]
    ObligationNotHeld { player: String, influence: Influence },
}

impl GameError {
    /// The reporting class of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::PlayerNotInRoom(_)
            | Self::UnknownTarget(_)
            | Self::TargetRequired(_)
            | Self::TargetNotAllowed(_)
            | Self::SelfTarget
            | Self::ClaimRequired
            | Self::InvalidName(_) => ErrorKind::Validation,

            Self::RoomFull
            | Self::AlreadyStarted
            | Self::DuplicateName(_)
            | Self::ReservedName(_)
            | Self::NameMismatch(_)
            | Self::NotEnoughPlayers { .. }
            | Self::InsufficientCoins { .. }
            | Self::MustCoup(_)
            | Self::Eliminated(_)
            | Self::TargetEliminated(_)
            | Self::ClaimCannotBlock { .. }
            | Self::InfluenceNotHeld(_)
            | Self::DeckExhausted => ErrorKind::PreconditionFailed,

            Self::NotStarted
            | Self::GameOver
            | Self::NotYourTurn(_)
            | Self::ActionInProgress
            | Self::InfluenceLossPending
            | Self::NoPendingAction
            | Self::NoPendingActionChallenge
            | Self::NoPendingBlock
            | Self::NoPendingBlockChallenge
            | Self::NotAwaitingResponse(_)
            | Self::WrongPlayer(_)
            | Self::ResponseNotAllowed { .. }
            | Self::CannotBlockBlock
            | Self::GameInProgress => ErrorKind::IllegalStateTransition,

            Self::NoObligation(_) | Self::ObligationNotHeld { .. } => {
                ErrorKind::InvalidObligation
            }
        }
    }
}
