//! Identity types and the fixed game roster.
//!
//! Everything here is immutable reference data: the five influences,
//! the seven actions, and the three responses. The rule tables that a
//! dynamic implementation would keep in string-keyed maps are expressed
//! as exhaustive `match`es, so adding a variant fails to compile until
//! every rule accessor handles it.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::ProtocolError;

// ---------------------------------------------------------------------------
// Identity types
// ---------------------------------------------------------------------------

/// Opaque identifier for a player, issued by whoever fronts the service.
///
/// The engine never generates these. It only compares them, so a UUID,
/// a session token, or an auth subject all work. `#[serde(transparent)]`
/// keeps the JSON form a plain string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlayerId(pub String);

impl PlayerId {
    /// Creates a player id from anything string-like.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the id as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "P-{}", self.0)
    }
}

/// Identifier for a room (one isolated game instance).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RoomId(pub u64);

impl fmt::Display for RoomId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "R-{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// Action
// ---------------------------------------------------------------------------

/// A turn-taking move, proposable only by the current turn player.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Action {
    Income,
    ForeignAid,
    Coup,
    Tax,
    Assassinate,
    Steal,
    Exchange,
}

impl Action {
    /// Every action, in roster order.
    pub const ALL: [Action; 7] = [
        Action::Income,
        Action::ForeignAid,
        Action::Coup,
        Action::Tax,
        Action::Assassinate,
        Action::Steal,
        Action::Exchange,
    ];

    /// Coins the actor must hold to propose this action.
    pub fn coins_required(self) -> u32 {
        match self {
            Self::Coup => 7,
            Self::Assassinate => 3,
            Self::Income
            | Self::ForeignAid
            | Self::Tax
            | Self::Steal
            | Self::Exchange => 0,
        }
    }

    /// Whether another player may block this action with a claimed influence.
    pub fn blockable(self) -> bool {
        match self {
            Self::ForeignAid | Self::Assassinate | Self::Steal => true,
            Self::Income | Self::Coup | Self::Tax | Self::Exchange => false,
        }
    }

    /// Whether another player may challenge the actor's implied claim.
    pub fn challengeable(self) -> bool {
        match self {
            Self::Tax | Self::Assassinate | Self::Steal | Self::Exchange => true,
            Self::Income | Self::ForeignAid | Self::Coup => false,
        }
    }

    /// Whether the action names a target player.
    pub fn requires_target(self) -> bool {
        match self {
            Self::Coup | Self::Assassinate | Self::Steal => true,
            Self::Income | Self::ForeignAid | Self::Tax | Self::Exchange => false,
        }
    }

    /// Actions that resolve the moment they are proposed.
    pub fn is_immediate(self) -> bool {
        !self.blockable() && !self.challengeable()
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Income => "Income",
            Self::ForeignAid => "Foreign Aid",
            Self::Coup => "Coup",
            Self::Tax => "Tax",
            Self::Assassinate => "Assassinate",
            Self::Steal => "Steal",
            Self::Exchange => "Exchange",
        };
        f.write_str(name)
    }
}

// ---------------------------------------------------------------------------
// Influence
// ---------------------------------------------------------------------------

/// An influence card. Holding one entitles its action and/or block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Influence {
    Assassin,
    Contessa,
    Captain,
    Ambassador,
    Duke,
}

impl Influence {
    /// Every influence, in roster order. The deck holds copies of each.
    pub const ALL: [Influence; 5] = [
        Influence::Assassin,
        Influence::Contessa,
        Influence::Captain,
        Influence::Ambassador,
        Influence::Duke,
    ];

    /// The action this influence entitles its holder to take.
    pub fn legal_action(self) -> Option<Action> {
        match self {
            Self::Assassin => Some(Action::Assassinate),
            Self::Captain => Some(Action::Steal),
            Self::Ambassador => Some(Action::Exchange),
            Self::Duke => Some(Action::Tax),
            Self::Contessa => None,
        }
    }

    /// The action this influence entitles its holder to block.
    pub fn legal_block(self) -> Option<Action> {
        match self {
            Self::Contessa => Some(Action::Assassinate),
            Self::Captain | Self::Ambassador => Some(Action::Steal),
            Self::Duke => Some(Action::ForeignAid),
            Self::Assassin => None,
        }
    }

    /// Returns `true` if this influence may block `action`.
    pub fn can_block(self, action: Action) -> bool {
        self.legal_block() == Some(action)
    }

    /// The card's name as printed.
    pub fn name(self) -> &'static str {
        match self {
            Self::Assassin => "Assassin",
            Self::Contessa => "Contessa",
            Self::Captain => "Captain",
            Self::Ambassador => "Ambassador",
            Self::Duke => "Duke",
        }
    }
}

impl fmt::Display for Influence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Case-insensitive parse, also used to reject player names that
/// collide with a card name.
impl FromStr for Influence {
    type Err = ProtocolError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|influence| influence.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| {
                ProtocolError::InvalidMessage(format!("unknown influence {s:?}"))
            })
    }
}

// ---------------------------------------------------------------------------
// Response
// ---------------------------------------------------------------------------

/// What a non-acting player does about a pending action or block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Response {
    Pass,
    Challenge,
    Block,
}

impl fmt::Display for Response {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pass => f.write_str("Pass"),
            Self::Challenge => f.write_str("Challenge"),
            Self::Block => f.write_str("Block"),
        }
    }
}

// =========================================================================
// Tests
// =========================================================================
