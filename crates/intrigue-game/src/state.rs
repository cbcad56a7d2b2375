//! The room aggregate: roster, deck, turn, and pending resolution state.

use std::collections::{BTreeMap, BTreeSet, VecDeque};
use std::fmt;

use intrigue_protocol::{Action, Influence, PlayerId};
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::player::{seat_color, validate_name};
use crate::{Deck, GameError, Player, RuleConfig};

// ---------------------------------------------------------------------------
// Pending sub-state records
// ---------------------------------------------------------------------------

/// An action waiting on responses (or on a challenge/block it provoked).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingAction {
    pub action: Action,
    pub target_player: Option<String>,
    /// Names of players who still owe a response.
    pub pending_players: BTreeSet<String>,
}

/// A challenge waiting for the challenged player to reveal a card.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingChallenge {
    pub source_player: String,
}

/// A block waiting on responses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingBlock {
    pub source_player: String,
    pub claimed_influence: Influence,
}

/// One "choose a card to lose" debt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LossObligation {
    /// `true` when the card goes back into the deck (Exchange) rather
    /// than out of the game.
    pub put_back_in_deck: bool,
}

// ---------------------------------------------------------------------------
// Phase
// ---------------------------------------------------------------------------

/// The active resolution sub-state, derived from the pending fields.
///
/// ```text
/// Idle → ActionProposed → ActionChallenged ──────────────→ Idle
///                       └→ BlockProposed → BlockChallenged → Idle
/// ```
///
/// Outstanding influence-loss obligations overlay any phase; see
/// [`GameState::has_pending_loss`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Phase {
    Idle,
    ActionProposed,
    ActionChallenged,
    BlockProposed,
    BlockChallenged,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Idle => write!(f, "Idle"),
            Self::ActionProposed => write!(f, "ActionProposed"),
            Self::ActionChallenged => write!(f, "ActionChallenged"),
            Self::BlockProposed => write!(f, "BlockProposed"),
            Self::BlockChallenged => write!(f, "BlockChallenged"),
        }
    }
}

// ---------------------------------------------------------------------------
// GameState
// ---------------------------------------------------------------------------

/// Everything about one room's game. Owned by exactly one room actor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameState {
    /// Seat order is join order, which is also turn order.
    pub players: Vec<Player>,
    pub deck: Deck,
    pub is_started: bool,
    /// Name of the player whose turn it is, once started.
    pub turn_player: Option<String>,
    pub pending_action: Option<PendingAction>,
    pub pending_action_challenge: Option<PendingChallenge>,
    pub pending_block: Option<PendingBlock>,
    pub pending_block_challenge: Option<PendingChallenge>,
    /// FIFO of obligations per player name. Empty queues are removed.
    pub pending_influence_loss: BTreeMap<String, VecDeque<LossObligation>>,
    /// Append-only, visible to everyone.
    pub event_log: Vec<String>,
    pub rules: RuleConfig,
}

impl GameState {
    /// An empty, unstarted room with a freshly shuffled deck.
    pub fn new<R: Rng + ?Sized>(rules: RuleConfig, rng: &mut R) -> Self {
        let deck = Deck::shuffled(rules.copies_per_influence, rng);
        Self::with_deck(rules, deck)
    }

    /// An empty room dealing from a deck in a known order.
    pub fn with_deck(rules: RuleConfig, deck: Deck) -> Self {
        Self {
            players: Vec::new(),
            deck,
            is_started: false,
            turn_player: None,
            pending_action: None,
            pending_action_challenge: None,
            pending_block: None,
            pending_block_challenge: None,
            pending_influence_loss: BTreeMap::new(),
            event_log: Vec::new(),
            rules,
        }
    }

    /// Appends a line to the public event log.
    pub fn log(&mut self, event: impl Into<String>) {
        self.event_log.push(event.into());
    }

    // -- Lookups --

    pub fn seat_of(&self, id: &PlayerId) -> Result<usize, GameError> {
        self.players
            .iter()
            .position(|p| &p.id == id)
            .ok_or_else(|| GameError::PlayerNotInRoom(id.clone()))
    }

    pub fn player(&self, id: &PlayerId) -> Result<&Player, GameError> {
        self.seat_of(id).map(|seat| &self.players[seat])
    }

    pub fn player_named(&self, name: &str) -> Option<&Player> {
        self.players.iter().find(|p| p.name == name)
    }

    pub(crate) fn seat_named(&self, name: &str) -> Option<usize> {
        self.players.iter().position(|p| p.name == name)
    }

    /// Seat of a player who is still in the game.
    pub(crate) fn active_seat(&self, id: &PlayerId) -> Result<usize, GameError> {
        let seat = self.seat_of(id)?;
        if self.players[seat].is_eliminated() {
            return Err(GameError::Eliminated(self.players[seat].name.clone()));
        }
        Ok(seat)
    }

    /// Players still holding at least one influence.
    pub fn survivors(&self) -> impl Iterator<Item = &Player> {
        self.players.iter().filter(|p| !p.is_eliminated())
    }

    /// The last player standing, once a started game is down to one.
    pub fn winner(&self) -> Option<&str> {
        if !self.is_started || self.players.len() < 2 {
            return None;
        }
        let mut survivors = self.survivors();
        match (survivors.next(), survivors.next()) {
            (Some(last), None) => Some(last.name.as_str()),
            _ => None,
        }
    }

    /// Returns `true` once at most one player is left in a started game.
    pub fn is_over(&self) -> bool {
        self.is_started && self.survivors().count() <= 1
    }

    /// The active resolution sub-state.
    pub fn phase(&self) -> Phase {
        match (
            &self.pending_action,
            &self.pending_action_challenge,
            &self.pending_block,
            &self.pending_block_challenge,
        ) {
            (None, ..) => Phase::Idle,
            (Some(_), Some(_), _, _) => Phase::ActionChallenged,
            (Some(_), None, Some(_), Some(_)) => Phase::BlockChallenged,
            (Some(_), None, Some(_), None) => Phase::BlockProposed,
            (Some(_), None, None, _) => Phase::ActionProposed,
        }
    }

    /// Returns `true` while anyone still owes an influence.
    pub fn has_pending_loss(&self) -> bool {
        !self.pending_influence_loss.is_empty()
    }

    // -- Lifecycle --

    /// Seats a player and deals them in.
    ///
    /// Re-adding an already seated id under the same name is a no-op,
    /// so clients can rejoin after a reload.
    pub fn add_player(&mut self, id: PlayerId, raw_name: &str) -> Result<(), GameError> {
        if let Some(existing) = self.players.iter().find(|p| p.id == id) {
            if existing.is_named(raw_name.trim()) {
                return Ok(());
            }
            return Err(GameError::NameMismatch(existing.name.clone()));
        }
        if self.players.len() >= self.rules.max_players {
            return Err(GameError::RoomFull);
        }
        if self.is_started {
            return Err(GameError::AlreadyStarted);
        }

        let name = validate_name(raw_name, &self.rules)?;
        if self.players.iter().any(|p| p.is_named(&name)) {
            return Err(GameError::DuplicateName(name));
        }
        if self.deck.len() < self.rules.hand_size {
            return Err(GameError::DeckExhausted);
        }

        let mut influences = Vec::with_capacity(self.rules.hand_size);
        for _ in 0..self.rules.hand_size {
            influences.push(self.deck.draw()?);
        }
        let seat = self.players.len();
        self.players.push(Player {
            id,
            name: name.clone(),
            coins: self.rules.starting_coins,
            influences,
            color: seat_color(seat),
        });
        self.log(format!("{name} joined the game"));
        Ok(())
    }

    /// Starts the game with a uniformly random first player.
    ///
    /// Calling this on a started game changes nothing.
    pub fn start<R: Rng + ?Sized>(&mut self, by: &PlayerId, rng: &mut R) -> Result<(), GameError> {
        self.seat_of(by)?;
        if self.is_started {
            return Ok(());
        }
        if self.players.len() < self.rules.min_players_to_start {
            return Err(GameError::NotEnoughPlayers {
                required: self.rules.min_players_to_start,
                current: self.players.len(),
            });
        }

        let first = rng.random_range(0..self.players.len());
        self.is_started = true;
        self.turn_player = Some(self.players[first].name.clone());
        self.log("Game has started");
        Ok(())
    }

    /// Sets the table up for another game with the same players.
    ///
    /// Allowed before the game starts or once it is over. The event log
    /// is kept so the previous game's history remains visible.
    pub fn reset<R: Rng + ?Sized>(&mut self, by: &PlayerId, rng: &mut R) -> Result<(), GameError> {
        self.seat_of(by)?;
        if self.is_started && !self.is_over() {
            return Err(GameError::GameInProgress);
        }

        self.deck = Deck::shuffled(self.rules.copies_per_influence, rng);
        for seat in 0..self.players.len() {
            let mut hand = Vec::with_capacity(self.rules.hand_size);
            for _ in 0..self.rules.hand_size {
                hand.push(self.deck.draw()?);
            }
            let player = &mut self.players[seat];
            player.influences = hand;
            player.coins = self.rules.starting_coins;
        }
        self.clear_pending();
        self.pending_influence_loss.clear();
        self.is_started = false;
        self.turn_player = None;
        self.log("Game has been reset");
        Ok(())
    }
}
