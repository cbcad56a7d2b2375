//! Per-player projection of a room.
//!
//! The server is the only party that knows every hand and the deck
//! order. Clients get a [`PublicRoomView`] in which other players'
//! cards are reduced to a count and the deck to its size.

use std::collections::{BTreeMap, VecDeque};

use intrigue_protocol::{Influence, PlayerId, RoomId};
use serde::{Deserialize, Serialize};

use crate::{
    GameState, LossObligation, PendingAction, PendingBlock, PendingChallenge, Phase,
};

/// One seat as seen by the viewer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublicPlayer {
    pub name: String,
    pub coins: u32,
    pub color: String,
    pub influence_count: usize,
    pub eliminated: bool,
    /// The actual cards, present only on the viewer's own seat.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub influences: Option<Vec<Influence>>,
}

/// A room with hidden information removed for one viewer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublicRoomView {
    pub room_id: RoomId,
    /// The viewer's own name, if they are seated.
    pub you: Option<String>,
    pub players: Vec<PublicPlayer>,
    pub deck_count: usize,
    pub is_started: bool,
    pub turn_player: Option<String>,
    pub phase: Phase,
    pub pending_action: Option<PendingAction>,
    pub pending_action_challenge: Option<PendingChallenge>,
    pub pending_block: Option<PendingBlock>,
    pub pending_block_challenge: Option<PendingChallenge>,
    pub pending_influence_loss: BTreeMap<String, VecDeque<LossObligation>>,
    pub event_log: Vec<String>,
    pub winner: Option<String>,
}

impl PublicRoomView {
    /// The viewer's seat, if any.
    pub fn me(&self) -> Option<&PublicPlayer> {
        let you = self.you.as_deref()?;
        self.players.iter().find(|p| p.name == you)
    }

    /// Looks up a seat by name.
    pub fn player(&self, name: &str) -> Option<&PublicPlayer> {
        self.players.iter().find(|p| p.name == name)
    }
}

/// Renders `state` for `viewer`. Never touches the source state.
pub fn project(state: &GameState, room_id: RoomId, viewer: &PlayerId) -> PublicRoomView {
    let players = state
        .players
        .iter()
        .map(|p| {
            let own = &p.id == viewer;
            PublicPlayer {
                name: p.name.clone(),
                coins: p.coins,
                color: p.color.clone(),
                influence_count: p.influences.len(),
                eliminated: p.is_eliminated(),
                influences: own.then(|| p.influences.clone()),
            }
        })
        .collect();

    PublicRoomView {
        room_id,
        you: state.player(viewer).ok().map(|p| p.name.clone()),
        players,
        deck_count: state.deck.len(),
        is_started: state.is_started,
        turn_player: state.turn_player.clone(),
        phase: state.phase(),
        pending_action: state.pending_action.clone(),
        pending_action_challenge: state.pending_action_challenge.clone(),
        pending_block: state.pending_block.clone(),
        pending_block_challenge: state.pending_block_challenge.clone(),
        pending_influence_loss: state.pending_influence_loss.clone(),
        event_log: state.event_log.clone(),
        winner: state.winner().map(str::to_string),
    }
}
