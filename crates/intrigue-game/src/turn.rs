//! Turn rotation.

use crate::GameState;

impl GameState {
    /// The next player to act after the current turn player.
    ///
    /// Scans the seats cyclically starting one past the current turn
    /// player (seat 0 when nobody holds the turn) and returns the first
    /// player still in the game. The current turn player is considered
    /// last, so a lone survivor keeps the turn. `None` only when nobody
    /// is left.
    pub fn next_turn(&self) -> Option<String> {
        let seats = self.players.len();
        if seats == 0 {
            return None;
        }
        let start = self
            .turn_player
            .as_deref()
            .and_then(|name| self.seat_named(name))
            .map_or(0, |seat| seat + 1);

        (0..seats)
            .map(|offset| &self.players[(start + offset) % seats])
            .find(|p| !p.is_eliminated())
            .map(|p| p.name.clone())
    }

    /// Drops every pending resolution record.
    pub(crate) fn clear_pending(&mut self) {
        self.pending_action = None;
        self.pending_action_challenge = None;
        self.pending_block = None;
        self.pending_block_challenge = None;
    }

    /// Ends the current resolution and hands the turn on.
    pub(crate) fn advance_turn(&mut self) {
        self.clear_pending();
        if let Some(next) = self.next_turn() {
            tracing::trace!(from = ?self.turn_player, to = %next, "turn advanced");
            self.turn_player = Some(next);
        }
    }
}
