//! Influence-loss obligations.
//!
//! One resolution can leave several players owing a card (a failed
//! challenge followed by an assassination, say), and an Exchange leaves
//! the actor owing two. Obligations are kept as a FIFO per player and
//! paid one card at a time.

use intrigue_protocol::{Influence, PlayerId};
use rand::Rng;

use crate::{GameError, GameState, LossObligation};

impl GameState {
    /// Queues one obligation for `player`.
    ///
    /// Players already out of the game owe nothing.
    pub fn oblige_loss(&mut self, player: &str, put_back_in_deck: bool) {
        let eliminated = self.player_named(player).is_none_or(|p| p.is_eliminated());
        if eliminated {
            return;
        }
        self.pending_influence_loss
            .entry(player.to_string())
            .or_default()
            .push_back(LossObligation { put_back_in_deck });
    }

    /// Pays the oldest obligation `player_id` owes with `chosen`.
    ///
    /// The card goes back into the deck when the obligation says so,
    /// otherwise it is discarded. If this leaves the player without
    /// influences, their remaining obligations are dropped and, if it
    /// was their turn, the turn passes on.
    pub fn resolve_loss<R: Rng + ?Sized>(
        &mut self,
        player_id: &PlayerId,
        chosen: Influence,
        rng: &mut R,
    ) -> Result<(), GameError> {
        let seat = self.seat_of(player_id)?;
        let name = self.players[seat].name.clone();

        let obligation = self
            .pending_influence_loss
            .get(&name)
            .and_then(|queue| queue.front().copied())
            .ok_or_else(|| GameError::NoObligation(name.clone()))?;

        let card = self.players[seat]
            .take(chosen)
            .ok_or_else(|| GameError::ObligationNotHeld {
                player: name.clone(),
                influence: chosen,
            })?;

        if obligation.put_back_in_deck {
            self.deck.put_back(card, self.rules.return_policy, rng);
            self.log(format!("{name} returned a card to the deck"));
        } else {
            self.log(format!("{name} lost their {card}"));
        }

        let drained = match self.pending_influence_loss.get_mut(&name) {
            Some(queue) => {
                queue.pop_front();
                queue.is_empty()
            }
            None => true,
        };
        if drained {
            self.pending_influence_loss.remove(&name);
        }

        if self.players[seat].is_eliminated() {
            self.pending_influence_loss.remove(&name);
            self.log(format!("{name} is out of the game"));
            if self.turn_player.as_deref() == Some(name.as_str()) {
                self.advance_turn();
            }
            if let Some(winner) = self.winner().map(str::to_string) {
                self.log(format!("{winner} wins the game"));
            }
        }
        Ok(())
    }
}
