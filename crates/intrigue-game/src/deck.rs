//! The court deck: the shared pool of face-down influences.

use intrigue_protocol::Influence;
use rand::Rng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};

use crate::{GameError, ReturnPolicy};

/// An ordered pile of influences. Draws come off the front.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Deck {
    cards: Vec<Influence>,
}

impl Deck {
    /// Builds a deck with `copies` of every influence and shuffles it.
    pub fn shuffled<R: Rng + ?Sized>(copies: usize, rng: &mut R) -> Self {
        let mut cards: Vec<Influence> = Influence::ALL
            .into_iter()
            .flat_map(|influence| std::iter::repeat_n(influence, copies))
            .collect();
        cards.shuffle(rng);
        Self { cards }
    }

    /// Builds a deck in exactly the given order. Useful for scripted games.
    pub fn from_cards(cards: Vec<Influence>) -> Self {
        Self { cards }
    }

    /// Removes and returns the top card.
    pub fn draw(&mut self) -> Result<Influence, GameError> {
        if self.cards.is_empty() {
            return Err(GameError::DeckExhausted);
        }
        Ok(self.cards.remove(0))
    }

    /// Puts a card back according to `policy`.
    pub fn put_back<R: Rng + ?Sized>(
        &mut self,
        card: Influence,
        policy: ReturnPolicy,
        rng: &mut R,
    ) {
        self.cards.insert(0, card);
        if policy == ReturnPolicy::Reshuffle {
            self.cards.shuffle(rng);
        }
    }

    /// Number of cards left.
    pub fn len(&self) -> usize {
        self.cards.len()
    }

    /// Returns `true` if no cards are left.
    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    /// The cards in draw order.
    pub fn cards(&self) -> &[Influence] {
        &self.cards
    }
}
