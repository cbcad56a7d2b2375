//! Game engine for Intrigue, a bluffing card game for small rooms.
//!
//! This crate is pure and synchronous: a [`GameState`] plus the
//! transitions that move it along. It knows nothing about tasks or
//! sockets. Serializing access to a room is the room crate's job.
//!
//! # Key types
//!
//! - [`GameState`]: one room's roster, deck, turn, and pending protocol
//! - [`Phase`]: the resolution sub-state derived from the pending fields
//! - [`Deck`] / [`Player`]: the card pool and the seats
//! - [`PublicRoomView`] / [`project`]: what a given player is allowed to see
//! - [`RuleConfig`]: room rule parameters
//! - [`GameError`]: every refused move, classified by [`GameError::kind`]
//!
//! Transitions live in separate modules as `impl GameState` blocks:
//! `turn` (rotation), `loss` (influence-loss queue), and `resolution`
//! (propose / respond / challenge / block).

mod config;
mod deck;
mod error;
mod loss;
mod player;
mod resolution;
mod state;
mod turn;
mod view;

pub use config::{ReturnPolicy, RuleConfig};
pub use deck::Deck;
pub use error::GameError;
pub use player::{PALETTE, Player, validate_name};
pub use state::{GameState, LossObligation, PendingAction, PendingBlock, PendingChallenge, Phase};
pub use view::{PublicPlayer, PublicRoomView, project};
