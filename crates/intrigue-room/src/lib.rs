//! Room actors for Intrigue.
//!
//! Each room runs as an isolated Tokio task (actor model) that owns its
//! [`GameState`](intrigue_game::GameState). Changes arrive through a
//! bounded mailbox as synchronous [`Transition`]s, are tried on a working
//! copy, and are committed only if they succeed.
//!
//! # Key types
//!
//! - [`RoomManager`]: creates/destroys rooms, hands out handles
//! - [`RoomHandle`]: mutate, snapshot, or subscribe to a running room
//! - [`RoomConfig`]: mailbox size, rules, and RNG seed
//! - [`RoomError`]: missing room, unreachable room, or a refused move

mod config;
mod error;
mod manager;
mod room;

pub use config::{DEFAULT_CHANNEL_SIZE, RoomConfig};
pub use error::RoomError;
pub use manager::RoomManager;
pub use room::{RoomHandle, Transition};
