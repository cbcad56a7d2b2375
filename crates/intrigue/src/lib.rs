//! # Intrigue
//!
//! Server-authoritative engine for Intrigue, a bluffing card game
//! played in small rooms.
//!
//! Each room is an actor that owns its game state. An [`IntrigueService`]
//! routes player intents to the right room, where they are applied one
//! at a time, and answers with a view that hides everything the caller
//! is not allowed to see.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use intrigue::prelude::*;
//!
//! # async fn demo() -> Result<(), IntrigueError> {
//! let service = IntrigueService::builder().build();
//! let room = service.create_room().await;
//!
//! service.add_player(room, PlayerId::new("p1"), "Ann").await?;
//! service.add_player(room, PlayerId::new("p2"), "Bea").await?;
//! let view = service.start_game(room, PlayerId::new("p1")).await?;
//! println!("{} goes first", view.turn_player.unwrap_or_default());
//! # Ok(())
//! # }
//! ```

mod error;
mod service;

pub use error::IntrigueError;
pub use service::{IntrigueService, IntrigueServiceBuilder};

pub use intrigue_game as game;
pub use intrigue_protocol as protocol;
pub use intrigue_room as room;

/// Installs a `tracing` subscriber that writes to stdout.
///
/// Filtering follows `RUST_LOG` and falls back to `default_filter`
/// (for example `"info"`). Returns `false` if a global subscriber was
/// already installed.
pub fn init_tracing(default_filter: &str) -> bool {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_filter));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init()
        .is_ok()
}

pub mod prelude {
    //! Everything needed to host rooms and drive games.

    pub use crate::{IntrigueError, IntrigueService, IntrigueServiceBuilder, init_tracing};
    pub use intrigue_game::{Deck, Phase, PublicPlayer, PublicRoomView, ReturnPolicy, RuleConfig};
    pub use intrigue_protocol::{
        Action, Codec, ErrorKind, Influence, JsonCodec, PlayerId, Reply, Request, Response,
        RoomId,
    };
    pub use intrigue_room::RoomConfig;
}
