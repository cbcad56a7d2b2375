//! Wire vocabulary for Intrigue.
//!
//! - **Types** ([`Influence`], [`Action`], [`Response`], [`PlayerId`],
//!   [`RoomId`]): the closed roster of cards and moves, plus identities.
//! - **Messages** ([`Request`], [`Reply`], [`ErrorKind`]): what a
//!   transport adapter decodes and encodes.
//! - **Codec** ([`Codec`] trait, [`JsonCodec`]): bytes in, bytes out.
//!
//! ```text
//! Transport (bytes) → Protocol (Request) → Service → Room actor
//! ```

mod codec;
mod error;
mod message;
mod types;

pub use codec::Codec;
#[cfg(feature = "json")]
pub use codec::JsonCodec;
pub use error::ProtocolError;
pub use message::{ErrorKind, Reply, Request};
pub use types::{Action, Influence, PlayerId, Response, RoomId};
