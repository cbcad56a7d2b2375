//! Error types for the protocol layer.
//!
//! A `ProtocolError` always means the bytes or text coming in were
//! unusable: the game engine never sees the request.

/// Errors that can occur while encoding, decoding, or parsing wire data.
#[derive(Debug, thiserror::Error)]
pub enum ProtocolError {
    /// Serialization failed.
    #[cfg(feature = "json")]
    #[error("encode failed: {0}")]
    Encode(serde_json::Error),

    /// Deserialization failed: malformed JSON, a missing field, or an
    /// unknown action/influence/response name.
    #[cfg(feature = "json")]
    #[error("decode failed: {0}")]
    Decode(serde_json::Error),

    /// Well-formed input that still names something that doesn't exist.
    #[error("invalid message: {0}")]
    InvalidMessage(String),
}
