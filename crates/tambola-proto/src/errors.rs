//! Protocol error types.

use thiserror::Error;

/// Errors raised while decoding or encoding a message envelope.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProtocolError {
    /// Text is not valid JSON.
    #[error("malformed json: {0}")]
    Json(String),

    /// Envelope has no string `type` field.
    #[error("envelope has no type tag")]
    MissingTag,

    /// Tag is known but the payload does not match its shape.
    #[error("invalid payload for {tag}: {reason}")]
    InvalidPayload {
        /// Envelope tag that was being decoded.
        tag: String,
        /// Underlying decoder message.
        reason: String,
    },

    /// Message could not be serialized.
    #[error("encode failed: {0}")]
    Encode(String),
}

impl From<serde_json::Error> for ProtocolError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err.to_string())
    }
}
