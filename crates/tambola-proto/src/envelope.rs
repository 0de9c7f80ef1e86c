//! JSON text envelope.
//!
//! Inbound decoding runs in two steps so an unknown tag can be told apart
//! from a broken payload: the text is parsed as a generic JSON value, the tag
//! is checked against [`ServerEvent::TAGS`], and only then is the payload
//! decoded into its typed shape.

use serde_json::Value;

use crate::{ClientMessage, ProtocolError, ServerEvent};

/// Extract the `type` tag from a parsed envelope.
fn envelope_tag(value: &Value) -> Result<String, ProtocolError> {
    value.get("type").and_then(Value::as_str).map(str::to_owned).ok_or(ProtocolError::MissingTag)
}

impl ServerEvent {
    /// Decode one text frame.
    ///
    /// Returns `Ok(None)` when the envelope is well formed but carries a tag
    /// this client does not recognize.
    pub fn decode(text: &str) -> Result<Option<Self>, ProtocolError> {
        let value: Value = serde_json::from_str(text)?;
        let tag = envelope_tag(&value)?;

        if !Self::TAGS.contains(&tag.as_str()) {
            return Ok(None);
        }

        serde_json::from_value(value)
            .map(Some)
            .map_err(|e| ProtocolError::InvalidPayload { tag, reason: e.to_string() })
    }

    /// Encode as one text frame.
    pub fn encode(&self) -> Result<String, ProtocolError> {
        serde_json::to_string(self).map_err(|e| ProtocolError::Encode(e.to_string()))
    }
}

impl ClientMessage {
    /// Encode as one text frame.
    pub fn encode(&self) -> Result<String, ProtocolError> {
        serde_json::to_string(self).map_err(|e| ProtocolError::Encode(e.to_string()))
    }

    /// Decode one text frame sent by a client.
    pub fn decode(text: &str) -> Result<Self, ProtocolError> {
        let value: Value = serde_json::from_str(text)?;
        let tag = envelope_tag(&value)?;

        serde_json::from_value(value)
            .map_err(|e| ProtocolError::InvalidPayload { tag, reason: e.to_string() })
    }
}
