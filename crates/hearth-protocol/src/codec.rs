//! Codec trait and implementations for serializing/deserializing messages.
//!
//! The transport and handler layers don't care how messages become bytes —
//! they go through the [`Codec`] trait. [`JsonCodec`] is the default
//! (human-readable, inspectable in browser devtools); a binary codec can
//! be added later without touching any other layer.

use serde::{Serialize, de::DeserializeOwned};

use crate::ProtocolError;

/// Encodes values to bytes and decodes bytes back.
///
/// `Send + Sync + 'static` because the codec is shared across connection
/// handler tasks for the lifetime of the server. `DeserializeOwned` (vs
/// plain `Deserialize`) means decoded values own their data, so the input
/// buffer can be dropped immediately after decoding.
pub trait Codec: Send + Sync + 'static {
    /// Serializes a value into bytes.
    ///
    /// # Errors
    /// Returns [`ProtocolError::Encode`] if serialization fails.
    fn encode<T: Serialize>(&self, value: &T) -> Result<Vec<u8>, ProtocolError>;

    /// Deserializes bytes back into a value.
    ///
    /// # Errors
    /// Returns [`ProtocolError::Decode`] if the bytes are malformed,
    /// truncated, or don't match the expected shape.
    fn decode<T: DeserializeOwned>(&self, data: &[u8]) -> Result<T, ProtocolError>;
}

// ---------------------------------------------------------------------------
// JsonCodec
// ---------------------------------------------------------------------------

/// A [`Codec`] backed by `serde_json`.
///
/// Behind the `json` feature flag (enabled by default).
#[cfg(feature = "json")]
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonCodec;

#[cfg(feature = "json")]
impl Codec for JsonCodec {
    fn encode<T: Serialize>(&self, value: &T) -> Result<Vec<u8>, ProtocolError> {
        serde_json::to_vec(value).map_err(ProtocolError::Encode)
    }

    fn decode<T: DeserializeOwned>(&self, data: &[u8]) -> Result<T, ProtocolError> {
        serde_json::from_slice(data).map_err(ProtocolError::Decode)
    }
}

#[cfg(all(test, feature = "json"))]
mod tests {
    use super::*;
    use crate::{Event, RoomCode};

    #[test]
    fn test_json_codec_encode_decode_event() {
        let codec = JsonCodec;
        let event = Event::RoomCreated {
            room_id: RoomCode::new("ABC123"),
        };

        let bytes = codec.encode(&event).unwrap();
        let decoded: Event = codec.decode(&bytes).unwrap();

        assert_eq!(event, decoded);
    }

    #[test]
    fn test_json_codec_decode_garbage_returns_error() {
        let codec = JsonCodec;
        let result: Result<Event, _> = codec.decode(b"not json at all");
        assert!(matches!(result, Err(ProtocolError::Decode(_))));
    }

    #[test]
    fn test_json_codec_decode_wrong_shape_returns_error() {
        // Valid JSON, but not an Event.
        let codec = JsonCodec;
        let result: Result<Event, _> = codec.decode(br#"{"name": "hello"}"#);
        assert!(matches!(result, Err(ProtocolError::Decode(_))));
    }
}
