//! Codec trait and the JSON implementation.
//!
//! The rest of the stack never calls `serde_json` directly — it goes
//! through [`Codec`], so the byte format stays swappable (a binary codec
//! would slot in without touching the dispatcher or the room layer).

use serde::{de::DeserializeOwned, Serialize};

use crate::ProtocolError;

/// Converts between Rust message types and raw bytes.
///
/// `Send + Sync + 'static` because the codec is stored in long-lived
/// server state shared across connection tasks.
pub trait Codec: Send + Sync + 'static {
    /// Serializes a value into bytes.
    fn encode<T: Serialize>(&self, value: &T) -> Result<Vec<u8>, ProtocolError>;

    /// Deserializes bytes back into a value.
    fn decode<T: DeserializeOwned>(&self, data: &[u8]) -> Result<T, ProtocolError>;
}

/// The JSON codec: the wire contract is flat JSON objects, so this is
/// the only codec the server ships.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonCodec;

impl Codec for JsonCodec {
    fn encode<T: Serialize>(&self, value: &T) -> Result<Vec<u8>, ProtocolError> {
        serde_json::to_vec(value).map_err(ProtocolError::Encode)
    }

    fn decode<T: DeserializeOwned>(&self, data: &[u8]) -> Result<T, ProtocolError> {
        serde_json::from_slice(data).map_err(ProtocolError::Decode)
    }
}
