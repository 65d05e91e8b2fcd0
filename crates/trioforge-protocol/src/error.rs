//! Protocol-layer errors and the stable error codes clients see.

use serde::{Deserialize, Serialize};

/// The stable code carried in every `*-error` message.
///
/// Codes are part of the wire contract: clients branch on them, so they
/// serialize as the PascalCase variant name and never change meaning.
/// The human-readable `message` next to them is free-form and may.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ErrorCode {
    /// Malformed payload: out-of-range cell, empty nickname, bad code
    /// length, capacity outside 2..=4.
    InvalidInput,
    /// Unknown room id.
    NotFound,
    /// The caller may not do this: wrong turn, not in the room, not in
    /// the voter set.
    Forbidden,
    /// State conflict: room full, already seated, host already has a
    /// room, palette exhausted.
    Conflict,
    /// A rule violation: the size slot is occupied or the inventory for
    /// that size is empty.
    IllegalMove,
    /// The room's TTL passed, or the vote window already closed.
    Expired,
    /// Private-room access code mismatch.
    InvalidCode,
    /// The operation needs a state the room is not in (moves outside
    /// `playing`, votes outside an open window).
    Unavailable,
    /// Unexpected server-side failure; the connection may be closed.
    Internal,
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::InvalidInput => "InvalidInput",
            Self::NotFound => "NotFound",
            Self::Forbidden => "Forbidden",
            Self::Conflict => "Conflict",
            Self::IllegalMove => "IllegalMove",
            Self::Expired => "Expired",
            Self::InvalidCode => "InvalidCode",
            Self::Unavailable => "Unavailable",
            Self::Internal => "Internal",
        };
        f.write_str(s)
    }
}

/// Errors raised while encoding or decoding wire messages.
#[derive(Debug, thiserror::Error)]
pub enum ProtocolError {
    /// Serialization failed (a Rust value could not become JSON).
    #[error("encode failed: {0}")]
    Encode(serde_json::Error),

    /// Deserialization failed: malformed JSON, a missing field, or an
    /// unknown `type` tag.
    #[error("decode failed: {0}")]
    Decode(serde_json::Error),

    /// The message parsed but violates the protocol (e.g. a non-text
    /// frame where JSON was required).
    #[error("invalid message: {0}")]
    InvalidMessage(String),
}
