//! Error types for the session layer.

use trioforge_protocol::{ErrorCode, SeatId};

/// Errors that can occur while managing seat bindings.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// No binding exists for the given seat.
    #[error("no session for seat {0}")]
    NotFound(SeatId),

    /// The resume token doesn't match anything the server issued —
    /// stale, mistyped, or a guess.
    #[error("invalid resume token")]
    InvalidToken,

    /// The grace period elapsed before the player came back.
    #[error("session expired for seat {0}")]
    Expired(SeatId),

    /// The seat already has a live connection; a second endpoint may
    /// not claim it.
    #[error("seat {0} is already connected")]
    AlreadyConnected(SeatId),
}

impl SessionError {
    /// The stable wire code for this error.
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::NotFound(_) => ErrorCode::NotFound,
            Self::InvalidToken => ErrorCode::Forbidden,
            Self::Expired(_) => ErrorCode::Expired,
            Self::AlreadyConnected(_) => ErrorCode::Conflict,
        }
    }
}
