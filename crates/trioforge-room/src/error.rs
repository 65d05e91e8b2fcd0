//! Error types for the room layer.

use trioforge_game::GameError;
use trioforge_protocol::{ErrorCode, RoomId, SeatId};

/// Errors that can occur during room and lobby operations.
#[derive(Debug, thiserror::Error)]
pub enum RoomError {
    /// The room does not exist (or its actor is gone).
    #[error("room {0} not found")]
    NotFound(RoomId),

    /// Every seat is taken.
    #[error("room {0} is full")]
    Full(RoomId),

    /// The room's TTL has passed.
    #[error("room {0} has expired")]
    Expired(RoomId),

    /// A match is (or was) running; the room no longer accepts joins.
    #[error("room {0} already has a game in progress")]
    InProgress(RoomId),

    /// Private-room access code mismatch.
    #[error("invalid access code for room {0}")]
    InvalidCode(RoomId),

    /// The caller is already seated in a room.
    #[error("already seated in room {0}")]
    AlreadyIn(RoomId),

    /// The color palette is exhausted.
    #[error("no colors left in room {0}")]
    NoColor(RoomId),

    /// The host already has a live room.
    #[error("host already has an open room")]
    HostBusy,

    /// The seat is not part of this room.
    #[error("seat {0} is not in room {1}")]
    NotInRoom(SeatId, RoomId),

    /// No replay vote is currently open.
    #[error("no replay vote is active")]
    VoteNotActive,

    /// The seat is not in the vote's voter set.
    #[error("seat {0} is not in the voter set")]
    NotAVoter(SeatId),

    /// Malformed creation or join input.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// The room's command channel is closed — the actor is shutting
    /// down or already gone.
    #[error("room {0} is unavailable")]
    Unavailable(RoomId),

    /// A rule rejection from the match engine.
    #[error(transparent)]
    Game(#[from] GameError),
}

impl RoomError {
    /// The stable wire code for this error.
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::NotFound(_) | Self::Unavailable(_) => ErrorCode::NotFound,
            Self::Full(_)
            | Self::InProgress(_)
            | Self::AlreadyIn(_)
            | Self::NoColor(_)
            | Self::HostBusy => ErrorCode::Conflict,
            Self::Expired(_) => ErrorCode::Expired,
            Self::InvalidCode(_) => ErrorCode::InvalidCode,
            Self::NotInRoom(_, _) | Self::NotAVoter(_) => ErrorCode::Forbidden,
            Self::VoteNotActive => ErrorCode::Unavailable,
            Self::InvalidInput(_) => ErrorCode::InvalidInput,
            Self::Game(e) => e.code(),
        }
    }
}
