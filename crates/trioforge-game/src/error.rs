//! Error types for the game layer.

use trioforge_protocol::{ErrorCode, PieceSize};

/// Errors raised by the match engine when a move is rejected.
///
/// Every rejection leaves the match and all seats untouched — the engine
/// validates fully before mutating anything.
#[derive(Debug, thiserror::Error)]
pub enum GameError {
    /// The match already finished (or never started).
    #[error("match is not in progress")]
    MatchOver,

    /// A seat tried to move outside its turn.
    #[error("it is not this seat's turn")]
    NotYourTurn,

    /// An eliminated seat tried to move.
    #[error("seat is eliminated")]
    SeatEliminated,

    /// The seat id is not part of this match.
    #[error("seat is not part of this match")]
    UnknownSeat,

    /// Cell index outside 0..=8.
    #[error("cell index {0} out of range")]
    CellOutOfRange(u8),

    /// The seat has no pieces of the requested size left.
    #[error("no {0} pieces remaining")]
    OutOfPieces(PieceSize),

    /// The target size slot already holds a piece.
    #[error("size slot already occupied")]
    SlotOccupied,
}

impl GameError {
    /// The stable wire code for this error.
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::MatchOver => ErrorCode::Unavailable,
            Self::NotYourTurn | Self::SeatEliminated | Self::UnknownSeat => ErrorCode::Forbidden,
            Self::CellOutOfRange(_) => ErrorCode::InvalidInput,
            Self::OutOfPieces(_) | Self::SlotOccupied => ErrorCode::IllegalMove,
        }
    }
}
