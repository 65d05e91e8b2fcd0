//! Game rules for Trioforge: the board, seats, and the match engine.
//!
//! Everything in this crate is pure and synchronous. The room layer
//! owns the concurrency; this crate owns the rules:
//!
//! - [`Board`] — the 3×3 grid and its rule primitives (legality,
//!   visibility, win and stuckness detection).
//! - [`Seat`] — one player slot, owned by the room across matches.
//! - [`MatchState`] — the per-game state machine: turn order, move
//!   validation, skip/elimination cascade, terminal detection.

mod board;
mod engine;
mod error;
mod seat;

pub use board::{Board, CELL_COUNT};
pub use engine::{waiting_view, EngineEvent, MatchState, MatchStatus};
pub use error::GameError;
pub use seat::{seat_by_id, seat_by_id_mut, Seat};
