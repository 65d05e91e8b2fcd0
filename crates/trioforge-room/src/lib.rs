//! Room lifecycle for Trioforge.
//!
//! Each room runs as an isolated Tokio task (actor model) owning its
//! seats, match engine, turn timer, and replay vote. The
//! [`LobbyRegistry`] is the process-wide catalog that creates, lists,
//! and sweeps rooms.

mod config;
mod error;
mod lobby;
mod room;
mod vote;

pub use config::{validate_nickname, GameConfig, RoomOptions};
pub use error::RoomError;
pub use lobby::{ListQuery, LobbyRegistry, RoomPage, SortKey};
pub use room::{now_ms, JoinOk, LeaveMode, RoomHandle, RoomInfo, SeatSender};
pub use vote::{ReplayVote, VoteOutcome};
