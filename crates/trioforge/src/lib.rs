//! # Trioforge
//!
//! Authoritative real-time backend for a turn-based 3×3 board game
//! with nested piece sizes, 2–4 players per room, public and private
//! rooms, and strict server-side rule enforcement.
//!
//! The server owns all game state; clients are read-only observers
//! that submit operations and receive snapshots. Each room runs as an
//! isolated actor task — parallel across rooms, strictly serialized
//! within one.
//!
//! ## Quick start
//!
//! ```rust,no_run
//! use trioforge::prelude::*;
//!
//! # async fn run() -> Result<(), TrioforgeError> {
//! let server = TrioforgeServer::builder()
//!     .bind("0.0.0.0:8080")
//!     .http("0.0.0.0:8081")
//!     .build()
//!     .await?;
//! server.run().await
//! # }
//! ```

mod error;
mod handler;
mod http;
mod server;

pub use error::TrioforgeError;
pub use server::{TrioforgeServer, TrioforgeServerBuilder};

/// Re-exports everything an operator or integration test needs.
pub mod prelude {
    pub use crate::{TrioforgeError, TrioforgeServer, TrioforgeServerBuilder};

    // Protocol types
    pub use trioforge_protocol::{
        Cell, ClientMessage, Codec, Color, ErrorCode, GameStateView, GameStatus, Inventory,
        JsonCodec, PieceSize, PlayerView, ProtocolError, RoomId, RoomSummary, SeatId,
        ServerEvent, SkipReason,
    };

    // Game types
    pub use trioforge_game::{Board, GameError, MatchState, MatchStatus, Seat};

    // Room types
    pub use trioforge_room::{
        GameConfig, ListQuery, LobbyRegistry, RoomError, RoomHandle, RoomInfo, RoomOptions,
        SortKey,
    };

    // Session types
    pub use trioforge_session::{SeatBinding, SessionConfig, SessionError, SessionManager};

    // Transport types
    pub use trioforge_transport::{
        Connection, ConnectionId, Transport, TransportError, WebSocketTransport,
    };
}
