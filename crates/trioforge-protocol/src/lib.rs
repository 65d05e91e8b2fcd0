//! Wire protocol for Trioforge.
//!
//! This crate defines the language clients and the server speak:
//!
//! - **Types** ([`SeatId`], [`Color`], [`Cell`], [`GameStateView`], …) —
//!   the structures that travel on the wire.
//! - **Messages** ([`ClientMessage`], [`ServerEvent`]) — the tagged
//!   JSON objects of the transport contract.
//! - **Codec** ([`Codec`], [`JsonCodec`]) — bytes ↔ messages.
//! - **Errors** ([`ProtocolError`], the stable [`ErrorCode`] set).
//!
//! The protocol layer sits between the transport (raw frames) and the
//! session/room layers. It knows nothing about connections, rooms, or
//! rules — only shapes.

mod codec;
mod error;
mod message;
mod types;

pub use codec::{Codec, JsonCodec};
pub use error::{ErrorCode, ProtocolError};
pub use message::{ClientMessage, ServerEvent, SkipReason};
pub use types::{
    Cell, Color, GameStateView, GameStatus, Inventory, ParseIdError, PieceSize, PlayerView,
    ReplayVotes, RoomId, RoomSummary, SeatId, COLOR_PALETTE,
};
