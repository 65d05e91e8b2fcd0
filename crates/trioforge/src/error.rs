//! Unified error type for the Trioforge server.

use trioforge_protocol::ProtocolError;
use trioforge_room::RoomError;
use trioforge_session::SessionError;
use trioforge_transport::TransportError;

/// Top-level error that wraps all layer-specific errors.
///
/// The `#[from]` attributes let `?` convert sub-crate errors
/// automatically, so server code deals with one error type.
#[derive(Debug, thiserror::Error)]
pub enum TrioforgeError {
    /// A transport-level error (accept, send, recv).
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// A protocol-level error (encode, decode, invalid message).
    #[error(transparent)]
    Protocol(#[from] ProtocolError),

    /// A session-level error (binding, resume, expiry).
    #[error(transparent)]
    Session(#[from] SessionError),

    /// A room or lobby error.
    #[error(transparent)]
    Room(#[from] RoomError),

    /// An I/O error from the HTTP side-channel listener.
    #[error("http listener error: {0}")]
    Http(#[from] std::io::Error),
}
