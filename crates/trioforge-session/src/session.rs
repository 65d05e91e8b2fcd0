//! Session types: the server's record of who holds which seat.
//!
//! A binding ties a seat (minted by a room) to the player currently
//! occupying it. It tracks:
//! - WHERE the seat lives (`RoomId`)
//! - WHAT state the occupant is in (connected, disconnected, expired)
//! - HOW they can come back (a secret resume token)
//! - WHEN they disconnected (to enforce the grace period)

use std::time::{Duration, Instant};

use trioforge_protocol::{RoomId, SeatId};

// ---------------------------------------------------------------------------
// SessionConfig
// ---------------------------------------------------------------------------

/// Configuration for binding behavior.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// How long a disconnected player may still reclaim their seat
    /// before the binding is permanently expired.
    ///
    /// Default: 5 minutes. The turn timer keeps running regardless —
    /// the grace period only controls *seat reclamation*, never game
    /// timing.
    pub reconnect_grace: Duration,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self { reconnect_grace: Duration::from_millis(300_000) }
    }
}

// ---------------------------------------------------------------------------
// BindingState
// ---------------------------------------------------------------------------

/// The occupancy state of a seat binding.
///
/// ```text
///   Connected ──(disconnect)──→ Disconnected ──(grace over)──→ Expired
///       ↑                            │
///       └─────────(resume)───────────┘
/// ```
///
/// `Instant` is the monotonic clock: immune to wall-clock adjustments,
/// which is what elapsed-time checks need.
#[derive(Debug, Clone)]
pub enum BindingState {
    /// The seat's player has a live connection.
    Connected,

    /// The transport dropped at `since`; the seat can still be
    /// reclaimed with the resume token until the grace period ends.
    Disconnected { since: Instant },

    /// The grace period elapsed. The binding is dead and will be
    /// cleaned up; the seat can no longer be reclaimed.
    Expired,
}

// ---------------------------------------------------------------------------
// SeatBinding
// ---------------------------------------------------------------------------

/// One seat's occupancy record.
///
/// Created when a player takes a seat (create/join), kept until they
/// leave explicitly, the grace period runs out, or the room dies.
#[derive(Debug, Clone)]
pub struct SeatBinding {
    /// The seat this binding is for.
    pub seat: SeatId,

    /// The room that minted the seat.
    pub room: RoomId,

    /// Current occupancy state.
    pub state: BindingState,

    /// The secret a client presents in `resume-session` to reclaim
    /// this seat after a transport drop. Issued once, in the
    /// `room-created` / `room-joined` reply; 32 hex chars (128 bits).
    pub resume_token: String,
}
