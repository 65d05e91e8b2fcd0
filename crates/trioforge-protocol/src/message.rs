//! The message vocabulary: what clients send and what the server emits.
//!
//! Both directions are internally tagged enums — `#[serde(tag = "type")]`
//! turns `ClientMessage::MakeMove { .. }` into
//! `{"type": "make-move", "roomId": "r-1", "cellIndex": 4, "size": "G"}`.
//! The kebab-case tags and camelCase fields are the contract the client
//! SDK is written against.

use serde::{Deserialize, Serialize};

use crate::{ErrorCode, GameStateView, PieceSize, PlayerView, ReplayVotes, RoomId, SeatId};

// ---------------------------------------------------------------------------
// Inbound: client → server
// ---------------------------------------------------------------------------

/// Everything a client may send.
///
/// `deny_unknown_fields` is deliberately NOT set: unknown fields are
/// ignored for forward compatibility, but an unknown `type` tag fails to
/// parse — the dispatcher counts that as a protocol strike.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum ClientMessage {
    /// Liveness probe; answered with [`ServerEvent::Pong`].
    Ping,

    /// Create a room and claim its host seat.
    #[serde(rename_all = "camelCase")]
    CreateRoom {
        player_name: String,
        #[serde(default)]
        room_name: Option<String>,
        is_private: bool,
        capacity: u8,
        /// Access code; required exactly when `is_private` is set.
        #[serde(default)]
        code: Option<String>,
    },

    /// Take a seat in an existing room.
    #[serde(rename_all = "camelCase")]
    JoinRoom {
        room_id: RoomId,
        player_name: String,
        #[serde(default)]
        access_code: Option<String>,
    },

    /// Leave the current room explicitly (forfeits a running game).
    LeaveRoom,

    /// Place a piece.
    #[serde(rename_all = "camelCase")]
    MakeMove {
        room_id: RoomId,
        /// Row-major cell index, 0..=8.
        cell_index: u8,
        size: PieceSize,
    },

    /// Request a full authoritative snapshot.
    #[serde(rename_all = "camelCase")]
    GetGameState { room_id: RoomId },

    /// Vote on replaying a finished match.
    #[serde(rename_all = "camelCase")]
    CastReplayVote { room_id: RoomId, vote: bool },

    /// Reclaim a seat after a transport drop, within the grace period.
    /// The token was issued in `room-created` / `room-joined`.
    ResumeSession { token: String },
}

// ---------------------------------------------------------------------------
// Outbound: server → client
// ---------------------------------------------------------------------------

/// Why a turn was skipped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SkipReason {
    /// The 60 s turn budget elapsed.
    Timeout,
    /// The seat's player left mid-game.
    Leave,
    /// The seat had no legal move and was passed over automatically.
    NoMoves,
}

/// Everything the server may emit.
///
/// Events are either *replies* (sent to the originating connection only:
/// `pong`, the `*-error` family, `game-state`, `session-resumed`) or
/// *broadcasts* (fanned out to every seat in the room, in the total
/// order the room produced them).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum ServerEvent {
    Pong { ts: u64 },

    // -- Lobby / membership --
    #[serde(rename_all = "camelCase")]
    RoomCreated {
        room_id: RoomId,
        seat_id: SeatId,
        reconnect_token: String,
        state: GameStateView,
    },
    #[serde(rename_all = "camelCase")]
    RoomJoined {
        room_id: RoomId,
        seat_id: SeatId,
        reconnect_token: String,
        state: GameStateView,
    },
    #[serde(rename_all = "camelCase")]
    PlayerJoined { player: PlayerView, state: GameStateView },
    #[serde(rename_all = "camelCase")]
    PlayerDisconnected { player_id: SeatId },
    #[serde(rename_all = "camelCase")]
    HostTransferred { host_id: SeatId },
    /// The room is gone: TTL expiry, failed replay cleanup, or the last
    /// seat left.
    RoomClosed { reason: String },

    // -- Match flow --
    GameStarted { state: GameStateView },
    GameUpdated { state: GameStateView },
    #[serde(rename_all = "camelCase")]
    GameEnded {
        winner_id: Option<SeatId>,
        is_draw: bool,
        state: GameStateView,
    },
    #[serde(rename_all = "camelCase")]
    TimerUpdate {
        /// Whole seconds remaining in the active turn.
        turn_time_left: u64,
        current_player_id: Option<SeatId>,
    },
    #[serde(rename_all = "camelCase")]
    TurnSkipped {
        skipped_player_id: SeatId,
        reason: SkipReason,
        game_state: GameStateView,
    },
    #[serde(rename_all = "camelCase")]
    PlayerEliminated { player_id: SeatId, state: GameStateView },

    // -- Replay vote --
    #[serde(rename_all = "camelCase")]
    ReplayVotingStarted {
        /// Epoch milliseconds at which the vote window closes.
        replay_deadline: u64,
        replay_votes: ReplayVotes,
    },
    #[serde(rename_all = "camelCase")]
    ReplayVoteUpdated { replay_votes: ReplayVotes },
    ReplayRejected,
    ReplayTimeout,
    GameRestarted { state: GameStateView },

    // -- Replies --
    GameState { state: GameStateView },
    #[serde(rename_all = "camelCase")]
    SessionResumed {
        room_id: RoomId,
        seat_id: SeatId,
        state: GameStateView,
    },
    RoomError { code: ErrorCode, message: String },
    JoinError { code: ErrorCode, message: String },
    MoveError { code: ErrorCode, message: String },
}

impl ServerEvent {
    /// `true` for events that answer one specific request and must not
    /// be broadcast.
    pub fn is_reply(&self) -> bool {
        matches!(
            self,
            Self::Pong { .. }
                | Self::GameState { .. }
                | Self::SessionResumed { .. }
                | Self::RoomError { .. }
                | Self::JoinError { .. }
                | Self::MoveError { .. }
        )
    }
}

// =========================================================================
// Tests
// =========================================================================
