//! Game-wide configuration and per-room creation options.

use std::time::Duration;

use crate::RoomError;

/// Server-wide timing and rule knobs, shared by every room.
#[derive(Debug, Clone)]
pub struct GameConfig {
    /// Budget for a single turn. On expiry the seat is skipped.
    pub turn_timeout: Duration,

    /// How long the post-game replay vote stays open.
    pub replay_vote_window: Duration,

    /// Room lifetime. Reset to this on every match start (initial or
    /// replay); the lobby sweep evicts rooms past their deadline.
    pub room_ttl: Duration,

    /// A seat is eliminated when its consecutive-skip counter reaches
    /// this value.
    pub consecutive_skip_limit: u32,

    /// How long a disconnected player may still reclaim their seat.
    /// Consumed by the session layer; the turn timer ignores it.
    pub reconnect_grace: Duration,

    /// Interval of the background sweep that evicts expired rooms and
    /// stale seat bindings.
    pub cleanup_sweep: Duration,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            turn_timeout: Duration::from_millis(60_000),
            replay_vote_window: Duration::from_millis(30_000),
            room_ttl: Duration::from_millis(3_600_000),
            consecutive_skip_limit: 2,
            reconnect_grace: Duration::from_millis(300_000),
            cleanup_sweep: Duration::from_millis(300_000),
        }
    }
}

// ---------------------------------------------------------------------------
// RoomOptions
// ---------------------------------------------------------------------------

/// Limits on user-supplied strings, in code points.
const NAME_MAX: usize = 50;
const CODE_MIN: usize = 4;
const CODE_MAX: usize = 20;
const NICKNAME_MAX: usize = 20;

/// Per-room creation parameters, as validated from `create-room`.
#[derive(Debug, Clone)]
pub struct RoomOptions {
    pub name: String,
    pub capacity: usize,
    pub is_private: bool,
    /// Present exactly when `is_private` is set.
    pub code: Option<String>,
}

impl RoomOptions {
    /// Validates and normalizes raw creation input.
    ///
    /// - `name` is trimmed and must be 1..=50 code points.
    /// - `capacity` must be 2, 3, or 4.
    /// - A private room requires a code of 4..=20 code points; a public
    ///   room must not carry one.
    pub fn new(
        name: &str,
        capacity: usize,
        is_private: bool,
        code: Option<String>,
    ) -> Result<Self, RoomError> {
        let name = name.trim();
        if name.is_empty() || name.chars().count() > NAME_MAX {
            return Err(RoomError::InvalidInput(
                "room name must be 1..=50 characters".into(),
            ));
        }
        if !(2..=4).contains(&capacity) {
            return Err(RoomError::InvalidInput("capacity must be 2, 3, or 4".into()));
        }
        let code = match (is_private, code) {
            (true, Some(code)) => {
                let len = code.chars().count();
                if !(CODE_MIN..=CODE_MAX).contains(&len) {
                    return Err(RoomError::InvalidInput(
                        "access code must be 4..=20 characters".into(),
                    ));
                }
                Some(code)
            }
            (true, None) => {
                return Err(RoomError::InvalidInput(
                    "private rooms require an access code".into(),
                ));
            }
            (false, _) => None,
        };
        Ok(Self { name: name.to_string(), capacity, is_private, code })
    }
}

/// Validates a player nickname: trimmed, 1..=20 code points.
pub fn validate_nickname(raw: &str) -> Result<String, RoomError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed.chars().count() > NICKNAME_MAX {
        return Err(RoomError::InvalidInput(
            "nickname must be 1..=20 characters".into(),
        ));
    }
    Ok(trimmed.to_string())
}
