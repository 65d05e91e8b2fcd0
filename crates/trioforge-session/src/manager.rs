//! The session manager: tracks every seat binding in the process.
//!
//! Responsibilities:
//! - Creating bindings when players take seats
//! - Tracking which seats are connected/disconnected
//! - Validating resume tokens
//! - Expiring bindings after the grace period
//! - Cleaning up dead bindings to free memory
//!
//! # Concurrency note
//!
//! `SessionManager` is NOT thread-safe by itself — it is a plain
//! `HashMap` wrapper owned by the dispatcher and accessed behind a
//! mutex at a higher level. Keeping it synchronous here avoids hidden
//! locking.

use std::collections::HashMap;
use std::time::Instant;

use rand::Rng;
use trioforge_protocol::{RoomId, SeatId};

use crate::{BindingState, SeatBinding, SessionConfig, SessionError};

/// Tracks every occupied seat on the server.
///
/// ## Lifecycle
///
/// ```text
/// bind() ──→ disconnect() ──→ resume()        (player came back)
///    │             │
///    │             ▼
///    │        expire_stale() ──→ cleanup_expired()
///    │
///    └──→ release()                           (explicit leave / room gone)
/// ```
pub struct SessionManager {
    /// All bindings, keyed by seat. A seat has at most one binding.
    bindings: HashMap<SeatId, SeatBinding>,

    /// Index from resume token to seat, kept in sync with `bindings`,
    /// so `resume-session` doesn't scan every binding.
    tokens: HashMap<String, SeatId>,

    config: SessionConfig,
}

impl SessionManager {
    /// Creates an empty manager with the given config.
    pub fn new(config: SessionConfig) -> Self {
        Self {
            bindings: HashMap::new(),
            tokens: HashMap::new(),
            config,
        }
    }

    /// Records that a player took `seat` in `room` and mints their
    /// resume token.
    ///
    /// # Errors
    /// [`SessionError::AlreadyConnected`] if the seat already has a
    /// live binding. A disconnected or expired binding for the same
    /// seat is replaced (its old token stops working).
    pub fn bind(&mut self, seat: SeatId, room: RoomId) -> Result<&SeatBinding, SessionError> {
        if let Some(existing) = self.bindings.get(&seat) {
            if matches!(existing.state, BindingState::Connected) {
                return Err(SessionError::AlreadyConnected(seat));
            }
            self.tokens.remove(&existing.resume_token);
        }

        let token = generate_token();
        let binding = SeatBinding {
            seat,
            room,
            state: BindingState::Connected,
            resume_token: token.clone(),
        };

        self.tokens.insert(token, seat);
        self.bindings.insert(seat, binding);

        tracing::info!(%seat, %room, "seat bound");
        Ok(self.bindings.get(&seat).expect("just inserted"))
    }

    /// Marks a seat's player as disconnected and starts the grace
    /// period. The binding (and its token) survives.
    ///
    /// # Errors
    /// [`SessionError::NotFound`] if no binding exists.
    pub fn disconnect(&mut self, seat: SeatId) -> Result<(), SessionError> {
        let binding = self
            .bindings
            .get_mut(&seat)
            .ok_or(SessionError::NotFound(seat))?;

        binding.state = BindingState::Disconnected { since: Instant::now() };
        tracing::info!(%seat, "seat disconnected, grace period started");
        Ok(())
    }

    /// Reclaims a seat with its resume token.
    ///
    /// # Errors
    /// - [`SessionError::InvalidToken`] — token not recognized
    /// - [`SessionError::Expired`] — grace period elapsed
    /// - [`SessionError::AlreadyConnected`] — the seat never dropped
    pub fn resume(&mut self, token: &str) -> Result<&SeatBinding, SessionError> {
        let seat = self
            .tokens
            .get(token)
            .copied()
            .ok_or(SessionError::InvalidToken)?;

        let binding = self
            .bindings
            .get_mut(&seat)
            .ok_or(SessionError::InvalidToken)?;

        match &binding.state {
            BindingState::Disconnected { since } => {
                if since.elapsed() > self.config.reconnect_grace {
                    binding.state = BindingState::Expired;
                    return Err(SessionError::Expired(seat));
                }
                binding.state = BindingState::Connected;
                tracing::info!(%seat, "seat resumed");
                Ok(self.bindings.get(&seat).expect("just modified"))
            }
            BindingState::Connected => Err(SessionError::AlreadyConnected(seat)),
            BindingState::Expired => Err(SessionError::Expired(seat)),
        }
    }

    /// Drops a binding entirely: explicit leave, or the room is gone.
    /// The token stops working immediately. Unknown seats are a no-op.
    pub fn release(&mut self, seat: SeatId) {
        if let Some(binding) = self.bindings.remove(&seat) {
            self.tokens.remove(&binding.resume_token);
            tracing::info!(%seat, "seat released");
        }
    }

    /// Drops every binding belonging to `room`. Called when a room is
    /// removed so its seats can't be resumed into a dead room.
    pub fn release_room(&mut self, room: RoomId) {
        self.bindings.retain(|_, binding| {
            if binding.room == room {
                self.tokens.remove(&binding.resume_token);
                false
            } else {
                true
            }
        });
    }

    /// Expires every disconnected binding past the grace period.
    /// Returns the seats that expired, so the caller can tell their
    /// rooms the players are gone for good.
    pub fn expire_stale(&mut self) -> Vec<SeatId> {
        let grace = self.config.reconnect_grace;
        let mut expired = Vec::new();

        for binding in self.bindings.values_mut() {
            if let BindingState::Disconnected { since } = &binding.state {
                if since.elapsed() > grace {
                    binding.state = BindingState::Expired;
                    expired.push(binding.seat);
                    tracing::info!(seat = %binding.seat, "binding expired");
                }
            }
        }

        expired
    }

    /// Removes all expired bindings. Separate from `expire_stale` so
    /// callers can react to expirations before the records vanish.
    pub fn cleanup_expired(&mut self) {
        self.bindings.retain(|_, binding| {
            if matches!(binding.state, BindingState::Expired) {
                self.tokens.remove(&binding.resume_token);
                false
            } else {
                true
            }
        });
    }

    /// Looks up a binding by seat.
    pub fn get(&self, seat: &SeatId) -> Option<&SeatBinding> {
        self.bindings.get(seat)
    }

    /// Number of bindings in any state.
    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }
}

/// Generates a random 32-character hex string (128 bits of entropy).
/// Guessing a valid token is computationally infeasible.
fn generate_token() -> String {
    let mut rng = rand::rng();
    let bytes: [u8; 16] = rng.random();
    bytes.iter().map(|b| format!("{b:02x}")).collect()
}

// =========================================================================
// Tests
// =========================================================================
