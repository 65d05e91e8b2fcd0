//! Seat binding management for Trioforge.
//!
//! This crate tracks which player occupies which seat:
//!
//! 1. **Binding** — a seat taken on create/join gets a [`SeatBinding`]
//!    with a secret resume token.
//! 2. **Disconnect tracking** — transport drops start a grace period;
//!    the seat is held, the game keeps running.
//! 3. **Resume** — `resume-session` presents the token and reclaims the
//!    seat (within the grace period).
//!
//! # How it fits in the stack
//!
//! ```text
//! Dispatcher (above)  ← binds connections to seats, routes messages
//!     ↕
//! Session layer (this crate)  ← who holds which seat, and for how long
//!     ↕
//! Protocol layer (below)  ← provides SeatId / RoomId
//! ```

mod error;
mod manager;
mod session;

pub use error::SessionError;
pub use manager::SessionManager;
pub use session::{BindingState, SeatBinding, SessionConfig};
