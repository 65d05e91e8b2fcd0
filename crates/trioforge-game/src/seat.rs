//! Seat records: one per player slot in a room.
//!
//! Seats are owned by the room, not the match — they outlive individual
//! games (a replay resets their match-scoped fields but keeps identity,
//! nickname, and color). All mutation happens inside the owning room's
//! serialized context.

use trioforge_protocol::{Color, Inventory, PlayerView, SeatId};

/// A player's slot within one room.
#[derive(Debug, Clone, PartialEq)]
pub struct Seat {
    pub id: SeatId,
    pub nickname: String,
    pub color: Color,
    pub inventory: Inventory,
    pub connected: bool,
    pub skips_in_a_row: u32,
    pub eliminated: bool,
    pub is_host: bool,
}

impl Seat {
    /// A fresh, connected seat with a full inventory.
    pub fn new(id: SeatId, nickname: impl Into<String>, color: Color) -> Self {
        Self {
            id,
            nickname: nickname.into(),
            color,
            inventory: Inventory::full(),
            connected: true,
            skips_in_a_row: 0,
            eliminated: false,
            is_host: false,
        }
    }

    /// An *active* seat takes turns: neither eliminated nor disconnected.
    pub fn is_active(&self) -> bool {
        !self.eliminated && self.connected
    }

    /// Resets the match-scoped fields for a new game. Identity,
    /// nickname, color, host flag, and connection state survive.
    pub fn reset_for_match(&mut self) {
        self.inventory = Inventory::full();
        self.skips_in_a_row = 0;
        self.eliminated = false;
    }

    /// The client-facing view of this seat.
    pub fn view(&self) -> PlayerView {
        PlayerView {
            id: self.id,
            nickname: self.nickname.clone(),
            color: self.color,
            inventory: self.inventory,
            connected: self.connected,
            is_host: self.is_host,
            is_eliminated: self.eliminated,
            skips_in_a_row: self.skips_in_a_row,
        }
    }
}

/// Finds a seat by id in a slice.
pub fn seat_by_id(seats: &[Seat], id: SeatId) -> Option<&Seat> {
    seats.iter().find(|s| s.id == id)
}

/// Mutable lookup by id.
pub fn seat_by_id_mut(seats: &mut [Seat], id: SeatId) -> Option<&mut Seat> {
    seats.iter_mut().find(|s| s.id == id)
}
