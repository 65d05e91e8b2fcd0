//! Core wire types: identifiers, colors, piece sizes, cells, and views.
//!
//! Everything in this module travels on the wire as JSON, so the serde
//! representation of each type is part of the protocol contract. The
//! tests at the bottom pin the exact JSON shapes; a change that breaks
//! one of them breaks every deployed client.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use serde::{de, Deserialize, Deserializer, Serialize, Serializer};

// ---------------------------------------------------------------------------
// Identity types
// ---------------------------------------------------------------------------

/// A seat identifier, minted by a room when a player joins.
///
/// Newtype over `u64` for type safety, but — unlike a bare counter —
/// seats are opaque *strings* on the wire (`"s-17"`). Clients treat them
/// as tokens; only the server knows there is a number inside. The manual
/// `Serialize`/`Deserialize` impls below produce and parse that string
/// form, which also makes `SeatId` usable as a JSON map key (serde_json
/// requires map keys to serialize as strings).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SeatId(pub u64);

impl fmt::Display for SeatId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "s-{}", self.0)
    }
}

impl FromStr for SeatId {
    type Err = ParseIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let raw = s.strip_prefix("s-").ok_or(ParseIdError)?;
        raw.parse().map(SeatId).map_err(|_| ParseIdError)
    }
}

/// A room identifier, minted by the lobby registry. Wire form: `"r-4"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RoomId(pub u64);

impl fmt::Display for RoomId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "r-{}", self.0)
    }
}

impl FromStr for RoomId {
    type Err = ParseIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let raw = s.strip_prefix("r-").ok_or(ParseIdError)?;
        raw.parse().map(RoomId).map_err(|_| ParseIdError)
    }
}

/// Error returned when an id string doesn't match the expected form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParseIdError;

impl fmt::Display for ParseIdError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "malformed identifier")
    }
}

impl std::error::Error for ParseIdError {}

// Serialize as the display string, deserialize via FromStr. One macro
// keeps both id types in lockstep.
macro_rules! string_id_serde {
    ($ty:ty, $expecting:literal) => {
        impl Serialize for $ty {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.collect_str(self)
            }
        }

        impl<'de> Deserialize<'de> for $ty {
            fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                let s = <std::borrow::Cow<'de, str>>::deserialize(deserializer)?;
                s.parse().map_err(|_| {
                    de::Error::invalid_value(de::Unexpected::Str(&s), &$expecting)
                })
            }
        }
    };
}

string_id_serde!(SeatId, "a seat id like \"s-17\"");
string_id_serde!(RoomId, "a room id like \"r-4\"");

// ---------------------------------------------------------------------------
// Colors and piece sizes
// ---------------------------------------------------------------------------

/// A player color. At most one seat per room holds each color.
///
/// `#[serde(rename_all = "lowercase")]` puts `"red"` (not `"Red"`) on
/// the wire, matching the client contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Color {
    Red,
    Blue,
    Green,
    Yellow,
}

/// The ordered palette rooms assign from: first unused color wins.
pub const COLOR_PALETTE: [Color; 4] = [Color::Red, Color::Blue, Color::Green, Color::Yellow];

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Red => "red",
            Self::Blue => "blue",
            Self::Green => "green",
            Self::Yellow => "yellow",
        };
        f.write_str(s)
    }
}

/// A piece size. Wire form is the single letter the client uses:
/// `"P"` (petit), `"M"` (moyen), `"G"` (grand).
///
/// Ordering matters: `Large > Medium > Small`, and the derived `Ord`
/// on variant order gives exactly that, which is what visibility
/// resolution relies on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum PieceSize {
    #[serde(rename = "P")]
    Small,
    #[serde(rename = "M")]
    Medium,
    #[serde(rename = "G")]
    Large,
}

impl PieceSize {
    /// All sizes, smallest first.
    pub const ALL: [PieceSize; 3] = [PieceSize::Small, PieceSize::Medium, PieceSize::Large];
}

impl fmt::Display for PieceSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Small => "P",
            Self::Medium => "M",
            Self::Large => "G",
        };
        f.write_str(s)
    }
}

// ---------------------------------------------------------------------------
// Cells and inventories
// ---------------------------------------------------------------------------

/// One board cell: three independent size slots, each holding at most
/// one color. Wire form: `{"P": "red", "M": null, "G": "blue"}`.
///
/// The slots are independent by rule — a small red piece and a large
/// blue piece coexist in the same cell. Absent pieces serialize as
/// explicit `null`s (no `skip_serializing_if`) so clients always see
/// all three keys.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cell {
    #[serde(rename = "P")]
    pub small: Option<Color>,
    #[serde(rename = "M")]
    pub medium: Option<Color>,
    #[serde(rename = "G")]
    pub large: Option<Color>,
}

impl Cell {
    /// Returns the color in the given size slot, if any.
    pub fn slot(&self, size: PieceSize) -> Option<Color> {
        match size {
            PieceSize::Small => self.small,
            PieceSize::Medium => self.medium,
            PieceSize::Large => self.large,
        }
    }

    /// Mutable access to the given size slot.
    pub fn slot_mut(&mut self, size: PieceSize) -> &mut Option<Color> {
        match size {
            PieceSize::Small => &mut self.small,
            PieceSize::Medium => &mut self.medium,
            PieceSize::Large => &mut self.large,
        }
    }
}

/// A seat's remaining pieces, one count per size. Starts at 3 each.
/// Wire form: `{"P": 3, "M": 2, "G": 0}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Inventory {
    #[serde(rename = "P")]
    pub small: u8,
    #[serde(rename = "M")]
    pub medium: u8,
    #[serde(rename = "G")]
    pub large: u8,
}

impl Inventory {
    /// A fresh inventory: three pieces of each size.
    pub fn full() -> Self {
        Self { small: 3, medium: 3, large: 3 }
    }

    /// Remaining pieces of the given size.
    pub fn count(&self, size: PieceSize) -> u8 {
        match size {
            PieceSize::Small => self.small,
            PieceSize::Medium => self.medium,
            PieceSize::Large => self.large,
        }
    }

    /// Removes one piece of the given size. Returns `false` (and leaves
    /// the inventory untouched) when the count is already zero.
    pub fn take(&mut self, size: PieceSize) -> bool {
        let slot = match size {
            PieceSize::Small => &mut self.small,
            PieceSize::Medium => &mut self.medium,
            PieceSize::Large => &mut self.large,
        };
        if *slot == 0 {
            return false;
        }
        *slot -= 1;
        true
    }

    /// `true` when no pieces of any size remain.
    pub fn is_exhausted(&self) -> bool {
        self.small == 0 && self.medium == 0 && self.large == 0
    }
}

impl Default for Inventory {
    fn default() -> Self {
        Self::full()
    }
}

// ---------------------------------------------------------------------------
// Views: snapshots sent to clients
// ---------------------------------------------------------------------------

/// The lifecycle phase a client sees in a snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GameStatus {
    Waiting,
    Playing,
    Finished,
}

/// One player's slice of a snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerView {
    pub id: SeatId,
    pub nickname: String,
    pub color: Color,
    pub inventory: Inventory,
    pub connected: bool,
    pub is_host: bool,
    pub is_eliminated: bool,
    pub skips_in_a_row: u32,
}

/// The full authoritative snapshot of a room's game, sent on join,
/// reconnect, `get-game-state`, and after every mutation.
///
/// `turn_time_left` is a derived convenience in whole seconds; clients
/// that want a smooth countdown should prefer the dedicated
/// `timer-update` events.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameStateView {
    pub board: [Cell; 9],
    pub players: Vec<PlayerView>,
    pub current_player_id: Option<SeatId>,
    pub status: GameStatus,
    pub winner_id: Option<SeatId>,
    pub is_draw: bool,
    pub started_at: Option<u64>,
    pub finished_at: Option<u64>,
    pub turn_time_left: u64,
}

/// A room as shown in listings (`GET /rooms` and lobby queries).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomSummary {
    pub id: RoomId,
    pub name: String,
    pub player_count: usize,
    pub capacity: usize,
    pub is_private: bool,
    pub status: GameStatus,
}

/// The ballots cast so far in a replay vote, keyed by seat.
pub type ReplayVotes = HashMap<SeatId, bool>;

// =========================================================================
// Tests
// =========================================================================
