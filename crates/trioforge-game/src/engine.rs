//! The match engine: one state machine per running game.
//!
//! The engine is pure and synchronous — it knows nothing about tasks,
//! timers, or sockets. The owning room feeds it operations from its
//! serialized mailbox and broadcasts the [`EngineEvent`]s it returns.
//! Seats stay owned by the room; the engine borrows them per call.
//!
//! Every rejected operation leaves the engine AND the seats untouched:
//! validation completes before the first mutation.

use rand::Rng;
use trioforge_protocol::{GameStateView, GameStatus, PieceSize, SeatId, SkipReason};

use crate::{seat_by_id, seat_by_id_mut, Board, GameError, Seat};

/// Lifecycle of a match: strictly `Playing → Finished`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchStatus {
    Playing,
    Finished,
}

/// Side effects the room must broadcast, in order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineEvent {
    /// A seat's turn was passed over.
    TurnSkipped { seat: SeatId, reason: SkipReason },
    /// A seat was eliminated (skip limit reached, or resignation).
    SeatEliminated { seat: SeatId },
    /// The match reached a terminal state. Always the last event.
    Finished { winner: Option<SeatId>, is_draw: bool },
}

/// The state machine for one game.
#[derive(Debug, Clone)]
pub struct MatchState {
    board: Board,
    /// Seat order fixed at start; disconnects and eliminations during
    /// the match never reorder it.
    order: Vec<SeatId>,
    current: SeatId,
    status: MatchStatus,
    winner: Option<SeatId>,
    is_draw: bool,
    started_at: u64,
    finished_at: Option<u64>,
    /// Bumped on every `current` change; stale timer fires carry an old
    /// epoch and are dropped by the room.
    turn_epoch: u64,
}

impl MatchState {
    /// Starts a match with a uniformly random first seat.
    ///
    /// Resets every seat's match-scoped state (inventory, skip counter,
    /// elimination flag). `now_ms` is the caller's epoch-milliseconds
    /// clock, recorded as `started_at`.
    pub fn start(seats: &mut [Seat], now_ms: u64) -> Self {
        let starter = rand::rng().random_range(0..seats.len());
        Self::start_with(seats, starter, now_ms)
    }

    /// Starts a match with an explicit first seat (index into `seats`).
    /// Deterministic entry point for tests and replays of record.
    pub fn start_with(seats: &mut [Seat], starter: usize, now_ms: u64) -> Self {
        debug_assert!(
            (2..=4).contains(&seats.len()),
            "rooms hold 2..=4 seats by construction"
        );
        for seat in seats.iter_mut() {
            seat.reset_for_match();
        }
        let order: Vec<SeatId> = seats.iter().map(|s| s.id).collect();
        let current = order[starter];
        Self {
            board: Board::new(),
            order,
            current,
            status: MatchStatus::Playing,
            winner: None,
            is_draw: false,
            started_at: now_ms,
            finished_at: None,
            turn_epoch: 1,
        }
    }

    // -- Accessors ---------------------------------------------------------

    pub fn status(&self) -> MatchStatus {
        self.status
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    /// The seat holding the turn. Only meaningful while `Playing`.
    pub fn current_seat(&self) -> SeatId {
        self.current
    }

    pub fn turn_epoch(&self) -> u64 {
        self.turn_epoch
    }

    pub fn winner(&self) -> Option<SeatId> {
        self.winner
    }

    pub fn is_draw(&self) -> bool {
        self.is_draw
    }

    pub fn started_at(&self) -> u64 {
        self.started_at
    }

    // -- Operations --------------------------------------------------------

    /// Submits a move for `seat`. On success the board, inventory, and
    /// turn all advance and the returned events describe any skip or
    /// terminal fallout.
    pub fn submit_move(
        &mut self,
        seats: &mut [Seat],
        seat: SeatId,
        cell: u8,
        size: PieceSize,
        skip_limit: u32,
        now_ms: u64,
    ) -> Result<Vec<EngineEvent>, GameError> {
        if self.status != MatchStatus::Playing {
            return Err(GameError::MatchOver);
        }
        if !self.order.contains(&seat) {
            return Err(GameError::UnknownSeat);
        }
        if seat != self.current {
            return Err(GameError::NotYourTurn);
        }
        let record = seat_by_id(seats, seat).ok_or(GameError::UnknownSeat)?;
        if record.eliminated {
            return Err(GameError::SeatEliminated);
        }
        if record.inventory.count(size) == 0 {
            return Err(GameError::OutOfPieces(size));
        }
        let color = record.color;

        // `apply` is the last fallible step; the board rejects without
        // mutating, so a failure here leaves everything untouched.
        self.board.apply(cell, size, color)?;

        let record = seat_by_id_mut(seats, seat).ok_or(GameError::UnknownSeat)?;
        record.inventory.take(size);
        record.skips_in_a_row = 0;

        let mut events = Vec::new();
        if self.board.has_win(color) {
            self.finish(Some(seat), false, now_ms, &mut events);
            return Ok(events);
        }
        if !self.any_active_has_move(seats) {
            self.finish(None, true, now_ms, &mut events);
            return Ok(events);
        }
        self.advance(seats, skip_limit, now_ms, &mut events);
        Ok(events)
    }

    /// Skips the current seat: timeout, or its player left mid-turn.
    /// Reaching the consecutive-skip limit eliminates the seat.
    ///
    /// No-op on a finished match (a stale timer may still fire once).
    pub fn force_skip(
        &mut self,
        seats: &mut [Seat],
        reason: SkipReason,
        skip_limit: u32,
        now_ms: u64,
    ) -> Vec<EngineEvent> {
        let mut events = Vec::new();
        if self.status != MatchStatus::Playing {
            return events;
        }
        let skipped = self.current;
        events.push(EngineEvent::TurnSkipped { seat: skipped, reason });

        if let Some(record) = seat_by_id_mut(seats, skipped) {
            record.skips_in_a_row += 1;
            if record.skips_in_a_row >= skip_limit && !record.eliminated {
                record.eliminated = true;
                events.push(EngineEvent::SeatEliminated { seat: skipped });
                if self.finish_if_decided(seats, now_ms, &mut events) {
                    return events;
                }
            }
        }

        self.advance(seats, skip_limit, now_ms, &mut events);
        events
    }

    /// Handles an explicit leave during play: the seat is eliminated,
    /// its placed pieces stay on the board. If it held the turn, the
    /// turn advances first; then the forfeit rule applies — a single
    /// remaining uneliminated seat wins immediately.
    pub fn resign(
        &mut self,
        seats: &mut [Seat],
        seat: SeatId,
        skip_limit: u32,
        now_ms: u64,
    ) -> Vec<EngineEvent> {
        let mut events = Vec::new();
        if self.status != MatchStatus::Playing {
            return events;
        }
        let Some(record) = seat_by_id_mut(seats, seat) else {
            return events;
        };
        if record.eliminated {
            return events;
        }
        let held_turn = self.current == seat;
        record.eliminated = true;
        events.push(EngineEvent::SeatEliminated { seat });

        if held_turn {
            events.push(EngineEvent::TurnSkipped { seat, reason: SkipReason::Leave });
            self.advance(seats, skip_limit, now_ms, &mut events);
            if self.status == MatchStatus::Finished {
                return events;
            }
        }

        self.finish_if_decided(seats, now_ms, &mut events);
        events
    }

    /// Builds the authoritative snapshot for this match.
    pub fn view(&self, seats: &[Seat], turn_time_left: u64) -> GameStateView {
        GameStateView {
            board: self.board.cells(),
            players: seats.iter().map(Seat::view).collect(),
            current_player_id: (self.status == MatchStatus::Playing).then_some(self.current),
            status: match self.status {
                MatchStatus::Playing => GameStatus::Playing,
                MatchStatus::Finished => GameStatus::Finished,
            },
            winner_id: self.winner,
            is_draw: self.is_draw,
            started_at: Some(self.started_at),
            finished_at: self.finished_at,
            turn_time_left,
        }
    }

    // -- Internals ---------------------------------------------------------

    /// Moves the turn to the next active seat, auto-skipping seats with
    /// no legal move. Re-evaluates the global draw condition before
    /// every auto-skip so a fully stuck board ends as a draw instead of
    /// looping through skip counters.
    fn advance(
        &mut self,
        seats: &mut [Seat],
        skip_limit: u32,
        now_ms: u64,
        events: &mut Vec<EngineEvent>,
    ) {
        loop {
            let active: Vec<SeatId> =
                seats.iter().filter(|s| s.is_active()).map(|s| s.id).collect();

            if active.is_empty() {
                // Nobody can take a turn. A sole uneliminated seat wins
                // (it may merely be disconnected); otherwise a draw.
                let mut uneliminated = seats.iter().filter(|s| !s.eliminated);
                match (uneliminated.next(), uneliminated.next()) {
                    (Some(last), None) => {
                        let id = last.id;
                        self.finish(Some(id), false, now_ms, events);
                    }
                    _ => self.finish(None, true, now_ms, events),
                }
                return;
            }

            if !self.any_active_has_move(seats) {
                self.finish(None, true, now_ms, events);
                return;
            }

            // First active seat after the current position, wrapping.
            let pos = self
                .order
                .iter()
                .position(|&id| id == self.current)
                .unwrap_or(0);
            let mut next = self.current;
            for offset in 1..=self.order.len() {
                let cand = self.order[(pos + offset) % self.order.len()];
                if active.contains(&cand) {
                    next = cand;
                    break;
                }
            }

            self.current = next;
            self.turn_epoch += 1;

            let record = seat_by_id(seats, next).expect("order only holds seated ids");
            if self.board.any_legal_move(&record.inventory) {
                return;
            }

            // Stuck seat: skip it and keep advancing. The draw check at
            // the top of the loop ran first, so this seat is being
            // passed over while someone else can still play.
            events.push(EngineEvent::TurnSkipped { seat: next, reason: SkipReason::NoMoves });
            let record = seat_by_id_mut(seats, next).expect("order only holds seated ids");
            record.skips_in_a_row += 1;
            if record.skips_in_a_row >= skip_limit && !record.eliminated {
                record.eliminated = true;
                events.push(EngineEvent::SeatEliminated { seat: next });
                if self.finish_if_decided(seats, now_ms, events) {
                    return;
                }
            }
        }
    }

    /// Ends the match if an elimination left zero or one uneliminated
    /// seats. Returns `true` when the match finished.
    fn finish_if_decided(
        &mut self,
        seats: &[Seat],
        now_ms: u64,
        events: &mut Vec<EngineEvent>,
    ) -> bool {
        let mut uneliminated = seats.iter().filter(|s| !s.eliminated);
        match (uneliminated.next(), uneliminated.next()) {
            (Some(last), None) => {
                let id = last.id;
                self.finish(Some(id), false, now_ms, events);
                true
            }
            (None, _) => {
                self.finish(None, true, now_ms, events);
                true
            }
            _ => false,
        }
    }

    fn any_active_has_move(&self, seats: &[Seat]) -> bool {
        seats
            .iter()
            .filter(|s| s.is_active())
            .any(|s| self.board.any_legal_move(&s.inventory))
    }

    fn finish(
        &mut self,
        winner: Option<SeatId>,
        is_draw: bool,
        now_ms: u64,
        events: &mut Vec<EngineEvent>,
    ) {
        self.status = MatchStatus::Finished;
        self.winner = winner;
        self.is_draw = is_draw;
        self.finished_at = Some(now_ms);
        events.push(EngineEvent::Finished { winner, is_draw });
    }
}

/// Snapshot for a room that has not started a match yet.
pub fn waiting_view(seats: &[Seat]) -> GameStateView {
    GameStateView {
        board: Board::new().cells(),
        players: seats.iter().map(Seat::view).collect(),
        current_player_id: None,
        status: GameStatus::Waiting,
        winner_id: None,
        is_draw: false,
        started_at: None,
        finished_at: None,
        turn_time_left: 0,
    }
}

// =========================================================================
// Tests
// =========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use trioforge_protocol::{Color, Inventory};

    const LIMIT: u32 = 2;
    const NOW: u64 = 1_700_000_000_000;

    fn two_seats() -> Vec<Seat> {
        vec![
            Seat::new(SeatId(1), "red", Color::Red),
            Seat::new(SeatId(2), "blue", Color::Blue),
        ]
    }

    fn three_seats() -> Vec<Seat> {
        vec![
            Seat::new(SeatId(1), "red", Color::Red),
            Seat::new(SeatId(2), "blue", Color::Blue),
            Seat::new(SeatId(3), "green", Color::Green),
        ]
    }

    fn mv(
        m: &mut MatchState,
        seats: &mut [Seat],
        seat: u64,
        cell: u8,
        size: PieceSize,
    ) -> Vec<EngineEvent> {
        m.submit_move(seats, SeatId(seat), cell, size, LIMIT, NOW)
            .expect("move should be accepted")
    }

    /// Invariant 2: pieces on the board plus inventory always total 3
    /// per color and size.
    fn assert_conservation(m: &MatchState, seats: &[Seat]) {
        for seat in seats {
            for size in PieceSize::ALL {
                let on_board = m.board().piece_count(seat.color, size);
                let in_hand = seat.inventory.count(size) as usize;
                assert_eq!(on_board + in_hand, 3, "{:?} {size}", seat.color);
            }
        }
    }

    // =====================================================================
    // start
    // =====================================================================

    #[test]
    fn test_start_with_resets_seats_and_picks_starter() {
        let mut seats = two_seats();
        seats[0].skips_in_a_row = 2;
        seats[0].eliminated = true;
        seats[1].inventory.take(PieceSize::Large);

        let m = MatchState::start_with(&mut seats, 1, NOW);

        assert_eq!(m.status(), MatchStatus::Playing);
        assert_eq!(m.current_seat(), SeatId(2));
        assert_eq!(m.turn_epoch(), 1);
        assert_eq!(m.started_at(), NOW);
        assert!(!seats[0].eliminated);
        assert_eq!(seats[0].skips_in_a_row, 0);
        assert_eq!(seats[1].inventory, Inventory::full());
    }

    #[test]
    fn test_start_random_starter_is_one_of_the_seats() {
        let mut seats = three_seats();
        let m = MatchState::start(&mut seats, NOW);
        assert!(seats.iter().any(|s| s.id == m.current_seat()));
    }

    // =====================================================================
    // submit_move: rejections (atomicity)
    // =====================================================================

    #[test]
    fn test_submit_move_wrong_turn_rejected_without_side_effects() {
        let mut seats = two_seats();
        let mut m = MatchState::start_with(&mut seats, 0, NOW);

        let result = m.submit_move(&mut seats, SeatId(2), 0, PieceSize::Small, LIMIT, NOW);

        assert!(matches!(result, Err(GameError::NotYourTurn)));
        assert_eq!(seats[1].inventory, Inventory::full());
        assert_eq!(m.board().visible(0), None);
        assert_eq!(m.turn_epoch(), 1);
    }

    #[test]
    fn test_submit_move_unknown_seat_rejected() {
        let mut seats = two_seats();
        let mut m = MatchState::start_with(&mut seats, 0, NOW);
        let result = m.submit_move(&mut seats, SeatId(99), 0, PieceSize::Small, LIMIT, NOW);
        assert!(matches!(result, Err(GameError::UnknownSeat)));
    }

    #[test]
    fn test_submit_move_occupied_slot_rejected_keeps_inventory() {
        let mut seats = two_seats();
        let mut m = MatchState::start_with(&mut seats, 0, NOW);
        mv(&mut m, &mut seats, 1, 0, PieceSize::Small);
        // Blue tries the same slot.
        let result = m.submit_move(&mut seats, SeatId(2), 0, PieceSize::Small, LIMIT, NOW);

        assert!(matches!(result, Err(GameError::SlotOccupied)));
        assert_eq!(seats[1].inventory.count(PieceSize::Small), 3);
        assert_eq!(m.current_seat(), SeatId(2), "turn must not advance on rejection");
        assert_conservation(&m, &seats);
    }

    #[test]
    fn test_submit_move_out_of_pieces_rejected() {
        let mut seats = two_seats();
        let mut m = MatchState::start_with(&mut seats, 0, NOW);
        seats[0].inventory.large = 0;

        let result = m.submit_move(&mut seats, SeatId(1), 0, PieceSize::Large, LIMIT, NOW);
        assert!(matches!(result, Err(GameError::OutOfPieces(PieceSize::Large))));
    }

    #[test]
    fn test_submit_move_out_of_range_cell_rejected() {
        let mut seats = two_seats();
        let mut m = MatchState::start_with(&mut seats, 0, NOW);
        let result = m.submit_move(&mut seats, SeatId(1), 9, PieceSize::Small, LIMIT, NOW);
        assert!(matches!(result, Err(GameError::CellOutOfRange(9))));
    }

    #[test]
    fn test_submit_move_after_finish_rejected() {
        let mut seats = two_seats();
        let mut m = MatchState::start_with(&mut seats, 0, NOW);
        // Red wins the top row (scenario S1).
        mv(&mut m, &mut seats, 1, 0, PieceSize::Small);
        mv(&mut m, &mut seats, 2, 3, PieceSize::Small);
        mv(&mut m, &mut seats, 1, 1, PieceSize::Small);
        mv(&mut m, &mut seats, 2, 4, PieceSize::Small);
        mv(&mut m, &mut seats, 1, 2, PieceSize::Small);

        let result = m.submit_move(&mut seats, SeatId(2), 5, PieceSize::Small, LIMIT, NOW);
        assert!(matches!(result, Err(GameError::MatchOver)));
    }

    // =====================================================================
    // Scenario S1: same-color row win
    // =====================================================================

    #[test]
    fn test_same_color_row_win() {
        let mut seats = two_seats();
        let mut m = MatchState::start_with(&mut seats, 0, NOW);

        mv(&mut m, &mut seats, 1, 0, PieceSize::Small);
        mv(&mut m, &mut seats, 2, 3, PieceSize::Small);
        mv(&mut m, &mut seats, 1, 1, PieceSize::Small);
        mv(&mut m, &mut seats, 2, 4, PieceSize::Small);
        let events = mv(&mut m, &mut seats, 1, 2, PieceSize::Small);

        assert_eq!(
            events,
            vec![EngineEvent::Finished { winner: Some(SeatId(1)), is_draw: false }]
        );
        assert_eq!(m.status(), MatchStatus::Finished);
        assert_eq!(m.winner(), Some(SeatId(1)));
        assert!(!m.is_draw());
        assert_conservation(&m, &seats);
    }

    // =====================================================================
    // Scenario S2: nested sizes that do NOT win
    // =====================================================================

    #[test]
    fn test_nested_size_alignment_does_not_win() {
        let mut seats = two_seats();
        let mut m = MatchState::start_with(&mut seats, 0, NOW);

        mv(&mut m, &mut seats, 1, 0, PieceSize::Small);
        mv(&mut m, &mut seats, 2, 0, PieceSize::Medium); // same cell, different slot
        mv(&mut m, &mut seats, 1, 1, PieceSize::Medium);
        mv(&mut m, &mut seats, 2, 2, PieceSize::Large);
        let events = mv(&mut m, &mut seats, 1, 0, PieceSize::Large);

        // Row 0-1-2 is visibly red, red, blue: no winner.
        assert!(events.is_empty());
        assert_eq!(m.status(), MatchStatus::Playing);
        assert_eq!(m.current_seat(), SeatId(2));
        assert_conservation(&m, &seats);
    }

    // =====================================================================
    // Scenario S3: forfeit by explicit leave
    // =====================================================================

    #[test]
    fn test_resign_two_players_gives_forfeit_win() {
        let mut seats = two_seats();
        let mut m = MatchState::start_with(&mut seats, 0, NOW);
        mv(&mut m, &mut seats, 1, 0, PieceSize::Small);

        // Blue holds the turn and resigns.
        let events = m.resign(&mut seats, SeatId(2), LIMIT, NOW);

        assert!(seats[1].eliminated);
        assert_eq!(m.status(), MatchStatus::Finished);
        assert_eq!(m.winner(), Some(SeatId(1)));
        assert!(!m.is_draw());
        assert!(events.contains(&EngineEvent::SeatEliminated { seat: SeatId(2) }));
        assert!(matches!(
            events.last(),
            Some(EngineEvent::Finished { winner: Some(SeatId(1)), is_draw: false })
        ));
        // Resigner's placed pieces stay on the board.
        assert_eq!(m.board().visible(0), Some(Color::Red));
    }

    #[test]
    fn test_resign_three_players_match_continues() {
        let mut seats = three_seats();
        let mut m = MatchState::start_with(&mut seats, 0, NOW);

        let events = m.resign(&mut seats, SeatId(3), LIMIT, NOW);

        assert_eq!(m.status(), MatchStatus::Playing);
        assert_eq!(m.current_seat(), SeatId(1), "non-holder resigning keeps the turn");
        assert_eq!(events, vec![EngineEvent::SeatEliminated { seat: SeatId(3) }]);
    }

    #[test]
    fn test_resign_by_turn_holder_advances_before_forfeit_check() {
        let mut seats = three_seats();
        let mut m = MatchState::start_with(&mut seats, 0, NOW);

        let events = m.resign(&mut seats, SeatId(1), LIMIT, NOW);

        assert_eq!(m.status(), MatchStatus::Playing);
        assert_eq!(m.current_seat(), SeatId(2));
        assert!(events.contains(&EngineEvent::TurnSkipped {
            seat: SeatId(1),
            reason: SkipReason::Leave
        }));
    }

    // =====================================================================
    // Scenario S4: timeout → skip → elimination
    // =====================================================================

    #[test]
    fn test_two_forced_skips_eliminate_the_seat() {
        let mut seats = three_seats();
        let mut m = MatchState::start_with(&mut seats, 0, NOW);

        // Red times out once.
        let events = m.force_skip(&mut seats, SkipReason::Timeout, LIMIT, NOW);
        assert_eq!(
            events,
            vec![EngineEvent::TurnSkipped { seat: SeatId(1), reason: SkipReason::Timeout }]
        );
        assert_eq!(seats[0].skips_in_a_row, 1);
        assert_eq!(m.current_seat(), SeatId(2));

        // Blue and green play; red's skip counter is untouched.
        mv(&mut m, &mut seats, 2, 0, PieceSize::Small);
        mv(&mut m, &mut seats, 3, 1, PieceSize::Small);
        assert_eq!(m.current_seat(), SeatId(1));

        // Red times out again: second consecutive skip eliminates.
        let events = m.force_skip(&mut seats, SkipReason::Timeout, LIMIT, NOW);
        assert!(seats[0].eliminated);
        assert!(events.contains(&EngineEvent::SeatEliminated { seat: SeatId(1) }));
        assert_eq!(m.status(), MatchStatus::Playing, "two seats remain");
        assert_eq!(m.current_seat(), SeatId(2));
    }

    #[test]
    fn test_successful_move_resets_skip_counter() {
        let mut seats = three_seats();
        let mut m = MatchState::start_with(&mut seats, 0, NOW);

        m.force_skip(&mut seats, SkipReason::Timeout, LIMIT, NOW);
        mv(&mut m, &mut seats, 2, 0, PieceSize::Small);
        mv(&mut m, &mut seats, 3, 1, PieceSize::Small);
        // Red moves this time: counter back to zero.
        mv(&mut m, &mut seats, 1, 2, PieceSize::Small);
        assert_eq!(seats[0].skips_in_a_row, 0);
    }

    #[test]
    fn test_force_skip_on_finished_match_is_noop() {
        let mut seats = two_seats();
        let mut m = MatchState::start_with(&mut seats, 0, NOW);
        mv(&mut m, &mut seats, 1, 0, PieceSize::Small);
        mv(&mut m, &mut seats, 2, 3, PieceSize::Small);
        mv(&mut m, &mut seats, 1, 1, PieceSize::Small);
        mv(&mut m, &mut seats, 2, 4, PieceSize::Small);
        mv(&mut m, &mut seats, 1, 2, PieceSize::Small);

        let events = m.force_skip(&mut seats, SkipReason::Timeout, LIMIT, NOW);
        assert!(events.is_empty());
        assert_eq!(m.winner(), Some(SeatId(1)), "terminal state is immutable");
    }

    // =====================================================================
    // Turn advancement details
    // =====================================================================

    #[test]
    fn test_turn_epoch_bumps_on_every_advance() {
        let mut seats = two_seats();
        let mut m = MatchState::start_with(&mut seats, 0, NOW);
        assert_eq!(m.turn_epoch(), 1);
        mv(&mut m, &mut seats, 1, 0, PieceSize::Small);
        assert_eq!(m.turn_epoch(), 2);
        mv(&mut m, &mut seats, 2, 1, PieceSize::Small);
        assert_eq!(m.turn_epoch(), 3);
    }

    #[test]
    fn test_disconnected_seat_is_passed_over() {
        let mut seats = three_seats();
        let mut m = MatchState::start_with(&mut seats, 0, NOW);
        seats[1].connected = false;

        mv(&mut m, &mut seats, 1, 0, PieceSize::Small);

        assert_eq!(m.current_seat(), SeatId(3), "turn skips the disconnected seat");
    }

    #[test]
    fn test_all_stuck_is_draw_without_extra_skip_increments() {
        let mut seats = two_seats();
        let mut m = MatchState::start_with(&mut seats, 0, NOW);
        // Drain both inventories directly: nobody can ever move again.
        for seat in seats.iter_mut() {
            seat.inventory = Inventory { small: 0, medium: 0, large: 0 };
        }
        let red_skips = seats[0].skips_in_a_row;
        let blue_skips = seats[1].skips_in_a_row;

        let events = m.force_skip(&mut seats, SkipReason::Timeout, LIMIT, NOW);

        assert_eq!(m.status(), MatchStatus::Finished);
        assert!(m.is_draw());
        assert!(matches!(
            events.last(),
            Some(EngineEvent::Finished { winner: None, is_draw: true })
        ));
        // The forced skip itself counted, but the draw fired before any
        // auto-skip could inflate the other counter.
        assert_eq!(seats[0].skips_in_a_row, red_skips + 1);
        assert_eq!(seats[1].skips_in_a_row, blue_skips);
    }

    #[test]
    fn test_stuck_seat_is_auto_skipped_while_others_can_play() {
        let mut seats = three_seats();
        let mut m = MatchState::start_with(&mut seats, 0, NOW);
        // Blue has nothing to place.
        seats[1].inventory = Inventory { small: 0, medium: 0, large: 0 };

        let events = mv(&mut m, &mut seats, 1, 0, PieceSize::Small);

        assert_eq!(m.current_seat(), SeatId(3), "blue was passed over");
        assert_eq!(
            events,
            vec![EngineEvent::TurnSkipped { seat: SeatId(2), reason: SkipReason::NoMoves }]
        );
        assert_eq!(seats[1].skips_in_a_row, 1);
    }

    #[test]
    fn test_zero_active_seats_sole_uneliminated_wins() {
        let mut seats = three_seats();
        let mut m = MatchState::start_with(&mut seats, 0, NOW);
        seats[1].eliminated = true;
        seats[2].eliminated = true;
        // Red (the only uneliminated seat) disconnects mid-turn, then
        // times out: zero active seats remain.
        seats[0].connected = false;

        let events = m.force_skip(&mut seats, SkipReason::Timeout, LIMIT, NOW);

        assert_eq!(m.status(), MatchStatus::Finished);
        assert_eq!(m.winner(), Some(SeatId(1)));
        assert!(matches!(
            events.last(),
            Some(EngineEvent::Finished { winner: Some(SeatId(1)), is_draw: false })
        ));
    }

    // =====================================================================
    // Views
    // =====================================================================

    #[test]
    fn test_view_reflects_playing_state() {
        let mut seats = two_seats();
        let m = MatchState::start_with(&mut seats, 0, NOW);
        let view = m.view(&seats, 60);

        assert_eq!(view.status, GameStatus::Playing);
        assert_eq!(view.current_player_id, Some(SeatId(1)));
        assert_eq!(view.players.len(), 2);
        assert_eq!(view.started_at, Some(NOW));
        assert_eq!(view.finished_at, None);
        assert_eq!(view.turn_time_left, 60);
    }

    #[test]
    fn test_view_after_finish_has_no_current_player() {
        let mut seats = two_seats();
        let mut m = MatchState::start_with(&mut seats, 0, NOW);
        mv(&mut m, &mut seats, 1, 0, PieceSize::Small);
        mv(&mut m, &mut seats, 2, 3, PieceSize::Small);
        mv(&mut m, &mut seats, 1, 1, PieceSize::Small);
        mv(&mut m, &mut seats, 2, 4, PieceSize::Small);
        mv(&mut m, &mut seats, 1, 2, PieceSize::Small);

        let view = m.view(&seats, 0);
        assert_eq!(view.status, GameStatus::Finished);
        assert_eq!(view.current_player_id, None);
        assert_eq!(view.winner_id, Some(SeatId(1)));
        assert_eq!(view.finished_at, Some(NOW));
    }

    #[test]
    fn test_waiting_view_is_empty_board_no_match_fields() {
        let seats = two_seats();
        let view = waiting_view(&seats);
        assert_eq!(view.status, GameStatus::Waiting);
        assert_eq!(view.current_player_id, None);
        assert_eq!(view.started_at, None);
        assert!(view.board.iter().all(|c| c.slot(PieceSize::Small).is_none()));
    }
}
