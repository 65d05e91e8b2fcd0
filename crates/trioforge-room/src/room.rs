//! Room actor: an isolated Tokio task that owns one room end to end.
//!
//! Each room runs in its own task and is the unit of serialization: all
//! mutations of its seats, match, timers, and replay vote happen one at
//! a time inside the actor loop. The outside world talks to it through
//! an mpsc mailbox; timers and the broadcast tick are multiplexed into
//! the same loop with `select!`, so a timer firing is just another
//! serialized event.
//!
//! Rooms never block on I/O. Outbound fan-out uses bounded per-seat
//! queues with `try_send`; a full queue marks that connection unhealthy
//! (its sender is dropped, which the dispatcher observes as channel
//! closure and turns into a normal disconnect).

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

use tokio::sync::mpsc::{self, error::TrySendError};
use tokio::sync::oneshot;
use trioforge_game::{
    seat_by_id_mut, waiting_view, EngineEvent, MatchState, MatchStatus, Seat,
};
use trioforge_protocol::{
    GameStateView, GameStatus, PieceSize, RoomId, RoomSummary, SeatId, ServerEvent, SkipReason,
    COLOR_PALETTE,
};
use trioforge_timer::{DeadlineTimer, UpdateTicker};

use crate::{validate_nickname, GameConfig, ReplayVote, RoomError, RoomOptions, VoteOutcome};

/// Counter for minting process-unique seat ids.
static NEXT_SEAT_ID: AtomicU64 = AtomicU64::new(1);

/// Period of the `timer-update` broadcast cadence.
const TIMER_BROADCAST_PERIOD: std::time::Duration = std::time::Duration::from_secs(1);

/// Channel sender for delivering events to one seat's connection.
pub type SeatSender = mpsc::Sender<ServerEvent>;

/// Epoch milliseconds now. Wall clock, for client-facing timestamps
/// only; all scheduling uses the monotonic timers.
pub fn now_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

/// Token armed into the turn timer. A fire is only honored when both
/// fields still match the live turn — anything else is a stale timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct TurnDeadline {
    seat: SeatId,
    epoch: u64,
}

/// How a seat leaves a room.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LeaveMode {
    /// The player chose to leave; a running game is forfeited.
    Explicit,
    /// The transport dropped; the seat is held for reconnection.
    Disconnect,
}

/// Successful join result.
#[derive(Debug)]
pub struct JoinOk {
    pub seat_id: SeatId,
    pub view: GameStateView,
}

/// A snapshot of room metadata for the lobby registry and listings.
#[derive(Debug, Clone)]
pub struct RoomInfo {
    pub room_id: RoomId,
    pub name: String,
    pub is_private: bool,
    pub status: GameStatus,
    pub player_count: usize,
    pub capacity: usize,
    pub created_at: u64,
    pub expires_at: u64,
    pub started_at: Option<u64>,
    pub host: Option<SeatId>,
}

impl RoomInfo {
    /// Whether the room accepts another join right now.
    pub fn is_joinable(&self) -> bool {
        self.status == GameStatus::Waiting && self.has_space()
    }

    pub fn has_space(&self) -> bool {
        self.player_count < self.capacity
    }

    pub fn is_expired(&self, now: u64) -> bool {
        now >= self.expires_at
    }

    /// The listing entry shown in `GET /rooms`.
    pub fn summary(&self) -> RoomSummary {
        RoomSummary {
            id: self.room_id,
            name: self.name.clone(),
            player_count: self.player_count,
            capacity: self.capacity,
            is_private: self.is_private,
            status: self.status,
        }
    }

    /// Sort key for "activity": last match start, else creation.
    pub fn activity_at(&self) -> u64 {
        self.started_at.unwrap_or(self.created_at)
    }
}

/// Commands sent to a room actor through its mailbox.
pub(crate) enum RoomCommand {
    Join {
        nickname: String,
        code: Option<String>,
        /// Set only for the creator's initial join; grants the host flag.
        as_host: bool,
        sender: SeatSender,
        reply: oneshot::Sender<Result<JoinOk, RoomError>>,
    },
    Leave {
        seat: SeatId,
        mode: LeaveMode,
        reply: oneshot::Sender<Result<(), RoomError>>,
    },
    Move {
        seat: SeatId,
        cell: u8,
        size: PieceSize,
        reply: oneshot::Sender<Result<(), RoomError>>,
    },
    CastReplayVote {
        seat: SeatId,
        vote: bool,
        reply: oneshot::Sender<Result<(), RoomError>>,
    },
    Reconnect {
        seat: SeatId,
        sender: SeatSender,
        reply: oneshot::Sender<Result<GameStateView, RoomError>>,
    },
    Snapshot {
        reply: oneshot::Sender<GameStateView>,
    },
    Info {
        reply: oneshot::Sender<RoomInfo>,
    },
    Shutdown {
        reason: String,
    },
}

/// Handle to a running room actor. Cheap to clone; the lobby registry
/// holds one per room.
#[derive(Clone)]
pub struct RoomHandle {
    room_id: RoomId,
    sender: mpsc::Sender<RoomCommand>,
}

impl RoomHandle {
    pub fn room_id(&self) -> RoomId {
        self.room_id
    }

    async fn request<T>(
        &self,
        build: impl FnOnce(oneshot::Sender<T>) -> RoomCommand,
    ) -> Result<T, RoomError> {
        let (tx, rx) = oneshot::channel();
        self.sender
            .send(build(tx))
            .await
            .map_err(|_| RoomError::Unavailable(self.room_id))?;
        rx.await.map_err(|_| RoomError::Unavailable(self.room_id))
    }

    /// Takes a seat. `as_host` only on the creator's first join.
    pub async fn join(
        &self,
        nickname: String,
        code: Option<String>,
        as_host: bool,
        sender: SeatSender,
    ) -> Result<JoinOk, RoomError> {
        self.request(|reply| RoomCommand::Join { nickname, code, as_host, sender, reply })
            .await?
    }

    pub async fn leave(&self, seat: SeatId, mode: LeaveMode) -> Result<(), RoomError> {
        self.request(|reply| RoomCommand::Leave { seat, mode, reply }).await?
    }

    pub async fn submit_move(
        &self,
        seat: SeatId,
        cell: u8,
        size: PieceSize,
    ) -> Result<(), RoomError> {
        self.request(|reply| RoomCommand::Move { seat, cell, size, reply }).await?
    }

    pub async fn cast_replay_vote(&self, seat: SeatId, vote: bool) -> Result<(), RoomError> {
        self.request(|reply| RoomCommand::CastReplayVote { seat, vote, reply }).await?
    }

    pub async fn reconnect(
        &self,
        seat: SeatId,
        sender: SeatSender,
    ) -> Result<GameStateView, RoomError> {
        self.request(|reply| RoomCommand::Reconnect { seat, sender, reply }).await?
    }

    pub async fn snapshot(&self) -> Result<GameStateView, RoomError> {
        self.request(|reply| RoomCommand::Snapshot { reply }).await
    }

    pub async fn info(&self) -> Result<RoomInfo, RoomError> {
        self.request(|reply| RoomCommand::Info { reply }).await
    }

    pub async fn shutdown(&self, reason: &str) -> Result<(), RoomError> {
        self.sender
            .send(RoomCommand::Shutdown { reason: reason.to_string() })
            .await
            .map_err(|_| RoomError::Unavailable(self.room_id))
    }
}

// ---------------------------------------------------------------------------
// The actor
// ---------------------------------------------------------------------------

struct RoomActor {
    room_id: RoomId,
    options: RoomOptions,
    config: GameConfig,
    seats: Vec<Seat>,
    senders: HashMap<SeatId, SeatSender>,
    match_state: Option<MatchState>,
    vote: Option<ReplayVote>,
    created_at: u64,
    expires_at: u64,
    closing: bool,
    receiver: mpsc::Receiver<RoomCommand>,
    turn_timer: DeadlineTimer<TurnDeadline>,
    vote_timer: DeadlineTimer<()>,
    ticker: UpdateTicker,
}

impl RoomActor {
    async fn run(mut self) {
        tracing::info!(room_id = %self.room_id, name = %self.options.name, "room actor started");

        loop {
            tokio::select! {
                cmd = self.receiver.recv() => match cmd {
                    Some(cmd) => self.handle_command(cmd),
                    None => break,
                },
                fired = self.turn_timer.wait() => self.handle_turn_timeout(fired),
                _ = self.vote_timer.wait() => self.handle_vote_expiry(),
                _ = self.ticker.wait() => self.broadcast_timer_update(),
            }

            if self.closing {
                break;
            }
        }

        tracing::info!(room_id = %self.room_id, "room actor stopped");
    }

    fn handle_command(&mut self, cmd: RoomCommand) {
        match cmd {
            RoomCommand::Join { nickname, code, as_host, sender, reply } => {
                let result = self.handle_join(nickname, code, as_host, sender);
                let _ = reply.send(result);
            }
            RoomCommand::Leave { seat, mode, reply } => {
                let result = self.handle_leave(seat, mode);
                let _ = reply.send(result);
            }
            RoomCommand::Move { seat, cell, size, reply } => {
                let result = self.handle_move(seat, cell, size);
                let _ = reply.send(result);
            }
            RoomCommand::CastReplayVote { seat, vote, reply } => {
                let result = self.handle_cast_vote(seat, vote);
                let _ = reply.send(result);
            }
            RoomCommand::Reconnect { seat, sender, reply } => {
                let result = self.handle_reconnect(seat, sender);
                let _ = reply.send(result);
            }
            RoomCommand::Snapshot { reply } => {
                let _ = reply.send(self.view());
            }
            RoomCommand::Info { reply } => {
                let _ = reply.send(self.info());
            }
            RoomCommand::Shutdown { reason } => {
                self.close_room(&reason);
            }
        }
    }

    // -- Join / leave / reconnect -----------------------------------------

    fn handle_join(
        &mut self,
        nickname: String,
        code: Option<String>,
        as_host: bool,
        sender: SeatSender,
    ) -> Result<JoinOk, RoomError> {
        if self.closing || now_ms() >= self.expires_at {
            return Err(RoomError::Expired(self.room_id));
        }
        if self.match_state.is_some() {
            return Err(RoomError::InProgress(self.room_id));
        }
        if self.seats.len() >= self.options.capacity {
            return Err(RoomError::Full(self.room_id));
        }
        let nickname = validate_nickname(&nickname)?;
        if self.options.is_private {
            let expected = self.options.code.as_deref().unwrap_or("");
            let supplied = code.as_deref().unwrap_or("");
            if !constant_time_eq(expected, supplied) {
                return Err(RoomError::InvalidCode(self.room_id));
            }
        }
        let color = COLOR_PALETTE
            .iter()
            .copied()
            .find(|c| self.seats.iter().all(|s| s.color != *c))
            .ok_or(RoomError::NoColor(self.room_id))?;

        let seat_id = SeatId(NEXT_SEAT_ID.fetch_add(1, Ordering::Relaxed));
        let mut seat = Seat::new(seat_id, nickname, color);
        seat.is_host = as_host && self.seats.iter().all(|s| !s.is_host);

        let player = seat.view();
        self.seats.push(seat);
        self.senders.insert(seat_id, sender);

        tracing::info!(
            room_id = %self.room_id,
            %seat_id,
            %color,
            players = self.seats.len(),
            "seat joined"
        );

        let state = self.view();
        self.broadcast_except(seat_id, ServerEvent::PlayerJoined { player, state });

        // A full room starts playing immediately.
        if self.seats.len() == self.options.capacity {
            self.start_match(false);
        }

        Ok(JoinOk { seat_id, view: self.view() })
    }

    fn handle_leave(&mut self, seat: SeatId, mode: LeaveMode) -> Result<(), RoomError> {
        if !self.seats.iter().any(|s| s.id == seat) {
            return Err(RoomError::NotInRoom(seat, self.room_id));
        }
        self.senders.remove(&seat);

        if self.match_state.is_none() {
            // Waiting: the seat is removed entirely, for both modes.
            self.remove_waiting_seat(seat);
            return Ok(());
        }

        match mode {
            LeaveMode::Explicit => {
                if let Some(record) = seat_by_id_mut(&mut self.seats, seat) {
                    record.connected = false;
                }
                self.broadcast(ServerEvent::PlayerDisconnected { player_id: seat });

                let limit = self.config.consecutive_skip_limit;
                let events = self
                    .match_state
                    .as_mut()
                    .expect("checked above")
                    .resign(&mut self.seats, seat, limit, now_ms());

                let state = self.view();
                self.broadcast(ServerEvent::GameUpdated { state });
                self.process_engine_events(events);
                self.rearm_turn_timer();
            }
            LeaveMode::Disconnect => {
                // The seat keeps its pieces and inventory; the turn
                // timer keeps running and the skip cascade applies.
                if let Some(record) = seat_by_id_mut(&mut self.seats, seat) {
                    record.connected = false;
                }
                tracing::info!(room_id = %self.room_id, %seat, "seat disconnected");
                self.broadcast(ServerEvent::PlayerDisconnected { player_id: seat });
            }
        }
        Ok(())
    }

    /// Removes a seat from a waiting room, promoting a new host if the
    /// leaver held the flag. An emptied room closes.
    fn remove_waiting_seat(&mut self, seat: SeatId) {
        let Some(idx) = self.seats.iter().position(|s| s.id == seat) else {
            return;
        };
        let was_host = self.seats[idx].is_host;
        self.seats.remove(idx);
        tracing::info!(
            room_id = %self.room_id,
            %seat,
            players = self.seats.len(),
            "seat left while waiting"
        );

        self.broadcast(ServerEvent::PlayerDisconnected { player_id: seat });

        if was_host {
            // Earliest-joined remaining seat inherits the host flag.
            if let Some(first) = self.seats.first_mut() {
                first.is_host = true;
                let host_id = first.id;
                self.broadcast(ServerEvent::HostTransferred { host_id });
            }
        }

        if self.seats.is_empty() {
            self.close_room("room is empty");
        } else {
            let state = self.view();
            self.broadcast(ServerEvent::GameUpdated { state });
        }
    }

    fn handle_reconnect(
        &mut self,
        seat: SeatId,
        sender: SeatSender,
    ) -> Result<GameStateView, RoomError> {
        if self.closing {
            return Err(RoomError::Expired(self.room_id));
        }
        let Some(record) = seat_by_id_mut(&mut self.seats, seat) else {
            return Err(RoomError::NotInRoom(seat, self.room_id));
        };
        record.connected = true;
        self.senders.insert(seat, sender);
        tracing::info!(room_id = %self.room_id, %seat, "seat reconnected");

        let state = self.view();
        self.broadcast_except(seat, ServerEvent::GameUpdated { state });
        Ok(self.view())
    }

    // -- Match flow --------------------------------------------------------

    fn handle_move(&mut self, seat: SeatId, cell: u8, size: PieceSize) -> Result<(), RoomError> {
        let Some(match_state) = self.match_state.as_mut() else {
            return Err(RoomError::Game(trioforge_game::GameError::MatchOver));
        };
        let limit = self.config.consecutive_skip_limit;
        let events = match_state.submit_move(&mut self.seats, seat, cell, size, limit, now_ms())?;

        let state = self.view();
        self.broadcast(ServerEvent::GameUpdated { state });
        self.process_engine_events(events);
        self.rearm_turn_timer();
        Ok(())
    }

    fn handle_turn_timeout(&mut self, fired: TurnDeadline) {
        let Some(match_state) = self.match_state.as_mut() else {
            return;
        };
        if match_state.status() != MatchStatus::Playing {
            return;
        }
        // Stale fire: the turn moved on before the deadline message was
        // processed. Ignore it.
        if fired.seat != match_state.current_seat() || fired.epoch != match_state.turn_epoch() {
            tracing::debug!(room_id = %self.room_id, ?fired, "stale turn timeout ignored");
            return;
        }

        tracing::info!(room_id = %self.room_id, seat = %fired.seat, "turn timed out");
        let limit = self.config.consecutive_skip_limit;
        let events =
            match_state.force_skip(&mut self.seats, SkipReason::Timeout, limit, now_ms());
        self.process_engine_events(events);
        self.rearm_turn_timer();
    }

    /// Starts a match over the current seats, resetting the room TTL.
    fn start_match(&mut self, restart: bool) {
        let match_state = MatchState::start(&mut self.seats, now_ms());
        self.turn_timer.arm(
            TurnDeadline {
                seat: match_state.current_seat(),
                epoch: match_state.turn_epoch(),
            },
            self.config.turn_timeout,
        );
        self.ticker.start();
        self.expires_at = now_ms() + self.config.room_ttl.as_millis() as u64;
        self.match_state = Some(match_state);

        tracing::info!(room_id = %self.room_id, restart, "match started");

        let state = self.view();
        let event = if restart {
            ServerEvent::GameRestarted { state }
        } else {
            ServerEvent::GameStarted { state }
        };
        self.broadcast(event);
    }

    /// Translates engine events into broadcasts; a terminal event tears
    /// the timers down and opens the replay vote.
    fn process_engine_events(&mut self, events: Vec<EngineEvent>) {
        for event in events {
            match event {
                EngineEvent::TurnSkipped { seat, reason } => {
                    let game_state = self.view();
                    self.broadcast(ServerEvent::TurnSkipped {
                        skipped_player_id: seat,
                        reason,
                        game_state,
                    });
                }
                EngineEvent::SeatEliminated { seat } => {
                    tracing::info!(room_id = %self.room_id, %seat, "seat eliminated");
                    let state = self.view();
                    self.broadcast(ServerEvent::PlayerEliminated { player_id: seat, state });
                }
                EngineEvent::Finished { winner, is_draw } => {
                    self.on_match_finished(winner, is_draw);
                }
            }
        }
    }

    fn on_match_finished(&mut self, winner: Option<SeatId>, is_draw: bool) {
        self.turn_timer.cancel();
        self.ticker.stop();

        tracing::info!(room_id = %self.room_id, ?winner, is_draw, "match finished");
        let state = self.view();
        self.broadcast(ServerEvent::GameEnded { winner_id: winner, is_draw, state });

        // Open the replay vote among the seats present right now.
        let voters: Vec<SeatId> =
            self.seats.iter().filter(|s| s.connected).map(|s| s.id).collect();
        if voters.is_empty() {
            self.close_room("no players remain");
            return;
        }

        let deadline_ms = now_ms() + self.config.replay_vote_window.as_millis() as u64;
        let vote = ReplayVote::open(voters, deadline_ms);
        let replay_votes = vote.ballots();
        self.vote = Some(vote);
        self.vote_timer.arm((), self.config.replay_vote_window);

        self.broadcast(ServerEvent::ReplayVotingStarted {
            replay_deadline: deadline_ms,
            replay_votes,
        });
    }

    fn handle_cast_vote(&mut self, seat: SeatId, approve: bool) -> Result<(), RoomError> {
        let (outcome, ballots) = {
            let vote = self.vote.as_mut().ok_or(RoomError::VoteNotActive)?;
            let outcome = vote.cast(seat, approve)?;
            (outcome, vote.ballots())
        };

        self.broadcast(ServerEvent::ReplayVoteUpdated { replay_votes: ballots });

        match outcome {
            None => {}
            Some(VoteOutcome::Accepted) => {
                self.vote = None;
                self.vote_timer.cancel();
                self.start_match(true);
            }
            Some(VoteOutcome::Rejected) | Some(VoteOutcome::Expired) => {
                self.vote = None;
                self.vote_timer.cancel();
                self.broadcast(ServerEvent::ReplayRejected);
                self.close_room("replay rejected");
            }
        }
        Ok(())
    }

    fn handle_vote_expiry(&mut self) {
        if self.vote.take().is_some() {
            tracing::info!(room_id = %self.room_id, "replay vote window expired");
            self.broadcast(ServerEvent::ReplayTimeout);
            self.close_room("replay window expired");
        }
    }

    // -- Timers and snapshots ----------------------------------------------

    fn rearm_turn_timer(&mut self) {
        if let Some(match_state) = &self.match_state {
            if match_state.status() == MatchStatus::Playing {
                self.turn_timer.arm(
                    TurnDeadline {
                        seat: match_state.current_seat(),
                        epoch: match_state.turn_epoch(),
                    },
                    self.config.turn_timeout,
                );
            }
        }
    }

    fn broadcast_timer_update(&mut self) {
        let Some(match_state) = &self.match_state else {
            self.ticker.stop();
            return;
        };
        if match_state.status() != MatchStatus::Playing {
            self.ticker.stop();
            return;
        }
        let event = ServerEvent::TimerUpdate {
            turn_time_left: self.turn_timer.remaining().as_secs(),
            current_player_id: Some(match_state.current_seat()),
        };
        self.broadcast(event);
    }

    fn view(&self) -> GameStateView {
        match &self.match_state {
            Some(m) => m.view(&self.seats, self.turn_timer.remaining().as_secs()),
            None => waiting_view(&self.seats),
        }
    }

    fn status(&self) -> GameStatus {
        match &self.match_state {
            None => GameStatus::Waiting,
            Some(m) => match m.status() {
                MatchStatus::Playing => GameStatus::Playing,
                MatchStatus::Finished => GameStatus::Finished,
            },
        }
    }

    fn info(&self) -> RoomInfo {
        RoomInfo {
            room_id: self.room_id,
            name: self.options.name.clone(),
            is_private: self.options.is_private,
            status: self.status(),
            player_count: self.seats.len(),
            capacity: self.options.capacity,
            created_at: self.created_at,
            expires_at: self.expires_at,
            started_at: self.match_state.as_ref().map(|m| m.started_at()),
            host: self.seats.iter().find(|s| s.is_host).map(|s| s.id),
        }
    }

    // -- Fan-out -----------------------------------------------------------

    fn broadcast(&mut self, event: ServerEvent) {
        let ids: Vec<SeatId> = self.senders.keys().copied().collect();
        for id in ids {
            self.send_to(id, event.clone());
        }
    }

    fn broadcast_except(&mut self, excluded: SeatId, event: ServerEvent) {
        let ids: Vec<SeatId> = self.senders.keys().copied().collect();
        for id in ids {
            if id != excluded {
                self.send_to(id, event.clone());
            }
        }
    }

    /// Non-blocking send to one seat. A full queue means the client is
    /// too slow: its sender is dropped, the dispatcher's forward task
    /// sees the closed channel and tears the connection down.
    fn send_to(&mut self, seat: SeatId, event: ServerEvent) {
        let Some(sender) = self.senders.get(&seat) else {
            return;
        };
        match sender.try_send(event) {
            Ok(()) => {}
            Err(TrySendError::Full(_)) => {
                tracing::warn!(
                    room_id = %self.room_id,
                    %seat,
                    "outbound queue overflow, dropping connection"
                );
                self.senders.remove(&seat);
            }
            Err(TrySendError::Closed(_)) => {
                self.senders.remove(&seat);
            }
        }
    }

    fn close_room(&mut self, reason: &str) {
        tracing::info!(room_id = %self.room_id, reason, "room closing");
        self.broadcast(ServerEvent::RoomClosed { reason: reason.to_string() });
        self.turn_timer.cancel();
        self.vote_timer.cancel();
        self.ticker.stop();
        self.closing = true;
    }
}

/// Spawns a room actor task and returns its handle.
///
/// `mailbox_size` bounds the command channel; senders await when it is
/// full, which backpressures the dispatcher rather than the room.
pub(crate) fn spawn_room(
    room_id: RoomId,
    options: RoomOptions,
    config: GameConfig,
    mailbox_size: usize,
) -> RoomHandle {
    let (tx, rx) = mpsc::channel(mailbox_size);
    let created_at = now_ms();
    let expires_at = created_at + config.room_ttl.as_millis() as u64;

    let actor = RoomActor {
        room_id,
        options,
        config,
        seats: Vec::new(),
        senders: HashMap::new(),
        match_state: None,
        vote: None,
        created_at,
        expires_at,
        closing: false,
        receiver: rx,
        turn_timer: DeadlineTimer::new(),
        vote_timer: DeadlineTimer::new(),
        ticker: UpdateTicker::new(TIMER_BROADCAST_PERIOD),
    };

    tokio::spawn(actor.run());

    RoomHandle { room_id, sender: tx }
}

/// Constant-time string equality for access codes. Scans the longer of
/// the two inputs so timing does not leak a matching prefix length.
fn constant_time_eq(a: &str, b: &str) -> bool {
    let a = a.as_bytes();
    let b = b.as_bytes();
    let mut diff = a.len() ^ b.len();
    for i in 0..a.len().max(b.len()) {
        let x = a.get(i).copied().unwrap_or(0);
        let y = b.get(i).copied().unwrap_or(0);
        diff |= usize::from(x ^ y);
    }
    diff == 0
}
