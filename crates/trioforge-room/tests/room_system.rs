//! Integration tests for room actors and the lobby registry.
//!
//! Rooms run as real Tokio tasks here; tests talk to them through
//! handles exactly like the dispatcher does. Timer-driven behavior
//! (turn timeouts, the replay window) runs under paused Tokio time so
//! deadlines resolve instantly and deterministically.

use std::time::Duration;

use tokio::sync::mpsc;
use tokio::time::{advance, timeout};
use trioforge_protocol::{
    Color, GameStatus, PieceSize, SeatId, ServerEvent, SkipReason,
};
use trioforge_room::{
    GameConfig, JoinOk, LeaveMode, ListQuery, LobbyRegistry, RoomError, RoomHandle, RoomOptions,
    SeatSender, SortKey,
};

// =========================================================================
// Helpers
// =========================================================================

type EventRx = mpsc::Receiver<ServerEvent>;

fn registry() -> LobbyRegistry {
    LobbyRegistry::new(GameConfig::default())
}

fn registry_with(config: GameConfig) -> LobbyRegistry {
    LobbyRegistry::new(config)
}

fn opts(name: &str, capacity: usize) -> RoomOptions {
    RoomOptions::new(name, capacity, false, None).unwrap()
}

fn private_opts(name: &str, code: &str) -> RoomOptions {
    RoomOptions::new(name, 2, true, Some(code.to_string())).unwrap()
}

fn channel() -> (SeatSender, EventRx) {
    mpsc::channel(32)
}

/// Joins a room with a fresh event channel, returning the seat id and
/// its receiver.
async fn join(room: &RoomHandle, nickname: &str, as_host: bool) -> (SeatId, EventRx) {
    let (tx, rx) = channel();
    let JoinOk { seat_id, .. } = room
        .join(nickname.to_string(), None, as_host, tx)
        .await
        .expect("join should succeed");
    (seat_id, rx)
}

/// Receives events until one matches the predicate, or panics after a
/// grace period. Unrelated events (timer updates etc.) are skipped.
async fn expect_event(
    rx: &mut EventRx,
    what: &str,
    pred: impl Fn(&ServerEvent) -> bool,
) -> ServerEvent {
    let deadline = Duration::from_secs(5);
    timeout(deadline, async {
        loop {
            match rx.recv().await {
                Some(ev) if pred(&ev) => return ev,
                Some(_) => continue,
                None => panic!("channel closed while waiting for {what}"),
            }
        }
    })
    .await
    .unwrap_or_else(|_| panic!("timed out waiting for {what}"))
}

/// Lets the room actor drain its mailbox.
async fn settle() {
    tokio::time::sleep(Duration::from_millis(10)).await;
}

/// Sets up a started 2-player game. Returns (room, mover, waiter) where
/// `mover` holds the first turn.
async fn two_player_game(
    reg: &mut LobbyRegistry,
) -> (RoomHandle, (SeatId, EventRx), (SeatId, EventRx)) {
    let room = reg.create(opts("game", 2));
    let (a, rx_a) = join(&room, "ada", true).await;
    let (b, rx_b) = join(&room, "bo", false).await;

    let view = room.snapshot().await.unwrap();
    assert_eq!(view.status, GameStatus::Playing);
    let first = view.current_player_id.expect("someone holds the turn");

    if first == a {
        (room, (a, rx_a), (b, rx_b))
    } else {
        (room, (b, rx_b), (a, rx_a))
    }
}

/// Drives the mover to a top-row win: mover plays P→0,1,2 while the
/// waiter fills 3 and 4 (scenario S1).
async fn play_to_win(room: &RoomHandle, mover: SeatId, waiter: SeatId) {
    room.submit_move(mover, 0, PieceSize::Small).await.unwrap();
    room.submit_move(waiter, 3, PieceSize::Small).await.unwrap();
    room.submit_move(mover, 1, PieceSize::Small).await.unwrap();
    room.submit_move(waiter, 4, PieceSize::Small).await.unwrap();
    room.submit_move(mover, 2, PieceSize::Small).await.unwrap();
}

// =========================================================================
// Join / lobby lifecycle
// =========================================================================

#[tokio::test]
async fn test_join_assigns_palette_colors_in_order() {
    let mut reg = registry();
    let room = reg.create(opts("colors", 4));

    join(&room, "p1", true).await;
    join(&room, "p2", false).await;
    join(&room, "p3", false).await;

    let view = room.snapshot().await.unwrap();
    let colors: Vec<Color> = view.players.iter().map(|p| p.color).collect();
    assert_eq!(colors, vec![Color::Red, Color::Blue, Color::Green]);
}

#[tokio::test]
async fn test_first_joiner_with_host_claim_is_host() {
    let mut reg = registry();
    let room = reg.create(opts("hosted", 3));

    let (host, _rx) = join(&room, "ada", true).await;
    join(&room, "bo", false).await;

    let info = room.info().await.unwrap();
    assert_eq!(info.host, Some(host));
    let view = room.snapshot().await.unwrap();
    assert_eq!(view.players.iter().filter(|p| p.is_host).count(), 1);
}

#[tokio::test]
async fn test_match_starts_when_capacity_reached() {
    let mut reg = registry();
    let room = reg.create(opts("duo", 2));

    let (_a, mut rx_a) = join(&room, "ada", true).await;
    let info = room.info().await.unwrap();
    assert_eq!(info.status, GameStatus::Waiting);

    let (_b, mut rx_b) = join(&room, "bo", false).await;

    expect_event(&mut rx_a, "game-started", |e| {
        matches!(e, ServerEvent::GameStarted { .. })
    })
    .await;
    expect_event(&mut rx_b, "game-started", |e| {
        matches!(e, ServerEvent::GameStarted { .. })
    })
    .await;

    let view = room.snapshot().await.unwrap();
    assert_eq!(view.status, GameStatus::Playing);
    assert!(view.current_player_id.is_some());
    assert!(view.started_at.is_some());
}

#[tokio::test]
async fn test_join_running_game_is_rejected() {
    let mut reg = registry();
    let (room, _, _) = two_player_game(&mut reg).await;

    let (tx, _rx) = channel();
    let result = room.join("late".into(), None, false, tx).await;
    assert!(matches!(result, Err(RoomError::InProgress(_))));
}

#[tokio::test]
async fn test_fifth_join_into_four_seat_room_is_rejected() {
    // A room at capacity has already auto-started, so the rejection
    // surfaces as InProgress rather than Full. Either way: no 5th seat.
    let mut reg = registry();
    let room = reg.create(opts("big", 4));
    for (i, name) in ["a", "b", "c", "d"].iter().enumerate() {
        join(&room, name, i == 0).await;
    }
    let (tx, _rx) = channel();
    let result = room.join("e".into(), None, false, tx).await;
    assert!(result.is_err());
}

#[tokio::test]
async fn test_private_room_requires_matching_code() {
    let mut reg = registry();
    let room = reg.create(private_opts("secret", "sesame"));

    let (tx, _rx) = channel();
    let wrong = room.join("ada".into(), Some("SESAME".into()), true, tx).await;
    assert!(matches!(wrong, Err(RoomError::InvalidCode(_))), "codes are case-sensitive");

    let (tx, _rx) = channel();
    let missing = room.join("ada".into(), None, true, tx).await;
    assert!(matches!(missing, Err(RoomError::InvalidCode(_))));

    let (tx, _rx) = channel();
    let right = room.join("ada".into(), Some("sesame".into()), true, tx).await;
    assert!(right.is_ok());
}

#[tokio::test]
async fn test_join_rejects_blank_nickname() {
    let mut reg = registry();
    let room = reg.create(opts("names", 2));
    let (tx, _rx) = channel();
    let result = room.join("   ".into(), None, true, tx).await;
    assert!(matches!(result, Err(RoomError::InvalidInput(_))));
}

#[tokio::test]
async fn test_expired_room_rejects_joins() {
    let mut reg = registry_with(GameConfig {
        room_ttl: Duration::ZERO,
        ..GameConfig::default()
    });
    let room = reg.create(opts("stale", 2));

    let (tx, _rx) = channel();
    let result = room.join("ada".into(), None, true, tx).await;
    assert!(matches!(result, Err(RoomError::Expired(_))));
}

// =========================================================================
// Leave / host transfer
// =========================================================================

#[tokio::test]
async fn test_host_leave_while_waiting_promotes_earliest_joined() {
    let mut reg = registry();
    let room = reg.create(opts("transfer", 3));
    let (host, _rx_h) = join(&room, "ada", true).await;
    let (second, mut rx_s) = join(&room, "bo", false).await;
    join(&room, "cy", false).await;

    room.leave(host, LeaveMode::Explicit).await.unwrap();

    let ev = expect_event(&mut rx_s, "host-transferred", |e| {
        matches!(e, ServerEvent::HostTransferred { .. })
    })
    .await;
    assert!(matches!(ev, ServerEvent::HostTransferred { host_id } if host_id == second));

    let info = room.info().await.unwrap();
    assert_eq!(info.host, Some(second));
    assert_eq!(info.player_count, 2);
}

#[tokio::test]
async fn test_last_leaver_closes_waiting_room() {
    let mut reg = registry();
    let room = reg.create(opts("ghost", 2));
    let (seat, _rx) = join(&room, "ada", true).await;

    room.leave(seat, LeaveMode::Explicit).await.unwrap();
    settle().await;

    // The actor has stopped; further commands fail.
    assert!(room.info().await.is_err());
}

#[tokio::test]
async fn test_explicit_leave_during_game_forfeits() {
    // Scenario S3: the leaver is eliminated, the sole remaining seat
    // wins, pieces stay on the board.
    let mut reg = registry();
    let (room, (mover, _rx_m), (waiter, mut rx_w)) = two_player_game(&mut reg).await;
    room.submit_move(mover, 0, PieceSize::Small).await.unwrap();

    room.leave(mover, LeaveMode::Explicit).await.unwrap();

    let ev = expect_event(&mut rx_w, "game-ended", |e| {
        matches!(e, ServerEvent::GameEnded { .. })
    })
    .await;
    match ev {
        ServerEvent::GameEnded { winner_id, is_draw, state } => {
            assert_eq!(winner_id, Some(waiter));
            assert!(!is_draw);
            // The resigner's piece is still on the board.
            assert!(state.board[0].slot(PieceSize::Small).is_some());
        }
        other => panic!("expected GameEnded, got {other:?}"),
    }
}

#[tokio::test]
async fn test_disconnect_during_game_does_not_eliminate() {
    let mut reg = registry();
    let (room, (mover, _rx_m), (_waiter, mut rx_w)) = two_player_game(&mut reg).await;

    room.leave(mover, LeaveMode::Disconnect).await.unwrap();

    expect_event(&mut rx_w, "player-disconnected", |e| {
        matches!(e, ServerEvent::PlayerDisconnected { .. })
    })
    .await;

    let view = room.snapshot().await.unwrap();
    let player = view.players.iter().find(|p| p.id == mover).unwrap();
    assert!(!player.connected);
    assert!(!player.is_eliminated, "disconnect alone never eliminates");
    assert_eq!(view.status, GameStatus::Playing);
}

#[tokio::test]
async fn test_reconnect_restores_connected_flag_and_returns_snapshot() {
    let mut reg = registry();
    let (room, (mover, _rx_m), _) = two_player_game(&mut reg).await;

    room.leave(mover, LeaveMode::Disconnect).await.unwrap();

    let (tx, _rx) = channel();
    let view = room.reconnect(mover, tx).await.unwrap();

    assert_eq!(view.status, GameStatus::Playing);
    let player = view.players.iter().find(|p| p.id == mover).unwrap();
    assert!(player.connected);
}

// =========================================================================
// Moves
// =========================================================================

#[tokio::test]
async fn test_move_broadcasts_game_updated_to_all_seats() {
    let mut reg = registry();
    let (room, (mover, mut rx_m), (_waiter, mut rx_w)) = two_player_game(&mut reg).await;

    room.submit_move(mover, 4, PieceSize::Large).await.unwrap();

    for (who, rx) in [("mover", &mut rx_m), ("waiter", &mut rx_w)] {
        let ev = expect_event(rx, "game-updated", |e| {
            matches!(e, ServerEvent::GameUpdated { .. })
        })
        .await;
        match ev {
            ServerEvent::GameUpdated { state } => {
                assert_eq!(
                    state.board[4].slot(PieceSize::Large).is_some(),
                    true,
                    "{who} sees the piece"
                );
            }
            other => panic!("expected GameUpdated, got {other:?}"),
        }
    }
}

#[tokio::test]
async fn test_wrong_turn_move_is_rejected_with_forbidden() {
    let mut reg = registry();
    let (room, _, (waiter, _rx_w)) = two_player_game(&mut reg).await;

    let err = room.submit_move(waiter, 0, PieceSize::Small).await.unwrap_err();
    assert_eq!(err.code(), trioforge_protocol::ErrorCode::Forbidden);
}

#[tokio::test]
async fn test_occupied_slot_move_is_rejected_with_illegal_move() {
    let mut reg = registry();
    let (room, (mover, _rx_m), (waiter, _rx_w)) = two_player_game(&mut reg).await;

    room.submit_move(mover, 0, PieceSize::Small).await.unwrap();
    let err = room.submit_move(waiter, 0, PieceSize::Small).await.unwrap_err();
    assert_eq!(err.code(), trioforge_protocol::ErrorCode::IllegalMove);
}

#[tokio::test]
async fn test_win_emits_game_ended_and_opens_replay_vote() {
    let mut reg = registry();
    let (room, (mover, mut rx_m), (waiter, _rx_w)) = two_player_game(&mut reg).await;

    play_to_win(&room, mover, waiter).await;

    let ev = expect_event(&mut rx_m, "game-ended", |e| {
        matches!(e, ServerEvent::GameEnded { .. })
    })
    .await;
    assert!(matches!(
        ev,
        ServerEvent::GameEnded { winner_id, is_draw: false, .. } if winner_id == Some(mover)
    ));

    expect_event(&mut rx_m, "replay-voting-started", |e| {
        matches!(e, ServerEvent::ReplayVotingStarted { .. })
    })
    .await;

    let view = room.snapshot().await.unwrap();
    assert_eq!(view.status, GameStatus::Finished);
    assert_eq!(view.winner_id, Some(mover));
}

// =========================================================================
// Turn timer
// =========================================================================

#[tokio::test(start_paused = true)]
async fn test_turn_timeout_skips_the_active_seat() {
    let mut reg = registry();
    let (room, (mover, _rx_m), (waiter, mut rx_w)) = two_player_game(&mut reg).await;

    advance(Duration::from_secs(60)).await;
    settle().await;

    let ev = expect_event(&mut rx_w, "turn-skipped", |e| {
        matches!(e, ServerEvent::TurnSkipped { .. })
    })
    .await;
    match ev {
        ServerEvent::TurnSkipped { skipped_player_id, reason, game_state } => {
            assert_eq!(skipped_player_id, mover);
            assert_eq!(reason, SkipReason::Timeout);
            assert_eq!(game_state.current_player_id, Some(waiter));
            let skipped =
                game_state.players.iter().find(|p| p.id == mover).unwrap();
            assert_eq!(skipped.skips_in_a_row, 1);
        }
        other => panic!("expected TurnSkipped, got {other:?}"),
    }
}

#[tokio::test(start_paused = true)]
async fn test_second_consecutive_timeout_eliminates_and_ends_two_player_game() {
    let mut reg = registry();
    let (room, (mover, _rx_m), (waiter, mut rx_w)) = two_player_game(&mut reg).await;

    // mover times out (skip 1), then waiter times out (skip 1), then
    // mover times out again (skip 2 → eliminated → waiter wins).
    for _ in 0..3 {
        advance(Duration::from_secs(60)).await;
        settle().await;
    }

    expect_event(&mut rx_w, "player-eliminated", |e| {
        matches!(e, ServerEvent::PlayerEliminated { player_id, .. } if *player_id == mover)
    })
    .await;
    let ev = expect_event(&mut rx_w, "game-ended", |e| {
        matches!(e, ServerEvent::GameEnded { .. })
    })
    .await;
    assert!(matches!(
        ev,
        ServerEvent::GameEnded { winner_id, is_draw: false, .. } if winner_id == Some(waiter)
    ));

    let view = room.snapshot().await.unwrap();
    assert_eq!(view.status, GameStatus::Finished);
}

#[tokio::test(start_paused = true)]
async fn test_move_cancels_pending_timeout() {
    let mut reg = registry();
    let (room, (mover, _rx_m), (waiter, _rx_w)) = two_player_game(&mut reg).await;

    // Move at t=59s: the original deadline must not fire at t=60s.
    advance(Duration::from_secs(59)).await;
    room.submit_move(mover, 0, PieceSize::Small).await.unwrap();

    advance(Duration::from_secs(1)).await;
    settle().await;

    let view = room.snapshot().await.unwrap();
    assert_eq!(view.current_player_id, Some(waiter));
    let m = view.players.iter().find(|p| p.id == mover).unwrap();
    assert_eq!(m.skips_in_a_row, 0, "the move beat the deadline");
}

#[tokio::test(start_paused = true)]
async fn test_timer_updates_broadcast_while_playing() {
    let mut reg = registry();
    let (_room, (_mover, _rx_m), (_waiter, mut rx_w)) = two_player_game(&mut reg).await;

    advance(Duration::from_millis(1500)).await;
    settle().await;

    let ev = expect_event(&mut rx_w, "timer-update", |e| {
        matches!(e, ServerEvent::TimerUpdate { .. })
    })
    .await;
    match ev {
        ServerEvent::TimerUpdate { turn_time_left, current_player_id } => {
            assert!(turn_time_left <= 60);
            assert!(current_player_id.is_some());
        }
        other => panic!("expected TimerUpdate, got {other:?}"),
    }
}

// =========================================================================
// Replay vote
// =========================================================================

/// Scenario S5: unanimous replay restarts the match with the same
/// seats and fresh inventories.
#[tokio::test]
async fn test_unanimous_replay_restarts_match() {
    let mut reg = registry();
    let (room, (mover, mut rx_m), (waiter, _rx_w)) = two_player_game(&mut reg).await;
    play_to_win(&room, mover, waiter).await;

    room.cast_replay_vote(mover, true).await.unwrap();
    room.cast_replay_vote(waiter, true).await.unwrap();

    let ev = expect_event(&mut rx_m, "game-restarted", |e| {
        matches!(e, ServerEvent::GameRestarted { .. })
    })
    .await;
    match ev {
        ServerEvent::GameRestarted { state } => {
            assert_eq!(state.status, GameStatus::Playing);
            assert_eq!(state.winner_id, None);
            for player in &state.players {
                assert_eq!(player.inventory.small, 3);
                assert_eq!(player.inventory.medium, 3);
                assert_eq!(player.inventory.large, 3);
                assert!(!player.is_eliminated);
                assert_eq!(player.skips_in_a_row, 0);
            }
            // Same seats, same identities.
            let ids: Vec<SeatId> = state.players.iter().map(|p| p.id).collect();
            assert!(ids.contains(&mover) && ids.contains(&waiter));
        }
        other => panic!("expected GameRestarted, got {other:?}"),
    }
}

/// Scenario S6: one "no" rejects as soon as all ballots are in.
#[tokio::test]
async fn test_non_unanimous_replay_rejects_and_closes_room() {
    let mut reg = registry();
    let (room, (mover, mut rx_m), (waiter, _rx_w)) = two_player_game(&mut reg).await;
    play_to_win(&room, mover, waiter).await;

    room.cast_replay_vote(mover, false).await.unwrap();
    room.cast_replay_vote(waiter, true).await.unwrap();

    expect_event(&mut rx_m, "replay-rejected", |e| {
        matches!(e, ServerEvent::ReplayRejected)
    })
    .await;
    expect_event(&mut rx_m, "room-closed", |e| matches!(e, ServerEvent::RoomClosed { .. }))
        .await;

    settle().await;
    assert!(room.info().await.is_err(), "the actor has stopped");
}

#[tokio::test(start_paused = true)]
async fn test_replay_window_expiry_times_out_the_vote() {
    let mut reg = registry();
    let (room, (mover, mut rx_m), (waiter, _rx_w)) = two_player_game(&mut reg).await;
    play_to_win(&room, mover, waiter).await;

    // Only one ballot arrives; the window closes.
    room.cast_replay_vote(mover, true).await.unwrap();
    advance(Duration::from_secs(30)).await;
    settle().await;

    expect_event(&mut rx_m, "replay-timeout", |e| matches!(e, ServerEvent::ReplayTimeout))
        .await;
}

#[tokio::test]
async fn test_vote_outside_window_is_unavailable() {
    let mut reg = registry();
    let (room, (mover, _rx_m), _) = two_player_game(&mut reg).await;

    let err = room.cast_replay_vote(mover, true).await.unwrap_err();
    assert_eq!(err.code(), trioforge_protocol::ErrorCode::Unavailable);
}

#[tokio::test]
async fn test_vote_from_stranger_is_forbidden() {
    let mut reg = registry();
    let (room, (mover, _rx_m), (waiter, _rx_w)) = two_player_game(&mut reg).await;
    play_to_win(&room, mover, waiter).await;

    let err = room.cast_replay_vote(SeatId(999_999), true).await.unwrap_err();
    assert_eq!(err.code(), trioforge_protocol::ErrorCode::Forbidden);
}

// =========================================================================
// Registry: listing, pagination, sweep
// =========================================================================

#[tokio::test]
async fn test_list_filters_by_name_substring_case_insensitive() {
    let mut reg = registry();
    reg.create(opts("Friday Night", 2));
    reg.create(opts("saturday", 2));
    settle().await;

    let page = reg
        .list(&ListQuery { name_contains: Some("friday".into()), ..ListQuery::default() })
        .await;
    assert_eq!(page.total, 1);
    assert_eq!(page.items[0].name, "Friday Night");
}

#[tokio::test]
async fn test_list_filters_private_and_status() {
    let mut reg = registry();
    reg.create(opts("open", 2));
    reg.create(private_opts("hidden", "sesame"));
    settle().await;

    let publics = reg
        .list(&ListQuery { is_private: Some(false), ..ListQuery::default() })
        .await;
    assert_eq!(publics.total, 1);
    assert_eq!(publics.items[0].name, "open");

    let waiting = reg
        .list(&ListQuery { status: Some(GameStatus::Waiting), ..ListQuery::default() })
        .await;
    assert_eq!(waiting.total, 2);
}

#[tokio::test]
async fn test_list_has_space_excludes_running_rooms() {
    let mut reg = registry();
    let room = reg.create(opts("busy", 2));
    join(&room, "ada", true).await;
    join(&room, "bo", false).await; // starts the match
    reg.create(opts("free", 2));
    settle().await;

    let page = reg
        .list(&ListQuery {
            has_space: Some(true),
            status: Some(GameStatus::Waiting),
            ..ListQuery::default()
        })
        .await;
    assert_eq!(page.total, 1);
    assert_eq!(page.items[0].name, "free");
}

#[tokio::test]
async fn test_list_sorts_by_name_and_paginates() {
    let mut reg = registry();
    for name in ["delta", "alpha", "charlie", "bravo"] {
        reg.create(opts(name, 2));
    }
    settle().await;

    let page = reg
        .list(&ListQuery {
            sort: SortKey::Name,
            limit: 2,
            ..ListQuery::default()
        })
        .await;
    let names: Vec<&str> = page.items.iter().map(|i| i.name.as_str()).collect();
    assert_eq!(names, vec!["alpha", "bravo"]);
    assert_eq!(page.total, 4);
    assert!(page.has_more);

    let rest = reg
        .list(&ListQuery {
            sort: SortKey::Name,
            offset: 2,
            limit: 2,
            ..ListQuery::default()
        })
        .await;
    let names: Vec<&str> = rest.items.iter().map(|i| i.name.as_str()).collect();
    assert_eq!(names, vec!["charlie", "delta"]);
    assert!(!rest.has_more);
}

#[tokio::test]
async fn test_list_descending_reverses_order() {
    let mut reg = registry();
    reg.create(opts("alpha", 2));
    reg.create(opts("bravo", 2));
    settle().await;

    let page = reg
        .list(&ListQuery { sort: SortKey::Name, descending: true, ..ListQuery::default() })
        .await;
    let names: Vec<&str> = page.items.iter().map(|i| i.name.as_str()).collect();
    assert_eq!(names, vec!["bravo", "alpha"]);
}

#[tokio::test]
async fn test_list_excludes_expired_rooms_eagerly() {
    let mut reg = registry_with(GameConfig {
        room_ttl: Duration::ZERO,
        ..GameConfig::default()
    });
    reg.create(opts("stale", 2));
    settle().await;

    let page = reg.list(&ListQuery::default()).await;
    assert_eq!(page.total, 0);
}

#[tokio::test]
async fn test_sweep_evicts_expired_and_dead_rooms() {
    let mut reg = registry_with(GameConfig {
        room_ttl: Duration::ZERO,
        ..GameConfig::default()
    });
    let expired = reg.create(opts("stale", 2));
    settle().await;

    let evicted = reg.sweep().await;
    assert_eq!(evicted, vec![expired.room_id()]);
    assert_eq!(reg.room_count(), 0);
}

#[tokio::test]
async fn test_remove_purges_room_and_host_entry() {
    let mut reg = registry();
    let room = reg.create(opts("bye", 2));
    let (host, _rx) = join(&room, "ada", true).await;
    reg.register_host(host, room.room_id());

    reg.remove(room.room_id()).await.unwrap();

    assert!(reg.get(room.room_id()).is_none());
    assert_eq!(reg.host_room(&host), None);
    settle().await;
    assert!(room.info().await.is_err());
}

#[tokio::test]
async fn test_ttl_resets_on_match_start() {
    let mut reg = registry();
    let room = reg.create(opts("fresh", 2));
    join(&room, "ada", true).await;
    join(&room, "bo", false).await;

    let info = room.info().await.unwrap();
    let started = info.started_at.expect("match started");
    assert!(info.expires_at > info.created_at);
    assert!(
        info.expires_at >= started + GameConfig::default().room_ttl.as_millis() as u64,
        "expiry extends a full TTL past the match start"
    );
}
