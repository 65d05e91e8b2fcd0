//! Per-connection handler: the session dispatcher.
//!
//! Each accepted connection gets its own task running this handler:
//!
//! 1. Read a frame → decode a [`ClientMessage`]
//! 2. Resolve the target room from the connection's seat binding (or
//!    the message payload, for create/join/resume)
//! 3. Submit the operation to the room's mailbox; errors come back to
//!    this connection only, broadcasts fan out through the seat queue
//!
//! Outbound room events flow through a bounded per-seat channel pumped
//! by a forward task. If the room drops that channel without a
//! farewell (queue overflow, actor death), the forward task closes the
//! socket, which feeds back into the normal disconnect path.

use std::sync::Arc;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use trioforge_protocol::{
    ClientMessage, Codec, ErrorCode, JsonCodec, PieceSize, RoomId, SeatId, ServerEvent,
};
use trioforge_room::{now_ms, LeaveMode, RoomError, RoomHandle, RoomOptions, SeatSender};
use trioforge_transport::{Connection, WebSocketConnection};

use crate::server::ServerState;
use crate::TrioforgeError;

/// Bound of each connection's outbound event queue. A client that
/// falls this far behind is dropped rather than allowed to stall its
/// room.
const OUTBOUND_QUEUE: usize = 64;

/// Undecodable inbound frames tolerated before the connection is
/// considered hostile and closed.
const MAX_PROTOCOL_STRIKES: u32 = 10;

/// The connection's current seat, with the task pumping its events.
struct Binding {
    room: RoomHandle,
    seat: SeatId,
    forward: JoinHandle<()>,
}

impl Binding {
    fn stop_forward(&self) {
        self.forward.abort();
    }
}

/// Handles one connection from accept to close.
pub(crate) async fn handle_connection(
    conn: WebSocketConnection,
    state: Arc<ServerState>,
) -> Result<(), TrioforgeError> {
    let conn = Arc::new(conn);
    let conn_id = conn.id();
    tracing::debug!(%conn_id, "handling new connection");

    let mut binding: Option<Binding> = None;
    let mut strikes: u32 = 0;

    loop {
        let data = match conn.recv().await {
            Ok(Some(data)) => data,
            Ok(None) => {
                tracing::debug!(%conn_id, "connection closed");
                break;
            }
            Err(e) => {
                tracing::debug!(%conn_id, error = %e, "recv error");
                break;
            }
        };

        let msg: ClientMessage = match state.codec.decode(&data) {
            Ok(msg) => msg,
            Err(e) => {
                strikes += 1;
                tracing::debug!(%conn_id, strikes, error = %e, "undecodable frame");
                if strikes >= MAX_PROTOCOL_STRIKES {
                    tracing::warn!(%conn_id, "protocol strike limit reached, closing");
                    break;
                }
                let nack = ServerEvent::RoomError {
                    code: ErrorCode::InvalidInput,
                    message: format!("malformed message: {e}"),
                };
                if reply(&conn, &state.codec, nack).await.is_err() {
                    break;
                }
                continue;
            }
        };

        // A failed reply means the socket is dead; fall through to the
        // disconnect path below rather than abandoning the binding.
        if let Err(e) = handle_message(msg, &conn, &state, &mut binding).await {
            tracing::debug!(%conn_id, error = %e, "handler error, closing connection");
            break;
        }
    }

    // Transport gone: the seat is held for reconnection, the room is
    // told its player dropped.
    if let Some(b) = binding {
        b.stop_forward();
        let _ = b.room.leave(b.seat, LeaveMode::Disconnect).await;
        let _ = state.sessions.lock().await.disconnect(b.seat);
    }
    Ok(())
}

async fn handle_message(
    msg: ClientMessage,
    conn: &Arc<WebSocketConnection>,
    state: &Arc<ServerState>,
    binding: &mut Option<Binding>,
) -> Result<(), TrioforgeError> {
    match msg {
        ClientMessage::Ping => {
            reply(conn, &state.codec, ServerEvent::Pong { ts: now_ms() }).await
        }

        ClientMessage::CreateRoom { player_name, room_name, is_private, capacity, code } => {
            handle_create_room(
                conn, state, binding, player_name, room_name, is_private, capacity, code,
            )
            .await
        }

        ClientMessage::JoinRoom { room_id, player_name, access_code } => {
            handle_join_room(conn, state, binding, room_id, player_name, access_code).await
        }

        ClientMessage::LeaveRoom => {
            if let Some(b) = binding.take() {
                b.stop_forward();
                if let Err(e) = b.room.leave(b.seat, LeaveMode::Explicit).await {
                    tracing::debug!(seat = %b.seat, error = %e, "leave failed");
                }
                state.sessions.lock().await.release(b.seat);
            }
            Ok(())
        }

        ClientMessage::MakeMove { room_id, cell_index, size } => {
            handle_move(conn, state, binding, room_id, cell_index, size).await
        }

        ClientMessage::GetGameState { room_id } => {
            let Some(b) = bound_to(binding, room_id) else {
                return reply_error(conn, state, ErrorCode::Forbidden, "not in this room").await;
            };
            match b.room.snapshot().await {
                Ok(state_view) => {
                    reply(conn, &state.codec, ServerEvent::GameState { state: state_view }).await
                }
                Err(e) => reply_error(conn, state, e.code(), &e.to_string()).await,
            }
        }

        ClientMessage::CastReplayVote { room_id, vote } => {
            let Some(b) = bound_to(binding, room_id) else {
                return reply_error(conn, state, ErrorCode::Forbidden, "not in this room").await;
            };
            match b.room.cast_replay_vote(b.seat, vote).await {
                Ok(()) => Ok(()),
                Err(e) => reply_error(conn, state, e.code(), &e.to_string()).await,
            }
        }

        ClientMessage::ResumeSession { token } => {
            handle_resume(conn, state, binding, token).await
        }
    }
}

#[allow(clippy::too_many_arguments)]
async fn handle_create_room(
    conn: &Arc<WebSocketConnection>,
    state: &Arc<ServerState>,
    binding: &mut Option<Binding>,
    player_name: String,
    room_name: Option<String>,
    is_private: bool,
    capacity: u8,
    code: Option<String>,
) -> Result<(), TrioforgeError> {
    if let Some(b) = binding.as_ref() {
        let err = RoomError::AlreadyIn(b.room.room_id());
        return reply_error(conn, state, err.code(), &err.to_string()).await;
    }

    let nickname = match trioforge_room::validate_nickname(&player_name) {
        Ok(n) => n,
        Err(e) => return reply_error(conn, state, e.code(), &e.to_string()).await,
    };
    let name = room_name.unwrap_or_else(|| format!("{nickname}'s room"));
    let options = match RoomOptions::new(&name, usize::from(capacity), is_private, code.clone()) {
        Ok(o) => o,
        Err(e) => return reply_error(conn, state, e.code(), &e.to_string()).await,
    };

    let room = state.lobby.lock().await.create(options);
    let room_id = room.room_id();

    let (tx, forward) = seat_pipe(conn, &state.codec);
    match room.join(nickname, code, true, tx).await {
        Ok(ok) => {
            let reconnect_token = {
                let mut sessions = state.sessions.lock().await;
                match sessions.bind(ok.seat_id, room_id) {
                    Ok(b) => b.resume_token.clone(),
                    Err(e) => {
                        tracing::error!(error = %e, "seat binding failed");
                        String::new()
                    }
                }
            };
            state.lobby.lock().await.register_host(ok.seat_id, room_id);
            *binding = Some(Binding { room, seat: ok.seat_id, forward });

            tracing::info!(%room_id, seat = %ok.seat_id, "room created");
            reply(
                conn,
                &state.codec,
                ServerEvent::RoomCreated {
                    room_id,
                    seat_id: ok.seat_id,
                    reconnect_token,
                    state: ok.view,
                },
            )
            .await
        }
        Err(e) => {
            forward.abort();
            // The creator never took their seat: drop the empty room.
            let _ = state.lobby.lock().await.remove(room_id).await;
            reply_error(conn, state, e.code(), &e.to_string()).await
        }
    }
}

async fn handle_join_room(
    conn: &Arc<WebSocketConnection>,
    state: &Arc<ServerState>,
    binding: &mut Option<Binding>,
    room_id: RoomId,
    player_name: String,
    access_code: Option<String>,
) -> Result<(), TrioforgeError> {
    if let Some(b) = binding.as_ref() {
        let err = RoomError::AlreadyIn(b.room.room_id());
        return reply_join_error(conn, state, err.code(), &err.to_string()).await;
    }

    let Some(room) = state.lobby.lock().await.get(room_id) else {
        let err = RoomError::NotFound(room_id);
        return reply_join_error(conn, state, err.code(), &err.to_string()).await;
    };

    let (tx, forward) = seat_pipe(conn, &state.codec);
    match room.join(player_name, access_code, false, tx).await {
        Ok(ok) => {
            let reconnect_token = {
                let mut sessions = state.sessions.lock().await;
                match sessions.bind(ok.seat_id, room_id) {
                    Ok(b) => b.resume_token.clone(),
                    Err(e) => {
                        tracing::error!(error = %e, "seat binding failed");
                        String::new()
                    }
                }
            };
            *binding = Some(Binding { room, seat: ok.seat_id, forward });

            tracing::info!(%room_id, seat = %ok.seat_id, "seat joined");
            reply(
                conn,
                &state.codec,
                ServerEvent::RoomJoined {
                    room_id,
                    seat_id: ok.seat_id,
                    reconnect_token,
                    state: ok.view,
                },
            )
            .await
        }
        Err(e) => {
            forward.abort();
            reply_join_error(conn, state, e.code(), &e.to_string()).await
        }
    }
}

async fn handle_move(
    conn: &Arc<WebSocketConnection>,
    state: &Arc<ServerState>,
    binding: &mut Option<Binding>,
    room_id: RoomId,
    cell_index: u8,
    size: PieceSize,
) -> Result<(), TrioforgeError> {
    let Some(b) = bound_to(binding, room_id) else {
        return reply_move_error(conn, state, ErrorCode::Forbidden, "not in this room").await;
    };
    match b.room.submit_move(b.seat, cell_index, size).await {
        Ok(()) => Ok(()),
        Err(e) => reply_move_error(conn, state, e.code(), &e.to_string()).await,
    }
}

async fn handle_resume(
    conn: &Arc<WebSocketConnection>,
    state: &Arc<ServerState>,
    binding: &mut Option<Binding>,
    token: String,
) -> Result<(), TrioforgeError> {
    if binding.is_some() {
        return reply_error(conn, state, ErrorCode::Conflict, "already in a room").await;
    }

    // Lock only for the resume itself; drop before any network I/O.
    let resumed = {
        let mut sessions = state.sessions.lock().await;
        sessions
            .resume(&token)
            .map(|b| (b.seat, b.room))
            .map_err(|e| (e.code(), e.to_string()))
    };
    let (seat, room_id) = match resumed {
        Ok(pair) => pair,
        Err((code, message)) => return reply_error(conn, state, code, &message).await,
    };

    let Some(room) = state.lobby.lock().await.get(room_id) else {
        state.sessions.lock().await.release(seat);
        return reply_error(conn, state, ErrorCode::NotFound, "room is gone").await;
    };

    let (tx, forward) = seat_pipe(conn, &state.codec);
    match room.reconnect(seat, tx).await {
        Ok(view) => {
            *binding = Some(Binding { room, seat, forward });
            tracing::info!(%room_id, %seat, "session resumed");
            reply(
                conn,
                &state.codec,
                ServerEvent::SessionResumed { room_id, seat_id: seat, state: view },
            )
            .await
        }
        Err(e) => {
            forward.abort();
            // The seat no longer exists in the room (e.g. removed while
            // waiting): the binding is dead too.
            state.sessions.lock().await.release(seat);
            reply_error(conn, state, e.code(), &e.to_string()).await
        }
    }
}

/// The binding, provided it matches the room the client named.
fn bound_to(binding: &Option<Binding>, room_id: RoomId) -> Option<&Binding> {
    binding.as_ref().filter(|b| b.room.room_id() == room_id)
}

/// Builds the bounded per-seat event queue and the task pumping it to
/// the socket.
///
/// When the room drops the sender, the task inspects the last event it
/// saw: after a `room-closed` farewell the client is left connected
/// (free to return to the lobby); any other silent drop means queue
/// overflow or actor death, and the socket is closed so the disconnect
/// path runs.
fn seat_pipe(
    conn: &Arc<WebSocketConnection>,
    codec: &JsonCodec,
) -> (SeatSender, JoinHandle<()>) {
    let (tx, mut rx) = mpsc::channel::<ServerEvent>(OUTBOUND_QUEUE);
    let conn = Arc::clone(conn);
    let codec = *codec;

    let task = tokio::spawn(async move {
        let mut farewell = false;
        while let Some(event) = rx.recv().await {
            farewell = matches!(event, ServerEvent::RoomClosed { .. });
            let bytes = match codec.encode(&event) {
                Ok(bytes) => bytes,
                Err(e) => {
                    tracing::error!(error = %e, "outbound encode failed");
                    continue;
                }
            };
            if conn.send(&bytes).await.is_err() {
                break;
            }
        }
        if !farewell {
            let _ = conn.close().await;
        }
    });

    (tx, task)
}

async fn reply(
    conn: &Arc<WebSocketConnection>,
    codec: &JsonCodec,
    event: ServerEvent,
) -> Result<(), TrioforgeError> {
    let bytes = codec.encode(&event)?;
    conn.send(&bytes).await.map_err(TrioforgeError::Transport)
}

async fn reply_error(
    conn: &Arc<WebSocketConnection>,
    state: &Arc<ServerState>,
    code: ErrorCode,
    message: &str,
) -> Result<(), TrioforgeError> {
    reply(
        conn,
        &state.codec,
        ServerEvent::RoomError { code, message: message.to_string() },
    )
    .await
}

async fn reply_join_error(
    conn: &Arc<WebSocketConnection>,
    state: &Arc<ServerState>,
    code: ErrorCode,
    message: &str,
) -> Result<(), TrioforgeError> {
    reply(
        conn,
        &state.codec,
        ServerEvent::JoinError { code, message: message.to_string() },
    )
    .await
}

async fn reply_move_error(
    conn: &Arc<WebSocketConnection>,
    state: &Arc<ServerState>,
    code: ErrorCode,
    message: &str,
) -> Result<(), TrioforgeError> {
    reply(
        conn,
        &state.codec,
        ServerEvent::MoveError { code, message: message.to_string() },
    )
    .await
}
