//! HTTP side-channel: liveness and room discovery.
//!
//! Two read-only endpoints next to the WebSocket port:
//! - `GET /health` — liveness probe with room count and uptime
//! - `GET /rooms` — joinable rooms (waiting, not full, not expired)

use std::sync::Arc;

use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};
use serde::Serialize;
use trioforge_protocol::{GameStatus, RoomSummary};
use trioforge_room::ListQuery;

use crate::server::ServerState;

/// Upper bound on the unpaginated `/rooms` listing.
const ROOMS_LIMIT: usize = 100;

pub(crate) fn router(state: Arc<ServerState>) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/rooms", get(rooms))
        .with_state(state)
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct Health {
    status: &'static str,
    rooms: usize,
    uptime_secs: u64,
}

async fn health(State(state): State<Arc<ServerState>>) -> Json<Health> {
    let rooms = state.lobby.lock().await.room_count();
    Json(Health {
        status: "ok",
        rooms,
        uptime_secs: state.started_at.elapsed().as_secs(),
    })
}

async fn rooms(State(state): State<Arc<ServerState>>) -> Json<Vec<RoomSummary>> {
    let query = ListQuery {
        status: Some(GameStatus::Waiting),
        has_space: Some(true),
        limit: ROOMS_LIMIT,
        ..ListQuery::default()
    };
    let page = state.lobby.lock().await.list(&query).await;
    Json(page.items.iter().map(|info| info.summary()).collect())
}
