//! The lobby registry: the process-wide catalog of rooms.
//!
//! The registry is the only cross-room structure in the server. It
//! creates room actors, indexes them by id (plus a host index), answers
//! filtered/sorted/paginated listings, and sweeps out expired or dead
//! rooms. Per-room state is never touched here — everything behind a
//! [`RoomHandle`] stays serialized inside that room's actor.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};

use trioforge_protocol::{GameStatus, RoomId, SeatId};

use crate::room::{now_ms, spawn_room};
use crate::{GameConfig, RoomError, RoomHandle, RoomInfo, RoomOptions};

/// Counter for minting unique room ids.
static NEXT_ROOM_ID: AtomicU64 = AtomicU64::new(1);

/// Command-mailbox size for each room actor.
const ROOM_MAILBOX_SIZE: usize = 64;

/// Sort keys for room listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortKey {
    /// Lexicographic by room name.
    Name,
    /// Ascending `created_at`.
    #[default]
    Created,
    /// Ascending last activity (`started_at`, else `created_at`).
    Activity,
}

/// A listing query: filter predicates, sort, and pagination.
#[derive(Debug, Clone)]
pub struct ListQuery {
    pub is_private: Option<bool>,
    pub status: Option<GameStatus>,
    pub has_space: Option<bool>,
    /// Case-insensitive substring match on the room name.
    pub name_contains: Option<String>,
    pub sort: SortKey,
    pub descending: bool,
    pub offset: usize,
    pub limit: usize,
}

impl Default for ListQuery {
    fn default() -> Self {
        Self {
            is_private: None,
            status: None,
            has_space: None,
            name_contains: None,
            sort: SortKey::default(),
            descending: false,
            offset: 0,
            limit: 20,
        }
    }
}

impl ListQuery {
    fn matches(&self, info: &RoomInfo) -> bool {
        if let Some(private) = self.is_private {
            if info.is_private != private {
                return false;
            }
        }
        if let Some(status) = self.status {
            if info.status != status {
                return false;
            }
        }
        if let Some(space) = self.has_space {
            if info.has_space() != space {
                return false;
            }
        }
        if let Some(needle) = &self.name_contains {
            let haystack = info.name.to_lowercase();
            if !haystack.contains(&needle.to_lowercase()) {
                return false;
            }
        }
        true
    }
}

/// One page of a room listing.
#[derive(Debug)]
pub struct RoomPage {
    pub items: Vec<RoomInfo>,
    /// Total rooms matching the filter, across all pages.
    pub total: usize,
    pub has_more: bool,
}

/// The process-wide room catalog.
pub struct LobbyRegistry {
    rooms: HashMap<RoomId, RoomHandle>,
    /// Host seat → room. Purged with the room; consulted for host
    /// bookkeeping (the create-side uniqueness check lives in the
    /// dispatcher, which knows connection bindings).
    hosts: HashMap<SeatId, RoomId>,
    config: GameConfig,
}

impl LobbyRegistry {
    pub fn new(config: GameConfig) -> Self {
        Self { rooms: HashMap::new(), hosts: HashMap::new(), config }
    }

    /// Creates a room actor from validated options and registers it.
    pub fn create(&mut self, options: RoomOptions) -> RoomHandle {
        let room_id = RoomId(NEXT_ROOM_ID.fetch_add(1, Ordering::Relaxed));
        let handle = spawn_room(room_id, options, self.config.clone(), ROOM_MAILBOX_SIZE);
        self.rooms.insert(room_id, handle.clone());
        tracing::info!(%room_id, "room registered");
        handle
    }

    /// Records which seat hosts a room, once the creator has joined.
    pub fn register_host(&mut self, host: SeatId, room: RoomId) {
        self.hosts.insert(host, room);
    }

    /// The room a seat currently hosts, if any.
    pub fn host_room(&self, host: &SeatId) -> Option<RoomId> {
        self.hosts.get(host).copied()
    }

    pub fn get(&self, room_id: RoomId) -> Option<RoomHandle> {
        self.rooms.get(&room_id).cloned()
    }

    pub fn room_count(&self) -> usize {
        self.rooms.len()
    }

    /// Lists rooms matching `query`. Expired rooms are filtered out
    /// eagerly; rooms whose actors are gone are skipped (the sweep will
    /// purge them).
    pub async fn list(&self, query: &ListQuery) -> RoomPage {
        let now = now_ms();
        let mut infos = Vec::with_capacity(self.rooms.len());
        for handle in self.rooms.values() {
            if let Ok(info) = handle.info().await {
                if !info.is_expired(now) && query.matches(&info) {
                    infos.push(info);
                }
            }
        }

        match query.sort {
            SortKey::Name => infos.sort_by(|a, b| a.name.cmp(&b.name)),
            SortKey::Created => infos.sort_by_key(|i| i.created_at),
            SortKey::Activity => infos.sort_by_key(|i| i.activity_at()),
        }
        if query.descending {
            infos.reverse();
        }

        let total = infos.len();
        let items: Vec<RoomInfo> =
            infos.into_iter().skip(query.offset).take(query.limit).collect();
        let has_more = query.offset + items.len() < total;
        RoomPage { items, total, has_more }
    }

    /// Shuts a room down and purges it (and its host entry).
    pub async fn remove(&mut self, room_id: RoomId) -> Result<(), RoomError> {
        let handle = self
            .rooms
            .remove(&room_id)
            .ok_or(RoomError::NotFound(room_id))?;
        let _ = handle.shutdown("removed from lobby").await;
        self.hosts.retain(|_, rid| *rid != room_id);
        tracing::info!(%room_id, "room removed");
        Ok(())
    }

    /// Evicts every room that is expired or whose actor has stopped.
    /// Returns the evicted ids so the caller can release their seat
    /// bindings.
    pub async fn sweep(&mut self) -> Vec<RoomId> {
        let now = now_ms();
        let mut evicted = Vec::new();

        let handles: Vec<RoomHandle> = self.rooms.values().cloned().collect();
        for handle in handles {
            match handle.info().await {
                Ok(info) if info.is_expired(now) => {
                    tracing::info!(room_id = %handle.room_id(), "sweeping expired room");
                    let _ = handle.shutdown("ttl expired").await;
                    evicted.push(handle.room_id());
                }
                Ok(_) => {}
                Err(_) => {
                    // Actor already stopped (failed replay, emptied out).
                    evicted.push(handle.room_id());
                }
            }
        }

        for room_id in &evicted {
            self.rooms.remove(room_id);
            self.hosts.retain(|_, rid| rid != room_id);
        }
        evicted
    }
}
