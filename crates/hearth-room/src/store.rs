//! The room store: the single source of truth for room existence.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use hearth_protocol::RoomCode;
use tokio::sync::Mutex;

use crate::code::random_code;
use crate::{Room, RoomError, StoreConfig};

/// Owns the `RoomCode → Room` mapping shared by every connection.
///
/// The store mutex guards only the map itself — existence checks,
/// inserts, removals. It is released before any per-room work, so one
/// room's slow moment never stalls the rest of the server. Lock order is
/// always store-then-room; [`sweep_idle`](Self::sweep_idle) is written
/// to never hold both at once.
pub struct RoomStore {
    config: StoreConfig,
    rooms: Mutex<HashMap<RoomCode, Arc<Room>>>,
}

impl RoomStore {
    /// Creates an empty store.
    pub fn new(config: StoreConfig) -> Self {
        Self {
            config,
            rooms: Mutex::new(HashMap::new()),
        }
    }

    /// Mints a new empty room and returns its code.
    ///
    /// Generation and insertion happen under one store-lock acquisition:
    /// a candidate that collides with a live room is redrawn, so two
    /// concurrent calls can never return the same code.
    ///
    /// # Errors
    /// Returns [`RoomError::CapacityExhausted`] if every candidate up to
    /// the configured attempt cap collided — only possible when the live
    /// room count is a sizable fraction of the whole code space.
    pub async fn create_room(&self) -> Result<RoomCode, RoomError> {
        let mut rooms = self.rooms.lock().await;

        for _ in 0..self.config.max_code_attempts {
            let code = random_code(self.config.code_length);
            if rooms.contains_key(&code) {
                continue;
            }
            rooms.insert(code.clone(), Arc::new(Room::new(code.clone())));
            tracing::info!(room_code = %code, rooms = rooms.len(), "room created");
            return Ok(code);
        }

        tracing::error!(
            attempts = self.config.max_code_attempts,
            rooms = rooms.len(),
            "room code generation exhausted"
        );
        Err(RoomError::CapacityExhausted(self.config.max_code_attempts))
    }

    /// Looks up a room by code.
    ///
    /// Returns a handle; callers go through the room's own lock (via its
    /// methods) for anything membership-related.
    ///
    /// # Errors
    /// Returns [`RoomError::NotFound`] if no such room is live.
    pub async fn get(&self, code: &RoomCode) -> Result<Arc<Room>, RoomError> {
        self.rooms
            .lock()
            .await
            .get(code)
            .cloned()
            .ok_or_else(|| RoomError::NotFound(code.clone()))
    }

    /// Removes a room from the map. No-op if absent.
    ///
    /// Only the sweep calls this, and only for rooms it already marked
    /// `Closing` under their own lock — the mark is what makes removal
    /// safe against concurrent joins.
    pub(crate) async fn remove(&self, code: &RoomCode) {
        if self.rooms.lock().await.remove(code).is_some() {
            tracing::info!(room_code = %code, "room removed");
        }
    }

    /// One reaper pass: deletes every room that is empty and has been
    /// idle longer than `grace`. Returns the codes that were reaped.
    ///
    /// Three steps, never holding both lock tiers at once:
    /// 1. snapshot the room handles (store lock),
    /// 2. for each, re-check emptiness and mark `Closing` (room lock),
    /// 3. remove the marked rooms (store lock).
    ///
    /// A room that accepts a join between steps 1 and 2 is no longer
    /// empty and survives; one that accepts it after step 2 cannot —
    /// the join already failed with `RoomClosing`.
    pub async fn sweep_idle(&self, grace: Duration) -> Vec<RoomCode> {
        let candidates: Vec<Arc<Room>> =
            self.rooms.lock().await.values().cloned().collect();

        let mut reaped = Vec::new();
        for room in candidates {
            if room.mark_closing_if_idle(grace).await {
                reaped.push(room.code().clone());
            }
        }

        for code in &reaped {
            self.remove(code).await;
        }

        reaped
    }

    /// Returns the number of live rooms.
    pub async fn len(&self) -> usize {
        self.rooms.lock().await.len()
    }

    /// Returns `true` if no rooms are live.
    pub async fn is_empty(&self) -> bool {
        self.rooms.lock().await.is_empty()
    }
}
