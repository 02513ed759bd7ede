//! The core boundary: every operation the transport layer can ask for.
//!
//! `Core` ties the room store, the session registry, and the broadcaster
//! together behind four operations — create, connect, join, disconnect.
//! It is transport-agnostic on purpose: handlers feed it connection ids
//! and event sinks, tests feed it plain channels.

use std::sync::Arc;

use hearth_protocol::{ConnectionId, Event, RoomCode};
use hearth_room::{
    EventBroadcaster, EventSink, RoomError, RoomStore, Roster, StoreConfig,
};
use hearth_session::SessionRegistry;
use tokio::sync::Mutex;

use crate::HearthError;

// ---------------------------------------------------------------------------
// CoreConfig
// ---------------------------------------------------------------------------

/// Configuration for the core.
#[derive(Debug, Clone)]
pub struct CoreConfig {
    /// Text of the `connected` greeting event. Localization happens
    /// outside the core: whoever constructs the config picks the
    /// language.
    pub greeting: String,

    /// Room store settings (code length, generation attempt cap).
    pub store: StoreConfig,
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            greeting: "Welcome to Hearth!".to_string(),
            store: StoreConfig::default(),
        }
    }
}

// ---------------------------------------------------------------------------
// Core
// ---------------------------------------------------------------------------

/// The room session manager: room lifecycle, membership, and fan-out.
///
/// Constructed once per process and shared as `Arc<Core>` across
/// connection handler tasks. Tests construct isolated instances — there
/// is no global state anywhere in the stack.
pub struct Core {
    store: Arc<RoomStore>,
    sessions: Mutex<SessionRegistry>,
    broadcaster: EventBroadcaster,
    greeting: String,
}

impl Core {
    /// Creates a core with the given configuration.
    pub fn new(config: CoreConfig) -> Self {
        let store = Arc::new(RoomStore::new(config.store));
        Self {
            broadcaster: EventBroadcaster::new(Arc::clone(&store)),
            store,
            sessions: Mutex::new(SessionRegistry::new()),
            greeting: config.greeting,
        }
    }

    /// The room store. Exposed so callers can spawn the reaper over it
    /// or inspect it in tests.
    pub fn store(&self) -> &Arc<RoomStore> {
        &self.store
    }

    /// Mints a new empty room and returns its code.
    pub async fn create_room(&self) -> Result<RoomCode, HearthError> {
        let code = self.store.create_room().await?;
        Ok(code)
    }

    /// Registers a newly connected transport connection and delivers the
    /// greeting event into its sink.
    pub async fn connect(&self, connection_id: ConnectionId, sink: &EventSink) {
        self.sessions.lock().await.attach(connection_id);

        let greeting = Event::Connected {
            message: self.greeting.clone(),
        };
        if sink.send(greeting).is_err() {
            // Connection died between accept and attach; disconnect
            // cleanup will follow from the handler.
            tracing::debug!(%connection_id, "greeting undeliverable");
        }
    }

    /// Joins a connection into a room and broadcasts `player_joined` to
    /// every member, the joiner included.
    ///
    /// One room at a time: a session that is already bound is rejected
    /// with `AlreadyJoined` naming the room it is in, whether or not the
    /// requested room is the same one. The fresh binding is recorded
    /// *before* the membership insert — a disconnect racing this call
    /// then always observes the binding and runs cleanup — and unwound
    /// if the join itself fails.
    ///
    /// # Errors
    /// - [`SessionError::SessionNotFound`](hearth_session::SessionError)
    ///   — `connect` was never observed for this id.
    /// - [`RoomError::NotFound`](hearth_room::RoomError) — unknown code.
    /// - [`RoomError::AlreadyJoined`](hearth_room::RoomError) /
    ///   [`RoomError::RoomClosing`](hearth_room::RoomError) — from the
    ///   binding check above or the room's own checks.
    pub async fn join(
        &self,
        connection_id: ConnectionId,
        code: &RoomCode,
        display_name: &str,
        sink: EventSink,
    ) -> Result<Roster, HearthError> {
        {
            let mut sessions = self.sessions.lock().await;
            if let Some(bound) = sessions.get(&connection_id).and_then(|s| s.room.clone())
            {
                return Err(RoomError::AlreadyJoined(connection_id, bound).into());
            }
            sessions.bind_room(connection_id, code.clone())?;
        }

        let joined = match self.store.get(code).await {
            Ok(room) => room.join(connection_id, display_name, sink).await,
            Err(e) => Err(e),
        };

        let roster = match joined {
            Ok(roster) => roster,
            Err(e) => {
                self.sessions.lock().await.clear_room(connection_id);
                return Err(e.into());
            }
        };

        let announcement = Event::PlayerJoined {
            player_name: display_name.to_string(),
            total_players: roster.total,
        };
        if let Err(e) = self.broadcaster.broadcast(code, announcement).await {
            // The room cannot have vanished while it holds our member;
            // if it somehow did, members have nothing to be told.
            tracing::debug!(room_code = %code, error = %e, "join broadcast skipped");
        }

        Ok(roster)
    }

    /// Tears down a connection: detaches the session and, if it was in a
    /// room, removes the member and broadcasts `player_left` to the
    /// remaining members.
    ///
    /// Idempotent — duplicate disconnect notifications are absorbed by
    /// the registry's at-most-once `detach`, so the member is removed
    /// and announced exactly once. Returns the room the connection was
    /// in, if this call was the one that cleaned it up.
    pub async fn disconnect(&self, connection_id: ConnectionId) -> Option<RoomCode> {
        let code = self.sessions.lock().await.detach(connection_id)?;

        let room = match self.store.get(&code).await {
            Ok(room) => room,
            Err(_) => {
                // Already reaped; nothing to leave.
                tracing::debug!(%connection_id, room_code = %code, "room gone before cleanup");
                return Some(code);
            }
        };

        match room.leave(connection_id).await {
            Ok(departure) => {
                let farewell = Event::PlayerLeft {
                    player_name: departure.display_name,
                    total_players: departure.remaining,
                };
                if let Err(e) = self.broadcaster.broadcast(&code, farewell).await {
                    tracing::debug!(room_code = %code, error = %e, "leave broadcast skipped");
                }
            }
            Err(e) => {
                // The join this session recorded never landed, or lost a
                // race; either way there is no member to remove.
                tracing::debug!(%connection_id, room_code = %code, error = %e, "no member to remove");
            }
        }

        Some(code)
    }
}
