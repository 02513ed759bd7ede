//! The session registry: maps connection identity to room membership.
//!
//! # Concurrency note
//!
//! `SessionRegistry` is NOT thread-safe by itself — it is a plain
//! `HashMap` with `&mut self` methods. This is intentional: the registry
//! is owned by the core behind a single mutex, and every operation here
//! is a short map touch. Keeping the type synchronous keeps the
//! at-most-once guarantee of [`detach`](SessionRegistry::detach) trivial:
//! remove-and-return under one lock acquisition.

use std::collections::HashMap;

use hearth_protocol::{ConnectionId, RoomCode};

use crate::{Session, SessionError};

/// Tracks every live connection and which room it has joined.
///
/// ## Lifecycle
///
/// ```text
/// attach() ──→ bind_room() ──→ detach()
///    │             │              │
///    │         clear_room()       └─→ returns the bound room once;
///    │         (failed join)          a second detach returns None
///    └─→ session exists, unbound
/// ```
#[derive(Debug, Default)]
pub struct SessionRegistry {
    sessions: HashMap<ConnectionId, Session>,
}

impl SessionRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self {
            sessions: HashMap::new(),
        }
    }

    /// Records a newly connected transport connection.
    ///
    /// Idempotent: attaching an id that is already present keeps the
    /// existing session (and its room binding) untouched. Connection ids
    /// are never reused by the transport, so a repeat attach is a
    /// duplicate notification, not a new connection.
    pub fn attach(&mut self, connection_id: ConnectionId) {
        self.sessions.entry(connection_id).or_insert_with(|| {
            tracing::debug!(%connection_id, "session attached");
            Session {
                connection_id,
                room: None,
            }
        });
    }

    /// Records which room a connection joined.
    ///
    /// # Errors
    /// Returns [`SessionError::SessionNotFound`] if the connect was never
    /// observed (or the connection already detached).
    pub fn bind_room(
        &mut self,
        connection_id: ConnectionId,
        room: RoomCode,
    ) -> Result<(), SessionError> {
        let session = self
            .sessions
            .get_mut(&connection_id)
            .ok_or(SessionError::SessionNotFound(connection_id))?;
        session.room = Some(room);
        Ok(())
    }

    /// Drops a connection's room binding without detaching the session.
    ///
    /// Used to unwind after a join that bound the session but then failed
    /// in the room layer. No-op if the session is gone — a concurrent
    /// disconnect already took over cleanup in that case.
    pub fn clear_room(&mut self, connection_id: ConnectionId) {
        if let Some(session) = self.sessions.get_mut(&connection_id) {
            session.room = None;
        }
    }

    /// Removes the session and returns the room it was bound to.
    ///
    /// This is the disconnect entry point, and it is at-most-once by
    /// construction: the first call removes the session and yields its
    /// binding, any later call finds nothing and returns `None`, so
    /// duplicate disconnect notifications can never trigger a second
    /// member removal.
    pub fn detach(&mut self, connection_id: ConnectionId) -> Option<RoomCode> {
        let session = self.sessions.remove(&connection_id)?;
        tracing::debug!(%connection_id, "session detached");
        session.room
    }

    /// Looks up a session by connection id.
    pub fn get(&self, connection_id: &ConnectionId) -> Option<&Session> {
        self.sessions.get(connection_id)
    }

    /// Returns the number of live sessions.
    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    /// Returns `true` if no sessions are live.
    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}

// =========================================================================
// Tests
// =========================================================================
