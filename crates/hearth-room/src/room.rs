//! The Room entity: membership and per-room state under one lock.
//!
//! Every mutation — join, leave, the reaper's mark step — and every
//! snapshot read for a broadcast happens under the room's own mutex, so
//! within one room all of these are linearized and a broadcast always
//! reflects a consistent as-of-the-triggering-mutation view. Nothing
//! network-facing runs under the lock.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use hearth_protocol::{ConnectionId, RoomCode};
use tokio::sync::Mutex;

use crate::{EventSink, RoomError};

// ---------------------------------------------------------------------------
// Member
// ---------------------------------------------------------------------------

/// One room member. Owned exclusively by its room.
#[derive(Debug, Clone)]
pub struct Member {
    /// The transport connection this member arrived on.
    pub connection_id: ConnectionId,
    /// Name shown to other members.
    pub display_name: String,
    /// When the member joined.
    pub joined_at: Instant,
    /// Monotonic per-room join order. Broadcast and roster order is
    /// ascending `sequence_index`, and indices are never reused within a
    /// room, so the order stays deterministic under concurrent churn.
    pub sequence_index: u64,
}

// ---------------------------------------------------------------------------
// RoomState
// ---------------------------------------------------------------------------

/// The lifecycle state of a room.
///
/// ```text
/// Open ──(reaper marks empty + idle)──→ Closing ──(store removal)──→ gone
/// ```
///
/// `Closing` exists to make deletion safe: a join that races the reaper
/// either lands before the mark (the room is no longer empty and the
/// reaper leaves it alone) or after it (the join fails with `RoomClosing`
/// and the caller retries with a fresh room). There is no transition back.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoomState {
    /// Accepting joins.
    Open,
    /// Selected for deletion; rejects joins.
    Closing,
}

impl RoomState {
    /// Returns `true` if the room is accepting new members.
    pub fn is_joinable(&self) -> bool {
        matches!(self, Self::Open)
    }
}

impl std::fmt::Display for RoomState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Open => write!(f, "Open"),
            Self::Closing => write!(f, "Closing"),
        }
    }
}

// ---------------------------------------------------------------------------
// Operation results
// ---------------------------------------------------------------------------

/// The membership view returned by a successful join: display names in
/// join order, plus the count.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Roster {
    /// Display names in ascending join order.
    pub names: Vec<String>,
    /// Member count (== `names.len()`, carried for payload building).
    pub total: usize,
}

/// The result of a successful leave.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Departure {
    /// The departed member's display name.
    pub display_name: String,
    /// Members remaining after the removal.
    pub remaining: usize,
}

// ---------------------------------------------------------------------------
// Room
// ---------------------------------------------------------------------------

/// Everything about a room that can change, guarded by the room mutex.
struct RoomInner {
    /// Members in join order. Removal compacts the vector, so the list
    /// is always gap-free and iteration order == display order.
    members: Vec<Member>,
    /// Per-member event sinks, used by the broadcaster. Kept beside the
    /// members rather than inside [`Member`]: the sink is delivery
    /// plumbing, not membership identity.
    sinks: HashMap<ConnectionId, EventSink>,
    /// Next `sequence_index` to hand out. Never decremented.
    next_sequence: u64,
    /// Last join/leave (or creation) time; drives reaping.
    last_activity: Instant,
    state: RoomState,
}

/// A room: a bounded group of connections sharing broadcast events.
///
/// Shared as `Arc<Room>`; all interior state lives behind the room's own
/// mutex so the store lock never has to be held for membership work.
pub struct Room {
    code: RoomCode,
    created_at: Instant,
    inner: Mutex<RoomInner>,
}

impl Room {
    /// Creates an empty open room. Only the store mints rooms.
    pub(crate) fn new(code: RoomCode) -> Self {
        let now = Instant::now();
        Self {
            code,
            created_at: now,
            inner: Mutex::new(RoomInner {
                members: Vec::new(),
                sinks: HashMap::new(),
                next_sequence: 0,
                last_activity: now,
                state: RoomState::Open,
            }),
        }
    }

    /// Returns the room's code.
    pub fn code(&self) -> &RoomCode {
        &self.code
    }

    /// Returns when the room was created.
    pub fn created_at(&self) -> Instant {
        self.created_at
    }

    /// Adds a member.
    ///
    /// # Errors
    /// - [`RoomError::RoomClosing`] — the reaper already marked this room;
    ///   retry with a fresh room.
    /// - [`RoomError::AlreadyJoined`] — this connection already has a
    ///   member here. Rejoin is surfaced, never silently merged.
    pub async fn join(
        &self,
        connection_id: ConnectionId,
        display_name: &str,
        sink: EventSink,
    ) -> Result<Roster, RoomError> {
        let mut inner = self.inner.lock().await;

        if !inner.state.is_joinable() {
            return Err(RoomError::RoomClosing(self.code.clone()));
        }
        if inner
            .members
            .iter()
            .any(|m| m.connection_id == connection_id)
        {
            return Err(RoomError::AlreadyJoined(connection_id, self.code.clone()));
        }

        let sequence_index = inner.next_sequence;
        inner.next_sequence += 1;
        inner.members.push(Member {
            connection_id,
            display_name: display_name.to_string(),
            joined_at: Instant::now(),
            sequence_index,
        });
        inner.sinks.insert(connection_id, sink);
        inner.last_activity = Instant::now();

        tracing::info!(
            room_code = %self.code,
            %connection_id,
            player = display_name,
            members = inner.members.len(),
            "member joined"
        );

        Ok(roster_of(&inner))
    }

    /// Removes a member, compacting the list.
    ///
    /// # Errors
    /// Returns [`RoomError::NotAMember`] if this connection has no member
    /// here — which on the disconnect path just means someone else
    /// already cleaned up.
    pub async fn leave(&self, connection_id: ConnectionId) -> Result<Departure, RoomError> {
        let mut inner = self.inner.lock().await;

        let position = inner
            .members
            .iter()
            .position(|m| m.connection_id == connection_id)
            .ok_or_else(|| RoomError::NotAMember(connection_id, self.code.clone()))?;

        let member = inner.members.remove(position);
        inner.sinks.remove(&connection_id);
        inner.last_activity = Instant::now();

        tracing::info!(
            room_code = %self.code,
            %connection_id,
            player = %member.display_name,
            members = inner.members.len(),
            "member left"
        );

        Ok(Departure {
            display_name: member.display_name,
            remaining: inner.members.len(),
        })
    }

    /// Returns the current roster (names in join order, count).
    pub async fn roster(&self) -> Roster {
        roster_of(&*self.inner.lock().await)
    }

    /// Returns the current member count.
    pub async fn member_count(&self) -> usize {
        self.inner.lock().await.members.len()
    }

    /// Returns the current lifecycle state.
    pub async fn state(&self) -> RoomState {
        self.inner.lock().await.state
    }

    /// Snapshots `(connection, sink)` pairs in join order for a broadcast.
    ///
    /// Taken under the room lock so the recipient set is consistent with
    /// the mutation that triggered the broadcast; the actual sends happen
    /// after the lock is released.
    pub(crate) async fn delivery_snapshot(&self) -> Vec<(ConnectionId, EventSink)> {
        let inner = self.inner.lock().await;
        inner
            .members
            .iter()
            .filter_map(|m| {
                inner
                    .sinks
                    .get(&m.connection_id)
                    .map(|sink| (m.connection_id, sink.clone()))
            })
            .collect()
    }

    /// The reaper's mark step: transitions `Open → Closing` if the room
    /// is empty and has been idle for longer than `grace`.
    ///
    /// Returns `true` if the room was marked (and should now be removed
    /// from the store). Because the emptiness re-check and the mark are
    /// one critical section, a join that slipped in since the reaper's
    /// scan keeps the room alive.
    pub(crate) async fn mark_closing_if_idle(&self, grace: Duration) -> bool {
        let mut inner = self.inner.lock().await;
        if inner.state == RoomState::Open
            && inner.members.is_empty()
            && inner.last_activity.elapsed() > grace
        {
            inner.state = RoomState::Closing;
            return true;
        }
        false
    }
}

/// Builds the ordered roster from locked state.
fn roster_of(inner: &RoomInner) -> Roster {
    Roster {
        names: inner.members.iter().map(|m| m.display_name.clone()).collect(),
        total: inner.members.len(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_room_state_is_joinable() {
        assert!(RoomState::Open.is_joinable());
        assert!(!RoomState::Closing.is_joinable());
    }

    #[test]
    fn test_room_state_display() {
        assert_eq!(RoomState::Open.to_string(), "Open");
        assert_eq!(RoomState::Closing.to_string(), "Closing");
    }
}
