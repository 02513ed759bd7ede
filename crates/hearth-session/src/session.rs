//! The session record: one per live transport connection.

use hearth_protocol::{ConnectionId, RoomCode};

/// A single connection's session.
///
/// Created when the transport accepts the connection, destroyed when it
/// disconnects. `room` is `None` until the connection joins a room.
#[derive(Debug, Clone)]
pub struct Session {
    /// The transport connection this session belongs to.
    pub connection_id: ConnectionId,

    /// The room this connection has joined, if any.
    ///
    /// Exactly one room at a time — a second join while bound is refused
    /// upstream by the room layer's duplicate check, and the binding is
    /// what the disconnect path follows to remove the member.
    pub room: Option<RoomCode>,
}
