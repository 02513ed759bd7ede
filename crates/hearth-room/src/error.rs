//! Error types for the room layer.

use hearth_protocol::{ConnectionId, RoomCode};

/// Errors that can occur during room operations.
#[derive(Debug, thiserror::Error)]
pub enum RoomError {
    /// The room does not exist (never created, or already reaped).
    #[error("room {0} not found")]
    NotFound(RoomCode),

    /// The connection already has a member in this room. Surfaced rather
    /// than silently ignored so callers can decide what a rejoin means.
    #[error("{0} already joined room {1}")]
    AlreadyJoined(ConnectionId, RoomCode),

    /// The room has been selected for deletion and accepts no new
    /// members. Callers should retry with a fresh room.
    #[error("room {0} is closing")]
    RoomClosing(RoomCode),

    /// The connection has no member in this room.
    #[error("{0} is not a member of room {1}")]
    NotAMember(ConnectionId, RoomCode),

    /// Code generation gave up: every candidate collided with a live
    /// room. Practically unreachable at 6-character codes.
    #[error("room code space exhausted after {0} attempts")]
    CapacityExhausted(u32),
}
