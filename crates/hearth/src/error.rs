//! Unified error type for the Hearth server.

use hearth_protocol::ProtocolError;
use hearth_room::RoomError;
use hearth_session::SessionError;
use hearth_transport::TransportError;

/// Top-level error that wraps all crate-specific errors.
///
/// The `#[from]` attributes generate the `From` impls, so `?` converts
/// sub-crate errors automatically; `#[error(transparent)]` keeps the
/// underlying message intact for the error events shown to clients.
#[derive(Debug, thiserror::Error)]
pub enum HearthError {
    /// A transport-level error (bind, accept, send, recv).
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// A protocol-level error (encode, decode, invalid message).
    #[error(transparent)]
    Protocol(#[from] ProtocolError),

    /// A session-level error (unknown connection).
    #[error(transparent)]
    Session(#[from] SessionError),

    /// A room-level error (not found, already joined, closing, ...).
    #[error(transparent)]
    Room(#[from] RoomError),
}

#[cfg(test)]
mod tests {
    use super::*;
    use hearth_protocol::{ConnectionId, RoomCode};

    #[test]
    fn test_from_transport_error() {
        let err = TransportError::SendFailed(std::io::Error::new(
            std::io::ErrorKind::BrokenPipe,
            "gone",
        ));
        let top: HearthError = err.into();
        assert!(matches!(top, HearthError::Transport(_)));
        assert!(top.to_string().contains("gone"));
    }

    #[test]
    fn test_from_protocol_error() {
        let err = ProtocolError::InvalidMessage("bad".into());
        let top: HearthError = err.into();
        assert!(matches!(top, HearthError::Protocol(_)));
    }

    #[test]
    fn test_from_session_error() {
        let err = SessionError::SessionNotFound(ConnectionId(1));
        let top: HearthError = err.into();
        assert!(matches!(top, HearthError::Session(_)));
    }

    #[test]
    fn test_from_room_error() {
        let err = RoomError::NotFound(RoomCode::new("ABC123"));
        let top: HearthError = err.into();
        assert!(matches!(top, HearthError::Room(_)));
        assert_eq!(top.to_string(), "room ABC123 not found");
    }
}
