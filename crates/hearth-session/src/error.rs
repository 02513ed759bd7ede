//! Error types for the session layer.

/// Errors that can occur in the session registry.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// No session exists for the given connection. Binding a room
    /// requires that the connect was observed first; hitting this means
    /// the transport integration skipped `attach`, or the connection
    /// already detached.
    #[error("no session for {0}")]
    SessionNotFound(hearth_protocol::ConnectionId),
}
