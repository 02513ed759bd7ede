//! Core protocol types: identifiers and the messages that travel on the wire.

use std::fmt;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Identity types
// ---------------------------------------------------------------------------

/// A short, human-shareable code identifying a live room.
///
/// Six uppercase letters/digits (`[A-Z0-9]`), e.g. `"ABC123"` — short
/// enough to read out loud to the person you want to invite. Codes are
/// unique among *currently live* rooms only; a code may be reused after
/// its room is deleted.
///
/// This is a newtype over `String`: you can't accidentally pass a display
/// name where a room code is expected. `#[serde(transparent)]` keeps the
/// wire representation a plain JSON string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RoomCode(String);

impl RoomCode {
    /// The length of every generated room code.
    pub const LEN: usize = 6;

    /// Wraps a raw string as a room code.
    ///
    /// No validation happens here — codes arriving from clients are
    /// opaque lookup keys, and an unknown code simply fails the lookup.
    pub fn new(code: impl Into<String>) -> Self {
        Self(code.into())
    }

    /// Returns the code as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RoomCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Opaque identifier for a transport connection.
///
/// Assigned by the transport when a connection is accepted, and used as
/// the membership identity everywhere above it: one live connection ==
/// one session == at most one room membership.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConnectionId(pub u64);

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "conn-{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// ClientCommand — what clients send
// ---------------------------------------------------------------------------

/// Requests a client can make over its connection.
///
/// `#[serde(tag = "type", rename_all = "snake_case")]` produces internally
/// tagged JSON with lowercase tags, matching what the browser client sends:
///   `{ "type": "join_room", "room_id": "ABC123", "player_name": "Alice" }`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientCommand {
    /// Mint a fresh empty room; the server answers with
    /// [`Event::RoomCreated`] carrying the code.
    CreateRoom,

    /// Join the room identified by `room_id`.
    ///
    /// `player_name` defaults to `"Guest"` when the client omits it.
    JoinRoom {
        room_id: RoomCode,
        #[serde(default = "default_player_name")]
        player_name: String,
    },
}

fn default_player_name() -> String {
    "Guest".to_string()
}

// ---------------------------------------------------------------------------
// Event — what the server emits
// ---------------------------------------------------------------------------

/// Events the server delivers to connections.
///
/// Same internally tagged snake_case JSON as [`ClientCommand`], so the tag
/// for `PlayerJoined` is `"player_joined"` on the wire. `Connected`,
/// `PlayerJoined`, and `Error` are the shapes the transport layer must
/// carry verbatim; `RoomCreated` and `PlayerLeft` complete the create and
/// disconnect flows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Event {
    /// Greeting delivered once, immediately after the connection attaches.
    Connected { message: String },

    /// Reply to [`ClientCommand::CreateRoom`] with the minted code.
    RoomCreated { room_id: RoomCode },

    /// Broadcast to every member (the joiner included) after a join.
    PlayerJoined {
        player_name: String,
        total_players: usize,
    },

    /// Broadcast to the remaining members after a member disconnects.
    PlayerLeft {
        player_name: String,
        total_players: usize,
    },

    /// A request failed; delivered only to the offending connection.
    Error { message: String },
}

// =========================================================================
// Tests
// =========================================================================

#[cfg(test)]
mod tests {
    //! Tests pinning the exact JSON shapes. The client parses these by
    //! string tag, so a renamed variant or field is a protocol break even
    //! though everything still compiles.

    use super::*;

    // =====================================================================
    // Identity types
    // =====================================================================

    #[test]
    fn test_room_code_serializes_as_plain_string() {
        // `#[serde(transparent)]` means RoomCode("ABC123") → `"ABC123"`,
        // not `{"0":"ABC123"}`.
        let json = serde_json::to_string(&RoomCode::new("ABC123")).unwrap();
        assert_eq!(json, "\"ABC123\"");
    }

    #[test]
    fn test_room_code_deserializes_from_plain_string() {
        let code: RoomCode = serde_json::from_str("\"XY42ZW\"").unwrap();
        assert_eq!(code, RoomCode::new("XY42ZW"));
    }

    #[test]
    fn test_room_code_display() {
        assert_eq!(RoomCode::new("ABC123").to_string(), "ABC123");
    }

    #[test]
    fn test_connection_id_display() {
        assert_eq!(ConnectionId(7).to_string(), "conn-7");
    }

    // =====================================================================
    // ClientCommand
    // =====================================================================

    #[test]
    fn test_client_command_create_room_json_format() {
        let json: serde_json::Value =
            serde_json::to_value(&ClientCommand::CreateRoom).unwrap();
        assert_eq!(json["type"], "create_room");
    }

    #[test]
    fn test_client_command_join_room_json_format() {
        let cmd = ClientCommand::JoinRoom {
            room_id: RoomCode::new("ABC123"),
            player_name: "Alice".into(),
        };
        let json: serde_json::Value = serde_json::to_value(&cmd).unwrap();

        assert_eq!(json["type"], "join_room");
        assert_eq!(json["room_id"], "ABC123");
        assert_eq!(json["player_name"], "Alice");
    }

    #[test]
    fn test_client_command_join_room_missing_name_defaults_to_guest() {
        // Clients may omit player_name entirely.
        let json = r#"{"type": "join_room", "room_id": "ABC123"}"#;
        let cmd: ClientCommand = serde_json::from_str(json).unwrap();
        assert_eq!(
            cmd,
            ClientCommand::JoinRoom {
                room_id: RoomCode::new("ABC123"),
                player_name: "Guest".into(),
            }
        );
    }

    #[test]
    fn test_client_command_unknown_type_returns_error() {
        let json = r#"{"type": "fly_to_moon", "speed": 9000}"#;
        let result: Result<ClientCommand, _> = serde_json::from_str(json);
        assert!(result.is_err());
    }

    // =====================================================================
    // Event — one shape test per variant
    // =====================================================================

    #[test]
    fn test_event_connected_json_format() {
        let event = Event::Connected {
            message: "welcome".into(),
        };
        let json: serde_json::Value = serde_json::to_value(&event).unwrap();

        assert_eq!(json["type"], "connected");
        assert_eq!(json["message"], "welcome");
    }

    #[test]
    fn test_event_room_created_json_format() {
        let event = Event::RoomCreated {
            room_id: RoomCode::new("ABC123"),
        };
        let json: serde_json::Value = serde_json::to_value(&event).unwrap();

        assert_eq!(json["type"], "room_created");
        assert_eq!(json["room_id"], "ABC123");
    }

    #[test]
    fn test_event_player_joined_json_format() {
        let event = Event::PlayerJoined {
            player_name: "Bob".into(),
            total_players: 2,
        };
        let json: serde_json::Value = serde_json::to_value(&event).unwrap();

        assert_eq!(json["type"], "player_joined");
        assert_eq!(json["player_name"], "Bob");
        assert_eq!(json["total_players"], 2);
    }

    #[test]
    fn test_event_player_left_json_format() {
        let event = Event::PlayerLeft {
            player_name: "Bob".into(),
            total_players: 1,
        };
        let json: serde_json::Value = serde_json::to_value(&event).unwrap();

        assert_eq!(json["type"], "player_left");
        assert_eq!(json["player_name"], "Bob");
        assert_eq!(json["total_players"], 1);
    }

    #[test]
    fn test_event_error_json_format() {
        let event = Event::Error {
            message: "room not found".into(),
        };
        let json: serde_json::Value = serde_json::to_value(&event).unwrap();

        assert_eq!(json["type"], "error");
        assert_eq!(json["message"], "room not found");
    }
}
