//! End-to-end tests: real server, real WebSocket clients.

use std::time::Duration;

use futures_util::{SinkExt, StreamExt};
use hearth::HearthServer;
use serde_json::{Value, json};
use tokio_tungstenite::tungstenite::Message;

type ClientWs = tokio_tungstenite::WebSocketStream<
    tokio_tungstenite::MaybeTlsStream<tokio::net::TcpStream>,
>;

const RECV_TIMEOUT: Duration = Duration::from_secs(5);

// =========================================================================
// Helpers
// =========================================================================

/// Starts a server on a random port and returns its address.
async fn start_server() -> std::net::SocketAddr {
    let server = HearthServer::builder()
        .bind("127.0.0.1:0")
        .greeting("hello from the test server")
        .build()
        .await
        .expect("should bind");
    let addr = server.local_addr().expect("should have local addr");
    tokio::spawn(server.run());
    addr
}

async fn connect_client(addr: std::net::SocketAddr) -> ClientWs {
    let (ws, _) = tokio_tungstenite::connect_async(format!("ws://{addr}"))
        .await
        .expect("client should connect");
    ws
}

async fn send_json(ws: &mut ClientWs, value: Value) {
    ws.send(Message::Text(value.to_string().into()))
        .await
        .expect("send should succeed");
}

/// Receives the next data frame and parses it as JSON. Panics (failing
/// the test) if nothing arrives within the timeout.
async fn recv_json(ws: &mut ClientWs) -> Value {
    let deadline = tokio::time::timeout(RECV_TIMEOUT, async {
        loop {
            match ws.next().await {
                Some(Ok(Message::Binary(data))) => {
                    return serde_json::from_slice(&data).expect("frame should be JSON");
                }
                Some(Ok(Message::Text(text))) => {
                    return serde_json::from_str(&text).expect("frame should be JSON");
                }
                Some(Ok(_)) => continue,
                other => panic!("connection ended unexpectedly: {other:?}"),
            }
        }
    });
    deadline.await.expect("timed out waiting for an event")
}

const CODE_ALPHABET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

// =========================================================================
// Tests
// =========================================================================

#[tokio::test]
async fn test_connect_create_join_flow() {
    let addr = start_server().await;
    let mut ws = connect_client(addr).await;

    // Greeting arrives first, unprompted.
    let greeting = recv_json(&mut ws).await;
    assert_eq!(greeting["type"], "connected");
    assert_eq!(greeting["message"], "hello from the test server");

    // Mint a room.
    send_json(&mut ws, json!({"type": "create_room"})).await;
    let created = recv_json(&mut ws).await;
    assert_eq!(created["type"], "room_created");
    let code = created["room_id"].as_str().expect("room_id should be a string");
    assert_eq!(code.len(), 6);
    assert!(code.bytes().all(|b| CODE_ALPHABET.contains(&b)));

    // Join it.
    send_json(
        &mut ws,
        json!({"type": "join_room", "room_id": &code, "player_name": "Alice"}),
    )
    .await;
    let joined = recv_json(&mut ws).await;
    assert_eq!(joined["type"], "player_joined");
    assert_eq!(joined["player_name"], "Alice");
    assert_eq!(joined["total_players"], 1);
}

#[tokio::test]
async fn test_second_join_broadcasts_to_both_members() {
    let addr = start_server().await;

    let mut alice = connect_client(addr).await;
    recv_json(&mut alice).await; // connected
    send_json(&mut alice, json!({"type": "create_room"})).await;
    let created = recv_json(&mut alice).await;
    let code = created["room_id"].as_str().unwrap().to_string();
    send_json(
        &mut alice,
        json!({"type": "join_room", "room_id": &code, "player_name": "Alice"}),
    )
    .await;
    recv_json(&mut alice).await; // player_joined Alice

    let mut bob = connect_client(addr).await;
    recv_json(&mut bob).await; // connected
    send_json(
        &mut bob,
        json!({"type": "join_room", "room_id": &code, "player_name": "Bob"}),
    )
    .await;

    // Both members hear about Bob, with the same payload.
    for ws in [&mut alice, &mut bob] {
        let event = recv_json(ws).await;
        assert_eq!(event["type"], "player_joined");
        assert_eq!(event["player_name"], "Bob");
        assert_eq!(event["total_players"], 2);
    }
}

#[tokio::test]
async fn test_disconnect_broadcasts_player_left_to_remaining() {
    let addr = start_server().await;

    let mut alice = connect_client(addr).await;
    recv_json(&mut alice).await;
    send_json(&mut alice, json!({"type": "create_room"})).await;
    let code = recv_json(&mut alice).await["room_id"]
        .as_str()
        .unwrap()
        .to_string();
    send_json(
        &mut alice,
        json!({"type": "join_room", "room_id": &code, "player_name": "Alice"}),
    )
    .await;
    recv_json(&mut alice).await;

    let mut bob = connect_client(addr).await;
    recv_json(&mut bob).await;
    send_json(
        &mut bob,
        json!({"type": "join_room", "room_id": &code, "player_name": "Bob"}),
    )
    .await;
    recv_json(&mut alice).await; // player_joined Bob

    bob.close(None).await.unwrap();

    let event = recv_json(&mut alice).await;
    assert_eq!(event["type"], "player_left");
    assert_eq!(event["player_name"], "Bob");
    assert_eq!(event["total_players"], 1);
}

#[tokio::test]
async fn test_join_unknown_room_returns_error_event() {
    let addr = start_server().await;
    let mut ws = connect_client(addr).await;
    recv_json(&mut ws).await;

    send_json(
        &mut ws,
        json!({"type": "join_room", "room_id": "NOPE99", "player_name": "Alice"}),
    )
    .await;

    let event = recv_json(&mut ws).await;
    assert_eq!(event["type"], "error");
    assert_eq!(event["message"], "room NOPE99 not found");
}

#[tokio::test]
async fn test_join_without_player_name_defaults_to_guest() {
    let addr = start_server().await;
    let mut ws = connect_client(addr).await;
    recv_json(&mut ws).await;

    send_json(&mut ws, json!({"type": "create_room"})).await;
    let code = recv_json(&mut ws).await["room_id"]
        .as_str()
        .unwrap()
        .to_string();
    send_json(&mut ws, json!({"type": "join_room", "room_id": &code})).await;

    let event = recv_json(&mut ws).await;
    assert_eq!(event["type"], "player_joined");
    assert_eq!(event["player_name"], "Guest");
}

#[tokio::test]
async fn test_malformed_frame_gets_error_event_and_connection_survives() {
    let addr = start_server().await;
    let mut ws = connect_client(addr).await;
    recv_json(&mut ws).await;

    ws.send(Message::Text("this is not json".into()))
        .await
        .unwrap();
    let event = recv_json(&mut ws).await;
    assert_eq!(event["type"], "error");

    // The connection still works afterwards.
    send_json(&mut ws, json!({"type": "create_room"})).await;
    let created = recv_json(&mut ws).await;
    assert_eq!(created["type"], "room_created");
}
