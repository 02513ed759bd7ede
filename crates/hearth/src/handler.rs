//! Per-connection handler: greet, decode commands, deliver events.
//!
//! Each accepted connection gets its own task running this handler. The
//! flow is:
//!   1. Attach the session and queue the `connected` greeting
//!   2. Loop: inbound frames → decode → dispatch to the core,
//!      queued events → encode → socket
//!   3. On close/error: disconnect (leave + `player_left` broadcast)
//!
//! All events for this connection — the greeting, its own broadcasts,
//! its error replies — travel through one queue, so they reach the
//! socket in the order the core emitted them. Because the handler is
//! the only task issuing operations for its connection, those
//! operations are naturally serialized: the disconnect at the bottom
//! cannot overlap a join still in flight.

use std::sync::Arc;

use hearth_protocol::{ClientCommand, Codec, ConnectionId, Event, JsonCodec};
use hearth_room::EventSink;
use hearth_transport::{WsConnection, WsSender};
use tokio::sync::mpsc;

use crate::Core;

/// Handles a single connection from accept to close.
pub(crate) async fn handle_connection(conn: WsConnection, core: Arc<Core>) {
    let connection_id = conn.id();
    let (mut sender, mut receiver) = conn.split();
    let codec = JsonCodec;

    let (sink, mut events) = mpsc::unbounded_channel::<Event>();
    core.connect(connection_id, &sink).await;

    loop {
        tokio::select! {
            maybe_event = events.recv() => {
                // `sink` lives on this stack frame, so the channel can't
                // report closed while we're still looping.
                let Some(event) = maybe_event else { break };
                if !forward(&codec, &mut sender, &event).await {
                    break;
                }
            }

            frame = receiver.next() => {
                let data = match frame {
                    Ok(Some(data)) => data,
                    Ok(None) => {
                        tracing::debug!(%connection_id, "connection closed by peer");
                        break;
                    }
                    Err(e) => {
                        tracing::debug!(%connection_id, error = %e, "connection errored");
                        break;
                    }
                };

                match codec.decode::<ClientCommand>(&data) {
                    Ok(command) => {
                        dispatch(&core, connection_id, &sink, command).await;
                    }
                    Err(e) => {
                        // A malformed frame gets an error event, not a hangup.
                        tracing::debug!(%connection_id, error = %e, "undecodable frame");
                        let _ = sink.send(Event::Error {
                            message: e.to_string(),
                        });
                    }
                }
            }
        }
    }

    core.disconnect(connection_id).await;

    // Flush whatever was queued before the teardown, then close.
    while let Ok(event) = events.try_recv() {
        if !forward(&codec, &mut sender, &event).await {
            break;
        }
    }
    sender.close().await;
}

/// Dispatches one decoded client command. Failures become `error`
/// events on this connection's own queue; nothing here is fatal.
async fn dispatch(
    core: &Arc<Core>,
    connection_id: ConnectionId,
    sink: &EventSink,
    command: ClientCommand,
) {
    match command {
        ClientCommand::CreateRoom => match core.create_room().await {
            Ok(room_id) => {
                let _ = sink.send(Event::RoomCreated { room_id });
            }
            Err(e) => send_error(sink, &e),
        },

        ClientCommand::JoinRoom {
            room_id,
            player_name,
        } => {
            // On success the `player_joined` broadcast already covers
            // this connection; only failures need a direct reply.
            if let Err(e) = core
                .join(connection_id, &room_id, &player_name, sink.clone())
                .await
            {
                send_error(sink, &e);
            }
        }
    }
}

/// Queues an `error` event for this connection.
fn send_error(sink: &EventSink, error: &crate::HearthError) {
    let _ = sink.send(Event::Error {
        message: error.to_string(),
    });
}

/// Encodes one event and writes it to the socket. Returns `false` when
/// the connection is no longer writable.
async fn forward(codec: &JsonCodec, sender: &mut WsSender, event: &Event) -> bool {
    match codec.encode(event) {
        Ok(bytes) => sender.send(bytes).await.is_ok(),
        Err(e) => {
            // An unencodable event is a bug in this crate, not the peer.
            tracing::error!(error = %e, "failed to encode event");
            true
        }
    }
}
