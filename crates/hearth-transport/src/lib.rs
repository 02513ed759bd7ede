//! WebSocket transport for Hearth.
//!
//! Accepts connections and hands each one to the layer above as a pair of
//! halves: a [`WsSender`] for outbound frames and a [`WsReceiver`] for
//! inbound ones. The split exists so a connection handler can
//! `tokio::select!` over "frame arrived from the client" and "event ready
//! to deliver" without a lock around the socket.

mod error;
mod websocket;

pub use error::TransportError;
pub use websocket::{WsConnection, WsListener, WsReceiver, WsSender};
