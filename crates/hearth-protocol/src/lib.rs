//! Wire protocol for Hearth.
//!
//! This crate defines the "language" that clients and the server speak:
//!
//! - **Types** ([`RoomCode`], [`ConnectionId`], [`ClientCommand`],
//!   [`Event`]) — the identifiers and message structures that travel on
//!   the wire.
//! - **Codec** ([`Codec`] trait, [`JsonCodec`]) — how those messages are
//!   converted to/from bytes.
//! - **Errors** ([`ProtocolError`]) — what can go wrong during
//!   encoding/decoding.
//!
//! # Architecture
//!
//! The protocol layer sits between transport (raw bytes) and the session
//! core (rooms, members). It doesn't know about connections or rooms —
//! it only knows how to name them and how to serialize messages.
//!
//! ```text
//! Transport (bytes) → Protocol (commands/events) → Core (rooms, sessions)
//! ```

mod codec;
mod error;
mod types;

pub use codec::Codec;
#[cfg(feature = "json")]
pub use codec::JsonCodec;
pub use error::ProtocolError;
pub use types::{ClientCommand, ConnectionId, Event, RoomCode};
