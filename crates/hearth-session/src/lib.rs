//! Connection session tracking for Hearth.
//!
//! A session is the server's record of one live transport connection and
//! the room (if any) that connection has joined. The registry is what
//! makes disconnect cleanup possible: when a connection drops, it is the
//! only place that still knows which room the member must be removed from.
//!
//! # How it fits in the stack
//!
//! ```text
//! Core (above)      ← binds sessions to rooms, drives disconnect cleanup
//!     ↕
//! Session layer (this crate)  ← connection identity → room binding
//!     ↕
//! Protocol layer (below)      ← provides ConnectionId, RoomCode
//! ```

mod error;
mod registry;
mod session;

pub use error::SessionError;
pub use registry::SessionRegistry;
pub use session::Session;
