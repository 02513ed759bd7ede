//! Room lifecycle management for Hearth.
//!
//! This crate is the heart of the system: it owns room existence,
//! membership, the fan-out of events to members, and the garbage
//! collection of abandoned rooms.
//!
//! # Key types
//!
//! - [`RoomStore`] — creates, looks up, and deletes rooms; the single
//!   source of truth for room existence
//! - [`Room`] — per-room membership under its own lock
//! - [`EventBroadcaster`] — delivers an event to every member, in join order
//! - [`reaper`] — background task expiring empty rooms
//! - [`StoreConfig`], [`ReaperConfig`] — tuning knobs
//!
//! # Locking discipline
//!
//! Two tiers, never nested the wrong way around:
//!
//! ```text
//! Store lock   — existence check / insert / remove ONLY
//! Room lock    — membership mutation + broadcast snapshot reads
//! ```
//!
//! The store lock is never held during per-room work, so a slow room
//! cannot block operations on other rooms; the reaper takes the Room
//! lock first (to mark), releases it, and only then re-takes the store
//! lock (to remove).

mod broadcast;
mod code;
mod config;
mod error;
pub mod reaper;
mod room;
mod store;

pub use broadcast::{DeliveryFailed, EventBroadcaster, EventSink};
pub use config::{ReaperConfig, StoreConfig};
pub use error::RoomError;
pub use room::{Departure, Member, Room, RoomState, Roster};
pub use store::RoomStore;
