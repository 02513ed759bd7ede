//! # Hearth
//!
//! A room-based real-time session server: mint short room codes, let
//! connections join rooms by code, and fan membership events out to
//! everyone in the room — with join/leave/disconnect kept safe under
//! concurrency and abandoned rooms garbage-collected.
//!
//! ## Quick start
//!
//! ```rust,no_run
//! use hearth::HearthServer;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), hearth::HearthError> {
//!     hearth::init_tracing();
//!     let server = HearthServer::builder()
//!         .bind("0.0.0.0:8080")
//!         .build()
//!         .await?;
//!     server.run().await
//! }
//! ```
//!
//! The stack, top to bottom: [`HearthServer`] accepts WebSocket
//! connections and runs one handler task per connection; handlers
//! decode client commands and call into [`Core`], which owns the room
//! store, the session registry, and the broadcaster from `hearth-room`
//! and `hearth-session`.

mod core;
mod error;
mod handler;
mod server;

pub use crate::core::{Core, CoreConfig};
pub use crate::error::HearthError;
pub use crate::server::{HearthServer, HearthServerBuilder};

/// Installs a `tracing` subscriber reading the `RUST_LOG` environment
/// variable, defaulting to `info`. Safe to call more than once; later
/// calls are no-ops.
pub fn init_tracing() {
    use tracing_subscriber::EnvFilter;

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}
