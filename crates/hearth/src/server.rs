//! `HearthServer` builder and accept loop.

use std::sync::Arc;

use hearth_room::{ReaperConfig, StoreConfig, reaper};
use hearth_transport::WsListener;

use crate::handler::handle_connection;
use crate::{Core, CoreConfig, HearthError};

/// Builder for configuring and starting a Hearth server.
///
/// # Example
///
/// ```rust,ignore
/// let server = HearthServer::builder()
///     .bind("0.0.0.0:8080")
///     .greeting("Welcome!")
///     .build()
///     .await?;
/// server.run().await
/// ```
pub struct HearthServerBuilder {
    bind_addr: String,
    core_config: CoreConfig,
    reaper_config: ReaperConfig,
}

impl HearthServerBuilder {
    /// Creates a new builder with default settings.
    pub fn new() -> Self {
        Self {
            bind_addr: "127.0.0.1:8080".to_string(),
            core_config: CoreConfig::default(),
            reaper_config: ReaperConfig::default(),
        }
    }

    /// Sets the address to bind the server to.
    pub fn bind(mut self, addr: &str) -> Self {
        self.bind_addr = addr.to_string();
        self
    }

    /// Sets the `connected` greeting text.
    pub fn greeting(mut self, greeting: &str) -> Self {
        self.core_config.greeting = greeting.to_string();
        self
    }

    /// Sets the room store configuration.
    pub fn store_config(mut self, config: StoreConfig) -> Self {
        self.core_config.store = config;
        self
    }

    /// Sets the reaper configuration.
    pub fn reaper_config(mut self, config: ReaperConfig) -> Self {
        self.reaper_config = config;
        self
    }

    /// Binds the listener and builds the server.
    pub async fn build(self) -> Result<HearthServer, HearthError> {
        let listener = WsListener::bind(&self.bind_addr).await?;
        Ok(HearthServer {
            listener,
            core: Arc::new(Core::new(self.core_config)),
            reaper_config: self.reaper_config,
        })
    }
}

impl Default for HearthServerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// A running Hearth server.
///
/// Call [`run()`](Self::run) to start the reaper and accept connections.
pub struct HearthServer {
    listener: WsListener,
    core: Arc<Core>,
    reaper_config: ReaperConfig,
}

impl HearthServer {
    /// Creates a new builder.
    pub fn builder() -> HearthServerBuilder {
        HearthServerBuilder::new()
    }

    /// Returns the local address the server is bound to.
    pub fn local_addr(&self) -> std::io::Result<std::net::SocketAddr> {
        self.listener.local_addr()
    }

    /// Runs the server: spawns the reaper, then accepts connections
    /// forever, one handler task each. Runs until the process exits.
    pub async fn run(self) -> Result<(), HearthError> {
        let _reaper = reaper::spawn(Arc::clone(self.core.store()), self.reaper_config);
        tracing::info!("Hearth server running");

        loop {
            match self.listener.accept().await {
                Ok(conn) => {
                    let core = Arc::clone(&self.core);
                    tokio::spawn(handle_connection(conn, core));
                }
                Err(e) => {
                    tracing::error!(error = %e, "accept failed");
                }
            }
        }
    }
}
