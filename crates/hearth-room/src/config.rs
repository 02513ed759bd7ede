//! Store and reaper configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// StoreConfig
// ---------------------------------------------------------------------------

/// Configuration for the room store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Length of generated room codes. At the default 6 characters over
    /// a 36-symbol alphabet the code space is ~2.2 billion, so collisions
    /// on generation are retries, not failures.
    pub code_length: usize,

    /// How many candidate codes to draw before giving up with
    /// `CapacityExhausted`. Only reachable when the live-room count
    /// approaches the code space itself.
    pub max_code_attempts: u32,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            code_length: 6,
            max_code_attempts: 64,
        }
    }
}

// ---------------------------------------------------------------------------
// ReaperConfig
// ---------------------------------------------------------------------------

/// Configuration for the lifecycle reaper.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReaperConfig {
    /// How often the reaper scans the store.
    pub interval: Duration,

    /// How long a room may sit empty before it is deleted. Room creation
    /// counts as activity, so a freshly minted room survives at least one
    /// grace period even if nobody ever joins it.
    pub grace_period: Duration,
}

impl Default for ReaperConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(60),
            grace_period: Duration::from_secs(120),
        }
    }
}
