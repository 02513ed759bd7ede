//! The lifecycle reaper: background garbage collection of idle rooms.
//!
//! Rooms are cheap, but they are not free — every abandoned room keeps
//! its code out of circulation and its state in memory until something
//! deletes it. The reaper is that something: a single task that sweeps
//! the store on a fixed interval.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use crate::{ReaperConfig, RoomStore};

/// Spawns the reaper task over the given store.
///
/// Each pass runs [`RoomStore::sweep_idle`] with the configured grace
/// period (the mark-then-remove protocol lives there). Aborting the
/// returned handle stops the reaper; tests drive `sweep_idle` directly
/// instead of spawning this.
pub fn spawn(store: Arc<RoomStore>, config: ReaperConfig) -> JoinHandle<()> {
    // tokio panics on a zero-period interval.
    let period = config.interval.max(Duration::from_millis(100));

    tokio::spawn(async move {
        tracing::info!(
            interval_secs = period.as_secs_f64(),
            grace_secs = config.grace_period.as_secs_f64(),
            "reaper started"
        );

        let mut ticker = tokio::time::interval(period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            ticker.tick().await;
            let reaped = store.sweep_idle(config.grace_period).await;
            if !reaped.is_empty() {
                tracing::info!(count = reaped.len(), "reaped idle rooms");
            }
        }
    })
}
