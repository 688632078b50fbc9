//! Background poll task
//!
//! One task per broadcast. It exits when its cancellation token fires or
//! when the controller reports that its epoch is no longer current.

use super::controller::BroadcastController;
use super::status::TickOutcome;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{debug, trace};

pub(super) fn spawn_poll_loop(
    controller: BroadcastController,
    epoch: u64,
    cancel: CancellationToken,
    period: Duration,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        debug!("Poll loop started (epoch {}, period {:?})", epoch, period);

        // The controller ran the first tick itself during start
        let mut ticker = interval_at(Instant::now() + period, period);
        // A slow switcher call must not be followed by a burst of catch-up ticks
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = cancel.cancelled() => break,
                _ = ticker.tick() => {}
            }

            match controller.tick_for_epoch(epoch).await {
                Some(TickOutcome::Unchanged(_)) => {}
                Some(outcome) => trace!("Poll tick (epoch {}): {:?}", epoch, outcome),
                None => break,
            }
        }

        debug!("Poll loop exited (epoch {})", epoch);
    })
}
