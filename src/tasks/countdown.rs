//! Countdown background task

use std::time::Duration;
use tokio::{
    runtime::Handle,
    task::JoinHandle,
    time::{self, Instant, MissedTickBehavior},
};
use tracing::debug;

use crate::state::{Countdown, CountdownSink};

/// Default spacing between countdown ticks, in milliseconds
pub const DEFAULT_TICK_INTERVAL_MS: u64 = 500;

/// Default spacing between countdown ticks
pub const DEFAULT_TICK_INTERVAL: Duration = Duration::from_millis(DEFAULT_TICK_INTERVAL_MS);

/// [`Countdown`] backed by a tokio task per running mode
#[derive(Debug)]
pub struct TokioCountdown {
    runtime: Handle,
    tick_interval: Duration,
    task: Option<JoinHandle<()>>,
}

impl TokioCountdown {
    /// Create a countdown on the current runtime.
    ///
    /// Panics when called outside of a tokio runtime.
    pub fn new(tick_interval: Duration) -> Self {
        Self::with_handle(Handle::current(), tick_interval)
    }

    pub fn with_handle(runtime: Handle, tick_interval: Duration) -> Self {
        Self {
            runtime,
            tick_interval: tick_interval.max(Duration::from_millis(1)),
            task: None,
        }
    }
}

impl Countdown for TokioCountdown {
    fn start(&mut self, total: Duration, sink: CountdownSink) {
        self.cancel();
        debug!("Starting {}s countdown", total.as_secs());
        let task = self.runtime.spawn(countdown_task(total, self.tick_interval, sink));
        self.task = Some(task);
    }

    fn cancel(&mut self) {
        if let Some(task) = self.task.take() {
            debug!("Cancelling countdown");
            task.abort();
        }
    }
}

impl Drop for TokioCountdown {
    fn drop(&mut self) {
        self.cancel();
    }
}

/// Report the time left every `tick_interval` and finish once `total` elapsed
pub async fn countdown_task(total: Duration, tick_interval: Duration, sink: CountdownSink) {
    let start = Instant::now();
    let deadline = start + total;

    // The controller delivers the full-bar tick itself, so skip the immediate one
    let mut interval = time::interval_at(start + tick_interval, tick_interval);
    interval.set_missed_tick_behavior(MissedTickBehavior::Skip);

    let expiry = time::sleep_until(deadline);
    tokio::pin!(expiry);

    loop {
        tokio::select! {
            biased;

            _ = &mut expiry => {
                debug!("Countdown expired");
                sink.finish();
                break;
            }

            _ = interval.tick() => {
                let remaining = deadline.saturating_duration_since(Instant::now());
                sink.tick(remaining);
            }
        }
    }
}
