//! Periodic market data pollers.
//!
//! Each poller is a single tokio task owned through a handle. The task
//! fetches on a fixed interval (first tick immediately), can be triggered
//! early, and reports every cycle as one [`Action`](crate::state::Action)
//! on the store's channel. Stopping a handle drops any in-flight fetch, so
//! nothing is delivered after [`PollerHandle::stop`] returns.

mod news;
mod price;
#[cfg(test)]
mod test_support;

pub use news::{NewsPoller, NewsPollerHandle};
pub use price::PricePoller;

use crate::api::{MarketDataSource, MarketQuery, RawCoinRecord};
use crate::error::{Error, Result};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{Notify, watch};
use tokio::task::JoinHandle;
use tokio::time::{self, Interval, MissedTickBehavior};

/// Smallest accepted poll period.
const MIN_PERIOD: Duration = Duration::from_millis(1);

/// Owning handle to a running poller task.
///
/// Dropping the handle aborts the task.
pub struct PollerHandle {
    name: &'static str,
    shutdown: watch::Sender<bool>,
    refresh: Arc<Notify>,
    task: JoinHandle<()>,
}

impl PollerHandle {
    fn new(
        name: &'static str,
        shutdown: watch::Sender<bool>,
        refresh: Arc<Notify>,
        task: JoinHandle<()>,
    ) -> Self {
        Self {
            name,
            shutdown,
            refresh,
            task,
        }
    }

    /// Run a cycle now and restart the interval from here.
    ///
    /// A refresh while a fetch is in flight is absorbed by that fetch.
    pub fn refresh(&self) {
        // No stored permit: only a task idle between cycles is woken.
        self.refresh.notify_waiters();
    }

    /// Stop the schedule and wait for the task to exit.
    pub async fn stop(mut self) -> Result<()> {
        // The task may already be gone; nothing to signal then.
        let _ = self.shutdown.send(true);
        (&mut self.task)
            .await
            .map_err(|e| Error::application(format!("{} poller task failed: {}", self.name, e)))
    }
}

impl Drop for PollerHandle {
    fn drop(&mut self) {
        self.task.abort();
    }
}

/// Channels a poller task listens on.
struct Control {
    shutdown: watch::Receiver<bool>,
    refresh: Arc<Notify>,
}

fn control_pair() -> (watch::Sender<bool>, Control) {
    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let control = Control {
        shutdown: shutdown_rx,
        refresh: Arc::new(Notify::new()),
    };
    (shutdown_tx, control)
}

/// Resolves once a stop is requested or the handle is gone.
async fn stopped(shutdown: &mut watch::Receiver<bool>) {
    let _ = shutdown.wait_for(|stop| *stop).await;
}

fn ticker(period: Duration) -> Interval {
    let mut ticker = time::interval(period.max(MIN_PERIOD));
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    ticker
}

/// Fetch with a deadline; an expired deadline is a [`Error::Timeout`].
async fn fetch_with_deadline(
    source: &dyn MarketDataSource,
    query: &MarketQuery,
    deadline: Duration,
) -> Result<Vec<RawCoinRecord>> {
    match time::timeout(deadline, source.fetch_markets(query)).await {
        Ok(result) => result,
        Err(_) => Err(Error::Timeout(deadline)),
    }
}
