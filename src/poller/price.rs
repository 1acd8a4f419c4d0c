//! Price card poller.

use super::{Control, PollerHandle, control_pair, fetch_with_deadline, stopped, ticker};
use crate::api::{DataConverter, MarketDataSource, MarketQuery};
use crate::config::Config;
use crate::error::Result;
use crate::state::{Action, PriceCard};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

/// Polls the top coins with sparklines and publishes price card snapshots.
///
/// A failed cycle leaves the previous cards in place; the next tick is the
/// retry.
pub struct PricePoller {
    source: Arc<dyn MarketDataSource>,
    query: MarketQuery,
    period: Duration,
    fetch_timeout: Duration,
    action_tx: mpsc::UnboundedSender<Action>,
}

impl PricePoller {
    /// Create a poller with a 60 second period and 30 second fetch timeout.
    pub fn new(
        source: Arc<dyn MarketDataSource>,
        query: MarketQuery,
        action_tx: mpsc::UnboundedSender<Action>,
    ) -> Self {
        Self {
            source,
            query,
            period: Duration::from_secs(60),
            fetch_timeout: Duration::from_secs(30),
            action_tx,
        }
    }

    /// Create a poller from application configuration.
    pub fn from_config(
        source: Arc<dyn MarketDataSource>,
        config: &Config,
        action_tx: mpsc::UnboundedSender<Action>,
    ) -> Self {
        Self::new(
            source,
            MarketQuery::prices(&config.api, &config.polling),
            action_tx,
        )
        .period(config.polling.price_interval())
        .fetch_timeout(config.polling.fetch_timeout())
    }

    /// Set the poll period.
    pub fn period(mut self, period: Duration) -> Self {
        self.period = period;
        self
    }

    /// Set the per-fetch deadline.
    pub fn fetch_timeout(mut self, timeout: Duration) -> Self {
        self.fetch_timeout = timeout;
        self
    }

    /// Run one fetch-normalize cycle.
    pub async fn poll_once(&self) -> Result<Vec<PriceCard>> {
        let records =
            fetch_with_deadline(self.source.as_ref(), &self.query, self.fetch_timeout).await?;
        Ok(DataConverter::price_cards(records))
    }

    /// Start the poller task.
    pub fn spawn(self) -> PollerHandle {
        let (shutdown_tx, control) = control_pair();
        let refresh = control.refresh.clone();
        let task = tokio::spawn(self.run(control));
        PollerHandle::new("price", shutdown_tx, refresh, task)
    }

    async fn run(self, control: Control) {
        let Control {
            mut shutdown,
            refresh,
        } = control;
        let mut ticker = ticker(self.period);
        info!(period = ?self.period, per_page = self.query.per_page, "price poller started");

        loop {
            tokio::select! {
                biased;
                _ = stopped(&mut shutdown) => break,
                _ = ticker.tick() => {}
                _ = refresh.notified() => ticker.reset(),
            }

            let outcome = tokio::select! {
                biased;
                _ = stopped(&mut shutdown) => break,
                outcome = self.poll_once() => outcome,
            };

            let action = match outcome {
                Ok(cards) => {
                    debug!(count = cards.len(), "price cycle complete");
                    Action::PricesLoaded(cards)
                }
                Err(e) => {
                    warn!(
                        error = %e,
                        fetch_failure = e.is_fetch_failure(),
                        recoverable = e.is_recoverable(),
                        "price fetch failed, keeping previous cards"
                    );
                    Action::PricesFailed(e.to_string())
                }
            };

            if self.action_tx.send(action).is_err() {
                debug!("action channel closed");
                break;
            }
        }

        info!("price poller stopped");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::MockMarketDataSource;
    use crate::error::Error;
    use crate::market::Sentiment;
    use crate::poller::test_support::{SlowSource, StalledSource, coin, price_query};
    use crate::state::Store;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tokio::time::Instant;
    use tokio_test::assert_ok;

    fn top_coins() -> Vec<crate::api::RawCoinRecord> {
        vec![coin("bitcoin", "Bitcoin", 1.5, 67000.0), coin("ethereum", "Ethereum", -0.4, 3500.0)]
    }

    fn steady_source() -> Arc<dyn MarketDataSource> {
        let mut source = MockMarketDataSource::new();
        source
            .expect_fetch_markets()
            .returning(|_| Ok(top_coins()));
        Arc::new(source)
    }

    #[tokio::test(start_paused = true)]
    async fn test_first_cycle_immediate_then_periodic() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let start = Instant::now();
        let handle = PricePoller::new(steady_source(), price_query(), tx).spawn();

        let first = rx.recv().await.unwrap();
        assert!(matches!(first, Action::PricesLoaded(ref cards) if cards.len() == 2));
        assert_eq!(start.elapsed(), Duration::ZERO);

        let second = rx.recv().await.unwrap();
        assert!(matches!(second, Action::PricesLoaded(_)));
        assert_eq!(start.elapsed(), Duration::from_secs(60));

        assert_ok!(handle.stop().await);
    }

    #[tokio::test(start_paused = true)]
    async fn test_failure_after_success_keeps_cards() {
        let calls = AtomicUsize::new(0);
        let mut source = MockMarketDataSource::new();
        source.expect_fetch_markets().returning(move |_| {
            if calls.fetch_add(1, Ordering::SeqCst) == 0 {
                Ok(top_coins())
            } else {
                Err(Error::HttpStatus(500))
            }
        });

        let (tx, mut rx) = mpsc::unbounded_channel();
        let handle = PricePoller::new(Arc::new(source), price_query(), tx).spawn();

        let (store_tx, _store_rx) = mpsc::unbounded_channel();
        let mut store = Store::new(store_tx, Sentiment::Hot);

        store.reduce(rx.recv().await.unwrap());
        let before = store.prices.cards.clone();
        assert_eq!(before.len(), 2);

        let failed = rx.recv().await.unwrap();
        assert!(matches!(failed, Action::PricesFailed(ref reason) if reason.contains("500")));
        store.reduce(failed);

        assert_eq!(store.prices.cards, before);
        assert!(!store.loading());
        assert_eq!(store.prices.failed_cycles, 1);

        assert_ok!(handle.stop().await);
    }

    #[tokio::test(start_paused = true)]
    async fn test_fetch_timeout_is_reported_as_failure() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let start = Instant::now();
        let handle = PricePoller::new(Arc::new(StalledSource), price_query(), tx)
            .fetch_timeout(Duration::from_secs(5))
            .spawn();

        let action = rx.recv().await.unwrap();
        assert!(matches!(action, Action::PricesFailed(ref reason) if reason.contains("timed out")));
        assert_eq!(start.elapsed(), Duration::from_secs(5));

        assert_ok!(handle.stop().await);
    }

    #[tokio::test(start_paused = true)]
    async fn test_stop_ends_schedule() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let handle = PricePoller::new(steady_source(), price_query(), tx).spawn();

        assert!(rx.recv().await.is_some());
        assert_ok!(handle.stop().await);

        // The task owned the only sender.
        assert!(rx.recv().await.is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_stop_discards_in_flight_fetch() {
        let source = Arc::new(SlowSource::new(Duration::from_secs(10), top_coins()));
        let (tx, mut rx) = mpsc::unbounded_channel();
        let handle = PricePoller::new(source.clone(), price_query(), tx).spawn();

        tokio::time::sleep(Duration::from_secs(1)).await;
        assert_eq!(source.calls(), 1);
        assert_ok!(handle.stop().await);

        assert!(rx.recv().await.is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_refresh_runs_cycle_early() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let handle = PricePoller::new(steady_source(), price_query(), tx).spawn();
        rx.recv().await.unwrap();

        tokio::time::sleep(Duration::from_secs(10)).await;
        let start = Instant::now();
        handle.refresh();
        rx.recv().await.unwrap();
        assert_eq!(start.elapsed(), Duration::ZERO);

        // The interval restarts from the manual refresh.
        rx.recv().await.unwrap();
        assert_eq!(start.elapsed(), Duration::from_secs(60));

        assert_ok!(handle.stop().await);
    }

    #[tokio::test(start_paused = true)]
    async fn test_refresh_during_fetch_merges_into_cycle() {
        let source = Arc::new(SlowSource::new(Duration::from_secs(5), top_coins()));
        let (tx, mut rx) = mpsc::unbounded_channel();
        let start = Instant::now();
        let handle = PricePoller::new(source.clone(), price_query(), tx).spawn();

        tokio::time::sleep(Duration::from_secs(1)).await;
        handle.refresh();

        rx.recv().await.unwrap();
        assert_eq!(start.elapsed(), Duration::from_secs(5));
        assert_eq!(source.calls(), 1);

        // No extra request right after the first; the interval drives the next one.
        rx.recv().await.unwrap();
        assert_eq!(start.elapsed(), Duration::from_secs(65));
        assert_eq!(source.calls(), 2);

        assert_ok!(handle.stop().await);
    }

    #[tokio::test]
    async fn test_poll_once_normalizes() {
        let (tx, _rx) = mpsc::unbounded_channel();
        let poller = PricePoller::new(steady_source(), price_query(), tx);
        let cards = poller.poll_once().await.unwrap();
        assert_eq!(cards[0].id, "bitcoin");
        assert!(cards[0].sparkline.is_empty());
    }
}
