//! Market update poller.

use super::{Control, PollerHandle, control_pair, fetch_with_deadline, stopped, ticker};
use crate::api::{DataConverter, MarketDataSource, MarketQuery};
use crate::config::Config;
use crate::error::Result;
use crate::market::{self, Sentiment};
use crate::state::{Action, NewsSnapshot};
use chrono::Utc;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, watch};
use tracing::{debug, info, warn};

/// Polls a larger page of coins, derives classified market updates and
/// publishes the ones matching the active filter.
///
/// Every cycle is tagged with a generation number. Changing the filter
/// starts a new cycle at once; a fetch still running for the previous
/// filter is dropped and its result never delivered.
pub struct NewsPoller {
    source: Arc<dyn MarketDataSource>,
    query: MarketQuery,
    detail_base_url: String,
    period: Duration,
    fetch_timeout: Duration,
    filter: Sentiment,
    action_tx: mpsc::UnboundedSender<Action>,
}

impl NewsPoller {
    /// Create a poller with a 120 second period and 30 second fetch timeout.
    pub fn new(
        source: Arc<dyn MarketDataSource>,
        query: MarketQuery,
        detail_base_url: impl Into<String>,
        action_tx: mpsc::UnboundedSender<Action>,
    ) -> Self {
        Self {
            source,
            query,
            detail_base_url: detail_base_url.into(),
            period: Duration::from_secs(120),
            fetch_timeout: Duration::from_secs(30),
            filter: Sentiment::default(),
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
            MarketQuery::news(&config.api, &config.polling),
            config.api.detail_base_url.clone(),
            action_tx,
        )
        .period(config.polling.news_interval())
        .fetch_timeout(config.polling.fetch_timeout())
        .filter(config.ui.default_filter)
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

    /// Set the initial filter.
    pub fn filter(mut self, filter: Sentiment) -> Self {
        self.filter = filter;
        self
    }

    /// Run one fetch-classify-filter cycle.
    pub async fn poll_once(&self, filter: Sentiment, generation: u64) -> Result<NewsSnapshot> {
        let records =
            fetch_with_deadline(self.source.as_ref(), &self.query, self.fetch_timeout).await?;
        let updates = DataConverter::market_updates(records, Utc::now(), &self.detail_base_url);

        let [(_, hot), (_, medium), (_, cold)] = market::filter::counts(&updates);
        debug!(generation, hot, medium, cold, "classified market updates");

        Ok(NewsSnapshot {
            generation,
            filter,
            updates: market::filter::by_sentiment(updates, filter),
        })
    }

    /// Start the poller task.
    pub fn spawn(self) -> NewsPollerHandle {
        let (shutdown_tx, control) = control_pair();
        let (filter_tx, filter_rx) = watch::channel(self.filter);
        let refresh = control.refresh.clone();
        let task = tokio::spawn(self.run(control, filter_rx));

        NewsPollerHandle {
            inner: PollerHandle::new("news", shutdown_tx, refresh, task),
            filter_tx,
        }
    }

    async fn run(self, control: Control, mut filter_rx: watch::Receiver<Sentiment>) {
        let Control {
            mut shutdown,
            refresh,
        } = control;
        let mut filter = *filter_rx.borrow_and_update();
        let mut generation = 0u64;
        let mut ticker = ticker(self.period);
        info!(period = ?self.period, %filter, "news poller started");

        'poll: loop {
            tokio::select! {
                biased;
                _ = stopped(&mut shutdown) => break,
                changed = filter_rx.changed() => {
                    if changed.is_err() {
                        break;
                    }
                    filter = *filter_rx.borrow_and_update();
                    ticker.reset();
                }
                _ = ticker.tick() => {}
                _ = refresh.notified() => ticker.reset(),
            }

            let outcome = loop {
                generation += 1;
                tokio::select! {
                    biased;
                    _ = stopped(&mut shutdown) => break 'poll,
                    changed = filter_rx.changed() => {
                        if changed.is_err() {
                            break 'poll;
                        }
                        filter = *filter_rx.borrow_and_update();
                        ticker.reset();
                        debug!(generation, %filter, "filter changed, dropping in-flight fetch");
                    }
                    outcome = self.poll_once(filter, generation) => break outcome,
                }
            };

            let action = match outcome {
                Ok(snapshot) => {
                    debug!(
                        generation,
                        %filter,
                        count = snapshot.updates.len(),
                        "news cycle complete"
                    );
                    Action::UpdatesLoaded(snapshot)
                }
                Err(e) => {
                    warn!(
                        generation,
                        %filter,
                        error = %e,
                        fetch_failure = e.is_fetch_failure(),
                        recoverable = e.is_recoverable(),
                        "news fetch failed"
                    );
                    Action::UpdatesFailed {
                        generation,
                        filter,
                        reason: e.to_string(),
                    }
                }
            };

            if self.action_tx.send(action).is_err() {
                debug!("action channel closed");
                break;
            }
        }

        info!("news poller stopped");
    }
}

/// Handle to a running [`NewsPoller`].
pub struct NewsPollerHandle {
    inner: PollerHandle,
    filter_tx: watch::Sender<Sentiment>,
}

impl NewsPollerHandle {
    /// Switch the active filter and start a new cycle for it.
    ///
    /// Returns false, and does nothing, if `filter` is already active.
    pub fn set_filter(&self, filter: Sentiment) -> bool {
        self.filter_tx.send_if_modified(|current| {
            if *current == filter {
                return false;
            }
            *current = filter;
            true
        })
    }

    /// Run a cycle now and restart the interval from here.
    ///
    /// A refresh while a fetch is in flight is absorbed by that fetch.
    pub fn refresh(&self) {
        self.inner.refresh();
    }

    /// Stop the schedule and wait for the task to exit.
    pub async fn stop(self) -> Result<()> {
        self.inner.stop().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{MockMarketDataSource, RawCoinRecord};
    use crate::error::Error;
    use crate::poller::test_support::{SlowSource, coin, news_query};
    use crate::state::Store;
    use pretty_assertions::assert_eq;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tokio::time::Instant;
    use tokio_test::assert_ok;

    const DETAIL_BASE: &str = "https://www.coingecko.com/en/coins";

    fn ranked() -> Vec<RawCoinRecord> {
        vec![
            coin("alpha", "Alpha", 12.34, 10.0),
            coin("beta", "Beta", -7.0, 20.0),
            coin("gamma", "Gamma", 0.5, 30.0),
            coin("delta", "Delta", 8.0, 40.0),
            coin("epsilon", "Epsilon", -5.0, 50.0),
        ]
    }

    fn steady_source() -> Arc<dyn MarketDataSource> {
        let mut source = MockMarketDataSource::new();
        source.expect_fetch_markets().returning(|_| Ok(ranked()));
        Arc::new(source)
    }

    fn poller(source: Arc<dyn MarketDataSource>, tx: mpsc::UnboundedSender<Action>) -> NewsPoller {
        NewsPoller::new(source, news_query(), DETAIL_BASE, tx)
    }

    fn ids(snapshot: &NewsSnapshot) -> Vec<&str> {
        snapshot.updates.iter().map(|u| u.id.as_str()).collect()
    }

    fn expect_snapshot(action: Action) -> NewsSnapshot {
        match action {
            Action::UpdatesLoaded(snapshot) => snapshot,
            other => panic!("expected UpdatesLoaded, got {:?}", other),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_first_cycle_filtered_in_rank_order() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let handle = poller(steady_source(), tx).spawn();

        let snapshot = expect_snapshot(rx.recv().await.unwrap());
        assert_eq!(snapshot.generation, 1);
        assert_eq!(snapshot.filter, Sentiment::Hot);
        assert_eq!(ids(&snapshot), vec!["alpha", "delta"]);
        assert_eq!(snapshot.updates[0].title, "Alpha surges 12.34% in 24 hours");

        assert_ok!(handle.stop().await);
    }

    #[tokio::test(start_paused = true)]
    async fn test_filter_change_refetches_immediately() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let handle = poller(steady_source(), tx).spawn();
        expect_snapshot(rx.recv().await.unwrap());

        tokio::time::sleep(Duration::from_secs(30)).await;
        let start = Instant::now();
        assert!(handle.set_filter(Sentiment::Cold));

        let snapshot = expect_snapshot(rx.recv().await.unwrap());
        assert_eq!(start.elapsed(), Duration::ZERO);
        assert_eq!(snapshot.filter, Sentiment::Cold);
        assert_eq!(snapshot.generation, 2);
        // -5.0 is not strictly below the threshold.
        assert_eq!(ids(&snapshot), vec!["beta"]);

        // The interval restarts from the filter change.
        let next = expect_snapshot(rx.recv().await.unwrap());
        assert_eq!(start.elapsed(), Duration::from_secs(120));
        assert_eq!(next.filter, Sentiment::Cold);

        assert_ok!(handle.stop().await);
    }

    #[tokio::test(start_paused = true)]
    async fn test_filter_change_drops_in_flight_fetch() {
        let source = Arc::new(SlowSource::new(Duration::from_secs(5), ranked()));
        let (tx, mut rx) = mpsc::unbounded_channel();
        let start = Instant::now();
        let handle = poller(source.clone(), tx).spawn();

        tokio::time::sleep(Duration::from_secs(1)).await;
        assert!(handle.set_filter(Sentiment::Medium));

        // The first action is the medium cycle; the hot fetch never reports.
        let snapshot = expect_snapshot(rx.recv().await.unwrap());
        assert_eq!(snapshot.filter, Sentiment::Medium);
        assert_eq!(snapshot.generation, 2);
        assert_eq!(ids(&snapshot), vec!["gamma", "epsilon"]);
        assert_eq!(start.elapsed(), Duration::from_secs(6));
        assert_eq!(source.calls(), 2);

        assert_ok!(handle.stop().await);
    }

    #[tokio::test(start_paused = true)]
    async fn test_refresh_runs_cycle_early() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let handle = poller(steady_source(), tx).spawn();
        expect_snapshot(rx.recv().await.unwrap());

        tokio::time::sleep(Duration::from_secs(10)).await;
        let start = Instant::now();
        handle.refresh();

        let snapshot = expect_snapshot(rx.recv().await.unwrap());
        assert_eq!(start.elapsed(), Duration::ZERO);
        assert_eq!(snapshot.generation, 2);

        expect_snapshot(rx.recv().await.unwrap());
        assert_eq!(start.elapsed(), Duration::from_secs(120));

        assert_ok!(handle.stop().await);
    }

    #[tokio::test(start_paused = true)]
    async fn test_refresh_during_fetch_merges_into_cycle() {
        let source = Arc::new(SlowSource::new(Duration::from_secs(5), ranked()));
        let (tx, mut rx) = mpsc::unbounded_channel();
        let start = Instant::now();
        let handle = poller(source.clone(), tx).spawn();

        tokio::time::sleep(Duration::from_secs(1)).await;
        handle.refresh();

        let first = expect_snapshot(rx.recv().await.unwrap());
        assert_eq!(first.generation, 1);
        assert_eq!(start.elapsed(), Duration::from_secs(5));

        let second = expect_snapshot(rx.recv().await.unwrap());
        assert_eq!(second.generation, 2);
        assert_eq!(start.elapsed(), Duration::from_secs(125));
        assert_eq!(source.calls(), 2);

        assert_ok!(handle.stop().await);
    }

    #[tokio::test(start_paused = true)]
    async fn test_same_filter_is_noop() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let handle = poller(steady_source(), tx).spawn();
        expect_snapshot(rx.recv().await.unwrap());

        let start = Instant::now();
        assert!(!handle.set_filter(Sentiment::Hot));

        // Next delivery is the scheduled one.
        expect_snapshot(rx.recv().await.unwrap());
        assert_eq!(start.elapsed(), Duration::from_secs(120));

        assert_ok!(handle.stop().await);
    }

    #[tokio::test(start_paused = true)]
    async fn test_failure_clears_updates() {
        let calls = AtomicUsize::new(0);
        let mut source = MockMarketDataSource::new();
        source.expect_fetch_markets().returning(move |_| {
            if calls.fetch_add(1, Ordering::SeqCst) == 0 {
                Ok(ranked())
            } else {
                Err(Error::RateLimited)
            }
        });

        let (tx, mut rx) = mpsc::unbounded_channel();
        let handle = poller(Arc::new(source), tx).spawn();

        let (store_tx, _store_rx) = mpsc::unbounded_channel();
        let mut store = Store::new(store_tx, Sentiment::Hot);

        store.reduce(rx.recv().await.unwrap());
        assert_eq!(store.updates.items.len(), 2);

        let failed = rx.recv().await.unwrap();
        assert!(matches!(
            failed,
            Action::UpdatesFailed { generation: 2, filter: Sentiment::Hot, .. }
        ));
        store.reduce(failed);
        assert!(store.updates.items.is_empty());
        assert!(!store.updates.loading);

        assert_ok!(handle.stop().await);
    }

    #[tokio::test(start_paused = true)]
    async fn test_stop_ends_schedule() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let handle = poller(steady_source(), tx).spawn();
        expect_snapshot(rx.recv().await.unwrap());

        assert_ok!(handle.stop().await);
        assert!(rx.recv().await.is_none());
    }

    #[tokio::test]
    async fn test_poll_once_uses_given_filter_and_generation() {
        let (tx, _rx) = mpsc::unbounded_channel();
        let snapshot = poller(steady_source(), tx)
            .poll_once(Sentiment::Cold, 7)
            .await
            .unwrap();
        assert_eq!(snapshot.generation, 7);
        assert_eq!(ids(&snapshot), vec!["beta"]);
        assert!(snapshot.updates.iter().all(|u| u.source_name == "CoinGecko"));
    }

    #[test]
    fn test_from_config_uses_default_filter() {
        let (tx, _rx) = mpsc::unbounded_channel();
        let mut config = Config::default();
        config.ui.default_filter = Sentiment::Cold;
        config.polling.news_interval_secs = 300;

        let poller = NewsPoller::from_config(steady_source(), &config, tx);
        assert_eq!(poller.filter, Sentiment::Cold);
        assert_eq!(poller.period, Duration::from_secs(300));
        assert_eq!(poller.query.per_page, 100);
    }
}
