//! Main application module.
//!
//! This module contains the main `App` struct that coordinates
//! the event loop, the pollers, state management, and rendering.

use crate::api::{CoinGeckoClient, MarketDataSource};
use crate::config::Config;
use crate::error::Result;
use crate::events::{EventHandler, Keymap};
use crate::poller::{NewsPoller, NewsPollerHandle, PollerHandle, PricePoller};
use crate::state::{Action, Store};
use crate::ui::Ui;

use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::CrosstermBackend};
use std::io::{self, Stdout};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::{info, warn};

/// The main application.
pub struct App {
    /// Terminal.
    terminal: Terminal<CrosstermBackend<Stdout>>,
    /// Application store.
    store: Store,
    /// Event handler.
    event_handler: EventHandler,
    /// Action sender handed to the pollers; the store holds a clone.
    action_tx: mpsc::UnboundedSender<Action>,
    /// Action receiver.
    action_rx: mpsc::UnboundedReceiver<Action>,
    /// Market data source shared by both pollers.
    source: Arc<dyn MarketDataSource>,
    /// Running price poller.
    prices: Option<PollerHandle>,
    /// Running news poller.
    news: Option<NewsPollerHandle>,
    /// Configuration.
    config: Config,
}

impl App {
    /// Create a new application backed by the CoinGecko API.
    pub async fn new(config: Config) -> Result<Self> {
        let client = CoinGeckoClient::builder()
            .config(config.api.clone())
            .timeout(config.polling.fetch_timeout())
            .build()?;
        Self::with_source(config, Arc::new(client)).await
    }

    /// Create a new application reading from the given source.
    pub async fn with_source(config: Config, source: Arc<dyn MarketDataSource>) -> Result<Self> {
        let keymap = Keymap::try_from(&config.keybindings)?;

        // Set up terminal
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
        let backend = CrosstermBackend::new(stdout);
        let terminal = Terminal::new(backend)?;

        // Create action channel
        let (action_tx, action_rx) = mpsc::unbounded_channel();

        let store = Store::new(action_tx.clone(), config.ui.default_filter);

        Ok(Self {
            terminal,
            store,
            event_handler: EventHandler::new(keymap),
            action_tx,
            action_rx,
            source,
            prices: None,
            news: None,
            config,
        })
    }

    /// Run the application event loop until the user quits.
    pub async fn run(&mut self) -> Result<()> {
        self.start_pollers();

        let mut redraw =
            tokio::time::interval(Duration::from_millis(self.config.ui.tick_rate_ms.max(1)));
        redraw.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

        let result = self.event_loop(&mut redraw).await;
        self.stop_pollers().await;
        result
    }

    async fn event_loop(&mut self, redraw: &mut tokio::time::Interval) -> Result<()> {
        loop {
            // Render UI
            self.terminal.draw(|frame| {
                Ui::render(frame, &self.store, self.event_handler.keymap());
            })?;

            tokio::select! {
                // Handle terminal events
                event = self.event_handler.next() => {
                    match event? {
                        Some(event) => {
                            if let Some(action) = self.event_handler.handle(&event) {
                                self.store.dispatch(action)?;
                            }
                        }
                        None => self.store.dispatch(Action::Quit)?,
                    }
                }

                // Handle dispatched input and poller actions
                Some(action) = self.action_rx.recv() => {
                    self.handle_action(action);
                }

                _ = redraw.tick() => {}
            }

            // Check if we should quit
            if self.store.app.should_quit {
                return Ok(());
            }
        }
    }

    /// Handle an action.
    fn handle_action(&mut self, action: Action) {
        match action {
            Action::RefreshAll => {
                info!("manual refresh");
                if let Some(prices) = &self.prices {
                    prices.refresh();
                }
                if let Some(news) = &self.news {
                    news.refresh();
                }
            }
            Action::SetFilter(_) | Action::NextFilter | Action::PrevFilter => {
                self.store.reduce(action);
                let filter = self.store.updates.filter;
                if let Some(news) = &self.news
                    && news.set_filter(filter)
                {
                    info!(%filter, "filter changed");
                }
            }
            _ => {
                // Let the store handle the action
                self.store.reduce(action);
            }
        }
    }

    fn start_pollers(&mut self) {
        self.prices = Some(
            PricePoller::from_config(self.source.clone(), &self.config, self.action_tx.clone())
                .spawn(),
        );
        self.news = Some(
            NewsPoller::from_config(self.source.clone(), &self.config, self.action_tx.clone())
                .filter(self.store.updates.filter)
                .spawn(),
        );
    }

    async fn stop_pollers(&mut self) {
        if let Some(prices) = self.prices.take()
            && let Err(e) = prices.stop().await
        {
            warn!(error = %e, "price poller did not stop cleanly");
        }
        if let Some(news) = self.news.take()
            && let Err(e) = news.stop().await
        {
            warn!(error = %e, "news poller did not stop cleanly");
        }
    }
}

impl Drop for App {
    fn drop(&mut self) {
        // Restore terminal state
        let _ = disable_raw_mode();
        let _ = execute!(
            self.terminal.backend_mut(),
            LeaveAlternateScreen,
            DisableMouseCapture
        );
        let _ = self.terminal.show_cursor();
    }
}
