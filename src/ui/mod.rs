//! UI rendering using ratatui.
//!
//! This module contains all TUI components and rendering logic. Rendering
//! only reads the [`Store`]; it never changes state.

mod layout;
mod widgets;

pub use layout::Layout;
pub use widgets::{FilterBar, HelpPanel, PriceCards, StatusBar, UpdateList, sentiment_color};

use crate::events::Keymap;
use crate::state::Store;
use ratatui::Frame;

/// Main UI renderer.
pub struct Ui;

impl Ui {
    /// Render the entire UI; the help panel lists `keymap`'s bindings.
    pub fn render(frame: &mut Frame, store: &Store, keymap: &Keymap) {
        let layout = Layout::new(frame.area());

        PriceCards::render(frame, layout.prices_area, store);
        UpdateList::render_header(frame, layout.updates_header_area, store);
        UpdateList::render(frame, layout.updates_area, store);
        StatusBar::render(frame, layout.status_area, store);

        // Render help panel if visible
        if store.app.show_help {
            HelpPanel::render(frame, frame.area(), keymap);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::market::Sentiment;
    use crate::state::{Action, MarketUpdate, NewsSnapshot, PriceCard};
    use chrono::Utc;
    use ratatui::{Terminal, backend::TestBackend};
    use tokio::sync::mpsc;

    fn store() -> Store {
        let (tx, _rx) = mpsc::unbounded_channel();
        Store::new(tx, Sentiment::Hot)
    }

    fn draw(store: &Store) -> String {
        let mut terminal = Terminal::new(TestBackend::new(180, 48)).unwrap();
        terminal
            .draw(|frame| Ui::render(frame, store, &Keymap::default()))
            .unwrap();
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|cell| cell.symbol())
            .collect()
    }

    fn bitcoin() -> PriceCard {
        PriceCard {
            id: "bitcoin".to_string(),
            name: "Bitcoin".to_string(),
            icon_url: None,
            current_price: 67000.0,
            high_24h: 68000.0,
            low_24h: 66000.0,
            volume_24h: 1000.0,
            market_cap: 2000.0,
            change_percent_24h: Some(-2.5),
            sparkline: vec![66000.0, 66500.0, 67200.0, 67000.0],
        }
    }

    #[test]
    fn test_first_frame_is_loading() {
        let screen = draw(&store());
        assert!(screen.contains("Loading crypto prices..."));
        assert!(screen.contains("Crypto Market Updates"));
        assert!(screen.contains("Filter by price movement:"));
        assert!(screen.contains("✓ Hot"));
    }

    #[test]
    fn test_price_card_rendered() {
        let mut store = store();
        store.reduce(Action::PricesLoaded(vec![bitcoin()]));
        let screen = draw(&store);
        assert!(!screen.contains("Loading crypto prices..."));
        assert!(screen.contains("Bitcoin"));
        assert!(screen.contains("$67000.00"));
        assert!(screen.contains("-2.50%"));
    }

    #[test]
    fn test_empty_filter_message() {
        let mut store = store();
        store.reduce(Action::SetFilter(Sentiment::Cold));
        store.reduce(Action::UpdatesLoaded(NewsSnapshot {
            generation: 1,
            filter: Sentiment::Cold,
            updates: Vec::new(),
        }));
        let screen = draw(&store);
        assert!(screen.contains("No updates available for this filter."));
        assert!(screen.contains("✓ Cold"));
    }

    #[test]
    fn test_update_cards_rendered() {
        let mut store = store();
        store.reduce(Action::UpdatesLoaded(NewsSnapshot {
            generation: 1,
            filter: Sentiment::Hot,
            updates: vec![MarketUpdate {
                id: "coin-a".to_string(),
                title: "Coin A surges 12.34% in 24 hours".to_string(),
                sentiment: Sentiment::Hot,
                image_url: None,
                source_name: "CoinGecko".to_string(),
                description: "Current price: $100. Market Cap: $1,000. 24h Volume: $10"
                    .to_string(),
                detail_url: "https://www.coingecko.com/en/coins/coin-a".to_string(),
                observed_at: Utc::now(),
            }],
        }));
        let screen = draw(&store);
        assert!(screen.contains("Coin A surges 12.34% in 24 hours"));
        assert!(screen.contains("Source: CoinGecko"));
    }

    #[test]
    fn test_help_overlay() {
        let mut store = store();
        store.reduce(Action::ToggleHelp);
        let screen = draw(&store);
        assert!(screen.contains("Toggle help"));
        assert!(screen.contains("q/Esc"));
    }
}
