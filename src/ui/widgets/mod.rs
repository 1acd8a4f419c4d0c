//! TUI widgets.

mod filter_bar;
mod help;
mod price_cards;
mod status_bar;
mod update_list;

pub use filter_bar::{FilterBar, sentiment_color};
pub use help::HelpPanel;
pub use price_cards::PriceCards;
pub use status_bar::StatusBar;
pub use update_list::UpdateList;
