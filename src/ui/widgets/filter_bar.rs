//! Sentiment filter bar widget.

use ratatui::{
    style::{Color, Modifier, Style},
    text::{Line, Span},
};

use crate::market::Sentiment;

/// Marker in front of the active filter.
const ACTIVE_MARK: &str = "✓ ";

/// Colour for a sentiment.
pub fn sentiment_color(sentiment: Sentiment) -> Color {
    match sentiment {
        Sentiment::Hot => Color::Red,
        Sentiment::Medium => Color::Yellow,
        Sentiment::Cold => Color::Blue,
    }
}

/// Filter bar: `Hot | Medium | Cold` with the active entry marked.
pub struct FilterBar;

impl FilterBar {
    /// Button labels in bar order.
    pub fn labels(active: Sentiment) -> [String; 3] {
        Sentiment::ALL.map(|s| {
            if s == active {
                format!("{}{}", ACTIVE_MARK, s.label())
            } else {
                s.label().to_string()
            }
        })
    }

    /// The bar as a styled line.
    pub fn line(active: Sentiment) -> Line<'static> {
        let mut spans = Vec::with_capacity(5);
        for (i, (sentiment, label)) in Sentiment::ALL
            .into_iter()
            .zip(Self::labels(active))
            .enumerate()
        {
            if i > 0 {
                spans.push(Span::styled(" | ", Style::default().fg(Color::DarkGray)));
            }
            let style = if sentiment == active {
                Style::default()
                    .fg(Color::Black)
                    .bg(sentiment_color(sentiment))
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(sentiment_color(sentiment))
            };
            spans.push(Span::styled(format!(" {} ", label), style));
        }
        Line::from(spans)
    }
}
