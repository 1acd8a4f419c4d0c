//! Status bar widget.

use chrono::{DateTime, Local, Utc};
use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
};

use crate::state::{Pane, Store};

/// Status bar widget.
pub struct StatusBar;

impl StatusBar {
    /// Render the status bar.
    pub fn render(frame: &mut Frame, area: Rect, store: &Store) {
        let prices = if store.prices.is_stale() {
            Span::styled(
                format!(
                    "Prices {} (stale, {} failed)",
                    clock(store.prices.last_updated),
                    store.prices.failed_cycles
                ),
                Style::default().fg(Color::Yellow),
            )
        } else {
            Span::raw(format!("Prices {}", clock(store.prices.last_updated)))
        };

        let updates = Span::raw(format!("Updates {}", clock(store.updates.last_updated)));

        let focus = match store.app.focus {
            Pane::Prices => "prices",
            Pane::Updates => "updates",
        };

        let help_hint = Span::styled(" Press ? for help ", Style::default().fg(Color::Gray));

        let left_content = vec![
            Span::styled(
                " coinpulse ",
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::raw(" | "),
            prices,
            Span::raw(" | "),
            updates,
            Span::raw(" | "),
            Span::styled(format!("focus: {}", focus), Style::default().fg(Color::Yellow)),
        ];

        // Calculate padding for right-aligned help hint
        let left_len: usize = left_content.iter().map(|s| s.width()).sum();
        let padding = (area.width as usize).saturating_sub(left_len + help_hint.width());

        let mut full_line = left_content;
        full_line.push(Span::raw(" ".repeat(padding)));
        full_line.push(help_hint);

        let paragraph =
            Paragraph::new(Line::from(full_line)).style(Style::default().bg(Color::DarkGray));

        frame.render_widget(paragraph, area);
    }
}

/// Local wall-clock time of an update, or `--:--:--` before the first one.
fn clock(at: Option<DateTime<Utc>>) -> String {
    at.map(|t| t.with_timezone(&Local).format("%H:%M:%S").to_string())
        .unwrap_or_else(|| "--:--:--".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clock_placeholder() {
        assert_eq!(clock(None), "--:--:--");
        assert_eq!(clock(Some(Utc::now())).len(), 8);
    }
}
