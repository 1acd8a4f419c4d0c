//! Market update pane.

use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph, Wrap},
};

use super::filter_bar::{FilterBar, sentiment_color};
use crate::state::{MarketUpdate, Pane, Store};

const TITLE: &str = "Crypto Market Updates";
const FILTER_HINT: &str = "Filter by price movement:";
const EMPTY_TEXT: &str =
    "No updates available for this filter. Try a different filter or check back soon.";
const LOADING_TEXT: &str = "Loading market updates...";

/// Market update pane widget.
pub struct UpdateList;

impl UpdateList {
    /// Render the title, hint and filter bar.
    pub fn render_header(frame: &mut Frame, area: Rect, store: &Store) {
        let lines = vec![
            Line::from(Span::styled(
                TITLE,
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD),
            )),
            Line::from(Span::styled(FILTER_HINT, Style::default().fg(Color::Gray))),
            FilterBar::line(store.updates.filter),
        ];
        let header = Paragraph::new(lines).block(Block::default().borders(Borders::ALL));
        frame.render_widget(header, area);
    }

    /// Render the update cards for the active filter.
    pub fn render(frame: &mut Frame, area: Rect, store: &Store) {
        let updates = &store.updates;
        let focused = store.app.focus == Pane::Updates;
        let block = Block::default()
            .title(format!(" {} ({}) ", updates.filter.label(), updates.items.len()))
            .borders(Borders::ALL)
            .border_style(Style::default().fg(if focused { Color::Cyan } else { Color::DarkGray }));

        if updates.loading || updates.items.is_empty() {
            let (text, style) = if updates.loading {
                (LOADING_TEXT, Style::default().fg(Color::Yellow).add_modifier(Modifier::ITALIC))
            } else {
                (EMPTY_TEXT, Style::default().fg(Color::Gray))
            };
            let paragraph = Paragraph::new(Span::styled(text, style))
                .block(block)
                .wrap(Wrap { trim: true });
            frame.render_widget(paragraph, area);
            return;
        }

        let width = area.width.saturating_sub(4) as usize;
        let items: Vec<ListItem> = updates
            .items
            .iter()
            .map(|update| ListItem::new(update_lines(update, width)))
            .collect();

        let list = List::new(items)
            .block(block)
            .highlight_style(Style::default().bg(Color::DarkGray))
            .highlight_symbol("▶ ");

        let mut state = ListState::default();
        if focused {
            state.select(updates.selected_index);
        }

        frame.render_stateful_widget(list, area, &mut state);
    }
}

fn update_lines(update: &MarketUpdate, width: usize) -> Vec<Line<'static>> {
    let color = sentiment_color(update.sentiment);
    vec![
        Line::from(vec![
            Span::styled(
                format!("[{}] ", update.sentiment.label().to_uppercase()),
                Style::default().fg(color).add_modifier(Modifier::BOLD),
            ),
            Span::styled(
                update.title.clone(),
                Style::default().add_modifier(Modifier::BOLD),
            ),
        ]),
        Line::from(truncate(&update.description, width)),
        Line::from(vec![
            Span::styled(
                format!("Source: {}", update.source_name),
                Style::default().fg(Color::DarkGray),
            ),
            Span::raw("  "),
            Span::styled(
                update.detail_url.clone(),
                Style::default()
                    .fg(Color::Blue)
                    .add_modifier(Modifier::UNDERLINED),
            ),
        ]),
        Line::from(""),
    ]
}

fn truncate(s: &str, max_chars: usize) -> String {
    if s.chars().count() <= max_chars || max_chars < 4 {
        return s.to_string();
    }
    let kept: String = s.chars().take(max_chars - 3).collect();
    format!("{}...", kept)
}
