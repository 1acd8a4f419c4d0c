//! Price card pane.

use std::ops::Range;

use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    symbols::Marker,
    text::{Line, Span},
    widgets::{Axis, Block, Borders, Chart, Dataset, GraphType, Paragraph},
};

use crate::format;
use crate::market::chart;
use crate::state::{Pane, PriceCard, Store};

/// Rows per card: borders, three text lines and the chart.
const CARD_HEIGHT: u16 = 10;
const TEXT_LINES: u16 = 3;

const LOADING_TEXT: &str = "Loading crypto prices...";

/// Price card pane widget.
pub struct PriceCards;

impl PriceCards {
    /// Render the price pane.
    pub fn render(frame: &mut Frame, area: Rect, store: &Store) {
        let focused = store.app.focus == Pane::Prices;
        let block = Block::default()
            .title(" Prices ")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(if focused { Color::Cyan } else { Color::DarkGray }));
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let prices = &store.prices;
        if store.loading() {
            let loading = Paragraph::new(Span::styled(
                LOADING_TEXT,
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::ITALIC),
            ));
            frame.render_widget(loading, inner);
            return;
        }

        let visible = (inner.height / CARD_HEIGHT).max(1) as usize;
        let range = visible_range(prices.selected_index, prices.cards.len(), visible);

        for (slot, index) in range.enumerate() {
            let y = inner.y + slot as u16 * CARD_HEIGHT;
            if y >= inner.bottom() {
                break;
            }
            let card_area = Rect {
                x: inner.x,
                y,
                width: inner.width,
                height: CARD_HEIGHT.min(inner.bottom() - y),
            };
            let selected = focused && prices.selected_index == Some(index);
            render_card(frame, card_area, &prices.cards[index], selected);
        }
    }
}

/// Indices of the cards to draw so the selected card stays on screen.
fn visible_range(selected: Option<usize>, len: usize, visible: usize) -> Range<usize> {
    let start = selected
        .map(|i| i.saturating_sub(visible.saturating_sub(1)))
        .unwrap_or(0)
        .min(len);
    start..(start + visible).min(len)
}

fn change_color(card: &PriceCard) -> Color {
    match card.change_percent_24h {
        Some(c) if c > 0.0 => Color::Green,
        Some(c) if c < 0.0 => Color::Red,
        _ => Color::Gray,
    }
}

fn card_lines(card: &PriceCard) -> Vec<Line<'static>> {
    let label = Style::default().fg(Color::DarkGray);
    vec![
        Line::from(vec![
            Span::styled(
                format::usd(card.current_price),
                Style::default()
                    .fg(Color::Green)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::raw("  "),
            Span::styled(
                format::signed_percent(card.change_percent_24h),
                Style::default().fg(change_color(card)),
            ),
        ]),
        Line::from(vec![
            Span::styled("Cap ", label),
            Span::raw(format::usd_grouped(card.market_cap)),
            Span::styled("  Vol ", label),
            Span::raw(format::usd_grouped(card.volume_24h)),
        ]),
        Line::from(vec![
            Span::styled("24h H ", label),
            Span::raw(format::usd(card.high_24h)),
            Span::styled("  L ", label),
            Span::raw(format::usd(card.low_24h)),
        ]),
    ]
}

fn render_card(frame: &mut Frame, area: Rect, card: &PriceCard, selected: bool) {
    let border = if selected {
        Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::DarkGray)
    };
    let block = Block::default()
        .title(Span::styled(
            format!(" {} ", card.name),
            Style::default().add_modifier(Modifier::BOLD),
        ))
        .borders(Borders::ALL)
        .border_style(border);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let parts = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(TEXT_LINES), Constraint::Min(0)])
        .split(inner);

    frame.render_widget(Paragraph::new(card_lines(card)), parts[0]);

    let Some(y_bounds) = chart::y_bounds(&card.sparkline) else {
        return;
    };
    if parts[1].height == 0 {
        return;
    }

    let points = chart::sparkline_series(&card.sparkline);
    let dataset = Dataset::default()
        .name(chart::series_label(&card.name))
        .marker(Marker::Braille)
        .graph_type(GraphType::Line)
        .style(Style::default().fg(change_color(card)))
        .data(&points);

    let chart = Chart::new(vec![dataset])
        .x_axis(Axis::default().bounds(chart::x_bounds(card.sparkline.len())))
        .y_axis(Axis::default().bounds(y_bounds));

    frame.render_widget(chart, parts[1]);
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn card(change: Option<f64>) -> PriceCard {
        PriceCard {
            id: "bitcoin".to_string(),
            name: "Bitcoin".to_string(),
            icon_url: None,
            current_price: 67000.0,
            high_24h: 68000.0,
            low_24h: 66000.5,
            volume_24h: 25_331_187_764.0,
            market_cap: 1_322_844_946_853.0,
            change_percent_24h: change,
            sparkline: vec![1.0, 2.0],
        }
    }

    fn text(line: &Line) -> String {
        line.spans.iter().map(|s| s.content.as_ref()).collect()
    }

    #[test]
    fn test_visible_range_follows_selection() {
        assert_eq!(visible_range(None, 10, 3), 0..3);
        assert_eq!(visible_range(Some(1), 10, 3), 0..3);
        assert_eq!(visible_range(Some(5), 10, 3), 3..6);
        assert_eq!(visible_range(Some(9), 10, 3), 7..10);
        assert_eq!(visible_range(None, 2, 3), 0..2);
        assert_eq!(visible_range(None, 0, 3), 0..0);
    }

    #[test]
    fn test_card_lines() {
        let lines = card_lines(&card(Some(1.5)));
        assert_eq!(text(&lines[0]), "$67000.00  +1.50%");
        assert_eq!(text(&lines[1]), "Cap $1,322,844,946,853  Vol $25,331,187,764");
        assert_eq!(text(&lines[2]), "24h H $68000.00  L $66000.50");
    }

    #[test]
    fn test_change_colors() {
        assert_eq!(change_color(&card(Some(1.5))), Color::Green);
        assert_eq!(change_color(&card(Some(-0.1))), Color::Red);
        assert_eq!(change_color(&card(None)), Color::Gray);
    }
}
