//! Help panel widget.

use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
};

use super::super::layout::centered_rect;
use crate::events::Keymap;
use crate::market::Sentiment;

/// Help panel showing the active keybindings.
pub struct HelpPanel;

impl HelpPanel {
    /// Render the help panel.
    pub fn render(frame: &mut Frame, area: Rect, keymap: &Keymap) {
        let popup_area = centered_rect(60, 70, area);

        // Clear the area behind the popup
        frame.render_widget(Clear, popup_area);

        let help = Paragraph::new(help_lines(keymap))
            .block(
                Block::default()
                    .title(" Help ")
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(Color::Yellow)),
            )
            .style(Style::default().fg(Color::White));

        frame.render_widget(help, popup_area);
    }
}

fn filter_row(keymap: &Keymap, sentiment: Sentiment, description: &str) -> (String, String) {
    let key = keymap
        .filter_key(sentiment)
        .map(|binding| binding.to_string())
        .unwrap_or_default();
    (key, description.to_string())
}

fn sections(keymap: &Keymap) -> Vec<(&'static str, Vec<(String, String)>)> {
    let row = |key: String, description: &str| (key, description.to_string());
    vec![
        (
            "Navigation",
            vec![
                row(format!("{}/↓", keymap.down), "Move down"),
                row(format!("{}/↑", keymap.up), "Move up"),
                row("g/Home".to_string(), "Go to top"),
                row("G/End".to_string(), "Go to bottom"),
                row(keymap.focus.to_string(), "Switch between prices and updates"),
            ],
        ),
        (
            "Filters",
            vec![
                filter_row(keymap, Sentiment::Hot, "Hot: up more than 5%"),
                filter_row(keymap, Sentiment::Medium, "Medium: within ±5%"),
                filter_row(keymap, Sentiment::Cold, "Cold: down more than 5%"),
                row(
                    format!("{}/{}", keymap.prev_filter, keymap.next_filter),
                    "Previous/next filter",
                ),
            ],
        ),
        (
            "Actions",
            vec![
                row(keymap.refresh.to_string(), "Refresh prices and updates"),
                row(keymap.help.to_string(), "Toggle help"),
                row(format!("{}/Esc", keymap.quit), "Quit"),
            ],
        ),
    ]
}

fn help_lines(keymap: &Keymap) -> Vec<Line<'static>> {
    let mut lines = Vec::new();
    for (i, (heading, keys)) in sections(keymap).into_iter().enumerate() {
        if i > 0 {
            lines.push(Line::from(""));
        }
        lines.push(Line::from(Span::styled(
            heading,
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        )));
        lines.push(Line::from(""));
        for (key, description) in keys {
            lines.push(Line::from(vec![
                Span::styled(format!("  {:<10}", key), Style::default().fg(Color::Cyan)),
                Span::raw(description),
            ]));
        }
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::KeyBindings;

    fn text(lines: &[Line]) -> String {
        lines
            .iter()
            .map(|line| line.spans.iter().map(|s| s.content.as_ref()).collect::<String>())
            .collect::<Vec<_>>()
            .join("\n")
    }

    #[test]
    fn test_default_bindings_listed() {
        let help = text(&help_lines(&Keymap::default()));
        assert!(help.contains("  j/↓       Move down"));
        assert!(help.contains("  1         Hot: up more than 5%"));
        assert!(help.contains("  h/l       Previous/next filter"));
        assert!(help.contains("  q/Esc     Quit"));
    }

    #[test]
    fn test_rebound_keys_shown() {
        let bindings = KeyBindings {
            refresh: "Ctrl+r".to_string(),
            filter_cold: "c".to_string(),
            ..KeyBindings::default()
        };
        let keymap = Keymap::try_from(&bindings).unwrap();
        let help = text(&help_lines(&keymap));
        assert!(help.contains("  Ctrl+r    Refresh prices and updates"));
        assert!(help.contains("  c         Cold: down more than 5%"));
        assert!(!help.contains("  r         Refresh"));
    }
}
