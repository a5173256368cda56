// ABOUTME: Scrollable conversation view, pinned to the newest message
// Assistant stock reports arrive as one line and are re-broken into labeled lines

use ratatui::{
    prelude::*,
    style::{Color, Modifier, Style},
    widgets::{Block, Borders, Paragraph, Wrap},
};
use regex::Regex;

use crate::app::AppState;
use crate::models::Role;

/// Re-formats one-line stock reports from the agent: each report label starts
/// a new line and news items become their own bullets. Anything that does not
/// look like a report passes through untouched.
pub struct ReportFormatter {
    report_labels: Regex,
    label_breaks: Regex,
    news_bullet: Regex,
    dash_bullet: Regex,
}

impl ReportFormatter {
    pub fn new() -> Self {
        Self {
            report_labels: Regex::new(r"Symbol:|As of:|Price:|Trend:|News:")
                .expect("valid report label pattern"),
            label_breaks: Regex::new(r"\s+(As of:|Price:|Trend:|News:)")
                .expect("valid label break pattern"),
            news_bullet: Regex::new(r"News:\s*-\s*").expect("valid news bullet pattern"),
            dash_bullet: Regex::new(r"\s+-\s+").expect("valid dash bullet pattern"),
        }
    }

    pub fn format_assistant_content(&self, text: &str) -> String {
        if text.is_empty() || !self.report_labels.is_match(text) {
            return text.to_string();
        }
        let out = text.trim();
        let out = self.label_breaks.replace_all(out, "\n$1");
        let out = self.news_bullet.replace_all(&out, "News:\n- ");
        let out = self.dash_bullet.replace_all(&out, "\n- ");
        out.into_owned()
    }
}

impl Default for ReportFormatter {
    fn default() -> Self {
        Self::new()
    }
}

pub struct MessageListComponent {
    formatter: ReportFormatter,
}

impl MessageListComponent {
    pub fn new() -> Self {
        Self {
            formatter: ReportFormatter::new(),
        }
    }

    pub fn render(&self, frame: &mut Frame, area: Rect, state: &AppState) {
        let mut lines: Vec<Line> = Vec::new();
        for message in &state.messages {
            let (name_color, name) = match message.role {
                Role::User => (Color::Green, message.role.display_name()),
                Role::Assistant => (Color::Cyan, message.role.display_name()),
            };
            lines.push(Line::from(Span::styled(
                name,
                Style::default().fg(name_color).add_modifier(Modifier::BOLD),
            )));
            let display = match message.role {
                Role::Assistant => self.formatter.format_assistant_content(&message.content),
                Role::User => message.content.clone(),
            };
            for content_line in display.lines() {
                lines.push(Line::from(format!("  {content_line}")));
            }
            if display.is_empty() {
                lines.push(Line::from("  "));
            }
            lines.push(Line::from(""));
        }

        if state.loading_history {
            lines.push(Line::from(Span::styled(
                "Loading history...",
                Style::default().fg(Color::DarkGray),
            )));
        } else if state.sending {
            lines.push(Line::from(Span::styled(
                "Agent is thinking...",
                Style::default().fg(Color::DarkGray),
            )));
        } else if state.messages.is_empty() {
            lines.push(Line::from(Span::styled(
                "Ask about a ticker, an earnings report, or the market at large.",
                Style::default().fg(Color::DarkGray),
            )));
        }

        let inner_width = area.width.saturating_sub(2).max(1);
        let inner_height = area.height.saturating_sub(2);
        let scroll = Self::bottom_scroll(&lines, inner_width, inner_height);

        let paragraph = Paragraph::new(lines)
            .block(Block::default().title("Conversation").borders(Borders::ALL))
            .wrap(Wrap { trim: false })
            .scroll((scroll, 0));
        frame.render_widget(paragraph, area);
    }

    /// Offset that keeps the last wrapped line visible.
    fn bottom_scroll(lines: &[Line], width: u16, height: u16) -> u16 {
        let total: usize = lines
            .iter()
            .map(|line| {
                let text: String = line
                    .spans
                    .iter()
                    .map(|span| span.content.as_ref())
                    .collect();
                Self::wrapped_rows(&text, width as usize)
            })
            .sum();
        total.saturating_sub(height as usize).min(u16::MAX as usize) as u16
    }

    /// Greedy word wrap matching the widget: break at spaces, split tokens
    /// wider than the view across rows.
    fn wrapped_rows(text: &str, width: usize) -> usize {
        let width = width.max(1);
        let mut rows = 1usize;
        let mut used = 0usize;
        for word in text.split(' ') {
            let mut len = word.chars().count();
            if len > width {
                if used > 0 {
                    rows += 1;
                }
                rows += (len - 1) / width;
                len %= width;
                if len == 0 {
                    len = width;
                }
                used = len;
                continue;
            }
            let needed = if used == 0 { len } else { len + 1 };
            if used + needed <= width {
                used += needed;
            } else {
                rows += 1;
                used = len;
            }
        }
        rows
    }
}

impl Default for MessageListComponent {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn stock_report_breaks_into_labeled_lines() {
        let formatter = ReportFormatter::new();
        let reply = "Symbol: NVDA As of: 2026-08-25 Price: 181.2 Trend: up \
                     News: - beat earnings - raised guidance";
        let formatted = formatter.format_assistant_content(reply);
        let lines: Vec<&str> = formatted.lines().collect();
        assert_eq!(
            lines,
            vec![
                "Symbol: NVDA",
                "As of: 2026-08-25",
                "Price: 181.2",
                "Trend: up",
                "News:",
                "- beat earnings",
                "- raised guidance",
            ]
        );
    }

    #[test]
    fn prose_without_report_labels_passes_through() {
        let formatter = ReportFormatter::new();
        let reply = "The market shrugged off the rate decision - volume was light.";
        assert_eq!(formatter.format_assistant_content(reply), reply);
        assert_eq!(formatter.format_assistant_content(""), "");
    }

    #[test]
    fn report_without_news_keeps_other_breaks() {
        let formatter = ReportFormatter::new();
        let reply = "Symbol: AAPL Price: 232.1 Trend: flat";
        assert_eq!(
            formatter.format_assistant_content(reply),
            "Symbol: AAPL\nPrice: 232.1\nTrend: flat"
        );
    }

    #[test]
    fn wrapped_rows_counts_word_boundaries() {
        assert_eq!(MessageListComponent::wrapped_rows("", 10), 1);
        assert_eq!(MessageListComponent::wrapped_rows("hello world", 11), 1);
        assert_eq!(MessageListComponent::wrapped_rows("hello world", 5), 2);
        // Word wrap needs more rows than the character count suggests.
        assert_eq!(
            MessageListComponent::wrapped_rows("aaaaaa bbbbbb cccccc dddddd", 10),
            4
        );
    }

    #[test]
    fn wrapped_rows_splits_oversized_tokens() {
        assert_eq!(MessageListComponent::wrapped_rows("abcdefghij", 4), 3);
        assert_eq!(MessageListComponent::wrapped_rows("ab cdefghijkl", 4), 4);
    }
}
