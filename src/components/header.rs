// ABOUTME: Header bar showing the product name, API endpoint and active session

use ratatui::{
    prelude::*,
    style::{Color, Modifier, Style},
    widgets::{Block, Borders, Paragraph},
};

use crate::app::AppState;

pub struct HeaderComponent;

impl HeaderComponent {
    pub fn new() -> Self {
        Self
    }

    pub fn render(&self, frame: &mut Frame, area: Rect, state: &AppState) {
        let line = Line::from(vec![
            Span::styled(
                " Market Agent ",
                Style::default()
                    .fg(Color::Black)
                    .bg(Color::Cyan)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::raw(" conversation-first stock assistant"),
            Span::raw("  "),
            Span::styled(
                format!("session {}", state.short_active_id()),
                Style::default().fg(Color::Yellow),
            ),
            Span::raw("  "),
            Span::styled(state.api_base.clone(), Style::default().fg(Color::DarkGray)),
        ]);

        let header = Paragraph::new(line).block(Block::default().borders(Borders::ALL));
        frame.render_widget(header, area);
    }
}

impl Default for HeaderComponent {
    fn default() -> Self {
        Self::new()
    }
}
