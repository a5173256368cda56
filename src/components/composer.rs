// ABOUTME: Message composer with a block cursor when it holds focus

use ratatui::{
    prelude::*,
    style::{Color, Style},
    widgets::{Block, Borders, Paragraph},
};

use crate::app::state::{AppState, FocusedPane};

pub struct ComposerComponent;

impl ComposerComponent {
    pub fn new() -> Self {
        Self
    }

    pub fn render(&self, frame: &mut Frame, area: Rect, state: &AppState) {
        let focused = state.focused_pane == FocusedPane::Composer;
        let border_color = if focused { Color::Cyan } else { Color::Gray };

        let mut spans = vec![Span::raw(state.input.clone())];
        if focused && !state.busy() {
            spans.push(Span::styled("▏", Style::default().fg(Color::Cyan)));
        }

        let title = if state.busy() { "Message (waiting...)" } else { "Message" };
        let composer = Paragraph::new(Line::from(spans)).block(
            Block::default()
                .title(title)
                .borders(Borders::ALL)
                .border_style(Style::default().fg(border_color)),
        );
        frame.render_widget(composer, area);
    }
}

impl Default for ComposerComponent {
    fn default() -> Self {
        Self::new()
    }
}
