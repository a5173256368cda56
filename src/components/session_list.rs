// ABOUTME: Sidebar component listing sessions most recently used first

use chrono::Utc;
use ratatui::{
    prelude::*,
    style::{Color, Modifier, Style},
    widgets::{Block, Borders, List, ListItem, ListState},
};

use crate::app::state::{AppState, FocusedPane};

pub struct SessionListComponent {
    list_state: ListState,
}

impl Default for SessionListComponent {
    fn default() -> Self {
        let mut list_state = ListState::default();
        list_state.select(Some(0));
        Self { list_state }
    }
}

impl SessionListComponent {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn render(&mut self, frame: &mut Frame, area: Rect, state: &AppState) {
        self.list_state.select(state.selected_session_index);

        let now = Utc::now().timestamp_millis();
        let items: Vec<ListItem> = state
            .sessions
            .iter()
            .map(|record| {
                let is_active = record.id == state.active_session_id;
                let marker = if is_active { "● " } else { "  " };
                let style = if is_active {
                    Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)
                } else {
                    Style::default().fg(Color::White)
                };
                let line = Line::from(vec![
                    Span::styled(format!("{marker}{}", record.label), style),
                    Span::styled(
                        format!("  {}", record.last_used_label(now)),
                        Style::default().fg(Color::DarkGray),
                    ),
                ]);
                ListItem::new(line)
            })
            .collect();

        let (border_color, title_color) = match state.focused_pane {
            FocusedPane::Sessions => (Color::Cyan, Color::Yellow),
            FocusedPane::Composer => (Color::Gray, Color::Blue),
        };

        let list = List::new(items)
            .block(
                Block::default()
                    .title("Sessions")
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(border_color))
                    .title_style(Style::default().fg(title_color)),
            )
            .highlight_style(
                Style::default()
                    .bg(Color::DarkGray)
                    .add_modifier(Modifier::BOLD),
            )
            .highlight_symbol("▶ ");

        frame.render_stateful_widget(list, area, &mut self.list_state);
    }
}
