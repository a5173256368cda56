// ABOUTME: Main layout component arranging header, sidebar, conversation and menu bar

use ratatui::{
    prelude::*,
    style::{Color, Style},
    widgets::{Block, Borders, Paragraph},
};

use crate::app::state::{AppState, FocusedPane};

use super::{
    ComposerComponent, HeaderComponent, MessageListComponent, SessionListComponent,
};

pub struct LayoutComponent {
    header: HeaderComponent,
    session_list: SessionListComponent,
    message_list: MessageListComponent,
    composer: ComposerComponent,
}

impl LayoutComponent {
    pub fn new() -> Self {
        Self {
            header: HeaderComponent::new(),
            session_list: SessionListComponent::new(),
            message_list: MessageListComponent::new(),
            composer: ComposerComponent::new(),
        }
    }

    pub fn render(&mut self, frame: &mut Frame, state: &AppState) {
        let main_chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // Header
                Constraint::Min(0),    // Content
                Constraint::Length(3), // Bottom menu bar
            ])
            .split(frame.size());

        self.header.render(frame, main_chunks[0], state);

        let chat_area = if state.sidebar_visible {
            let content_chunks = Layout::default()
                .direction(Direction::Horizontal)
                .constraints([Constraint::Length(34), Constraint::Min(0)])
                .split(main_chunks[1]);
            self.session_list.render(frame, content_chunks[0], state);
            content_chunks[1]
        } else {
            main_chunks[1]
        };

        let chat_chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(0), Constraint::Length(3)])
            .split(chat_area);

        self.message_list.render(frame, chat_chunks[0], state);
        self.composer.render(frame, chat_chunks[1], state);

        self.render_menu_bar(frame, main_chunks[2], state);
    }

    fn render_menu_bar(&self, frame: &mut Frame, area: Rect, state: &AppState) {
        let (text, color) = if let Some(error) = &state.error {
            (error.clone(), Color::Red)
        } else {
            let hints = match state.focused_pane {
                FocusedPane::Composer => {
                    "[Enter] send  [Tab] sessions  [Ctrl-n] new chat  [Ctrl-b] sidebar  [Ctrl-c] quit"
                }
                FocusedPane::Sessions => {
                    "[j/k] move  [Enter] switch  [n]ew  [r]eset  [Tab] composer  [q]uit"
                }
            };
            (hints.to_string(), Color::Yellow)
        };

        let menu = Paragraph::new(text)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(Color::Cyan)),
            )
            .style(Style::default().fg(color));
        frame.render_widget(menu, area);
    }
}

impl Default for LayoutComponent {
    fn default() -> Self {
        Self::new()
    }
}
