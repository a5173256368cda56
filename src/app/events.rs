// ABOUTME: Event handling system mapping keyboard input to app actions
// Key meaning depends on which pane holds focus: composer keys type, sidebar keys navigate

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::app::state::{AppState, FocusedPane};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppEvent {
    Quit,
    ToggleSidebar,
    FocusNextPane,
    NextSession,
    PreviousSession,
    SelectSession,
    NewSession,
    ResetSelectedSession,
    ComposerInputChar(char),
    ComposerBackspace,
    SubmitMessage,
}

pub struct EventHandler;

impl EventHandler {
    pub fn handle_key_event(key_event: KeyEvent, state: &AppState) -> Option<AppEvent> {
        // Global chords work from either pane.
        if key_event.modifiers.contains(KeyModifiers::CONTROL) {
            return match key_event.code {
                KeyCode::Char('c') => Some(AppEvent::Quit),
                KeyCode::Char('b') => Some(AppEvent::ToggleSidebar),
                KeyCode::Char('n') => Some(AppEvent::NewSession),
                _ => None,
            };
        }

        match state.focused_pane {
            FocusedPane::Composer => Self::handle_composer_keys(key_event),
            FocusedPane::Sessions => Self::handle_sessions_keys(key_event),
        }
    }

    fn handle_composer_keys(key_event: KeyEvent) -> Option<AppEvent> {
        match key_event.code {
            KeyCode::Enter => Some(AppEvent::SubmitMessage),
            KeyCode::Tab | KeyCode::Esc => Some(AppEvent::FocusNextPane),
            KeyCode::Backspace => Some(AppEvent::ComposerBackspace),
            KeyCode::Char(c) => Some(AppEvent::ComposerInputChar(c)),
            _ => None,
        }
    }

    fn handle_sessions_keys(key_event: KeyEvent) -> Option<AppEvent> {
        match key_event.code {
            KeyCode::Char('q') | KeyCode::Esc => Some(AppEvent::Quit),
            KeyCode::Char('j') | KeyCode::Down => Some(AppEvent::NextSession),
            KeyCode::Char('k') | KeyCode::Up => Some(AppEvent::PreviousSession),
            KeyCode::Enter => Some(AppEvent::SelectSession),
            KeyCode::Char('n') => Some(AppEvent::NewSession),
            KeyCode::Char('r') => Some(AppEvent::ResetSelectedSession),
            KeyCode::Tab => Some(AppEvent::FocusNextPane),
            _ => None,
        }
    }
}
