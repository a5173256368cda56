// ABOUTME: Application state and the App structure driving the chat client
// Registry operations run synchronously, network calls drain through one pending async action

use anyhow::Result;
use crossterm::event::KeyEvent;

use crate::api::ChatClient;
use crate::app::events::{AppEvent, EventHandler};
use crate::config::Config;
use crate::models::{ChatMessage, SessionRecord};
use crate::session::{FileStore, KvStore, NoopStore, SessionRegistry};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FocusedPane {
    Composer,
    Sessions,
}

/// Work that needs the network; at most one is in flight between draws.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AsyncAction {
    LoadHistory { session_id: String },
    SendMessage { session_id: String, message: String },
    ResetSession { session_id: String },
}

#[derive(Debug)]
pub struct AppState {
    pub api_base: String,
    pub active_session_id: String,
    pub sessions: Vec<SessionRecord>,
    pub selected_session_index: Option<usize>,
    pub messages: Vec<ChatMessage>,
    pub input: String,
    pub sending: bool,
    pub loading_history: bool,
    pub error: Option<String>,
    pub sidebar_visible: bool,
    pub focused_pane: FocusedPane,
    pub should_quit: bool,
    pub pending_async_action: Option<AsyncAction>,
    pub needs_redraw: bool,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            api_base: crate::config::DEFAULT_API_BASE.to_string(),
            active_session_id: String::new(),
            sessions: Vec::new(),
            selected_session_index: None,
            messages: Vec::new(),
            input: String::new(),
            sending: false,
            loading_history: false,
            error: None,
            sidebar_visible: true,
            focused_pane: FocusedPane::Composer,
            should_quit: false,
            pending_async_action: None,
            needs_redraw: false,
        }
    }
}

impl AppState {
    pub fn busy(&self) -> bool {
        self.sending || self.loading_history
    }

    pub fn selected_session(&self) -> Option<&SessionRecord> {
        self.selected_session_index
            .and_then(|index| self.sessions.get(index))
    }

    pub fn select_next_session(&mut self) {
        if self.sessions.is_empty() {
            self.selected_session_index = None;
            return;
        }
        let next = match self.selected_session_index {
            Some(index) if index + 1 < self.sessions.len() => index + 1,
            Some(index) => index,
            None => 0,
        };
        self.selected_session_index = Some(next);
    }

    pub fn select_previous_session(&mut self) {
        if self.sessions.is_empty() {
            self.selected_session_index = None;
            return;
        }
        let previous = match self.selected_session_index {
            Some(index) => index.saturating_sub(1),
            None => 0,
        };
        self.selected_session_index = Some(previous);
    }

    /// Point the sidebar selection at the active session after the sorted
    /// list changed under it.
    pub fn sync_selection_to_active(&mut self) {
        self.selected_session_index = self
            .sessions
            .iter()
            .position(|record| record.id == self.active_session_id)
            .or(if self.sessions.is_empty() { None } else { Some(0) });
    }

    pub fn short_active_id(&self) -> String {
        if self.active_session_id.is_empty() {
            "new".to_string()
        } else {
            self.active_session_id.chars().take(8).collect()
        }
    }
}

/// The running application: UI state plus the session registry and API client
/// behind it.
pub struct App {
    pub state: AppState,
    registry: SessionRegistry<Box<dyn KvStore>>,
    client: ChatClient,
}

impl App {
    pub fn new(config: Config) -> Self {
        let store: Box<dyn KvStore> = match config.state_dir {
            Some(dir) => Box::new(FileStore::new(dir)),
            None => {
                tracing::warn!("No usable state directory, sessions will not persist");
                Box::new(NoopStore)
            }
        };
        let state = AppState {
            api_base: config.api_base.clone(),
            ..AppState::default()
        };
        Self {
            state,
            registry: SessionRegistry::new(store),
            client: ChatClient::new(config.api_base),
        }
    }

    /// Resolve the active session, load the known list and queue the initial
    /// history fetch. Runs once at startup.
    pub fn init(&mut self) {
        let active = self.registry.active_id();
        tracing::info!("Starting with active session {}", active);
        self.state.active_session_id = active.clone();
        self.state.sessions = self.registry.list();
        self.state.sync_selection_to_active();
        self.state.loading_history = true;
        self.state.pending_async_action = Some(AsyncAction::LoadHistory { session_id: active });
    }

    pub fn handle_key(&mut self, key_event: KeyEvent) {
        if let Some(event) = EventHandler::handle_key_event(key_event, &self.state) {
            self.process_event(event);
        }
    }

    pub fn process_event(&mut self, event: AppEvent) {
        match event {
            AppEvent::Quit => self.state.should_quit = true,
            AppEvent::ToggleSidebar => {
                self.state.sidebar_visible = !self.state.sidebar_visible;
                if !self.state.sidebar_visible {
                    self.state.focused_pane = FocusedPane::Composer;
                }
            }
            AppEvent::FocusNextPane => {
                self.state.focused_pane = match self.state.focused_pane {
                    FocusedPane::Composer if self.state.sidebar_visible => FocusedPane::Sessions,
                    _ => FocusedPane::Composer,
                };
            }
            AppEvent::NextSession => self.state.select_next_session(),
            AppEvent::PreviousSession => self.state.select_previous_session(),
            AppEvent::SelectSession => self.select_session(),
            AppEvent::NewSession => self.new_session(),
            AppEvent::ResetSelectedSession => self.reset_selected_session(),
            AppEvent::ComposerInputChar(c) => self.state.input.push(c),
            AppEvent::ComposerBackspace => {
                self.state.input.pop();
            }
            AppEvent::SubmitMessage => self.submit_message(),
        }
        self.state.needs_redraw = true;
    }

    /// Send the composer contents to the active session. The user message is
    /// echoed locally right away, the round trip finishes on a later tick.
    fn submit_message(&mut self) {
        let trimmed = self.state.input.trim().to_string();
        if trimmed.is_empty() || self.state.busy() || self.state.pending_async_action.is_some() {
            return;
        }
        self.state.error = None;
        self.state.sending = true;
        self.state.input.clear();
        self.state.messages.push(ChatMessage::user(trimmed.clone()));
        self.state.pending_async_action = Some(AsyncAction::SendMessage {
            session_id: self.state.active_session_id.clone(),
            message: trimmed,
        });
    }

    /// Switch the composer to the session under the sidebar cursor.
    fn select_session(&mut self) {
        let Some(record) = self.state.selected_session().cloned() else {
            return;
        };
        if record.id == self.state.active_session_id {
            return;
        }
        self.state.error = None;
        self.state.active_session_id = record.id.clone();
        self.state.sessions = self.registry.set_active(&record.id);
        self.state.sync_selection_to_active();
        self.state.messages.clear();
        self.state.loading_history = true;
        self.state.pending_async_action = Some(AsyncAction::LoadHistory {
            session_id: record.id,
        });
    }

    fn new_session(&mut self) {
        let (id, sessions) = self.registry.create_new();
        tracing::info!("Created session {}", id);
        self.state.active_session_id = id;
        self.state.sessions = sessions;
        self.state.sync_selection_to_active();
        self.state.messages.clear();
        self.state.error = None;
        self.state.focused_pane = FocusedPane::Composer;
    }

    fn reset_selected_session(&mut self) {
        let Some(record) = self.state.selected_session().cloned() else {
            return;
        };
        if self.state.pending_async_action.is_some() {
            return;
        }
        self.state.pending_async_action = Some(AsyncAction::ResetSession {
            session_id: record.id,
        });
    }

    /// Drain the pending async action, if any. Failures land in the status
    /// line or the log, never in the caller.
    pub async fn tick(&mut self) -> Result<()> {
        let Some(action) = self.state.pending_async_action.take() else {
            return Ok(());
        };
        match action {
            AsyncAction::LoadHistory { session_id } => {
                match self.client.fetch_history(&session_id).await {
                    Ok(history) => {
                        if session_id == self.state.active_session_id {
                            self.state.messages = history;
                        }
                    }
                    Err(e) => {
                        // Missing history reads as an empty conversation.
                        tracing::warn!("History fetch for {} failed: {}", session_id, e);
                        if session_id == self.state.active_session_id {
                            self.state.messages.clear();
                        }
                    }
                }
                self.state.loading_history = false;
            }
            AsyncAction::SendMessage {
                session_id,
                message,
            } => {
                match self.client.send_message(&session_id, &message).await {
                    Ok(exchange) => {
                        if !exchange.history.is_empty() {
                            self.state.messages = exchange.history;
                        } else if !exchange.reply.is_empty() {
                            self.state.messages.push(ChatMessage::assistant(exchange.reply));
                        }
                        self.state.sessions = self.registry.touch(&session_id);
                        self.state.sync_selection_to_active();
                    }
                    Err(e) => {
                        tracing::warn!("Chat request failed: {}", e);
                        self.state.error = Some(e.to_string());
                        self.state
                            .messages
                            .push(ChatMessage::assistant("Sorry, the server is not responding."));
                    }
                }
                self.state.sending = false;
            }
            AsyncAction::ResetSession { session_id } => {
                match self.client.reset_session(&session_id).await {
                    Ok(()) => {
                        tracing::info!("Reset session {}", session_id);
                        if session_id == self.state.active_session_id {
                            self.state.messages.clear();
                        }
                    }
                    Err(e) => {
                        tracing::warn!("Reset for {} failed: {}", session_id, e);
                        self.state.error = Some(e.to_string());
                    }
                }
            }
        }
        self.state.needs_redraw = true;
        Ok(())
    }

    pub fn needs_ui_refresh(&mut self) -> bool {
        std::mem::take(&mut self.state.needs_redraw)
    }
}
