//! Application state for the promptdeck TUI.

use std::collections::HashMap;
use std::path::PathBuf;

use chrono::Utc;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use tokio::sync::mpsc::UnboundedSender;
use tokio::task::JoinHandle;

use crate::client::{LlmClient, LlmEvent, SendRequest, spawn_request};
use crate::conversation::{ConversationHistory, ConversationTurn};
use crate::layout::{
    DispatchOutcome, FocusMap, LayoutAction, NodeId, PaneId, PaneTree, dispatch, next_pane,
    previous_pane,
};
use crate::logging;
use crate::models::{AVAILABLE_MODELS, model_config};
use crate::persistence::PaneStore;
use crate::settings::Settings;
use crate::tui::menu::PaneMenuView;
use crate::tui::views::{HelpView, ModalKind, ViewEvent, ViewStack};

// === Text editing ===

fn char_count(text: &str) -> usize {
    text.chars().count()
}

fn byte_index_at_char(text: &str, char_index: usize) -> usize {
    if char_index == 0 {
        return 0;
    }
    text.char_indices()
        .nth(char_index)
        .map(|(idx, _)| idx)
        .unwrap_or_else(|| text.len())
}

fn remove_char_at(text: &mut String, char_index: usize) -> bool {
    let start = byte_index_at_char(text, char_index);
    if start >= text.len() {
        return false;
    }
    let ch = text[start..].chars().next().unwrap();
    let end = start + ch.len_utf8();
    text.replace_range(start..end, "");
    true
}

/// Editable text with a char-indexed cursor. Just enough editing to work
/// the panes; serious editing goes through the external editor.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TextBuffer {
    pub content: String,
    pub cursor: usize,
}

impl TextBuffer {
    #[must_use]
    pub fn from_text(content: String) -> Self {
        let cursor = char_count(&content);
        Self { content, cursor }
    }

    pub fn set_text(&mut self, content: String) {
        self.cursor = char_count(&content);
        self.content = content;
    }

    pub fn insert_char(&mut self, c: char) {
        let cursor = self.cursor.min(char_count(&self.content));
        let byte_index = byte_index_at_char(&self.content, cursor);
        self.content.insert(byte_index, c);
        self.cursor = cursor + 1;
    }

    pub fn delete_char(&mut self) {
        if self.cursor == 0 {
            return;
        }
        let target = self.cursor.saturating_sub(1);
        if remove_char_at(&mut self.content, target) {
            self.cursor = target;
        }
    }

    pub fn delete_char_forward(&mut self) {
        let _ = remove_char_at(&mut self.content, self.cursor);
        self.cursor = self.cursor.min(char_count(&self.content));
    }

    pub fn move_left(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    pub fn move_right(&mut self) {
        if self.cursor < char_count(&self.content) {
            self.cursor += 1;
        }
    }

    pub fn move_start(&mut self) {
        self.cursor = 0;
    }

    pub fn move_end(&mut self) {
        self.cursor = char_count(&self.content);
    }
}

// === Types ===

/// Whether keys edit pane text or drive pane/layout commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    Command,
    Edit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Warning,
    Error,
}

/// Transient footer message. Replaced by the next notice; never blocks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub text: String,
    pub level: NoticeLevel,
}

/// Lifecycle of the in-flight (or last) LLM request, shown in the
/// Response pane's status line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RequestState {
    Idle,
    Waiting,
    Streaming,
    Complete,
    Cancelled,
    Failed(String),
}

impl RequestState {
    #[must_use]
    pub fn label(&self) -> &str {
        match self {
            RequestState::Idle => "Ready",
            RequestState::Waiting => "Waiting for response...",
            RequestState::Streaming => "Streaming...",
            RequestState::Complete => "Complete",
            RequestState::Cancelled => "Cancelled",
            RequestState::Failed(_) => "Error",
        }
    }
}

/// Work the event loop must do on the app's behalf because it owns the
/// terminal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UiRequest {
    Quit,
    OpenEditor(PaneId),
}

/// Configuration required to bootstrap the TUI.
#[derive(Debug, Clone)]
pub struct TuiOptions {
    pub editor: String,
    pub streaming: bool,
    pub model_override: Option<String>,
    pub use_alt_screen: bool,
}

impl TuiOptions {
    #[must_use]
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            editor: settings.editor.clone(),
            streaming: settings.streaming,
            model_override: settings.default_model.clone(),
            use_alt_screen: true,
        }
    }
}

// === App State ===

/// Global UI state. The pane tree is the single owner of all layout
/// state; everything here mutates on the UI task only.
pub struct App {
    pub tree: PaneTree,
    focus: FocusMap,
    content_nodes: HashMap<PaneId, NodeId>,
    focused_node: NodeId,
    pub mode: InputMode,
    pub buffers: HashMap<PaneId, TextBuffer>,
    pub response: String,
    pub request_state: RequestState,
    pub streaming: bool,
    pub selected_model: Option<String>,
    pub model_cursor: usize,
    pub notice: Option<Notice>,
    pub view_stack: ViewStack,
    pub editor_cmd: String,
    pub should_quit: bool,
    pub needs_redraw: bool,
    store: PaneStore,
    history: ConversationHistory,
    client: LlmClient,
    event_tx: UnboundedSender<LlmEvent>,
    request_task: Option<JoinHandle<()>>,
    pending_request: Option<SendRequest>,
}

impl App {
    pub fn new(
        options: TuiOptions,
        store: PaneStore,
        history: ConversationHistory,
        client: LlmClient,
        event_tx: UnboundedSender<LlmEvent>,
    ) -> Self {
        // Mirror the widget containment hierarchy as an explicit arena:
        // root -> row -> pane container -> body -> content leaf. Only the
        // pane container carries the pane tag; focus lands on the leaf and
        // resolution ascends to the boundary.
        let tree = PaneTree::new();
        let mut focus = FocusMap::new();
        let mut content_nodes = HashMap::new();
        content_nodes.insert(PaneId::Root, focus.root());
        for row in tree.rows() {
            let row_node = focus.insert(focus.root(), None);
            for pane in &row.panes {
                let container = focus.insert(row_node, Some(*pane));
                let body = focus.insert(container, None);
                let leaf = focus.insert(body, None);
                content_nodes.insert(*pane, leaf);
            }
        }

        let mut buffers = HashMap::new();
        for pane in PaneId::CHILDREN {
            if pane.is_editable() {
                buffers.insert(pane, TextBuffer::from_text(store.load(pane)));
            }
        }

        let selected_model = options
            .model_override
            .clone()
            .or_else(|| store.load_selected_model())
            .filter(|name| model_config(name).is_some());
        let model_cursor = selected_model
            .as_deref()
            .and_then(|name| AVAILABLE_MODELS.iter().position(|m| m.name == name))
            .unwrap_or(0);

        let focused_node = content_nodes
            .get(&PaneId::UserPrompt)
            .copied()
            .unwrap_or_else(|| focus.root());

        Self {
            tree,
            focus,
            content_nodes,
            focused_node,
            mode: InputMode::Command,
            buffers,
            response: String::new(),
            request_state: RequestState::Idle,
            streaming: options.streaming,
            selected_model,
            model_cursor,
            notice: None,
            view_stack: ViewStack::new(),
            editor_cmd: options.editor,
            should_quit: false,
            needs_redraw: true,
            store,
            history,
            client,
            event_tx,
            request_task: None,
            pending_request: None,
        }
    }

    // === Focus ===

    /// Which pane owns the focused leaf element right now.
    #[must_use]
    pub fn focused_pane(&self) -> PaneId {
        self.focus.resolve(self.focused_node)
    }

    pub fn focus_pane(&mut self, pane: PaneId) {
        if let Some(node) = self.content_nodes.get(&pane) {
            self.focused_node = *node;
            self.mode = InputMode::Command;
            self.needs_redraw = true;
        }
    }

    pub fn focus_next(&mut self) {
        self.focus_pane(next_pane(self.focused_pane()));
    }

    pub fn focus_previous(&mut self) {
        self.focus_pane(previous_pane(self.focused_pane()));
    }

    // === Notices ===

    pub fn notify(&mut self, level: NoticeLevel, text: impl Into<String>) {
        self.notice = Some(Notice {
            text: text.into(),
            level,
        });
        self.needs_redraw = true;
    }

    // === Layout ===

    pub fn layout_action(&mut self, action: LayoutAction) {
        let target = self.focused_pane();
        match dispatch(&mut self.tree, target, action) {
            DispatchOutcome::Applied => {
                self.needs_redraw = true;
            }
            DispatchOutcome::NoTarget => {
                self.notify(NoticeLevel::Warning, "No resizable target");
            }
            DispatchOutcome::Unchanged => {}
        }
    }

    pub fn open_menu(&mut self) {
        if self.view_stack.top_kind() != Some(ModalKind::PaneMenu) {
            self.view_stack.push(PaneMenuView::new(&self.tree));
            self.needs_redraw = true;
        }
    }

    pub fn open_help(&mut self) {
        if self.view_stack.top_kind() != Some(ModalKind::Help) {
            self.view_stack.push(HelpView::new());
            self.needs_redraw = true;
        }
    }

    /// Apply an event emitted by a modal view, then refresh the view
    /// against the mutated tree so an open menu always shows current
    /// state.
    pub fn apply_view_event(&mut self, event: ViewEvent) {
        match event {
            ViewEvent::FocusPane { pane } => {
                self.focus_pane(pane);
            }
            ViewEvent::HidePane { pane } => {
                match dispatch(&mut self.tree, pane, LayoutAction::Hide) {
                    DispatchOutcome::Applied => {
                        self.notify(NoticeLevel::Info, format!("Hidden: {}", pane.label()));
                    }
                    DispatchOutcome::Unchanged => {
                        self.notify(NoticeLevel::Warning, "Pane is already hidden");
                    }
                    DispatchOutcome::NoTarget => {
                        self.notify(NoticeLevel::Warning, "No resizable target");
                    }
                }
            }
            ViewEvent::UnhidePane { pane } => {
                match dispatch(&mut self.tree, pane, LayoutAction::Unhide) {
                    DispatchOutcome::Applied => {
                        self.notify(NoticeLevel::Info, format!("Unhidden: {}", pane.label()));
                    }
                    DispatchOutcome::Unchanged => {
                        self.notify(NoticeLevel::Warning, "Pane is already visible");
                    }
                    DispatchOutcome::NoTarget => {
                        self.notify(NoticeLevel::Warning, "No resizable target");
                    }
                }
            }
            ViewEvent::HideAllPanes => {
                self.tree.hide_all_children();
                self.notify(NoticeLevel::Info, "All panes hidden");
            }
            ViewEvent::ShowAllPanes => {
                self.tree.show_all_children();
                self.notify(NoticeLevel::Info, "All panes shown");
            }
            ViewEvent::ResetLayout => {
                self.tree.reset_layout();
                self.notify(NoticeLevel::Info, "Layout reset");
            }
        }
        self.view_stack.update_layout(&self.tree);
        self.needs_redraw = true;
    }

    // === Editing ===

    pub fn enter_edit_mode(&mut self) {
        let pane = self.focused_pane();
        if pane.is_editable() {
            self.mode = InputMode::Edit;
            self.needs_redraw = true;
        } else {
            self.notify(NoticeLevel::Warning, "No editable pane focused");
        }
    }

    pub fn exit_edit_mode(&mut self) {
        if self.mode == InputMode::Edit {
            self.mode = InputMode::Command;
            self.needs_redraw = true;
        }
    }

    #[must_use]
    pub fn buffer(&self, pane: PaneId) -> Option<&TextBuffer> {
        self.buffers.get(&pane)
    }

    pub fn set_buffer_text(&mut self, pane: PaneId, content: String) {
        if let Some(buffer) = self.buffers.get_mut(&pane) {
            buffer.set_text(content);
            self.needs_redraw = true;
        }
    }

    fn focused_buffer_mut(&mut self) -> Option<&mut TextBuffer> {
        let pane = self.focused_pane();
        self.buffers.get_mut(&pane)
    }

    pub fn save_focused(&mut self) {
        let pane = self.focused_pane();
        let Some(buffer) = self.buffers.get(&pane) else {
            self.notify(NoticeLevel::Warning, "No editable pane focused");
            return;
        };
        match self.store.save(pane, &buffer.content) {
            Ok(()) => self.notify(NoticeLevel::Info, format!("{} saved", pane.label())),
            Err(err) => {
                logging::warn(format!("save failed: {err}"));
                self.notify(NoticeLevel::Error, format!("Error saving: {err}"));
            }
        }
    }

    // === Model selection ===

    pub fn model_cursor_up(&mut self) {
        self.model_cursor = self
            .model_cursor
            .checked_sub(1)
            .unwrap_or(AVAILABLE_MODELS.len() - 1);
        self.needs_redraw = true;
    }

    pub fn model_cursor_down(&mut self) {
        self.model_cursor = (self.model_cursor + 1) % AVAILABLE_MODELS.len();
        self.needs_redraw = true;
    }

    pub fn select_highlighted_model(&mut self) {
        let model = AVAILABLE_MODELS[self.model_cursor];
        self.selected_model = Some(model.name.to_string());
        if let Err(err) = self.store.save_selected_model(model.name) {
            logging::warn(format!("model selection save failed: {err}"));
            self.notify(
                NoticeLevel::Error,
                format!("Failed to save model selection: {err}"),
            );
            return;
        }
        self.notify(NoticeLevel::Info, format!("Selected: {}", model.display_name));
    }

    // === Requests ===

    #[must_use]
    pub fn request_in_flight(&self) -> bool {
        self.request_task
            .as_ref()
            .is_some_and(|task| !task.is_finished())
    }

    pub fn toggle_streaming(&mut self) {
        self.streaming = !self.streaming;
        let state = if self.streaming { "enabled" } else { "disabled" };
        self.notify(NoticeLevel::Info, format!("Streaming {state}"));
    }

    pub fn clear_response(&mut self) {
        self.response.clear();
        self.request_state = RequestState::Idle;
        self.notify(NoticeLevel::Info, "Response cleared");
    }

    fn buffer_text(&self, pane: PaneId) -> String {
        self.buffers
            .get(&pane)
            .map(|buffer| buffer.content.clone())
            .unwrap_or_default()
    }

    /// Validate and launch a request on a background task. Guard failures
    /// are notices and leave every pane untouched.
    pub fn send_to_llm(&mut self) {
        if self.request_in_flight() {
            self.notify(NoticeLevel::Warning, "A request is already running");
            return;
        }
        let Some(model) = self.selected_model.clone() else {
            self.notify(NoticeLevel::Error, "Please select a model first (press 4)");
            return;
        };
        let user_prompt = self.buffer_text(PaneId::UserPrompt);
        if user_prompt.trim().is_empty() {
            self.notify(NoticeLevel::Warning, "User prompt is empty");
            return;
        }

        let request = SendRequest {
            model,
            user_prompt,
            system_prompt: self.buffer_text(PaneId::SystemPrompt),
            context: self.buffer_text(PaneId::Context),
        };

        self.response.clear();
        self.request_state = if self.streaming {
            RequestState::Streaming
        } else {
            RequestState::Waiting
        };
        self.pending_request = Some(request.clone());
        self.request_task = Some(spawn_request(
            self.client.clone(),
            request,
            self.streaming,
            self.event_tx.clone(),
        ));
        self.needs_redraw = true;
    }

    /// Abort the in-flight request, if any. Layout state is untouched.
    pub fn cancel_request(&mut self) -> bool {
        let Some(task) = self.request_task.take() else {
            return false;
        };
        if task.is_finished() {
            return false;
        }
        task.abort();
        self.pending_request = None;
        self.request_state = RequestState::Cancelled;
        self.notify(NoticeLevel::Warning, "Request cancelled");
        true
    }

    /// Fold a background LLM event into the Response pane and history.
    pub fn on_llm_event(&mut self, event: LlmEvent) {
        match event {
            LlmEvent::Chunk(chunk) => {
                self.response.push_str(&chunk);
            }
            LlmEvent::Completed { response } => {
                if !self.streaming || self.response.is_empty() {
                    self.response = response.clone();
                }
                self.request_state = RequestState::Complete;
                self.request_task = None;
                if let Some(request) = self.pending_request.take() {
                    let turn = ConversationTurn {
                        timestamp: Utc::now(),
                        model: request.model,
                        user_prompt: request.user_prompt,
                        system_prompt: request.system_prompt,
                        context: request.context,
                        response,
                    };
                    if let Err(err) = self.history.add_turn(turn) {
                        logging::warn(format!("history write failed: {err}"));
                        self.notify(
                            NoticeLevel::Error,
                            format!("Failed to save history: {err}"),
                        );
                        self.needs_redraw = true;
                        return;
                    }
                }
                self.notify(NoticeLevel::Info, "Response received");
            }
            LlmEvent::Failed { message } => {
                self.request_state = RequestState::Failed(message.clone());
                self.request_task = None;
                self.pending_request = None;
                self.notify(NoticeLevel::Error, format!("Error: {message}"));
            }
        }
        self.needs_redraw = true;
    }

    pub fn export_conversation(&mut self) {
        let Some(home) = dirs::home_dir() else {
            self.notify(NoticeLevel::Error, "Export failed: no home directory");
            return;
        };
        let timestamp = Utc::now().format("%Y%m%d_%H%M%S");
        let path: PathBuf = home.join(format!("promptdeck_conversation_{timestamp}.json"));
        match self.history.export_to_file(&path) {
            Ok(()) => self.notify(NoticeLevel::Info, format!("Exported to {}", path.display())),
            Err(err) => self.notify(NoticeLevel::Error, format!("Export failed: {err}")),
        }
    }

    // === Key handling ===

    /// Handle one key in the main screen (modals take keys first in the
    /// event loop). Returns work that needs the terminal.
    pub fn handle_key(&mut self, key: KeyEvent) -> Option<UiRequest> {
        match self.mode {
            InputMode::Edit => self.handle_edit_key(key),
            InputMode::Command => return self.handle_command_key(key),
        }
        None
    }

    fn handle_edit_key(&mut self, key: KeyEvent) {
        if key.code == KeyCode::Esc {
            self.exit_edit_mode();
            return;
        }
        if key.code == KeyCode::Char('s') && key.modifiers.contains(KeyModifiers::CONTROL) {
            self.save_focused();
            return;
        }
        let Some(buffer) = self.focused_buffer_mut() else {
            self.mode = InputMode::Command;
            return;
        };
        match key.code {
            KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
                buffer.insert_char(c);
            }
            KeyCode::Enter => buffer.insert_char('\n'),
            KeyCode::Backspace => buffer.delete_char(),
            KeyCode::Delete => buffer.delete_char_forward(),
            KeyCode::Left => buffer.move_left(),
            KeyCode::Right => buffer.move_right(),
            KeyCode::Home => buffer.move_start(),
            KeyCode::End => buffer.move_end(),
            _ => return,
        }
        self.needs_redraw = true;
    }

    fn handle_command_key(&mut self, key: KeyEvent) -> Option<UiRequest> {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        match key.code {
            KeyCode::Char('q') if !ctrl => {
                self.should_quit = true;
                return Some(UiRequest::Quit);
            }
            KeyCode::Char('?') => self.open_help(),
            KeyCode::Esc => {
                if !self.cancel_request() {
                    self.open_menu();
                }
            }
            KeyCode::Char('1') => self.focus_pane(PaneId::UserPrompt),
            KeyCode::Char('2') => self.focus_pane(PaneId::SystemPrompt),
            KeyCode::Char('3') => self.focus_pane(PaneId::Context),
            KeyCode::Char('4') => self.focus_pane(PaneId::ModelSelection),
            KeyCode::Char('5') => self.focus_pane(PaneId::Response),
            KeyCode::Tab => self.focus_next(),
            KeyCode::BackTab => self.focus_previous(),
            KeyCode::Char('m') if !ctrl => self.layout_action(LayoutAction::ToggleMaximize),
            KeyCode::Char('n') if !ctrl => self.layout_action(LayoutAction::ToggleMinimize),
            KeyCode::Up if ctrl => self.layout_action(LayoutAction::IncreaseHeight),
            KeyCode::Down if ctrl => self.layout_action(LayoutAction::DecreaseHeight),
            KeyCode::Char('i') if !ctrl => self.enter_edit_mode(),
            KeyCode::Char('e') if ctrl => self.export_conversation(),
            KeyCode::Char('e') => {
                let pane = self.focused_pane();
                if pane.is_editable() {
                    return Some(UiRequest::OpenEditor(pane));
                }
                self.notify(NoticeLevel::Warning, "No editable pane focused");
            }
            KeyCode::Char('s') if ctrl => self.save_focused(),
            KeyCode::Char('s') => self.toggle_streaming(),
            KeyCode::Char('c') if !ctrl => self.clear_response(),
            KeyCode::Up => {
                if self.focused_pane() == PaneId::ModelSelection {
                    self.model_cursor_up();
                }
            }
            KeyCode::Down => {
                if self.focused_pane() == PaneId::ModelSelection {
                    self.model_cursor_down();
                }
            }
            KeyCode::Enter => {
                if self.focused_pane() == PaneId::ModelSelection {
                    self.select_highlighted_model();
                } else {
                    self.send_to_llm();
                }
            }
            _ => {}
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::layout::{HeightTier, PaneStatus};
    use pretty_assertions::assert_eq;

    struct Fixture {
        app: App,
        _dir: tempfile::TempDir,
        rx: tokio::sync::mpsc::UnboundedReceiver<LlmEvent>,
    }

    fn fixture() -> Fixture {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = PaneStore::at(dir.path());
        store.ensure_files().expect("seed files");
        let history = ConversationHistory::load(store.history_path(), 10);
        let (tx, rx) = tokio::sync::mpsc::unbounded_channel();
        let options = TuiOptions {
            editor: "nvim".to_string(),
            streaming: true,
            model_override: None,
            use_alt_screen: true,
        };
        let app = App::new(
            options,
            store,
            history,
            LlmClient::new(Config::default()),
            tx,
        );
        Fixture { app, _dir: dir, rx }
    }

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn ctrl_key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::CONTROL)
    }

    #[test]
    fn focus_starts_on_user_prompt_and_resolves_through_leaves() {
        let fx = fixture();
        // The focused node is the content leaf, three levels below the
        // pane boundary.
        assert_eq!(fx.app.focused_pane(), PaneId::UserPrompt);
    }

    #[test]
    fn focus_next_cycles_canonical_ring_in_six_steps() {
        let mut fx = fixture();
        fx.app.focus_pane(PaneId::Root);

        let mut seen = Vec::new();
        for _ in 0..6 {
            fx.app.focus_next();
            seen.push(fx.app.focused_pane());
        }
        assert_eq!(
            seen,
            vec![
                PaneId::UserPrompt,
                PaneId::SystemPrompt,
                PaneId::Context,
                PaneId::ModelSelection,
                PaneId::Response,
                PaneId::Root,
            ]
        );
    }

    #[test]
    fn layout_action_on_root_reports_no_target() {
        let mut fx = fixture();
        fx.app.focus_pane(PaneId::Root);
        fx.app.layout_action(LayoutAction::ToggleMaximize);

        let notice = fx.app.notice.expect("expected a notice");
        assert_eq!(notice.text, "No resizable target");
        assert_eq!(fx.app.tree.maximized_pane(), None);
    }

    #[test]
    fn maximize_key_flows_through_focused_pane() {
        let mut fx = fixture();
        fx.app.focus_pane(PaneId::Response);
        fx.app.handle_key(key(KeyCode::Char('m')));
        assert_eq!(fx.app.tree.maximized_pane(), Some(PaneId::Response));
        assert_eq!(
            fx.app.tree.status_of(PaneId::Response),
            PaneStatus::Maximized
        );

        fx.app.handle_key(key(KeyCode::Char('m')));
        assert_eq!(fx.app.tree.maximized_pane(), None);
    }

    #[test]
    fn height_keys_cycle_the_focused_pane() {
        let mut fx = fixture();
        fx.app.focus_pane(PaneId::Context);
        fx.app.handle_key(ctrl_key(KeyCode::Up));
        assert_eq!(
            fx.app.tree.pane(PaneId::Context).unwrap().tier,
            HeightTier::Doubled
        );
        fx.app.handle_key(ctrl_key(KeyCode::Down));
        fx.app.handle_key(ctrl_key(KeyCode::Down));
        assert_eq!(
            fx.app.tree.pane(PaneId::Context).unwrap().tier,
            HeightTier::Minimized
        );
    }

    #[test]
    fn edit_mode_requires_an_editable_pane() {
        let mut fx = fixture();
        fx.app.focus_pane(PaneId::Response);
        fx.app.handle_key(key(KeyCode::Char('i')));
        assert_eq!(fx.app.mode, InputMode::Command);
        assert!(fx.app.notice.is_some());

        fx.app.focus_pane(PaneId::Context);
        fx.app.handle_key(key(KeyCode::Char('i')));
        assert_eq!(fx.app.mode, InputMode::Edit);

        fx.app.handle_key(key(KeyCode::Char('h')));
        fx.app.handle_key(key(KeyCode::Char('i')));
        assert_eq!(fx.app.buffer(PaneId::Context).unwrap().content, "hi");

        fx.app.handle_key(key(KeyCode::Esc));
        assert_eq!(fx.app.mode, InputMode::Command);
    }

    #[test]
    fn send_requires_model_and_prompt() {
        let mut fx = fixture();
        fx.app.selected_model = None;
        fx.app.send_to_llm();
        assert!(
            fx.app
                .notice
                .as_ref()
                .is_some_and(|n| n.text.contains("select a model"))
        );
        assert_eq!(fx.app.request_state, RequestState::Idle);

        fx.app.selected_model = Some("openai:gpt-4o-mini".to_string());
        fx.app.set_buffer_text(PaneId::UserPrompt, "   ".to_string());
        fx.app.send_to_llm();
        assert!(
            fx.app
                .notice
                .as_ref()
                .is_some_and(|n| n.text.contains("prompt is empty"))
        );
        assert_eq!(fx.app.request_state, RequestState::Idle);
    }

    #[test]
    fn llm_events_fold_into_response_and_history() {
        let mut fx = fixture();
        fx.app.pending_request = Some(SendRequest {
            model: "openai:gpt-4o-mini".to_string(),
            user_prompt: "hi".to_string(),
            system_prompt: String::new(),
            context: String::new(),
        });
        fx.app.request_state = RequestState::Streaming;

        fx.app.on_llm_event(LlmEvent::Chunk("Hel".to_string()));
        fx.app.on_llm_event(LlmEvent::Chunk("lo".to_string()));
        assert_eq!(fx.app.response, "Hello");

        fx.app.on_llm_event(LlmEvent::Completed {
            response: "Hello".to_string(),
        });
        assert_eq!(fx.app.request_state, RequestState::Complete);
        assert_eq!(fx.app.history.turns().len(), 1);
        assert_eq!(fx.app.history.turns()[0].response, "Hello");
    }

    #[test]
    fn failed_request_leaves_layout_untouched() {
        let mut fx = fixture();
        fx.app.focus_pane(PaneId::UserPrompt);
        fx.app.layout_action(LayoutAction::ToggleMaximize);
        let before_tree = format!("{:?}", fx.app.tree);

        fx.app.on_llm_event(LlmEvent::Failed {
            message: "HTTP 500: boom".to_string(),
        });
        assert!(matches!(fx.app.request_state, RequestState::Failed(_)));
        assert_eq!(format!("{:?}", fx.app.tree), before_tree);
    }

    #[test]
    fn menu_events_mutate_tree_and_refresh_menu() {
        let mut fx = fixture();
        fx.app.open_menu();
        assert_eq!(fx.app.view_stack.top_kind(), Some(ModalKind::PaneMenu));

        fx.app.apply_view_event(ViewEvent::HidePane {
            pane: PaneId::Context,
        });
        assert_eq!(fx.app.tree.status_of(PaneId::Context), PaneStatus::Hidden);

        fx.app.apply_view_event(ViewEvent::HidePane {
            pane: PaneId::Context,
        });
        assert!(
            fx.app
                .notice
                .as_ref()
                .is_some_and(|n| n.text.contains("already hidden"))
        );

        fx.app.apply_view_event(ViewEvent::ResetLayout);
        assert_eq!(fx.app.tree.status_of(PaneId::Context), PaneStatus::Visible);
    }

    #[test]
    fn model_selection_keys_only_apply_when_pane_focused() {
        let mut fx = fixture();
        fx.app.focus_pane(PaneId::ModelSelection);
        let before = fx.app.model_cursor;
        fx.app.handle_key(key(KeyCode::Down));
        assert_ne!(fx.app.model_cursor, before);

        fx.app.handle_key(key(KeyCode::Enter));
        assert_eq!(
            fx.app.selected_model.as_deref(),
            Some(AVAILABLE_MODELS[fx.app.model_cursor].name)
        );

        // Reloading the store sees the persisted selection.
        assert_eq!(
            fx.app.store.load_selected_model(),
            fx.app.selected_model
        );
        drop(fx.rx);
    }

    #[test]
    fn editor_request_only_for_editable_panes() {
        let mut fx = fixture();
        fx.app.focus_pane(PaneId::Context);
        assert_eq!(
            fx.app.handle_key(key(KeyCode::Char('e'))),
            Some(UiRequest::OpenEditor(PaneId::Context))
        );

        fx.app.focus_pane(PaneId::ModelSelection);
        assert_eq!(fx.app.handle_key(key(KeyCode::Char('e'))), None);
        assert!(fx.app.notice.is_some());
    }
}
