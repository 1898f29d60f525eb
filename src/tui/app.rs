//! TUI application state: input line, scroll, model selector.
//!
//! The conversation itself (messages, selected model, busy flag) lives in the
//! [`ConversationController`]; the app only holds view state.

use ratatui::widgets::ListState;
use tokio::sync::watch;

use crate::core::conversation::{ConversationController, ConversationState, SendOutcome};
use crate::core::models::Model;
use crate::core::persistence;

/// State for the model selector popup.
pub struct ModelSelectorState {
    pub models: Vec<Model>,
    pub selected_index: usize,
    pub list_state: ListState,
    /// Filter query (case-insensitive search on model id/name).
    pub filter: String,
}

impl ModelSelectorState {
    /// Open with the currently selected model highlighted.
    pub fn new(models: Vec<Model>, current_id: &str) -> Self {
        let selected_index = models.iter().position(|m| m.id == current_id).unwrap_or(0);
        Self {
            models,
            selected_index,
            list_state: ListState::default(),
            filter: String::new(),
        }
    }
}

/// Scroll position: either a specific line index, or "at bottom" (follow new content).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrollPosition {
    Line(usize),
    Bottom,
}

impl Default for ScrollPosition {
    fn default() -> Self {
        Self::Bottom
    }
}

pub struct App {
    pub(crate) conversation: ConversationController,
    /// Snapshots from the controller; used to follow new messages.
    updates: watch::Receiver<ConversationState>,
    /// Message count at the last snapshot seen.
    seen_messages: usize,
    /// User input in the text field.
    pub(crate) input: String,
    /// Cursor position in the input (byte index, always on a char boundary).
    pub(crate) input_cursor: usize,
    pub(crate) scroll: ScrollPosition,
    pub(crate) last_max_scroll: usize,
    /// When set, show model selector popup (Alt+M).
    pub model_selector: Option<ModelSelectorState>,
    /// Esc was pressed; next key = Option+key (Mac terminals with "Use option as meta").
    pub(crate) escape_pending: bool,
    /// One-line notice shown above the input (e.g. failed to remember the model).
    pub(crate) notice: Option<String>,
}

impl App {
    pub fn new(conversation: ConversationController) -> Self {
        let updates = conversation.subscribe();
        Self {
            conversation,
            updates,
            seen_messages: 0,
            input: String::new(),
            input_cursor: 0,
            scroll: ScrollPosition::default(),
            last_max_scroll: 0,
            model_selector: None,
            escape_pending: false,
            notice: None,
        }
    }

    pub(crate) fn state(&self) -> &ConversationState {
        self.conversation.state()
    }

    pub(crate) fn is_busy(&self) -> bool {
        self.conversation.is_busy()
    }

    pub(crate) fn insert_char(&mut self, c: char) {
        self.input.insert(self.input_cursor, c);
        self.input_cursor += c.len_utf8();
    }

    pub(crate) fn backspace(&mut self) {
        if let Some((idx, _)) = self.input[..self.input_cursor].char_indices().next_back() {
            self.input.remove(idx);
            self.input_cursor = idx;
        }
    }

    pub(crate) fn delete(&mut self) {
        if self.input_cursor < self.input.len() {
            self.input.remove(self.input_cursor);
        }
    }

    pub(crate) fn cursor_left(&mut self) {
        if let Some((idx, _)) = self.input[..self.input_cursor].char_indices().next_back() {
            self.input_cursor = idx;
        }
    }

    pub(crate) fn cursor_right(&mut self) {
        if let Some(c) = self.input[self.input_cursor..].chars().next() {
            self.input_cursor += c.len_utf8();
        }
    }

    pub(crate) fn clear_input(&mut self) {
        self.input.clear();
        self.input_cursor = 0;
    }

    /// Send the input line. The input is kept when the send is ignored (blank or busy).
    pub(crate) fn submit_input(&mut self) -> bool {
        match self.conversation.send_message(&self.input) {
            SendOutcome::Sent(_) => {
                self.clear_input();
                self.notice = None;
                self.scroll = ScrollPosition::Bottom;
                true
            }
            SendOutcome::Ignored(reason) => {
                log::debug!("input not sent: {:?}", reason);
                false
            }
        }
    }

    /// Apply completed turns, then jump to the bottom if the message list changed.
    pub(crate) fn poll_completions(&mut self) {
        self.conversation.poll_completions();
        if self.updates.has_changed().unwrap_or(false) {
            let count = self.updates.borrow_and_update().messages.len();
            if count != self.seen_messages {
                self.seen_messages = count;
                self.scroll = ScrollPosition::Bottom;
            }
        }
    }

    pub(crate) fn open_model_selector(&mut self) {
        let state = self.conversation.state();
        self.model_selector = Some(ModelSelectorState::new(
            self.conversation.list_models().to_vec(),
            &state.selected_model.id,
        ));
    }

    /// Switch model for the next send and remember it for the next launch.
    pub(crate) fn select_model(&mut self, model_id: &str) {
        match self.conversation.select_model(model_id) {
            Ok(model) => {
                let id = model.id.clone();
                if let Err(e) = persistence::save_last_model(&id) {
                    log::warn!("could not save last model: {}", e);
                    self.notice = Some(format!("Model not remembered: {}", e));
                }
            }
            Err(e) => self.notice = Some(e.to_string()),
        }
    }

    /// Start over with an empty conversation.
    pub(crate) fn new_conversation(&mut self) {
        self.conversation.clear_chat();
        self.notice = None;
        self.scroll = ScrollPosition::Bottom;
        self.last_max_scroll = 0;
    }

    /// Must be called before scroll_up/scroll_down when at bottom.
    pub(crate) fn materialize_scroll(&mut self) {
        if self.scroll == ScrollPosition::Bottom {
            self.scroll = ScrollPosition::Line(self.last_max_scroll);
        }
    }

    pub(crate) fn scroll_down(&mut self, n: usize) {
        self.materialize_scroll();
        if let ScrollPosition::Line(pos) = self.scroll {
            let next = (pos + n).min(self.last_max_scroll);
            self.scroll = if next == self.last_max_scroll {
                ScrollPosition::Bottom
            } else {
                ScrollPosition::Line(next)
            };
        }
    }

    pub(crate) fn scroll_up(&mut self, n: usize) {
        self.materialize_scroll();
        if let ScrollPosition::Line(pos) = self.scroll {
            self.scroll = ScrollPosition::Line(pos.saturating_sub(n));
        }
    }

    /// Resolve scroll position to a concrete line index.
    pub(crate) fn scroll_line(&self) -> usize {
        match self.scroll {
            ScrollPosition::Line(n) => n.min(self.last_max_scroll),
            ScrollPosition::Bottom => self.last_max_scroll,
        }
    }
}
