//! Event handlers for the TUI: keyboard dispatch to popups and the main input.

mod input;
mod model_selector;

use crossterm::event::{KeyEvent, KeyEventKind};

use super::app::App;
use super::shortcuts::Shortcut;

use self::model_selector::ModelSelectorAction;

/// Result of handling an event: continue the loop or exit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HandleResult {
    Continue,
    Break,
}

/// True when Esc would start an Option+key sequence rather than cancel a request.
pub(crate) fn would_esc_start_meta_sequence(key: &KeyEvent, app: &App) -> bool {
    Shortcut::is_escape(key) && app.model_selector.is_none() && !app.is_busy()
}

/// Handle a key event. Returns HandleResult::Break to exit the main loop.
pub fn handle_key(key: KeyEvent, app: &mut App) -> HandleResult {
    if key.kind != KeyEventKind::Press {
        return HandleResult::Continue;
    }

    // Esc+key sequence (Option as Meta on Mac terminals)
    if app.escape_pending {
        app.escape_pending = false;
        if let Some(shortcut) = Shortcut::match_key(&key, true) {
            return handle_shortcut(shortcut, app);
        }
    }

    if let Some(shortcut) = Shortcut::match_key(&key, false) {
        return handle_shortcut(shortcut, app);
    }

    if let Some(selector) = app.model_selector.as_mut() {
        match model_selector::handle_model_selector_key(key.code, key.modifiers, selector) {
            ModelSelectorAction::Close => app.model_selector = None,
            ModelSelectorAction::Select(model_id) => {
                app.model_selector = None;
                app.select_model(&model_id);
            }
            ModelSelectorAction::Keep => {}
        }
        return HandleResult::Continue;
    }

    // Esc: cancel in-flight request, else start Option+key sequence.
    if Shortcut::is_escape(&key) {
        if !app.conversation.cancel_pending() {
            app.escape_pending = true;
        }
        return HandleResult::Continue;
    }

    input::handle_main_input(key.code, key.modifiers, app)
}

fn handle_shortcut(shortcut: Shortcut, app: &mut App) -> HandleResult {
    match shortcut {
        Shortcut::Quit => HandleResult::Break,
        Shortcut::ClearChat => {
            app.model_selector = None;
            app.new_conversation();
            HandleResult::Continue
        }
        Shortcut::ModelSelector => {
            if app.model_selector.is_some() {
                app.model_selector = None;
            } else {
                app.open_model_selector();
            }
            HandleResult::Continue
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::conversation::ConversationController;
    use crate::core::llm::ChatRouter;
    use crate::core::models::ModelRegistry;
    use crossterm::event::{KeyCode, KeyEventState, KeyModifiers};
    use std::sync::Arc;
    use tokio::runtime::Handle;

    fn app() -> App {
        App::new(ConversationController::new(
            Arc::new(ChatRouter::new()),
            ModelRegistry::builtin(),
            "llama3-70b-8192",
            Handle::current(),
        ))
    }

    fn press(code: KeyCode, modifiers: KeyModifiers) -> KeyEvent {
        KeyEvent {
            code,
            modifiers,
            kind: KeyEventKind::Press,
            state: KeyEventState::empty(),
        }
    }

    fn type_text(app: &mut App, text: &str) {
        for c in text.chars() {
            handle_key(press(KeyCode::Char(c), KeyModifiers::empty()), app);
        }
    }

    #[tokio::test]
    async fn ctrl_c_quits() {
        let mut app = app();
        assert_eq!(
            handle_key(press(KeyCode::Char('c'), KeyModifiers::CONTROL), &mut app),
            HandleResult::Break
        );
    }

    #[tokio::test]
    async fn enter_sends_and_second_enter_is_gated_while_busy() {
        let mut app = app();
        type_text(&mut app, "Hello");
        handle_key(press(KeyCode::Enter, KeyModifiers::empty()), &mut app);
        assert!(app.is_busy());
        type_text(&mut app, "again");
        handle_key(press(KeyCode::Enter, KeyModifiers::empty()), &mut app);
        assert_eq!(app.state().messages.len(), 1);
        assert_eq!(app.input, "again");
    }

    #[tokio::test]
    async fn esc_cancels_in_flight_request() {
        let mut app = app();
        type_text(&mut app, "Hello");
        handle_key(press(KeyCode::Enter, KeyModifiers::empty()), &mut app);
        handle_key(press(KeyCode::Esc, KeyModifiers::empty()), &mut app);
        assert!(!app.escape_pending);

        let reply = app.conversation.next_completion().await.unwrap();
        assert!(reply.is_error());
        assert!(!app.is_busy());
    }

    #[tokio::test]
    async fn esc_then_m_opens_model_selector() {
        let mut app = app();
        handle_key(press(KeyCode::Esc, KeyModifiers::empty()), &mut app);
        assert!(app.escape_pending);
        handle_key(press(KeyCode::Char('m'), KeyModifiers::empty()), &mut app);
        assert!(app.model_selector.is_some());
        assert!(app.input.is_empty());
    }

    #[tokio::test]
    async fn selector_keys_do_not_reach_input() {
        let mut app = app();
        handle_key(press(KeyCode::Char('m'), KeyModifiers::ALT), &mut app);
        type_text(&mut app, "gem");
        assert!(app.input.is_empty());
        assert_eq!(app.model_selector.as_ref().unwrap().filter, "gem");
        handle_key(press(KeyCode::Esc, KeyModifiers::empty()), &mut app);
        assert!(app.model_selector.is_none());
        assert_eq!(app.state().selected_model.id, "llama3-70b-8192");
    }

    #[tokio::test]
    async fn clear_chat_shortcut_empties_messages() {
        let mut app = app();
        type_text(&mut app, "Hello");
        handle_key(press(KeyCode::Enter, KeyModifiers::empty()), &mut app);
        handle_key(press(KeyCode::Char('l'), KeyModifiers::CONTROL), &mut app);
        assert!(app.state().messages.is_empty());
    }
}
