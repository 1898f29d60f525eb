//! Handler for main input (chat input, cursor, scroll).

use crossterm::event::{KeyCode, KeyModifiers};

use super::super::app::App;
use super::super::constants;
use super::HandleResult;

/// Handle main input keys (when no popup is open).
pub(crate) fn handle_main_input(
    key_code: KeyCode,
    key_modifiers: KeyModifiers,
    app: &mut App,
) -> HandleResult {
    match (key_code, key_modifiers) {
        (KeyCode::Enter, _) => {
            app.submit_input();
        }
        (KeyCode::Char('u'), KeyModifiers::CONTROL) => app.clear_input(),
        (KeyCode::Backspace, _) => app.backspace(),
        (KeyCode::Delete, _) => app.delete(),
        (KeyCode::Left, _) => app.cursor_left(),
        (KeyCode::Right, _) => app.cursor_right(),
        (KeyCode::Home, _) => app.input_cursor = 0,
        (KeyCode::End, _) => app.input_cursor = app.input.len(),
        (KeyCode::Up, _) => app.scroll_up(constants::SCROLL_LINES_SMALL),
        (KeyCode::Down, _) => app.scroll_down(constants::SCROLL_LINES_SMALL),
        (KeyCode::PageUp, _) => app.scroll_up(constants::SCROLL_LINES_PAGE),
        (KeyCode::PageDown, _) => app.scroll_down(constants::SCROLL_LINES_PAGE),
        (KeyCode::Char(c), mods) => {
            // Ignore Alt/Ctrl+key: user likely intended a shortcut
            if !mods.intersects(KeyModifiers::ALT | KeyModifiers::CONTROL) {
                app.insert_char(c);
            }
        }
        _ => {}
    }
    HandleResult::Continue
}
