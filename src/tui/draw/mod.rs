//! TUI rendering: layout and widgets for the chat interface.

mod header;
mod history;
mod input;
mod popups;

use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};

use super::app::App;
use super::constants::{ACCENT, INPUT_HEIGHT};

pub(super) fn draw(f: &mut Frame, app: &mut App, area: Rect) {
    let notice_height = u16::from(app.notice.is_some());
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2),
            Constraint::Min(3),
            Constraint::Length(notice_height),
            Constraint::Length(INPUT_HEIGHT),
            Constraint::Length(1),
        ])
        .split(area);

    header::draw_header(f, app, chunks[0], ACCENT);
    if app.state().messages.is_empty() && !app.is_busy() {
        history::draw_welcome(f, app, chunks[1]);
    } else {
        history::draw_history(f, app, chunks[1]);
    }
    input::draw_notice(f, app, chunks[2]);
    input::draw_input_block(f, app, chunks[3]);
    input::draw_bottom_bar(f, app, chunks[4]);

    if let Some(ref mut selector) = app.model_selector {
        popups::draw_model_selector_popup(f, area, selector);
    }
}
