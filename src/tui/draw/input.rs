//! Input box, notice line, bottom bar.

use ratatui::Frame;
use ratatui::layout::{Alignment, Position, Rect};
use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};

use super::super::app::App;
use super::super::constants::ACCENT;
use super::super::shortcuts::labels;

/// Draw the input block and set cursor position.
pub(crate) fn draw_input_block(f: &mut Frame, app: &mut App, input_area: Rect) {
    let busy = app.is_busy();
    let placeholder = if busy {
        "Waiting for reply... "
    } else {
        "Ask anything... "
    };
    let input_content = if app.input.is_empty() {
        Span::styled(placeholder, Style::default().fg(Color::DarkGray))
    } else {
        Span::raw(app.input.as_str())
    };
    let border = if busy { Color::DarkGray } else { ACCENT };
    let input_block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border));
    let inner = input_block.inner(input_area);

    // Scroll horizontally so the cursor stays visible.
    let cursor_col = app.input[..app.input_cursor].chars().count();
    let width = inner.width.max(1) as usize;
    let offset = cursor_col.saturating_sub(width.saturating_sub(1));
    let input_paragraph = Paragraph::new(Line::from(input_content))
        .block(input_block)
        .scroll((0, offset as u16))
        .style(Style::default().fg(Color::White));
    f.render_widget(input_paragraph, input_area);

    if app.model_selector.is_none() {
        let cx = inner.x + (cursor_col - offset) as u16;
        f.set_cursor_position(Position::new(cx, inner.y));
    }
}

pub(crate) fn draw_notice(f: &mut Frame, app: &mut App, area: Rect) {
    if let Some(ref notice) = app.notice {
        let line = Line::from(Span::styled(
            notice.as_str(),
            Style::default().fg(Color::Yellow),
        ));
        f.render_widget(Paragraph::new(line), area);
    }
}

/// Bottom bar: message count on the left, shortcuts on the right.
pub(crate) fn draw_bottom_bar(f: &mut Frame, app: &mut App, area: Rect) {
    let count = app.state().messages.len();
    let left = Line::from(Span::styled(
        format!("{} message(s)", count),
        Style::default().fg(Color::DarkGray),
    ));
    f.render_widget(Paragraph::new(left).alignment(Alignment::Left), area);
    f.render_widget(
        Paragraph::new(labels::bottom_bar(app.is_busy())).alignment(Alignment::Right),
        area,
    );
}
