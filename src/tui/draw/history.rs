//! Chat history: bordered message blocks, "thinking" placeholder, scrollbar, welcome screen.

use chrono::Local;
use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Paragraph, Scrollbar, ScrollbarOrientation, ScrollbarState};

use crate::core::message::Message;

use super::super::app::App;
use super::super::constants::{ACCENT, ACCENT_SECONDARY};
use super::header::logo_symbol;

/// Repeat a character to fill width (approximate; chars may have different display widths).
fn repeat_char(c: char, n: usize) -> String {
    std::iter::repeat_n(c, n).collect()
}

/// Wrap text to `width` columns. Explicit newlines are kept; blank lines survive.
pub(crate) fn wrap_message(text: &str, width: usize) -> Vec<String> {
    let width = width.max(1);
    text.split('\n')
        .flat_map(|line| {
            if line.trim().is_empty() {
                vec![String::new()]
            } else {
                textwrap::wrap(line, width)
                    .into_iter()
                    .map(|cow| cow.into_owned())
                    .collect()
            }
        })
        .collect()
}

/// Add a message block with borders, label, and local time.
fn add_message_block(lines: &mut Vec<Line<'static>>, msg: &Message, wrap_width: usize) {
    let (label, border_color) = if msg.is_user() {
        ("You".to_string(), Color::DarkGray)
    } else {
        (msg.model_name.clone(), ACCENT_SECONDARY)
    };
    let border_style = Style::default().fg(border_color);
    let content_style = if msg.is_error() {
        Style::default().fg(Color::Red)
    } else {
        Style::default()
    };
    let content_width = wrap_width.saturating_sub(4);

    // Top border: "┌─ Label 14:32 ───...──┐"
    let time = msg.created_at.with_timezone(&Local).format("%H:%M");
    let top_label = format!("┌─ {} {} ", label, time);
    let top_trail_len = wrap_width.saturating_sub(top_label.chars().count() + 1);
    lines.push(Line::from(Span::styled(
        format!("{}{}┐", top_label, repeat_char('─', top_trail_len)),
        border_style,
    )));

    for chunk in wrap_message(msg.text.trim(), content_width) {
        lines.push(Line::from(vec![
            Span::styled("│ ", border_style),
            Span::styled(chunk, content_style),
        ]));
    }

    lines.push(Line::from(Span::styled(
        format!("└{}┘", repeat_char('─', wrap_width.saturating_sub(2))),
        border_style,
    )));
    lines.push(Line::from(""));
}

/// Build every history line for the given messages.
pub(crate) fn history_lines(
    messages: &[Message],
    is_busy: bool,
    wrap_width: usize,
) -> Vec<Line<'static>> {
    let mut lines: Vec<Line<'static>> = Vec::new();
    for msg in messages {
        add_message_block(&mut lines, msg, wrap_width);
    }
    if is_busy {
        lines.push(Line::from(vec![
            Span::styled(
                format!("  {} ", logo_symbol(true)),
                Style::default().fg(ACCENT),
            ),
            Span::styled(
                "Thinking... ",
                Style::default()
                    .fg(Color::DarkGray)
                    .add_modifier(Modifier::ITALIC),
            ),
        ]));
    }
    lines
}

pub(crate) fn draw_history(f: &mut Frame, app: &mut App, history_area: Rect) {
    let history_chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(0), Constraint::Length(1)])
        .split(history_area);
    let text_area = history_chunks[0];
    let scrollbar_area = history_chunks[1];

    let state = app.state();
    let lines = history_lines(&state.messages, state.is_busy, text_area.width as usize);

    let total_lines = lines.len();
    let visible = text_area.height as usize;
    let max_scroll = total_lines.saturating_sub(visible.max(1));
    app.last_max_scroll = max_scroll;
    let scroll_pos = app.scroll_line();
    let visible_lines: Vec<Line> = lines.into_iter().skip(scroll_pos).take(visible).collect();

    f.render_widget(Paragraph::new(visible_lines), text_area);

    let mut scrollbar_state = ScrollbarState::default()
        .position(scroll_pos)
        .content_length(max_scroll);
    let scrollbar = Scrollbar::new(ScrollbarOrientation::VerticalRight)
        .thumb_symbol("█")
        .thumb_style(Style::default().fg(ACCENT_SECONDARY))
        .track_symbol(Some("│"));
    f.render_stateful_widget(scrollbar, scrollbar_area, &mut scrollbar_state);
}

/// Empty conversation: greeting plus the models that can be selected.
pub(crate) fn draw_welcome(f: &mut Frame, app: &mut App, area: Rect) {
    let selected = &app.state().selected_model.id;
    let mut lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            "What would you like to ask?",
            Style::default().fg(ACCENT).add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
    ];
    for model in app.conversation.list_models() {
        let marker = if &model.id == selected { "● " } else { "  " };
        lines.push(Line::from(vec![
            Span::styled(marker, Style::default().fg(ACCENT)),
            Span::styled(
                format!("{:<22}", model.display_name),
                Style::default().fg(Color::White),
            ),
            Span::styled(
                model.description.clone(),
                Style::default().fg(Color::DarkGray),
            ),
        ]));
    }
    lines.push(Line::from(""));
    lines.push(Line::from(vec![
        Span::styled("Alt+M ", Style::default().fg(ACCENT_SECONDARY)),
        Span::raw("switch model"),
    ]));
    f.render_widget(Paragraph::new(lines).alignment(Alignment::Center), area);
}
