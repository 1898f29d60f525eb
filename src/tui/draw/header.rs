//! Header: logo (spinner while waiting), title, selected model.

use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use std::time::Instant;

use crate::core::app::{NAME, VERSION};

use super::super::app::App;
use super::super::constants::{LOGO_IDLE, LOGO_THINKING};

/// Start time for header animation phase (thinking spinner).
pub(crate) static HEADER_START: std::sync::OnceLock<Instant> = std::sync::OnceLock::new();

/// Max width for model name in header; longer names are truncated with "…".
const MODEL_HEADER_WIDTH: u16 = 32;

/// Current spinner frame, or the idle logo.
pub(crate) fn logo_symbol(is_busy: bool) -> &'static str {
    if is_busy {
        let start = HEADER_START.get_or_init(Instant::now);
        let phase = start.elapsed().as_millis() as usize;
        LOGO_THINKING[(phase / 80) % LOGO_THINKING.len()]
    } else {
        LOGO_IDLE
    }
}

/// Keep the last `max_len` chars, prefixed with "…" when truncated.
fn truncate_left(s: &str, max_len: usize) -> String {
    let count = s.chars().count();
    if count <= max_len {
        return s.to_string();
    }
    let tail: String = s.chars().skip(count - max_len.saturating_sub(1)).collect();
    format!("…{}", tail)
}

pub(crate) fn draw_header(f: &mut Frame, app: &mut App, area: Rect, accent: Color) {
    let header_chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Length(4),
            Constraint::Min(0),
            Constraint::Length(MODEL_HEADER_WIDTH),
        ])
        .split(area);

    let logo_line = Line::from(Span::styled(
        format!("{} ", logo_symbol(app.is_busy())),
        Style::default().fg(accent),
    ));
    f.render_widget(Paragraph::new(logo_line), header_chunks[0]);

    let title = Line::from(vec![
        Span::styled(
            format!("{} ", NAME),
            Style::default().fg(accent).add_modifier(Modifier::BOLD),
        ),
        Span::styled(format!("v{}", VERSION), Style::default().fg(Color::DarkGray)),
    ]);
    f.render_widget(
        Paragraph::new(title).alignment(Alignment::Center),
        header_chunks[1],
    );

    let model = &app.state().selected_model;
    let model_line = Line::from(Span::styled(
        truncate_left(&model.display_name, MODEL_HEADER_WIDTH as usize),
        Style::default().fg(Color::DarkGray),
    ));
    f.render_widget(
        Paragraph::new(model_line).alignment(Alignment::Right),
        header_chunks[2],
    );
}
