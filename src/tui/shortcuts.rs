//! Centralized keyboard shortcuts.
//!
//! | Action         | Keys                          |
//! |----------------|-------------------------------|
//! | Send           | Enter                         |
//! | Cancel request | Esc (while waiting)           |
//! | Scroll         | ↑ ↓ PageUp PageDown           |
//! | Clear chat     | Ctrl+L, Ctrl+N                |
//! | Model selector | Alt+M, Esc+m, µ (Option+M Mac) |
//! | Quit           | Ctrl+C                        |
//!
//! On macOS, Option+M sends Esc+m when the terminal uses Option as Meta,
//! or `µ` otherwise.

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

/// Detected shortcut.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shortcut {
    /// Clear the conversation (Ctrl+L, Ctrl+N)
    ClearChat,
    /// Model selector (Alt+M, Esc+m)
    ModelSelector,
    /// Quit (Ctrl+C)
    Quit,
}

const MAC_OPTION_M: char = '\u{00B5}'; // µ

impl Shortcut {
    /// Returns the shortcut if the key matches. `escape_pending` is set when the
    /// previous key was a lone Esc (Option as Meta).
    pub fn match_key(key: &KeyEvent, escape_pending: bool) -> Option<Shortcut> {
        if key.kind != KeyEventKind::Press {
            return None;
        }

        if escape_pending {
            return match key.code {
                KeyCode::Char('m') => Some(Shortcut::ModelSelector),
                _ => None,
            };
        }

        match key.code {
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                Some(Shortcut::Quit)
            }
            KeyCode::Char('l') | KeyCode::Char('n')
                if key.modifiers.contains(KeyModifiers::CONTROL) =>
            {
                Some(Shortcut::ClearChat)
            }
            KeyCode::Char('m') if key.modifiers.contains(KeyModifiers::ALT) => {
                Some(Shortcut::ModelSelector)
            }
            KeyCode::Char(MAC_OPTION_M) => Some(Shortcut::ModelSelector),
            _ => None,
        }
    }

    /// True if key is Escape (cancel, or start of an Option+key sequence).
    pub fn is_escape(key: &KeyEvent) -> bool {
        key.kind == KeyEventKind::Press && key.code == KeyCode::Esc
    }
}


/// Labels for the bottom bar.
pub mod labels {
    use ratatui::style::Color;
    use ratatui::text::{Line, Span};

    const DIM: Color = Color::DarkGray;

    pub fn bottom_bar(is_busy: bool) -> Line<'static> {
        if is_busy {
            Line::from(vec![
                Span::styled("Esc ", Color::Yellow),
                Span::raw("cancel"),
                Span::styled("  ↑↓ ", DIM),
                Span::raw("scroll"),
                Span::styled("  Alt+M ", DIM),
                Span::raw("model"),
                Span::styled("  Ctrl+C ", DIM),
                Span::raw("quit"),
            ])
        } else {
            Line::from(vec![
                Span::styled("Enter ", DIM),
                Span::raw("send"),
                Span::styled("  ↑↓ ", DIM),
                Span::raw("scroll"),
                Span::styled("  Ctrl+L ", DIM),
                Span::raw("clear"),
                Span::styled("  Alt+M ", DIM),
                Span::raw("model"),
                Span::styled("  Ctrl+C ", DIM),
                Span::raw("quit"),
            ])
        }
    }
}
