//! TUI (Text User Interface) for chatting with the configured models.

mod app;
mod constants;
mod draw;
mod handlers;
mod shortcuts;

use crossterm::event::{self, Event};
use crossterm::execute;
use std::io;
use std::time::Duration;

use tokio::runtime::Runtime;

use crate::core::conversation::ConversationController;
use crate::core::setup::ChatSetup;

use app::App;
use draw::draw;
use handlers::HandleResult;

/// Guard that restores terminal state on drop (including on panic).
struct TerminalGuard;

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        use crossterm::terminal::{LeaveAlternateScreen, disable_raw_mode};
        let _ = execute!(
            std::io::stdout(),
            crossterm::event::PopKeyboardEnhancementFlags
        );
        let _ = disable_raw_mode();
        let _ = execute!(std::io::stdout(), LeaveAlternateScreen);
    }
}

/// Read the next key, merging a lone Esc with a quickly following key (Option as Meta).
fn read_key_with_meta(key: event::KeyEvent, app: &mut App) -> io::Result<event::KeyEvent> {
    if !handlers::would_esc_start_meta_sequence(&key, app) {
        return Ok(key);
    }
    let step_ms = 25u64;
    let mut elapsed = 0u64;
    while elapsed < constants::ESC_SEQUENCE_DRAIN_MS {
        if event::poll(Duration::from_millis(step_ms))?
            && let Event::Key(next) = event::read()?
        {
            app.escape_pending = true;
            return Ok(next);
        }
        elapsed += step_ms;
    }
    Ok(key)
}

/// Run the TUI loop. Uses a dedicated Tokio runtime for chat turns.
pub fn run(setup: ChatSetup) -> io::Result<()> {
    use crossterm::terminal::{Clear, ClearType, EnterAlternateScreen, enable_raw_mode};
    use ratatui::Terminal;
    use ratatui::backend::CrosstermBackend;

    let rt =
        Runtime::new().map_err(|e| io::Error::other(format!("Failed to create runtime: {}", e)))?;
    let conversation = ConversationController::new(
        setup.router,
        setup.models,
        &setup.initial_model.id,
        rt.handle().clone(),
    );
    let mut app = App::new(conversation);

    let _guard = TerminalGuard;
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    execute!(stdout, Clear(ClearType::All))?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Kitty keyboard protocol: Alt+key as single event with modifier (Ghostty, WezTerm, kitty, etc.)
    let _ = execute!(
        io::stdout(),
        crossterm::event::PushKeyboardEnhancementFlags(
            crossterm::event::KeyboardEnhancementFlags::DISAMBIGUATE_ESCAPE_CODES
        )
    );

    log::info!("TUI started with {}", app.state().selected_model.id);

    loop {
        app.poll_completions();

        terminal.draw(|f| draw(f, &mut app, f.area()))?;

        if event::poll(Duration::from_millis(constants::EVENT_POLL_TIMEOUT_MS))?
            && let Event::Key(key) = event::read()?
        {
            let key = read_key_with_meta(key, &mut app)?;
            if handlers::handle_key(key, &mut app) == HandleResult::Break {
                break;
            }
        }
    }

    // Cancels whatever is still in flight before the runtime shuts down.
    drop(app);
    terminal.show_cursor()?;
    Ok(())
}
