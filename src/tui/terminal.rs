//! Terminal setup and teardown
//!
//! This module handles initializing and restoring the terminal state,
//! including setting up the panic hook to restore the terminal on crash.

use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io::{self, Stdout};
use std::panic;
use tracing::info;

use crate::config::{CabinetPaths, Settings};
use crate::error::{CabinetError, CabinetResult};
use crate::services::Backend;

use super::app::App;
use super::event::{Event, EventHandler};
use super::handler::handle_event;

/// Type alias for our terminal
pub type Tui = Terminal<CrosstermBackend<Stdout>>;

/// Initialize the terminal for TUI mode
pub fn init_terminal() -> CabinetResult<Tui> {
    let original_hook = panic::take_hook();
    panic::set_hook(Box::new(move |panic_info| {
        let _ = restore_terminal();
        original_hook(panic_info);
    }));

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;

    Ok(Terminal::new(CrosstermBackend::new(stdout))?)
}

/// Restore the terminal to its original state
pub fn restore_terminal() -> CabinetResult<()> {
    disable_raw_mode()?;
    execute!(io::stdout(), LeaveAlternateScreen)?;
    Ok(())
}

/// Run the TUI application
///
/// The session is checked before the screen is taken over, so a missing
/// login is reported on the normal terminal.
pub fn run_tui(paths: &CabinetPaths, settings: &Settings) -> CabinetResult<()> {
    let backend = Backend::connect(paths, settings)?;

    let mut terminal = init_terminal()?;
    let result = event_loop(&mut terminal, &backend);
    restore_terminal()?;
    result
}

fn event_loop(terminal: &mut Tui, backend: &Backend) -> CabinetResult<()> {
    let mut app = App::new(backend);
    info!(user = backend.user().unwrap_or("-"), "tui started");
    app.refresh();

    let events = EventHandler::default();

    loop {
        terminal.draw(|frame| super::views::render(frame, &app))?;

        let event = events
            .next()
            .map_err(|_| CabinetError::Tui("terminal input closed".into()))?;
        if let Event::Tick = event {
            app.notifications.remove_expired();
        } else {
            handle_event(&mut app, event);
        }

        if app.should_quit {
            break;
        }
    }

    info!("tui closed");
    Ok(())
}
