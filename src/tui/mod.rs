// TUI module - Terminal User Interface
//
// This module manages the terminal UI using ratatui. It handles:
// - Terminal initialization and cleanup
// - Event loop (keyboard and mouse input, frame ticks)
// - Rendering the page, the log panel and the status bar

pub mod app;
pub mod components;
pub mod input;
pub mod layout;
pub mod theme;

use crate::config::Config;
use crate::logging::LogBuffer;
use crate::page::PortfolioContent;
use anyhow::{Context, Result};
use app::App;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use layout::Screen;
use ratatui::{backend::CrosstermBackend, layout::Rect, Frame, Terminal};
use std::io;
use std::time::Duration;
use tokio::time::MissedTickBehavior;

type Term = Terminal<CrosstermBackend<io::Stdout>>;

/// Raw mode + alternate screen for as long as it lives
///
/// Dropping it restores the terminal, so an error or a panic unwinding
/// through `run` still leaves the shell usable.
struct TerminalGuard {
    terminal: Term,
    restored: bool,
}

impl TerminalGuard {
    fn enter() -> Result<Self> {
        enable_raw_mode().context("Failed to enable raw mode")?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen, EnableMouseCapture)
            .context("Failed to setup terminal")?;
        let backend = CrosstermBackend::new(stdout);
        let terminal = Terminal::new(backend).context("Failed to create terminal")?;
        Ok(Self {
            terminal,
            restored: false,
        })
    }

    fn restore(&mut self) -> Result<()> {
        if self.restored {
            return Ok(());
        }
        self.restored = true;
        disable_raw_mode().context("Failed to disable raw mode")?;
        execute!(
            self.terminal.backend_mut(),
            LeaveAlternateScreen,
            DisableMouseCapture
        )
        .context("Failed to restore terminal")?;
        self.terminal.show_cursor().context("Failed to show cursor")?;
        Ok(())
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = self.restore();
    }
}

/// Run the TUI until the user quits
pub async fn run(content: PortfolioContent, log_buffer: LogBuffer, config: Config) -> Result<()> {
    let mut guard = TerminalGuard::enter()?;
    let size = guard.terminal.size().context("Failed to read terminal size")?;
    let mut app = App::new(
        &content,
        &config,
        log_buffer,
        Rect::new(0, 0, size.width, size.height),
    );

    let result = run_event_loop(&mut guard.terminal, &mut app, config.frame_interval()).await;

    guard.restore()?;
    result
}

/// Main event loop
///
/// Each frame: drain pending terminal input, advance the page clock, draw.
/// Ctrl+C arrives as a key in raw mode; the signal branch covers a SIGINT
/// sent from outside.
async fn run_event_loop(terminal: &mut Term, app: &mut App, frame_interval: Duration) -> Result<()> {
    let mut frames = tokio::time::interval(frame_interval);
    frames.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        tokio::select! {
            _ = frames.tick() => {}
            _ = tokio::signal::ctrl_c() => {
                app.should_quit = true;
            }
        }

        while !app.should_quit && event::poll(Duration::ZERO).context("Failed to poll input")? {
            match event::read().context("Failed to read input")? {
                Event::Key(key) => app.handle_key(key),
                Event::Mouse(mouse) => app.handle_mouse(mouse),
                // picked up by sync_area below
                Event::Resize(..) => {}
                _ => {}
            }
        }
        if app.should_quit {
            break;
        }

        let size = terminal.size().context("Failed to read terminal size")?;
        let screen = app.sync_area(Rect::new(0, 0, size.width, size.height));
        app.frame();

        terminal
            .draw(|f| draw(f, app, &screen))
            .context("Failed to draw terminal")?;
    }

    tracing::info!(failures = app.controller.failures(), "Leaving TUI");
    Ok(())
}

fn draw(f: &mut Frame, app: &App, screen: &Screen) {
    components::page_view::render(f, screen.page, app);
    if let Some(logs) = screen.logs {
        components::logs_panel::render(f, logs, app);
    }
    components::status_bar::render(f, screen.status, app);
}
