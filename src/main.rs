// folio - an interactive portfolio page in the terminal
//
// The page is a small document model (elements, classes, inline styles,
// transitions) laid out on terminal cells. Page behaviors run as listeners on
// a single-threaded controller with a virtual clock:
// - Page (page/): document, selectors, stylesheet, layout, viewport
// - Interaction (interaction/): controller, scheduler, behaviors
// - TUI (ratatui): renders the page and turns terminal input into UI events
// - Demo: a scripted tour that can drive the page with or without the TUI

mod cli;
mod config;
mod demo;
mod interaction;
mod logging;
mod page;
mod tui;

use anyhow::{Context, Result};
use clap::Parser;
use cli::Cli;
use config::Config;
use logging::LogBuffer;
use page::PortfolioContent;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Handle CLI commands first (config --show, page --template, ...)
    if cli::handle_cli(&cli) {
        return Ok(());
    }

    // Ensure config template exists (helps users discover options)
    Config::ensure_config_exists();

    let mut config = Config::from_env();
    cli.apply(&mut config);

    // In TUI mode logs go to the in-memory buffer (keeps the display intact),
    // headless mode logs to stdout. The guard flushes the optional file log.
    let log_buffer = LogBuffer::new();
    let _file_guard = logging::init(&config.logging, config.enable_tui, &log_buffer);
    install_panic_hook();

    let content = load_content(&config)?;
    tracing::debug!(
        sections = content.sections.len(),
        nav = content.nav.len(),
        "Page content loaded"
    );

    if config.enable_tui {
        tracing::info!("Starting TUI");
        tui::run(content, log_buffer, config)
            .await
            .context("TUI failed")?;
    } else {
        tracing::info!("TUI disabled, running the scripted tour headless");
        let summary = demo::run_headless(&content, &config);
        tracing::info!(
            frames = summary.frames,
            revealed = summary.revealed,
            failures = summary.failures,
            "Tour finished at {:.0}px ({})",
            summary.scroll_top,
            summary.header.label()
        );
    }

    tracing::info!("Shutdown complete");
    Ok(())
}

/// Content from the configured page file, or the built-in sample page
fn load_content(config: &Config) -> Result<PortfolioContent> {
    match &config.page {
        Some(path) => PortfolioContent::load(path)
            .with_context(|| format!("Failed to load page {}", path.display())),
        None => Ok(PortfolioContent::default()),
    }
}

/// Route panics through tracing instead of stderr
///
/// Listener panics are caught by the controller; anything that reaches the
/// hook would otherwise print over the alternate screen.
fn install_panic_hook() {
    std::panic::set_hook(Box::new(|info| {
        let location = info
            .location()
            .map(|l| format!("{}:{}", l.file(), l.line()))
            .unwrap_or_else(|| "unknown".to_string());
        tracing::error!(%location, "panic: {}", panic_payload(info.payload()));
    }));
}

fn panic_payload(payload: &(dyn std::any::Any + Send)) -> &str {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.as_str()
    } else {
        "non-string panic payload"
    }
}
