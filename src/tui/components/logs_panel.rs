//! Logs panel component
//!
//! Shows the most recent entries from the in-memory log buffer, newest at
//! the bottom, color-coded by level. Toggled with `l`.

use super::scrollbar::{render_scrollbar_raw, ScrollbarStyle};
use crate::logging::{LogEntry, LogLevel};
use crate::tui::app::App;
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    widgets::{Block, Borders, List, ListItem},
    Frame,
};

pub fn render(f: &mut Frame, area: Rect, app: &App) {
    let height = usize::from(area.height.saturating_sub(2));
    let total = app.log_buffer.len();
    let entries = app.log_buffer.recent(height);

    let items: Vec<ListItem> = if app.log_buffer.is_empty() {
        vec![ListItem::new("No log entries yet").style(Style::default().fg(Color::DarkGray))]
    } else {
        entries
            .iter()
            .map(|entry| ListItem::new(format_log_entry(entry)).style(log_level_style(entry.level)))
            .collect()
    };

    let title = format!(" Logs ({}) ", total);
    let list = List::new(items).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::DarkGray))
            .title(title),
    );
    f.render_widget(list, area);

    // always following the tail
    render_scrollbar_raw(
        f,
        area,
        total,
        height,
        total.saturating_sub(height),
        ScrollbarStyle::Arrows,
    );
}

/// Format a log entry for display; the target is shortened to its last
/// path segment (`folio::interaction::reveal` -> `reveal`)
fn format_log_entry(entry: &LogEntry) -> String {
    let target = entry.target.rsplit("::").next().unwrap_or_default();
    format!(
        "[{}] {:5} {}: {}",
        entry.timestamp.format("%H:%M:%S"),
        entry.level.as_str(),
        target,
        entry.message
    )
}

fn log_level_style(level: LogLevel) -> Style {
    match level {
        LogLevel::Error => Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        LogLevel::Warn => Style::default().fg(Color::Yellow),
        LogLevel::Info => Style::default().fg(Color::Cyan),
        LogLevel::Debug | LogLevel::Trace => Style::default().fg(Color::DarkGray),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    #[test]
    fn test_entry_format() {
        let entry = LogEntry {
            timestamp: Utc.with_ymd_and_hms(2024, 5, 1, 9, 30, 5).unwrap(),
            level: LogLevel::Warn,
            target: "folio::config".to_string(),
            message: "Invalid theme.accent_color".to_string(),
        };
        assert_eq!(
            format_log_entry(&entry),
            "[09:30:05] WARN  config: Invalid theme.accent_color"
        );

        let entry = LogEntry {
            target: "folio".to_string(),
            ..entry
        };
        assert!(format_log_entry(&entry).ends_with("WARN  folio: Invalid theme.accent_color"));
    }
}
