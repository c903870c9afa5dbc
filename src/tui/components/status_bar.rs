// Status bar component
//
// Key hints, scroll offset, header variant and listener failures. Hints are
// dropped on narrow terminals.

use crate::tui::app::App;
use crate::tui::layout::Breakpoint;
use ratatui::{
    layout::Rect,
    style::{Color, Style},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

const HINTS: &str = "q quit │ Tab focus │ ↑↓ scroll │ 1-9 nav │ l logs";

pub fn render(f: &mut Frame, area: Rect, app: &App) {
    let bp = Breakpoint::from_width(area.width);
    let page = app.page();

    let mut parts = Vec::new();
    if app.is_demo() {
        parts.push("DEMO".to_string());
    }
    if bp.at_least(Breakpoint::Normal) {
        parts.push(HINTS.to_string());
    }
    parts.push(format!(
        "{:.0}/{:.0}px",
        page.viewport.scroll_top(),
        page.viewport.max_scroll()
    ));
    parts.push(format!("header: {}", app.header_variant().label()));
    let failures = app.controller.failures();
    if failures > 0 {
        parts.push(format!("⚠ {} errors", failures));
    }

    let style = if failures > 0 {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default().fg(Color::Gray)
    };
    let status = Paragraph::new(format!(" {}", parts.join(" │ ")))
        .style(style)
        .block(Block::default().borders(Borders::TOP));

    f.render_widget(status, area);
}
