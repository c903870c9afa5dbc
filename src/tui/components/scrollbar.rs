//! Scrollbar rendering helper
//!
//! Shared by the page view and the log panel.

use ratatui::{
    layout::Rect,
    widgets::{Scrollbar, ScrollbarOrientation, ScrollbarState},
    Frame,
};

/// Visual style for the scrollbar
#[derive(Debug, Clone, Copy, Default)]
pub enum ScrollbarStyle {
    /// Minimal style - no arrows, just the thumb
    #[default]
    Minimal,
    /// Arrows at top and bottom (↑ ↓), for bordered panels
    Arrows,
}

/// Render a vertical scrollbar on the right edge of `area`
///
/// Nothing is drawn when everything fits (`total <= viewport`).
///
/// * `total` - Total number of rows/items
/// * `viewport` - Visible rows/items
/// * `offset` - Current scroll position
pub fn render_scrollbar_raw(
    f: &mut Frame,
    area: Rect,
    total: usize,
    viewport: usize,
    offset: usize,
    style: ScrollbarStyle,
) {
    if total <= viewport {
        return;
    }

    let scrollbar = match style {
        ScrollbarStyle::Arrows => Scrollbar::new(ScrollbarOrientation::VerticalRight)
            .begin_symbol(Some("↑"))
            .end_symbol(Some("↓")),
        ScrollbarStyle::Minimal => Scrollbar::new(ScrollbarOrientation::VerticalRight)
            .begin_symbol(None)
            .end_symbol(None),
    };

    // ScrollbarState wants: content_length (how much can scroll) and position
    let content_length = total.saturating_sub(viewport);
    let mut scrollbar_state =
        ScrollbarState::new(content_length).position(offset.min(content_length));

    f.render_stateful_widget(scrollbar, area, &mut scrollbar_state);
}
