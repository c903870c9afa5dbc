// Terminal input -> page input
//
// Keys and mouse events are translated into `Input`s for the controller, plus
// a couple of viewer actions (quit, log panel) that never reach the page.

use crate::interaction::{Input, Key, UiEvent};
use crate::page::{ElementId, Page};
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::layout::Rect;

/// Rows moved per arrow key or wheel notch
const SCROLL_ROWS: f32 = 3.0;

#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    Quit,
    ToggleLogs,
    Page(Input),
}

/// Map a key press; releases and repeats of non-scroll keys are ignored
pub fn map_key(key: KeyEvent, page: &Page) -> Vec<Action> {
    if key.kind == KeyEventKind::Release {
        return Vec::new();
    }
    let row = page.metrics.row_height_px;
    let viewport = &page.viewport;
    let key_down = |k: Key| vec![Action::Page(Input::Event(UiEvent::KeyDown(k)))];
    let scroll = |delta: f32| vec![Action::Page(Input::ScrollBy(delta))];

    match key.code {
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => vec![Action::Quit],
        KeyCode::Char('q') => vec![Action::Quit],
        KeyCode::Char('l') => vec![Action::ToggleLogs],
        KeyCode::Char(c @ '1'..='9') => {
            let index = c as usize - '1' as usize;
            match nav_link(page, index) {
                Some(link) => vec![Action::Page(Input::Event(UiEvent::Click(link)))],
                None => key_down(Key::Char(c)),
            }
        }
        KeyCode::Char(c) => key_down(Key::Char(c)),
        KeyCode::Tab => key_down(Key::Tab),
        KeyCode::BackTab => key_down(Key::BackTab),
        KeyCode::Enter => key_down(Key::Enter),
        KeyCode::Esc => key_down(Key::Escape),
        KeyCode::Up => scroll(-SCROLL_ROWS * row),
        KeyCode::Down => scroll(SCROLL_ROWS * row),
        KeyCode::PageUp => scroll(-page_step(page)),
        KeyCode::PageDown => scroll(page_step(page)),
        KeyCode::Home => scroll(-viewport.scroll_top()),
        KeyCode::End => scroll(viewport.max_scroll() - viewport.scroll_top()),
        _ => key_down(Key::Other),
    }
}

/// Wheel scroll delta in pixels
pub fn wheel(page: &Page, down: bool) -> Input {
    let delta = SCROLL_ROWS * page.metrics.row_height_px;
    Input::ScrollBy(if down { delta } else { -delta })
}

/// One screen minus the fixed header
fn page_step(page: &Page) -> f32 {
    let header = page.metrics.rows_to_px(f32::from(page.layout.header_rows));
    (page.viewport.height() - header).max(page.metrics.row_height_px)
}

fn nav_link(page: &Page, index: usize) -> Option<ElementId> {
    page.document
        .query_selector_all(".nav-link")
        .ok()?
        .get(index)
        .copied()
}

/// First document row shown at the top of the page area
pub fn scroll_rows(page: &Page) -> u32 {
    page.metrics
        .px_to_rows(page.viewport.scroll_top())
        .round()
        .max(0.0) as u32
}

/// Element under a screen cell, if any
///
/// The fixed header is hit first; below it, screen rows map to document rows
/// through the scroll offset.
pub fn hit_test(page: &Page, area: Rect, column: u16, row: u16) -> Option<ElementId> {
    if column < area.x || row < area.y || column >= area.right() || row >= area.bottom() {
        return None;
    }
    let col = column - area.x;
    let y = row - area.y;
    if y < page.layout.header_rows {
        return page.layout.hit(col, u32::from(y), true).map(|b| b.element);
    }
    let doc_row = u32::from(y) + scroll_rows(page);
    page.layout.hit(col, doc_row, false).map(|b| b.element)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::page::{default_stylesheet, CellMetrics, PortfolioContent, Rgba};
    use std::time::Duration;

    fn page() -> Page {
        Page::new(
            &PortfolioContent::default(),
            default_stylesheet(Rgba::rgb(0, 0, 255)),
            CellMetrics::default(),
            100,
            30,
            Duration::from_millis(450),
        )
    }

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn test_keys_map_to_page_inputs() {
        let page = page();
        assert_eq!(map_key(press(KeyCode::Char('q')), &page), vec![Action::Quit]);
        assert_eq!(map_key(press(KeyCode::Char('l')), &page), vec![Action::ToggleLogs]);
        assert_eq!(
            map_key(press(KeyCode::Tab), &page),
            vec![Action::Page(Input::Event(UiEvent::KeyDown(Key::Tab)))]
        );
        assert_eq!(
            map_key(press(KeyCode::Down), &page),
            vec![Action::Page(Input::ScrollBy(48.0))]
        );
        assert_eq!(
            map_key(
                KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL),
                &page
            ),
            vec![Action::Quit]
        );
    }

    #[test]
    fn test_number_keys_click_nav_links() {
        let page = page();
        let links = page.document.query_selector_all(".nav-link").unwrap();
        assert_eq!(
            map_key(press(KeyCode::Char('2')), &page),
            vec![Action::Page(Input::Event(UiEvent::Click(links[1])))]
        );
        // no ninth link: plain key press
        assert_eq!(
            map_key(press(KeyCode::Char('9')), &page),
            vec![Action::Page(Input::Event(UiEvent::KeyDown(Key::Char('9'))))]
        );
    }

    #[test]
    fn test_hit_test_header_and_content() {
        let page = page();
        let area = Rect::new(0, 0, 100, 30);
        let nav = page.layout.header_boxes.last().unwrap();
        assert_eq!(hit_test(&page, area, nav.col, nav.row as u16), Some(nav.element));

        let first = page.layout.boxes.first().unwrap();
        assert_eq!(
            hit_test(&page, area, first.col, first.row as u16),
            Some(first.element)
        );
        assert_eq!(hit_test(&page, area, 200, 0), None);
    }
}
