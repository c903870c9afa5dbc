// Application state for the TUI
//
// Owns the page controller and the viewer-only state around it (log panel,
// hover tracking, demo source). Terminal events come in through
// `handle_key` / `handle_mouse`; `frame` advances the page clock once per
// rendered frame.

use super::input::{self, Action};
use super::layout::Screen;
use super::theme::Palette;
use crate::config::Config;
use crate::demo::DemoSource;
use crate::interaction::{self, EventSource, HeaderVariant, Input, PageController, UiEvent};
use crate::logging::LogBuffer;
use crate::page::{default_stylesheet, ElementId, Page, PortfolioContent};
use crossterm::event::{KeyEvent, MouseButton, MouseEvent, MouseEventKind};
use ratatui::layout::Rect;
use std::time::{Duration, Instant};

pub struct App {
    pub controller: PageController,
    pub log_buffer: LogBuffer,
    pub palette: Palette,
    pub show_logs: bool,
    pub should_quit: bool,
    demo: Option<DemoSource>,
    hovered: Option<ElementId>,
    page_area: Rect,
    started: Instant,
}

impl App {
    /// Build the page for the terminal `area` and fire the load events
    pub fn new(content: &PortfolioContent, config: &Config, log_buffer: LogBuffer, area: Rect) -> Self {
        let stylesheet = default_stylesheet(config.accent_color());
        let palette = Palette::from_stylesheet(&stylesheet, config.use_theme_background);
        let page_area = Screen::split(area, false).page;
        let page = Page::new(
            content,
            stylesheet,
            config.cell_metrics(),
            page_area.width,
            page_area.height,
            config.smooth_scroll(),
        );
        let mut controller = interaction::controller_for(page, config);
        controller.start();

        if config.demo_mode {
            tracing::info!("Running in DEMO MODE - the scripted tour drives the page");
        }

        Self {
            controller,
            log_buffer,
            palette,
            show_logs: false,
            should_quit: false,
            demo: config.demo_mode.then(DemoSource::new),
            hovered: None,
            page_area,
            started: Instant::now(),
        }
    }

    pub fn page(&self) -> &Page {
        self.controller.page()
    }

    pub fn now(&self) -> Duration {
        self.started.elapsed()
    }

    pub fn is_demo(&self) -> bool {
        self.demo.is_some()
    }

    pub fn header_variant(&self) -> HeaderVariant {
        HeaderVariant::of(&self.page().document).unwrap_or(HeaderVariant::Top)
    }

    /// Re-layout when the page area changed (terminal resize, log panel)
    pub fn sync_area(&mut self, terminal: Rect) -> Screen {
        let screen = Screen::split(terminal, self.show_logs);
        if screen.page.width != self.page_area.width || screen.page.height != self.page_area.height
        {
            tracing::debug!(
                width = screen.page.width,
                height = screen.page.height,
                "Page area resized"
            );
            self.controller.apply(Input::Resize {
                width: screen.page.width,
                height: screen.page.height,
            });
        }
        self.page_area = screen.page;
        screen
    }

    /// Advance the clock and render one page frame
    pub fn frame(&mut self) {
        let now = self.now();
        if let Some(demo) = self.demo.as_mut() {
            let inputs = demo.poll(self.controller.page(), now);
            for input in inputs {
                self.apply(input);
            }
        }
        self.controller.tick(now);
    }

    fn apply(&mut self, input: Input) {
        if input == Input::Quit {
            self.should_quit = true;
            return;
        }
        self.controller.apply(input);
    }

    pub fn handle_key(&mut self, key: KeyEvent) {
        for action in input::map_key(key, self.controller.page()) {
            match action {
                Action::Quit => self.should_quit = true,
                Action::ToggleLogs => self.show_logs = !self.show_logs,
                Action::Page(input) => self.apply(input),
            }
        }
    }

    pub fn handle_mouse(&mut self, mouse: MouseEvent) {
        match mouse.kind {
            MouseEventKind::ScrollDown => {
                let input = input::wheel(self.page(), true);
                self.apply(input);
            }
            MouseEventKind::ScrollUp => {
                let input = input::wheel(self.page(), false);
                self.apply(input);
            }
            MouseEventKind::Down(MouseButton::Left) => {
                let target = self.target_at(mouse.column, mouse.row);
                self.apply(Input::Event(UiEvent::PointerDown(target)));
                if let Some(target) = target {
                    self.apply(Input::Event(UiEvent::Click(target)));
                }
            }
            MouseEventKind::Moved | MouseEventKind::Drag(_) => {
                let target = self.target_at(mouse.column, mouse.row);
                self.hover(target);
            }
            _ => {}
        }
    }

    fn target_at(&self, column: u16, row: u16) -> Option<ElementId> {
        input::hit_test(self.page(), self.page_area, column, row)
    }

    fn hover(&mut self, target: Option<ElementId>) {
        if target == self.hovered {
            return;
        }
        if let Some(previous) = self.hovered.take() {
            self.apply(Input::Event(UiEvent::PointerLeave(previous)));
        }
        if let Some(next) = target {
            self.apply(Input::Event(UiEvent::PointerEnter(next)));
        }
        self.hovered = target;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::page::classes;
    use crossterm::event::{KeyCode, KeyModifiers};

    fn app() -> App {
        App::new(
            &PortfolioContent::default(),
            &Config::default(),
            LogBuffer::new(),
            Rect::new(0, 0, 100, 32),
        )
    }

    fn mouse(kind: MouseEventKind, column: u16, row: u16) -> MouseEvent {
        MouseEvent {
            kind,
            column,
            row,
            modifiers: KeyModifiers::NONE,
        }
    }

    #[test]
    fn test_toggling_logs_resizes_page() {
        let mut app = app();
        let full = Rect::new(0, 0, 100, 32);
        assert_eq!(app.sync_area(full).page.height, 30);
        assert_eq!(app.page().viewport.height(), 30.0 * 16.0);

        app.handle_key(KeyEvent::new(KeyCode::Char('l'), KeyModifiers::NONE));
        let screen = app.sync_area(full);
        assert!(screen.logs.is_some());
        assert_eq!(app.page().viewport.height(), f32::from(screen.page.height) * 16.0);
    }

    #[test]
    fn test_click_clears_keyboard_navigation() {
        let mut app = app();
        app.handle_key(KeyEvent::new(KeyCode::Tab, KeyModifiers::NONE));
        let doc = &app.page().document;
        let body = doc.get(doc.body()).unwrap();
        assert!(body.class_list().contains(classes::KEYBOARD_NAVIGATION));

        app.handle_mouse(mouse(MouseEventKind::Down(MouseButton::Left), 50, 20));
        let doc = &app.page().document;
        let body = doc.get(doc.body()).unwrap();
        assert!(!body.class_list().contains(classes::KEYBOARD_NAVIGATION));
    }

    #[test]
    fn test_hover_enters_and_leaves_once() {
        let mut app = app();
        let image = app
            .page()
            .layout
            .boxes
            .iter()
            .find(|b| b.kind == crate::page::BoxKind::Image)
            .cloned()
            .unwrap();
        let row = image.row as u16;

        app.handle_mouse(mouse(MouseEventKind::Moved, image.col, row));
        app.handle_mouse(mouse(MouseEventKind::Moved, image.col + 1, row));
        assert_eq!(app.hovered, Some(image.element));

        app.handle_mouse(mouse(MouseEventKind::Moved, 0, 0));
        assert_ne!(app.hovered, Some(image.element));
    }
}
