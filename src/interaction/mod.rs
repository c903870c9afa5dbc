// Interaction module - page behaviors and the controller that drives them
//
// Behaviors are `Listener`s registered in order against a `PageController`.
// The controller owns the page, a virtual-clock scheduler and the dispatch
// loop; input arrives from an `EventSource` (terminal or scripted demo).
//
// - controller: dispatch, default actions, frame processing, failure capture
// - scheduler: timeouts and animation-frame callbacks
// - throttle: one-update-per-frame latch
// - intersection: viewport intersection watching
// - navigation / reveal / header / effects: the behaviors

pub mod controller;
pub mod effects;
pub mod header;
pub mod intersection;
pub mod navigation;
pub mod reveal;
pub mod scheduler;
pub mod throttle;

pub use controller::{PageContext, PageController};
pub use effects::{ErrorCapture, HeroEntrance, HoverScale, KeyboardFocus};
pub use header::{HeaderController, HeaderVariant};
pub use navigation::SmoothScrollNavigator;
pub use reveal::ScrollRevealAnimator;

use crate::config::Config;
use crate::page::{ElementId, Page, SelectorError};
use std::fmt;
use std::time::Duration;
use thiserror::Error;

// ─────────────────────────────────────────────────────────────────────────────
// Events
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Tab,
    BackTab,
    Enter,
    Escape,
    Char(char),
    Other,
}

/// A failure surfaced to the page's global error listeners
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorReport {
    /// Where it happened (listener name or "page")
    pub source: String,
    pub message: String,
}

impl fmt::Display for ErrorReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.source, self.message)
    }
}

/// Events delivered to listeners
#[derive(Debug, Clone, PartialEq)]
pub enum UiEvent {
    DomContentLoaded,
    Load,
    Click(ElementId),
    Scroll,
    KeyDown(Key),
    /// `None` when the pointer went down outside any element
    PointerDown(Option<ElementId>),
    PointerEnter(ElementId),
    PointerLeave(ElementId),
    Resize,
    Error(ErrorReport),
}

impl UiEvent {
    pub fn name(&self) -> &'static str {
        match self {
            UiEvent::DomContentLoaded => "DOMContentLoaded",
            UiEvent::Load => "load",
            UiEvent::Click(_) => "click",
            UiEvent::Scroll => "scroll",
            UiEvent::KeyDown(_) => "keydown",
            UiEvent::PointerDown(_) => "pointerdown",
            UiEvent::PointerEnter(_) => "pointerenter",
            UiEvent::PointerLeave(_) => "pointerleave",
            UiEvent::Resize => "resize",
            UiEvent::Error(_) => "error",
        }
    }
}

/// What an event source feeds the controller
#[derive(Debug, Clone, PartialEq)]
pub enum Input {
    Event(UiEvent),
    /// User scrolling (wheel, arrow keys) in CSS pixels
    ScrollBy(f32),
    /// Terminal resized to `width` x `height` cells
    Resize { width: u16, height: u16 },
    Quit,
}

/// Source of input for the controller
///
/// Polled once per frame with the current virtual time.
pub trait EventSource {
    fn poll(&mut self, page: &Page, now: Duration) -> Vec<Input>;

    /// A finished source produces no further input
    fn is_finished(&self) -> bool {
        false
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Listeners
// ─────────────────────────────────────────────────────────────────────────────

/// Deferred work a listener scheduled for itself
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Task {
    Reveal { group: usize, element: ElementId },
    UpdateHeader,
    StartHeroEntrance,
    RevealHero(ElementId),
}

#[derive(Debug, Error)]
pub enum ListenerError {
    #[error("invalid selector: {0}")]
    Selector(#[from] SelectorError),
}

/// A page behavior
///
/// Every hook runs to completion. Errors and panics are caught by the
/// controller and reported; they never stop other listeners.
pub trait Listener {
    fn name(&self) -> &'static str;

    fn handle_event(
        &mut self,
        event: &UiEvent,
        cx: &mut PageContext<'_>,
    ) -> Result<(), ListenerError>;

    /// A timeout or animation frame requested by this listener fired
    fn run_task(&mut self, task: Task, cx: &mut PageContext<'_>) -> Result<(), ListenerError> {
        let _ = (task, cx);
        Ok(())
    }

    /// Runs once per rendered frame after animation-frame callbacks
    fn after_frame(&mut self, cx: &mut PageContext<'_>) -> Result<(), ListenerError> {
        let _ = cx;
        Ok(())
    }
}

/// Build a controller for `page` with every behavior registered
pub fn controller_for(page: Page, config: &Config) -> PageController {
    let mut controller = PageController::new(page);
    controller.register(SmoothScrollNavigator::new(&config.navigation));
    controller.register(ScrollRevealAnimator::new(&config.reveal));
    controller.register(HeaderController::new(&config.header));
    controller.register(HeroEntrance::new(&config.hero));
    controller.register(HoverScale::new(&config.hover));
    controller.register(KeyboardFocus::new());
    controller.register(ErrorCapture::new());
    controller
}
