//! Header translucency
//!
//! Scroll events only arm a frame callback; the callback reads the offset
//! current at that frame and writes the header style once.

use super::throttle::FrameThrottle;
use super::{Listener, ListenerError, PageContext, Task, UiEvent};
use crate::config::HeaderConfig;
use crate::page::{vars, BoxShadow, ColorValue, Document, ElementId, Rgba, StyleDeclarations};

const HEADER_SELECTOR: &str = ".header";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeaderVariant {
    Top,
    Scrolled,
}

impl HeaderVariant {
    /// `offset > threshold`, strictly
    pub fn for_offset(offset: f32, threshold: f32) -> Self {
        if offset > threshold {
            HeaderVariant::Scrolled
        } else {
            HeaderVariant::Top
        }
    }

    pub fn declarations(self) -> StyleDeclarations {
        match self {
            HeaderVariant::Top => StyleDeclarations::new()
                .background(ColorValue::Literal(Rgba::rgba(255, 255, 255, 0.9)))
                .box_shadow(BoxShadow::None),
            HeaderVariant::Scrolled => StyleDeclarations::new()
                .background(ColorValue::Literal(Rgba::rgba(255, 255, 255, 0.95)))
                .box_shadow(BoxShadow::Drop {
                    offset_y: 2.0,
                    blur: 20.0,
                    color: ColorValue::Var(vars::SHADOW.to_string()),
                }),
        }
    }

    /// Variant the header is currently painted with (by its committed shadow)
    pub fn of(doc: &Document) -> Option<Self> {
        let header = doc.query_selector(HEADER_SELECTOR).ok().flatten()?;
        let el = doc.get(header)?;
        Some(if el.style().committed().box_shadow.is_some() {
            HeaderVariant::Scrolled
        } else {
            HeaderVariant::Top
        })
    }

    pub fn label(self) -> &'static str {
        match self {
            HeaderVariant::Top => "top",
            HeaderVariant::Scrolled => "scrolled",
        }
    }
}

pub struct HeaderController {
    threshold: f32,
    header: Option<ElementId>,
    throttle: FrameThrottle,
    variant: Option<HeaderVariant>,
}

impl HeaderController {
    pub fn new(config: &HeaderConfig) -> Self {
        Self {
            threshold: config.threshold_px,
            header: None,
            throttle: FrameThrottle::new(),
            variant: None,
        }
    }

    fn update(&mut self, cx: &mut PageContext<'_>) {
        let Some(header) = self.header else {
            return;
        };
        let variant = HeaderVariant::for_offset(cx.viewport().scroll_top(), self.threshold);
        cx.document_mut()
            .set_inline_style(header, &variant.declarations());
        if self.variant != Some(variant) {
            tracing::debug!(variant = variant.label(), "Header variant changed");
            self.variant = Some(variant);
        }
    }
}

impl Listener for HeaderController {
    fn name(&self) -> &'static str {
        "header-translucency"
    }

    fn handle_event(
        &mut self,
        event: &UiEvent,
        cx: &mut PageContext<'_>,
    ) -> Result<(), ListenerError> {
        match event {
            UiEvent::DomContentLoaded => {
                self.header = cx.document().query_selector(HEADER_SELECTOR)?;
            }
            UiEvent::Scroll => {
                if self.header.is_some() && self.throttle.try_schedule() {
                    cx.request_animation_frame(Task::UpdateHeader);
                }
            }
            _ => {}
        }
        Ok(())
    }

    fn run_task(&mut self, task: Task, cx: &mut PageContext<'_>) -> Result<(), ListenerError> {
        if task == Task::UpdateHeader {
            self.update(cx);
            self.throttle.release();
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interaction::{Input, PageController};
    use crate::page::{default_stylesheet, CellMetrics, Page, PortfolioContent};
    use std::time::Duration;

    fn controller() -> PageController {
        let page = Page::new(
            &PortfolioContent::default(),
            default_stylesheet(Rgba::rgb(0x25, 0x63, 0xeb)),
            CellMetrics::default(),
            100,
            20,
            Duration::from_millis(450),
        );
        let mut c = PageController::new(page);
        c.register(HeaderController::new(&HeaderConfig::default()));
        c.start();
        c
    }

    fn header_background(c: &PageController) -> Option<Rgba> {
        let doc = &c.page().document;
        let header = doc.query_selector(".header").unwrap()?;
        doc.get(header)?.style().committed().background
    }

    fn scroll_to(c: &mut PageController, top: f32) {
        let current = c.page().viewport.scroll_top();
        c.apply(Input::ScrollBy(top - current));
    }

    #[test]
    fn test_threshold_is_strict() {
        assert_eq!(HeaderVariant::for_offset(100.0, 100.0), HeaderVariant::Top);
        assert_eq!(HeaderVariant::for_offset(100.5, 100.0), HeaderVariant::Scrolled);
        assert_eq!(HeaderVariant::for_offset(0.0, 100.0), HeaderVariant::Top);
    }

    #[test]
    fn test_burst_of_scrolls_coalesces_into_one_frame_update() {
        let mut c = controller();
        for top in [20.0, 60.0, 150.0, 90.0, 240.0] {
            scroll_to(&mut c, top);
            c.dispatch(UiEvent::Scroll);
        }
        assert_eq!(c.pending_frames(), 1);

        // the callback reads the offset at frame time, not at event time
        scroll_to(&mut c, 40.0);
        c.render_frame();
        assert_eq!(c.pending_frames(), 0);
        assert_eq!(header_background(&c), Some(Rgba::rgba(255, 255, 255, 0.9)));

        // next scroll arms a fresh frame
        c.dispatch(UiEvent::Scroll);
        assert_eq!(c.pending_frames(), 1);
    }

    #[test]
    fn test_header_variants_follow_offset() {
        let mut c = controller();

        scroll_to(&mut c, 100.0);
        c.tick(Duration::from_millis(16));
        assert_eq!(header_background(&c), Some(Rgba::rgba(255, 255, 255, 0.9)));

        scroll_to(&mut c, 101.0);
        c.tick(Duration::from_millis(32));
        c.tick(Duration::from_millis(48));
        assert_eq!(header_background(&c), Some(Rgba::rgba(255, 255, 255, 0.95)));
        let doc = &c.page().document;
        let header = doc.query_selector(".header").unwrap().unwrap();
        assert!(doc.get(header).unwrap().style().committed().box_shadow.is_some());
    }

    #[test]
    fn test_missing_header_is_noop() {
        let mut c = PageController::new(Page::new(
            &PortfolioContent::default(),
            default_stylesheet(Rgba::rgb(0, 0, 0)),
            CellMetrics::default(),
            100,
            20,
            Duration::from_millis(450),
        ));
        c.register(HeaderController::new(&HeaderConfig::default()));
        // no `.header` once its class is gone
        let header = c.page().document.query_selector(".header").unwrap().unwrap();
        if let Some(list) = c.page_mut().document.class_list_mut(header) {
            list.remove("header");
        }
        c.start();
        c.dispatch(UiEvent::Scroll);
        assert_eq!(c.pending_frames(), 0);
        assert_eq!(c.failures(), 0);
    }
}
