//! Smooth anchor scrolling for in-page navigation links

use super::{Listener, ListenerError, PageContext, UiEvent};
use crate::config::NavigationConfig;
use crate::page::{ElementId, ScrollBehavior};

const LINK_SELECTOR: &str = ".nav-link";
const HEADER_SELECTOR: &str = ".header";

/// Intercepts clicks on `.nav-link[href^="#"]` and smooth-scrolls so the
/// target clears the fixed header.
pub struct SmoothScrollNavigator {
    scroll_margin: f32,
    links: Vec<ElementId>,
    header: Option<ElementId>,
}

impl SmoothScrollNavigator {
    pub fn new(config: &NavigationConfig) -> Self {
        Self {
            scroll_margin: config.scroll_margin_px,
            links: Vec::new(),
            header: None,
        }
    }

    /// Scroll target for `fragment`, or None if the target or header is missing
    fn destination(&self, cx: &PageContext<'_>, fragment: &str) -> Option<f32> {
        let doc = cx.document();
        let target = doc.get(doc.get_element_by_id(fragment)?)?;
        let header = doc.get(self.header?)?;
        Some(target.offset_top() - header.offset_height() - self.scroll_margin)
    }
}

impl Listener for SmoothScrollNavigator {
    fn name(&self) -> &'static str {
        "smooth-scroll"
    }

    fn handle_event(
        &mut self,
        event: &UiEvent,
        cx: &mut PageContext<'_>,
    ) -> Result<(), ListenerError> {
        match event {
            UiEvent::DomContentLoaded => {
                let doc = cx.document();
                self.header = doc.query_selector(HEADER_SELECTOR)?;
                self.links = doc
                    .query_selector_all(LINK_SELECTOR)?
                    .into_iter()
                    .filter(|&id| {
                        doc.get(id)
                            .and_then(|el| el.attr("href"))
                            .is_some_and(|href| href.starts_with('#'))
                    })
                    .collect();
                tracing::debug!(links = self.links.len(), "Navigation links wired");
            }
            UiEvent::Click(target) if self.links.contains(target) => {
                cx.prevent_default();
                let Some(fragment) = cx
                    .document()
                    .get(*target)
                    .and_then(|el| el.attr("href"))
                    .map(|href| href.trim_start_matches('#').to_string())
                else {
                    return Ok(());
                };
                let Some(top) = self.destination(cx, &fragment) else {
                    tracing::debug!(fragment = %fragment, "Navigation target missing");
                    return Ok(());
                };
                let now = cx.now();
                cx.viewport_mut().scroll_to(top, ScrollBehavior::Smooth, now);
                tracing::debug!(fragment = %fragment, top, "Smooth scroll");
            }
            _ => {}
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interaction::PageController;
    use crate::page::{default_stylesheet, CellMetrics, Page, PortfolioContent, Rgba};
    use std::time::Duration;

    fn controller(content: &PortfolioContent, margin: f32) -> PageController {
        let page = Page::new(
            content,
            default_stylesheet(Rgba::rgb(0x25, 0x63, 0xeb)),
            CellMetrics::default(),
            100,
            20,
            Duration::from_millis(450),
        );
        let mut c = PageController::new(page);
        c.register(SmoothScrollNavigator::new(&NavigationConfig {
            scroll_margin_px: margin,
            ..NavigationConfig::default()
        }));
        c.start();
        c
    }

    fn nav_link(c: &PageController, href: &str) -> ElementId {
        let doc = &c.page().document;
        doc.query_selector_all(".nav-link")
            .unwrap()
            .into_iter()
            .find(|&id| doc.get(id).and_then(|e| e.attr("href")) == Some(href))
            .unwrap()
    }

    #[test]
    fn test_click_scrolls_below_header() {
        for margin in [0.0, 20.0] {
            let mut c = controller(&PortfolioContent::default(), margin);
            let link = nav_link(&c, "#works");
            let doc = &c.page().document;
            let target = doc.get_element_by_id("works").unwrap();
            let header = doc.query_selector(".header").unwrap().unwrap();
            let expected = doc.get(target).unwrap().offset_top()
                - doc.get(header).unwrap().offset_height()
                - margin;

            let prevented = c.dispatch(UiEvent::Click(link));
            assert!(prevented);
            // smooth: nothing moves until time passes
            assert_eq!(c.page().viewport.scroll_top(), 0.0);

            c.tick(Duration::from_millis(1000));
            let expected = expected.clamp(0.0, c.page().viewport.max_scroll());
            assert_eq!(c.page().viewport.scroll_top(), expected);
        }
    }

    #[test]
    fn test_missing_target_is_silent() {
        let mut content = PortfolioContent::default();
        content.nav[0].href = "#nowhere".into();
        let mut c = controller(&content, 0.0);
        let link = nav_link(&c, "#nowhere");

        c.dispatch(UiEvent::Click(link));
        c.tick(Duration::from_millis(1000));
        assert_eq!(c.page().viewport.scroll_top(), 0.0);
        assert_eq!(c.failures(), 0);
    }

    #[test]
    fn test_external_links_are_left_alone() {
        let mut content = PortfolioContent::default();
        content.nav[0].href = "https://example.com".into();
        let mut c = controller(&content, 0.0);
        let link = nav_link(&c, "https://example.com");
        assert!(!c.dispatch(UiEvent::Click(link)));
    }
}
