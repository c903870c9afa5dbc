// Page module - the document the interaction behaviors work on
//
// - document: element arena, class lists, inline styles, focus
// - selector: selector parsing/matching for queries and stylesheet rules
// - style: declarations, stylesheet, computed style, transitions
// - content: portfolio content (TOML) -> document tree
// - layout: cell/pixel geometry
// - viewport: scroll offset and smooth scrolling

pub mod content;
pub mod document;
pub mod layout;
pub mod selector;
pub mod style;
pub mod viewport;

pub use content::PortfolioContent;
pub use document::{Document, ElementId};
pub use layout::{BoxKind, CellMetrics, Layout, LayoutBox};
pub use selector::SelectorError;
pub use style::{
    BoxShadow, ColorValue, Outline, Rgba, StyleDeclarations, Stylesheet, Transform, Transition,
};
pub use viewport::{ScrollBehavior, Viewport};

use std::time::Duration;

/// Marker classes shared between the behaviors and the stylesheet
pub mod classes {
    pub const VISIBLE: &str = "visible";
    pub const FADE_IN: &str = "fade-in";
    pub const KEYBOARD_NAVIGATION: &str = "keyboard-navigation";
}

/// Custom property names defined by the default stylesheet
pub mod vars {
    pub const ACCENT: &str = "--accent-color";
    pub const TEXT: &str = "--text-color";
    pub const BACKGROUND: &str = "--background-color";
    pub const MUTED: &str = "--muted-color";
    pub const SHADOW: &str = "--header-shadow-color";
}

/// The page stylesheet
///
/// Defines the custom properties and the `fade-in` / `visible` pair used by
/// section reveals. The keyboard-focus rule is *not* here; it is injected at
/// runtime by the focus behavior.
pub fn default_stylesheet(accent: Rgba) -> Stylesheet {
    let mut sheet = Stylesheet::new();
    sheet.set_variable(vars::ACCENT, accent);
    sheet.set_variable(vars::TEXT, Rgba::rgb(0x33, 0x33, 0x33));
    sheet.set_variable(vars::BACKGROUND, Rgba::rgb(0xf8, 0xf9, 0xfa));
    sheet.set_variable(vars::MUTED, Rgba::rgb(0x6b, 0x72, 0x80));
    sheet.set_variable(vars::SHADOW, Rgba::rgba(0, 0, 0, 0.1));

    let rules = [
        (
            ".header",
            StyleDeclarations::new()
                .background(ColorValue::Literal(Rgba::rgba(255, 255, 255, 0.9)))
                .box_shadow(BoxShadow::None),
        ),
        ("*:focus", StyleDeclarations::new().outline(Outline::None)),
        (
            ".fade-in",
            StyleDeclarations::new()
                .opacity(0.0)
                .transform(Transform::translate_y(30.0))
                .transition(Transition::fade_and_move(Duration::from_millis(600))),
        ),
        (
            ".fade-in.visible",
            StyleDeclarations::new()
                .opacity(1.0)
                .transform(Transform::IDENTITY),
        ),
    ];
    for (selector, declarations) in rules {
        let inserted = sheet.insert_rule(selector, declarations);
        debug_assert!(
            inserted.is_ok(),
            "invalid built-in rule `{}`: {:?}",
            selector,
            inserted
        );
    }
    sheet
}

/// Everything the controller needs about the rendered page
#[derive(Debug, Clone)]
pub struct Page {
    pub document: Document,
    pub viewport: Viewport,
    pub layout: Layout,
    pub metrics: CellMetrics,
}

impl Page {
    /// Build, style and lay out `content` for a `width` x `height` cell viewport
    pub fn new(
        content: &PortfolioContent,
        stylesheet: Stylesheet,
        metrics: CellMetrics,
        width: u16,
        height: u16,
        smooth_scroll: Duration,
    ) -> Self {
        let mut document = Document::new();
        *document.stylesheet_mut() = stylesheet;
        let elements = content.build(&mut document);
        tracing::debug!(
            header = %elements.header,
            hero = %elements.hero,
            sections = elements.sections.len(),
            "Page built"
        );
        let layout = Layout::compute(&mut document, metrics, width);
        let viewport = Viewport::new(
            metrics.rows_to_px(f32::from(height)),
            metrics.rows_to_px(layout.document_rows as f32),
            smooth_scroll,
        );
        Self {
            document,
            viewport,
            layout,
            metrics,
        }
    }

    /// Re-run layout after a terminal resize
    pub fn resize(&mut self, width: u16, height: u16) {
        self.layout = Layout::compute(&mut self.document, self.metrics, width);
        self.viewport.resize(
            self.metrics.rows_to_px(f32::from(height)),
            self.metrics.rows_to_px(self.layout.document_rows as f32),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_stylesheet_rules_parse() {
        let sheet = default_stylesheet(Rgba::rgb(0x25, 0x63, 0xeb));
        assert_eq!(sheet.rules().len(), 4);
        assert_eq!(sheet.variable(vars::ACCENT), Some(Rgba::rgb(0x25, 0x63, 0xeb)));
    }

    #[test]
    fn test_page_viewport_matches_layout() {
        let metrics = CellMetrics::default();
        let page = Page::new(
            &PortfolioContent::default(),
            default_stylesheet(Rgba::rgb(0, 0, 255)),
            metrics,
            100,
            30,
            Duration::from_millis(450),
        );
        assert_eq!(page.viewport.height(), 30.0 * metrics.row_height_px);
        assert_eq!(
            page.viewport.max_scroll(),
            (page.layout.document_rows as f32 - 30.0) * metrics.row_height_px
        );
    }
}
