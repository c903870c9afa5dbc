//! Small page affordances: hero entrance, image hover, keyboard focus rings
//! and the global error logger.

use super::{Key, Listener, ListenerError, PageContext, Task, UiEvent};
use crate::config::{HeroConfig, HoverConfig};
use crate::page::style::TransitionProperty;
use crate::page::{
    classes, vars, ColorValue, Document, ElementId, Outline, StyleDeclarations, Transform,
    Transition,
};
use std::time::Duration;

/// Current inline transform, or identity
fn inline_transform(doc: &Document, id: ElementId) -> Transform {
    doc.get(id)
        .and_then(|el| el.inline_style().transform)
        .unwrap_or(Transform::IDENTITY)
}

/// Replace the entry for `next.property` in the inline transition list
fn merged_transition(doc: &Document, id: ElementId, next: Transition) -> Vec<Transition> {
    let mut list = doc
        .get(id)
        .and_then(|el| el.inline_style().transition.clone())
        .unwrap_or_default();
    list.retain(|t| t.property != next.property);
    list.push(next);
    list
}

// ─────────────────────────────────────────────────────────────────────────────
// Hero entrance
// ─────────────────────────────────────────────────────────────────────────────

const HERO_SELECTOR: &str = ".hero-catchcopy, .hero-name, .profile-image";

/// Fades the hero in after `load`, one element after another
pub struct HeroEntrance {
    delay: Duration,
    stagger: Duration,
    transition: Duration,
    elements: Vec<ElementId>,
    started: bool,
}

impl HeroEntrance {
    pub fn new(config: &HeroConfig) -> Self {
        Self {
            delay: Duration::from_millis(config.delay_ms),
            stagger: Duration::from_millis(config.stagger_ms),
            transition: Duration::from_millis(config.transition_ms),
            elements: Vec::new(),
            started: false,
        }
    }
}

impl Listener for HeroEntrance {
    fn name(&self) -> &'static str {
        "hero-entrance"
    }

    fn handle_event(
        &mut self,
        event: &UiEvent,
        cx: &mut PageContext<'_>,
    ) -> Result<(), ListenerError> {
        match event {
            UiEvent::DomContentLoaded => {
                self.elements = cx.document().query_selector_all(HERO_SELECTOR)?;
                let hidden = StyleDeclarations::new()
                    .opacity(0.0)
                    .transform(Transform::translate_y(30.0))
                    .transition(Transition::fade_and_move(self.transition));
                for &id in &self.elements {
                    cx.document_mut().set_inline_style(id, &hidden);
                }
            }
            UiEvent::Load if !self.started => {
                self.started = true;
                cx.set_timeout(self.delay, Task::StartHeroEntrance);
            }
            _ => {}
        }
        Ok(())
    }

    fn run_task(&mut self, task: Task, cx: &mut PageContext<'_>) -> Result<(), ListenerError> {
        match task {
            Task::StartHeroEntrance => {
                tracing::debug!(elements = self.elements.len(), "Hero entrance");
                for (i, &id) in self.elements.iter().enumerate() {
                    let delay = self.stagger * u32::try_from(i).unwrap_or(u32::MAX);
                    cx.set_timeout(delay, Task::RevealHero(id));
                }
            }
            Task::RevealHero(id) => {
                let doc = cx.document_mut();
                // keep any hover scale
                let transform = Transform {
                    translate_y: 0.0,
                    ..inline_transform(doc, id)
                };
                doc.set_inline_style(
                    id,
                    &StyleDeclarations::new().opacity(1.0).transform(transform),
                );
            }
            _ => {}
        }
        Ok(())
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Hover scale
// ─────────────────────────────────────────────────────────────────────────────

const HOVER_SELECTOR: &str = ".profile-image";

pub struct HoverScale {
    scale: f32,
    transition: Duration,
    targets: Vec<ElementId>,
}

impl HoverScale {
    pub fn new(config: &HoverConfig) -> Self {
        Self {
            scale: config.scale,
            transition: Duration::from_millis(config.transition_ms),
            targets: Vec::new(),
        }
    }

    fn set_scale(&self, cx: &mut PageContext<'_>, id: ElementId, scale: f32) {
        let doc = cx.document_mut();
        let transform = inline_transform(doc, id).with_scale(scale);
        let transition = merged_transition(
            doc,
            id,
            Transition::new(TransitionProperty::Transform, self.transition),
        );
        doc.set_inline_style(
            id,
            &StyleDeclarations::new()
                .transform(transform)
                .transition(transition),
        );
    }
}

impl Listener for HoverScale {
    fn name(&self) -> &'static str {
        "hover-scale"
    }

    fn handle_event(
        &mut self,
        event: &UiEvent,
        cx: &mut PageContext<'_>,
    ) -> Result<(), ListenerError> {
        match event {
            UiEvent::DomContentLoaded => {
                self.targets = cx.document().query_selector_all(HOVER_SELECTOR)?;
            }
            UiEvent::PointerEnter(id) if self.targets.contains(id) => {
                self.set_scale(cx, *id, self.scale);
            }
            UiEvent::PointerLeave(id) if self.targets.contains(id) => {
                self.set_scale(cx, *id, 1.0);
            }
            _ => {}
        }
        Ok(())
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Keyboard focus
// ─────────────────────────────────────────────────────────────────────────────

const FOCUS_RULE_SELECTOR: &str = "body.keyboard-navigation *:focus";

/// Shows focus outlines only while the user navigates with the keyboard
#[derive(Default)]
pub struct KeyboardFocus;

impl KeyboardFocus {
    pub fn new() -> Self {
        Self
    }
}

impl Listener for KeyboardFocus {
    fn name(&self) -> &'static str {
        "keyboard-focus"
    }

    fn handle_event(
        &mut self,
        event: &UiEvent,
        cx: &mut PageContext<'_>,
    ) -> Result<(), ListenerError> {
        match event {
            UiEvent::DomContentLoaded => {
                cx.document_mut().stylesheet_mut().insert_rule(
                    FOCUS_RULE_SELECTOR,
                    StyleDeclarations::new().outline(Outline::Solid {
                        width: 2.0,
                        color: ColorValue::Var(vars::ACCENT.to_string()),
                    }),
                )?;
            }
            UiEvent::KeyDown(Key::Tab | Key::BackTab) => {
                let doc = cx.document_mut();
                let body = doc.body();
                if let Some(list) = doc.class_list_mut(body) {
                    list.add(classes::KEYBOARD_NAVIGATION);
                }
            }
            UiEvent::PointerDown(_) => {
                let doc = cx.document_mut();
                let body = doc.body();
                if let Some(list) = doc.class_list_mut(body) {
                    list.remove(classes::KEYBOARD_NAVIGATION);
                }
            }
            _ => {}
        }
        Ok(())
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Error capture
// ─────────────────────────────────────────────────────────────────────────────

/// Global `error` listener; logs and moves on
#[derive(Default)]
pub struct ErrorCapture {
    reported: u64,
}

impl ErrorCapture {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Listener for ErrorCapture {
    fn name(&self) -> &'static str {
        "error-capture"
    }

    fn handle_event(
        &mut self,
        event: &UiEvent,
        _cx: &mut PageContext<'_>,
    ) -> Result<(), ListenerError> {
        if let UiEvent::Error(report) = event {
            self.reported += 1;
            tracing::error!(
                source = %report.source,
                count = self.reported,
                "Page error: {}",
                report.message
            );
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interaction::{ErrorReport, PageController};
    use crate::page::{default_stylesheet, CellMetrics, Page, PortfolioContent, Rgba};

    fn ms(v: u64) -> Duration {
        Duration::from_millis(v)
    }

    fn controller(listener: impl Listener + 'static) -> PageController {
        let page = Page::new(
            &PortfolioContent::default(),
            default_stylesheet(Rgba::rgb(0x25, 0x63, 0xeb)),
            CellMetrics::default(),
            100,
            30,
            ms(450),
        );
        let mut c = PageController::new(page);
        c.register(listener);
        c.start();
        c
    }

    fn committed_opacity(c: &PageController, id: ElementId) -> f32 {
        c.page().document.get(id).unwrap().style().committed().opacity
    }

    fn has_keyboard_class(c: &PageController) -> bool {
        let doc = &c.page().document;
        doc.get(doc.body())
            .unwrap()
            .class_list()
            .contains(classes::KEYBOARD_NAVIGATION)
    }

    #[test]
    fn test_hero_reveals_after_delay_with_stagger() {
        let mut c = controller(HeroEntrance::new(&HeroConfig::default()));
        let hero = c.page().document.query_selector_all(HERO_SELECTOR).unwrap();
        assert_eq!(hero.len(), 3);
        assert!(hero.iter().all(|&id| committed_opacity(&c, id) == 0.0));

        c.tick(ms(299));
        assert!(hero.iter().all(|&id| committed_opacity(&c, id) == 0.0));

        c.tick(ms(300));
        assert_eq!(committed_opacity(&c, hero[0]), 1.0);
        assert_eq!(committed_opacity(&c, hero[1]), 0.0);

        c.tick(ms(500));
        assert_eq!(committed_opacity(&c, hero[1]), 1.0);
        assert_eq!(committed_opacity(&c, hero[2]), 0.0);

        c.tick(ms(700));
        assert_eq!(committed_opacity(&c, hero[2]), 1.0);
    }

    #[test]
    fn test_hover_scales_and_keeps_translate() {
        let mut c = controller(HoverScale::new(&HoverConfig::default()));
        let image = c
            .page()
            .document
            .query_selector(".profile-image")
            .unwrap()
            .unwrap();
        c.page_mut().document.set_inline_style(
            image,
            &StyleDeclarations::new().transform(Transform::translate_y(12.0)),
        );

        c.dispatch(UiEvent::PointerEnter(image));
        c.tick(ms(16));
        let committed = c.page().document.get(image).unwrap().style().committed().clone();
        assert_eq!(committed.transform.scale, 1.05);
        assert_eq!(committed.transform.translate_y, 12.0);
        assert!(committed
            .transition
            .iter()
            .any(|t| t.property == TransitionProperty::Transform && t.duration == ms(300)));

        c.dispatch(UiEvent::PointerLeave(image));
        c.tick(ms(32));
        let committed = c.page().document.get(image).unwrap().style().committed().clone();
        assert_eq!(committed.transform.scale, 1.0);
    }

    #[test]
    fn test_tab_then_pointer_toggles_keyboard_navigation() {
        let mut c = controller(KeyboardFocus::new());
        assert!(!has_keyboard_class(&c));

        for _ in 0..3 {
            c.dispatch(UiEvent::KeyDown(Key::Tab));
        }
        assert!(has_keyboard_class(&c));

        c.dispatch(UiEvent::PointerDown(None));
        assert!(!has_keyboard_class(&c));

        // other keys leave it alone
        c.dispatch(UiEvent::KeyDown(Key::Char('a')));
        assert!(!has_keyboard_class(&c));
    }

    #[test]
    fn test_focus_outline_only_in_keyboard_mode() {
        let mut c = controller(KeyboardFocus::new());
        let link = c.page().document.focusable()[0];

        // focus by pointer: no outline
        c.dispatch(UiEvent::PointerDown(Some(link)));
        c.tick(ms(16));
        let style = c.page().document.get(link).unwrap().style().committed().clone();
        assert_eq!(c.page().document.focused(), Some(link));
        assert!(style.outline.is_none());

        // focus by keyboard: accent outline
        c.dispatch(UiEvent::KeyDown(Key::BackTab));
        c.tick(ms(32));
        let focused = c.page().document.focused().unwrap();
        let outline = c
            .page()
            .document
            .get(focused)
            .unwrap()
            .style()
            .committed()
            .outline
            .expect("outline");
        assert_eq!(outline.width, 2.0);
        assert_eq!(outline.color, Rgba::rgb(0x25, 0x63, 0xeb));
    }

    #[test]
    fn test_error_reports_are_absorbed() {
        let mut c = controller(ErrorCapture::new());
        let report = ErrorReport {
            source: "page".to_string(),
            message: "ReferenceError: x is not defined".to_string(),
        };
        c.dispatch(UiEvent::Error(report));
        assert_eq!(c.failures(), 0);
    }
}
