//! One-shot scroll reveal animations
//!
//! Each group hides its elements at startup and watches them. The first time
//! an element intersects the viewport it is unobserved, recorded as revealed
//! and scheduled to animate in, staggered by its position in the batch.

use super::intersection::IntersectionWatcher;
use super::{Listener, ListenerError, PageContext, Task, UiEvent};
use crate::config::{RevealConfig, RevealGroupConfig};
use crate::page::{classes, ElementId, StyleDeclarations, Transform, Transition};
use std::collections::HashSet;
use std::time::Duration;

/// How a group hides and shows its elements
#[derive(Debug, Clone)]
enum RevealStyle {
    /// Marker classes defined by the stylesheet
    Class { hidden: &'static str, shown: &'static str },
    /// Inline styles written by the animator
    Inline {
        hidden: StyleDeclarations,
        shown: StyleDeclarations,
    },
}

#[derive(Debug)]
struct RevealGroup {
    name: &'static str,
    selector: &'static str,
    style: RevealStyle,
    transition: Duration,
    stagger: Duration,
    watcher: IntersectionWatcher,
}

impl RevealGroup {
    fn new(
        name: &'static str,
        selector: &'static str,
        style: RevealStyle,
        config: &RevealGroupConfig,
    ) -> Self {
        Self {
            name,
            selector,
            style,
            transition: Duration::from_millis(config.transition_ms),
            stagger: Duration::from_millis(config.stagger_ms),
            watcher: IntersectionWatcher::new(config.threshold, config.bottom_margin_px),
        }
    }
}

pub struct ScrollRevealAnimator {
    groups: Vec<RevealGroup>,
    revealed: HashSet<ElementId>,
}

impl ScrollRevealAnimator {
    pub fn new(config: &RevealConfig) -> Self {
        let groups = vec![
            RevealGroup::new(
                "sections",
                ".section",
                RevealStyle::Class {
                    hidden: classes::FADE_IN,
                    shown: classes::VISIBLE,
                },
                &config.sections,
            ),
            RevealGroup::new(
                "cards",
                ".work-card",
                RevealStyle::Inline {
                    hidden: StyleDeclarations::new()
                        .opacity(0.0)
                        .transform(Transform::translate_y(30.0)),
                    shown: StyleDeclarations::new()
                        .opacity(1.0)
                        .transform(Transform::IDENTITY),
                },
                &config.cards,
            ),
            RevealGroup::new(
                "tags",
                ".experience-tag",
                RevealStyle::Inline {
                    hidden: StyleDeclarations::new()
                        .opacity(0.0)
                        .transform(Transform::translate_y(20.0).with_scale(0.9)),
                    shown: StyleDeclarations::new()
                        .opacity(1.0)
                        .transform(Transform::IDENTITY),
                },
                &config.tags,
            ),
        ];
        Self {
            groups,
            revealed: HashSet::new(),
        }
    }

    fn prepare(&mut self, cx: &mut PageContext<'_>) -> Result<(), ListenerError> {
        let mut claimed = HashSet::new();
        for group in &mut self.groups {
            let targets = cx.document().query_selector_all(group.selector)?;
            let mut count = 0;
            for id in targets {
                // first group wins
                if !claimed.insert(id) {
                    continue;
                }
                let transition = StyleDeclarations::new()
                    .transition(Transition::fade_and_move(group.transition));
                let doc = cx.document_mut();
                match &group.style {
                    RevealStyle::Class { hidden, .. } => {
                        if let Some(list) = doc.class_list_mut(id) {
                            list.add(hidden);
                        }
                    }
                    RevealStyle::Inline { hidden, .. } => {
                        doc.set_inline_style(id, hidden);
                    }
                }
                doc.set_inline_style(id, &transition);
                group.watcher.observe(id);
                count += 1;
            }
            tracing::debug!(group = group.name, elements = count, "Reveal group armed");
        }
        Ok(())
    }

    fn show(&self, group: usize, element: ElementId, cx: &mut PageContext<'_>) {
        let Some(group) = self.groups.get(group) else {
            return;
        };
        let doc = cx.document_mut();
        match &group.style {
            RevealStyle::Class { shown, .. } => {
                if let Some(list) = doc.class_list_mut(element) {
                    list.add(shown);
                }
            }
            RevealStyle::Inline { shown, .. } => {
                doc.set_inline_style(element, shown);
            }
        }
        tracing::debug!(group = group.name, %element, "Revealed");
    }
}

impl Listener for ScrollRevealAnimator {
    fn name(&self) -> &'static str {
        "scroll-reveal"
    }

    fn handle_event(
        &mut self,
        event: &UiEvent,
        cx: &mut PageContext<'_>,
    ) -> Result<(), ListenerError> {
        if *event == UiEvent::DomContentLoaded {
            self.prepare(cx)?;
        }
        Ok(())
    }

    fn after_frame(&mut self, cx: &mut PageContext<'_>) -> Result<(), ListenerError> {
        for index in 0..self.groups.len() {
            let entries = {
                let group = &mut self.groups[index];
                group.watcher.check(cx.document(), cx.viewport())
            };
            let stagger = self.groups[index].stagger;

            // stagger slot counts intersecting entries only
            let mut position = 0u32;
            for entry in entries.iter().filter(|e| e.is_intersecting) {
                self.groups[index].watcher.unobserve(entry.target);
                if !self.revealed.insert(entry.target) {
                    continue;
                }
                let delay = stagger * position;
                position += 1;
                if delay.is_zero() {
                    self.show(index, entry.target, cx);
                } else {
                    cx.set_timeout(
                        delay,
                        Task::Reveal {
                            group: index,
                            element: entry.target,
                        },
                    );
                }
            }
        }
        Ok(())
    }

    fn run_task(&mut self, task: Task, cx: &mut PageContext<'_>) -> Result<(), ListenerError> {
        if let Task::Reveal { group, element } = task {
            self.show(group, element, cx);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interaction::PageController;
    use crate::page::{default_stylesheet, CellMetrics, Page, PortfolioContent, Rgba};

    fn ms(v: u64) -> Duration {
        Duration::from_millis(v)
    }

    fn controller() -> PageController {
        let page = Page::new(
            &PortfolioContent::default(),
            default_stylesheet(Rgba::rgb(0x25, 0x63, 0xeb)),
            CellMetrics::default(),
            100,
            20,
            ms(450),
        );
        let mut c = PageController::new(page);
        c.register(ScrollRevealAnimator::new(&RevealConfig::default()));
        c.start();
        c
    }

    fn opacity(c: &PageController, id: ElementId) -> f32 {
        c.page()
            .document
            .get(id)
            .map(|e| e.style().committed().opacity)
            .unwrap_or_default()
    }

    fn scroll_to(c: &mut PageController, top: f32, now: Duration) {
        let current = c.page().viewport.scroll_top();
        c.apply(crate::interaction::Input::ScrollBy(top - current));
        c.tick(now);
    }

    #[test]
    fn test_elements_start_hidden() {
        let c = controller();
        let cards = c.page().document.query_selector_all(".work-card").unwrap();
        let sections = c.page().document.query_selector_all(".section").unwrap();
        for id in cards.iter().chain(&sections) {
            assert_eq!(opacity(&c, *id), 0.0);
        }
        let first = c.page().document.get(sections[0]).unwrap();
        assert!(first.class_list().contains(classes::FADE_IN));
        assert!(!first.class_list().contains(classes::VISIBLE));
    }

    #[test]
    fn test_cards_reveal_staggered_when_scrolled_into_view() {
        let mut c = controller();
        let cards = c.page().document.query_selector_all(".work-card").unwrap();
        let top = c.page().document.get(cards[0]).unwrap().offset_top();

        scroll_to(&mut c, top - 100.0, ms(16));
        // index 0 goes immediately, the rest wait for their stagger
        assert_eq!(opacity(&c, cards[0]), 1.0);

        c.tick(ms(16 + 100));
        c.tick(ms(16 + 300));
        let visible_now: Vec<_> = cards.iter().filter(|&&id| opacity(&c, id) == 1.0).collect();
        assert!(visible_now.len() >= 2);
    }

    #[test]
    fn test_reveal_applied_at_most_once() {
        let mut c = controller();
        let cards = c.page().document.query_selector_all(".work-card").unwrap();
        let card = cards[0];
        let top = c.page().document.get(card).unwrap().offset_top();

        scroll_to(&mut c, top - 100.0, ms(16));
        assert_eq!(opacity(&c, card), 1.0);

        // something else hides it again; leaving and re-entering must not
        // re-run the reveal
        c.page_mut()
            .document
            .set_inline_style(card, &StyleDeclarations::new().opacity(0.2));
        scroll_to(&mut c, 0.0, ms(1000));
        scroll_to(&mut c, top - 100.0, ms(2000));
        c.tick(ms(3000));
        assert_eq!(opacity(&c, card), 0.2);
    }

    #[test]
    fn test_sections_reveal_by_class() {
        let mut c = controller();
        let last = *c
            .page()
            .document
            .query_selector_all(".section")
            .unwrap()
            .last()
            .unwrap();
        c.tick(ms(16));
        assert!(!c.page().document.get(last).unwrap().class_list().contains(classes::VISIBLE));

        let max = c.page().viewport.max_scroll();
        scroll_to(&mut c, max, ms(32));
        let el = c.page().document.get(last).unwrap();
        assert!(el.class_list().contains(classes::VISIBLE));
    }
}
