// Demo mode: a scripted tour of the page
//
// The tour behaves like a visitor: waits for the hero entrance, hovers the
// profile image, scrolls, follows nav links, tabs through the header and
// clicks back into the page. It is an `EventSource`, so the same listeners run
// under it and under the terminal.
//
// Run with: FOLIO_DEMO=1 folio   (or `folio --demo`, `folio --headless`)

use crate::config::Config;
use crate::interaction::{self, EventSource, HeaderVariant, Input, Key, UiEvent};
use crate::page::{default_stylesheet, ElementId, Page, PortfolioContent};
use std::time::Duration;

/// Terminal size assumed when no terminal is attached
const HEADLESS_WIDTH: u16 = 100;
const HEADLESS_HEIGHT: u16 = 30;

/// Upper bound on frames rendered after the script ends while the page
/// settles
const SETTLE: Duration = Duration::from_millis(1500);

const REVEALED_SELECTOR: &str = ".section, .work-card, .experience-tag";

#[derive(Debug, Clone, Copy, PartialEq)]
enum Step {
    /// Wheel scroll in CSS pixels
    Scroll(f32),
    /// Click the n-th nav link (0-based)
    ClickNav(usize),
    Key(Key),
    /// Click on empty space
    PointerDown,
    HoverProfile(bool),
}

/// (milliseconds after the tour starts, step)
const TOUR: &[(u64, Step)] = &[
    (1400, Step::HoverProfile(true)),
    (1900, Step::HoverProfile(false)),
    (2400, Step::Scroll(160.0)),
    (2700, Step::Scroll(160.0)),
    (3000, Step::Scroll(160.0)),
    (3600, Step::ClickNav(1)),
    (4600, Step::ClickNav(2)),
    (5600, Step::Key(Key::Tab)),
    (5900, Step::Key(Key::Tab)),
    (6200, Step::Key(Key::Enter)),
    (7200, Step::PointerDown),
    (7600, Step::ClickNav(3)),
    (8800, Step::Scroll(-100_000.0)),
];

/// Scripted input source
pub struct DemoSource {
    next: usize,
    origin: Option<Duration>,
}

impl DemoSource {
    pub fn new() -> Self {
        Self {
            next: 0,
            origin: None,
        }
    }

    fn inputs_for(step: Step, page: &Page) -> Vec<Input> {
        let doc = &page.document;
        match step {
            Step::Scroll(delta) => vec![Input::ScrollBy(delta)],
            Step::Key(key) => vec![Input::Event(UiEvent::KeyDown(key))],
            Step::PointerDown => vec![Input::Event(UiEvent::PointerDown(None))],
            Step::ClickNav(n) => {
                let link: Option<ElementId> = doc
                    .query_selector_all(".nav-link")
                    .ok()
                    .and_then(|links| links.get(n).copied());
                match link {
                    Some(link) => vec![
                        Input::Event(UiEvent::PointerDown(Some(link))),
                        Input::Event(UiEvent::Click(link)),
                    ],
                    None => {
                        tracing::debug!(index = n, "Tour skips missing nav link");
                        Vec::new()
                    }
                }
            }
            Step::HoverProfile(enter) => {
                let Some(image) = doc.query_selector(".profile-image").ok().flatten() else {
                    return Vec::new();
                };
                let event = if enter {
                    UiEvent::PointerEnter(image)
                } else {
                    UiEvent::PointerLeave(image)
                };
                vec![Input::Event(event)]
            }
        }
    }
}

impl Default for DemoSource {
    fn default() -> Self {
        Self::new()
    }
}

impl EventSource for DemoSource {
    fn poll(&mut self, page: &Page, now: Duration) -> Vec<Input> {
        let origin = *self.origin.get_or_insert(now);
        let elapsed = now.saturating_sub(origin);

        let mut inputs = Vec::new();
        while let Some(&(at, step)) = TOUR.get(self.next) {
            if Duration::from_millis(at) > elapsed {
                break;
            }
            tracing::debug!(step = ?step, "Tour step");
            inputs.extend(Self::inputs_for(step, page));
            self.next += 1;
        }
        inputs
    }

    fn is_finished(&self) -> bool {
        self.next >= TOUR.len()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Headless run
// ─────────────────────────────────────────────────────────────────────────────

/// What the page looked like when a headless tour ended
#[derive(Debug, Clone, PartialEq)]
pub struct TourSummary {
    pub frames: u64,
    /// Reveal targets fully shown
    pub revealed: usize,
    pub failures: u64,
    pub scroll_top: f32,
    pub header: HeaderVariant,
}

/// Run the tour on a virtual clock, one frame per `frame_interval`
pub fn run_headless(content: &PortfolioContent, config: &Config) -> TourSummary {
    let page = Page::new(
        content,
        default_stylesheet(config.accent_color()),
        config.cell_metrics(),
        HEADLESS_WIDTH,
        HEADLESS_HEIGHT,
        config.smooth_scroll(),
    );
    let mut controller = interaction::controller_for(page, config);
    let mut source = DemoSource::new();
    controller.start();

    let step = config.frame_interval();
    let mut now = Duration::ZERO;
    let mut frames = 0u64;
    let mut finished_at = None;

    'frames: loop {
        for input in source.poll(controller.page(), now) {
            if input == Input::Quit {
                break 'frames;
            }
            controller.apply(input);
        }
        controller.tick(now);
        frames += 1;

        if source.is_finished() {
            let end = *finished_at.get_or_insert(now);
            let settled = !controller.is_animating() && controller.pending_timers() == 0;
            if settled || now >= end + SETTLE {
                break;
            }
        }
        now += step;
    }

    let doc = &controller.page().document;
    let revealed = doc
        .query_selector_all(REVEALED_SELECTOR)
        .unwrap_or_default()
        .into_iter()
        .filter(|&id| {
            doc.get(id)
                .is_some_and(|el| el.style().committed().opacity >= 1.0)
        })
        .count();

    TourSummary {
        frames,
        revealed,
        failures: controller.failures(),
        scroll_top: controller.page().viewport.scroll_top(),
        header: HeaderVariant::of(doc).unwrap_or(HeaderVariant::Top),
    }
}
