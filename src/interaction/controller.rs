//! Page controller
//!
//! Owns the page and the scheduler, dispatches events to listeners in
//! registration order and performs the browser's default actions. Each frame:
//!
//! 1. advance the smooth-scroll animation (emitting `scroll`)
//! 2. run due timeouts
//! 3. run this frame's animation-frame callbacks
//! 4. let listeners inspect the frame (intersection delivery)
//! 5. commit styles
//!
//! A listener that errors or panics is reported through an `error` event and
//! dispatch carries on with the next listener.

use super::scheduler::Scheduler;
use super::{ErrorReport, Input, Key, Listener, ListenerError, Task, UiEvent};
use crate::page::{Document, ElementId, Page, ScrollBehavior, Viewport};
use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListenerId(usize);

type Scheduled = (ListenerId, Task);

/// What a listener sees while one of its hooks runs
pub struct PageContext<'a> {
    page: &'a mut Page,
    scheduler: &'a mut Scheduler<Scheduled>,
    listener: ListenerId,
    default_prevented: bool,
}

impl<'a> PageContext<'a> {
    pub fn document(&self) -> &Document {
        &self.page.document
    }

    pub fn document_mut(&mut self) -> &mut Document {
        &mut self.page.document
    }

    pub fn viewport(&self) -> &Viewport {
        &self.page.viewport
    }

    pub fn viewport_mut(&mut self) -> &mut Viewport {
        &mut self.page.viewport
    }

    pub fn now(&self) -> Duration {
        self.scheduler.now()
    }

    pub fn set_timeout(&mut self, delay: Duration, task: Task) {
        self.scheduler.set_timeout(delay, (self.listener, task));
    }

    pub fn request_animation_frame(&mut self, task: Task) {
        self.scheduler
            .request_animation_frame((self.listener, task));
    }

    /// `event.preventDefault()`
    pub fn prevent_default(&mut self) {
        self.default_prevented = true;
    }
}

pub struct PageController {
    page: Page,
    listeners: Vec<Box<dyn Listener>>,
    scheduler: Scheduler<Scheduled>,
    failures: u64,
    /// Guards against error reports feeding back into themselves
    reporting: bool,
}

impl PageController {
    pub fn new(page: Page) -> Self {
        Self {
            page,
            listeners: Vec::new(),
            scheduler: Scheduler::new(),
            failures: 0,
            reporting: false,
        }
    }

    pub fn register(&mut self, listener: impl Listener + 'static) -> ListenerId {
        self.listeners.push(Box::new(listener));
        ListenerId(self.listeners.len() - 1)
    }

    pub fn page(&self) -> &Page {
        &self.page
    }

    #[cfg(test)]
    pub fn page_mut(&mut self) -> &mut Page {
        &mut self.page
    }

    pub fn now(&self) -> Duration {
        self.scheduler.now()
    }

    /// Listener failures (errors and panics) seen so far
    pub fn failures(&self) -> u64 {
        self.failures
    }

    #[cfg(test)]
    pub fn pending_frames(&self) -> usize {
        self.scheduler.pending_frames()
    }

    pub fn pending_timers(&self) -> usize {
        self.scheduler.pending_timers()
    }

    /// True while something on the page is still moving
    pub fn is_animating(&self) -> bool {
        let now = self.now();
        self.page.viewport.is_smooth_scrolling()
            || self.page.document.is_animating(now)
            || self.scheduler.pending_frames() > 0
    }

    // ─── Lifecycle ───────────────────────────────────────────

    /// Fire `DOMContentLoaded`, settle the initial styles, then fire `load`
    pub fn start(&mut self) {
        tracing::debug!(listeners = self.listeners.len(), "Starting page controller");
        self.dispatch(UiEvent::DomContentLoaded);
        let now = self.now();
        self.page.document.commit_styles(now);
        self.dispatch(UiEvent::Load);
    }

    /// Feed one input from an event source
    pub fn apply(&mut self, input: Input) {
        match input {
            Input::Event(event) => {
                self.dispatch(event);
            }
            Input::ScrollBy(delta) => self.page.viewport.scroll_by(delta),
            Input::Resize { width, height } => {
                self.page.resize(width, height);
                self.dispatch(UiEvent::Resize);
            }
            Input::Quit => {}
        }
    }

    /// Advance the clock: smooth scrolling and due timeouts
    pub fn advance(&mut self, now: Duration) {
        self.scheduler.advance_to(now);
        let now = self.now();
        self.page.viewport.tick(now);
        if self.page.viewport.take_scrolled() {
            self.dispatch(UiEvent::Scroll);
        }
        while let Some((id, task)) = self.scheduler.pop_due() {
            self.invoke(id, move |l, cx| l.run_task(task, cx));
        }
    }

    /// Render one frame: animation callbacks, frame observers, style commit
    pub fn render_frame(&mut self) {
        for (id, task) in self.scheduler.take_frame() {
            self.invoke(id, move |l, cx| l.run_task(task, cx));
        }
        for index in 0..self.listeners.len() {
            self.invoke(ListenerId(index), |l, cx| l.after_frame(cx));
        }
        // scrolls caused by frame callbacks are reported next frame
        let now = self.now();
        let changed = self.page.document.commit_styles(now);
        if changed > 0 {
            tracing::trace!(changed, "Styles committed");
        }
    }

    pub fn tick(&mut self, now: Duration) {
        self.advance(now);
        self.render_frame();
    }

    // ─── Dispatch ────────────────────────────────────────────

    /// Deliver `event` to every listener, then run the default action unless
    /// a listener prevented it. Returns true if the default was prevented.
    pub fn dispatch(&mut self, event: UiEvent) -> bool {
        tracing::trace!(event = event.name(), "dispatch");
        let mut prevented = false;
        for index in 0..self.listeners.len() {
            prevented |= self.invoke(ListenerId(index), |l, cx| l.handle_event(&event, cx));
        }
        if !prevented {
            self.default_action(&event);
        }
        prevented
    }

    /// Run one listener hook, catching errors and panics.
    /// Returns whether the hook called `prevent_default`.
    fn invoke<F>(&mut self, id: ListenerId, hook: F) -> bool
    where
        F: FnOnce(&mut dyn Listener, &mut PageContext<'_>) -> Result<(), ListenerError>,
    {
        let Some(listener) = self.listeners.get_mut(id.0) else {
            return false;
        };
        let name = listener.name();
        let mut cx = PageContext {
            page: &mut self.page,
            scheduler: &mut self.scheduler,
            listener: id,
            default_prevented: false,
        };

        let outcome = panic::catch_unwind(AssertUnwindSafe(|| hook(listener.as_mut(), &mut cx)));
        let prevented = cx.default_prevented;

        let failure = match outcome {
            Ok(Ok(())) => None,
            Ok(Err(e)) => Some(e.to_string()),
            Err(payload) => Some(format!("panicked: {}", panic_message(payload.as_ref()))),
        };
        if let Some(message) = failure {
            self.report(ErrorReport {
                source: name.to_string(),
                message,
            });
        }
        prevented
    }

    fn report(&mut self, report: ErrorReport) {
        self.failures += 1;
        if self.reporting {
            // a listener failed while handling an error report
            tracing::error!(source = %report.source, "Error while reporting: {}", report.message);
            return;
        }
        tracing::debug!(source = %report.source, "Listener failed");
        self.reporting = true;
        self.dispatch(UiEvent::Error(report));
        self.reporting = false;
    }

    // ─── Default actions ─────────────────────────────────────

    fn default_action(&mut self, event: &UiEvent) {
        match event {
            UiEvent::KeyDown(Key::Tab) => self.move_focus(true),
            UiEvent::KeyDown(Key::BackTab) => self.move_focus(false),
            UiEvent::KeyDown(Key::Enter) => {
                if let Some(focused) = self.page.document.focused() {
                    self.dispatch(UiEvent::Click(focused));
                }
            }
            UiEvent::KeyDown(Key::Escape) => self.page.document.set_focus(None),
            UiEvent::PointerDown(target) => {
                let focus = target.filter(|&t| {
                    self.page
                        .document
                        .get(t)
                        .is_some_and(|el| el.is_focusable())
                });
                self.page.document.set_focus(focus);
            }
            UiEvent::Click(target) => self.follow_fragment(*target),
            _ => {}
        }
    }

    fn move_focus(&mut self, forward: bool) {
        let doc = &mut self.page.document;
        let order = doc.focusable();
        if order.is_empty() {
            return;
        }
        let current = doc
            .focused()
            .and_then(|f| order.iter().position(|&o| o == f));
        let next = match (current, forward) {
            (None, true) => 0,
            (None, false) => order.len() - 1,
            (Some(i), true) => (i + 1) % order.len(),
            (Some(i), false) => (i + order.len() - 1) % order.len(),
        };
        doc.set_focus(Some(order[next]));
    }

    /// Unprevented click on `<a href="#id">`: jump straight to the target
    fn follow_fragment(&mut self, target: ElementId) {
        let doc = &self.page.document;
        let Some(fragment) = doc
            .get(target)
            .filter(|el| el.tag() == "a")
            .and_then(|el| el.attr("href"))
            .and_then(|href| href.strip_prefix('#'))
        else {
            return;
        };
        let Some(top) = doc
            .get_element_by_id(fragment)
            .and_then(|id| doc.get(id))
            .map(|el| el.offset_top())
        else {
            return;
        };
        let now = self.now();
        self.page
            .viewport
            .scroll_to(top, ScrollBehavior::Instant, now);
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::interaction::{ErrorCapture, HeaderController, HeaderVariant, ScrollRevealAnimator};
    use crate::page::{default_stylesheet, CellMetrics, PortfolioContent, Rgba, SelectorError};
    use std::cell::RefCell;
    use std::rc::Rc;

    fn page() -> Page {
        Page::new(
            &PortfolioContent::default(),
            default_stylesheet(Rgba::rgb(0x25, 0x63, 0xeb)),
            CellMetrics::default(),
            100,
            30,
            Duration::from_millis(450),
        )
    }

    type Log = Rc<RefCell<Vec<String>>>;

    /// Records every event it sees; optionally fails or panics on scroll
    struct Recorder {
        name: &'static str,
        log: Log,
        fail: Option<&'static str>,
    }

    impl Listener for Recorder {
        fn name(&self) -> &'static str {
            self.name
        }

        fn handle_event(
            &mut self,
            event: &UiEvent,
            _cx: &mut PageContext<'_>,
        ) -> Result<(), ListenerError> {
            self.log
                .borrow_mut()
                .push(format!("{}:{}", self.name, event.name()));
            if *event == UiEvent::Scroll {
                match self.fail {
                    Some("error") => return Err(SelectorError::Empty.into()),
                    Some("panic") => panic!("kaboom"),
                    _ => {}
                }
            }
            Ok(())
        }
    }

    fn recorder(name: &'static str, log: &Log, fail: Option<&'static str>) -> Recorder {
        Recorder {
            name,
            log: Rc::clone(log),
            fail,
        }
    }

    #[test]
    fn test_listeners_run_in_registration_order() {
        let log: Log = Rc::default();
        let mut c = PageController::new(page());
        c.register(recorder("a", &log, None));
        c.register(recorder("b", &log, None));
        c.dispatch(UiEvent::Resize);
        assert_eq!(*log.borrow(), vec!["a:resize", "b:resize"]);
    }

    #[test]
    fn test_failing_listener_does_not_stop_others() {
        for mode in ["error", "panic"] {
            let log: Log = Rc::default();
            let mut c = PageController::new(page());
            c.register(recorder("bad", &log, Some(mode)));
            c.register(recorder("good", &log, None));

            c.dispatch(UiEvent::Scroll);
            c.dispatch(UiEvent::Scroll);

            let log = log.borrow();
            // each scroll: bad fails -> error event to both -> good still sees scroll
            assert_eq!(
                log.iter().filter(|e| e.as_str() == "good:scroll").count(),
                2,
                "mode {mode}"
            );
            assert_eq!(
                log.iter().filter(|e| e.as_str() == "good:error").count(),
                2,
                "mode {mode}"
            );
            assert_eq!(c.failures(), 2);
        }
    }

    /// Breaks every frame hook: errors in `after_frame` and panics in the
    /// animation-frame task it requests on each scroll
    struct FrameSaboteur;

    impl Listener for FrameSaboteur {
        fn name(&self) -> &'static str {
            "frame-saboteur"
        }

        fn handle_event(
            &mut self,
            event: &UiEvent,
            cx: &mut PageContext<'_>,
        ) -> Result<(), ListenerError> {
            if *event == UiEvent::Scroll {
                cx.request_animation_frame(Task::UpdateHeader);
            }
            Ok(())
        }

        fn run_task(&mut self, _task: Task, _cx: &mut PageContext<'_>) -> Result<(), ListenerError> {
            panic!("frame task blew up");
        }

        fn after_frame(&mut self, _cx: &mut PageContext<'_>) -> Result<(), ListenerError> {
            Err(SelectorError::Empty.into())
        }
    }

    #[test]
    fn test_frame_hook_failures_leave_behaviors_running() {
        let config = Config::default();
        let mut c = PageController::new(page());
        // registered first so its failures come before every real behavior
        c.register(FrameSaboteur);
        c.register(ScrollRevealAnimator::new(&config.reveal));
        c.register(HeaderController::new(&config.header));
        c.register(ErrorCapture::new());
        c.start();
        c.tick(Duration::from_millis(16));
        let failures_at_rest = c.failures();
        assert_eq!(failures_at_rest, 1);

        // first card or tag that starts well below the fold
        let doc = &c.page().document;
        let below_fold = c.page().viewport.height() + 100.0;
        let (target, top) = doc
            .query_selector_all(".work-card, .experience-tag")
            .unwrap()
            .into_iter()
            .filter_map(|id| doc.get(id).map(|el| (id, el.offset_top())))
            .find(|&(_, top)| top > below_fold)
            .expect("reveal target below the fold");
        let committed_opacity = |c: &PageController| {
            c.page()
                .document
                .get(target)
                .map(|el| el.style().committed().opacity)
                .unwrap_or_default()
        };
        assert_eq!(committed_opacity(&c), 0.0);
        assert_eq!(HeaderVariant::of(&c.page().document), Some(HeaderVariant::Top));

        c.apply(Input::ScrollBy(top - 100.0));
        c.tick(Duration::from_millis(32));
        c.tick(Duration::from_millis(48));
        // long enough for any stagger delay within the batch
        c.tick(Duration::from_millis(2000));

        // intersection delivery still reveals the target
        assert_eq!(committed_opacity(&c), 1.0);
        // the throttled header frame callback still ran
        assert_eq!(
            HeaderVariant::of(&c.page().document),
            Some(HeaderVariant::Scrolled)
        );
        // three after_frame errors plus one panicking frame task
        assert_eq!(c.failures(), failures_at_rest + 4);
    }

    #[test]
    fn test_tab_moves_focus_through_links() {
        let mut c = PageController::new(page());
        let links = c.page().document.focusable();
        assert!(links.len() >= 2);

        c.dispatch(UiEvent::KeyDown(Key::Tab));
        assert_eq!(c.page().document.focused(), Some(links[0]));
        c.dispatch(UiEvent::KeyDown(Key::Tab));
        assert_eq!(c.page().document.focused(), Some(links[1]));
        c.dispatch(UiEvent::KeyDown(Key::BackTab));
        assert_eq!(c.page().document.focused(), Some(links[0]));

        c.dispatch(UiEvent::PointerDown(None));
        assert_eq!(c.page().document.focused(), None);
    }

    #[test]
    fn test_unprevented_fragment_click_jumps() {
        let mut c = PageController::new(page());
        let doc = &c.page().document;
        let link = doc
            .query_selector("a.nav-link")
            .ok()
            .flatten()
            .expect("nav link");
        let fragment = doc.get(link).and_then(|e| e.attr("href")).unwrap_or("#");
        let target = doc
            .get_element_by_id(&fragment[1..])
            .expect("target section");
        let top = doc.get(target).map(|e| e.offset_top()).unwrap_or_default();

        c.dispatch(UiEvent::Click(link));
        let expected = top.min(c.page().viewport.max_scroll());
        assert_eq!(c.page().viewport.scroll_top(), expected);
    }

    #[test]
    fn test_scroll_event_emitted_on_advance() {
        let log: Log = Rc::default();
        let mut c = PageController::new(page());
        c.register(recorder("r", &log, None));
        c.apply(Input::ScrollBy(64.0));
        c.apply(Input::ScrollBy(64.0));
        c.advance(Duration::from_millis(16));
        assert_eq!(
            log.borrow().iter().filter(|e| e.as_str() == "r:scroll").count(),
            1
        );
    }
}
