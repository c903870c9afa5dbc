//! Viewport - the visible window onto the document
//!
//! Owns the scroll offset and the platform's smooth-scroll animation. All
//! values are CSS pixels. Scroll offsets are clamped to the scrollable range.

use crate::page::style::Easing;
use std::time::Duration;

/// `behavior` of a programmatic scroll
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrollBehavior {
    Instant,
    Smooth,
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct SmoothScroll {
    from: f32,
    to: f32,
    start: Duration,
    duration: Duration,
}

#[derive(Debug, Clone)]
pub struct Viewport {
    scroll_top: f32,
    height: f32,
    document_height: f32,
    smooth_duration: Duration,
    animation: Option<SmoothScroll>,
    /// Set whenever `scroll_top` changed since the last `take_scrolled`
    scrolled: bool,
}

impl Viewport {
    pub fn new(height: f32, document_height: f32, smooth_duration: Duration) -> Self {
        Self {
            scroll_top: 0.0,
            height,
            document_height,
            smooth_duration,
            animation: None,
            scrolled: false,
        }
    }

    /// Equivalent of `window.pageYOffset`
    pub fn scroll_top(&self) -> f32 {
        self.scroll_top
    }

    pub fn height(&self) -> f32 {
        self.height
    }

    pub fn max_scroll(&self) -> f32 {
        (self.document_height - self.height).max(0.0)
    }

    pub fn is_smooth_scrolling(&self) -> bool {
        self.animation.is_some()
    }

    /// Resize; keeps the offset inside the new scroll range
    pub fn resize(&mut self, height: f32, document_height: f32) {
        self.height = height;
        self.document_height = document_height;
        let clamped = self.clamp(self.scroll_top);
        self.set_offset(clamped);
        if let Some(anim) = &mut self.animation {
            anim.to = anim.to.clamp(0.0, (document_height - height).max(0.0));
        }
    }

    fn clamp(&self, top: f32) -> f32 {
        top.clamp(0.0, self.max_scroll())
    }

    fn set_offset(&mut self, top: f32) {
        if (top - self.scroll_top).abs() > f32::EPSILON {
            self.scroll_top = top;
            self.scrolled = true;
        }
    }

    /// Equivalent of `window.scrollTo({ top, behavior })`
    pub fn scroll_to(&mut self, top: f32, behavior: ScrollBehavior, now: Duration) {
        let target = self.clamp(top);
        match behavior {
            ScrollBehavior::Instant => {
                self.animation = None;
                self.set_offset(target);
            }
            ScrollBehavior::Smooth => {
                if (target - self.scroll_top).abs() <= f32::EPSILON {
                    self.animation = None;
                    return;
                }
                self.animation = Some(SmoothScroll {
                    from: self.scroll_top,
                    to: target,
                    start: now,
                    duration: self.smooth_duration,
                });
            }
        }
    }

    /// User scrolling (wheel, keys); interrupts a smooth scroll
    pub fn scroll_by(&mut self, delta: f32) {
        self.animation = None;
        let target = self.clamp(self.scroll_top + delta);
        self.set_offset(target);
    }

    /// Advance the smooth-scroll animation to `now`
    pub fn tick(&mut self, now: Duration) {
        let Some(anim) = self.animation else {
            return;
        };
        let elapsed = now.saturating_sub(anim.start);
        let t = if anim.duration.is_zero() {
            1.0
        } else {
            elapsed.as_secs_f32() / anim.duration.as_secs_f32()
        };
        if t >= 1.0 {
            self.animation = None;
            self.set_offset(anim.to);
            return;
        }
        let eased = Easing::EaseOut.apply(t);
        let top = anim.from + (anim.to - anim.from) * eased;
        self.set_offset(top);
    }

    /// Returns true once per change of `scroll_top`
    pub fn take_scrolled(&mut self) -> bool {
        std::mem::take(&mut self.scrolled)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(v: u64) -> Duration {
        Duration::from_millis(v)
    }

    #[test]
    fn test_instant_scroll_clamps() {
        let mut vp = Viewport::new(400.0, 1000.0, ms(450));
        vp.scroll_to(5000.0, ScrollBehavior::Instant, ms(0));
        assert_eq!(vp.scroll_top(), 600.0);
        assert!(vp.take_scrolled());
        assert!(!vp.take_scrolled());

        vp.scroll_to(-20.0, ScrollBehavior::Instant, ms(0));
        assert_eq!(vp.scroll_top(), 0.0);
    }

    #[test]
    fn test_smooth_scroll_eases_to_target() {
        let mut vp = Viewport::new(400.0, 2000.0, ms(400));
        vp.scroll_to(800.0, ScrollBehavior::Smooth, ms(0));
        assert_eq!(vp.scroll_top(), 0.0);
        assert!(vp.is_smooth_scrolling());

        vp.tick(ms(200));
        let mid = vp.scroll_top();
        // ease-out: more than half way at half time
        assert!(mid > 400.0 && mid < 800.0);

        vp.tick(ms(400));
        assert_eq!(vp.scroll_top(), 800.0);
        assert!(!vp.is_smooth_scrolling());
    }

    #[test]
    fn test_user_scroll_interrupts_smooth_scroll() {
        let mut vp = Viewport::new(400.0, 2000.0, ms(400));
        vp.scroll_to(800.0, ScrollBehavior::Smooth, ms(0));
        vp.tick(ms(100));
        vp.scroll_by(16.0);
        assert!(!vp.is_smooth_scrolling());
        let settled = vp.scroll_top();
        vp.tick(ms(400));
        assert_eq!(vp.scroll_top(), settled);
    }

    #[test]
    fn test_resize_reclamps() {
        let mut vp = Viewport::new(400.0, 2000.0, ms(400));
        vp.scroll_to(1600.0, ScrollBehavior::Instant, ms(0));
        vp.resize(400.0, 1000.0);
        assert_eq!(vp.scroll_top(), 600.0);
    }
}
