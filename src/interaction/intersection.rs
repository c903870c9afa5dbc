//! Viewport intersection watching
//!
//! A poll-based take on `IntersectionObserver`: the controller calls
//! [`IntersectionWatcher::check`] once per rendered frame and gets back the
//! entries whose intersecting state changed since the previous check.

use crate::page::{Document, ElementId, Viewport};
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IntersectionEntry {
    pub target: ElementId,
    pub ratio: f32,
    pub is_intersecting: bool,
}

#[derive(Debug, Clone)]
pub struct IntersectionWatcher {
    threshold: f32,
    /// Added to the root's bottom edge; negative values shrink the root
    bottom_margin: f32,
    observed: Vec<ElementId>,
    last: HashMap<ElementId, bool>,
}

impl IntersectionWatcher {
    pub fn new(threshold: f32, bottom_margin: f32) -> Self {
        Self {
            threshold: threshold.clamp(0.0, 1.0),
            bottom_margin,
            observed: Vec::new(),
            last: HashMap::new(),
        }
    }

    pub fn observe(&mut self, id: ElementId) {
        if !self.observed.contains(&id) {
            self.observed.push(id);
        }
        self.last.remove(&id);
    }

    pub fn unobserve(&mut self, id: ElementId) {
        self.observed.retain(|&o| o != id);
        self.last.remove(&id);
    }

    #[cfg(test)]
    pub fn is_observing(&self, id: ElementId) -> bool {
        self.observed.contains(&id)
    }

    /// Visible fraction of `id` inside the margin-adjusted viewport
    pub fn ratio(&self, doc: &Document, viewport: &Viewport, id: ElementId) -> f32 {
        let Some(el) = doc.get(id) else {
            return 0.0;
        };
        let rect = el.rect();
        // bounding box follows the committed transform, like getBoundingClientRect
        let top = rect.top + el.style().committed().transform.translate_y;
        let bottom = top + rect.height;

        let root_top = viewport.scroll_top();
        let root_bottom = root_top + viewport.height() + self.bottom_margin;
        if root_bottom <= root_top {
            return 0.0;
        }

        if rect.height <= 0.0 {
            return if top >= root_top && top <= root_bottom {
                1.0
            } else {
                0.0
            };
        }
        let overlap = (bottom.min(root_bottom) - top.max(root_top)).max(0.0);
        overlap / rect.height
    }

    /// Entries whose intersecting state changed since the last check.
    ///
    /// The first check after `observe` always reports the element.
    pub fn check(&mut self, doc: &Document, viewport: &Viewport) -> Vec<IntersectionEntry> {
        let mut entries = Vec::new();
        for &target in &self.observed {
            let ratio = self.ratio(doc, viewport, target);
            let is_intersecting = ratio > 0.0 && ratio >= self.threshold;
            if self.last.get(&target) != Some(&is_intersecting) {
                entries.push(IntersectionEntry {
                    target,
                    ratio,
                    is_intersecting,
                });
            }
        }
        for entry in &entries {
            self.last.insert(entry.target, entry.is_intersecting);
        }
        entries
    }
}
