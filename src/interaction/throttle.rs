//! Frame-coalescing latch
//!
//! `true` while an animation-frame callback is pending. Scroll bursts inside
//! one frame schedule a single update; the update reads whatever offset is
//! current when it runs.

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct FrameThrottle {
    ticking: bool,
}

impl FrameThrottle {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true if the caller should request a frame now
    pub fn try_schedule(&mut self) -> bool {
        if self.ticking {
            return false;
        }
        self.ticking = true;
        true
    }

    /// Called by the frame callback once it ran
    pub fn release(&mut self) {
        self.ticking = false;
    }

    #[cfg(test)]
    pub fn is_pending(&self) -> bool {
        self.ticking
    }
}
