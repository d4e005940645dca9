//! Redraw coalescing.
//!
//! Any number of state changes inside one frame collapse into a single
//! redraw: callers `request()` freely and the frame loop `take()`s once.

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RenderRequest {
    pending: bool,
}

impl RenderRequest {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn request(&mut self) {
        self.pending = true;
    }

    pub fn is_pending(&self) -> bool {
        self.pending
    }

    /// True exactly once per batch of requests.
    pub fn take(&mut self) -> bool {
        std::mem::take(&mut self.pending)
    }
}
