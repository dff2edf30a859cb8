//! services/portal/src/views/scroll.rs
//!
//! Follow-the-bottom policy for the chat pane.

/// Remembers whether the pane sat at its bottom edge at the last scroll event.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScrollTracker {
    at_bottom: bool,
}

impl ScrollTracker {
    /// Records a scroll event, in whole pixels.
    pub fn on_scroll(&mut self, scroll_height: u32, scroll_top: u32, client_height: u32) {
        self.at_bottom = scroll_height == scroll_top.saturating_add(client_height);
    }

    pub fn at_bottom(&self) -> bool {
        self.at_bottom
    }

    /// Whether to scroll to the bottom after new messages render.
    pub fn should_follow(&self) -> bool {
        self.at_bottom
    }

    pub fn reset(&mut self) {
        self.at_bottom = false;
    }
}
