use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::geometry::{PAGE_PADDING, ZOOM_STEP};

/// Default quiet period before a resize triggers a re-fit
pub const RESIZE_DEBOUNCE_MS: u64 = 120;

/// Tunables for a viewer instance.
///
/// Scale limits are fixed (see [`crate::geometry`]); everything here only
/// changes how quickly the viewer reacts and how the page is framed.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewerConfig {
    /// Amount added to or removed from the scale per zoom click
    pub zoom_step: f32,

    /// Padding around the page inside the scrollable region, in pixels
    pub page_padding: f32,

    /// Quiet period for resize events, in milliseconds
    pub resize_debounce_ms: u64,
}

impl ViewerConfig {
    pub fn resize_debounce(&self) -> Duration {
        Duration::from_millis(self.resize_debounce_ms)
    }
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            zoom_step: ZOOM_STEP,
            page_padding: PAGE_PADDING,
            resize_debounce_ms: RESIZE_DEBOUNCE_MS,
        }
    }
}
