use crate::geometry::{MAX_SCALE, MIN_SCALE};
use crate::surface::DocumentStatus;
use crate::viewport::ViewState;

/// Labels and enabled flags for the viewer toolbar.
///
/// Unknown values render as `?` rather than stale numbers, and every
/// control is disabled until the document has loaded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolbarModel {
    pub page_label: String,
    pub zoom_label: String,
    pub can_go_previous: bool,
    pub can_go_next: bool,
    pub can_zoom_in: bool,
    pub can_zoom_out: bool,
    pub can_fit: bool,
}

impl ToolbarModel {
    pub fn new(state: &ViewState, status: &DocumentStatus) -> Self {
        let ready = matches!(status, DocumentStatus::Ready { .. });
        let page_count = state.page_count().filter(|_| ready);

        let page_label = match page_count {
            Some(count) => format!("Page {} / {}", state.current_page(), count),
            None => "Page ? / ?".to_string(),
        };
        let zoom_label = if ready {
            format!("{}%", (state.scale() * 100.0).round() as i32)
        } else {
            "?%".to_string()
        };

        Self {
            page_label,
            zoom_label,
            can_go_previous: ready && state.current_page() > 1,
            can_go_next: page_count.is_some_and(|count| state.current_page() < count),
            can_zoom_in: ready && state.scale() < MAX_SCALE,
            can_zoom_out: ready && state.scale() > MIN_SCALE,
            can_fit: ready && !state.fit_mode(),
        }
    }
}
