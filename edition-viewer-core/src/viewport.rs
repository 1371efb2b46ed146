use serde::{Deserialize, Serialize};

use crate::config::ViewerConfig;
use crate::geometry::{
    clamp_scale, compute_fit_scale, content_width, max_scroll, round_scale, ContainerSize,
    PageGeometry, Point, ScrollOffset, SCALE_EPSILON,
};
use crate::pan::{CursorStyle, PanState};

/// ViewState is the current view of one document: which page, at what
/// scale, and where the page region is scrolled to.
///
/// Pages are 1-based. Fields are private so each transition below is the
/// only writer of the values it owns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ViewState {
    config: ViewerConfig,
    current_page: u32,
    page_count: Option<u32>,
    scale: f32,
    fit_mode: bool,
    fit_scale: f32,
    container: ContainerSize,
    geometry: Option<PageGeometry>,
    scroll: ScrollOffset,
    pan: PanState,
}

impl ViewState {
    pub fn new(config: ViewerConfig, container: ContainerSize) -> Self {
        let mut state = Self {
            config,
            current_page: 1,
            page_count: None,
            scale: 1.0,
            fit_mode: true,
            fit_scale: 1.0,
            container,
            geometry: None,
            scroll: ScrollOffset::ORIGIN,
            pan: PanState::Idle,
        };
        state.refit();
        state
    }

    /// Back to page 1 in fit mode, keeping the container size
    pub fn reset(&mut self) {
        *self = Self::new(self.config, self.container);
    }

    pub fn config(&self) -> &ViewerConfig {
        &self.config
    }

    pub fn current_page(&self) -> u32 {
        self.current_page
    }

    pub fn page_count(&self) -> Option<u32> {
        self.page_count
    }

    pub fn scale(&self) -> f32 {
        self.scale
    }

    pub fn fit_mode(&self) -> bool {
        self.fit_mode
    }

    pub fn fit_scale(&self) -> f32 {
        self.fit_scale
    }

    pub fn container(&self) -> ContainerSize {
        self.container
    }

    /// Geometry of the current page, if the engine has reported it
    pub fn geometry(&self) -> Option<PageGeometry> {
        self.geometry
    }

    pub fn scroll(&self) -> ScrollOffset {
        self.scroll
    }

    pub fn pan(&self) -> &PanState {
        &self.pan
    }

    /// Panning only makes sense once the page is wider than the fit
    pub fn is_pannable(&self) -> bool {
        self.scale > self.fit_scale + SCALE_EPSILON
    }

    pub fn cursor(&self) -> CursorStyle {
        self.pan.cursor(self.is_pannable())
    }

    pub fn max_scroll(&self) -> ScrollOffset {
        max_scroll(
            self.container,
            self.geometry.unwrap_or_default(),
            self.scale,
            self.config.page_padding,
        )
    }

    // Page load tracking

    pub fn on_document_metadata_loaded(&mut self, page_count: u32) {
        self.page_count = Some(page_count);
        self.current_page = self.current_page.min(page_count).max(1);
        tracing::debug!("document has {} pages", page_count);
    }

    pub fn on_document_load_failed(&mut self) {
        self.page_count = None;
        self.pan.end();
    }

    /// Record the native size of `page`. Returns whether the scale changed.
    ///
    /// Geometry for a page other than the current one is stale and dropped.
    pub fn on_page_metadata_loaded(&mut self, page: u32, geometry: PageGeometry) -> bool {
        if page != self.current_page {
            tracing::debug!(
                "dropping geometry for page {} (showing page {})",
                page,
                self.current_page
            );
            return false;
        }
        if self.geometry == Some(geometry) {
            return false;
        }
        self.geometry = Some(geometry);
        self.refit()
    }

    /// Adopt a new container size. Returns whether the scale changed.
    pub fn resize(&mut self, container: ContainerSize) -> bool {
        self.container = container;
        self.refit()
    }

    /// Recompute the fit scale and adopt it in fit mode
    fn refit(&mut self) -> bool {
        self.fit_scale = compute_fit_scale(
            content_width(self.container.width, self.config.page_padding),
            self.geometry.map(|g| g.native_width),
        );
        let previous = self.scale;
        if self.fit_mode {
            self.scale = self.fit_scale;
        }
        self.settle();
        previous != self.scale
    }

    /// Drop a drag that is no longer possible and keep scroll in bounds
    fn settle(&mut self) {
        if !self.is_pannable() && self.pan.end() {
            tracing::debug!("drag ended: page no longer exceeds fit scale");
        }
        self.scroll = self.scroll.clamped(self.max_scroll());
    }

    // Navigation

    pub fn go_to_next_page(&mut self) -> bool {
        match self.page_count {
            Some(count) if self.current_page < count => {
                self.show_page(self.current_page + 1);
                true
            }
            _ => false,
        }
    }

    pub fn go_to_previous_page(&mut self) -> bool {
        if self.current_page > 1 {
            self.show_page(self.current_page - 1);
            true
        } else {
            false
        }
    }

    fn show_page(&mut self, page: u32) {
        self.current_page = page;
        self.geometry = None;
        self.scroll = ScrollOffset::ORIGIN;
        self.pan.end();
        self.refit();
    }

    // Zoom

    pub fn zoom_in(&mut self) -> bool {
        self.zoom_by(self.config.zoom_step)
    }

    pub fn zoom_out(&mut self) -> bool {
        self.zoom_by(-self.config.zoom_step)
    }

    fn zoom_by(&mut self, delta: f32) -> bool {
        self.fit_mode = false;
        let previous = self.scale;
        self.scale = clamp_scale(round_scale(self.scale + delta));
        self.settle();
        previous != self.scale
    }

    /// Return to fit-to-width and the top-left of the page
    pub fn fit_to_width(&mut self) -> bool {
        self.fit_mode = true;
        self.scroll = ScrollOffset::ORIGIN;
        self.refit()
    }

    // Pan

    pub fn pointer_down(&mut self, pointer: Point) -> bool {
        let pannable = self.is_pannable();
        self.pan.begin(pointer, self.scroll, pannable)
    }

    pub fn pointer_move(&mut self, pointer: Point) -> Option<ScrollOffset> {
        let scroll = self.pan.drag_to(pointer, self.max_scroll())?;
        self.scroll = scroll;
        Some(scroll)
    }

    pub fn pointer_up(&mut self) -> bool {
        self.pan.end()
    }

    pub fn pointer_leave(&mut self) -> bool {
        self.pan.end()
    }

    /// The page region was scrolled natively (wheel or scrollbar)
    pub fn on_scrolled(&mut self, offset: ScrollOffset) {
        self.scroll = offset;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{MAX_SCALE, MIN_SCALE, PAGE_PADDING};
    use pretty_assertions::assert_eq;

    const LETTER: PageGeometry = PageGeometry {
        native_width: 612.0,
        native_height: 792.0,
    };

    /// A container whose content width is exactly one letter page
    fn letter_container() -> ContainerSize {
        ContainerSize::new(612.0 + 2.0 * PAGE_PADDING, 600.0)
    }

    fn loaded(pages: u32) -> ViewState {
        let mut state = ViewState::new(ViewerConfig::default(), letter_container());
        state.on_document_metadata_loaded(pages);
        state.on_page_metadata_loaded(1, LETTER);
        state
    }

    #[test]
    fn new_state_starts_fitted_on_page_one() {
        let state = ViewState::new(ViewerConfig::default(), letter_container());
        assert_eq!(state.current_page(), 1);
        assert_eq!(state.page_count(), None);
        assert!(state.fit_mode());
        assert_eq!(state.scale(), 1.0);
        assert_eq!(state.scroll(), ScrollOffset::ORIGIN);
    }

    #[test]
    fn next_page_stops_at_last_page() {
        let mut state = loaded(3);
        assert!(state.go_to_next_page());
        assert!(state.go_to_next_page());
        assert_eq!(state.current_page(), 3);
        assert!(!state.go_to_next_page());
        assert_eq!(state.current_page(), 3);
    }

    #[test]
    fn previous_page_stops_at_first_page() {
        let mut state = loaded(3);
        assert!(!state.go_to_previous_page());
        assert_eq!(state.current_page(), 1);
    }

    #[test]
    fn next_page_is_noop_until_page_count_known() {
        let mut state = ViewState::new(ViewerConfig::default(), letter_container());
        assert!(!state.go_to_next_page());
        assert_eq!(state.current_page(), 1);
    }

    #[test]
    fn page_change_resets_scroll_and_geometry() {
        let mut state = loaded(2);
        state.zoom_in();
        state.on_scrolled(ScrollOffset::new(30.0, 40.0));

        assert!(state.go_to_next_page());
        assert_eq!(state.scroll(), ScrollOffset::ORIGIN);
        assert_eq!(state.geometry(), None);
    }

    #[test]
    fn stale_page_geometry_is_ignored() {
        let mut state = loaded(2);
        state.go_to_next_page();
        assert!(!state.on_page_metadata_loaded(1, PageGeometry::new(1224.0, 1584.0)));
        assert_eq!(state.geometry(), None);
    }

    #[test]
    fn new_geometry_replaces_old_and_refits() {
        let mut state = loaded(2);
        assert_eq!(state.scale(), 1.0);

        let wide = PageGeometry::new(1224.0, 792.0);
        assert!(state.on_page_metadata_loaded(1, wide));
        assert_eq!(state.geometry(), Some(wide));
        assert_eq!(state.scale(), 0.5);
    }

    #[test]
    fn zoom_clears_fit_mode_and_clamps() {
        let mut state = loaded(1);
        assert!(state.zoom_in());
        assert!(!state.fit_mode());
        assert_eq!(state.scale(), 1.1);

        for _ in 0..100 {
            state.zoom_in();
        }
        assert_eq!(state.scale(), MAX_SCALE);
        assert!(!state.zoom_in());
        assert_eq!(state.scale(), MAX_SCALE);

        for _ in 0..100 {
            state.zoom_out();
        }
        assert_eq!(state.scale(), MIN_SCALE);
    }

    #[test]
    fn fit_mode_survives_navigation_and_resize() {
        let mut state = loaded(2);
        state.go_to_next_page();
        assert!(state.fit_mode());

        assert!(state.resize(ContainerSize::new(306.0 + 2.0 * PAGE_PADDING, 600.0)));
        assert_eq!(state.scale(), 0.5);
    }

    #[test]
    fn resize_does_not_touch_manual_scale() {
        let mut state = loaded(1);
        state.zoom_in();
        assert!(!state.resize(ContainerSize::new(2000.0, 600.0)));
        assert_eq!(state.scale(), 1.1);
    }

    #[test]
    fn fit_to_width_restores_fit_scale_and_scroll() {
        let mut state = loaded(1);
        state.zoom_in();
        state.zoom_in();
        state.on_scrolled(ScrollOffset::new(12.0, 80.0));

        assert!(state.fit_to_width());
        assert!(state.fit_mode());
        assert_eq!(state.scale(), state.fit_scale());
        assert_eq!(state.scroll(), ScrollOffset::ORIGIN);
    }

    #[test]
    fn drag_scrolls_by_inverted_delta() {
        let mut state = loaded(1);
        for _ in 0..10 {
            state.zoom_in();
        }
        assert_eq!(state.scale(), 2.0);
        assert_eq!(state.fit_scale(), 1.0);

        assert!(state.pointer_down(Point::new(100.0, 100.0)));
        assert_eq!(state.cursor(), CursorStyle::Grabbing);
        let scroll = state.pointer_move(Point::new(80.0, 70.0));
        assert_eq!(scroll, Some(ScrollOffset::new(20.0, 30.0)));
        assert_eq!(state.scroll(), ScrollOffset::new(20.0, 30.0));

        assert!(state.pointer_up());
        assert_eq!(state.cursor(), CursorStyle::Grab);
    }

    #[test]
    fn no_drag_at_fit_scale() {
        let mut state = loaded(1);
        assert_eq!(state.cursor(), CursorStyle::Default);
        assert!(!state.pointer_down(Point::new(100.0, 100.0)));
        assert_eq!(state.pointer_move(Point::new(80.0, 70.0)), None);
        assert_eq!(state.scroll(), ScrollOffset::ORIGIN);
    }

    #[test]
    fn zooming_back_to_fit_ends_drag() {
        let mut state = loaded(1);
        state.zoom_in();
        assert!(state.pointer_down(Point::new(10.0, 10.0)));

        state.zoom_out();
        assert!(!state.pan().is_dragging());
        assert_eq!(state.pointer_move(Point::new(0.0, 0.0)), None);
    }

    #[test]
    fn pointer_leave_ends_drag() {
        let mut state = loaded(1);
        state.zoom_in();
        state.pointer_down(Point::new(10.0, 10.0));
        assert!(state.pointer_leave());
        assert!(!state.pan().is_dragging());
    }

    #[test]
    fn reset_keeps_container() {
        let mut state = loaded(4);
        state.go_to_next_page();
        state.zoom_in();
        state.reset();

        assert_eq!(state.current_page(), 1);
        assert_eq!(state.page_count(), None);
        assert!(state.fit_mode());
        assert_eq!(state.container(), letter_container());
    }

    #[test]
    fn state_serializes() {
        let state = loaded(2);
        let json = serde_json::to_string(&state).unwrap();
        let restored: ViewState = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, state);
    }
}
