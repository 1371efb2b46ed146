//! Viewport geometry
//!
//! Pure functions that turn container and page sizes into scale factors,
//! plus the small value types shared by the rest of the viewer.

use serde::{Deserialize, Serialize};

/// Smallest scale the viewer will render at
pub const MIN_SCALE: f32 = 0.3;

/// Largest scale the viewer will render at
pub const MAX_SCALE: f32 = 4.0;

/// Default zoom increment
pub const ZOOM_STEP: f32 = 0.1;

/// Default padding around the page, in pixels
pub const PAGE_PADDING: f32 = 16.0;

/// Assumed page width (US Letter, in points) until the real one is known
pub const DEFAULT_PAGE_WIDTH: f32 = 612.0;

/// Assumed page height (US Letter, in points) until the real one is known
pub const DEFAULT_PAGE_HEIGHT: f32 = 792.0;

/// Scales closer than this are treated as equal
pub const SCALE_EPSILON: f32 = 1e-3;

/// Native (scale = 1) size of a page as reported by the engine
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PageGeometry {
    pub native_width: f32,
    pub native_height: f32,
}

impl PageGeometry {
    pub fn new(native_width: f32, native_height: f32) -> Self {
        Self {
            native_width,
            native_height,
        }
    }

    /// Size of the page once rendered at `scale`
    pub fn scaled(&self, scale: f32) -> (f32, f32) {
        (self.native_width * scale, self.native_height * scale)
    }
}

impl Default for PageGeometry {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE_WIDTH, DEFAULT_PAGE_HEIGHT)
    }
}

/// Measured size of the scrollable page region
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ContainerSize {
    pub width: f32,
    pub height: f32,
}

impl ContainerSize {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }
}

/// A pointer position relative to the page region
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// Scroll position of the page region, top-left is (0, 0)
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ScrollOffset {
    pub x: f32,
    pub y: f32,
}

impl ScrollOffset {
    pub const ORIGIN: Self = Self { x: 0.0, y: 0.0 };

    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Clamp each axis into `[0, max]`
    pub fn clamped(self, max: ScrollOffset) -> Self {
        Self {
            x: self.x.clamp(0.0, max.x.max(0.0)),
            y: self.y.clamp(0.0, max.y.max(0.0)),
        }
    }
}

/// Clamp an arbitrary scale into `[MIN_SCALE, MAX_SCALE]`.
///
/// NaN maps to `MIN_SCALE`.
pub fn clamp_scale(scale: f32) -> f32 {
    if scale.is_nan() {
        return MIN_SCALE;
    }
    scale.clamp(MIN_SCALE, MAX_SCALE)
}

/// Width available to the page once padding is removed on both sides.
pub fn content_width(container_width: f32, padding: f32) -> f32 {
    (container_width - 2.0 * padding).max(0.0)
}

/// Scale at which a page of `page_native_width` exactly fills
/// `container_width`.
///
/// An unknown or degenerate page width falls back to
/// [`DEFAULT_PAGE_WIDTH`] so the first layout does not flash.
pub fn compute_fit_scale(container_width: f32, page_native_width: Option<f32>) -> f32 {
    let page_width = page_native_width
        .filter(|w| w.is_finite() && *w > 0.0)
        .unwrap_or(DEFAULT_PAGE_WIDTH);

    if !container_width.is_finite() || container_width <= 0.0 {
        return MIN_SCALE;
    }

    clamp_scale(container_width / page_width)
}

/// Round to hundredths so repeated zoom steps land on stable values.
pub fn round_scale(scale: f32) -> f32 {
    (scale * 100.0).round() / 100.0
}

/// Largest scroll offset that keeps the page inside the viewport.
///
/// Content includes the padding on both sides of the page.
pub fn max_scroll(
    container: ContainerSize,
    geometry: PageGeometry,
    scale: f32,
    padding: f32,
) -> ScrollOffset {
    let (width, height) = geometry.scaled(scale);
    ScrollOffset {
        x: (width + 2.0 * padding - container.width).max(0.0),
        y: (height + 2.0 * padding - container.height).max(0.0),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fit_scale_divides_container_by_page() {
        assert_eq!(compute_fit_scale(1224.0, Some(612.0)), 2.0);
        assert_eq!(compute_fit_scale(306.0, Some(612.0)), 0.5);
    }

    #[test]
    fn fit_scale_is_clamped() {
        assert_eq!(compute_fit_scale(10.0, Some(612.0)), MIN_SCALE);
        assert_eq!(compute_fit_scale(100_000.0, Some(612.0)), MAX_SCALE);
    }

    #[test]
    fn unknown_page_width_uses_default() {
        assert_eq!(
            compute_fit_scale(1224.0, None),
            compute_fit_scale(1224.0, Some(DEFAULT_PAGE_WIDTH))
        );
        assert_eq!(
            compute_fit_scale(1224.0, Some(0.0)),
            compute_fit_scale(1224.0, None)
        );
        assert_eq!(
            compute_fit_scale(1224.0, Some(f32::NAN)),
            compute_fit_scale(1224.0, None)
        );
    }

    #[test]
    fn degenerate_container_gives_min_scale() {
        assert_eq!(compute_fit_scale(0.0, Some(612.0)), MIN_SCALE);
        assert_eq!(compute_fit_scale(f32::INFINITY, Some(612.0)), MIN_SCALE);
    }

    #[test]
    fn content_width_removes_padding() {
        assert_eq!(content_width(1000.0, 16.0), 968.0);
        assert_eq!(content_width(20.0, 16.0), 0.0);
    }

    #[test]
    fn max_scroll_is_zero_when_page_fits() {
        let container = ContainerSize::new(800.0, 600.0);
        let max = max_scroll(container, PageGeometry::new(100.0, 100.0), 1.0, 0.0);
        assert_eq!(max, ScrollOffset::ORIGIN);
    }

    #[test]
    fn max_scroll_accounts_for_scale_and_padding() {
        let container = ContainerSize::new(400.0, 300.0);
        let max = max_scroll(container, PageGeometry::new(400.0, 300.0), 2.0, 10.0);
        assert_eq!(max, ScrollOffset::new(420.0, 320.0));
    }

    #[test]
    fn clamp_scale_handles_nan() {
        assert_eq!(clamp_scale(f32::NAN), MIN_SCALE);
        assert_eq!(clamp_scale(1.5), 1.5);
    }
}
