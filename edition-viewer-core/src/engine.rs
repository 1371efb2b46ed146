//! Decoding engine boundary
//!
//! The viewer never talks to a PDF library directly. A shell supplies a
//! [`DocumentEngine`]; tests supply a fake that returns fixed-size bitmaps.
//! All methods may block and are expected to run off the UI thread.

use std::fmt;
use std::sync::Arc;

use crate::error::ViewerResult;
use crate::geometry::PageGeometry;

/// Rasterized page, RGBA8
pub type Bitmap = image::RgbaImage;

/// Parses raw document bytes into a [`LoadedDocument`]
pub trait DocumentEngine: Send + Sync + 'static {
    fn load_document(&self, bytes: Vec<u8>) -> ViewerResult<Arc<dyn LoadedDocument>>;
}

/// A decoded document. Page numbers are 1-based.
///
/// Implementations render the page bitmap only: text and annotation
/// layers are never drawn.
pub trait LoadedDocument: Send + Sync + fmt::Debug {
    fn page_count(&self) -> u32;

    fn page_geometry(&self, page: u32) -> ViewerResult<PageGeometry>;

    fn render_page(&self, page: u32, scale: f32) -> ViewerResult<Bitmap>;
}

/// Pixel size of a page rendered at `scale`, never smaller than 1x1
pub fn bitmap_size(geometry: PageGeometry, scale: f32) -> (u32, u32) {
    let (width, height) = geometry.scaled(scale);
    (width.round().max(1.0) as u32, height.round().max(1.0) as u32)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bitmap_size_rounds_scaled_geometry() {
        let geometry = PageGeometry::new(612.0, 792.0);
        assert_eq!(bitmap_size(geometry, 1.0), (612, 792));
        assert_eq!(bitmap_size(geometry, 0.5), (306, 396));
        assert_eq!(bitmap_size(PageGeometry::new(0.0, 0.0), 2.0), (1, 1));
    }
}
