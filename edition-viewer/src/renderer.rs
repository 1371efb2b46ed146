use anyhow::{Context, Result};
use edition_viewer_core::engine::bitmap_size;
use edition_viewer_core::{
    Bitmap, DocumentEngine, LoadedDocument, PageGeometry, ViewerError, ViewerResult,
};
use pdfium_render::prelude::*;
use std::sync::Arc;

/// Document engine backed by PDFium
pub struct PdfiumEngine {
    pdfium: &'static Pdfium,
}

impl PdfiumEngine {
    /// Bind PDFium, looking next to the executable, then in the working
    /// directory, then in the system library paths.
    pub fn new() -> Result<Self> {
        let exe_dir = std::env::current_exe()
            .ok()
            .and_then(|p| p.parent().map(|p| p.to_path_buf()));

        let bindings = exe_dir
            .and_then(|dir| {
                Pdfium::bind_to_library(Pdfium::pdfium_platform_library_name_at_path(&dir)).ok()
            })
            .map(Ok)
            .unwrap_or_else(|| {
                Pdfium::bind_to_library(Pdfium::pdfium_platform_library_name_at_path("./"))
                    .or_else(|_| Pdfium::bind_to_system_library())
            })
            .context("Failed to bind to PDFium library. Please install PDFium or download the library from https://github.com/bblanchon/pdfium-binaries")?;

        // Documents borrow the library for as long as the process runs
        let pdfium: &'static Pdfium = Box::leak(Box::new(Pdfium::new(bindings)));
        Ok(Self { pdfium })
    }
}

impl DocumentEngine for PdfiumEngine {
    fn load_document(&self, bytes: Vec<u8>) -> ViewerResult<Arc<dyn LoadedDocument>> {
        let document = self
            .pdfium
            .load_pdf_from_byte_vec(bytes, None)
            .map_err(|e| ViewerError::document_load(e.to_string()))?;
        Ok(Arc::new(PdfiumDocument { inner: document }))
    }
}

pub struct PdfiumDocument {
    inner: PdfDocument<'static>,
}

// Manual Debug impl since PdfDocument holds pdfium handles
impl std::fmt::Debug for PdfiumDocument {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PdfiumDocument")
            .field("page_count", &self.page_count())
            .finish()
    }
}

impl PdfiumDocument {
    fn page(&self, page: u32) -> ViewerResult<PdfPage<'_>> {
        let out_of_range = || ViewerError::PageOutOfRange {
            page,
            page_count: self.page_count(),
        };
        let index = page
            .checked_sub(1)
            .and_then(|index| u16::try_from(index).ok())
            .ok_or_else(out_of_range)?;
        self.inner.pages().get(index).map_err(|_| out_of_range())
    }
}

impl LoadedDocument for PdfiumDocument {
    fn page_count(&self) -> u32 {
        self.inner.pages().len() as u32
    }

    fn page_geometry(&self, page: u32) -> ViewerResult<PageGeometry> {
        let page = self.page(page)?;
        Ok(PageGeometry::new(page.width().value, page.height().value))
    }

    fn render_page(&self, page_number: u32, scale: f32) -> ViewerResult<Bitmap> {
        let page = self.page(page_number)?;
        let geometry = PageGeometry::new(page.width().value, page.height().value);
        let (width, height) = bitmap_size(geometry, scale);

        // Bitmap only: no text layer, annotations or form widgets
        let render_config = PdfRenderConfig::new()
            .set_target_width(width as i32)
            .set_maximum_height(height as i32)
            .render_annotations(false)
            .render_form_data(false)
            .rotate_if_landscape(PdfPageRenderRotation::None, false);

        let bitmap = page
            .render_with_config(&render_config)
            .map_err(|e| ViewerError::page_render(page_number, e.to_string()))?;

        Bitmap::from_raw(
            bitmap.width() as u32,
            bitmap.height() as u32,
            bitmap.as_rgba_bytes(),
        )
        .ok_or_else(|| ViewerError::page_render(page_number, "bitmap size mismatch"))
    }
}

/// Stand-in used when PDFium could not be bound; every load fails
pub struct UnavailableEngine {
    reason: String,
}

impl UnavailableEngine {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

impl DocumentEngine for UnavailableEngine {
    fn load_document(&self, _bytes: Vec<u8>) -> ViewerResult<Arc<dyn LoadedDocument>> {
        Err(ViewerError::document_load(self.reason.clone()))
    }
}

/// PDFium if it can be bound, otherwise an engine that reports why not
pub fn engine() -> Arc<dyn DocumentEngine> {
    match PdfiumEngine::new() {
        Ok(engine) => Arc::new(engine),
        Err(e) => {
            tracing::error!("{:#}", e);
            Arc::new(UnavailableEngine::new(format!("{:#}", e)))
        }
    }
}
