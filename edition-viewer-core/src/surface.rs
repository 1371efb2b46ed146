//! Render surface
//!
//! Owns the decoded document and decides which engine results reach the
//! screen. Every decode is tagged with a document generation and every
//! render with a monotonic token; a result whose tag is no longer the
//! latest is discarded when it arrives.

use std::num::NonZeroUsize;
use std::sync::Arc;

use lru::LruCache;

use crate::engine::{Bitmap, LoadedDocument};
use crate::error::{ViewerError, ViewerResult};
use crate::geometry::PageGeometry;

/// Number of rendered pages kept for instant revisits
const PAGE_CACHE_SIZE: usize = 10;

/// Pixel memory the page cache may hold before evicting early
const PAGE_CACHE_BYTES: usize = 256 * 1024 * 1024;

/// Ask the shell to fetch and decode `url`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodeRequest {
    pub generation: u64,
    pub url: String,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderRequest {
    pub token: u64,
    pub page: u32,
    pub scale: f32,
}

/// A render the shell should run off the UI thread
#[derive(Debug, Clone)]
pub struct RenderJob {
    pub request: RenderRequest,
    document: Arc<dyn LoadedDocument>,
}

impl RenderJob {
    /// Query the page size and rasterize it. Blocks.
    pub fn run(&self) -> ViewerResult<RenderedPage> {
        let RenderRequest { page, scale, .. } = self.request;
        let geometry = self.document.page_geometry(page)?;
        let bitmap = self.document.render_page(page, scale)?;
        Ok(RenderedPage {
            page,
            scale,
            geometry,
            bitmap,
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RenderedPage {
    pub page: u32,
    pub scale: f32,
    pub geometry: PageGeometry,
    pub bitmap: Bitmap,
}

impl RenderedPage {
    fn key(&self) -> (u32, u32) {
        cache_key(self.page, self.scale)
    }

    fn byte_size(&self) -> usize {
        self.bitmap.as_raw().len()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum DocumentStatus {
    /// No document open
    Closed,
    Loading,
    Ready { page_count: u32 },
    Failed(ViewerError),
}

/// What the page area shows
#[derive(Debug, Clone, PartialEq)]
pub enum PageContent {
    /// Placeholder until the first bitmap for this page arrives
    Pending,
    Ready(Arc<RenderedPage>),
    Failed(ViewerError),
}

#[derive(Debug, Clone, PartialEq)]
pub enum DecodeOutcome {
    /// Result for a document that is no longer open
    Stale,
    Loaded { page_count: u32 },
    Failed,
}

#[derive(Debug, Clone, PartialEq)]
pub enum RenderOutcome {
    /// Superseded by a newer request
    Stale,
    Applied { page: u32, geometry: PageGeometry },
    Failed,
}

/// Result of asking for the current `(page, scale)`
#[derive(Debug, Clone)]
pub enum RenderPlan {
    /// Already requested or on screen
    Unchanged,
    /// Served from the page cache, now on screen
    Cached { page: u32, geometry: PageGeometry },
    Job(RenderJob),
}

#[derive(Debug)]
pub struct RenderSurface {
    generation: u64,
    next_token: u64,
    document: Option<Arc<dyn LoadedDocument>>,
    status: DocumentStatus,
    content: PageContent,
    latest: Option<RenderRequest>,
    cache: PageCache,
}

fn cache_key(page: u32, scale: f32) -> (u32, u32) {
    (page, (scale * 1000.0).round() as u32)
}

/// Rendered pages keyed by `(page, scale in thousandths)`.
///
/// Bounded by entry count and by total pixel bytes; whichever limit is hit
/// first evicts the least recently shown page. The newest entry is always
/// kept, even when it alone exceeds the byte budget.
#[derive(Debug)]
struct PageCache {
    entries: LruCache<(u32, u32), Arc<RenderedPage>>,
    max_bytes: usize,
    bytes: usize,
}

impl PageCache {
    fn new(capacity: usize, max_bytes: usize) -> Self {
        Self {
            entries: LruCache::new(NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN)),
            max_bytes,
            bytes: 0,
        }
    }

    /// Look up a page, promoting it in the LRU order
    fn get(&mut self, key: (u32, u32)) -> Option<Arc<RenderedPage>> {
        self.entries.get(&key).cloned()
    }

    fn insert(&mut self, rendered: Arc<RenderedPage>) {
        self.bytes += rendered.byte_size();
        if let Some((_, replaced)) = self.entries.push(rendered.key(), rendered) {
            self.bytes -= replaced.byte_size();
        }
        while self.bytes > self.max_bytes && self.entries.len() > 1 {
            match self.entries.pop_lru() {
                Some((_, evicted)) => self.bytes -= evicted.byte_size(),
                None => break,
            }
        }
    }

    fn clear(&mut self) {
        self.entries.clear();
        self.bytes = 0;
    }
}

impl RenderSurface {
    pub fn new() -> Self {
        Self {
            generation: 0,
            next_token: 0,
            document: None,
            status: DocumentStatus::Closed,
            content: PageContent::Pending,
            latest: None,
            cache: PageCache::new(PAGE_CACHE_SIZE, PAGE_CACHE_BYTES),
        }
    }

    pub fn status(&self) -> &DocumentStatus {
        &self.status
    }

    pub fn content(&self) -> &PageContent {
        &self.content
    }

    pub fn is_ready(&self) -> bool {
        matches!(self.status, DocumentStatus::Ready { .. })
    }

    /// Page currently on screen
    pub fn displayed(&self) -> Option<&RenderedPage> {
        match &self.content {
            PageContent::Ready(page) => Some(page),
            _ => None,
        }
    }

    /// Discard the current document and start loading `url`
    pub fn open(&mut self, url: impl Into<String>) -> DecodeRequest {
        self.discard();
        self.status = DocumentStatus::Loading;
        let url = url.into();
        tracing::info!("loading document {} (generation {})", url, self.generation);
        DecodeRequest {
            generation: self.generation,
            url,
        }
    }

    /// Tear down; outstanding decode and render results become no-ops
    pub fn close(&mut self) {
        self.discard();
        self.status = DocumentStatus::Closed;
    }

    fn discard(&mut self) {
        self.generation += 1;
        self.document = None;
        self.content = PageContent::Pending;
        self.latest = None;
        self.cache.clear();
    }

    pub fn on_decoded(
        &mut self,
        generation: u64,
        result: ViewerResult<Arc<dyn LoadedDocument>>,
    ) -> DecodeOutcome {
        if generation != self.generation || self.status != DocumentStatus::Loading {
            tracing::debug!(
                "discarding decode for generation {} (current {})",
                generation,
                self.generation
            );
            return DecodeOutcome::Stale;
        }

        let result = result.and_then(|document| match document.page_count() {
            0 => Err(ViewerError::document_load("document has no pages")),
            _ => Ok(document),
        });

        match result {
            Ok(document) => {
                let page_count = document.page_count();
                self.document = Some(document);
                self.status = DocumentStatus::Ready { page_count };
                DecodeOutcome::Loaded { page_count }
            }
            Err(e) => {
                tracing::error!("{}", e);
                self.status = DocumentStatus::Failed(e);
                DecodeOutcome::Failed
            }
        }
    }

    /// Ask for `page` at `scale`, superseding any earlier request
    pub fn request(&mut self, page: u32, scale: f32) -> RenderPlan {
        let Some(document) = self.document.clone() else {
            return RenderPlan::Unchanged;
        };

        let key = cache_key(page, scale);
        if self
            .latest
            .is_some_and(|latest| cache_key(latest.page, latest.scale) == key)
        {
            return RenderPlan::Unchanged;
        }

        self.next_token += 1;
        let request = RenderRequest {
            token: self.next_token,
            page,
            scale,
        };
        self.latest = Some(request);

        if let Some(hit) = self.cache.get(key) {
            tracing::debug!("page {} at {:.2}x served from cache", page, scale);
            let geometry = hit.geometry;
            self.content = PageContent::Ready(hit);
            return RenderPlan::Cached { page, geometry };
        }

        // Keep the old bitmap while a new scale renders; a new page starts blank
        if self.displayed().map(|shown| shown.page) != Some(page) {
            self.content = PageContent::Pending;
        }

        tracing::debug!("requesting page {} at {:.2}x (token {})", page, scale, request.token);
        RenderPlan::Job(RenderJob { request, document })
    }

    pub fn on_rendered(&mut self, token: u64, result: ViewerResult<RenderedPage>) -> RenderOutcome {
        if self.latest.map(|latest| latest.token) != Some(token) {
            tracing::debug!("discarding stale render (token {})", token);
            return RenderOutcome::Stale;
        }

        match result {
            Ok(rendered) => {
                let page = rendered.page;
                let geometry = rendered.geometry;
                let rendered = Arc::new(rendered);
                self.cache.insert(rendered.clone());
                self.content = PageContent::Ready(rendered);
                RenderOutcome::Applied { page, geometry }
            }
            Err(e) => {
                tracing::warn!("{}", e);
                self.content = PageContent::Failed(e);
                RenderOutcome::Failed
            }
        }
    }

}

impl Default for RenderSurface {
    fn default() -> Self {
        Self::new()
    }
}
