#![allow(dead_code)]

use std::collections::HashSet;
use std::sync::Arc;

use edition_viewer_core::engine::bitmap_size;
use edition_viewer_core::surface::RenderJob;
use edition_viewer_core::{
    Bitmap, Command, ContainerSize, DocumentEngine, Event, LoadedDocument, PageGeometry, Viewer,
    ViewerConfig, ViewerError, ViewerResult,
};

/// Deterministic stand-in for the PDF engine
#[derive(Debug, Clone)]
pub struct FakeDocument {
    pub pages: Vec<PageGeometry>,
    pub broken: HashSet<u32>,
}

impl FakeDocument {
    pub fn letter(pages: u32) -> Self {
        Self {
            pages: (0..pages).map(|_| PageGeometry::new(612.0, 792.0)).collect(),
            broken: HashSet::new(),
        }
    }

    pub fn with_page(mut self, page: u32, geometry: PageGeometry) -> Self {
        self.pages[(page - 1) as usize] = geometry;
        self
    }

    pub fn with_broken_page(mut self, page: u32) -> Self {
        self.broken.insert(page);
        self
    }
}

impl LoadedDocument for FakeDocument {
    fn page_count(&self) -> u32 {
        self.pages.len() as u32
    }

    fn page_geometry(&self, page: u32) -> ViewerResult<PageGeometry> {
        self.pages
            .get((page as usize).wrapping_sub(1))
            .copied()
            .ok_or_else(|| ViewerError::PageOutOfRange {
                page,
                page_count: self.page_count(),
            })
    }

    fn render_page(&self, page: u32, scale: f32) -> ViewerResult<Bitmap> {
        if self.broken.contains(&page) {
            return Err(ViewerError::page_render(page, "corrupt page stream"));
        }
        let (width, height) = bitmap_size(self.page_geometry(page)?, scale);
        Ok(Bitmap::new(width, height))
    }
}

/// Engine that decodes anything starting with `%PDF` into a letter document
pub struct FakeEngine;

impl DocumentEngine for FakeEngine {
    fn load_document(&self, bytes: Vec<u8>) -> ViewerResult<Arc<dyn LoadedDocument>> {
        if !bytes.starts_with(b"%PDF") {
            return Err(ViewerError::document_load("not a PDF"));
        }
        Ok(Arc::new(FakeDocument::letter(4)))
    }
}

/// A container whose content width fits a letter page at scale 1
pub fn letter_container() -> ContainerSize {
    ContainerSize::new(612.0 + 2.0 * ViewerConfig::default().page_padding, 700.0)
}

pub fn render_jobs(commands: &[Command]) -> Vec<RenderJob> {
    commands
        .iter()
        .filter_map(|command| match command {
            Command::Render(job) => Some(job.clone()),
            _ => None,
        })
        .collect()
}

/// Run a render job and feed its result back
pub fn complete(viewer: &mut Viewer, job: &RenderJob) -> Vec<Command> {
    viewer.update(Event::Rendered {
        token: job.request.token,
        result: job.run(),
    })
}

/// Open `document` and drive every render to completion
pub fn open_settled(document: FakeDocument) -> Viewer {
    let mut viewer = Viewer::new(ViewerConfig::default(), letter_container());
    let commands = viewer.update(Event::Open("issue.pdf".to_string()));
    let generation = match &commands[0] {
        Command::Decode(request) => request.generation,
        other => panic!("expected decode, got {:?}", other),
    };
    let mut commands = viewer.update(Event::Decoded {
        generation,
        result: Ok(Arc::new(document)),
    });
    settle(&mut viewer, &mut commands);
    viewer
}

/// Complete render jobs until none are left
pub fn settle(viewer: &mut Viewer, commands: &mut Vec<Command>) {
    while let Some(job) = render_jobs(commands).pop() {
        *commands = complete(viewer, &job);
    }
}
