//! Viewer orchestration
//!
//! [`Viewer`] ties the view state, render surface and resize debouncer
//! together. The shell feeds it [`Event`]s and carries out the
//! [`Command`]s it returns; nothing in here blocks or spawns.

use std::sync::Arc;

use crate::config::ViewerConfig;
use crate::debounce::{ResizeDebouncer, TimerTicket};
use crate::engine::LoadedDocument;
use crate::error::ViewerResult;
use crate::geometry::{ContainerSize, Point, ScrollOffset};
use crate::pan::CursorStyle;
use crate::surface::{
    DecodeOutcome, DecodeRequest, RenderJob, RenderOutcome, RenderPlan, RenderSurface,
    RenderedPage,
};
use crate::toolbar::ToolbarModel;
use crate::viewport::ViewState;

#[derive(Debug, Clone)]
pub enum Event {
    /// Show a new document, replacing the current one
    Open(String),
    Decoded {
        generation: u64,
        result: ViewerResult<Arc<dyn LoadedDocument>>,
    },
    Rendered {
        token: u64,
        result: ViewerResult<RenderedPage>,
    },
    NextPage,
    PreviousPage,
    ZoomIn,
    ZoomOut,
    FitToWidth,
    /// Raw container size, applied once resizing goes quiet
    Resized(ContainerSize),
    ResizeSettled(u64),
    PointerDown(Point),
    PointerMoved(Point),
    PointerUp,
    PointerLeft,
    Scrolled(ScrollOffset),
    /// The viewer is going away
    Close,
}

/// Work for the shell
#[derive(Debug, Clone)]
pub enum Command {
    /// Fetch and decode a document, then report [`Event::Decoded`]
    Decode(DecodeRequest),
    /// Run the job off the UI thread, then report [`Event::Rendered`]
    Render(RenderJob),
    /// Move the page region's scroll position
    ScrollTo(ScrollOffset),
    /// Sleep for the ticket's delay, then report [`Event::ResizeSettled`]
    StartTimer(TimerTicket),
}

#[derive(Debug)]
pub struct Viewer {
    state: ViewState,
    surface: RenderSurface,
    resize: ResizeDebouncer,
}

impl Viewer {
    pub fn new(config: ViewerConfig, container: ContainerSize) -> Self {
        Self {
            state: ViewState::new(config, container),
            surface: RenderSurface::new(),
            resize: ResizeDebouncer::new(config.resize_debounce()),
        }
    }

    pub fn state(&self) -> &ViewState {
        &self.state
    }

    pub fn surface(&self) -> &RenderSurface {
        &self.surface
    }

    pub fn toolbar(&self) -> ToolbarModel {
        ToolbarModel::new(&self.state, self.surface.status())
    }

    pub fn cursor(&self) -> CursorStyle {
        self.state.cursor()
    }

    pub fn update(&mut self, event: Event) -> Vec<Command> {
        let mut commands = Vec::new();

        match event {
            Event::Open(url) => {
                self.resize.cancel();
                self.state.reset();
                commands.push(Command::Decode(self.surface.open(url)));
                commands.push(Command::ScrollTo(ScrollOffset::ORIGIN));
            }
            Event::Decoded { generation, result } => {
                match self.surface.on_decoded(generation, result) {
                    DecodeOutcome::Loaded { page_count } => {
                        self.state.on_document_metadata_loaded(page_count);
                        self.render(&mut commands);
                    }
                    DecodeOutcome::Failed => self.state.on_document_load_failed(),
                    DecodeOutcome::Stale => {}
                }
            }
            Event::Rendered { token, result } => {
                if let RenderOutcome::Applied { page, geometry } =
                    self.surface.on_rendered(token, result)
                {
                    if self.state.on_page_metadata_loaded(page, geometry) {
                        self.render(&mut commands);
                    }
                }
            }
            Event::NextPage => {
                if self.surface.is_ready() && self.state.go_to_next_page() {
                    commands.push(Command::ScrollTo(ScrollOffset::ORIGIN));
                    self.render(&mut commands);
                }
            }
            Event::PreviousPage => {
                if self.surface.is_ready() && self.state.go_to_previous_page() {
                    commands.push(Command::ScrollTo(ScrollOffset::ORIGIN));
                    self.render(&mut commands);
                }
            }
            Event::ZoomIn => {
                if self.surface.is_ready() && self.state.zoom_in() {
                    self.render(&mut commands);
                }
            }
            Event::ZoomOut => {
                if self.surface.is_ready() && self.state.zoom_out() {
                    self.render(&mut commands);
                }
            }
            Event::FitToWidth => {
                if self.surface.is_ready() {
                    self.state.fit_to_width();
                    commands.push(Command::ScrollTo(ScrollOffset::ORIGIN));
                    self.render(&mut commands);
                }
            }
            Event::Resized(size) => {
                commands.push(Command::StartTimer(self.resize.schedule(size)));
            }
            Event::ResizeSettled(id) => {
                if let Some(size) = self.resize.fire(id) {
                    tracing::debug!("container settled at {}x{}", size.width, size.height);
                    if self.state.resize(size) {
                        self.render(&mut commands);
                    }
                }
            }
            Event::PointerDown(pointer) => {
                self.state.pointer_down(pointer);
            }
            Event::PointerMoved(pointer) => {
                if let Some(scroll) = self.state.pointer_move(pointer) {
                    commands.push(Command::ScrollTo(scroll));
                }
            }
            Event::PointerUp => {
                self.state.pointer_up();
            }
            Event::PointerLeft => {
                self.state.pointer_leave();
            }
            Event::Scrolled(offset) => self.state.on_scrolled(offset),
            Event::Close => {
                self.resize.cancel();
                self.surface.close();
                self.state.reset();
            }
        }

        commands
    }

    /// Request the current page at the current scale.
    ///
    /// A cache hit reports geometry immediately, which can change the fit
    /// scale once more.
    fn render(&mut self, commands: &mut Vec<Command>) {
        loop {
            match self
                .surface
                .request(self.state.current_page(), self.state.scale())
            {
                RenderPlan::Job(job) => {
                    commands.push(Command::Render(job));
                    break;
                }
                RenderPlan::Cached { page, geometry } => {
                    if !self.state.on_page_metadata_loaded(page, geometry) {
                        break;
                    }
                }
                RenderPlan::Unchanged => break,
            }
        }
    }
}
