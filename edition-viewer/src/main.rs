use anyhow::Context;
use clap::Parser;
use edition_viewer_core::surface::RenderJob;
use edition_viewer_core::{
    Command, ContainerSize, CursorStyle, DocumentEngine, DocumentStatus, Event, LoadedDocument,
    PageContent, Point, RenderedPage, ScrollOffset, Viewer, ViewerConfig, ViewerError,
    ViewerResult,
};
use iced::advanced::image::Bytes;
use iced::{
    mouse,
    widget::{
        button, column, container, image as img, mouse_area, row, scrollable, text,
        vertical_rule,
    },
    window, Alignment, Element, Length, Size, Subscription, Task, Theme,
};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

mod renderer;
mod skeleton;
mod source;

use source::DocumentSource;

/// Height reserved for the toolbar above the page region
const TOOLBAR_HEIGHT: f32 = 52.0;

#[derive(Debug, Parser)]
#[command(name = "edition-viewer", version, about = "Read an issue of the paper")]
struct Cli {
    /// URL or path of the issue to open
    url: String,

    /// Initial window width
    #[arg(long, default_value_t = 1100.0)]
    width: f32,

    /// Initial window height
    #[arg(long, default_value_t = 900.0)]
    height: f32,

    /// JSON file overriding zoom step, page padding or resize debounce
    #[arg(long)]
    config: Option<PathBuf>,
}

fn load_config(path: &Path) -> anyhow::Result<ViewerConfig> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config {}", path.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("Invalid config {}", path.display()))
}

fn main() -> iced::Result {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("edition_viewer=debug,edition_viewer_core=debug,info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let cli = Cli::parse();
    let window_size = Size::new(cli.width, cli.height);
    let config = match cli.config.as_deref() {
        Some(path) => load_config(path).unwrap_or_else(|e| {
            tracing::warn!("{:#}; using defaults", e);
            ViewerConfig::default()
        }),
        None => ViewerConfig::default(),
    };

    iced::application("Edition Viewer", EditionViewer::update, EditionViewer::view)
        .subscription(EditionViewer::subscription)
        .theme(|_| Theme::Light)
        .window_size(window_size)
        .run_with(move || EditionViewer::new(cli.url, config, window_size))
}

#[derive(Debug, Clone)]
enum Message {
    Viewer(Event),
    CursorMoved(Point),
    PointerPressed,
}

struct EditionViewer {
    viewer: Viewer,
    engine: Arc<dyn DocumentEngine>,
    cursor: Point,
    page_image: Option<(Arc<RenderedPage>, img::Handle)>,
}

/// Pixels of a cached page, lent to iced without copying
struct PagePixels(Arc<RenderedPage>);

impl AsRef<[u8]> for PagePixels {
    fn as_ref(&self) -> &[u8] {
        self.0.bitmap.as_raw()
    }
}

fn page_scroll_id() -> scrollable::Id {
    scrollable::Id::new("page-canvas")
}

/// Page region left once the toolbar is taken out of the window
fn container_size(window: Size) -> ContainerSize {
    ContainerSize::new(window.width, (window.height - TOOLBAR_HEIGHT).max(0.0))
}

fn interaction(cursor: CursorStyle) -> mouse::Interaction {
    match cursor {
        CursorStyle::Default => mouse::Interaction::Idle,
        CursorStyle::Grab => mouse::Interaction::Grab,
        CursorStyle::Grabbing => mouse::Interaction::Grabbing,
    }
}

async fn load_document(
    engine: Arc<dyn DocumentEngine>,
    url: String,
) -> ViewerResult<Arc<dyn LoadedDocument>> {
    let bytes = DocumentSource::parse(&url)
        .fetch()
        .await
        .map_err(|e| ViewerError::document_load(e.to_string()))?;

    tokio::task::spawn_blocking(move || engine.load_document(bytes))
        .await
        .map_err(|e| ViewerError::document_load(e.to_string()))?
}

async fn render_page(job: RenderJob) -> ViewerResult<RenderedPage> {
    let page = job.request.page;
    tokio::task::spawn_blocking(move || job.run())
        .await
        .map_err(|e| ViewerError::page_render(page, e.to_string()))?
}

impl EditionViewer {
    fn new(url: String, config: ViewerConfig, window_size: Size) -> (Self, Task<Message>) {
        let mut app = Self {
            viewer: Viewer::new(config, container_size(window_size)),
            engine: renderer::engine(),
            cursor: Point::default(),
            page_image: None,
        };
        let task = app.dispatch(Event::Open(url));
        (app, task)
    }

    fn update(&mut self, message: Message) -> Task<Message> {
        let event = match message {
            Message::Viewer(event) => event,
            Message::CursorMoved(position) => {
                self.cursor = position;
                Event::PointerMoved(position)
            }
            Message::PointerPressed => Event::PointerDown(self.cursor),
        };
        self.dispatch(event)
    }

    fn dispatch(&mut self, event: Event) -> Task<Message> {
        let commands = self.viewer.update(event);
        self.sync_page_image();
        Task::batch(commands.into_iter().map(|command| self.perform(command)))
    }

    fn perform(&self, command: Command) -> Task<Message> {
        match command {
            Command::Decode(request) => {
                let generation = request.generation;
                Task::perform(
                    load_document(self.engine.clone(), request.url),
                    move |result| Message::Viewer(Event::Decoded { generation, result }),
                )
            }
            Command::Render(job) => {
                let token = job.request.token;
                Task::perform(render_page(job), move |result| {
                    Message::Viewer(Event::Rendered { token, result })
                })
            }
            Command::ScrollTo(offset) => scrollable::scroll_to(
                page_scroll_id(),
                scrollable::AbsoluteOffset {
                    x: offset.x,
                    y: offset.y,
                },
            ),
            Command::StartTimer(ticket) => {
                Task::perform(tokio::time::sleep(ticket.delay), move |_| {
                    Message::Viewer(Event::ResizeSettled(ticket.id))
                })
            }
        }
    }

    /// Upload a new image handle only when the displayed bitmap changes
    fn sync_page_image(&mut self) {
        let PageContent::Ready(rendered) = self.viewer.surface().content() else {
            self.page_image = None;
            return;
        };
        let current = self
            .page_image
            .as_ref()
            .is_some_and(|(shown, _)| Arc::ptr_eq(shown, rendered));
        if !current {
            let handle = img::Handle::from_rgba(
                rendered.bitmap.width(),
                rendered.bitmap.height(),
                Bytes::from_owner(PagePixels(rendered.clone())),
            );
            self.page_image = Some((rendered.clone(), handle));
        }
    }

    fn subscription(&self) -> Subscription<Message> {
        window::resize_events()
            .map(|(_id, size)| Message::Viewer(Event::Resized(container_size(size))))
    }

    fn view(&self) -> Element<Message> {
        let body = match self.viewer.surface().status() {
            DocumentStatus::Closed | DocumentStatus::Loading => skeleton::view(),
            DocumentStatus::Failed(e) => notice(e.user_message()),
            DocumentStatus::Ready { .. } => self.page_view(),
        };

        column![self.toolbar(), body].into()
    }

    fn toolbar(&self) -> Element<Message> {
        let model = self.viewer.toolbar();
        let on = |enabled: bool, event: Event| enabled.then(|| Message::Viewer(event));

        row![
            button("← Prev").on_press_maybe(on(model.can_go_previous, Event::PreviousPage)),
            text(model.page_label),
            button("Next →").on_press_maybe(on(model.can_go_next, Event::NextPage)),
            vertical_rule(1.0_f32),
            button("Zoom −").on_press_maybe(on(model.can_zoom_out, Event::ZoomOut)),
            text(model.zoom_label),
            button("Zoom +").on_press_maybe(on(model.can_zoom_in, Event::ZoomIn)),
            button("Fit width").on_press_maybe(on(model.can_fit, Event::FitToWidth)),
        ]
        .spacing(10)
        .padding(10)
        .height(Length::Fixed(TOOLBAR_HEIGHT))
        .align_y(Alignment::Center)
        .into()
    }

    fn page_view(&self) -> Element<Message> {
        let page = match (self.viewer.surface().content(), &self.page_image) {
            (PageContent::Failed(e), _) => return notice(e.user_message()),
            (PageContent::Ready(_), Some((_, handle))) => img(handle.clone()),
            _ => return notice("Rendering page..."),
        };

        let padding = self.viewer.state().config().page_padding;
        let canvas = scrollable(container(page).padding(padding))
            .id(page_scroll_id())
            .direction(scrollable::Direction::Both {
                vertical: scrollable::Scrollbar::default(),
                horizontal: scrollable::Scrollbar::default(),
            })
            .on_scroll(|viewport| {
                let offset = viewport.absolute_offset();
                Message::Viewer(Event::Scrolled(ScrollOffset::new(offset.x, offset.y)))
            })
            .width(Length::Fill)
            .height(Length::Fill);

        mouse_area(canvas)
            .on_press(Message::PointerPressed)
            .on_release(Message::Viewer(Event::PointerUp))
            .on_exit(Message::Viewer(Event::PointerLeft))
            .on_move(|position| Message::CursorMoved(Point::new(position.x, position.y)))
            .interaction(interaction(self.viewer.cursor()))
            .into()
    }
}

fn notice<'a>(message: &'a str) -> Element<'a, Message> {
    container(text(message).size(16))
        .width(Length::Fill)
        .height(Length::Fill)
        .center_x(Length::Fill)
        .center_y(Length::Fill)
        .into()
}
