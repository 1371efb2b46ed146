//! Core of the edition viewer: geometry, view state, pan and zoom, and
//! the render surface that keeps stale engine results off the screen.
//!
//! The crate has no GUI or PDF dependency. A shell implements
//! [`engine::DocumentEngine`], forwards input as [`viewer::Event`]s and
//! executes the [`viewer::Command`]s that come back.

pub mod config;
pub mod debounce;
pub mod engine;
pub mod error;
pub mod geometry;
pub mod pan;
pub mod surface;
pub mod toolbar;
pub mod viewer;
pub mod viewport;

pub use config::ViewerConfig;
pub use engine::{Bitmap, DocumentEngine, LoadedDocument};
pub use error::{ViewerError, ViewerResult};
pub use geometry::{compute_fit_scale, ContainerSize, PageGeometry, Point, ScrollOffset};
pub use pan::CursorStyle;
pub use surface::{DocumentStatus, PageContent, RenderedPage};
pub use toolbar::ToolbarModel;
pub use viewer::{Command, Event, Viewer};
pub use viewport::ViewState;
