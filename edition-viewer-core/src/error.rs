use thiserror::Error;

/// Failures the viewer turns into display state.
///
/// Nothing here is retried automatically. A document load failure is
/// only recovered by opening the document again.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ViewerError {
    /// Document bytes were unreachable or could not be decoded
    #[error("failed to load document: {0}")]
    DocumentLoad(String),

    /// A single page failed to rasterize
    #[error("failed to render page {page}: {message}")]
    PageRender { page: u32, message: String },

    /// The engine was asked for a page the document does not have
    #[error("page {page} is out of range (document has {page_count} pages)")]
    PageOutOfRange { page: u32, page_count: u32 },
}

impl ViewerError {
    pub fn document_load(message: impl Into<String>) -> Self {
        Self::DocumentLoad(message.into())
    }

    pub fn page_render(page: u32, message: impl Into<String>) -> Self {
        Self::PageRender {
            page,
            message: message.into(),
        }
    }

    /// Short message suitable for the canvas placeholder.
    pub fn user_message(&self) -> &'static str {
        match self {
            Self::DocumentLoad(_) => "We couldn't load this issue. Please try again later.",
            Self::PageRender { .. } | Self::PageOutOfRange { .. } => {
                "This page couldn't be displayed. Try another page."
            }
        }
    }
}

pub type ViewerResult<T> = Result<T, ViewerError>;
