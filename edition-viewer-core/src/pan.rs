//! Drag-to-pan state machine
//!
//! A drag session only exists between a pointer press and its release
//! (or the pointer leaving the page region), and only when the page is
//! zoomed beyond the fit scale.

use serde::{Deserialize, Serialize};

use crate::geometry::{Point, ScrollOffset};

/// Pointer and scroll position captured when a drag starts
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DragSession {
    pub start_pointer: Point,
    pub start_scroll: ScrollOffset,
}

impl DragSession {
    /// Scroll offset for the pointer at `pointer`.
    ///
    /// Dragging the content left scrolls the view right, so the pointer
    /// delta is inverted.
    pub fn scroll_for(&self, pointer: Point, max: ScrollOffset) -> ScrollOffset {
        ScrollOffset::new(
            self.start_scroll.x + (self.start_pointer.x - pointer.x),
            self.start_scroll.y + (self.start_pointer.y - pointer.y),
        )
        .clamped(max)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub enum PanState {
    #[default]
    Idle,
    Dragging(DragSession),
}

/// Cursor shown over the page region
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CursorStyle {
    Default,
    /// Open hand: the page can be dragged
    Grab,
    /// Closed hand: a drag is in progress
    Grabbing,
}

impl PanState {
    /// Start a session if the page is pannable. Returns whether one started.
    pub fn begin(&mut self, pointer: Point, scroll: ScrollOffset, pannable: bool) -> bool {
        if !pannable {
            return false;
        }
        *self = PanState::Dragging(DragSession {
            start_pointer: pointer,
            start_scroll: scroll,
        });
        true
    }

    /// New scroll offset for a pointer move, `None` when idle
    pub fn drag_to(&self, pointer: Point, max: ScrollOffset) -> Option<ScrollOffset> {
        match self {
            PanState::Idle => None,
            PanState::Dragging(session) => Some(session.scroll_for(pointer, max)),
        }
    }

    /// Tear down any session. Returns whether one was active.
    pub fn end(&mut self) -> bool {
        let was_dragging = self.is_dragging();
        *self = PanState::Idle;
        was_dragging
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self, PanState::Dragging(_))
    }

    pub fn cursor(&self, pannable: bool) -> CursorStyle {
        match self {
            PanState::Dragging(_) => CursorStyle::Grabbing,
            PanState::Idle if pannable => CursorStyle::Grab,
            PanState::Idle => CursorStyle::Default,
        }
    }
}
