//! Resize debouncing
//!
//! The debouncer does not own a clock. It hands out a [`TimerTicket`]
//! for every resize; the shell sleeps for `ticket.delay` and reports
//! back with [`ResizeDebouncer::fire`]. Only the newest ticket is
//! honoured, so a burst of resizes produces a single re-fit.

use std::time::Duration;

use crate::geometry::ContainerSize;

/// A pending timer the shell must wait on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimerTicket {
    pub id: u64,
    pub delay: Duration,
}

#[derive(Debug, Clone)]
pub struct ResizeDebouncer {
    delay: Duration,
    next_id: u64,
    pending: Option<(u64, ContainerSize)>,
}

impl ResizeDebouncer {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            next_id: 0,
            pending: None,
        }
    }

    /// Supersede any pending timer with one for `size`
    pub fn schedule(&mut self, size: ContainerSize) -> TimerTicket {
        self.next_id += 1;
        self.pending = Some((self.next_id, size));
        TimerTicket {
            id: self.next_id,
            delay: self.delay,
        }
    }

    /// Size to apply if `id` is still the pending timer
    pub fn fire(&mut self, id: u64) -> Option<ContainerSize> {
        match self.pending {
            Some((pending_id, size)) if pending_id == id => {
                self.pending = None;
                Some(size)
            }
            _ => None,
        }
    }

    /// Drop the pending timer. Returns whether one was pending.
    pub fn cancel(&mut self) -> bool {
        self.pending.take().is_some()
    }
}
