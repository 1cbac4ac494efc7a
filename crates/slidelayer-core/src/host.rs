#![forbid(unsafe_code)]

//! The seam between the layer and the UI toolkit driving it.
//!
//! A host adapter forwards pointer events and size changes into a
//! [`SlidingLayer`](crate::SlidingLayer) and implements [`LayerHost`] so the
//! layer can read the clock, ask for frames and publish [`LayerEvent`]s.

use std::time::Duration;

use web_time::Instant;

use crate::event::LayerEvent;
use crate::touch::ScrollQuery;

/// Services the layer needs from its host.
pub trait LayerHost {
    /// Monotonic time on the same base as pointer event timestamps.
    fn now(&self) -> Duration;

    /// Schedule one more [`SlidingLayer::on_frame`](crate::SlidingLayer::on_frame)
    /// call for the next display frame.
    fn request_frame(&mut self);

    /// The layer was re-anchored and needs a fresh measurement.
    fn request_layout(&mut self) {}

    /// Publish a notification.
    fn emit(&mut self, event: LayerEvent);

    /// Whether content under `(query.x, query.y)` can scroll by
    /// `query.delta` along `query.axis` itself. Such moves are left to it.
    fn descendant_can_scroll(&self, query: ScrollQuery) -> bool {
        let _ = query;
        false
    }
}

/// Wall clock anchored at construction.
#[derive(Debug, Clone, Copy)]
pub struct MonotonicClock {
    origin: Instant,
}

impl Default for MonotonicClock {
    fn default() -> Self {
        Self::new()
    }
}

impl MonotonicClock {
    #[must_use]
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }

    /// Time since construction.
    #[must_use]
    pub fn now(&self) -> Duration {
        self.origin.elapsed()
    }
}

/// Minimal host for toolkits that poll: events go to a callback and frame
/// requests are latched until taken.
pub struct CallbackHost<F: FnMut(LayerEvent)> {
    clock: MonotonicClock,
    on_event: F,
    frame_pending: bool,
    layout_pending: bool,
}

impl<F: FnMut(LayerEvent)> CallbackHost<F> {
    pub fn new(on_event: F) -> Self {
        Self {
            clock: MonotonicClock::new(),
            on_event,
            frame_pending: false,
            layout_pending: false,
        }
    }

    /// Consume a pending frame request.
    pub fn take_frame_request(&mut self) -> bool {
        std::mem::take(&mut self.frame_pending)
    }

    /// Consume a pending layout request.
    pub fn take_layout_request(&mut self) -> bool {
        std::mem::take(&mut self.layout_pending)
    }
}

impl<F: FnMut(LayerEvent)> LayerHost for CallbackHost<F> {
    fn now(&self) -> Duration {
        self.clock.now()
    }

    fn request_frame(&mut self) {
        self.frame_pending = true;
    }

    fn request_layout(&mut self) {
        self.layout_pending = true;
    }

    fn emit(&mut self, event: LayerEvent) {
        (self.on_event)(event);
    }
}
