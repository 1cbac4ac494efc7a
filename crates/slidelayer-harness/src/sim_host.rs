#![forbid(unsafe_code)]

//! Simulated host with a manual clock.
//!
//! [`SimHost`] records every [`LayerEvent`] with the simulated time it was
//! emitted at, counts frame and layout requests, and answers scroll queries
//! from a list of scrollable regions. [`Simulator`] wraps a layer on top of
//! it and pumps frames the way a display loop would.

use std::time::Duration;

use slidelayer_core::{
    Axis, LayerConfig, LayerError, LayerEvent, LayerHost, PanelSize, PointerEvent, ScrollQuery,
    SlidingLayer,
};

/// Default frame interval (60 Hz, rounded).
pub const FRAME: Duration = Duration::from_millis(16);

/// Upper bound on frames pumped by [`Simulator::run_until_settled`].
pub const MAX_SETTLE_FRAMES: usize = 1_000;

/// A rectangle of content that scrolls along `axis` by itself.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScrollRegion {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub axis: Axis,
    /// Pointer deltas with this sign are scrollable; zero means both signs.
    pub sign: i8,
}

impl ScrollRegion {
    fn accepts(&self, query: &ScrollQuery) -> bool {
        let inside = query.x >= self.x
            && query.x < self.x + self.width
            && query.y >= self.y
            && query.y < self.y + self.height;
        let direction = match self.sign {
            0 => true,
            s if s > 0 => query.delta > 0.0,
            _ => query.delta < 0.0,
        };
        inside && query.axis == self.axis && direction
    }
}

/// Event recorded by [`SimHost`], stamped with simulated time.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Recorded {
    pub at: Duration,
    pub event: LayerEvent,
}

#[derive(Debug, Default)]
pub struct SimHost {
    now: Duration,
    events: Vec<Recorded>,
    frame_requests: usize,
    layout_requests: usize,
    regions: Vec<ScrollRegion>,
}

impl SimHost {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_now(&mut self, now: Duration) {
        self.now = self.now.max(now);
    }

    pub fn advance(&mut self, by: Duration) {
        self.now += by;
    }

    pub fn add_scroll_region(&mut self, region: ScrollRegion) {
        self.regions.push(region);
    }

    #[must_use]
    pub fn recorded(&self) -> &[Recorded] {
        &self.events
    }

    /// Transition events only, without timestamps.
    #[must_use]
    pub fn transitions(&self) -> Vec<LayerEvent> {
        self.events
            .iter()
            .map(|r| r.event)
            .filter(LayerEvent::is_transition)
            .collect()
    }

    /// Exposed-pixel values of every `Scrolled` event, in order.
    #[must_use]
    pub fn scroll_trail(&self) -> Vec<u32> {
        self.events
            .iter()
            .filter_map(|r| r.event.scroll_delta())
            .collect()
    }

    pub fn clear_events(&mut self) {
        self.events.clear();
    }

    #[must_use]
    pub fn frame_requests(&self) -> usize {
        self.frame_requests
    }

    #[must_use]
    pub fn layout_requests(&self) -> usize {
        self.layout_requests
    }
}

impl LayerHost for SimHost {
    fn now(&self) -> Duration {
        self.now
    }

    fn request_frame(&mut self) {
        self.frame_requests += 1;
    }

    fn request_layout(&mut self) {
        self.layout_requests += 1;
    }

    fn emit(&mut self, event: LayerEvent) {
        self.events.push(Recorded {
            at: self.now,
            event,
        });
    }

    fn descendant_can_scroll(&self, query: ScrollQuery) -> bool {
        self.regions.iter().any(|r| r.accepts(&query))
    }
}

/// A layer on a [`SimHost`], plus a frame pump.
#[derive(Debug)]
pub struct Simulator {
    layer: SlidingLayer<SimHost>,
    frame: Duration,
}

impl Simulator {
    /// Build, measure, and forget the initial snap events.
    pub fn new(config: LayerConfig, size: PanelSize) -> Result<Self, LayerError> {
        let mut layer = SlidingLayer::new(config, SimHost::new())?;
        layer.set_size(size);
        layer.host_mut().clear_events();
        Ok(Self {
            layer,
            frame: FRAME,
        })
    }

    #[must_use]
    pub fn with_frame_interval(mut self, frame: Duration) -> Self {
        self.frame = frame.max(Duration::from_millis(1));
        self
    }

    #[must_use]
    pub fn layer(&self) -> &SlidingLayer<SimHost> {
        &self.layer
    }

    pub fn layer_mut(&mut self) -> &mut SlidingLayer<SimHost> {
        &mut self.layer
    }

    #[must_use]
    pub fn host(&self) -> &SimHost {
        self.layer.host()
    }

    #[must_use]
    pub fn now(&self) -> Duration {
        self.layer.host().now()
    }

    /// Deliver one event at its own timestamp, pumping frames that fall due
    /// before it.
    pub fn send(&mut self, event: &PointerEvent) -> bool {
        self.pump_until(event.timestamp);
        self.layer.host_mut().set_now(event.timestamp);
        self.layer.on_pointer_event(event)
    }

    /// Deliver a whole script, returning the claim result per event.
    pub fn play(&mut self, events: &[PointerEvent]) -> Vec<bool> {
        events.iter().map(|e| self.send(e)).collect()
    }

    /// Run frames while the clock is before `until`.
    pub fn pump_until(&mut self, until: Duration) {
        while self.layer.is_animating() && self.now() + self.frame <= until {
            self.layer.host_mut().advance(self.frame);
            self.layer.on_frame();
        }
    }

    /// Pump frames until the animation completes. Returns the frame count.
    pub fn run_until_settled(&mut self) -> usize {
        let mut frames = 0;
        while self.layer.is_animating() && frames < MAX_SETTLE_FRAMES {
            self.layer.host_mut().advance(self.frame);
            self.layer.on_frame();
            frames += 1;
        }
        frames
    }
}
