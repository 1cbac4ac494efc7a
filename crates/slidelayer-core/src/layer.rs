#![forbid(unsafe_code)]

//! The sliding layer controller.
//!
//! [`SlidingLayer`] owns the scroll state and arbitrates between the touch
//! machine and the settle animation. Both write the same offset, so motion is
//! an explicit state:
//!
//! ```text
//!            drag accepted               release / cancel
//!   Idle ───────────────────▶ Dragging ───────────────────▶ Animating
//!    ▲  ◀───── settled ─────────────────────────────────────────┘ │
//!    └──────── pointer down on the panel halts (no Finished) ◀────┘
//! ```
//!
//! A halted settle resumes from where it stopped when the gesture ends
//! without becoming a drag.
//!
//! # Invariants
//!
//! 1. `Dragging` and `Animating` are mutually exclusive. Starting one ends
//!    the other first.
//! 2. At rest, `offset == destination(state)`. While moving, `state` is the
//!    target, not the instantaneous position.
//! 3. A superseded animation never emits its Finished event. Only the newest
//!    session completes.
//! 4. Every Finished event is preceded by the matching Started event.
//!
//! # Failure Modes
//!
//! Configuration mutators validate a candidate copy before applying it, so a
//! rejected call leaves the layer untouched.

use std::time::Duration;

use crate::animation::{ScrollAnimation, snap_duration};
use crate::config::LayerConfig;
use crate::decision::{DecisionParams, TapPolicy, decide_from_drag, decide_from_tap};
use crate::error::{ConfigIssue, LayerError};
use crate::event::LayerEvent;
use crate::geometry::{
    Axis, Edge, PanelSize, PanelState, ScrollOffset, destination_offset, scroll_bounds,
};
use crate::host::LayerHost;
use crate::persist::SavedLayerState;
use crate::pointer::{PointerAction, PointerEvent};
use crate::progress::{LayerProgress, ProgressNotifier, compute_progress};
use crate::touch::{TouchContext, TouchEffect, TouchMachine, TouchState};

/// What is currently moving the offset.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Motion {
    Idle,
    Animating(ScrollAnimation),
    Dragging,
}

/// An edge-anchored panel driven by pointer input and programmatic commands.
pub struct SlidingLayer<H: LayerHost> {
    host: H,
    config: LayerConfig,
    size: PanelSize,
    state: PanelState,
    offset: ScrollOffset,
    motion: Motion,
    touch: TouchMachine,
    progress: ProgressNotifier,
}

impl<H: LayerHost + std::fmt::Debug> std::fmt::Debug for SlidingLayer<H> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SlidingLayer")
            .field("host", &self.host)
            .field("edge", &self.config.edge)
            .field("size", &self.size)
            .field("state", &self.state)
            .field("offset", &self.offset)
            .field("motion", &self.motion)
            .finish_non_exhaustive()
    }
}

impl<H: LayerHost> SlidingLayer<H> {
    /// Create a Closed layer. It has no size until [`Self::set_size`].
    pub fn new(config: LayerConfig, host: H) -> Result<Self, LayerError> {
        config.check()?;
        Ok(Self {
            host,
            config,
            size: PanelSize::default(),
            state: PanelState::Closed,
            offset: ScrollOffset::ZERO,
            motion: Motion::Idle,
            touch: TouchMachine::new(),
            progress: ProgressNotifier::new(),
        })
    }

    // -----------------------------------------------------------------------
    // Accessors
    // -----------------------------------------------------------------------

    #[inline]
    #[must_use]
    pub fn host(&self) -> &H {
        &self.host
    }

    #[inline]
    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    #[must_use]
    pub fn into_host(self) -> H {
        self.host
    }

    #[inline]
    #[must_use]
    pub fn config(&self) -> &LayerConfig {
        &self.config
    }

    #[inline]
    #[must_use]
    pub fn edge(&self) -> Edge {
        self.config.edge
    }

    #[inline]
    #[must_use]
    pub fn size(&self) -> PanelSize {
        self.size
    }

    /// Nominal state: the target while moving.
    #[inline]
    #[must_use]
    pub fn state(&self) -> PanelState {
        self.state
    }

    #[inline]
    #[must_use]
    pub fn offset(&self) -> ScrollOffset {
        self.offset
    }

    #[inline]
    #[must_use]
    pub fn motion(&self) -> Motion {
        self.motion
    }

    #[must_use]
    pub fn is_opened(&self) -> bool {
        self.state == PanelState::Opened
    }

    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.state == PanelState::Closed
    }

    #[must_use]
    pub fn is_in_preview(&self) -> bool {
        self.state == PanelState::Preview
    }

    #[must_use]
    pub fn is_animating(&self) -> bool {
        matches!(self.motion, Motion::Animating(_))
    }

    #[must_use]
    pub fn is_dragging(&self) -> bool {
        matches!(self.motion, Motion::Dragging)
    }

    /// Progress at the current offset.
    #[must_use]
    pub fn progress(&self) -> LayerProgress {
        compute_progress(
            self.extent(),
            self.offset.main(self.axis()),
            self.preview_distance(),
        )
    }

    /// Resting offset for `state` under the current configuration and size.
    #[must_use]
    pub fn destination(&self, state: PanelState) -> ScrollOffset {
        destination_offset(
            state,
            self.config.edge,
            self.extent(),
            self.config.offset_distance,
            self.preview_distance(),
        )
    }

    // -----------------------------------------------------------------------
    // Commands
    // -----------------------------------------------------------------------

    pub fn open(&mut self, smooth: bool) {
        self.set_state(PanelState::Opened, smooth, false, 0.0);
    }

    pub fn close(&mut self, smooth: bool) {
        self.set_state(PanelState::Closed, smooth, false, 0.0);
    }

    /// Move to Preview. Fails when no preview distance is configured.
    pub fn open_preview(&mut self, smooth: bool) -> Result<(), LayerError> {
        if !self.config.preview_enabled() {
            return Err(ConfigIssue::PreviewDisabled.into());
        }
        self.set_state(PanelState::Preview, smooth, false, 0.0);
        Ok(())
    }

    /// Re-anchor to `edge`. Jumps to Closed and asks the host for a layout.
    pub fn set_stick_to(&mut self, edge: Edge) {
        self.touch.reset();
        self.config.edge = edge;
        self.progress.invalidate();
        tracing::debug!(target: "slidelayer.layer", ?edge, "stick to edge");
        self.set_state(PanelState::Closed, false, true, 0.0);
        self.host.request_layout();
    }

    /// Pixels exposed while Closed.
    pub fn set_offset_distance(&mut self, px: u32) -> Result<(), LayerError> {
        let candidate = self.config.clone().with_offset_distance(px);
        candidate.check()?;
        self.config = candidate;
        self.resettle(PanelState::Closed);
        Ok(())
    }

    /// Pixels exposed while in Preview. `None` disables Preview.
    pub fn set_preview_offset_distance(&mut self, px: Option<u32>) -> Result<(), LayerError> {
        let candidate = self.config.clone().with_preview_distance(px);
        candidate.check()?;
        self.config = candidate;
        if self.state == PanelState::Preview && !self.config.preview_enabled() {
            self.set_state(PanelState::Closed, true, true, 0.0);
        } else {
            self.resettle(PanelState::Preview);
        }
        Ok(())
    }

    /// Replace the whole configuration.
    pub fn set_config(&mut self, config: LayerConfig) -> Result<(), LayerError> {
        config.check()?;
        let edge = config.edge;
        let edge_changed = edge != self.config.edge;
        self.config = config;
        if !self.config.sliding_enabled {
            self.set_sliding_enabled(false);
        }
        if edge_changed {
            self.set_stick_to(edge);
        } else if self.state == PanelState::Preview && !self.config.preview_enabled() {
            self.set_state(PanelState::Closed, true, true, 0.0);
        } else {
            self.resettle(self.state);
        }
        Ok(())
    }

    /// When disabled every pointer event passes through. Disabling mid-drag
    /// settles back to the nominal state.
    pub fn set_sliding_enabled(&mut self, enabled: bool) {
        self.config.sliding_enabled = enabled;
        if !enabled {
            self.abandon_drag();
            self.touch.reset();
        }
    }

    pub fn set_change_state_on_tap(&mut self, enabled: bool) {
        self.config.change_state_on_tap = enabled;
    }

    pub fn set_tap_policy(&mut self, policy: TapPolicy) {
        self.config.tap_policy = policy;
    }

    /// New measurement from the host. A changed main-axis extent snaps the
    /// offset to the destination of the current state.
    pub fn set_size(&mut self, size: PanelSize) {
        if size == self.size {
            return;
        }
        let axis = self.axis();
        let extent_changed = size.extent(axis) != self.size.extent(axis);
        self.size = size;
        if !extent_changed {
            return;
        }
        tracing::debug!(
            target: "slidelayer.layer",
            width = size.width,
            height = size.height,
            "extent changed"
        );
        match self.motion {
            Motion::Dragging => {
                let bounds = scroll_bounds(self.config.edge, self.extent());
                self.apply_offset(bounds.clamp(self.offset));
            }
            Motion::Animating(_) | Motion::Idle => {
                self.motion = Motion::Idle;
                self.apply_offset(self.destination(self.state));
            }
        }
    }

    /// Snapshot for the host's state store.
    #[must_use]
    pub fn save_state(&self) -> SavedLayerState {
        SavedLayerState::new(self.state)
    }

    /// Restore a snapshot, animating to the saved state.
    pub fn restore_state(&mut self, saved: SavedLayerState) -> Result<(), LayerError> {
        let state = saved.state()?;
        if state == PanelState::Preview && !self.config.preview_enabled() {
            return Err(ConfigIssue::PreviewDisabled.into());
        }
        tracing::debug!(target: "slidelayer.layer", ?state, "restore state");
        self.set_state(state, true, false, 0.0);
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Host callbacks
    // -----------------------------------------------------------------------

    /// Feed one pointer event. Returns `true` when the layer claims it.
    pub fn on_pointer_event(&mut self, event: &PointerEvent) -> bool {
        if !self.config.sliding_enabled {
            return false;
        }

        // A fresh Down without an Up for the previous drag.
        if event.action == PointerAction::Down && self.is_dragging() {
            tracing::debug!(target: "slidelayer.touch", "new gesture ends stale drag");
            self.abandon_drag();
        }

        let mut offset = self.offset;
        if event.action == PointerAction::Down
            && let Motion::Animating(anim) = self.motion
        {
            offset = anim.offset_at(self.host.now());
        }

        let ctx = TouchContext {
            edge: self.config.edge,
            size: self.size,
            offset,
            touch_slop: self.config.touch_slop,
            max_fling_velocity: self.config.max_fling_velocity,
        };
        let host = &self.host;
        let effect = self
            .touch
            .handle(event, &ctx, |query| host.descendant_can_scroll(query));

        match effect {
            TouchEffect::ProbeStarted { .. } => {
                if self.is_animating() {
                    tracing::debug!(target: "slidelayer.scroll", ?offset, "animation halted");
                    self.motion = Motion::Idle;
                    self.apply_offset(offset);
                }
            }
            TouchEffect::DragStarted { .. } => {
                self.motion = Motion::Dragging;
            }
            TouchEffect::DragMoved { offset } => {
                self.apply_offset(offset);
            }
            TouchEffect::Released { outcome } => {
                self.motion = Motion::Idle;
                let params = DecisionParams::from_config(&self.config, self.extent());
                let next = decide_from_drag(outcome, &params);
                self.set_state(next, true, true, outcome.velocity);
            }
            TouchEffect::Tapped if !self.config.change_state_on_tap => {
                self.resume_if_stranded();
                return false;
            }
            TouchEffect::Tapped => {
                let next = decide_from_tap(
                    self.state,
                    self.config.preview_enabled(),
                    self.config.tap_policy,
                );
                self.set_state(next, true, true, 0.0);
                return true;
            }
            TouchEffect::Canceled { was_dragging: true }
            | TouchEffect::TrackingLost { was_dragging: true } => {
                self.motion = Motion::Idle;
                self.set_state(self.state, true, true, 0.0);
            }
            TouchEffect::Canceled { .. }
            | TouchEffect::TrackingLost { .. }
            | TouchEffect::PointerHandoff { .. }
            | TouchEffect::PassThrough { .. }
            | TouchEffect::Noop { .. } => {}
        }
        if matches!(
            self.touch.state(),
            TouchState::Idle | TouchState::Rejected { .. }
        ) {
            self.resume_if_stranded();
        }
        effect.claims_event()
    }

    /// Advance the settle animation. Returns `true` while more frames are
    /// needed; a new frame has already been requested in that case.
    pub fn on_frame(&mut self) -> bool {
        let Motion::Animating(anim) = self.motion else {
            return false;
        };
        let now = self.host.now();
        self.apply_offset(anim.offset_at(now));
        if anim.is_complete(now) {
            self.motion = Motion::Idle;
            tracing::debug!(target: "slidelayer.scroll", state = ?self.state, "settled");
            self.host.emit(LayerEvent::finished_for(self.state));
            return false;
        }
        self.host.request_frame();
        true
    }

    // -----------------------------------------------------------------------
    // Internals
    // -----------------------------------------------------------------------

    #[inline]
    fn axis(&self) -> Axis {
        self.config.edge.axis()
    }

    #[inline]
    fn extent(&self) -> u32 {
        self.size.extent(self.axis())
    }

    #[inline]
    fn preview_distance(&self) -> Option<u32> {
        self.config.preview_distance.filter(|px| *px > 0)
    }

    /// Where the layer is headed: the animation target, or the offset.
    fn resting_target(&self) -> ScrollOffset {
        match self.motion {
            Motion::Animating(anim) => anim.target,
            Motion::Idle | Motion::Dragging => self.offset,
        }
    }

    /// Re-run a transition to `state` if it is current and its destination
    /// moved.
    fn resettle(&mut self, state: PanelState) {
        if self.state == state
            && !self.is_dragging()
            && self.destination(state) != self.resting_target()
        {
            self.set_state(state, true, true, 0.0);
        }
    }

    /// Finish a settle that a pointer-down halted when no drag took over.
    fn resume_if_stranded(&mut self) {
        if !matches!(self.motion, Motion::Idle) || self.touch.is_dragging() {
            return;
        }
        let destination = self.destination(self.state);
        if destination != self.offset {
            tracing::debug!(
                target: "slidelayer.scroll",
                state = ?self.state,
                "resuming halted settle"
            );
            self.animate_to(destination, 0.0);
        }
    }

    /// End a drag in progress by settling to the nominal state.
    fn abandon_drag(&mut self) {
        if self.is_dragging() {
            self.touch.reset();
            self.motion = Motion::Idle;
            self.set_state(self.state, true, true, 0.0);
        }
    }

    fn set_state(&mut self, target: PanelState, smooth: bool, force: bool, velocity: f32) {
        if !force && target == self.state {
            return;
        }
        if self.is_dragging() {
            self.touch.reset();
            self.motion = Motion::Idle;
        }

        tracing::debug!(
            target: "slidelayer.layer",
            from = ?self.state,
            to = ?target,
            smooth,
            force,
            "state transition"
        );
        self.host.emit(LayerEvent::started_for(target));
        self.state = target;
        let destination = self.destination(target);

        if smooth {
            self.animate_to(destination, velocity);
        } else {
            self.motion = Motion::Idle;
            self.apply_offset(destination);
            self.host.emit(LayerEvent::finished_for(target));
        }
    }

    /// Start a settle session, replacing any running one.
    fn animate_to(&mut self, destination: ScrollOffset, velocity: f32) {
        let axis = self.axis();
        let distance = destination.main(axis) - self.offset.main(axis);
        let duration = if destination == self.offset {
            Duration::ZERO
        } else {
            snap_duration(
                distance,
                self.extent(),
                velocity,
                self.config.max_animation_duration(),
            )
        };

        if duration.is_zero() {
            self.motion = Motion::Idle;
            self.apply_offset(destination);
            self.host.emit(LayerEvent::finished_for(self.state));
            return;
        }

        let now = self.host.now();
        tracing::debug!(
            target: "slidelayer.scroll",
            from = ?self.offset,
            to = ?destination,
            duration_ms = duration.as_millis() as u64,
            velocity,
            "animation started"
        );
        self.motion = Motion::Animating(ScrollAnimation::new(
            self.offset,
            destination,
            now,
            duration,
        ));
        self.host.request_frame();
    }

    fn apply_offset(&mut self, offset: ScrollOffset) {
        self.offset = offset;
        let progress = compute_progress(
            self.extent(),
            offset.main(self.axis()),
            self.preview_distance(),
        );
        if let Some(progress) = self.progress.update(progress) {
            self.host.emit(LayerEvent::Scrolled { progress });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pointer::PointerSample;

    #[derive(Debug, Default)]
    struct TestHost {
        now: Duration,
        events: Vec<LayerEvent>,
        frames: usize,
        layouts: usize,
        scrollable_child: bool,
    }

    impl LayerHost for TestHost {
        fn now(&self) -> Duration {
            self.now
        }
        fn request_frame(&mut self) {
            self.frames += 1;
        }
        fn request_layout(&mut self) {
            self.layouts += 1;
        }
        fn emit(&mut self, event: LayerEvent) {
            self.events.push(event);
        }
        fn descendant_can_scroll(&self, _query: crate::touch::ScrollQuery) -> bool {
            self.scrollable_child
        }
    }

    impl TestHost {
        fn transitions(&self) -> Vec<LayerEvent> {
            self.events
                .iter()
                .copied()
                .filter(LayerEvent::is_transition)
                .collect()
        }
    }

    fn layer(config: LayerConfig) -> SlidingLayer<TestHost> {
        let mut layer = SlidingLayer::new(config, TestHost::default()).expect("valid config");
        layer.set_size(PanelSize::new(300, 600));
        layer.host_mut().events.clear();
        layer
    }

    fn run_frames(layer: &mut SlidingLayer<TestHost>) {
        for _ in 0..200 {
            layer.host_mut().now += Duration::from_millis(16);
            if !layer.on_frame() {
                return;
            }
        }
        panic!("animation never settled");
    }

    fn at(ms: u64) -> Duration {
        Duration::from_millis(ms)
    }

    fn send(layer: &mut SlidingLayer<TestHost>, action: PointerAction, x: f32, ms: u64) -> bool {
        layer.host_mut().now = at(ms);
        layer.on_pointer_event(&PointerEvent::single(action, 1, x, 10.0, at(ms)))
    }

    #[test]
    fn new_layer_snaps_closed_on_first_size() {
        let layer = layer(LayerConfig::default().with_offset_distance(20));
        assert!(layer.is_closed());
        assert_eq!(layer.offset(), ScrollOffset::new(-280, 0));
    }

    #[test]
    fn immediate_open_emits_pair_and_jumps() {
        let mut layer = layer(LayerConfig::default());
        layer.open(false);
        assert!(layer.is_opened());
        assert_eq!(layer.offset(), ScrollOffset::ZERO);
        assert_eq!(
            layer.host().transitions(),
            vec![LayerEvent::OpenStarted, LayerEvent::OpenFinished]
        );
        assert!(!layer.is_animating());
    }

    #[test]
    fn smooth_open_animates_to_destination() {
        let mut layer = layer(LayerConfig::default());
        layer.open(true);
        assert!(layer.is_opened());
        assert!(layer.is_animating());
        assert_eq!(layer.host().transitions(), vec![LayerEvent::OpenStarted]);
        run_frames(&mut layer);
        assert_eq!(layer.offset(), ScrollOffset::ZERO);
        assert_eq!(
            layer.host().transitions(),
            vec![LayerEvent::OpenStarted, LayerEvent::OpenFinished]
        );
        // Without velocity the session lasts the full 600 ms.
        assert_eq!(layer.host().now, at(608));
    }

    #[test]
    fn close_when_closed_is_a_noop() {
        let mut layer = layer(LayerConfig::default());
        layer.close(true);
        assert!(layer.host().events.is_empty());
        assert!(!layer.is_animating());
    }

    #[test]
    fn superseded_animation_never_finishes() {
        let mut layer = layer(LayerConfig::default().with_preview_distance(Some(60)));
        layer.open(true);
        layer.host_mut().now += at(100);
        layer.on_frame();
        layer.close(true);
        run_frames(&mut layer);
        assert_eq!(
            layer.host().transitions(),
            vec![
                LayerEvent::OpenStarted,
                LayerEvent::CloseStarted,
                LayerEvent::CloseFinished
            ]
        );
        assert_eq!(layer.offset(), ScrollOffset::new(-300, 0));
    }

    #[test]
    fn preview_requires_distance() {
        let mut layer = layer(LayerConfig::default());
        assert_eq!(
            layer.open_preview(true),
            Err(LayerError::InvalidConfiguration(ConfigIssue::PreviewDisabled))
        );
        assert!(layer.host().events.is_empty());
    }

    #[test]
    fn offset_over_preview_is_rejected_without_mutation() {
        let mut layer = layer(LayerConfig::default().with_preview_distance(Some(60)));
        let err = layer.set_offset_distance(80).expect_err("80 > 60");
        assert!(matches!(err, LayerError::InvalidConfiguration(_)));
        assert_eq!(layer.config().offset_distance, 0);
        assert!(layer.host().events.is_empty());
    }

    #[test]
    fn stick_to_jumps_closed_and_requests_layout() {
        let mut layer = layer(LayerConfig::default().with_offset_distance(10));
        layer.open(false);
        layer.set_stick_to(Edge::Left);
        assert!(layer.is_closed());
        assert_eq!(layer.offset(), ScrollOffset::new(290, 0));
        assert_eq!(layer.host().layouts, 1);
    }

    #[test]
    fn drag_release_settles_open() {
        let mut layer = layer(LayerConfig::default());
        // With no sliver only the very edge pixel starts a drag.
        assert!(send(&mut layer, PointerAction::Down, 300.0, 0));
        // Slow drag in 10 px steps; the first 20 px are eaten by the slop.
        let mut x = 300.0;
        for i in 1..=27u64 {
            x -= 10.0;
            send(&mut layer, PointerAction::Move, x, i * 100);
        }
        assert!(layer.is_dragging());
        assert_eq!(layer.offset(), ScrollOffset::new(-50, 0));
        assert!(send(&mut layer, PointerAction::Up, x, 2800));
        assert!(layer.is_opened());
        run_frames(&mut layer);
        assert_eq!(layer.offset(), ScrollOffset::ZERO);
        assert_eq!(
            layer.host().transitions(),
            vec![LayerEvent::OpenStarted, LayerEvent::OpenFinished]
        );
    }

    #[test]
    fn cancel_while_dragging_returns_to_nominal_state() {
        let mut layer = layer(LayerConfig::default());
        send(&mut layer, PointerAction::Down, 300.0, 0);
        send(&mut layer, PointerAction::Move, 250.0, 10);
        send(&mut layer, PointerAction::Move, 200.0, 20);
        assert!(send(&mut layer, PointerAction::Cancel, 200.0, 30));
        assert!(layer.is_closed());
        run_frames(&mut layer);
        assert_eq!(layer.offset(), ScrollOffset::new(-300, 0));
        assert_eq!(
            layer.host().transitions(),
            vec![LayerEvent::CloseStarted, LayerEvent::CloseFinished]
        );
    }

    #[test]
    fn tap_advances_state() {
        let mut layer = layer(
            LayerConfig::default()
                .with_offset_distance(20)
                .with_preview_distance(Some(60)),
        );
        assert!(send(&mut layer, PointerAction::Down, 290.0, 0));
        assert!(send(&mut layer, PointerAction::Up, 290.0, 50));
        assert!(layer.is_in_preview());
    }

    #[test]
    fn tap_ignored_when_disabled() {
        let mut layer = layer(LayerConfig::default().with_offset_distance(20));
        layer.set_change_state_on_tap(false);
        send(&mut layer, PointerAction::Down, 290.0, 0);
        assert!(!send(&mut layer, PointerAction::Up, 290.0, 50));
        assert!(layer.is_closed());
    }

    #[test]
    fn down_during_animation_halts_silently() {
        let mut layer = layer(LayerConfig::default());
        layer.open(true);
        layer.host_mut().now = at(100);
        layer.on_frame();
        let before = layer.offset();
        assert!(send(&mut layer, PointerAction::Down, 299.0, 100));
        assert!(!layer.is_animating());
        assert_eq!(layer.offset(), before);
        assert_eq!(layer.host().transitions(), vec![LayerEvent::OpenStarted]);
    }

    #[test]
    fn halted_settle_resumes_when_no_drag_follows() {
        let mut layer = layer(LayerConfig::default());
        layer.set_change_state_on_tap(false);
        layer.open(true);
        layer.host_mut().now = at(100);
        layer.on_frame();
        send(&mut layer, PointerAction::Down, 299.0, 100);
        assert!(!send(&mut layer, PointerAction::Up, 299.0, 120));
        assert!(layer.is_animating());
        run_frames(&mut layer);
        assert_eq!(layer.offset(), ScrollOffset::ZERO);
        assert_eq!(
            layer.host().transitions(),
            vec![LayerEvent::OpenStarted, LayerEvent::OpenFinished]
        );
    }

    #[test]
    fn down_without_up_ends_the_previous_drag() {
        let mut layer = layer(LayerConfig::default());
        send(&mut layer, PointerAction::Down, 300.0, 0);
        let mut x = 300.0;
        for i in 1..=7u64 {
            x -= 10.0;
            send(&mut layer, PointerAction::Move, x, i * 10);
        }
        assert!(layer.is_dragging());
        assert_eq!(layer.offset(), ScrollOffset::new(-250, 0));

        // The Up for that drag never arrives; a new gesture goes vertical.
        for (action, y, ms) in [
            (PointerAction::Down, 10.0, 100),
            (PointerAction::Move, 80.0, 110),
            (PointerAction::Up, 80.0, 120),
        ] {
            layer.host_mut().now = at(ms);
            layer.on_pointer_event(&PointerEvent::single(action, 2, 280.0, y, at(ms)));
        }
        run_frames(&mut layer);

        assert!(!layer.is_dragging());
        assert!(layer.is_closed());
        assert_eq!(layer.offset(), layer.destination(PanelState::Closed));
        assert_eq!(
            layer.host().transitions(),
            vec![LayerEvent::CloseStarted, LayerEvent::CloseFinished]
        );
    }

    #[test]
    fn disabled_sliding_passes_everything_through() {
        let mut layer = layer(LayerConfig::default());
        layer.set_sliding_enabled(false);
        assert!(!send(&mut layer, PointerAction::Down, 299.0, 0));
        assert!(!send(&mut layer, PointerAction::Move, 100.0, 10));
        assert!(layer.is_closed());
    }

    #[test]
    fn scrollable_child_keeps_the_gesture() {
        let mut layer = layer(LayerConfig::default());
        layer.open(false);
        layer.host_mut().scrollable_child = true;
        send(&mut layer, PointerAction::Down, 100.0, 0);
        assert!(!send(&mut layer, PointerAction::Move, 160.0, 10));
        assert!(!layer.is_dragging());
        assert_eq!(layer.offset(), ScrollOffset::ZERO);
    }

    #[test]
    fn resize_resnaps_current_state() {
        let mut layer = layer(LayerConfig::default().with_offset_distance(20));
        layer.close(true);
        layer.set_size(PanelSize::new(400, 600));
        assert_eq!(layer.offset(), ScrollOffset::new(-380, 0));
        // Cross-axis size changes do not move a horizontal panel.
        layer.set_size(PanelSize::new(400, 800));
        assert_eq!(layer.offset(), ScrollOffset::new(-380, 0));
    }

    #[test]
    fn resize_aborts_animation_without_finish() {
        let mut layer = layer(LayerConfig::default());
        layer.open(true);
        layer.set_size(PanelSize::new(500, 600));
        assert!(!layer.is_animating());
        assert_eq!(layer.offset(), ScrollOffset::ZERO);
        assert_eq!(layer.host().transitions(), vec![LayerEvent::OpenStarted]);
    }

    #[test]
    fn preview_distance_change_resettles_preview() {
        let mut layer = layer(LayerConfig::default().with_preview_distance(Some(60)));
        layer.open_preview(false).expect("preview enabled");
        layer
            .set_preview_offset_distance(Some(100))
            .expect("valid distance");
        assert!(layer.is_animating());
        run_frames(&mut layer);
        assert_eq!(layer.offset(), ScrollOffset::new(-200, 0));
    }

    #[test]
    fn disabling_preview_while_in_preview_closes() {
        let mut layer = layer(LayerConfig::default().with_preview_distance(Some(60)));
        layer.open_preview(false).expect("preview enabled");
        layer.set_preview_offset_distance(None).expect("valid");
        assert!(layer.is_closed());
    }

    #[test]
    fn save_and_restore() {
        let mut layer = layer(LayerConfig::default().with_preview_distance(Some(60)));
        layer.open(false);
        let saved = layer.save_state();
        assert_eq!(saved.state_tag, 2);

        let mut fresh = self::layer(LayerConfig::default().with_preview_distance(Some(60)));
        fresh.restore_state(saved).expect("known tag");
        assert!(fresh.is_opened());
        assert!(fresh.is_animating());
        run_frames(&mut fresh);

        fresh.host_mut().events.clear();
        let current = fresh.save_state();
        fresh.restore_state(current).expect("known tag");
        assert!(!fresh.is_animating());
        run_frames(&mut fresh);
        assert!(fresh.host().events.is_empty());
        assert_eq!(
            fresh.restore_state(SavedLayerState { state_tag: 42 }),
            Err(LayerError::UnknownStateTag(42))
        );
    }

    #[test]
    fn restore_preview_without_preview_fails() {
        let mut layer = layer(LayerConfig::default());
        assert_eq!(
            layer.restore_state(SavedLayerState::new(PanelState::Preview)),
            Err(LayerError::InvalidConfiguration(ConfigIssue::PreviewDisabled))
        );
    }

    #[test]
    fn handoff_keeps_dragging() {
        let mut layer = layer(LayerConfig::default());
        send(&mut layer, PointerAction::Down, 300.0, 0);
        send(&mut layer, PointerAction::Move, 250.0, 10);
        let two = PointerEvent::new(
            PointerAction::SecondaryDown { index: 1 },
            vec![
                PointerSample::new(1, 250.0, 10.0),
                PointerSample::new(2, 280.0, 10.0),
            ],
            at(20),
        );
        assert!(layer.on_pointer_event(&two));
        assert!(layer.is_dragging());
        let moved = PointerEvent::new(
            PointerAction::Move,
            vec![
                PointerSample::new(1, 250.0, 10.0),
                PointerSample::new(2, 230.0, 10.0),
            ],
            at(30),
        );
        layer.on_pointer_event(&moved);
        assert_eq!(layer.offset(), ScrollOffset::new(-250, 0));
    }

    #[test]
    fn set_config_switches_edge() {
        let mut layer = layer(LayerConfig::default());
        layer
            .set_config(LayerConfig::default().with_edge(Edge::Bottom))
            .expect("valid");
        assert_eq!(layer.edge(), Edge::Bottom);
        assert_eq!(layer.offset(), ScrollOffset::new(0, -600));
        assert_eq!(layer.host().layouts, 1);
    }
}
