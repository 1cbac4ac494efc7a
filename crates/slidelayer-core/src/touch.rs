#![forbid(unsafe_code)]

//! Pointer stream to drag intent.
//!
//! ```text
//! Idle -> Probing -> Dragging -> Idle
//!   \        \-----> Rejected -> Idle
//!    \-----------------^ (down outside the exposed sliver)
//! ```
//!
//! The machine never moves the layer itself. Each event yields one
//! [`TouchEffect`] that the owner applies.
//!
//! # Invariants
//!
//! 1. At most one pointer is tracked. Its id is held by the session.
//! 2. A drag only starts once main-axis travel exceeds the slop, beats the
//!    orthogonal travel, and points in a direction with room left.
//! 3. Drag offsets are clamped to the scroll bounds. The sub-pixel remainder
//!    is folded back into the last pointer position, never the offset.
//!
//! # Failure Modes
//!
//! | Condition | Recovery |
//! |-----------|----------|
//! | Active pointer missing from a move | Reset to `Idle`, emit `TrackingLost` |
//! | Down event without pointers | Stay `Idle`, emit `TrackingLost` |
//! | Secondary event with bad index | Ignored (`Noop`) |

use bitflags::bitflags;

use crate::decision::DragOutcome;
use crate::error::TrackingFault;
use crate::geometry::{
    Axis, Edge, PanelSize, ScrollOffset, exposed_distance, scroll_bounds, touch_within_sliver,
};
use crate::pointer::{PointerAction, PointerEvent, PointerId, PointerSample};
use crate::velocity::VelocityTracker;

bitflags! {
    /// Directions a drag may start in, relative to the panel.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct DragDirections: u8 {
        const TOWARD_OPEN = 0b01;
        const TOWARD_CLOSE = 0b10;
    }
}

impl DragDirections {
    /// Directions that still have travel left at main-axis `offset`.
    #[must_use]
    pub fn available(extent: u32, offset: i32) -> Self {
        let exposed = exposed_distance(extent, offset);
        let mut dirs = Self::empty();
        if exposed < extent {
            dirs |= Self::TOWARD_OPEN;
        }
        if exposed > 0 {
            dirs |= Self::TOWARD_CLOSE;
        }
        dirs
    }

    /// Direction of pointer travel `delta` along the main axis of `edge`.
    #[must_use]
    pub fn of_motion(edge: Edge, delta: f32) -> Self {
        if delta * edge.hidden_sign() as f32 > 0.0 {
            Self::TOWARD_OPEN
        } else {
            Self::TOWARD_CLOSE
        }
    }
}

/// Read-only view of the layer the machine needs per event.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TouchContext {
    pub edge: Edge,
    pub size: PanelSize,
    /// Current (instantaneous) scroll offset.
    pub offset: ScrollOffset,
    pub touch_slop: f32,
    pub max_fling_velocity: f32,
}

impl TouchContext {
    #[inline]
    fn axis(&self) -> Axis {
        self.edge.axis()
    }

    #[inline]
    fn extent(&self) -> u32 {
        self.size.extent(self.axis())
    }
}

/// Question put to the host before a probe claims a move.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScrollQuery {
    pub axis: Axis,
    /// Pointer travel along `axis` since the last recorded position.
    pub delta: f32,
    pub x: f32,
    pub y: f32,
}

/// Per-gesture tracking data.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DragSession {
    pub pointer: PointerId,
    pub initial: (f32, f32),
    pub last: (f32, f32),
    /// A descendant scrolled during this gesture, so lifting is not a tap.
    pub yielded: bool,
}

impl DragSession {
    fn start(sample: &PointerSample) -> Self {
        Self {
            pointer: sample.id,
            initial: (sample.x, sample.y),
            last: (sample.x, sample.y),
            yielded: false,
        }
    }
}

/// Lifecycle state of the touch machine.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum TouchState {
    #[default]
    Idle,
    Probing(DragSession),
    Dragging(DragSession),
    Rejected { pointer: PointerId },
}

/// Why an event was ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TouchNoopReason {
    IdleWithoutSession,
    SessionRejected,
    BelowSlop,
    NotActivePointer,
    BadPointerIndex,
}

/// Why an event is left for descendants or the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PassThroughReason {
    OutsideSliver,
    OrthogonalMotion,
    NoRoomInDirection,
    DescendantScroll,
}

/// Result of one [`TouchMachine::handle`] step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TouchEffect {
    Noop { reason: TouchNoopReason },
    PassThrough { reason: PassThroughReason },
    /// A down landed on the exposed panel; the gesture is being watched.
    ProbeStarted { pointer: PointerId },
    DragStarted { pointer: PointerId },
    /// The layer should scroll to `offset` (already clamped).
    DragMoved { offset: ScrollOffset },
    /// The drag ended; decide and settle.
    Released { outcome: DragOutcome },
    /// The gesture ended without ever dragging.
    Tapped,
    Canceled { was_dragging: bool },
    PointerHandoff { from: PointerId, to: PointerId },
    TrackingLost { was_dragging: bool },
}

impl TouchEffect {
    /// Whether the layer claims the event that produced this effect.
    ///
    /// `Tapped` is left to the owner, which only claims taps it acts on.
    #[must_use]
    pub const fn claims_event(&self) -> bool {
        match self {
            Self::ProbeStarted { .. }
            | Self::DragStarted { .. }
            | Self::DragMoved { .. }
            | Self::Released { .. }
            | Self::PointerHandoff { .. } => true,
            Self::Canceled { was_dragging } | Self::TrackingLost { was_dragging } => *was_dragging,
            Self::Noop { .. } | Self::PassThrough { .. } | Self::Tapped => false,
        }
    }
}

/// Single-active-pointer drag recognizer.
#[derive(Debug, Clone, Default)]
pub struct TouchMachine {
    state: TouchState,
    velocity: VelocityTracker,
}

impl TouchMachine {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    #[must_use]
    pub const fn state(&self) -> TouchState {
        self.state
    }

    #[inline]
    #[must_use]
    pub const fn is_dragging(&self) -> bool {
        matches!(self.state, TouchState::Dragging(_))
    }

    /// Pointer currently tracked, if any.
    #[must_use]
    pub const fn active_pointer(&self) -> Option<PointerId> {
        match self.state {
            TouchState::Probing(s) | TouchState::Dragging(s) => Some(s.pointer),
            TouchState::Rejected { pointer } => Some(pointer),
            TouchState::Idle => None,
        }
    }

    /// Drop any session without emitting anything.
    pub fn reset(&mut self) {
        self.state = TouchState::Idle;
        self.velocity.clear();
    }

    /// Feed one pointer event.
    pub fn handle(
        &mut self,
        event: &PointerEvent,
        ctx: &TouchContext,
        mut can_scroll: impl FnMut(ScrollQuery) -> bool,
    ) -> TouchEffect {
        match event.action {
            PointerAction::Down => self.on_down(event, ctx),
            PointerAction::Move => self.on_move(event, ctx, &mut can_scroll),
            PointerAction::Up => self.on_up(event, ctx),
            PointerAction::Cancel => self.on_cancel(),
            PointerAction::SecondaryDown { index } => self.on_secondary_down(event, ctx, index),
            PointerAction::SecondaryUp { index } => self.on_secondary_up(event, ctx, index),
        }
    }

    // -----------------------------------------------------------------------
    // Transitions
    // -----------------------------------------------------------------------

    fn on_down(&mut self, event: &PointerEvent, ctx: &TouchContext) -> TouchEffect {
        self.velocity.clear();
        let Some(sample) = event.primary() else {
            self.state = TouchState::Idle;
            tracing::warn!(target: "slidelayer.touch", "down event carried no pointers");
            return TouchEffect::TrackingLost {
                was_dragging: false,
            };
        };

        let axis = ctx.axis();
        let touch = axis.pick(sample.x, sample.y);
        if !touch_within_sliver(ctx.edge, ctx.size, ctx.offset.main(axis), touch) {
            self.state = TouchState::Rejected { pointer: sample.id };
            tracing::trace!(target: "slidelayer.touch", touch, "down outside sliver");
            return TouchEffect::PassThrough {
                reason: PassThroughReason::OutsideSliver,
            };
        }

        self.state = TouchState::Probing(DragSession::start(sample));
        self.velocity.add(event.timestamp, touch);
        tracing::debug!(target: "slidelayer.touch", pointer = sample.id.0, "probe started");
        TouchEffect::ProbeStarted { pointer: sample.id }
    }

    fn on_move(
        &mut self,
        event: &PointerEvent,
        ctx: &TouchContext,
        can_scroll: &mut impl FnMut(ScrollQuery) -> bool,
    ) -> TouchEffect {
        let (mut session, dragging) = match self.state {
            TouchState::Idle => {
                return TouchEffect::Noop {
                    reason: TouchNoopReason::IdleWithoutSession,
                };
            }
            TouchState::Rejected { .. } => {
                return TouchEffect::Noop {
                    reason: TouchNoopReason::SessionRejected,
                };
            }
            TouchState::Probing(s) => (s, false),
            TouchState::Dragging(s) => (s, true),
        };

        let Some(sample) = event.find(session.pointer).copied() else {
            return self.lose_tracking(session.pointer, dragging);
        };

        let axis = ctx.axis();
        let main = axis.pick(sample.x, sample.y);
        self.velocity.add(event.timestamp, main);

        if dragging {
            let last_main = axis.pick(session.last.0, session.last.1);
            let bounds = scroll_bounds(ctx.edge, ctx.extent());
            let scroll = bounds.clamp_main(axis, ctx.offset.main(axis) as f32 + (last_main - main));
            let whole = scroll.trunc();
            let carried = main + (scroll - whole);
            session.last = match axis {
                Axis::Horizontal => (carried, sample.y),
                Axis::Vertical => (sample.x, carried),
            };
            self.state = TouchState::Dragging(session);
            return TouchEffect::DragMoved {
                offset: ScrollOffset::along(axis, whole as i32),
            };
        }

        let step = (sample.x - session.last.0, sample.y - session.last.1);
        if step != (0.0, 0.0)
            && can_scroll(ScrollQuery {
                axis,
                delta: axis.pick(step.0, step.1),
                x: sample.x,
                y: sample.y,
            })
        {
            session.initial = (sample.x, sample.y);
            session.last = (sample.x, sample.y);
            session.yielded = true;
            self.state = TouchState::Probing(session);
            return TouchEffect::PassThrough {
                reason: PassThroughReason::DescendantScroll,
            };
        }

        let travel = (sample.x - session.initial.0, sample.y - session.initial.1);
        let main_travel = axis.pick(travel.0, travel.1);
        let main_diff = main_travel.abs();
        let ortho_diff = axis.pick(travel.1, travel.0).abs();

        if main_diff > ctx.touch_slop && main_diff > ortho_diff {
            let wanted = DragDirections::of_motion(ctx.edge, main_travel);
            let room = DragDirections::available(ctx.extent(), ctx.offset.main(axis));
            if !room.contains(wanted) {
                self.state = TouchState::Rejected {
                    pointer: session.pointer,
                };
                tracing::debug!(target: "slidelayer.touch", ?wanted, ?room, "no room to drag");
                return TouchEffect::PassThrough {
                    reason: PassThroughReason::NoRoomInDirection,
                };
            }
            session.last = (sample.x, sample.y);
            self.state = TouchState::Dragging(session);
            tracing::debug!(
                target: "slidelayer.touch",
                pointer = session.pointer.0,
                main_travel,
                "drag started"
            );
            return TouchEffect::DragStarted {
                pointer: session.pointer,
            };
        }

        if ortho_diff > ctx.touch_slop && ortho_diff > main_diff {
            self.state = TouchState::Rejected {
                pointer: session.pointer,
            };
            tracing::trace!(target: "slidelayer.touch", ortho_diff, "orthogonal motion");
            return TouchEffect::PassThrough {
                reason: PassThroughReason::OrthogonalMotion,
            };
        }

        TouchEffect::Noop {
            reason: TouchNoopReason::BelowSlop,
        }
    }

    fn on_up(&mut self, event: &PointerEvent, ctx: &TouchContext) -> TouchEffect {
        let previous = std::mem::take(&mut self.state);
        match previous {
            TouchState::Idle => TouchEffect::Noop {
                reason: TouchNoopReason::IdleWithoutSession,
            },
            TouchState::Rejected { .. } => {
                self.velocity.clear();
                TouchEffect::Noop {
                    reason: TouchNoopReason::SessionRejected,
                }
            }
            TouchState::Probing(session) => {
                self.velocity.clear();
                if session.yielded {
                    TouchEffect::PassThrough {
                        reason: PassThroughReason::DescendantScroll,
                    }
                } else {
                    TouchEffect::Tapped
                }
            }
            TouchState::Dragging(session) => {
                let axis = ctx.axis();
                let end = match event.find(session.pointer) {
                    Some(sample) => {
                        let main = axis.pick(sample.x, sample.y);
                        self.velocity.add(event.timestamp, main);
                        main
                    }
                    None => axis.pick(session.last.0, session.last.1),
                };
                let outcome = DragOutcome {
                    offset: ctx.offset.main(axis),
                    velocity: self.velocity.velocity(ctx.max_fling_velocity),
                    displacement: end - axis.pick(session.initial.0, session.initial.1),
                };
                self.velocity.clear();
                tracing::debug!(
                    target: "slidelayer.touch",
                    velocity = outcome.velocity,
                    displacement = outcome.displacement,
                    "drag released"
                );
                TouchEffect::Released { outcome }
            }
        }
    }

    fn on_cancel(&mut self) -> TouchEffect {
        let previous = std::mem::take(&mut self.state);
        self.velocity.clear();
        match previous {
            TouchState::Idle => TouchEffect::Noop {
                reason: TouchNoopReason::IdleWithoutSession,
            },
            TouchState::Dragging(_) => TouchEffect::Canceled { was_dragging: true },
            TouchState::Probing(_) | TouchState::Rejected { .. } => {
                TouchEffect::Canceled {
                    was_dragging: false,
                }
            }
        }
    }

    fn on_secondary_down(
        &mut self,
        event: &PointerEvent,
        ctx: &TouchContext,
        index: usize,
    ) -> TouchEffect {
        let session = match self.state {
            TouchState::Probing(s) | TouchState::Dragging(s) => s,
            TouchState::Idle => {
                return TouchEffect::Noop {
                    reason: TouchNoopReason::IdleWithoutSession,
                };
            }
            TouchState::Rejected { .. } => {
                return TouchEffect::Noop {
                    reason: TouchNoopReason::SessionRejected,
                };
            }
        };
        let Some(sample) = event.at(index).copied() else {
            return TouchEffect::Noop {
                reason: TouchNoopReason::BadPointerIndex,
            };
        };
        self.hand_off(session, &sample, event, ctx)
    }

    fn on_secondary_up(
        &mut self,
        event: &PointerEvent,
        ctx: &TouchContext,
        index: usize,
    ) -> TouchEffect {
        let session = match self.state {
            TouchState::Probing(s) | TouchState::Dragging(s) => s,
            TouchState::Rejected { pointer } => {
                // Keep following the contact that is still down.
                if event.at(index).is_some_and(|p| p.id == pointer)
                    && let Some(other) = event.at(if index == 0 { 1 } else { 0 })
                {
                    self.state = TouchState::Rejected { pointer: other.id };
                }
                return TouchEffect::Noop {
                    reason: TouchNoopReason::SessionRejected,
                };
            }
            TouchState::Idle => {
                return TouchEffect::Noop {
                    reason: TouchNoopReason::IdleWithoutSession,
                };
            }
        };
        let Some(lifted) = event.at(index) else {
            return TouchEffect::Noop {
                reason: TouchNoopReason::BadPointerIndex,
            };
        };
        if lifted.id != session.pointer {
            return TouchEffect::Noop {
                reason: TouchNoopReason::NotActivePointer,
            };
        }
        let replacement = if index == 0 { 1 } else { 0 };
        let Some(sample) = event.at(replacement).copied() else {
            return self.lose_tracking(session.pointer, self.is_dragging());
        };
        self.hand_off(session, &sample, event, ctx)
    }

    // -----------------------------------------------------------------------
    // Helpers
    // -----------------------------------------------------------------------

    fn hand_off(
        &mut self,
        mut session: DragSession,
        sample: &PointerSample,
        event: &PointerEvent,
        ctx: &TouchContext,
    ) -> TouchEffect {
        let from = session.pointer;
        session.pointer = sample.id;
        session.last = (sample.x, sample.y);
        self.state = match self.state {
            TouchState::Dragging(_) => TouchState::Dragging(session),
            _ => TouchState::Probing(session),
        };
        self.velocity.clear();
        self.velocity
            .add(event.timestamp, ctx.axis().pick(sample.x, sample.y));
        tracing::debug!(
            target: "slidelayer.touch",
            from = from.0,
            to = sample.id.0,
            "pointer handoff"
        );
        TouchEffect::PointerHandoff {
            from,
            to: sample.id,
        }
    }

    fn lose_tracking(&mut self, pointer: PointerId, was_dragging: bool) -> TouchEffect {
        let fault = TrackingFault::PointerTrackingLost { pointer: pointer.0 };
        tracing::warn!(target: "slidelayer.touch", %fault, was_dragging, "tracking reset");
        self.reset();
        TouchEffect::TrackingLost { was_dragging }
    }
}
