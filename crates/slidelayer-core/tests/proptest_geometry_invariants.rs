//! Property-based invariants for geometry, decision and animation timing.
//!
//! 1. **Containment**: every destination offset lies inside the scroll
//!    bounds of its edge.
//! 2. **Clamp**: clamping is idempotent and always lands inside the bounds.
//! 3. **Determinism**: the drag decision is a pure function.
//! 4. **Preview gating**: without a preview distance, Preview is never
//!    chosen by either decider.
//! 5. **Duration bound**: no velocity yields a settle animation longer than
//!    the configured maximum.
//! 6. **Progress range**: layer and preview progress stay in `[0, 1]`.

use std::time::Duration;

use proptest::prelude::*;
use slidelayer_core::animation::{ScrollAnimation, snap_duration};
use slidelayer_core::decision::{DecisionParams, DragOutcome, decide_from_drag, decide_from_tap};
use slidelayer_core::geometry::{
    Edge, PanelState, ScrollOffset, clamp, destination_offset, scroll_bounds,
};
use slidelayer_core::progress::compute_progress;
use slidelayer_core::TapPolicy;

fn edge() -> impl Strategy<Value = Edge> {
    prop_oneof![
        Just(Edge::Left),
        Just(Edge::Right),
        Just(Edge::Top),
        Just(Edge::Bottom),
    ]
}

fn state() -> impl Strategy<Value = PanelState> {
    prop_oneof![
        Just(PanelState::Closed),
        Just(PanelState::Preview),
        Just(PanelState::Opened),
    ]
}

fn params(edge: Edge, extent: u32, preview: Option<u32>) -> DecisionParams {
    DecisionParams {
        edge,
        extent,
        preview_distance: preview,
        fling_distance: 25,
        min_fling_velocity: 50.0,
        high_velocity_cutoff: 9000.0,
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(512))]

    #[test]
    fn destination_is_within_bounds(
        edge in edge(),
        state in state(),
        extent in 0u32..4096,
        offset in 0u32..4096,
        preview in proptest::option::of(0u32..4096),
    ) {
        let dest = destination_offset(state, edge, extent, offset, preview);
        let bounds = scroll_bounds(edge, extent);
        prop_assert!(bounds.contains(dest), "{dest:?} outside {bounds:?}");
    }

    #[test]
    fn clamp_is_idempotent_and_contained(
        edge in edge(),
        extent in 0u32..4096,
        x in -10_000i32..10_000,
        y in -10_000i32..10_000,
    ) {
        let bounds = scroll_bounds(edge, extent);
        let once = clamp(ScrollOffset::new(x, y), bounds);
        prop_assert!(bounds.contains(once));
        prop_assert_eq!(clamp(once, bounds), once);
        // The orthogonal axis is always pinned.
        let ortho = match edge.axis() {
            slidelayer_core::Axis::Horizontal => once.y,
            slidelayer_core::Axis::Vertical => once.x,
        };
        prop_assert_eq!(ortho, 0);
    }

    #[test]
    fn drag_decision_is_deterministic(
        edge in edge(),
        extent in 1u32..2000,
        offset in -2000i32..2000,
        velocity in -12_000.0f32..12_000.0,
        displacement in -2000.0f32..2000.0,
        preview in proptest::option::of(1u32..400),
    ) {
        let p = params(edge, extent, preview);
        let outcome = DragOutcome { offset, velocity, displacement };
        prop_assert_eq!(decide_from_drag(outcome, &p), decide_from_drag(outcome, &p));
    }

    #[test]
    fn preview_never_chosen_when_disabled(
        edge in edge(),
        extent in 1u32..2000,
        offset in -2000i32..2000,
        velocity in -12_000.0f32..12_000.0,
        displacement in -2000.0f32..2000.0,
        current in state(),
        opened_closes in any::<bool>(),
    ) {
        let p = params(edge, extent, None);
        let outcome = DragOutcome { offset, velocity, displacement };
        prop_assert_ne!(decide_from_drag(outcome, &p), PanelState::Preview);
        let policy = if opened_closes { TapPolicy::OpenedCloses } else { TapPolicy::Cycle };
        prop_assert_ne!(decide_from_tap(current, false, policy), PanelState::Preview);
    }

    #[test]
    fn opening_fling_always_opens(
        edge in edge(),
        extent in 1u32..2000,
        offset in -2000i32..2000,
        speed in 51.0f32..12_000.0,
        travel in 26.0f32..2000.0,
    ) {
        let sign = edge.hidden_sign() as f32;
        let outcome = DragOutcome {
            offset,
            velocity: speed * sign,
            displacement: travel * sign,
        };
        prop_assert_eq!(
            decide_from_drag(outcome, &params(edge, extent, Some(40))),
            PanelState::Opened
        );
    }

    #[test]
    fn snap_duration_never_exceeds_max(
        distance in -5000i32..5000,
        extent in 0u32..5000,
        velocity in prop_oneof![Just(0.0f32), -50_000.0f32..50_000.0, Just(f32::INFINITY)],
        max_ms in 1u64..2000,
    ) {
        let max = Duration::from_millis(max_ms);
        prop_assert!(snap_duration(distance, extent, velocity, max) <= max);
    }

    #[test]
    fn animation_stays_between_endpoints(
        start in -1000i32..1000,
        target in -1000i32..1000,
        duration_ms in 1u64..1000,
        at_ms in 0u64..2000,
    ) {
        let anim = ScrollAnimation::new(
            ScrollOffset::new(start, 0),
            ScrollOffset::new(target, 0),
            Duration::ZERO,
            Duration::from_millis(duration_ms),
        );
        let x = anim.offset_at(Duration::from_millis(at_ms)).x;
        prop_assert!(x >= start.min(target) && x <= start.max(target));
        if at_ms >= duration_ms {
            prop_assert_eq!(x, target);
        }
    }

    #[test]
    fn progress_is_normalized(
        extent in 0u32..4096,
        offset in -8192i32..8192,
        preview in proptest::option::of(0u32..4096),
    ) {
        let p = compute_progress(extent, offset, preview);
        prop_assert!((0.0..=1.0).contains(&p.layer));
        prop_assert!((0.0..=1.0).contains(&p.preview));
    }
}
