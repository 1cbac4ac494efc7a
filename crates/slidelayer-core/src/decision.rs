#![forbid(unsafe_code)]

//! Pure state selection for drag releases and taps.
//!
//! # Invariants
//!
//! 1. Both deciders are pure: identical inputs give identical outputs.
//! 2. `Preview` is only ever returned when a positive preview distance is
//!    configured.
//!
//! Velocities and displacements are in pointer space (pixels and pixels per
//! second as the finger moved). Multiplying by [`Edge::hidden_sign`] turns
//! them into "toward open" positive values.

use crate::config::LayerConfig;
use crate::geometry::{Edge, PanelState, exposed_distance};

/// Where a tap on the panel leads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum TapPolicy {
    /// Closed -> Preview -> Opened -> Preview, skipping Preview when it is
    /// disabled.
    #[default]
    Cycle,
    /// Like `Cycle`, but Opened always returns straight to Closed.
    OpenedCloses,
}

/// Which branch of [`decide_from_drag`] picked the state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecisionPath {
    Fling,
    Settle,
}

/// Measured end of a drag.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DragOutcome {
    /// Main-axis scroll offset at release.
    pub offset: i32,
    /// Main-axis pointer velocity at release, px/s.
    pub velocity: f32,
    /// Main-axis pointer travel from down to release, px.
    pub displacement: f32,
}

/// Thresholds the drag decision needs, captured from a [`LayerConfig`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DecisionParams {
    pub edge: Edge,
    pub extent: u32,
    pub preview_distance: Option<u32>,
    pub fling_distance: u32,
    pub min_fling_velocity: f32,
    pub high_velocity_cutoff: f32,
}

impl DecisionParams {
    #[must_use]
    pub fn from_config(config: &LayerConfig, extent: u32) -> Self {
        Self {
            edge: config.edge,
            extent,
            preview_distance: config.preview_distance,
            fling_distance: config.fling_distance,
            min_fling_velocity: config.min_fling_velocity,
            high_velocity_cutoff: config.high_velocity_cutoff,
        }
    }

    /// Preview distance when Preview is reachable.
    #[inline]
    fn preview(&self) -> Option<u32> {
        self.preview_distance.filter(|px| *px > 0)
    }
}

/// Pick the state a released drag should settle into.
#[must_use]
pub fn decide_from_drag(outcome: DragOutcome, params: &DecisionParams) -> PanelState {
    decide_from_drag_traced(outcome, params).0
}

/// [`decide_from_drag`], also reporting which path decided.
#[must_use]
pub fn decide_from_drag_traced(
    outcome: DragOutcome,
    params: &DecisionParams,
) -> (PanelState, DecisionPath) {
    let travelled = exposed_distance(params.extent, outcome.offset);
    let preview = params.preview();
    let speed = outcome.velocity.abs();

    let is_fling = outcome.displacement.abs() > params.fling_distance as f32
        && speed > params.min_fling_velocity;

    let (state, path) = if is_fling {
        let toward_open = outcome.velocity * params.edge.hidden_sign() as f32 > 0.0;
        let state = if toward_open {
            PanelState::Opened
        } else {
            match preview {
                Some(px) if travelled > px && speed < params.high_velocity_cutoff => {
                    PanelState::Preview
                }
                _ => PanelState::Closed,
            }
        };
        (state, DecisionPath::Fling)
    } else {
        let opened_threshold = (u64::from(params.extent) + u64::from(preview.unwrap_or(0))) / 2;
        let state = if u64::from(travelled) > opened_threshold {
            PanelState::Opened
        } else {
            match preview {
                Some(px) if travelled > px / 2 => PanelState::Preview,
                _ => PanelState::Closed,
            }
        };
        (state, DecisionPath::Settle)
    };

    tracing::debug!(
        target: "slidelayer.decision",
        ?state,
        ?path,
        travelled,
        velocity = outcome.velocity,
        displacement = outcome.displacement,
        "drag decision"
    );
    (state, path)
}

/// Pick the state a tap advances to.
#[must_use]
pub fn decide_from_tap(current: PanelState, preview_enabled: bool, policy: TapPolicy) -> PanelState {
    match (current, preview_enabled) {
        (PanelState::Closed, true) => PanelState::Preview,
        (PanelState::Closed, false) | (PanelState::Preview, _) => PanelState::Opened,
        (PanelState::Opened, true) if policy == TapPolicy::Cycle => PanelState::Preview,
        (PanelState::Opened, _) => PanelState::Closed,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(preview: Option<u32>) -> DecisionParams {
        DecisionParams {
            edge: Edge::Right,
            extent: 300,
            preview_distance: preview,
            fling_distance: 25,
            min_fling_velocity: 50.0,
            high_velocity_cutoff: 9000.0,
        }
    }

    fn settle(offset: i32) -> DragOutcome {
        DragOutcome {
            offset,
            velocity: 0.0,
            displacement: 0.0,
        }
    }

    #[test]
    fn settle_past_half_opens() {
        assert_eq!(
            decide_from_drag_traced(settle(-50), &params(None)),
            (PanelState::Opened, DecisionPath::Settle)
        );
    }

    #[test]
    fn settle_sixty_percent_exposed_opens() {
        // 180 of 300 pixels exposed.
        assert_eq!(decide_from_drag(settle(-120), &params(None)), PanelState::Opened);
    }

    #[test]
    fn settle_threshold_does_not_overflow_on_huge_extents() {
        let params = DecisionParams {
            extent: u32::MAX,
            ..params(Some(u32::MAX))
        };
        // Fully exposed sits exactly on (extent + preview) / 2, so not Opened.
        assert_eq!(decide_from_drag(settle(0), &params), PanelState::Preview);
    }

    #[test]
    fn settle_below_half_closes() {
        assert_eq!(decide_from_drag(settle(-200), &params(None)), PanelState::Closed);
    }

    #[test]
    fn settle_near_closed_with_preview_closes() {
        assert_eq!(
            decide_from_drag(settle(-280), &params(Some(60))),
            PanelState::Closed
        );
    }

    #[test]
    fn settle_between_thresholds_previews() {
        // 100 exposed: above 60 / 2, below (300 + 60) / 2.
        assert_eq!(
            decide_from_drag(settle(-200), &params(Some(60))),
            PanelState::Preview
        );
    }

    #[test]
    fn fling_toward_open_overrides_position() {
        // Right edge opens when the pointer moves left.
        let outcome = DragOutcome {
            offset: -290,
            velocity: -100.0,
            displacement: -30.0,
        };
        assert_eq!(
            decide_from_drag_traced(outcome, &params(None)),
            (PanelState::Opened, DecisionPath::Fling)
        );
    }

    #[test]
    fn fling_toward_open_on_left_edge_is_positive() {
        let mut p = params(None);
        p.edge = Edge::Left;
        let outcome = DragOutcome {
            offset: 290,
            velocity: 100.0,
            displacement: 30.0,
        };
        assert_eq!(decide_from_drag(outcome, &p), PanelState::Opened);
    }

    #[test]
    fn closing_fling_catches_preview() {
        let outcome = DragOutcome {
            offset: -40,
            velocity: 2000.0,
            displacement: 100.0,
        };
        assert_eq!(decide_from_drag(outcome, &params(Some(60))), PanelState::Preview);
    }

    #[test]
    fn fast_closing_fling_flies_past_preview() {
        let outcome = DragOutcome {
            offset: -40,
            velocity: 9500.0,
            displacement: 100.0,
        };
        assert_eq!(decide_from_drag(outcome, &params(Some(60))), PanelState::Closed);
    }

    #[test]
    fn short_fast_drag_is_not_a_fling() {
        let outcome = DragOutcome {
            offset: -200,
            velocity: -5000.0,
            displacement: -10.0,
        };
        assert_eq!(
            decide_from_drag_traced(outcome, &params(None)),
            (PanelState::Closed, DecisionPath::Settle)
        );
    }

    #[test]
    fn tap_rotation_with_preview() {
        let p = TapPolicy::Cycle;
        assert_eq!(decide_from_tap(PanelState::Closed, true, p), PanelState::Preview);
        assert_eq!(decide_from_tap(PanelState::Preview, true, p), PanelState::Opened);
        assert_eq!(decide_from_tap(PanelState::Opened, true, p), PanelState::Preview);
    }

    #[test]
    fn tap_rotation_without_preview() {
        let p = TapPolicy::Cycle;
        assert_eq!(decide_from_tap(PanelState::Closed, false, p), PanelState::Opened);
        assert_eq!(decide_from_tap(PanelState::Opened, false, p), PanelState::Closed);
    }

    #[test]
    fn opened_closes_policy_skips_preview() {
        assert_eq!(
            decide_from_tap(PanelState::Opened, true, TapPolicy::OpenedCloses),
            PanelState::Closed
        );
        assert_eq!(
            decide_from_tap(PanelState::Closed, true, TapPolicy::OpenedCloses),
            PanelState::Preview
        );
    }
}
