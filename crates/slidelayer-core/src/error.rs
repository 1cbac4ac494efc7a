#![forbid(unsafe_code)]

//! Error types surfaced by the sliding layer.
//!
//! # Failure Modes
//!
//! Every fallible operation validates before it mutates. A returned error
//! means the layer is exactly as it was before the call.
//!
//! Pointer-tracking faults never reach the caller: the touch machine
//! recovers from them locally and only records them in the trace log.

use std::fmt;

/// Reasons a configuration is rejected.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigIssue {
    /// The closed sliver is wider than the preview sliver.
    OffsetExceedsPreview { offset: u32, preview: u32 },
    /// Preview was requested but no preview distance is configured.
    PreviewDisabled,
    /// A threshold or velocity is NaN, infinite or negative.
    InvalidThreshold { field: &'static str, value: f32 },
    /// The minimum fling velocity exceeds the clamp.
    FlingVelocityRange { min: f32, max: f32 },
    /// Animations must be allowed a non-zero duration.
    ZeroAnimationDuration,
}

impl fmt::Display for ConfigIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OffsetExceedsPreview { offset, preview } => write!(
                f,
                "offset distance {offset} must not exceed preview distance {preview}"
            ),
            Self::PreviewDisabled => {
                write!(f, "preview requested but no preview distance is configured")
            }
            Self::InvalidThreshold { field, value } => {
                write!(f, "{field} must be finite and >= 0 (got {value})")
            }
            Self::FlingVelocityRange { min, max } => write!(
                f,
                "min fling velocity {min} must not exceed max fling velocity {max}"
            ),
            Self::ZeroAnimationDuration => write!(f, "max animation duration must be > 0"),
        }
    }
}

/// Errors returned by [`SlidingLayer`](crate::SlidingLayer) operations.
#[derive(Debug, Clone, PartialEq)]
pub enum LayerError {
    /// Inconsistent offset/preview distances, or preview requested while
    /// preview is disabled.
    InvalidConfiguration(ConfigIssue),
    /// A persisted state tag does not name a panel state.
    UnknownStateTag(i32),
}

impl fmt::Display for LayerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidConfiguration(issue) => write!(f, "invalid configuration: {issue}"),
            Self::UnknownStateTag(tag) => write!(f, "unknown panel state tag {tag}"),
        }
    }
}

impl std::error::Error for LayerError {}

impl From<ConfigIssue> for LayerError {
    fn from(issue: ConfigIssue) -> Self {
        Self::InvalidConfiguration(issue)
    }
}

/// Internal tracking faults. Recovered by the touch machine, never returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum TrackingFault {
    /// The active pointer id is absent from an event that should carry it.
    PointerTrackingLost { pointer: u32 },
}

impl fmt::Display for TrackingFault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::PointerTrackingLost { pointer } => {
                write!(f, "active pointer {pointer} is missing from the event")
            }
        }
    }
}
