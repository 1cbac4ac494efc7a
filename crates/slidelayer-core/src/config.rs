#![forbid(unsafe_code)]

//! Layer configuration as data.
//!
//! Every tunable of the layer lives in [`LayerConfig`]. Defaults match a
//! density-1.0 display; [`LayerConfig::for_density`] scales the
//! density-independent thresholds the same way platform toolkits do.
//!
//! # Loading
//!
//! ```toml
//! edge = "left"
//! offset_distance = 24
//! preview_distance = 120
//! touch_slop = 32.0
//! ```
//!
//! ```rust,ignore
//! let config = LayerConfig::from_toml_file("layer.toml")?;
//! let config = LayerConfig::from_json_str(json)?;
//! ```

#[cfg(feature = "config-file")]
use std::path::Path;
use std::time::Duration;

use crate::decision::TapPolicy;
use crate::error::ConfigIssue;
use crate::geometry::Edge;

/// Paging touch slop in density-independent pixels.
pub const DEFAULT_TOUCH_SLOP_DP: f32 = 16.0;
/// Minimum fling velocity in dp per second.
pub const DEFAULT_MIN_FLING_VELOCITY_DP: f32 = 50.0;
/// Velocity clamp in dp per second.
pub const DEFAULT_MAX_FLING_VELOCITY_DP: f32 = 8000.0;
/// Minimum drag distance for a fling, in dp.
pub const DEFAULT_FLING_DISTANCE_DP: f32 = 10.0;
/// Closing flings faster than this fly past Preview (px/s, unscaled).
pub const DEFAULT_HIGH_VELOCITY_CUTOFF: f32 = 9000.0;
/// Upper bound on a settle animation.
pub const DEFAULT_MAX_ANIMATION_DURATION_MS: u64 = 600;

// ---------------------------------------------------------------------------
// LayerConfig
// ---------------------------------------------------------------------------

/// Tunables for one sliding layer.
///
/// Immutable for the duration of a gesture: the layer copies the values it
/// needs when a probe starts.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct LayerConfig {
    /// Anchoring edge.
    pub edge: Edge,
    /// Pixels exposed while Closed.
    pub offset_distance: u32,
    /// Pixels exposed while in Preview. `None` disables Preview.
    pub preview_distance: Option<u32>,
    /// Movement in pixels before a probe becomes a drag.
    pub touch_slop: f32,
    /// Release velocity (px/s) above which a drag counts as a fling.
    pub min_fling_velocity: f32,
    /// Release velocities are clamped to this magnitude (px/s).
    pub max_fling_velocity: f32,
    /// Closing flings at or above this speed skip Preview (px/s).
    pub high_velocity_cutoff: f32,
    /// Minimum total displacement in pixels for a fling.
    pub fling_distance: u32,
    /// Cap on settle animation length.
    pub max_animation_duration_ms: u64,
    /// Whether a tap on the panel advances its state.
    pub change_state_on_tap: bool,
    /// Which state a tap advances to.
    pub tap_policy: TapPolicy,
    /// When false the layer ignores every pointer event.
    pub sliding_enabled: bool,
}

impl Default for LayerConfig {
    fn default() -> Self {
        Self::for_density(1.0)
    }
}

impl LayerConfig {
    /// Defaults scaled for a display with `density` pixels per dp.
    #[must_use]
    pub fn for_density(density: f32) -> Self {
        let density = if density.is_finite() && density > 0.0 {
            density
        } else {
            1.0
        };
        Self {
            edge: Edge::default(),
            offset_distance: 0,
            preview_distance: None,
            touch_slop: DEFAULT_TOUCH_SLOP_DP * density,
            min_fling_velocity: DEFAULT_MIN_FLING_VELOCITY_DP * density,
            max_fling_velocity: DEFAULT_MAX_FLING_VELOCITY_DP * density,
            high_velocity_cutoff: DEFAULT_HIGH_VELOCITY_CUTOFF,
            fling_distance: (DEFAULT_FLING_DISTANCE_DP * density) as u32,
            max_animation_duration_ms: DEFAULT_MAX_ANIMATION_DURATION_MS,
            change_state_on_tap: true,
            tap_policy: TapPolicy::default(),
            sliding_enabled: true,
        }
    }

    #[must_use]
    pub fn with_edge(mut self, edge: Edge) -> Self {
        self.edge = edge;
        self
    }

    #[must_use]
    pub fn with_offset_distance(mut self, px: u32) -> Self {
        self.offset_distance = px;
        self
    }

    #[must_use]
    pub fn with_preview_distance(mut self, px: Option<u32>) -> Self {
        self.preview_distance = px;
        self
    }

    #[must_use]
    pub fn with_tap_policy(mut self, policy: TapPolicy) -> Self {
        self.tap_policy = policy;
        self
    }

    #[must_use]
    pub fn with_fling_distance(mut self, px: u32) -> Self {
        self.fling_distance = px;
        self
    }

    #[must_use]
    pub fn with_min_fling_velocity(mut self, px_per_sec: f32) -> Self {
        self.min_fling_velocity = px_per_sec;
        self
    }

    /// Whether the Preview state is reachable.
    #[inline]
    #[must_use]
    pub fn preview_enabled(&self) -> bool {
        self.preview_distance.is_some_and(|px| px > 0)
    }

    /// Settle animation cap as a [`Duration`].
    #[inline]
    #[must_use]
    pub fn max_animation_duration(&self) -> Duration {
        Duration::from_millis(self.max_animation_duration_ms)
    }

    /// Every problem with this configuration. Empty means valid.
    #[must_use]
    pub fn validate(&self) -> Vec<ConfigIssue> {
        let mut issues = Vec::new();

        if let Some(preview) = self.preview_distance.filter(|px| *px > 0)
            && self.offset_distance > preview
        {
            issues.push(ConfigIssue::OffsetExceedsPreview {
                offset: self.offset_distance,
                preview,
            });
        }

        for (field, value) in [
            ("touch_slop", self.touch_slop),
            ("min_fling_velocity", self.min_fling_velocity),
            ("max_fling_velocity", self.max_fling_velocity),
            ("high_velocity_cutoff", self.high_velocity_cutoff),
        ] {
            if !value.is_finite() || value < 0.0 {
                issues.push(ConfigIssue::InvalidThreshold { field, value });
            }
        }

        if self.min_fling_velocity > self.max_fling_velocity {
            issues.push(ConfigIssue::FlingVelocityRange {
                min: self.min_fling_velocity,
                max: self.max_fling_velocity,
            });
        }

        if self.max_animation_duration_ms == 0 {
            issues.push(ConfigIssue::ZeroAnimationDuration);
        }

        issues
    }

    /// First problem with this configuration, if any.
    pub fn check(&self) -> Result<(), ConfigIssue> {
        match self.validate().into_iter().next() {
            Some(issue) => Err(issue),
            None => Ok(()),
        }
    }

    /// Load from a TOML string and validate.
    #[cfg(feature = "config-file")]
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigLoadError> {
        let config: Self = toml::from_str(s).map_err(ConfigLoadError::Toml)?;
        config.validated()
    }

    /// Load from a TOML file on disk.
    #[cfg(feature = "config-file")]
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, ConfigLoadError> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(ConfigLoadError::Io)?;
        Self::from_toml_str(&content)
    }

    /// Load from a JSON string and validate.
    #[cfg(feature = "config-file")]
    pub fn from_json_str(s: &str) -> Result<Self, ConfigLoadError> {
        let config: Self = serde_json::from_str(s).map_err(ConfigLoadError::Json)?;
        config.validated()
    }

    /// Load from a JSON file on disk.
    #[cfg(feature = "config-file")]
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigLoadError> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(ConfigLoadError::Io)?;
        Self::from_json_str(&content)
    }

    /// Serialize to a pretty TOML string.
    #[cfg(feature = "config-file")]
    pub fn to_toml_string(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }

    #[cfg(feature = "config-file")]
    fn validated(self) -> Result<Self, ConfigLoadError> {
        let issues = self.validate();
        if issues.is_empty() {
            Ok(self)
        } else {
            Err(ConfigLoadError::Invalid(issues))
        }
    }
}

// ---------------------------------------------------------------------------
// Load errors
// ---------------------------------------------------------------------------

/// Errors from loading a [`LayerConfig`] file.
#[cfg(feature = "config-file")]
#[derive(Debug)]
pub enum ConfigLoadError {
    /// I/O error reading a file.
    Io(std::io::Error),
    /// TOML parse error.
    Toml(toml::de::Error),
    /// JSON parse error.
    Json(serde_json::Error),
    /// The parsed configuration failed validation.
    Invalid(Vec<ConfigIssue>),
}

#[cfg(feature = "config-file")]
impl std::fmt::Display for ConfigLoadError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(e) => write!(f, "I/O error: {e}"),
            Self::Toml(e) => write!(f, "TOML parse error: {e}"),
            Self::Json(e) => write!(f, "JSON parse error: {e}"),
            Self::Invalid(issues) => {
                let joined: Vec<String> = issues.iter().map(ToString::to_string).collect();
                write!(f, "validation errors: {}", joined.join("; "))
            }
        }
    }
}

#[cfg(feature = "config-file")]
impl std::error::Error for ConfigLoadError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            Self::Toml(e) => Some(e),
            Self::Json(e) => Some(e),
            Self::Invalid(_) => None,
        }
    }
}
