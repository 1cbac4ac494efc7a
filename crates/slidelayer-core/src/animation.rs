#![forbid(unsafe_code)]

//! Timed settle animation between two scroll offsets.
//!
//! One [`ScrollAnimation`] describes a single session: where it started,
//! where it ends, when it started and how long it runs. Sampling is a pure
//! function of the host clock, so a dropped frame never slows the panel
//! down, it only skips a position.
//!
//! # Invariants
//!
//! 1. [`snap_duration`] never exceeds the configured maximum.
//! 2. Sampling at or after `start + duration` yields exactly the target.
//! 3. Samples before `start` yield exactly the start offset.

use std::f32::consts::FRAC_PI_2;
use std::time::Duration;

use crate::geometry::ScrollOffset;

/// Easing curve: maps linear progress in `[0, 1]` to eased progress.
pub type EasingFn = fn(f32) -> f32;

/// Identity curve.
#[inline]
#[must_use]
pub fn linear(t: f32) -> f32 {
    t.clamp(0.0, 1.0)
}

/// Quintic ease-out: `(t - 1)^5 + 1`. Fast start, long gentle landing.
#[inline]
#[must_use]
pub fn ease_out_quint(t: f32) -> f32 {
    let t = t.clamp(0.0, 1.0) - 1.0;
    t * t * t * t * t + 1.0
}

/// Shaping term for the effective snap distance.
///
/// Maps a distance ratio in `[0, 1]` onto `[-sin(0.15 pi/2), sin(0.15 pi/2)]`,
/// so short moves animate proportionally faster and long moves cap out.
#[inline]
#[must_use]
pub fn distance_influence(ratio: f32) -> f32 {
    ((ratio - 0.5) * 0.3 * FRAC_PI_2).sin()
}

/// Length of a settle animation covering `distance` pixels of a panel that is
/// `extent` pixels long, released at `velocity` px/s.
///
/// Without velocity the animation takes the full `max`.
#[must_use]
pub fn snap_duration(distance: i32, extent: u32, velocity: f32, max: Duration) -> Duration {
    let half = extent as f32 / 2.0;
    let ratio = if extent == 0 {
        1.0
    } else {
        (distance.unsigned_abs() as f32 / extent as f32).min(1.0)
    };
    let effective = half + half * distance_influence(ratio);

    let speed = velocity.abs();
    if !speed.is_finite() || speed <= 0.0 {
        return max;
    }
    let millis = 4.0 * (1000.0 * (effective / speed).abs()).round();
    let bounded = millis.min(max.as_millis() as f32).max(0.0);
    Duration::from_millis(bounded as u64)
}

/// One settle animation session.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScrollAnimation {
    pub start: ScrollOffset,
    pub target: ScrollOffset,
    pub started_at: Duration,
    pub duration: Duration,
    easing: EasingFn,
}

impl ScrollAnimation {
    /// Animation with the default quintic ease-out.
    #[must_use]
    pub fn new(
        start: ScrollOffset,
        target: ScrollOffset,
        started_at: Duration,
        duration: Duration,
    ) -> Self {
        Self {
            start,
            target,
            started_at,
            duration,
            easing: ease_out_quint,
        }
    }

    /// Replace the easing curve.
    #[must_use]
    pub fn easing(mut self, easing: EasingFn) -> Self {
        self.easing = easing;
        self
    }

    /// Linear progress in `[0, 1]` at host time `now`.
    #[must_use]
    pub fn progress(&self, now: Duration) -> f32 {
        if self.duration.is_zero() {
            return 1.0;
        }
        let elapsed = now.saturating_sub(self.started_at);
        (elapsed.as_secs_f32() / self.duration.as_secs_f32()).min(1.0)
    }

    /// Whether the session has run its full duration at `now`.
    #[inline]
    #[must_use]
    pub fn is_complete(&self, now: Duration) -> bool {
        now.saturating_sub(self.started_at) >= self.duration
    }

    /// Interpolated offset at `now`.
    #[must_use]
    pub fn offset_at(&self, now: Duration) -> ScrollOffset {
        if self.is_complete(now) {
            return self.target;
        }
        let eased = (self.easing)(self.progress(now));
        let lerp = |from: i32, to: i32| from + ((to - from) as f32 * eased).round() as i32;
        ScrollOffset::new(
            lerp(self.start.x, self.target.x),
            lerp(self.start.y, self.target.y),
        )
    }
}
