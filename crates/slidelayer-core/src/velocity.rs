#![forbid(unsafe_code)]

//! Release-velocity estimation along one axis.
//!
//! Samples are kept in a short time-ordered history. The estimate is the
//! average slope over the samples that are both inside the horizon and not
//! separated by a pause, normalized to units per second.
//!
//! # Invariants
//!
//! 1. The reported velocity is always finite and within
//!    `[-max_velocity, max_velocity]`.
//! 2. After [`VelocityTracker::clear`] the estimate is zero until two new
//!    samples arrive.

use std::collections::VecDeque;
use std::time::Duration;

/// Samples older than this, relative to the newest, are ignored.
pub const HORIZON: Duration = Duration::from_millis(100);

/// A gap this long between samples means the pointer stopped.
pub const ASSUME_STOPPED: Duration = Duration::from_millis(40);

/// Velocity normalization window: estimates are per 1000 ms.
pub const UNITS_PER: Duration = Duration::from_millis(1000);

const MAX_SAMPLES: usize = 20;

#[derive(Debug, Clone, Copy, PartialEq)]
struct Sample {
    at: Duration,
    position: f32,
}

/// Single-axis velocity tracker.
#[derive(Debug, Clone, Default)]
pub struct VelocityTracker {
    history: VecDeque<Sample>,
}

impl VelocityTracker {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an absolute position at `at`.
    ///
    /// Out-of-order timestamps restart the history.
    pub fn add(&mut self, at: Duration, position: f32) {
        if !position.is_finite() {
            return;
        }
        if self.history.back().is_some_and(|last| last.at > at) {
            self.history.clear();
        }
        self.history.push_back(Sample { at, position });
        while self.history.len() > MAX_SAMPLES {
            self.history.pop_front();
        }
        while let Some(first) = self.history.front() {
            if at.saturating_sub(first.at) > HORIZON {
                self.history.pop_front();
            } else {
                break;
            }
        }
    }

    /// Drop the history, e.g. after the tracked pointer changed.
    pub fn clear(&mut self) {
        self.history.clear();
    }

    /// Number of retained samples.
    #[must_use]
    pub fn len(&self) -> usize {
        self.history.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.history.is_empty()
    }

    /// Velocity in units per second, clamped to `±max_velocity`.
    #[must_use]
    pub fn velocity(&self, max_velocity: f32) -> f32 {
        let max_velocity = if max_velocity.is_finite() {
            max_velocity.abs()
        } else {
            f32::MAX
        };

        let Some(newest) = self.history.back().copied() else {
            return 0.0;
        };

        let mut oldest = newest;
        for sample in self.history.iter().rev().skip(1) {
            if newest.at.saturating_sub(sample.at) > HORIZON
                || oldest.at.saturating_sub(sample.at) > ASSUME_STOPPED
            {
                break;
            }
            oldest = *sample;
        }

        let elapsed = newest.at.saturating_sub(oldest.at);
        if elapsed.is_zero() {
            return 0.0;
        }
        let per_unit = UNITS_PER.as_secs_f32() / elapsed.as_secs_f32();
        let velocity = (newest.position - oldest.position) * per_unit;
        velocity.clamp(-max_velocity, max_velocity)
    }
}
