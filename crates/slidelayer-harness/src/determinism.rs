#![forbid(unsafe_code)]

//! Seed and frame-interval selection for reproducible runs.
//!
//! Every randomized run takes its seed from `SLIDELAYER_SEED` when set, so a
//! failure printed by CI can be replayed locally with the same gestures.

use std::time::{Duration, SystemTime, UNIX_EPOCH};

use crate::sim_host::FRAME;

/// Seed and clock settings shared by one harness run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunFixture {
    seed: u64,
    deterministic: bool,
    frame: Duration,
    run_id: String,
}

impl RunFixture {
    /// Fixture configured from the environment, falling back to `default_seed`.
    #[must_use]
    pub fn new(prefix: &str, default_seed: u64) -> Self {
        Self::new_with(
            prefix,
            fixture_seed(default_seed),
            deterministic_mode(),
            fixture_frame_interval(),
        )
    }

    /// Fixture with explicit settings.
    #[must_use]
    pub fn new_with(prefix: &str, seed: u64, deterministic: bool, frame: Duration) -> Self {
        let run_id = if deterministic {
            format!("{prefix}_seed{seed}")
        } else {
            format!("{prefix}_{}_{}", std::process::id(), unix_secs())
        };
        Self {
            seed,
            deterministic,
            frame,
            run_id,
        }
    }

    #[must_use]
    pub fn seed(&self) -> u64 {
        self.seed
    }

    #[must_use]
    pub fn deterministic(&self) -> bool {
        self.deterministic
    }

    #[must_use]
    pub fn frame(&self) -> Duration {
        self.frame
    }

    /// Stable identifier for JSONL records.
    #[must_use]
    pub fn run_id(&self) -> &str {
        &self.run_id
    }
}

/// True when `SLIDELAYER_DETERMINISTIC` is `1` or `true`.
#[must_use]
pub fn deterministic_mode() -> bool {
    env_flag("SLIDELAYER_DETERMINISTIC")
}

/// `SLIDELAYER_SEED`, or `default_seed`.
#[must_use]
pub fn fixture_seed(default_seed: u64) -> u64 {
    env_u64("SLIDELAYER_SEED").unwrap_or(default_seed)
}

/// `SLIDELAYER_FRAME_MS`, or the 16 ms default. Zero is rejected.
#[must_use]
pub fn fixture_frame_interval() -> Duration {
    env_u64("SLIDELAYER_FRAME_MS")
        .filter(|ms| *ms > 0)
        .map_or(FRAME, Duration::from_millis)
}

fn env_u64(key: &str) -> Option<u64> {
    std::env::var(key).ok().and_then(|v| v.parse().ok())
}

fn env_flag(key: &str) -> bool {
    matches!(
        std::env::var(key).as_deref(),
        Ok("1") | Ok("true") | Ok("TRUE")
    )
}

fn unix_secs() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs()
}
