#![forbid(unsafe_code)]

//! Test harness for `slidelayer-core`.
//!
//! Provides a simulated host with a manual clock, a gesture script builder,
//! seeded gesture storms with invariant checks, and JSON trace replay. The
//! `slidelayer-harness` binary exposes storms and replay on the command line.

pub mod cli;
pub mod determinism;
pub mod error;
pub mod script;
pub mod sim_host;
pub mod storm;
pub mod trace;

pub use cli::{Cli, run, run_from_env};
pub use determinism::RunFixture;
pub use error::{HarnessError, Result};
pub use script::GestureScript;
pub use sim_host::{Recorded, ScrollRegion, SimHost, Simulator};
pub use storm::{StormConfig, StormReport, run_storm};
pub use trace::{ReplayOutcome, ReplayRecord, Trace, TraceStep, replay};
