#![forbid(unsafe_code)]

//! Recorded gesture traces and their replay.
//!
//! A trace is a JSON document with the layer configuration, the panel size
//! and an ordered list of steps. Replaying produces one JSONL record per
//! emitted [`LayerEvent`], stamped with simulated milliseconds.
//!
//! # Trace schema
//!
//! ```json
//! {
//!   "config": { "edge": "right", "offset_distance": 20 },
//!   "size": { "width": 300, "height": 600 },
//!   "steps": [
//!     { "step": "pointer", "at_ms": 0, "action": { "kind": "down" },
//!       "pointers": [{ "id": 0, "x": 290.0, "y": 10.0 }] },
//!     { "step": "settle" },
//!     { "step": "command", "command": { "op": "open", "smooth": true } }
//!   ]
//! }
//! ```
//!
//! # JSONL output
//!
//! ```json
//! {"run_id":"replay_seed0","step":0,"at_ms":0,"event":{"event":"close_started"},"state":"closed","offset":[-280,0]}
//! ```

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use slidelayer_core::{
    Edge, LayerConfig, LayerEvent, PanelSize, PanelState, PointerAction, PointerEvent,
    PointerSample, SavedLayerState,
};

use crate::error::{HarnessError, Result};
use crate::sim_host::Simulator;

/// Programmatic calls a trace may interleave with pointer input.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Command {
    Open { smooth: bool },
    Close { smooth: bool },
    OpenPreview { smooth: bool },
    StickTo { edge: Edge },
    SetOffsetDistance { px: u32 },
    SetPreviewDistance { px: Option<u32> },
    SetSlidingEnabled { enabled: bool },
    SetChangeStateOnTap { enabled: bool },
    Resize { width: u32, height: u32 },
    Restore { state_tag: i32 },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "step", rename_all = "snake_case")]
pub enum TraceStep {
    Pointer {
        at_ms: u64,
        action: PointerAction,
        pointers: Vec<PointerSample>,
    },
    /// Advance the clock by `ms`, running frames on the way.
    Wait { ms: u64 },
    /// Run frames until the layer is at rest.
    Settle,
    Command { command: Command },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trace {
    #[serde(default)]
    pub config: LayerConfig,
    pub size: PanelSize,
    pub steps: Vec<TraceStep>,
}

impl Trace {
    pub fn from_json_str(s: &str) -> Result<Self> {
        let trace: Self = serde_json::from_str(s)?;
        trace.validate()?;
        Ok(trace)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(HarnessError::MissingTrace {
                path: path.to_path_buf(),
            });
        }
        Self::from_json_str(&std::fs::read_to_string(path)?)
    }

    /// Pointer timestamps must not go backwards.
    fn validate(&self) -> Result<()> {
        let mut last = 0;
        for (i, step) in self.steps.iter().enumerate() {
            if let TraceStep::Pointer { at_ms, pointers, .. } = step {
                if *at_ms < last {
                    return Err(HarnessError::invalid_trace(format!(
                        "step {i}: timestamp {at_ms} ms precedes {last} ms"
                    )));
                }
                if pointers.is_empty() {
                    return Err(HarnessError::invalid_trace(format!(
                        "step {i}: pointer step without pointers"
                    )));
                }
                last = *at_ms;
            }
        }
        Ok(())
    }
}

/// One line of replay output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReplayRecord {
    pub run_id: String,
    pub step: usize,
    pub at_ms: u64,
    pub event: LayerEvent,
    pub state: PanelState,
    pub offset: (i32, i32),
}

#[derive(Debug, Clone, PartialEq)]
pub struct ReplayOutcome {
    pub records: Vec<ReplayRecord>,
    pub final_state: PanelState,
    pub final_offset: (i32, i32),
    /// Pointer steps the layer claimed.
    pub claimed: usize,
}

impl ReplayOutcome {
    /// Render records as JSONL.
    pub fn to_jsonl(&self) -> Result<String> {
        let mut out = String::new();
        for record in &self.records {
            out.push_str(&serde_json::to_string(record)?);
            out.push('\n');
        }
        Ok(out)
    }
}

/// Replay `trace`, running frames every `frame` of simulated time.
pub fn replay(trace: &Trace, frame: Duration, run_id: &str) -> Result<ReplayOutcome> {
    let mut sim = Simulator::new(trace.config.clone(), trace.size)?.with_frame_interval(frame);
    let mut records = Vec::new();
    let mut claimed = 0;
    let mut cursor = 0;

    for (i, step) in trace.steps.iter().enumerate() {
        match step {
            TraceStep::Pointer {
                at_ms,
                action,
                pointers,
            } => {
                let event =
                    PointerEvent::new(*action, pointers.clone(), Duration::from_millis(*at_ms));
                if sim.send(&event) {
                    claimed += 1;
                }
            }
            TraceStep::Wait { ms } => {
                let until = sim.now() + Duration::from_millis(*ms);
                sim.pump_until(until);
            }
            TraceStep::Settle => {
                sim.run_until_settled();
            }
            TraceStep::Command { command } => apply(&mut sim, command)?,
        }
        collect(&sim, i, run_id, &mut cursor, &mut records);
    }

    let offset = sim.layer().offset();
    tracing::info!(
        target: "slidelayer.harness",
        steps = trace.steps.len(),
        records = records.len(),
        claimed,
        "replay complete"
    );
    Ok(ReplayOutcome {
        records,
        final_state: sim.layer().state(),
        final_offset: (offset.x, offset.y),
        claimed,
    })
}

fn apply(sim: &mut Simulator, command: &Command) -> Result<()> {
    let layer = sim.layer_mut();
    match *command {
        Command::Open { smooth } => layer.open(smooth),
        Command::Close { smooth } => layer.close(smooth),
        Command::OpenPreview { smooth } => layer.open_preview(smooth)?,
        Command::StickTo { edge } => layer.set_stick_to(edge),
        Command::SetOffsetDistance { px } => layer.set_offset_distance(px)?,
        Command::SetPreviewDistance { px } => layer.set_preview_offset_distance(px)?,
        Command::SetSlidingEnabled { enabled } => layer.set_sliding_enabled(enabled),
        Command::SetChangeStateOnTap { enabled } => layer.set_change_state_on_tap(enabled),
        Command::Resize { width, height } => layer.set_size(PanelSize::new(width, height)),
        Command::Restore { state_tag } => {
            layer.restore_state(SavedLayerState { state_tag })?;
        }
    }
    Ok(())
}

fn collect(
    sim: &Simulator,
    step: usize,
    run_id: &str,
    cursor: &mut usize,
    records: &mut Vec<ReplayRecord>,
) {
    let layer = sim.layer();
    let recorded = sim.host().recorded();
    let offset = layer.offset();
    for r in &recorded[(*cursor).min(recorded.len())..] {
        records.push(ReplayRecord {
            run_id: run_id.to_string(),
            step,
            at_ms: r.at.as_millis() as u64,
            event: r.event,
            state: layer.state(),
            offset: (offset.x, offset.y),
        });
    }
    *cursor = recorded.len();
}

#[cfg(test)]
mod tests {
    use super::*;

    const OPEN_THEN_CLOSE: &str = r#"{
        "config": { "offset_distance": 20 },
        "size": { "width": 300, "height": 600 },
        "steps": [
            { "step": "command", "command": { "op": "open", "smooth": false } },
            { "step": "command", "command": { "op": "close", "smooth": true } },
            { "step": "settle" }
        ]
    }"#;

    #[test]
    fn parses_and_replays_commands() {
        let trace = Trace::from_json_str(OPEN_THEN_CLOSE).expect("valid trace");
        let outcome = replay(&trace, Duration::from_millis(16), "t").expect("replay");
        assert_eq!(outcome.final_state, PanelState::Closed);
        assert_eq!(outcome.final_offset, (-280, 0));
        let transitions: Vec<LayerEvent> = outcome
            .records
            .iter()
            .map(|r| r.event)
            .filter(LayerEvent::is_transition)
            .collect();
        assert_eq!(
            transitions,
            vec![
                LayerEvent::OpenStarted,
                LayerEvent::OpenFinished,
                LayerEvent::CloseStarted,
                LayerEvent::CloseFinished,
            ]
        );
    }

    #[test]
    fn rejects_time_travel() {
        let json = r#"{
            "size": { "width": 10, "height": 10 },
            "steps": [
                { "step": "pointer", "at_ms": 50, "action": { "kind": "down" },
                  "pointers": [{ "id": 0, "x": 1.0, "y": 1.0 }] },
                { "step": "pointer", "at_ms": 10, "action": { "kind": "up" },
                  "pointers": [{ "id": 0, "x": 1.0, "y": 1.0 }] }
            ]
        }"#;
        let err = Trace::from_json_str(json).expect_err("out of order");
        assert!(matches!(err, HarnessError::InvalidTrace { .. }));
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn jsonl_has_one_line_per_record() {
        let trace = Trace::from_json_str(OPEN_THEN_CLOSE).expect("valid trace");
        let outcome = replay(&trace, Duration::from_millis(16), "t").expect("replay");
        let jsonl = outcome.to_jsonl().expect("serialize");
        assert_eq!(jsonl.lines().count(), outcome.records.len());
        assert!(jsonl.lines().all(|l| l.starts_with("{\"run_id\":\"t\"")));
    }

    #[test]
    fn preview_command_fails_without_preview() {
        let json = r#"{
            "size": { "width": 300, "height": 600 },
            "steps": [
                { "step": "command", "command": { "op": "open_preview", "smooth": true } }
            ]
        }"#;
        let trace = Trace::from_json_str(json).expect("valid trace");
        let err = replay(&trace, Duration::from_millis(16), "t").expect_err("no preview");
        assert!(matches!(err, HarnessError::Layer(_)));
    }
}
