//! Replay of the checked-in gesture trace, through the library and the CLI.

use std::path::PathBuf;
use std::time::Duration;

use slidelayer_core::{LayerEvent, PanelState};
use slidelayer_harness::cli::{Commands, ReplayArgs};
use slidelayer_harness::{Cli, ReplayRecord, Trace, replay, run};
use tempfile::tempdir;

fn fixture() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("fixtures/drag_open_close_tap.json")
}

#[test]
fn fixture_replays_to_preview() {
    let trace = Trace::from_file(fixture()).expect("fixture parses");
    let outcome = replay(&trace, Duration::from_millis(16), "fixture").expect("replay");

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
            LayerEvent::PreviewStarted,
            LayerEvent::PreviewFinished,
        ]
    );
    assert_eq!(outcome.final_state, PanelState::Preview);
    assert_eq!(outcome.final_offset, (-220, 0));
    assert!(outcome.claimed >= 20, "claimed {}", outcome.claimed);
}

#[test]
fn replay_is_deterministic() {
    let trace = Trace::from_file(fixture()).expect("fixture parses");
    let a = replay(&trace, Duration::from_millis(16), "a").expect("replay");
    let b = replay(&trace, Duration::from_millis(16), "a").expect("replay");
    assert_eq!(a, b);
}

#[test]
fn frame_interval_changes_timing_not_outcome() {
    let trace = Trace::from_file(fixture()).expect("fixture parses");
    let fast = replay(&trace, Duration::from_millis(8), "f").expect("replay");
    let slow = replay(&trace, Duration::from_millis(33), "s").expect("replay");
    assert_eq!(fast.final_state, slow.final_state);
    assert_eq!(fast.final_offset, slow.final_offset);
    let scrolled = |o: &slidelayer_harness::ReplayOutcome| {
        o.records
            .iter()
            .filter(|r| r.event.scroll_delta().is_some())
            .count()
    };
    assert!(scrolled(&fast) > scrolled(&slow));
}

#[test]
fn cli_writes_parseable_jsonl() {
    let dir = tempdir().expect("tempdir");
    let output = dir.path().join("events.jsonl");
    run(Cli {
        command: Commands::Replay(ReplayArgs {
            trace: fixture(),
            config: None,
            frame_ms: Some(16),
            output: Some(output.clone()),
        }),
    })
    .expect("replay command");

    let text = std::fs::read_to_string(&output).expect("output written");
    let records: Vec<ReplayRecord> = text
        .lines()
        .map(|line| serde_json::from_str(line).expect("valid record"))
        .collect();
    assert!(!records.is_empty());
    assert!(records.iter().all(|r| r.run_id == "replay_seed0"));
    assert!(records.windows(2).all(|w| w[0].at_ms <= w[1].at_ms));
    assert_eq!(
        records.last().map(|r| r.event),
        Some(LayerEvent::PreviewFinished)
    );
}

#[test]
fn config_override_disables_preview() {
    let dir = tempdir().expect("tempdir");
    let config = dir.path().join("no_preview.toml");
    std::fs::write(&config, "edge = \"right\"\noffset_distance = 20\n").expect("write config");
    let output = dir.path().join("events.jsonl");
    run(Cli {
        command: Commands::Replay(ReplayArgs {
            trace: fixture(),
            config: Some(config),
            frame_ms: None,
            output: Some(output.clone()),
        }),
    })
    .expect("replay command");

    let text = std::fs::read_to_string(&output).expect("output written");
    let last: ReplayRecord =
        serde_json::from_str(text.lines().last().expect("records")).expect("valid record");
    // Without Preview the final tap opens the panel.
    assert_eq!(last.event, LayerEvent::OpenFinished);
    assert_eq!(last.state, PanelState::Opened);
}
