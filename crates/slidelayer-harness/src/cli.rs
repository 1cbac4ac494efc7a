use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Duration;

use clap::{Args, Parser, Subcommand};
use slidelayer_core::{Edge, LayerConfig};

use crate::determinism::{RunFixture, fixture_frame_interval};
use crate::error::{HarnessError, Result};
use crate::storm::{StormConfig, run_storm};
use crate::trace::{Trace, replay};

#[derive(Debug, Parser)]
#[command(
    name = "slidelayer-harness",
    about = "Replay recorded gestures and run seeded gesture storms against a sliding layer",
    version
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Replay a JSON gesture trace and print emitted events as JSONL.
    Replay(ReplayArgs),

    /// Throw seeded random gestures at a layer and check its invariants.
    Storm(StormArgs),

    /// Validate a TOML or JSON layer configuration and print it normalized.
    #[command(name = "check-config")]
    CheckConfig(CheckConfigArgs),
}

#[derive(Debug, Clone, Args)]
pub struct ReplayArgs {
    pub trace: PathBuf,

    /// Layer configuration overriding the one embedded in the trace.
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Simulated frame interval in milliseconds.
    #[arg(long = "frame-ms")]
    pub frame_ms: Option<u64>,

    /// Write JSONL here instead of stdout.
    #[arg(long)]
    pub output: Option<PathBuf>,
}

#[derive(Debug, Clone, Args)]
pub struct StormArgs {
    /// Seed; defaults to `SLIDELAYER_SEED`, then 0x5EED.
    #[arg(long)]
    pub seed: Option<u64>,

    #[arg(long, default_value_t = 500)]
    pub gestures: usize,

    /// Anchoring edge: left, right, top or bottom. All four when omitted.
    #[arg(long, value_parser = parse_edge)]
    pub edge: Option<Edge>,

    /// Layer configuration to storm instead of the built-in one.
    #[arg(long)]
    pub config: Option<PathBuf>,
}

#[derive(Debug, Clone, Args)]
pub struct CheckConfigArgs {
    pub path: PathBuf,
}

const DEFAULT_STORM_SEED: u64 = 0x5EED;

pub fn run_from_env() -> Result<()> {
    let cli = Cli::parse();
    run(cli)
}

pub fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Replay(args) => run_replay(args),
        Commands::Storm(args) => run_storm_command(args),
        Commands::CheckConfig(args) => run_check_config(args),
    }
}

fn run_replay(args: ReplayArgs) -> Result<()> {
    let mut trace = Trace::from_file(&args.trace)?;
    if let Some(path) = &args.config {
        trace.config = load_config(path)?;
    }
    let frame = args
        .frame_ms
        .filter(|ms| *ms > 0)
        .map_or_else(fixture_frame_interval, Duration::from_millis);
    let fixture = RunFixture::new_with("replay", 0, true, frame);
    let outcome = replay(&trace, fixture.frame(), fixture.run_id())?;
    let jsonl = outcome.to_jsonl()?;
    match &args.output {
        Some(path) => std::fs::write(path, jsonl)?,
        None => std::io::stdout().write_all(jsonl.as_bytes())?,
    }
    Ok(())
}

fn run_storm_command(args: StormArgs) -> Result<()> {
    let fixture = RunFixture::new("storm", DEFAULT_STORM_SEED);
    let seed = args.seed.unwrap_or(fixture.seed());
    let layer = match &args.config {
        Some(path) => Some(load_config(path)?),
        None => None,
    };
    let edges = args.edge.map_or_else(|| Edge::ALL.to_vec(), |e| vec![e]);

    let mut failures = Vec::new();
    for edge in edges {
        let mut config = StormConfig::new(seed, args.gestures);
        config.frame = fixture.frame();
        if let Some(layer) = &layer {
            config.layer = layer.clone();
        }
        let config = config.with_edge(edge);
        let report = run_storm(&config)?;
        println!("{}", serde_json::to_string(&StormLine::from_report(edge, &report))?);
        failures.extend(
            report
                .violations
                .into_iter()
                .map(|v| format!("{edge:?}: {v}")),
        );
    }

    match failures.first() {
        None => Ok(()),
        Some(first) => Err(HarnessError::Invariant {
            count: failures.len(),
            message: format!("seed {seed}: {first}"),
        }),
    }
}

fn run_check_config(args: CheckConfigArgs) -> Result<()> {
    let config = load_config(&args.path)?;
    let toml = config
        .to_toml_string()
        .map_err(|e| HarnessError::Render {
            message: e.to_string(),
        })?;
    print!("{toml}");
    Ok(())
}

/// Load a layer configuration by extension: `.json` or TOML otherwise.
pub fn load_config(path: &Path) -> Result<LayerConfig> {
    let is_json = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("json"));
    let config = if is_json {
        LayerConfig::from_json_file(path)?
    } else {
        LayerConfig::from_toml_file(path)?
    };
    Ok(config)
}

fn parse_edge(s: &str) -> std::result::Result<Edge, String> {
    match s.to_ascii_lowercase().as_str() {
        "left" => Ok(Edge::Left),
        "right" => Ok(Edge::Right),
        "top" => Ok(Edge::Top),
        "bottom" => Ok(Edge::Bottom),
        other => Err(format!("unknown edge `{other}`")),
    }
}

/// Summary line printed per storm.
#[derive(Debug, serde::Serialize)]
struct StormLine {
    event: &'static str,
    edge: Edge,
    seed: u64,
    gestures: usize,
    pointer_events: usize,
    claimed: usize,
    frames: usize,
    transitions: usize,
    violations: usize,
}

impl StormLine {
    fn from_report(edge: Edge, report: &crate::storm::StormReport) -> Self {
        Self {
            event: "storm_complete",
            edge,
            seed: report.seed,
            gestures: report.gestures,
            pointer_events: report.pointer_events,
            claimed: report.claimed,
            frames: report.frames,
            transitions: report.transitions,
            violations: report.violations.len(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn parses_storm_arguments() {
        let cli = Cli::try_parse_from([
            "slidelayer-harness",
            "storm",
            "--seed",
            "9",
            "--gestures",
            "20",
            "--edge",
            "Top",
        ])
        .expect("parse");
        match cli.command {
            Commands::Storm(args) => {
                assert_eq!(args.seed, Some(9));
                assert_eq!(args.gestures, 20);
                assert_eq!(args.edge, Some(Edge::Top));
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn rejects_unknown_edge() {
        let err = Cli::try_parse_from(["slidelayer-harness", "storm", "--edge", "middle"]);
        assert!(err.is_err());
    }

    #[test]
    fn loads_config_by_extension() {
        let dir = tempdir().expect("tempdir");
        let json = dir.path().join("layer.json");
        std::fs::write(&json, r#"{ "edge": "left", "offset_distance": 12 }"#).expect("write");
        let config = load_config(&json).expect("json config");
        assert_eq!(config.edge, Edge::Left);
        assert_eq!(config.offset_distance, 12);

        let toml = dir.path().join("layer.toml");
        std::fs::write(&toml, "edge = \"bottom\"\npreview_distance = 40\n").expect("write");
        let config = load_config(&toml).expect("toml config");
        assert_eq!(config.edge, Edge::Bottom);
        assert_eq!(config.preview_distance, Some(40));
    }

    #[test]
    fn missing_trace_maps_to_exit_code_two() {
        let err = run(Cli {
            command: Commands::Replay(ReplayArgs {
                trace: PathBuf::from("/nonexistent/trace.json"),
                config: None,
                frame_ms: None,
                output: None,
            }),
        })
        .expect_err("missing trace");
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn storm_command_passes_on_clean_run() {
        let result = run(Cli {
            command: Commands::Storm(StormArgs {
                seed: Some(77),
                gestures: 15,
                edge: Some(Edge::Left),
                config: None,
            }),
        });
        assert!(result.is_ok(), "{result:?}");
    }
}
