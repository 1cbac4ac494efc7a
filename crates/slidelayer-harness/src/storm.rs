#![forbid(unsafe_code)]

//! Seeded gesture storms with invariant checks.
//!
//! A storm throws a deterministic stream of random gestures at a layer:
//! drags with jitter, taps, cancels, second fingers, programmatic commands
//! and resizes, interleaved with animation frames. After every step the
//! layer is checked against its invariants.
//!
//! # Invariants checked
//!
//! | Check | Condition |
//! |-------|-----------|
//! | bounds | offset inside the scroll bounds of the edge |
//! | exclusive motion | never dragging and animating at once |
//! | pairing | every Finished matches the most recent Started |
//! | exposure | every `Scrolled` reports at most the extent |
//! | rest | once settled, offset equals the state's destination |

use std::time::Duration;

use slidelayer_core::geometry::scroll_bounds;
use slidelayer_core::{
    Axis, Edge, LayerConfig, LayerError, LayerEvent, Motion, PanelSize, PanelState, PointerEvent,
};

use crate::script::GestureScript;
use crate::sim_host::Simulator;

/// Deterministic PRNG (xorshift64).
#[derive(Debug, Clone)]
pub struct Rng {
    state: u64,
}

impl Rng {
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            state: if seed == 0 { 1 } else { seed },
        }
    }

    pub fn next_u64(&mut self) -> u64 {
        self.state ^= self.state << 13;
        self.state ^= self.state >> 7;
        self.state ^= self.state << 17;
        self.state
    }

    /// Uniform in `0..max`; zero when `max` is zero.
    pub fn below(&mut self, max: u64) -> u64 {
        if max == 0 {
            return 0;
        }
        self.next_u64() % max
    }

    /// Uniform in `[lo, hi)`.
    pub fn range_f32(&mut self, lo: f32, hi: f32) -> f32 {
        let unit = (self.next_u64() >> 40) as f32 / (1u64 << 24) as f32;
        lo + (hi - lo) * unit
    }

    /// True with probability `percent / 100`.
    pub fn chance(&mut self, percent: u64) -> bool {
        self.below(100) < percent
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct StormConfig {
    pub seed: u64,
    pub gestures: usize,
    pub layer: LayerConfig,
    pub size: PanelSize,
    pub frame: Duration,
    /// Percentage of rounds that issue a command or resize instead of a
    /// gesture.
    pub command_rate: u64,
}

impl StormConfig {
    #[must_use]
    pub fn new(seed: u64, gestures: usize) -> Self {
        Self {
            seed,
            gestures,
            layer: LayerConfig::default()
                .with_offset_distance(24)
                .with_preview_distance(Some(96)),
            size: PanelSize::new(320, 640),
            frame: crate::sim_host::FRAME,
            command_rate: 10,
        }
    }

    #[must_use]
    pub fn with_edge(mut self, edge: Edge) -> Self {
        self.layer = self.layer.with_edge(edge);
        self
    }
}

/// Outcome of one storm run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StormReport {
    pub seed: u64,
    pub gestures: usize,
    pub pointer_events: usize,
    pub claimed: usize,
    pub frames: usize,
    pub transitions: usize,
    pub final_state: Option<PanelState>,
    pub violations: Vec<String>,
}

impl StormReport {
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.violations.is_empty()
    }
}

/// Run a full storm and report every violation found.
pub fn run_storm(config: &StormConfig) -> Result<StormReport, LayerError> {
    let mut sim =
        Simulator::new(config.layer.clone(), config.size)?.with_frame_interval(config.frame);
    let mut rng = Rng::new(config.seed);
    let mut checker = Checker::default();
    let mut report = StormReport {
        seed: config.seed,
        gestures: config.gestures,
        ..StormReport::default()
    };
    let mut size = config.size;

    tracing::info!(
        target: "slidelayer.harness",
        seed = config.seed,
        gestures = config.gestures,
        edge = ?config.layer.edge,
        "storm start"
    );

    for round in 0..config.gestures {
        if rng.chance(config.command_rate) {
            size = issue_command(&mut sim, &mut rng, size);
            checker.check(&sim, round, &mut report.violations);
        } else {
            let axis = sim.layer().edge().axis();
            let events = random_gesture(&mut rng, sim.now(), size, axis);
            for event in &events {
                report.pointer_events += 1;
                if sim.send(event) {
                    report.claimed += 1;
                }
                checker.check(&sim, round, &mut report.violations);
            }
        }

        // Let a random number of frames run so later gestures land on moving
        // panels.
        let frames = rng.below(40) as usize;
        for _ in 0..frames {
            if !sim.layer().is_animating() {
                break;
            }
            sim.pump_until(sim.now() + config.frame);
            report.frames += 1;
            checker.check(&sim, round, &mut report.violations);
        }
    }

    report.frames += sim.run_until_settled();
    checker.check(&sim, config.gestures, &mut report.violations);
    checker.check_rest(&sim, &mut report.violations);

    report.transitions = sim.host().transitions().len();
    report.final_state = Some(sim.layer().state());

    if report.is_clean() {
        tracing::info!(
            target: "slidelayer.harness",
            seed = config.seed,
            events = report.pointer_events,
            frames = report.frames,
            "storm complete"
        );
    } else {
        tracing::warn!(
            target: "slidelayer.harness",
            seed = config.seed,
            violations = report.violations.len(),
            "storm found invariant violations"
        );
    }
    Ok(report)
}

fn random_gesture(
    rng: &mut Rng,
    now: Duration,
    size: PanelSize,
    axis: Axis,
) -> Vec<PointerEvent> {
    let w = size.width as f32;
    let h = size.height as f32;
    let x = rng.range_f32(0.0, w.max(1.0));
    let y = rng.range_f32(0.0, h.max(1.0));
    let start = now + Duration::from_millis(rng.below(200));
    let mut script = GestureScript::starting_at(start).down(0, x, y);

    let kind = rng.below(10);
    if kind == 0 {
        // Tap.
        return script.wait_ms(rng.below(120)).up(0).build();
    }

    let steps = 1 + rng.below(30) as u32;
    let (mut cx, mut cy) = (x, y);
    for _ in 0..steps {
        // Mostly along the main axis, with cross-axis jitter.
        let along = rng.range_f32(-40.0, 40.0);
        let across = rng.range_f32(-12.0, 12.0);
        match axis {
            Axis::Horizontal => {
                cx += along;
                cy += across;
            }
            Axis::Vertical => {
                cx += across;
                cy += along;
            }
        }
        script = script.wait_ms(1 + rng.below(24)).move_to(0, cx, cy);
    }

    if kind == 1 {
        script = script
            .secondary_down(1, rng.range_f32(0.0, w), rng.range_f32(0.0, h))
            .wait_ms(8)
            .move_by(1, rng.range_f32(-60.0, 60.0), 0.0)
            .wait_ms(8)
            .secondary_up(1);
    }

    let script = script.wait_ms(rng.below(80));
    if kind == 2 {
        script.cancel().build()
    } else {
        script.up(0).build()
    }
}

fn issue_command(sim: &mut Simulator, rng: &mut Rng, size: PanelSize) -> PanelSize {
    let layer = sim.layer_mut();
    match rng.below(6) {
        0 => layer.open(rng.chance(80)),
        1 => layer.close(rng.chance(80)),
        2 => {
            // Preview may be disabled by an earlier command; ignore that.
            let _ = layer.open_preview(rng.chance(80));
        }
        3 => {
            let resized = PanelSize::new(
                size.width + rng.below(120) as u32,
                size.height + rng.below(120) as u32,
            );
            layer.set_size(resized);
            return resized;
        }
        4 => {
            let preview = if rng.chance(20) {
                None
            } else {
                Some(40 + rng.below(120) as u32)
            };
            let _ = layer.set_preview_offset_distance(preview);
        }
        _ => {
            let saved = layer.save_state();
            let _ = layer.restore_state(saved);
        }
    }
    size
}

/// Incremental invariant checker over the host's event log.
#[derive(Debug, Default)]
struct Checker {
    cursor: usize,
    open_transition: Option<LayerEvent>,
}

impl Checker {
    fn check(&mut self, sim: &Simulator, step: usize, violations: &mut Vec<String>) {
        let layer = sim.layer();
        let extent = layer.size().extent(layer.edge().axis());
        let bounds = scroll_bounds(layer.edge(), extent);
        if !bounds.contains(layer.offset()) {
            violations.push(format!(
                "step {step}: offset {:?} outside {bounds:?}",
                layer.offset()
            ));
        }
        if layer.is_dragging() && matches!(layer.motion(), Motion::Animating(_)) {
            violations.push(format!("step {step}: dragging while animating"));
        }

        let recorded = sim.host().recorded();
        for r in &recorded[self.cursor.min(recorded.len())..] {
            match r.event {
                LayerEvent::Scrolled { progress } => {
                    if progress.absolute > extent {
                        violations.push(format!(
                            "step {step}: scrolled {} exceeds extent {extent}",
                            progress.absolute
                        ));
                    }
                }
                LayerEvent::OpenStarted
                | LayerEvent::CloseStarted
                | LayerEvent::PreviewStarted => self.open_transition = Some(r.event),
                finished => {
                    let expected = self.open_transition.take().map(|started| match started {
                        LayerEvent::OpenStarted => LayerEvent::OpenFinished,
                        LayerEvent::CloseStarted => LayerEvent::CloseFinished,
                        _ => LayerEvent::PreviewFinished,
                    });
                    if expected != Some(finished) {
                        violations.push(format!(
                            "step {step}: {finished:?} does not finish {expected:?}"
                        ));
                    }
                }
            }
        }
        self.cursor = recorded.len();
    }

    fn check_rest(&self, sim: &Simulator, violations: &mut Vec<String>) {
        let layer = sim.layer();
        if layer.is_animating() || layer.is_dragging() {
            violations.push("layer never came to rest".to_string());
            return;
        }
        let destination = layer.destination(layer.state());
        if layer.offset() != destination {
            violations.push(format!(
                "resting offset {:?} differs from {:?} destination {destination:?}",
                layer.offset(),
                layer.state()
            ));
        }
    }
}
