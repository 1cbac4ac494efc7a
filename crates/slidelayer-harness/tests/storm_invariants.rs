//! Seeded gesture storms across every edge.
//!
//! Set `SLIDELAYER_SEED` to reproduce a CI failure with the printed seed.

use proptest::prelude::*;
use slidelayer_core::{Edge, LayerConfig, PanelSize, TapPolicy};
use slidelayer_harness::determinism::fixture_seed;
use slidelayer_harness::{StormConfig, run_storm};

fn edge() -> impl Strategy<Value = Edge> {
    prop_oneof![
        Just(Edge::Left),
        Just(Edge::Right),
        Just(Edge::Top),
        Just(Edge::Bottom),
    ]
}

#[test]
fn default_seed_storm_is_clean_on_every_edge() {
    let seed = fixture_seed(0x5EED);
    for edge in Edge::ALL {
        let report = run_storm(&StormConfig::new(seed, 300).with_edge(edge)).expect("valid config");
        assert!(
            report.is_clean(),
            "seed {seed} edge {edge:?}: {:#?}",
            report.violations
        );
        assert!(report.claimed > 0, "edge {edge:?} never claimed an event");
        assert!(report.transitions > 0);
    }
}

#[test]
fn storm_without_preview_never_rests_in_preview() {
    let mut config = StormConfig::new(fixture_seed(42), 200);
    config.layer = LayerConfig::default().with_offset_distance(10);
    config.command_rate = 0;
    let report = run_storm(&config).expect("valid config");
    assert!(report.is_clean(), "{:#?}", report.violations);
    assert_ne!(report.final_state, Some(slidelayer_core::PanelState::Preview));
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(24))]

    #[test]
    fn random_storms_hold_invariants(
        seed in any::<u64>(),
        edge in edge(),
        width in 80u32..800,
        height in 80u32..800,
        offset in 0u32..40,
        preview in proptest::option::of(41u32..79),
        opened_closes in any::<bool>(),
    ) {
        let policy = if opened_closes { TapPolicy::OpenedCloses } else { TapPolicy::Cycle };
        let mut config = StormConfig::new(seed, 60).with_edge(edge);
        config.size = PanelSize::new(width, height);
        config.layer = config
            .layer
            .with_offset_distance(offset)
            .with_preview_distance(preview)
            .with_tap_policy(policy);
        let report = run_storm(&config).expect("valid config");
        prop_assert!(report.is_clean(), "seed {}: {:#?}", seed, report.violations);
    }
}
