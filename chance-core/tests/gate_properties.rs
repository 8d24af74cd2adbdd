//! Property tests for the probabilistic gate.
//!
//! Covers threshold validation, the shape of every returned value, side-effect
//! isolation and the long-run pass rate.

use chance_core::{make_gate, GateError, Probability};
use proptest::prelude::*;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::cell::Cell;

proptest! {
    /// Property: every threshold in [1, 99] builds a gate
    #[test]
    fn valid_thresholds_construct(p in 1i64..=99) {
        prop_assert!(make_gate(p, ()).is_ok());
    }

    /// Property: anything outside [1, 99] is rejected up front
    #[test]
    fn invalid_thresholds_rejected(p in prop_oneof![i64::MIN..=0i64, 100i64..=i64::MAX]) {
        let err = make_gate(p, ()).unwrap_err();
        prop_assert!(matches!(err, GateError::InvalidArgument(_)));
    }

    /// Property: float thresholds never construct
    #[test]
    fn float_thresholds_rejected(p in any::<f64>()) {
        prop_assert!(make_gate(p, ()).unwrap_err().is_invalid_argument());
    }

    /// Property: a call yields the target's value or exactly the default
    #[test]
    fn output_is_target_or_default(p in 1u8..=99, seed in any::<u64>()) {
        let gate = make_gate(p, -7_i64).unwrap().with_rng(StdRng::seed_from_u64(seed));
        let mut g = gate.wrap(|x: i64| x * 2);
        for x in 0..64_i64 {
            let out = g.call((x,));
            prop_assert!(out == x * 2 || out == -7);
        }
    }

    /// Property: the target's side effects happen exactly on passing calls
    #[test]
    fn side_effects_only_on_pass(p in 1u8..=99, seed in any::<u64>()) {
        let counter = Cell::new(0_u32);
        let gate = make_gate(p, None).unwrap().with_rng(StdRng::seed_from_u64(seed));
        let mut g = gate.wrap(|| {
            counter.set(counter.get() + 1);
            Some(counter.get())
        });
        let mut passed = 0_u32;
        for _ in 0..128 {
            let before = counter.get();
            match g.call(()) {
                Some(n) => {
                    passed += 1;
                    prop_assert_eq!(n, before + 1);
                }
                None => prop_assert_eq!(counter.get(), before),
            }
        }
        prop_assert_eq!(counter.get(), passed);
    }

    /// Property: one seed, one decision sequence
    #[test]
    fn seeded_wrappers_agree(p in 1u8..=99, seed in any::<u64>()) {
        let gate = make_gate(p, false).unwrap().with_rng(StdRng::seed_from_u64(seed));
        let mut a = gate.wrap(|| true);
        let mut b = gate.wrap(|| true);
        for _ in 0..64 {
            prop_assert_eq!(a.call(()), b.call(()));
        }
    }
}

#[test]
fn half_threshold_passes_about_half_the_time() {
    let probability = 50;
    let gate = make_gate(probability, false).unwrap().with_rng(StdRng::seed_from_u64(0x5eed));
    let mut g = gate.wrap(|| true);

    let iterations = 100_000;
    let hits = (0..iterations).filter(|_| g.call(())).count();
    let observed = hits as f64 / iterations as f64;
    let expected = Probability::new(probability).unwrap().effective_rate();
    assert!((expected - 49.0 / 98.0).abs() < f64::EPSILON);
    assert!((observed - expected).abs() < 0.01, "observed {observed}, expected {expected}");
}

#[test]
fn low_threshold_tracks_skewed_rate() {
    // p = 10 passes 9 out of 98 draws, not 10 out of 100.
    let gate = make_gate(10, 0_u8).unwrap().with_rng(StdRng::seed_from_u64(3));
    let mut g = gate.wrap(|| 1_u8);
    let iterations = 100_000;
    let hits: u32 = (0..iterations).map(|_| u32::from(g.call(()))).sum();
    let observed = f64::from(hits) / f64::from(iterations);
    assert!((observed - 9.0 / 98.0).abs() < 0.005, "observed {observed}");
}

#[test]
fn thread_rng_default_still_honours_bounds() {
    let mut never = make_gate(1, "default").unwrap().wrap(|| "target");
    let mut always = make_gate(99, "default").unwrap().wrap(|| "target");
    for _ in 0..1_000 {
        assert_eq!(never.call(()), "default");
        assert_eq!(always.call(()), "target");
    }
}
