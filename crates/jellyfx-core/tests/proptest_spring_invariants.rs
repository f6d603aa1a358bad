//! Property-based invariant tests for the spring solver.
//!
//! 1. Critically damped and overdamped springs approach monotonically
//! 2. Underdamped springs kicked at their target overshoot it
//! 3. Splitting a step never changes where it lands
//! 4. Invalid parameters are always rejected
//! 5. Results stay finite for the physical parameter range

use jellyfx_core::animation::spring::{DampingRegime, SpringDescription, SpringState};
use proptest::prelude::*;

const STEP: f64 = 0.001;

// ── Strategies ──────────────────────────────────────────────────────────

fn mass_strategy() -> impl Strategy<Value = f64> {
    0.5f64..2.0
}

fn stiffness_strategy() -> impl Strategy<Value = f64> {
    50.0f64..1000.0
}

/// Spring with the requested damping ratio.
fn with_ratio(mass: f64, stiffness: f64, zeta: f64) -> SpringDescription {
    let damping = zeta * 2.0 * (stiffness * mass).sqrt();
    SpringDescription::new(mass, stiffness, damping).unwrap()
}

// ═══════════════════════════════════════════════════════════════════════
// 1. No overshoot at or above critical damping
// ═══════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn non_oscillating_springs_are_monotonic(
        mass in mass_strategy(),
        stiffness in stiffness_strategy(),
        zeta in 1.0f64..4.0,
        target in -50.0f64..50.0,
        offset in 0.1f64..100.0,
    ) {
        let spring = with_ratio(mass, stiffness, zeta);
        prop_assert_ne!(spring.regime(), DampingRegime::Underdamped);

        let mut state = SpringState::new(target - offset, 0.0);
        let mut prev = state.value;
        for _ in 0..3000 {
            state = spring.step(state, target, STEP);
            prop_assert!(
                state.value >= prev - 1e-9,
                "value went backwards: {} -> {} (zeta={})", prev, state.value, zeta
            );
            prop_assert!(
                state.value <= target + 1e-9,
                "overshot target {}: {} (zeta={})", target, state.value, zeta
            );
            prev = state.value;
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════
// 2. Underdamped springs overshoot
// ═══════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn kicked_underdamped_spring_crosses_target(
        mass in mass_strategy(),
        stiffness in stiffness_strategy(),
        zeta in 0.05f64..0.5,
        kick in 5.0f64..50.0,
        target in -10.0f64..10.0,
    ) {
        let spring = with_ratio(mass, stiffness, zeta);
        prop_assert_eq!(spring.regime(), DampingRegime::Underdamped);

        let mut state = SpringState::new(target, kick);
        let mut went_above = false;
        let mut came_back_below = false;
        for _ in 0..2000 {
            state = spring.step(state, target, STEP);
            if state.value > target {
                went_above = true;
            } else if went_above && state.value < target {
                came_back_below = true;
                break;
            }
        }
        prop_assert!(went_above, "positive kick must move above the target");
        prop_assert!(came_back_below, "underdamped spring must swing back past the target");
    }
}

// ═══════════════════════════════════════════════════════════════════════
// 3. Step composition
// ═══════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn split_steps_match_single_step(
        mass in mass_strategy(),
        stiffness in stiffness_strategy(),
        zeta in 0.05f64..3.0,
        start in -20.0f64..20.0,
        velocity in -50.0f64..50.0,
        pieces in 2usize..16,
    ) {
        let spring = with_ratio(mass, stiffness, zeta);
        let total = 0.05;
        let once = spring.step(SpringState::new(start, velocity), 0.0, total);
        let mut chained = SpringState::new(start, velocity);
        for _ in 0..pieces {
            chained = spring.step(chained, 0.0, total / pieces as f64);
        }
        prop_assert!((once.value - chained.value).abs() < 1e-6,
            "value {} vs {}", once.value, chained.value);
        prop_assert!((once.velocity - chained.velocity).abs() < 1e-4,
            "velocity {} vs {}", once.velocity, chained.velocity);
    }

    #[test]
    fn non_positive_dt_is_identity(
        start in -20.0f64..20.0,
        velocity in -50.0f64..50.0,
        dt in -1.0f64..=0.0,
    ) {
        let state = SpringState::new(start, velocity);
        prop_assert_eq!(SpringDescription::PRESS.step(state, 1.0, dt), state);
    }
}

// ═══════════════════════════════════════════════════════════════════════
// 4. Parameter validation
// ═══════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn non_positive_mass_rejected(mass in -100.0f64..=0.0, k in stiffness_strategy()) {
        prop_assert!(SpringDescription::new(mass, k, 10.0).is_err());
    }

    #[test]
    fn non_positive_stiffness_rejected(m in mass_strategy(), k in -100.0f64..=0.0) {
        prop_assert!(SpringDescription::new(m, k, 10.0).is_err());
    }

    #[test]
    fn negative_damping_rejected(c in -100.0f64..-1e-9) {
        prop_assert!(SpringDescription::new(1.0, 100.0, c).is_err());
    }
}

// ═══════════════════════════════════════════════════════════════════════
// 5. Finite output
// ═══════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn step_output_is_finite(
        mass in mass_strategy(),
        stiffness in stiffness_strategy(),
        damping in 0.0f64..200.0,
        start in -1e3f64..1e3,
        velocity in -1e3f64..1e3,
        dt in 0.0f64..1.0,
    ) {
        let spring = SpringDescription::new(mass, stiffness, damping).unwrap();
        let next = spring.step(SpringState::new(start, velocity), 0.0, dt);
        prop_assert!(next.is_finite(), "{:?}", next);
    }
}
