//! Property-based invariant tests for the deformation model.
//!
//! 1. Diagonal drags produce no deformation
//! 2. Axis drags stretch one axis and compress the other equally
//! 3. Deformation never exceeds the intensity cap; invalid intensities are
//!    rejected at construction
//! 4. Shift is linear in the drag vector
//! 5. Adaptive press scale shrinks as the element grows

use jellyfx_core::deformation::{DeformationModel, MAX_DEFORM_FRACTION, ScaleMode};
use jellyfx_core::error::ConfigError;
use jellyfx_core::geometry::{Point, Size};
use proptest::prelude::*;

const TOL: f64 = 1e-9;

fn intensity_strategy() -> impl Strategy<Value = f64> {
    0.1f64..5.0
}

// ═══════════════════════════════════════════════════════════════════════
// 1-2. Axis balance
// ═══════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn diagonal_drag_cancels(
        r in -1e4f64..1e4,
        flip in any::<bool>(),
        deform in intensity_strategy(),
        drag in 0.0f64..5.0,
    ) {
        let model = DeformationModel::new(deform, drag).unwrap();
        let d = if flip { Point::new(r, -r) } else { Point::new(r, r) };
        let t = model.targets(d);
        prop_assert!((t.deform_x - 1.0).abs() < TOL, "{:?}", t);
        prop_assert!((t.deform_y - 1.0).abs() < TOL, "{:?}", t);
    }

    #[test]
    fn horizontal_drag_is_volume_balanced(
        r in 1.0f64..1e4,
        sign in prop_oneof![Just(1.0), Just(-1.0)],
        deform in intensity_strategy(),
    ) {
        let t = DeformationModel::new(deform, 1.0).unwrap().targets(Point::new(sign * r, 0.0));
        prop_assert!(t.deform_x > 1.0, "{:?}", t);
        prop_assert!(t.deform_y < 1.0, "{:?}", t);
        prop_assert!((t.deform_x + t.deform_y - 2.0).abs() < TOL, "{:?}", t);
    }

    #[test]
    fn vertical_drag_mirrors_horizontal(
        r in -1e4f64..1e4,
        deform in intensity_strategy(),
    ) {
        let model = DeformationModel::new(deform, 1.0).unwrap();
        let h = model.targets(Point::new(r, 0.0));
        let v = model.targets(Point::new(0.0, r));
        prop_assert!((h.deform_x - v.deform_y).abs() < TOL);
        prop_assert!((h.deform_y - v.deform_x).abs() < TOL);
    }
}

// ═══════════════════════════════════════════════════════════════════════
// 3. Cap
// ═══════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn deformation_is_bounded(
        x in -1e6f64..1e6,
        y in -1e6f64..1e6,
        deform in intensity_strategy(),
    ) {
        let model = DeformationModel::new(deform, 1.0).unwrap();
        let t = model.targets(Point::new(x, y));
        let cap = MAX_DEFORM_FRACTION * deform;
        prop_assert!((t.deform_x - 1.0).abs() <= cap + TOL, "{:?} cap={}", t, cap);
        prop_assert!((t.deform_y - 1.0).abs() <= cap + TOL, "{:?} cap={}", t, cap);
    }
}

proptest! {
    #[test]
    fn non_positive_deform_intensity_is_rejected(
        deform in prop_oneof![-1e3f64..=0.0, Just(f64::NAN), Just(f64::INFINITY)],
        drag in 0.0f64..5.0,
    ) {
        prop_assert!(matches!(
            DeformationModel::new(deform, drag),
            Err(ConfigError::InvalidDeformIntensity(_))
        ));
    }

    #[test]
    fn negative_drag_intensity_is_rejected(
        deform in intensity_strategy(),
        drag in -1e3f64..-1e-9,
    ) {
        prop_assert_eq!(
            DeformationModel::new(deform, drag),
            Err(ConfigError::InvalidDragIntensity(drag))
        );
    }
}

// ═══════════════════════════════════════════════════════════════════════
// 4. Shift
// ═══════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn shift_is_proportional_to_drag(
        x in -500.0f64..500.0,
        y in -500.0f64..500.0,
        drag in 0.0f64..5.0,
    ) {
        let model = DeformationModel::new(1.0, drag).unwrap();
        let one = model.targets(Point::new(x, y));
        let two = model.targets(Point::new(2.0 * x, 2.0 * y));
        prop_assert!((two.shift_x - 2.0 * one.shift_x).abs() < TOL);
        prop_assert!((two.shift_y - 2.0 * one.shift_y).abs() < TOL);
        prop_assert!(one.shift_x * x >= 0.0, "shift follows the finger");
    }
}

// ═══════════════════════════════════════════════════════════════════════
// 5. Adaptive scale
// ═══════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn adaptive_scale_decreases_with_size(
        w in 1.0f64..1000.0,
        h in 1.0f64..1000.0,
        grow in 1.01f64..10.0,
        growth in 0.1f64..50.0,
    ) {
        let mode = ScaleMode::Adaptive { growth_px: growth };
        let small = mode.press_scale(Size::new(w, h));
        let large = mode.press_scale(Size::new(w * grow, h * grow));
        prop_assert!(small > large);
        prop_assert!(large > 1.0);
        let diagonal = Size::new(w, h).diagonal();
        prop_assert!(((small - 1.0) * diagonal - growth).abs() < 1e-6);
    }
}
