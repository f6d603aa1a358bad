#![forbid(unsafe_code)]

//! Drag-to-deformation mapping and press scale sizing.
//!
//! The jelly effect stretches the element along the dominant drag axis and
//! compresses it along the other by the same amount, so the product of the
//! two factors stays close to 1 (approximate volume preservation). Only the
//! *difference* between the axis magnitudes matters: a pure diagonal drag
//! produces no deformation at all.
//!
//! ```text
//! factor     = BASE_FACTOR / deform_intensity
//! max_deform = MAX_DEFORM_FRACTION * deform_intensity
//! shift_unit = BASE_SHIFT * drag_intensity
//! dx         = clamp(|d.x| / factor, 0, max_deform)
//! dy         = clamp(|d.y| / factor, 0, max_deform)
//! diff       = clamp(dx - dy, -max_deform, max_deform)
//! deform     = (1 + diff, 1 - diff)
//! shift      = d * shift_unit
//! ```

use crate::error::ConfigError;
use crate::geometry::{Point, Size};

/// Drag distance (px) that yields one unit of deformation at intensity 1.
pub const BASE_FACTOR: f64 = 5000.0;

/// Deformation cap per unit of deform intensity.
pub const MAX_DEFORM_FRACTION: f64 = 0.15;

/// Shift per pixel of drag per unit of drag intensity.
pub const BASE_SHIFT: f64 = 0.02;

/// Press scale of [`ScaleMode::Slight`].
pub const SLIGHT_SCALE: f64 = 1.05;

/// Live channel targets derived from one drag vector.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DeformTargets {
    pub deform_x: f64,
    pub deform_y: f64,
    pub shift_x: f64,
    pub shift_y: f64,
}

impl DeformTargets {
    /// Targets of an undeformed, unshifted element.
    pub const REST: Self = Self {
        deform_x: 1.0,
        deform_y: 1.0,
        shift_x: 0.0,
        shift_y: 0.0,
    };
}

/// Maps a drag vector to deformation and shift targets.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DeformationModel {
    deform_intensity: f64,
    drag_intensity: f64,
}

impl Default for DeformationModel {
    fn default() -> Self {
        Self {
            deform_intensity: 1.0,
            drag_intensity: 1.0,
        }
    }
}

impl DeformationModel {
    /// Fails unless `deform_intensity` is positive and `drag_intensity`
    /// non-negative, both finite.
    pub fn new(deform_intensity: f64, drag_intensity: f64) -> Result<Self, ConfigError> {
        if !(deform_intensity > 0.0 && deform_intensity.is_finite()) {
            return Err(ConfigError::InvalidDeformIntensity(deform_intensity));
        }
        if !(drag_intensity >= 0.0 && drag_intensity.is_finite()) {
            return Err(ConfigError::InvalidDragIntensity(drag_intensity));
        }
        Ok(Self {
            deform_intensity,
            drag_intensity,
        })
    }

    #[inline]
    #[must_use]
    pub fn deform_intensity(&self) -> f64 {
        self.deform_intensity
    }

    #[inline]
    #[must_use]
    pub fn drag_intensity(&self) -> f64 {
        self.drag_intensity
    }

    /// Largest deviation from 1.0 either deform axis can reach.
    #[inline]
    #[must_use]
    pub fn max_deform(&self) -> f64 {
        MAX_DEFORM_FRACTION * self.deform_intensity
    }

    /// Targets for drag vector `delta = pointer − drag_origin`.
    #[must_use]
    pub fn targets(&self, delta: Point) -> DeformTargets {
        let factor = BASE_FACTOR / self.deform_intensity;
        let max_deform = self.max_deform();
        let shift_unit = BASE_SHIFT * self.drag_intensity;

        let dx = (delta.x.abs() / factor).clamp(0.0, max_deform);
        let dy = (delta.y.abs() / factor).clamp(0.0, max_deform);
        let diff = (dx - dy).clamp(-max_deform, max_deform);

        DeformTargets {
            deform_x: 1.0 + diff,
            deform_y: 1.0 - diff,
            shift_x: delta.x * shift_unit,
            shift_y: delta.y * shift_unit,
        }
    }
}

/// How far the element scales up while pressed.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum ScaleMode {
    /// Always press to this scale.
    Fixed(f64),
    /// The [`SLIGHT_SCALE`] preset.
    Slight,
    /// Grow by a constant number of pixels along the diagonal, whatever the
    /// element size: `1 + growth_px / diagonal`.
    Adaptive { growth_px: f64 },
}

impl Default for ScaleMode {
    fn default() -> Self {
        Self::Adaptive { growth_px: 10.0 }
    }
}

impl ScaleMode {
    /// Press target scale for an element of `size`.
    ///
    /// Adaptive scaling on a zero-sized (or non-finite) element yields 1.0.
    #[must_use]
    pub fn press_scale(&self, size: Size) -> f64 {
        match *self {
            Self::Fixed(scale) => scale,
            Self::Slight => SLIGHT_SCALE,
            Self::Adaptive { growth_px } => adaptive_scale(size, growth_px),
        }
    }
}

/// `1 + growth_px / √(width² + height²)`.
#[must_use]
pub fn adaptive_scale(size: Size, growth_px: f64) -> f64 {
    let diagonal = size.diagonal();
    if diagonal > 0.0 && diagonal.is_finite() {
        1.0 + growth_px / diagonal
    } else {
        1.0
    }
}
