#![forbid(unsafe_code)]

//! Engine configuration.
//!
//! Every field has a default. Builders never validate; engines call
//! [`JellyConfig::validate`] once at construction and refuse to start on an
//! invalid configuration.

use std::time::Duration;

use crate::animation::spring::{DampingIntensity, SpringDescription};
use crate::deformation::{DeformationModel, ScaleMode};
use crate::error::ConfigError;

/// Tuning for one [`PressEngine`](crate::gesture::PressEngine).
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct JellyConfig {
    /// Spring that drives the scale up on press (default: [`SpringDescription::PRESS`]).
    pub press_spring: SpringDescription,
    /// Spring that returns the scale to 1.0 (default: [`SpringDescription::RELEASE`]).
    pub release_spring: SpringDescription,
    /// Damping of the elastic spring that returns deformation and shift to rest.
    pub elastic_damping: DampingIntensity,
    /// Deformation strength (default: 1.0, must be > 0).
    pub deform_intensity: f64,
    /// How far the element follows the finger (default: 1.0, 0 disables shift).
    pub drag_intensity: f64,
    /// Press scale sizing (default: adaptive, 10 px of diagonal growth).
    pub scale_mode: ScaleMode,
    /// Hold time before a long tap fires (default: 500ms).
    pub long_press_duration: Duration,
    /// Remaining share of the press travel (`|press_target - 1|`) above
    /// which a release is deferred so a quick tap still shows its pulse
    /// (default: 0.02).
    pub press_visibility_tolerance: f64,
    /// Length of that deferral (default: 100ms).
    pub fast_tap_settle_delay: Duration,
    /// Whether the host should paint its glow layer. Not used by the engine.
    pub glow_enabled: bool,
}

impl Default for JellyConfig {
    fn default() -> Self {
        Self {
            press_spring: SpringDescription::PRESS,
            release_spring: SpringDescription::RELEASE,
            elastic_damping: DampingIntensity::Medium,
            deform_intensity: 1.0,
            drag_intensity: 1.0,
            scale_mode: ScaleMode::default(),
            long_press_duration: Duration::from_millis(500),
            press_visibility_tolerance: 0.02,
            fast_tap_settle_delay: Duration::from_millis(100),
            glow_enabled: true,
        }
    }
}

impl JellyConfig {
    #[must_use]
    pub fn with_press_spring(mut self, spring: SpringDescription) -> Self {
        self.press_spring = spring;
        self
    }

    #[must_use]
    pub fn with_release_spring(mut self, spring: SpringDescription) -> Self {
        self.release_spring = spring;
        self
    }

    #[must_use]
    pub fn with_elastic_damping(mut self, intensity: DampingIntensity) -> Self {
        self.elastic_damping = intensity;
        self
    }

    #[must_use]
    pub fn with_deform_intensity(mut self, intensity: f64) -> Self {
        self.deform_intensity = intensity;
        self
    }

    #[must_use]
    pub fn with_drag_intensity(mut self, intensity: f64) -> Self {
        self.drag_intensity = intensity;
        self
    }

    #[must_use]
    pub fn with_scale_mode(mut self, mode: ScaleMode) -> Self {
        self.scale_mode = mode;
        self
    }

    #[must_use]
    pub fn with_long_press_duration(mut self, duration: Duration) -> Self {
        self.long_press_duration = duration;
        self
    }

    #[must_use]
    pub fn with_press_visibility_tolerance(mut self, tolerance: f64) -> Self {
        self.press_visibility_tolerance = tolerance;
        self
    }

    #[must_use]
    pub fn with_fast_tap_settle_delay(mut self, delay: Duration) -> Self {
        self.fast_tap_settle_delay = delay;
        self
    }

    #[must_use]
    pub fn with_glow(mut self, enabled: bool) -> Self {
        self.glow_enabled = enabled;
        self
    }

    /// The elastic return spring for the configured damping intensity.
    pub fn elastic_spring(&self) -> Result<SpringDescription, ConfigError> {
        Ok(SpringDescription::elastic(self.elastic_damping)?)
    }

    /// Deformation model built from the configured intensities.
    pub fn deformation_model(&self) -> Result<DeformationModel, ConfigError> {
        DeformationModel::new(self.deform_intensity, self.drag_intensity)
    }

    /// Check every tunable. Fails fast on the first invalid value.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.elastic_spring()?;
        self.deformation_model()?;

        match self.scale_mode {
            ScaleMode::Fixed(scale) if !(scale > 0.0 && scale.is_finite()) => {
                return Err(ConfigError::InvalidFixedScale(scale));
            }
            ScaleMode::Adaptive { growth_px } if !(growth_px >= 0.0 && growth_px.is_finite()) => {
                return Err(ConfigError::InvalidGrowth(growth_px));
            }
            _ => {}
        }
        if !(self.press_visibility_tolerance >= 0.0 && self.press_visibility_tolerance.is_finite())
        {
            return Err(ConfigError::InvalidTolerance(
                self.press_visibility_tolerance,
            ));
        }
        if self.long_press_duration.is_zero() {
            return Err(ConfigError::ZeroLongPressDuration);
        }
        Ok(())
    }
}

/// Tuning for one [`HighlightTracker`](crate::highlight::HighlightTracker).
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct HighlightConfig {
    /// How long a highlight survives after the pointer leaves every item or
    /// the drag ends (default: 200ms).
    pub grace_window: Duration,
}

impl Default for HighlightConfig {
    fn default() -> Self {
        Self {
            grace_window: Duration::from_millis(200),
        }
    }
}

impl HighlightConfig {
    #[must_use]
    pub fn with_grace_window(mut self, grace_window: Duration) -> Self {
        self.grace_window = grace_window;
        self
    }
}
