//! Gesture scripts: an element, optional highlight items, and a list of
//! pointer steps.
//!
//! ```json
//! {
//!   "frame_ms": 16,
//!   "element": { "width": 120.0, "height": 48.0 },
//!   "steps": [
//!     { "op": "down", "x": 60.0, "y": 24.0 },
//!     { "op": "wait", "ms": 48 },
//!     { "op": "up", "x": 60.0, "y": 24.0 }
//!   ]
//! }
//! ```

use std::time::Duration;

use jellyfx_core::{DampingIntensity, HighlightConfig, JellyConfig, Point, Rect, ScaleMode, Size};
use serde::{Deserialize, Serialize};

use crate::error::{HarnessError, Result};

const fn default_frame_ms() -> u64 {
    16
}

const fn default_settle() -> bool {
    true
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct Script {
    /// Fixed frame length used for every tick.
    #[serde(default = "default_frame_ms")]
    pub frame_ms: u64,
    /// Size of the pressed element.
    pub element: Size,
    /// Highlight targets. Empty means no highlight tracker.
    #[serde(default)]
    pub items: Vec<Rect>,
    #[serde(default)]
    pub config: ScriptConfig,
    /// Keep ticking after the last step until nothing is animating.
    #[serde(default = "default_settle")]
    pub settle: bool,
    pub steps: Vec<Step>,
}

/// Engine overrides. Unset fields keep the engine defaults.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct ScriptConfig {
    pub deform_intensity: Option<f64>,
    pub drag_intensity: Option<f64>,
    pub scale_mode: Option<ScaleMode>,
    pub elastic_damping: Option<DampingIntensity>,
    pub long_press_ms: Option<u64>,
    pub settle_delay_ms: Option<u64>,
    pub grace_ms: Option<u64>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Step {
    Down { x: f64, y: f64 },
    Move { x: f64, y: f64 },
    Up { x: f64, y: f64 },
    Cancel,
    Wait { ms: u64 },
}

impl Step {
    /// Pointer position carried by the step, if any.
    #[must_use]
    pub fn position(&self) -> Option<Point> {
        match *self {
            Self::Down { x, y } | Self::Move { x, y } | Self::Up { x, y } => Some(Point::new(x, y)),
            Self::Cancel | Self::Wait { .. } => None,
        }
    }
}

impl ScriptConfig {
    #[must_use]
    pub fn jelly_config(&self) -> JellyConfig {
        let mut config = JellyConfig::default();
        if let Some(v) = self.deform_intensity {
            config = config.with_deform_intensity(v);
        }
        if let Some(v) = self.drag_intensity {
            config = config.with_drag_intensity(v);
        }
        if let Some(mode) = self.scale_mode {
            config = config.with_scale_mode(mode);
        }
        if let Some(damping) = self.elastic_damping {
            config = config.with_elastic_damping(damping);
        }
        if let Some(ms) = self.long_press_ms {
            config = config.with_long_press_duration(Duration::from_millis(ms));
        }
        if let Some(ms) = self.settle_delay_ms {
            config = config.with_fast_tap_settle_delay(Duration::from_millis(ms));
        }
        config
    }

    #[must_use]
    pub fn highlight_config(&self) -> HighlightConfig {
        let config = HighlightConfig::default();
        match self.grace_ms {
            Some(ms) => config.with_grace_window(Duration::from_millis(ms)),
            None => config,
        }
    }
}

impl Script {
    pub fn from_json(json: &str) -> Result<Self> {
        let script: Self = serde_json::from_str(json)?;
        script.validate()?;
        Ok(script)
    }

    pub fn validate(&self) -> Result<()> {
        if self.frame_ms == 0 {
            return Err(HarnessError::invalid("frame_ms must be positive"));
        }
        if !(self.element.width.is_finite() && self.element.height.is_finite()) {
            return Err(HarnessError::invalid("element size must be finite"));
        }
        for (i, step) in self.steps.iter().enumerate() {
            if let Some(p) = step.position()
                && !p.is_finite()
            {
                return Err(HarnessError::invalid(format!(
                    "step {i}: pointer position must be finite"
                )));
            }
        }
        self.config.jelly_config().validate()?;
        Ok(())
    }

    #[must_use]
    pub fn frame(&self) -> Duration {
        Duration::from_millis(self.frame_ms)
    }
}
