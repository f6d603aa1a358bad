#![forbid(unsafe_code)]

//! Damped harmonic oscillator (spring) solver.
//!
//! Every animated channel is driven by the classical damped spring equation
//!
//!   m·x'' + c·x' + k·(x − target) = 0
//!
//! # Parameters
//!
//! - **mass** (m): Inertia. Heavier springs respond more slowly.
//! - **stiffness** (k): Restoring force strength. Higher = faster response.
//! - **damping** (c): Velocity drag. The damping ratio `ζ = c / (2√(km))`
//!   selects the regime:
//!   - Underdamped (ζ < 1): oscillates past target before settling
//!   - Critically damped (ζ = 1): fastest convergence without overshoot
//!   - Overdamped (ζ > 1): slow convergence, no overshoot
//!
//! # Integration
//!
//! [`SpringDescription::step`] evaluates the closed-form solution of the
//! oscillator from the current `(value, velocity)` pair, so a step of any
//! length is exact and chaining steps is equivalent to one long step.
//!
//! # Invariants
//!
//! 1. A `SpringDescription` always satisfies `mass > 0`, `stiffness > 0`,
//!    `damping ≥ 0`, all finite. Invalid parameters are rejected, not clamped.
//! 2. `step` with `dt ≤ 0` (or NaN) returns the input state unchanged.
//! 3. Starting from rest, critically damped and overdamped springs approach
//!    the target monotonically.
//!
//! # Failure Modes
//!
//! - Extreme parameters can still produce non-finite output. `step` does not
//!   guard against that; the owning channel keeps its last finite value.
//! - Zero damping: oscillates forever and never reports rest. Not an error.

use crate::error::SpringError;

/// Position delta below which a spring counts as settled.
pub const REST_THRESHOLD: f64 = 0.001;

/// Velocity magnitude below which (combined with [`REST_THRESHOLD`]) a spring
/// counts as settled.
pub const VELOCITY_THRESHOLD: f64 = 0.01;

/// Damping ratios within this distance of 1.0 use the critical solution.
const CRITICAL_TOLERANCE: f64 = 1e-6;

/// Stiffness shared by every elastic spring. Only its damping is tunable.
pub const ELASTIC_STIFFNESS: f64 = 400.0;

/// Damping regime derived from the damping ratio.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DampingRegime {
    Underdamped,
    CriticallyDamped,
    Overdamped,
}

/// Instantaneous state of one oscillator.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SpringState {
    pub value: f64,
    pub velocity: f64,
}

impl SpringState {
    #[inline]
    pub const fn new(value: f64, velocity: f64) -> Self {
        Self { value, velocity }
    }

    #[inline]
    pub fn is_finite(&self) -> bool {
        self.value.is_finite() && self.velocity.is_finite()
    }
}

/// Damping preset for the elastic return spring.
///
/// `Low` is the bounciest. `Custom` accepts any damping constant and is
/// validated when the spring is built.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum DampingIntensity {
    Low,
    #[default]
    Medium,
    High,
    Custom(f64),
}

impl DampingIntensity {
    /// Numeric damping constant for this intensity.
    #[must_use]
    pub fn damping(self) -> f64 {
        match self {
            Self::Low => 8.0,
            Self::Medium => 14.0,
            Self::High => 22.0,
            Self::Custom(c) => c,
        }
    }
}

/// Immutable parameters of one damped harmonic oscillator.
///
/// # Example
///
/// ```
/// use jellyfx_core::animation::spring::{SpringDescription, SpringState};
///
/// let spring = SpringDescription::new(1.0, 170.0, 26.0).unwrap();
/// let mut state = SpringState::new(0.0, 0.0);
/// for _ in 0..120 {
///     state = spring.step(state, 1.0, 1.0 / 60.0);
/// }
/// assert!((state.value - 1.0).abs() < 0.01);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(
    feature = "serde",
    serde(try_from = "SpringParams", into = "SpringParams")
)]
pub struct SpringDescription {
    mass: f64,
    stiffness: f64,
    damping: f64,
}

/// Unvalidated wire form of [`SpringDescription`].
#[cfg(feature = "serde")]
#[derive(serde::Serialize, serde::Deserialize)]
struct SpringParams {
    mass: f64,
    stiffness: f64,
    damping: f64,
}

#[cfg(feature = "serde")]
impl TryFrom<SpringParams> for SpringDescription {
    type Error = SpringError;

    fn try_from(p: SpringParams) -> Result<Self, Self::Error> {
        Self::new(p.mass, p.stiffness, p.damping)
    }
}

#[cfg(feature = "serde")]
impl From<SpringDescription> for SpringParams {
    fn from(s: SpringDescription) -> Self {
        Self {
            mass: s.mass,
            stiffness: s.stiffness,
            damping: s.damping,
        }
    }
}

impl SpringDescription {
    /// Fast press response: high stiffness, low damping (ζ ≈ 0.48).
    pub const PRESS: Self = Self {
        mass: 1.2,
        stiffness: 800.0,
        damping: 30.0,
    };

    /// Smooth release: lower stiffness, near-critical damping (ζ ≈ 1.01).
    pub const RELEASE: Self = Self {
        mass: 1.0,
        stiffness: 300.0,
        damping: 35.0,
    };

    /// Build a spring, rejecting parameters outside the physical domain.
    pub fn new(mass: f64, stiffness: f64, damping: f64) -> Result<Self, SpringError> {
        for (name, v) in [("mass", mass), ("stiffness", stiffness), ("damping", damping)] {
            if !v.is_finite() {
                return Err(SpringError::NonFinite { name });
            }
        }
        if mass <= 0.0 {
            return Err(SpringError::NonPositiveMass(mass));
        }
        if stiffness <= 0.0 {
            return Err(SpringError::NonPositiveStiffness(stiffness));
        }
        if damping < 0.0 {
            return Err(SpringError::NegativeDamping(damping));
        }
        Ok(Self {
            mass,
            stiffness,
            damping,
        })
    }

    /// Bouncy return spring with unit mass and [`ELASTIC_STIFFNESS`].
    pub fn elastic(intensity: DampingIntensity) -> Result<Self, SpringError> {
        Self::new(1.0, ELASTIC_STIFFNESS, intensity.damping())
    }

    #[inline]
    #[must_use]
    pub fn mass(&self) -> f64 {
        self.mass
    }

    #[inline]
    #[must_use]
    pub fn stiffness(&self) -> f64 {
        self.stiffness
    }

    #[inline]
    #[must_use]
    pub fn damping(&self) -> f64 {
        self.damping
    }

    /// Undamped angular frequency `ω₀ = √(k/m)`.
    #[must_use]
    pub fn natural_frequency(&self) -> f64 {
        (self.stiffness / self.mass).sqrt()
    }

    /// Damping coefficient at which the spring stops oscillating, `2√(km)`.
    #[must_use]
    pub fn critical_damping(&self) -> f64 {
        2.0 * (self.stiffness * self.mass).sqrt()
    }

    /// Damping ratio `ζ = c / (2√(km))`.
    #[must_use]
    pub fn damping_ratio(&self) -> f64 {
        self.damping / self.critical_damping()
    }

    #[must_use]
    pub fn regime(&self) -> DampingRegime {
        let zeta = self.damping_ratio();
        if (zeta - 1.0).abs() <= CRITICAL_TOLERANCE {
            DampingRegime::CriticallyDamped
        } else if zeta < 1.0 {
            DampingRegime::Underdamped
        } else {
            DampingRegime::Overdamped
        }
    }

    /// Advance `state` toward `target` by `dt` seconds.
    #[must_use]
    pub fn step(&self, state: SpringState, target: f64, dt: f64) -> SpringState {
        if !(dt > 0.0) {
            return state;
        }

        let x0 = state.value - target;
        let v0 = state.velocity;
        let w0 = self.natural_frequency();
        let zeta = self.damping_ratio();

        let (x, v) = match self.regime() {
            DampingRegime::Underdamped => {
                // x(t) = e^(-ζω₀t) (A cos ωd·t + B sin ωd·t)
                let alpha = zeta * w0;
                let wd = w0 * (1.0 - zeta * zeta).sqrt();
                let a = x0;
                let b = (v0 + alpha * x0) / wd;
                let decay = (-alpha * dt).exp();
                let (sin, cos) = (wd * dt).sin_cos();
                let x = decay * (a * cos + b * sin);
                let v = decay * ((b * wd - alpha * a) * cos - (a * wd + alpha * b) * sin);
                (x, v)
            }
            DampingRegime::CriticallyDamped => {
                // x(t) = (A + B·t) e^(-ω₀t)
                let b = v0 + w0 * x0;
                let decay = (-w0 * dt).exp();
                let linear = x0 + b * dt;
                (linear * decay, (b - w0 * linear) * decay)
            }
            DampingRegime::Overdamped => {
                // x(t) = C₁ e^(r₁t) + C₂ e^(r₂t)
                let s = (zeta * zeta - 1.0).sqrt();
                let r1 = -w0 * (zeta - s);
                let r2 = -w0 * (zeta + s);
                let c1 = (v0 - r2 * x0) / (r1 - r2);
                let c2 = x0 - c1;
                let e1 = (r1 * dt).exp();
                let e2 = (r2 * dt).exp();
                (c1 * e1 + c2 * e2, c1 * r1 * e1 + c2 * r2 * e2)
            }
        };

        SpringState::new(target + x, v)
    }

    /// Whether `state` has settled at `target`.
    #[inline]
    #[must_use]
    pub fn is_at_rest(state: SpringState, target: f64) -> bool {
        (state.value - target).abs() < REST_THRESHOLD && state.velocity.abs() < VELOCITY_THRESHOLD
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
