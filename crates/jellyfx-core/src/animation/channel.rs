#![forbid(unsafe_code)]

//! The five spring-driven channels behind one jelly transform.
//!
//! A [`ChannelSet`] owns exactly one [`AnimationChannel`] per [`ChannelId`].
//! Channels are always ticked, stopped, and reset together; the host reads a
//! [`JellySnapshot`] after each tick to build its render transform.
//!
//! # Invariants
//!
//! 1. Every exposed value is finite. A non-finite solver result leaves the
//!    channel at its last finite value, with zero velocity, inactive.
//! 2. `set_target` never jumps: the channel keeps its current value and
//!    velocity and only changes its target and spring.
//! 3. `set_value_immediate` bypasses the solver entirely and leaves the
//!    channel at rest on the assigned value.
//! 4. `stop_all` keeps current values.

use std::ops::Index;
use std::time::Duration;

use super::spring::{SpringDescription, SpringState};
use crate::geometry::Point;
// Import tracing macros (no-op when tracing feature is disabled).
#[cfg(feature = "tracing")]
use crate::logging::warn;
#[cfg(not(feature = "tracing"))]
use crate::warn;

/// Identity of one animated channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum ChannelId {
    Scale,
    DeformX,
    DeformY,
    ShiftX,
    ShiftY,
}

impl ChannelId {
    /// Every channel, in storage order.
    pub const ALL: [ChannelId; 5] = [
        Self::Scale,
        Self::DeformX,
        Self::DeformY,
        Self::ShiftX,
        Self::ShiftY,
    ];

    /// Value the channel holds at construction and returns to at rest.
    #[must_use]
    pub const fn rest_value(self) -> f64 {
        match self {
            Self::Scale | Self::DeformX | Self::DeformY => 1.0,
            Self::ShiftX | Self::ShiftY => 0.0,
        }
    }

    const fn slot(self) -> usize {
        match self {
            Self::Scale => 0,
            Self::DeformX => 1,
            Self::DeformY => 2,
            Self::ShiftX => 3,
            Self::ShiftY => 4,
        }
    }
}

impl std::fmt::Display for ChannelId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Scale => "scale",
            Self::DeformX => "deform_x",
            Self::DeformY => "deform_y",
            Self::ShiftX => "shift_x",
            Self::ShiftY => "shift_y",
        })
    }
}

/// One scalar driven toward a target by a spring.
///
/// The value domain is unbounded; overshoot past any nominal range is normal.
#[derive(Debug, Clone)]
pub struct AnimationChannel {
    value: f64,
    velocity: f64,
    target: f64,
    active: bool,
    spring: SpringDescription,
}

impl AnimationChannel {
    fn new(initial: f64) -> Self {
        Self {
            value: initial,
            velocity: 0.0,
            target: initial,
            active: false,
            spring: SpringDescription::RELEASE,
        }
    }

    #[inline]
    #[must_use]
    pub fn value(&self) -> f64 {
        self.value
    }

    #[inline]
    #[must_use]
    pub fn velocity(&self) -> f64 {
        self.velocity
    }

    #[inline]
    #[must_use]
    pub fn target(&self) -> f64 {
        self.target
    }

    /// Whether the solver still advances this channel on tick.
    #[inline]
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Spring used for the current (or most recent) animation.
    #[inline]
    #[must_use]
    pub fn spring(&self) -> &SpringDescription {
        &self.spring
    }

    fn animate_to(&mut self, target: f64, spring: SpringDescription) {
        self.target = target;
        self.spring = spring;
        self.active = true;
    }

    fn assign(&mut self, value: f64) {
        self.value = value;
        self.target = value;
        self.velocity = 0.0;
        self.active = false;
    }

    fn stop(&mut self) {
        self.velocity = 0.0;
        self.target = self.value;
        self.active = false;
    }

    /// Advance one solver step. Returns whether the channel is still active.
    #[cfg_attr(not(feature = "tracing"), allow(unused_variables))]
    fn advance(&mut self, id: ChannelId, dt: f64) -> bool {
        if !self.active {
            return false;
        }

        let next = self
            .spring
            .step(SpringState::new(self.value, self.velocity), self.target, dt);

        if !next.is_finite() {
            warn!(
                channel = %id,
                last = self.value,
                "non-finite spring output; holding last finite value"
            );
            self.velocity = 0.0;
            self.active = false;
            return false;
        }

        if SpringDescription::is_at_rest(next, self.target) {
            self.value = self.target;
            self.velocity = 0.0;
            self.active = false;
        } else {
            self.value = next.value;
            self.velocity = next.velocity;
        }
        self.active
    }
}

/// Current values of all five channels, read once per frame.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct JellySnapshot {
    pub scale: f64,
    pub deform_x: f64,
    pub deform_y: f64,
    pub shift_x: f64,
    pub shift_y: f64,
}

impl JellySnapshot {
    /// Snapshot of a resting element: identity transform.
    pub const REST: Self = Self {
        scale: 1.0,
        deform_x: 1.0,
        deform_y: 1.0,
        shift_x: 0.0,
        shift_y: 0.0,
    };

    /// Total horizontal scale factor, `scale · deform_x`.
    #[inline]
    #[must_use]
    pub fn scale_x(&self) -> f64 {
        self.scale * self.deform_x
    }

    /// Total vertical scale factor, `scale · deform_y`.
    #[inline]
    #[must_use]
    pub fn scale_y(&self) -> f64 {
        self.scale * self.deform_y
    }

    /// Map an element-local point through the jelly transform: translate by
    /// the shift, then scale per axis about `center`.
    #[must_use]
    pub fn transform_point(&self, point: Point, center: Point) -> Point {
        Point::new(
            center.x + (point.x - center.x) * self.scale_x() + self.shift_x,
            center.y + (point.y - center.y) * self.scale_y() + self.shift_y,
        )
    }
}

impl Default for JellySnapshot {
    fn default() -> Self {
        Self::REST
    }
}

/// Exactly five channels with fixed identities.
#[derive(Debug, Clone)]
pub struct ChannelSet {
    channels: [AnimationChannel; 5],
}

impl Default for ChannelSet {
    fn default() -> Self {
        Self::new()
    }
}

impl ChannelSet {
    /// All channels at their rest values, inactive.
    #[must_use]
    pub fn new() -> Self {
        Self {
            channels: ChannelId::ALL.map(|id| AnimationChannel::new(id.rest_value())),
        }
    }

    /// Access a channel by identity.
    #[inline]
    #[must_use]
    pub fn channel(&self, id: ChannelId) -> &AnimationChannel {
        &self.channels[id.slot()]
    }

    /// (Re)animate `id` toward `target` from its current value and velocity.
    ///
    /// Non-finite targets are ignored.
    pub fn set_target(&mut self, id: ChannelId, target: f64, spring: SpringDescription) {
        if !target.is_finite() {
            warn!(channel = %id, "ignoring non-finite channel target");
            return;
        }
        self.channels[id.slot()].animate_to(target, spring);
    }

    /// Assign a value directly, bypassing the solver. Non-finite values are
    /// ignored.
    pub fn set_value_immediate(&mut self, id: ChannelId, value: f64) {
        if !value.is_finite() {
            warn!(channel = %id, "ignoring non-finite channel value");
            return;
        }
        self.channels[id.slot()].assign(value);
    }

    /// Advance every active channel by `dt`. Returns whether any channel is
    /// still active afterwards.
    pub fn tick(&mut self, dt: Duration) -> bool {
        let secs = dt.as_secs_f64();
        let mut any_active = false;
        for id in ChannelId::ALL {
            any_active |= self.channels[id.slot()].advance(id, secs);
        }
        any_active
    }

    /// Whether any channel is still being advanced by the solver.
    #[must_use]
    pub fn is_animating(&self) -> bool {
        self.channels.iter().any(AnimationChannel::is_active)
    }

    /// Halt every channel where it stands.
    pub fn stop_all(&mut self) {
        for channel in &mut self.channels {
            channel.stop();
        }
    }

    /// Return every channel to its rest value, inactive.
    pub fn reset(&mut self) {
        for id in ChannelId::ALL {
            self.channels[id.slot()].assign(id.rest_value());
        }
    }

    /// Current values of all five channels.
    #[must_use]
    pub fn snapshot(&self) -> JellySnapshot {
        JellySnapshot {
            scale: self[ChannelId::Scale].value,
            deform_x: self[ChannelId::DeformX].value,
            deform_y: self[ChannelId::DeformY].value,
            shift_x: self[ChannelId::ShiftX].value,
            shift_y: self[ChannelId::ShiftY].value,
        }
    }
}

impl Index<ChannelId> for ChannelSet {
    type Output = AnimationChannel;

    fn index(&self, id: ChannelId) -> &AnimationChannel {
        self.channel(id)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
