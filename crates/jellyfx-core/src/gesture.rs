#![forbid(unsafe_code)]

//! Press gesture state machine: pointer events in, jelly animation out.
//!
//! [`PressEngine`] owns the five animation channels of one interactive
//! element. The host forwards the pointer protocol (`down`, `move`, `up`,
//! `cancel`), calls [`tick`](PressEngine::tick) once per frame while
//! [`needs_tick`](PressEngine::needs_tick) is true, and reads
//! [`snapshot`](PressEngine::snapshot) to build the element's transform.
//!
//! # State Machine
//!
//! ```text
//!   Idle --down--> Pressed --move--> Dragging --move--> Dragging
//!                     |                  |
//!                     +---- up/cancel ---+--> Idle
//! ```
//!
//! - **down**: scale animates toward the press target (fixed, slight, or
//!   adaptive to the element size) with the press spring. A long-press timer
//!   is armed when a long-tap callback is registered.
//! - **move**: while the pointer is inside the element, deformation and
//!   shift follow the drag vector directly (no spring, no lag). Leaving the
//!   element starts the return-to-rest animation; coming back re-presses.
//! - **long press**: sets the fired flag, signals a medium haptic, invokes
//!   the long-tap callback. The state label does not change.
//! - **up**: a tap fires iff the pointer is inside and no long press fired.
//!   A release that arrives before the scale visibly reached its press
//!   target is deferred briefly so fast taps still pulse.
//! - **cancel**: return to rest, no callbacks.
//!
//! The label returns to `Idle` immediately on up or cancel; channels keep
//! animating independently. [`last_end`](PressEngine::last_end) reports
//! whether the previous gesture was `Released` or `Cancelled`.
//!
//! # Invariants
//!
//! 1. Tap and long tap never both fire for one press.
//! 2. Events out of protocol order (move/up/cancel while idle, a second
//!    down while pressed) are ignored.
//! 3. Callbacks run after the engine's own bookkeeping; a panicking
//!    callback cannot leave the engine half-transitioned.
//! 4. After [`dispose`](PressEngine::dispose) every entry point is a no-op
//!    and the snapshot is frozen.
//!
//! # Failure Modes
//!
//! - If the host stops ticking while [`needs_tick`](PressEngine::needs_tick)
//!   is true, pending long presses and deferred releases simply wait.
//! - Non-finite pointer positions produce non-finite targets, which the
//!   channel set ignores.

use std::time::Duration;

use crate::animation::{ChannelId, ChannelSet, JellySnapshot, SpringDescription};
use crate::callback::{EventCallback, HapticCallback, HapticKind, run_guarded};
use crate::config::JellyConfig;
use crate::deformation::DeformationModel;
use crate::error::ConfigError;
use crate::geometry::{Point, Size};
// Import tracing macros (no-op when tracing feature is disabled).
#[cfg(feature = "tracing")]
use crate::logging::{debug, trace};
#[cfg(not(feature = "tracing"))]
use crate::{debug, trace};
use crate::timer::{TimerQueue, TimerToken};

// ---------------------------------------------------------------------------
// Host-facing types
// ---------------------------------------------------------------------------

/// Gesture state label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum GestureState {
    #[default]
    Idle,
    Pressed,
    Dragging,
    /// How a gesture ended with pointer-up. Reported by `last_end`.
    Released,
    /// How a gesture ended with pointer-cancel. Reported by `last_end`.
    Cancelled,
}

/// Current size of the interactive element, queried on every pointer event.
pub trait BoundsSource {
    fn size(&self) -> Size;
}

impl<F: Fn() -> Size> BoundsSource for F {
    fn size(&self) -> Size {
        self()
    }
}

/// Callbacks registered once at construction.
#[derive(Default)]
pub struct PressCallbacks {
    on_tap: Option<EventCallback>,
    on_long_tap: Option<EventCallback>,
    on_haptic: Option<HapticCallback>,
}

impl std::fmt::Debug for PressCallbacks {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PressCallbacks")
            .field("on_tap", &self.on_tap.is_some())
            .field("on_long_tap", &self.on_long_tap.is_some())
            .field("on_haptic", &self.on_haptic.is_some())
            .finish()
    }
}

impl PressCallbacks {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn on_tap(mut self, f: impl FnMut() + 'static) -> Self {
        self.on_tap = Some(Box::new(f));
        self
    }

    /// Registering a long-tap callback is what enables long-press detection.
    #[must_use]
    pub fn on_long_tap(mut self, f: impl FnMut() + 'static) -> Self {
        self.on_long_tap = Some(Box::new(f));
        self
    }

    #[must_use]
    pub fn on_haptic(mut self, f: impl FnMut(HapticKind) + 'static) -> Self {
        self.on_haptic = Some(Box::new(f));
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PressTimer {
    LongPress,
    DeferredSettle,
}

// ---------------------------------------------------------------------------
// PressEngine
// ---------------------------------------------------------------------------

/// Spring-driven press/drag/release engine for one interactive element.
pub struct PressEngine {
    config: JellyConfig,
    model: DeformationModel,
    elastic: SpringDescription,
    bounds: Box<dyn BoundsSource>,
    callbacks: PressCallbacks,

    channels: ChannelSet,
    timers: TimerQueue<PressTimer>,
    published: JellySnapshot,

    state: GestureState,
    last_end: Option<GestureState>,
    drag_origin: Point,
    press_target: f64,
    inside: bool,
    long_press_fired: bool,
    long_press_timer: Option<TimerToken>,
    settle_timer: Option<TimerToken>,

    callback_failures: u64,
    disposed: bool,
}

impl std::fmt::Debug for PressEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PressEngine")
            .field("state", &self.state)
            .field("inside", &self.inside)
            .field("long_press_fired", &self.long_press_fired)
            .field("snapshot", &self.published)
            .field("disposed", &self.disposed)
            .finish_non_exhaustive()
    }
}

impl PressEngine {
    /// Build an engine. Fails if `config` does not validate.
    pub fn new(
        config: JellyConfig,
        bounds: impl BoundsSource + 'static,
        callbacks: PressCallbacks,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        let elastic = config.elastic_spring()?;
        let model = config.deformation_model()?;
        Ok(Self {
            model,
            elastic,
            config,
            bounds: Box::new(bounds),
            callbacks,
            channels: ChannelSet::new(),
            timers: TimerQueue::new(),
            published: JellySnapshot::REST,
            state: GestureState::Idle,
            last_end: None,
            drag_origin: Point::ZERO,
            press_target: 1.0,
            inside: false,
            long_press_fired: false,
            long_press_timer: None,
            settle_timer: None,
            callback_failures: 0,
            disposed: false,
        })
    }

    // -- Accessors -----------------------------------------------------------

    #[inline]
    #[must_use]
    pub fn state(&self) -> GestureState {
        self.state
    }

    /// How the most recent gesture ended (`Released` or `Cancelled`).
    #[inline]
    #[must_use]
    pub fn last_end(&self) -> Option<GestureState> {
        self.last_end
    }

    /// Current channel values. Frozen after disposal.
    #[inline]
    #[must_use]
    pub fn snapshot(&self) -> JellySnapshot {
        self.published
    }

    /// Whether the host should keep delivering ticks.
    #[must_use]
    pub fn needs_tick(&self) -> bool {
        !self.disposed && (self.channels.is_animating() || self.timers.has_pending())
    }

    #[inline]
    #[must_use]
    pub fn is_inside(&self) -> bool {
        self.inside
    }

    #[inline]
    #[must_use]
    pub fn long_press_fired(&self) -> bool {
        self.long_press_fired
    }

    /// Scale the current press animates toward.
    #[inline]
    #[must_use]
    pub fn press_target(&self) -> f64 {
        self.press_target
    }

    #[inline]
    #[must_use]
    pub fn channels(&self) -> &ChannelSet {
        &self.channels
    }

    #[inline]
    #[must_use]
    pub fn config(&self) -> &JellyConfig {
        &self.config
    }

    /// Pass-through rendering flag from the configuration.
    #[inline]
    #[must_use]
    pub fn glow_enabled(&self) -> bool {
        self.config.glow_enabled
    }

    /// Number of callback invocations that panicked and were contained.
    #[inline]
    #[must_use]
    pub fn callback_failures(&self) -> u64 {
        self.callback_failures
    }

    #[inline]
    #[must_use]
    pub fn is_disposed(&self) -> bool {
        self.disposed
    }

    // -- Pointer protocol ----------------------------------------------------

    /// Pointer pressed at element-local `pos`.
    pub fn on_pointer_down(&mut self, pos: Point) {
        if self.disposed {
            return;
        }
        if matches!(self.state, GestureState::Pressed | GestureState::Dragging) {
            debug!(state = ?self.state, "ignoring pointer down during active gesture");
            return;
        }

        self.timers.cancel_all();
        self.long_press_timer = None;
        self.settle_timer = None;
        self.channels.stop_all();

        let size = self.bounds.size();
        self.drag_origin = pos;
        self.inside = size.contains(pos);
        self.long_press_fired = false;
        self.press_target = self.config.scale_mode.press_scale(size);

        self.channels
            .set_target(ChannelId::Scale, self.press_target, self.config.press_spring);
        for id in [
            ChannelId::DeformX,
            ChannelId::DeformY,
            ChannelId::ShiftX,
            ChannelId::ShiftY,
        ] {
            if (self.channels[id].value() - id.rest_value()).abs() > f64::EPSILON {
                self.channels.set_target(id, id.rest_value(), self.elastic);
            }
        }

        if self.callbacks.on_long_tap.is_some() {
            self.long_press_timer = Some(
                self.timers
                    .schedule(PressTimer::LongPress, self.config.long_press_duration),
            );
        }

        self.transition(GestureState::Pressed);
        self.publish();
    }

    /// Pointer moved to element-local `pos`.
    pub fn on_pointer_move(&mut self, pos: Point) {
        if self.disposed || !self.is_tracking() {
            return;
        }
        self.transition(GestureState::Dragging);

        let was_inside = self.inside;
        self.inside = self.bounds.size().contains(pos);

        if !self.inside {
            if was_inside {
                debug!("pointer left element bounds");
                self.animate_to_rest();
                self.publish();
            }
            return;
        }

        if !was_inside {
            debug!("pointer re-entered element bounds");
            self.channels
                .set_target(ChannelId::Scale, self.press_target, self.config.press_spring);
        }

        let targets = self.model.targets(pos - self.drag_origin);
        self.channels
            .set_value_immediate(ChannelId::DeformX, targets.deform_x);
        self.channels
            .set_value_immediate(ChannelId::DeformY, targets.deform_y);
        self.channels
            .set_value_immediate(ChannelId::ShiftX, targets.shift_x);
        self.channels
            .set_value_immediate(ChannelId::ShiftY, targets.shift_y);
        self.publish();
    }

    /// Pointer released at element-local `pos`.
    pub fn on_pointer_up(&mut self, pos: Point) {
        if self.disposed || !self.is_tracking() {
            return;
        }

        self.timers.cancel_slot(&mut self.long_press_timer);
        self.inside = self.bounds.size().contains(pos);
        let tap = self.inside && !self.long_press_fired;

        // The tolerance is a fraction of the press travel, so large elements
        // with a small adaptive scale still get their pulse.
        let scale = &self.channels[ChannelId::Scale];
        let travel = (self.press_target - 1.0).abs();
        let pressing = (scale.target() - self.press_target).abs() < f64::EPSILON;
        let gap = (scale.value() - self.press_target).abs();
        if pressing && travel > f64::EPSILON && gap > self.config.press_visibility_tolerance * travel
        {
            trace!(gap, "deferring release so the press pulse is visible");
            self.settle_timer = Some(self.timers.schedule(
                PressTimer::DeferredSettle,
                self.config.fast_tap_settle_delay,
            ));
        } else {
            self.animate_to_rest();
        }

        self.transition(GestureState::Idle);
        self.last_end = Some(GestureState::Released);
        self.publish();

        if tap {
            self.emit_tap();
        }
    }

    /// Pointer stream cancelled by the host (scroll takeover, focus loss).
    pub fn on_pointer_cancel(&mut self) {
        if self.disposed || !self.is_tracking() {
            return;
        }
        self.timers.cancel_all();
        self.long_press_timer = None;
        self.settle_timer = None;
        self.animate_to_rest();
        self.transition(GestureState::Idle);
        self.last_end = Some(GestureState::Cancelled);
        self.publish();
    }

    // -- Frame driving -------------------------------------------------------

    /// Advance timers and springs by one frame of `dt`.
    pub fn tick(&mut self, dt: Duration) {
        if self.disposed {
            return;
        }
        self.timers.advance(dt);
        while let Some((token, kind)) = self.timers.pop_due() {
            self.fire(token, kind);
        }
        self.channels.tick(dt);
        self.publish();
    }

    /// Tear the engine down: cancel timers, halt channels, refuse all further
    /// mutation. Idempotent.
    pub fn dispose(&mut self) {
        if self.disposed {
            return;
        }
        self.disposed = true;
        self.timers.cancel_all();
        self.long_press_timer = None;
        self.settle_timer = None;
        self.channels.stop_all();
        self.state = GestureState::Idle;
        debug!("press engine disposed");
    }

    // -- Internals -----------------------------------------------------------

    fn is_tracking(&self) -> bool {
        matches!(self.state, GestureState::Pressed | GestureState::Dragging)
    }

    fn transition(&mut self, next: GestureState) {
        if self.state != next {
            debug!(from = ?self.state, to = ?next, "press state transition");
            self.state = next;
        }
    }

    fn publish(&mut self) {
        self.published = self.channels.snapshot();
    }

    /// Scale back to 1.0 on the release spring, deformation and shift back
    /// to rest on the elastic spring.
    fn animate_to_rest(&mut self) {
        self.channels
            .set_target(ChannelId::Scale, 1.0, self.config.release_spring);
        for id in [
            ChannelId::DeformX,
            ChannelId::DeformY,
            ChannelId::ShiftX,
            ChannelId::ShiftY,
        ] {
            self.channels.set_target(id, id.rest_value(), self.elastic);
        }
    }

    fn fire(&mut self, token: TimerToken, kind: PressTimer) {
        trace!(?kind, "press timer fired");
        match kind {
            PressTimer::LongPress => {
                if self.long_press_timer != Some(token) {
                    return;
                }
                self.long_press_timer = None;
                if !self.is_tracking() || !self.inside {
                    return;
                }
                self.long_press_fired = true;
                debug!("long press fired");
                self.emit_haptic(HapticKind::Medium);
                self.emit_long_tap();
            }
            PressTimer::DeferredSettle => {
                if self.settle_timer != Some(token) {
                    return;
                }
                self.settle_timer = None;
                self.animate_to_rest();
            }
        }
    }

    fn emit_tap(&mut self) {
        if let Some(cb) = self.callbacks.on_tap.as_mut()
            && !run_guarded("on_tap", cb)
        {
            self.callback_failures += 1;
        }
    }

    fn emit_long_tap(&mut self) {
        if let Some(cb) = self.callbacks.on_long_tap.as_mut()
            && !run_guarded("on_long_tap", cb)
        {
            self.callback_failures += 1;
        }
    }

    fn emit_haptic(&mut self, kind: HapticKind) {
        if let Some(cb) = self.callbacks.on_haptic.as_mut()
            && !run_guarded("on_haptic", || cb(kind))
        {
            self.callback_failures += 1;
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
