#![forbid(unsafe_code)]

//! Core: spring-driven jelly feedback for interactive controls.
//!
//! # Role in JellyFX
//! `jellyfx-core` is the whole engine. It turns a raw pointer stream into a
//! continuously animated five-channel transform (scale, two deformation
//! axes, two shift axes) and a handful of discrete callbacks. It never paints:
//! the host supplies ticks, pointer events, and geometry queries, and reads
//! back one [`JellySnapshot`] per frame.
//!
//! # Primary responsibilities
//! - **PressEngine**: press, drag, long-press, release, and cancel with a
//!   deferred release for fast taps.
//! - **ChannelSet**: five spring-animated channels with momentum-preserving
//!   retargeting.
//! - **SpringDescription**: closed-form damped oscillator with presets.
//! - **DeformationModel**: volume-preserving drag deformation and adaptive
//!   press scaling.
//! - **HighlightTracker**: drag-to-highlight across a row of items with a
//!   grace window.
//!
//! # How it fits in the system
//! Everything is single-threaded and tick-driven. Deferred work (long press,
//! fast-tap settle, highlight clear) lives in a [`TimerQueue`] that advances
//! only when the host ticks, so a replay with fixed frame times is fully
//! deterministic. `jellyfx-harness` builds on that to record traces.
//!
//! # Features
//! - `tracing`: structured logs for state transitions, timer fires, numeric
//!   fallbacks, and contained callback panics.
//! - `serde`: `Serialize`/`Deserialize` for configuration, geometry, and
//!   snapshots.

pub mod animation;
pub mod callback;
pub mod config;
pub mod deformation;
pub mod error;
pub mod geometry;
pub mod gesture;
pub mod highlight;
pub mod timer;

mod logging;

pub use animation::{
    AnimationChannel, ChannelId, ChannelSet, DampingIntensity, DampingRegime, JellySnapshot,
    SpringDescription, SpringState,
};
pub use callback::HapticKind;
pub use config::{HighlightConfig, JellyConfig};
pub use deformation::{DeformTargets, DeformationModel, ScaleMode};
pub use error::{ConfigError, SpringError};
pub use geometry::{Point, Rect, Size};
pub use gesture::{BoundsSource, GestureState, PressCallbacks, PressEngine};
pub use highlight::{HighlightCallbacks, HighlightTracker, ItemRects};
pub use timer::{TimerQueue, TimerToken};
