#![forbid(unsafe_code)]

//! Spring physics and the five-channel animation state.
//!
//! - [`spring`]: the damped harmonic oscillator solver and its presets.
//! - [`channel`]: [`ChannelSet`], which applies the solver to the scale,
//!   deformation, and shift channels and produces [`JellySnapshot`]s.

pub mod channel;
pub mod spring;

pub use channel::{AnimationChannel, ChannelId, ChannelSet, JellySnapshot};
pub use spring::{DampingIntensity, DampingRegime, SpringDescription, SpringState};
