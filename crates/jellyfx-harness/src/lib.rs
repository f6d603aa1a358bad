#![forbid(unsafe_code)]

//! Deterministic replay harness for `jellyfx-core`.
//!
//! A [`Script`] describes an element, optional highlight items, and a list of
//! pointer steps. [`Replay::run`] drives a press engine (and a highlight
//! tracker when items are present) with fixed-length frames and returns a
//! [`Trace`] of per-frame snapshots and callback events. Identical scripts
//! always produce identical traces.

pub mod cli;
pub mod error;
pub mod replay;
pub mod script;

pub use error::{HarnessError, Result};
pub use replay::{EventKind, EventRecord, FrameRecord, Replay, Summary, Trace, TraceEntry};
pub use script::{Script, ScriptConfig, Step};
