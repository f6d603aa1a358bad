#![forbid(unsafe_code)]

//! Host callback boundary.
//!
//! Consumer callbacks run after the engine has finished its own bookkeeping,
//! inside `catch_unwind`. A panicking callback is logged and counted; it never
//! unwinds into the engine or back into the host's event dispatch.

use std::panic::{AssertUnwindSafe, catch_unwind};

// Import tracing macros (no-op when tracing feature is disabled).
#[cfg(feature = "tracing")]
use crate::logging::warn;
#[cfg(not(feature = "tracing"))]
use crate::warn;

/// Haptic cue the host should deliver. The engine only decides *when*.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum HapticKind {
    /// Subtle tick, e.g. the highlight moving to another item.
    Light,
    /// Stronger cue, e.g. a drag arming or a long press firing.
    Medium,
}

/// Zero-argument event callback (tap, long tap).
pub type EventCallback = Box<dyn FnMut()>;

/// Haptic cue callback.
pub type HapticCallback = Box<dyn FnMut(HapticKind)>;

/// Highlight-changed callback; `None` when the highlight clears.
pub type IndexCallback = Box<dyn FnMut(Option<usize>)>;

/// Selection callback carrying the selected item index.
pub type SelectCallback = Box<dyn FnMut(usize)>;

/// Run `f`, containing any panic. Returns `false` if it panicked.
#[cfg_attr(not(feature = "tracing"), allow(unused_variables))]
pub(crate) fn run_guarded(label: &'static str, f: impl FnOnce()) -> bool {
    match catch_unwind(AssertUnwindSafe(f)) {
        Ok(()) => true,
        Err(payload) => {
            let message = payload
                .downcast_ref::<&str>()
                .map(|s| (*s).to_owned())
                .or_else(|| payload.downcast_ref::<String>().cloned())
                .unwrap_or_else(|| "non-string panic payload".to_owned());
            warn!(callback = label, %message, "callback panicked; engine state unaffected");
            false
        }
    }
}
