#![forbid(unsafe_code)]

//! Logging facade.
//!
//! With the `tracing` feature the macros are `tracing`'s own. Without it the
//! no-op macros below are exported at the crate root and expand to nothing,
//! so call sites compile identically either way. Import them as
//! `crate::logging::*` when tracing is on and `crate::*` when it is off.

#[cfg(feature = "tracing")]
pub(crate) use tracing::{debug, trace, warn};

#[cfg(not(feature = "tracing"))]
#[doc(hidden)]
#[macro_export]
macro_rules! debug {
    ($($arg:tt)*) => {{}};
}

#[cfg(not(feature = "tracing"))]
#[doc(hidden)]
#[macro_export]
macro_rules! trace {
    ($($arg:tt)*) => {{}};
}

#[cfg(not(feature = "tracing"))]
#[doc(hidden)]
#[macro_export]
macro_rules! warn {
    ($($arg:tt)*) => {{}};
}

#[cfg(all(test, not(feature = "tracing")))]
mod tests {
    use crate::{debug, trace, warn};

    #[test]
    #[allow(unused_variables)]
    fn disabled_macros_accept_tracing_syntax() {
        let value = 1.5_f64;
        let label = "x";
        let () = debug!(value, "plain");
        let () = trace!(?value, %label, "debug and display fields");
        let () = warn!(channel = %label, last = value, "named fields");
    }
}
