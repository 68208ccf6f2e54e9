//! Logging macros.
//!
//! `sched_log!(level, ...)` forwards to `defmt` when the `defmt` feature is
//! enabled and expands to nothing otherwise, so the tick path pays nothing
//! in builds without a logger.

#[cfg(feature = "defmt")]
macro_rules! sched_log {
    ($level:ident, $($arg:tt)*) => {
        defmt::$level!($($arg)*)
    };
}

#[cfg(not(feature = "defmt"))]
macro_rules! sched_log {
    ($level:ident, $($arg:tt)*) => {};
}

pub(crate) use sched_log;
