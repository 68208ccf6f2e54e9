//! # Synchronization Primitives
//!
//! Interrupt-safe critical section abstractions. The task table is the only
//! state shared between foreground code and the tick interrupt, and every
//! access to it goes through [`critical_section`].
//!
//! On ARM the implementation comes from `cortex-m` (`cpsid`/`cpsie` with
//! PRIMASK restore). Host unit tests use the `std` implementation of the
//! `critical-section` crate instead.

pub use critical_section::CriticalSection;

/// Shared state guarded by the critical section.
pub type Shared<T> = critical_section::Mutex<core::cell::RefCell<T>>;

/// Execute a closure within a critical section (interrupts disabled).
///
/// The previous interrupt state is restored on exit, so nesting is allowed:
/// a callback that runs inside the tick handler's critical section can still
/// call the scheduler API.
///
/// # Usage
/// ```ignore
/// sync::critical_section(|cs| {
///     // Access shared state safely
/// });
/// ```
#[inline]
pub fn critical_section<F, R>(f: F) -> R
where
    F: FnOnce(CriticalSection<'_>) -> R,
{
    critical_section::with(f)
}
