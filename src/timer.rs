//! # Tick Timer
//!
//! Contract between the scheduler and the hardware periodic-interrupt
//! source. A [`TickTimer`] is programmed once, by [`crate::Scheduler::attach`],
//! to interrupt at the tick rate selected by the configured [`TimeUnit`];
//! its interrupt handler must call [`crate::Scheduler::on_tick`].
//!
//! Which timer is used is decided at compile time by the type handed to
//! `attach`. `attach` takes the timer by value, so once a peripheral drives
//! the scheduler nothing else can reconfigure it. Sharing a timer with
//! another subsystem (a tone generator, say) is still the caller's problem:
//! the driver cannot detect it.

use crate::config::TimeUnit;
use crate::error::{Error, Result};

/// A hardware timer able to raise a periodic interrupt.
pub trait TickTimer {
    /// Largest reload value the counter accepts.
    const MAX_RELOAD: u32;

    /// Program the timer to interrupt every `reload + 1` input clock
    /// cycles and start it.
    ///
    /// Called with interrupts disabled so no tick observes a half
    /// configured timer.
    fn configure(&mut self, reload: u32);
}

/// Reload value producing one tick of `unit` from a `clock_hz` input clock.
///
/// Fails when the tick is shorter than one clock cycle or longer than the
/// counter can hold.
pub const fn reload_for(clock_hz: u32, unit: TimeUnit, max_reload: u32) -> Result<u32> {
    let cycles = clock_hz as u64 * unit.tick_period_ns() as u64 / 1_000_000_000;
    if cycles == 0 || cycles - 1 > max_reload as u64 {
        Err(Error::ReloadOutOfRange)
    } else {
        Ok((cycles - 1) as u32)
    }
}
