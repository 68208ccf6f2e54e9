//! # Cortex-M4 Port Layer
//!
//! SysTick as the scheduler's tick source.
//!
//! The firmware binds the exception to the scheduler itself:
//!
//! ```ignore
//! #[exception]
//! fn SysTick() {
//!     SCHEDULER.on_tick();
//! }
//! ```
//!
//! ## Interrupt Priorities
//!
//! SysTick defaults to the highest configurable priority. Lowering it with
//! [`set_tick_priority`] lets device interrupts preempt long callbacks when
//! the scheduler runs with [`crate::config::CallbackPolicy::Reentrant`].
//! SysTick never preempts itself: a tick that arrives while a callback is
//! still running stays pending and is handled once the handler returns.

use cortex_m::peripheral::scb::SystemHandler;
use cortex_m::peripheral::syst::SystClkSource;
use cortex_m::peripheral::{SCB, SYST};

use crate::timer::TickTimer;

impl TickTimer for SYST {
    /// SysTick has a 24-bit reload register.
    const MAX_RELOAD: u32 = 0x00FF_FFFF;

    fn configure(&mut self, reload: u32) {
        self.disable_counter();
        self.set_reload(reload);
        self.clear_current();
        self.set_clock_source(SystClkSource::Core);
        self.enable_interrupt();
        self.enable_counter();
    }
}

/// Set the SysTick exception priority. Lower numbers are more urgent; on
/// a Cortex-M4 with 4 priority bits only the upper nibble is significant.
pub fn set_tick_priority(scb: &mut SCB, priority: u8) {
    // Safety: changing a system handler priority cannot break a critical
    // section, which masks through PRIMASK rather than BASEPRI.
    unsafe {
        scb.set_priority(SystemHandler::SysTick, priority);
    }
}
