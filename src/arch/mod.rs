//! # Architecture Abstraction Layer
//!
//! Hardware tick sources and the cycle spin. Currently implements the
//! Cortex-M SysTick port; other timers plug in by implementing
//! [`crate::timer::TickTimer`] in a sibling module.

#[cfg(target_arch = "arm")]
pub mod cortex_m4;

/// Spin for roughly `cycles` core clock cycles.
#[cfg(target_arch = "arm")]
#[inline]
pub fn spin_cycles(cycles: u32) {
    cortex_m::asm::delay(cycles);
}

/// Spin for roughly `cycles` loop iterations (host builds).
#[cfg(not(target_arch = "arm"))]
#[inline]
pub fn spin_cycles(cycles: u32) {
    for _ in 0..cycles {
        core::hint::spin_loop();
    }
}
