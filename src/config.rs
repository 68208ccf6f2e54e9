//! # Tickmux Configuration
//!
//! Compile-time constants and the construction-time [`Config`] for a
//! scheduler instance. Everything here is `const`-constructible so a
//! scheduler can be placed in a `static`.

/// Task table capacity used when a scheduler is declared without an
/// explicit capacity.
pub const DEFAULT_CAPACITY: usize = 4;

/// System clock frequency in Hz (default for STM32F4 at 16 MHz HSI).
pub const SYSTEM_CLOCK_HZ: u32 = 16_000_000;

/// Tick period of the millisecond-scoped configuration (1 kHz).
pub const MILLISECOND_TICK_NS: u32 = 1_000_000;

/// Tick period of the microsecond-scoped configuration. This is the
/// reciprocal of the microsecond conversion coefficient (197 / 5 µs).
pub const MICROSECOND_TICK_NS: u32 = 39_400;

/// Share of one time unit spun per iteration by the calibrated busy-wait,
/// in percent.
pub const CALIBRATION_BASE_PERCENT: u32 = 70;

/// Amount removed from the calibrated spin per configured task, as a
/// percentage of the base spin.
pub const CALIBRATION_STEP_PERCENT: u32 = 10;

// ---------------------------------------------------------------------------
// Time unit
// ---------------------------------------------------------------------------

/// Unit in which callers express timeouts and delays.
///
/// The unit fixes both the hardware tick rate and the conversion
/// coefficient `k` that turns a caller-supplied timeout into a tick count.
/// `k` is stored as an exact ratio so conversion never touches the FPU.
///
/// | Unit        | Tick period | k                  |
/// |-------------|-------------|--------------------|
/// | Millisecond | 1 ms        | 1 / 1              |
/// | Microsecond | 39.4 µs     | 5 / 197 ≈ 0.02538  |
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TimeUnit {
    /// Millisecond-scoped ticks at 1 kHz.
    #[default]
    Millisecond,
    /// Microsecond-scoped ticks at roughly 25.4 kHz.
    Microsecond,
}

impl TimeUnit {
    /// Hardware tick period in nanoseconds.
    #[inline]
    pub const fn tick_period_ns(self) -> u32 {
        match self {
            TimeUnit::Millisecond => MILLISECOND_TICK_NS,
            TimeUnit::Microsecond => MICROSECOND_TICK_NS,
        }
    }

    /// Length of one unit in nanoseconds.
    #[inline]
    pub const fn unit_ns(self) -> u32 {
        match self {
            TimeUnit::Millisecond => 1_000_000,
            TimeUnit::Microsecond => 1_000,
        }
    }

    /// The conversion coefficient `k` as `(numerator, denominator)`.
    #[inline]
    pub const fn ratio(self) -> (u32, u32) {
        match self {
            TimeUnit::Millisecond => (1, 1),
            TimeUnit::Microsecond => (5, 197),
        }
    }

    /// The conversion coefficient `k` as a float, for diagnostics.
    pub fn coefficient(self) -> f32 {
        let (num, den) = self.ratio();
        num as f32 / den as f32
    }

    /// Convert a timeout in this unit to a tick count, truncating.
    #[inline]
    pub const fn to_ticks(self, timeout: u32) -> u32 {
        let (num, den) = self.ratio();
        // num <= den, so the quotient always fits back into u32.
        (timeout as u64 * num as u64 / den as u64) as u32
    }
}

// ---------------------------------------------------------------------------
// Callback policy
// ---------------------------------------------------------------------------

/// How the tick handler treats interrupts while it invokes callbacks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum CallbackPolicy {
    /// Leave the critical section around every callback invocation.
    ///
    /// Interrupts stay masked for at most one slot's bookkeeping at a
    /// time, but a slow callback can be preempted by other interrupts and
    /// a callback that mutates the table races with the remainder of the
    /// scan. That race only affects slots not yet visited in this tick.
    #[default]
    Reentrant,
    /// Run the whole scan, callbacks included, with interrupts masked.
    Masked,
}

// ---------------------------------------------------------------------------
// Scheduler configuration
// ---------------------------------------------------------------------------

/// Construction-time configuration of a scheduler instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Config {
    /// Unit of timeouts and delays; selects the tick rate.
    pub unit: TimeUnit,
    /// Interrupt policy of the tick handler.
    pub policy: CallbackPolicy,
    /// Clock feeding the tick timer, in Hz.
    pub clock_hz: u32,
}

impl Config {
    pub const fn new(unit: TimeUnit) -> Self {
        Self {
            unit,
            policy: CallbackPolicy::Reentrant,
            clock_hz: SYSTEM_CLOCK_HZ,
        }
    }

    pub const fn with_policy(mut self, policy: CallbackPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub const fn with_clock_hz(mut self, clock_hz: u32) -> Self {
        self.clock_hz = clock_hz;
        self
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new(TimeUnit::Millisecond)
    }
}

/// Nanoseconds spun per unit by the calibrated busy-wait for a table of
/// `task_count` slots. Zero means no spin at all.
pub const fn calibrated_spin_ns(unit: TimeUnit, task_count: usize) -> u32 {
    let base = unit.unit_ns() as u64 * CALIBRATION_BASE_PERCENT as u64 / 100;
    let step = base * CALIBRATION_STEP_PERCENT as u64 / 100;
    let penalty = step * task_count as u64;
    if penalty >= base {
        0
    } else {
        (base - penalty) as u32
    }
}

/// Core clock cycles spun per unit by the calibrated busy-wait.
pub const fn calibrated_spin_cycles(unit: TimeUnit, task_count: usize, clock_hz: u32) -> u32 {
    let spin_ns = calibrated_spin_ns(unit, task_count) as u64;
    // spin_ns < 1e6, so the result stays below clock_hz.
    (spin_ns * clock_hz as u64 / 1_000_000_000) as u32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_millisecond_conversion_is_identity() {
        let unit = TimeUnit::Millisecond;
        assert_eq!(unit.coefficient(), 1.0);
        assert_eq!(unit.to_ticks(0), 0);
        assert_eq!(unit.to_ticks(4), 4);
        assert_eq!(unit.to_ticks(u32::MAX), u32::MAX);
    }

    #[test]
    fn test_microsecond_conversion_truncates() {
        let unit = TimeUnit::Microsecond;
        assert!((unit.coefficient() - 0.025_380_71).abs() < 1e-6);
        // 1000 * 0.0253807 = 25.38
        assert_eq!(unit.to_ticks(1000), 25);
        assert_eq!(unit.to_ticks(39), 0);
        assert_eq!(unit.to_ticks(40), 1);
        assert_eq!(unit.to_ticks(u32::MAX), (u32::MAX as u64 * 5 / 197) as u32);
    }

    #[test]
    fn test_tick_period_matches_coefficient() {
        let unit = TimeUnit::Microsecond;
        let (num, den) = unit.ratio();
        assert_eq!(unit.tick_period_ns() as u64 * num as u64, den as u64 * 1_000);
    }

    #[test]
    fn test_calibrated_spin_shrinks_with_tasks() {
        assert_eq!(calibrated_spin_ns(TimeUnit::Millisecond, 0), 700_000);
        assert_eq!(calibrated_spin_ns(TimeUnit::Millisecond, 2), 560_000);
        assert_eq!(calibrated_spin_ns(TimeUnit::Millisecond, 5), 350_000);
        assert_eq!(calibrated_spin_ns(TimeUnit::Millisecond, 10), 0);
        assert_eq!(calibrated_spin_ns(TimeUnit::Millisecond, 12), 0);
        assert_eq!(calibrated_spin_ns(TimeUnit::Microsecond, 1), 630);
    }

    #[test]
    fn test_calibrated_spin_cycles() {
        let ms = TimeUnit::Millisecond;
        // 560 µs at 16 MHz
        assert_eq!(calibrated_spin_cycles(ms, 2, SYSTEM_CLOCK_HZ), 8_960);
        assert_eq!(calibrated_spin_cycles(ms, 0, SYSTEM_CLOCK_HZ), 11_200);
        assert_eq!(calibrated_spin_cycles(ms, 10, SYSTEM_CLOCK_HZ), 0);
        assert_eq!(calibrated_spin_cycles(ms, 16, SYSTEM_CLOCK_HZ), 0);
        // 630 ns at 16 MHz is 10.08 cycles
        assert_eq!(calibrated_spin_cycles(TimeUnit::Microsecond, 1, SYSTEM_CLOCK_HZ), 10);
        assert_eq!(calibrated_spin_cycles(ms, 0, u32::MAX), 3_006_477);
    }

    #[test]
    fn test_config_builders() {
        let config = Config::new(TimeUnit::Microsecond)
            .with_policy(CallbackPolicy::Masked)
            .with_clock_hz(84_000_000);
        assert_eq!(config.unit, TimeUnit::Microsecond);
        assert_eq!(config.policy, CallbackPolicy::Masked);
        assert_eq!(config.clock_hz, 84_000_000);

        let default = Config::default();
        assert_eq!(default.unit, TimeUnit::Millisecond);
        assert_eq!(default.policy, CallbackPolicy::Reentrant);
        assert_eq!(default.clock_hz, SYSTEM_CLOCK_HZ);
    }
}
