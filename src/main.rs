//! # Tickmux Example Firmware
//!
//! Runs two periodic callbacks off SysTick in millisecond mode:
//!
//! | Task             | Period | Start    | Behavior                              |
//! |------------------|--------|----------|---------------------------------------|
//! | `sample_input`   | 4 ms   | AtOnce   | Collects a sample into a frame        |
//! | `refresh_output` | 10 ms  | AtOnce   | Publishes the last complete frame     |
//!
//! Both callbacks run from the SysTick handler, so they only touch atomics
//! and return quickly. `main` paces itself with the tick-synchronized
//! `delay` and otherwise sleeps.

#![no_std]
#![no_main]

use core::sync::atomic::{AtomicBool, AtomicU32, Ordering};

use cortex_m_rt::{entry, exception};
use panic_halt as _;
#[cfg(feature = "defmt")]
use defmt_rtt as _;

use tickmux::arch::cortex_m4;
use tickmux::{Config, Scheduler, StartMode, TimeUnit};

/// Samples per frame handed from the sampler to the output task.
const FRAME_LEN: u32 = 16;

static SCHEDULER: Scheduler<2> = Scheduler::new(Config::new(TimeUnit::Millisecond));

static SAMPLES: AtomicU32 = AtomicU32::new(0);
static FRAMES: AtomicU32 = AtomicU32::new(0);
static FRAME_BUSY: AtomicBool = AtomicBool::new(false);
static PUBLISHED: AtomicU32 = AtomicU32::new(0);

// ---------------------------------------------------------------------------
// Callbacks
// ---------------------------------------------------------------------------

fn sample_input() {
    let taken = SAMPLES.fetch_add(1, Ordering::Relaxed) + 1;
    if taken % FRAME_LEN == 0 {
        FRAME_BUSY.store(true, Ordering::Release);
        FRAMES.fetch_add(1, Ordering::Relaxed);
        FRAME_BUSY.store(false, Ordering::Release);
    }
}

fn refresh_output() {
    // Skip a refresh rather than publish a frame mid-update.
    if FRAME_BUSY.load(Ordering::Acquire) {
        return;
    }
    PUBLISHED.store(FRAMES.load(Ordering::Relaxed), Ordering::Relaxed);
}

// ---------------------------------------------------------------------------
// Interrupts
// ---------------------------------------------------------------------------

#[exception]
fn SysTick() {
    SCHEDULER.on_tick();
}

// ---------------------------------------------------------------------------
// Main entry point
// ---------------------------------------------------------------------------

#[entry]
fn main() -> ! {
    let mut cp = cortex_m::Peripherals::take().unwrap();

    cortex_m4::set_tick_priority(&mut cp.SCB, 0xF0);
    SCHEDULER.attach(cp.SYST).expect("Failed to attach SysTick");

    let sampler = SCHEDULER.create(&sample_input).expect("Failed to create sampler");
    SCHEDULER
        .start(sampler, 4, StartMode::AtOnce)
        .expect("Failed to start sampler");

    let output = SCHEDULER.create(&refresh_output).expect("Failed to create output");
    SCHEDULER
        .start(output, 10, StartMode::AtOnce)
        .expect("Failed to start output");

    loop {
        SCHEDULER.delay(1000);
        #[cfg(feature = "defmt")]
        defmt::info!(
            "{} samples, {} frames published",
            SAMPLES.load(Ordering::Relaxed),
            PUBLISHED.load(Ordering::Relaxed)
        );
        cortex_m::asm::wfi();
    }
}
