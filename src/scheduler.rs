//! # Scheduler
//!
//! The public face of tickmux: an interrupt-safe wrapper around a
//! [`TaskTable`] plus the tick handler that drives it.
//!
//! ## Execution contexts
//!
//! - **Foreground**: `create`, `start`, `stop`, `delete`, `delay` and any
//!   callback invoked through [`StartMode::AtOnce`]. Every table access runs
//!   inside a critical section.
//! - **Interrupt**: [`Scheduler::on_tick`], called once per hardware tick.
//!   It counts the tick, decrements running countdowns in index order and
//!   invokes the callbacks that expire. With
//!   [`CallbackPolicy::Reentrant`] interrupts are re-enabled only while a
//!   callback runs; with [`CallbackPolicy::Masked`] they stay masked for the
//!   whole scan.
//!
//! Callbacks may call the scheduler API, including on their own task. A
//! callback must return well within one tick period: ticks that arrive
//! while it runs are coalesced, never queued.
//!
//! ## Example
//!
//! ```ignore
//! static SCHEDULER: Scheduler<2> = Scheduler::new(Config::new(TimeUnit::Millisecond));
//!
//! fn blink() { /* toggle a pin */ }
//!
//! SCHEDULER.attach(core_peripherals.SYST)?;
//! let id = SCHEDULER.create(&blink)?;
//! SCHEDULER.start(id, 500, StartMode::AtOnce)?;
//! ```

use core::cell::{Cell, RefCell};

use critical_section::Mutex;

use crate::arch;
use crate::config::{calibrated_spin_cycles, CallbackPolicy, Config, DEFAULT_CAPACITY};
use crate::error::{Error, Result};
use crate::log::sched_log;
use crate::sync::{self, Shared};
use crate::table::TaskTable;
use crate::task::{Callback, StartMode, TaskId, TaskSlot, TaskState};
use crate::timer::{reload_for, TickTimer};

// ---------------------------------------------------------------------------
// Scheduler struct
// ---------------------------------------------------------------------------

/// Cooperative periodic-callback scheduler with `N` task slots.
///
/// Construction is `const`, so the usual home for a scheduler is a
/// `static` shared by `main` and the tick interrupt handler.
pub struct Scheduler<const N: usize = DEFAULT_CAPACITY> {
    table: Shared<TaskTable<N>>,
    attached: Mutex<Cell<bool>>,
    config: Config,
}

impl<const N: usize> Scheduler<N> {
    pub const fn new(config: Config) -> Self {
        Self {
            table: Mutex::new(RefCell::new(TaskTable::new())),
            attached: Mutex::new(Cell::new(false)),
            config,
        }
    }

    #[inline]
    pub const fn config(&self) -> Config {
        self.config
    }

    #[inline]
    pub const fn capacity(&self) -> usize {
        N
    }

    /// Number of allocated task slots.
    pub fn len(&self) -> usize {
        sync::critical_section(|cs| self.table.borrow_ref(cs).len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Ticks counted since construction.
    pub fn now(&self) -> u64 {
        sync::critical_section(|cs| self.table.borrow_ref(cs).ticks())
    }

    pub fn is_attached(&self) -> bool {
        sync::critical_section(|cs| self.attached.borrow(cs).get())
    }

    /// Snapshot of the slot behind `id`.
    pub fn slot(&self, id: TaskId) -> Result<TaskSlot> {
        sync::critical_section(|cs| self.table.borrow_ref(cs).slot(id).copied())
    }

    pub fn state(&self, id: TaskId) -> Result<TaskState> {
        self.slot(id).map(|slot| slot.state())
    }

    // -----------------------------------------------------------------------
    // Timer driver
    // -----------------------------------------------------------------------

    /// Claim `timer` as the tick source and start it at the configured tick
    /// rate.
    ///
    /// The timer is programmed with interrupts disabled. It is consumed and
    /// never dropped, so it keeps ticking for the rest of the program.
    pub fn attach<T: TickTimer>(&self, mut timer: T) -> Result<()> {
        let reload = reload_for(self.config.clock_hz, self.config.unit, T::MAX_RELOAD)?;

        sync::critical_section(|cs| {
            let attached = self.attached.borrow(cs);
            if attached.get() {
                return Err(Error::TimerAttached);
            }
            timer.configure(reload);
            attached.set(true);
            Ok(())
        })?;
        core::mem::forget(timer);

        sched_log!(info, "tick timer attached, reload {=u32}", reload);
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Scheduler API
    // -----------------------------------------------------------------------

    /// Register `callback` in the first free slot. The task starts
    /// [`TaskState::Stopped`].
    pub fn create(&self, callback: Callback) -> Result<TaskId> {
        sync::critical_section(|cs| self.table.borrow_ref_mut(cs).create(callback))
            .map(|id| {
                sched_log!(debug, "task {} created", id.index());
                id
            })
            .map_err(|err| {
                sched_log!(warn, "create rejected: {}", err);
                err
            })
    }

    /// Run `id` every `timeout` units.
    ///
    /// The timeout is converted to ticks with the unit's coefficient and
    /// truncated, with a floor of one tick. Starting a running task restarts
    /// its countdown from the new period. With [`StartMode::AtOnce`] the
    /// callback is also invoked once, synchronously, after the critical
    /// section has been left.
    pub fn start(&self, id: TaskId, timeout: u32, mode: StartMode) -> Result<()> {
        let ticks = self.config.unit.to_ticks(timeout);
        let callback = sync::critical_section(|cs| self.table.borrow_ref_mut(cs).start(id, ticks))
            .map_err(|err| {
                sched_log!(warn, "start of task {} rejected: {}", id.index(), err);
                err
            })?;
        sched_log!(debug, "task {} started, {} ticks", id.index(), ticks);

        if mode == StartMode::AtOnce {
            callback();
        }
        Ok(())
    }

    /// Halt countdown-driven invocations of `id`. The task stays allocated
    /// and keeps its callback.
    pub fn stop(&self, id: TaskId) -> Result<()> {
        sync::critical_section(|cs| self.table.borrow_ref_mut(cs).stop(id)).map_err(|err| {
            sched_log!(warn, "stop of task {} rejected: {}", id.index(), err);
            err
        })?;
        sched_log!(debug, "task {} stopped", id.index());
        Ok(())
    }

    /// Free the slot behind `id`. The id may be handed out again by a later
    /// `create`.
    pub fn delete(&self, id: TaskId) -> Result<()> {
        sync::critical_section(|cs| self.table.borrow_ref_mut(cs).delete(id)).map_err(|err| {
            sched_log!(warn, "delete of task {} rejected: {}", id.index(), err);
            err
        })?;
        sched_log!(debug, "task {} deleted", id.index());
        Ok(())
    }

    /// Reserved for a polling mode. Does nothing.
    pub fn handle(&self) {}

    // -----------------------------------------------------------------------
    // Tick handler
    // -----------------------------------------------------------------------

    /// Process one hardware tick. Call from the tick timer's interrupt
    /// handler, and from nowhere else.
    pub fn on_tick(&self) {
        match self.config.policy {
            CallbackPolicy::Reentrant => {
                sync::critical_section(|cs| self.table.borrow_ref_mut(cs).advance());
                let mut next = 0;
                loop {
                    let due = sync::critical_section(|cs| self.table.borrow_ref_mut(cs).scan(next));
                    let Some((index, callback)) = due else {
                        break;
                    };
                    callback();
                    next = index + 1;
                }
            }
            CallbackPolicy::Masked => sync::critical_section(|cs| {
                self.table.borrow_ref_mut(cs).advance();
                let mut next = 0;
                loop {
                    // The table borrow must end before the callback runs.
                    let due = self.table.borrow_ref_mut(cs).scan(next);
                    let Some((index, callback)) = due else {
                        break;
                    };
                    callback();
                    next = index + 1;
                }
            }),
        }
    }

    // -----------------------------------------------------------------------
    // Busy-waits
    // -----------------------------------------------------------------------

    /// Block for `duration` units, measured on the tick counter.
    ///
    /// The duration is converted to ticks like a `start` timeout, so any
    /// non-zero duration waits at least one tick. The wait ends on the
    /// `ticks`-th tick boundary after the call, which puts the elapsed time
    /// in `(ticks - 1, ticks]` tick periods.
    ///
    /// Must not be called from a callback or with interrupts masked, since
    /// the counter would never advance. Before a timer is attached this
    /// falls back to [`Scheduler::delay_calibrated`].
    pub fn delay(&self, duration: u32) {
        if !self.is_attached() {
            self.delay_calibrated(duration);
            return;
        }
        if duration == 0 {
            return;
        }

        let ticks = u64::from(self.config.unit.to_ticks(duration).max(1));
        let start = self.now();
        while self.now().wrapping_sub(start) < ticks {
            core::hint::spin_loop();
        }
    }

    /// Approximate busy-wait of `duration` units that ignores the tick
    /// counter.
    ///
    /// Each unit spins for 70 % of its length, reduced by a tenth for every
    /// task slot to make room for the tick handler. Only usable for coarse
    /// pacing with a handful of slots; at ten or more it does not wait at
    /// all.
    pub fn delay_calibrated(&self, duration: u32) {
        let cycles = calibrated_spin_cycles(self.config.unit, N, self.config.clock_hz);
        if cycles == 0 {
            return;
        }
        for _ in 0..duration {
            arch::spin_cycles(cycles);
        }
    }
}
