//! # Tickmux — periodic callbacks on one timer interrupt
//!
//! A cooperative, interrupt-driven task scheduler for ARM Cortex-M
//! microcontrollers. Several independent periodic callbacks ("tasks") share
//! a single hardware tick interrupt through a fixed-size task table. There
//! is no operating system, no preemption between tasks and no priorities:
//! callbacks run to completion from the tick interrupt, in slot order.
//!
//! ## Architecture
//!
//! ```text
//! ┌────────────────────────────────────────────────────────┐
//! │                  Application callbacks                  │
//! ├────────────────────────────────────────────────────────┤
//! │             Scheduler API (scheduler.rs)                │
//! │   attach() · create() · start() · stop() · delete()     │
//! │   on_tick() · delay() · delay_calibrated()              │
//! ├──────────────┬────────────────────┬───────────────────┤
//! │  Task Table  │   Tick Timer       │  Sync Primitives  │
//! │  table.rs    │   timer.rs         │  sync.rs          │
//! │  ─ create()  │   ─ TickTimer      │  ─ critical_section│
//! │  ─ scan()    │   ─ reload_for()   │                   │
//! ├──────────────┴────────────────────┴───────────────────┤
//! │         Task Slot (task.rs) · Config (config.rs)        │
//! │      TaskId · TaskState · StartMode · TimeUnit          │
//! ├────────────────────────────────────────────────────────┤
//! │            Arch Port (arch/cortex_m4.rs)                │
//! │                 SysTick as TickTimer                    │
//! └────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Timing Model
//!
//! Timeouts are given in the configured [`config::TimeUnit`] and converted to
//! ticks with the coefficient `k` (1 for milliseconds, 5/197 for
//! microseconds). A running task fires every `period` ticks and re-arms
//! itself; a task can fire at most once per tick, however late the tick
//! handler runs.
//!
//! ## Memory Model
//!
//! - **No heap**: the task table is a `[TaskSlot; N]` inside the scheduler
//! - **No `alloc`**: pure `core`, callbacks are `&'static` references
//! - **Index handles**: callers only ever hold a [`TaskId`]
//! - **Critical sections**: `critical_section::with()` guards the table

#![cfg_attr(not(test), no_std)]

mod log;

pub mod arch;
pub mod config;
pub mod error;
pub mod scheduler;
pub mod sync;
pub mod table;
pub mod task;
pub mod timer;

pub use config::{CallbackPolicy, Config, TimeUnit};
pub use error::{Error, Result};
pub use scheduler::Scheduler;
pub use task::{Callback, StartMode, TaskId, TaskState};
pub use timer::TickTimer;
