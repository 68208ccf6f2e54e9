//! # Task Table
//!
//! Fixed-capacity slot array plus the tick counter. The table is plain
//! data: it knows nothing about interrupts, and [`crate::scheduler`]
//! decides which critical section each call runs in.
//!
//! ## Tick scan
//!
//! A tick is processed as [`TaskTable::advance`] followed by repeated
//! [`TaskTable::scan`] calls, each resuming after the slot that last fired:
//!
//! ```text
//! advance()                 ticks += 1
//! scan(0)   ─► slot 0..k    decrement, stop at first expiry k ─► Some(k, cb)
//!   cb()                    (caller invokes outside the table borrow)
//! scan(k+1) ─► slot k+1..N  ...                               ─► None
//! ```
//!
//! Slots are therefore evaluated in index order, and coincident
//! expirations fire lowest index first.

use crate::error::{Error, Result};
use crate::task::{Callback, TaskId, TaskSlot, TaskState};

pub struct TaskTable<const N: usize> {
    slots: [TaskSlot; N],
    /// Monotonic tick counter.
    ticks: u64,
}

impl<const N: usize> TaskTable<N> {
    pub const fn new() -> Self {
        Self {
            slots: [TaskSlot::EMPTY; N],
            ticks: 0,
        }
    }

    #[inline]
    pub const fn capacity(&self) -> usize {
        N
    }

    /// Number of allocated slots.
    pub fn len(&self) -> usize {
        self.slots.iter().filter(|slot| slot.is_allocated()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    #[inline]
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Slot at `id`, allocated or not.
    pub fn slot(&self, id: TaskId) -> Result<&TaskSlot> {
        self.slots.get(id.index()).ok_or(Error::InvalidId)
    }

    fn allocated_mut(&mut self, id: TaskId) -> Result<&mut TaskSlot> {
        let slot = self.slots.get_mut(id.index()).ok_or(Error::InvalidId)?;
        if slot.is_allocated() {
            Ok(slot)
        } else {
            Err(Error::NotAllocated)
        }
    }

    /// Allocate the first free slot for `callback`.
    pub fn create(&mut self, callback: Callback) -> Result<TaskId> {
        let index = self
            .slots
            .iter()
            .position(|slot| slot.state() == TaskState::Unused)
            .ok_or(Error::TableFull)?;
        let id = TaskId::new(index);
        self.slots[index].allocate(id, callback);
        Ok(id)
    }

    /// Arm `id` with a period of `ticks` (at least one tick).
    ///
    /// A running task is restarted from a full period. Returns the
    /// callback so the caller can invoke it outside the critical section.
    pub fn start(&mut self, id: TaskId, ticks: u32) -> Result<Callback> {
        let slot = self.slots.get_mut(id.index()).ok_or(Error::InvalidId)?;
        slot.arm(ticks.max(1)).ok_or(Error::NotAllocated)
    }

    pub fn stop(&mut self, id: TaskId) -> Result<()> {
        self.allocated_mut(id)?.halt();
        Ok(())
    }

    pub fn delete(&mut self, id: TaskId) -> Result<()> {
        self.allocated_mut(id)?.release();
        Ok(())
    }

    /// Count one hardware tick.
    #[inline]
    pub fn advance(&mut self) {
        self.ticks = self.ticks.wrapping_add(1);
    }

    /// Decrement running countdowns from slot `from` onward, stopping at the
    /// first one that expires.
    ///
    /// Returns the expired slot's index and callback, or `None` once the
    /// end of the table is reached.
    pub fn scan(&mut self, from: usize) -> Option<(usize, Callback)> {
        let start = from.min(N);
        self.slots[start..]
            .iter_mut()
            .enumerate()
            .find_map(|(offset, slot)| slot.countdown().map(|cb| (start + offset, cb)))
    }
}

impl<const N: usize> Default for TaskTable<N> {
    fn default() -> Self {
        Self::new()
    }
}
