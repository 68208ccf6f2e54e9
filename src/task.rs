//! # Task Slot
//!
//! Defines the per-task state kept in the task table. A slot is addressed
//! by its index, which doubles as the caller-visible [`TaskId`].
//!
//! ## State machine
//!
//! ```text
//!              create()              start()
//!   ┌────────┐ ───────► ┌─────────┐ ───────► ┌─────────┐
//!   │ Unused │          │ Stopped │          │ Running │
//!   └────────┘ ◄─────── └─────────┘ ◄─────── └─────────┘
//!       ▲       delete()             stop()        │
//!       └──────────────────────────────────────────┘
//!                        delete()
//! ```

/// A periodic task body.
///
/// Callbacks are borrowed for `'static`, so they are allocated once by the
/// caller (usually a plain `fn` or a closure in a `static`) and the tick
/// handler never allocates to invoke one.
pub type Callback = &'static (dyn Fn() + Sync);

/// Handle to an allocated task slot; the slot's index in the table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TaskId(usize);

impl TaskId {
    pub(crate) const fn new(index: usize) -> Self {
        Self(index)
    }

    /// Index of the slot in the task table.
    #[inline]
    pub const fn index(self) -> usize {
        self.0
    }
}

/// Lifecycle state of a task slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TaskState {
    /// Free slot, available to `create`.
    Unused,
    /// Allocated with a callback but not counting down.
    Stopped,
    /// Counting down; the callback fires each time the countdown expires.
    Running,
}

/// When `start` first invokes the callback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum StartMode {
    /// First invocation when the countdown first reaches zero.
    #[default]
    Timedout,
    /// Invoke once synchronously from `start`, in addition to the
    /// countdown-driven invocations.
    AtOnce,
}

/// One entry of the task table.
///
/// `callback` is `Some` exactly when `state` is `Stopped` or `Running`, and
/// `period` is non-zero whenever `state` is `Running`.
#[derive(Clone, Copy)]
pub struct TaskSlot {
    id: Option<TaskId>,
    state: TaskState,
    period: u32,
    remaining: u32,
    callback: Option<Callback>,
}

impl TaskSlot {
    /// A free slot. Used to initialize the table.
    pub const EMPTY: Self = Self {
        id: None,
        state: TaskState::Unused,
        period: 0,
        remaining: 0,
        callback: None,
    };

    pub fn id(&self) -> Option<TaskId> {
        self.id
    }

    pub fn state(&self) -> TaskState {
        self.state
    }

    /// Configured period in ticks; zero unless running.
    pub fn period(&self) -> u32 {
        self.period
    }

    /// Ticks left before the next countdown-driven invocation.
    pub fn remaining(&self) -> u32 {
        self.remaining
    }

    #[inline]
    pub fn is_allocated(&self) -> bool {
        self.state != TaskState::Unused
    }

    /// Claim a free slot for `callback`. The slot starts `Stopped`.
    pub(crate) fn allocate(&mut self, id: TaskId, callback: Callback) {
        self.id = Some(id);
        self.state = TaskState::Stopped;
        self.period = 0;
        self.remaining = 0;
        self.callback = Some(callback);
    }

    /// Start counting down from `period` ticks, replacing any countdown in
    /// progress. Returns the callback for an immediate invocation, or `None`
    /// without touching a free slot.
    pub(crate) fn arm(&mut self, period: u32) -> Option<Callback> {
        debug_assert!(period > 0);
        let callback = self.callback?;
        self.state = TaskState::Running;
        self.period = period;
        self.remaining = period;
        Some(callback)
    }

    /// Stop counting down. The callback is retained.
    pub(crate) fn halt(&mut self) {
        self.state = TaskState::Stopped;
        self.period = 0;
        self.remaining = 0;
    }

    /// Return the slot to the free pool.
    pub(crate) fn release(&mut self) {
        *self = Self::EMPTY;
    }

    /// Advance the countdown by one tick.
    ///
    /// Returns the callback when the countdown expires; the countdown is
    /// re-armed to the full period before returning.
    pub(crate) fn countdown(&mut self) -> Option<Callback> {
        if self.state != TaskState::Running {
            return None;
        }
        self.remaining = self.remaining.saturating_sub(1);
        if self.remaining == 0 {
            self.remaining = self.period;
            self.callback
        } else {
            None
        }
    }
}

impl core::fmt::Debug for TaskSlot {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("TaskSlot")
            .field("id", &self.id)
            .field("state", &self.state)
            .field("period", &self.period)
            .field("remaining", &self.remaining)
            .field("callback", &self.callback.is_some())
            .finish()
    }
}

// ---------------------------------------------------------------------------
// Unit tests (host-only)
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn noop() {}

    #[test]
    fn test_slot_lifecycle() {
        let mut slot = TaskSlot::EMPTY;
        assert!(!slot.is_allocated());
        assert_eq!(slot.id(), None);
        assert_eq!(slot.state(), TaskState::Unused);

        slot.allocate(TaskId::new(3), &noop);
        assert!(slot.is_allocated());
        assert_eq!(slot.id(), Some(TaskId::new(3)));
        assert_eq!(slot.state(), TaskState::Stopped);
        assert_eq!(slot.period(), 0);

        assert!(slot.arm(7).is_some());
        assert_eq!(slot.state(), TaskState::Running);
        assert_eq!(slot.period(), 7);
        assert_eq!(slot.remaining(), 7);

        slot.halt();
        assert_eq!(slot.state(), TaskState::Stopped);
        assert_eq!(slot.period(), 0);
        assert_eq!(slot.remaining(), 0);
        assert!(slot.callback.is_some());

        slot.release();
        assert_eq!(slot.state(), TaskState::Unused);
        assert_eq!(slot.id(), None);
        assert!(slot.callback.is_none());
    }

    #[test]
    fn test_arm_leaves_free_slot_untouched() {
        let mut slot = TaskSlot::EMPTY;
        assert!(slot.arm(5).is_none());
        assert_eq!(slot.state(), TaskState::Unused);
        assert_eq!(slot.period(), 0);
        assert_eq!(slot.remaining(), 0);

        slot.allocate(TaskId::new(0), &noop);
        slot.release();
        assert!(slot.arm(5).is_none());
        assert_eq!(slot.state(), TaskState::Unused);
    }

    #[test]
    fn test_countdown_rearms() {
        let mut slot = TaskSlot::EMPTY;
        slot.allocate(TaskId::new(0), &noop);
        slot.arm(3);

        assert!(slot.countdown().is_none());
        assert_eq!(slot.remaining(), 2);
        assert!(slot.countdown().is_none());
        assert!(slot.countdown().is_some());
        assert_eq!(slot.remaining(), 3);
        assert!(slot.countdown().is_none());
    }

    #[test]
    fn test_countdown_ignores_idle_slots() {
        let mut slot = TaskSlot::EMPTY;
        assert!(slot.countdown().is_none());

        slot.allocate(TaskId::new(0), &noop);
        for _ in 0..10 {
            assert!(slot.countdown().is_none());
        }
        assert_eq!(slot.remaining(), 0);
    }

    #[test]
    fn test_rearm_resets_countdown() {
        let mut slot = TaskSlot::EMPTY;
        slot.allocate(TaskId::new(1), &noop);
        slot.arm(5);
        slot.countdown();
        slot.countdown();
        assert_eq!(slot.remaining(), 3);

        slot.arm(4);
        assert_eq!(slot.period(), 4);
        assert_eq!(slot.remaining(), 4);
    }

    #[test]
    fn test_start_mode_default() {
        assert_eq!(StartMode::default(), StartMode::Timedout);
    }
}
