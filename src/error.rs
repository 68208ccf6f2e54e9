//! # Errors
//!
//! Every fallible scheduler operation reports one of these. Nothing is
//! retried internally: the caller decides how to recover.

use core::fmt;

/// Result type for scheduler operations.
pub type Result<T> = core::result::Result<T, Error>;

/// Scheduler-level errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error {
    /// Every slot of the task table is allocated.
    TableFull,
    /// The task id lies outside `[0, capacity)`.
    InvalidId,
    /// The task id refers to a free slot.
    NotAllocated,
    /// A tick timer has already been attached to this scheduler.
    TimerAttached,
    /// The configured tick period cannot be programmed into the timer.
    ReloadOutOfRange,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::TableFull => write!(f, "task table is full"),
            Error::InvalidId => write!(f, "task id out of range"),
            Error::NotAllocated => write!(f, "task slot is not allocated"),
            Error::TimerAttached => write!(f, "tick timer already attached"),
            Error::ReloadOutOfRange => write!(f, "tick period out of timer range"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        assert_eq!(Error::TableFull.to_string(), "task table is full");
        assert_eq!(Error::NotAllocated.to_string(), "task slot is not allocated");
    }
}
