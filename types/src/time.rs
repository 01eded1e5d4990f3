//! Caller-supplied time: instants and half-open windows.
//!
//! Nothing in the workspace reads the system clock. Every lifecycle operation
//! receives `now` from its caller, which keeps replays and tests deterministic.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Seconds since the Unix epoch (UTC).
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Timestamp(u64);

impl Timestamp {
    pub fn new(secs: u64) -> Self {
        Self(secs)
    }

    pub fn as_secs(&self) -> u64 {
        self.0
    }

    /// Shift forward, saturating at `u64::MAX`.
    pub fn plus_secs(&self, secs: u64) -> Self {
        Self(self.0.saturating_add(secs))
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "t={}", self.0)
    }
}

/// Where an instant falls relative to a [`Window`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WindowPosition {
    Before,
    Inside,
    After,
}

/// The half-open interval `[start, end)`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Window {
    pub start: Timestamp,
    pub end: Timestamp,
}

impl Window {
    /// A window opening `delay` seconds after `now` and lasting `length` seconds.
    pub fn after(now: Timestamp, delay: u64, length: u64) -> Self {
        let start = now.plus_secs(delay);
        Self {
            start,
            end: start.plus_secs(length),
        }
    }

    pub fn position(&self, now: Timestamp) -> WindowPosition {
        if now < self.start {
            WindowPosition::Before
        } else if now < self.end {
            WindowPosition::Inside
        } else {
            WindowPosition::After
        }
    }

    pub fn contains(&self, now: Timestamp) -> bool {
        self.position(now) == WindowPosition::Inside
    }
}

impl fmt::Display for Window {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {})", self.start.0, self.end.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn window_is_half_open() {
        let w = Window::after(Timestamp::new(100), 10, 50);
        assert_eq!(w.start, Timestamp::new(110));
        assert_eq!(w.end, Timestamp::new(160));
        assert_eq!(w.position(Timestamp::new(109)), WindowPosition::Before);
        assert!(w.contains(Timestamp::new(110)));
        assert!(w.contains(Timestamp::new(159)));
        assert_eq!(w.position(Timestamp::new(160)), WindowPosition::After);
    }

    #[test]
    fn empty_window_contains_nothing() {
        let w = Window::after(Timestamp::new(5), 0, 0);
        assert!(!w.contains(Timestamp::new(5)));
        assert_eq!(w.position(Timestamp::new(5)), WindowPosition::After);
    }

    #[test]
    fn saturates_at_the_end_of_time() {
        let w = Window::after(Timestamp::new(u64::MAX - 1), 5, 5);
        assert_eq!(w.start, Timestamp::new(u64::MAX));
        assert_eq!(w.end, Timestamp::new(u64::MAX));
    }
}
