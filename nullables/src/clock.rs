//! Caller-driven time for lifecycle tests.

use std::cell::Cell;
use tessera_types::Timestamp;

/// A monotone clock that moves only when a test moves it.
///
/// Governor operations take `now` explicitly; tests thread `clock.now()` through
/// them and step over voting delays and periods with [`NullClock::advance`].
pub struct NullClock {
    now: Cell<Timestamp>,
}

impl NullClock {
    pub fn starting_at(now: Timestamp) -> Self {
        Self {
            now: Cell::new(now),
        }
    }

    pub fn now(&self) -> Timestamp {
        self.now.get()
    }

    /// Step forward `secs` and return the new time.
    pub fn advance(&self, secs: u64) -> Timestamp {
        let next = self.now.get().plus_secs(secs);
        self.now.set(next);
        next
    }

    /// Move to `target` unless that would go backwards.
    pub fn advance_to(&self, target: Timestamp) -> Timestamp {
        if target > self.now.get() {
            self.now.set(target);
        }
        self.now.get()
    }
}

impl Default for NullClock {
    fn default() -> Self {
        Self::starting_at(Timestamp::new(1_000_000))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn advance_is_cumulative() {
        let clock = NullClock::starting_at(Timestamp::new(10));
        assert_eq!(clock.advance(5), Timestamp::new(15));
        clock.advance(5);
        assert_eq!(clock.now(), Timestamp::new(20));
    }

    #[test]
    fn never_goes_backwards() {
        let clock = NullClock::default();
        assert_eq!(clock.advance_to(Timestamp::new(5)), Timestamp::new(1_000_000));
        assert_eq!(clock.advance_to(Timestamp::new(1_000_010)), Timestamp::new(1_000_010));
    }
}
