//! Delayed-trigger helper for key-driven reloads.

use std::time::{Duration, Instant};

/// A cancel-and-reschedule delay timer.
///
/// Each [`trigger`](Self::trigger) replaces any pending deadline, so a
/// burst of triggers produces a single firing one delay after the last
/// of them.
#[derive(Debug)]
pub struct Debouncer {
    /// Delay applied after each trigger.
    delay: Duration,
    /// Pending deadline, if armed.
    deadline: Option<Instant>,
}

impl Debouncer {
    /// Creates a disarmed debouncer with the given delay.
    #[must_use]
    pub const fn new(delay: Duration) -> Self {
        Self {
            delay,
            deadline: None,
        }
    }

    /// Arms (or re-arms) the timer to fire at `now + delay`.
    pub fn trigger(&mut self, now: Instant) {
        self.deadline = now.checked_add(self.delay);
    }

    /// Returns `true` once the deadline has passed, disarming the timer.
    pub fn poll(&mut self, now: Instant) -> bool {
        match self.deadline {
            Some(deadline) if now >= deadline => {
                self.deadline = None;
                true
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::arithmetic_side_effects)]

    use super::*;

    #[test]
    fn test_disarmed_never_fires() {
        // Arrange
        let mut debouncer = Debouncer::new(Duration::from_millis(300));
        let now = Instant::now();

        // Act & Assert
        assert!(!debouncer.poll(now));
        assert!(!debouncer.poll(now + Duration::from_secs(10)));
    }

    #[test]
    fn test_fires_once_after_delay() {
        // Arrange
        let mut debouncer = Debouncer::new(Duration::from_millis(300));
        let start = Instant::now();
        debouncer.trigger(start);

        // Act & Assert
        assert!(!debouncer.poll(start + Duration::from_millis(299)));
        assert!(debouncer.poll(start + Duration::from_millis(300)));
        assert!(!debouncer.poll(start + Duration::from_millis(301)));
    }

    #[test]
    fn test_retrigger_replaces_deadline() {
        // Arrange
        let mut debouncer = Debouncer::new(Duration::from_millis(300));
        let start = Instant::now();
        debouncer.trigger(start);
        debouncer.trigger(start + Duration::from_millis(200));

        // Act & Assert: the first deadline no longer fires
        assert!(!debouncer.poll(start + Duration::from_millis(350)));
        assert!(debouncer.poll(start + Duration::from_millis(500)));
    }

    #[test]
    fn test_can_be_rearmed_after_firing() {
        // Arrange
        let mut debouncer = Debouncer::new(Duration::from_millis(100));
        let start = Instant::now();
        debouncer.trigger(start);
        assert!(debouncer.poll(start + Duration::from_millis(100)));

        // Act
        debouncer.trigger(start + Duration::from_millis(200));

        // Assert
        assert!(!debouncer.poll(start + Duration::from_millis(250)));
        assert!(debouncer.poll(start + Duration::from_millis(300)));
    }
}
