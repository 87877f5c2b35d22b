#![forbid(unsafe_code)]

//! Leading-edge rate limiting on the host clock.

use std::time::Duration;

/// Admits at most one event per `interval`.
///
/// The first event always passes; later events pass once `interval` has
/// elapsed since the last admitted one.
#[derive(Debug, Clone)]
pub struct Throttle {
    interval: Duration,
    last: Option<Duration>,
}

impl Throttle {
    #[must_use]
    pub const fn new(interval: Duration) -> Self {
        Self {
            interval,
            last: None,
        }
    }

    /// Whether an event at `now` should run.
    pub fn admit(&mut self, now: Duration) -> bool {
        let open = self
            .last
            .is_none_or(|last| now.saturating_sub(last) >= self.interval);
        if open {
            self.last = Some(now);
        }
        open
    }

    #[must_use]
    pub const fn interval(&self) -> Duration {
        self.interval
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn leading_edge_then_interval() {
        let ms = Duration::from_millis;
        let mut throttle = Throttle::new(ms(16));
        assert!(throttle.admit(ms(0)));
        assert!(!throttle.admit(ms(5)));
        assert!(!throttle.admit(ms(15)));
        assert!(throttle.admit(ms(16)));
        assert!(!throttle.admit(ms(20)));
        assert!(throttle.admit(ms(100)));
    }

    #[test]
    fn zero_interval_admits_everything() {
        let mut throttle = Throttle::new(Duration::ZERO);
        assert!(throttle.admit(Duration::ZERO));
        assert!(throttle.admit(Duration::ZERO));
    }
}
