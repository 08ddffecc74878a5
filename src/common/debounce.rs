use std::time::{Duration, Instant};

/// A single pending deadline carrying a value.
///
/// Nothing fires on its own: the frame loop calls [`Debounce::poll`] with the
/// current time and receives the value once the deadline has passed. At most
/// one value is pending at any time.
#[derive(Debug, Clone)]
pub struct Debounce<T> {
    delay: Duration,
    pending: Option<(Instant, T)>,
}

impl<T> Debounce<T> {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            pending: None,
        }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Change the delay. An already pending deadline keeps its old due time.
    pub fn set_delay(&mut self, delay: Duration) {
        self.delay = delay;
    }

    /// Schedule `value`, replacing whatever was pending.
    pub fn schedule(&mut self, value: T, now: Instant) {
        self.pending = Some((now + self.delay, value));
    }

    /// Push the deadline back while keeping the pending value. When nothing
    /// is pending, `init` produces the value to schedule.
    pub fn extend_or_insert_with(&mut self, now: Instant, init: impl FnOnce() -> T) {
        let due = now + self.delay;
        match &mut self.pending {
            Some((deadline, _)) => *deadline = due,
            None => self.pending = Some((due, init())),
        }
    }

    pub fn cancel(&mut self) -> Option<T> {
        self.pending.take().map(|(_, value)| value)
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    pub fn pending(&self) -> Option<&T> {
        self.pending.as_ref().map(|(_, value)| value)
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.pending.as_ref().map(|(deadline, _)| *deadline)
    }

    /// Time left until the deadline, `Duration::ZERO` once it is due.
    pub fn remaining(&self, now: Instant) -> Option<Duration> {
        self.deadline()
            .map(|deadline| deadline.saturating_duration_since(now))
    }

    /// Take the pending value if its deadline has passed.
    pub fn poll(&mut self, now: Instant) -> Option<T> {
        match &self.pending {
            Some((deadline, _)) if *deadline <= now => self.cancel(),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::Debounce;
    use std::time::{Duration, Instant};

    #[test]
    fn fires_only_after_delay() {
        let start = Instant::now();
        let mut timer = Debounce::new(Duration::from_millis(100));
        timer.schedule("a", start);
        assert_eq!(timer.poll(start + Duration::from_millis(99)), None);
        assert_eq!(timer.poll(start + Duration::from_millis(100)), Some("a"));
        assert!(!timer.is_pending());
    }

    #[test]
    fn extend_keeps_first_value_and_moves_deadline() {
        let start = Instant::now();
        let mut timer = Debounce::new(Duration::from_millis(100));
        timer.extend_or_insert_with(start, || 1);
        timer.extend_or_insert_with(start + Duration::from_millis(80), || 2);
        assert_eq!(timer.poll(start + Duration::from_millis(120)), None);
        assert_eq!(timer.poll(start + Duration::from_millis(180)), Some(1));
    }

    #[test]
    fn cancel_drops_pending_value() {
        let start = Instant::now();
        let mut timer = Debounce::new(Duration::from_millis(10));
        timer.schedule((), start);
        assert_eq!(timer.cancel(), Some(()));
        assert_eq!(timer.poll(start + Duration::from_secs(1)), None);
        assert_eq!(timer.remaining(start), None);
    }
}
