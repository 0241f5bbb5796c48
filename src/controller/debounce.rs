use std::time::{Duration, Instant};

/// Default idle delay before a search term is applied.
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(500);

/// A value that follows its input only after the input has been idle for
/// `delay`.
///
/// Time is passed in by the caller, so the owner decides what "now" is (an
/// event loop tick, a test clock).
#[derive(Clone, Debug)]
pub struct Debounced<T> {
    raw: T,
    settled: T,
    changed_at: Option<Instant>,
    delay: Duration,
}

impl<T: Clone + PartialEq> Debounced<T> {
    pub fn new(initial: T, delay: Duration) -> Self {
        Self {
            raw: initial.clone(),
            settled: initial,
            changed_at: None,
            delay,
        }
    }

    /// Latest input, for echoing back into the text box.
    pub fn raw(&self) -> &T {
        &self.raw
    }

    /// Value downstream consumers should act on.
    pub fn settled(&self) -> &T {
        &self.settled
    }

    pub fn is_pending(&self) -> bool {
        self.changed_at.is_some()
    }

    /// Records new input; every call restarts the idle timer.
    pub fn set(&mut self, value: T, now: Instant) {
        self.raw = value;
        self.changed_at = Some(now);
    }

    /// Applies the pending input once the delay has elapsed.
    ///
    /// Returns `true` only when the settled value actually changed.
    pub fn poll(&mut self, now: Instant) -> bool {
        let Some(changed_at) = self.changed_at else {
            return false;
        };
        if now.saturating_duration_since(changed_at) < self.delay {
            return false;
        }
        self.changed_at = None;
        if self.settled == self.raw {
            return false;
        }
        self.settled = self.raw.clone();
        true
    }

    /// Applies the pending input immediately.
    pub fn flush(&mut self) -> bool {
        self.changed_at = None;
        if self.settled == self.raw {
            return false;
        }
        self.settled = self.raw.clone();
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn burst_of_input_settles_once_on_last_value() {
        let start = Instant::now();
        let mut search = Debounced::new(String::new(), DEFAULT_DEBOUNCE);
        let mut settled = 0;

        for (offset, text) in [(0, "l"), (120, "la"), (240, "lah"), (360, "laho"), (480, "lahore")] {
            let now = start + Duration::from_millis(offset);
            search.set(text.to_string(), now);
            if search.poll(now) {
                settled += 1;
            }
        }
        assert_eq!(settled, 0);
        assert_eq!(search.raw(), "lahore");
        assert_eq!(search.settled(), "");

        assert!(!search.poll(start + Duration::from_millis(900)));
        assert!(search.poll(start + Duration::from_millis(980)));
        assert_eq!(search.settled(), "lahore");
        assert!(!search.poll(start + Duration::from_millis(2000)));
    }

    #[test]
    fn returning_to_settled_value_is_not_a_change() {
        let start = Instant::now();
        let mut search = Debounced::new("a".to_string(), DEFAULT_DEBOUNCE);

        search.set("ab".to_string(), start);
        search.set("a".to_string(), start + Duration::from_millis(100));

        assert!(!search.poll(start + Duration::from_secs(1)));
        assert!(!search.is_pending());
    }

    #[test]
    fn flush_skips_the_delay() {
        let mut search = Debounced::new(String::new(), DEFAULT_DEBOUNCE);
        search.set("zikr".to_string(), Instant::now());

        assert!(search.flush());
        assert_eq!(search.settled(), "zikr");
    }
}
