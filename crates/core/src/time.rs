use chrono::{DateTime, Duration, Utc};

/// Wall-clock source for the interview tracker.
///
/// Services read time only through a `Clock` so tests can pin the instant.
#[derive(Debug, Clone, Copy, Default)]
pub enum Clock {
    #[default]
    Default,
    Fixed(DateTime<Utc>),
}

impl Clock {
    /// Returns a clock that uses the current system time.
    #[must_use]
    pub fn default_clock() -> Self {
        Self::Default
    }

    /// Returns a clock fixed at the given timestamp.
    #[must_use]
    pub fn fixed(at: DateTime<Utc>) -> Self {
        Self::Fixed(at)
    }

    /// Returns the current time according to the clock.
    #[must_use]
    pub fn now(&self) -> DateTime<Utc> {
        match self {
            Clock::Default => Utc::now(),
            Clock::Fixed(t) => *t,
        }
    }

    /// If this is a fixed clock, advance it by the given duration.
    ///
    /// Has no effect on `Clock::Default`.
    pub fn advance(&mut self, delta: Duration) {
        if let Clock::Fixed(t) = self {
            *t += delta;
        }
    }

    /// Convenience for `advance(Duration::minutes(minutes))`.
    pub fn advance_minutes(&mut self, minutes: i64) {
        self.advance(Duration::minutes(minutes));
    }
}

/// Whole minutes elapsed from `start` to `now`, floored.
///
/// A `now` earlier than `start` (clock stepped backwards) counts as zero.
#[must_use]
pub fn whole_minutes_between(start: DateTime<Utc>, now: DateTime<Utc>) -> u32 {
    let minutes = now.signed_duration_since(start).num_minutes().max(0);
    u32::try_from(minutes).unwrap_or(u32::MAX)
}

/// Deterministic timestamp for tests and examples (2023-11-14T22:13:20Z).
pub const FIXED_TEST_TIMESTAMP: i64 = 1_700_000_000;

/// Returns a deterministic `DateTime<Utc>` for tests and doc examples.
///
/// # Panics
///
/// Panics if the fixed timestamp cannot be represented.
#[must_use]
pub fn fixed_now() -> DateTime<Utc> {
    DateTime::<Utc>::from_timestamp(FIXED_TEST_TIMESTAMP, 0)
        .expect("fixed timestamp should be valid")
}

/// Returns a `Clock` fixed at the deterministic test timestamp.
#[must_use]
pub fn fixed_clock() -> Clock {
    Clock::fixed(fixed_now())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixed_clock_advances_and_default_does_not_panic() {
        let mut clock = fixed_clock();
        clock.advance_minutes(5);
        assert_eq!(clock.now(), fixed_now() + Duration::minutes(5));
        clock.advance(Duration::seconds(30));
        assert_eq!(clock.now(), fixed_now() + Duration::seconds(330));

        let mut real = Clock::default_clock();
        real.advance_minutes(5);
        assert!(matches!(real, Clock::Default));
    }

    #[test]
    fn whole_minutes_floor_partial_minutes() {
        let start = fixed_now();
        assert_eq!(whole_minutes_between(start, start), 0);
        assert_eq!(whole_minutes_between(start, start + Duration::seconds(59)), 0);
        assert_eq!(whole_minutes_between(start, start + Duration::seconds(60)), 1);
        assert_eq!(whole_minutes_between(start, start + Duration::seconds(14 * 60 + 59)), 14);
    }

    #[test]
    fn whole_minutes_clamps_backwards_clock() {
        let start = fixed_now();
        assert_eq!(whole_minutes_between(start, start - Duration::minutes(3)), 0);
    }
}
