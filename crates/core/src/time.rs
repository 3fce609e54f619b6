use chrono::{DateTime, Duration, Local, Utc};
use serde::{Deserialize, Serialize};

use crate::week::{self, WeekBoundary};

/// A simple clock abstraction for deterministic time in services and tests.
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
}

/// Time zone in which week boundaries are computed.
///
/// Boundaries are always handed out as UTC instants; the zone only decides
/// where "Monday midnight" falls.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WeekZone {
    /// The host's local time.
    #[default]
    Local,
    Utc,
}

impl WeekZone {
    /// Boundary of the week containing `at`.
    #[must_use]
    pub fn boundaries_at(self, at: DateTime<Utc>) -> WeekBoundary {
        match self {
            WeekZone::Local => week::week_boundaries(&at.with_timezone(&Local)),
            WeekZone::Utc => week::week_boundaries(&at),
        }
    }

    /// The `n` weeks ending with the one containing `now`, oldest first.
    #[must_use]
    pub fn last_n_weeks(self, n: u32, now: DateTime<Utc>) -> Vec<WeekBoundary> {
        match self {
            WeekZone::Local => week::last_n_weeks(n, &now.with_timezone(&Local)),
            WeekZone::Utc => week::last_n_weeks(n, &now),
        }
    }
}

/// Deterministic timestamp for tests and examples (2023-11-14T22:13:20Z, a Tuesday).
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
