//! Monday-start week arithmetic.
//!
//! Weeks run from Monday 00:00:00.000 to Sunday 23:59:59.999 in the zone of
//! the reference date. A Sunday belongs to the week that started the Monday
//! before it. Boundaries are handed out as UTC instants so they can be used
//! directly as storage keys.

use chrono::{DateTime, Datelike, Duration, LocalResult, NaiveDate, NaiveDateTime, NaiveTime};
use chrono::{TimeZone, Utc};
use serde::{Deserialize, Serialize};

/// Start and end instants of one Monday-to-Sunday week.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeekBoundary {
    week_start: DateTime<Utc>,
    week_end: DateTime<Utc>,
}

impl WeekBoundary {
    /// Rebuild a boundary from persisted instants.
    #[must_use]
    pub fn from_parts(week_start: DateTime<Utc>, week_end: DateTime<Utc>) -> Self {
        Self {
            week_start,
            week_end,
        }
    }

    #[must_use]
    pub fn start(&self) -> DateTime<Utc> {
        self.week_start
    }

    #[must_use]
    pub fn end(&self) -> DateTime<Utc> {
        self.week_end
    }

    /// True when `at` falls inside the week, both ends inclusive.
    #[must_use]
    pub fn contains(&self, at: DateTime<Utc>) -> bool {
        self.week_start <= at && at <= self.week_end
    }
}

/// Returns the week containing `at`, computed in `at`'s own time zone.
#[must_use]
pub fn week_boundaries<Tz: TimeZone>(at: &DateTime<Tz>) -> WeekBoundary {
    let tz = at.timezone();
    boundary_for_monday(&tz, monday_of(at.date_naive()))
}

/// Returns `n` consecutive weeks, oldest first, the last one containing `now`.
///
/// Week `i` (counting back from zero) is the week of `now` minus `7 * i`
/// calendar days, so the result has no gaps or overlaps.
#[must_use]
pub fn last_n_weeks<Tz: TimeZone>(n: u32, now: &DateTime<Tz>) -> Vec<WeekBoundary> {
    let tz = now.timezone();
    let today = now.date_naive();
    (0..n)
        .rev()
        .map(|i| {
            let date = today - Duration::days(7 * i64::from(i));
            boundary_for_monday(&tz, monday_of(date))
        })
        .collect()
}

fn monday_of(date: NaiveDate) -> NaiveDate {
    // Sunday is 6 days past Monday, so it maps back into the preceding week.
    date - Duration::days(i64::from(date.weekday().num_days_from_monday()))
}

fn boundary_for_monday<Tz: TimeZone>(tz: &Tz, monday: NaiveDate) -> WeekBoundary {
    let start = monday.and_time(NaiveTime::MIN);
    let end = (monday + Duration::days(7)).and_time(NaiveTime::MIN) - Duration::milliseconds(1);
    WeekBoundary {
        week_start: resolve_local(tz, start, false),
        week_end: resolve_local(tz, end, true),
    }
}

/// Map a wall-clock time to an instant.
///
/// Ambiguous times pick the earliest (or latest) instant. A time inside a DST
/// gap is moved one hour forward, past the gap.
fn resolve_local<Tz: TimeZone>(tz: &Tz, naive: NaiveDateTime, prefer_latest: bool) -> DateTime<Utc> {
    match tz.from_local_datetime(&naive) {
        LocalResult::Single(dt) => dt.with_timezone(&Utc),
        LocalResult::Ambiguous(earliest, latest) => {
            if prefer_latest {
                latest.with_timezone(&Utc)
            } else {
                earliest.with_timezone(&Utc)
            }
        }
        LocalResult::None => tz
            .from_local_datetime(&(naive + Duration::hours(1)))
            .earliest()
            .map_or_else(|| naive.and_utc(), |dt| dt.with_timezone(&Utc)),
    }
}
