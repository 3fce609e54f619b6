//! Dense weekly history built from sparse stored records.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::model::{GoalId, GoalKind, GoalType, ProgressValue, WeeklyProgress};
use crate::week::WeekBoundary;

/// One week of a goal's history.
#[derive(Debug, Clone, PartialEq)]
pub enum HistoryEntry {
    /// A stored record, passed through untouched.
    Recorded(WeeklyProgress),
    /// Nothing stored for this week; carries the goal kind's default value.
    Missing {
        goal_id: GoalId,
        week: WeekBoundary,
        value: ProgressValue,
    },
}

impl HistoryEntry {
    #[must_use]
    pub fn goal_id(&self) -> GoalId {
        match self {
            HistoryEntry::Recorded(p) => p.goal_id,
            HistoryEntry::Missing { goal_id, .. } => *goal_id,
        }
    }

    #[must_use]
    pub fn week(&self) -> WeekBoundary {
        match self {
            HistoryEntry::Recorded(p) => p.week,
            HistoryEntry::Missing { week, .. } => *week,
        }
    }

    #[must_use]
    pub fn value(&self) -> ProgressValue {
        match self {
            HistoryEntry::Recorded(p) => p.value,
            HistoryEntry::Missing { value, .. } => *value,
        }
    }

    #[must_use]
    pub fn is_recorded(&self) -> bool {
        matches!(self, HistoryEntry::Recorded(_))
    }
}

/// Lay `records` over `weeks`, filling the gaps with defaults for `goal_type`.
///
/// The output has exactly one entry per element of `weeks`, in the same order.
/// Records are matched on their exact week start; records for weeks outside
/// `weeks` are dropped.
#[must_use]
pub fn densify(
    goal_id: GoalId,
    goal_type: GoalType,
    weeks: &[WeekBoundary],
    records: Vec<WeeklyProgress>,
) -> Vec<HistoryEntry> {
    let mut by_start: HashMap<DateTime<Utc>, WeeklyProgress> = records
        .into_iter()
        .map(|record| (record.week.start(), record))
        .collect();

    weeks
        .iter()
        .map(|week| match by_start.remove(&week.start()) {
            Some(record) => HistoryEntry::Recorded(record),
            None => HistoryEntry::Missing {
                goal_id,
                week: *week,
                value: ProgressValue::default_for(goal_type),
            },
        })
        .collect()
}

/// Simple statistics over a dense history.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(
    tag = "type",
    rename_all = "SCREAMING_SNAKE_CASE",
    rename_all_fields = "camelCase"
)]
pub enum HistorySummary {
    Measurable {
        weeks: u32,
        recorded_weeks: u32,
        /// Mean over all weeks, missing weeks counted as zero, one decimal.
        average: f64,
        target: Option<f64>,
        /// Weeks at or above the target; absent when the goal has no target.
        weeks_on_target: Option<u32>,
    },
    YesNo {
        weeks: u32,
        recorded_weeks: u32,
        completed_weeks: u32,
        /// Percentage of weeks completed, rounded to a whole number.
        completion_rate: u32,
    },
}

/// Summarise `entries` according to the goal's current kind.
#[must_use]
pub fn summarize(kind: &GoalKind, entries: &[HistoryEntry]) -> HistorySummary {
    let weeks = count(entries.len());
    let recorded_weeks = count(entries.iter().filter(|e| e.is_recorded()).count());

    match kind {
        GoalKind::Measurable { target, .. } => {
            let values: Vec<f64> = entries
                .iter()
                .map(|e| e.value().value().unwrap_or(0.0))
                .collect();
            let average = if values.is_empty() {
                0.0
            } else {
                #[allow(clippy::cast_precision_loss)]
                let mean = values.iter().sum::<f64>() / values.len() as f64;
                (mean * 10.0).round() / 10.0
            };
            let weeks_on_target =
                target.map(|t| count(values.iter().filter(|v| **v >= t).count()));

            HistorySummary::Measurable {
                weeks,
                recorded_weeks,
                average,
                target: *target,
                weeks_on_target,
            }
        }
        GoalKind::YesNo => {
            let completed_weeks = count(
                entries
                    .iter()
                    .filter(|e| e.value().completed() == Some(true))
                    .count(),
            );
            let completion_rate = if weeks == 0 {
                0
            } else {
                // Bounded by 100, so the cast cannot truncate.
                #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
                let rate = (f64::from(completed_weeks) * 100.0 / f64::from(weeks)).round() as u32;
                rate
            };

            HistorySummary::YesNo {
                weeks,
                recorded_weeks,
                completed_weeks,
                completion_rate,
            }
        }
    }
}

fn count(n: usize) -> u32 {
    u32::try_from(n).unwrap_or(u32::MAX)
}
