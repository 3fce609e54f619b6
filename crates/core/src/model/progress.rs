use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::model::goal::GoalType;
use crate::model::ids::{GoalId, ProgressId};
use crate::week::WeekBoundary;

//
// ─── ERRORS ───────────────────────────────────────────────────────────────────
//

/// Reasons a progress submission does not fit the goal it targets.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ProgressError {
    #[error("Value required for measurable goals")]
    MissingValue,

    #[error("Completed status required for yes/no goals")]
    MissingCompleted,

    #[error("Value must be a finite number")]
    NonFiniteValue,
}

//
// ─── PROGRESS VALUE ───────────────────────────────────────────────────────────
//

/// What was recorded for one week, shaped by the goal's kind.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ProgressValue {
    Measurable(f64),
    YesNo(bool),
}

impl ProgressValue {
    /// The value reported for a week with nothing recorded.
    #[must_use]
    pub fn default_for(goal_type: GoalType) -> Self {
        match goal_type {
            GoalType::Measurable => ProgressValue::Measurable(0.0),
            GoalType::YesNo => ProgressValue::YesNo(false),
        }
    }

    #[must_use]
    pub fn goal_type(self) -> GoalType {
        match self {
            ProgressValue::Measurable(_) => GoalType::Measurable,
            ProgressValue::YesNo(_) => GoalType::YesNo,
        }
    }

    #[must_use]
    pub fn value(self) -> Option<f64> {
        match self {
            ProgressValue::Measurable(v) => Some(v),
            ProgressValue::YesNo(_) => None,
        }
    }

    #[must_use]
    pub fn completed(self) -> Option<bool> {
        match self {
            ProgressValue::Measurable(_) => None,
            ProgressValue::YesNo(c) => Some(c),
        }
    }
}

/// Raw progress submission: either field may be missing.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ProgressInput {
    pub value: Option<f64>,
    pub completed: Option<bool>,
}

impl ProgressInput {
    /// Pick the field that matches `goal_type`, ignoring the other one.
    ///
    /// # Errors
    ///
    /// Returns `ProgressError` if the matching field is missing or the value is not finite.
    pub fn resolve(self, goal_type: GoalType) -> Result<ProgressValue, ProgressError> {
        match goal_type {
            GoalType::Measurable => {
                let value = self.value.ok_or(ProgressError::MissingValue)?;
                if !value.is_finite() {
                    return Err(ProgressError::NonFiniteValue);
                }
                Ok(ProgressValue::Measurable(value))
            }
            GoalType::YesNo => self
                .completed
                .map(ProgressValue::YesNo)
                .ok_or(ProgressError::MissingCompleted),
        }
    }
}

//
// ─── WEEKLY PROGRESS ──────────────────────────────────────────────────────────
//

/// A stored progress record: one per goal and week.
#[derive(Debug, Clone, PartialEq)]
pub struct WeeklyProgress {
    pub id: ProgressId,
    pub goal_id: GoalId,
    pub week: WeekBoundary,
    pub value: ProgressValue,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
