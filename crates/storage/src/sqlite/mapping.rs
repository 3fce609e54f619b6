use chrono::{DateTime, Utc};
use sqlx::Row;
use sqlx::sqlite::SqliteRow;
use weekly_core::model::{Goal, GoalId, GoalKind, GoalType, ProgressId, ProgressValue, WeeklyProgress};
use weekly_core::week::WeekBoundary;

use crate::repository::StorageError;

pub(crate) fn ser<E: core::fmt::Display>(e: E) -> StorageError {
    StorageError::Serialization(e.to_string())
}

/// Classify driver errors: constraint violations become `Conflict`.
pub(crate) fn db_err(e: sqlx::Error) -> StorageError {
    if let sqlx::Error::Database(db) = &e {
        if db.is_foreign_key_violation() || db.is_unique_violation() {
            return StorageError::Conflict;
        }
    }
    StorageError::Connection(e.to_string())
}

fn i64_to_u64(field: &'static str, v: i64) -> Result<u64, StorageError> {
    u64::try_from(v).map_err(|_| StorageError::Serialization(format!("{field} sign overflow")))
}

pub(crate) fn goal_id_from_i64(v: i64) -> Result<GoalId, StorageError> {
    Ok(GoalId::new(i64_to_u64("goal_id", v)?))
}

pub(crate) fn goal_id_to_i64(id: GoalId) -> Result<i64, StorageError> {
    i64::try_from(id.value()).map_err(|_| StorageError::Serialization("goal_id overflow".into()))
}

pub(crate) fn progress_id_from_i64(v: i64) -> Result<ProgressId, StorageError> {
    Ok(ProgressId::new(i64_to_u64("progress_id", v)?))
}

pub(crate) fn map_goal_row(row: &SqliteRow) -> Result<Goal, StorageError> {
    let kind_str: String = row.try_get("kind").map_err(ser)?;
    let kind = match kind_str.parse::<GoalType>().map_err(ser)? {
        GoalType::Measurable => GoalKind::Measurable {
            target: row.try_get("target").map_err(ser)?,
            unit: row.try_get("unit").map_err(ser)?,
        },
        GoalType::YesNo => GoalKind::YesNo,
    };

    Goal::from_persisted(
        goal_id_from_i64(row.try_get::<i64, _>("id").map_err(ser)?)?,
        row.try_get("title").map_err(ser)?,
        kind,
        row.try_get("icon").map_err(ser)?,
        row.try_get("created_at").map_err(ser)?,
        row.try_get("updated_at").map_err(ser)?,
    )
    .map_err(ser)
}

/// Splits a `ProgressValue` into its `(value, completed)` columns.
pub(crate) fn progress_value_columns(value: ProgressValue) -> (Option<f64>, Option<bool>) {
    (value.value(), value.completed())
}

pub(crate) fn progress_value_from_columns(
    value: Option<f64>,
    completed: Option<bool>,
) -> Result<ProgressValue, StorageError> {
    match (value, completed) {
        (Some(v), None) => Ok(ProgressValue::Measurable(v)),
        (None, Some(c)) => Ok(ProgressValue::YesNo(c)),
        _ => Err(StorageError::Serialization(
            "progress row must hold exactly one of value/completed".into(),
        )),
    }
}

pub(crate) fn map_progress_row(row: &SqliteRow) -> Result<WeeklyProgress, StorageError> {
    let week_start: DateTime<Utc> = row.try_get("week_start").map_err(ser)?;
    let week_end: DateTime<Utc> = row.try_get("week_end").map_err(ser)?;

    Ok(WeeklyProgress {
        id: progress_id_from_i64(row.try_get::<i64, _>("id").map_err(ser)?)?,
        goal_id: goal_id_from_i64(row.try_get::<i64, _>("goal_id").map_err(ser)?)?,
        week: WeekBoundary::from_parts(week_start, week_end),
        value: progress_value_from_columns(
            row.try_get("value").map_err(ser)?,
            row.try_get("completed").map_err(ser)?,
        )?,
        created_at: row.try_get("created_at").map_err(ser)?,
        updated_at: row.try_get("updated_at").map_err(ser)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn value_columns_round_trip() {
        for value in [ProgressValue::Measurable(6.5), ProgressValue::YesNo(true)] {
            let (v, c) = progress_value_columns(value);
            assert_eq!(progress_value_from_columns(v, c).unwrap(), value);
        }
    }

    #[test]
    fn both_or_neither_column_is_rejected() {
        assert!(progress_value_from_columns(None, None).is_err());
        assert!(progress_value_from_columns(Some(1.0), Some(true)).is_err());
    }

    #[test]
    fn negative_ids_are_rejected() {
        assert!(goal_id_from_i64(-4).is_err());
        assert_eq!(goal_id_to_i64(GoalId::new(4)).unwrap(), 4);
    }
}
