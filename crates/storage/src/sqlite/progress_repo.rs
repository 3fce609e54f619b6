use chrono::{DateTime, Utc};
use weekly_core::model::{GoalId, WeeklyProgress};

use super::SqliteRepository;
use super::mapping::{db_err, goal_id_to_i64, map_progress_row, progress_value_columns};
use crate::repository::{ProgressRepository, ProgressUpsert, StorageError};

#[async_trait::async_trait]
impl ProgressRepository for SqliteRepository {
    async fn upsert_progress(&self, upsert: ProgressUpsert) -> Result<WeeklyProgress, StorageError> {
        let (value, completed) = progress_value_columns(upsert.value);

        // Single statement: the unique (goal_id, week_start) key decides insert vs update.
        let row = sqlx::query(
            r"
            INSERT INTO weekly_progress (goal_id, week_start, week_end, value, completed, created_at, updated_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?6)
            ON CONFLICT(goal_id, week_start) DO UPDATE SET
                value = excluded.value,
                completed = excluded.completed,
                updated_at = excluded.updated_at
            RETURNING id, goal_id, week_start, week_end, value, completed, created_at, updated_at
            ",
        )
        .bind(goal_id_to_i64(upsert.goal_id)?)
        .bind(upsert.week.start())
        .bind(upsert.week.end())
        .bind(value)
        .bind(completed)
        .bind(upsert.recorded_at)
        .fetch_one(&self.pool)
        .await
        .map_err(db_err)?;

        map_progress_row(&row)
    }

    async fn get_progress(
        &self,
        goal_id: GoalId,
        week_start: DateTime<Utc>,
    ) -> Result<Option<WeeklyProgress>, StorageError> {
        let row = sqlx::query(
            r"
            SELECT id, goal_id, week_start, week_end, value, completed, created_at, updated_at
            FROM weekly_progress
            WHERE goal_id = ?1 AND week_start = ?2
            ",
        )
        .bind(goal_id_to_i64(goal_id)?)
        .bind(week_start)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_err)?;

        row.as_ref().map(map_progress_row).transpose()
    }

    async fn list_progress_between(
        &self,
        goal_id: GoalId,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<Vec<WeeklyProgress>, StorageError> {
        // week_start is stored as RFC 3339 UTC text, which sorts chronologically.
        let rows = sqlx::query(
            r"
            SELECT id, goal_id, week_start, week_end, value, completed, created_at, updated_at
            FROM weekly_progress
            WHERE goal_id = ?1 AND week_start >= ?2 AND week_start <= ?3
            ORDER BY week_start ASC
            ",
        )
        .bind(goal_id_to_i64(goal_id)?)
        .bind(from)
        .bind(to)
        .fetch_all(&self.pool)
        .await
        .map_err(db_err)?;

        rows.iter().map(map_progress_row).collect()
    }
}
