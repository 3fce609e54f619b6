use weekly_core::model::{Goal, GoalId, ValidatedGoal};

use super::SqliteRepository;
use super::mapping::{db_err, goal_id_from_i64, goal_id_to_i64, map_goal_row};
use crate::repository::{GoalRepository, StorageError};

#[async_trait::async_trait]
impl GoalRepository for SqliteRepository {
    async fn insert_goal(&self, goal: ValidatedGoal) -> Result<Goal, StorageError> {
        let res = sqlx::query(
            r"
            INSERT INTO goals (title, kind, target, unit, icon, created_at, updated_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?6)
            ",
        )
        .bind(goal.title.as_str())
        .bind(goal.kind.goal_type().as_str())
        .bind(goal.kind.target())
        .bind(goal.kind.unit())
        .bind(goal.icon.as_str())
        .bind(goal.created_at)
        .execute(&self.pool)
        .await
        .map_err(db_err)?;

        let id = goal_id_from_i64(res.last_insert_rowid())?;
        Ok(goal.assign_id(id))
    }

    async fn get_goal(&self, id: GoalId) -> Result<Option<Goal>, StorageError> {
        let row = sqlx::query(
            r"
            SELECT id, title, kind, target, unit, icon, created_at, updated_at
            FROM goals WHERE id = ?1
            ",
        )
        .bind(goal_id_to_i64(id)?)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_err)?;

        match row {
            Some(row) => map_goal_row(&row).map(Some),
            None => Ok(None),
        }
    }

    async fn list_goals(&self) -> Result<Vec<Goal>, StorageError> {
        let rows = sqlx::query(
            r"
            SELECT id, title, kind, target, unit, icon, created_at, updated_at
            FROM goals
            ORDER BY created_at ASC, id ASC
            ",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(db_err)?;

        rows.iter().map(map_goal_row).collect()
    }

    async fn update_goal(&self, goal: &Goal) -> Result<(), StorageError> {
        let res = sqlx::query(
            r"
            UPDATE goals SET
                title = ?2,
                kind = ?3,
                target = ?4,
                unit = ?5,
                icon = ?6,
                updated_at = ?7
            WHERE id = ?1
            ",
        )
        .bind(goal_id_to_i64(goal.id())?)
        .bind(goal.title())
        .bind(goal.goal_type().as_str())
        .bind(goal.kind().target())
        .bind(goal.kind().unit())
        .bind(goal.icon())
        .bind(goal.updated_at())
        .execute(&self.pool)
        .await
        .map_err(db_err)?;

        if res.rows_affected() == 0 {
            return Err(StorageError::NotFound);
        }
        Ok(())
    }

    async fn delete_goal(&self, id: GoalId) -> Result<(), StorageError> {
        let res = sqlx::query("DELETE FROM goals WHERE id = ?1")
            .bind(goal_id_to_i64(id)?)
            .execute(&self.pool)
            .await
            .map_err(db_err)?;

        if res.rows_affected() == 0 {
            return Err(StorageError::NotFound);
        }
        Ok(())
    }
}
