use std::sync::Arc;

use storage::repository::{GoalRepository, StorageError};
use weekly_core::model::{Goal, GoalDraft, GoalId, GoalPatch};

use crate::Clock;
use crate::error::GoalServiceError;

/// Orchestrates goal creation, edits and deletion.
#[derive(Clone)]
pub struct GoalService {
    clock: Clock,
    goals: Arc<dyn GoalRepository>,
}

impl GoalService {
    #[must_use]
    pub fn new(clock: Clock, goals: Arc<dyn GoalRepository>) -> Self {
        Self { clock, goals }
    }

    /// List all goals, oldest first.
    ///
    /// # Errors
    ///
    /// Returns `GoalServiceError::Storage` if repository access fails.
    pub async fn list_goals(&self) -> Result<Vec<Goal>, GoalServiceError> {
        Ok(self.goals.list_goals().await?)
    }

    /// Fetch a goal by ID.
    ///
    /// # Errors
    ///
    /// Returns `GoalServiceError::NotFound` when the goal does not exist.
    /// Returns `GoalServiceError::Storage` if repository access fails.
    pub async fn get_goal(&self, id: GoalId) -> Result<Goal, GoalServiceError> {
        self.goals
            .get_goal(id)
            .await?
            .ok_or(GoalServiceError::NotFound(id))
    }

    /// Validate and persist a new goal.
    ///
    /// # Errors
    ///
    /// Returns `GoalServiceError::Goal` for validation failures.
    /// Returns `GoalServiceError::Storage` if persistence fails.
    pub async fn create_goal(&self, draft: GoalDraft) -> Result<Goal, GoalServiceError> {
        let validated = draft.validate(self.clock.now())?;
        let goal = self.goals.insert_goal(validated).await?;
        tracing::info!(goal_id = %goal.id(), goal_type = %goal.goal_type(), "goal created");
        Ok(goal)
    }

    /// Apply a partial update to an existing goal.
    ///
    /// # Errors
    ///
    /// Returns `GoalServiceError::NotFound` when the goal does not exist.
    /// Returns `GoalServiceError::Goal` if a supplied field is invalid.
    /// Returns `GoalServiceError::Storage` if repository access fails.
    pub async fn update_goal(&self, id: GoalId, patch: GoalPatch) -> Result<Goal, GoalServiceError> {
        let goal = self.get_goal(id).await?;
        let updated = goal.apply_patch(patch, self.clock.now())?;
        self.goals.update_goal(&updated).await.map_err(|e| match e {
            StorageError::NotFound => GoalServiceError::NotFound(id),
            other => other.into(),
        })?;
        tracing::debug!(goal_id = %id, "goal updated");
        Ok(updated)
    }

    /// Delete a goal and, with it, all of its weekly progress.
    ///
    /// # Errors
    ///
    /// Returns `GoalServiceError::NotFound` when the goal does not exist.
    /// Returns `GoalServiceError::Storage` if repository access fails.
    pub async fn delete_goal(&self, id: GoalId) -> Result<(), GoalServiceError> {
        self.goals.delete_goal(id).await.map_err(|e| match e {
            StorageError::NotFound => GoalServiceError::NotFound(id),
            other => other.into(),
        })?;
        tracing::info!(goal_id = %id, "goal deleted");
        Ok(())
    }
}
