use std::sync::Arc;

use storage::repository::{GoalRepository, ProgressRepository, ProgressUpsert, StorageError};
use weekly_core::WeekZone;
use weekly_core::history::{self, HistoryEntry, HistorySummary};
use weekly_core::model::{Goal, GoalId, ProgressInput, WeeklyProgress};
use weekly_core::week::WeekBoundary;

use crate::Clock;
use crate::error::ProgressServiceError;

/// Smallest history window callers may request.
pub const MIN_HISTORY_WEEKS: u32 = 1;
/// Largest history window callers may request.
pub const MAX_HISTORY_WEEKS: u32 = 52;
/// Window used when a caller does not say.
pub const DEFAULT_HISTORY_WEEKS: u32 = 10;

/// Records weekly progress and rebuilds dense history from sparse rows.
#[derive(Clone)]
pub struct ProgressService {
    clock: Clock,
    zone: WeekZone,
    goals: Arc<dyn GoalRepository>,
    progress: Arc<dyn ProgressRepository>,
}

impl ProgressService {
    #[must_use]
    pub fn new(
        clock: Clock,
        zone: WeekZone,
        goals: Arc<dyn GoalRepository>,
        progress: Arc<dyn ProgressRepository>,
    ) -> Self {
        Self {
            clock,
            zone,
            goals,
            progress,
        }
    }

    /// The week containing "now" in the configured zone.
    #[must_use]
    pub fn current_week(&self) -> WeekBoundary {
        self.zone.boundaries_at(self.clock.now())
    }

    /// Record progress for the current week, overwriting any earlier entry.
    ///
    /// # Errors
    ///
    /// Returns `ProgressServiceError::GoalNotFound` if the goal does not exist.
    /// Returns `ProgressServiceError::Progress` if the input does not fit the goal's kind.
    /// Returns `ProgressServiceError::Storage` if persistence fails.
    pub async fn record_progress(
        &self,
        goal_id: GoalId,
        input: ProgressInput,
    ) -> Result<WeeklyProgress, ProgressServiceError> {
        let week = self.current_week();
        self.record_progress_for_week(goal_id, week, input).await
    }

    /// Record progress for an explicit week.
    ///
    /// # Errors
    ///
    /// Same as [`ProgressService::record_progress`].
    pub async fn record_progress_for_week(
        &self,
        goal_id: GoalId,
        week: WeekBoundary,
        input: ProgressInput,
    ) -> Result<WeeklyProgress, ProgressServiceError> {
        let goal = self.require_goal(goal_id).await?;
        let value = input.resolve(goal.goal_type())?;

        let record = self
            .progress
            .upsert_progress(ProgressUpsert {
                goal_id,
                week,
                value,
                recorded_at: self.clock.now(),
            })
            .await
            .map_err(|e| match e {
                // The goal vanished between the lookup and the write.
                StorageError::Conflict => ProgressServiceError::GoalNotFound(goal_id),
                other => other.into(),
            })?;

        tracing::debug!(
            goal_id = %goal_id,
            week_start = %week.start(),
            "weekly progress recorded"
        );
        Ok(record)
    }

    /// This week's record, or `None` when nothing has been recorded yet.
    ///
    /// # Errors
    ///
    /// Returns `ProgressServiceError::Storage` if repository access fails.
    pub async fn current_progress(
        &self,
        goal_id: GoalId,
    ) -> Result<Option<WeeklyProgress>, ProgressServiceError> {
        let week = self.current_week();
        Ok(self.progress.get_progress(goal_id, week.start()).await?)
    }

    /// One entry per week for the last `weeks` weeks, oldest first, gaps filled
    /// with the goal kind's default.
    ///
    /// # Errors
    ///
    /// Returns `ProgressServiceError::InvalidWeeks` if `weeks` is outside 1..=52.
    /// Returns `ProgressServiceError::GoalNotFound` if the goal does not exist.
    /// Returns `ProgressServiceError::Storage` if repository access fails.
    pub async fn history(
        &self,
        goal_id: GoalId,
        weeks: u32,
    ) -> Result<Vec<HistoryEntry>, ProgressServiceError> {
        let (_, entries) = self.goal_history(goal_id, weeks).await?;
        Ok(entries)
    }

    /// Averages and completion counts over the same window as [`ProgressService::history`].
    ///
    /// # Errors
    ///
    /// Same as [`ProgressService::history`].
    pub async fn summary(
        &self,
        goal_id: GoalId,
        weeks: u32,
    ) -> Result<HistorySummary, ProgressServiceError> {
        let (goal, entries) = self.goal_history(goal_id, weeks).await?;
        Ok(history::summarize(goal.kind(), &entries))
    }

    async fn goal_history(
        &self,
        goal_id: GoalId,
        weeks: u32,
    ) -> Result<(Goal, Vec<HistoryEntry>), ProgressServiceError> {
        if !(MIN_HISTORY_WEEKS..=MAX_HISTORY_WEEKS).contains(&weeks) {
            return Err(ProgressServiceError::InvalidWeeks(weeks));
        }
        let goal = self.require_goal(goal_id).await?;

        let boundaries = self.zone.last_n_weeks(weeks, self.clock.now());
        let (Some(first), Some(last)) = (boundaries.first(), boundaries.last()) else {
            return Ok((goal, Vec::new()));
        };
        let records = self
            .progress
            .list_progress_between(goal_id, first.start(), last.start())
            .await?;

        let entries = history::densify(goal_id, goal.goal_type(), &boundaries, records);
        Ok((goal, entries))
    }

    async fn require_goal(&self, goal_id: GoalId) -> Result<Goal, ProgressServiceError> {
        self.goals
            .get_goal(goal_id)
            .await?
            .ok_or(ProgressServiceError::GoalNotFound(goal_id))
    }
}
