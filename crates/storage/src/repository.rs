use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard};
use thiserror::Error;
use weekly_core::model::{Goal, GoalId, ProgressId, ProgressValue, ValidatedGoal, WeeklyProgress};
use weekly_core::week::WeekBoundary;

/// Errors surfaced by storage adapters.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StorageError {
    #[error("not found")]
    NotFound,

    #[error("conflict")]
    Conflict,

    #[error("connection error: {0}")]
    Connection(String),

    #[error("serialization error: {0}")]
    Serialization(String),
}

/// Write request for one (goal, week) progress slot.
#[derive(Debug, Clone, PartialEq)]
pub struct ProgressUpsert {
    pub goal_id: GoalId,
    pub week: WeekBoundary,
    pub value: ProgressValue,
    pub recorded_at: DateTime<Utc>,
}

/// Repository contract for goal definitions.
#[async_trait]
pub trait GoalRepository: Send + Sync {
    /// Persist a new goal and assign its id.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the goal cannot be stored.
    async fn insert_goal(&self, goal: ValidatedGoal) -> Result<Goal, StorageError>;

    /// Fetch a goal by ID.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` on backend failures; a missing goal is `Ok(None)`.
    async fn get_goal(&self, id: GoalId) -> Result<Option<Goal>, StorageError>;

    /// List all goals, oldest first.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` on backend failures.
    async fn list_goals(&self) -> Result<Vec<Goal>, StorageError>;

    /// Overwrite an existing goal.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::NotFound` if the goal does not exist.
    async fn update_goal(&self, goal: &Goal) -> Result<(), StorageError>;

    /// Delete a goal together with all of its progress records.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::NotFound` if the goal does not exist.
    async fn delete_goal(&self, id: GoalId) -> Result<(), StorageError>;
}

/// Repository contract for weekly progress records.
#[async_trait]
pub trait ProgressRepository: Send + Sync {
    /// Insert or overwrite the record keyed by `(goal_id, week.start())` in one atomic write.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Conflict` if the goal does not exist, or other storage errors.
    async fn upsert_progress(&self, upsert: ProgressUpsert) -> Result<WeeklyProgress, StorageError>;

    /// Fetch the record for one goal and week start.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` on backend failures; no record is `Ok(None)`.
    async fn get_progress(
        &self,
        goal_id: GoalId,
        week_start: DateTime<Utc>,
    ) -> Result<Option<WeeklyProgress>, StorageError>;

    /// Records whose week starts within `[from, to]`, ordered by week start.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` on backend failures.
    async fn list_progress_between(
        &self,
        goal_id: GoalId,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<Vec<WeeklyProgress>, StorageError>;
}

#[derive(Default)]
struct MemoryState {
    goals: BTreeMap<GoalId, Goal>,
    progress: BTreeMap<(GoalId, DateTime<Utc>), WeeklyProgress>,
    last_goal_id: u64,
    last_progress_id: u64,
}

/// Simple in-memory repository implementation for testing and prototyping.
///
/// Goals and progress share one lock so cascading deletes and upserts are atomic.
#[derive(Clone, Default)]
pub struct InMemoryRepository {
    state: Arc<Mutex<MemoryState>>,
}

impl InMemoryRepository {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<MutexGuard<'_, MemoryState>, StorageError> {
        self.state
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))
    }
}

#[async_trait]
impl GoalRepository for InMemoryRepository {
    async fn insert_goal(&self, goal: ValidatedGoal) -> Result<Goal, StorageError> {
        let mut guard = self.lock()?;
        guard.last_goal_id += 1;
        let goal = goal.assign_id(GoalId::new(guard.last_goal_id));
        guard.goals.insert(goal.id(), goal.clone());
        Ok(goal)
    }

    async fn get_goal(&self, id: GoalId) -> Result<Option<Goal>, StorageError> {
        let guard = self.lock()?;
        Ok(guard.goals.get(&id).cloned())
    }

    async fn list_goals(&self) -> Result<Vec<Goal>, StorageError> {
        let guard = self.lock()?;
        let mut goals: Vec<Goal> = guard.goals.values().cloned().collect();
        goals.sort_by_key(|g| (g.created_at(), g.id()));
        Ok(goals)
    }

    async fn update_goal(&self, goal: &Goal) -> Result<(), StorageError> {
        let mut guard = self.lock()?;
        let slot = guard.goals.get_mut(&goal.id()).ok_or(StorageError::NotFound)?;
        *slot = goal.clone();
        Ok(())
    }

    async fn delete_goal(&self, id: GoalId) -> Result<(), StorageError> {
        let mut guard = self.lock()?;
        guard.goals.remove(&id).ok_or(StorageError::NotFound)?;
        guard.progress.retain(|(goal_id, _), _| *goal_id != id);
        Ok(())
    }
}

#[async_trait]
impl ProgressRepository for InMemoryRepository {
    async fn upsert_progress(&self, upsert: ProgressUpsert) -> Result<WeeklyProgress, StorageError> {
        let mut guard = self.lock()?;
        if !guard.goals.contains_key(&upsert.goal_id) {
            return Err(StorageError::Conflict);
        }

        let key = (upsert.goal_id, upsert.week.start());
        if let Some(existing) = guard.progress.get_mut(&key) {
            existing.value = upsert.value;
            existing.updated_at = upsert.recorded_at;
            return Ok(existing.clone());
        }

        guard.last_progress_id += 1;
        let record = WeeklyProgress {
            id: ProgressId::new(guard.last_progress_id),
            goal_id: upsert.goal_id,
            week: upsert.week,
            value: upsert.value,
            created_at: upsert.recorded_at,
            updated_at: upsert.recorded_at,
        };
        guard.progress.insert(key, record.clone());
        Ok(record)
    }

    async fn get_progress(
        &self,
        goal_id: GoalId,
        week_start: DateTime<Utc>,
    ) -> Result<Option<WeeklyProgress>, StorageError> {
        let guard = self.lock()?;
        Ok(guard.progress.get(&(goal_id, week_start)).cloned())
    }

    async fn list_progress_between(
        &self,
        goal_id: GoalId,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<Vec<WeeklyProgress>, StorageError> {
        if from > to {
            return Ok(Vec::new());
        }
        let guard = self.lock()?;
        Ok(guard
            .progress
            .range((goal_id, from)..=(goal_id, to))
            .map(|(_, record)| record.clone())
            .collect())
    }
}

/// Aggregates goal and progress repositories behind trait objects for easy backend swapping.
#[derive(Clone)]
pub struct Storage {
    pub goals: Arc<dyn GoalRepository>,
    pub progress: Arc<dyn ProgressRepository>,
}

impl Storage {
    #[must_use]
    pub fn in_memory() -> Self {
        let repo = InMemoryRepository::new();
        let goals: Arc<dyn GoalRepository> = Arc::new(repo.clone());
        let progress: Arc<dyn ProgressRepository> = Arc::new(repo);
        Self { goals, progress }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use weekly_core::model::{GoalDraft, GoalType};
    use weekly_core::time::fixed_now;
    use weekly_core::week::{last_n_weeks, week_boundaries};

    fn validated(title: &str, goal_type: GoalType) -> ValidatedGoal {
        GoalDraft {
            title: title.into(),
            goal_type,
            target: None,
            unit: None,
            icon: None,
        }
        .validate(fixed_now())
        .unwrap()
    }

    fn upsert(goal_id: GoalId, week: WeekBoundary, value: f64) -> ProgressUpsert {
        ProgressUpsert {
            goal_id,
            week,
            value: ProgressValue::Measurable(value),
            recorded_at: fixed_now(),
        }
    }

    #[tokio::test]
    async fn insert_assigns_increasing_ids() {
        let repo = InMemoryRepository::new();
        let a = repo.insert_goal(validated("A", GoalType::YesNo)).await.unwrap();
        let b = repo.insert_goal(validated("B", GoalType::YesNo)).await.unwrap();
        assert!(a.id() < b.id());

        let listed = repo.list_goals().await.unwrap();
        assert_eq!(listed.iter().map(Goal::title).collect::<Vec<_>>(), ["A", "B"]);
    }

    #[tokio::test]
    async fn upsert_overwrites_same_week() {
        let repo = InMemoryRepository::new();
        let goal = repo
            .insert_goal(validated("Run", GoalType::Measurable))
            .await
            .unwrap();
        let week = week_boundaries(&fixed_now());

        let first = repo.upsert_progress(upsert(goal.id(), week, 2.0)).await.unwrap();
        let mut second = upsert(goal.id(), week, 5.0);
        second.recorded_at = fixed_now() + Duration::hours(2);
        let second = repo.upsert_progress(second).await.unwrap();

        assert_eq!(first.id, second.id);
        assert_eq!(second.value, ProgressValue::Measurable(5.0));
        assert_eq!(second.created_at, fixed_now());
        assert_eq!(second.updated_at, fixed_now() + Duration::hours(2));

        let all = repo
            .list_progress_between(goal.id(), week.start(), week.start())
            .await
            .unwrap();
        assert_eq!(all.len(), 1);
    }

    #[tokio::test]
    async fn upsert_for_unknown_goal_conflicts() {
        let repo = InMemoryRepository::new();
        let week = week_boundaries(&fixed_now());
        let err = repo
            .upsert_progress(upsert(GoalId::new(99), week, 1.0))
            .await
            .unwrap_err();
        assert!(matches!(err, StorageError::Conflict));
    }

    #[tokio::test]
    async fn delete_cascades_to_progress() {
        let repo = InMemoryRepository::new();
        let goal = repo
            .insert_goal(validated("Read", GoalType::Measurable))
            .await
            .unwrap();
        let week = week_boundaries(&fixed_now());
        repo.upsert_progress(upsert(goal.id(), week, 1.0)).await.unwrap();

        repo.delete_goal(goal.id()).await.unwrap();

        assert!(repo.get_goal(goal.id()).await.unwrap().is_none());
        assert!(repo.get_progress(goal.id(), week.start()).await.unwrap().is_none());
        assert!(matches!(
            repo.delete_goal(goal.id()).await.unwrap_err(),
            StorageError::NotFound
        ));
    }

    #[tokio::test]
    async fn range_query_is_scoped_and_ordered() {
        let repo = InMemoryRepository::new();
        let a = repo.insert_goal(validated("A", GoalType::Measurable)).await.unwrap();
        let b = repo.insert_goal(validated("B", GoalType::Measurable)).await.unwrap();
        let weeks = last_n_weeks(4, &fixed_now());

        repo.upsert_progress(upsert(a.id(), weeks[3], 3.0)).await.unwrap();
        repo.upsert_progress(upsert(a.id(), weeks[0], 0.5)).await.unwrap();
        repo.upsert_progress(upsert(b.id(), weeks[1], 9.0)).await.unwrap();

        let found = repo
            .list_progress_between(a.id(), weeks[0].start(), weeks[3].start())
            .await
            .unwrap();
        assert_eq!(found.len(), 2);
        assert_eq!(found[0].week, weeks[0]);
        assert_eq!(found[1].week, weeks[3]);
    }
}
