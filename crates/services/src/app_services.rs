use std::sync::Arc;

use storage::repository::Storage;
use weekly_core::WeekZone;

use crate::Clock;
use crate::error::AppServicesError;
use crate::goal_service::GoalService;
use crate::progress_service::ProgressService;

/// Assembles the services the HTTP layer talks to.
#[derive(Clone)]
pub struct AppServices {
    goals: Arc<GoalService>,
    progress: Arc<ProgressService>,
}

impl AppServices {
    /// Build services backed by `SQLite` storage.
    ///
    /// # Errors
    ///
    /// Returns `AppServicesError` if the database cannot be opened or migrated.
    pub async fn new_sqlite(
        db_url: &str,
        clock: Clock,
        zone: WeekZone,
    ) -> Result<Self, AppServicesError> {
        let storage = Storage::sqlite(db_url).await?;
        Ok(Self::from_storage(&storage, clock, zone))
    }

    /// Build services over already-opened repositories.
    #[must_use]
    pub fn from_storage(storage: &Storage, clock: Clock, zone: WeekZone) -> Self {
        let goals = Arc::new(GoalService::new(clock, Arc::clone(&storage.goals)));
        let progress = Arc::new(ProgressService::new(
            clock,
            zone,
            Arc::clone(&storage.goals),
            Arc::clone(&storage.progress),
        ));
        Self { goals, progress }
    }

    #[must_use]
    pub fn goals(&self) -> Arc<GoalService> {
        Arc::clone(&self.goals)
    }

    #[must_use]
    pub fn progress(&self) -> Arc<ProgressService> {
        Arc::clone(&self.progress)
    }
}
