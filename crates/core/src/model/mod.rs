mod goal;
mod ids;
mod progress;

pub use ids::{GoalId, ParseIdError, ProgressId};

pub use goal::{DEFAULT_ICON, Goal, GoalDraft, GoalError, GoalKind, GoalPatch, GoalType, ValidatedGoal};
pub use progress::{ProgressError, ProgressInput, ProgressValue, WeeklyProgress};
