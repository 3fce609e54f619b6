//! JSON shapes exchanged with the frontend.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use weekly_core::history::HistoryEntry;
use weekly_core::model::{Goal, GoalDraft, GoalPatch, GoalType, ProgressInput, WeeklyProgress};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GoalDto {
    pub id: u64,
    pub title: String,
    #[serde(rename = "type")]
    pub goal_type: GoalType,
    pub target: Option<f64>,
    pub unit: Option<String>,
    pub icon: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<&Goal> for GoalDto {
    fn from(goal: &Goal) -> Self {
        Self {
            id: goal.id().value(),
            title: goal.title().to_string(),
            goal_type: goal.goal_type(),
            target: goal.kind().target(),
            unit: goal.kind().unit().map(str::to_string),
            icon: goal.icon().to_string(),
            created_at: goal.created_at(),
            updated_at: goal.updated_at(),
        }
    }
}

/// A weekly progress record. Weeks filled in by the history view carry no
/// `id` or timestamps.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressDto {
    pub id: Option<u64>,
    pub goal_id: u64,
    pub week_start: DateTime<Utc>,
    pub week_end: DateTime<Utc>,
    pub value: Option<f64>,
    pub completed: Option<bool>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl From<&WeeklyProgress> for ProgressDto {
    fn from(record: &WeeklyProgress) -> Self {
        Self {
            id: Some(record.id.value()),
            goal_id: record.goal_id.value(),
            week_start: record.week.start(),
            week_end: record.week.end(),
            value: record.value.value(),
            completed: record.value.completed(),
            created_at: Some(record.created_at),
            updated_at: Some(record.updated_at),
        }
    }
}

impl From<&HistoryEntry> for ProgressDto {
    fn from(entry: &HistoryEntry) -> Self {
        match entry {
            HistoryEntry::Recorded(record) => record.into(),
            HistoryEntry::Missing {
                goal_id,
                week,
                value,
            } => Self {
                id: None,
                goal_id: goal_id.value(),
                week_start: week.start(),
                week_end: week.end(),
                value: value.value(),
                completed: value.completed(),
                created_at: None,
                updated_at: None,
            },
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateGoalBody {
    pub title: String,
    #[serde(rename = "type")]
    pub goal_type: GoalType,
    #[serde(default)]
    pub target: Option<f64>,
    #[serde(default)]
    pub unit: Option<String>,
    #[serde(default)]
    pub icon: Option<String>,
}

impl From<CreateGoalBody> for GoalDraft {
    fn from(body: CreateGoalBody) -> Self {
        Self {
            title: body.title,
            goal_type: body.goal_type,
            target: body.target,
            unit: body.unit,
            icon: body.icon,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateGoalBody {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default, rename = "type")]
    pub goal_type: Option<GoalType>,
    #[serde(default)]
    pub target: Option<f64>,
    #[serde(default)]
    pub unit: Option<String>,
    #[serde(default)]
    pub icon: Option<String>,
}

impl From<UpdateGoalBody> for GoalPatch {
    fn from(body: UpdateGoalBody) -> Self {
        Self {
            title: body.title,
            goal_type: body.goal_type,
            target: body.target,
            unit: body.unit,
            icon: body.icon,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct ProgressBody {
    #[serde(default)]
    pub value: Option<f64>,
    #[serde(default)]
    pub completed: Option<bool>,
}

impl From<ProgressBody> for ProgressInput {
    fn from(body: ProgressBody) -> Self {
        Self {
            value: body.value,
            completed: body.completed,
        }
    }
}

/// `?weeks=N`, kept as text so a malformed value can be reported with the
/// range message instead of a generic query error.
#[derive(Debug, Default, Deserialize)]
pub struct WeeksQuery {
    pub weeks: Option<String>,
}
