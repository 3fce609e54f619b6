use axum::Json;
use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use services::{DEFAULT_HISTORY_WEEKS, ProgressServiceError};
use weekly_core::history::HistorySummary;

use crate::ServerState;
use crate::dto::{ProgressBody, ProgressDto, WeeksQuery};
use crate::error::ApiError;
use crate::goals::{body, parse_goal_id};

pub(crate) async fn record_progress(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    payload: Result<Json<ProgressBody>, JsonRejection>,
) -> Result<Json<ProgressDto>, ApiError> {
    let goal_id = parse_goal_id(&id)?;
    let input = body(payload)?.into();
    let record = state
        .services
        .progress()
        .record_progress(goal_id, input)
        .await?;
    Ok(Json(ProgressDto::from(&record)))
}

/// The current week's record, or JSON `null`.
pub(crate) async fn current_progress(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> Result<Json<Option<ProgressDto>>, ApiError> {
    let goal_id = parse_goal_id(&id)?;
    let record = state.services.progress().current_progress(goal_id).await?;
    Ok(Json(record.as_ref().map(ProgressDto::from)))
}

pub(crate) async fn history(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    query: Result<Query<WeeksQuery>, QueryRejection>,
) -> Result<Json<Vec<ProgressDto>>, ApiError> {
    let weeks = weeks_param(query)?;
    let goal_id = parse_goal_id(&id)?;
    let entries = state.services.progress().history(goal_id, weeks).await?;
    Ok(Json(entries.iter().map(ProgressDto::from).collect()))
}

pub(crate) async fn summary(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    query: Result<Query<WeeksQuery>, QueryRejection>,
) -> Result<Json<HistorySummary>, ApiError> {
    let weeks = weeks_param(query)?;
    let goal_id = parse_goal_id(&id)?;
    let summary = state.services.progress().summary(goal_id, weeks).await?;
    Ok(Json(summary))
}

/// Missing or blank means the default window; anything that is not an integer in range
/// is rejected with the range message.
fn weeks_param(query: Result<Query<WeeksQuery>, QueryRejection>) -> Result<u32, ApiError> {
    let Query(query) = query.map_err(|rejection| ApiError::BadRequest(rejection.body_text()))?;
    let raw = query.weeks.as_deref().map(str::trim).unwrap_or_default();
    if raw.is_empty() {
        return Ok(DEFAULT_HISTORY_WEEKS);
    }
    let invalid = || ApiError::from(ProgressServiceError::InvalidWeeks(0));
    let parsed: i64 = raw.parse().map_err(|_| invalid())?;
    // Out-of-range values are left for the service to reject.
    u32::try_from(parsed).map_err(|_| invalid())
}
