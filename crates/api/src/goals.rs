use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use weekly_core::model::GoalId;

use crate::ServerState;
use crate::dto::{CreateGoalBody, GoalDto, UpdateGoalBody};
use crate::error::ApiError;

/// Ids that do not parse cannot name an existing goal.
pub(crate) fn parse_goal_id(raw: &str) -> Result<GoalId, ApiError> {
    raw.parse().map_err(|_| ApiError::goal_not_found())
}

pub(crate) fn body<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, ApiError> {
    payload
        .map(|Json(body)| body)
        .map_err(|rejection| ApiError::BadRequest(rejection.body_text()))
}

pub(crate) async fn list_goals(
    State(state): State<ServerState>,
) -> Result<Json<Vec<GoalDto>>, ApiError> {
    let goals = state.services.goals().list_goals().await?;
    Ok(Json(goals.iter().map(GoalDto::from).collect()))
}

pub(crate) async fn get_goal(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> Result<Json<GoalDto>, ApiError> {
    let id = parse_goal_id(&id)?;
    let goal = state.services.goals().get_goal(id).await?;
    Ok(Json(GoalDto::from(&goal)))
}

pub(crate) async fn create_goal(
    State(state): State<ServerState>,
    payload: Result<Json<CreateGoalBody>, JsonRejection>,
) -> Result<(StatusCode, Json<GoalDto>), ApiError> {
    let draft = body(payload)?.into();
    let goal = state.services.goals().create_goal(draft).await?;
    Ok((StatusCode::CREATED, Json(GoalDto::from(&goal))))
}

pub(crate) async fn update_goal(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    payload: Result<Json<UpdateGoalBody>, JsonRejection>,
) -> Result<Json<GoalDto>, ApiError> {
    let id = parse_goal_id(&id)?;
    let patch = body(payload)?.into();
    let goal = state.services.goals().update_goal(id, patch).await?;
    Ok(Json(GoalDto::from(&goal)))
}

pub(crate) async fn delete_goal(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let id = parse_goal_id(&id)?;
    state.services.goals().delete_goal(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
