//! Savings goals API endpoints

use api_types::goal::{GoalNew, GoalView};
use axum::{Extension, Json, extract::State, http::StatusCode};
use engine::{Caller, NewSavingsGoalCmd};

use crate::{ServerError, server::ServerState, views};

pub async fn create(
    Extension(caller): Extension<Caller>,
    State(state): State<ServerState>,
    Json(payload): Json<GoalNew>,
) -> Result<(StatusCode, Json<GoalView>), ServerError> {
    let mut cmd = NewSavingsGoalCmd::new(payload.name, payload.target_amount)
        .current_amount(payload.current_amount.unwrap_or(0.0));
    cmd.target_date = payload.target_date;

    let goal = state.engine.create_savings_goal(caller, cmd).await?;
    Ok((StatusCode::CREATED, Json(views::goal(goal))))
}

pub async fn list(
    Extension(caller): Extension<Caller>,
    State(state): State<ServerState>,
) -> Result<Json<Vec<GoalView>>, ServerError> {
    let goals = state.engine.list_savings_goals(caller).await?;
    Ok(Json(goals.into_iter().map(views::goal).collect()))
}
