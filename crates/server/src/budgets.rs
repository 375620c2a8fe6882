//! Budgets API endpoints

use api_types::budget::{BudgetNew, BudgetProgressView, BudgetView};
use axum::{Extension, Json, extract::State, http::StatusCode};
use engine::{Caller, NewBudgetCmd};

use crate::{ServerError, server::ServerState, today, views};

pub async fn create(
    Extension(caller): Extension<Caller>,
    State(state): State<ServerState>,
    Json(payload): Json<BudgetNew>,
) -> Result<(StatusCode, Json<BudgetView>), ServerError> {
    let mut cmd = NewBudgetCmd::new(payload.amount, payload.period, payload.start_date);
    cmd.category_id = payload.category_id;

    let budget = state.engine.create_budget(caller, cmd).await?;
    Ok((StatusCode::CREATED, Json(views::budget(budget))))
}

pub async fn list(
    Extension(caller): Extension<Caller>,
    State(state): State<ServerState>,
) -> Result<Json<Vec<BudgetProgressView>>, ServerError> {
    let budgets = state.engine.list_budgets(caller, today()).await?;
    Ok(Json(budgets.into_iter().map(views::budget_progress).collect()))
}
