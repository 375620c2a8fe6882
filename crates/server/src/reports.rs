//! Dashboard and report endpoints

use api_types::{
    bill::UpcomingBillView,
    budget::BudgetProgressView,
    report::{
        AccountBalanceView, CategorySpendingView, DashboardSummaryView, DashboardView,
        MonthlyTrendView, SpendingQuery,
    },
};
use axum::{
    Extension, Json,
    extract::{Query, State},
};
use engine::Caller;

use crate::{ServerError, server::ServerState, today, views};

pub async fn dashboard(
    Extension(caller): Extension<Caller>,
    State(state): State<ServerState>,
) -> Result<Json<DashboardView>, ServerError> {
    let dashboard = state.engine.dashboard(caller, today()).await?;
    Ok(Json(views::dashboard(dashboard)))
}

// The dashboard parts below are cut from the same computation, so they
// always agree with `/dashboard`.

pub async fn dashboard_summary(
    Extension(caller): Extension<Caller>,
    State(state): State<ServerState>,
) -> Result<Json<DashboardSummaryView>, ServerError> {
    let dashboard = state.engine.dashboard(caller, today()).await?;
    Ok(Json(views::dashboard_summary(dashboard.summary)))
}

pub async fn dashboard_accounts(
    Extension(caller): Extension<Caller>,
    State(state): State<ServerState>,
) -> Result<Json<Vec<AccountBalanceView>>, ServerError> {
    let dashboard = state.engine.dashboard(caller, today()).await?;
    Ok(Json(
        dashboard
            .accounts
            .into_iter()
            .map(views::account_balance)
            .collect(),
    ))
}

pub async fn dashboard_budgets(
    Extension(caller): Extension<Caller>,
    State(state): State<ServerState>,
) -> Result<Json<Vec<BudgetProgressView>>, ServerError> {
    let dashboard = state.engine.dashboard(caller, today()).await?;
    Ok(Json(
        dashboard
            .budgets
            .into_iter()
            .map(views::budget_progress)
            .collect(),
    ))
}

pub async fn dashboard_upcoming_bills(
    Extension(caller): Extension<Caller>,
    State(state): State<ServerState>,
) -> Result<Json<Vec<UpcomingBillView>>, ServerError> {
    let dashboard = state.engine.dashboard(caller, today()).await?;
    Ok(Json(
        dashboard
            .upcoming_bills
            .into_iter()
            .map(views::upcoming_bill)
            .collect(),
    ))
}

pub async fn dashboard_category_spending(
    Extension(caller): Extension<Caller>,
    State(state): State<ServerState>,
) -> Result<Json<Vec<CategorySpendingView>>, ServerError> {
    let dashboard = state.engine.dashboard(caller, today()).await?;
    Ok(Json(
        dashboard
            .category_spending
            .into_iter()
            .map(views::category_spending)
            .collect(),
    ))
}

pub async fn monthly_trends(
    Extension(caller): Extension<Caller>,
    State(state): State<ServerState>,
) -> Result<Json<Vec<MonthlyTrendView>>, ServerError> {
    let trends = state.engine.monthly_trends(caller, today()).await?;
    Ok(Json(trends.into_iter().map(views::monthly_trend).collect()))
}

pub async fn spending_by_category(
    Extension(caller): Extension<Caller>,
    State(state): State<ServerState>,
    Query(query): Query<SpendingQuery>,
) -> Result<Json<Vec<CategorySpendingView>>, ServerError> {
    let rows = state
        .engine
        .spending_by_category(caller, query.year, query.month)
        .await?;
    Ok(Json(rows.into_iter().map(views::category_spending).collect()))
}
