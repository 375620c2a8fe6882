//! Transactions API endpoints

use api_types::transaction::{
    QuickAdd, RecentQuery, SummaryQuery, TransactionChanged, TransactionListQuery,
    TransactionNew, TransactionSearchQuery, TransactionSummary, TransactionUpdate,
    TransactionView,
};
use axum::{
    Extension, Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use engine::{
    Caller, NewTransactionCmd, QuickAddCmd, TransactionListFilter, UpdateTransactionCmd,
};

use crate::{ServerError, server::ServerState, today, views};

const DEFAULT_RECENT: u64 = 10;

pub async fn create(
    Extension(caller): Extension<Caller>,
    State(state): State<ServerState>,
    Json(payload): Json<TransactionNew>,
) -> Result<(StatusCode, Json<TransactionView>), ServerError> {
    let mut cmd = NewTransactionCmd::new(
        payload.account_id,
        payload.amount,
        payload.description,
        payload.category_id,
        payload.transaction_date,
    );
    cmd.details.merchant = payload.merchant;
    cmd.details.payment_method = payload.payment_method;
    cmd.details.notes = payload.notes;

    let created = state.engine.create_transaction(caller, cmd).await?;
    Ok((StatusCode::CREATED, Json(views::transaction(created))))
}

pub async fn update(
    Extension(caller): Extension<Caller>,
    State(state): State<ServerState>,
    Path(id): Path<i32>,
    Json(payload): Json<TransactionUpdate>,
) -> Result<Json<TransactionChanged>, ServerError> {
    let mut cmd = UpdateTransactionCmd::new(
        id,
        payload.amount,
        payload.description,
        payload.category_id,
        payload.transaction_date,
    );
    cmd.account_id = payload.account_id;
    cmd.details.merchant = payload.merchant;
    cmd.details.payment_method = payload.payment_method;
    cmd.details.notes = payload.notes;

    let change = state.engine.update_transaction(caller, cmd).await?;
    Ok(Json(TransactionChanged {
        message: "Transaction updated and balance adjusted".to_string(),
        transaction_id: change.transaction_id,
        new_balance: change.new_balance,
    }))
}

pub async fn remove(
    Extension(caller): Extension<Caller>,
    State(state): State<ServerState>,
    Path(id): Path<i32>,
) -> Result<Json<TransactionChanged>, ServerError> {
    let change = state.engine.delete_transaction(caller, id).await?;
    Ok(Json(TransactionChanged {
        message: "Transaction deleted and balance restored".to_string(),
        transaction_id: change.transaction_id,
        new_balance: change.new_balance,
    }))
}

pub async fn quick_add(
    Extension(caller): Extension<Caller>,
    State(state): State<ServerState>,
    Json(payload): Json<QuickAdd>,
) -> Result<(StatusCode, Json<TransactionView>), ServerError> {
    let mut cmd = QuickAddCmd::new(payload.amount, payload.description);
    cmd.category_name = payload.category_name;

    let created = state.engine.quick_add(caller, cmd, today()).await?;
    Ok((StatusCode::CREATED, Json(views::transaction(created))))
}

pub async fn list(
    Extension(caller): Extension<Caller>,
    State(state): State<ServerState>,
    Query(query): Query<TransactionListQuery>,
) -> Result<Json<Vec<TransactionView>>, ServerError> {
    let mut filter = TransactionListFilter {
        account_id: query.account_id,
        limit: query.limit,
        ..Default::default()
    };
    filter = match (query.year, query.month) {
        (Some(year), Some(month)) => filter.month(year, month)?,
        (None, None) => filter,
        _ => {
            return Err(ServerError::Generic(
                "month and year must be given together".to_string(),
            ));
        }
    };

    let transactions = state.engine.list_transactions(caller, filter).await?;
    Ok(Json(views::transactions(transactions)))
}

pub async fn detail(
    Extension(caller): Extension<Caller>,
    State(state): State<ServerState>,
    Path(id): Path<i32>,
) -> Result<Json<TransactionView>, ServerError> {
    let detail = state.engine.transaction_detail(caller, id).await?;
    Ok(Json(views::transaction(detail)))
}

pub async fn recent(
    Extension(caller): Extension<Caller>,
    State(state): State<ServerState>,
    Query(query): Query<RecentQuery>,
) -> Result<Json<Vec<TransactionView>>, ServerError> {
    let transactions = state
        .engine
        .recent_transactions(caller, query.limit.unwrap_or(DEFAULT_RECENT))
        .await?;
    Ok(Json(views::transactions(transactions)))
}

pub async fn search(
    Extension(caller): Extension<Caller>,
    State(state): State<ServerState>,
    Query(query): Query<TransactionSearchQuery>,
) -> Result<Json<Vec<TransactionView>>, ServerError> {
    let filter = TransactionListFilter {
        from: query.from,
        to: query.to,
        query: query.q,
        ..Default::default()
    };
    let transactions = state.engine.list_transactions(caller, filter).await?;
    Ok(Json(views::transactions(transactions)))
}

pub async fn summary(
    Extension(caller): Extension<Caller>,
    State(state): State<ServerState>,
    Query(query): Query<SummaryQuery>,
) -> Result<Json<TransactionSummary>, ServerError> {
    let flow = state
        .engine
        .transaction_summary(caller, query.from, query.to)
        .await?;
    Ok(Json(views::summary(flow)))
}
