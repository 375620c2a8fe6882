//! Accounts API endpoints

use api_types::{
    Message,
    account::{AccountNew, AccountView, BalanceAuditView, Reconcile, Reconciled},
};
use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
};
use engine::{Caller, NewAccountCmd};

use crate::{ServerError, server::ServerState, today, views};

pub async fn create(
    Extension(caller): Extension<Caller>,
    State(state): State<ServerState>,
    Json(payload): Json<AccountNew>,
) -> Result<(StatusCode, Json<AccountView>), ServerError> {
    let mut cmd = NewAccountCmd::new(payload.name, payload.kind)
        .opening_balance(payload.balance.unwrap_or(0.0));
    cmd.currency = payload.currency;
    cmd.color = payload.color;
    cmd.icon = payload.icon;
    cmd.account_number = payload.account_number;
    cmd.institution = payload.institution;
    if payload.include_in_total == Some(false) {
        cmd = cmd.tracking_only();
    }

    let account = state.engine.create_account(caller, cmd).await?;
    Ok((StatusCode::CREATED, Json(views::account(account))))
}

pub async fn list(
    Extension(caller): Extension<Caller>,
    State(state): State<ServerState>,
) -> Result<Json<Vec<AccountView>>, ServerError> {
    let accounts = state.engine.list_accounts(caller).await?;
    Ok(Json(accounts.into_iter().map(views::account).collect()))
}

pub async fn details(
    Extension(caller): Extension<Caller>,
    State(state): State<ServerState>,
    Path(id): Path<i32>,
) -> Result<Json<AccountView>, ServerError> {
    let account = state.engine.account(caller, id).await?;
    Ok(Json(views::account(account)))
}

/// Soft delete: the account stops showing up but its history stays.
pub async fn deactivate(
    Extension(caller): Extension<Caller>,
    State(state): State<ServerState>,
    Path(id): Path<i32>,
) -> Result<Json<Message>, ServerError> {
    state.engine.deactivate_account(caller, id).await?;
    Ok(Json(Message::new("Account deleted successfully")))
}

pub async fn reconcile(
    Extension(caller): Extension<Caller>,
    State(state): State<ServerState>,
    Path(id): Path<i32>,
    Json(payload): Json<Reconcile>,
) -> Result<Json<Reconciled>, ServerError> {
    let outcome = state
        .engine
        .reconcile(caller, id, payload.actual_balance, today())
        .await?;

    let message = if outcome.adjusted() {
        "Balance reconciled successfully"
    } else {
        "Balance is already in sync"
    };
    Ok(Json(Reconciled {
        message: message.to_string(),
        new_balance: outcome.balance,
        adjustment: outcome.adjustment,
        transaction_id: outcome.transaction_id,
    }))
}

pub async fn audit(
    Extension(caller): Extension<Caller>,
    State(state): State<ServerState>,
    Path(id): Path<i32>,
) -> Result<Json<BalanceAuditView>, ServerError> {
    let audit = state.engine.audit_account(caller, id).await?;
    Ok(Json(views::audit(audit)))
}
