//! Bills API endpoints

use api_types::bill::{BillNew, BillPaid, BillSkipped, BillView, PayBillQuery, UpcomingBillView};
use axum::{
    Extension, Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use engine::{Caller, NewBillCmd};

use crate::{ServerError, server::ServerState, today, views};

pub async fn create(
    Extension(caller): Extension<Caller>,
    State(state): State<ServerState>,
    Json(payload): Json<BillNew>,
) -> Result<(StatusCode, Json<BillView>), ServerError> {
    let mut cmd = NewBillCmd::new(
        payload.name,
        payload.amount,
        payload.category_id,
        payload.due_date,
    )
    .auto_pay(payload.auto_pay.unwrap_or(false));
    cmd.frequency = payload.frequency;

    let bill = state.engine.create_bill(caller, cmd).await?;
    Ok((StatusCode::CREATED, Json(views::bill(bill))))
}

pub async fn upcoming(
    Extension(caller): Extension<Caller>,
    State(state): State<ServerState>,
) -> Result<Json<Vec<UpcomingBillView>>, ServerError> {
    let bills = state.engine.upcoming_bills(caller, today()).await?;
    Ok(Json(bills.into_iter().map(views::upcoming_bill).collect()))
}

pub async fn pay(
    Extension(caller): Extension<Caller>,
    State(state): State<ServerState>,
    Path(id): Path<i32>,
    Query(query): Query<PayBillQuery>,
) -> Result<Json<BillPaid>, ServerError> {
    let payment = state
        .engine
        .pay_bill(caller, id, query.account_id, today())
        .await?;

    Ok(Json(BillPaid {
        message: "Payment recorded successfully".to_string(),
        transaction_id: payment.transaction_id,
        new_balance: payment.new_balance,
        next_due_date: payment.next_due_date,
    }))
}

pub async fn skip(
    Extension(caller): Extension<Caller>,
    State(state): State<ServerState>,
    Path(id): Path<i32>,
) -> Result<Json<BillSkipped>, ServerError> {
    let skip = state.engine.skip_bill(caller, id).await?;
    Ok(Json(BillSkipped {
        message: skip.message(),
        next_due_date: skip.next_due_date,
    }))
}
