//! Transfer endpoint

use api_types::transfer::{TransferDone, TransferNew};
use axum::{Extension, Json, extract::State};
use engine::{Caller, TransferCmd};

use crate::{ServerError, server::ServerState};

pub async fn transfer(
    Extension(caller): Extension<Caller>,
    State(state): State<ServerState>,
    Json(payload): Json<TransferNew>,
) -> Result<Json<TransferDone>, ServerError> {
    let outcome = state
        .engine
        .transfer(
            caller,
            TransferCmd::new(
                payload.from_account_id,
                payload.to_account_id,
                payload.amount,
            ),
        )
        .await?;

    Ok(Json(TransferDone {
        message: "Transfer completed successfully".to_string(),
        from_balance: outcome.from_balance,
        to_balance: outcome.to_balance,
    }))
}
