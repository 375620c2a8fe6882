use chrono::NaiveDate;
use sea_orm::{ActiveValue, DatabaseTransaction, QueryFilter, QueryOrder, prelude::*};

use crate::{
    Caller, ReconcileOutcome, ResultEngine,
    balance::{validate_amount, within_epsilon},
    categories::{self, BALANCE_ADJUSTMENT_NAME},
};

use super::{Engine, transactions::TransactionRow};

const ADJUSTMENT_DESCRIPTION: &str = "Balance Adjustment (Manual Sync)";
const ADJUSTMENT_COLOR: &str = "#9CA3AF";
const ADJUSTMENT_ICON: &str = "scale";

impl Engine {
    /// Syncs an account to an externally observed balance.
    ///
    /// Differences below one cent are ignored. Otherwise the balance is set to
    /// `actual` and a synthetic transaction carrying the difference is written
    /// under the global `Balance Adjustment` category.
    pub async fn reconcile(
        &self,
        caller: Caller,
        account_id: i32,
        actual: f64,
        today: NaiveDate,
    ) -> ResultEngine<ReconcileOutcome> {
        let actual = validate_amount(actual, "actual balance")?;

        self.with_tx("reconcile", move |engine, db_tx| {
            Box::pin(async move {
                let account = engine.require_account(db_tx, caller, account_id).await?;
                let current = account.balance.unwrap_or(0.0);
                let difference = actual - current;
                if within_epsilon(difference) {
                    tracing::debug!(account_id, current, actual, "balance already in sync");
                    return Ok(ReconcileOutcome {
                        balance: current,
                        adjustment: 0.0,
                        transaction_id: None,
                    });
                }

                let category_id = adjustment_category(db_tx).await?;
                let mut row = TransactionRow::new(
                    account.id,
                    category_id,
                    difference,
                    ADJUSTMENT_DESCRIPTION.to_string(),
                    today,
                );
                row.notes = Some(format!("Adjusted from {current} to {actual}"));
                let model = engine.insert_transaction(db_tx, caller, row).await?;
                let balance = engine
                    .overwrite_balance(db_tx, &account, actual, Some(model.id))
                    .await?;

                tracing::info!(
                    user_id = caller.user_id(),
                    account_id,
                    transaction_id = model.id,
                    adjustment = difference,
                    "balance reconciled"
                );
                Ok(ReconcileOutcome {
                    balance,
                    adjustment: difference,
                    transaction_id: Some(model.id),
                })
            })
        })
        .await
    }
}

/// Id of the global `Balance Adjustment` category, created if absent.
async fn adjustment_category(db_tx: &DatabaseTransaction) -> ResultEngine<i32> {
    let existing = categories::Entity::find()
        .filter(categories::Column::Name.eq(BALANCE_ADJUSTMENT_NAME))
        .filter(categories::Column::UserId.is_null())
        .order_by_asc(categories::Column::Id)
        .one(db_tx)
        .await?;
    if let Some(category) = existing {
        return Ok(category.id);
    }

    let model = categories::ActiveModel {
        user_id: ActiveValue::Set(None),
        name: ActiveValue::Set(BALANCE_ADJUSTMENT_NAME.to_string()),
        kind: ActiveValue::Set("Expense".to_string()),
        color: ActiveValue::Set(Some(ADJUSTMENT_COLOR.to_string())),
        icon: ActiveValue::Set(Some(ADJUSTMENT_ICON.to_string())),
        is_active: ActiveValue::Set(Some(true)),
        ..Default::default()
    }
    .insert(db_tx)
    .await?;
    tracing::info!(category_id = model.id, "balance adjustment category created");
    Ok(model.id)
}
