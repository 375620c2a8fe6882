use sea_orm::prelude::*;

use crate::{Caller, EntrySource, ResultEngine, TransactionChange, transactions};

use super::super::{Engine, balances::BalanceDelta};

impl Engine {
    /// Unwinds a transaction from its account and removes the row.
    ///
    /// When the account no longer exists the row is still removed and
    /// `new_balance` is `None`.
    pub async fn delete_transaction(
        &self,
        caller: Caller,
        transaction_id: i32,
    ) -> ResultEngine<TransactionChange> {
        self.with_tx("delete_transaction", move |engine, db_tx| {
            Box::pin(async move {
                let tx_model = engine
                    .require_transaction(db_tx, caller, transaction_id)
                    .await?;
                let account_id = tx_model.account_id;

                let new_balance = match engine.find_account(db_tx, caller, account_id).await? {
                    Some(account) => Some(
                        engine
                            .apply_balance_deltas(
                                db_tx,
                                &account,
                                &[BalanceDelta::new(-tx_model.amount, EntrySource::Reversal)
                                    .for_transaction(transaction_id)],
                            )
                            .await?,
                    ),
                    None => {
                        tracing::warn!(
                            transaction_id,
                            account_id,
                            "account missing, deleting without reversal"
                        );
                        None
                    }
                };

                transactions::Entity::delete_by_id(transaction_id)
                    .exec(db_tx)
                    .await?;
                tracing::info!(
                    user_id = caller.user_id(),
                    transaction_id,
                    account_id,
                    "transaction deleted"
                );
                Ok(TransactionChange {
                    transaction_id,
                    account_id,
                    new_balance,
                })
            })
        })
        .await
    }
}
