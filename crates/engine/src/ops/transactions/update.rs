use sea_orm::{ActiveValue, IntoActiveModel, prelude::*};

use crate::{
    Caller, EntrySource, ResultEngine, TransactionChange, UpdateTransactionCmd,
    balance::validate_amount,
    util::{normalize_optional_text, normalize_required},
};

use super::super::{Engine, balances::BalanceDelta};

impl Engine {
    /// Rewrites a transaction and moves its effect on balances.
    ///
    /// On the same account the old amount is unwound and the new one applied,
    /// in that order. When `account_id` names another account, the old amount
    /// is unwound on the old account and the new amount applied on the new
    /// one. If the old account no longer exists nothing is unwound.
    ///
    /// Merchant, payment method and notes are replaced like every other
    /// field.
    pub async fn update_transaction(
        &self,
        caller: Caller,
        cmd: UpdateTransactionCmd,
    ) -> ResultEngine<TransactionChange> {
        let amount = validate_amount(cmd.amount, "amount")?;
        let description = normalize_required(&cmd.description, "description")?;
        let merchant = normalize_optional_text(cmd.details.merchant.as_deref());
        let payment_method = normalize_optional_text(cmd.details.payment_method.as_deref());
        let notes = normalize_optional_text(cmd.details.notes.as_deref());

        self.with_tx("update_transaction", move |engine, db_tx| {
            Box::pin(async move {
                let tx_model = engine
                    .require_transaction(db_tx, caller, cmd.transaction_id)
                    .await?;
                engine
                    .require_visible_category(db_tx, caller, cmd.category_id)
                    .await?;

                let transaction_id = tx_model.id;
                let old_account_id = tx_model.account_id;
                let target_account_id = cmd.account_id.unwrap_or(old_account_id);
                let old_account = engine.find_account(db_tx, caller, old_account_id).await?;
                let reversal = BalanceDelta::new(-tx_model.amount, EntrySource::Reversal)
                    .for_transaction(transaction_id);
                let apply = BalanceDelta::new(amount, EntrySource::Transaction)
                    .for_transaction(transaction_id);

                let new_balance = if target_account_id == old_account_id {
                    match &old_account {
                        Some(account) => Some(
                            engine
                                .apply_balance_deltas(db_tx, account, &[reversal, apply])
                                .await?,
                        ),
                        None => {
                            tracing::warn!(
                                transaction_id,
                                account_id = old_account_id,
                                "account missing, updating fields without reversal"
                            );
                            None
                        }
                    }
                } else {
                    let new_account = engine
                        .require_account(db_tx, caller, target_account_id)
                        .await?;
                    match &old_account {
                        Some(account) => {
                            engine
                                .apply_balance_deltas(db_tx, account, &[reversal])
                                .await?;
                        }
                        None => tracing::warn!(
                            transaction_id,
                            account_id = old_account_id,
                            "account missing, moving transaction without reversal"
                        ),
                    }
                    Some(
                        engine
                            .apply_balance_deltas(db_tx, &new_account, &[apply])
                            .await?,
                    )
                };

                let mut active = tx_model.into_active_model();
                active.account_id = ActiveValue::Set(target_account_id);
                active.amount = ActiveValue::Set(amount);
                active.description = ActiveValue::Set(description);
                active.category_id = ActiveValue::Set(cmd.category_id);
                active.transaction_date = ActiveValue::Set(cmd.transaction_date);
                active.merchant = ActiveValue::Set(merchant);
                active.payment_method = ActiveValue::Set(payment_method);
                active.notes = ActiveValue::Set(notes);
                active.update(db_tx).await?;

                tracing::info!(
                    user_id = caller.user_id(),
                    transaction_id,
                    account_id = target_account_id,
                    "transaction updated"
                );
                Ok(TransactionChange {
                    transaction_id,
                    account_id: target_account_id,
                    new_balance,
                })
            })
        })
        .await
    }
}
