use crate::{
    Caller, EntrySource, NewTransactionCmd, ResultEngine, TransactionDetail,
    balance::validate_amount,
    util::{normalize_optional_text, normalize_required},
};

use super::{
    super::{Engine, balances::BalanceDelta},
    TransactionRow, detail,
};

impl Engine {
    /// Records a transaction and applies its amount to the account.
    ///
    /// The account must be the caller's (`NotFound` otherwise) and the
    /// category must be global or the caller's (`InvalidInput` otherwise).
    pub async fn create_transaction(
        &self,
        caller: Caller,
        cmd: NewTransactionCmd,
    ) -> ResultEngine<TransactionDetail> {
        let amount = validate_amount(cmd.amount, "amount")?;
        let mut row = TransactionRow::new(
            cmd.account_id,
            cmd.category_id,
            amount,
            normalize_required(&cmd.description, "description")?,
            cmd.transaction_date,
        );
        row.merchant = normalize_optional_text(cmd.details.merchant.as_deref());
        row.payment_method = normalize_optional_text(cmd.details.payment_method.as_deref());
        row.notes = normalize_optional_text(cmd.details.notes.as_deref());

        self.with_tx("create_transaction", move |engine, db_tx| {
            Box::pin(async move {
                let account = engine
                    .require_account(db_tx, caller, row.account_id)
                    .await?;
                let category = engine
                    .require_visible_category(db_tx, caller, row.category_id)
                    .await?;

                let model = engine.insert_transaction(db_tx, caller, row).await?;
                let new_balance = engine
                    .apply_balance_deltas(
                        db_tx,
                        &account,
                        &[BalanceDelta::new(model.amount, EntrySource::Transaction)
                            .for_transaction(model.id)],
                    )
                    .await?;
                tracing::info!(
                    user_id = caller.user_id(),
                    account_id = account.id,
                    transaction_id = model.id,
                    new_balance,
                    "transaction created"
                );
                Ok(detail(model, account.name, Some(&category)))
            })
        })
        .await
    }
}
