use crate::{
    Caller, EngineError, EntrySource, ResultEngine, TransferCmd, TransferOutcome,
    balance::validate_amount,
};

use super::{Engine, balances::BalanceDelta};

impl Engine {
    /// Moves `amount` from one of the caller's accounts to another.
    ///
    /// No transaction rows are written; the movement is journaled as a
    /// `transfer_out`/`transfer_in` pair. The source may not go below zero.
    pub async fn transfer(&self, caller: Caller, cmd: TransferCmd) -> ResultEngine<TransferOutcome> {
        if cmd.from_account_id == cmd.to_account_id {
            return Err(EngineError::invalid(
                "source and destination accounts must differ",
            ));
        }
        let amount = validate_amount(cmd.amount, "amount")?;
        if amount <= 0.0 {
            return Err(EngineError::invalid("transfer amount must be > 0"));
        }

        self.with_tx("transfer", move |engine, db_tx| {
            Box::pin(async move {
                let source = engine
                    .require_account(db_tx, caller, cmd.from_account_id)
                    .await?;
                let destination = engine
                    .require_account(db_tx, caller, cmd.to_account_id)
                    .await?;

                let available = source.balance.unwrap_or(0.0);
                if available < amount {
                    return Err(EngineError::InsufficientFunds(format!(
                        "account {} holds {available}, transfer needs {amount}",
                        source.id
                    )));
                }

                let from_balance = engine
                    .apply_balance_deltas(
                        db_tx,
                        &source,
                        &[BalanceDelta::new(-amount, EntrySource::TransferOut)],
                    )
                    .await?;
                let to_balance = engine
                    .apply_balance_deltas(
                        db_tx,
                        &destination,
                        &[BalanceDelta::new(amount, EntrySource::TransferIn)],
                    )
                    .await?;
                tracing::info!(
                    user_id = caller.user_id(),
                    from_account_id = source.id,
                    to_account_id = destination.id,
                    amount,
                    "transfer applied"
                );
                Ok(TransferOutcome {
                    from_balance,
                    to_balance,
                })
            })
        })
        .await
    }
}
