use std::collections::HashMap;

use chrono::{Datelike, NaiveDate, Utc};
use sea_orm::{
    ActiveValue, Condition, IntoActiveModel, QueryFilter, QueryOrder, prelude::*,
};

use crate::{
    Bill, BillPayment, BillSkip, Caller, EngineError, EntrySource, NewBillCmd, ResultEngine,
    UpcomingBill, balance::validate_amount, bills, categories,
    util::{advance_one_month, normalize_optional_text, normalize_required},
};

use super::{Engine, access::visible_to, balances::BalanceDelta, transactions::TransactionRow};

impl Engine {
    /// Creates a recurring bill. The due day is taken from `due_date`.
    pub async fn create_bill(&self, caller: Caller, cmd: NewBillCmd) -> ResultEngine<Bill> {
        let name = normalize_required(&cmd.name, "bill name")?;
        let amount = validate_amount(cmd.amount, "amount")?;
        if amount <= 0.0 {
            return Err(EngineError::invalid("Amount must be greater than 0"));
        }
        let frequency = normalize_optional_text(cmd.frequency.as_deref())
            .unwrap_or_else(|| bills::DEFAULT_FREQUENCY.to_string());

        self.with_tx("create_bill", move |engine, db_tx| {
            Box::pin(async move {
                engine
                    .require_visible_category(db_tx, caller, cmd.category_id)
                    .await?;
                let model = bills::ActiveModel {
                    user_id: ActiveValue::Set(caller.user_id()),
                    category_id: ActiveValue::Set(cmd.category_id),
                    name: ActiveValue::Set(name),
                    amount: ActiveValue::Set(amount),
                    due_day: ActiveValue::Set(cmd.due_date.day() as i32),
                    frequency: ActiveValue::Set(Some(frequency)),
                    next_due_date: ActiveValue::Set(cmd.due_date),
                    is_active: ActiveValue::Set(Some(true)),
                    auto_pay: ActiveValue::Set(Some(cmd.auto_pay)),
                    created_at: ActiveValue::Set(Some(Utc::now())),
                    ..Default::default()
                }
                .insert(db_tx)
                .await?;
                tracing::info!(user_id = caller.user_id(), bill_id = model.id, "bill created");
                Ok(Bill::from(model))
            })
        })
        .await
    }

    /// Pays a bill from one of the caller's accounts.
    ///
    /// Writes an outflow transaction of the bill amount dated `today`, applies
    /// it to the account and advances the due date by one calendar month,
    /// whatever the bill's frequency tag says.
    pub async fn pay_bill(
        &self,
        caller: Caller,
        bill_id: i32,
        account_id: i32,
        today: NaiveDate,
    ) -> ResultEngine<BillPayment> {
        self.with_tx("pay_bill", move |engine, db_tx| {
            Box::pin(async move {
                let bill = engine.require_bill(db_tx, caller, bill_id).await?;
                let account = engine.require_account(db_tx, caller, account_id).await?;

                let next_due_date = advance_one_month(bill.next_due_date)?;
                let row = TransactionRow::new(
                    account.id,
                    bill.category_id,
                    -bill.amount,
                    format!("Bill Paid: {}", bill.name),
                    today,
                );
                let model = engine.insert_transaction(db_tx, caller, row).await?;
                let new_balance = engine
                    .apply_balance_deltas(
                        db_tx,
                        &account,
                        &[BalanceDelta::new(model.amount, EntrySource::Transaction)
                            .for_transaction(model.id)],
                    )
                    .await?;

                let mut active = bill.into_active_model();
                active.next_due_date = ActiveValue::Set(next_due_date);
                active.update(db_tx).await?;

                tracing::info!(
                    user_id = caller.user_id(),
                    bill_id,
                    account_id,
                    transaction_id = model.id,
                    %next_due_date,
                    "bill paid"
                );
                Ok(BillPayment {
                    transaction_id: model.id,
                    new_balance,
                    next_due_date,
                })
            })
        })
        .await
    }

    /// Advances a bill's due date by one calendar month without paying it.
    pub async fn skip_bill(&self, caller: Caller, bill_id: i32) -> ResultEngine<BillSkip> {
        self.with_tx("skip_bill", move |engine, db_tx| {
            Box::pin(async move {
                let bill = engine.require_bill(db_tx, caller, bill_id).await?;
                let skipped_due_date = bill.next_due_date;
                let next_due_date = advance_one_month(skipped_due_date)?;

                let mut active = bill.into_active_model();
                active.next_due_date = ActiveValue::Set(next_due_date);
                active.update(db_tx).await?;

                tracing::info!(user_id = caller.user_id(), bill_id, %next_due_date, "bill skipped");
                Ok(BillSkip {
                    skipped_due_date,
                    next_due_date,
                })
            })
        })
        .await
    }

    /// Active bills ordered by due date, with days left relative to `today`.
    pub async fn upcoming_bills(
        &self,
        caller: Caller,
        today: NaiveDate,
    ) -> ResultEngine<Vec<UpcomingBill>> {
        let models = bills::Entity::find()
            .filter(bills::Column::UserId.eq(caller.user_id()))
            .filter(
                Condition::any()
                    .add(bills::Column::IsActive.is_null())
                    .add(bills::Column::IsActive.eq(true)),
            )
            .order_by_asc(bills::Column::NextDueDate)
            .order_by_asc(bills::Column::Id)
            .all(&self.database)
            .await?;
        let category_names: HashMap<i32, String> = categories::Entity::find()
            .filter(visible_to(caller))
            .all(&self.database)
            .await?
            .into_iter()
            .map(|category| (category.id, category.name))
            .collect();

        Ok(models
            .into_iter()
            .map(|model| {
                let category_name = category_names
                    .get(&model.category_id)
                    .cloned()
                    .unwrap_or_else(|| categories::DEFAULT_NAME.to_string());
                let bill = Bill::from(model);
                UpcomingBill {
                    id: bill.id,
                    days_until_due: bill.days_until_due(today),
                    is_overdue: bill.is_overdue(today),
                    name: bill.name,
                    amount: bill.amount,
                    due_date: bill.next_due_date,
                    category_name,
                }
            })
            .collect())
    }
}
