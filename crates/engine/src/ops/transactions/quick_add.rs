use chrono::NaiveDate;
use sea_orm::{Condition, QueryFilter, QueryOrder, prelude::*};

use crate::{
    Caller, EngineError, EntrySource, QuickAddCmd, ResultEngine, TransactionDetail, accounts,
    balance::validate_amount,
    categories::{self, FALLBACK_CATEGORY_ID},
    util::{normalize_optional_text, normalize_required},
};

use super::{
    super::{Engine, balances::BalanceDelta},
    TransactionRow, detail,
};

impl Engine {
    /// Records a transaction on the caller's first active account, dated
    /// `today`.
    ///
    /// The category is matched by exact name among global and private
    /// categories; without a match the seeded `General` category is used.
    pub async fn quick_add(
        &self,
        caller: Caller,
        cmd: QuickAddCmd,
        today: NaiveDate,
    ) -> ResultEngine<TransactionDetail> {
        let amount = validate_amount(cmd.amount, "amount")?;
        let description = normalize_required(&cmd.description, "description")?;
        let category_name = normalize_optional_text(cmd.category_name.as_deref());

        self.with_tx("quick_add", move |engine, db_tx| {
            Box::pin(async move {
                let account = accounts::Entity::find()
                    .filter(accounts::Column::UserId.eq(caller.user_id()))
                    .filter(
                        Condition::any()
                            .add(accounts::Column::IsActive.is_null())
                            .add(accounts::Column::IsActive.eq(true)),
                    )
                    .order_by_asc(accounts::Column::Id)
                    .one(db_tx)
                    .await?
                    .ok_or_else(|| EngineError::invalid("No active account found."))?;

                let matched = match category_name.as_deref() {
                    Some(name) => {
                        engine
                            .find_visible_category_by_name(db_tx, caller, name)
                            .await?
                    }
                    None => None,
                };
                let category = match matched {
                    Some(category) => Some(category),
                    None => {
                        categories::Entity::find_by_id(FALLBACK_CATEGORY_ID)
                            .one(db_tx)
                            .await?
                    }
                };
                let category_id = category.as_ref().map_or(FALLBACK_CATEGORY_ID, |c| c.id);

                let row = TransactionRow::new(account.id, category_id, amount, description, today);
                let model = engine.insert_transaction(db_tx, caller, row).await?;
                engine
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
                    category_id,
                    "quick-add recorded"
                );
                Ok(detail(model, account.name, category.as_ref()))
            })
        })
        .await
    }
}
