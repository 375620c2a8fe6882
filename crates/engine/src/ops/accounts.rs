use chrono::Utc;
use sea_orm::{ActiveValue, Condition, IntoActiveModel, QueryFilter, QueryOrder, prelude::*};

use crate::{
    Account, Caller, EntrySource, NewAccountCmd, ResultEngine, accounts,
    balance::validate_amount,
    util::{normalize_optional_text, normalize_required},
};

use super::{Engine, balances::BalanceDelta};

const DEFAULT_CURRENCY: &str = "USD";
const DEFAULT_COLOR: &str = "#3B82F6";
const DEFAULT_ICON: &str = "wallet";

impl Engine {
    /// Opens an account. A non-zero opening balance is journaled as an
    /// `opening` entry so the cached balance stays replayable.
    pub async fn create_account(&self, caller: Caller, cmd: NewAccountCmd) -> ResultEngine<Account> {
        let name = normalize_required(&cmd.name, "account name")?;
        let kind = normalize_required(&cmd.kind, "account type")?;
        let opening_balance = validate_amount(cmd.opening_balance, "opening balance")?;
        let currency = normalize_optional_text(cmd.currency.as_deref())
            .map_or_else(|| DEFAULT_CURRENCY.to_string(), |c| c.to_uppercase());
        let color =
            normalize_optional_text(cmd.color.as_deref()).unwrap_or_else(|| DEFAULT_COLOR.to_string());
        let icon =
            normalize_optional_text(cmd.icon.as_deref()).unwrap_or_else(|| DEFAULT_ICON.to_string());
        let account_number = normalize_optional_text(cmd.account_number.as_deref());
        let institution = normalize_optional_text(cmd.institution.as_deref());

        self.with_tx("create_account", move |engine, db_tx| {
            Box::pin(async move {
                let now = Utc::now();
                let model = accounts::ActiveModel {
                    user_id: ActiveValue::Set(caller.user_id()),
                    name: ActiveValue::Set(name),
                    kind: ActiveValue::Set(kind),
                    balance: ActiveValue::Set(Some(0.0)),
                    currency: ActiveValue::Set(Some(currency)),
                    account_number: ActiveValue::Set(account_number),
                    institution: ActiveValue::Set(institution),
                    color: ActiveValue::Set(Some(color)),
                    icon: ActiveValue::Set(Some(icon)),
                    is_active: ActiveValue::Set(Some(true)),
                    include_in_total: ActiveValue::Set(Some(cmd.include_in_total)),
                    created_at: ActiveValue::Set(Some(now)),
                    updated_at: ActiveValue::Set(Some(now)),
                    ..Default::default()
                }
                .insert(db_tx)
                .await?;

                let mut account = Account::from(model.clone());
                if opening_balance != 0.0 {
                    account.balance = engine
                        .apply_balance_deltas(
                            db_tx,
                            &model,
                            &[BalanceDelta::new(opening_balance, EntrySource::Opening)],
                        )
                        .await?;
                }
                tracing::info!(
                    user_id = caller.user_id(),
                    account_id = account.id,
                    opening_balance,
                    "account created"
                );
                Ok(account)
            })
        })
        .await
    }

    /// Active accounts of the caller, by id.
    pub async fn list_accounts(&self, caller: Caller) -> ResultEngine<Vec<Account>> {
        let models = accounts::Entity::find()
            .filter(accounts::Column::UserId.eq(caller.user_id()))
            .filter(
                Condition::any()
                    .add(accounts::Column::IsActive.is_null())
                    .add(accounts::Column::IsActive.eq(true)),
            )
            .order_by_asc(accounts::Column::Id)
            .all(&self.database)
            .await?;
        Ok(models.into_iter().map(Account::from).collect())
    }

    /// One of the caller's accounts, active or not.
    pub async fn account(&self, caller: Caller, account_id: i32) -> ResultEngine<Account> {
        self.require_account(&self.database, caller, account_id)
            .await
            .map(Account::from)
    }

    /// Soft-deletes an account. Its balance and history are kept.
    pub async fn deactivate_account(&self, caller: Caller, account_id: i32) -> ResultEngine<()> {
        self.with_tx("deactivate_account", move |engine, db_tx| {
            Box::pin(async move {
                let model = engine.require_account(db_tx, caller, account_id).await?;
                let mut active = model.into_active_model();
                active.is_active = ActiveValue::Set(Some(false));
                active.updated_at = ActiveValue::Set(Some(Utc::now()));
                active.update(db_tx).await?;
                tracing::info!(user_id = caller.user_id(), account_id, "account deactivated");
                Ok(())
            })
        })
        .await
    }
}
