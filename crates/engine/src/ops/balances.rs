//! The single write path for account balances.
//!
//! `accounts.balance` is never assigned anywhere else: each change appends a
//! `balance_entries` row and rewrites the projection in the same unit of work.

use chrono::Utc;
use sea_orm::{ActiveValue, DatabaseTransaction, QueryFilter, QueryOrder, prelude::*};

use crate::{
    BalanceAudit, BalanceEntry, EntrySource, ResultEngine, accounts, balance::accumulate,
    balance::replay, balance_entries,
};

use super::{Caller, Engine};

/// A signed change to journal against one account.
#[derive(Clone, Copy, Debug)]
pub(crate) struct BalanceDelta {
    pub delta: f64,
    pub source: EntrySource,
    pub transaction_id: Option<i32>,
}

impl BalanceDelta {
    pub(crate) fn new(delta: f64, source: EntrySource) -> Self {
        Self {
            delta,
            source,
            transaction_id: None,
        }
    }

    pub(crate) fn for_transaction(mut self, transaction_id: i32) -> Self {
        self.transaction_id = Some(transaction_id);
        self
    }
}

impl Engine {
    /// Applies `deltas`, in order, to an account loaded inside `db_tx`.
    ///
    /// Returns the new balance.
    pub(crate) async fn apply_balance_deltas(
        &self,
        db_tx: &DatabaseTransaction,
        account: &accounts::Model,
        deltas: &[BalanceDelta],
    ) -> ResultEngine<f64> {
        let mut balance = account.balance;
        for delta in deltas {
            balance = Some(accumulate(balance, delta.delta));
            self.append_entry(db_tx, account, delta).await?;
        }
        let new_balance = balance.unwrap_or(0.0);
        if !deltas.is_empty() {
            self.write_projection(db_tx, account.id, new_balance).await?;
        }
        Ok(new_balance)
    }

    /// Sets the balance to `target`, journaling the difference as a
    /// reconciliation entry.
    pub(crate) async fn overwrite_balance(
        &self,
        db_tx: &DatabaseTransaction,
        account: &accounts::Model,
        target: f64,
        transaction_id: Option<i32>,
    ) -> ResultEngine<f64> {
        let difference = target - account.balance.unwrap_or(0.0);
        let delta = BalanceDelta {
            delta: difference,
            source: EntrySource::Reconcile,
            transaction_id,
        };
        self.append_entry(db_tx, account, &delta).await?;
        self.write_projection(db_tx, account.id, target).await?;
        Ok(target)
    }

    async fn append_entry(
        &self,
        db_tx: &DatabaseTransaction,
        account: &accounts::Model,
        delta: &BalanceDelta,
    ) -> ResultEngine<()> {
        balance_entries::ActiveModel {
            account_id: ActiveValue::Set(account.id),
            user_id: ActiveValue::Set(account.user_id),
            delta: ActiveValue::Set(delta.delta),
            source: ActiveValue::Set(delta.source.as_str().to_string()),
            transaction_id: ActiveValue::Set(delta.transaction_id),
            created_at: ActiveValue::Set(Utc::now()),
            ..Default::default()
        }
        .insert(db_tx)
        .await?;
        Ok(())
    }

    async fn write_projection(
        &self,
        db_tx: &DatabaseTransaction,
        account_id: i32,
        balance: f64,
    ) -> ResultEngine<()> {
        accounts::ActiveModel {
            id: ActiveValue::Unchanged(account_id),
            balance: ActiveValue::Set(Some(balance)),
            updated_at: ActiveValue::Set(Some(Utc::now())),
            ..Default::default()
        }
        .update(db_tx)
        .await?;
        tracing::debug!(account_id, balance, "balance written");
        Ok(())
    }

    /// The journal of one of the caller's accounts, oldest first.
    pub async fn balance_entries(
        &self,
        caller: Caller,
        account_id: i32,
    ) -> ResultEngine<Vec<BalanceEntry>> {
        self.require_account(&self.database, caller, account_id)
            .await?;
        balance_entries::Entity::find()
            .filter(balance_entries::Column::AccountId.eq(account_id))
            .order_by_asc(balance_entries::Column::Id)
            .all(&self.database)
            .await?
            .into_iter()
            .map(BalanceEntry::try_from)
            .collect()
    }

    /// Replays an account's journal and compares it with the cached balance.
    pub async fn audit_account(&self, caller: Caller, account_id: i32) -> ResultEngine<BalanceAudit> {
        let account = self
            .require_account(&self.database, caller, account_id)
            .await?;
        let deltas: Vec<f64> = balance_entries::Entity::find()
            .filter(balance_entries::Column::AccountId.eq(account_id))
            .order_by_asc(balance_entries::Column::Id)
            .all(&self.database)
            .await?
            .into_iter()
            .map(|entry| entry.delta)
            .collect();

        let audit = BalanceAudit {
            account_id,
            cached: account.balance.unwrap_or(0.0),
            replayed: replay(deltas.iter().copied()),
            entries: deltas.len(),
        };
        if !audit.is_consistent() {
            tracing::warn!(
                account_id,
                cached = audit.cached,
                replayed = audit.replayed,
                "cached balance drifted from journal"
            );
        }
        Ok(audit)
    }
}
