use std::collections::HashMap;

use chrono::{Duration, NaiveDate};
use sea_orm::{Condition, ConnectionTrait, QueryFilter, QueryOrder, QuerySelect, prelude::*};

use crate::{
    Caller, EngineError, FlowSummary, ResultEngine, TransactionDetail, accounts, categories,
    transactions, util::month_bounds,
};

use super::{
    super::{Engine, access::visible_to},
    detail,
};

/// Filters for listing transactions.
///
/// `from` and `to` are both inclusive dates.
#[derive(Clone, Debug, Default)]
pub struct TransactionListFilter {
    pub account_id: Option<i32>,
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
    /// Case-insensitive substring of the description or the notes.
    pub query: Option<String>,
    pub limit: Option<u64>,
}

impl TransactionListFilter {
    /// Restrict to one calendar month.
    pub fn month(mut self, year: i32, month: u32) -> ResultEngine<Self> {
        let (start, end) = month_bounds(year, month)?;
        self.from = Some(start);
        self.to = Some(end - Duration::days(1));
        Ok(self)
    }
}

fn validate_list_filter(filter: &TransactionListFilter) -> ResultEngine<()> {
    if let (Some(from), Some(to)) = (filter.from, filter.to)
        && from > to
    {
        return Err(EngineError::invalid("invalid range: from must be <= to"));
    }
    if filter.limit == Some(0) {
        return Err(EngineError::invalid("limit must be > 0"));
    }
    Ok(())
}

trait ApplyTxFilters: QueryFilter + Sized {
    fn apply_tx_filters(self, filter: &TransactionListFilter) -> Self;
}

impl<T> ApplyTxFilters for T
where
    T: QueryFilter + Sized,
{
    fn apply_tx_filters(mut self, filter: &TransactionListFilter) -> Self {
        if let Some(account_id) = filter.account_id {
            self = self.filter(transactions::Column::AccountId.eq(account_id));
        }
        if let Some(from) = filter.from {
            self = self.filter(transactions::Column::TransactionDate.gte(from));
        }
        if let Some(to) = filter.to {
            self = self.filter(transactions::Column::TransactionDate.lte(to));
        }
        if let Some(query) = filter.query.as_deref().filter(|q| !q.trim().is_empty()) {
            let query = query.trim();
            self = self.filter(
                Condition::any()
                    .add(transactions::Column::Description.contains(query))
                    .add(transactions::Column::Notes.contains(query)),
            );
        }
        self
    }
}

impl Engine {
    /// Lists the caller's transactions, newest first.
    pub async fn list_transactions(
        &self,
        caller: Caller,
        filter: TransactionListFilter,
    ) -> ResultEngine<Vec<TransactionDetail>> {
        validate_list_filter(&filter)?;
        let mut query = transactions::Entity::find()
            .filter(transactions::Column::UserId.eq(caller.user_id()))
            .apply_tx_filters(&filter)
            .order_by_desc(transactions::Column::TransactionDate)
            .order_by_desc(transactions::Column::Id);
        if let Some(limit) = filter.limit {
            query = query.limit(limit);
        }
        let models = query.all(&self.database).await?;
        self.with_labels(&self.database, caller, models).await
    }

    /// The `count` most recent transactions (by date).
    pub async fn recent_transactions(
        &self,
        caller: Caller,
        count: u64,
    ) -> ResultEngine<Vec<TransactionDetail>> {
        self.list_transactions(
            caller,
            TransactionListFilter {
                limit: Some(count),
                ..Default::default()
            },
        )
        .await
    }

    pub async fn transaction_detail(
        &self,
        caller: Caller,
        transaction_id: i32,
    ) -> ResultEngine<TransactionDetail> {
        let model = self
            .require_transaction(&self.database, caller, transaction_id)
            .await?;
        let mut details = self.with_labels(&self.database, caller, vec![model]).await?;
        details
            .pop()
            .ok_or_else(|| EngineError::not_found(&format!("transaction {transaction_id}")))
    }

    /// Income, expenses and net over an optional inclusive date window.
    pub async fn transaction_summary(
        &self,
        caller: Caller,
        from: Option<NaiveDate>,
        to: Option<NaiveDate>,
    ) -> ResultEngine<FlowSummary> {
        let filter = TransactionListFilter {
            from,
            to,
            ..Default::default()
        };
        validate_list_filter(&filter)?;
        let amounts: Vec<f64> = transactions::Entity::find()
            .filter(transactions::Column::UserId.eq(caller.user_id()))
            .apply_tx_filters(&filter)
            .all(&self.database)
            .await?
            .into_iter()
            .map(|model| model.amount)
            .collect();
        Ok(FlowSummary::from_amounts(amounts))
    }

    /// Denormalizes rows with account names and category labels.
    pub(crate) async fn with_labels<C: ConnectionTrait>(
        &self,
        db: &C,
        caller: Caller,
        models: Vec<transactions::Model>,
    ) -> ResultEngine<Vec<TransactionDetail>> {
        if models.is_empty() {
            return Ok(Vec::new());
        }
        let account_names: HashMap<i32, String> = accounts::Entity::find()
            .filter(accounts::Column::UserId.eq(caller.user_id()))
            .all(db)
            .await?
            .into_iter()
            .map(|account| (account.id, account.name))
            .collect();
        let categories: HashMap<i32, categories::Model> = categories::Entity::find()
            .filter(visible_to(caller))
            .all(db)
            .await?
            .into_iter()
            .map(|category| (category.id, category))
            .collect();

        Ok(models
            .into_iter()
            .map(|model| {
                let account_name = account_names
                    .get(&model.account_id)
                    .cloned()
                    .unwrap_or_default();
                let category = categories.get(&model.category_id);
                detail(model, account_name, category)
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn month_filter_covers_whole_month() {
        let filter = TransactionListFilter::default().month(2024, 2).unwrap();
        assert_eq!(filter.from, NaiveDate::from_ymd_opt(2024, 2, 1));
        assert_eq!(filter.to, NaiveDate::from_ymd_opt(2024, 2, 29));
    }

    #[test]
    fn inverted_ranges_are_rejected() {
        let filter = TransactionListFilter {
            from: NaiveDate::from_ymd_opt(2024, 3, 2),
            to: NaiveDate::from_ymd_opt(2024, 3, 1),
            ..Default::default()
        };
        assert!(validate_list_filter(&filter).is_err());
        assert!(validate_list_filter(&TransactionListFilter::default()).is_ok());
    }
}
