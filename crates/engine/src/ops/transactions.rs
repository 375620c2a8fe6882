use chrono::{NaiveDate, Utc};
use sea_orm::{ActiveValue, DatabaseTransaction, prelude::*};

use crate::{Caller, ResultEngine, TransactionDetail, categories, reports::CategoryLabel, transactions};

use super::Engine;

mod create;
mod delete;
mod list;
mod quick_add;
mod update;

pub use list::TransactionListFilter;

/// Column values for a new transaction row, already validated.
pub(super) struct TransactionRow {
    pub account_id: i32,
    pub category_id: i32,
    pub amount: f64,
    pub description: String,
    pub transaction_date: NaiveDate,
    pub merchant: Option<String>,
    pub payment_method: Option<String>,
    pub notes: Option<String>,
}

impl TransactionRow {
    pub(super) fn new(
        account_id: i32,
        category_id: i32,
        amount: f64,
        description: String,
        transaction_date: NaiveDate,
    ) -> Self {
        Self {
            account_id,
            category_id,
            amount,
            description,
            transaction_date,
            merchant: None,
            payment_method: None,
            notes: None,
        }
    }
}

impl Engine {
    /// Inserts a transaction row. Does not touch balances.
    pub(super) async fn insert_transaction(
        &self,
        db_tx: &DatabaseTransaction,
        caller: Caller,
        row: TransactionRow,
    ) -> ResultEngine<transactions::Model> {
        let model = transactions::ActiveModel {
            user_id: ActiveValue::Set(caller.user_id()),
            account_id: ActiveValue::Set(row.account_id),
            category_id: ActiveValue::Set(row.category_id),
            amount: ActiveValue::Set(row.amount),
            description: ActiveValue::Set(row.description),
            transaction_date: ActiveValue::Set(row.transaction_date),
            merchant: ActiveValue::Set(row.merchant),
            payment_method: ActiveValue::Set(row.payment_method),
            notes: ActiveValue::Set(row.notes),
            created_at: ActiveValue::Set(Some(Utc::now())),
            ..Default::default()
        }
        .insert(db_tx)
        .await?;
        Ok(model)
    }
}

/// Joins a transaction row with its account name and category label.
pub(super) fn detail(
    model: transactions::Model,
    account_name: String,
    category: Option<&categories::Model>,
) -> TransactionDetail {
    let label = category.map(CategoryLabel::from).unwrap_or_default();
    TransactionDetail {
        id: model.id,
        account_id: model.account_id,
        account_name,
        amount: model.amount,
        description: model.description,
        category_id: model.category_id,
        category_name: label.name,
        category_color: label.color,
        category_icon: label.icon,
        transaction_date: model.transaction_date,
        created_at: model.created_at,
        merchant: model.merchant,
        payment_method: model.payment_method,
        notes: model.notes,
    }
}
