//! The balance-entry journal.
//!
//! Append-only: one row per balance change, never updated or deleted by the
//! engine. `accounts.balance` is the running sum of an account's entries.
//! `transaction_id` is a plain reference without a foreign key so that entries
//! outlive the transaction rows they describe.

use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use crate::EngineError;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntrySource {
    /// Opening balance given at account creation.
    Opening,
    /// A transaction row was created, or the new side of an edit.
    Transaction,
    /// Unwinding of a transaction on edit or delete.
    Reversal,
    TransferOut,
    TransferIn,
    /// Manual sync to an externally observed balance.
    Reconcile,
}

impl EntrySource {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Opening => "opening",
            Self::Transaction => "transaction",
            Self::Reversal => "reversal",
            Self::TransferOut => "transfer_out",
            Self::TransferIn => "transfer_in",
            Self::Reconcile => "reconcile",
        }
    }
}

impl TryFrom<&str> for EntrySource {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "opening" => Ok(Self::Opening),
            "transaction" => Ok(Self::Transaction),
            "reversal" => Ok(Self::Reversal),
            "transfer_out" => Ok(Self::TransferOut),
            "transfer_in" => Ok(Self::TransferIn),
            "reconcile" => Ok(Self::Reconcile),
            other => Err(EngineError::invalid(format!(
                "invalid balance entry source: {other}"
            ))),
        }
    }
}

/// One journaled balance change.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BalanceEntry {
    pub id: i32,
    pub account_id: i32,
    pub delta: f64,
    pub source: EntrySource,
    pub transaction_id: Option<i32>,
    pub created_at: DateTime<Utc>,
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "balance_entries")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub account_id: i32,
    pub user_id: i32,
    pub delta: f64,
    pub source: String,
    pub transaction_id: Option<i32>,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::accounts::Entity",
        from = "Column::AccountId",
        to = "super::accounts::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    Account,
}

impl Related<super::accounts::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Account.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl TryFrom<Model> for BalanceEntry {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: model.id,
            account_id: model.account_id,
            delta: model.delta,
            source: EntrySource::try_from(model.source.as_str())?,
            transaction_id: model.transaction_id,
            created_at: model.created_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn source_tags_parse_back() {
        for source in [
            EntrySource::Opening,
            EntrySource::Transaction,
            EntrySource::Reversal,
            EntrySource::TransferOut,
            EntrySource::TransferIn,
            EntrySource::Reconcile,
        ] {
            assert_eq!(EntrySource::try_from(source.as_str()), Ok(source));
        }
        assert!(EntrySource::try_from("refund").is_err());
    }
}
