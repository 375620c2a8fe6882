//! The module contains the `Account` struct and its table.

use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// An account.
///
/// An account is a named place where money is kept: a wallet, a bank account,
/// a card. Its `balance` is a cache of everything ever applied to it and is
/// only written through the balance journal.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Account {
    pub id: i32,
    pub name: String,
    /// Free-form type tag (`Cash`, `Bank`, `Credit Card`, ...).
    pub kind: String,
    pub balance: f64,
    pub currency: String,
    pub color: Option<String>,
    pub icon: Option<String>,
    pub account_number: Option<String>,
    pub institution: Option<String>,
    pub is_active: bool,
    pub include_in_total: bool,
    pub created_at: Option<DateTime<Utc>>,
}

impl Account {
    /// Whether the account counts toward the caller's net worth.
    pub fn counts_in_total(&self) -> bool {
        self.is_active && self.include_in_total
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "accounts")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub user_id: i32,
    pub name: String,
    pub kind: String,
    pub balance: Option<f64>,
    pub currency: Option<String>,
    pub account_number: Option<String>,
    pub institution: Option<String>,
    pub color: Option<String>,
    pub icon: Option<String>,
    pub is_active: Option<bool>,
    pub include_in_total: Option<bool>,
    pub created_at: Option<DateTimeUtc>,
    pub updated_at: Option<DateTimeUtc>,
}

impl Model {
    /// Rows with a null `is_active` predate the flag and count as active.
    pub fn active(&self) -> bool {
        self.is_active.unwrap_or(true)
    }
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::UserId",
        to = "super::users::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    User,
    #[sea_orm(has_many = "super::transactions::Entity")]
    Transactions,
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl Related<super::transactions::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Transactions.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for Account {
    fn from(model: Model) -> Self {
        let is_active = model.active();
        Self {
            id: model.id,
            name: model.name,
            kind: model.kind,
            balance: model.balance.unwrap_or(0.0),
            currency: model.currency.unwrap_or_else(|| "USD".to_string()),
            color: model.color,
            icon: model.icon,
            account_number: model.account_number,
            institution: model.institution,
            is_active,
            include_in_total: model.include_in_total.unwrap_or(true),
            created_at: model.created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn model() -> Model {
        Model {
            id: 1,
            user_id: 1,
            name: "Cash".to_string(),
            kind: "Cash".to_string(),
            balance: None,
            currency: None,
            account_number: None,
            institution: None,
            color: None,
            icon: None,
            is_active: None,
            include_in_total: None,
            created_at: None,
            updated_at: None,
        }
    }

    #[test]
    fn null_columns_take_defaults() {
        let account = Account::from(model());
        assert_eq!(account.balance, 0.0);
        assert_eq!(account.currency, "USD");
        assert!(account.is_active);
        assert!(account.counts_in_total());
    }

    #[test]
    fn tracking_only_accounts_are_excluded_from_total() {
        let mut m = model();
        m.include_in_total = Some(false);
        assert!(!Account::from(m).counts_in_total());

        let mut m = model();
        m.is_active = Some(false);
        assert!(!Account::from(m).counts_in_total());
    }
}
