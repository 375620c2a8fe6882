//! Recurring bills.

use chrono::NaiveDate;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

pub(crate) const DEFAULT_FREQUENCY: &str = "Monthly";

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Bill {
    pub id: i32,
    pub name: String,
    pub amount: f64,
    pub category_id: i32,
    pub due_day: i32,
    /// Informational tag. Paying or skipping always advances one month.
    pub frequency: String,
    pub next_due_date: NaiveDate,
    pub is_active: bool,
    pub auto_pay: bool,
}

impl Bill {
    /// Signed whole days from `today` to the due date; negative when overdue.
    pub fn days_until_due(&self, today: NaiveDate) -> i64 {
        (self.next_due_date - today).num_days()
    }

    pub fn is_overdue(&self, today: NaiveDate) -> bool {
        self.next_due_date < today
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "bills")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub user_id: i32,
    pub category_id: i32,
    pub name: String,
    pub amount: f64,
    pub due_day: i32,
    pub frequency: Option<String>,
    pub next_due_date: Date,
    pub is_active: Option<bool>,
    pub auto_pay: Option<bool>,
    pub reminder_days: Option<i32>,
    pub created_at: Option<DateTimeUtc>,
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
    #[sea_orm(
        belongs_to = "super::categories::Entity",
        from = "Column::CategoryId",
        to = "super::categories::Column::Id",
        on_update = "NoAction",
        on_delete = "Restrict"
    )]
    Category,
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl Related<super::categories::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Category.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for Bill {
    fn from(model: Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            amount: model.amount,
            category_id: model.category_id,
            due_day: model.due_day,
            frequency: model
                .frequency
                .unwrap_or_else(|| DEFAULT_FREQUENCY.to_string()),
            next_due_date: model.next_due_date,
            is_active: model.is_active.unwrap_or(true),
            auto_pay: model.auto_pay.unwrap_or(false),
        }
    }
}
