use chrono::NaiveDate;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// A savings goal. Progress is tracked by hand; goals are not linked to
/// transactions.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SavingsGoal {
    pub id: i32,
    pub name: String,
    pub target_amount: f64,
    pub current_amount: f64,
    pub target_date: Option<NaiveDate>,
    pub is_completed: bool,
}

impl SavingsGoal {
    /// Share of the target reached, in percent. Zero for a non-positive target.
    pub fn progress_percentage(&self) -> f64 {
        if self.target_amount > 0.0 {
            self.current_amount / self.target_amount * 100.0
        } else {
            0.0
        }
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "savings_goals")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub user_id: i32,
    pub name: String,
    pub target_amount: f64,
    pub current_amount: Option<f64>,
    pub target_date: Option<Date>,
    pub is_completed: Option<bool>,
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
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for SavingsGoal {
    fn from(model: Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            target_amount: model.target_amount,
            current_amount: model.current_amount.unwrap_or(0.0),
            target_date: model.target_date,
            is_completed: model.is_completed.unwrap_or(false),
        }
    }
}
