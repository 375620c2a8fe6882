//! Categories: global (no owner, visible to everyone) or private to a user.
//!
//! Parent categories are referenced by id only.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

pub(crate) const DEFAULT_COLOR: &str = "#6B7280";
pub(crate) const DEFAULT_ICON: &str = "tag";
pub(crate) const DEFAULT_NAME: &str = "General";
/// Id of the seeded global `General` category, used when quick-add cannot
/// match a name.
pub(crate) const FALLBACK_CATEGORY_ID: i32 = 1;
pub(crate) const BALANCE_ADJUSTMENT_NAME: &str = "Balance Adjustment";

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Category {
    pub id: i32,
    /// `None` for global categories.
    pub user_id: Option<i32>,
    pub name: String,
    pub kind: String,
    pub color: Option<String>,
    pub icon: Option<String>,
    pub parent_category_id: Option<i32>,
    pub is_essential: bool,
}

impl Category {
    pub fn is_global(&self) -> bool {
        self.user_id.is_none()
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "categories")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub user_id: Option<i32>,
    pub name: String,
    pub kind: String,
    pub icon: Option<String>,
    pub color: Option<String>,
    pub parent_category_id: Option<i32>,
    pub is_essential: Option<bool>,
    pub is_active: Option<bool>,
    pub created_at: Option<DateTimeUtc>,
}

impl Model {
    pub(crate) fn display_color(&self) -> String {
        self.color.clone().unwrap_or_else(|| DEFAULT_COLOR.to_string())
    }

    pub(crate) fn display_icon(&self) -> String {
        self.icon.clone().unwrap_or_else(|| DEFAULT_ICON.to_string())
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

impl From<Model> for Category {
    fn from(model: Model) -> Self {
        Self {
            id: model.id,
            user_id: model.user_id,
            name: model.name,
            kind: model.kind,
            color: model.color,
            icon: model.icon,
            parent_category_id: model.parent_category_id,
            is_essential: model.is_essential.unwrap_or(false),
        }
    }
}
