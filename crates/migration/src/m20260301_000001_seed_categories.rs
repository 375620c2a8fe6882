//! Seeds the global categories. `General` must receive id 1: quick-add falls
//! back to it when no category name matches.

use sea_orm_migration::prelude::*;

use crate::m20260301_000000_init::Categories;

#[derive(DeriveMigrationName)]
pub struct Migration;

/// (name, type, color, icon, essential)
const GLOBAL_CATEGORIES: [(&str, &str, &str, &str, bool); 9] = [
    ("General", "Expense", "#6B7280", "tag", false),
    ("Salary", "Income", "#10B981", "briefcase", false),
    ("Groceries", "Expense", "#F59E0B", "shopping-cart", true),
    ("Coffee", "Expense", "#92400E", "coffee", false),
    ("Subscriptions", "Expense", "#8B5CF6", "repeat", false),
    ("Rent/Mortgage", "Expense", "#EF4444", "home", true),
    ("Transportation", "Expense", "#3B82F6", "car", true),
    ("Shopping", "Expense", "#EC4899", "shopping-bag", false),
    ("Balance Adjustment", "Expense", "#9CA3AF", "scale", false),
];

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let mut insert = Query::insert();
        insert.into_table(Categories::Table).columns([
            Categories::Name,
            Categories::Kind,
            Categories::Color,
            Categories::Icon,
            Categories::IsEssential,
            Categories::IsActive,
        ]);
        for (name, kind, color, icon, essential) in GLOBAL_CATEGORIES {
            insert
                .values([
                    name.into(),
                    kind.into(),
                    color.into(),
                    icon.into(),
                    essential.into(),
                    true.into(),
                ])
                .map_err(|err| DbErr::Migration(err.to_string()))?;
        }
        manager.exec_stmt(insert).await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let names: Vec<&str> = GLOBAL_CATEGORIES.iter().map(|(name, ..)| *name).collect();
        manager
            .exec_stmt(
                Query::delete()
                    .from_table(Categories::Table)
                    .and_where(Expr::col(Categories::UserId).is_null())
                    .and_where(Expr::col(Categories::Name).is_in(names))
                    .to_owned(),
            )
            .await
    }
}
