use chrono::Utc;
use sea_orm::{ActiveValue, PaginatorTrait, QueryFilter, QueryOrder, prelude::*};

use crate::{
    Caller, Category, CategoryStat, EngineError, NewCategoryCmd, ResultEngine, bills, budgets,
    categories, reports, transactions,
    util::{normalize_optional_text, normalize_required},
};

use super::{Engine, access::visible_to};

const DEFAULT_KIND: &str = "Expense";

impl Engine {
    /// Global categories plus the caller's own, ordered by name.
    pub async fn list_categories(&self, caller: Caller) -> ResultEngine<Vec<Category>> {
        let models = categories::Entity::find()
            .filter(visible_to(caller))
            .order_by_asc(categories::Column::Name)
            .order_by_asc(categories::Column::Id)
            .all(&self.database)
            .await?;
        Ok(models.into_iter().map(Category::from).collect())
    }

    /// Creates a private category.
    pub async fn create_category(
        &self,
        caller: Caller,
        cmd: NewCategoryCmd,
    ) -> ResultEngine<Category> {
        let name = normalize_required(&cmd.name, "category name")?;
        let kind =
            normalize_optional_text(cmd.kind.as_deref()).unwrap_or_else(|| DEFAULT_KIND.to_string());
        let color = normalize_optional_text(cmd.color.as_deref())
            .unwrap_or_else(|| categories::DEFAULT_COLOR.to_string());
        let icon = normalize_optional_text(cmd.icon.as_deref())
            .unwrap_or_else(|| categories::DEFAULT_ICON.to_string());

        self.with_tx("create_category", move |engine, db_tx| {
            Box::pin(async move {
                if let Some(parent_id) = cmd.parent_category_id {
                    engine
                        .require_visible_category(db_tx, caller, parent_id)
                        .await?;
                }
                let model = categories::ActiveModel {
                    user_id: ActiveValue::Set(Some(caller.user_id())),
                    name: ActiveValue::Set(name),
                    kind: ActiveValue::Set(kind),
                    color: ActiveValue::Set(Some(color)),
                    icon: ActiveValue::Set(Some(icon)),
                    parent_category_id: ActiveValue::Set(cmd.parent_category_id),
                    is_essential: ActiveValue::Set(Some(false)),
                    is_active: ActiveValue::Set(Some(true)),
                    created_at: ActiveValue::Set(Some(Utc::now())),
                    ..Default::default()
                }
                .insert(db_tx)
                .await?;
                tracing::info!(
                    user_id = caller.user_id(),
                    category_id = model.id,
                    "category created"
                );
                Ok(Category::from(model))
            })
        })
        .await
    }

    /// Deletes one of the caller's private categories.
    ///
    /// Global categories are reported as not found. A category still
    /// referenced by transactions or bills cannot be deleted (`Conflict`).
    pub async fn delete_category(&self, caller: Caller, category_id: i32) -> ResultEngine<()> {
        self.with_tx("delete_category", move |_engine, db_tx| {
            Box::pin(async move {
                categories::Entity::find_by_id(category_id)
                    .filter(categories::Column::UserId.eq(caller.user_id()))
                    .one(db_tx)
                    .await?
                    .ok_or_else(|| EngineError::not_found(&format!("category {category_id}")))?;

                let in_use = transactions::Entity::find()
                    .filter(transactions::Column::CategoryId.eq(category_id))
                    .count(db_tx)
                    .await?
                    + bills::Entity::find()
                        .filter(bills::Column::CategoryId.eq(category_id))
                        .count(db_tx)
                        .await?;
                if in_use > 0 {
                    return Err(EngineError::Conflict(format!(
                        "category {category_id} is in use"
                    )));
                }

                budgets::Entity::delete_many()
                    .filter(budgets::Column::CategoryId.eq(category_id))
                    .filter(budgets::Column::UserId.eq(caller.user_id()))
                    .exec(db_tx)
                    .await?;
                categories::Entity::delete_by_id(category_id)
                    .exec(db_tx)
                    .await?;
                tracing::info!(user_id = caller.user_id(), category_id, "category deleted");
                Ok(())
            })
        })
        .await
    }

    /// Transaction count and total spent per private category, largest
    /// spender first.
    pub async fn category_stats(&self, caller: Caller) -> ResultEngine<Vec<CategoryStat>> {
        let owned = categories::Entity::find()
            .filter(categories::Column::UserId.eq(caller.user_id()))
            .all(&self.database)
            .await?;

        let mut stats = Vec::with_capacity(owned.len());
        for category in owned {
            let amounts: Vec<f64> = transactions::Entity::find()
                .filter(transactions::Column::UserId.eq(caller.user_id()))
                .filter(transactions::Column::CategoryId.eq(category.id))
                .all(&self.database)
                .await?
                .into_iter()
                .map(|model| model.amount)
                .collect();
            stats.push(CategoryStat {
                category_id: category.id,
                name: category.name,
                color: category.color,
                transaction_count: amounts.len(),
                total_spent: reports::spent(amounts),
            });
        }
        stats.sort_by(|a, b| b.total_spent.total_cmp(&a.total_spent));
        Ok(stats)
    }
}
