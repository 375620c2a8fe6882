use std::collections::HashMap;

use chrono::{NaiveDate, Utc};
use sea_orm::{ActiveValue, ConnectionTrait, QueryFilter, QueryOrder, prelude::*};

use crate::{
    Budget, BudgetProgress, Caller, CategoryLabel, EngineError, NewBudgetCmd, ResultEngine,
    balance::validate_amount, budgets, categories, reports, transactions,
    util::{first_day_of_month, normalize_required},
};

use super::{Engine, access::visible_to};

impl Engine {
    pub async fn create_budget(&self, caller: Caller, cmd: NewBudgetCmd) -> ResultEngine<Budget> {
        let amount = validate_amount(cmd.amount, "budget amount")?;
        if amount < 0.0 {
            return Err(EngineError::invalid("budget amount must be >= 0"));
        }
        let period = normalize_required(&cmd.period, "budget period")?;

        self.with_tx("create_budget", move |engine, db_tx| {
            Box::pin(async move {
                if let Some(category_id) = cmd.category_id {
                    engine
                        .require_visible_category(db_tx, caller, category_id)
                        .await?;
                }
                let model = budgets::ActiveModel {
                    user_id: ActiveValue::Set(caller.user_id()),
                    category_id: ActiveValue::Set(cmd.category_id),
                    amount: ActiveValue::Set(amount),
                    period: ActiveValue::Set(period),
                    start_date: ActiveValue::Set(cmd.start_date),
                    is_active: ActiveValue::Set(Some(true)),
                    created_at: ActiveValue::Set(Some(Utc::now())),
                    ..Default::default()
                }
                .insert(db_tx)
                .await?;
                tracing::info!(user_id = caller.user_id(), budget_id = model.id, "budget created");
                Ok(Budget::from(model))
            })
        })
        .await
    }

    pub async fn budget(&self, caller: Caller, budget_id: i32) -> ResultEngine<Budget> {
        self.require_budget(&self.database, caller, budget_id)
            .await
            .map(Budget::from)
    }

    /// Progress of every budget of the caller, measured from the first day
    /// of the month containing `today`.
    pub async fn list_budgets(
        &self,
        caller: Caller,
        today: NaiveDate,
    ) -> ResultEngine<Vec<BudgetProgress>> {
        self.budget_progress(&self.database, caller, today, false)
            .await
    }

    /// Shared by the budget list and the dashboard. `active_only` drops
    /// budgets switched off or starting after `today`.
    pub(super) async fn budget_progress<C: ConnectionTrait>(
        &self,
        db: &C,
        caller: Caller,
        today: NaiveDate,
        active_only: bool,
    ) -> ResultEngine<Vec<BudgetProgress>> {
        let month_start = first_day_of_month(today);
        let models: Vec<budgets::Model> = budgets::Entity::find()
            .filter(budgets::Column::UserId.eq(caller.user_id()))
            .order_by_asc(budgets::Column::Id)
            .all(db)
            .await?
            .into_iter()
            .filter(|b| !active_only || (b.is_active.unwrap_or(true) && b.start_date <= today))
            .collect();
        if models.is_empty() {
            return Ok(Vec::new());
        }

        let labels: HashMap<i32, CategoryLabel> = categories::Entity::find()
            .filter(visible_to(caller))
            .all(db)
            .await?
            .iter()
            .map(|category| (category.id, CategoryLabel::from(category)))
            .collect();
        let month_rows: Vec<(i32, f64)> = transactions::Entity::find()
            .filter(transactions::Column::UserId.eq(caller.user_id()))
            .filter(transactions::Column::TransactionDate.gte(month_start))
            .filter(transactions::Column::Amount.lt(0.0))
            .all(db)
            .await?
            .into_iter()
            .map(|model| (model.category_id, model.amount))
            .collect();

        Ok(models
            .into_iter()
            .map(|budget| {
                let spent = reports::spent(
                    month_rows
                        .iter()
                        .filter(|(category_id, _)| {
                            budget.category_id.is_none_or(|id| id == *category_id)
                        })
                        .map(|(_, amount)| *amount),
                );
                let label = budget
                    .category_id
                    .and_then(|id| labels.get(&id).cloned())
                    .unwrap_or_default();
                BudgetProgress::measure(budget.id, budget.category_id, label, budget.amount, spent)
            })
            .collect())
    }
}
