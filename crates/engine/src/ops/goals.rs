use chrono::Utc;
use sea_orm::{ActiveValue, QueryFilter, QueryOrder, prelude::*};

use crate::{
    Caller, EngineError, NewSavingsGoalCmd, ResultEngine, SavingsGoal, balance::validate_amount,
    savings_goals, util::normalize_required,
};

use super::Engine;

impl Engine {
    pub async fn create_savings_goal(
        &self,
        caller: Caller,
        cmd: NewSavingsGoalCmd,
    ) -> ResultEngine<SavingsGoal> {
        let name = normalize_required(&cmd.name, "goal name")?;
        let target_amount = validate_amount(cmd.target_amount, "target amount")?;
        let current_amount = validate_amount(cmd.current_amount, "current amount")?;
        if target_amount <= 0.0 {
            return Err(EngineError::invalid("target amount must be > 0"));
        }

        self.with_tx("create_savings_goal", move |_engine, db_tx| {
            Box::pin(async move {
                let model = savings_goals::ActiveModel {
                    user_id: ActiveValue::Set(caller.user_id()),
                    name: ActiveValue::Set(name),
                    target_amount: ActiveValue::Set(target_amount),
                    current_amount: ActiveValue::Set(Some(current_amount)),
                    target_date: ActiveValue::Set(cmd.target_date),
                    is_completed: ActiveValue::Set(Some(current_amount >= target_amount)),
                    created_at: ActiveValue::Set(Some(Utc::now())),
                    ..Default::default()
                }
                .insert(db_tx)
                .await?;
                tracing::info!(user_id = caller.user_id(), goal_id = model.id, "savings goal created");
                Ok(SavingsGoal::from(model))
            })
        })
        .await
    }

    pub async fn list_savings_goals(&self, caller: Caller) -> ResultEngine<Vec<SavingsGoal>> {
        let models = savings_goals::Entity::find()
            .filter(savings_goals::Column::UserId.eq(caller.user_id()))
            .order_by_asc(savings_goals::Column::Id)
            .all(&self.database)
            .await?;
        Ok(models.into_iter().map(SavingsGoal::from).collect())
    }

    pub async fn savings_goal(&self, caller: Caller, goal_id: i32) -> ResultEngine<SavingsGoal> {
        self.require_goal(&self.database, caller, goal_id)
            .await
            .map(SavingsGoal::from)
    }
}
