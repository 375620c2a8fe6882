use std::collections::HashMap;

use chrono::{Datelike, Duration, Months, NaiveDate};
use sea_orm::{Condition, QueryFilter, QueryOrder, prelude::*};

use crate::{
    Account, AccountBalance, Caller, CategoryLabel, CategorySpending, Dashboard,
    DashboardSummary, EngineError, FlowSummary, MonthlyTrend, ResultEngine, accounts, categories,
    reports, transactions,
    util::{first_day_of_month, month_bounds, start_of_week},
};

use super::{Engine, access::visible_to};

const RECENT_ON_DASHBOARD: usize = 5;
const BILL_HORIZON_DAYS: i64 = 7;
const TREND_MONTHS: u32 = 6;

impl Engine {
    /// Everything the home screen shows, computed as of `today`.
    pub async fn dashboard(&self, caller: Caller, today: NaiveDate) -> ResultEngine<Dashboard> {
        let month_start = first_day_of_month(today);
        let week_start = start_of_week(today);

        let accounts: Vec<Account> = accounts::Entity::find()
            .filter(accounts::Column::UserId.eq(caller.user_id()))
            .filter(
                Condition::any()
                    .add(accounts::Column::IsActive.is_null())
                    .add(accounts::Column::IsActive.eq(true)),
            )
            .order_by_asc(accounts::Column::Id)
            .all(&self.database)
            .await?
            .into_iter()
            .map(Account::from)
            .collect();

        let month_rows = transactions::Entity::find()
            .filter(transactions::Column::UserId.eq(caller.user_id()))
            .filter(transactions::Column::TransactionDate.gte(month_start))
            .order_by_desc(transactions::Column::TransactionDate)
            .order_by_desc(transactions::Column::Id)
            .all(&self.database)
            .await?;
        // A week that began last month only counts this month's days.
        let week_spending = reports::spent(
            month_rows
                .iter()
                .filter(|row| row.transaction_date >= week_start)
                .map(|row| row.amount),
        );

        let flow = FlowSummary::from_amounts(month_rows.iter().map(|row| row.amount));
        let budgets = self
            .budget_progress(&self.database, caller, today, true)
            .await?;
        let upcoming_bills = self.upcoming_bills(caller, today).await?;
        let horizon = today + Duration::days(BILL_HORIZON_DAYS);

        let summary = DashboardSummary {
            total_balance: accounts
                .iter()
                .filter(|account| account.counts_in_total())
                .map(|account| account.balance)
                .sum(),
            monthly_income: flow.income,
            monthly_expenses: flow.expenses,
            monthly_net: flow.net,
            todays_spending: reports::spent(
                month_rows
                    .iter()
                    .filter(|row| row.transaction_date == today)
                    .map(|row| row.amount),
            ),
            this_week_spending: week_spending,
            active_budgets: budgets.len(),
            upcoming_bills_count: upcoming_bills
                .iter()
                .filter(|bill| bill.due_date <= horizon)
                .count(),
        };

        let mut month_change: HashMap<i32, f64> = HashMap::new();
        for row in &month_rows {
            *month_change.entry(row.account_id).or_default() += row.amount;
        }
        let account_balances = accounts
            .into_iter()
            .map(|account| AccountBalance {
                this_month_change: month_change.get(&account.id).copied().unwrap_or(0.0),
                id: account.id,
                name: account.name,
                kind: account.kind,
                balance: account.balance,
                color: account.color.unwrap_or_else(|| "#3B82F6".to_string()),
                icon: account.icon.unwrap_or_else(|| "wallet".to_string()),
            })
            .collect();

        let labels = self.category_labels(caller).await?;
        let category_spending = reports::category_spending(
            month_rows.iter().map(|row| (row.category_id, row.amount)),
            &labels,
        );
        let recent: Vec<transactions::Model> = month_rows
            .into_iter()
            .take(RECENT_ON_DASHBOARD)
            .collect();
        let recent_transactions = self.with_labels(&self.database, caller, recent).await?;

        Ok(Dashboard {
            summary,
            accounts: account_balances,
            budgets,
            upcoming_bills,
            recent_transactions,
            category_spending,
        })
    }

    /// Income and expenses per calendar month over the six months ending with
    /// the month of `today`, oldest first. Months without activity are omitted.
    pub async fn monthly_trends(
        &self,
        caller: Caller,
        today: NaiveDate,
    ) -> ResultEngine<Vec<MonthlyTrend>> {
        let since = first_day_of_month(today)
            .checked_sub_months(Months::new(TREND_MONTHS - 1))
            .ok_or_else(|| EngineError::invalid(format!("invalid reference date {today}")))?;
        let (_, until) = month_bounds(today.year(), today.month())?;
        let rows = transactions::Entity::find()
            .filter(transactions::Column::UserId.eq(caller.user_id()))
            .filter(transactions::Column::TransactionDate.gte(since))
            .filter(transactions::Column::TransactionDate.lt(until))
            .all(&self.database)
            .await?;
        Ok(reports::monthly_trends(
            rows.into_iter()
                .map(|row| (row.transaction_date, row.amount)),
        ))
    }

    /// Expenses of one calendar month grouped by category, largest first.
    pub async fn spending_by_category(
        &self,
        caller: Caller,
        year: i32,
        month: u32,
    ) -> ResultEngine<Vec<CategorySpending>> {
        let (start, end) = month_bounds(year, month)?;
        let rows = transactions::Entity::find()
            .filter(transactions::Column::UserId.eq(caller.user_id()))
            .filter(transactions::Column::TransactionDate.gte(start))
            .filter(transactions::Column::TransactionDate.lt(end))
            .filter(transactions::Column::Amount.lt(0.0))
            .all(&self.database)
            .await?;
        let labels = self.category_labels(caller).await?;
        Ok(reports::category_spending(
            rows.into_iter().map(|row| (row.category_id, row.amount)),
            &labels,
        ))
    }

    async fn category_labels(&self, caller: Caller) -> ResultEngine<HashMap<i32, CategoryLabel>> {
        Ok(categories::Entity::find()
            .filter(visible_to(caller))
            .all(&self.database)
            .await?
            .iter()
            .map(|category| (category.id, CategoryLabel::from(category)))
            .collect())
    }
}
