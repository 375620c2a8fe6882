//! Conversions from engine values to wire types.

use api_types::{
    account::{AccountView, BalanceAuditView},
    bill::{BillView, UpcomingBillView},
    budget::{BudgetProgressView, BudgetView},
    category::{CategoryStatView, CategoryView},
    goal::GoalView,
    report::{
        AccountBalanceView, CategorySpendingView, DashboardSummaryView, DashboardView,
        MonthlyTrendView,
    },
    transaction::{TransactionSummary, TransactionView},
};
use engine::{
    Account, AccountBalance, BalanceAudit, Bill, Budget, BudgetProgress, Category,
    CategorySpending, CategoryStat, Dashboard, DashboardSummary, FlowSummary, MonthlyTrend,
    SavingsGoal, TransactionDetail, UpcomingBill,
};

pub(crate) fn transaction(detail: TransactionDetail) -> TransactionView {
    TransactionView {
        id: detail.id,
        account_id: detail.account_id,
        account_name: detail.account_name,
        amount: detail.amount,
        description: detail.description,
        category_id: detail.category_id,
        category_name: detail.category_name,
        category_color: detail.category_color,
        category_icon: detail.category_icon,
        transaction_date: detail.transaction_date,
        created_at: detail.created_at,
        merchant: detail.merchant,
        payment_method: detail.payment_method,
        notes: detail.notes,
    }
}

pub(crate) fn transactions(details: Vec<TransactionDetail>) -> Vec<TransactionView> {
    details.into_iter().map(transaction).collect()
}

pub(crate) fn summary(flow: FlowSummary) -> TransactionSummary {
    TransactionSummary {
        income: flow.income,
        expenses: flow.expenses,
        net: flow.net,
        count: flow.count,
    }
}

pub(crate) fn account(account: Account) -> AccountView {
    AccountView {
        id: account.id,
        name: account.name,
        kind: account.kind,
        balance: account.balance,
        currency: account.currency,
        color: account.color,
        icon: account.icon,
        account_number: account.account_number,
        institution: account.institution,
        is_active: account.is_active,
        include_in_total: account.include_in_total,
        created_at: account.created_at,
    }
}

pub(crate) fn audit(audit: BalanceAudit) -> BalanceAuditView {
    BalanceAuditView {
        consistent: audit.is_consistent(),
        account_id: audit.account_id,
        cached_balance: audit.cached,
        replayed_balance: audit.replayed,
        entries: audit.entries,
    }
}

pub(crate) fn category(category: Category) -> CategoryView {
    CategoryView {
        is_global: category.is_global(),
        id: category.id,
        name: category.name,
        kind: category.kind,
        color: category.color,
        icon: category.icon,
        parent_category_id: category.parent_category_id,
    }
}

pub(crate) fn category_stat(stat: CategoryStat) -> CategoryStatView {
    CategoryStatView {
        category_id: stat.category_id,
        name: stat.name,
        color: stat.color,
        transaction_count: stat.transaction_count,
        total_spent: stat.total_spent,
    }
}

pub(crate) fn bill(bill: Bill) -> BillView {
    BillView {
        id: bill.id,
        name: bill.name,
        amount: bill.amount,
        category_id: bill.category_id,
        due_day: bill.due_day,
        frequency: bill.frequency,
        next_due_date: bill.next_due_date,
        is_active: bill.is_active,
        auto_pay: bill.auto_pay,
    }
}

pub(crate) fn upcoming_bill(bill: UpcomingBill) -> UpcomingBillView {
    UpcomingBillView {
        id: bill.id,
        name: bill.name,
        amount: bill.amount,
        due_date: bill.due_date,
        days_until_due: bill.days_until_due,
        category_name: bill.category_name,
        is_overdue: bill.is_overdue,
    }
}

pub(crate) fn budget(budget: Budget) -> BudgetView {
    BudgetView {
        id: budget.id,
        category_id: budget.category_id,
        amount: budget.amount,
        period: budget.period,
        start_date: budget.start_date,
        end_date: budget.end_date,
        is_active: budget.is_active,
    }
}

pub(crate) fn budget_progress(progress: BudgetProgress) -> BudgetProgressView {
    BudgetProgressView {
        budget_id: progress.budget_id,
        category_id: progress.category_id,
        category_name: progress.category_name,
        category_color: progress.category_color,
        limit: progress.limit,
        spent: progress.spent,
        remaining: progress.remaining,
        percentage: progress.percentage,
        status: progress.status.to_string(),
    }
}

pub(crate) fn goal(goal: SavingsGoal) -> GoalView {
    GoalView {
        progress_percentage: goal.progress_percentage(),
        id: goal.id,
        name: goal.name,
        target_amount: goal.target_amount,
        current_amount: goal.current_amount,
        target_date: goal.target_date,
        is_completed: goal.is_completed,
    }
}

pub(crate) fn category_spending(row: CategorySpending) -> CategorySpendingView {
    CategorySpendingView {
        category_id: row.category_id,
        category_name: row.category_name,
        category_color: row.category_color,
        category_icon: row.category_icon,
        amount: row.amount,
        transaction_count: row.transaction_count,
        percentage: row.percentage,
    }
}

pub(crate) fn monthly_trend(trend: MonthlyTrend) -> MonthlyTrendView {
    MonthlyTrendView {
        year: trend.year,
        month: trend.month,
        label: trend.label,
        income: trend.income,
        expenses: trend.expenses,
    }
}

pub(crate) fn dashboard_summary(summary: DashboardSummary) -> DashboardSummaryView {
    DashboardSummaryView {
        total_balance: summary.total_balance,
        monthly_income: summary.monthly_income,
        monthly_expenses: summary.monthly_expenses,
        monthly_net: summary.monthly_net,
        todays_spending: summary.todays_spending,
        this_week_spending: summary.this_week_spending,
        active_budgets: summary.active_budgets,
        upcoming_bills_count: summary.upcoming_bills_count,
    }
}

pub(crate) fn account_balance(account: AccountBalance) -> AccountBalanceView {
    AccountBalanceView {
        id: account.id,
        name: account.name,
        kind: account.kind,
        balance: account.balance,
        color: account.color,
        icon: account.icon,
        this_month_change: account.this_month_change,
    }
}

pub(crate) fn dashboard(dashboard: Dashboard) -> DashboardView {
    DashboardView {
        summary: dashboard_summary(dashboard.summary),
        accounts: dashboard.accounts.into_iter().map(account_balance).collect(),
        budgets: dashboard.budgets.into_iter().map(budget_progress).collect(),
        upcoming_bills: dashboard
            .upcoming_bills
            .into_iter()
            .map(upcoming_bill)
            .collect(),
        recent_transactions: transactions(dashboard.recent_transactions),
        category_spending: dashboard
            .category_spending
            .into_iter()
            .map(category_spending)
            .collect(),
    }
}
