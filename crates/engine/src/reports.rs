//! Aggregations over committed ledger state.
//!
//! Everything here is a pure function of rows already loaded by the
//! read operations in `ops::reports`; nothing in this module writes.

use std::collections::{BTreeMap, HashMap};
use std::fmt;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::{TransactionDetail, categories};

const ALMOST_REACHED_PERCENT: f64 = 80.0;
const EXCEEDED_PERCENT: f64 = 100.0;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum BudgetStatus {
    #[serde(rename = "On Track")]
    OnTrack,
    #[serde(rename = "Almost Reached")]
    AlmostReached,
    Exceeded,
}

impl BudgetStatus {
    pub fn from_percentage(percentage: f64) -> Self {
        if percentage >= EXCEEDED_PERCENT {
            Self::Exceeded
        } else if percentage >= ALMOST_REACHED_PERCENT {
            Self::AlmostReached
        } else {
            Self::OnTrack
        }
    }
}

impl fmt::Display for BudgetStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::OnTrack => "On Track",
            Self::AlmostReached => "Almost Reached",
            Self::Exceeded => "Exceeded",
        };
        f.write_str(label)
    }
}

/// Absolute sum of the negative amounts; positive amounts are ignored.
pub fn spent<I>(amounts: I) -> f64
where
    I: IntoIterator<Item = f64>,
{
    amounts
        .into_iter()
        .filter(|amount| *amount < 0.0)
        .map(f64::abs)
        .sum()
}

/// Name, color and icon used to label a category in aggregates.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryLabel {
    pub name: String,
    pub color: String,
    pub icon: String,
}

impl Default for CategoryLabel {
    fn default() -> Self {
        Self {
            name: categories::DEFAULT_NAME.to_string(),
            color: categories::DEFAULT_COLOR.to_string(),
            icon: categories::DEFAULT_ICON.to_string(),
        }
    }
}

impl From<&categories::Model> for CategoryLabel {
    fn from(model: &categories::Model) -> Self {
        Self {
            name: model.name.clone(),
            color: model.display_color(),
            icon: model.display_icon(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BudgetProgress {
    pub budget_id: i32,
    pub category_id: Option<i32>,
    pub category_name: String,
    pub category_color: String,
    pub limit: f64,
    pub spent: f64,
    pub remaining: f64,
    pub percentage: f64,
    pub status: BudgetStatus,
}

impl BudgetProgress {
    pub fn measure(
        budget_id: i32,
        category_id: Option<i32>,
        label: CategoryLabel,
        limit: f64,
        spent: f64,
    ) -> Self {
        let percentage = if limit > 0.0 {
            spent / limit * 100.0
        } else {
            0.0
        };
        Self {
            budget_id,
            category_id,
            category_name: label.name,
            category_color: label.color,
            limit,
            spent,
            remaining: (limit - spent).max(0.0),
            percentage,
            status: BudgetStatus::from_percentage(percentage),
        }
    }
}

/// Income, expenses and net over a set of amounts.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct FlowSummary {
    pub income: f64,
    pub expenses: f64,
    pub net: f64,
    pub count: usize,
}

impl FlowSummary {
    pub fn from_amounts<I>(amounts: I) -> Self
    where
        I: IntoIterator<Item = f64>,
    {
        amounts
            .into_iter()
            .fold(Self::default(), |mut summary, amount| {
                if amount > 0.0 {
                    summary.income += amount;
                } else if amount < 0.0 {
                    summary.expenses += amount.abs();
                }
                summary.net += amount;
                summary.count += 1;
                summary
            })
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CategorySpending {
    pub category_id: i32,
    pub category_name: String,
    pub category_color: String,
    pub category_icon: String,
    pub amount: f64,
    pub transaction_count: usize,
    /// Share of total spending across all categories, in percent.
    pub percentage: f64,
}

/// Groups spending by category, largest first.
///
/// `rows` are `(category_id, amount)` pairs; only negative amounts count.
/// Categories missing from `labels` are labelled with the defaults.
pub fn category_spending<I>(rows: I, labels: &HashMap<i32, CategoryLabel>) -> Vec<CategorySpending>
where
    I: IntoIterator<Item = (i32, f64)>,
{
    let mut grouped: BTreeMap<i32, (f64, usize)> = BTreeMap::new();
    for (category_id, amount) in rows {
        if amount < 0.0 {
            let entry = grouped.entry(category_id).or_default();
            entry.0 += amount.abs();
            entry.1 += 1;
        }
    }
    let total: f64 = grouped.values().map(|(amount, _)| amount).sum();

    let mut spending: Vec<CategorySpending> = grouped
        .into_iter()
        .map(|(category_id, (amount, transaction_count))| {
            let label = labels.get(&category_id).cloned().unwrap_or_default();
            CategorySpending {
                category_id,
                category_name: label.name,
                category_color: label.color,
                category_icon: label.icon,
                amount,
                transaction_count,
                percentage: if total > 0.0 {
                    amount / total * 100.0
                } else {
                    0.0
                },
            }
        })
        .collect();
    spending.sort_by(|a, b| b.amount.total_cmp(&a.amount));
    spending
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MonthlyTrend {
    pub year: i32,
    pub month: u32,
    /// Abbreviated month name (`Jan`, `Feb`, ...).
    pub label: String,
    pub income: f64,
    pub expenses: f64,
}

/// Buckets `(date, amount)` rows per calendar month, oldest first.
pub fn monthly_trends<I>(rows: I) -> Vec<MonthlyTrend>
where
    I: IntoIterator<Item = (NaiveDate, f64)>,
{
    let mut months: BTreeMap<(i32, u32), Vec<f64>> = BTreeMap::new();
    for (date, amount) in rows {
        months
            .entry((date.year(), date.month()))
            .or_default()
            .push(amount);
    }
    months
        .into_iter()
        .map(|((year, month), amounts)| {
            let flow = FlowSummary::from_amounts(amounts);
            let label = NaiveDate::from_ymd_opt(year, month, 1)
                .map(|d| d.format("%b").to_string())
                .unwrap_or_default();
            MonthlyTrend {
                year,
                month,
                label,
                income: flow.income,
                expenses: flow.expenses,
            }
        })
        .collect()
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CategoryStat {
    pub category_id: i32,
    pub name: String,
    pub color: Option<String>,
    pub transaction_count: usize,
    pub total_spent: f64,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AccountBalance {
    pub id: i32,
    pub name: String,
    pub kind: String,
    pub balance: f64,
    pub color: String,
    pub icon: String,
    /// Net of this month's transactions on the account.
    pub this_month_change: f64,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct UpcomingBill {
    pub id: i32,
    pub name: String,
    pub amount: f64,
    pub due_date: NaiveDate,
    pub days_until_due: i64,
    pub category_name: String,
    pub is_overdue: bool,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct DashboardSummary {
    pub total_balance: f64,
    pub monthly_income: f64,
    pub monthly_expenses: f64,
    pub monthly_net: f64,
    pub todays_spending: f64,
    pub this_week_spending: f64,
    pub active_budgets: usize,
    /// Active bills due within the next seven days, overdue ones included.
    pub upcoming_bills_count: usize,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Dashboard {
    pub summary: DashboardSummary,
    pub accounts: Vec<AccountBalance>,
    pub budgets: Vec<BudgetProgress>,
    pub upcoming_bills: Vec<UpcomingBill>,
    pub recent_transactions: Vec<TransactionDetail>,
    pub category_spending: Vec<CategorySpending>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spent_ignores_income() {
        assert_eq!(spent([-20.0, 50.0, -5.5]), 25.5);
        assert_eq!(spent(std::iter::empty()), 0.0);
    }

    #[test]
    fn status_thresholds() {
        assert_eq!(BudgetStatus::from_percentage(79.99), BudgetStatus::OnTrack);
        assert_eq!(BudgetStatus::from_percentage(80.0), BudgetStatus::AlmostReached);
        assert_eq!(BudgetStatus::from_percentage(100.0), BudgetStatus::Exceeded);
        assert_eq!(BudgetStatus::AlmostReached.to_string(), "Almost Reached");
    }

    #[test]
    fn progress_clamps_remaining_and_handles_zero_limit() {
        let over = BudgetProgress::measure(1, Some(3), CategoryLabel::default(), 100.0, 150.0);
        assert_eq!(over.remaining, 0.0);
        assert_eq!(over.percentage, 150.0);
        assert_eq!(over.status, BudgetStatus::Exceeded);

        let zero = BudgetProgress::measure(2, None, CategoryLabel::default(), 0.0, 10.0);
        assert_eq!(zero.percentage, 0.0);
        assert_eq!(zero.status, BudgetStatus::OnTrack);
    }

    #[test]
    fn flow_summary_splits_signs() {
        let summary = FlowSummary::from_amounts([100.0, -30.0, -20.0, 0.0]);
        assert_eq!(summary.income, 100.0);
        assert_eq!(summary.expenses, 50.0);
        assert_eq!(summary.net, 50.0);
        assert_eq!(summary.count, 4);
    }

    #[test]
    fn category_spending_shares_add_up() {
        let mut labels = HashMap::new();
        labels.insert(
            3,
            CategoryLabel {
                name: "Groceries".to_string(),
                color: "#10B981".to_string(),
                icon: "cart".to_string(),
            },
        );
        let rows = [(3, -75.0), (4, -25.0), (3, 500.0)];
        let spending = category_spending(rows, &labels);

        assert_eq!(spending.len(), 2);
        assert_eq!(spending[0].category_name, "Groceries");
        assert_eq!(spending[0].percentage, 75.0);
        assert_eq!(spending[0].transaction_count, 1);
        assert_eq!(spending[1].category_name, "General");
        assert_eq!(spending[1].percentage, 25.0);
    }

    #[test]
    fn trends_are_chronological() {
        let d = |y, m, day| NaiveDate::from_ymd_opt(y, m, day).unwrap();
        let trends = monthly_trends([
            (d(2024, 2, 3), -10.0),
            (d(2023, 12, 31), 200.0),
            (d(2024, 2, 20), 40.0),
        ]);
        assert_eq!(trends.len(), 2);
        assert_eq!(trends[0].label, "Dec");
        assert_eq!(trends[0].income, 200.0);
        assert_eq!(trends[1].label, "Feb");
        assert_eq!(trends[1].expenses, 10.0);
        assert_eq!(trends[1].income, 40.0);
    }
}
