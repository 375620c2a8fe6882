//! Wire types shared by the HTTP server and its clients.
//!
//! Every body and query string uses camelCase keys. Amounts are signed `f64`
//! in the account's currency; dates are `YYYY-MM-DD`.
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Plain acknowledgement used by endpoints with nothing else to return.
#[derive(Debug, Serialize, Deserialize)]
pub struct Message {
    pub message: String,
}

impl Message {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

pub mod transaction {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct TransactionNew {
        pub account_id: i32,
        pub amount: f64,
        pub description: String,
        pub category_id: i32,
        pub transaction_date: NaiveDate,
        pub merchant: Option<String>,
        pub payment_method: Option<String>,
        pub notes: Option<String>,
    }

    /// Body of `PUT /transactions/update/{id}`.
    ///
    /// When `accountId` differs from the current account the transaction is
    /// moved. Omitted `merchant`, `paymentMethod` or `notes` are cleared.
    #[derive(Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct TransactionUpdate {
        pub amount: f64,
        pub description: String,
        pub category_id: i32,
        pub transaction_date: NaiveDate,
        pub account_id: Option<i32>,
        pub merchant: Option<String>,
        pub payment_method: Option<String>,
        pub notes: Option<String>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct QuickAdd {
        pub amount: f64,
        pub description: String,
        pub category_name: Option<String>,
    }

    /// A transaction with its account and category labels.
    #[derive(Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct TransactionView {
        pub id: i32,
        pub account_id: i32,
        pub account_name: String,
        pub amount: f64,
        pub description: String,
        pub category_id: i32,
        pub category_name: String,
        pub category_color: String,
        pub category_icon: String,
        pub transaction_date: NaiveDate,
        pub created_at: Option<DateTime<Utc>>,
        pub merchant: Option<String>,
        pub payment_method: Option<String>,
        pub notes: Option<String>,
    }

    /// Response of edit and delete. `newBalance` is absent when the
    /// account the transaction pointed to no longer exists.
    #[derive(Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct TransactionChanged {
        pub message: String,
        pub transaction_id: i32,
        pub new_balance: Option<f64>,
    }

    #[derive(Debug, Default, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct TransactionListQuery {
        pub account_id: Option<i32>,
        pub month: Option<u32>,
        pub year: Option<i32>,
        pub limit: Option<u64>,
    }

    #[derive(Debug, Default, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct TransactionSearchQuery {
        pub q: Option<String>,
        pub from: Option<NaiveDate>,
        pub to: Option<NaiveDate>,
    }

    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct RecentQuery {
        pub limit: Option<u64>,
    }

    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct SummaryQuery {
        pub from: Option<NaiveDate>,
        pub to: Option<NaiveDate>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct TransactionSummary {
        pub income: f64,
        pub expenses: f64,
        pub net: f64,
        pub count: usize,
    }
}

pub mod transfer {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct TransferNew {
        pub from_account_id: i32,
        pub to_account_id: i32,
        pub amount: f64,
    }

    #[derive(Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct TransferDone {
        pub message: String,
        pub from_balance: f64,
        pub to_balance: f64,
    }
}

pub mod account {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct AccountNew {
        pub name: String,
        #[serde(rename = "type")]
        pub kind: String,
        /// Opening balance, journaled as the first entry.
        pub balance: Option<f64>,
        pub currency: Option<String>,
        pub color: Option<String>,
        pub icon: Option<String>,
        pub account_number: Option<String>,
        pub institution: Option<String>,
        pub include_in_total: Option<bool>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct AccountView {
        pub id: i32,
        pub name: String,
        #[serde(rename = "type")]
        pub kind: String,
        pub balance: f64,
        pub currency: String,
        pub color: Option<String>,
        pub icon: Option<String>,
        pub account_number: Option<String>,
        pub institution: Option<String>,
        pub is_active: bool,
        pub include_in_total: bool,
        pub created_at: Option<DateTime<Utc>>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct Reconcile {
        pub actual_balance: f64,
    }

    #[derive(Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct Reconciled {
        pub message: String,
        pub new_balance: f64,
        pub adjustment: f64,
        pub transaction_id: Option<i32>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct BalanceAuditView {
        pub account_id: i32,
        pub cached_balance: f64,
        pub replayed_balance: f64,
        pub entries: usize,
        pub consistent: bool,
    }
}

pub mod category {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct CategoryNew {
        pub name: String,
        #[serde(rename = "type")]
        pub kind: Option<String>,
        pub color: Option<String>,
        pub icon: Option<String>,
        pub parent_category_id: Option<i32>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct CategoryView {
        pub id: i32,
        pub name: String,
        #[serde(rename = "type")]
        pub kind: String,
        pub color: Option<String>,
        pub icon: Option<String>,
        pub parent_category_id: Option<i32>,
        /// `true` for the shared categories every user sees.
        pub is_global: bool,
    }

    #[derive(Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct CategoryStatView {
        pub category_id: i32,
        pub name: String,
        pub color: Option<String>,
        pub transaction_count: usize,
        pub total_spent: f64,
    }
}

pub mod bill {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct BillNew {
        pub name: String,
        pub amount: f64,
        pub category_id: i32,
        pub due_date: NaiveDate,
        pub frequency: Option<String>,
        pub auto_pay: Option<bool>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct BillView {
        pub id: i32,
        pub name: String,
        pub amount: f64,
        pub category_id: i32,
        pub due_day: i32,
        pub frequency: String,
        pub next_due_date: NaiveDate,
        pub is_active: bool,
        pub auto_pay: bool,
    }

    #[derive(Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct PayBillQuery {
        pub account_id: i32,
    }

    #[derive(Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct BillPaid {
        pub message: String,
        pub transaction_id: i32,
        pub new_balance: f64,
        pub next_due_date: NaiveDate,
    }

    #[derive(Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct BillSkipped {
        pub message: String,
        pub next_due_date: NaiveDate,
    }

    #[derive(Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct UpcomingBillView {
        pub id: i32,
        pub name: String,
        pub amount: f64,
        pub due_date: NaiveDate,
        pub days_until_due: i64,
        pub category_name: String,
        pub is_overdue: bool,
    }
}

pub mod budget {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct BudgetNew {
        pub category_id: Option<i32>,
        pub amount: f64,
        pub period: String,
        pub start_date: NaiveDate,
    }

    #[derive(Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct BudgetView {
        pub id: i32,
        pub category_id: Option<i32>,
        pub amount: f64,
        pub period: String,
        pub start_date: NaiveDate,
        pub end_date: Option<NaiveDate>,
        pub is_active: bool,
    }

    #[derive(Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct BudgetProgressView {
        pub budget_id: i32,
        pub category_id: Option<i32>,
        pub category_name: String,
        pub category_color: String,
        pub limit: f64,
        pub spent: f64,
        pub remaining: f64,
        pub percentage: f64,
        /// `On Track`, `Almost Reached` or `Exceeded`.
        pub status: String,
    }
}

pub mod goal {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct GoalNew {
        pub name: String,
        pub target_amount: f64,
        pub current_amount: Option<f64>,
        pub target_date: Option<NaiveDate>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct GoalView {
        pub id: i32,
        pub name: String,
        pub target_amount: f64,
        pub current_amount: f64,
        pub target_date: Option<NaiveDate>,
        pub is_completed: bool,
        pub progress_percentage: f64,
    }
}

pub mod report {
    use super::*;
    use crate::{bill::UpcomingBillView, budget::BudgetProgressView, transaction::TransactionView};

    #[derive(Debug, Serialize, Deserialize)]
    pub struct SpendingQuery {
        pub month: u32,
        pub year: i32,
    }

    #[derive(Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct CategorySpendingView {
        pub category_id: i32,
        pub category_name: String,
        pub category_color: String,
        pub category_icon: String,
        pub amount: f64,
        pub transaction_count: usize,
        pub percentage: f64,
    }

    #[derive(Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct MonthlyTrendView {
        pub year: i32,
        pub month: u32,
        pub label: String,
        pub income: f64,
        pub expenses: f64,
    }

    #[derive(Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct AccountBalanceView {
        pub id: i32,
        pub name: String,
        #[serde(rename = "type")]
        pub kind: String,
        pub balance: f64,
        pub color: String,
        pub icon: String,
        pub this_month_change: f64,
    }

    #[derive(Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct DashboardSummaryView {
        pub total_balance: f64,
        pub monthly_income: f64,
        pub monthly_expenses: f64,
        pub monthly_net: f64,
        pub todays_spending: f64,
        pub this_week_spending: f64,
        pub active_budgets: usize,
        pub upcoming_bills_count: usize,
    }

    #[derive(Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct DashboardView {
        pub summary: DashboardSummaryView,
        pub accounts: Vec<AccountBalanceView>,
        pub budgets: Vec<BudgetProgressView>,
        pub upcoming_bills: Vec<UpcomingBillView>,
        pub recent_transactions: Vec<TransactionView>,
        pub category_spending: Vec<CategorySpendingView>,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bodies_use_camel_case_keys() {
        let body: transaction::TransactionNew = serde_json::from_str(
            r#"{"accountId":1,"amount":-4.5,"description":"Latte","categoryId":4,"transactionDate":"2024-03-14"}"#,
        )
        .unwrap();
        assert_eq!(body.account_id, 1);
        assert_eq!(
            body.transaction_date,
            NaiveDate::from_ymd_opt(2024, 3, 14).unwrap()
        );
        assert!(body.merchant.is_none());

        let json = serde_json::to_value(transfer::TransferDone {
            message: "ok".to_string(),
            from_balance: 70.0,
            to_balance: 80.0,
        })
        .unwrap();
        assert_eq!(json["fromBalance"], 70.0);
        assert_eq!(json["toBalance"], 80.0);
    }

    #[test]
    fn account_kind_is_serialized_as_type() {
        let body: account::AccountNew =
            serde_json::from_str(r#"{"name":"Cash","type":"Wallet","balance":20}"#).unwrap();
        assert_eq!(body.kind, "Wallet");
        assert_eq!(body.balance, Some(20.0));
    }
}
