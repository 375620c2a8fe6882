//! Values returned by mutation operations.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::balance::AUDIT_TOLERANCE;

/// A transaction joined with its account and category names.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TransactionDetail {
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

/// Result of editing or deleting a transaction.
///
/// `new_balance` is `None` when the account the transaction pointed to no
/// longer exists (no reversal happened).
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct TransactionChange {
    pub transaction_id: i32,
    pub account_id: i32,
    pub new_balance: Option<f64>,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct TransferOutcome {
    pub from_balance: f64,
    pub to_balance: f64,
}

/// Result of a manual balance sync.
///
/// When the difference is below the reconciliation epsilon, `adjustment` is
/// `0.0` and no transaction is written.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ReconcileOutcome {
    pub balance: f64,
    pub adjustment: f64,
    pub transaction_id: Option<i32>,
}

impl ReconcileOutcome {
    pub fn adjusted(&self) -> bool {
        self.transaction_id.is_some()
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct BillPayment {
    pub transaction_id: i32,
    pub new_balance: f64,
    pub next_due_date: NaiveDate,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct BillSkip {
    pub skipped_due_date: NaiveDate,
    pub next_due_date: NaiveDate,
}

impl BillSkip {
    /// Human readable confirmation naming the skipped month.
    pub fn message(&self) -> String {
        format!(
            "Skipped payment for {}. Next due date updated.",
            self.skipped_due_date.format("%B")
        )
    }
}

/// Cached balance of an account next to the balance replayed from its journal.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct BalanceAudit {
    pub account_id: i32,
    pub cached: f64,
    pub replayed: f64,
    pub entries: usize,
}

impl BalanceAudit {
    pub fn is_consistent(&self) -> bool {
        (self.cached - self.replayed).abs() <= AUDIT_TOLERANCE
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn skip_message_names_the_skipped_month() {
        let skip = BillSkip {
            skipped_due_date: NaiveDate::from_ymd_opt(2024, 3, 5).unwrap(),
            next_due_date: NaiveDate::from_ymd_opt(2024, 4, 5).unwrap(),
        };
        assert_eq!(
            skip.message(),
            "Skipped payment for March. Next due date updated."
        );
    }

    #[test]
    fn audit_tolerates_rounding_noise() {
        let audit = BalanceAudit {
            account_id: 1,
            cached: 0.3,
            replayed: 0.1 + 0.2,
            entries: 2,
        };
        assert!(audit.is_consistent());
        let drifted = BalanceAudit {
            replayed: 0.31,
            ..audit
        };
        assert!(!drifted.is_consistent());
    }
}
