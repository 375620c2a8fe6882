//! Ledger engine: accounts, categorized transactions, bills, budgets and
//! transfers over a SQL store.
//!
//! Every operation that moves money runs as one unit of work and writes the
//! cached account balance through the balance-entry journal, so the cache can
//! always be replayed and audited.

pub use accounts::Account;
pub use balance::{AUDIT_TOLERANCE, RECONCILE_EPSILON, accumulate, replay, within_epsilon};
pub use balance_entries::{BalanceEntry, EntrySource};
pub use bills::Bill;
pub use budgets::Budget;
pub use categories::Category;
pub use commands::{
    NewAccountCmd, NewBillCmd, NewBudgetCmd, NewCategoryCmd, NewSavingsGoalCmd,
    NewTransactionCmd, QuickAddCmd, TransferCmd, TxDetails, UpdateTransactionCmd,
};
pub use error::EngineError;
pub use ops::{Caller, Engine, EngineBuilder, TransactionListFilter};
pub use outcomes::{
    BalanceAudit, BillPayment, BillSkip, ReconcileOutcome, TransactionChange, TransactionDetail,
    TransferOutcome,
};
pub use reports::{
    AccountBalance, BudgetProgress, BudgetStatus, CategoryLabel, CategorySpending, CategoryStat,
    Dashboard, DashboardSummary, FlowSummary, MonthlyTrend, UpcomingBill,
};
pub use savings_goals::SavingsGoal;
pub use transactions::Transaction;
pub use users::{hash_password, verify_password};

pub mod accounts;
mod balance;
pub mod balance_entries;
pub mod bills;
pub mod budgets;
pub mod categories;
mod commands;
mod error;
mod ops;
mod outcomes;
pub mod reports;
pub mod savings_goals;
pub mod transactions;
pub mod users;
mod util;

pub(crate) type ResultEngine<T> = Result<T, EngineError>;
