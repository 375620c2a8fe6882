//! Command structs for engine operations.
//!
//! These types group parameters for write operations, keeping call sites
//! readable and avoiding long argument lists. The acting user is never part
//! of a command: it travels separately as a [`Caller`](crate::Caller).

use chrono::NaiveDate;

/// Optional free-text metadata attached to a transaction.
#[derive(Clone, Debug, Default)]
pub struct TxDetails {
    pub merchant: Option<String>,
    pub payment_method: Option<String>,
    pub notes: Option<String>,
}

/// Record a signed amount on one of the caller's accounts.
#[derive(Clone, Debug)]
pub struct NewTransactionCmd {
    pub account_id: i32,
    pub amount: f64,
    pub description: String,
    pub category_id: i32,
    pub transaction_date: NaiveDate,
    pub details: TxDetails,
}

impl NewTransactionCmd {
    #[must_use]
    pub fn new(
        account_id: i32,
        amount: f64,
        description: impl Into<String>,
        category_id: i32,
        transaction_date: NaiveDate,
    ) -> Self {
        Self {
            account_id,
            amount,
            description: description.into(),
            category_id,
            transaction_date,
            details: TxDetails::default(),
        }
    }

    #[must_use]
    pub fn merchant(mut self, merchant: impl Into<String>) -> Self {
        self.details.merchant = Some(merchant.into());
        self
    }

    #[must_use]
    pub fn payment_method(mut self, method: impl Into<String>) -> Self {
        self.details.payment_method = Some(method.into());
        self
    }

    #[must_use]
    pub fn notes(mut self, notes: impl Into<String>) -> Self {
        self.details.notes = Some(notes.into());
        self
    }
}

/// Rewrite a transaction, moving it to another account when `account_id`
/// differs from the current one.
///
/// `details` replaces the stored metadata as a whole, so a field left `None`
/// is cleared.
#[derive(Clone, Debug)]
pub struct UpdateTransactionCmd {
    pub transaction_id: i32,
    pub amount: f64,
    pub description: String,
    pub category_id: i32,
    pub transaction_date: NaiveDate,
    pub account_id: Option<i32>,
    pub details: TxDetails,
}

impl UpdateTransactionCmd {
    #[must_use]
    pub fn new(
        transaction_id: i32,
        amount: f64,
        description: impl Into<String>,
        category_id: i32,
        transaction_date: NaiveDate,
    ) -> Self {
        Self {
            transaction_id,
            amount,
            description: description.into(),
            category_id,
            transaction_date,
            account_id: None,
            details: TxDetails::default(),
        }
    }

    #[must_use]
    pub fn account_id(mut self, account_id: i32) -> Self {
        self.account_id = Some(account_id);
        self
    }

    #[must_use]
    pub fn merchant(mut self, merchant: impl Into<String>) -> Self {
        self.details.merchant = Some(merchant.into());
        self
    }

    #[must_use]
    pub fn payment_method(mut self, method: impl Into<String>) -> Self {
        self.details.payment_method = Some(method.into());
        self
    }

    #[must_use]
    pub fn notes(mut self, notes: impl Into<String>) -> Self {
        self.details.notes = Some(notes.into());
        self
    }
}

/// Move money between two of the caller's accounts.
#[derive(Clone, Copy, Debug)]
pub struct TransferCmd {
    pub from_account_id: i32,
    pub to_account_id: i32,
    pub amount: f64,
}

impl TransferCmd {
    #[must_use]
    pub fn new(from_account_id: i32, to_account_id: i32, amount: f64) -> Self {
        Self {
            from_account_id,
            to_account_id,
            amount,
        }
    }
}

/// Record a transaction with minimal input: the account and date are implied.
#[derive(Clone, Debug)]
pub struct QuickAddCmd {
    pub amount: f64,
    pub description: String,
    pub category_name: Option<String>,
}

impl QuickAddCmd {
    #[must_use]
    pub fn new(amount: f64, description: impl Into<String>) -> Self {
        Self {
            amount,
            description: description.into(),
            category_name: None,
        }
    }

    #[must_use]
    pub fn category_name(mut self, name: impl Into<String>) -> Self {
        self.category_name = Some(name.into());
        self
    }
}

#[derive(Clone, Debug)]
pub struct NewAccountCmd {
    pub name: String,
    pub kind: String,
    pub opening_balance: f64,
    pub currency: Option<String>,
    pub color: Option<String>,
    pub icon: Option<String>,
    pub account_number: Option<String>,
    pub institution: Option<String>,
    pub include_in_total: bool,
}

impl NewAccountCmd {
    #[must_use]
    pub fn new(name: impl Into<String>, kind: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: kind.into(),
            opening_balance: 0.0,
            currency: None,
            color: None,
            icon: None,
            account_number: None,
            institution: None,
            include_in_total: true,
        }
    }

    #[must_use]
    pub fn opening_balance(mut self, balance: f64) -> Self {
        self.opening_balance = balance;
        self
    }

    #[must_use]
    pub fn currency(mut self, currency: impl Into<String>) -> Self {
        self.currency = Some(currency.into());
        self
    }

    #[must_use]
    pub fn color(mut self, color: impl Into<String>) -> Self {
        self.color = Some(color.into());
        self
    }

    #[must_use]
    pub fn icon(mut self, icon: impl Into<String>) -> Self {
        self.icon = Some(icon.into());
        self
    }

    #[must_use]
    pub fn account_number(mut self, number: impl Into<String>) -> Self {
        self.account_number = Some(number.into());
        self
    }

    #[must_use]
    pub fn institution(mut self, institution: impl Into<String>) -> Self {
        self.institution = Some(institution.into());
        self
    }

    /// Keep the account out of the net-worth total.
    #[must_use]
    pub fn tracking_only(mut self) -> Self {
        self.include_in_total = false;
        self
    }
}

#[derive(Clone, Debug)]
pub struct NewCategoryCmd {
    pub name: String,
    pub kind: Option<String>,
    pub color: Option<String>,
    pub icon: Option<String>,
    pub parent_category_id: Option<i32>,
}

impl NewCategoryCmd {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: None,
            color: None,
            icon: None,
            parent_category_id: None,
        }
    }

    #[must_use]
    pub fn kind(mut self, kind: impl Into<String>) -> Self {
        self.kind = Some(kind.into());
        self
    }

    #[must_use]
    pub fn color(mut self, color: impl Into<String>) -> Self {
        self.color = Some(color.into());
        self
    }

    #[must_use]
    pub fn icon(mut self, icon: impl Into<String>) -> Self {
        self.icon = Some(icon.into());
        self
    }

    #[must_use]
    pub fn parent(mut self, parent_category_id: i32) -> Self {
        self.parent_category_id = Some(parent_category_id);
        self
    }
}

#[derive(Clone, Debug)]
pub struct NewBillCmd {
    pub name: String,
    pub amount: f64,
    pub category_id: i32,
    pub due_date: NaiveDate,
    pub frequency: Option<String>,
    pub auto_pay: bool,
}

impl NewBillCmd {
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        amount: f64,
        category_id: i32,
        due_date: NaiveDate,
    ) -> Self {
        Self {
            name: name.into(),
            amount,
            category_id,
            due_date,
            frequency: None,
            auto_pay: false,
        }
    }

    #[must_use]
    pub fn frequency(mut self, frequency: impl Into<String>) -> Self {
        self.frequency = Some(frequency.into());
        self
    }

    #[must_use]
    pub fn auto_pay(mut self, auto_pay: bool) -> Self {
        self.auto_pay = auto_pay;
        self
    }
}

#[derive(Clone, Debug)]
pub struct NewBudgetCmd {
    pub category_id: Option<i32>,
    pub amount: f64,
    pub period: String,
    pub start_date: NaiveDate,
}

impl NewBudgetCmd {
    #[must_use]
    pub fn new(amount: f64, period: impl Into<String>, start_date: NaiveDate) -> Self {
        Self {
            category_id: None,
            amount,
            period: period.into(),
            start_date,
        }
    }

    #[must_use]
    pub fn category_id(mut self, category_id: i32) -> Self {
        self.category_id = Some(category_id);
        self
    }
}

#[derive(Clone, Debug)]
pub struct NewSavingsGoalCmd {
    pub name: String,
    pub target_amount: f64,
    pub current_amount: f64,
    pub target_date: Option<NaiveDate>,
}

impl NewSavingsGoalCmd {
    #[must_use]
    pub fn new(name: impl Into<String>, target_amount: f64) -> Self {
        Self {
            name: name.into(),
            target_amount,
            current_amount: 0.0,
            target_date: None,
        }
    }

    #[must_use]
    pub fn current_amount(mut self, amount: f64) -> Self {
        self.current_amount = amount;
        self
    }

    #[must_use]
    pub fn target_date(mut self, date: NaiveDate) -> Self {
        self.target_date = Some(date);
        self
    }
}
