//! Initial schema migration - creates all tables from scratch.
//!
//! - `users`: credential holders, owners of everything else
//! - `accounts`: places where money is kept, with a cached balance
//! - `categories`: global (no owner) or private transaction categories
//! - `transactions`: signed movements on one account
//! - `bills`: recurring payments with a next due date
//! - `budgets`: spending limits, optionally per category
//! - `savings_goals`: manually tracked targets
//! - `balance_entries`: append-only journal behind `accounts.balance`

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

// ─────────────────────────────────────────────────────────────────────────────
// Table identifiers
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Iden)]
enum Users {
    Table,
    Id,
    Username,
    Email,
    PasswordHash,
    FullName,
    Currency,
    MonthlyIncome,
    IsActive,
    CreatedAt,
}

#[derive(Iden)]
enum Accounts {
    Table,
    Id,
    UserId,
    Name,
    Kind,
    Balance,
    Currency,
    AccountNumber,
    Institution,
    Color,
    Icon,
    IsActive,
    IncludeInTotal,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
pub(crate) enum Categories {
    Table,
    Id,
    UserId,
    Name,
    Kind,
    Icon,
    Color,
    ParentCategoryId,
    IsEssential,
    IsActive,
    CreatedAt,
}

#[derive(Iden)]
enum Transactions {
    Table,
    Id,
    UserId,
    AccountId,
    CategoryId,
    Amount,
    Description,
    TransactionDate,
    Merchant,
    PaymentMethod,
    Notes,
    CreatedAt,
}

#[derive(Iden)]
enum Bills {
    Table,
    Id,
    UserId,
    CategoryId,
    Name,
    Amount,
    DueDay,
    Frequency,
    NextDueDate,
    IsActive,
    AutoPay,
    ReminderDays,
    CreatedAt,
}

#[derive(Iden)]
enum Budgets {
    Table,
    Id,
    UserId,
    CategoryId,
    Amount,
    Period,
    StartDate,
    EndDate,
    IsActive,
    CreatedAt,
}

#[derive(Iden)]
enum SavingsGoals {
    Table,
    Id,
    UserId,
    Name,
    TargetAmount,
    CurrentAmount,
    TargetDate,
    IsCompleted,
    CreatedAt,
}

#[derive(Iden)]
enum BalanceEntries {
    Table,
    Id,
    AccountId,
    UserId,
    Delta,
    Source,
    TransactionId,
    CreatedAt,
}

fn id_col<T: IntoIden>(col: T) -> ColumnDef {
    ColumnDef::new(col)
        .integer()
        .not_null()
        .auto_increment()
        .primary_key()
        .to_owned()
}

fn owner_fk<T: IntoIden + 'static>(name: &str, table: T, col: impl IntoIden) -> ForeignKeyCreateStatement {
    ForeignKey::create()
        .name(name)
        .from(table, col)
        .to(Users::Table, Users::Id)
        .on_delete(ForeignKeyAction::Cascade)
        .to_owned()
}

// ─────────────────────────────────────────────────────────────────────────────
// Migration implementation
// ─────────────────────────────────────────────────────────────────────────────

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // ───────────────────────────────────────────────────────────────────
        // 1. Users
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(Users::Table)
                    .if_not_exists()
                    .col(&mut id_col(Users::Id))
                    .col(ColumnDef::new(Users::Username).string().not_null().unique_key())
                    .col(ColumnDef::new(Users::Email).string().not_null().unique_key())
                    .col(ColumnDef::new(Users::PasswordHash).string().not_null())
                    .col(ColumnDef::new(Users::FullName).string())
                    .col(ColumnDef::new(Users::Currency).string().default("USD"))
                    .col(ColumnDef::new(Users::MonthlyIncome).double())
                    .col(ColumnDef::new(Users::IsActive).boolean().default(true))
                    .col(ColumnDef::new(Users::CreatedAt).timestamp_with_time_zone())
                    .to_owned(),
            )
            .await?;

        // ───────────────────────────────────────────────────────────────────
        // 2. Accounts
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(Accounts::Table)
                    .if_not_exists()
                    .col(&mut id_col(Accounts::Id))
                    .col(ColumnDef::new(Accounts::UserId).integer().not_null())
                    .col(ColumnDef::new(Accounts::Name).string().not_null())
                    .col(ColumnDef::new(Accounts::Kind).string().not_null())
                    .col(ColumnDef::new(Accounts::Balance).double())
                    .col(ColumnDef::new(Accounts::Currency).string().default("USD"))
                    .col(ColumnDef::new(Accounts::AccountNumber).string())
                    .col(ColumnDef::new(Accounts::Institution).string())
                    .col(ColumnDef::new(Accounts::Color).string())
                    .col(ColumnDef::new(Accounts::Icon).string())
                    .col(ColumnDef::new(Accounts::IsActive).boolean().default(true))
                    .col(ColumnDef::new(Accounts::IncludeInTotal).boolean().default(true))
                    .col(ColumnDef::new(Accounts::CreatedAt).timestamp_with_time_zone())
                    .col(ColumnDef::new(Accounts::UpdatedAt).timestamp_with_time_zone())
                    .foreign_key(&mut owner_fk(
                        "fk-accounts-user_id",
                        Accounts::Table,
                        Accounts::UserId,
                    ))
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-accounts-user_id")
                    .table(Accounts::Table)
                    .col(Accounts::UserId)
                    .to_owned(),
            )
            .await?;

        // ───────────────────────────────────────────────────────────────────
        // 3. Categories
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(Categories::Table)
                    .if_not_exists()
                    .col(&mut id_col(Categories::Id))
                    .col(ColumnDef::new(Categories::UserId).integer())
                    .col(ColumnDef::new(Categories::Name).string().not_null())
                    .col(
                        ColumnDef::new(Categories::Kind)
                            .string()
                            .not_null()
                            .default("Expense"),
                    )
                    .col(ColumnDef::new(Categories::Icon).string())
                    .col(ColumnDef::new(Categories::Color).string())
                    .col(ColumnDef::new(Categories::ParentCategoryId).integer())
                    .col(ColumnDef::new(Categories::IsEssential).boolean().default(false))
                    .col(ColumnDef::new(Categories::IsActive).boolean().default(true))
                    .col(ColumnDef::new(Categories::CreatedAt).timestamp_with_time_zone())
                    .foreign_key(&mut owner_fk(
                        "fk-categories-user_id",
                        Categories::Table,
                        Categories::UserId,
                    ))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-categories-parent_category_id")
                            .from(Categories::Table, Categories::ParentCategoryId)
                            .to(Categories::Table, Categories::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        // ───────────────────────────────────────────────────────────────────
        // 4. Transactions
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(Transactions::Table)
                    .if_not_exists()
                    .col(&mut id_col(Transactions::Id))
                    .col(ColumnDef::new(Transactions::UserId).integer().not_null())
                    .col(ColumnDef::new(Transactions::AccountId).integer().not_null())
                    .col(ColumnDef::new(Transactions::CategoryId).integer().not_null())
                    .col(ColumnDef::new(Transactions::Amount).double().not_null())
                    .col(ColumnDef::new(Transactions::Description).string().not_null())
                    .col(ColumnDef::new(Transactions::TransactionDate).date().not_null())
                    .col(ColumnDef::new(Transactions::Merchant).string())
                    .col(ColumnDef::new(Transactions::PaymentMethod).string())
                    .col(ColumnDef::new(Transactions::Notes).text())
                    .col(ColumnDef::new(Transactions::CreatedAt).timestamp_with_time_zone())
                    .foreign_key(&mut owner_fk(
                        "fk-transactions-user_id",
                        Transactions::Table,
                        Transactions::UserId,
                    ))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-transactions-account_id")
                            .from(Transactions::Table, Transactions::AccountId)
                            .to(Accounts::Table, Accounts::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-transactions-category_id")
                            .from(Transactions::Table, Transactions::CategoryId)
                            .to(Categories::Table, Categories::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-transactions-user_id-transaction_date")
                    .table(Transactions::Table)
                    .col(Transactions::UserId)
                    .col(Transactions::TransactionDate)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-transactions-account_id")
                    .table(Transactions::Table)
                    .col(Transactions::AccountId)
                    .to_owned(),
            )
            .await?;

        // ───────────────────────────────────────────────────────────────────
        // 5. Bills
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(Bills::Table)
                    .if_not_exists()
                    .col(&mut id_col(Bills::Id))
                    .col(ColumnDef::new(Bills::UserId).integer().not_null())
                    .col(ColumnDef::new(Bills::CategoryId).integer().not_null())
                    .col(ColumnDef::new(Bills::Name).string().not_null())
                    .col(ColumnDef::new(Bills::Amount).double().not_null())
                    .col(ColumnDef::new(Bills::DueDay).integer().not_null())
                    .col(ColumnDef::new(Bills::Frequency).string().default("Monthly"))
                    .col(ColumnDef::new(Bills::NextDueDate).date().not_null())
                    .col(ColumnDef::new(Bills::IsActive).boolean().default(true))
                    .col(ColumnDef::new(Bills::AutoPay).boolean().default(false))
                    .col(ColumnDef::new(Bills::ReminderDays).integer())
                    .col(ColumnDef::new(Bills::CreatedAt).timestamp_with_time_zone())
                    .foreign_key(&mut owner_fk("fk-bills-user_id", Bills::Table, Bills::UserId))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-bills-category_id")
                            .from(Bills::Table, Bills::CategoryId)
                            .to(Categories::Table, Categories::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .to_owned(),
            )
            .await?;

        // ───────────────────────────────────────────────────────────────────
        // 6. Budgets
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(Budgets::Table)
                    .if_not_exists()
                    .col(&mut id_col(Budgets::Id))
                    .col(ColumnDef::new(Budgets::UserId).integer().not_null())
                    .col(ColumnDef::new(Budgets::CategoryId).integer())
                    .col(ColumnDef::new(Budgets::Amount).double().not_null())
                    .col(ColumnDef::new(Budgets::Period).string().not_null())
                    .col(ColumnDef::new(Budgets::StartDate).date().not_null())
                    .col(ColumnDef::new(Budgets::EndDate).date())
                    .col(ColumnDef::new(Budgets::IsActive).boolean().default(true))
                    .col(ColumnDef::new(Budgets::CreatedAt).timestamp_with_time_zone())
                    .foreign_key(&mut owner_fk(
                        "fk-budgets-user_id",
                        Budgets::Table,
                        Budgets::UserId,
                    ))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-budgets-category_id")
                            .from(Budgets::Table, Budgets::CategoryId)
                            .to(Categories::Table, Categories::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // ───────────────────────────────────────────────────────────────────
        // 7. Savings goals
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(SavingsGoals::Table)
                    .if_not_exists()
                    .col(&mut id_col(SavingsGoals::Id))
                    .col(ColumnDef::new(SavingsGoals::UserId).integer().not_null())
                    .col(ColumnDef::new(SavingsGoals::Name).string().not_null())
                    .col(ColumnDef::new(SavingsGoals::TargetAmount).double().not_null())
                    .col(ColumnDef::new(SavingsGoals::CurrentAmount).double().default(0.0))
                    .col(ColumnDef::new(SavingsGoals::TargetDate).date())
                    .col(ColumnDef::new(SavingsGoals::IsCompleted).boolean().default(false))
                    .col(ColumnDef::new(SavingsGoals::CreatedAt).timestamp_with_time_zone())
                    .foreign_key(&mut owner_fk(
                        "fk-savings_goals-user_id",
                        SavingsGoals::Table,
                        SavingsGoals::UserId,
                    ))
                    .to_owned(),
            )
            .await?;

        // ───────────────────────────────────────────────────────────────────
        // 8. Balance journal
        // ───────────────────────────────────────────────────────────────────
        // No foreign key on `transaction_id`: entries outlive deleted
        // transactions.
        manager
            .create_table(
                Table::create()
                    .table(BalanceEntries::Table)
                    .if_not_exists()
                    .col(&mut id_col(BalanceEntries::Id))
                    .col(ColumnDef::new(BalanceEntries::AccountId).integer().not_null())
                    .col(ColumnDef::new(BalanceEntries::UserId).integer().not_null())
                    .col(ColumnDef::new(BalanceEntries::Delta).double().not_null())
                    .col(ColumnDef::new(BalanceEntries::Source).string().not_null())
                    .col(ColumnDef::new(BalanceEntries::TransactionId).integer())
                    .col(
                        ColumnDef::new(BalanceEntries::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-balance_entries-account_id")
                            .from(BalanceEntries::Table, BalanceEntries::AccountId)
                            .to(Accounts::Table, Accounts::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(&mut owner_fk(
                        "fk-balance_entries-user_id",
                        BalanceEntries::Table,
                        BalanceEntries::UserId,
                    ))
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-balance_entries-account_id")
                    .table(BalanceEntries::Table)
                    .col(BalanceEntries::AccountId)
                    .col(BalanceEntries::Id)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(BalanceEntries::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(SavingsGoals::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Budgets::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Bills::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Transactions::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Categories::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Accounts::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Users::Table).to_owned())
            .await?;
        Ok(())
    }
}
