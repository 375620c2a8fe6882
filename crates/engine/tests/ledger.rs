use chrono::NaiveDate;
use sea_orm::{
    ConnectOptions, ConnectionTrait, Database, DatabaseConnection, EntityTrait, Statement,
};

use engine::{
    BudgetStatus, Caller, Engine, EngineError, EntrySource, NewAccountCmd, NewBillCmd,
    NewBudgetCmd, NewCategoryCmd, NewTransactionCmd, QuickAddCmd, TransactionListFilter, TransferCmd, UpdateTransactionCmd,
};
use migration::MigratorTrait;
use uuid::Uuid;

const GENERAL: i32 = 1;
const SALARY: i32 = 2;
const GROCERIES: i32 = 3;
const COFFEE: i32 = 4;
const SUBSCRIPTIONS: i32 = 5;
const SHOPPING: i32 = 8;

fn day(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn today() -> NaiveDate {
    day(2024, 3, 14)
}

async fn engine_with_db() -> (Engine, DatabaseConnection, Caller, Caller) {
    let db = Database::connect("sqlite::memory:").await.unwrap();
    migration::Migrator::up(&db, None).await.unwrap();
    let engine = Engine::builder()
        .database(db.clone())
        .password_cost(4)
        .build()
        .await
        .unwrap();
    let alice = engine
        .create_user("alice", "alice@example.com", "password")
        .await
        .unwrap();
    let bob = engine
        .create_user("bob", "bob@example.com", "hunter2")
        .await
        .unwrap();
    (engine, db, alice, bob)
}

async fn engine_with_file_db() -> (Engine, Caller, std::path::PathBuf) {
    let root = std::path::PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../target/test_dbs");
    std::fs::create_dir_all(&root).unwrap();

    let path = root.join(format!("ledger_{}.db", Uuid::new_v4()));
    let url = format!("sqlite:{}?mode=rwc", path.display());

    let mut options = ConnectOptions::new(url);
    options.max_connections(4).sqlx_logging(false);
    let db = Database::connect(options).await.unwrap();
    migration::Migrator::up(&db, None).await.unwrap();
    let engine = Engine::builder()
        .database(db)
        .password_cost(4)
        .build()
        .await
        .unwrap();
    let alice = engine
        .create_user("alice", "alice@example.com", "password")
        .await
        .unwrap();
    (engine, alice, path)
}

async fn open_account(engine: &Engine, caller: Caller, name: &str, opening: f64) -> i32 {
    engine
        .create_account(
            caller,
            NewAccountCmd::new(name, "Bank").opening_balance(opening),
        )
        .await
        .unwrap()
        .id
}

async fn balance(engine: &Engine, caller: Caller, account_id: i32) -> f64 {
    engine.account(caller, account_id).await.unwrap().balance
}

async fn assert_replayable(engine: &Engine, caller: Caller, account_id: i32) {
    let audit = engine.audit_account(caller, account_id).await.unwrap();
    assert_eq!(
        audit.cached, audit.replayed,
        "cached balance of account {account_id} differs from its journal"
    );
}

async fn transaction_count(db: &DatabaseConnection) -> i64 {
    let row = db
        .query_one(Statement::from_string(
            db.get_database_backend(),
            "SELECT COUNT(*) AS n FROM transactions",
        ))
        .await
        .unwrap()
        .unwrap();
    row.try_get("", "n").unwrap()
}

#[tokio::test]
async fn create_then_delete_restores_balance() {
    let (engine, db, alice, _bob) = engine_with_db().await;
    let account_id = open_account(&engine, alice, "Checking", 100.0).await;

    let created = engine
        .create_transaction(
            alice,
            NewTransactionCmd::new(account_id, -12.5, "Lunch", GROCERIES, today())
                .merchant("Deli")
                .notes("with Bob"),
        )
        .await
        .unwrap();
    assert_eq!(created.account_name, "Checking");
    assert_eq!(created.category_name, "Groceries");
    assert_eq!(created.merchant.as_deref(), Some("Deli"));
    assert_eq!(balance(&engine, alice, account_id).await, 87.5);
    assert_replayable(&engine, alice, account_id).await;

    let change = engine.delete_transaction(alice, created.id).await.unwrap();
    assert_eq!(change.new_balance, Some(100.0));
    assert_eq!(balance(&engine, alice, account_id).await, 100.0);
    assert_eq!(transaction_count(&db).await, 0);
    assert_replayable(&engine, alice, account_id).await;

    let sources: Vec<EntrySource> = engine
        .balance_entries(alice, account_id)
        .await
        .unwrap()
        .into_iter()
        .map(|entry| entry.source)
        .collect();
    assert_eq!(
        sources,
        vec![
            EntrySource::Opening,
            EntrySource::Transaction,
            EntrySource::Reversal
        ]
    );
}

#[tokio::test]
async fn edit_matches_delete_then_create() {
    let (engine, _db, alice, _bob) = engine_with_db().await;
    let edited = open_account(&engine, alice, "Edited", 100.0).await;
    let recreated = open_account(&engine, alice, "Recreated", 100.0).await;

    let tx = engine
        .create_transaction(
            alice,
            NewTransactionCmd::new(edited, -10.0, "Coffee", COFFEE, today()),
        )
        .await
        .unwrap();
    let change = engine
        .update_transaction(
            alice,
            UpdateTransactionCmd::new(tx.id, -15.0, "Coffee x2", COFFEE, today()),
        )
        .await
        .unwrap();
    assert_eq!(change.new_balance, Some(85.0));

    let first = engine
        .create_transaction(
            alice,
            NewTransactionCmd::new(recreated, -10.0, "Coffee", COFFEE, today()),
        )
        .await
        .unwrap();
    engine.delete_transaction(alice, first.id).await.unwrap();
    engine
        .create_transaction(
            alice,
            NewTransactionCmd::new(recreated, -15.0, "Coffee x2", COFFEE, today()),
        )
        .await
        .unwrap();

    assert_eq!(
        balance(&engine, alice, edited).await,
        balance(&engine, alice, recreated).await
    );
    let detail = engine.transaction_detail(alice, tx.id).await.unwrap();
    assert_eq!(detail.amount, -15.0);
    assert_eq!(detail.description, "Coffee x2");
    assert_replayable(&engine, alice, edited).await;
    assert_replayable(&engine, alice, recreated).await;
}

#[tokio::test]
async fn edit_can_move_transaction_between_accounts() {
    let (engine, _db, alice, _bob) = engine_with_db().await;
    let wallet = open_account(&engine, alice, "Wallet", 50.0).await;
    let card = open_account(&engine, alice, "Card", 200.0).await;

    let tx = engine
        .create_transaction(
            alice,
            NewTransactionCmd::new(wallet, -20.0, "Groceries", GROCERIES, today()),
        )
        .await
        .unwrap();
    assert_eq!(balance(&engine, alice, wallet).await, 30.0);

    let change = engine
        .update_transaction(
            alice,
            UpdateTransactionCmd::new(tx.id, -25.0, "Groceries", GROCERIES, today())
                .account_id(card),
        )
        .await
        .unwrap();
    assert_eq!(change.account_id, card);
    assert_eq!(change.new_balance, Some(175.0));
    assert_eq!(balance(&engine, alice, wallet).await, 50.0);
    assert_eq!(balance(&engine, alice, card).await, 175.0);
    assert_replayable(&engine, alice, wallet).await;
    assert_replayable(&engine, alice, card).await;
}

#[tokio::test]
async fn failed_edit_leaves_everything_untouched() {
    let (engine, _db, alice, bob) = engine_with_db().await;
    let wallet = open_account(&engine, alice, "Wallet", 50.0).await;
    let bobs = open_account(&engine, bob, "Bob's", 10.0).await;

    let tx = engine
        .create_transaction(
            alice,
            NewTransactionCmd::new(wallet, -20.0, "Groceries", GROCERIES, today()),
        )
        .await
        .unwrap();

    let err = engine
        .update_transaction(
            alice,
            UpdateTransactionCmd::new(tx.id, -25.0, "Groceries", GROCERIES, today())
                .account_id(bobs),
        )
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::NotFound(_)));
    assert_eq!(balance(&engine, alice, wallet).await, 30.0);
    assert_eq!(balance(&engine, bob, bobs).await, 10.0);
    assert_eq!(
        engine.transaction_detail(alice, tx.id).await.unwrap().amount,
        -20.0
    );
    assert_replayable(&engine, alice, wallet).await;
}

async fn entry_count(engine: &Engine, caller: Caller, account_id: i32) -> usize {
    engine
        .balance_entries(caller, account_id)
        .await
        .unwrap()
        .len()
}

#[tokio::test]
async fn failed_bill_payment_rolls_back_every_write() {
    let (engine, db, alice, _bob) = engine_with_db().await;
    let account_id = open_account(&engine, alice, "Checking", 200.0).await;
    let bill = engine
        .create_bill(
            alice,
            NewBillCmd::new("Streaming", 20.0, SUBSCRIPTIONS, day(2024, 3, 20)),
        )
        .await
        .unwrap();
    let entries_before = entry_count(&engine, alice, account_id).await;

    // The bill row is written last, after the payment and the balance.
    db.execute_unprepared(
        "CREATE TRIGGER reject_bill_update BEFORE UPDATE ON bills \
         BEGIN SELECT RAISE(ABORT, 'bill locked'); END",
    )
    .await
    .unwrap();

    let err = engine
        .pay_bill(alice, bill.id, account_id, today())
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::Database(_)));
    assert!(!err.is_client_error());

    assert_eq!(balance(&engine, alice, account_id).await, 200.0);
    assert_eq!(entry_count(&engine, alice, account_id).await, entries_before);
    assert_eq!(transaction_count(&db).await, 0);
    assert_replayable(&engine, alice, account_id).await;
    let upcoming = engine.upcoming_bills(alice, today()).await.unwrap();
    assert_eq!(upcoming[0].id, bill.id);
    assert_eq!(upcoming[0].due_date, day(2024, 3, 20));
}

#[tokio::test]
async fn failed_edit_after_balance_write_rolls_back() {
    let (engine, db, alice, _bob) = engine_with_db().await;
    let wallet = open_account(&engine, alice, "Wallet", 50.0).await;
    let card = open_account(&engine, alice, "Card", 100.0).await;
    let tx = engine
        .create_transaction(
            alice,
            NewTransactionCmd::new(wallet, -20.0, "Groceries", GROCERIES, today()),
        )
        .await
        .unwrap();
    let wallet_entries = entry_count(&engine, alice, wallet).await;
    let card_entries = entry_count(&engine, alice, card).await;

    // Both balances are written before the transaction row itself.
    db.execute_unprepared(
        "CREATE TRIGGER reject_transaction_update BEFORE UPDATE ON transactions \
         BEGIN SELECT RAISE(ABORT, 'transaction locked'); END",
    )
    .await
    .unwrap();

    let err = engine
        .update_transaction(
            alice,
            UpdateTransactionCmd::new(tx.id, -35.0, "Groceries", GROCERIES, today())
                .account_id(card),
        )
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::Database(_)));

    let err = engine
        .update_transaction(
            alice,
            UpdateTransactionCmd::new(tx.id, -35.0, "Groceries", GROCERIES, today()),
        )
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::Database(_)));

    assert_eq!(balance(&engine, alice, wallet).await, 30.0);
    assert_eq!(balance(&engine, alice, card).await, 100.0);
    assert_eq!(entry_count(&engine, alice, wallet).await, wallet_entries);
    assert_eq!(entry_count(&engine, alice, card).await, card_entries);
    assert_eq!(transaction_count(&db).await, 1);
    let detail = engine.transaction_detail(alice, tx.id).await.unwrap();
    assert_eq!(detail.amount, -20.0);
    assert_eq!(detail.account_id, wallet);
    assert_replayable(&engine, alice, wallet).await;
    assert_replayable(&engine, alice, card).await;
}

#[tokio::test]
async fn edit_replaces_optional_details() {
    let (engine, _db, alice, _bob) = engine_with_db().await;
    let account_id = open_account(&engine, alice, "Checking", 100.0).await;
    let tx = engine
        .create_transaction(
            alice,
            NewTransactionCmd::new(account_id, -12.5, "Lunch", GROCERIES, today())
                .merchant("Deli")
                .payment_method("Card")
                .notes("with Bob"),
        )
        .await
        .unwrap();

    engine
        .update_transaction(
            alice,
            UpdateTransactionCmd::new(tx.id, -12.5, "Lunch", GROCERIES, today())
                .payment_method(" Cash "),
        )
        .await
        .unwrap();
    let detail = engine.transaction_detail(alice, tx.id).await.unwrap();
    assert_eq!(detail.merchant, None);
    assert_eq!(detail.payment_method.as_deref(), Some("Cash"));
    assert_eq!(detail.notes, None);

    engine
        .update_transaction(
            alice,
            UpdateTransactionCmd::new(tx.id, -12.5, "Lunch", GROCERIES, today())
                .merchant("Cafe")
                .notes("   "),
        )
        .await
        .unwrap();
    let detail = engine.transaction_detail(alice, tx.id).await.unwrap();
    assert_eq!(detail.merchant.as_deref(), Some("Cafe"));
    assert_eq!(detail.payment_method, None);
    assert_eq!(detail.notes, None);
    assert_eq!(balance(&engine, alice, account_id).await, 87.5);
}

#[tokio::test]
async fn transfer_moves_money_and_rejects_overdraft() {
    let (engine, db, alice, _bob) = engine_with_db().await;
    let source = open_account(&engine, alice, "Savings", 100.0).await;
    let destination = open_account(&engine, alice, "Checking", 50.0).await;

    let outcome = engine
        .transfer(alice, TransferCmd::new(source, destination, 30.0))
        .await
        .unwrap();
    assert_eq!(outcome.from_balance, 70.0);
    assert_eq!(outcome.to_balance, 80.0);

    let err = engine
        .transfer(alice, TransferCmd::new(source, destination, 150.0))
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::InsufficientFunds(_)));
    assert_eq!(balance(&engine, alice, source).await, 70.0);
    assert_eq!(balance(&engine, alice, destination).await, 80.0);

    let err = engine
        .transfer(alice, TransferCmd::new(source, source, 1.0))
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::InvalidInput(_)));

    let err = engine
        .transfer(alice, TransferCmd::new(source, destination, -5.0))
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::InvalidInput(_)));

    assert_eq!(transaction_count(&db).await, 0);
    let sources: Vec<EntrySource> = engine
        .balance_entries(alice, destination)
        .await
        .unwrap()
        .into_iter()
        .map(|entry| entry.source)
        .collect();
    assert_eq!(sources, vec![EntrySource::Opening, EntrySource::TransferIn]);
    assert_replayable(&engine, alice, source).await;
    assert_replayable(&engine, alice, destination).await;
}

#[tokio::test]
async fn transfer_checks_source_against_destination_first() {
    let (engine, _db, alice, _bob) = engine_with_db().await;
    // Neither account exists, but the same-account check comes first.
    let err = engine
        .transfer(alice, TransferCmd::new(404, 404, 1.0))
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::InvalidInput(_)));
}

#[tokio::test]
async fn reconcile_below_a_cent_is_a_no_op() {
    let (engine, db, alice, _bob) = engine_with_db().await;
    let account_id = open_account(&engine, alice, "Cash", 100.0).await;

    let outcome = engine
        .reconcile(alice, account_id, 100.005, today())
        .await
        .unwrap();
    assert!(!outcome.adjusted());
    assert_eq!(outcome.adjustment, 0.0);
    assert_eq!(balance(&engine, alice, account_id).await, 100.0);
    assert_eq!(transaction_count(&db).await, 0);
}

#[tokio::test]
async fn reconcile_writes_adjustment_that_can_be_deleted() {
    let (engine, _db, alice, _bob) = engine_with_db().await;
    let account_id = open_account(&engine, alice, "Cash", 100.0).await;

    let outcome = engine
        .reconcile(alice, account_id, 150.0, today())
        .await
        .unwrap();
    assert_eq!(outcome.balance, 150.0);
    assert_eq!(outcome.adjustment, 50.0);
    let transaction_id = outcome.transaction_id.unwrap();

    let detail = engine
        .transaction_detail(alice, transaction_id)
        .await
        .unwrap();
    assert_eq!(detail.amount, 50.0);
    assert_eq!(detail.description, "Balance Adjustment (Manual Sync)");
    assert_eq!(detail.category_name, "Balance Adjustment");
    assert_eq!(detail.notes.as_deref(), Some("Adjusted from 100 to 150"));
    assert_eq!(balance(&engine, alice, account_id).await, 150.0);
    assert_replayable(&engine, alice, account_id).await;

    engine
        .delete_transaction(alice, transaction_id)
        .await
        .unwrap();
    assert_eq!(balance(&engine, alice, account_id).await, 100.0);
    assert_replayable(&engine, alice, account_id).await;
}

#[tokio::test]
async fn pay_and_skip_bill() {
    let (engine, db, alice, _bob) = engine_with_db().await;
    let account_id = open_account(&engine, alice, "Checking", 200.0).await;
    let bill = engine
        .create_bill(
            alice,
            NewBillCmd::new("Streaming", 20.0, SUBSCRIPTIONS, day(2024, 1, 31)),
        )
        .await
        .unwrap();
    assert_eq!(bill.due_day, 31);
    assert_eq!(bill.frequency, "Monthly");

    let payment = engine
        .pay_bill(alice, bill.id, account_id, today())
        .await
        .unwrap();
    assert_eq!(payment.new_balance, 180.0);
    assert_eq!(payment.next_due_date, day(2024, 2, 29));

    let detail = engine
        .transaction_detail(alice, payment.transaction_id)
        .await
        .unwrap();
    assert_eq!(detail.amount, -20.0);
    assert_eq!(detail.description, "Bill Paid: Streaming");
    assert_eq!(detail.category_id, SUBSCRIPTIONS);
    assert_eq!(detail.transaction_date, today());

    let skip = engine.skip_bill(alice, bill.id).await.unwrap();
    assert_eq!(skip.skipped_due_date, day(2024, 2, 29));
    assert_eq!(skip.next_due_date, day(2024, 3, 29));
    assert_eq!(
        skip.message(),
        "Skipped payment for February. Next due date updated."
    );
    assert_eq!(balance(&engine, alice, account_id).await, 180.0);
    assert_eq!(transaction_count(&db).await, 1);
    assert_replayable(&engine, alice, account_id).await;
}

#[tokio::test]
async fn cross_user_ids_are_not_found() {
    let (engine, _db, alice, bob) = engine_with_db().await;
    let alices = open_account(&engine, alice, "Alice", 100.0).await;
    let bobs = open_account(&engine, bob, "Bob", 100.0).await;
    let tx = engine
        .create_transaction(
            alice,
            NewTransactionCmd::new(alices, -10.0, "Lunch", GROCERIES, today()),
        )
        .await
        .unwrap();
    let bill = engine
        .create_bill(alice, NewBillCmd::new("Rent", 50.0, GENERAL, today()))
        .await
        .unwrap();

    let not_found = |err: EngineError| matches!(err, EngineError::NotFound(_));

    assert!(not_found(engine.transaction_detail(bob, tx.id).await.unwrap_err()));
    assert!(not_found(engine.account(bob, alices).await.unwrap_err()));
    assert!(not_found(
        engine
            .update_transaction(
                bob,
                UpdateTransactionCmd::new(tx.id, -1.0, "x", GENERAL, today())
            )
            .await
            .unwrap_err()
    ));
    assert!(not_found(
        engine.delete_transaction(bob, tx.id).await.unwrap_err()
    ));
    assert!(not_found(
        engine
            .transfer(bob, TransferCmd::new(bobs, alices, 10.0))
            .await
            .unwrap_err()
    ));
    assert!(not_found(
        engine
            .transfer(bob, TransferCmd::new(alices, bobs, 10.0))
            .await
            .unwrap_err()
    ));
    assert!(not_found(
        engine
            .create_transaction(
                bob,
                NewTransactionCmd::new(alices, 5.0, "x", GENERAL, today())
            )
            .await
            .unwrap_err()
    ));
    assert!(not_found(
        engine
            .reconcile(bob, alices, 0.0, today())
            .await
            .unwrap_err()
    ));
    assert!(not_found(
        engine
            .pay_bill(bob, bill.id, bobs, today())
            .await
            .unwrap_err()
    ));
    assert!(not_found(engine.skip_bill(bob, bill.id).await.unwrap_err()));
    assert!(not_found(engine.audit_account(bob, alices).await.unwrap_err()));

    assert_eq!(balance(&engine, alice, alices).await, 90.0);
    assert_eq!(balance(&engine, bob, bobs).await, 100.0);
}

#[tokio::test]
async fn private_categories_are_invisible_to_others() {
    let (engine, _db, alice, bob) = engine_with_db().await;
    let alices = open_account(&engine, alice, "Alice", 100.0).await;
    let bobs_category = engine
        .create_category(bob, NewCategoryCmd::new("Hobbies"))
        .await
        .unwrap();
    assert_eq!(bobs_category.color.as_deref(), Some("#6B7280"));
    assert_eq!(bobs_category.kind, "Expense");

    let err = engine
        .create_transaction(
            alice,
            NewTransactionCmd::new(alices, -5.0, "Paint", bobs_category.id, today()),
        )
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::InvalidInput(_)));
    assert_eq!(balance(&engine, alice, alices).await, 100.0);

    let names: Vec<String> = engine
        .list_categories(alice)
        .await
        .unwrap()
        .into_iter()
        .map(|category| category.name)
        .collect();
    assert!(!names.contains(&"Hobbies".to_string()));
    assert!(names.contains(&"General".to_string()));

    let err = engine
        .delete_category(alice, bobs_category.id)
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::NotFound(_)));
    let err = engine.delete_category(bob, GENERAL).await.unwrap_err();
    assert!(matches!(err, EngineError::NotFound(_)));
}

#[tokio::test]
async fn category_in_use_cannot_be_deleted() {
    let (engine, _db, alice, _bob) = engine_with_db().await;
    let account_id = open_account(&engine, alice, "Cash", 0.0).await;
    let category = engine
        .create_category(alice, NewCategoryCmd::new("Books").color("#000000"))
        .await
        .unwrap();
    let tx = engine
        .create_transaction(
            alice,
            NewTransactionCmd::new(account_id, -30.0, "Novel", category.id, today()),
        )
        .await
        .unwrap();

    let err = engine
        .delete_category(alice, category.id)
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::Conflict(_)));

    let stats = engine.category_stats(alice).await.unwrap();
    assert_eq!(stats.len(), 1);
    assert_eq!(stats[0].transaction_count, 1);
    assert_eq!(stats[0].total_spent, 30.0);

    engine.delete_transaction(alice, tx.id).await.unwrap();
    engine.delete_category(alice, category.id).await.unwrap();
}

#[tokio::test]
async fn quick_add_uses_first_active_account_and_category_name() {
    let (engine, _db, alice, _bob) = engine_with_db().await;

    let err = engine
        .quick_add(alice, QuickAddCmd::new(-4.0, "Latte"), today())
        .await
        .unwrap_err();
    assert_eq!(
        err,
        EngineError::InvalidInput("No active account found.".to_string())
    );

    let closed = open_account(&engine, alice, "Closed", 10.0).await;
    engine.deactivate_account(alice, closed).await.unwrap();
    let open = open_account(&engine, alice, "Open", 10.0).await;

    let latte = engine
        .quick_add(
            alice,
            QuickAddCmd::new(-4.0, "Latte").category_name("Coffee"),
            today(),
        )
        .await
        .unwrap();
    assert_eq!(latte.account_id, open);
    assert_eq!(latte.category_id, COFFEE);
    assert_eq!(latte.transaction_date, today());

    let misc = engine
        .quick_add(
            alice,
            QuickAddCmd::new(-1.0, "Gum").category_name("Nonexistent"),
            today(),
        )
        .await
        .unwrap();
    assert_eq!(misc.category_id, GENERAL);
    assert_eq!(misc.category_name, "General");
    assert_eq!(misc.category_color, "#6B7280");

    assert_eq!(balance(&engine, alice, open).await, 5.0);
    assert_eq!(balance(&engine, alice, closed).await, 10.0);
    assert_replayable(&engine, alice, open).await;
}

#[tokio::test]
async fn missing_account_skips_reversal() {
    let (engine, db, alice, _bob) = engine_with_db().await;
    let account_id = open_account(&engine, alice, "Gone", 100.0).await;
    let first = engine
        .create_transaction(
            alice,
            NewTransactionCmd::new(account_id, -10.0, "One", GENERAL, today()),
        )
        .await
        .unwrap();
    let second = engine
        .create_transaction(
            alice,
            NewTransactionCmd::new(account_id, -20.0, "Two", GENERAL, today()),
        )
        .await
        .unwrap();

    db.execute_unprepared("PRAGMA foreign_keys = OFF")
        .await
        .unwrap();
    db.execute(Statement::from_sql_and_values(
        db.get_database_backend(),
        "DELETE FROM accounts WHERE id = ?",
        vec![account_id.into()],
    ))
    .await
    .unwrap();

    let change = engine
        .update_transaction(
            alice,
            UpdateTransactionCmd::new(first.id, -99.0, "One edited", GENERAL, today()),
        )
        .await
        .unwrap();
    assert_eq!(change.new_balance, None);
    let detail = engine.transaction_detail(alice, first.id).await.unwrap();
    assert_eq!(detail.amount, -99.0);
    assert_eq!(detail.description, "One edited");

    let change = engine.delete_transaction(alice, second.id).await.unwrap();
    assert_eq!(change.new_balance, None);
    assert_eq!(transaction_count(&db).await, 1);
}

#[tokio::test]
async fn listing_filters_and_summary() {
    let (engine, _db, alice, _bob) = engine_with_db().await;
    let checking = open_account(&engine, alice, "Checking", 0.0).await;
    let cash = open_account(&engine, alice, "Cash", 0.0).await;

    for (account, amount, description, date) in [
        (checking, 1000.0, "Salary", day(2024, 2, 28)),
        (checking, -50.0, "Groceries run", day(2024, 3, 1)),
        (cash, -5.0, "Coffee beans", day(2024, 3, 2)),
        (checking, -25.0, "Cinema", day(2024, 3, 10)),
    ] {
        engine
            .create_transaction(
                alice,
                NewTransactionCmd::new(account, amount, description, GENERAL, date),
            )
            .await
            .unwrap();
    }

    let march = engine
        .list_transactions(
            alice,
            TransactionListFilter::default().month(2024, 3).unwrap(),
        )
        .await
        .unwrap();
    let descriptions: Vec<&str> = march.iter().map(|t| t.description.as_str()).collect();
    assert_eq!(descriptions, vec!["Cinema", "Coffee beans", "Groceries run"]);

    let on_cash = engine
        .list_transactions(
            alice,
            TransactionListFilter {
                account_id: Some(cash),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(on_cash.len(), 1);
    assert_eq!(on_cash[0].account_name, "Cash");

    let found = engine
        .list_transactions(
            alice,
            TransactionListFilter {
                query: Some("coffee".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(found.len(), 1);

    let recent = engine.recent_transactions(alice, 2).await.unwrap();
    assert_eq!(recent.len(), 2);
    assert_eq!(recent[0].description, "Cinema");

    let summary = engine
        .transaction_summary(alice, Some(day(2024, 3, 1)), None)
        .await
        .unwrap();
    assert_eq!(summary.income, 0.0);
    assert_eq!(summary.expenses, 80.0);
    assert_eq!(summary.net, -80.0);
    assert_eq!(summary.count, 3);
}

#[tokio::test]
async fn authenticate_checks_hashed_credentials() {
    let (engine, db, alice, _bob) = engine_with_db().await;
    assert_eq!(
        engine.authenticate("alice", "password").await.unwrap(),
        Some(alice)
    );
    assert_eq!(engine.authenticate("alice", "wrong").await.unwrap(), None);
    assert_eq!(engine.authenticate("carol", "password").await.unwrap(), None);

    let stored = engine::users::Entity::find_by_id(alice.user_id())
        .one(&db)
        .await
        .unwrap()
        .unwrap()
        .password_hash;
    assert!(stored.starts_with("$2"));
    assert!(!stored.contains("password"));

    let err = engine
        .create_user("alice", "other@example.com", "x")
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::Conflict(_)));
}

#[tokio::test]
async fn dashboard_and_reports_follow_the_calendar() {
    let (engine, _db, alice, bob) = engine_with_db().await;
    let checking = open_account(&engine, alice, "Checking", 1000.0).await;
    open_account(&engine, bob, "Bob", 5000.0).await;

    for (amount, description, category, date) in [
        (-100.0, "Jacket", SHOPPING, day(2024, 2, 20)),
        (500.0, "Salary", SALARY, day(2024, 3, 1)),
        (-40.0, "Market", GROCERIES, day(2024, 3, 10)),
        (-4.0, "Espresso", COFFEE, day(2024, 3, 12)),
        (-16.0, "Bakery", GROCERIES, day(2024, 3, 14)),
    ] {
        engine
            .create_transaction(
                alice,
                NewTransactionCmd::new(checking, amount, description, category, date),
            )
            .await
            .unwrap();
    }
    engine
        .create_budget(
            alice,
            NewBudgetCmd::new(50.0, "Monthly", day(2024, 3, 1)).category_id(GROCERIES),
        )
        .await
        .unwrap();
    engine
        .create_bill(
            alice,
            NewBillCmd::new("Phone", 30.0, SUBSCRIPTIONS, day(2024, 3, 18)),
        )
        .await
        .unwrap();

    let dashboard = engine.dashboard(alice, today()).await.unwrap();
    let summary = &dashboard.summary;
    assert_eq!(summary.total_balance, 1340.0);
    assert_eq!(summary.monthly_income, 500.0);
    assert_eq!(summary.monthly_expenses, 60.0);
    assert_eq!(summary.monthly_net, 440.0);
    assert_eq!(summary.todays_spending, 16.0);
    assert_eq!(summary.this_week_spending, 60.0);
    assert_eq!(summary.active_budgets, 1);
    assert_eq!(summary.upcoming_bills_count, 1);

    assert_eq!(dashboard.accounts.len(), 1);
    assert_eq!(dashboard.accounts[0].this_month_change, 440.0);
    assert_eq!(dashboard.budgets[0].spent, 56.0);
    assert_eq!(dashboard.budgets[0].status, BudgetStatus::Exceeded);
    assert_eq!(dashboard.upcoming_bills[0].days_until_due, 4);
    assert!(!dashboard.upcoming_bills[0].is_overdue);
    assert_eq!(dashboard.recent_transactions.len(), 4);
    assert_eq!(dashboard.recent_transactions[0].description, "Bakery");

    let names: Vec<&str> = dashboard
        .category_spending
        .iter()
        .map(|row| row.category_name.as_str())
        .collect();
    assert_eq!(names, vec!["Groceries", "Coffee"]);

    let trends = engine.monthly_trends(alice, today()).await.unwrap();
    let labels: Vec<&str> = trends.iter().map(|trend| trend.label.as_str()).collect();
    assert_eq!(labels, vec!["Feb", "Mar"]);
    assert_eq!(trends[0].expenses, 100.0);
    assert_eq!(trends[1].income, 500.0);

    let february = engine.spending_by_category(alice, 2024, 2).await.unwrap();
    assert_eq!(february.len(), 1);
    assert_eq!(february[0].category_name, "Shopping");
    assert_eq!(february[0].percentage, 100.0);

    let empty = engine.dashboard(bob, today()).await.unwrap();
    assert_eq!(empty.summary.total_balance, 5000.0);
    assert!(empty.recent_transactions.is_empty());
}

#[tokio::test]
async fn week_spending_stops_at_the_month_boundary() {
    let (engine, _db, alice, _bob) = engine_with_db().await;
    let checking = open_account(&engine, alice, "Checking", 100.0).await;
    // 2024-03-02 is a Saturday; its week began on Sunday 2024-02-25.
    for (amount, date) in [
        (-25.0, day(2024, 2, 24)),
        (-10.0, day(2024, 2, 27)),
        (-5.0, day(2024, 3, 1)),
        (-3.0, day(2024, 3, 2)),
    ] {
        engine
            .create_transaction(
                alice,
                NewTransactionCmd::new(checking, amount, "Snack", COFFEE, date),
            )
            .await
            .unwrap();
    }

    let summary = engine
        .dashboard(alice, day(2024, 3, 2))
        .await
        .unwrap()
        .summary;
    assert_eq!(summary.this_week_spending, 8.0);
    assert_eq!(summary.monthly_expenses, 8.0);
    assert_eq!(summary.todays_spending, 3.0);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_transfers_never_lose_updates() {
    let (engine, alice, path) = engine_with_file_db().await;
    let source = open_account(&engine, alice, "Source", 100.0).await;
    let destination = open_account(&engine, alice, "Destination", 0.0).await;
    let engine = std::sync::Arc::new(engine);

    let mut handles = Vec::new();
    for _ in 0..8 {
        let engine = engine.clone();
        handles.push(tokio::spawn(async move {
            engine
                .transfer(alice, TransferCmd::new(source, destination, 10.0))
                .await
        }));
    }

    let mut succeeded = 0.0;
    for handle in handles {
        match handle.await.unwrap() {
            Ok(_) => succeeded += 1.0,
            Err(EngineError::Database(_)) => {}
            Err(other) => panic!("unexpected error: {other}"),
        }
    }

    assert!(succeeded >= 1.0);
    assert_eq!(balance(&engine, alice, source).await, 100.0 - 10.0 * succeeded);
    assert_eq!(balance(&engine, alice, destination).await, 10.0 * succeeded);
    assert_replayable(&engine, alice, source).await;
    assert_replayable(&engine, alice, destination).await;

    let _ = std::fs::remove_file(path);
}
