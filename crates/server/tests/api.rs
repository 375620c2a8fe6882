use std::sync::Arc;

use axum::{
    Router,
    body::Body,
    http::{Method, Request, StatusCode, header},
};
use base64::{Engine as _, engine::general_purpose::STANDARD};
use http_body_util::BodyExt;
use migration::MigratorTrait;
use sea_orm::Database;
use serde_json::{Value, json};
use tower::ServiceExt;

use engine::Engine;
use server::{ServerState, router};

async fn app() -> Router {
    let db = Database::connect("sqlite::memory:").await.unwrap();
    migration::Migrator::up(&db, None).await.unwrap();
    let engine = Engine::builder()
        .database(db)
        .password_cost(4)
        .build()
        .await
        .unwrap();
    engine
        .create_user("alice", "alice@example.com", "password")
        .await
        .unwrap();
    engine
        .create_user("bob", "bob@example.com", "hunter2")
        .await
        .unwrap();
    router(ServerState {
        engine: Arc::new(engine),
    })
}

fn basic(username: &str, password: &str) -> String {
    format!("Basic {}", STANDARD.encode(format!("{username}:{password}")))
}

async fn send(
    app: &Router,
    auth: Option<(&str, &str)>,
    method: Method,
    uri: &str,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut request = Request::builder().method(method).uri(uri);
    if let Some((username, password)) = auth {
        request = request.header(header::AUTHORIZATION, basic(username, password));
    }
    let request = match body {
        Some(body) => request
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => request.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

const ALICE: Option<(&str, &str)> = Some(("alice", "password"));
const BOB: Option<(&str, &str)> = Some(("bob", "hunter2"));

async fn create_account(app: &Router, auth: Option<(&str, &str)>, name: &str, balance: f64) -> i64 {
    let (status, body) = send(
        app,
        auth,
        Method::POST,
        "/accounts/create",
        Some(json!({ "name": name, "type": "Bank", "balance": balance })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    body["id"].as_i64().unwrap()
}

#[tokio::test]
async fn requests_without_valid_credentials_are_rejected() {
    let app = app().await;

    let (status, _) = send(&app, None, Method::GET, "/accounts/list", None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = send(
        &app,
        Some(("alice", "wrong")),
        Method::GET,
        "/accounts/list",
        None,
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, body) = send(&app, ALICE, Method::GET, "/accounts/list", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([]));
}

#[tokio::test]
async fn transaction_lifecycle_moves_the_balance() {
    let app = app().await;
    let account_id = create_account(&app, ALICE, "Checking", 100.0).await;

    let (status, created) = send(
        &app,
        ALICE,
        Method::POST,
        "/transactions",
        Some(json!({
            "accountId": account_id,
            "amount": -10.0,
            "description": "Coffee",
            "categoryId": 4,
            "transactionDate": "2024-03-14"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["accountName"], "Checking");
    assert_eq!(created["categoryName"], "Coffee");
    let id = created["id"].as_i64().unwrap();

    let (status, updated) = send(
        &app,
        ALICE,
        Method::PUT,
        &format!("/transactions/update/{id}"),
        Some(json!({
            "amount": -15.0,
            "description": "Coffee x2",
            "categoryId": 4,
            "transactionDate": "2024-03-14"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["message"], "Transaction updated and balance adjusted");
    assert_eq!(updated["newBalance"], 85.0);

    let (status, deleted) = send(
        &app,
        ALICE,
        Method::DELETE,
        &format!("/transactions/deletet/{id}"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(deleted["message"], "Transaction deleted and balance restored");
    assert_eq!(deleted["newBalance"], 100.0);

    let (status, audit) = send(
        &app,
        ALICE,
        Method::GET,
        &format!("/accounts/{account_id}/audit"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(audit["consistent"], true);
    assert_eq!(audit["cachedBalance"], 100.0);
}

#[tokio::test]
async fn transfer_reports_both_balances_and_rejects_overdraft() {
    let app = app().await;
    let from = create_account(&app, ALICE, "Savings", 100.0).await;
    let to = create_account(&app, ALICE, "Checking", 50.0).await;

    let (status, body) = send(
        &app,
        ALICE,
        Method::POST,
        "/transfers",
        Some(json!({ "fromAccountId": from, "toAccountId": to, "amount": 30.0 })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["fromBalance"], 70.0);
    assert_eq!(body["toBalance"], 80.0);

    let (status, body) = send(
        &app,
        ALICE,
        Method::POST,
        "/transfers",
        Some(json!({ "fromAccountId": from, "toAccountId": to, "amount": 150.0 })),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body["error"].as_str().unwrap().starts_with("Insufficient funds"));

    let (status, body) = send(
        &app,
        ALICE,
        Method::POST,
        "/transfers",
        Some(json!({ "fromAccountId": from, "toAccountId": from, "amount": 1.0 })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn reconcile_and_bill_payment() {
    let app = app().await;
    let account_id = create_account(&app, ALICE, "Checking", 200.0).await;

    let (status, body) = send(
        &app,
        ALICE,
        Method::POST,
        &format!("/accounts/{account_id}/reconcile"),
        Some(json!({ "actualBalance": 200.005 })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["adjustment"], 0.0);
    assert_eq!(body["transactionId"], Value::Null);

    let (status, bill) = send(
        &app,
        ALICE,
        Method::POST,
        "/bills/create",
        Some(json!({
            "name": "Streaming",
            "amount": 20.0,
            "categoryId": 5,
            "dueDate": "2024-03-10"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(bill["frequency"], "Monthly");
    let bill_id = bill["id"].as_i64().unwrap();

    let (status, paid) = send(
        &app,
        ALICE,
        Method::POST,
        &format!("/bills/pay/{bill_id}?accountId={account_id}"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(paid["message"], "Payment recorded successfully");
    assert_eq!(paid["newBalance"], 180.0);
    assert_eq!(paid["nextDueDate"], "2024-04-10");

    let (status, skipped) = send(
        &app,
        ALICE,
        Method::POST,
        &format!("/bills/skip/{bill_id}"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(skipped["nextDueDate"], "2024-05-10");
    assert_eq!(
        skipped["message"],
        "Skipped payment for April. Next due date updated."
    );
}

#[tokio::test]
async fn other_users_resources_are_not_found() {
    let app = app().await;
    let account_id = create_account(&app, ALICE, "Checking", 100.0).await;
    let bobs = create_account(&app, BOB, "Bob", 100.0).await;

    let (status, _) = send(
        &app,
        BOB,
        Method::GET,
        &format!("/accounts/details/{account_id}"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(
        &app,
        BOB,
        Method::POST,
        "/transfers",
        Some(json!({ "fromAccountId": bobs, "toAccountId": account_id, "amount": 1.0 })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(
        &app,
        BOB,
        Method::POST,
        &format!("/accounts/{account_id}/reconcile"),
        Some(json!({ "actualBalance": 0.0 })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (_, details) = send(
        &app,
        ALICE,
        Method::GET,
        &format!("/accounts/details/{account_id}"),
        None,
    )
    .await;
    assert_eq!(details["balance"], 100.0);
}

#[tokio::test]
async fn quick_add_without_accounts_is_a_bad_request() {
    let app = app().await;

    let (status, body) = send(
        &app,
        ALICE,
        Method::POST,
        "/transactions/quick-add",
        Some(json!({ "amount": -4.0, "description": "Latte" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Invalid input: No active account found.");

    create_account(&app, ALICE, "Wallet", 10.0).await;
    let (status, body) = send(
        &app,
        ALICE,
        Method::POST,
        "/transactions/quick-add",
        Some(json!({ "amount": -4.0, "description": "Latte", "categoryName": "Coffee" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["categoryName"], "Coffee");

    let (status, dashboard) = send(&app, ALICE, Method::GET, "/dashboard", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(dashboard["summary"]["totalBalance"], 6.0);
    assert_eq!(dashboard["summary"]["todaysSpending"], 4.0);
}

#[tokio::test]
async fn dashboard_parts_match_the_combined_view() {
    let app = app().await;
    create_account(&app, ALICE, "Wallet", 10.0).await;
    let (status, _) = send(
        &app,
        ALICE,
        Method::POST,
        "/transactions/quick-add",
        Some(json!({ "amount": -4.0, "description": "Latte", "categoryName": "Coffee" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, combined) = send(&app, ALICE, Method::GET, "/dashboard", None).await;
    assert_eq!(status, StatusCode::OK);

    for (uri, key) in [
        ("/dashboard/summary", "summary"),
        ("/dashboard/accounts", "accounts"),
        ("/dashboard/budgets", "budgets"),
        ("/dashboard/bills/upcoming", "upcomingBills"),
        ("/dashboard/categories/spending", "categorySpending"),
    ] {
        let (status, part) = send(&app, ALICE, Method::GET, uri, None).await;
        assert_eq!(status, StatusCode::OK, "{uri}");
        assert_eq!(part, combined[key], "{uri}");
    }

    let (_, accounts) = send(&app, ALICE, Method::GET, "/dashboard/accounts", None).await;
    assert_eq!(accounts[0]["thisMonthChange"], -4.0);
    let (_, spending) = send(
        &app,
        ALICE,
        Method::GET,
        "/dashboard/categories/spending",
        None,
    )
    .await;
    assert_eq!(spending[0]["categoryName"], "Coffee");

    let (status, _) = send(&app, None, Method::GET, "/dashboard/summary", None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    let (_, bobs) = send(&app, BOB, Method::GET, "/dashboard/accounts", None).await;
    assert_eq!(bobs, json!([]));
}
