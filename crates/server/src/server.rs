use axum::{
    Router,
    extract::{Request, State},
    http::StatusCode,
    middleware::{self, Next},
    response::Response,
    routing::{delete, get, post, put},
};
use axum_extra::{
    TypedHeader,
    headers::{Authorization, authorization::Basic},
};

use std::{net::SocketAddr, sync::Arc};

use crate::{accounts, bills, budgets, categories, goals, reports, transactions, transfers};
use engine::Engine;

#[derive(Clone)]
pub struct ServerState {
    pub engine: Arc<Engine>,
}

/// Resolves HTTP Basic credentials to a [`engine::Caller`] stored in the
/// request extensions. Every route sits behind it.
async fn auth(
    auth_header: Option<TypedHeader<Authorization<Basic>>>,
    State(state): State<ServerState>,
    mut request: Request,
    next: Next,
) -> Result<Response, StatusCode> {
    let Some(TypedHeader(auth_header)) = auth_header else {
        return Err(StatusCode::UNAUTHORIZED);
    };
    if auth_header.username().is_empty() || auth_header.password().is_empty() {
        return Err(StatusCode::UNAUTHORIZED);
    }

    let caller = state
        .engine
        .authenticate(auth_header.username(), auth_header.password())
        .await
        .map_err(|err| {
            tracing::error!("authentication lookup failed: {err}");
            StatusCode::INTERNAL_SERVER_ERROR
        })?;

    let Some(caller) = caller else {
        tracing::debug!(username = auth_header.username(), "rejected credentials");
        return Err(StatusCode::UNAUTHORIZED);
    };

    request.extensions_mut().insert(caller);
    Ok(next.run(request).await)
}

pub fn router(state: ServerState) -> Router {
    Router::new()
        .route("/transactions", post(transactions::create))
        .route("/transactions/update/{id}", put(transactions::update))
        .route("/transactions/deletet/{id}", delete(transactions::remove))
        .route("/transactions/quick-add", post(transactions::quick_add))
        .route("/transactions/list", get(transactions::list))
        .route("/transactions/list/{id}", get(transactions::detail))
        .route("/transactions/recent", get(transactions::recent))
        .route("/transactions/search", get(transactions::search))
        .route("/transactions/summary", get(transactions::summary))
        .route("/transfers", post(transfers::transfer))
        .route("/accounts/create", post(accounts::create))
        .route("/accounts/list", get(accounts::list))
        .route("/accounts/details/{id}", get(accounts::details))
        .route("/accounts/delete/{id}", delete(accounts::deactivate))
        .route("/accounts/{id}/reconcile", post(accounts::reconcile))
        .route("/accounts/{id}/audit", get(accounts::audit))
        .route("/bills/create", post(bills::create))
        .route("/bills/upcoming", get(bills::upcoming))
        .route("/bills/pay/{id}", post(bills::pay))
        .route("/bills/skip/{id}", post(bills::skip))
        .route("/budgets/create", post(budgets::create))
        .route("/budgets/list", get(budgets::list))
        .route("/categories/create", post(categories::create))
        .route("/categories/list", get(categories::list))
        .route("/categories/stats", get(categories::stats))
        .route("/categories/delete/{id}", delete(categories::remove))
        .route("/goals", get(goals::list).post(goals::create))
        .route("/dashboard", get(reports::dashboard))
        .route("/dashboard/summary", get(reports::dashboard_summary))
        .route("/dashboard/accounts", get(reports::dashboard_accounts))
        .route("/dashboard/budgets", get(reports::dashboard_budgets))
        .route(
            "/dashboard/bills/upcoming",
            get(reports::dashboard_upcoming_bills),
        )
        .route(
            "/dashboard/categories/spending",
            get(reports::dashboard_category_spending),
        )
        .route("/reports/monthly-trends", get(reports::monthly_trends))
        .route(
            "/reports/spending-by-category",
            get(reports::spending_by_category),
        )
        .route_layer(middleware::from_fn_with_state(state.clone(), auth))
        .with_state(state)
}

pub async fn run(engine: Engine, addr: SocketAddr) {
    let listener = match tokio::net::TcpListener::bind(addr).await {
        Ok(listener) => listener,
        Err(err) => {
            tracing::error!("failed to bind server listener on {addr}: {err}");
            return;
        }
    };
    if let Err(err) = run_with_listener(engine, listener).await {
        tracing::error!("server failed: {err}");
    }
}

pub async fn run_with_listener(
    engine: Engine,
    listener: tokio::net::TcpListener,
) -> Result<(), std::io::Error> {
    let addr = listener.local_addr()?;
    tracing::info!("Server listening on {}", addr);

    let state = ServerState {
        engine: Arc::new(engine),
    };

    axum::serve(listener, router(state)).await
}

pub fn spawn_with_listener(
    engine: Engine,
    listener: tokio::net::TcpListener,
) -> Result<SocketAddr, std::io::Error> {
    let addr = listener.local_addr()?;

    tokio::spawn(async move {
        if let Err(err) = run_with_listener(engine, listener).await {
            tracing::error!("server failed: {err}");
        }
    });

    Ok(addr)
}
