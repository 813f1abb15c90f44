//! HTTP adapter: translates requests into [`Ledger`] calls and results into
//! JSON responses.

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Path, State, rejection::JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, patch},
};

use crate::domain::{AccountId, Amount, LedgerStore};
use crate::ledger::Ledger;

pub mod dto;
pub mod errors;

use dto::{AccountView, CreateAccountRequest, PaymentRequest};
use errors::{json_error, ledger_error_to_response, rejection_to_response};

type SharedLedger<S> = State<Arc<Ledger<S>>>;

pub fn router<S>(ledger: Arc<Ledger<S>>) -> Router
where
    S: LedgerStore + Send + Sync + 'static,
{
    Router::new()
        .route("/api/health", get(health))
        .route(
            "/api/accounts",
            get(list_accounts::<S>).post(create_account::<S>),
        )
        .route("/api/accounts/:id", get(get_account::<S>))
        .route("/api/accounts/:id/deposit", patch(deposit::<S>))
        .route("/api/accounts/:id/withdraw", patch(withdraw::<S>))
        .route("/api/accounts/:id/transfer/:to", patch(transfer::<S>))
        .route("/api/transactions", get(list_transactions::<S>))
        .route("/api/transactions/:id", get(transactions_by_account::<S>))
        .with_state(ledger)
}

async fn health() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "ok" }))
}

async fn create_account<S: LedgerStore>(
    State(ledger): SharedLedger<S>,
    body: Result<Json<CreateAccountRequest>, JsonRejection>,
) -> Response {
    let Json(body) = match body {
        Ok(body) => body,
        Err(rejection) => return rejection_to_response(rejection),
    };

    // A missing PIN fails the length check like any other bad PIN.
    let pin_code = body.pin_code.unwrap_or_default();
    match ledger.create_account(body.name.as_deref(), &pin_code) {
        Ok(account) => (StatusCode::CREATED, Json(AccountView::from(account))).into_response(),
        Err(e) => ledger_error_to_response(e),
    }
}

async fn list_accounts<S: LedgerStore>(State(ledger): SharedLedger<S>) -> Response {
    match ledger.accounts() {
        Ok(accounts) => {
            let views: Vec<AccountView> = accounts.into_iter().map(AccountView::from).collect();
            Json(views).into_response()
        }
        Err(e) => ledger_error_to_response(e),
    }
}

async fn get_account<S: LedgerStore>(
    State(ledger): SharedLedger<S>,
    Path(id): Path<String>,
) -> Response {
    match ledger.account(&AccountId::from(id)) {
        Ok(Some(account)) => Json(AccountView::from(account)).into_response(),
        Ok(None) => json_error(
            StatusCode::NOT_FOUND,
            "account_not_found",
            "account not found",
        ),
        Err(e) => ledger_error_to_response(e),
    }
}

async fn deposit<S: LedgerStore>(
    State(ledger): SharedLedger<S>,
    Path(id): Path<String>,
    body: Result<Json<PaymentRequest>, JsonRejection>,
) -> Response {
    let Json(body) = match body {
        Ok(body) => body,
        Err(rejection) => return rejection_to_response(rejection),
    };

    let result = Amount::new(body.amount)
        .and_then(|amount| ledger.deposit(&AccountId::from(id), amount));

    match result {
        Ok(tx) => Json(tx).into_response(),
        Err(e) => ledger_error_to_response(e),
    }
}

async fn withdraw<S: LedgerStore>(
    State(ledger): SharedLedger<S>,
    Path(id): Path<String>,
    body: Result<Json<PaymentRequest>, JsonRejection>,
) -> Response {
    let Json(body) = match body {
        Ok(body) => body,
        Err(rejection) => return rejection_to_response(rejection),
    };

    let pin_code = body.pin_code.unwrap_or_default();
    let result = Amount::new(body.amount)
        .and_then(|amount| ledger.withdraw(&AccountId::from(id), amount, &pin_code));

    match result {
        Ok(tx) => Json(tx).into_response(),
        Err(e) => ledger_error_to_response(e),
    }
}

async fn transfer<S: LedgerStore>(
    State(ledger): SharedLedger<S>,
    Path((from, to)): Path<(String, String)>,
    body: Result<Json<PaymentRequest>, JsonRejection>,
) -> Response {
    let Json(body) = match body {
        Ok(body) => body,
        Err(rejection) => return rejection_to_response(rejection),
    };

    let pin_code = body.pin_code.unwrap_or_default();
    let result = Amount::new(body.amount).and_then(|amount| {
        ledger.transfer(
            &AccountId::from(from),
            &AccountId::from(to),
            amount,
            &pin_code,
        )
    });

    match result {
        Ok(tx) => Json(tx).into_response(),
        Err(e) => ledger_error_to_response(e),
    }
}

async fn list_transactions<S: LedgerStore>(State(ledger): SharedLedger<S>) -> Response {
    match ledger.transactions() {
        Ok(transactions) => Json(transactions).into_response(),
        Err(e) => ledger_error_to_response(e),
    }
}

async fn transactions_by_account<S: LedgerStore>(
    State(ledger): SharedLedger<S>,
    Path(id): Path<String>,
) -> Response {
    match ledger.transactions_by_account(&AccountId::from(id)) {
        Ok(transactions) => Json(transactions).into_response(),
        Err(e) => ledger_error_to_response(e),
    }
}
