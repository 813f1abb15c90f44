use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

use crate::domain::Error;

pub fn ledger_error_to_response(err: Error) -> Response {
    if !err.is_domain() {
        tracing::error!(error = %err, "request failed");
        return json_error(
            StatusCode::INTERNAL_SERVER_ERROR,
            "internal_error",
            "internal error",
        );
    }

    let (status, code) = match &err {
        Error::InvalidPin => (StatusCode::BAD_REQUEST, "invalid_pin"),
        Error::InvalidAmount(_) => (StatusCode::BAD_REQUEST, "invalid_amount"),
        Error::AccountNotFound(_) => (StatusCode::NOT_FOUND, "account_not_found"),
        Error::WrongPin(_) => (StatusCode::FORBIDDEN, "wrong_pin"),
        Error::InsufficientFunds(_) => (StatusCode::UNPROCESSABLE_ENTITY, "insufficient_funds"),
        Error::BalanceOverflow(_) => (StatusCode::UNPROCESSABLE_ENTITY, "balance_overflow"),
        Error::NoTransactionsFound(_) => (StatusCode::NOT_FOUND, "no_transactions_found"),
        _ => (StatusCode::INTERNAL_SERVER_ERROR, "internal_error"),
    };
    json_error(status, code, err.to_string())
}

pub fn rejection_to_response(rejection: JsonRejection) -> Response {
    json_error(StatusCode::BAD_REQUEST, "invalid_request", rejection.body_text())
}

pub fn json_error(status: StatusCode, code: &'static str, message: impl Into<String>) -> Response {
    (
        status,
        axum::Json(json!({
            "error": code,
            "message": message.into(),
        })),
    )
        .into_response()
}
