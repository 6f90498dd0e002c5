//! # REST API Interface Layer
//!
//! HTTP endpoints of the expense tracker, all mounted under `/expenses`.
//!
//! ## Key Responsibilities
//!
//! - **API Endpoints**: expense entry and listing, saldo, chart series,
//!   budget override, CSV import and export, Telegram webhook
//! - **Error Handling**: domain errors become `{"error": ...}` bodies with a
//!   matching status code
//! - **Logging**: every request is logged with its method and path
//!
//! Handlers stay thin: they parse, call a domain service and map the result.

pub mod bot_apis;
pub mod budget_apis;
pub mod export_apis;
pub mod graph_apis;
pub mod import_apis;
pub mod mappers;
pub mod saldo_apis;
pub mod transaction_apis;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    Router,
};
use shared::ErrorResponse;

use crate::backend::AppState;

/// All API routes, relative to `/expenses`
pub fn api_router() -> Router<AppState> {
    Router::new()
        .merge(transaction_apis::router())
        .merge(saldo_apis::router())
        .merge(graph_apis::router())
        .merge(budget_apis::router())
        .merge(import_apis::router())
        .merge(export_apis::router())
        .merge(bot_apis::router())
}

/// JSON error body with the given status
pub(crate) fn error_response(status: StatusCode, message: impl Into<String>) -> Response {
    (status, Json(ErrorResponse::new(message))).into_response()
}
