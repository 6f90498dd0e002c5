//! # REST API for Transactions
//!
//! Endpoints for recording an expense and listing recorded expenses.

use axum::{
    extract::{rejection::JsonRejection, Query, State},
    http::StatusCode,
    response::{IntoResponse, Json},
    routing::{get, post},
    Router,
};
use tracing::{error, info, warn};

use super::error_response;
use crate::backend::domain::TransactionServiceError;
use crate::backend::io::rest::mappers::TransactionMapper;
use crate::backend::AppState;
use shared::{
    CreateTransactionRequest, CreateTransactionResponse, TransactionListRequest,
    TransactionListResponse,
};

/// Create a router for transaction related APIs
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/transaction", post(create_transaction))
        .route("/transactions", get(list_transactions))
}

/// Record a new expense
pub async fn create_transaction(
    State(state): State<AppState>,
    payload: Result<Json<CreateTransactionRequest>, JsonRejection>,
) -> impl IntoResponse {
    let Json(request) = match payload {
        Ok(request) => request,
        Err(rejection) => {
            warn!("POST /expenses/transaction - rejected body: {}", rejection);
            return error_response(StatusCode::BAD_REQUEST, "Invalid request format");
        }
    };
    info!("POST /expenses/transaction - request: {:?}", request);

    if let Some(chat_id) = request.chat_id {
        info!("Expense submitted from the mini app in chat {}", chat_id);
    }

    let transaction = TransactionMapper::from_create_request(request);
    match state.transaction_service.create_transaction(transaction) {
        Ok(transaction) => {
            let response = CreateTransactionResponse {
                message: "Transaction added successfully".to_string(),
                transaction: TransactionMapper::to_dto(transaction),
            };
            (StatusCode::OK, Json(response)).into_response()
        }
        Err(TransactionServiceError::Validation(e)) => {
            warn!("Rejected transaction: {}", e);
            error_response(StatusCode::BAD_REQUEST, e.to_string())
        }
        Err(TransactionServiceError::Storage(e)) => {
            error!("Failed to save transaction: {}", e);
            error_response(StatusCode::INTERNAL_SERVER_ERROR, "Failed to save transaction")
        }
    }
}

/// List all transactions, or those on one date
pub async fn list_transactions(
    State(state): State<AppState>,
    Query(query): Query<TransactionListRequest>,
) -> impl IntoResponse {
    info!("GET /expenses/transactions - query: {:?}", query);

    let transactions = TransactionMapper::to_dtos(
        state
            .transaction_service
            .list_transactions(query.date.as_deref()),
    );
    let response = TransactionListResponse {
        count: transactions.len(),
        transactions,
    };
    (StatusCode::OK, Json(response)).into_response()
}
