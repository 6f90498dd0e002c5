//! # REST API for Data Export
//!
//! Download of every stored transaction as a CSV file.

use axum::{
    extract::State,
    http::{header, StatusCode},
    response::IntoResponse,
    routing::get,
    Router,
};
use tracing::{error, info};

use super::error_response;
use crate::backend::domain::export_service::{export_csv, EXPORT_FILE_NAME};
use crate::backend::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/export.csv", get(export_transactions_csv))
}

/// Export transactions as a CSV download, newest first
pub async fn export_transactions_csv(State(state): State<AppState>) -> impl IntoResponse {
    info!("GET /expenses/export.csv");

    let transactions = state.transaction_service.all_transactions();
    match export_csv(&transactions) {
        Ok(bytes) => {
            info!("📤 Exported {} transactions", transactions.len());
            (
                StatusCode::OK,
                [
                    (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
                    (
                        header::CONTENT_DISPOSITION,
                        format!("attachment; filename=\"{EXPORT_FILE_NAME}\""),
                    ),
                ],
                bytes,
            )
                .into_response()
        }
        Err(e) => {
            error!("Failed to render CSV export: {}", e);
            error_response(StatusCode::INTERNAL_SERVER_ERROR, "Failed to export transactions")
        }
    }
}
