//! # REST API for CSV Import
//!
//! Replaces the whole transaction table with an uploaded CSV file.

use axum::{
    extract::{multipart::MultipartError, Multipart, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::post,
    Router,
};
use tracing::{error, info, warn};

use super::error_response;
use crate::backend::domain::import_service::{parse_import, ImportError};
use crate::backend::AppState;
use shared::{ErrorResponse, ImportResponse};

/// Multipart field carrying the file
pub const CSV_FIELD: &str = "csv";

pub fn router() -> Router<AppState> {
    Router::new().route("/upload-csv", post(upload_csv))
}

/// Read the named field of a multipart body, if present
pub(crate) async fn read_field(
    multipart: &mut Multipart,
    name: &str,
) -> Result<Option<(Option<String>, Vec<u8>)>, MultipartError> {
    while let Some(field) = multipart.next_field().await? {
        if field.name() == Some(name) {
            let file_name = field.file_name().map(String::from);
            let bytes = field.bytes().await?;
            return Ok(Some((file_name, bytes.to_vec())));
        }
    }
    Ok(None)
}

/// Upload a CSV that replaces every stored transaction
pub async fn upload_csv(State(state): State<AppState>, mut multipart: Multipart) -> impl IntoResponse {
    info!("POST /expenses/upload-csv");

    match read_field(&mut multipart, CSV_FIELD).await {
        Ok(upload) => replace_with_upload(&state, upload.map(|(_, bytes)| bytes)),
        Err(e) => {
            warn!("Unreadable multipart upload: {}", e);
            error_response(StatusCode::BAD_REQUEST, "Invalid multipart upload")
        }
    }
}

fn replace_with_upload(state: &AppState, upload: Option<Vec<u8>>) -> Response {
    let bytes = match upload {
        Some(bytes) if !bytes.is_empty() => bytes,
        _ => {
            return match state.transaction_service.reset() {
                Ok(()) => {
                    info!("🧹 Empty upload, transaction table reset");
                    let response = ImportResponse {
                        message: "Data reset (empty CSV)".to_string(),
                        count: 0,
                    };
                    (StatusCode::OK, Json(response)).into_response()
                }
                Err(e) => {
                    error!("Failed to reset transactions: {}", e);
                    error_response(StatusCode::INTERNAL_SERVER_ERROR, "Failed to save transactions")
                }
            };
        }
    };

    let transactions = match parse_import(bytes.as_slice()) {
        Ok(transactions) => transactions,
        Err(e @ ImportError::Rows(_)) => {
            let details = e.row_messages();
            warn!("Rejected CSV upload with {} row errors", details.len());
            return (
                StatusCode::BAD_REQUEST,
                Json(ErrorResponse::with_details("CSV validation failed", details)),
            )
                .into_response();
        }
        Err(ImportError::Malformed(e)) => {
            warn!("Unreadable CSV upload: {}", e);
            return error_response(StatusCode::BAD_REQUEST, "Invalid CSV format");
        }
        Err(e) => return error_response(StatusCode::BAD_REQUEST, e.to_string()),
    };

    match state.transaction_service.replace_all(transactions) {
        Ok(count) => {
            info!("📥 Replaced transaction table from upload with {} rows", count);
            let response = ImportResponse {
                message: format!("Successfully imported {count} transactions"),
                count,
            };
            (StatusCode::OK, Json(response)).into_response()
        }
        Err(e) => {
            error!("Failed to save imported transactions: {}", e);
            error_response(StatusCode::INTERNAL_SERVER_ERROR, "Failed to save transactions")
        }
    }
}
