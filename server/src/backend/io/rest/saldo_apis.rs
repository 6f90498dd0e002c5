//! # REST API for Saldo
//!
//! Budget-cycle position for a reference date.

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Json},
    routing::get,
    Router,
};
use tracing::{info, warn};

use super::error_response;
use crate::backend::domain::models::parse_date;
use crate::backend::io::rest::mappers::ReportMapper;
use crate::backend::AppState;
use shared::SaldoRequest;

pub fn router() -> Router<AppState> {
    Router::new().route("/saldo", get(get_saldo))
}

/// Saldo for `?date=YYYY-MM-DD`, or for today when omitted
pub async fn get_saldo(
    State(state): State<AppState>,
    Query(query): Query<SaldoRequest>,
) -> impl IntoResponse {
    info!("GET /expenses/saldo - query: {:?}", query);

    let date = match query.date.as_deref().map(str::trim).filter(|d| !d.is_empty()) {
        None => state.calendar_service.today(),
        Some(raw) => match parse_date(raw) {
            Some(date) => date,
            None => {
                warn!("Rejected saldo date '{}'", raw);
                return error_response(
                    StatusCode::BAD_REQUEST,
                    format!("Invalid date '{raw}', expected YYYY-MM-DD"),
                );
            }
        },
    };

    let report = state.report_service.saldo(date);
    (StatusCode::OK, Json(ReportMapper::to_saldo_response(report))).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::domain::models::Transaction;
    use crate::backend::storage::csv::test_utils::TestEnvironment;
    use crate::backend::storage::TransactionStorage;
    use http_body_util::BodyExt;

    fn query(date: Option<&str>) -> Query<SaldoRequest> {
        Query(SaldoRequest {
            date: date.map(String::from),
        })
    }

    #[tokio::test]
    async fn test_saldo_for_explicit_date() {
        let env = TestEnvironment::new().unwrap();
        env.store.append(Transaction::new("2025-08-01", "Food", "", 9000.0)).unwrap();
        env.store.append(Transaction::new("2025-08-09", "Food", "", 250.0)).unwrap();

        let response = get_saldo(State(env.app_state()), query(Some("2025-08-09")))
            .await
            .into_response();
        assert_eq!(response.status(), StatusCode::OK);

        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let body: shared::SaldoResponse = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body.cycle_start, "2025-07-15");
        // Exclusive end: the next cycle starts on the 15th
        assert_eq!(body.cycle_end, "2025-08-15");
        assert_eq!(body.day_index, 26);
        assert_eq!(body.days_in_cycle, 31);
        assert_eq!(body.spend_today, 250.0);
        assert_eq!(body.spent_cumulative, 9250.0);
        assert_eq!(body.tomorrow_allowance, Some(550.0));
    }

    #[tokio::test]
    async fn test_saldo_defaults_to_today() {
        let env = TestEnvironment::new().unwrap();
        let state = env.app_state();
        let today = state.calendar_service.today_string();

        let response = get_saldo(State(state), query(None)).await.into_response();
        assert_eq!(response.status(), StatusCode::OK);

        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let body: shared::SaldoResponse = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body.date, today);
    }

    #[tokio::test]
    async fn test_saldo_rejects_malformed_date() {
        let env = TestEnvironment::new().unwrap();

        let response = get_saldo(State(env.app_state()), query(Some("09.08.2025")))
            .await
            .into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
