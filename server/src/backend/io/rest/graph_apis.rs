//! # REST API for Chart Data
//!
//! Daily spend, cumulative spend and cumulative budget over a date window.

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Json},
    routing::get,
    Router,
};
use tracing::info;

use crate::backend::domain::models::parse_date;
use crate::backend::io::rest::mappers::ReportMapper;
use crate::backend::AppState;
use shared::GraphDataRequest;

pub fn router() -> Router<AppState> {
    Router::new().route("/graph-data", get(get_graph_data))
}

/// Series for `?from=&to=`; a missing or unreadable bound is derived from the data
pub async fn get_graph_data(
    State(state): State<AppState>,
    Query(query): Query<GraphDataRequest>,
) -> impl IntoResponse {
    info!("GET /expenses/graph-data - query: {:?}", query);

    let from = query.from.as_deref().and_then(|d| parse_date(d.trim()));
    let to = query.to.as_deref().and_then(|d| parse_date(d.trim()));

    let series = state.report_service.series(from, to);
    info!(
        "📈 Graph window {} to {} with {} points",
        series.from,
        series.to,
        series.points.len()
    );
    (StatusCode::OK, Json(ReportMapper::to_graph_response(series))).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::domain::models::Transaction;
    use crate::backend::storage::csv::test_utils::TestEnvironment;
    use crate::backend::storage::TransactionStorage;
    use http_body_util::BodyExt;
    use shared::GraphDataResponse;

    async fn graph(env: &TestEnvironment, from: Option<&str>, to: Option<&str>) -> GraphDataResponse {
        let query = GraphDataRequest {
            from: from.map(String::from),
            to: to.map(String::from),
        };
        let response = get_graph_data(State(env.app_state()), Query(query))
            .await
            .into_response();
        assert_eq!(response.status(), StatusCode::OK);
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_graph_data_explicit_window() {
        let env = TestEnvironment::new().unwrap();
        env.store.append(Transaction::new("2024-04-30", "Food", "", 5.0)).unwrap();
        env.store.append(Transaction::new("2024-05-01", "Food", "", 10.0)).unwrap();
        env.store.append(Transaction::new("2024-05-01", "Food", "", 2.5)).unwrap();
        env.store.append(Transaction::new("2024-05-02", "Bus", "", 3.0)).unwrap();

        let body = graph(&env, Some("2024-04-30"), Some("2024-05-02")).await;

        assert_eq!(body.from, "2024-04-30");
        assert_eq!(body.to, "2024-05-02");
        assert_eq!(body.monthly_budget, 12000.0);
        assert_eq!(body.points.len(), 3);
        assert_eq!(body.points[0].cumulative, 5.0);
        // Cumulative spend restarts with the month
        assert_eq!(body.points[1].spend, 12.5);
        assert_eq!(body.points[1].cumulative, 12.5);
        assert_eq!(body.points[2].cumulative, 15.5);
        assert!((body.points[2].budget_cum - 12000.0 * 2.0 / 31.0).abs() < 1e-9);
    }

    #[tokio::test]
    async fn test_graph_data_ignores_unreadable_bounds() {
        let env = TestEnvironment::new().unwrap();
        env.store.append(Transaction::new("2024-05-01", "Food", "", 10.0)).unwrap();
        env.store.append(Transaction::new("2024-05-03", "Food", "", 10.0)).unwrap();

        let body = graph(&env, Some("2024-05-02"), Some("tomorrow")).await;

        assert_eq!(body.from, "2024-05-02");
        assert_eq!(body.to, "2024-05-03");
        assert_eq!(body.points.len(), 2);
    }

    #[tokio::test]
    async fn test_graph_data_empty_store() {
        let env = TestEnvironment::new().unwrap();

        let body = graph(&env, None, None).await;

        assert_eq!(body.points.len(), 31);
        assert!(body.points.iter().all(|p| p.spend == 0.0));
    }
}
