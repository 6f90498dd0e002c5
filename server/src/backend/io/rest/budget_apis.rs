//! # REST API for the Monthly Budget
//!
//! Reads and changes the runtime budget override shared with the bot's
//! `/budget` command.

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::{IntoResponse, Json},
    routing::get,
    Router,
};
use tracing::{info, warn};

use super::error_response;
use crate::backend::domain::BudgetSettings;
use crate::backend::AppState;
use shared::{BudgetResponse, UpdateBudgetRequest};

pub fn router() -> Router<AppState> {
    Router::new().route(
        "/budget",
        get(get_budget).put(update_budget).delete(reset_budget),
    )
}

fn budget_response(settings: &BudgetSettings) -> BudgetResponse {
    BudgetResponse {
        monthly_budget: settings.monthly_budget(),
        source: settings.source(),
    }
}

/// Effective monthly budget and where it comes from
pub async fn get_budget(State(state): State<AppState>) -> impl IntoResponse {
    info!("GET /expenses/budget");
    (StatusCode::OK, Json(budget_response(&state.budget_settings))).into_response()
}

/// Set a runtime override; lost on restart
pub async fn update_budget(
    State(state): State<AppState>,
    payload: Result<Json<UpdateBudgetRequest>, JsonRejection>,
) -> impl IntoResponse {
    let Ok(Json(request)) = payload else {
        return error_response(StatusCode::BAD_REQUEST, "Invalid request format");
    };
    info!("PUT /expenses/budget - request: {:?}", request);

    match state.budget_settings.set_override(request.amount) {
        Ok(()) => (StatusCode::OK, Json(budget_response(&state.budget_settings))).into_response(),
        Err(e) => {
            warn!("Rejected budget override {}: {}", request.amount, e);
            error_response(StatusCode::BAD_REQUEST, e.to_string())
        }
    }
}

/// Drop the override and return to the configured budget
pub async fn reset_budget(State(state): State<AppState>) -> impl IntoResponse {
    info!("DELETE /expenses/budget");
    state.budget_settings.reset();
    (StatusCode::OK, Json(budget_response(&state.budget_settings))).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::storage::csv::test_utils::TestEnvironment;
    use http_body_util::BodyExt;
    use shared::BudgetSource;

    async fn body(response: axum::response::Response) -> BudgetResponse {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_budget_override_lifecycle() {
        let env = TestEnvironment::new().unwrap();
        let state = env.app_state();

        let response = get_budget(State(state.clone())).await.into_response();
        assert_eq!(
            body(response).await,
            BudgetResponse {
                monthly_budget: 12000.0,
                source: BudgetSource::Default
            }
        );

        let response = update_budget(
            State(state.clone()),
            Ok(Json(UpdateBudgetRequest { amount: 15000.0 })),
        )
        .await
        .into_response();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body(response).await.source, BudgetSource::RuntimeOverride);
        assert_eq!(state.report_service.daily_allowance(chrono::NaiveDate::from_ymd_opt(2024, 6, 1).unwrap()), 500.0);

        let response = reset_budget(State(state.clone())).await.into_response();
        assert_eq!(body(response).await.monthly_budget, 12000.0);
    }

    #[tokio::test]
    async fn test_budget_rejects_non_positive_amount() {
        let env = TestEnvironment::new().unwrap();
        let state = env.app_state();

        for amount in [0.0, -5.0] {
            let response = update_budget(State(state.clone()), Ok(Json(UpdateBudgetRequest { amount })))
                .await
                .into_response();
            assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        }
        assert_eq!(state.budget_settings.source(), BudgetSource::Default);
    }
}
