//! Readiness endpoint

use axum::{Json, Router, extract::State, http::StatusCode, routing::get};
use axum_helpers::server::{HealthCheckFuture, ReadinessResponse, run_health_checks};
use database::mongodb::check_health_detailed;

use crate::state::AppState;

type ReadinessResult =
    Result<(StatusCode, Json<ReadinessResponse>), (StatusCode, Json<ReadinessResponse>)>;

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/ready", get(readiness_check))
        .with_state(state)
}

/// 200 when MongoDB answers a ping, 503 otherwise. Open Food Facts is not
/// probed: lookup outages degrade nutrition to zero instead of failing.
async fn readiness_check(State(state): State<AppState>) -> ReadinessResult {
    let checks: Vec<(&str, HealthCheckFuture)> = vec![(
        "mongodb",
        Box::pin(async {
            let status = check_health_detailed(&state.mongo_client).await;
            if status.healthy {
                Ok(())
            } else {
                Err(status.message.unwrap_or_else(|| "ping failed".to_string()))
            }
        }),
    )];

    run_health_checks(checks).await
}
