//! Health, robots and metrics endpoints.

use axum::extract::State;
use axum::Json;

use crate::metrics::MetricsSnapshot;
use crate::state::AppState;

/// GET `/_healthz`
pub async fn healthz() -> &'static str {
    "ok"
}

/// GET `/robots.txt`
pub async fn robots() -> &'static str {
    "User-agent: *\nDisallow: /"
}

/// GET `/metrics`
pub async fn metrics(State(state): State<AppState>) -> Json<MetricsSnapshot> {
    Json(state.metrics.snapshot())
}
