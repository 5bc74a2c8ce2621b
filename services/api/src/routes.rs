use crate::infra::AppState;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::Extension;
use axum::Json;
use serde_json::json;
use std::sync::Arc;
use transparency_ai::workflows::intake::{
    product_router, ProductIntakeService, ProductRepository, QuestionService, ScoringService,
};
use transparency_ai::workflows::report::{report_router, ReportDispatcher, ReportRenderer};

pub(crate) fn with_product_routes<R, Q, S, P>(
    service: Arc<ProductIntakeService<R, Q, S>>,
    reports: Arc<ReportDispatcher<R, P>>,
) -> axum::Router
where
    R: ProductRepository + 'static,
    Q: QuestionService + 'static,
    S: ScoringService + 'static,
    P: ReportRenderer + 'static,
{
    product_router(service)
        .merge(report_router(reports))
        .route("/health", axum::routing::get(healthcheck))
        .route("/ready", axum::routing::get(readiness_endpoint))
        .route("/metrics", axum::routing::get(metrics_endpoint))
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}
