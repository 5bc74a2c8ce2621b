use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use serde_json::json;

use super::dispatcher::{ReportDispatcher, ReportError, REPORT_CONTENT_TYPE};
use super::renderer::ReportRenderer;
use crate::workflows::intake::domain::ProductId;
use crate::workflows::intake::repository::ProductRepository;

/// Router exposing on-demand report generation.
pub fn report_router<R, P>(dispatcher: Arc<ReportDispatcher<R, P>>) -> Router
where
    R: ProductRepository + 'static,
    P: ReportRenderer + 'static,
{
    Router::new()
        .route(
            "/api/v1/products/:product_id/report",
            get(report_handler::<R, P>),
        )
        .with_state(dispatcher)
}

pub(crate) async fn report_handler<R, P>(
    State(dispatcher): State<Arc<ReportDispatcher<R, P>>>,
    Path(product_id): Path<String>,
) -> Response
where
    R: ProductRepository + 'static,
    P: ReportRenderer + 'static,
{
    match dispatcher.dispatch(&ProductId(product_id)) {
        Ok(report) => (
            StatusCode::OK,
            [(header::CONTENT_TYPE, REPORT_CONTENT_TYPE)],
            report.bytes,
        )
            .into_response(),
        Err(ReportError::ProductNotFound) => {
            let payload = json!({ "error": "product not found" });
            (StatusCode::NOT_FOUND, axum::Json(payload)).into_response()
        }
        Err(ReportError::Renderer(err)) => {
            let payload = json!({ "error": err.to_string() });
            (StatusCode::BAD_GATEWAY, axum::Json(payload)).into_response()
        }
        Err(other) => {
            let payload = json!({ "error": other.to_string() });
            (StatusCode::INTERNAL_SERVER_ERROR, axum::Json(payload)).into_response()
        }
    }
}
