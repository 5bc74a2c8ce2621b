use crate::cli::ServeArgs;
use crate::infra::{AppState, InMemoryProductRepository};
use crate::routes::with_product_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use transparency_ai::config::AppConfig;
use transparency_ai::error::AppError;
use transparency_ai::telemetry;
use transparency_ai::workflows::intake::{
    HttpQuestionService, HttpScoringService, ProductIntakeService,
};
use transparency_ai::workflows::report::{HttpReportRenderer, ReportDispatcher};
use tracing::info;

pub(crate) async fn run(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }

    telemetry::init(&config.telemetry)?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let repository = Arc::new(InMemoryProductRepository::default());
    let questions = Arc::new(HttpQuestionService::new(
        &config.remote.ai_base_url,
        config.remote.request_timeout,
    ));
    let scoring = Arc::new(HttpScoringService::new(
        &config.remote.ai_base_url,
        config.remote.request_timeout,
    ));
    let renderer = Arc::new(HttpReportRenderer::new(
        &config.remote.renderer_base_url,
        config.remote.request_timeout,
    ));

    let intake_service = Arc::new(ProductIntakeService::new(
        repository.clone(),
        questions,
        scoring,
    ));
    let report_dispatcher = Arc::new(ReportDispatcher::new(repository, renderer));

    let app = with_product_routes(intake_service, report_dispatcher)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "product transparency service ready");

    axum::serve(listener, app).await?;
    Ok(())
}
