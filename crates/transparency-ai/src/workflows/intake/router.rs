use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use serde::Deserialize;
use serde_json::json;

use super::answers::AnswerSet;
use super::clients::{QuestionService, ScoringService};
use super::domain::{DisclosureProfile, ProductDraft, ProductId};
use super::repository::{ProductFilter, ProductRepository, RepositoryError};
use super::service::{IntakeError, ProductIntakeService};

/// Create-product request in the shape the intake frontend sends: the
/// required fields at the top level, the disclosure bag under
/// `submittedData`, and the gathered follow-up answers.
#[derive(Debug, Deserialize)]
pub struct CreateProductRequest {
    pub name: String,
    pub category: String,
    pub description: String,
    #[serde(default, rename = "submittedData")]
    pub submitted_data: DisclosureProfile,
    #[serde(default, rename = "currentAnswers")]
    pub current_answers: AnswerSet,
}

impl CreateProductRequest {
    fn into_parts(self) -> (ProductDraft, AnswerSet) {
        let draft = ProductDraft {
            name: self.name,
            category: self.category,
            description: self.description,
            disclosure: self.submitted_data,
        };
        (draft, self.current_answers)
    }
}

/// Router exposing the product intake endpoints.
pub fn product_router<R, Q, S>(service: Arc<ProductIntakeService<R, Q, S>>) -> Router
where
    R: ProductRepository + 'static,
    Q: QuestionService + 'static,
    S: ScoringService + 'static,
{
    Router::new()
        .route(
            "/api/v1/products",
            post(create_handler::<R, Q, S>).get(list_handler::<R, Q, S>),
        )
        .route(
            "/api/v1/products/:product_id",
            get(get_handler::<R, Q, S>).put(update_handler::<R, Q, S>),
        )
        .route(
            "/api/v1/products/:product_id/transparency-score",
            get(score_handler::<R, Q, S>),
        )
        .with_state(service)
}

fn error_response(status: StatusCode, message: impl std::fmt::Display) -> Response {
    let payload = json!({ "error": message.to_string() });
    (status, axum::Json(payload)).into_response()
}

fn intake_error_response(error: IntakeError) -> Response {
    match error {
        IntakeError::Validation(err) => error_response(StatusCode::UNPROCESSABLE_ENTITY, err),
        IntakeError::Repository(RepositoryError::NotFound) => {
            error_response(StatusCode::NOT_FOUND, "product not found")
        }
        IntakeError::Repository(RepositoryError::Conflict) => {
            error_response(StatusCode::CONFLICT, "product already exists")
        }
        IntakeError::Dependency(err) => error_response(StatusCode::BAD_GATEWAY, err),
        other => error_response(StatusCode::INTERNAL_SERVER_ERROR, other),
    }
}

pub(crate) async fn create_handler<R, Q, S>(
    State(service): State<Arc<ProductIntakeService<R, Q, S>>>,
    axum::Json(request): axum::Json<CreateProductRequest>,
) -> Response
where
    R: ProductRepository + 'static,
    Q: QuestionService + 'static,
    S: ScoringService + 'static,
{
    let (draft, answers) = request.into_parts();
    match service.create(draft, answers) {
        Ok(receipt) => (StatusCode::CREATED, axum::Json(receipt)).into_response(),
        Err(err) => intake_error_response(err),
    }
}

pub(crate) async fn list_handler<R, Q, S>(
    State(service): State<Arc<ProductIntakeService<R, Q, S>>>,
    Query(filter): Query<ProductFilter>,
) -> Response
where
    R: ProductRepository + 'static,
    Q: QuestionService + 'static,
    S: ScoringService + 'static,
{
    match service.list(&filter) {
        Ok(products) => (StatusCode::OK, axum::Json(products)).into_response(),
        Err(err) => intake_error_response(err),
    }
}

pub(crate) async fn get_handler<R, Q, S>(
    State(service): State<Arc<ProductIntakeService<R, Q, S>>>,
    Path(product_id): Path<String>,
) -> Response
where
    R: ProductRepository + 'static,
    Q: QuestionService + 'static,
    S: ScoringService + 'static,
{
    match service.get(&ProductId(product_id)) {
        Ok(product) => (StatusCode::OK, axum::Json(product)).into_response(),
        Err(err) => intake_error_response(err),
    }
}

pub(crate) async fn update_handler<R, Q, S>(
    State(service): State<Arc<ProductIntakeService<R, Q, S>>>,
    Path(product_id): Path<String>,
    axum::Json(update): axum::Json<super::domain::ProductUpdate>,
) -> Response
where
    R: ProductRepository + 'static,
    Q: QuestionService + 'static,
    S: ScoringService + 'static,
{
    match service.update(&ProductId(product_id), update) {
        Ok(product) => (StatusCode::OK, axum::Json(product)).into_response(),
        Err(err) => intake_error_response(err),
    }
}

pub(crate) async fn score_handler<R, Q, S>(
    State(service): State<Arc<ProductIntakeService<R, Q, S>>>,
    Path(product_id): Path<String>,
) -> Response
where
    R: ProductRepository + 'static,
    Q: QuestionService + 'static,
    S: ScoringService + 'static,
{
    match service.refresh_score(&ProductId(product_id)) {
        Ok(receipt) => (StatusCode::OK, axum::Json(receipt)).into_response(),
        Err(err) => intake_error_response(err),
    }
}
