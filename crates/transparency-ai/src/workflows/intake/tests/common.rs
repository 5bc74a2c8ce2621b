use std::sync::{Arc, Mutex};

use axum::response::Response;
use serde_json::Value;

use crate::workflows::intake::answers::AnswerSet;
use crate::workflows::intake::clients::{DependencyError, QuestionService, ScoringService};
use crate::workflows::intake::domain::{
    AnswerKind, Product, ProductDraft, ProductId, Question, QuestionTopic,
};
use crate::workflows::intake::repository::{ProductFilter, ProductRepository, RepositoryError};
use crate::workflows::intake::service::ProductIntakeService;

pub(super) fn granola_draft() -> ProductDraft {
    ProductDraft {
        name: "Granola Bar".to_string(),
        category: "Food & Beverage".to_string(),
        description: "Honey oat bar baked in small batches.".to_string(),
        disclosure: Default::default(),
    }
}

pub(super) fn ingredients_question() -> Question {
    Question {
        id: 1,
        prompt: "List exact ingredients".to_string(),
        kind: AnswerKind::FreeText,
        topic: QuestionTopic::Ingredients,
    }
}

pub(super) type StubService =
    ProductIntakeService<MemoryRepository, CannedQuestions, RecordingScorer>;

pub(super) fn build_service() -> (
    Arc<StubService>,
    Arc<MemoryRepository>,
    Arc<CannedQuestions>,
    Arc<RecordingScorer>,
) {
    let repository = Arc::new(MemoryRepository::default());
    let questions = Arc::new(CannedQuestions::with(vec![ingredients_question()]));
    let scoring = Arc::new(RecordingScorer::with_score(72));
    let service = Arc::new(ProductIntakeService::new(
        repository.clone(),
        questions.clone(),
        scoring.clone(),
    ));
    (service, repository, questions, scoring)
}

#[derive(Default, Clone)]
pub(super) struct MemoryRepository {
    records: Arc<Mutex<Vec<Product>>>,
}

impl MemoryRepository {
    pub(super) fn stored(&self) -> Vec<Product> {
        self.records.lock().expect("repository mutex poisoned").clone()
    }
}

impl ProductRepository for MemoryRepository {
    fn insert(&self, product: Product) -> Result<Product, RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        if guard.iter().any(|existing| existing.id == product.id) {
            return Err(RepositoryError::Conflict);
        }
        guard.push(product.clone());
        Ok(product)
    }

    fn update(&self, product: Product) -> Result<Product, RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        match guard.iter_mut().find(|existing| existing.id == product.id) {
            Some(existing) => {
                *existing = product.clone();
                Ok(product)
            }
            None => Err(RepositoryError::NotFound),
        }
    }

    fn fetch(&self, id: &ProductId) -> Result<Option<Product>, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        Ok(guard.iter().find(|product| &product.id == id).cloned())
    }

    fn list(&self, filter: &ProductFilter) -> Result<Vec<Product>, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        let mut matching: Vec<Product> = guard
            .iter()
            .filter(|product| filter.matches(product))
            .cloned()
            .collect();
        matching.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(matching)
    }
}

/// Repository that refuses every write, for partial-failure tests.
pub(super) struct UnavailableRepository;

impl ProductRepository for UnavailableRepository {
    fn insert(&self, _product: Product) -> Result<Product, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn update(&self, _product: Product) -> Result<Product, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn fetch(&self, _id: &ProductId) -> Result<Option<Product>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn list(&self, _filter: &ProductFilter) -> Result<Vec<Product>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }
}

/// Repository whose inserts fail while reads keep working, so tests can
/// assert that nothing was stored.
#[derive(Default, Clone)]
pub(super) struct InsertFailingRepository {
    inner: MemoryRepository,
}

impl InsertFailingRepository {
    pub(super) fn stored(&self) -> Vec<Product> {
        self.inner.stored()
    }
}

impl ProductRepository for InsertFailingRepository {
    fn insert(&self, _product: Product) -> Result<Product, RepositoryError> {
        Err(RepositoryError::Unavailable("write refused".to_string()))
    }

    fn update(&self, product: Product) -> Result<Product, RepositoryError> {
        self.inner.update(product)
    }

    fn fetch(&self, id: &ProductId) -> Result<Option<Product>, RepositoryError> {
        self.inner.fetch(id)
    }

    fn list(&self, filter: &ProductFilter) -> Result<Vec<Product>, RepositoryError> {
        self.inner.list(filter)
    }
}

/// Question service returning a fixed list and counting invocations.
#[derive(Default)]
pub(super) struct CannedQuestions {
    questions: Vec<Question>,
    calls: Mutex<u32>,
}

impl CannedQuestions {
    pub(super) fn with(questions: Vec<Question>) -> Self {
        Self {
            questions,
            calls: Mutex::new(0),
        }
    }

    pub(super) fn calls(&self) -> u32 {
        *self.calls.lock().expect("question mutex poisoned")
    }
}

impl QuestionService for CannedQuestions {
    fn follow_up_questions(
        &self,
        _draft: &ProductDraft,
        _answers: &AnswerSet,
        _product_id: Option<&ProductId>,
    ) -> Result<Vec<Question>, DependencyError> {
        *self.calls.lock().expect("question mutex poisoned") += 1;
        Ok(self.questions.clone())
    }
}

/// Question service that always fails, for degradation tests.
pub(super) struct FailingQuestions;

impl QuestionService for FailingQuestions {
    fn follow_up_questions(
        &self,
        _draft: &ProductDraft,
        _answers: &AnswerSet,
        _product_id: Option<&ProductId>,
    ) -> Result<Vec<Question>, DependencyError> {
        Err(DependencyError::Unreachable("ai tier offline".to_string()))
    }
}

/// Scoring service recording every draft it was asked to score.
pub(super) struct RecordingScorer {
    score: Mutex<u8>,
    requests: Mutex<Vec<ProductDraft>>,
}

impl RecordingScorer {
    pub(super) fn with_score(score: u8) -> Self {
        Self {
            score: Mutex::new(score),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub(super) fn set_score(&self, score: u8) {
        *self.score.lock().expect("score mutex poisoned") = score;
    }

    pub(super) fn requests(&self) -> Vec<ProductDraft> {
        self.requests.lock().expect("score mutex poisoned").clone()
    }
}

impl ScoringService for RecordingScorer {
    fn transparency_score(&self, draft: &ProductDraft) -> Result<u8, DependencyError> {
        self.requests
            .lock()
            .expect("score mutex poisoned")
            .push(draft.clone());
        Ok(*self.score.lock().expect("score mutex poisoned"))
    }
}

/// Scoring service that always fails.
pub(super) struct FailingScorer;

impl ScoringService for FailingScorer {
    fn transparency_score(&self, _draft: &ProductDraft) -> Result<u8, DependencyError> {
        Err(DependencyError::Unreachable("scoring offline".to_string()))
    }
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
