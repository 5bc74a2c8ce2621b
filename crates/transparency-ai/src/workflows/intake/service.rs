use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::Utc;
use serde::Serialize;

use super::answers::AnswerSet;
use super::clients::{DependencyError, QuestionService, ScoringService};
use super::domain::{
    Product, ProductDraft, ProductId, ProductUpdate, Question, ValidationError,
};
use super::repository::{ProductFilter, ProductRepository, RepositoryError};

static PRODUCT_SEQUENCE: AtomicU64 = AtomicU64::new(1);

fn next_product_id() -> ProductId {
    let id = PRODUCT_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    ProductId(format!("prd-{id:06}"))
}

/// Service composing the repository and the two AI-tier clients.
///
/// The submission workflow drives it for in-session intake; the HTTP router
/// exposes the same operations directly.
pub struct ProductIntakeService<R, Q, S> {
    repository: Arc<R>,
    questions: Arc<Q>,
    scoring: Arc<S>,
}

/// Outcome of a successful create: the stored product plus whatever
/// follow-up questions the AI tier produced for it.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IntakeReceipt {
    pub product: Product,
    pub follow_up_questions: Vec<Question>,
}

/// Outcome of a score refresh.
#[derive(Debug, Clone, Serialize)]
pub struct ScoreReceipt {
    pub product_id: ProductId,
    pub score: u8,
}

impl<R, Q, S> ProductIntakeService<R, Q, S>
where
    R: ProductRepository + 'static,
    Q: QuestionService + 'static,
    S: ScoringService + 'static,
{
    pub fn new(repository: Arc<R>, questions: Arc<Q>, scoring: Arc<S>) -> Self {
        Self {
            repository,
            questions,
            scoring,
        }
    }

    /// Create a product from a finalized draft.
    ///
    /// Validates required fields, merges the gathered answers into the
    /// disclosure profile immediately before persistence, inserts the
    /// record, then asks the AI tier for further follow-up questions.
    /// The question fetch is best-effort: any failure degrades to an empty
    /// list and never rolls back the stored product.
    pub fn create(
        &self,
        draft: ProductDraft,
        answers: AnswerSet,
    ) -> Result<IntakeReceipt, IntakeError> {
        draft.validate_required()?;

        let mut draft = draft;
        answers.apply_to(&mut draft.disclosure);

        let now = Utc::now();
        let product = Product {
            id: next_product_id(),
            submission: draft,
            answers: answers.finalized(),
            transparency_score: None,
            created_at: now,
            updated_at: now,
        };

        let stored = self.repository.insert(product)?;
        tracing::info!(product_id = %stored.id, "product created");

        let follow_up_questions =
            self.degraded_follow_ups(&stored.submission, &answers, Some(&stored.id));

        Ok(IntakeReceipt {
            product: stored,
            follow_up_questions,
        })
    }

    /// Fetch follow-up questions, degrading any dependency failure to an
    /// empty list. The checkpoint in the submission workflow and the
    /// create operation both route through here.
    pub fn degraded_follow_ups(
        &self,
        draft: &ProductDraft,
        answers: &AnswerSet,
        product_id: Option<&ProductId>,
    ) -> Vec<Question> {
        match self.questions.follow_up_questions(draft, answers, product_id) {
            Ok(questions) => questions,
            Err(err) => {
                tracing::warn!(error = %err, "question generation unavailable, continuing without follow-ups");
                Vec::new()
            }
        }
    }

    pub fn get(&self, id: &ProductId) -> Result<Product, IntakeError> {
        let product = self.repository.fetch(id)?.ok_or(RepositoryError::NotFound)?;
        Ok(product)
    }

    pub fn list(&self, filter: &ProductFilter) -> Result<Vec<Product>, IntakeError> {
        Ok(self.repository.list(filter)?)
    }

    /// Replace stored fields with the provided ones. Required fields may
    /// not be blanked out by an update.
    pub fn update(&self, id: &ProductId, update: ProductUpdate) -> Result<Product, IntakeError> {
        let mut product = self.get(id)?;

        if let Some(name) = update.name {
            product.submission.name = name;
        }
        if let Some(category) = update.category {
            product.submission.category = category;
        }
        if let Some(description) = update.description {
            product.submission.description = description;
        }
        product.submission.validate_required()?;

        if let Some(disclosure) = update.disclosure {
            product.submission.disclosure = disclosure;
        }
        if let Some(score) = update.transparency_score {
            product.transparency_score = Some(score);
        }
        product.updated_at = Utc::now();

        Ok(self.repository.update(product)?)
    }

    /// Request a fresh transparency score and persist it.
    ///
    /// Safe to repeat: each call overwrites the stored value, so exactly
    /// one score exists per product. Scoring failures propagate and leave
    /// the stored record untouched.
    pub fn refresh_score(&self, id: &ProductId) -> Result<ScoreReceipt, IntakeError> {
        let mut product = self.get(id)?;

        let score = self
            .scoring
            .transparency_score(&product.submission)
            .map_err(IntakeError::Dependency)?;

        product.transparency_score = Some(score);
        product.updated_at = Utc::now();
        self.repository.update(product)?;

        tracing::info!(product_id = %id, score, "transparency score stored");
        Ok(ScoreReceipt {
            product_id: id.clone(),
            score,
        })
    }
}

/// Error raised by the intake service.
#[derive(Debug, thiserror::Error)]
pub enum IntakeError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
    #[error("scoring unavailable: {0}")]
    Dependency(DependencyError),
}
