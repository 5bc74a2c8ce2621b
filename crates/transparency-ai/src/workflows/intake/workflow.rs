use std::sync::Arc;

use super::answers::AnswerSet;
use super::clients::{QuestionService, ScoringService};
use super::domain::{FormStep, Product, ProductDraft, Question, ValidationError};
use super::repository::ProductRepository;
use super::service::{IntakeError, ProductIntakeService};

/// One in-progress submission session.
///
/// Walks the intake form `Basic -> Details -> Sustainability -> Dynamic ->
/// Submitted`. The user may step back to any earlier form step; there is no
/// terminal failure state. Entering the dynamic step asks the AI tier for
/// follow-up questions exactly once per entry, scoped to the draft as it
/// stands at that moment; a failed fetch leaves the session in a degraded
/// but valid state with no questions to show.
pub struct SubmissionWorkflow<R, Q, S> {
    service: Arc<ProductIntakeService<R, Q, S>>,
    step: FormStep,
    draft: ProductDraft,
    answers: AnswerSet,
    follow_ups: Vec<Question>,
    error: Option<String>,
}

/// Error raised by a submit attempt.
#[derive(Debug, thiserror::Error)]
pub enum SubmissionError {
    #[error("submission is only available from the additional-questions step (currently {0})")]
    WrongStep(FormStep),
    #[error(transparent)]
    Intake(#[from] IntakeError),
}

impl<R, Q, S> SubmissionWorkflow<R, Q, S>
where
    R: ProductRepository + 'static,
    Q: QuestionService + 'static,
    S: ScoringService + 'static,
{
    pub fn new(service: Arc<ProductIntakeService<R, Q, S>>) -> Self {
        Self {
            service,
            step: FormStep::Basic,
            draft: ProductDraft::default(),
            answers: AnswerSet::new(),
            follow_ups: Vec::new(),
            error: None,
        }
    }

    pub fn with_draft(service: Arc<ProductIntakeService<R, Q, S>>, draft: ProductDraft) -> Self {
        let mut workflow = Self::new(service);
        workflow.draft = draft;
        workflow
    }

    pub fn step(&self) -> FormStep {
        self.step
    }

    pub fn draft(&self) -> &ProductDraft {
        &self.draft
    }

    /// The draft stays editable until submission succeeds.
    pub fn draft_mut(&mut self) -> Option<&mut ProductDraft> {
        match self.step {
            FormStep::Submitted => None,
            _ => Some(&mut self.draft),
        }
    }

    pub fn follow_up_questions(&self) -> &[Question] {
        &self.follow_ups
    }

    pub fn answers(&self) -> &AnswerSet {
        &self.answers
    }

    /// Message from the most recent failed submit attempt, cleared by the
    /// next successful transition.
    pub fn last_error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Move forward one step. The exit from the basic-information step is
    /// guarded: missing required fields reject the transition and leave
    /// the step unchanged. Advancing has no effect once the dynamic step
    /// is reached; from there the only way forward is `submit`.
    pub fn advance(&mut self) -> Result<FormStep, ValidationError> {
        match self.step {
            FormStep::Basic => {
                self.draft.validate_required()?;
                self.step = FormStep::Details;
            }
            FormStep::Details => {
                self.step = FormStep::Sustainability;
            }
            FormStep::Sustainability => {
                self.enter_dynamic();
            }
            FormStep::Dynamic | FormStep::Submitted => {}
        }
        self.error = None;
        Ok(self.step)
    }

    /// Move back one step. Submitted sessions and the first step stay put.
    pub fn back(&mut self) -> FormStep {
        self.step = match self.step {
            FormStep::Dynamic => FormStep::Sustainability,
            FormStep::Sustainability => FormStep::Details,
            FormStep::Details => FormStep::Basic,
            other => other,
        };
        self.step
    }

    /// Record the answer to one of the fetched follow-up questions.
    /// Re-answering the same question overwrites the earlier value.
    pub fn answer_question(&mut self, question: &Question, value: impl Into<String>) {
        self.answers.record_for_question(question, value);
    }

    /// Finalize and persist the submission. Only available from the
    /// dynamic step.
    ///
    /// On success the answers are merged into the disclosure profile, the
    /// product is stored, a transparency score is requested best-effort
    /// (failure is logged and swallowed; the product simply has no score
    /// yet), and the session transitions to `Submitted`. On validation or
    /// persistence failure the session stays in the dynamic step with the
    /// entered data intact and the error recorded for display.
    pub fn submit(&mut self) -> Result<Product, SubmissionError> {
        if self.step != FormStep::Dynamic {
            return Err(SubmissionError::WrongStep(self.step));
        }

        let receipt = match self.service.create(self.draft.clone(), self.answers.clone()) {
            Ok(receipt) => receipt,
            Err(err) => {
                self.error = Some(err.to_string());
                return Err(SubmissionError::Intake(err));
            }
        };

        let mut product = receipt.product;
        match self.service.refresh_score(&product.id) {
            Ok(score) => product.transparency_score = Some(score.score),
            Err(err) => {
                tracing::warn!(product_id = %product.id, error = %err, "transparency score deferred");
            }
        }

        self.step = FormStep::Submitted;
        self.error = None;
        Ok(product)
    }

    /// Checkpoint: a single follow-up fetch per entry into the dynamic
    /// step, replacing whatever the previous entry fetched. Answers keyed
    /// on prompts that reappear survive re-entry.
    fn enter_dynamic(&mut self) {
        self.follow_ups = self
            .service
            .degraded_follow_ups(&self.draft, &self.answers, None);
        self.step = FormStep::Dynamic;
    }
}
