//! Product disclosure intake: the multi-step submission workflow, the
//! AI-tier client contracts, and the HTTP surface the workflow is driven
//! through.

pub mod answers;
pub mod clients;
pub mod domain;
pub mod heuristics;
pub mod repository;
pub mod router;
pub mod service;
pub mod workflow;

#[cfg(test)]
mod tests;

pub use answers::AnswerSet;
pub use clients::{
    DependencyError, HttpQuestionService, HttpScoringService, QuestionService, ScoringService,
};
pub use domain::{
    Answer, AnswerKind, DisclosureProfile, FormStep, Product, ProductDraft, ProductId,
    ProductUpdate, Question, QuestionTopic, SustainabilityDisclosure, ValidationError,
    MAX_TRANSPARENCY_SCORE,
};
pub use heuristics::{CompletenessScorer, DisclosureGapPlanner};
pub use repository::{ProductFilter, ProductRepository, RepositoryError};
pub use router::{product_router, CreateProductRequest};
pub use service::{IntakeError, IntakeReceipt, ProductIntakeService, ScoreReceipt};
pub use workflow::{SubmissionError, SubmissionWorkflow};
