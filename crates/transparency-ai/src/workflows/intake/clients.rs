use std::time::Duration;

use serde::{Deserialize, Serialize};
use ureq::Agent;

use super::answers::AnswerSet;
use super::domain::{ProductDraft, ProductId, Question, MAX_TRANSPARENCY_SCORE};

/// Failure of a remote collaborator. Callers decide whether to degrade
/// (question generation, scoring during submission) or to surface the
/// failure (report rendering, explicit score refresh).
#[derive(Debug, thiserror::Error)]
pub enum DependencyError {
    #[error("service unreachable: {0}")]
    Unreachable(String),
    #[error("service responded with status {0}")]
    Status(u16),
    #[error("unexpected payload: {0}")]
    Payload(String),
    #[error("score {0} is outside the 0-100 range")]
    ScoreOutOfRange(i64),
}

/// Generates follow-up questions for the current draft and answers.
///
/// A single attempt per call; implementations must bound their own runtime
/// so the workflow never blocks indefinitely on this collaborator.
pub trait QuestionService: Send + Sync {
    fn follow_up_questions(
        &self,
        draft: &ProductDraft,
        answers: &AnswerSet,
        product_id: Option<&ProductId>,
    ) -> Result<Vec<Question>, DependencyError>;
}

/// Computes a transparency score in `[0, 100]` for a finalized draft.
pub trait ScoringService: Send + Sync {
    fn transparency_score(&self, draft: &ProductDraft) -> Result<u8, DependencyError>;
}

#[derive(Serialize)]
struct QuestionRequest<'a> {
    #[serde(rename = "productData")]
    product_data: &'a ProductDraft,
    #[serde(rename = "currentAnswers")]
    current_answers: &'a AnswerSet,
    #[serde(rename = "productId", skip_serializing_if = "Option::is_none")]
    product_id: Option<&'a str>,
}

#[derive(Deserialize)]
struct QuestionsEnvelope {
    #[serde(default)]
    questions: Vec<Question>,
}

#[derive(Serialize)]
struct ScoreRequest<'a> {
    #[serde(rename = "productData")]
    product_data: &'a ProductDraft,
}

#[derive(Deserialize)]
struct ScoreEnvelope {
    score: i64,
}

fn bounded_agent(timeout: Duration) -> Agent {
    Agent::config_builder()
        .timeout_global(Some(timeout))
        .build()
        .into()
}

fn transport_error(err: ureq::Error) -> DependencyError {
    match err {
        ureq::Error::StatusCode(code) => DependencyError::Status(code),
        other => DependencyError::Unreachable(other.to_string()),
    }
}

/// HTTP client for the question-generation endpoint of the AI tier.
#[derive(Debug)]
pub struct HttpQuestionService {
    agent: Agent,
    endpoint: String,
}

impl HttpQuestionService {
    pub fn new(base_url: &str, timeout: Duration) -> Self {
        Self {
            agent: bounded_agent(timeout),
            endpoint: format!("{}/generate-questions", base_url.trim_end_matches('/')),
        }
    }
}

impl QuestionService for HttpQuestionService {
    fn follow_up_questions(
        &self,
        draft: &ProductDraft,
        answers: &AnswerSet,
        product_id: Option<&ProductId>,
    ) -> Result<Vec<Question>, DependencyError> {
        let request = QuestionRequest {
            product_data: draft,
            current_answers: answers,
            product_id: product_id.map(|id| id.0.as_str()),
        };

        tracing::debug!(endpoint = %self.endpoint, answers = answers.len(), "requesting follow-up questions");

        let mut response = self
            .agent
            .post(&self.endpoint)
            .send_json(&request)
            .map_err(transport_error)?;

        let envelope: QuestionsEnvelope = response
            .body_mut()
            .read_json()
            .map_err(|err| DependencyError::Payload(err.to_string()))?;

        tracing::debug!(count = envelope.questions.len(), "follow-up questions received");
        Ok(envelope.questions)
    }
}

/// HTTP client for the transparency-score endpoint of the AI tier.
#[derive(Debug)]
pub struct HttpScoringService {
    agent: Agent,
    endpoint: String,
}

impl HttpScoringService {
    pub fn new(base_url: &str, timeout: Duration) -> Self {
        Self {
            agent: bounded_agent(timeout),
            endpoint: format!("{}/transparency-score", base_url.trim_end_matches('/')),
        }
    }
}

impl ScoringService for HttpScoringService {
    fn transparency_score(&self, draft: &ProductDraft) -> Result<u8, DependencyError> {
        let request = ScoreRequest {
            product_data: draft,
        };

        let mut response = self
            .agent
            .post(&self.endpoint)
            .send_json(&request)
            .map_err(transport_error)?;

        let envelope: ScoreEnvelope = response
            .body_mut()
            .read_json()
            .map_err(|err| DependencyError::Payload(err.to_string()))?;

        if envelope.score < 0 || envelope.score > i64::from(MAX_TRANSPARENCY_SCORE) {
            return Err(DependencyError::ScoreOutOfRange(envelope.score));
        }

        tracing::debug!(score = envelope.score, "transparency score received");
        Ok(envelope.score as u8)
    }
}
