use std::time::Duration;

use serde::Serialize;
use ureq::Agent;

use crate::workflows::intake::clients::DependencyError;
use crate::workflows::intake::domain::{Answer, Product, ProductDraft};

/// Everything the rendering collaborator needs: the current attribute bag,
/// the ordered answers, and the score if one has been computed.
#[derive(Debug, Clone, Serialize)]
pub struct ReportContext<'a> {
    #[serde(rename = "productId")]
    pub product_id: &'a str,
    #[serde(rename = "productData")]
    pub product_data: &'a ProductDraft,
    #[serde(rename = "transparencyScore", skip_serializing_if = "Option::is_none")]
    pub transparency_score: Option<u8>,
    pub answers: &'a [Answer],
}

impl<'a> ReportContext<'a> {
    pub fn for_product(product: &'a Product) -> Self {
        Self {
            product_id: product.id.0.as_str(),
            product_data: &product.submission,
            transparency_score: product.transparency_score,
            answers: &product.answers,
        }
    }
}

/// Renders a report byte stream for a product. Implementations own their
/// transport and must bound their runtime.
pub trait ReportRenderer: Send + Sync {
    fn render(&self, context: &ReportContext<'_>) -> Result<Vec<u8>, DependencyError>;
}

/// HTTP client for the remote report renderer.
#[derive(Debug)]
pub struct HttpReportRenderer {
    agent: Agent,
    endpoint: String,
}

impl HttpReportRenderer {
    pub fn new(base_url: &str, timeout: Duration) -> Self {
        let agent: Agent = Agent::config_builder()
            .timeout_global(Some(timeout))
            .build()
            .into();
        Self {
            agent,
            endpoint: format!("{}/render", base_url.trim_end_matches('/')),
        }
    }
}

impl ReportRenderer for HttpReportRenderer {
    fn render(&self, context: &ReportContext<'_>) -> Result<Vec<u8>, DependencyError> {
        tracing::debug!(endpoint = %self.endpoint, product_id = context.product_id, "requesting rendered report");

        let mut response = self
            .agent
            .post(&self.endpoint)
            .send_json(context)
            .map_err(|err| match err {
                ureq::Error::StatusCode(code) => DependencyError::Status(code),
                other => DependencyError::Unreachable(other.to_string()),
            })?;

        response
            .body_mut()
            .read_to_vec()
            .map_err(|err| DependencyError::Payload(err.to_string()))
    }
}
