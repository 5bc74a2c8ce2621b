use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Identifier wrapper for persisted products.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ProductId(pub String);

impl fmt::Display for ProductId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Transparency scores live on a 0-100 scale.
pub const MAX_TRANSPARENCY_SCORE: u8 = 100;

/// How a follow-up question expects to be answered.
///
/// The wire names match the question payloads emitted by the AI tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AnswerKind {
    #[serde(rename = "text")]
    FreeText,
    #[serde(rename = "checkbox")]
    MultiSelect,
    #[serde(rename = "radio")]
    SingleSelect,
}

/// Disclosure area a follow-up question targets. Used to route the answer
/// into the matching field of the disclosure profile at finalization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QuestionTopic {
    Ingredients,
    Manufacturing,
    Certifications,
    Sustainability,
    Allergens,
    Ethics,
    /// Anything the remote tier invents beyond the known areas.
    #[serde(other)]
    General,
}

impl QuestionTopic {
    pub const fn label(self) -> &'static str {
        match self {
            QuestionTopic::Ingredients => "ingredients",
            QuestionTopic::Manufacturing => "manufacturing",
            QuestionTopic::Certifications => "certifications",
            QuestionTopic::Sustainability => "sustainability",
            QuestionTopic::Allergens => "allergens",
            QuestionTopic::Ethics => "ethics",
            QuestionTopic::General => "general",
        }
    }
}

/// A dynamically generated follow-up question. Questions only exist inside
/// an intake session; they are never persisted apart from their answer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    pub id: u32,
    #[serde(rename = "question")]
    pub prompt: String,
    #[serde(rename = "type")]
    pub kind: AnswerKind,
    #[serde(rename = "category")]
    pub topic: QuestionTopic,
}

/// An answer to a follow-up question, identified by the prompt text it
/// answers. The ordinal fixes both display order and persistence order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Answer {
    #[serde(rename = "question")]
    pub prompt: String,
    #[serde(rename = "answer")]
    pub value: String,
    #[serde(rename = "order")]
    pub ordinal: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub topic: Option<QuestionTopic>,
}

/// Sustainability portion of the disclosure, gathered in step 3.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SustainabilityDisclosure {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub packaging_material: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recyclable: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub carbon_footprint: Option<String>,
}

/// Structured attribute bag describing what a company disclosed about a
/// product. Field names on the wire match the intake form payloads.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisclosureProfile {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ingredients: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub manufacturing_location: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub certifications: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub allergens: Vec<String>,
    #[serde(default, rename = "sustainability_info")]
    pub sustainability: SustainabilityDisclosure,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub labor_practices: Option<String>,
}

/// Everything a company enters before submission. Mutable while the intake
/// session is open, frozen once the product is persisted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductDraft {
    #[serde(rename = "product_name")]
    pub name: String,
    pub category: String,
    pub description: String,
    #[serde(flatten)]
    pub disclosure: DisclosureProfile,
}

impl ProductDraft {
    /// Guard for leaving the basic-information step: every required field
    /// must contain something other than whitespace.
    pub fn validate_required(&self) -> Result<(), ValidationError> {
        if self.name.trim().is_empty() {
            return Err(ValidationError::MissingName);
        }
        if self.category.trim().is_empty() {
            return Err(ValidationError::MissingCategory);
        }
        if self.description.trim().is_empty() {
            return Err(ValidationError::MissingDescription);
        }
        Ok(())
    }
}

/// Required-field violations raised at guarded transitions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("product name is required")]
    MissingName,
    #[error("product category is required")]
    MissingCategory,
    #[error("product description is required")]
    MissingDescription,
}

/// The persisted product: finalized draft, ordered answers, and the
/// optional transparency score. Timestamps are maintained by whichever
/// repository stores the record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    #[serde(flatten)]
    pub submission: ProductDraft,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub answers: Vec<Answer>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transparency_score: Option<u8>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Replacement fields for the update operation. Absent fields keep their
/// stored values; provided required fields must still be non-blank.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProductUpdate {
    pub name: Option<String>,
    pub category: Option<String>,
    pub description: Option<String>,
    #[serde(rename = "submittedData")]
    pub disclosure: Option<DisclosureProfile>,
    #[serde(rename = "transparencyScore")]
    pub transparency_score: Option<u8>,
}

/// Steps of the intake form, walked front to back by the submission
/// workflow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FormStep {
    Basic,
    Details,
    Sustainability,
    Dynamic,
    Submitted,
}

impl FormStep {
    pub const fn label(self) -> &'static str {
        match self {
            FormStep::Basic => "basic_information",
            FormStep::Details => "product_details",
            FormStep::Sustainability => "sustainability_and_ethics",
            FormStep::Dynamic => "additional_questions",
            FormStep::Submitted => "submitted",
        }
    }
}

impl fmt::Display for FormStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
