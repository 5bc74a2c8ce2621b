use serde::{Deserialize, Deserializer, Serialize};

use super::domain::{Answer, DisclosureProfile, Question, QuestionTopic};

/// Ordered collection of follow-up answers keyed by prompt text.
///
/// Re-answering a prompt overwrites the stored value and keeps the original
/// ordinal, so a corrected answer neither duplicates nor reorders the set.
/// Serializes as a plain array (the `currentAnswers` wire shape).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct AnswerSet {
    entries: Vec<Answer>,
}

/// Deserialization routes through `record` so wire payloads with repeated
/// prompts collapse to the last value, same as interactive answering.
impl<'de> Deserialize<'de> for AnswerSet {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let entries = Vec::<Answer>::deserialize(deserializer)?;
        Ok(Self::from(entries))
    }
}

impl AnswerSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Answer> {
        self.entries.iter()
    }

    /// Record an answer, overwriting any prior entry with the same prompt.
    pub fn record(&mut self, answer: Answer) {
        match self
            .entries
            .iter_mut()
            .find(|existing| existing.prompt == answer.prompt)
        {
            Some(existing) => {
                existing.value = answer.value;
                if answer.topic.is_some() {
                    existing.topic = answer.topic;
                }
            }
            None => self.entries.push(answer),
        }
    }

    /// Record an answer to a known question, carrying its topic tag and
    /// using the question id as the ordinal.
    pub fn record_for_question(&mut self, question: &Question, value: impl Into<String>) {
        self.record(Answer {
            prompt: question.prompt.clone(),
            value: value.into(),
            ordinal: question.id,
            topic: Some(question.topic),
        });
    }

    /// Answers in persistence order (ascending ordinal, stable for ties).
    pub fn finalized(&self) -> Vec<Answer> {
        let mut ordered = self.entries.clone();
        ordered.sort_by_key(|answer| answer.ordinal);
        ordered
    }

    /// Merge every answer into the disclosure profile, in ordinal order.
    ///
    /// Routing prefers the explicit topic tag carried from the question;
    /// untagged answers fall back to a keyword scan of the prompt text.
    /// Answers that match neither are kept on the product but leave the
    /// profile untouched.
    pub fn apply_to(&self, profile: &mut DisclosureProfile) {
        for answer in self.finalized() {
            let target = answer
                .topic
                .and_then(route_for_topic)
                .or_else(|| route_for_prompt(&answer.prompt));

            let Some(target) = target else { continue };
            let value = answer.value.trim();
            if value.is_empty() {
                continue;
            }

            match target {
                RouteTarget::Ingredients => profile.ingredients = Some(value.to_string()),
                RouteTarget::ManufacturingLocation => {
                    profile.manufacturing_location = Some(value.to_string());
                }
                RouteTarget::Certifications => profile.certifications = split_list(value),
                RouteTarget::Allergens => profile.allergens = split_list(value),
                RouteTarget::PackagingMaterial => {
                    profile.sustainability.packaging_material = Some(value.to_string());
                }
                RouteTarget::LaborPractices => profile.labor_practices = Some(value.to_string()),
            }
        }
    }
}

impl From<Vec<Answer>> for AnswerSet {
    fn from(answers: Vec<Answer>) -> Self {
        let mut set = Self::default();
        for answer in answers {
            set.record(answer);
        }
        set
    }
}

/// Disclosure field an answer lands in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RouteTarget {
    Ingredients,
    ManufacturingLocation,
    Certifications,
    Allergens,
    PackagingMaterial,
    LaborPractices,
}

fn route_for_topic(topic: QuestionTopic) -> Option<RouteTarget> {
    match topic {
        QuestionTopic::Ingredients => Some(RouteTarget::Ingredients),
        QuestionTopic::Manufacturing => Some(RouteTarget::ManufacturingLocation),
        QuestionTopic::Certifications => Some(RouteTarget::Certifications),
        QuestionTopic::Allergens => Some(RouteTarget::Allergens),
        QuestionTopic::Sustainability => Some(RouteTarget::PackagingMaterial),
        QuestionTopic::Ethics => Some(RouteTarget::LaborPractices),
        QuestionTopic::General => None,
    }
}

/// Substring routing for answers that arrived without a topic tag.
fn route_for_prompt(prompt: &str) -> Option<RouteTarget> {
    let lowered = prompt.to_ascii_lowercase();
    if lowered.contains("ingredient") {
        Some(RouteTarget::Ingredients)
    } else if lowered.contains("manufactur") {
        Some(RouteTarget::ManufacturingLocation)
    } else if lowered.contains("packaging") {
        Some(RouteTarget::PackagingMaterial)
    } else if lowered.contains("labor") {
        Some(RouteTarget::LaborPractices)
    } else if lowered.contains("allergen") {
        Some(RouteTarget::Allergens)
    } else if lowered.contains("certification") {
        Some(RouteTarget::Certifications)
    } else {
        None
    }
}

fn split_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(str::to_string)
        .collect()
}
