//! Offline stand-ins for the AI tier.
//!
//! `DisclosureGapPlanner` asks about whichever disclosure areas are still
//! empty, and `CompletenessScorer` grades how much of the profile has been
//! filled in. The demo and `score` CLI commands run entirely on these, and
//! tests use them to exercise the workflow without a network.

use super::answers::AnswerSet;
use super::clients::{DependencyError, QuestionService, ScoringService};
use super::domain::{
    AnswerKind, ProductDraft, ProductId, Question, QuestionTopic, MAX_TRANSPARENCY_SCORE,
};

/// Upper bound on questions returned per checkpoint entry.
const MAX_QUESTIONS_PER_ROUND: usize = 5;

/// Ingredients lists shorter than this many entries still count as a gap.
const MIN_INGREDIENT_ENTRIES: usize = 3;

fn comma_entries(value: &str) -> usize {
    value
        .split(',')
        .filter(|entry| !entry.trim().is_empty())
        .count()
}

/// Rule-based question planner: one question per unfilled disclosure area.
#[derive(Debug, Default)]
pub struct DisclosureGapPlanner;

impl QuestionService for DisclosureGapPlanner {
    fn follow_up_questions(
        &self,
        draft: &ProductDraft,
        answers: &AnswerSet,
        _product_id: Option<&ProductId>,
    ) -> Result<Vec<Question>, DependencyError> {
        let mut questions = Vec::new();
        let mut next_id = answers.len() as u32 + 1;
        let mut push = |prompt: String, kind: AnswerKind, topic: QuestionTopic| {
            questions.push(Question {
                id: next_id,
                prompt,
                kind,
                topic,
            });
            next_id += 1;
        };

        let disclosure = &draft.disclosure;

        let sparse_ingredients = disclosure
            .ingredients
            .as_deref()
            .map(|listed| comma_entries(listed) < MIN_INGREDIENT_ENTRIES)
            .unwrap_or(true);
        if sparse_ingredients {
            push(
                format!(
                    "Can you provide a detailed list of all ingredients in {}? \
                     Please include any additives, preservatives, or processing aids.",
                    draft.name
                ),
                AnswerKind::FreeText,
                QuestionTopic::Ingredients,
            );
        }

        if disclosure
            .manufacturing_location
            .as_deref()
            .map(str::trim)
            .map(str::is_empty)
            .unwrap_or(true)
        {
            push(
                "Where is this product manufactured? Please provide the country and, \
                 if possible, the specific facility location."
                    .to_string(),
                AnswerKind::FreeText,
                QuestionTopic::Manufacturing,
            );
        }

        if disclosure.certifications.is_empty() {
            push(
                "Does this product have any third-party certifications (e.g., organic, \
                 fair trade, non-GMO, cruelty-free)? If yes, please list them."
                    .to_string(),
                AnswerKind::MultiSelect,
                QuestionTopic::Certifications,
            );
        }

        if disclosure.sustainability.packaging_material.is_none() {
            push(
                "What type of packaging material is used? Is it recyclable, \
                 biodegradable, or made from recycled materials?"
                    .to_string(),
                AnswerKind::FreeText,
                QuestionTopic::Sustainability,
            );
        }

        if disclosure.allergens.is_empty() {
            push(
                "Does this product contain any common allergens (e.g., nuts, dairy, \
                 gluten, soy)? If yes, please list them."
                    .to_string(),
                AnswerKind::MultiSelect,
                QuestionTopic::Allergens,
            );
        }

        if disclosure.labor_practices.is_none() {
            push(
                "Can you provide information about labor practices in your supply \
                 chain? Are workers paid fair wages and working in safe conditions?"
                    .to_string(),
                AnswerKind::FreeText,
                QuestionTopic::Ethics,
            );
        }

        questions.truncate(MAX_QUESTIONS_PER_ROUND);
        Ok(questions)
    }
}

/// Completeness rubric: each disclosure area contributes a fixed share of
/// the 0-100 scale, with the richer areas weighted by how much was listed.
#[derive(Debug, Default)]
pub struct CompletenessScorer;

impl CompletenessScorer {
    fn sustainability_fields(sustainability: &super::domain::SustainabilityDisclosure) -> u32 {
        let mut fields = 0;
        if sustainability.packaging_material.is_some() {
            fields += 1;
        }
        if sustainability.recyclable.is_some() {
            fields += 1;
        }
        if sustainability.carbon_footprint.is_some() {
            fields += 1;
        }
        fields
    }
}

impl ScoringService for CompletenessScorer {
    fn transparency_score(&self, draft: &ProductDraft) -> Result<u8, DependencyError> {
        let mut score: u32 = 0;
        let disclosure = &draft.disclosure;

        if !draft.name.trim().is_empty() {
            score += 10;
        }
        if !draft.category.trim().is_empty() {
            score += 5;
        }
        if draft.description.trim().len() > 20 {
            score += 10;
        }

        if let Some(ingredients) = disclosure.ingredients.as_deref() {
            score += (comma_entries(ingredients) as u32 * 2).min(20);
        }

        if disclosure
            .manufacturing_location
            .as_deref()
            .map(|location| !location.trim().is_empty())
            .unwrap_or(false)
        {
            score += 10;
        }

        score += (disclosure.certifications.len() as u32 * 5).min(15);
        score += (Self::sustainability_fields(&disclosure.sustainability) * 5).min(15);

        if !disclosure.allergens.is_empty() {
            score += 5;
        }
        if disclosure.labor_practices.is_some() {
            score += 10;
        }

        Ok(score.min(u32::from(MAX_TRANSPARENCY_SCORE)) as u8)
    }
}
