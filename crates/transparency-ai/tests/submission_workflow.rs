//! End-to-end intake session driven through the public workflow facade with
//! the offline heuristics standing in for the AI tier, the way the demo
//! command runs it.

mod common {
    use std::collections::HashMap;
    use std::sync::{Arc, Mutex};

    use transparency_ai::workflows::intake::{
        Product, ProductFilter, ProductId, ProductRepository, RepositoryError,
    };

    #[derive(Default)]
    pub struct MemoryRepository {
        records: Mutex<HashMap<ProductId, Product>>,
    }

    impl MemoryRepository {
        pub fn stored(&self) -> Vec<Product> {
            self.records
                .lock()
                .expect("repository mutex poisoned")
                .values()
                .cloned()
                .collect()
        }
    }

    impl ProductRepository for MemoryRepository {
        fn insert(&self, product: Product) -> Result<Product, RepositoryError> {
            let mut guard = self.records.lock().expect("repository mutex poisoned");
            if guard.contains_key(&product.id) {
                return Err(RepositoryError::Conflict);
            }
            guard.insert(product.id.clone(), product.clone());
            Ok(product)
        }

        fn update(&self, product: Product) -> Result<Product, RepositoryError> {
            let mut guard = self.records.lock().expect("repository mutex poisoned");
            if !guard.contains_key(&product.id) {
                return Err(RepositoryError::NotFound);
            }
            guard.insert(product.id.clone(), product.clone());
            Ok(product)
        }

        fn fetch(&self, id: &ProductId) -> Result<Option<Product>, RepositoryError> {
            let guard = self.records.lock().expect("repository mutex poisoned");
            Ok(guard.get(id).cloned())
        }

        fn list(&self, filter: &ProductFilter) -> Result<Vec<Product>, RepositoryError> {
            let guard = self.records.lock().expect("repository mutex poisoned");
            let mut matching: Vec<Product> = guard
                .values()
                .filter(|product| filter.matches(product))
                .cloned()
                .collect();
            matching.sort_by(|a, b| b.created_at.cmp(&a.created_at));
            Ok(matching)
        }
    }

    pub fn build() -> (
        Arc<
            transparency_ai::workflows::intake::ProductIntakeService<
                MemoryRepository,
                transparency_ai::workflows::intake::DisclosureGapPlanner,
                transparency_ai::workflows::intake::CompletenessScorer,
            >,
        >,
        Arc<MemoryRepository>,
    ) {
        use transparency_ai::workflows::intake::{
            CompletenessScorer, DisclosureGapPlanner, ProductIntakeService,
        };

        let repository = Arc::new(MemoryRepository::default());
        let service = Arc::new(ProductIntakeService::new(
            repository.clone(),
            Arc::new(DisclosureGapPlanner),
            Arc::new(CompletenessScorer),
        ));
        (service, repository)
    }
}

use transparency_ai::workflows::intake::{
    FormStep, ProductDraft, QuestionTopic, SubmissionWorkflow,
};

fn sparse_draft() -> ProductDraft {
    ProductDraft {
        name: "Granola Bar".to_string(),
        category: "Food & Beverage".to_string(),
        description: "Honey oat bar baked in small batches.".to_string(),
        disclosure: Default::default(),
    }
}

#[test]
fn full_session_fills_gaps_and_scores_the_submission() {
    let (service, repository) = common::build();
    let mut workflow = SubmissionWorkflow::with_draft(service, sparse_draft());

    workflow.advance().expect("details step");
    {
        let draft = workflow.draft_mut().expect("draft editable");
        draft.disclosure.manufacturing_location = Some("Portland, Oregon".to_string());
        draft.disclosure.certifications = vec!["Organic".to_string()];
    }
    workflow.advance().expect("sustainability step");
    {
        let draft = workflow.draft_mut().expect("draft editable");
        draft.disclosure.sustainability.packaging_material = Some("Recycled cardboard".to_string());
        draft.disclosure.sustainability.recyclable = Some(true);
    }

    workflow.advance().expect("dynamic step");
    assert_eq!(workflow.step(), FormStep::Dynamic);

    // The planner asks only about the areas still empty: ingredients,
    // allergens, and labor practices.
    let topics: Vec<QuestionTopic> = workflow
        .follow_up_questions()
        .iter()
        .map(|question| question.topic)
        .collect();
    assert_eq!(
        topics,
        vec![
            QuestionTopic::Ingredients,
            QuestionTopic::Allergens,
            QuestionTopic::Ethics,
        ]
    );

    for question in workflow.follow_up_questions().to_vec() {
        match question.topic {
            QuestionTopic::Ingredients => {
                workflow.answer_question(&question, "oats, honey, almonds, sea salt")
            }
            QuestionTopic::Allergens => workflow.answer_question(&question, "Nuts"),
            QuestionTopic::Ethics => {
                workflow.answer_question(&question, "Fair wages, audited annually")
            }
            _ => unreachable!("planner only asks about the empty areas"),
        }
    }

    let product = workflow.submit().expect("submission succeeds");
    assert_eq!(workflow.step(), FormStep::Submitted);

    let stored = repository.stored();
    assert_eq!(stored.len(), 1);
    let disclosure = &stored[0].submission.disclosure;
    assert_eq!(
        disclosure.ingredients.as_deref(),
        Some("oats, honey, almonds, sea salt")
    );
    assert_eq!(disclosure.allergens, vec!["Nuts"]);
    assert!(disclosure.labor_practices.is_some());

    // Rubric over the finalized bag: name 10 + category 5 + description 10
    // + 4 ingredients 8 + manufacturing 10 + 1 certification 5 +
    // 2 sustainability fields 10 + allergens 5 + labor 10.
    assert_eq!(product.transparency_score, Some(73));
    assert_eq!(stored[0].transparency_score, Some(73));
}

#[test]
fn a_complete_draft_yields_a_questionless_dynamic_step() {
    let (service, _) = common::build();
    let mut draft = sparse_draft();
    draft.disclosure.ingredients =
        Some("oats, honey, almonds, sea salt, cinnamon".to_string());
    draft.disclosure.manufacturing_location = Some("Portland, Oregon".to_string());
    draft.disclosure.certifications = vec!["Organic".to_string()];
    draft.disclosure.allergens = vec!["Nuts".to_string()];
    draft.disclosure.sustainability.packaging_material = Some("Cardboard".to_string());
    draft.disclosure.labor_practices = Some("Fair wages".to_string());

    let mut workflow = SubmissionWorkflow::with_draft(service, draft);
    workflow.advance().expect("details");
    workflow.advance().expect("sustainability");
    workflow.advance().expect("dynamic");

    assert!(workflow.follow_up_questions().is_empty());
    let product = workflow.submit().expect("submission succeeds");
    assert!(product.transparency_score.is_some());
}
