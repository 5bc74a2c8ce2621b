use crate::infra::{InMemoryProductRepository, PlainTextReportRenderer};
use clap::Args;
use std::path::PathBuf;
use std::sync::Arc;
use transparency_ai::error::AppError;
use transparency_ai::workflows::intake::{
    CompletenessScorer, DisclosureGapPlanner, FormStep, ProductDraft, ProductIntakeService,
    QuestionService, QuestionTopic, ScoringService, SubmissionWorkflow,
};
use transparency_ai::workflows::report::ReportDispatcher;

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Product name used for the demo submission
    #[arg(long)]
    pub(crate) name: Option<String>,
    /// Product category used for the demo submission
    #[arg(long)]
    pub(crate) category: Option<String>,
    /// Skip the report-generation portion of the demo
    #[arg(long)]
    pub(crate) skip_report: bool,
}

#[derive(Args, Debug)]
pub(crate) struct ScoreArgs {
    /// Path to a product draft JSON file
    #[arg(long)]
    pub(crate) draft: PathBuf,
}

fn demo_draft(args: &DemoArgs) -> ProductDraft {
    ProductDraft {
        name: args
            .name
            .clone()
            .unwrap_or_else(|| "Granola Bar".to_string()),
        category: args
            .category
            .clone()
            .unwrap_or_else(|| "Food & Beverage".to_string()),
        description: "Honey oat bar baked in small batches.".to_string(),
        disclosure: Default::default(),
    }
}

fn demo_answer(topic: QuestionTopic) -> &'static str {
    match topic {
        QuestionTopic::Ingredients => "Rolled oats, honey, almonds, sea salt",
        QuestionTopic::Manufacturing => "Portland, Oregon, USA",
        QuestionTopic::Certifications => "Organic, Non-GMO",
        QuestionTopic::Sustainability => "Recycled cardboard, fully recyclable",
        QuestionTopic::Allergens => "Nuts",
        QuestionTopic::Ethics => "Living wages, third-party audited annually",
        QuestionTopic::General => "Provided on request",
    }
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    println!("Product transparency intake demo");

    let repository = Arc::new(InMemoryProductRepository::default());
    let service = Arc::new(ProductIntakeService::new(
        repository.clone(),
        Arc::new(DisclosureGapPlanner),
        Arc::new(CompletenessScorer),
    ));

    let mut workflow = SubmissionWorkflow::with_draft(service, demo_draft(&args));
    println!(
        "- Step 1: {} ({})",
        workflow.step().label(),
        workflow.draft().name
    );

    if let Err(err) = workflow.advance() {
        println!("  Basic information rejected: {err}");
        return Ok(());
    }
    println!("- Step 2: {} (details left sparse on purpose)", workflow.step().label());

    if let Err(err) = workflow.advance() {
        println!("  Product details rejected: {err}");
        return Ok(());
    }
    if let Some(draft) = workflow.draft_mut() {
        draft.disclosure.sustainability.packaging_material =
            Some("Recycled cardboard".to_string());
        draft.disclosure.sustainability.recyclable = Some(true);
    }
    println!("- Step 3: {}", workflow.step().label());

    if let Err(err) = workflow.advance() {
        println!("  Sustainability details rejected: {err}");
        return Ok(());
    }
    println!(
        "- Step 4: {} with {} follow-up question(s)",
        workflow.step().label(),
        workflow.follow_up_questions().len()
    );

    for question in workflow.follow_up_questions().to_vec() {
        let answer = demo_answer(question.topic);
        println!("    Q: {}", question.prompt);
        println!("    A: {}", answer);
        workflow.answer_question(&question, answer);
    }

    let product = match workflow.submit() {
        Ok(product) => product,
        Err(err) => {
            println!("  Submission rejected: {err}");
            return Ok(());
        }
    };
    debug_assert_eq!(workflow.step(), FormStep::Submitted);

    println!("- Submitted as {}", product.id);
    match product.transparency_score {
        Some(score) => println!("  Transparency score: {score}/100"),
        None => println!("  Transparency score: pending (scoring unavailable)"),
    }

    match serde_json::to_string_pretty(&product) {
        Ok(json) => println!("  Stored product payload:\n{json}"),
        Err(err) => println!("  Stored product payload unavailable: {err}"),
    }

    if args.skip_report {
        return Ok(());
    }

    let dispatcher = ReportDispatcher::new(repository, Arc::new(PlainTextReportRenderer));
    match dispatcher.dispatch(&product.id) {
        Ok(report) => {
            let text = String::from_utf8_lossy(&report.bytes).into_owned();
            println!("\nGenerated report\n{text}");
        }
        Err(err) => println!("\nReport unavailable: {err}"),
    }

    Ok(())
}

pub(crate) fn run_score(args: ScoreArgs) -> Result<(), AppError> {
    let raw = std::fs::read_to_string(&args.draft)?;
    let draft: ProductDraft = serde_json::from_str(&raw)?;

    let scorer = CompletenessScorer;
    let score = scorer
        .transparency_score(&draft)
        .expect("offline scoring is infallible");
    println!("Transparency score for {}: {score}/100", draft.name);

    let planner = DisclosureGapPlanner;
    let questions = planner
        .follow_up_questions(&draft, &Default::default(), None)
        .expect("offline planning is infallible");
    if questions.is_empty() {
        println!("No disclosure gaps detected.");
    } else {
        println!("Disclosure gaps:");
        for question in questions {
            println!("- [{}] {}", question.topic.label(), question.prompt);
        }
    }

    Ok(())
}
