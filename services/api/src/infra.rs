use metrics_exporter_prometheus::PrometheusHandle;
use std::collections::HashMap;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};
use transparency_ai::workflows::intake::{
    Product, ProductFilter, ProductId, ProductRepository, RepositoryError,
};
use transparency_ai::workflows::report::{ReportContext, ReportRenderer};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

#[derive(Default, Clone)]
pub(crate) struct InMemoryProductRepository {
    records: Arc<Mutex<HashMap<ProductId, Product>>>,
}

impl ProductRepository for InMemoryProductRepository {
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
        if guard.contains_key(&product.id) {
            guard.insert(product.id.clone(), product.clone());
            Ok(product)
        } else {
            Err(RepositoryError::NotFound)
        }
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

/// Renderer used by the demo command: a plain-text report instead of a
/// remote PDF service, so the demo runs without any network.
#[derive(Default)]
pub(crate) struct PlainTextReportRenderer;

impl ReportRenderer for PlainTextReportRenderer {
    fn render(
        &self,
        context: &ReportContext<'_>,
    ) -> Result<Vec<u8>, transparency_ai::workflows::intake::DependencyError> {
        let mut lines = Vec::new();
        lines.push(format!("Product Transparency Report — {}", context.product_data.name));
        lines.push(format!("Category: {}", context.product_data.category));
        match context.transparency_score {
            Some(score) => lines.push(format!("Transparency score: {score}/100")),
            None => lines.push("Transparency score: pending".to_string()),
        }
        if let Some(ingredients) = context.product_data.disclosure.ingredients.as_deref() {
            lines.push(format!("Ingredients: {ingredients}"));
        }
        if let Some(location) = context
            .product_data
            .disclosure
            .manufacturing_location
            .as_deref()
        {
            lines.push(format!("Manufactured in: {location}"));
        }
        for answer in context.answers {
            lines.push(format!("Q: {}", answer.prompt));
            lines.push(format!("A: {}", answer.value));
        }
        Ok(lines.join("\n").into_bytes())
    }
}
