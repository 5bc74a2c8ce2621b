use std::sync::Arc;

use super::renderer::{ReportContext, ReportRenderer};
use crate::workflows::intake::clients::DependencyError;
use crate::workflows::intake::domain::ProductId;
use crate::workflows::intake::repository::{ProductRepository, RepositoryError};

/// Content type of rendered reports.
pub const REPORT_CONTENT_TYPE: &str = "application/pdf";

/// A freshly rendered report. Never stored; callers stream it out.
#[derive(Debug, Clone)]
pub struct RenderedReport {
    pub product_id: ProductId,
    pub bytes: Vec<u8>,
}

/// Error raised by report generation.
#[derive(Debug, thiserror::Error)]
pub enum ReportError {
    #[error("product not found")]
    ProductNotFound,
    #[error(transparent)]
    Repository(#[from] RepositoryError),
    #[error("report generation failed: {0}")]
    Renderer(DependencyError),
}

/// Fetches a product and requests a rendered report for it.
///
/// A missing product is reported without ever contacting the renderer, and
/// a renderer failure has no side effects, so repeated calls regenerate
/// independently.
pub struct ReportDispatcher<R, P> {
    repository: Arc<R>,
    renderer: Arc<P>,
}

impl<R, P> ReportDispatcher<R, P>
where
    R: ProductRepository + 'static,
    P: ReportRenderer + 'static,
{
    pub fn new(repository: Arc<R>, renderer: Arc<P>) -> Self {
        Self {
            repository,
            renderer,
        }
    }

    pub fn dispatch(&self, id: &ProductId) -> Result<RenderedReport, ReportError> {
        let product = self
            .repository
            .fetch(id)?
            .ok_or(ReportError::ProductNotFound)?;

        let context = ReportContext::for_product(&product);
        let bytes = self
            .renderer
            .render(&context)
            .map_err(ReportError::Renderer)?;

        tracing::info!(product_id = %id, bytes = bytes.len(), "report rendered");
        Ok(RenderedReport {
            product_id: product.id,
            bytes,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::sync::{Arc, Mutex};

    use chrono::Utc;

    use super::*;
    use crate::workflows::intake::domain::{Product, ProductDraft};
    use crate::workflows::intake::repository::ProductFilter;

    #[derive(Default)]
    struct MemoryRepository {
        records: Mutex<HashMap<ProductId, Product>>,
    }

    impl ProductRepository for MemoryRepository {
        fn insert(&self, product: Product) -> Result<Product, RepositoryError> {
            let mut guard = self.records.lock().expect("repository mutex poisoned");
            guard.insert(product.id.clone(), product.clone());
            Ok(product)
        }

        fn update(&self, product: Product) -> Result<Product, RepositoryError> {
            let mut guard = self.records.lock().expect("repository mutex poisoned");
            guard.insert(product.id.clone(), product.clone());
            Ok(product)
        }

        fn fetch(&self, id: &ProductId) -> Result<Option<Product>, RepositoryError> {
            let guard = self.records.lock().expect("repository mutex poisoned");
            Ok(guard.get(id).cloned())
        }

        fn list(&self, _filter: &ProductFilter) -> Result<Vec<Product>, RepositoryError> {
            let guard = self.records.lock().expect("repository mutex poisoned");
            Ok(guard.values().cloned().collect())
        }
    }

    #[derive(Default)]
    struct CountingRenderer {
        calls: Mutex<u32>,
        fail: bool,
    }

    impl CountingRenderer {
        fn failing() -> Self {
            Self {
                calls: Mutex::new(0),
                fail: true,
            }
        }

        fn calls(&self) -> u32 {
            *self.calls.lock().expect("renderer mutex poisoned")
        }
    }

    impl ReportRenderer for CountingRenderer {
        fn render(&self, context: &ReportContext<'_>) -> Result<Vec<u8>, DependencyError> {
            *self.calls.lock().expect("renderer mutex poisoned") += 1;
            if self.fail {
                return Err(DependencyError::Unreachable("renderer offline".to_string()));
            }
            Ok(format!("report for {}", context.product_id).into_bytes())
        }
    }

    fn stored_product(repository: &MemoryRepository) -> Product {
        let now = Utc::now();
        let product = Product {
            id: ProductId("prd-900001".to_string()),
            submission: ProductDraft {
                name: "Granola Bar".to_string(),
                category: "Food & Beverage".to_string(),
                description: "Honey oat bar baked in small batches.".to_string(),
                disclosure: Default::default(),
            },
            answers: Vec::new(),
            transparency_score: Some(64),
            created_at: now,
            updated_at: now,
        };
        repository.insert(product.clone()).expect("insert succeeds");
        product
    }

    #[test]
    fn dispatch_renders_stored_products() {
        let repository = Arc::new(MemoryRepository::default());
        let renderer = Arc::new(CountingRenderer::default());
        let product = stored_product(&repository);

        let dispatcher = ReportDispatcher::new(repository, renderer.clone());
        let report = dispatcher.dispatch(&product.id).expect("report renders");

        assert_eq!(report.product_id, product.id);
        assert_eq!(report.bytes, b"report for prd-900001".to_vec());
        assert_eq!(renderer.calls(), 1);
    }

    #[test]
    fn missing_product_never_reaches_the_renderer() {
        let repository = Arc::new(MemoryRepository::default());
        let renderer = Arc::new(CountingRenderer::default());
        let dispatcher = ReportDispatcher::new(repository, renderer.clone());

        match dispatcher.dispatch(&ProductId("prd-000000".to_string())) {
            Err(ReportError::ProductNotFound) => {}
            other => panic!("expected not-found error, got {other:?}"),
        }
        assert_eq!(renderer.calls(), 0);
    }

    #[test]
    fn renderer_failure_surfaces_without_side_effects() {
        let repository = Arc::new(MemoryRepository::default());
        let renderer = Arc::new(CountingRenderer::failing());
        let product = stored_product(&repository);

        let dispatcher = ReportDispatcher::new(repository.clone(), renderer);
        match dispatcher.dispatch(&product.id) {
            Err(ReportError::Renderer(_)) => {}
            other => panic!("expected renderer error, got {other:?}"),
        }

        let stored = repository
            .fetch(&product.id)
            .expect("fetch succeeds")
            .expect("record present");
        assert_eq!(stored, product);
    }
}
