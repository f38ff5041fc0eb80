//! Polypath filter pipeline and registry

use crate::error::{CamToolError, CamToolResult};
use flexcut_core::Polyline;
use std::collections::HashMap;
use std::sync::Arc;

/// Trait for polypath filters
///
/// A filter rewrites the list of polylines a job is made of before it is
/// turned into device motion. Filters are applied in a pipeline.
///
/// Filters are total: they never fail, and fall back to returning their
/// input when they cannot do better.
pub trait PolypathFilter: Send + Sync {
    /// Get the name/identifier of this filter
    fn name(&self) -> &str;

    /// Get a description of what this filter does
    fn description(&self) -> &str;

    /// Transform a polypath.
    ///
    /// The result may contain more or fewer polylines than the input.
    fn apply_to_polypath(&self, polypath: &[Polyline]) -> Vec<Polyline>;

    /// Check if this filter is enabled.
    ///
    /// Only the pipeline consults this; calling `apply_to_polypath` directly
    /// always applies the filter.
    fn is_enabled(&self) -> bool {
        true
    }
}

/// Arc-wrapped filter for thread-safe sharing
pub type FilterHandle = Arc<dyn PolypathFilter>;

/// Polypath filter pipeline
///
/// Manages a sequence of filters applied in registration order.
///
/// # Example
/// ```
/// use std::sync::Arc;
/// use flexcut_camtools::{FilterPipeline, PerforationConfig, PerforationFilter};
/// use flexcut_core::Polyline;
///
/// let mut pipeline = FilterPipeline::new();
/// pipeline.register(Arc::new(PerforationFilter::new(PerforationConfig::default())));
///
/// let input = vec![Polyline::from(vec![(0.0, 0.0), (100.0, 0.0)])];
/// let output = pipeline.apply(&input);
/// assert!(output.len() > 1);
/// ```
#[derive(Default)]
pub struct FilterPipeline {
    filters: Vec<FilterHandle>,
}

impl FilterPipeline {
    /// Create a new empty pipeline
    pub fn new() -> Self {
        Self {
            filters: Vec::new(),
        }
    }

    /// Register a filter in the pipeline
    ///
    /// Filters are applied in the order they are registered.
    pub fn register(&mut self, filter: FilterHandle) -> &mut Self {
        self.filters.push(filter);
        self
    }

    /// Get the number of registered filters
    pub fn filter_count(&self) -> usize {
        self.filters.len()
    }

    /// Get a reference to a filter by name
    pub fn get_filter_by_name(&self, name: &str) -> Option<&FilterHandle> {
        self.filters.iter().find(|f| f.name() == name)
    }

    /// List all registered filters as (name, description, enabled)
    pub fn list_filters(&self) -> Vec<(&str, &str, bool)> {
        self.filters
            .iter()
            .map(|f| (f.name(), f.description(), f.is_enabled()))
            .collect()
    }

    /// Run a polypath through every enabled filter
    pub fn apply(&self, polypath: &[Polyline]) -> Vec<Polyline> {
        let mut current = polypath.to_vec();

        for filter in &self.filters {
            if !filter.is_enabled() {
                tracing::debug!("Skipping disabled filter '{}'", filter.name());
                continue;
            }

            let before = current.len();
            current = filter.apply_to_polypath(&current);
            tracing::debug!(
                "Filter '{}': {} -> {} polylines",
                filter.name(),
                before,
                current.len()
            );
        }

        current
    }
}

/// Filter registry
///
/// Maps filter names to factories and builds pipelines from name lists.
#[derive(Default)]
pub struct FilterRegistry {
    factories: HashMap<String, Arc<dyn Fn() -> FilterHandle + Send + Sync>>,
}

impl FilterRegistry {
    /// Create a new filter registry
    pub fn new() -> Self {
        Self {
            factories: HashMap::new(),
        }
    }

    /// Register a filter factory
    pub fn register<F>(&mut self, name: impl Into<String>, factory: F) -> &mut Self
    where
        F: Fn() -> FilterHandle + Send + Sync + 'static,
    {
        self.factories.insert(name.into(), Arc::new(factory));
        self
    }

    /// Create a filter by name
    pub fn create(&self, name: &str) -> Option<FilterHandle> {
        self.factories.get(name).map(|f| f())
    }

    /// Create a pipeline with the specified filter names, in order
    pub fn create_pipeline(&self, names: &[&str]) -> CamToolResult<FilterPipeline> {
        let mut pipeline = FilterPipeline::new();

        for name in names {
            let filter = self
                .create(name)
                .ok_or_else(|| CamToolError::UnknownFilter(name.to_string()))?;
            pipeline.register(filter);
        }

        Ok(pipeline)
    }
}
