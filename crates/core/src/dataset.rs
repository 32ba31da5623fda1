use log::info;
use serde::{Deserialize, Serialize};

use crate::config::ViewerConfig;
use crate::correlate::{correlate_visualizations, function_count, CorrelationMap};
use crate::identity::{discover_identities, IdentityResolver};
use crate::layout::ResultsLayout;
use crate::metrics::{aggregate_metrics, MetricsMap, MetricsSource};

/// Everything the viewer page embeds.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Dataset {
    pub tests: CorrelationMap,
    pub metrics: MetricsMap,
}

/// Counts reported at the end of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatasetSummary {
    pub tests: usize,
    pub functions: usize,
    pub metrics_records: usize,
}

impl Dataset {
    pub fn summary(&self) -> DatasetSummary {
        DatasetSummary {
            tests: self.tests.len(),
            functions: function_count(&self.tests),
            metrics_records: self.metrics.values().filter(|m| !m.is_empty()).count(),
        }
    }

    /// Identities with at least one correlated function, ascending.
    pub fn test_names(&self) -> Vec<&str> {
        self.tests.keys().map(String::as_str).collect()
    }
}

/// Build the dataset from whatever is on disk under `layout`.
///
/// Missing directories and malformed metrics never fail the build; they just
/// contribute nothing.
pub fn build_dataset(layout: &ResultsLayout, config: &ViewerConfig) -> Dataset {
    let identities =
        discover_identities(&layout.tests_dir, &config.test_prefix, &config.test_extension);
    info!("Found {} known test identities in {}", identities.len(), layout.tests_dir.display());

    let resolver =
        IdentityResolver::new(identities, config.match_policy, config.default_function.as_str());

    let tests = correlate_visualizations(
        layout,
        &resolver,
        &config.image_extension,
        &config.render_suffixes,
    );

    let source = MetricsSource::detect(layout, config);
    let metrics = aggregate_metrics(source.as_ref(), resolver.identities(), layout);

    Dataset { tests, metrics }
}
