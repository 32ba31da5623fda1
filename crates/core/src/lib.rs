//! obfview-core
//!
//! Core library for building before/after CFG comparison viewers from the
//! artifacts an obfuscation test suite leaves behind.
//!
//! This crate discovers which rendered images belong to which test and
//! function, aggregates per-test metrics from structured reports or build
//! logs, computes binary size deltas, and renders the viewer page.
//!
//! All substantive logic lives here so it is fully testable and reusable from
//! multiple frontends; the `obfview` CLI is a thin wrapper.

pub mod config;
pub mod correlate;
pub mod dataset;
pub mod format;
pub mod identity;
pub mod layout;
pub mod metrics;
pub mod page;
pub mod viewer;

pub use config::{load_viewer_config, MetricsSourceKind, ViewerConfig};
pub use dataset::{build_dataset, Dataset, DatasetSummary};
pub use identity::MatchPolicy;
pub use layout::ResultsLayout;
pub use viewer::{generate_viewer, GeneratedViewer};

/// Returns the library version as encoded at compile time.
///
/// Useful for tests and for frontends to report consistent version info.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
