use std::fs;
use std::path::Path;

use obfview_core::metrics::BINARY_METRICS_KEY;
use obfview_core::{build_dataset, generate_viewer, MetricsSourceKind, ResultsLayout, ViewerConfig};
use serde_json::json;
use tempfile::tempdir;

fn write(path: &Path, contents: &[u8]) {
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, contents).unwrap();
}

/// A small results tree with two tests, reports for one of them, and a
/// stray render that belongs to no test.
fn seed_suite(base: &Path) -> ResultsLayout {
    let layout = ResultsLayout::new(base.join("test_results"), base.join("tests"));
    for name in ["test_loops.c", "test_strings.c"] {
        write(&layout.tests_dir.join(name), b"int main(void) { return 0; }\n");
    }
    for name in ["test_loops.dot.png", "test_loops_sum.dot.png", "test_strings_greet.dot.png"] {
        write(&layout.original_dir.join(name), b"png");
        write(&layout.obfuscated_dir.join(name), b"png");
    }
    write(&layout.original_dir.join("test_strings_orphan.dot.png"), b"png");
    write(&layout.original_dir.join("unrelated.dot.png"), b"png");
    write(&layout.obfuscated_dir.join("unrelated.dot.png"), b"png");

    write(
        &layout.reports_dir.join("test_loops_full.json"),
        json!({"obfuscationMetrics": {"controlFlowFlattening": {"flattenedFunctions": 2}}})
            .to_string()
            .as_bytes(),
    );
    write(&layout.binaries_dir.join("test_loops_original"), &[0u8; 1000]);
    write(&layout.binaries_dir.join("test_loops_full"), &[0u8; 1250]);
    layout
}

#[test]
fn build_dataset_correlates_and_aggregates() {
    let dir = tempdir().unwrap();
    let layout = seed_suite(dir.path());
    let dataset = build_dataset(&layout, &ViewerConfig::default());

    assert_eq!(dataset.test_names(), vec!["test_loops", "test_strings"]);
    assert_eq!(
        dataset.tests["test_loops"]["main"].original,
        "visualizations/original/test_loops.dot.png"
    );
    assert!(dataset.tests["test_loops"].contains_key("sum"));
    assert!(dataset.tests["test_strings"].contains_key("greet"));
    assert!(!dataset.tests["test_strings"].contains_key("orphan"));

    let summary = dataset.summary();
    assert_eq!(summary.tests, 2);
    assert_eq!(summary.functions, 3);
    assert_eq!(summary.metrics_records, 1);

    assert_eq!(dataset.metrics["test_loops"][BINARY_METRICS_KEY]["change_pct"], json!("+25.00%"));
    assert!(dataset.metrics["test_strings"].is_empty());
}

#[test]
fn auto_source_falls_back_to_logs_when_reports_are_absent() {
    let dir = tempdir().unwrap();
    let layout = seed_suite(dir.path());
    fs::remove_dir_all(&layout.reports_dir).unwrap();
    write(&layout.logs_dir.join("test_strings.log"), b"CFF_METRICS: {\"encryptedStrings\": 4}\n");

    let dataset = build_dataset(&layout, &ViewerConfig::default());
    assert_eq!(dataset.metrics["test_strings"]["encryptedStrings"], json!(4));
    assert!(dataset.metrics["test_loops"].is_empty());
}

#[test]
fn metrics_source_none_skips_aggregation() {
    let dir = tempdir().unwrap();
    let layout = seed_suite(dir.path());
    let config = ViewerConfig { metrics_source: MetricsSourceKind::None, ..Default::default() };
    let dataset = build_dataset(&layout, &config);
    assert!(dataset.metrics.is_empty());
    assert_eq!(dataset.summary().tests, 2);
}

#[test]
fn empty_results_tree_is_not_an_error() {
    let dir = tempdir().unwrap();
    let layout = ResultsLayout::new(dir.path().join("nothing"), dir.path().join("no_tests"));
    let generated = generate_viewer(&layout, &ViewerConfig::default()).unwrap();
    assert_eq!(generated.summary.tests, 0);
    assert_eq!(generated.summary.functions, 0);
    assert!(layout.page_path.is_file());
}

#[test]
fn rebuilding_unchanged_inputs_is_identical() {
    let dir = tempdir().unwrap();
    let layout = seed_suite(dir.path());
    let config = ViewerConfig::default();

    assert_eq!(build_dataset(&layout, &config), build_dataset(&layout, &config));

    generate_viewer(&layout, &config).unwrap();
    let first = fs::read(&layout.page_path).unwrap();
    generate_viewer(&layout, &config).unwrap();
    let second = fs::read(&layout.page_path).unwrap();
    assert_eq!(first, second);
}
