use std::fs;
use std::path::Path;

use predicates::str::contains;
use tempfile::tempdir;

fn write(path: &Path, contents: &str) {
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, contents).unwrap();
}

/// Two tests, three complete pairs, one orphan render, and a report.
fn seed_suite(root: &Path) {
    for name in ["test_loops.c", "test_strings.c"] {
        write(&root.join("tests").join(name), "int main(void) { return 0; }\n");
    }
    let viz = root.join("test_results").join("visualizations");
    for name in ["test_loops.dot.png", "test_loops_sum.dot.png", "test_strings_greet.dot.png"] {
        write(&viz.join("original").join(name), "png");
        write(&viz.join("obfuscated").join(name), "png");
    }
    write(&viz.join("original").join("test_strings_orphan.dot.png"), "png");
    write(
        &root.join("test_results").join("reports").join("test_loops_cff.json"),
        r#"{"obfuscationMetrics": {"passesRun": ["ControlFlowFlattening"]}}"#,
    );
}

/// Running with no arguments should default to `generate` in the current
/// directory and succeed even with nothing to show.
#[test]
fn default_command_generates_empty_viewer() {
    let dir = tempdir().expect("tempdir");

    assert_cmd::cargo::cargo_bin_cmd!("obfview")
        .current_dir(dir.path())
        .assert()
        .success()
        .stdout(contains("Found 0 tests with 0 functions"));

    let page = dir.path().join("test_results/visualizations/comparison/index.html");
    assert!(page.is_file(), "viewer page should exist at {}", page.display());
}

#[test]
fn generate_reports_test_and_function_counts() {
    let dir = tempdir().expect("tempdir");
    seed_suite(dir.path());

    assert_cmd::cargo::cargo_bin_cmd!("obfview")
        .current_dir(dir.path())
        .arg("generate")
        .assert()
        .success()
        .stdout(contains("Created comparison viewer at"))
        .stdout(contains("Found 2 tests with 3 functions"));

    let html =
        fs::read_to_string(dir.path().join("test_results/visualizations/comparison/index.html"))
            .expect("read page");
    assert!(html.contains("ControlFlowFlattening"));
    assert!(!html.contains("orphan"));
}

#[test]
fn dataset_command_prints_json() {
    let dir = tempdir().expect("tempdir");
    seed_suite(dir.path());

    let output = assert_cmd::cargo::cargo_bin_cmd!("obfview")
        .current_dir(dir.path())
        .arg("dataset")
        .arg("--compact")
        .output()
        .expect("run dataset");
    assert!(output.status.success());

    let parsed: serde_json::Value = serde_json::from_slice(&output.stdout).expect("json");
    assert_eq!(
        parsed["tests"]["test_loops"]["sum"]["obfuscated"],
        "visualizations/obfuscated/test_loops_sum.dot.png"
    );
    assert_eq!(parsed["metrics"]["test_loops"]["binary_metrics"]["change_pct"], "N/A");
    assert_eq!(parsed["metrics"]["test_strings"], serde_json::json!({}));
}

#[test]
fn dataset_command_is_pretty_unless_compact() {
    let dir = tempdir().expect("tempdir");
    seed_suite(dir.path());

    let pretty = assert_cmd::cargo::cargo_bin_cmd!("obfview")
        .current_dir(dir.path())
        .arg("dataset")
        .output()
        .expect("run dataset");
    assert!(pretty.status.success());
    assert!(String::from_utf8_lossy(&pretty.stdout).trim_end().lines().count() > 1);

    let compact = assert_cmd::cargo::cargo_bin_cmd!("obfview")
        .current_dir(dir.path())
        .args(["dataset", "--compact"])
        .output()
        .expect("run dataset");
    assert!(compact.status.success());
    assert_eq!(String::from_utf8_lossy(&compact.stdout).trim_end().lines().count(), 1);
}

#[test]
fn match_policy_flag_changes_attribution() {
    let dir = tempdir().expect("tempdir");
    for name in ["test_foo.c", "test_foo_bar.c"] {
        write(&dir.path().join("tests").join(name), "int main(void) { return 0; }\n");
    }
    let viz = dir.path().join("test_results").join("visualizations");
    write(&viz.join("original").join("test_foo_bar_x.png"), "png");
    write(&viz.join("obfuscated").join("test_foo_bar_x.png"), "png");

    assert_cmd::cargo::cargo_bin_cmd!("obfview")
        .current_dir(dir.path())
        .args(["dataset", "--compact"])
        .assert()
        .success()
        .stdout(contains(r#""test_foo":{"bar_x""#));

    assert_cmd::cargo::cargo_bin_cmd!("obfview")
        .current_dir(dir.path())
        .args(["dataset", "--compact", "--match-policy", "longest-prefix"])
        .assert()
        .success()
        .stdout(contains(r#""test_foo_bar":{"x""#));
}

#[test]
fn invalid_metrics_source_is_rejected() {
    assert_cmd::cargo::cargo_bin_cmd!("obfview")
        .args(["generate", "--metrics-source", "database"])
        .assert()
        .failure();
}

#[test]
fn identities_lists_known_tests() {
    let dir = tempdir().expect("tempdir");
    seed_suite(dir.path());

    assert_cmd::cargo::cargo_bin_cmd!("obfview")
        .current_dir(dir.path())
        .arg("identities")
        .assert()
        .success()
        .stdout(contains("Test identities (2):"))
        .stdout(contains("- test_loops"));
}
