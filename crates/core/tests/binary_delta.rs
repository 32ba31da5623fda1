use std::fs;

use obfview_core::metrics::binary::{binary_paths, file_size};
use obfview_core::metrics::BinarySizeDelta;
use tempfile::tempdir;

#[test]
fn delta_from_sizes_formats_growth() {
    let delta = BinarySizeDelta::from_sizes(Some(1000), Some(1250));
    assert_eq!(delta.original_size, "1000 B");
    assert_eq!(delta.obfuscated_size, "1.22 KB");
    assert_eq!(delta.change_pct, "+25.00%");
}

#[test]
fn zero_original_size_gives_na_change() {
    let delta = BinarySizeDelta::from_sizes(Some(0), Some(4096));
    assert_eq!(delta.original_size, "0 B");
    assert_eq!(delta.obfuscated_size, "4.00 KB");
    assert_eq!(delta.change_pct, "N/A");
}

#[test]
fn measure_reports_na_when_an_artifact_is_missing() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("test_a_original"), vec![0u8; 100]).unwrap();

    let delta = BinarySizeDelta::measure(dir.path(), "test_a", "full");
    assert_eq!(delta.original_size, "100 B");
    assert_eq!(delta.obfuscated_size, "N/A");
    assert_eq!(delta.change_pct, "N/A");

    let delta = BinarySizeDelta::measure(dir.path(), "test_b", "full");
    assert_eq!(delta.change_pct, "N/A");
}

#[test]
fn binary_paths_follow_naming_convention() {
    let dir = tempdir().unwrap();
    let (orig, obf) = binary_paths(dir.path(), "test_a", "string");
    assert!(orig.ends_with("test_a_original"));
    assert!(obf.ends_with("test_a_string"));
}

#[test]
fn file_size_ignores_directories() {
    let dir = tempdir().unwrap();
    fs::create_dir_all(dir.path().join("test_a_original")).unwrap();
    assert_eq!(file_size(&dir.path().join("test_a_original")), None);
}
