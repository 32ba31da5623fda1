use std::fs;

use obfview::{canonicalize_or_current, log_filter_for};
use tempfile::tempdir;

#[test]
fn canonicalize_or_current_returns_cwd_for_dot() {
    let original = std::env::current_dir().expect("cwd");
    let tmp = tempdir().expect("tempdir");
    std::env::set_current_dir(tmp.path()).expect("chdir tmp");

    let result = canonicalize_or_current(".").expect("canonicalize").canonicalize().expect("canon");
    let expected = tmp.path().canonicalize().expect("canon tmp");
    assert_eq!(result, expected);

    std::env::set_current_dir(original).expect("restore cwd");
}

#[test]
fn canonicalize_or_current_keeps_missing_paths_absolute() {
    let tmp = tempdir().expect("tempdir");
    let missing = tmp.path().join("not-yet").join("index.html");
    let result = canonicalize_or_current(missing.to_str().unwrap()).expect("resolve");
    assert!(result.is_absolute());
    assert!(result.ends_with("not-yet/index.html"));
}

#[test]
fn canonicalize_or_current_resolves_existing_path() {
    let tmp = tempdir().expect("tempdir");
    let subdir = tmp.path().join("nested");
    fs::create_dir_all(&subdir).expect("create nested");
    let result = canonicalize_or_current(subdir.to_str().unwrap()).expect("canonicalize nested");
    assert_eq!(result, subdir.canonicalize().expect("canonicalize subdir"));
}

#[test]
fn verbosity_maps_to_log_filter() {
    assert_eq!(log_filter_for(0), "warn");
    assert_eq!(log_filter_for(1), "info");
    assert_eq!(log_filter_for(2), "debug");
    assert_eq!(log_filter_for(9), "debug");
}
