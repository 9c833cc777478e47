mod common;

use std::path::{Path, PathBuf};

use common::test_context;
use probe_fs::ops::{GlobLimits, GlobRequest};
use probe_fs::Error;

/// Builds:
/// ```text
/// <root>/a.txt
/// <root>/b.log
/// <root>/sub/c.txt
/// <root>/sub/deeper/d.txt
/// ```
fn build_tree(root: &Path) {
    std::fs::write(root.join("a.txt"), b"a").expect("write a");
    std::fs::write(root.join("b.log"), b"b").expect("write b");
    std::fs::create_dir_all(root.join("sub/deeper")).expect("mkdir");
    std::fs::write(root.join("sub/c.txt"), b"c").expect("write c");
    std::fs::write(root.join("sub/deeper/d.txt"), b"d").expect("write d");
}

fn resolve(pattern: String, limits: GlobLimits) -> Vec<String> {
    test_context()
        .resolve_file_pattern(GlobRequest { pattern, limits })
        .expect("resolve")
        .matches
}

fn contains_file(matches: &[String], name: &str) -> bool {
    matches
        .iter()
        .any(|found| found.ends_with(name) && !found.ends_with('/'))
}

#[test]
fn single_star_matches_files_and_folders() {
    let dir = tempfile::tempdir().expect("tempdir");
    build_tree(dir.path());

    let matches = resolve(
        format!("{}/*", dir.path().display()),
        GlobLimits::ALL,
    );

    assert!(contains_file(&matches, "a.txt"));
    assert!(contains_file(&matches, "b.log"));
    assert!(matches.iter().any(|found| found.ends_with("sub/")));
}

#[test]
fn files_limit_never_returns_trailing_separators() {
    let dir = tempfile::tempdir().expect("tempdir");
    build_tree(dir.path());

    let matches = resolve(format!("{}/**", dir.path().display()), GlobLimits::FILES);

    assert!(!matches.is_empty());
    assert!(matches.iter().all(|found| !found.ends_with('/')));
}

#[test]
fn folders_limit_returns_only_trailing_separators() {
    let dir = tempfile::tempdir().expect("tempdir");
    build_tree(dir.path());

    let matches = resolve(format!("{}/**", dir.path().display()), GlobLimits::FOLDERS);

    assert!(!matches.is_empty());
    assert!(matches.iter().all(|found| found.ends_with('/')));
}

#[test]
fn recursive_expansion_cap_is_a_stable_contract() {
    // Callers size traversal expectations around this exact value; changing
    // it is a breaking change, not a tuning knob.
    assert_eq!(probe_fs::MAX_RECURSIVE_GLOBS, 64);
}

#[test]
fn wildcards_do_not_match_dotfiles() {
    let dir = tempfile::tempdir().expect("tempdir");
    std::fs::write(dir.path().join("visible.txt"), b"v").expect("write");
    std::fs::write(dir.path().join(".hidden"), b"h").expect("write");

    let matches = resolve(format!("{}/*", dir.path().display()), GlobLimits::ALL);
    assert!(contains_file(&matches, "visible.txt"));
    assert!(!contains_file(&matches, ".hidden"));
}

#[test]
fn sql_percent_wildcard_is_translated() {
    let dir = tempfile::tempdir().expect("tempdir");
    build_tree(dir.path());

    let matches = resolve(format!("{}/%.txt", dir.path().display()), GlobLimits::ALL);

    assert!(contains_file(&matches, "a.txt"));
    assert!(!contains_file(&matches, "b.log"));
}

#[test]
fn double_star_descends_to_any_depth() {
    let dir = tempfile::tempdir().expect("tempdir");
    build_tree(dir.path());

    let matches = resolve(format!("{}/**", dir.path().display()), GlobLimits::FILES);

    assert!(contains_file(&matches, "a.txt"));
    assert!(contains_file(&matches, "c.txt"));
    assert!(contains_file(&matches, "d.txt"));
}

#[test]
fn list_files_distinguishes_recursive_from_flat() {
    let dir = tempfile::tempdir().expect("tempdir");
    build_tree(dir.path());
    let ctx = test_context();

    let flat = ctx
        .list_files_in_directory(dir.path(), false)
        .expect("flat");
    assert!(contains_file(&flat, "a.txt"));
    assert!(!contains_file(&flat, "d.txt"));

    let recursive = ctx
        .list_files_in_directory(dir.path(), true)
        .expect("recursive");
    assert!(contains_file(&recursive, "a.txt"));
    assert!(contains_file(&recursive, "d.txt"));
}

#[test]
fn list_directories_returns_only_folders() {
    let dir = tempfile::tempdir().expect("tempdir");
    build_tree(dir.path());
    let ctx = test_context();

    let folders = ctx
        .list_directories_in_directory(dir.path(), true)
        .expect("folders");
    assert!(!folders.is_empty());
    assert!(folders.iter().all(|found| found.ends_with('/')));
    assert!(folders.iter().any(|found| found.ends_with("deeper/")));
}

#[test]
fn listing_a_missing_directory_is_a_definitive_failure() {
    let dir = tempfile::tempdir().expect("tempdir");
    let missing = dir.path().join("nope");
    let ctx = test_context();

    let err = ctx
        .list_files_in_directory(&missing, false)
        .expect_err("should reject");
    match err {
        Error::DirectoryNotFound(path) => assert_eq!(path, missing),
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn listing_a_file_as_directory_is_a_definitive_failure() {
    let dir = tempfile::tempdir().expect("tempdir");
    build_tree(dir.path());
    let file = dir.path().join("a.txt");
    let ctx = test_context();

    let err = ctx
        .list_files_in_directory(&file, false)
        .expect_err("should reject");
    match err {
        Error::NotADirectory(path) => assert_eq!(path, file),
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
#[cfg(unix)]
fn recursive_expansion_terminates_on_symlink_cycles() {
    use std::os::unix::fs::symlink;

    let dir = tempfile::tempdir().expect("tempdir");
    build_tree(dir.path());
    symlink(dir.path().join("sub"), dir.path().join("sub/loop")).expect("symlink");

    // A cycle back to an ancestor must hit the iteration cap, not hang.
    let matches = resolve(format!("{}/**", dir.path().display()), GlobLimits::ALL);
    assert!(!matches.is_empty());
}

#[test]
#[cfg(unix)]
fn canonicalization_resolves_symlinked_prefixes() {
    use std::os::unix::fs::symlink;

    let dir = tempfile::tempdir().expect("tempdir");
    build_tree(dir.path());
    symlink(dir.path().join("sub"), dir.path().join("link")).expect("symlink");

    let canonical_sub = std::fs::canonicalize(dir.path().join("sub")).expect("canonicalize");

    let matches = resolve(format!("{}/link/*", dir.path().display()), GlobLimits::ALL);
    assert!(!matches.is_empty());
    assert!(matches
        .iter()
        .all(|found| PathBuf::from(found).starts_with(&canonical_sub)));
}

#[test]
#[cfg(unix)]
fn no_canonicalize_keeps_the_requested_prefix() {
    use std::os::unix::fs::symlink;

    let dir = tempfile::tempdir().expect("tempdir");
    build_tree(dir.path());
    symlink(dir.path().join("sub"), dir.path().join("link")).expect("symlink");

    let link_prefix = dir.path().join("link");
    let matches = resolve(
        format!("{}/link/*", dir.path().display()),
        GlobLimits::ALL | GlobLimits::NO_CANONICALIZE,
    );
    assert!(!matches.is_empty());
    assert!(matches
        .iter()
        .all(|found| PathBuf::from(found).starts_with(&link_prefix)));
}
