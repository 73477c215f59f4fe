use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

use photocull_core::index;

fn unique_root(label: &str) -> PathBuf {
    let unique = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    std::env::temp_dir().join(format!("photocull-{label}-{unique}"))
}

#[test]
fn classifies_candidates_sorted_and_duplicates() {
    let root = unique_root("classify");
    let output = root.join("_sorted");
    std::fs::create_dir_all(root.join("a")).unwrap();
    std::fs::create_dir_all(root.join("b")).unwrap();
    std::fs::create_dir_all(&output).unwrap();
    std::fs::write(root.join("a").join("1.NEF"), b"aa").unwrap();
    std::fs::write(root.join("b").join("1.NEF"), b"bb").unwrap();
    std::fs::write(output.join("2.NEF"), b"cc").unwrap();

    let index = index::build(&root, &output, ".NEF").unwrap();

    let names: Vec<&str> = index
        .records()
        .iter()
        .map(|record| record.name.as_str())
        .collect();
    assert_eq!(names, vec!["1.NEF", "1.NEF"]);

    let separator = std::path::MAIN_SEPARATOR;
    let first = index.records()[0].path.to_string_lossy().into_owned();
    let second = index.records()[1].path.to_string_lossy().into_owned();
    assert!(
        first.ends_with(&format!("a{separator}1.NEF")),
        "walk order should visit a/ first: {first}"
    );
    assert!(
        second.ends_with(&format!("b{separator}1.NEF")),
        "walk order should visit b/ second: {second}"
    );

    assert_eq!(index.candidate_count(), 2);
    assert_eq!(index.sorted_count(), 1);
    assert!(index.is_sorted("2.NEF"));
    assert!(index.has_duplicate_names());

    std::fs::remove_dir_all(&root).unwrap();
}

#[test]
fn never_indexes_records_from_the_output_directory() {
    let root = unique_root("output-excluded");
    let output = root.join("_sorted");
    std::fs::create_dir_all(&output).unwrap();
    std::fs::write(root.join("keep.NEF"), b"k").unwrap();
    std::fs::write(output.join("done.NEF"), b"d").unwrap();

    let index = index::build(&root, &output, ".NEF").unwrap();

    assert!(index
        .records()
        .iter()
        .all(|record| record.path.parent() != Some(output.canonicalize().unwrap().as_path())));
    assert!(index.contains_candidate("keep.NEF"));
    assert!(!index.contains_candidate("done.NEF"));
    assert!(index.is_sorted("done.NEF"));

    std::fs::remove_dir_all(&root).unwrap();
}

#[test]
fn creates_the_output_directory_when_missing() {
    let root = unique_root("mkoutput");
    std::fs::create_dir_all(&root).unwrap();
    std::fs::write(root.join("shot.NEF"), b"s").unwrap();
    let output = root.join("_sorted");
    assert!(!output.exists());

    let index = index::build(&root, &output, ".NEF").unwrap();

    assert!(output.is_dir());
    assert_eq!(index.candidate_count(), 1);
    assert_eq!(index.sorted_count(), 0);

    std::fs::remove_dir_all(&root).unwrap();
}

#[test]
fn missing_input_directory_is_path_not_found() {
    let root = unique_root("missing-input");
    let error = index::build(&root.join("nowhere"), &root.join("_sorted"), ".NEF").unwrap_err();
    assert!(matches!(error, index::IndexError::PathNotFound(_)));
}

#[test]
fn extension_matching_is_substring_and_case_insensitive() {
    let root = unique_root("substring");
    let output = root.join("_sorted");
    std::fs::create_dir_all(&root).unwrap();
    std::fs::write(root.join("lower.nef"), b"l").unwrap();
    std::fs::write(root.join("archive.NEF.bak"), b"b").unwrap();
    std::fs::write(root.join("note.txt"), b"t").unwrap();

    let index = index::build(&root, &output, ".NEF").unwrap();

    assert!(index.contains_candidate("lower.nef"));
    assert!(index.contains_candidate("archive.NEF.bak"));
    assert!(!index.contains_candidate("note.txt"));
    assert_eq!(index.candidate_count(), 2);

    std::fs::remove_dir_all(&root).unwrap();
}

#[test]
fn empty_tree_builds_an_empty_index() {
    let root = unique_root("empty");
    std::fs::create_dir_all(&root).unwrap();

    let index = index::build(&root, &root.join("_sorted"), ".NEF").unwrap();

    assert!(index.is_empty());
    assert!(!index.has_duplicate_names());
    assert_eq!(index.last_sorted_name(), None);

    std::fs::remove_dir_all(&root).unwrap();
}

#[test]
fn suffix_lookup_returns_the_first_walked_record() {
    let root = unique_root("suffix");
    let output = root.join("_sorted");
    std::fs::create_dir_all(root.join("a")).unwrap();
    std::fs::create_dir_all(root.join("b")).unwrap();
    std::fs::write(root.join("a").join("1.NEF"), b"aa").unwrap();
    std::fs::write(root.join("b").join("1.NEF"), b"bb").unwrap();

    let index = index::build(&root, &output, ".NEF").unwrap();

    let (position, record) = index.find_by_suffix("1.nef").unwrap();
    assert_eq!(position, 0);
    let separator = std::path::MAIN_SEPARATOR;
    assert!(record
        .path
        .to_string_lossy()
        .ends_with(&format!("a{separator}1.NEF")));
    assert!(index.find_by_suffix("other.NEF").is_none());

    std::fs::remove_dir_all(&root).unwrap();
}

#[test]
fn marking_sorted_grows_the_set_and_reports_the_last_name() {
    let root = unique_root("mark");
    let output = root.join("_sorted");
    std::fs::create_dir_all(&root).unwrap();
    std::fs::write(root.join("1.NEF"), b"a").unwrap();

    let mut index = index::build(&root, &output, ".NEF").unwrap();
    assert!(!index.is_sorted("1.NEF"));

    assert_eq!(index.mark_sorted("1.NEF"), 1);
    assert_eq!(index.mark_sorted("1.NEF"), 1);
    assert!(index.is_sorted("1.NEF"));
    assert_eq!(index.mark_sorted("3.NEF"), 2);
    assert_eq!(index.last_sorted_name(), Some("3.NEF"));

    std::fs::remove_dir_all(&root).unwrap();
}
