use std::collections::HashSet;
use std::path::PathBuf;

use photocull_core::index::FileIndex;
use photocull_core::model::{format_title, FileRecord};
use photocull_core::resolver::{resolve, Resolution};
use photocull_core::windows::MockWindowQuery;

fn sample_index() -> FileIndex {
    FileIndex::from_parts(
        vec![
            FileRecord::new(PathBuf::from("/photos/a/DSC_0042.NEF"), "DSC_0042.NEF"),
            FileRecord::new(PathBuf::from("/photos/b/DSC_0042.NEF"), "DSC_0042.NEF"),
            FileRecord::new(PathBuf::from("/photos/a/DSC_0099.NEF"), "DSC_0099.NEF"),
        ],
        HashSet::new(),
        PathBuf::from("/photos/_sorted"),
    )
}

#[test]
fn formatting_reduces_a_viewer_title_to_the_filename() {
    assert_eq!(
        format_title("DSC_0042.NEF - ACDSee Viewer", ".NEF").as_deref(),
        Some("DSC_0042.NEF")
    );
}

#[test]
fn formatting_truncates_at_the_first_extension_occurrence() {
    assert_eq!(
        format_title("C:\\Photos\\output.NEF\\backup - Viewer", ".NEF").as_deref(),
        Some("C:\\Photos\\output.NEF")
    );
}

#[test]
fn formatting_is_idempotent() {
    for title in [
        "DSC_0042.NEF - ACDSee Viewer",
        "C:\\Photos\\output.NEF\\backup - Viewer",
        "weird.nef.NEF twice",
    ] {
        let once = format_title(title, ".NEF").unwrap();
        let twice = format_title(&once, ".NEF").unwrap();
        assert_eq!(once, twice, "re-formatting changed '{title}'");
    }
}

#[test]
fn formatting_rejects_titles_without_a_filename() {
    assert_eq!(format_title("ACDSee Photo Studio", ".NEF"), None);
    assert_eq!(format_title(".NEF - ACDSee", ".NEF"), None);
    assert_eq!(format_title("", ".NEF"), None);
}

#[test]
fn zero_matching_titles_is_no_viewer_regardless_of_index() {
    let windows = MockWindowQuery::new(
        "totally unrelated window",
        vec!["Notepad".to_string(), "Terminal".to_string()],
    );
    assert_eq!(
        resolve(&windows, "ACDSee", ".NEF", &sample_index()),
        Resolution::NoViewer
    );
}

#[test]
fn several_matching_titles_is_multiple_viewers() {
    let windows = MockWindowQuery::new(
        "",
        vec![
            "DSC_0042.NEF - ACDSee Viewer".to_string(),
            "DSC_0099.NEF - acdsee Viewer".to_string(),
        ],
    );
    assert_eq!(
        resolve(&windows, "ACDSee", ".NEF", &sample_index()),
        Resolution::MultipleViewers
    );
}

#[test]
fn one_viewer_without_an_open_file_is_no_file_chosen() {
    let windows = MockWindowQuery::new("", vec!["ACDSee Photo Studio".to_string()]);
    assert_eq!(
        resolve(&windows, "ACDSee", ".NEF", &sample_index()),
        Resolution::NoFileChosen
    );
}

#[test]
fn unknown_formatted_name_is_file_not_indexed_never_resolved() {
    let windows = MockWindowQuery::new("", vec!["DSC_7777.NEF - ACDSee Viewer".to_string()]);
    assert_eq!(
        resolve(&windows, "ACDSee", ".NEF", &sample_index()),
        Resolution::FileNotIndexed("DSC_7777.NEF".to_string())
    );
}

#[test]
fn a_single_viewer_title_resolves_to_the_first_walked_record() {
    let windows = MockWindowQuery::new("", vec!["DSC_0042.NEF - ACDSee Viewer".to_string()]);
    assert_eq!(
        resolve(&windows, "ACDSee", ".NEF", &sample_index()),
        Resolution::Resolved(PathBuf::from("/photos/a/DSC_0042.NEF"))
    );
}

#[test]
fn marker_matching_is_a_case_insensitive_substring() {
    let windows = MockWindowQuery::new("", vec!["DSC_0099.NEF - acdsee ultimate".to_string()]);
    assert_eq!(
        resolve(&windows, "ACDSee", ".NEF", &sample_index()),
        Resolution::Resolved(PathBuf::from("/photos/a/DSC_0099.NEF"))
    );
}

#[test]
fn foreground_fast_path_skips_window_enumeration() {
    // Two viewer windows would normally block the cycle; a conclusive
    // foreground title must win before enumeration gets a say.
    let windows = MockWindowQuery::new(
        "DSC_0099.NEF - ACDSee Viewer",
        vec![
            "DSC_0042.NEF - ACDSee Viewer".to_string(),
            "DSC_0099.NEF - ACDSee Viewer".to_string(),
        ],
    );
    assert_eq!(
        resolve(&windows, "ACDSee", ".NEF", &sample_index()),
        Resolution::Resolved(PathBuf::from("/photos/a/DSC_0099.NEF"))
    );
}

#[test]
fn inconclusive_foreground_title_falls_back_to_enumeration() {
    let windows = MockWindowQuery::new(
        "DSC_7777.NEF - some other editor",
        vec!["DSC_0042.NEF - ACDSee Viewer".to_string()],
    );
    assert_eq!(
        resolve(&windows, "ACDSee", ".NEF", &sample_index()),
        Resolution::Resolved(PathBuf::from("/photos/a/DSC_0042.NEF"))
    );
}

#[test]
fn extension_token_in_a_directory_segment_blocks_resolution() {
    let windows = MockWindowQuery::new(
        "",
        vec!["C:\\Photos\\output.NEF\\backup - ACDSee".to_string()],
    );

    // The first-occurrence rule keeps the directory-shaped prefix, which is
    // not a candidate basename; the cycle blocks instead of guessing.
    assert_eq!(
        resolve(&windows, "ACDSee", ".NEF", &sample_index()),
        Resolution::FileNotIndexed("C:\\Photos\\output.NEF".to_string())
    );
}
