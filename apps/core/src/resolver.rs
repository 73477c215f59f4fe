use std::path::PathBuf;

use crate::index::FileIndex;
use crate::model::format_title;
use crate::windows::WindowQuery;

/// Outcome of mapping the current desktop window state to one candidate file.
/// Exactly one variant is produced per attempt; nothing is cached between
/// attempts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    Resolved(PathBuf),
    NoViewer,
    MultipleViewers,
    NoFileChosen,
    FileNotIndexed(String),
}

/// Resolves the file the user currently means. The foreground window is
/// consulted first: when its title alone names a known candidate there is no
/// need to enumerate the desktop. Otherwise all visible windows matching
/// `marker` decide — none running, several running, or one whose title either
/// names no file, names an unindexed file, or resolves.
pub fn resolve(
    windows: &dyn WindowQuery,
    marker: &str,
    extension: &str,
    index: &FileIndex,
) -> Resolution {
    if let Some(name) = format_title(&windows.foreground_title(), extension) {
        if let Some((_, record)) = index.find_by_suffix(&name) {
            return Resolution::Resolved(record.path.clone());
        }
    }

    let marker_lower = marker.to_lowercase();
    let matching: Vec<String> = windows
        .visible_titles()
        .into_iter()
        .filter(|title| title.to_lowercase().contains(&marker_lower))
        .collect();

    match matching.as_slice() {
        [] => Resolution::NoViewer,
        [title] => match format_title(title, extension) {
            None => Resolution::NoFileChosen,
            Some(name) => {
                if !index.contains_candidate(&name) {
                    return Resolution::FileNotIndexed(name);
                }
                match index.find_by_suffix(&name) {
                    Some((_, record)) => Resolution::Resolved(record.path.clone()),
                    None => Resolution::FileNotIndexed(name),
                }
            }
        },
        _ => Resolution::MultipleViewers,
    }
}
