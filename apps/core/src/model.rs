use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileRecord {
    pub path: PathBuf,
    pub name: String,
}

impl FileRecord {
    pub fn new(path: PathBuf, name: impl Into<String>) -> Self {
        Self {
            path,
            name: name.into(),
        }
    }
}

/// Reduces a raw viewer window title to a filename by truncating right after
/// the first case-insensitive occurrence of `extension`. Viewers put
/// `<filename>.<EXT> - ViewerName` in the title bar; everything past the
/// extension is viewer chrome. Returns `None` when the extension does not
/// occur or when truncation would leave nothing but the extension itself.
pub fn format_title(title: &str, extension: &str) -> Option<String> {
    if extension.is_empty() {
        return None;
    }

    let position = find_ignore_ascii_case(title, extension)?;
    let end = position + extension.len();
    if !title.is_char_boundary(end) {
        return None;
    }

    let formatted = &title[..end];
    if formatted.len() <= extension.len() {
        return None;
    }

    Some(formatted.to_string())
}

fn find_ignore_ascii_case(haystack: &str, needle: &str) -> Option<usize> {
    let haystack_bytes = haystack.as_bytes();
    let needle_bytes = needle.as_bytes();
    if needle_bytes.is_empty() || needle_bytes.len() > haystack_bytes.len() {
        return None;
    }

    haystack_bytes
        .windows(needle_bytes.len())
        .position(|window| window.eq_ignore_ascii_case(needle_bytes))
        .filter(|position| haystack.is_char_boundary(*position))
}
