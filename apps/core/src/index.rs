use std::collections::HashSet;
use std::fmt::{Display, Formatter};
use std::fs;
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::model::FileRecord;

#[derive(Debug)]
pub enum IndexError {
    PathNotFound(PathBuf),
    Io(std::io::Error),
}

impl Display for IndexError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::PathNotFound(path) => write!(f, "input path does not exist: {}", path.display()),
            Self::Io(error) => write!(f, "io error: {error}"),
        }
    }
}

impl std::error::Error for IndexError {}

impl From<std::io::Error> for IndexError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

/// Candidate index built once at startup. `records` keeps walk order; lookups
/// resolve duplicate basenames to the first-walked file.
#[derive(Debug)]
pub struct FileIndex {
    records: Vec<FileRecord>,
    candidate_names: HashSet<String>,
    sorted_names: HashSet<String>,
    output_dir: PathBuf,
}

/// Walks `input_dir` recursively and classifies every file whose lowercase
/// name contains the lowercase `extension`: files sitting directly in
/// `output_dir` count as already sorted, everything else becomes a candidate.
/// Creates `output_dir` when absent so the first copy cannot fail on a
/// missing destination.
pub fn build(input_dir: &Path, output_dir: &Path, extension: &str) -> Result<FileIndex, IndexError> {
    if !input_dir.exists() {
        return Err(IndexError::PathNotFound(input_dir.to_path_buf()));
    }
    let input_abs = input_dir.canonicalize()?;
    if !input_abs.is_dir() {
        return Err(IndexError::PathNotFound(input_dir.to_path_buf()));
    }

    fs::create_dir_all(output_dir)?;
    let output_abs = output_dir.canonicalize()?;

    let needle = extension.to_lowercase();
    let mut records = Vec::new();
    let mut candidate_names = HashSet::new();
    let mut sorted_names = HashSet::new();

    for entry in WalkDir::new(&input_abs)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|entry| entry.ok())
    {
        if !entry.file_type().is_file() {
            continue;
        }
        let name = entry.file_name().to_string_lossy().into_owned();
        if !name.to_lowercase().contains(&needle) {
            continue;
        }

        if entry.path().parent() == Some(output_abs.as_path()) {
            sorted_names.insert(name);
        } else {
            candidate_names.insert(name.clone());
            records.push(FileRecord::new(entry.into_path(), name));
        }
    }

    Ok(FileIndex {
        records,
        candidate_names,
        sorted_names,
        output_dir: output_abs,
    })
}

impl FileIndex {
    pub fn records(&self) -> &[FileRecord] {
        &self.records
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    pub fn candidate_count(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn sorted_count(&self) -> usize {
        self.sorted_names.len()
    }

    /// Duplicate basenames across subdirectories collapse in the name set, so
    /// a shorter set than the record list means only the first-walked file of
    /// each colliding name is reachable.
    pub fn has_duplicate_names(&self) -> bool {
        self.candidate_names.len() < self.records.len()
    }

    pub fn last_sorted_name(&self) -> Option<&str> {
        self.sorted_names
            .iter()
            .max_by(|a, b| a.as_str().cmp(b.as_str()))
            .map(String::as_str)
    }

    pub fn contains_candidate(&self, name: &str) -> bool {
        self.candidate_names.contains(name)
            || self
                .candidate_names
                .iter()
                .any(|candidate| candidate.eq_ignore_ascii_case(name))
    }

    /// First record whose path ends with `name`, matched case-insensitively.
    /// Suffix matching, not equality: viewer titles carry no directory, and
    /// the first-walked file wins for duplicated basenames.
    pub fn find_by_suffix(&self, name: &str) -> Option<(usize, &FileRecord)> {
        let suffix = name.to_lowercase();
        self.records
            .iter()
            .enumerate()
            .find(|(_, record)| record.path.to_string_lossy().to_lowercase().ends_with(&suffix))
    }

    pub fn is_sorted(&self, name: &str) -> bool {
        self.sorted_names.contains(name)
    }

    pub fn mark_sorted(&mut self, name: impl Into<String>) -> usize {
        self.sorted_names.insert(name.into());
        self.sorted_names.len()
    }

    /// One-based position of the record at `index` as a percentage of the
    /// candidate list, mirroring the progress readout of a manual cull pass.
    pub fn progress_percent(&self, index: usize) -> u8 {
        if self.records.is_empty() {
            return 0;
        }
        let percent = 100.0 * (index + 1) as f64 / self.records.len() as f64;
        percent.round().min(100.0) as u8
    }

    pub fn from_parts(records: Vec<FileRecord>, sorted_names: HashSet<String>, output_dir: PathBuf) -> Self {
        let candidate_names = records.iter().map(|record| record.name.clone()).collect();
        Self {
            records,
            candidate_names,
            sorted_names,
            output_dir,
        }
    }
}
