use std::fmt::{Display, Formatter};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

#[derive(Debug)]
pub enum CopyError {
    Io(std::io::Error),
    MissingAfterCopy(PathBuf),
    SizeMismatch { expected: u64, actual: u64 },
    Injected(String),
}

impl Display for CopyError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(error) => write!(f, "io error: {error}"),
            Self::MissingAfterCopy(path) => {
                write!(f, "destination missing after copy: {}", path.display())
            }
            Self::SizeMismatch { expected, actual } => {
                write!(f, "size mismatch after copy: expected {expected} bytes, found {actual}")
            }
            Self::Injected(reason) => write!(f, "{reason}"),
        }
    }
}

impl std::error::Error for CopyError {}

impl From<std::io::Error> for CopyError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

/// Copies one file and verifies the result landed intact.
pub trait FileCopier: Send {
    fn copy_verified(&self, source: &Path, dest: &Path) -> Result<(), CopyError>;
}

#[derive(Default)]
pub struct FsCopier;

impl FileCopier for FsCopier {
    fn copy_verified(&self, source: &Path, dest: &Path) -> Result<(), CopyError> {
        if let Some(parent) = dest.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::copy(source, dest)?;

        if !dest.is_file() {
            return Err(CopyError::MissingAfterCopy(dest.to_path_buf()));
        }
        let expected = fs::metadata(source)?.len();
        let actual = fs::metadata(dest)?.len();
        if expected != actual {
            return Err(CopyError::SizeMismatch { expected, actual });
        }
        Ok(())
    }
}

#[derive(Default)]
struct MockCopierState {
    copies: Vec<(PathBuf, PathBuf)>,
    fail_next: bool,
}

/// Shared-state mock: records every copy request and can be told to fail the
/// next one, for exercising the retry path without touching the disk.
#[derive(Clone, Default)]
pub struct MockCopier {
    state: Arc<Mutex<MockCopierState>>,
}

impl MockCopier {
    pub fn fail_next(&self) {
        if let Ok(mut state) = self.state.lock() {
            state.fail_next = true;
        }
    }

    pub fn copies(&self) -> Vec<(PathBuf, PathBuf)> {
        self.state
            .lock()
            .map(|state| state.copies.clone())
            .unwrap_or_default()
    }
}

impl FileCopier for MockCopier {
    fn copy_verified(&self, source: &Path, dest: &Path) -> Result<(), CopyError> {
        let mut state = self
            .state
            .lock()
            .map_err(|_| CopyError::Injected("mock copier poisoned".to_string()))?;
        if state.fail_next {
            state.fail_next = false;
            return Err(CopyError::Injected("injected copy failure".to_string()));
        }
        state.copies.push((source.to_path_buf(), dest.to_path_buf()));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::time::{SystemTime, UNIX_EPOCH};

    use super::{CopyError, FileCopier, FsCopier};

    #[test]
    fn copies_bytes_and_creates_the_destination_directory() {
        let unique = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap()
            .as_nanos();
        let root = std::env::temp_dir().join(format!("photocull-copy-{unique}"));
        std::fs::create_dir_all(&root).unwrap();
        let source = root.join("shot.NEF");
        std::fs::write(&source, b"raw sensor bytes").unwrap();
        let dest = root.join("_sorted").join("shot.NEF");

        FsCopier.copy_verified(&source, &dest).unwrap();

        assert_eq!(std::fs::read(&dest).unwrap(), b"raw sensor bytes");

        std::fs::remove_dir_all(&root).unwrap();
    }

    #[test]
    fn missing_source_surfaces_as_an_io_error() {
        let unique = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap()
            .as_nanos();
        let root = std::env::temp_dir().join(format!("photocull-copy-missing-{unique}"));
        std::fs::create_dir_all(&root).unwrap();

        let error = FsCopier
            .copy_verified(&root.join("absent.NEF"), &root.join("out").join("absent.NEF"))
            .unwrap_err();
        assert!(matches!(error, CopyError::Io(_)));

        std::fs::remove_dir_all(&root).unwrap();
    }
}
