use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, OnceLock};
use std::time::{SystemTime, UNIX_EPOCH};

const LOG_FILE_NAME: &str = "photocull.log";
const ROTATE_BYTES: u64 = 512 * 1024;
const KEEP_ARCHIVES: usize = 3;

static SINK: OnceLock<Mutex<File>> = OnceLock::new();
static PANIC_HOOK_INSTALLED: OnceLock<()> = OnceLock::new();

#[derive(Debug, Clone, Copy)]
enum Level {
    Info,
    Warn,
    Error,
}

impl Level {
    fn as_str(self) -> &'static str {
        match self {
            Self::Info => "INFO",
            Self::Warn => "WARN",
            Self::Error => "ERROR",
        }
    }
}

pub fn logs_dir() -> PathBuf {
    crate::config::stable_app_data_dir().join("logs")
}

/// Best-effort: a sorter that cannot log still sorts, so callers treat a
/// failed init as a warning, and every write below swallows errors.
pub fn init() -> Result<(), std::io::Error> {
    let dir = logs_dir();
    fs::create_dir_all(&dir)?;
    let path = dir.join(LOG_FILE_NAME);
    rotate_if_oversized(&path, &dir)?;

    let file = OpenOptions::new().create(true).append(true).open(&path)?;
    let _ = SINK.set(Mutex::new(file));

    install_panic_hook();
    Ok(())
}

pub fn info(message: &str) {
    write_line(Level::Info, message);
}

pub fn warn(message: &str) {
    write_line(Level::Warn, message);
}

pub fn error(message: &str) {
    write_line(Level::Error, message);
}

fn write_line(level: Level, message: &str) {
    let Some(sink) = SINK.get() else {
        return;
    };
    let Ok(mut file) = sink.lock() else {
        return;
    };

    let line = format!("[{}] [{}] {message}\n", now_secs(), level.as_str());
    let _ = file.write_all(line.as_bytes());
    let _ = file.flush();
}

fn now_secs() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|duration| duration.as_secs())
        .unwrap_or(0)
}

fn rotate_if_oversized(path: &Path, dir: &Path) -> Result<(), std::io::Error> {
    let size = match fs::metadata(path) {
        Ok(meta) => meta.len(),
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(()),
        Err(err) => return Err(err),
    };
    if size < ROTATE_BYTES {
        return Ok(());
    }

    fs::rename(path, dir.join(format!("photocull-{}.log", now_secs())))?;

    let mut archives: Vec<PathBuf> = fs::read_dir(dir)?
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| {
            path.file_name()
                .and_then(|name| name.to_str())
                .map(|name| name.starts_with("photocull-") && name.ends_with(".log"))
                .unwrap_or(false)
        })
        .collect();
    archives.sort();

    while archives.len() > KEEP_ARCHIVES {
        let oldest = archives.remove(0);
        let _ = fs::remove_file(oldest);
    }
    Ok(())
}

fn install_panic_hook() {
    let _ = PANIC_HOOK_INSTALLED.get_or_init(|| {
        let prior = std::panic::take_hook();
        std::panic::set_hook(Box::new(move |panic_info| {
            let location = panic_info
                .location()
                .map(|l| format!("{}:{}", l.file(), l.line()))
                .unwrap_or_else(|| "unknown".to_string());
            let payload = panic_info
                .payload()
                .downcast_ref::<&str>()
                .map(|s| (*s).to_string())
                .or_else(|| panic_info.payload().downcast_ref::<String>().cloned())
                .unwrap_or_else(|| "panic payload unavailable".to_string());
            error(&format!("panic at {location}: {payload}"));
            prior(panic_info);
        }));
    });
}

#[cfg(test)]
mod tests {
    use super::logs_dir;

    #[test]
    fn logs_dir_sits_under_the_app_data_layout() {
        let dir = logs_dir();
        assert!(dir
            .to_string_lossy()
            .to_ascii_lowercase()
            .contains("photocull"));
    }
}
