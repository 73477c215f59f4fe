use crate::config::Config;
use crate::copyfile::{CopyError, FileCopier, FsCopier};
use crate::index::{self, FileIndex, IndexError};
use crate::logging;
use crate::notify::{default_notifier, Notifier};
use crate::resolver::{self, Resolution};
use crate::windows::{default_window_query, WindowQuery};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CopyOutcome {
    Copied {
        name: String,
        sorted_total: usize,
        progress_percent: u8,
    },
    AlreadySorted(String),
    CopyFailed(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CycleReport {
    Blocked(Resolution),
    Outcome(CopyOutcome),
}

/// One run of the sorter: the index built at startup, the collaborators, and
/// the growing sorted-name set. Constructed once and driven one cycle per
/// trigger press; cycles are strictly serial, so nothing here is locked.
pub struct SortSession {
    config: Config,
    index: FileIndex,
    windows: Box<dyn WindowQuery>,
    copier: Box<dyn FileCopier>,
    notifier: Box<dyn Notifier>,
}

impl SortSession {
    pub fn new(config: Config) -> Result<Self, IndexError> {
        let index = index::build(&config.input_dir, &config.output_dir, &config.extension)?;
        let notifier = default_notifier(
            config.notify_max_len,
            config.notify_success_secs,
            config.notify_error_secs,
        );
        Ok(Self {
            config,
            index,
            windows: default_window_query(),
            copier: Box::new(FsCopier),
            notifier,
        })
    }

    pub fn with_parts(
        config: Config,
        index: FileIndex,
        windows: Box<dyn WindowQuery>,
        copier: Box<dyn FileCopier>,
        notifier: Box<dyn Notifier>,
    ) -> Self {
        Self {
            config,
            index,
            windows,
            copier,
            notifier,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn index(&self) -> &FileIndex {
        &self.index
    }

    /// Resolves the currently shown file and copies it. Every outcome is
    /// reported (toast + console + log) before this returns; a blocked cycle
    /// or failed copy mutates nothing, so the next press can retry.
    pub fn run_cycle(&mut self) -> CycleReport {
        let resolution = resolver::resolve(
            self.windows.as_ref(),
            &self.config.window_marker,
            &self.config.extension,
            &self.index,
        );

        let path = match resolution {
            Resolution::Resolved(path) => path,
            blocked => {
                self.report_blocked(&blocked);
                return CycleReport::Blocked(blocked);
            }
        };

        let name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();

        if self.index.is_sorted(&name) {
            self.notifier.error("ERROR! File already exists!", false);
            println!("[photocull-core] {name} is already sorted; nothing copied");
            logging::info(&format!("skipped already sorted file {name}"));
            return CycleReport::Outcome(CopyOutcome::AlreadySorted(name));
        }

        let dest = self.index.output_dir().join(&name);
        match self.copier.copy_verified(&path, &dest) {
            Ok(()) => {
                let position = self
                    .index
                    .records()
                    .iter()
                    .position(|record| record.path == path)
                    .unwrap_or(0);
                let progress_percent = self.index.progress_percent(position);
                let sorted_total = self.index.mark_sorted(name.clone());

                self.notifier
                    .success(&format!("{name} saved. Sorted {sorted_total}"));
                println!(
                    "[photocull-core] copied {name} sorted_total={sorted_total} progress={progress_percent}%"
                );
                logging::info(&format!("copied {} -> {}", path.display(), dest.display()));
                CycleReport::Outcome(CopyOutcome::Copied {
                    name,
                    sorted_total,
                    progress_percent,
                })
            }
            Err(error) => self.report_copy_failure(&name, error),
        }
    }

    fn report_copy_failure(&mut self, name: &str, error: CopyError) -> CycleReport {
        let reason = error.to_string();
        self.notifier.error("ERROR! Copy failed.", true);
        println!("[photocull-core] copy failed for {name}: {reason}");
        logging::error(&format!("copy failed for {name}: {reason}"));
        CycleReport::Outcome(CopyOutcome::CopyFailed(reason))
    }

    fn report_blocked(&mut self, resolution: &Resolution) {
        let marker = self.config.window_marker.clone();
        match resolution {
            Resolution::NoViewer => {
                self.notifier
                    .error(&format!("ERROR! Start {marker} and choose the file."), false);
                println!("[photocull-core] no {marker} window found; start the viewer");
                logging::warn("cycle blocked: no viewer window");
            }
            Resolution::MultipleViewers => {
                self.notifier
                    .error(&format!("ERROR! Several {marker} windows are running."), false);
                println!(
                    "[photocull-core] several {marker} windows are running; close unused copies"
                );
                logging::warn("cycle blocked: multiple viewer windows");
            }
            Resolution::NoFileChosen => {
                self.notifier
                    .error(&format!("ERROR! No file is open in {marker}."), false);
                println!("[photocull-core] the {marker} window shows no file; choose one");
                logging::warn("cycle blocked: viewer shows no file");
            }
            Resolution::FileNotIndexed(name) => {
                self.notifier
                    .error("ERROR! File not found! Choose file in viewer.", false);
                println!("[photocull-core] {name} is not among the indexed candidates");
                logging::warn(&format!("cycle blocked: {name} not indexed"));
            }
            Resolution::Resolved(_) => {}
        }
    }
}
