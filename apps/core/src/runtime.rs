use std::path::PathBuf;

use crate::config::{self, Config, ConfigError};
use crate::hotkey::HotkeyError;
use crate::index::IndexError;
use crate::logging;
use crate::session::SortSession;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[derive(Debug)]
pub enum RuntimeError {
    Config(ConfigError),
    Index(IndexError),
    Hotkey(HotkeyError),
    Platform(String),
}

impl std::fmt::Display for RuntimeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Config(error) => write!(f, "config error: {error}"),
            Self::Index(error) => write!(f, "index error: {error}"),
            Self::Hotkey(error) => write!(f, "hotkey error: {error}"),
            Self::Platform(error) => write!(f, "platform error: {error}"),
        }
    }
}

impl std::error::Error for RuntimeError {}

impl From<ConfigError> for RuntimeError {
    fn from(value: ConfigError) -> Self {
        Self::Config(value)
    }
}

impl From<IndexError> for RuntimeError {
    fn from(value: IndexError) -> Self {
        Self::Index(value)
    }
}

impl From<HotkeyError> for RuntimeError {
    fn from(value: HotkeyError) -> Self {
        Self::Hotkey(value)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CliOptions {
    pub config_path: Option<PathBuf>,
    pub extension: Option<String>,
    pub input_dir: Option<PathBuf>,
    pub output_dir: Option<PathBuf>,
    pub trigger_key: Option<String>,
    pub window_marker: Option<String>,
    pub show_help: bool,
    pub show_version: bool,
}

pub fn parse_cli_args(args: &[String]) -> Result<CliOptions, String> {
    let mut options = CliOptions::default();
    let mut iter = args.iter();

    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--help" | "-h" => options.show_help = true,
            "--version" | "-V" => options.show_version = true,
            "--config" => options.config_path = Some(PathBuf::from(flag_value(&mut iter, arg)?)),
            "--ext" | "-e" => {
                options.extension = Some(config::normalized_extension(&flag_value(&mut iter, arg)?))
            }
            "--input" | "-i" => options.input_dir = Some(PathBuf::from(flag_value(&mut iter, arg)?)),
            "--output" | "-o" => {
                options.output_dir = Some(PathBuf::from(flag_value(&mut iter, arg)?))
            }
            "--key" | "-k" => options.trigger_key = Some(flag_value(&mut iter, arg)?),
            "--marker" | "-m" => options.window_marker = Some(flag_value(&mut iter, arg)?),
            other => return Err(format!("unrecognized argument: {other}")),
        }
    }

    Ok(options)
}

fn flag_value(iter: &mut std::slice::Iter<'_, String>, flag: &str) -> Result<String, String> {
    iter.next()
        .map(String::clone)
        .ok_or_else(|| format!("missing value for {flag}"))
}

pub fn usage() -> String {
    format!(
        "photocull-core {VERSION}\n\
         Copies the photo currently shown in the viewer into the sorted folder on a keypress.\n\
         \n\
         Usage: photocull-core [OPTIONS]\n\
         \n\
         Options:\n\
         \x20 -e, --ext <EXT>       file extension to index (default .NEF)\n\
         \x20 -i, --input <DIR>     photo root folder to scan (default .)\n\
         \x20 -o, --output <DIR>    sorted output folder (default ./_sorted)\n\
         \x20 -k, --key <KEY>       trigger key, bare or Ctrl+Alt+X style (default x)\n\
         \x20 -m, --marker <TEXT>   viewer window title marker (default ACDSee)\n\
         \x20     --config <FILE>   config file path override\n\
         \x20 -h, --help            print this help\n\
         \x20 -V, --version         print the version"
    )
}

fn apply_overrides(config: &mut Config, options: &CliOptions) {
    if let Some(extension) = &options.extension {
        config.extension = extension.clone();
    }
    if let Some(input_dir) = &options.input_dir {
        config.input_dir = input_dir.clone();
    }
    if let Some(output_dir) = &options.output_dir {
        config.output_dir = output_dir.clone();
    }
    if let Some(trigger_key) = &options.trigger_key {
        config.trigger_key = trigger_key.clone();
    }
    if let Some(window_marker) = &options.window_marker {
        config.window_marker = window_marker.clone();
    }
}

pub fn run_with_options(options: CliOptions) -> Result<(), RuntimeError> {
    if options.show_help {
        println!("{}", usage());
        return Ok(());
    }
    if options.show_version {
        println!("photocull-core {VERSION}");
        return Ok(());
    }

    if let Err(error) = logging::init() {
        eprintln!("[photocull-core] logging unavailable: {error}");
    }

    let mut config = config::load(options.config_path.as_deref())?;
    if !config.config_path.exists() {
        config::save(&config)?;
        println!(
            "[photocull-core] wrote default config to {}",
            config.config_path.display()
        );
    }
    apply_overrides(&mut config, &options);
    config::validate(&config).map_err(ConfigError::Invalid)?;

    println!(
        "[photocull-core] startup extension={} input={} output={} marker={} key={}",
        config.extension,
        config.input_dir.display(),
        config.output_dir.display(),
        config.window_marker,
        config.trigger_key,
    );
    logging::info(&format!(
        "startup extension={} input={} output={}",
        config.extension,
        config.input_dir.display(),
        config.output_dir.display(),
    ));

    let session = SortSession::new(config.clone())?;
    print_index_report(&session);

    run_trigger_loop(session, &config)
}

fn print_index_report(session: &SortSession) {
    let extension = &session.config().extension;
    let index = session.index();

    if index.is_empty() {
        println!(
            "[photocull-core] 0 {extension} files found; check the extension and the input folder"
        );
        logging::warn("no candidate files found at startup");
    } else {
        println!(
            "[photocull-core] {} {extension} files found",
            index.candidate_count()
        );
    }

    if index.sorted_count() > 0 {
        let last = index.last_sorted_name().unwrap_or_default().to_string();
        println!(
            "[photocull-core] {} file(s) already sorted; last sorted file is {last}",
            index.sorted_count()
        );
    }

    if index.has_duplicate_names() {
        println!(
            "[photocull-core] WARNING: several files share the same name; only the first one found is ever copied"
        );
        logging::warn("duplicate basenames among candidates");
    }
}

#[cfg(target_os = "windows")]
fn run_trigger_loop(mut session: SortSession, config: &Config) -> Result<(), RuntimeError> {
    use crate::hotkey;

    set_console_title(&format!("photocull v{VERSION}"));

    let guard = acquire_single_instance_guard().map_err(RuntimeError::Platform)?;
    if guard.is_none() {
        println!("[photocull-core] another instance is already running; exiting duplicate process");
        return Ok(());
    }

    install_quit_handler().map_err(RuntimeError::Platform)?;

    let trigger = hotkey::parse_trigger(&config.trigger_key)?;
    let mut registrar = hotkey::default_hotkey_registrar();
    registrar.register_trigger(&trigger)?;
    println!("[photocull-core] press {trigger} when the viewer shows a keeper; Ctrl+C exits");

    let result = hotkey::run_message_loop(|_| {
        let _ = session.run_cycle();
    });
    registrar.unregister_all()?;
    result?;

    println!("[photocull-core] stopping");
    logging::info("clean shutdown");
    Ok(())
}

#[cfg(not(target_os = "windows"))]
fn run_trigger_loop(_session: SortSession, _config: &Config) -> Result<(), RuntimeError> {
    println!("[photocull-core] non-windows runtime mode: no trigger loop");
    Ok(())
}

#[cfg(target_os = "windows")]
fn set_console_title(title: &str) {
    use windows_sys::Win32::System::Console::SetConsoleTitleW;

    let wide = to_wide(title);
    unsafe {
        SetConsoleTitleW(wide.as_ptr());
    }
}

#[cfg(target_os = "windows")]
static MAIN_THREAD_ID: std::sync::atomic::AtomicU32 = std::sync::atomic::AtomicU32::new(0);

/// Routes console Ctrl+C into the message loop as WM_QUIT so the loop exits
/// between cycles instead of the process being torn down mid-copy.
#[cfg(target_os = "windows")]
fn install_quit_handler() -> Result<(), String> {
    use std::sync::atomic::Ordering;
    use windows_sys::Win32::System::Console::SetConsoleCtrlHandler;
    use windows_sys::Win32::System::Threading::GetCurrentThreadId;

    MAIN_THREAD_ID.store(unsafe { GetCurrentThreadId() }, Ordering::SeqCst);

    unsafe extern "system" fn ctrl_handler(_ctrl_type: u32) -> i32 {
        use std::sync::atomic::Ordering;
        use windows_sys::Win32::UI::WindowsAndMessaging::{PostThreadMessageW, WM_QUIT};

        let thread_id = MAIN_THREAD_ID.load(Ordering::SeqCst);
        if thread_id != 0 {
            PostThreadMessageW(thread_id, WM_QUIT, 0, 0);
        }
        1
    }

    let installed = unsafe { SetConsoleCtrlHandler(Some(ctrl_handler), 1) };
    if installed == 0 {
        return Err("SetConsoleCtrlHandler failed".to_string());
    }
    Ok(())
}

#[cfg(target_os = "windows")]
struct SingleInstanceGuard {
    handle: windows_sys::Win32::Foundation::HANDLE,
}

#[cfg(target_os = "windows")]
impl Drop for SingleInstanceGuard {
    fn drop(&mut self) {
        unsafe {
            windows_sys::Win32::Foundation::CloseHandle(self.handle);
        }
    }
}

#[cfg(target_os = "windows")]
fn acquire_single_instance_guard() -> Result<Option<SingleInstanceGuard>, String> {
    use windows_sys::Win32::Foundation::{GetLastError, ERROR_ALREADY_EXISTS};
    use windows_sys::Win32::System::Threading::CreateMutexW;

    let mutex_name = to_wide("Local\\PhotocullRuntimeSingleton");
    let handle = unsafe { CreateMutexW(std::ptr::null(), 0, mutex_name.as_ptr()) };
    if handle.is_null() {
        let error = unsafe { GetLastError() };
        return Err(format!("CreateMutexW failed with error {error}"));
    }

    let error = unsafe { GetLastError() };
    if error == ERROR_ALREADY_EXISTS {
        unsafe {
            windows_sys::Win32::Foundation::CloseHandle(handle);
        }
        return Ok(None);
    }

    Ok(Some(SingleInstanceGuard { handle }))
}

#[cfg(target_os = "windows")]
fn to_wide(value: &str) -> Vec<u16> {
    value.encode_utf16().chain(std::iter::once(0)).collect()
}
