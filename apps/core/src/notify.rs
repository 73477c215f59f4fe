use std::sync::{Arc, Mutex};

/// Desktop feedback collaborator. `error` with `extended` adds the system
/// exclamation sound and flashes the console window.
pub trait Notifier: Send {
    fn success(&mut self, text: &str);
    fn error(&mut self, text: &str, extended: bool);
}

/// Clamps a message to `max_len` characters before it reaches the toast; a
/// toast sized for arbitrary text would walk off the screen edge.
pub fn truncate_message(text: &str, max_len: usize) -> String {
    if max_len == 0 {
        return String::new();
    }
    text.chars().take(max_len).collect()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NotifyEvent {
    Success(String),
    Error { text: String, extended: bool },
}

/// Shared-state mock recording what would have been shown, post-truncation.
#[derive(Clone)]
pub struct MockNotifier {
    max_len: usize,
    events: Arc<Mutex<Vec<NotifyEvent>>>,
}

impl Default for MockNotifier {
    fn default() -> Self {
        Self {
            max_len: 60,
            events: Arc::new(Mutex::new(Vec::new())),
        }
    }
}

impl MockNotifier {
    pub fn with_max_len(max_len: usize) -> Self {
        Self {
            max_len,
            ..Self::default()
        }
    }

    pub fn events(&self) -> Vec<NotifyEvent> {
        self.events
            .lock()
            .map(|events| events.clone())
            .unwrap_or_default()
    }
}

impl Notifier for MockNotifier {
    fn success(&mut self, text: &str) {
        if let Ok(mut events) = self.events.lock() {
            events.push(NotifyEvent::Success(truncate_message(text, self.max_len)));
        }
    }

    fn error(&mut self, text: &str, extended: bool) {
        if let Ok(mut events) = self.events.lock() {
            events.push(NotifyEvent::Error {
                text: truncate_message(text, self.max_len),
                extended,
            });
        }
    }
}

#[cfg(not(target_os = "windows"))]
#[derive(Default)]
pub struct NoopNotifier;

#[cfg(not(target_os = "windows"))]
impl Notifier for NoopNotifier {
    fn success(&mut self, _text: &str) {}

    fn error(&mut self, _text: &str, _extended: bool) {}
}

#[cfg(target_os = "windows")]
pub struct ToastNotifier {
    handle: crate::toast::ToastHandle,
    max_len: usize,
    success_secs: u32,
    error_secs: u32,
}

#[cfg(target_os = "windows")]
impl ToastNotifier {
    pub fn new(max_len: usize, success_secs: u32, error_secs: u32) -> Self {
        Self {
            handle: crate::toast::ToastHandle::new(),
            max_len,
            success_secs,
            error_secs,
        }
    }
}

#[cfg(target_os = "windows")]
impl Notifier for ToastNotifier {
    fn success(&mut self, text: &str) {
        self.handle.show(
            crate::toast::ToastKind::Success,
            &truncate_message(text, self.max_len),
            self.success_secs,
        );
    }

    fn error(&mut self, text: &str, extended: bool) {
        self.handle.show(
            crate::toast::ToastKind::Error,
            &truncate_message(text, self.max_len),
            self.error_secs,
        );
        if extended {
            beep_and_flash_console();
        }
    }
}

#[cfg(target_os = "windows")]
fn beep_and_flash_console() {
    use windows_sys::Win32::System::Console::GetConsoleWindow;
    use windows_sys::Win32::UI::WindowsAndMessaging::{FlashWindow, MessageBeep, MB_ICONEXCLAMATION};

    unsafe {
        MessageBeep(MB_ICONEXCLAMATION);
        let console = GetConsoleWindow();
        if !console.is_null() {
            FlashWindow(console, 1);
        }
    }
}

pub fn default_notifier(max_len: usize, success_secs: u32, error_secs: u32) -> Box<dyn Notifier> {
    #[cfg(target_os = "windows")]
    {
        Box::new(ToastNotifier::new(max_len, success_secs, error_secs))
    }

    #[cfg(not(target_os = "windows"))]
    {
        let _ = (max_len, success_secs, error_secs);
        Box::new(NoopNotifier)
    }
}
