use std::sync::{Arc, Mutex};

/// Read-only view of the desktop window state. The platform enumeration is
/// hidden behind this trait; callers only ever see plain title strings.
pub trait WindowQuery: Send {
    fn visible_titles(&self) -> Vec<String>;
    fn foreground_title(&self) -> String;
}

#[derive(Default)]
struct MockWindowState {
    foreground: String,
    titles: Vec<String>,
}

/// Shared-state mock: clones hand out the same window snapshot, so a test can
/// keep one handle for mutation after boxing another into a session.
#[derive(Clone, Default)]
pub struct MockWindowQuery {
    state: Arc<Mutex<MockWindowState>>,
}

impl MockWindowQuery {
    pub fn new(foreground: impl Into<String>, titles: Vec<String>) -> Self {
        let query = Self::default();
        query.set_foreground(foreground);
        query.set_titles(titles);
        query
    }

    pub fn set_foreground(&self, title: impl Into<String>) {
        if let Ok(mut state) = self.state.lock() {
            state.foreground = title.into();
        }
    }

    pub fn set_titles(&self, titles: Vec<String>) {
        if let Ok(mut state) = self.state.lock() {
            state.titles = titles;
        }
    }
}

impl WindowQuery for MockWindowQuery {
    fn visible_titles(&self) -> Vec<String> {
        self.state
            .lock()
            .map(|state| state.titles.clone())
            .unwrap_or_default()
    }

    fn foreground_title(&self) -> String {
        self.state
            .lock()
            .map(|state| state.foreground.clone())
            .unwrap_or_default()
    }
}

#[cfg(not(target_os = "windows"))]
#[derive(Default)]
pub struct NoopWindowQuery;

#[cfg(not(target_os = "windows"))]
impl WindowQuery for NoopWindowQuery {
    fn visible_titles(&self) -> Vec<String> {
        Vec::new()
    }

    fn foreground_title(&self) -> String {
        String::new()
    }
}

#[cfg(target_os = "windows")]
#[derive(Default)]
pub struct NativeWindowQuery;

#[cfg(target_os = "windows")]
impl WindowQuery for NativeWindowQuery {
    fn visible_titles(&self) -> Vec<String> {
        use windows_sys::Win32::Foundation::{HWND, LPARAM};
        use windows_sys::Win32::UI::WindowsAndMessaging::{EnumWindows, IsWindowVisible};

        unsafe extern "system" fn enum_handler(hwnd: HWND, lparam: LPARAM) -> i32 {
            let titles = &mut *(lparam as *mut Vec<String>);
            if IsWindowVisible(hwnd) != 0 {
                let title = window_text(hwnd);
                if !title.is_empty() {
                    titles.push(title);
                }
            }
            1
        }

        let mut titles: Vec<String> = Vec::new();
        unsafe {
            EnumWindows(Some(enum_handler), &mut titles as *mut Vec<String> as LPARAM);
        }
        titles
    }

    fn foreground_title(&self) -> String {
        use windows_sys::Win32::UI::WindowsAndMessaging::GetForegroundWindow;

        let hwnd = unsafe { GetForegroundWindow() };
        if hwnd.is_null() {
            return String::new();
        }
        window_text(hwnd)
    }
}

#[cfg(target_os = "windows")]
fn window_text(hwnd: windows_sys::Win32::Foundation::HWND) -> String {
    use windows_sys::Win32::UI::WindowsAndMessaging::{GetWindowTextLengthW, GetWindowTextW};

    let length = unsafe { GetWindowTextLengthW(hwnd) };
    if length <= 0 {
        return String::new();
    }

    let mut buffer = vec![0_u16; length as usize + 1];
    let copied = unsafe { GetWindowTextW(hwnd, buffer.as_mut_ptr(), buffer.len() as i32) };
    if copied <= 0 {
        return String::new();
    }
    String::from_utf16_lossy(&buffer[..copied as usize])
}

pub fn default_window_query() -> Box<dyn WindowQuery> {
    #[cfg(target_os = "windows")]
    {
        Box::new(NativeWindowQuery)
    }

    #[cfg(not(target_os = "windows"))]
    {
        Box::new(NoopWindowQuery)
    }
}
