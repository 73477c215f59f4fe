//! Borderless topmost popup used for copy feedback. At most one toast exists
//! at a time: showing a new one closes whatever is still on screen, so stale
//! messages never stack up behind fresh ones.

#[cfg(target_os = "windows")]
mod imp {
    use std::ffi::c_void;
    use std::sync::atomic::{AtomicIsize, Ordering};
    use std::sync::{Arc, OnceLock};

    use windows_sys::Win32::Foundation::{HWND, LPARAM, LRESULT, RECT, WPARAM};
    use windows_sys::Win32::Graphics::Gdi::{
        BeginPaint, CreateFontW, CreateSolidBrush, DeleteObject, DrawTextW, EndPaint, FillRect,
        SelectObject, SetBkMode, SetTextColor, DEFAULT_CHARSET, DEFAULT_QUALITY, DT_CENTER,
        DT_SINGLELINE, DT_VCENTER, FF_DONTCARE, FW_BOLD, OUT_DEFAULT_PRECIS, PAINTSTRUCT,
        TRANSPARENT,
    };
    use windows_sys::Win32::System::LibraryLoader::GetModuleHandleW;
    use windows_sys::Win32::UI::WindowsAndMessaging::{
        CreateWindowExW, DefWindowProcW, DestroyWindow, DispatchMessageW, GetMessageW,
        GetSystemMetrics, GetWindowLongPtrW, KillTimer, LoadCursorW, PostMessageW,
        PostQuitMessage, RegisterClassW, SetLayeredWindowAttributes, SetTimer,
        SetWindowLongPtrW, ShowWindow, TranslateMessage, CREATESTRUCTW, CS_HREDRAW, CS_VREDRAW,
        GWLP_USERDATA, IDC_ARROW, LWA_ALPHA, MSG, SM_CXSCREEN, SM_CYSCREEN, SW_SHOWNOACTIVATE,
        WM_CLOSE, WM_DESTROY, WM_LBUTTONUP, WM_NCCREATE, WM_NCDESTROY, WM_PAINT, WM_TIMER,
        WNDCLASSW, WS_EX_LAYERED, WS_EX_NOACTIVATE, WS_EX_TOOLWINDOW, WS_EX_TOPMOST, WS_POPUP,
    };

    const CLASS_NAME: &str = "PhotocullToastWindowClass";

    // Layout tokens. Width scales with the message because the font is
    // monospace; height is fixed.
    const CHAR_WIDTH: i32 = 11;
    const PADDING_X: i32 = 18;
    const TOAST_HEIGHT: i32 = 48;
    const SCREEN_OFFSET_X: i32 = 25;
    const SCREEN_OFFSET_Y: i32 = 25;
    const BORDER_SIZE: i32 = 2;
    const TOAST_ALPHA: u8 = 230;
    const FONT_HEIGHT: i32 = -18;
    const FONT_FAMILY: &str = "Consolas";

    // Visual tokens (COLORREF, 0x00BBGGRR).
    const COLOR_SUCCESS_BG: u32 = 0x00FFFFFF;
    const COLOR_SUCCESS_TEXT: u32 = 0x00000000;
    const COLOR_SUCCESS_BORDER: u32 = 0x00000000;
    const COLOR_ERROR_BG: u32 = 0x00343EE3;
    const COLOR_ERROR_TEXT: u32 = 0x00FFFFFF;
    const COLOR_ERROR_BORDER: u32 = 0x00FFFFFF;

    const DISMISS_TIMER_ID: usize = 0xCA11;

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub enum ToastKind {
        Success,
        Error,
    }

    struct ToastData {
        text: Vec<u16>,
        background: u32,
        text_color: u32,
        border: u32,
    }

    /// Owner of the single pending toast. Cloning shares the slot, so every
    /// holder cancels the same window.
    #[derive(Clone)]
    pub struct ToastHandle {
        current: Arc<AtomicIsize>,
    }

    impl Default for ToastHandle {
        fn default() -> Self {
            Self {
                current: Arc::new(AtomicIsize::new(0)),
            }
        }
    }

    impl ToastHandle {
        pub fn new() -> Self {
            Self::default()
        }

        /// Cancel-then-show: a still-visible toast gets WM_CLOSE before the
        /// replacement window is created on its own thread. The call never
        /// blocks on rendering.
        pub fn show(&self, kind: ToastKind, text: &str, display_secs: u32) {
            let previous = self.current.swap(0, Ordering::SeqCst);
            if previous != 0 {
                unsafe {
                    PostMessageW(previous as HWND, WM_CLOSE, 0, 0);
                }
            }

            let slot = Arc::clone(&self.current);
            let message = text.to_string();
            std::thread::spawn(move || run_toast(slot, kind, message, display_secs));
        }
    }

    fn run_toast(slot: Arc<AtomicIsize>, kind: ToastKind, text: String, display_secs: u32) {
        let Some(class_atom) = registered_class() else {
            return;
        };

        let (background, text_color, border) = match kind {
            ToastKind::Success => (COLOR_SUCCESS_BG, COLOR_SUCCESS_TEXT, COLOR_SUCCESS_BORDER),
            ToastKind::Error => (COLOR_ERROR_BG, COLOR_ERROR_TEXT, COLOR_ERROR_BORDER),
        };
        let data = Box::new(ToastData {
            text: to_wide_no_nul(&text),
            background,
            text_color,
            border,
        });

        let char_count = text.chars().count().max(1) as i32;
        let width = char_count * CHAR_WIDTH + 2 * PADDING_X;
        let (screen_w, screen_h) =
            unsafe { (GetSystemMetrics(SM_CXSCREEN), GetSystemMetrics(SM_CYSCREEN)) };
        let x = screen_w - width - SCREEN_OFFSET_X;
        let y = screen_h - TOAST_HEIGHT - SCREEN_OFFSET_Y;

        let title = to_wide("photocull toast");
        let hwnd = unsafe {
            CreateWindowExW(
                WS_EX_TOPMOST | WS_EX_TOOLWINDOW | WS_EX_LAYERED | WS_EX_NOACTIVATE,
                class_atom as usize as *const u16,
                title.as_ptr(),
                WS_POPUP,
                x,
                y,
                width,
                TOAST_HEIGHT,
                std::ptr::null_mut(),
                std::ptr::null_mut(),
                GetModuleHandleW(std::ptr::null()),
                Box::into_raw(data) as *const c_void,
            )
        };
        if hwnd.is_null() {
            return;
        }

        unsafe {
            SetLayeredWindowAttributes(hwnd, 0, TOAST_ALPHA, LWA_ALPHA);
            ShowWindow(hwnd, SW_SHOWNOACTIVATE);
            SetTimer(hwnd, DISMISS_TIMER_ID, display_secs.max(1) * 1000, None);
        }
        slot.store(hwnd as isize, Ordering::SeqCst);

        let mut msg: MSG = unsafe { std::mem::zeroed() };
        loop {
            let status = unsafe { GetMessageW(&mut msg, std::ptr::null_mut(), 0, 0) };
            if status <= 0 {
                break;
            }
            unsafe {
                TranslateMessage(&msg);
                DispatchMessageW(&msg);
            }
        }

        // Only clear the slot if no newer toast has claimed it meanwhile.
        let _ = slot.compare_exchange(
            hwnd as isize,
            0,
            Ordering::SeqCst,
            Ordering::SeqCst,
        );
    }

    unsafe extern "system" fn toast_wndproc(
        hwnd: HWND,
        message: u32,
        wparam: WPARAM,
        lparam: LPARAM,
    ) -> LRESULT {
        match message {
            WM_NCCREATE => {
                let create = &*(lparam as *const CREATESTRUCTW);
                SetWindowLongPtrW(hwnd, GWLP_USERDATA, create.lpCreateParams as isize);
                DefWindowProcW(hwnd, message, wparam, lparam)
            }
            WM_PAINT => {
                paint_toast(hwnd);
                0
            }
            WM_TIMER if wparam == DISMISS_TIMER_ID => {
                DestroyWindow(hwnd);
                0
            }
            WM_LBUTTONUP => {
                DestroyWindow(hwnd);
                0
            }
            WM_DESTROY => {
                KillTimer(hwnd, DISMISS_TIMER_ID);
                PostQuitMessage(0);
                0
            }
            WM_NCDESTROY => {
                let pointer = SetWindowLongPtrW(hwnd, GWLP_USERDATA, 0) as *mut ToastData;
                if !pointer.is_null() {
                    drop(Box::from_raw(pointer));
                }
                DefWindowProcW(hwnd, message, wparam, lparam)
            }
            _ => DefWindowProcW(hwnd, message, wparam, lparam),
        }
    }

    unsafe fn toast_data<'a>(hwnd: HWND) -> Option<&'a ToastData> {
        let pointer = GetWindowLongPtrW(hwnd, GWLP_USERDATA) as *const ToastData;
        pointer.as_ref()
    }

    unsafe fn paint_toast(hwnd: HWND) {
        let mut ps: PAINTSTRUCT = std::mem::zeroed();
        let hdc = BeginPaint(hwnd, &mut ps);
        if hdc.is_null() {
            return;
        }
        let Some(data) = toast_data(hwnd) else {
            EndPaint(hwnd, &ps);
            return;
        };

        let border_brush = CreateSolidBrush(data.border);
        FillRect(hdc, &ps.rcPaint, border_brush);
        DeleteObject(border_brush as *mut c_void);

        let mut inner: RECT = ps.rcPaint;
        inner.left += BORDER_SIZE;
        inner.top += BORDER_SIZE;
        inner.right -= BORDER_SIZE;
        inner.bottom -= BORDER_SIZE;
        let background_brush = CreateSolidBrush(data.background);
        FillRect(hdc, &inner, background_brush);
        DeleteObject(background_brush as *mut c_void);

        let font = CreateFontW(
            FONT_HEIGHT,
            0,
            0,
            0,
            FW_BOLD as i32,
            0,
            0,
            0,
            DEFAULT_CHARSET as u32,
            OUT_DEFAULT_PRECIS as u32,
            0,
            DEFAULT_QUALITY as u32,
            FF_DONTCARE as u32,
            to_wide(FONT_FAMILY).as_ptr(),
        );
        let previous_font = SelectObject(hdc, font as *mut c_void);
        SetBkMode(hdc, TRANSPARENT as i32);
        SetTextColor(hdc, data.text_color);

        DrawTextW(
            hdc,
            data.text.as_ptr(),
            data.text.len() as i32,
            &mut inner,
            DT_CENTER | DT_VCENTER | DT_SINGLELINE,
        );

        SelectObject(hdc, previous_font);
        DeleteObject(font as *mut c_void);
        EndPaint(hwnd, &ps);
    }

    fn registered_class() -> Option<u16> {
        static CLASS_ATOM: OnceLock<u16> = OnceLock::new();
        let atom = *CLASS_ATOM.get_or_init(|| {
            let class_name = to_wide(CLASS_NAME);
            let class = WNDCLASSW {
                style: CS_HREDRAW | CS_VREDRAW,
                lpfnWndProc: Some(toast_wndproc),
                cbClsExtra: 0,
                cbWndExtra: 0,
                hInstance: unsafe { GetModuleHandleW(std::ptr::null()) },
                hIcon: std::ptr::null_mut(),
                hCursor: unsafe { LoadCursorW(std::ptr::null_mut(), IDC_ARROW) },
                hbrBackground: std::ptr::null_mut(),
                lpszMenuName: std::ptr::null(),
                lpszClassName: class_name.as_ptr(),
            };
            unsafe { RegisterClassW(&class) }
        });
        if atom == 0 {
            None
        } else {
            Some(atom)
        }
    }

    fn to_wide(value: &str) -> Vec<u16> {
        value.encode_utf16().chain(std::iter::once(0)).collect()
    }

    fn to_wide_no_nul(value: &str) -> Vec<u16> {
        value.encode_utf16().collect()
    }
}

#[cfg(target_os = "windows")]
pub use imp::{ToastHandle, ToastKind};
