#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TriggerKey {
    pub modifiers: Vec<String>,
    pub key: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HotkeyError {
    InvalidTrigger(String),
    RegistrationFailed(String),
    EventLoopFailed(String),
    UnsupportedPlatform,
}

impl std::fmt::Display for HotkeyError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidTrigger(reason) => write!(f, "invalid trigger key: {reason}"),
            Self::RegistrationFailed(reason) => write!(f, "registration failed: {reason}"),
            Self::EventLoopFailed(reason) => write!(f, "event loop failed: {reason}"),
            Self::UnsupportedPlatform => write!(f, "unsupported platform"),
        }
    }
}

impl std::error::Error for HotkeyError {}

/// Parses a trigger description such as `x`, `F7`, or `Ctrl+Shift+X`. Unlike
/// a launcher hotkey, a bare unmodified key is legal here: the tool is driven
/// one keypress per photo, and the classic binding is a plain `x`.
pub fn parse_trigger(input: &str) -> Result<TriggerKey, HotkeyError> {
    let parts: Vec<&str> = input
        .split('+')
        .map(|part| part.trim())
        .filter(|part| !part.is_empty())
        .collect();

    let Some((key_raw, modifier_parts)) = parts.split_last() else {
        return Err(HotkeyError::InvalidTrigger("empty trigger".to_string()));
    };

    let mut modifiers = Vec::new();
    for modifier in modifier_parts {
        match modifier.to_ascii_lowercase().as_str() {
            "ctrl" | "control" => modifiers.push("Ctrl".to_string()),
            "alt" => modifiers.push("Alt".to_string()),
            "shift" => modifiers.push("Shift".to_string()),
            other => {
                return Err(HotkeyError::InvalidTrigger(format!(
                    "unsupported modifier: {other}"
                )))
            }
        }
    }

    let key = normalize_key(key_raw)?;
    Ok(TriggerKey { modifiers, key })
}

fn normalize_key(raw: &str) -> Result<String, HotkeyError> {
    let upper = raw.to_ascii_uppercase();
    if upper == "SPACE" || upper == "ENTER" || upper == "RETURN" {
        return Ok(if upper == "RETURN" {
            "Enter".to_string()
        } else {
            capitalize(&upper)
        });
    }

    if let Some(number) = upper.strip_prefix('F') {
        if let Ok(parsed) = number.parse::<u8>() {
            if (1..=12).contains(&parsed) {
                return Ok(format!("F{parsed}"));
            }
        }
        if !number.is_empty() {
            return Err(HotkeyError::InvalidTrigger(
                "function key must be between F1 and F12".to_string(),
            ));
        }
    }

    if upper.len() == 1 && upper.as_bytes()[0].is_ascii_alphanumeric() {
        return Ok(upper);
    }

    Err(HotkeyError::InvalidTrigger(format!(
        "key must be A-Z, 0-9, Space, Enter, or F1-F12, got '{raw}'"
    )))
}

fn capitalize(upper: &str) -> String {
    let mut chars = upper.chars();
    match chars.next() {
        Some(first) => first.to_string() + &chars.as_str().to_ascii_lowercase(),
        None => String::new(),
    }
}

impl std::fmt::Display for TriggerKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for modifier in &self.modifiers {
            write!(f, "{modifier}+")?;
        }
        write!(f, "{}", self.key)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TriggerRegistration {
    Native(i32),
    Noop(String),
}

pub trait HotkeyRegistrar: Send {
    fn register_trigger(&mut self, trigger: &TriggerKey)
        -> Result<TriggerRegistration, HotkeyError>;
    fn unregister_all(&mut self) -> Result<(), HotkeyError>;
}

#[derive(Default)]
pub struct MockHotkeyRegistrar {
    registrations: Vec<String>,
}

impl MockHotkeyRegistrar {
    pub fn registrations(&self) -> &[String] {
        &self.registrations
    }
}

impl HotkeyRegistrar for MockHotkeyRegistrar {
    fn register_trigger(
        &mut self,
        trigger: &TriggerKey,
    ) -> Result<TriggerRegistration, HotkeyError> {
        let label = trigger.to_string();
        self.registrations.push(label.clone());
        Ok(TriggerRegistration::Noop(label))
    }

    fn unregister_all(&mut self) -> Result<(), HotkeyError> {
        self.registrations.clear();
        Ok(())
    }
}

#[cfg(not(target_os = "windows"))]
#[derive(Default)]
pub struct NoopHotkeyRegistrar {
    registrations: Vec<String>,
}

#[cfg(not(target_os = "windows"))]
impl HotkeyRegistrar for NoopHotkeyRegistrar {
    fn register_trigger(
        &mut self,
        trigger: &TriggerKey,
    ) -> Result<TriggerRegistration, HotkeyError> {
        let label = trigger.to_string();
        self.registrations.push(label.clone());
        Ok(TriggerRegistration::Noop(label))
    }

    fn unregister_all(&mut self) -> Result<(), HotkeyError> {
        self.registrations.clear();
        Ok(())
    }
}

#[cfg(target_os = "windows")]
pub struct WindowsHotkeyRegistrar {
    next_id: i32,
    registered_ids: Vec<i32>,
}

#[cfg(target_os = "windows")]
impl Default for WindowsHotkeyRegistrar {
    fn default() -> Self {
        Self {
            next_id: 1,
            registered_ids: Vec::new(),
        }
    }
}

#[cfg(target_os = "windows")]
impl HotkeyRegistrar for WindowsHotkeyRegistrar {
    fn register_trigger(
        &mut self,
        trigger: &TriggerKey,
    ) -> Result<TriggerRegistration, HotkeyError> {
        use windows_sys::Win32::UI::Input::KeyboardAndMouse::{
            RegisterHotKey, MOD_ALT, MOD_CONTROL, MOD_SHIFT, VK_F1, VK_F10, VK_F11, VK_F12,
            VK_F2, VK_F3, VK_F4, VK_F5, VK_F6, VK_F7, VK_F8, VK_F9, VK_RETURN, VK_SPACE,
        };

        let mut modifiers = 0_u32;
        for modifier in &trigger.modifiers {
            match modifier.as_str() {
                "Ctrl" => modifiers |= MOD_CONTROL,
                "Alt" => modifiers |= MOD_ALT,
                "Shift" => modifiers |= MOD_SHIFT,
                other => {
                    return Err(HotkeyError::InvalidTrigger(format!(
                        "unsupported modifier: {other}"
                    )))
                }
            }
        }

        let key_upper = trigger.key.to_ascii_uppercase();
        let vk: u32 = match key_upper.as_str() {
            "SPACE" => VK_SPACE as u32,
            "ENTER" => VK_RETURN as u32,
            "F1" => VK_F1 as u32,
            "F2" => VK_F2 as u32,
            "F3" => VK_F3 as u32,
            "F4" => VK_F4 as u32,
            "F5" => VK_F5 as u32,
            "F6" => VK_F6 as u32,
            "F7" => VK_F7 as u32,
            "F8" => VK_F8 as u32,
            "F9" => VK_F9 as u32,
            "F10" => VK_F10 as u32,
            "F11" => VK_F11 as u32,
            "F12" => VK_F12 as u32,
            _ if key_upper.len() == 1 => key_upper.as_bytes()[0] as u32,
            _ => {
                return Err(HotkeyError::InvalidTrigger(format!(
                    "unsupported key: {}",
                    trigger.key
                )))
            }
        };

        let id = self.next_id;
        self.next_id += 1;

        let ok = unsafe { RegisterHotKey(std::ptr::null_mut(), id, modifiers, vk) };
        if ok == 0 {
            return Err(HotkeyError::RegistrationFailed(format!(
                "RegisterHotKey failed for '{trigger}'"
            )));
        }

        self.registered_ids.push(id);
        Ok(TriggerRegistration::Native(id))
    }

    fn unregister_all(&mut self) -> Result<(), HotkeyError> {
        use windows_sys::Win32::UI::Input::KeyboardAndMouse::UnregisterHotKey;

        for id in self.registered_ids.drain(..) {
            unsafe {
                UnregisterHotKey(std::ptr::null_mut(), id);
            }
        }
        Ok(())
    }
}

pub fn default_hotkey_registrar() -> Box<dyn HotkeyRegistrar> {
    #[cfg(target_os = "windows")]
    {
        Box::new(WindowsHotkeyRegistrar::default())
    }

    #[cfg(not(target_os = "windows"))]
    {
        Box::new(NoopHotkeyRegistrar::default())
    }
}

/// Blocks on the thread message queue, invoking `on_hotkey` for every
/// WM_HOTKEY until WM_QUIT arrives. One invocation per keypress; the next
/// press is not seen until the callback returns, which keeps copy cycles
/// strictly serial.
#[cfg(target_os = "windows")]
pub fn run_message_loop<F>(mut on_hotkey: F) -> Result<(), HotkeyError>
where
    F: FnMut(i32),
{
    use windows_sys::Win32::UI::WindowsAndMessaging::{
        DispatchMessageW, GetMessageW, TranslateMessage, MSG, WM_HOTKEY,
    };

    let mut msg: MSG = unsafe { std::mem::zeroed() };
    loop {
        let status = unsafe { GetMessageW(&mut msg, std::ptr::null_mut(), 0, 0) };
        if status == -1 {
            return Err(HotkeyError::EventLoopFailed(
                "GetMessageW returned -1".to_string(),
            ));
        }
        if status == 0 {
            return Ok(());
        }

        if msg.message == WM_HOTKEY {
            on_hotkey(msg.wParam as i32);
        }

        unsafe {
            TranslateMessage(&msg);
            DispatchMessageW(&msg);
        }
    }
}

#[cfg(not(target_os = "windows"))]
pub fn run_message_loop<F>(_on_hotkey: F) -> Result<(), HotkeyError>
where
    F: FnMut(i32),
{
    Err(HotkeyError::UnsupportedPlatform)
}
