use std::thread::JoinHandle;

pub const DEFAULT_HOTKEY: &str = "Alt+Q";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Modifier {
    Alt,
    Ctrl,
    Shift,
    Win,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Char(char),
    Space,
    Function(u8),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Hotkey {
    pub modifiers: Vec<Modifier>,
    pub key: Key,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HotkeyError {
    Invalid(String),
    RegistrationFailed(String),
    EventLoopFailed(String),
    UnsupportedPlatform,
}

impl std::fmt::Display for HotkeyError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Invalid(error) => write!(f, "invalid hotkey: {error}"),
            Self::RegistrationFailed(error) => write!(f, "hotkey registration failed: {error}"),
            Self::EventLoopFailed(error) => write!(f, "hotkey message loop failed: {error}"),
            Self::UnsupportedPlatform => write!(f, "global hotkeys are not supported on this platform"),
        }
    }
}

impl std::error::Error for HotkeyError {}

impl std::fmt::Display for Hotkey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for modifier in &self.modifiers {
            let name = match modifier {
                Modifier::Alt => "Alt",
                Modifier::Ctrl => "Ctrl",
                Modifier::Shift => "Shift",
                Modifier::Win => "Win",
            };
            write!(f, "{name}+")?;
        }
        match self.key {
            Key::Char(c) => write!(f, "{c}"),
            Key::Space => write!(f, "Space"),
            Key::Function(n) => write!(f, "F{n}"),
        }
    }
}

pub fn parse_hotkey(input: &str) -> Result<Hotkey, HotkeyError> {
    let parts: Vec<&str> = input.split('+').map(str::trim).collect();
    if parts.len() < 2 || parts.iter().any(|part| part.is_empty()) {
        return Err(HotkeyError::Invalid(format!(
            "'{input}' is not a modifier+key combination"
        )));
    }

    let Some((key, modifier_parts)) = parts.split_last() else {
        return Err(HotkeyError::Invalid(format!("'{input}' has no key")));
    };

    let mut modifiers = Vec::new();
    for part in modifier_parts {
        let modifier = match part.to_ascii_lowercase().as_str() {
            "alt" => Modifier::Alt,
            "ctrl" | "control" => Modifier::Ctrl,
            "shift" => Modifier::Shift,
            "win" | "meta" | "super" => Modifier::Win,
            _ => {
                return Err(HotkeyError::Invalid(format!(
                    "unsupported modifier: {part}"
                )))
            }
        };
        if !modifiers.contains(&modifier) {
            modifiers.push(modifier);
        }
    }

    Ok(Hotkey {
        modifiers,
        key: parse_key(key)?,
    })
}

fn parse_key(raw: &str) -> Result<Key, HotkeyError> {
    let upper = raw.to_ascii_uppercase();
    if upper == "SPACE" {
        return Ok(Key::Space);
    }

    let mut chars = upper.chars();
    if let (Some(c), None) = (chars.next(), chars.next()) {
        if c.is_ascii_alphanumeric() {
            return Ok(Key::Char(c));
        }
    }

    if let Some(number) = upper.strip_prefix('F').and_then(|n| n.parse::<u8>().ok()) {
        if (1..=12).contains(&number) {
            return Ok(Key::Function(number));
        }
    }

    Err(HotkeyError::Invalid(format!("unsupported key: {raw}")))
}

// Hotkey messages are delivered to the thread that registered them, so the
// listener owns one thread for registration and its message loop.
pub struct HotkeyListener {
    thread_id: u32,
    handle: Option<JoinHandle<()>>,
}

impl HotkeyListener {
    pub fn stop(mut self) {
        self.shutdown();
    }

    fn shutdown(&mut self) {
        if let Some(handle) = self.handle.take() {
            post_quit(self.thread_id);
            let _ = handle.join();
        }
    }
}

impl Drop for HotkeyListener {
    fn drop(&mut self) {
        self.shutdown();
    }
}

// `on_press` runs on the listener thread; returning `false` ends the loop.
pub fn spawn_listener<F>(hotkey: Hotkey, on_press: F) -> Result<HotkeyListener, HotkeyError>
where
    F: FnMut() -> bool + Send + 'static,
{
    #[cfg(target_os = "windows")]
    {
        windows_listener(hotkey, on_press)
    }

    #[cfg(not(target_os = "windows"))]
    {
        let _ = (hotkey, on_press);
        Err(HotkeyError::UnsupportedPlatform)
    }
}

#[cfg(target_os = "windows")]
fn windows_listener<F>(hotkey: Hotkey, mut on_press: F) -> Result<HotkeyListener, HotkeyError>
where
    F: FnMut() -> bool + Send + 'static,
{
    use std::sync::mpsc;
    use windows_sys::Win32::System::Threading::GetCurrentThreadId;
    use windows_sys::Win32::UI::WindowsAndMessaging::PostQuitMessage;

    let (ready_tx, ready_rx) = mpsc::channel::<Result<u32, HotkeyError>>();

    let handle = std::thread::Builder::new()
        .name("clip-recall-hotkey".to_string())
        .spawn(move || {
            ensure_message_queue();
            let mut registrar = WindowsHotkeyRegistrar::default();
            let id = match registrar.register(&hotkey) {
                Ok(id) => id,
                Err(error) => {
                    let _ = ready_tx.send(Err(error));
                    return;
                }
            };
            let _ = ready_tx.send(Ok(unsafe { GetCurrentThreadId() }));

            let result = run_message_loop(|pressed| {
                if pressed == id && !on_press() {
                    unsafe { PostQuitMessage(0) };
                }
            });
            if let Err(error) = result {
                crate::logging::error(&format!("{error}"));
            }
            registrar.unregister_all();
        })
        .map_err(|error| HotkeyError::EventLoopFailed(error.to_string()))?;

    match ready_rx.recv() {
        Ok(Ok(thread_id)) => Ok(HotkeyListener {
            thread_id,
            handle: Some(handle),
        }),
        Ok(Err(error)) => {
            let _ = handle.join();
            Err(error)
        }
        Err(_) => {
            let _ = handle.join();
            Err(HotkeyError::EventLoopFailed(
                "hotkey thread exited during startup".to_string(),
            ))
        }
    }
}

#[cfg(target_os = "windows")]
#[derive(Default)]
struct WindowsHotkeyRegistrar {
    next_id: i32,
    registered_ids: Vec<i32>,
}

#[cfg(target_os = "windows")]
impl WindowsHotkeyRegistrar {
    fn register(&mut self, hotkey: &Hotkey) -> Result<i32, HotkeyError> {
        use windows_sys::Win32::UI::Input::KeyboardAndMouse::{
            RegisterHotKey, MOD_ALT, MOD_CONTROL, MOD_NOREPEAT, MOD_SHIFT, MOD_WIN, VK_F1,
            VK_SPACE,
        };

        let mut modifiers = MOD_NOREPEAT;
        for modifier in &hotkey.modifiers {
            modifiers |= match modifier {
                Modifier::Alt => MOD_ALT,
                Modifier::Ctrl => MOD_CONTROL,
                Modifier::Shift => MOD_SHIFT,
                Modifier::Win => MOD_WIN,
            };
        }

        let vk: u32 = match hotkey.key {
            Key::Char(c) => c as u32,
            Key::Space => VK_SPACE as u32,
            Key::Function(n) => VK_F1 as u32 + u32::from(n - 1),
        };

        self.next_id += 1;
        let id = self.next_id;

        let ok = unsafe { RegisterHotKey(std::ptr::null_mut(), id, modifiers, vk) };
        if ok == 0 {
            return Err(HotkeyError::RegistrationFailed(format!(
                "RegisterHotKey failed for '{hotkey}'"
            )));
        }

        self.registered_ids.push(id);
        Ok(id)
    }

    fn unregister_all(&mut self) {
        use windows_sys::Win32::UI::Input::KeyboardAndMouse::UnregisterHotKey;

        for id in self.registered_ids.drain(..) {
            unsafe {
                UnregisterHotKey(std::ptr::null_mut(), id);
            }
        }
    }
}

// PostThreadMessageW is dropped unless the target thread already has a queue.
#[cfg(target_os = "windows")]
fn ensure_message_queue() {
    use windows_sys::Win32::UI::WindowsAndMessaging::{PeekMessageW, MSG, PM_NOREMOVE, WM_USER};

    let mut msg: MSG = unsafe { std::mem::zeroed() };
    unsafe {
        PeekMessageW(&mut msg, std::ptr::null_mut(), WM_USER, WM_USER, PM_NOREMOVE);
    }
}

#[cfg(target_os = "windows")]
fn run_message_loop<F>(mut on_hotkey: F) -> Result<(), HotkeyError>
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

#[cfg(target_os = "windows")]
fn post_quit(thread_id: u32) {
    use windows_sys::Win32::UI::WindowsAndMessaging::{PostThreadMessageW, WM_QUIT};

    unsafe {
        PostThreadMessageW(thread_id, WM_QUIT, 0, 0);
    }
}

#[cfg(not(target_os = "windows"))]
fn post_quit(_thread_id: u32) {}
