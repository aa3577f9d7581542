use std::fmt::{Display, Formatter};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::thread::JoinHandle;
use std::time::Duration;

use crate::logging;

pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(500);

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClipboardError {
    Unavailable(String),
    Unsupported,
}

impl Display for ClipboardError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Unavailable(reason) => write!(f, "clipboard unavailable: {reason}"),
            Self::Unsupported => write!(f, "clipboard access is unsupported on this platform"),
        }
    }
}

impl std::error::Error for ClipboardError {}

pub trait ClipboardSource: Send {
    fn read_text(&mut self) -> Result<Option<String>, ClipboardError>;
}

pub trait ClipboardSink {
    fn write_text(&mut self, text: &str) -> Result<(), ClipboardError>;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClipboard;

impl ClipboardSource for SystemClipboard {
    fn read_text(&mut self) -> Result<Option<String>, ClipboardError> {
        read_system_clipboard_text()
    }
}

impl ClipboardSink for SystemClipboard {
    fn write_text(&mut self, text: &str) -> Result<(), ClipboardError> {
        write_system_clipboard_text(text)
    }
}

#[derive(Debug, Default, Clone)]
pub struct MemoryClipboard {
    current: Arc<Mutex<Option<String>>>,
    writes: Arc<Mutex<Vec<String>>>,
}

impl MemoryClipboard {
    pub fn set_text(&self, text: &str) {
        if let Ok(mut current) = self.current.lock() {
            *current = Some(text.to_string());
        }
    }

    pub fn current(&self) -> Option<String> {
        self.current.lock().ok().and_then(|current| current.clone())
    }

    pub fn writes(&self) -> Vec<String> {
        self.writes
            .lock()
            .map(|writes| writes.clone())
            .unwrap_or_default()
    }
}

impl ClipboardSource for MemoryClipboard {
    fn read_text(&mut self) -> Result<Option<String>, ClipboardError> {
        self.current
            .lock()
            .map(|current| current.clone())
            .map_err(|_| ClipboardError::Unavailable("memory clipboard poisoned".to_string()))
    }
}

impl ClipboardSink for MemoryClipboard {
    fn write_text(&mut self, text: &str) -> Result<(), ClipboardError> {
        self.set_text(text);
        self.writes
            .lock()
            .map(|mut writes| writes.push(text.to_string()))
            .map_err(|_| ClipboardError::Unavailable("memory clipboard poisoned".to_string()))
    }
}

pub struct ClipboardWatcher<S> {
    source: S,
    last_text: String,
}

impl<S: ClipboardSource> ClipboardWatcher<S> {
    pub fn new(source: S) -> Self {
        Self {
            source,
            last_text: String::new(),
        }
    }

    // Read failures yield `None` like blank or repeated text.
    pub fn poll(&mut self) -> Option<String> {
        let current = match self.source.read_text() {
            Ok(Some(text)) => text,
            Ok(None) => return None,
            Err(error) => {
                logging::warn(&format!("clipboard poll failed: {error}"));
                return None;
            }
        };

        if current.trim().is_empty() || current == self.last_text {
            return None;
        }

        self.last_text.clone_from(&current);
        Some(current)
    }

    pub fn spawn<F>(mut self, interval: Duration, mut on_text: F) -> WatcherHandle
    where
        S: 'static,
        F: FnMut(String) -> bool + Send + 'static,
    {
        let stop = Arc::new(AtomicBool::new(false));
        let stop_flag = Arc::clone(&stop);
        let join = std::thread::spawn(move || {
            while !stop_flag.load(Ordering::Relaxed) {
                if let Some(text) = self.poll() {
                    if !on_text(text) {
                        break;
                    }
                }
                std::thread::sleep(interval);
            }
        });

        WatcherHandle {
            stop,
            join: Some(join),
        }
    }
}

pub struct WatcherHandle {
    stop: Arc<AtomicBool>,
    join: Option<JoinHandle<()>>,
}

impl WatcherHandle {
    pub fn stop(mut self) {
        self.shutdown();
    }

    pub fn is_running(&self) -> bool {
        self.join
            .as_ref()
            .map(|join| !join.is_finished())
            .unwrap_or(false)
    }

    fn shutdown(&mut self) {
        self.stop.store(true, Ordering::Relaxed);
        if let Some(join) = self.join.take() {
            if join.join().is_err() {
                logging::error("clipboard watcher thread panicked");
            }
        }
    }
}

impl Drop for WatcherHandle {
    fn drop(&mut self) {
        self.shutdown();
    }
}

#[cfg(target_os = "windows")]
fn read_system_clipboard_text() -> Result<Option<String>, ClipboardError> {
    use windows_sys::Win32::System::DataExchange::{
        CloseClipboard, GetClipboardData, IsClipboardFormatAvailable, OpenClipboard, CF_UNICODETEXT,
    };
    use windows_sys::Win32::System::Memory::{GlobalLock, GlobalUnlock};

    unsafe {
        if OpenClipboard(std::ptr::null_mut()) == 0 {
            // Another process holds the clipboard; try again next tick.
            return Ok(None);
        }

        if IsClipboardFormatAvailable(CF_UNICODETEXT) == 0 {
            CloseClipboard();
            return Ok(None);
        }

        let handle = GetClipboardData(CF_UNICODETEXT);
        if handle.is_null() {
            CloseClipboard();
            return Ok(None);
        }

        let ptr = GlobalLock(handle) as *const u16;
        if ptr.is_null() {
            CloseClipboard();
            return Ok(None);
        }

        let mut len = 0usize;
        while *ptr.add(len) != 0 {
            len += 1;
        }
        let slice = std::slice::from_raw_parts(ptr, len);
        let text = String::from_utf16_lossy(slice);

        GlobalUnlock(handle);
        CloseClipboard();
        Ok(Some(text))
    }
}

#[cfg(not(target_os = "windows"))]
fn read_system_clipboard_text() -> Result<Option<String>, ClipboardError> {
    Ok(None)
}

#[cfg(target_os = "windows")]
fn write_system_clipboard_text(value: &str) -> Result<(), ClipboardError> {
    use windows_sys::Win32::System::DataExchange::{
        CloseClipboard, EmptyClipboard, OpenClipboard, SetClipboardData, CF_UNICODETEXT,
    };
    use windows_sys::Win32::System::Memory::{
        GlobalAlloc, GlobalFree, GlobalLock, GlobalUnlock, GMEM_MOVEABLE,
    };

    let wide: Vec<u16> = value.encode_utf16().chain(std::iter::once(0)).collect();
    let bytes = wide.len() * std::mem::size_of::<u16>();
    let fail = |reason: &str| Err(ClipboardError::Unavailable(reason.to_string()));
    unsafe {
        if OpenClipboard(std::ptr::null_mut()) == 0 {
            return fail("failed to open clipboard");
        }
        if EmptyClipboard() == 0 {
            CloseClipboard();
            return fail("failed to clear clipboard");
        }

        let mem = GlobalAlloc(GMEM_MOVEABLE, bytes);
        if mem.is_null() {
            CloseClipboard();
            return fail("failed to allocate clipboard memory");
        }

        let ptr = GlobalLock(mem) as *mut u16;
        if ptr.is_null() {
            GlobalFree(mem);
            CloseClipboard();
            return fail("failed to lock clipboard memory");
        }
        std::ptr::copy_nonoverlapping(wide.as_ptr(), ptr, wide.len());
        GlobalUnlock(mem);

        if SetClipboardData(CF_UNICODETEXT, mem).is_null() {
            GlobalFree(mem);
            CloseClipboard();
            return fail("failed to set clipboard data");
        }

        CloseClipboard();
    }
    Ok(())
}

#[cfg(not(target_os = "windows"))]
fn write_system_clipboard_text(_value: &str) -> Result<(), ClipboardError> {
    Err(ClipboardError::Unsupported)
}
